//! Room group management
//!
//! Groups carry the pricing tiers rooms inherit. Groups are not audited;
//! only the three bookable-surface entities leave trail entries.

use std::sync::Arc;

use chrono::Utc;

use crate::audit::UserContext;
use crate::common::{ServiceError, ServiceResult};
use crate::db::{RoomGroupRepository, RoomRepository};
use crate::models::RoomGroup;

#[derive(Debug, Clone)]
pub struct RoomGroupInput {
    pub name: String,
    pub peek_price: i64,
    pub off_peek_price: i64,
    pub description: String,
}

#[derive(Clone)]
pub struct RoomGroupService {
    room_groups: Arc<dyn RoomGroupRepository>,
    rooms: Arc<dyn RoomRepository>,
}

impl RoomGroupService {
    pub fn new(room_groups: Arc<dyn RoomGroupRepository>, rooms: Arc<dyn RoomRepository>) -> Self {
        Self { room_groups, rooms }
    }

    pub async fn create(
        &self,
        actor: &UserContext,
        input: RoomGroupInput,
    ) -> ServiceResult<RoomGroup> {
        self.validate(&input, None).await?;

        let now = Utc::now();
        let group = RoomGroup {
            id: 0,
            name: input.name,
            peek_price: input.peek_price,
            off_peek_price: input.off_peek_price,
            description: input.description,
            created_at: now,
            updated_at: now,
            created_by: actor.actor_id(),
            updated_by: actor.actor_id(),
        };
        Ok(self.room_groups.create(group).await?)
    }

    pub async fn update(
        &self,
        actor: &UserContext,
        id: u64,
        input: RoomGroupInput,
    ) -> ServiceResult<RoomGroup> {
        let existing = self
            .room_groups
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::RoomGroupNotFound)?;
        self.validate(&input, Some(id)).await?;

        let mut updated = existing;
        updated.name = input.name;
        updated.peek_price = input.peek_price;
        updated.off_peek_price = input.off_peek_price;
        updated.description = input.description;
        updated.updated_by = actor.actor_id();

        Ok(self.room_groups.update(updated).await?)
    }

    /// Refused while any room still belongs to the group
    pub async fn delete(&self, actor: &UserContext, id: u64) -> ServiceResult<()> {
        if self.room_groups.find_by_id(id).await?.is_none() {
            return Err(ServiceError::RoomGroupNotFound);
        }
        if self.rooms.count_by_group(id).await? > 0 {
            return Err(ServiceError::RoomGroupInUse);
        }
        Ok(self.room_groups.delete(id, actor.actor_id()).await?)
    }

    pub async fn get(&self, id: u64) -> ServiceResult<RoomGroup> {
        self.room_groups
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::RoomGroupNotFound)
    }

    pub async fn list(&self, page: usize, size: usize) -> ServiceResult<(Vec<RoomGroup>, u64)> {
        Ok(self.room_groups.find_all(page, size).await?)
    }

    async fn validate(&self, input: &RoomGroupInput, exclude_id: Option<u64>) -> ServiceResult<()> {
        if input.name.trim().is_empty() {
            return Err(ServiceError::Validation("group name must not be empty".into()));
        }
        if input.peek_price < 0 || input.off_peek_price < 0 {
            return Err(ServiceError::Validation("prices must not be negative".into()));
        }
        if self
            .room_groups
            .exists_by_name(&input.name, exclude_id)
            .await?
        {
            return Err(ServiceError::RoomGroupNameExists);
        }
        Ok(())
    }
}
