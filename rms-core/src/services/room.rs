//! Room management
//!
//! Rooms are audited: create, update and delete each leave a trail entry.
//! A room that still has non-cancelled reservations cannot be deleted.

use std::sync::Arc;

use chrono::Utc;

use crate::audit::{AuditService, Auditable, UserContext};
use crate::common::{ServiceError, ServiceResult};
use crate::db::{RoomFilter, RoomGroupRepository, RoomRepository};
use crate::models::{Room, RoomStatus};

#[derive(Debug, Clone)]
pub struct RoomInput {
    pub number: String,
    pub room_group_id: u64,
    pub note: String,
    pub status: RoomStatus,
}

#[derive(Clone)]
pub struct RoomService {
    rooms: Arc<dyn RoomRepository>,
    room_groups: Arc<dyn RoomGroupRepository>,
    audit: AuditService,
}

impl RoomService {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        room_groups: Arc<dyn RoomGroupRepository>,
        audit: AuditService,
    ) -> Self {
        Self {
            rooms,
            room_groups,
            audit,
        }
    }

    pub async fn create(&self, actor: &UserContext, input: RoomInput) -> ServiceResult<Room> {
        self.validate(&input, None).await?;

        let now = Utc::now();
        let room = Room {
            id: 0,
            number: input.number,
            room_group_id: input.room_group_id,
            note: input.note,
            status: input.status,
            created_at: now,
            updated_at: now,
            created_by: actor.actor_id(),
            updated_by: actor.actor_id(),
        };
        let created = self.rooms.create(room).await?;

        if let Err(err) = self.audit.log_create(actor, &created).await {
            tracing::error!(room_id = created.id, error = %err, "audit write failed");
        }
        Ok(created)
    }

    pub async fn update(
        &self,
        actor: &UserContext,
        id: u64,
        input: RoomInput,
    ) -> ServiceResult<Room> {
        let existing = self
            .rooms
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::RoomNotFound)?;
        self.validate(&input, Some(id)).await?;
        let old_fields = existing.audit_fields();

        let mut updated = existing;
        updated.number = input.number;
        updated.room_group_id = input.room_group_id;
        updated.note = input.note;
        updated.status = input.status;
        updated.updated_by = actor.actor_id();

        let stored = self.rooms.update(updated).await?;

        if let Err(err) = self.audit.log_update(actor, &stored, old_fields).await {
            tracing::error!(room_id = stored.id, error = %err, "audit write failed");
        }
        Ok(stored)
    }

    pub async fn delete(&self, actor: &UserContext, id: u64) -> ServiceResult<()> {
        let existing = self
            .rooms
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::RoomNotFound)?;
        if self.rooms.has_active_reservations(id).await? {
            return Err(ServiceError::RoomHasReservations);
        }

        self.rooms.delete(id, actor.actor_id()).await?;

        if let Err(err) = self.audit.log_delete(actor, &existing).await {
            tracing::error!(room_id = id, error = %err, "audit write failed");
        }
        Ok(())
    }

    pub async fn get(&self, id: u64) -> ServiceResult<Room> {
        self.rooms
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::RoomNotFound)
    }

    pub async fn list(
        &self,
        filter: RoomFilter,
        page: usize,
        size: usize,
    ) -> ServiceResult<(Vec<Room>, u64)> {
        Ok(self.rooms.find_all(filter, page, size).await?)
    }

    async fn validate(&self, input: &RoomInput, exclude_id: Option<u64>) -> ServiceResult<()> {
        if input.number.trim().is_empty() {
            return Err(ServiceError::Validation("room number must not be empty".into()));
        }
        if self
            .room_groups
            .find_by_id(input.room_group_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::RoomGroupNotFound);
        }
        if self
            .rooms
            .exists_by_number(&input.number, exclude_id)
            .await?
        {
            return Err(ServiceError::RoomNumberExists);
        }
        Ok(())
    }
}
