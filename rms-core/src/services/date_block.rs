//! Administrative date blocks
//!
//! A block closes the whole property for an inclusive day range; bookings
//! whose stay intersects it are refused. Blocks are audited.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::audit::{AuditService, Auditable, UserContext};
use crate::common::{ServiceError, ServiceResult};
use crate::db::DateBlockRepository;
use crate::models::DateBlock;

#[derive(Debug, Clone)]
pub struct DateBlockInput {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

#[derive(Clone)]
pub struct DateBlockService {
    date_blocks: Arc<dyn DateBlockRepository>,
    audit: AuditService,
}

impl DateBlockService {
    pub fn new(date_blocks: Arc<dyn DateBlockRepository>, audit: AuditService) -> Self {
        Self { date_blocks, audit }
    }

    pub async fn create(
        &self,
        actor: &UserContext,
        input: DateBlockInput,
    ) -> ServiceResult<DateBlock> {
        validate(&input)?;

        let now = Utc::now();
        let block = DateBlock {
            id: 0,
            start_date: input.start_date,
            end_date: input.end_date,
            reason: input.reason,
            created_at: now,
            updated_at: now,
            created_by: actor.actor_id(),
            updated_by: actor.actor_id(),
        };
        let created = self.date_blocks.create(block).await?;

        if let Err(err) = self.audit.log_create(actor, &created).await {
            tracing::error!(date_block_id = created.id, error = %err, "audit write failed");
        }
        Ok(created)
    }

    pub async fn update(
        &self,
        actor: &UserContext,
        id: u64,
        input: DateBlockInput,
    ) -> ServiceResult<DateBlock> {
        let existing = self
            .date_blocks
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::DateBlockNotFound)?;
        validate(&input)?;
        let old_fields = existing.audit_fields();

        let mut updated = existing;
        updated.start_date = input.start_date;
        updated.end_date = input.end_date;
        updated.reason = input.reason;
        updated.updated_by = actor.actor_id();

        let stored = self.date_blocks.update(updated).await?;

        if let Err(err) = self.audit.log_update(actor, &stored, old_fields).await {
            tracing::error!(date_block_id = stored.id, error = %err, "audit write failed");
        }
        Ok(stored)
    }

    pub async fn delete(&self, actor: &UserContext, id: u64) -> ServiceResult<()> {
        let existing = self
            .date_blocks
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::DateBlockNotFound)?;

        self.date_blocks.delete(id, actor.actor_id()).await?;

        if let Err(err) = self.audit.log_delete(actor, &existing).await {
            tracing::error!(date_block_id = id, error = %err, "audit write failed");
        }
        Ok(())
    }

    pub async fn get(&self, id: u64) -> ServiceResult<DateBlock> {
        self.date_blocks
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::DateBlockNotFound)
    }

    pub async fn list(&self, page: usize, size: usize) -> ServiceResult<(Vec<DateBlock>, u64)> {
        Ok(self.date_blocks.find_all(page, size).await?)
    }

    /// Whether any block intersects `[start, end)`, for calendar displays
    pub async fn is_range_blocked(&self, start: NaiveDate, end: NaiveDate) -> ServiceResult<bool> {
        Ok(self.date_blocks.is_date_range_blocked(start, end).await?)
    }
}

/// Inclusive day range; a one-day block has equal start and end
fn validate(input: &DateBlockInput) -> ServiceResult<()> {
    if input.start_date > input.end_date {
        return Err(ServiceError::InvalidDateRange);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_day_block_is_valid() {
        let input = DateBlockInput {
            start_date: "2026-03-05".parse().unwrap(),
            end_date: "2026-03-05".parse().unwrap(),
            reason: "deep clean".into(),
        };
        assert!(validate(&input).is_ok());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let input = DateBlockInput {
            start_date: "2026-03-06".parse().unwrap(),
            end_date: "2026-03-05".parse().unwrap(),
            reason: String::new(),
        };
        assert!(matches!(
            validate(&input),
            Err(ServiceError::InvalidDateRange)
        ));
    }
}
