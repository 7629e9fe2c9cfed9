use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::audit::{AuditAction, AuditLog, AuditService};
use crate::common::ServiceResult;
use crate::db::UserDirectory;
use crate::models::UserSummary;

use super::views::{DateBlockView, ReservationView, RoomView};
use super::Revision;

/// Read model over the audit trail: typed, user-resolved revision lists
#[derive(Clone)]
pub struct HistoryService {
    audit: AuditService,
    users: Arc<dyn UserDirectory>,
}

impl HistoryService {
    pub fn new(audit: AuditService, users: Arc<dyn UserDirectory>) -> Self {
        Self { audit, users }
    }

    pub async fn room_history(
        &self,
        room_id: u64,
        page: usize,
        size: usize,
    ) -> ServiceResult<(Vec<Revision<RoomView>>, u64)> {
        self.reconstruct("room", room_id, page, size).await
    }

    pub async fn reservation_history(
        &self,
        reservation_id: u64,
        page: usize,
        size: usize,
    ) -> ServiceResult<(Vec<Revision<ReservationView>>, u64)> {
        self.reconstruct("reservation", reservation_id, page, size)
            .await
    }

    pub async fn date_block_history(
        &self,
        date_block_id: u64,
        page: usize,
        size: usize,
    ) -> ServiceResult<(Vec<Revision<DateBlockView>>, u64)> {
        self.reconstruct("date_block", date_block_id, page, size)
            .await
    }

    async fn reconstruct<T>(
        &self,
        entity_type: &str,
        entity_id: u64,
        page: usize,
        size: usize,
    ) -> ServiceResult<(Vec<Revision<T>>, u64)>
    where
        T: DeserializeOwned + Default,
    {
        let (logs, total) = self
            .audit
            .get_history(entity_type, entity_id, page, size)
            .await?;

        let mut revisions = Vec::with_capacity(logs.len());
        for log in logs {
            revisions.push(self.revision(log).await);
        }
        Ok((revisions, total))
    }

    async fn revision<T>(&self, log: AuditLog) -> Revision<T>
    where
        T: DeserializeOwned + Default,
    {
        let updated_by = self.resolve_user(&log).await;
        let AuditLog {
            id,
            entity_type,
            entity_id,
            action,
            old_values,
            new_values,
            changed_fields,
            created_at,
            ..
        } = log;

        // Deletions carry the last known state in old_values; everything
        // else snapshots the state after the change
        let snapshot = match action {
            AuditAction::Delete => old_values.or(new_values),
            _ => new_values.or(old_values),
        };

        let entity = snapshot
            .and_then(|value| match serde_json::from_value(value) {
                Ok(entity) => Some(entity),
                Err(err) => {
                    tracing::warn!(
                        entity_type = %entity_type,
                        entity_id,
                        audit_id = id,
                        error = %err,
                        "audit snapshot no longer deserializes, rendering empty view"
                    );
                    None
                }
            })
            .unwrap_or_default();

        Revision {
            entity,
            history_type: action.into(),
            history_created_at: created_at,
            updated_fields: changed_fields.unwrap_or_default(),
            updated_by,
        }
    }

    async fn resolve_user(&self, log: &AuditLog) -> UserSummary {
        let Some(user_id) = log.user_id else {
            return UserSummary {
                name: log.username.clone(),
                ..UserSummary::default()
            };
        };
        match self.users.find_by_id(user_id).await {
            Ok(Some(user)) => user,
            // Deleted or unreachable directory entry; the trail must still
            // render, so fall back to the recorded id
            Ok(None) | Err(_) => UserSummary::id_only(user_id),
        }
    }
}
