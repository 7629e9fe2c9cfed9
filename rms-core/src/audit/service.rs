//! Audit engine
//!
//! Builds snapshots and diffs from [`Auditable`] entities and appends them
//! to the append-only store. Callers on the write path treat a returned
//! error as best-effort: they log it and carry on, because the primary
//! mutation has already committed by the time the audit entry is written.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};

use super::diff::changed_fields;
use super::types::{AuditAction, AuditLog, AuditLogFilter};
use super::{Auditable, UserContext};
use crate::db::{AuditLogRepository, RepoResult};

#[derive(Clone)]
pub struct AuditService {
    repo: Arc<dyn AuditLogRepository>,
}

impl std::fmt::Debug for AuditService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditService").finish_non_exhaustive()
    }
}

impl AuditService {
    pub fn new(repo: Arc<dyn AuditLogRepository>) -> Self {
        Self { repo }
    }

    fn entry(&self, actor: &UserContext, entity: &dyn Auditable, action: AuditAction) -> AuditLog {
        AuditLog {
            // Assigned by the store on append
            id: 0,
            entity_type: entity.audit_entity_type().to_string(),
            entity_id: entity.audit_entity_id(),
            action,
            old_values: None,
            new_values: None,
            changed_fields: None,
            user_id: actor.user_id,
            username: actor.username.clone(),
            created_at: Utc::now(),
        }
    }

    /// Record a creation: full new-state snapshot, no diff list
    pub async fn log_create(
        &self,
        actor: &UserContext,
        entity: &dyn Auditable,
    ) -> RepoResult<AuditLog> {
        let mut entry = self.entry(actor, entity, AuditAction::Create);
        entry.new_values = Some(Value::Object(entity.audit_fields()));
        self.repo.append(entry).await
    }

    /// Record an update against a pre-mutation field snapshot
    ///
    /// The entry is written even when the diff comes out empty: an update
    /// with no observable field change is still a recorded event.
    pub async fn log_update(
        &self,
        actor: &UserContext,
        entity: &dyn Auditable,
        old_fields: Map<String, Value>,
    ) -> RepoResult<AuditLog> {
        let new_fields = entity.audit_fields();
        let changed = changed_fields(&old_fields, &new_fields);

        let mut entry = self.entry(actor, entity, AuditAction::Update);
        entry.old_values = Some(Value::Object(old_fields));
        entry.new_values = Some(Value::Object(new_fields));
        entry.changed_fields = Some(changed);
        self.repo.append(entry).await
    }

    /// Record a deletion: snapshot of the state immediately before deletion
    pub async fn log_delete(
        &self,
        actor: &UserContext,
        entity: &dyn Auditable,
    ) -> RepoResult<AuditLog> {
        let mut entry = self.entry(actor, entity, AuditAction::Delete);
        entry.old_values = Some(Value::Object(entity.audit_fields()));
        self.repo.append(entry).await
    }

    /// History for one entity, newest first, offset/limit paginated
    pub async fn get_history(
        &self,
        entity_type: &str,
        entity_id: u64,
        page: usize,
        size: usize,
    ) -> RepoResult<(Vec<AuditLog>, u64)> {
        self.repo
            .find_by_entity(entity_type, entity_id, page, size)
            .await
    }

    /// Cross-entity history, newest first
    pub async fn get_all_history(
        &self,
        filter: AuditLogFilter,
        page: usize,
        size: usize,
    ) -> RepoResult<(Vec<AuditLog>, u64)> {
        self.repo.find_filtered(filter, page, size).await
    }
}
