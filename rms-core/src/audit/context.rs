//! Acting-user context for audit logging
//!
//! Authentication is an external collaborator; mutating services only
//! consume "who is acting" to stamp audit entries and created/updated-by
//! columns.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: Option<u64>,
    pub username: String,
}

impl UserContext {
    pub fn new(user_id: u64, username: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id),
            username: username.into(),
        }
    }

    /// Actor for internal operations with no authenticated user
    pub fn system() -> Self {
        Self {
            user_id: None,
            username: "system".to_string(),
        }
    }

    /// Numeric id for created_by/updated_by columns (0 = unknown)
    pub fn actor_id(&self) -> u64 {
        self.user_id.unwrap_or(0)
    }
}
