//! User summary - minimal view of the external user directory
//!
//! Authentication lives outside this crate; history reconstruction only
//! needs enough of a user to label "who changed this".

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: u64,
    /// External login identifier
    pub user_id: String,
    pub email: String,
    pub name: String,
}

impl UserSummary {
    /// Fallback when the directory lookup fails: only the numeric id survives
    pub fn id_only(id: u64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}
