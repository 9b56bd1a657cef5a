use serde::{Deserialize, Serialize};

/// Partial user update; absent fields stay untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub is_admin: Option<bool>,
}

/// Minimal id + username pair for assignment dropdowns.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct DirectoryEntry {
    pub id: i64,
    pub username: String,
}
