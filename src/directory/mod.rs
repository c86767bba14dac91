use crate::shared::models::User;
use crate::shared::state::AppState;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use uuid::Uuid;

/// Read-only team roster. `Lead::assigned_to` is a soft reference into
/// this list: it is resolved at read time and never assumed valid, and
/// nothing cascades when a user disappears.
pub struct Directory {
    users: Vec<User>,
}

impl Directory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    pub fn list(&self) -> &[User] {
        &self.users
    }

    pub fn get(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Display name for a soft owner reference; None when the reference
    /// is unset or dangling.
    pub fn resolve_name(&self, id: Option<Uuid>) -> Option<&str> {
        id.and_then(|id| self.get(id)).map(|u| u.name.as_str())
    }
}

pub async fn list_users(State(state): State<Arc<AppState>>) -> Json<Vec<User>> {
    Json(state.directory.list().to_vec())
}

pub fn configure() -> Router<Arc<AppState>> {
    Router::new().route("/users", get(list_users))
}
