pub mod analytics;
pub mod api_router;
pub mod compliance;
pub mod config;
pub mod directory;
pub mod events;
pub mod leads;
pub mod shared;
pub mod whatsapp;

pub use shared::errors::CrmError;
pub use shared::state::AppState;
