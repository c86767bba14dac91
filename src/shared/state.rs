use crate::config::AppConfig;
use crate::directory::Directory;
use crate::events::EventBus;
use crate::leads::seed;
use crate::leads::store::LeadStore;
use crate::whatsapp::{CloudChannel, MockChannel, NotificationChannel};
use log::info;
use std::sync::Arc;

/// Everything a handler needs, shared as one `Arc`. The store is the only
/// owner of lead records; the other collaborators read from it or request
/// mutations through it.
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<LeadStore>,
    pub directory: Arc<Directory>,
    pub channel: Arc<dyn NotificationChannel>,
    pub events: Arc<EventBus>,
}

impl AppState {
    /// Wire up the collaborators for the configured mode and optionally
    /// load the demo data set.
    pub async fn initialize(config: AppConfig) -> Arc<Self> {
        let events = Arc::new(EventBus::new());
        let store = Arc::new(LeadStore::new(
            Arc::clone(&events),
            config.whatsapp.truncate_len,
        ));
        let users = seed::demo_users();
        if config.seed_demo_data {
            store.seed(seed::demo_leads(&users)).await;
        }
        let channel: Arc<dyn NotificationChannel> = if config.mock_mode {
            Arc::new(MockChannel::new(config.whatsapp.success_rate))
        } else {
            info!("backend mode: WhatsApp sends go to {}", config.api_url);
            Arc::new(CloudChannel::new(config.api_url.clone()))
        };
        Arc::new(AppState {
            config,
            store,
            directory: Arc::new(Directory::new(users)),
            channel,
            events,
        })
    }
}
