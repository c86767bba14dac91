use crate::shared::errors::CrmError;
use crate::shared::models::Lead;
use crate::shared::state::AppState;
use async_trait::async_trait;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use log::{info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Message template for notifying the owner about a new lead.
pub const OWNER_TEMPLATE: &str = "New lead: {name} ({phone}) — needs follow-up!";
/// Message template welcoming a new customer.
pub const CUSTOMER_TEMPLATE: &str = "Namaste {name}! Thank you for your interest in Varanasi Solar. We will contact you shortly about your solar installation.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    Owner,
    Customer,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::Owner => "owner",
            Audience::Customer => "customer",
        }
    }
}

/// Substitute `{name}`, `{phone}` and `{address}` into the audience's
/// default template.
pub fn render_template(audience: Audience, lead: &Lead) -> String {
    let template = match audience {
        Audience::Owner => OWNER_TEMPLATE,
        Audience::Customer => CUSTOMER_TEMPLATE,
    };
    template
        .replace("{name}", &lead.name)
        .replace("{phone}", &lead.phone)
        .replace("{address}", &lead.address)
}

/// Outbound message channel. Exactly two outcomes: deliver (caller then
/// records a timeline entry) or fail with no store mutation.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn send(&self, to: &str, message: &str) -> Result<(), CrmError>;
}

/// Simulated channel with a configurable success probability.
pub struct MockChannel {
    success_rate: f64,
}

impl MockChannel {
    pub fn new(success_rate: f64) -> Self {
        Self { success_rate }
    }
}

#[async_trait]
impl NotificationChannel for MockChannel {
    async fn send(&self, to: &str, _message: &str) -> Result<(), CrmError> {
        let roll: f64 = rand::thread_rng().gen();
        if roll < self.success_rate {
            info!("mock WhatsApp delivered to {}", to);
            Ok(())
        } else {
            warn!("mock WhatsApp delivery to {} failed", to);
            Err(CrmError::SendFailed)
        }
    }
}

/// Placeholder for the real WhatsApp Business API client. Selected when
/// MOCK_MODE=false; rejects every send until an integration exists.
pub struct CloudChannel {
    api_url: String,
}

impl CloudChannel {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self { api_url: api_url.into() }
    }
}

#[async_trait]
impl NotificationChannel for CloudChannel {
    async fn send(&self, _to: &str, _message: &str) -> Result<(), CrmError> {
        Err(CrmError::Network(format!(
            "no WhatsApp backend configured at {}",
            self.api_url
        )))
    }
}

#[derive(Debug, Deserialize)]
pub struct SendWhatsAppRequest {
    pub to: String,
    #[serde(rename = "type")]
    pub audience: Audience,
    pub message: String,
    pub lead_id: Uuid,
}

pub async fn send_whatsapp(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendWhatsAppRequest>,
) -> Result<Json<serde_json::Value>, CrmError> {
    // Owner notifications may omit the destination; the configured owner
    // number is the default.
    let to = if req.to.trim().is_empty() && req.audience == Audience::Owner {
        state.config.owner_number.clone()
    } else {
        req.to.clone()
    };
    // An empty message falls back to the audience's default template,
    // filled in from the lead.
    let message = if req.message.trim().is_empty() {
        let lead = state.store.get(req.lead_id).await?;
        render_template(req.audience, &lead)
    } else {
        req.message.clone()
    };
    info!("sending WhatsApp to {} ({})", to, req.audience.as_str());
    state.channel.send(&to, &message).await?;
    state
        .store
        .record_notification(req.lead_id, req.audience.as_str(), &message)
        .await;
    Ok(Json(serde_json::json!({ "success": true })))
}

pub fn configure() -> Router<Arc<AppState>> {
    Router::new().route("/whatsapp/send", post(send_whatsapp))
}
