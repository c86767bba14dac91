use crate::shared::models::{AnalyticsSummary, Lead, LeadStatus};
use crate::shared::state::AppState;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Duration, Utc};
use std::sync::Arc;

/// Dashboard KPI figures computed from the live store.
pub fn summarize(leads: &[Lead]) -> AnalyticsSummary {
    let cutoff = Utc::now() - Duration::hours(24);
    AnalyticsSummary {
        new_leads_24h: leads.iter().filter(|l| l.created_at > cutoff).count(),
        pipeline_total: leads.iter().filter(|l| !l.status.is_closed()).count(),
        pending_followups: leads
            .iter()
            .filter(|l| matches!(l.status, LeadStatus::New | LeadStatus::Contacted))
            .count(),
        conversions_month: leads
            .iter()
            .filter(|l| l.status == LeadStatus::Won)
            .count(),
    }
}

pub async fn analytics_summary(State(state): State<Arc<AppState>>) -> Json<AnalyticsSummary> {
    let snapshot = state.store.all().await;
    Json(summarize(&snapshot))
}

pub fn configure() -> Router<Arc<AppState>> {
    Router::new().route("/analytics/summary", get(analytics_summary))
}
