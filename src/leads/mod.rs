pub mod query;
pub mod seed;
pub mod store;

use crate::shared::errors::CrmError;
use crate::shared::models::{
    AddNoteRequest, CreateLeadRequest, Lead, LeadsResponse, Note, UpdateLeadRequest,
};
use crate::shared::state::AppState;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use query::LeadQuery;
use std::sync::Arc;
use uuid::Uuid;

pub async fn list_leads(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeadQuery>,
) -> Json<LeadsResponse> {
    let snapshot = state.store.all().await;
    Json(query::run(&snapshot, &params))
}

pub async fn get_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Lead>, CrmError> {
    let lead = state.store.get(id).await?;
    Ok(Json(lead))
}

pub async fn create_lead(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateLeadRequest>,
) -> Result<Json<Lead>, CrmError> {
    let lead = state.store.create(req).await?;
    Ok(Json(lead))
}

pub async fn update_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateLeadRequest>,
) -> Result<Json<Lead>, CrmError> {
    let lead = state.store.update(id, req).await?;
    Ok(Json(lead))
}

pub async fn add_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddNoteRequest>,
) -> Result<Json<Note>, CrmError> {
    let note = state.store.add_note(id, req).await?;
    Ok(Json(note))
}

pub fn configure() -> Router<Arc<AppState>> {
    Router::new()
        .route("/leads", get(list_leads).post(create_lead))
        .route("/leads/:id", get(get_lead).put(update_lead))
        .route("/leads/:id/notes", post(add_note))
}
