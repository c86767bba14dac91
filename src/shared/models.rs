use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    SurveyScheduled,
    Quoted,
    Negotiation,
    Won,
    Lost,
}

impl LeadStatus {
    /// Wire name, e.g. "survey_scheduled".
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::SurveyScheduled => "survey_scheduled",
            LeadStatus::Quoted => "quoted",
            LeadStatus::Negotiation => "negotiation",
            LeadStatus::Won => "won",
            LeadStatus::Lost => "lost",
        }
    }

    /// Human form used in timeline entries: underscores become spaces.
    pub fn display(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Won and lost leads are out of the active pipeline.
    pub fn is_closed(&self) -> bool {
        matches!(self, LeadStatus::Won | LeadStatus::Lost)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    WalkIn,
    Referral,
    Website,
    Social,
    Camp,
}

impl LeadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::WalkIn => "walk_in",
            LeadSource::Referral => "referral",
            LeadSource::Website => "website",
            LeadSource::Social => "social",
            LeadSource::Camp => "camp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineKind {
    Note,
    Call,
    Whatsapp,
    StatusChange,
    Visit,
}

/// One audit record in a lead's timeline. The store only ever prepends
/// these; nothing mutates or removes an entry once it is in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TimelineKind,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

impl TimelineEvent {
    pub fn new(kind: TimelineKind, content: impl Into<String>, user_name: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            content: content.into(),
            created_at: Utc::now(),
            user_name: user_name.map(|s| s.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub address: String,
    pub status: LeadStatus,
    pub source: LeadSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_visit: Option<DateTime<Utc>>,
    /// Newest first.
    pub timeline: Vec<TimelineEvent>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Sales,
    Technician,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateLeadRequest {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    pub address: String,
    pub source: LeadSource,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateLeadRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub status: Option<LeadStatus>,
    pub source: Option<LeadSource>,
    pub assigned_to: Option<Uuid>,
    pub quote_amount: Option<f64>,
    pub system_size: Option<String>,
    pub scheduled_visit: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct AddNoteRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct LeadsResponse {
    pub leads: Vec<Lead>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    pub new_leads_24h: usize,
    pub pipeline_total: usize,
    pub pending_followups: usize,
    pub conversions_month: usize,
}
