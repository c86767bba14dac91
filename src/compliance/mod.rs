use crate::leads::query::{self, LeadQuery};
use crate::shared::models::Lead;
use crate::shared::state::AppState;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

/// Render leads as CSV. Every field is double-quoted; rows come out in
/// the order supplied.
pub fn leads_to_csv(leads: &[Lead]) -> Result<String, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());
    wtr.write_record([
        "Name",
        "Phone",
        "Email",
        "Address",
        "Status",
        "Source",
        "Quote Amount",
        "Created",
    ])?;
    for lead in leads {
        let quote = lead.quote_amount.map(|q| q.to_string()).unwrap_or_default();
        wtr.write_record([
            lead.name.as_str(),
            lead.phone.as_str(),
            lead.email.as_deref().unwrap_or(""),
            lead.address.as_str(),
            lead.status.as_str(),
            lead.source.as_str(),
            quote.as_str(),
            &lead.created_at.format("%Y-%m-%d").to_string(),
        ])?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// GET /leads/export with the same status/q filters as the list view,
/// minus pagination: an export always covers every match.
pub async fn export_leads(
    State(state): State<Arc<AppState>>,
    Query(mut params): Query<LeadQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let snapshot = state.store.all().await;
    params.page = Some(1);
    params.limit = Some(snapshot.len().max(1));
    let page = query::run(&snapshot, &params);
    let csv = leads_to_csv(&page.leads)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("CSV error: {e}")))?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"leads.csv\"",
            ),
        ],
        csv,
    ))
}

pub fn configure() -> Router<Arc<AppState>> {
    Router::new().route("/leads/export", get(export_leads))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{LeadSource, LeadStatus};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn lead(name: &str, quote: Option<f64>) -> Lead {
        Lead {
            id: Uuid::new_v4(),
            name: name.to_string(),
            phone: "919812345678".to_string(),
            email: Some("ramesh@gmail.com".to_string()),
            address: "B-45, Lanka, Varanasi".to_string(),
            status: LeadStatus::Quoted,
            source: LeadSource::WalkIn,
            assigned_to: None,
            quote_amount: quote,
            system_size: None,
            scheduled_visit: None,
            timeline: vec![],
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
        }
    }

    #[test]
    fn header_and_quoting_match_the_export_format() {
        let csv = leads_to_csv(&[lead("Ramesh Kumar", Some(285000.0))]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "\"Name\",\"Phone\",\"Email\",\"Address\",\"Status\",\"Source\",\"Quote Amount\",\"Created\""
        );
        assert_eq!(
            lines.next().unwrap(),
            "\"Ramesh Kumar\",\"919812345678\",\"ramesh@gmail.com\",\"B-45, Lanka, Varanasi\",\"quoted\",\"walk_in\",\"285000\",\"2024-01-15\""
        );
    }

    #[test]
    fn missing_optionals_export_as_empty_fields() {
        let mut l = lead("Sunita Devi", None);
        l.email = None;
        let csv = leads_to_csv(&[l]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with("\"Sunita Devi\",\"919812345678\",\"\","));
        assert!(row.ends_with("\"\",\"2024-01-15\""));
    }

    #[test]
    fn rows_preserve_input_order() {
        let csv = leads_to_csv(&[lead("A", None), lead("B", None), lead("C", None)]).unwrap();
        let names: Vec<_> = csv
            .lines()
            .skip(1)
            .map(|l| l.split(',').next().unwrap().trim_matches('"').to_string())
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }
}
