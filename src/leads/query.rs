use crate::shared::models::{Lead, LeadStatus, LeadsResponse};
use serde::Deserialize;

pub const DEFAULT_LIMIT: usize = 20;

#[derive(Debug, Default, Clone, Deserialize)]
pub struct LeadQuery {
    pub status: Option<LeadStatus>,
    /// Free-text search over name (case-insensitive) and phone (substring).
    pub q: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// Filter, sort and paginate a snapshot of the store. Pure: the same
/// arguments against the same snapshot always produce the same page.
pub fn run(leads: &[Lead], query: &LeadQuery) -> LeadsResponse {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).max(1);

    let needle = query
        .q
        .as_deref()
        .map(str::to_lowercase)
        .filter(|q| !q.is_empty());

    let mut filtered: Vec<&Lead> = leads
        .iter()
        .filter(|l| query.status.map_or(true, |s| l.status == s))
        .filter(|l| {
            needle.as_deref().map_or(true, |q| {
                l.name.to_lowercase().contains(q) || l.phone.contains(q)
            })
        })
        .collect();

    // stable: equal timestamps keep insertion order
    filtered.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let total = filtered.len();
    let start = (page - 1).saturating_mul(limit);
    let page_leads: Vec<Lead> = filtered
        .into_iter()
        .skip(start)
        .take(limit)
        .cloned()
        .collect();

    LeadsResponse {
        leads: page_leads,
        total,
        page,
        limit,
    }
}
