use crate::events::{EventBus, TOPIC_LEAD_CREATED, TOPIC_LEAD_UPDATED};
use crate::shared::errors::CrmError;
use crate::shared::models::{
    AddNoteRequest, CreateLeadRequest, Lead, LeadStatus, Note, TimelineEvent, TimelineKind,
    UpdateLeadRequest,
};
use chrono::Utc;
use log::info;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Sole owner of lead records. Every mutation goes through here so the
/// timeline invariant (each status change prepends exactly one audit
/// entry, every mutation refreshes updated_at) is enforced in one place.
/// Each operation holds the write lock for its whole duration, so effects
/// land atomically or not at all.
pub struct LeadStore {
    leads: RwLock<Vec<Lead>>,
    events: Arc<EventBus>,
    truncate_len: usize,
}

impl LeadStore {
    pub fn new(events: Arc<EventBus>, truncate_len: usize) -> Self {
        Self {
            leads: RwLock::new(Vec::new()),
            events,
            truncate_len,
        }
    }

    /// Replace the store contents. Used at startup for the demo data set.
    pub async fn seed(&self, leads: Vec<Lead>) {
        let mut guard = self.leads.write().await;
        *guard = leads;
        info!("lead store seeded with {} leads", guard.len());
    }

    /// Snapshot of every lead, newest insertion first. Never mutates.
    pub async fn all(&self) -> Vec<Lead> {
        self.leads.read().await.clone()
    }

    pub async fn get(&self, id: Uuid) -> Result<Lead, CrmError> {
        let leads = self.leads.read().await;
        leads
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or(CrmError::NotFound("lead"))
    }

    pub async fn create(&self, req: CreateLeadRequest) -> Result<Lead, CrmError> {
        require_non_blank("name", &req.name)?;
        require_non_blank("phone", &req.phone)?;
        require_non_blank("address", &req.address)?;

        let now = Utc::now();
        // A fresh lead always carries one seed entry: the initial note if
        // one was supplied, otherwise a synthetic creation marker.
        let seed_event = match req.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            Some(notes) => TimelineEvent::new(TimelineKind::Note, notes, Some("You")),
            None => TimelineEvent::new(TimelineKind::StatusChange, "Lead created", Some("System")),
        };
        let lead = Lead {
            id: Uuid::new_v4(),
            name: req.name,
            phone: req.phone,
            email: req.email,
            address: req.address,
            status: LeadStatus::New,
            source: req.source,
            assigned_to: None,
            quote_amount: None,
            system_size: None,
            scheduled_visit: None,
            timeline: vec![seed_event],
            created_at: now,
            updated_at: now,
        };

        {
            let mut leads = self.leads.write().await;
            leads.insert(0, lead.clone());
        }
        info!("created lead {} ({})", lead.id, lead.name);
        self.publish(TOPIC_LEAD_CREATED, &lead);
        Ok(lead)
    }

    /// Merge the supplied fields into an existing lead. A status change
    /// prepends a status_change timeline entry before the updated lead is
    /// returned; updating to the current status leaves the timeline alone.
    pub async fn update(&self, id: Uuid, req: UpdateLeadRequest) -> Result<Lead, CrmError> {
        let updated = {
            let mut leads = self.leads.write().await;
            let lead = leads
                .iter_mut()
                .find(|l| l.id == id)
                .ok_or(CrmError::NotFound("lead"))?;

            if let Some(name) = req.name {
                lead.name = name;
            }
            if let Some(phone) = req.phone {
                lead.phone = phone;
            }
            if let Some(email) = req.email {
                lead.email = Some(email);
            }
            if let Some(address) = req.address {
                lead.address = address;
            }
            if let Some(source) = req.source {
                lead.source = source;
            }
            if let Some(assigned_to) = req.assigned_to {
                lead.assigned_to = Some(assigned_to);
            }
            if let Some(quote_amount) = req.quote_amount {
                lead.quote_amount = Some(quote_amount);
            }
            if let Some(system_size) = req.system_size {
                lead.system_size = Some(system_size);
            }
            if let Some(scheduled_visit) = req.scheduled_visit {
                lead.scheduled_visit = Some(scheduled_visit);
            }
            if let Some(status) = req.status {
                if status != lead.status {
                    lead.timeline.insert(
                        0,
                        TimelineEvent::new(
                            TimelineKind::StatusChange,
                            format!("Status changed to {}", status.display()),
                            Some("You"),
                        ),
                    );
                    lead.status = status;
                }
            }
            lead.updated_at = Utc::now();
            lead.clone()
        };
        self.publish(TOPIC_LEAD_UPDATED, &updated);
        Ok(updated)
    }

    pub async fn add_note(&self, id: Uuid, req: AddNoteRequest) -> Result<Note, CrmError> {
        if req.content.trim().is_empty() {
            return Err(CrmError::Validation("note content cannot be empty".into()));
        }
        let (note, updated) = {
            let mut leads = self.leads.write().await;
            let lead = leads
                .iter_mut()
                .find(|l| l.id == id)
                .ok_or(CrmError::NotFound("lead"))?;

            let note = Note {
                id: Uuid::new_v4(),
                content: req.content,
                created_at: Utc::now(),
                user_id: None,
            };
            lead.timeline.insert(
                0,
                TimelineEvent {
                    id: note.id,
                    kind: TimelineKind::Note,
                    content: note.content.clone(),
                    created_at: note.created_at,
                    user_name: Some("You".to_string()),
                },
            );
            lead.updated_at = Utc::now();
            (note, lead.clone())
        };
        self.publish(TOPIC_LEAD_UPDATED, &updated);
        Ok(note)
    }

    /// Record a successfully delivered outbound message on the lead's
    /// timeline. Best-effort side channel: a missing lead is a no-op, not
    /// an error.
    pub async fn record_notification(&self, id: Uuid, audience: &str, message: &str) {
        let updated = {
            let mut leads = self.leads.write().await;
            let Some(lead) = leads.iter_mut().find(|l| l.id == id) else {
                info!("notification for vanished lead {}, skipping timeline entry", id);
                return;
            };
            let summary: String = message.chars().take(self.truncate_len).collect();
            lead.timeline.insert(
                0,
                TimelineEvent::new(
                    TimelineKind::Whatsapp,
                    format!("WhatsApp sent to {}: \"{}...\"", audience, summary),
                    Some("You"),
                ),
            );
            lead.updated_at = Utc::now();
            lead.clone()
        };
        self.publish(TOPIC_LEAD_UPDATED, &updated);
    }

    fn publish(&self, topic: &str, lead: &Lead) {
        match serde_json::to_value(lead) {
            Ok(payload) => self.events.publish(topic, payload),
            Err(e) => log::error!("failed to serialize lead for {}: {}", topic, e),
        }
    }
}

fn require_non_blank(field: &str, value: &str) -> Result<(), CrmError> {
    if value.trim().is_empty() {
        Err(CrmError::Validation(format!("{} is required", field)))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::LeadSource;

    fn store() -> LeadStore {
        LeadStore::new(Arc::new(EventBus::new()), 50)
    }

    fn create_req(name: &str) -> CreateLeadRequest {
        CreateLeadRequest {
            name: name.to_string(),
            phone: "919999999999".to_string(),
            email: None,
            address: "X".to_string(),
            source: LeadSource::Website,
            notes: None,
        }
    }

    #[tokio::test]
    async fn create_seeds_status_and_timeline() {
        let store = store();
        let lead = store.create(create_req("Test User")).await.unwrap();
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.timeline.len(), 1);
        assert_eq!(lead.timeline[0].kind, TimelineKind::StatusChange);
        assert_eq!(lead.timeline[0].content, "Lead created");
        assert_eq!(lead.created_at, lead.updated_at);
        // visible immediately
        let fetched = store.get(lead.id).await.unwrap();
        assert_eq!(fetched.name, "Test User");
    }

    #[tokio::test]
    async fn create_with_initial_note_seeds_note_event() {
        let store = store();
        let mut req = create_req("Meera Singh");
        req.notes = Some("interested in 5kW".to_string());
        let lead = store.create(req).await.unwrap();
        assert_eq!(lead.timeline.len(), 1);
        assert_eq!(lead.timeline[0].kind, TimelineKind::Note);
        assert_eq!(lead.timeline[0].content, "interested in 5kW");
    }

    #[tokio::test]
    async fn create_rejects_blank_required_fields() {
        let store = store();
        let mut req = create_req("  ");
        req.name = "   ".to_string();
        let err = store.create(req).await.unwrap_err();
        assert!(matches!(err, CrmError::Validation(_)));
    }

    #[tokio::test]
    async fn status_change_prepends_audit_entry() {
        let store = store();
        let lead = store.create(create_req("Test User")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let updated = store
            .update(
                lead.id,
                UpdateLeadRequest {
                    status: Some(LeadStatus::Quoted),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, LeadStatus::Quoted);
        assert_eq!(updated.timeline.len(), 2);
        assert_eq!(updated.timeline[0].kind, TimelineKind::StatusChange);
        assert_eq!(updated.timeline[0].content, "Status changed to quoted");
        assert!(updated.updated_at > lead.updated_at);
    }

    #[tokio::test]
    async fn same_status_update_does_not_touch_timeline() {
        let store = store();
        let lead = store.create(create_req("Test User")).await.unwrap();
        let updated = store
            .update(
                lead.id,
                UpdateLeadRequest {
                    status: Some(LeadStatus::New),
                    quote_amount: Some(285000.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.timeline.len(), 1);
        assert_eq!(updated.quote_amount, Some(285000.0));
    }

    #[tokio::test]
    async fn multi_word_status_renders_with_spaces() {
        let store = store();
        let lead = store.create(create_req("Vijay Pandey")).await.unwrap();
        let updated = store
            .update(
                lead.id,
                UpdateLeadRequest {
                    status: Some(LeadStatus::SurveyScheduled),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(
            updated.timeline[0].content,
            "Status changed to survey scheduled"
        );
    }

    #[tokio::test]
    async fn update_missing_lead_is_not_found() {
        let store = store();
        let err = store
            .update(Uuid::new_v4(), UpdateLeadRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CrmError::NotFound("lead")));
    }

    #[tokio::test]
    async fn add_note_grows_timeline_by_one_at_front() {
        let store = store();
        let lead = store.create(create_req("Test User")).await.unwrap();
        let note = store
            .add_note(
                lead.id,
                AddNoteRequest {
                    content: "Customer asking for 10% discount".to_string(),
                },
            )
            .await
            .unwrap();
        let fetched = store.get(lead.id).await.unwrap();
        assert_eq!(fetched.timeline.len(), 2);
        assert_eq!(fetched.timeline[0].id, note.id);
        assert_eq!(fetched.timeline[0].kind, TimelineKind::Note);
    }

    #[tokio::test]
    async fn add_note_rejects_whitespace_content() {
        let store = store();
        let lead = store.create(create_req("Test User")).await.unwrap();
        let err = store
            .add_note(
                lead.id,
                AddNoteRequest {
                    content: "   \n".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CrmError::Validation(_)));
        let fetched = store.get(lead.id).await.unwrap();
        assert_eq!(fetched.timeline.len(), 1);
    }

    #[tokio::test]
    async fn record_notification_truncates_and_prepends() {
        let store = LeadStore::new(Arc::new(EventBus::new()), 10);
        let lead = store.create(create_req("Test User")).await.unwrap();
        store
            .record_notification(lead.id, "customer", "0123456789ABCDEF this tail is cut")
            .await;
        let fetched = store.get(lead.id).await.unwrap();
        assert_eq!(fetched.timeline[0].kind, TimelineKind::Whatsapp);
        assert_eq!(
            fetched.timeline[0].content,
            "WhatsApp sent to customer: \"0123456789...\""
        );
    }

    #[tokio::test]
    async fn record_notification_for_missing_lead_is_a_noop() {
        let store = store();
        // must not panic or error
        store
            .record_notification(Uuid::new_v4(), "owner", "hello")
            .await;
        assert!(store.all().await.is_empty());
    }

    #[tokio::test]
    async fn mutations_publish_bus_events() {
        let bus = Arc::new(EventBus::new());
        let created = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let updated = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let c = created.clone();
        let u = updated.clone();
        let _s1 = bus.subscribe(TOPIC_LEAD_CREATED, move |_| {
            c.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        });
        let _s2 = bus.subscribe(TOPIC_LEAD_UPDATED, move |_| {
            u.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        });
        let store = LeadStore::new(bus.clone(), 50);
        let lead = store.create(create_req("Test User")).await.unwrap();
        store
            .update(
                lead.id,
                UpdateLeadRequest {
                    status: Some(LeadStatus::Contacted),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(created.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(updated.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
