//! Demo data set loaded at startup so a fresh server is immediately
//! usable: four team members and twenty leads spread across the pipeline.

use crate::shared::models::{
    Lead, LeadSource, LeadStatus, TimelineEvent, TimelineKind, User, UserRole,
};
use chrono::{Duration, Utc};
use uuid::Uuid;

pub fn demo_users() -> Vec<User> {
    let user = |name: &str, email: &str, role: UserRole, phone: &str| User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        phone: phone.to_string(),
    };
    vec![
        user("Rajesh Sharma", "rajesh@varanasisolar.com", UserRole::Admin, "919876543210"),
        user("Priya Gupta", "priya@varanasisolar.com", UserRole::Sales, "919876543211"),
        user("Amit Kumar", "amit@varanasisolar.com", UserRole::Sales, "919876543212"),
        user("Vikram Singh", "vikram@varanasisolar.com", UserRole::Technician, "919876543213"),
    ]
}

struct SeedLead<'a> {
    name: &'a str,
    phone: &'a str,
    email: Option<&'a str>,
    address: &'a str,
    status: LeadStatus,
    source: LeadSource,
    assigned_to: Option<usize>,
    quote_amount: Option<f64>,
    system_size: Option<&'a str>,
    visit_in_days: Option<i64>,
    age_hours: i64,
    events: Vec<(TimelineKind, &'a str, &'a str)>,
}

impl Default for SeedLead<'_> {
    fn default() -> Self {
        SeedLead {
            name: "",
            phone: "",
            email: None,
            address: "",
            status: LeadStatus::New,
            source: LeadSource::WalkIn,
            assigned_to: None,
            quote_amount: None,
            system_size: None,
            visit_in_days: None,
            age_hours: 0,
            events: Vec::new(),
        }
    }
}

fn materialize(seed: SeedLead<'_>, users: &[User]) -> Lead {
    let now = Utc::now();
    let created_at = now - Duration::hours(seed.age_hours);
    let timeline: Vec<TimelineEvent> = seed
        .events
        .iter()
        .enumerate()
        .map(|(i, (kind, content, who))| TimelineEvent {
            id: Uuid::new_v4(),
            kind: *kind,
            content: content.to_string(),
            // stagger entries so the newest-first order is visible
            created_at: now - Duration::hours(seed.age_hours.min(2) + i as i64),
            user_name: Some(who.to_string()),
        })
        .collect();
    let updated_at = timeline.first().map(|e| e.created_at).unwrap_or(created_at);
    Lead {
        id: Uuid::new_v4(),
        name: seed.name.to_string(),
        phone: seed.phone.to_string(),
        email: seed.email.map(str::to_string),
        address: seed.address.to_string(),
        status: seed.status,
        source: seed.source,
        assigned_to: seed.assigned_to.and_then(|i| users.get(i)).map(|u| u.id),
        quote_amount: seed.quote_amount,
        system_size: seed.system_size.map(str::to_string),
        scheduled_visit: seed.visit_in_days.map(|d| now + Duration::days(d)),
        timeline,
        created_at,
        updated_at,
    }
}

pub fn demo_leads(users: &[User]) -> Vec<Lead> {
    use LeadSource::*;
    use LeadStatus::*;
    use TimelineKind::*;

    let seeds = vec![
        SeedLead {
            name: "Ramesh Kumar",
            phone: "919812345678",
            email: Some("ramesh@gmail.com"),
            address: "B-45, Lanka, Varanasi",
            status: New,
            source: WalkIn,
            assigned_to: Some(1),
            age_hours: 3,
            events: vec![(StatusChange, "Lead created", "System")],
            ..Default::default()
        },
        SeedLead {
            name: "Sunita Devi",
            phone: "919812345679",
            address: "C-12, Assi Ghat, Varanasi",
            status: Contacted,
            source: Referral,
            assigned_to: Some(2),
            age_hours: 30,
            events: vec![
                (Whatsapp, "Sent welcome message", "Priya Gupta"),
                (StatusChange, "Lead created", "System"),
            ],
            ..Default::default()
        },
        SeedLead {
            name: "Vijay Pandey",
            phone: "919812345680",
            email: Some("vijay.p@email.com"),
            address: "D-78, Sigra, Varanasi",
            status: SurveyScheduled,
            source: Website,
            assigned_to: Some(3),
            visit_in_days: Some(5),
            age_hours: 72,
            events: vec![
                (Visit, "Survey scheduled for Saturday morning", "Amit Kumar"),
                (Call, "Discussed requirements - interested in 5kW system", "Amit Kumar"),
            ],
            ..Default::default()
        },
        SeedLead {
            name: "Meera Singh",
            phone: "919812345681",
            address: "E-23, Bhelupur, Varanasi",
            status: Quoted,
            source: Social,
            assigned_to: Some(1),
            quote_amount: Some(285000.0),
            system_size: Some("5kW On-Grid"),
            age_hours: 120,
            events: vec![(Note, "Quote sent via email - 5kW system at Rs 2,85,000", "Priya Gupta")],
            ..Default::default()
        },
        SeedLead {
            name: "Arun Yadav",
            phone: "919812345682",
            email: Some("arun.y@company.com"),
            address: "F-56, Shivpur, Varanasi",
            status: Negotiation,
            source: Camp,
            assigned_to: Some(2),
            quote_amount: Some(450000.0),
            system_size: Some("8kW On-Grid"),
            age_hours: 168,
            events: vec![(Note, "Customer asking for 10% discount", "Amit Kumar")],
            ..Default::default()
        },
        SeedLead {
            name: "Geeta Mishra",
            phone: "919812345683",
            address: "G-89, Mahmoorganj, Varanasi",
            status: Won,
            source: Referral,
            assigned_to: Some(1),
            quote_amount: Some(195000.0),
            system_size: Some("3kW On-Grid"),
            age_hours: 336,
            events: vec![(StatusChange, "Deal closed! Installation scheduled.", "Priya Gupta")],
            ..Default::default()
        },
        SeedLead {
            name: "Ravi Tiwari",
            phone: "919812345684",
            address: "H-34, Sarnath, Varanasi",
            status: Lost,
            source: Website,
            age_hours: 312,
            events: vec![(Note, "Budget constraints - will revisit next year", "Amit Kumar")],
            ..Default::default()
        },
        SeedLead {
            name: "Anita Verma",
            phone: "919812345685",
            email: Some("anita.v@gmail.com"),
            address: "I-67, Pandeypur, Varanasi",
            status: New,
            source: WalkIn,
            age_hours: 2,
            ..Default::default()
        },
        SeedLead {
            name: "Suresh Chauhan",
            phone: "919812345686",
            address: "J-12, Cantonment, Varanasi",
            status: Contacted,
            source: Camp,
            assigned_to: Some(2),
            age_hours: 50,
            events: vec![(Call, "Initial call - interested in commercial system", "Amit Kumar")],
            ..Default::default()
        },
        SeedLead {
            name: "Kavita Jaiswal",
            phone: "919812345687",
            address: "K-45, Nadesar, Varanasi",
            status: SurveyScheduled,
            source: Social,
            assigned_to: Some(3),
            visit_in_days: Some(6),
            age_hours: 96,
            events: vec![(Visit, "Survey scheduled for Sunday afternoon", "Vikram Singh")],
            ..Default::default()
        },
        SeedLead {
            name: "Deepak Srivastava",
            phone: "919812345688",
            email: Some("deepak.s@business.com"),
            address: "L-78, Lahartara, Varanasi",
            status: Quoted,
            source: Website,
            assigned_to: Some(1),
            quote_amount: Some(680000.0),
            system_size: Some("10kW On-Grid"),
            age_hours: 144,
            ..Default::default()
        },
        SeedLead {
            name: "Pooja Agarwal",
            phone: "919812345689",
            address: "M-23, Durgakund, Varanasi",
            status: New,
            source: Referral,
            age_hours: 5,
            ..Default::default()
        },
        SeedLead {
            name: "Manoj Dubey",
            phone: "919812345690",
            address: "N-56, Kamachha, Varanasi",
            status: Contacted,
            source: WalkIn,
            assigned_to: Some(1),
            age_hours: 78,
            events: vec![(Whatsapp, "Sent product brochure", "Priya Gupta")],
            ..Default::default()
        },
        SeedLead {
            name: "Shanti Prasad",
            phone: "919812345691",
            address: "O-89, Godowlia, Varanasi",
            status: Negotiation,
            source: Camp,
            assigned_to: Some(2),
            quote_amount: Some(320000.0),
            system_size: Some("6kW On-Grid"),
            age_hours: 240,
            ..Default::default()
        },
        SeedLead {
            name: "Rakesh Maurya",
            phone: "919812345692",
            address: "P-34, Ramnagar, Varanasi",
            status: Won,
            source: Referral,
            assigned_to: Some(1),
            quote_amount: Some(255000.0),
            system_size: Some("4kW On-Grid"),
            age_hours: 288,
            ..Default::default()
        },
        SeedLead {
            name: "Suman Patel",
            phone: "919812345693",
            email: Some("suman.p@email.com"),
            address: "Q-67, Manduadih, Varanasi",
            status: SurveyScheduled,
            source: Website,
            assigned_to: Some(3),
            visit_in_days: Some(7),
            age_hours: 130,
            ..Default::default()
        },
        SeedLead {
            name: "Ashok Tripathi",
            phone: "919812345694",
            address: "R-12, Chetganj, Varanasi",
            status: New,
            source: Social,
            age_hours: 20,
            ..Default::default()
        },
        SeedLead {
            name: "Nirmala Saxena",
            phone: "919812345695",
            address: "S-45, Sonarpura, Varanasi",
            status: Contacted,
            source: WalkIn,
            assigned_to: Some(2),
            age_hours: 100,
            ..Default::default()
        },
        SeedLead {
            name: "Prakash Rai",
            phone: "919812345696",
            email: Some("prakash.r@company.com"),
            address: "T-78, Maldahiya, Varanasi",
            status: Quoted,
            source: Referral,
            assigned_to: Some(1),
            quote_amount: Some(520000.0),
            system_size: Some("8kW Hybrid"),
            age_hours: 192,
            ..Default::default()
        },
        SeedLead {
            name: "Uma Shankar",
            phone: "919812345697",
            address: "U-23, Dashashwamedh, Varanasi",
            status: Lost,
            source: Website,
            age_hours: 264,
            events: vec![(Note, "Went with competitor - price issue", "Priya Gupta")],
            ..Default::default()
        },
    ];

    seeds.into_iter().map(|s| materialize(s, users)).collect()
}
