use dealbrief_core::classify::MeetingType;
use dealbrief_ingest::{process_inbound_email, InboundPayload, IngestError, IngestOutcome};
use dealbrief_store::repo::UserNew;
use dealbrief_store::Store;
use std::collections::HashMap;

const NOW: i64 = 1_700_000_000;
const ROUTING: &str = "u_abc123@in.example.com";

fn store_with_user() -> (Store, dealbrief_core::domain::User) {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    let user = store
        .users()
        .create(
            NOW,
            UserNew {
                email: Some("owner@example.com".to_string()),
                bcc_address: ROUTING.to_string(),
            },
        )
        .expect("create user");
    (store, user)
}

fn payload(message_id: &str, from: &str, to: Vec<&str>, bcc: Vec<&str>, subject: &str) -> InboundPayload {
    InboundPayload {
        message_id: message_id.to_string(),
        from: Some(from.to_string()),
        to: to.into_iter().map(str::to_string).collect(),
        cc: Vec::new(),
        bcc: bcc.into_iter().map(str::to_string).collect(),
        subject: Some(subject.to_string()),
        text_body: Some("body".to_string()),
        html_body: None,
        sent_at: None,
        headers: HashMap::new(),
    }
}

#[test]
fn unroutable_email_is_dropped_without_side_effects() {
    let (store, user) = store_with_user();
    let payload = payload("m1", "jane@acme.com", vec!["bob@corp.io"], vec![], "hello");

    let outcome = process_inbound_email(&store, NOW, &payload).expect("process");
    assert_eq!(outcome, IngestOutcome::Unroutable);
    assert_eq!(store.messages().count_for_user(user.id).expect("count"), 0);
    assert!(store.contacts().list_for_user(user.id).expect("list").is_empty());
}

#[test]
fn unknown_routing_address_is_dropped() {
    let (store, user) = store_with_user();
    let payload = payload(
        "m1",
        "jane@acme.com",
        vec!["u_nobody@in.example.com"],
        vec![],
        "hello",
    );

    let outcome = process_inbound_email(&store, NOW, &payload).expect("process");
    assert_eq!(outcome, IngestOutcome::UnknownRecipient);
    assert_eq!(store.messages().count_for_user(user.id).expect("count"), 0);
}

#[test]
fn payload_without_from_or_to_is_invalid() {
    let (store, _user) = store_with_user();
    let payload = InboundPayload {
        message_id: "m1".to_string(),
        from: None,
        to: Vec::new(),
        cc: Vec::new(),
        bcc: Vec::new(),
        subject: Some("hello".to_string()),
        text_body: None,
        html_body: None,
        sent_at: None,
        headers: HashMap::new(),
    };
    assert!(matches!(
        process_inbound_email(&store, NOW, &payload),
        Err(IngestError::InvalidPayload)
    ));
}

#[test]
fn second_delivery_of_same_message_is_a_noop() {
    let (store, user) = store_with_user();
    let payload = payload("m1", "jane@acme.com", vec![ROUTING], vec![], "hello");

    let first = process_inbound_email(&store, NOW, &payload).expect("first");
    assert!(matches!(first, IngestOutcome::Processed { .. }));

    let second = process_inbound_email(&store, NOW + 60, &payload).expect("retry");
    assert_eq!(second, IngestOutcome::Duplicate);
    assert_eq!(store.messages().count_for_user(user.id).expect("count"), 1);
}

#[test]
fn personal_domain_sender_gets_contact_but_no_org() {
    let (store, user) = store_with_user();
    let payload = payload("m1", "Pat <pat@gmail.com>", vec![ROUTING], vec![], "hello");

    process_inbound_email(&store, NOW, &payload).expect("process");

    let contact = store
        .contacts()
        .find_by_email(user.id, "pat@gmail.com")
        .expect("find")
        .expect("contact exists");
    assert_eq!(contact.org_id, None);
    assert_eq!(contact.name.as_deref(), Some("Pat"));
    assert!(store
        .organizations()
        .list_for_user(user.id)
        .expect("list orgs")
        .is_empty());
}

#[test]
fn corporate_domain_creates_one_org_with_derived_name() {
    let (store, user) = store_with_user();
    let payload = payload(
        "m1",
        "Jane <jane@acme-corp.com>",
        vec![ROUTING, "bob@acme-corp.com"],
        vec![],
        "hello",
    );

    process_inbound_email(&store, NOW, &payload).expect("process");

    let orgs = store.organizations().list_for_user(user.id).expect("list");
    assert_eq!(orgs.len(), 1);
    assert_eq!(orgs[0].name, "Acme Corp");
    assert_eq!(orgs[0].domain, "acme-corp.com");

    let jane = store
        .contacts()
        .find_by_email(user.id, "jane@acme-corp.com")
        .expect("find")
        .expect("exists");
    let bob = store
        .contacts()
        .find_by_email(user.id, "bob@acme-corp.com")
        .expect("find")
        .expect("exists");
    assert_eq!(jane.org_id, Some(orgs[0].id));
    assert_eq!(bob.org_id, Some(orgs[0].id));
    assert_eq!(bob.name, None);
}

#[test]
fn contact_name_backfills_but_never_overwrites() {
    let (store, user) = store_with_user();

    // First sighting carries no display name.
    let bare = payload("m1", "jane@acme.com", vec![ROUTING], vec![], "one");
    process_inbound_email(&store, NOW, &bare).expect("first");
    let contact = store
        .contacts()
        .find_by_email(user.id, "jane@acme.com")
        .expect("find")
        .expect("exists");
    assert_eq!(contact.name, None);

    // A later email with a display name backfills it.
    let named = payload("m2", "Jane Doe <jane@acme.com>", vec![ROUTING], vec![], "two");
    process_inbound_email(&store, NOW + 10, &named).expect("second");
    let contact = store
        .contacts()
        .find_by_email(user.id, "jane@acme.com")
        .expect("find")
        .expect("exists");
    assert_eq!(contact.name.as_deref(), Some("Jane Doe"));

    // A different name later on does not replace the stored one.
    let renamed = payload("m3", "J. Doe <jane@acme.com>", vec![ROUTING], vec![], "three");
    process_inbound_email(&store, NOW + 20, &renamed).expect("third");
    let contact = store
        .contacts()
        .find_by_email(user.id, "jane@acme.com")
        .expect("find")
        .expect("exists");
    assert_eq!(contact.name.as_deref(), Some("Jane Doe"));
}

#[test]
fn meeting_subjects_classify_and_link_sender_org() {
    let (store, user) = store_with_user();
    let payload = payload(
        "m1",
        "Jane <jane@acme-corp.com>",
        vec![ROUTING],
        vec![],
        "Q4 QBR with Acme Corp",
    );

    let outcome = process_inbound_email(&store, NOW, &payload).expect("process");
    let IngestOutcome::Processed { meeting_id, .. } = outcome else {
        panic!("expected processed outcome");
    };
    let meeting_id = meeting_id.expect("meeting resolved");

    let meeting = store
        .meetings()
        .get(meeting_id)
        .expect("get")
        .expect("exists");
    assert_eq!(meeting.meeting_type, MeetingType::Qbr);
    assert_eq!(meeting.title, "Q4 QBR with Acme Corp");
    let org = store
        .organizations()
        .find_by_domain(user.id, "acme-corp.com")
        .expect("find org")
        .expect("org exists");
    assert_eq!(meeting.org_id, Some(org.id));
}

#[test]
fn weekly_sync_classifies_and_invoices_do_not() {
    let (store, user) = store_with_user();

    let weekly = payload(
        "m1",
        "jane@acme.com",
        vec![ROUTING],
        vec![],
        "Weekly sync - Team Update",
    );
    process_inbound_email(&store, NOW, &weekly).expect("weekly");
    let meetings = store.meetings().list_for_user(user.id).expect("list");
    assert_eq!(meetings.len(), 1);
    assert_eq!(meetings[0].meeting_type, MeetingType::WeeklyCheckin);

    let invoice = payload("m2", "jane@acme.com", vec![ROUTING], vec![], "Invoice #12345");
    process_inbound_email(&store, NOW + 10, &invoice).expect("invoice");
    assert_eq!(
        store.meetings().list_for_user(user.id).expect("list").len(),
        1
    );
}

#[test]
fn case_different_titles_resolve_to_one_meeting() {
    let (store, user) = store_with_user();

    let first = payload("m1", "jane@acme.com", vec![ROUTING], vec![], "Q4 QBR");
    let second = payload("m2", "jane@acme.com", vec![ROUTING], vec![], "q4 qbr");
    process_inbound_email(&store, NOW, &first).expect("first");
    process_inbound_email(&store, NOW + 10, &second).expect("second");

    assert_eq!(
        store.meetings().list_for_user(user.id).expect("list").len(),
        1
    );

    let stored_first = store
        .messages()
        .find_by_message_id(user.id, "m1")
        .expect("find")
        .expect("exists");
    let stored_second = store
        .messages()
        .find_by_message_id(user.id, "m2")
        .expect("find")
        .expect("exists");
    assert_eq!(stored_first.meeting_id, stored_second.meeting_id);
}

#[test]
fn routing_address_found_in_to_and_excluded_from_contacts() {
    let (store, user) = store_with_user();
    let payload = payload(
        "m1",
        "jane@company.com",
        vec![ROUTING, "jane@company.com"],
        vec![],
        "hello",
    );

    let outcome = process_inbound_email(&store, NOW, &payload).expect("process");
    assert!(matches!(outcome, IngestOutcome::Processed { contacts: 1, .. }));

    assert!(store
        .contacts()
        .find_by_email(user.id, "jane@company.com")
        .expect("find")
        .expect("exists")
        .org_id
        .is_some());
    assert!(store
        .contacts()
        .find_by_email(user.id, ROUTING)
        .expect("find routing")
        .is_none());
}

#[test]
fn bcc_routing_is_preferred_and_message_records_thread_id() {
    let (store, user) = store_with_user();
    let mut headers = HashMap::new();
    headers.insert("In-Reply-To".to_string(), "<parent@provider>".to_string());
    let payload = InboundPayload {
        message_id: "m1".to_string(),
        from: Some("jane@acme.com".to_string()),
        to: vec!["list@corp.io".to_string()],
        cc: Vec::new(),
        bcc: vec![ROUTING.to_string()],
        subject: None,
        text_body: None,
        html_body: None,
        sent_at: Some("2026-08-20T12:00:00Z".to_string()),
        headers,
    };

    process_inbound_email(&store, NOW, &payload).expect("process");

    let stored = store
        .messages()
        .find_by_message_id(user.id, "m1")
        .expect("find")
        .expect("exists");
    assert_eq!(stored.subject, "(no subject)");
    assert_eq!(stored.thread_id.as_deref(), Some("parent@provider"));
    assert_eq!(stored.sent_at, 1_787_227_200);
}
