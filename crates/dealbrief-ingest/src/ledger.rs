use dealbrief_core::domain::{Contact, ContactId, Meeting, Organization, User, UserId};
use dealbrief_store::error::Result;
use dealbrief_store::repo::{ContactNew, MeetingNew, MessageNew};
use dealbrief_store::Store;

/// Persistence seam consumed by the pipeline: exactly the read/write
/// operations ingestion needs, nothing more.
pub trait Ledger {
    fn user_by_routing_address(&self, address: &str) -> Result<Option<User>>;
    fn org_by_domain(&self, user_id: UserId, domain: &str) -> Result<Option<Organization>>;
    /// Conflict-safe: a losing concurrent creator gets the existing row.
    fn create_org(
        &self,
        now_utc: i64,
        user_id: UserId,
        domain: &str,
        name: &str,
    ) -> Result<Organization>;
    fn contact_by_email(&self, user_id: UserId, email: &str) -> Result<Option<Contact>>;
    fn create_contact(&self, now_utc: i64, user_id: UserId, input: ContactNew) -> Result<Contact>;
    fn backfill_contact_name(&self, now_utc: i64, id: ContactId, name: &str) -> Result<bool>;
    fn latest_meeting_by_title(&self, user_id: UserId, title: &str) -> Result<Option<Meeting>>;
    fn create_meeting(&self, now_utc: i64, user_id: UserId, input: MeetingNew) -> Result<Meeting>;
    /// Returns `false` when `(user_id, message_id)` was already recorded.
    fn record_message(&self, now_utc: i64, user_id: UserId, input: &MessageNew) -> Result<bool>;
}

impl Ledger for Store {
    fn user_by_routing_address(&self, address: &str) -> Result<Option<User>> {
        self.users().find_by_bcc_address(address)
    }

    fn org_by_domain(&self, user_id: UserId, domain: &str) -> Result<Option<Organization>> {
        self.organizations().find_by_domain(user_id, domain)
    }

    fn create_org(
        &self,
        now_utc: i64,
        user_id: UserId,
        domain: &str,
        name: &str,
    ) -> Result<Organization> {
        self.organizations().create(now_utc, user_id, domain, name)
    }

    fn contact_by_email(&self, user_id: UserId, email: &str) -> Result<Option<Contact>> {
        self.contacts().find_by_email(user_id, email)
    }

    fn create_contact(&self, now_utc: i64, user_id: UserId, input: ContactNew) -> Result<Contact> {
        self.contacts().create(now_utc, user_id, input)
    }

    fn backfill_contact_name(&self, now_utc: i64, id: ContactId, name: &str) -> Result<bool> {
        self.contacts().backfill_name(now_utc, id, name)
    }

    fn latest_meeting_by_title(&self, user_id: UserId, title: &str) -> Result<Option<Meeting>> {
        self.meetings().latest_by_title(user_id, title)
    }

    fn create_meeting(&self, now_utc: i64, user_id: UserId, input: MeetingNew) -> Result<Meeting> {
        self.meetings().create(now_utc, user_id, input)
    }

    fn record_message(&self, now_utc: i64, user_id: UserId, input: &MessageNew) -> Result<bool> {
        self.messages().record(now_utc, user_id, input)
    }
}
