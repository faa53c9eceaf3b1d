// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact message triage.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use pawhaven_core::types::{ContactMessage, ListQuery, NewContactMessage};
use pawhaven_core::{Collection, PawhavenError, Session, StorageAdapter};

use crate::Caches;
use crate::cache::read_with_retry;
use crate::ensure_matched;
use crate::filter::PetFilter;
use crate::validation::{FormCheck, is_email};

const COMPOSE_URL: &str = "https://mail.google.com/mail/?view=cm&fs=1";

/// Mail-compose link for replying to a message. No state changes.
pub fn reply_link(email: &str, subject: &str) -> Result<String, PawhavenError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(PawhavenError::Validation(
            "reply address is required".to_string(),
        ));
    }
    if !is_email(email) {
        return Err(PawhavenError::Validation(format!(
            "reply address is not a valid email: {email}"
        )));
    }
    let subject = format!("Re: {}", subject.trim());
    Ok(format!(
        "{COMPOSE_URL}&to={}&su={}",
        urlencoding::encode(email),
        urlencoding::encode(&subject)
    ))
}

pub struct ContactService {
    storage: Arc<dyn StorageAdapter>,
    caches: Arc<Caches>,
}

impl ContactService {
    pub fn new(storage: Arc<dyn StorageAdapter>, caches: Arc<Caches>) -> Self {
        Self { storage, caches }
    }

    /// Public contact form. Subject may be blank.
    pub async fn submit_message(
        &self,
        input: NewContactMessage,
    ) -> Result<ContactMessage, PawhavenError> {
        let mut check = FormCheck::new();
        let name = check.required("name", &input.name);
        let email = check.email("email", &input.email);
        let message = check.required("message", &input.message);
        check.finish()?;

        let message = ContactMessage {
            id: Uuid::new_v4(),
            name,
            email,
            subject: input.subject.trim().to_string(),
            message,
            read: false,
            created_at: Utc::now(),
        };
        self.storage.insert_message(&message).await?;
        self.caches.messages.invalidate().await;

        tracing::info!(message_id = %message.id, "contact message received");
        Ok(message)
    }

    /// Flags a message read. Repeating it is a harmless write.
    pub async fn mark_read(&self, session: &Session, id: Uuid) -> Result<(), PawhavenError> {
        session.require_admin()?;

        let rows = self.storage.mark_message_read(id).await?;
        ensure_matched(rows, Collection::ContactMessages, id)?;
        self.caches.messages.patch(id, |m| m.read = true).await;

        tracing::debug!(message_id = %id, "contact message marked read");
        Ok(())
    }

    /// Every message, newest first, searched by name, subject, or email.
    pub async fn list_messages(
        &self,
        session: &Session,
        filter: &PetFilter,
    ) -> Result<Vec<ContactMessage>, PawhavenError> {
        session.require_admin()?;
        let all = ListQuery::all();
        let messages = self
            .caches
            .messages
            .get_or_fetch("all", || self.storage.list_messages(&all))
            .await?;
        Ok(filter.apply(messages))
    }

    /// [`reply_link`] for a stored message.
    pub async fn reply_link_for(&self, session: &Session, id: Uuid) -> Result<String, PawhavenError> {
        let messages = self.list_messages(session, &PetFilter::default()).await?;
        let message = messages
            .iter()
            .find(|m| m.id == id)
            .ok_or(PawhavenError::NotFound {
                collection: Collection::ContactMessages,
                id,
            })?;
        reply_link(&message.email, &message.subject)
    }

    pub async fn unread_count(&self, session: &Session) -> Result<u64, PawhavenError> {
        session.require_admin()?;
        read_with_retry("contact_messages:count", || {
            self.storage
                .count(Collection::ContactMessages, Some("unread"))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pawhaven_test_utils::{MockStorage, fixtures};

    fn service(storage: &MockStorage) -> ContactService {
        ContactService::new(Arc::new(storage.clone()), Arc::new(Caches::new()))
    }

    #[test]
    fn reply_link_encodes_subject() {
        let link = reply_link("sam@example.com", "Adoption & fostering?").unwrap();
        assert_eq!(
            link,
            "https://mail.google.com/mail/?view=cm&fs=1&to=sam%40example.com&su=Re%3A%20Adoption%20%26%20fostering%3F"
        );
    }

    #[test]
    fn reply_link_needs_an_address() {
        assert!(matches!(
            reply_link("  ", "Hi"),
            Err(PawhavenError::Validation(_))
        ));
        assert!(reply_link("nobody", "Hi").is_err());
    }

    #[tokio::test]
    async fn submit_starts_unread_and_allows_blank_subject() {
        let storage = MockStorage::new();
        let contact = service(&storage);
        let mut input = fixtures::contact_message();
        input.subject.clear();
        let message = contact.submit_message(input).await.unwrap();
        assert!(!message.read);
        assert_eq!(message.subject, "");
    }

    #[tokio::test]
    async fn submit_rejects_bad_email() {
        let storage = MockStorage::new();
        let contact = service(&storage);
        let mut input = fixtures::contact_message();
        input.email = "avery".to_string();
        let err = contact.submit_message(input).await.unwrap_err();
        assert!(matches!(err, PawhavenError::Validation(_)));
        assert!(storage.calls().await.is_empty());
    }

    #[tokio::test]
    async fn mark_read_is_idempotent() {
        let storage = MockStorage::new();
        let contact = service(&storage);
        let admin = Session::admin(Uuid::new_v4());
        let message = fixtures::stored_message("Avery", "Fostering", fixtures::at_minute(0));
        storage.seed_message(message.clone()).await;

        for _ in 0..2 {
            contact.mark_read(&admin, message.id).await.unwrap();
            let listed = contact
                .list_messages(&admin, &PetFilter::default())
                .await
                .unwrap();
            assert!(listed[0].read);
        }
        assert_eq!(storage.call_count("mark_message_read").await, 2);
        assert_eq!(contact.unread_count(&admin).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn mark_read_patches_cache_without_refetch() {
        let storage = MockStorage::new();
        let contact = service(&storage);
        let admin = Session::admin(Uuid::new_v4());
        let message = fixtures::stored_message("Avery", "Fostering", fixtures::at_minute(0));
        storage.seed_message(message.clone()).await;

        let before = contact
            .list_messages(&admin, &PetFilter::default())
            .await
            .unwrap();
        assert!(!before[0].read);

        contact.mark_read(&admin, message.id).await.unwrap();
        let after = contact
            .list_messages(&admin, &PetFilter::default())
            .await
            .unwrap();
        assert!(after[0].read);
        assert_eq!(storage.call_count("list_messages").await, 1);
    }

    #[tokio::test]
    async fn mark_read_unknown_id_is_zero_rows() {
        let storage = MockStorage::new();
        let contact = service(&storage);
        let err = contact
            .mark_read(&Session::admin(Uuid::new_v4()), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, PawhavenError::ZeroRows { .. }));
    }

    #[tokio::test]
    async fn reply_link_for_stored_message() {
        let storage = MockStorage::new();
        let contact = service(&storage);
        let admin = Session::admin(Uuid::new_v4());
        let message = fixtures::stored_message("Avery", "Fostering", fixtures::at_minute(0));
        storage.seed_message(message.clone()).await;

        let link = contact.reply_link_for(&admin, message.id).await.unwrap();
        assert!(link.ends_with("&to=avery%40example.com&su=Re%3A%20Fostering"));
        assert!(matches!(
            contact.reply_link_for(&admin, Uuid::new_v4()).await,
            Err(PawhavenError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn search_and_unread_count() {
        let storage = MockStorage::new();
        let contact = service(&storage);
        let admin = Session::admin(Uuid::new_v4());
        storage
            .seed_message(fixtures::stored_message("Avery", "Fostering", fixtures::at_minute(0)))
            .await;
        storage
            .seed_message(fixtures::stored_message("Robin", "Volunteering", fixtures::at_minute(1)))
            .await;

        let hits = contact
            .list_messages(&admin, &PetFilter::search("robin@"))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(contact.unread_count(&admin).await.unwrap(), 2);
        assert!(matches!(
            contact.unread_count(&Session::anonymous()).await,
            Err(PawhavenError::Unauthenticated)
        ));
    }
}
