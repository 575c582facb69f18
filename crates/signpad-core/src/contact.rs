//! Contact directory collaborator interface.
//!
//! Contacts live in an external directory; the model only reads them and
//! denormalizes name/email into assignment snapshots at assignment time.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A directory record for a person who can participate in a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Contact {
    /// Create a new contact record.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    /// Full display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Read side of the external contact directory.
pub trait ContactDirectory {
    /// Look up one contact.
    fn get(&self, id: Uuid) -> Option<Contact>;

    /// List all contacts.
    fn list(&self) -> Vec<Contact>;
}

/// In-memory directory for tests and ephemeral use.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    contacts: HashMap<Uuid, Contact>,
}

impl MemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a contact, replacing any record with the same id.
    pub fn insert(&mut self, contact: Contact) {
        self.contacts.insert(contact.id, contact);
    }
}

impl ContactDirectory for MemoryDirectory {
    fn get(&self, id: Uuid) -> Option<Contact> {
        self.contacts.get(&id).cloned()
    }

    fn list(&self) -> Vec<Contact> {
        self.contacts.values().cloned().collect()
    }
}
