//! Package drafts: a document draft plus fulfilment assignments and
//! receivers.
//!
//! A package wraps a [`DocumentDraft`] by composition. Layout (fields) and
//! fulfilment (who signs, fills, approves, or receives a copy) stay in
//! separate structures with independent lifecycles.

use crate::assignment::{
    AssignedUser, AssignmentError, AssignmentId, AssignmentSet, Role, SignatureMethod,
};
use crate::contact::Contact;
use crate::document::DocumentDraft;
use crate::field::{FieldId, FieldPatch, FieldType};
use crate::geometry::FieldRect;
use log::warn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a package sits in its lifecycle. Only drafts are editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageStatus {
    #[default]
    Draft,
    Sent,
    Completed,
    Declined,
}

impl PackageStatus {
    /// Check whether fields and assignments may still change.
    pub fn is_editable(self) -> bool {
        matches!(self, PackageStatus::Draft)
    }
}

/// A contact copied on the package outcome without holding any field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageReceiver {
    pub contact_id: Uuid,
    pub contact_name: String,
    pub contact_email: String,
}

impl PackageReceiver {
    /// Snapshot a contact as a receiver.
    pub fn from_contact(contact: &Contact) -> Self {
        Self {
            contact_id: contact.id,
            contact_name: contact.full_name(),
            contact_email: contact.email.clone(),
        }
    }
}

/// An editable package: fields, assignments, receivers, and a status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageDraft {
    pub status: PackageStatus,
    /// The field layout, identical in behavior to a template draft.
    pub document: DocumentDraft,
    assignments: AssignmentSet,
    receivers: Vec<PackageReceiver>,
}

impl PackageDraft {
    /// Create a new draft package.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            status: PackageStatus::Draft,
            document: DocumentDraft::new(name),
            assignments: AssignmentSet::new(),
            receivers: Vec::new(),
        }
    }

    /// Add a field. Returns `None` once the package has been sent.
    pub fn add_field(&mut self, ty: FieldType, page: u32, rect: FieldRect) -> Option<FieldId> {
        if !self.status.is_editable() {
            warn!("add_field on non-editable package ignored");
            return None;
        }
        Some(self.document.add_field(ty, page, rect))
    }

    /// Merge a patch into a field; a no-op after sending or for an
    /// unknown id.
    pub fn update_field(&mut self, id: FieldId, patch: FieldPatch) {
        if !self.status.is_editable() {
            warn!("update_field on non-editable package ignored");
            return;
        }
        self.document.update_field(id, patch);
    }

    /// Delete a field and drop its assignments. Idempotent; a no-op after
    /// sending.
    pub fn delete_field(&mut self, id: FieldId) {
        if !self.status.is_editable() {
            warn!("delete_field on non-editable package ignored");
            return;
        }
        self.document.delete_field(id);
        self.assignments.remove_field(id);
    }

    /// Attach a contact to a field with a role.
    ///
    /// Enforces the cardinality rules: a signature field takes exactly one
    /// signer; any other field takes form fillers and approvers. Methods
    /// are stripped from non-signer snapshots.
    pub fn assign_user(
        &mut self,
        field_id: FieldId,
        contact: &Contact,
        role: Role,
        methods: Vec<SignatureMethod>,
    ) -> Result<AssignmentId, AssignmentError> {
        if !self.status.is_editable() {
            return Err(AssignmentError::NotEditable);
        }
        let field = self
            .document
            .field(field_id)
            .ok_or(AssignmentError::UnknownField(field_id))?;
        let is_signature = field.field_type() == FieldType::Signature;
        let user = AssignedUser::from_contact(contact, role, methods);
        self.assignments.assign(field_id, is_signature, user)
    }

    /// Remove an assignment by id. No-op when absent or after sending.
    pub fn remove_assignment(&mut self, field_id: FieldId, assignment_id: AssignmentId) {
        if !self.status.is_editable() {
            warn!("remove_assignment on non-editable package ignored");
            return;
        }
        self.assignments.remove(field_id, assignment_id);
    }

    /// Replace a signer's allowed authentication methods. Rejects an empty
    /// set without applying the mutation.
    pub fn update_signature_methods(
        &mut self,
        field_id: FieldId,
        assignment_id: AssignmentId,
        methods: Vec<SignatureMethod>,
    ) -> Result<(), AssignmentError> {
        if !self.status.is_editable() {
            return Err(AssignmentError::NotEditable);
        }
        self.assignments
            .update_signature_methods(field_id, assignment_id, methods)
    }

    /// Assignments attached to one field.
    pub fn assignments_for(&self, field_id: FieldId) -> &[AssignedUser] {
        self.assignments.for_field(field_id)
    }

    /// Total number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Add a receiver; one entry per contact. Returns whether the list
    /// changed.
    pub fn add_receiver(&mut self, contact: &Contact) -> bool {
        if !self.status.is_editable() {
            warn!("add_receiver on non-editable package ignored");
            return false;
        }
        if self.receivers.iter().any(|r| r.contact_id == contact.id) {
            return false;
        }
        self.receivers.push(PackageReceiver::from_contact(contact));
        true
    }

    /// Remove a receiver by contact id. Idempotent.
    pub fn remove_receiver(&mut self, contact_id: Uuid) {
        if !self.status.is_editable() {
            warn!("remove_receiver on non-editable package ignored");
            return;
        }
        self.receivers.retain(|r| r.contact_id != contact_id);
    }

    /// The receiver list.
    pub fn receivers(&self) -> &[PackageReceiver] {
        &self.receivers
    }

    /// Hand the package over to the fulfilment flow. After this the draft
    /// no longer owns any mutable state.
    pub fn mark_sent(&mut self) {
        if self.status == PackageStatus::Draft {
            self.status = PackageStatus::Sent;
        }
    }

    /// Serialize the package to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a package from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
