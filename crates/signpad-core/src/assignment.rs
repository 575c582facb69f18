//! Role assignments binding contacts to package fields.

use crate::contact::Contact;
use crate::field::FieldId;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for assignments.
pub type AssignmentId = Uuid;

/// Participant role within a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Signer,
    FormFiller,
    Approver,
    Receiver,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Signer => "Signer",
            Role::FormFiller => "Form filler",
            Role::Approver => "Approver",
            Role::Receiver => "Receiver",
        };
        f.write_str(name)
    }
}

/// Authentication methods a signer may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureMethod {
    EmailOtp,
    SmsOtp,
}

impl fmt::Display for SignatureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignatureMethod::EmailOtp => "Email OTP",
            SignatureMethod::SmsOtp => "SMS OTP",
        };
        f.write_str(name)
    }
}

/// A contact bound to a field with a role.
///
/// Name and email are denormalized from the contact directory at
/// assignment time and never re-fetched on render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedUser {
    pub id: AssignmentId,
    pub contact_id: Uuid,
    pub contact_name: String,
    pub contact_email: String,
    pub role: Role,
    /// Allowed authentication methods; only signers carry any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signature_methods: Vec<SignatureMethod>,
    /// Set by the fulfilment flow once the participant completes.
    #[serde(default)]
    pub signed: bool,
}

impl AssignedUser {
    /// Snapshot a contact into an assignment. Methods are kept for signers
    /// and stripped for every other role.
    pub fn from_contact(contact: &Contact, role: Role, methods: Vec<SignatureMethod>) -> Self {
        let signature_methods = if role == Role::Signer {
            methods
        } else {
            Vec::new()
        };
        Self {
            id: Uuid::new_v4(),
            contact_id: contact.id,
            contact_name: contact.full_name(),
            contact_email: contact.email.clone(),
            role,
            signature_methods,
            signed: false,
        }
    }
}

/// Assignment operation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentError {
    #[error("no field with id {0}")]
    UnknownField(FieldId),
    #[error("contact is already assigned to this field with the same role")]
    DuplicateAssignment,
    #[error("a signature field takes exactly one signer")]
    SignerCardinality,
    #[error("role {0} cannot be attached to this field")]
    InvalidRole(Role),
    #[error("a signer needs at least one authentication method")]
    NoSignatureMethods,
    #[error("no assignment with id {0}")]
    UnknownAssignment(AssignmentId),
    #[error("only signer assignments carry authentication methods")]
    NotASigner,
    #[error("package is no longer editable")]
    NotEditable,
}

/// Assignments attached to a draft's fields, keyed by field id.
///
/// Kept apart from the field entities: layout and fulfilment have
/// independent lifecycles, so a field never knows who fills it in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentSet {
    by_field: HashMap<FieldId, Vec<AssignedUser>>,
}

impl AssignmentSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an assignment to a field.
    ///
    /// `is_signature` tells the set which cardinality rules apply; the
    /// caller resolves it from the field's kind. Signature fields take at
    /// most one assignment and it must be a signer; other fields take any
    /// number of form fillers and approvers. The rules hold here even
    /// though the editing UI already prevents most violations - no code
    /// path may break the invariant.
    pub fn assign(
        &mut self,
        field_id: FieldId,
        is_signature: bool,
        user: AssignedUser,
    ) -> Result<AssignmentId, AssignmentError> {
        let existing = self.by_field.entry(field_id).or_default();

        if is_signature {
            if user.role != Role::Signer {
                warn!("rejected {} assignment on signature field {field_id}", user.role);
                return Err(AssignmentError::InvalidRole(user.role));
            }
            if !existing.is_empty() {
                warn!("rejected second assignment on signature field {field_id}");
                return Err(AssignmentError::SignerCardinality);
            }
            if user.signature_methods.is_empty() {
                return Err(AssignmentError::NoSignatureMethods);
            }
        } else if !matches!(user.role, Role::FormFiller | Role::Approver) {
            warn!("rejected {} assignment on non-signature field {field_id}", user.role);
            return Err(AssignmentError::InvalidRole(user.role));
        }

        if existing
            .iter()
            .any(|a| a.contact_id == user.contact_id && a.role == user.role)
        {
            return Err(AssignmentError::DuplicateAssignment);
        }

        // Stripping happens at snapshot time; enforce it again so a
        // hand-built assignment cannot sneak methods past the store.
        let mut user = user;
        if user.role != Role::Signer {
            user.signature_methods.clear();
        }

        let id = user.id;
        existing.push(user);
        Ok(id)
    }

    /// Remove an assignment by id. No-op when absent; returns whether
    /// something was removed.
    pub fn remove(&mut self, field_id: FieldId, assignment_id: AssignmentId) -> bool {
        let Some(list) = self.by_field.get_mut(&field_id) else {
            return false;
        };
        let before = list.len();
        list.retain(|a| a.id != assignment_id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.by_field.remove(&field_id);
        }
        removed
    }

    /// Replace the allowed-methods set for a signer assignment.
    ///
    /// An empty set is rejected without touching the assignment: a signer
    /// must always keep at least one way to authenticate.
    pub fn update_signature_methods(
        &mut self,
        field_id: FieldId,
        assignment_id: AssignmentId,
        methods: Vec<SignatureMethod>,
    ) -> Result<(), AssignmentError> {
        let assignment = self
            .by_field
            .get_mut(&field_id)
            .and_then(|list| list.iter_mut().find(|a| a.id == assignment_id))
            .ok_or(AssignmentError::UnknownAssignment(assignment_id))?;
        if assignment.role != Role::Signer {
            return Err(AssignmentError::NotASigner);
        }
        if methods.is_empty() {
            return Err(AssignmentError::NoSignatureMethods);
        }
        assignment.signature_methods = methods;
        Ok(())
    }

    /// Assignments attached to one field.
    pub fn for_field(&self, field_id: FieldId) -> &[AssignedUser] {
        self.by_field
            .get(&field_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Drop all assignments of a deleted field.
    pub fn remove_field(&mut self, field_id: FieldId) {
        self.by_field.remove(&field_id);
    }

    /// Total number of assignments across all fields.
    pub fn len(&self) -> usize {
        self.by_field.values().map(Vec::len).sum()
    }

    /// Check if no assignments exist.
    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(name: &str) -> Contact {
        Contact::new(name, "Tester", format!("{}@example.com", name.to_lowercase()))
    }

    fn signer(c: &Contact) -> AssignedUser {
        AssignedUser::from_contact(c, Role::Signer, vec![SignatureMethod::EmailOtp])
    }

    #[test]
    fn test_signer_cardinality() {
        let mut set = AssignmentSet::new();
        let field = Uuid::new_v4();
        let first = contact("Ada");
        let second = contact("Grace");

        assert!(set.assign(field, true, signer(&first)).is_ok());
        assert_eq!(
            set.assign(field, true, signer(&second)),
            Err(AssignmentError::SignerCardinality)
        );
        assert_eq!(set.for_field(field).len(), 1);
    }

    #[test]
    fn test_signer_role_required_on_signature_field() {
        let mut set = AssignmentSet::new();
        let field = Uuid::new_v4();
        let c = contact("Ada");
        let user = AssignedUser::from_contact(&c, Role::FormFiller, Vec::new());
        assert_eq!(
            set.assign(field, true, user),
            Err(AssignmentError::InvalidRole(Role::FormFiller))
        );
    }

    #[test]
    fn test_signer_rejected_on_plain_field() {
        let mut set = AssignmentSet::new();
        let field = Uuid::new_v4();
        let c = contact("Ada");
        assert_eq!(
            set.assign(field, false, signer(&c)),
            Err(AssignmentError::InvalidRole(Role::Signer))
        );
    }

    #[test]
    fn test_receiver_never_attaches_to_fields() {
        let mut set = AssignmentSet::new();
        let field = Uuid::new_v4();
        let c = contact("Ada");
        let user = AssignedUser::from_contact(&c, Role::Receiver, Vec::new());
        assert_eq!(
            set.assign(field, false, user),
            Err(AssignmentError::InvalidRole(Role::Receiver))
        );
    }

    #[test]
    fn test_duplicate_contact_role_rejected() {
        let mut set = AssignmentSet::new();
        let field = Uuid::new_v4();
        let c = contact("Ada");

        let filler = AssignedUser::from_contact(&c, Role::FormFiller, Vec::new());
        assert!(set.assign(field, false, filler).is_ok());

        let again = AssignedUser::from_contact(&c, Role::FormFiller, Vec::new());
        assert_eq!(
            set.assign(field, false, again),
            Err(AssignmentError::DuplicateAssignment)
        );

        // Same contact with a different role is fine.
        let approver = AssignedUser::from_contact(&c, Role::Approver, Vec::new());
        assert!(set.assign(field, false, approver).is_ok());
        assert_eq!(set.for_field(field).len(), 2);
    }

    #[test]
    fn test_methods_stripped_for_non_signers() {
        let c = contact("Ada");
        let user = AssignedUser::from_contact(&c, Role::FormFiller, vec![SignatureMethod::EmailOtp]);
        assert!(user.signature_methods.is_empty());
    }

    #[test]
    fn test_signer_needs_methods() {
        let mut set = AssignmentSet::new();
        let field = Uuid::new_v4();
        let c = contact("Ada");
        let user = AssignedUser::from_contact(&c, Role::Signer, Vec::new());
        assert_eq!(
            set.assign(field, true, user),
            Err(AssignmentError::NoSignatureMethods)
        );
    }

    #[test]
    fn test_update_methods_rejects_empty_set() {
        let mut set = AssignmentSet::new();
        let field = Uuid::new_v4();
        let c = contact("Ada");
        let id = set.assign(field, true, signer(&c)).unwrap();

        assert_eq!(
            set.update_signature_methods(field, id, Vec::new()),
            Err(AssignmentError::NoSignatureMethods)
        );
        // Mutation was not applied.
        assert_eq!(
            set.for_field(field)[0].signature_methods,
            vec![SignatureMethod::EmailOtp]
        );

        assert!(
            set.update_signature_methods(
                field,
                id,
                vec![SignatureMethod::EmailOtp, SignatureMethod::SmsOtp]
            )
            .is_ok()
        );
        assert_eq!(set.for_field(field)[0].signature_methods.len(), 2);
    }

    #[test]
    fn test_remove_is_noop_when_absent() {
        let mut set = AssignmentSet::new();
        let field = Uuid::new_v4();
        let c = contact("Ada");
        let id = set.assign(field, true, signer(&c)).unwrap();

        assert!(!set.remove(field, Uuid::new_v4()));
        assert_eq!(set.for_field(field).len(), 1);
        assert!(set.remove(field, id));
        assert!(set.for_field(field).is_empty());
    }
}
