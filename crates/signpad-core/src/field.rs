//! Field definitions for document templates and packages.

use crate::geometry::FieldRect;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for fields.
pub type FieldId = Uuid;

/// An option entry for radio and dropdown fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

impl FieldOption {
    /// Create a new option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Discriminant for the field kinds a page can host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Textarea,
    Signature,
    Checkbox,
    Radio,
    Date,
    Dropdown,
}

/// Type-specific data for a field.
///
/// Keeping this a tagged union means an update can never smuggle
/// attributes onto a field whose type has no use for them: a text field
/// has nowhere to put radio options or a group id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    Textarea {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    Signature,
    Checkbox,
    Radio {
        group_id: String,
        options: Vec<FieldOption>,
    },
    Date,
    Dropdown {
        options: Vec<FieldOption>,
    },
}

impl FieldKind {
    /// Get the discriminant for this kind.
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldKind::Text { .. } => FieldType::Text,
            FieldKind::Textarea { .. } => FieldType::Textarea,
            FieldKind::Signature => FieldType::Signature,
            FieldKind::Checkbox => FieldType::Checkbox,
            FieldKind::Radio { .. } => FieldType::Radio,
            FieldKind::Date => FieldType::Date,
            FieldKind::Dropdown { .. } => FieldType::Dropdown,
        }
    }

    /// Build the kind a freshly created field of the given type starts
    /// with. Radio fields get a generated group id and one starter option;
    /// the editor grows the list from there.
    pub fn default_for(ty: FieldType) -> Self {
        match ty {
            FieldType::Text => FieldKind::Text { placeholder: None },
            FieldType::Textarea => FieldKind::Textarea { placeholder: None },
            FieldType::Signature => FieldKind::Signature,
            FieldType::Checkbox => FieldKind::Checkbox,
            FieldType::Radio => FieldKind::Radio {
                group_id: Uuid::new_v4().to_string(),
                options: vec![FieldOption::new("option-1", "Option 1")],
            },
            FieldType::Date => FieldKind::Date,
            FieldType::Dropdown => FieldKind::Dropdown { options: Vec::new() },
        }
    }
}

/// A placeable, typed region on a document page.
///
/// Geometry lives in base-scale coordinates; `id`, `page` and the kind's
/// discriminant are fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,
    /// 1-based page index.
    pub page: u32,
    pub rect: FieldRect,
    pub required: bool,
    pub label: String,
    pub kind: FieldKind,
    /// Filled-in content once a recipient completes the field. Owned by
    /// the fulfilment flow; carried here for read-only rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Field {
    /// Create a field with the defaults for its type.
    pub fn new(ty: FieldType, page: u32, rect: FieldRect) -> Self {
        let (required, label) = match ty {
            FieldType::Signature => (true, "Signature".to_string()),
            FieldType::Text => (false, "Text".to_string()),
            FieldType::Textarea => (false, "Text area".to_string()),
            FieldType::Checkbox => (false, "Checkbox".to_string()),
            FieldType::Radio => (false, "Radio group".to_string()),
            FieldType::Date => (false, "Date".to_string()),
            FieldType::Dropdown => (false, "Dropdown".to_string()),
        };
        Self {
            id: Uuid::new_v4(),
            page,
            rect,
            required,
            label,
            kind: FieldKind::default_for(ty),
            value: None,
        }
    }

    /// Get the field's type discriminant.
    pub fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }

    /// Merge a typed patch into the field.
    ///
    /// Common attributes always merge. Type-specific attributes merge only
    /// when the kind matches and are dropped otherwise, so a patch cannot
    /// change what a field is.
    pub fn apply(&mut self, patch: FieldPatch) {
        if let Some(rect) = patch.rect {
            self.rect = rect;
        }
        if let Some(required) = patch.required {
            self.required = required;
        }
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(value) = patch.value {
            self.value = Some(value);
        }
        if let Some(placeholder) = patch.placeholder {
            match &mut self.kind {
                FieldKind::Text { placeholder: p } | FieldKind::Textarea { placeholder: p } => {
                    *p = Some(placeholder);
                }
                _ => {}
            }
        }
        if let Some(options) = patch.options {
            match &mut self.kind {
                FieldKind::Radio { options: o, .. } | FieldKind::Dropdown { options: o } => {
                    *o = options;
                }
                _ => {}
            }
        }
        if let Some(group_id) = patch.group_id {
            if let FieldKind::Radio { group_id: g, .. } = &mut self.kind {
                *g = group_id;
            }
        }
    }
}

/// A typed partial update for a field.
///
/// Attributes left as `None` are untouched by the merge.
#[derive(Debug, Clone, Default)]
pub struct FieldPatch {
    pub rect: Option<FieldRect>,
    pub required: Option<bool>,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub options: Option<Vec<FieldOption>>,
    pub group_id: Option<String>,
    pub value: Option<String>,
}

impl FieldPatch {
    /// Patch that only moves/resizes the field.
    pub fn geometry(rect: FieldRect) -> Self {
        Self {
            rect: Some(rect),
            ..Self::default()
        }
    }
}

/// Violations surfaced by edit-time form validation.
///
/// The store accepts any merge; callers run this before letting a draft
/// be saved or sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldValidationError {
    #[error("a radio group needs at least two options")]
    RadioNeedsOptions,
    #[error("a radio group needs a group id")]
    RadioNeedsGroup,
    #[error("a dropdown needs at least one option")]
    DropdownNeedsOptions,
}

/// Check a field's type-specific usability rules.
pub fn validate_field(field: &Field) -> Result<(), FieldValidationError> {
    match &field.kind {
        FieldKind::Radio { group_id, options } => {
            if group_id.is_empty() {
                return Err(FieldValidationError::RadioNeedsGroup);
            }
            if options.len() < 2 {
                return Err(FieldValidationError::RadioNeedsOptions);
            }
            Ok(())
        }
        FieldKind::Dropdown { options } => {
            if options.is_empty() {
                return Err(FieldValidationError::DropdownNeedsOptions);
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> FieldRect {
        FieldRect::new(10.0, 10.0, 100.0, 40.0)
    }

    #[test]
    fn test_signature_defaults_to_required() {
        let field = Field::new(FieldType::Signature, 1, rect());
        assert!(field.required);
        assert_eq!(field.kind, FieldKind::Signature);
    }

    #[test]
    fn test_radio_defaults_carry_group_and_starter_option() {
        let field = Field::new(FieldType::Radio, 1, rect());
        match &field.kind {
            FieldKind::Radio { group_id, options } => {
                assert!(!group_id.is_empty());
                assert_eq!(options.len(), 1);
            }
            other => panic!("expected radio kind, got {other:?}"),
        }
    }

    #[test]
    fn test_patch_cannot_cross_types() {
        let mut field = Field::new(FieldType::Text, 1, rect());
        field.apply(FieldPatch {
            options: Some(vec![FieldOption::new("a", "A")]),
            group_id: Some("g1".to_string()),
            ..FieldPatch::default()
        });
        // Still a plain text field with no options anywhere.
        assert_eq!(field.kind, FieldKind::Text { placeholder: None });
    }

    #[test]
    fn test_patch_merges_placeholder_for_text() {
        let mut field = Field::new(FieldType::Textarea, 1, rect());
        field.apply(FieldPatch {
            placeholder: Some("Notes...".to_string()),
            ..FieldPatch::default()
        });
        assert_eq!(
            field.kind,
            FieldKind::Textarea {
                placeholder: Some("Notes...".to_string())
            }
        );
    }

    #[test]
    fn test_validate_radio_requires_two_options() {
        let mut field = Field::new(FieldType::Radio, 1, rect());
        assert_eq!(
            validate_field(&field),
            Err(FieldValidationError::RadioNeedsOptions)
        );

        field.apply(FieldPatch {
            options: Some(vec![FieldOption::new("a", "A"), FieldOption::new("b", "B")]),
            ..FieldPatch::default()
        });
        assert!(validate_field(&field).is_ok());
    }

    #[test]
    fn test_validate_dropdown_requires_one_option() {
        let mut field = Field::new(FieldType::Dropdown, 1, rect());
        assert_eq!(
            validate_field(&field),
            Err(FieldValidationError::DropdownNeedsOptions)
        );

        field.apply(FieldPatch {
            options: Some(vec![FieldOption::new("a", "A")]),
            ..FieldPatch::default()
        });
        assert!(validate_field(&field).is_ok());
    }

    #[test]
    fn test_field_json_roundtrip() {
        let field = Field::new(FieldType::Radio, 2, rect());
        let json = serde_json::to_string(&field).unwrap();
        let back: Field = serde_json::from_str(&json).unwrap();
        assert_eq!(field, back);
    }
}
