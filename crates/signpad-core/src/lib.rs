//! SignPad Core Library
//!
//! Platform-agnostic field placement and role-assignment model shared by
//! the template editor, the package editor and the read-only viewers.

pub mod assignment;
pub mod contact;
pub mod document;
pub mod field;
pub mod geometry;
pub mod gesture;
pub mod handles;
pub mod package;
pub mod pdf;
pub mod render;
pub mod storage;
pub mod support;

pub use assignment::{AssignedUser, AssignmentError, AssignmentId, Role, SignatureMethod};
pub use contact::{Contact, ContactDirectory, MemoryDirectory};
pub use document::DocumentDraft;
pub use field::{
    Field, FieldId, FieldKind, FieldOption, FieldPatch, FieldType, FieldValidationError,
    validate_field,
};
pub use geometry::{
    DEFAULT_SNAP_UNIT, FieldRect, MIN_FIELD_SIZE, normalize, project_to_scale, scale_ratio,
};
pub use gesture::{GestureCommit, GestureController, GesturePhase, GestureTarget};
pub use handles::{HANDLE_HIT_TOLERANCE, Handle, HandleKind, handles_for, hit_test_handles};
pub use package::{PackageDraft, PackageReceiver, PackageStatus};
pub use render::{BASE_SCALE, PageInfo, SurfaceProjector};
pub use storage::{Draft, FileStorage, MemoryStorage, Storage, StorageError};
pub use support::{ChatTransport, ConnectionState, SupportConnection, SupportError};
