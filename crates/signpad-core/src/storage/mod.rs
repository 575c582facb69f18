//! Storage abstraction for persisting drafts.
//!
//! Persistence is the one asynchronous seam around the model: the stores
//! guarantee in-memory consistency at every commit point, and a backend
//! behind this trait makes them durable. Drafts serialize as-is and load
//! back without transformation.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::document::DocumentDraft;
use crate::package::PackageDraft;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// A persistable draft: a template or a package.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Draft {
    Template(DocumentDraft),
    Package(PackageDraft),
}

impl Draft {
    /// The draft's identifier.
    pub fn id(&self) -> &str {
        match self {
            Draft::Template(doc) => &doc.id,
            Draft::Package(pkg) => &pkg.document.id,
        }
    }

    /// The draft's display name.
    pub fn name(&self) -> &str {
        match self {
            Draft::Template(doc) => &doc.name,
            Draft::Package(pkg) => &pkg.document.name,
        }
    }
}

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("draft not found: {0}")]
    NotFound(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async storage operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for draft storage backends.
///
/// Implementations can store drafts in memory, on the filesystem, or
/// behind a remote API.
pub trait Storage: Send + Sync {
    /// Save a draft.
    fn save(&self, id: &str, draft: &Draft) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a draft.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Draft>>;

    /// Delete a draft.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all draft IDs.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a draft exists.
    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Minimal blocking executor for exercising the boxed-future trait in
/// tests without pulling in a runtime.
#[cfg(test)]
pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => return result,
            Poll::Pending => {}
        }
    }
}
