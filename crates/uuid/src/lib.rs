//! UUID and resource-URL utilities.
//!
//! Every ZRC resource is addressed by an opaque UUID4 that appears in its URL, and resources
//! reference each other by absolute URL (a Status carries the URL of its Zaak, a Zaak the URL of
//! its hoofdzaak). This crate keeps both concerns in one place:
//! - [`ResourceUuid`] guarantees the canonical textual form once constructed.
//! - [`ResourceUrls`] builds absolute resource URLs and resolves them back to UUIDs.
//!
//! ## Canonical UUID form
//! - Length: 36, hyphenated
//! - Characters: `0-9`, `a-f` and `-` at positions 8, 13, 18, 23
//! - Example: `550e8400-e29b-41d4-a716-446655440000`
//!
//! Non-canonical values (uppercase, unhyphenated, wrong length) are rejected rather than
//! normalised, so a given resource only ever has one URL.

mod service;

pub use service::{ResourceUrls, ResourceUuid, Uuid};

/// Error type for UUID operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for UUID operations.
pub type UuidResult<T> = Result<T, UuidError>;
