//! # API Shared
//!
//! Shared utilities and definitions for the ZRC API.
//!
//! Contains:
//! - Authentication: JWT decoding into an [`AuthContext`](zrc_core::AuthContext)
//! - The application (client) registry the token's `client_id` is looked up in
//! - Shared services like `HealthService`

pub mod auth;
pub mod health;

pub use auth::{ApplicatieRegistry, AuthError};
pub use health::{HealthRes, HealthService};
