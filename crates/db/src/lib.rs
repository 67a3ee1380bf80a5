//! Service client bootstrap for Tether.
//!
//! Resolves the hosted database credentials and builds the single client
//! handle the rest of the application shares.

pub mod client;
pub mod config;
pub mod error;

pub use client::{init_client, ClientFactory, ServiceClient, SupabaseFactory};
pub use config::ServiceConfig;
pub use error::{ClientError, ClientResult, DbAuthError};
