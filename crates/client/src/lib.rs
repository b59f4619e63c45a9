//! trialdesk_client - HTTP client, entity stores and CLI for the trialdesk API.

pub mod cli;
pub mod client;
pub mod error;
pub mod output;
pub mod store;

pub use client::{HttpRepository, TrialdeskClient};
pub use error::{ClientError, Result};
pub use store::{EntityStore, RepositoryProvider, StoreError, StoreState, Stores};
