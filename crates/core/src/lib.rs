//! trialdesk_core - domain records and storage contracts for trialdesk.
//!
//! Everything in this crate is pure: record types, the generic
//! [`storage::Repository`] contract, cache traits and key helpers, and the
//! uniform HTTP response envelope. Concrete backends live in the server
//! crate.

pub mod cache;
pub mod records;
pub mod response;
pub mod serde;
pub mod storage;
