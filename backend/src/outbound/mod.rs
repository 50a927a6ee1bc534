//! Outbound adapters implementing domain ports for infrastructure.
//!
//! - **persistence**: PostgreSQL repositories and identity store via Diesel.
//! - **token**: HMAC-signed bearer tokens.
//!
//! Adapters translate between domain types and infrastructure
//! representations and contain no business rules.

pub mod persistence;
pub mod token;
