//! Declarative identity registry for baseline roles, claims, and accounts.
//!
//! The registry replaces hard-coded seeding statements with a JSON table
//! describing which roles exist, which claims each role carries, and which
//! accounts should be created on an empty store. The crate is independent of
//! backend domain types; the backend maps registry entries onto its own
//! entities before persisting them.
//!
//! # Example
//!
//! ```
//! use seed_data::IdentityRegistry;
//!
//! let json = r#"{
//!     "version": 1,
//!     "defaultPassword": "Test123!",
//!     "createdBy": "Seed",
//!     "claims": [{"type": "View Organ Request", "value": "5"}],
//!     "roles": [{"name": "Patient", "claims": ["View Organ Request"]}],
//!     "accounts": [{
//!         "userName": "patient1@test.com",
//!         "email": "patient1@test.com",
//!         "role": "Patient"
//!     }]
//! }"#;
//!
//! let registry = IdentityRegistry::from_json(json).expect("valid registry");
//! assert_eq!(registry.roles().len(), 1);
//! assert_eq!(registry.claims_for_role("Patient").map(|c| c.len()), Some(1));
//! ```

mod account;
mod error;
mod registry;
mod validation;

pub use account::{SeedAccount, SeedProfile};
pub use error::RegistryError;
pub use registry::{ClaimDefinition, IdentityRegistry, RoleDefinition};
pub use validation::{USER_NAME_MAX, is_plausible_email};
