//! Startup wiring for identity seeding.

mod config;
mod startup;

pub use config::IdentitySeedSettings;
pub use startup::{StartupSeedingError, load_registry, seed_identity_on_startup};
