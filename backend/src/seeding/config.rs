//! Identity seeding configuration loaded via OrthoConfig.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

fn default_registry_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("seed-data")
        .join("identity.json")
}

/// Configuration values controlling identity seeding at startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "IDENTITY_SEED")]
pub struct IdentitySeedSettings {
    /// Seed roles, claims and accounts on startup. Unset means enabled.
    pub enabled: Option<bool>,
    /// Optional registry path override.
    pub registry_path: Option<PathBuf>,
}

impl IdentitySeedSettings {
    /// Whether seeding runs; absent configuration enables it.
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// Return the configured registry path, falling back to the bundled one.
    pub fn registry_path(&self) -> PathBuf {
        self.registry_path
            .clone()
            .unwrap_or_else(default_registry_path)
    }
}
