//! Startup seeding orchestration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};
use mockable::DefaultClock;
use seed_data::{IdentityRegistry, RegistryError};
use thiserror::Error;
use tracing::info;

use crate::domain::{IdentitySeeder, IdentitySeedingError, SeedOutcome};
use crate::outbound::persistence::{DbPool, DieselIdentityStore};
use crate::seeding::config::IdentitySeedSettings;

/// Errors returned while executing startup seeding.
#[derive(Debug, Error)]
pub enum StartupSeedingError {
    /// Registry file could not be read.
    #[error("failed to read registry at {path}: {source}")]
    RegistryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Registry parsing failed.
    #[error("registry parse error: {0}")]
    Registry(#[from] RegistryError),
    /// Applying the registry failed.
    #[error("identity seeding error: {0}")]
    Seeding(#[from] IdentitySeedingError),
}

/// Apply the identity registry on startup when enabled.
///
/// # Examples
///
/// ```rust,no_run
/// use infusion_backend::outbound::persistence::{DbPool, PoolConfig};
/// use infusion_backend::seeding::{IdentitySeedSettings, seed_identity_on_startup};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = DbPool::new(PoolConfig::new("postgres://localhost/infusion")).await?;
/// let settings = IdentitySeedSettings {
///     enabled: Some(true),
///     registry_path: None,
/// };
/// let outcome = seed_identity_on_startup(&settings, &pool).await?;
/// assert!(outcome.is_some());
/// # Ok(())
/// # }
/// ```
pub async fn seed_identity_on_startup(
    settings: &IdentitySeedSettings,
    db_pool: &DbPool,
) -> Result<Option<SeedOutcome>, StartupSeedingError> {
    if !settings.is_enabled() {
        info!(reason = "disabled", "identity seeding skipped");
        return Ok(None);
    }

    let registry_path = settings.registry_path();
    let registry = load_registry(&registry_path)?;
    info!(
        path = %registry_path.display(),
        roles = registry.roles().len(),
        accounts = registry.accounts().len(),
        "loaded identity registry"
    );

    let store = Arc::new(DieselIdentityStore::new(db_pool.clone()));
    let seeder = IdentitySeeder::new(store.clone(), store, Arc::new(DefaultClock));
    let outcome = seeder.seed(&registry).await?;
    Ok(Some(outcome))
}

/// Read and parse a registry file through a capability-scoped directory.
pub fn load_registry(path: &Path) -> Result<IdentityRegistry, StartupSeedingError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| StartupSeedingError::RegistryRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "registry path must be a file",
            ),
        })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|source| {
        StartupSeedingError::RegistryRead {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let contents = dir
        .read_to_string(Path::new(file_name))
        .map_err(|source| StartupSeedingError::RegistryRead {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(IdentityRegistry::from_json(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[test]
    fn bundled_registry_parses() {
        let path = IdentitySeedSettings {
            enabled: Some(true),
            registry_path: None,
        }
        .registry_path();
        let registry = load_registry(&path).expect("bundled registry");
        assert_eq!(registry.roles().len(), 3);
        assert_eq!(registry.accounts().len(), 3);
    }

    #[rstest]
    #[case("/")]
    #[case("/definitely/not/here/identity.json")]
    fn unreadable_paths_are_reported(#[case] raw: &str) {
        let err = load_registry(Path::new(raw)).expect_err("unreadable registry");
        assert!(matches!(err, StartupSeedingError::RegistryRead { .. }));
    }

    #[test]
    fn malformed_registry_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"{ not json").expect("write registry");
        let err = load_registry(file.path()).expect_err("malformed registry");
        assert!(matches!(err, StartupSeedingError::Registry(_)));
    }

    #[actix_web::test]
    async fn disabled_seeding_skips_without_touching_the_pool() {
        use crate::outbound::persistence::PoolConfig;

        // bb8 connects lazily, so building the pool against a dead address is fine
        // as long as nothing checks out a connection.
        let pool = DbPool::new(
            PoolConfig::new("postgres://127.0.0.1:1/unused").with_min_idle(Some(0)),
        )
        .await
        .expect("lazy pool");
        let settings = IdentitySeedSettings {
            enabled: Some(false),
            registry_path: None,
        };
        let outcome = seed_identity_on_startup(&settings, &pool)
            .await
            .expect("skip");
        assert!(outcome.is_none());
    }
}
