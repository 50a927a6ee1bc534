//! Tests for identity seeding.

use std::sync::Arc;

use chrono::{Datelike, TimeZone};
use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockRoleStore, MockUserStore};
use crate::domain::test_support::FixtureClock;
use crate::domain::{AppUser, AppUserId, RoleId, StoredRole};

const REGISTRY_JSON: &str = r#"{
    "version": 1,
    "defaultPassword": "Test123!",
    "createdBy": "Seed",
    "claims": [
        { "type": "View Organ Request", "value": "7" },
        { "type": "Edit Organ Request", "value": "9" }
    ],
    "roles": [
        { "name": "Administrator", "claims": ["View Organ Request", "Edit Organ Request"] },
        { "name": "Patient", "claims": ["View Organ Request"] }
    ],
    "accounts": [
        {
            "userName": "patient1@test.com",
            "email": "patient1@test.com",
            "role": "Patient",
            "profile": { "firstName": "First name 1", "ageYears": 30 }
        }
    ]
}"#;

#[fixture]
fn registry() -> IdentityRegistry {
    IdentityRegistry::from_json(REGISTRY_JSON).expect("registry should parse")
}

fn stored_user(new_user: &NewAppUser) -> AppUser {
    AppUser {
        id: AppUserId::random(),
        user_name: new_user.user_name.clone(),
        email: new_user.email.clone(),
        email_confirmed: new_user.email_confirmed,
        audit: new_user.audit.clone(),
    }
}

fn seeder(roles: MockRoleStore, users: MockUserStore) -> IdentitySeeder<MockRoleStore, MockUserStore> {
    let clock = Utc
        .with_ymd_and_hms(2025, 6, 15, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    IdentitySeeder::new(Arc::new(roles), Arc::new(users), Arc::new(FixtureClock::new(clock)))
}

#[rstest]
#[tokio::test]
async fn empty_stores_run_every_phase(registry: IdentityRegistry) {
    let mut roles = MockRoleStore::new();
    roles.expect_any_roles().times(1).return_once(|| Ok(false));
    roles
        .expect_create_role()
        .times(2)
        .returning(|role| Ok(StoredRole { id: RoleId::random(), role }));
    roles.expect_any_role_claims().times(1).return_once(|| Ok(false));
    roles
        .expect_find_role()
        .times(2)
        .returning(|role| Ok(Some(StoredRole { id: RoleId::random(), role })));
    roles.expect_add_claim().times(3).returning(|_, _| Ok(()));

    let mut users = MockUserStore::new();
    users.expect_any_users().times(1).return_once(|| Ok(false));
    users
        .expect_create_user()
        .withf(|new_user, password| {
            let birth_year = new_user.profile.birth_date.map(|date| date.year());
            new_user.user_name.as_str() == "patient1@test.com"
                && password == "Test123!"
                && new_user.audit.created_by == "Seed"
                && birth_year == Some(1995)
        })
        .times(1)
        .returning(|new_user, _| Ok(stored_user(&new_user)));
    users
        .expect_add_to_role()
        .with(mockall::predicate::always(), eq(Role::Patient))
        .times(1)
        .returning(|_, _| Ok(()));

    let outcome = seeder(roles, users)
        .seed(&registry)
        .await
        .expect("seeding succeeds");
    assert_eq!(
        outcome,
        SeedOutcome {
            roles: SeedingResult::Applied,
            claims: SeedingResult::Applied,
            users: SeedingResult::Applied,
        }
    );
}

#[rstest]
#[tokio::test]
async fn populated_stores_write_nothing(registry: IdentityRegistry) {
    let mut roles = MockRoleStore::new();
    roles.expect_any_roles().times(1).return_once(|| Ok(true));
    roles.expect_any_role_claims().times(1).return_once(|| Ok(true));
    roles.expect_create_role().never();
    roles.expect_add_claim().never();
    let mut users = MockUserStore::new();
    users.expect_any_users().times(1).return_once(|| Ok(true));
    users.expect_create_user().never();

    let outcome = seeder(roles, users)
        .seed(&registry)
        .await
        .expect("seeding succeeds");
    assert_eq!(outcome.roles, SeedingResult::AlreadySeeded);
    assert_eq!(outcome.claims, SeedingResult::AlreadySeeded);
    assert_eq!(outcome.users, SeedingResult::AlreadySeeded);
}

#[rstest]
#[tokio::test]
async fn claims_for_missing_role_fail(registry: IdentityRegistry) {
    let mut roles = MockRoleStore::new();
    roles.expect_any_roles().times(1).return_once(|| Ok(true));
    roles.expect_any_role_claims().times(1).return_once(|| Ok(false));
    roles.expect_find_role().times(1).return_once(|_| Ok(None));

    let error = seeder(roles, MockUserStore::new())
        .seed(&registry)
        .await
        .expect_err("missing role");
    assert!(matches!(
        error,
        IdentitySeedingError::MissingRole {
            role: Role::Administrator
        }
    ));
}

#[rstest]
#[tokio::test]
async fn legacy_role_names_are_rejected() {
    let json = REGISTRY_JSON.replace("\"Patient\"", "\"Doctor\"");
    let registry = IdentityRegistry::from_json(&json).expect("registry should parse");
    let mut roles = MockRoleStore::new();
    roles.expect_any_roles().times(1).return_once(|| Ok(false));
    roles
        .expect_create_role()
        .times(1)
        .returning(|role| Ok(StoredRole { id: RoleId::random(), role }));

    let error = seeder(roles, MockUserStore::new())
        .seed(&registry)
        .await
        .expect_err("unknown role");
    assert!(matches!(error, IdentitySeedingError::UnknownRole(_)));
}

#[rstest]
#[tokio::test]
async fn store_failures_propagate(registry: IdentityRegistry) {
    let mut roles = MockRoleStore::new();
    roles
        .expect_any_roles()
        .times(1)
        .return_once(|| Err(IdentityStoreError::connection("refused")));

    let error = seeder(roles, MockUserStore::new())
        .seed(&registry)
        .await
        .expect_err("store down");
    assert!(matches!(error, IdentitySeedingError::Persistence(_)));
}
