//! Salted password digests for the `user_credentials` table.
//!
//! Passwords are stretched with PBKDF2-HMAC-SHA256 under a random per-user
//! salt. The salt is stored hex encoded; the hash column holds
//! `<rounds>$<hex key>` so the work factor can be raised without
//! invalidating existing rows.

use hmac::digest::{CtOutput, Output};
use rand::RngCore;
use sha2::Sha256;

const SALT_LEN: usize = 16;

/// PBKDF2 rounds applied to new digests.
pub(crate) const DEFAULT_ROUNDS: u32 = 600_000;

/// Stored credential material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PasswordDigest {
    pub salt: String,
    pub hash: String,
}

fn derive(password: &str, salt: &[u8], rounds: u32) -> Output<Sha256> {
    let mut key = Output::<Sha256>::default();
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, rounds, &mut key);
    key
}

/// Hash `password` under a fresh random salt.
pub(crate) fn hash_password(password: &str) -> PasswordDigest {
    hash_password_with_rounds(password, DEFAULT_ROUNDS)
}

pub(crate) fn hash_password_with_rounds(password: &str, rounds: u32) -> PasswordDigest {
    let mut salt = [0_u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    hash_with_salt(password, &salt, rounds)
}

fn hash_with_salt(password: &str, salt: &[u8], rounds: u32) -> PasswordDigest {
    let key = derive(password, salt, rounds);
    PasswordDigest {
        salt: hex::encode(salt),
        hash: format!("{rounds}${}", hex::encode(key)),
    }
}

/// Split a stored hash into its round count and derived key.
fn parse_stored(hash: &str) -> Option<(u32, Output<Sha256>)> {
    let (rounds, key_hex) = hash.split_once('$')?;
    let rounds: u32 = rounds.parse().ok().filter(|rounds| *rounds > 0)?;
    let key = hex::decode(key_hex).ok()?;
    if key.len() != Output::<Sha256>::default().len() {
        return None;
    }
    Some((rounds, Output::<Sha256>::clone_from_slice(&key)))
}

/// Check `password` against stored material in constant time.
///
/// Malformed stored values never verify.
pub(crate) fn verify_password(password: &str, salt_hex: &str, hash: &str) -> bool {
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let Some((rounds, expected)) = parse_stored(hash) else {
        return false;
    };
    CtOutput::<Sha256>::new(derive(password, &salt, rounds)) == CtOutput::new(expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TEST_ROUNDS: u32 = 1_000;

    #[test]
    fn hashed_password_verifies() {
        let digest = hash_password_with_rounds("Test123!", TEST_ROUNDS);
        assert!(verify_password("Test123!", &digest.salt, &digest.hash));
    }

    #[test]
    fn new_digests_record_the_default_work_factor() {
        let digest = hash_password("Test123!");
        assert!(digest.hash.starts_with(&format!("{DEFAULT_ROUNDS}$")));
        assert!(verify_password("Test123!", &digest.salt, &digest.hash));
    }

    #[rstest]
    #[case("test123!")]
    #[case("Test123! ")]
    #[case("")]
    fn other_passwords_do_not_verify(#[case] attempt: &str) {
        let digest = hash_password_with_rounds("Test123!", TEST_ROUNDS);
        assert!(!verify_password(attempt, &digest.salt, &digest.hash));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let first = hash_password_with_rounds("Test123!", TEST_ROUNDS);
        let second = hash_password_with_rounds("Test123!", TEST_ROUNDS);
        assert_ne!(first.salt, second.salt);
        assert_ne!(first.hash, second.hash);
    }

    #[test]
    fn rounds_change_the_key() {
        let salt = [7_u8; SALT_LEN];
        let fewer = hash_with_salt("pw", &salt, TEST_ROUNDS);
        let more = hash_with_salt("pw", &salt, TEST_ROUNDS + 1);
        assert_eq!(fewer, hash_with_salt("pw", &salt, TEST_ROUNDS));
        assert_ne!(fewer.hash, more.hash);
    }

    #[test]
    fn tampered_round_count_does_not_verify() {
        let digest = hash_password_with_rounds("pw", TEST_ROUNDS);
        let (_, key) = digest.hash.split_once('$').expect("stored format");
        let tampered = format!("{}${key}", TEST_ROUNDS + 1);
        assert!(!verify_password("pw", &digest.salt, &tampered));
    }

    #[rstest]
    #[case("zz", "1000$00")]
    #[case("00", "1000$not-hex")]
    #[case("00", "0$00")]
    #[case("00", "no-separator")]
    #[case("00", "1000$0011")]
    fn malformed_material_never_verifies(#[case] salt: &str, #[case] hash: &str) {
        assert!(!verify_password("pw", salt, hash));
    }
}
