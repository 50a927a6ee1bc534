//! HMAC-SHA256 signed bearer tokens.
//!
//! Tokens use the compact `header.claims.signature` layout with unpadded
//! base64url segments and an `HS256` header, so standard JWT tooling can
//! decode them. Only this backend verifies them.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::domain::TokenClaims;
use crate::domain::ports::{TokenIssuer, TokenIssuerError};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Token issuer signing with a shared secret.
pub struct HmacTokenIssuer {
    secret: Zeroizing<Vec<u8>>,
    clock: Arc<dyn Clock>,
}

impl HmacTokenIssuer {
    pub fn new(secret: Zeroizing<Vec<u8>>, clock: Arc<dyn Clock>) -> Self {
        Self { secret, clock }
    }

    fn mac(&self) -> Result<HmacSha256, TokenIssuerError> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|err| TokenIssuerError::encoding(err.to_string()))
    }
}

fn encode_json<T: Serialize>(value: &T) -> Result<String, TokenIssuerError> {
    let json = serde_json::to_vec(value).map_err(|err| TokenIssuerError::encoding(err.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn decode_segment(segment: &str) -> Result<Vec<u8>, TokenIssuerError> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenIssuerError::malformed())
}

impl TokenIssuer for HmacTokenIssuer {
    fn issue(&self, claims: &TokenClaims) -> Result<String, TokenIssuerError> {
        let header = encode_json(&Header {
            alg: ALGORITHM.to_owned(),
            typ: "JWT".to_owned(),
        })?;
        let payload = encode_json(claims)?;
        let signing_input = format!("{header}.{payload}");

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{signing_input}.{signature}"))
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, TokenIssuerError> {
        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenIssuerError::malformed());
        };

        let parsed: Header = serde_json::from_slice(&decode_segment(header)?)
            .map_err(|_| TokenIssuerError::malformed())?;
        if parsed.alg != ALGORITHM {
            return Err(TokenIssuerError::malformed());
        }

        let mut mac = self.mac()?;
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        mac.verify_slice(&decode_segment(signature)?)
            .map_err(|_| TokenIssuerError::invalid_signature())?;

        let claims: TokenClaims = serde_json::from_slice(&decode_segment(payload)?)
            .map_err(|_| TokenIssuerError::malformed())?;
        if claims.exp <= self.clock.utc().timestamp() {
            return Err(TokenIssuerError::expired());
        }
        Ok(claims)
    }
}
