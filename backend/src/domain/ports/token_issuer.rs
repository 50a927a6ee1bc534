//! Driven port for bearer token signing and verification.

use crate::domain::TokenClaims;

use super::define_port_error;

define_port_error! {
    /// Reasons a token could not be issued or accepted.
    pub enum TokenIssuerError {
        /// Token did not have the `header.claims.signature` shape.
        Malformed => "token is malformed",
        /// Signature did not match the token contents.
        InvalidSignature => "token signature is invalid",
        /// Token lifetime has elapsed.
        Expired => "token has expired",
        /// Claims could not be encoded.
        Encoding { message: String } => "token encoding failed: {message}",
    }
}

/// Port for producing and checking signed access tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    /// Sign `claims` into an opaque access token.
    fn issue(&self, claims: &TokenClaims) -> Result<String, TokenIssuerError>;

    /// Check a presented token and return its claims.
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenIssuerError>;
}
