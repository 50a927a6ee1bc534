//! Bearer token signing adapters.

mod hmac_token_issuer;

pub use hmac_token_issuer::HmacTokenIssuer;
