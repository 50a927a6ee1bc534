//! HTTP inbound adapter exposing the REST endpoints.
//!
//! Routes follow `/api/{Controller}/{Action}/{id?}`. Every module exposes a
//! `configure` function registering its controller scope.

use actix_web::web;

pub mod account;
pub mod auth;
pub mod disease_histories;
pub mod error;
pub mod health;
pub mod medicines;
pub mod metrics;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod treatments;
pub mod user_infos;
pub mod validation;

pub use error::ApiResult;

/// Register every controller scope.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.configure(account::configure)
        .configure(medicines::configure)
        .configure(user_infos::configure)
        .configure(disease_histories::configure)
        .configure(treatments::configure)
        .configure(metrics::configure);
}
