//! Clinical records backend library.
//!
//! Layout follows ports and adapters: [`domain`] holds the records and the
//! services, [`inbound`] exposes them over HTTP, and [`outbound`] talks to
//! PostgreSQL and signs bearer tokens. [`server`] wires the pieces together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod seeding;
pub mod server;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
