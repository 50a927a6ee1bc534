//! Error type shared by the clinical record repositories.

use super::define_port_error;

define_port_error! {
    /// Errors raised by clinical record repository adapters.
    pub enum RepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "repository query failed: {message}",
        /// A write violated a store constraint, such as a dangling foreign key.
        Constraint { message: String } => "repository constraint violated: {message}",
    }
}
