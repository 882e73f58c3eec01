pub mod errors;
pub mod serializations;
pub mod telemetry;

pub use errors::{AppError, DomainError, DomainResult, InfraError};
pub use telemetry::init_tracing;
