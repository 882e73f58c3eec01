pub mod quotes;

// Re-export key types for convenience
pub use quotes::{Quote, QuoteRequest, QuoteService};
