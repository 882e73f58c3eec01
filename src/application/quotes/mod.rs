pub mod dto;
pub mod service;

pub use dto::{Quote, QuoteRequest};
pub use service::QuoteService;
