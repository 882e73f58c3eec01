//! # SACM Tariff Calculator
//!
//! Music-licensing fees for commercial venues in Mexico under the SACM 2017
//! tariff schedule. Fees are expressed in UDAs and converted to pesos with
//! the schedule's UDA value.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Venue descriptors, tariff schedules and the pure calculator
//! - **application**: Quote use cases (validation, normalization, logging)
//! - **shared**: Errors, lenient deserializers and tracing bootstrap
//! - **config**: TOML configuration and schedule overrides
//!
//! ```
//! use sacm_tariff::{compute_tariff, Category, EstablishmentDescriptor};
//!
//! let karaoke = EstablishmentDescriptor::new(Category::Karaoke).with_tables(41);
//! let result = compute_tariff(&karaoke);
//! assert_eq!(result.fee_udas.to_string(), "10.5");
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use application::{Quote, QuoteRequest, QuoteService};
pub use domain::tariff::{
    compute_tariff, BillingPeriod, Category, CommercialKind, EstablishmentDescriptor,
    HotelRating, MusicMode, Season, TariffCalculator, TariffResult, TariffSchedule,
    TicketedEventFee,
};
pub use shared::{init_tracing, AppError, DomainError, InfraError};
