pub mod tariff;

// Re-export commonly used types
pub use tariff::{
    compute_tariff, BillingPeriod, Category, EstablishmentDescriptor, TariffCalculator,
    TariffResult, TariffSchedule, TicketedEventFee,
};

pub use crate::shared::errors::{DomainError, DomainResult};
