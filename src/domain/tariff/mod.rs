//! Tariff aggregate
//!
//! Venue descriptors, the versioned rate schedule, and the calculator that
//! turns one into a fee under the other.

pub mod calculator;
pub mod events;
pub mod model;
pub mod schedule;

pub use calculator::{compute_tariff, TariffCalculator};
pub use events::TicketedEventFee;
pub use model::{
    BillingPeriod, Category, CommercialKind, EstablishmentDescriptor, HotelRating, MusicMode,
    Season, TariffResult, DEFAULT_ZONE,
};
pub use schedule::{TariffSchedule, Tier, TierTable};
