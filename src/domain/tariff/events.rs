//! One-off musical events
//!
//! Events are licensed per occurrence rather than by venue: a ticketed
//! event pays a share of its gross box office, an open event pays a flat
//! fee by expected attendance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calculator::{capacity, Assessment, TariffCalculator};
use super::model::{BillingPeriod, TariffResult};

const TICKETED_CATEGORY: &str = "Evento Musical con Entrada";
const OPEN_CATEGORY: &str = "Evento Musical sin Entrada";
const TICKETED_SECTION: &str = "Porcentaje sobre taquilla";
const OPEN_SECTION: &str = "Cuota fija por evento";

/// Fee for a ticketed event.
///
/// Not a [`TariffResult`]: the amount is a share of sales, so there is no
/// UDA figure to convert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketedEventFee {
    pub category: String,
    pub section: String,
    pub billing_period: BillingPeriod,
    pub rate_percent: Decimal,
    /// Gross sales the rate was applied to (never negative)
    pub gross_sales: Decimal,
    pub fee_currency: Decimal,
    pub schedule_version: String,
    pub rationale: Vec<String>,
}

impl TicketedEventFee {
    pub fn fee_currency_rounded(&self) -> Decimal {
        self.fee_currency.round_dp(2)
    }
}

impl TariffCalculator {
    /// Percentage-of-gross fee for an event that sells tickets.
    pub fn ticketed_event(&self, gross_sales: Decimal) -> TicketedEventFee {
        let percent = self.schedule().events.ticketed_percent;
        let mut rationale = Vec::new();

        let gross = if gross_sales < Decimal::ZERO {
            rationale.push("Taquilla negativa: se considera 0".to_string());
            Decimal::ZERO
        } else {
            gross_sales
        };

        // Divide first: the rate is at most 1, so this cannot overflow.
        let fee = gross * (percent / Decimal::ONE_HUNDRED);
        rationale.push(format!(
            "{}% de la taquilla bruta de ${}: ${}",
            percent.normalize(),
            gross.round_dp(2),
            fee.round_dp(2)
        ));

        TicketedEventFee {
            category: TICKETED_CATEGORY.to_string(),
            section: TICKETED_SECTION.to_string(),
            billing_period: BillingPeriod::PercentageOfGross,
            rate_percent: percent,
            gross_sales: gross,
            fee_currency: fee,
            schedule_version: self.schedule().version.clone(),
            rationale,
        }
    }

    /// Flat per-event fee for an event without ticket sales.
    pub fn non_ticketed_event(&self, attendees: Option<u32>) -> TariffResult {
        let mut rationale = Vec::new();
        let attendees = capacity(
            attendees,
            self.schedule().defaults.event_attendees,
            "Aforo del evento",
            &mut rationale,
        );
        let assessment = Assessment::tiered(
            OPEN_SECTION,
            BillingPeriod::PerEvent,
            &self.schedule().events.non_ticketed,
            attendees,
            "Evento sin entrada",
            rationale,
        );
        self.price(OPEN_CATEGORY, assessment)
    }
}

// ── Tests ──────────────────────────────────────────────────────
