//! Quote service, application-layer orchestration
//!
//! Validates and normalizes incoming requests, runs the calculator, and
//! packages the result. Front ends (the CLI, a web handler) stay thin and
//! delegate here.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info};
use validator::{Validate, ValidationErrors};

use super::dto::{Quote, QuoteRequest};
use crate::domain::tariff::{
    EstablishmentDescriptor, TariffCalculator, TariffResult, TariffSchedule, TicketedEventFee,
};
use crate::shared::errors::{DomainError, DomainResult};

/// Flatten validator output into one message, sorted for stable output.
fn validation_error(errors: ValidationErrors) -> DomainError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect();
    messages.sort();
    DomainError::Validation(messages.join("; "))
}

/// Quote service. Cheap to clone; all clones share one calculator.
#[derive(Debug, Clone, Default)]
pub struct QuoteService {
    calculator: Arc<TariffCalculator>,
}

impl QuoteService {
    pub fn new(schedule: TariffSchedule) -> Self {
        Self {
            calculator: Arc::new(TariffCalculator::new(schedule)),
        }
    }

    pub fn calculator(&self) -> &TariffCalculator {
        &self.calculator
    }

    /// Validate a request and normalize it into a descriptor.
    pub fn prepare(&self, request: &QuoteRequest) -> DomainResult<EstablishmentDescriptor> {
        request.validate().map_err(validation_error)?;
        Ok(request.to_descriptor())
    }

    /// Validate, compute, and package a quote.
    pub fn quote(&self, request: &QuoteRequest) -> DomainResult<Quote> {
        let descriptor = self.prepare(request)?;
        debug!(?descriptor, "Computing tariff");

        let result = self.calculator.compute(&descriptor);
        let total_currency = result.fee_currency_rounded();
        let establishment = request.nombre.clone().unwrap_or_default();

        info!(
            establishment = %establishment,
            category = %descriptor.category,
            section = %result.section,
            period = %result.billing_period,
            fee_udas = %result.fee_udas,
            total = %total_currency,
            schedule = %result.schedule_version,
            "Quote computed"
        );

        Ok(Quote {
            establishment,
            address: request.direccion.clone(),
            descriptor,
            result,
            total_currency,
        })
    }

    /// Fee for a ticketed event on `gross_sales`.
    pub fn ticketed_event(&self, gross_sales: Decimal) -> TicketedEventFee {
        let fee = self.calculator.ticketed_event(gross_sales);
        info!(
            gross = %fee.gross_sales,
            rate = %fee.rate_percent,
            total = %fee.fee_currency_rounded(),
            "Ticketed event fee computed"
        );
        fee
    }

    /// Fee for an event without ticket sales.
    pub fn non_ticketed_event(&self, attendees: Option<u32>) -> TariffResult {
        let result = self.calculator.non_ticketed_event(attendees);
        info!(
            attendees = ?attendees,
            fee_udas = %result.fee_udas,
            total = %result.fee_currency_rounded(),
            "Non-ticketed event fee computed"
        );
        result
    }
}

// ── Tests ──────────────────────────────────────────────────────
