//! Tariff calculator
//!
//! Maps an [`EstablishmentDescriptor`] to a [`TariffResult`] by running
//! exactly one category evaluator against a [`TariffSchedule`]. Pure and
//! total: no I/O, no shared state, and every descriptor yields a result.

use std::sync::OnceLock;

use rust_decimal::Decimal;

use super::model::{
    BillingPeriod, Category, CommercialKind, EstablishmentDescriptor, HotelRating, MusicMode,
    Season, TariffResult,
};
use super::schedule::{TariffSchedule, Tier, TierTable};

const SECTION_DANCE: &str = "G - Donde se baile con música viva o grabada";
const SECTION_LIVE: &str = "F - Presentan variedad o música en vivo";
const SECTION_RECORDED: &str = "B - Con música grabada";
const SECTION_HOTEL: &str = "Hoteles, Moteles y Similares";
const SECTION_HOTEL_TOURIST: &str = "Zonas Turísticas";
const SECTION_SPECIAL_ZONE: &str = "Para D.F., Guadalajara, Monterrey, etc.";
const SECTION_NATIONAL: &str = "Para toda la República";
const SECTION_PARK_RECORDED: &str = "Música grabada en áreas comunes y restaurantes";
const SECTION_PARK_LIVE: &str =
    "Música viva en áreas comunes con participación de grupos musicales locales";
const SECTION_KARAOKE: &str = "Restaurantes, Restaurantes Bar, Bares, Cantinas, Karaoke";
const SECTION_GYM: &str = "Gimnasios";
const SECTION_RETAIL: &str = "Tiendas y Centros Comerciales";
const SECTION_GENERIC: &str = "Tarifa base";

/// Outcome of one category evaluator before currency conversion
pub(crate) struct Assessment {
    pub section: &'static str,
    pub period: BillingPeriod,
    pub udas: Decimal,
    pub rationale: Vec<String>,
}

impl Assessment {
    pub(crate) fn new(
        section: &'static str,
        period: BillingPeriod,
        udas: Decimal,
        rationale: Vec<String>,
    ) -> Self {
        Self {
            section,
            period,
            udas,
            rationale,
        }
    }

    /// Charge the tier that `value` falls in and record the matched line.
    pub(crate) fn tiered(
        section: &'static str,
        period: BillingPeriod,
        table: &TierTable,
        value: u32,
        context: &str,
        mut rationale: Vec<String>,
    ) -> Self {
        let tier = table.lookup(value);
        rationale.push(tier_line(context, tier, period));
        Self::new(section, period, tier.udas, rationale)
    }

    /// Nothing owed; the section stays empty.
    fn exempt(reason: impl Into<String>, mut rationale: Vec<String>) -> Self {
        rationale.push(reason.into());
        Self::new("", BillingPeriod::Monthly, Decimal::ZERO, rationale)
    }
}

pub(crate) fn tier_line(context: &str, tier: &Tier, period: BillingPeriod) -> String {
    format!(
        "{}, {}: {} UDAs por {}",
        context,
        tier.label,
        tier.udas.normalize(),
        period.unit()
    )
}

/// Resolve a capacity, falling back to the category default when the
/// descriptor has none (or zero).
pub(crate) fn capacity(
    value: Option<u32>,
    default: u32,
    what: &str,
    rationale: &mut Vec<String>,
) -> u32 {
    match value.filter(|v| *v > 0) {
        Some(v) => v,
        None => {
            rationale.push(format!(
                "{} no indicado o inválido: se consideran {} por defecto",
                what, default
            ));
            default
        }
    }
}

/// Tariff calculator bound to one schedule version.
///
/// Cheap to share: `compute` takes `&self` and touches nothing else.
#[derive(Debug, Clone, Default)]
pub struct TariffCalculator {
    schedule: TariffSchedule,
}

impl TariffCalculator {
    pub fn new(schedule: TariffSchedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &TariffSchedule {
        &self.schedule
    }

    /// Compute the license fee for one establishment.
    pub fn compute(&self, descriptor: &EstablishmentDescriptor) -> TariffResult {
        let assessment = match descriptor.category {
            Category::RestaurantBar => self.restaurant_bar(descriptor),
            Category::Hotel => self.hotel(descriptor),
            Category::Discoteca => self.discoteca(descriptor),
            Category::CentroNocturno => self.centro_nocturno(descriptor),
            Category::WaterPark => self.water_park(descriptor),
            Category::Karaoke => self.karaoke(descriptor),
            Category::Commercial(kind) => self.commercial(kind),
            Category::Generic => self.generic(),
        };
        self.price(descriptor.category.label(), assessment)
    }

    pub(crate) fn price(&self, category: &str, assessment: Assessment) -> TariffResult {
        TariffResult::new(
            category,
            assessment.section,
            assessment.period,
            assessment.udas,
            self.schedule.uda_value,
            self.schedule.version.as_str(),
            assessment.rationale,
        )
    }

    fn tables(&self, descriptor: &EstablishmentDescriptor, rationale: &mut Vec<String>) -> u32 {
        capacity(
            descriptor.tables,
            self.schedule.defaults.tables,
            "Número de mesas",
            rationale,
        )
    }

    // Dancing overrides the music mode; live music outranks recorded.
    fn restaurant_bar(&self, d: &EstablishmentDescriptor) -> Assessment {
        let s = &self.schedule.restaurant;
        let mut rationale = Vec::new();

        if d.dance_permitted {
            rationale.push(
                "Se permite baile: la sección G prevalece sobre el tipo de música".to_string(),
            );
            let tables = self.tables(d, &mut rationale);
            return Assessment::tiered(
                SECTION_DANCE,
                BillingPeriod::Daily,
                &s.dance,
                tables,
                "Con baile",
                rationale,
            );
        }

        match d.music {
            music if music.has_live() => {
                let (table, context) = if d.entrance_fee {
                    (&s.live_with_cover, "Música viva con entrada")
                } else {
                    (&s.live_without_cover, "Música viva sin entrada")
                };
                rationale.push(format!(
                    "Música {} {} costo de entrada: sección F, cobro por día",
                    d.music,
                    if d.entrance_fee { "con" } else { "sin" }
                ));
                let tables = self.tables(d, &mut rationale);
                Assessment::tiered(
                    SECTION_LIVE,
                    BillingPeriod::Daily,
                    table,
                    tables,
                    context,
                    rationale,
                )
            }
            MusicMode::Recorded => {
                rationale.push("Música grabada: sección B, cobro mensual".into());
                let tables = self.tables(d, &mut rationale);
                Assessment::tiered(
                    SECTION_RECORDED,
                    BillingPeriod::Monthly,
                    &s.recorded,
                    tables,
                    "Música grabada",
                    rationale,
                )
            }
            _ => Assessment::exempt("Sin música: no se causa tarifa", rationale),
        }
    }

    fn hotel(&self, d: &EstablishmentDescriptor) -> Assessment {
        let s = &self.schedule.hotel;
        let mut rationale = Vec::new();

        let rating = d.hotel_rating.unwrap_or_else(|| {
            rationale.push(format!(
                "Categoría de hotel no indicada o no reconocida: se aplica {}",
                HotelRating::FALLBACK.label()
            ));
            HotelRating::FALLBACK
        });

        let tourist_table = if d.tourist_zone {
            let table = s.tourist_table(rating);
            rationale.push(match table {
                Some(_) => {
                    "Zona turística: se aplica la tabla de hoteles en zonas turísticas".to_string()
                }
                None => format!("Zona turística sin efecto para {}", rating.label()),
            });
            table
        } else {
            None
        };

        let rooms = capacity(
            d.rooms,
            self.schedule.defaults.rooms,
            "Número de habitaciones",
            &mut rationale,
        );

        match tourist_table {
            Some(table) => Assessment::tiered(
                SECTION_HOTEL_TOURIST,
                BillingPeriod::Monthly,
                table,
                rooms,
                &format!("{} zona turística", rating.label()),
                rationale,
            ),
            None => Assessment::tiered(
                SECTION_HOTEL,
                BillingPeriod::Monthly,
                s.standard_table(rating),
                rooms,
                rating.label(),
                rationale,
            ),
        }
    }

    fn discoteca(&self, d: &EstablishmentDescriptor) -> Assessment {
        let s = &self.schedule.discoteca;
        let mut rationale = Vec::new();

        let (section, table, context) = if self.schedule.is_special_zone(&d.zone) {
            rationale.push(format!("Zona especial ({}): tarifas metropolitanas", d.zone));
            rationale.push(format!("Temporada {}", d.season));
            match d.season {
                Season::High => (
                    SECTION_SPECIAL_ZONE,
                    &s.special_high_season,
                    "Zona especial, temporada alta",
                ),
                Season::Low => (
                    SECTION_SPECIAL_ZONE,
                    &s.special_low_season,
                    "Zona especial, temporada baja",
                ),
            }
        } else {
            rationale.push(format!("Zona {}: tarifa para toda la República", d.zone));
            (SECTION_NATIONAL, &s.general, "República general")
        };

        let persons = capacity(
            d.persons,
            self.schedule.defaults.persons,
            "Capacidad de personas",
            &mut rationale,
        );
        Assessment::tiered(section, BillingPeriod::Daily, table, persons, context, rationale)
    }

    fn centro_nocturno(&self, d: &EstablishmentDescriptor) -> Assessment {
        let s = &self.schedule.nightclub;
        let mut rationale = Vec::new();

        let (section, table, context) = if self.schedule.is_special_zone(&d.zone) {
            rationale.push(format!("Zona especial ({}): tarifas metropolitanas", d.zone));
            (SECTION_SPECIAL_ZONE, &s.special, "Centro nocturno zona especial")
        } else {
            rationale.push(format!("Zona {}: tarifa para toda la República", d.zone));
            (SECTION_NATIONAL, &s.general, "Centro nocturno República general")
        };

        let tables = self.tables(d, &mut rationale);
        Assessment::tiered(section, BillingPeriod::Daily, table, tables, context, rationale)
    }

    fn water_park(&self, d: &EstablishmentDescriptor) -> Assessment {
        let s = &self.schedule.water_park;
        let mut rationale = Vec::new();

        let (section, period, table, context) = match d.music {
            MusicMode::Recorded => {
                rationale.push("Música grabada en áreas comunes: cobro mensual".into());
                (
                    SECTION_PARK_RECORDED,
                    BillingPeriod::Monthly,
                    &s.recorded,
                    "Música grabada",
                )
            }
            MusicMode::Live => {
                rationale.push("Música viva en áreas comunes: cobro por día".into());
                (SECTION_PARK_LIVE, BillingPeriod::Daily, &s.live, "Música viva")
            }
            MusicMode::Mixed => {
                return Assessment::exempt(
                    "Música mixta: sin tabla para balnearios, no se causa tarifa",
                    rationale,
                );
            }
            MusicMode::None => {
                return Assessment::exempt("Sin música: no se causa tarifa", rationale);
            }
        };

        let pools = capacity(
            d.pools,
            self.schedule.defaults.pools,
            "Número de albercas",
            &mut rationale,
        );
        Assessment::tiered(section, period, table, pools, context, rationale)
    }

    fn karaoke(&self, d: &EstablishmentDescriptor) -> Assessment {
        let mut rationale = Vec::new();
        let tables = self.tables(d, &mut rationale);
        Assessment::tiered(
            SECTION_KARAOKE,
            BillingPeriod::Monthly,
            &self.schedule.karaoke,
            tables,
            "Karaoke",
            rationale,
        )
    }

    fn commercial(&self, kind: CommercialKind) -> Assessment {
        let udas = self.schedule.commercial.fee(kind);
        let (section, line) = match kind {
            CommercialKind::Gym => (SECTION_GYM, "Gimnasio con música de fondo"),
            CommercialKind::Store => (SECTION_RETAIL, "Tienda con música de fondo"),
            CommercialKind::Mall => (SECTION_RETAIL, "Centro comercial con música de fondo"),
        };
        let rationale = vec![format!("{}: {} UDAs por mes", line, udas.normalize())];
        Assessment::new(section, BillingPeriod::Monthly, udas, rationale)
    }

    fn generic(&self) -> Assessment {
        let udas = self.schedule.generic_udas;
        let rationale = vec![
            "Tipo de establecimiento sin sección específica: se aplica la tarifa base".into(),
            format!("Tarifa base general: {} UDAs por mes", udas.normalize()),
        ];
        Assessment::new(SECTION_GENERIC, BillingPeriod::Monthly, udas, rationale)
    }
}

fn builtin() -> &'static TariffCalculator {
    static CALCULATOR: OnceLock<TariffCalculator> = OnceLock::new();
    CALCULATOR.get_or_init(TariffCalculator::default)
}

/// Compute a fee against the built-in SACM 2017 schedule.
pub fn compute_tariff(descriptor: &EstablishmentDescriptor) -> TariffResult {
    builtin().compute(descriptor)
}

// ── Tests ──────────────────────────────────────────────────────
