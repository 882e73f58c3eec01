//! Tariff schedule data
//!
//! Every rate the calculator applies lives here as data: ordered tier tables
//! of `(upper bound, UDAs)` pairs plus a handful of fixed fees. A schedule is
//! a plain serde value, so a new tariff year can be loaded from a TOML file
//! instead of edited into the code.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::model::{CommercialKind, HotelRating};
use crate::shared::errors::DomainError;
use crate::shared::serializations::normalize_tag;

/// One bucket of a tier table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    /// Inclusive upper bound; `None` for the open-ended last bucket
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up_to: Option<u32>,
    pub udas: Decimal,
    /// Range as printed in the schedule, e.g. "1-25 mesas"
    pub label: String,
}

/// Ordered, non-empty list of tiers with strictly ascending bounds and an
/// open-ended last tier. Construction enforces this, so lookups are total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Tier>", into = "Vec<Tier>")]
pub struct TierTable {
    tiers: Vec<Tier>,
}

impl TierTable {
    /// Table from rows known to be well-formed (the built-in schedule).
    fn known(rows: &[(Option<u32>, i64, u32, &str)]) -> Self {
        Self {
            tiers: rows
                .iter()
                .map(|&(up_to, mantissa, scale, label)| Tier {
                    up_to,
                    udas: Decimal::new(mantissa, scale),
                    label: label.to_string(),
                })
                .collect(),
        }
    }

    /// Tier whose range contains `value` (binary search on the bounds).
    pub fn lookup(&self, value: u32) -> &Tier {
        let idx = self
            .tiers
            .partition_point(|tier| tier.up_to.is_some_and(|bound| bound < value));
        &self.tiers[idx]
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }
}

impl TryFrom<Vec<Tier>> for TierTable {
    type Error = DomainError;

    fn try_from(tiers: Vec<Tier>) -> Result<Self, Self::Error> {
        let Some(last) = tiers.last() else {
            return Err(DomainError::InvalidSchedule("tier table is empty".into()));
        };
        if last.up_to.is_some() {
            return Err(DomainError::InvalidSchedule(format!(
                "last tier '{}' must be open-ended",
                last.label
            )));
        }

        let mut previous: Option<u32> = None;
        for tier in &tiers[..tiers.len() - 1] {
            let Some(bound) = tier.up_to else {
                return Err(DomainError::InvalidSchedule(format!(
                    "tier '{}' is open-ended but not last",
                    tier.label
                )));
            };
            if previous.is_some_and(|p| bound <= p) {
                return Err(DomainError::InvalidSchedule(format!(
                    "tier '{}' bound {} is not above the previous bound",
                    tier.label, bound
                )));
            }
            previous = Some(bound);
        }

        if let Some(tier) = tiers.iter().find(|t| t.udas < Decimal::ZERO) {
            return Err(DomainError::InvalidSchedule(format!(
                "tier '{}' has a negative rate",
                tier.label
            )));
        }

        Ok(Self { tiers })
    }
}

impl From<TierTable> for Vec<Tier> {
    fn from(table: TierTable) -> Self {
        table.tiers
    }
}

/// Restaurants, bars and cantinas (sections B, F and G)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantSchedule {
    /// Section G, dancing allowed, per day
    pub dance: TierTable,
    /// Section F, live music with cover charge, per day
    pub live_with_cover: TierTable,
    /// Section F, live music without cover charge, per day
    pub live_without_cover: TierTable,
    /// Section B, recorded music, per month
    pub recorded: TierTable,
}

/// Standard hotel tables, one per rating, by room count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelTables {
    pub one_star: TierTable,
    pub two_star: TierTable,
    pub three_star: TierTable,
    pub four_star: TierTable,
    pub five_star: TierTable,
    pub gran_turismo: TierTable,
}

/// Tourist-zone tables; only upscale ratings have one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouristHotelTables {
    pub four_star: TierTable,
    pub five_star: TierTable,
    pub gran_turismo: TierTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelSchedule {
    pub standard: HotelTables,
    pub tourist: TouristHotelTables,
}

impl HotelSchedule {
    pub fn standard_table(&self, rating: HotelRating) -> &TierTable {
        match rating {
            HotelRating::One => &self.standard.one_star,
            HotelRating::Two => &self.standard.two_star,
            HotelRating::Three => &self.standard.three_star,
            HotelRating::Four => &self.standard.four_star,
            HotelRating::Five => &self.standard.five_star,
            HotelRating::GranTurismo => &self.standard.gran_turismo,
        }
    }

    pub fn tourist_table(&self, rating: HotelRating) -> Option<&TierTable> {
        match rating {
            HotelRating::Four => Some(&self.tourist.four_star),
            HotelRating::Five => Some(&self.tourist.five_star),
            HotelRating::GranTurismo => Some(&self.tourist.gran_turismo),
            _ => None,
        }
    }
}

/// Discotecas and antros, by person capacity, per day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscotecaSchedule {
    pub special_high_season: TierTable,
    pub special_low_season: TierTable,
    pub general: TierTable,
}

/// Night clubs, by table count, per day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightclubSchedule {
    pub special: TierTable,
    pub general: TierTable,
}

/// Water parks and balnearios, by pool count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterParkSchedule {
    /// Per month
    pub recorded: TierTable,
    /// Per day
    pub live: TierTable,
}

/// Fixed monthly fees for commercial venues with background music
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommercialSchedule {
    pub gym: Decimal,
    pub store: Decimal,
    pub mall: Decimal,
}

impl CommercialSchedule {
    pub fn fee(&self, kind: CommercialKind) -> Decimal {
        match kind {
            CommercialKind::Gym => self.gym,
            CommercialKind::Store => self.store,
            CommercialKind::Mall => self.mall,
        }
    }
}

/// Special events outside a venue's regular license
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSchedule {
    /// Share of gross ticket sales for ticketed events, in percent
    pub ticketed_percent: Decimal,
    /// Flat fee per non-ticketed event, by attendance
    pub non_ticketed: TierTable,
}

/// Capacities assumed when a descriptor omits or garbles the relevant count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultCapacities {
    pub tables: u32,
    pub persons: u32,
    pub rooms: u32,
    pub pools: u32,
    pub event_attendees: u32,
}

/// A complete, versioned tariff schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffSchedule {
    /// Version label echoed on every result, e.g. "SACM-2017"
    pub version: String,
    pub year: u16,
    /// Currency value of one UDA
    pub uda_value: Decimal,
    /// Zone tags billed at metropolitan rates
    pub special_zones: Vec<String>,
    /// Fallback for categories without a section of their own
    pub generic_udas: Decimal,
    pub defaults: DefaultCapacities,
    pub commercial: CommercialSchedule,
    pub restaurant: RestaurantSchedule,
    pub karaoke: TierTable,
    pub hotel: HotelSchedule,
    pub discoteca: DiscotecaSchedule,
    pub nightclub: NightclubSchedule,
    pub water_park: WaterParkSchedule,
    pub events: EventSchedule,
}

impl Default for TariffSchedule {
    fn default() -> Self {
        Self::sacm_2017()
    }
}

impl TariffSchedule {
    /// SACM tariff schedule published for 2017.
    pub fn sacm_2017() -> Self {
        let recorded_tables = TierTable::known(&[
            (Some(20), 4, 0, "1-20 mesas"),
            (Some(40), 8, 0, "21-40 mesas"),
            (None, 105, 1, "41+ mesas"),
        ]);

        Self {
            version: "SACM-2017".to_string(),
            year: 2017,
            uda_value: Decimal::new(31000, 2),
            special_zones: vec![
                "cdmx".to_string(),
                "guadalajara".to_string(),
                "monterrey".to_string(),
            ],
            generic_udas: Decimal::new(4, 0),
            defaults: DefaultCapacities {
                tables: 10,
                persons: 100,
                rooms: 50,
                pools: 1,
                event_attendees: 100,
            },
            commercial: CommercialSchedule {
                gym: Decimal::new(4, 0),
                store: Decimal::new(25, 1),
                mall: Decimal::new(25, 1),
            },
            restaurant: RestaurantSchedule {
                dance: TierTable::known(&[
                    (Some(25), 8, 0, "1-25 mesas"),
                    (None, 12, 0, "26+ mesas"),
                ]),
                live_with_cover: TierTable::known(&[
                    (Some(25), 55, 1, "1-25 mesas"),
                    (None, 8, 0, "26+ mesas"),
                ]),
                live_without_cover: TierTable::known(&[
                    (Some(25), 2, 0, "1-25 mesas"),
                    (None, 4, 0, "26+ mesas"),
                ]),
                recorded: recorded_tables.clone(),
            },
            karaoke: recorded_tables,
            hotel: HotelSchedule {
                standard: HotelTables {
                    one_star: TierTable::known(&[
                        (Some(50), 28, 1, "hasta 50 hab"),
                        (None, 3, 0, "más de 50 hab"),
                    ]),
                    two_star: TierTable::known(&[
                        (Some(50), 42, 1, "hasta 50 hab"),
                        (None, 45, 1, "más de 50 hab"),
                    ]),
                    three_star: TierTable::known(&[
                        (Some(50), 56, 1, "hasta 50 hab"),
                        (None, 6, 0, "más de 50 hab"),
                    ]),
                    four_star: TierTable::known(&[
                        (Some(100), 18, 0, "hasta 100 hab"),
                        (None, 20, 0, "más de 100 hab"),
                    ]),
                    five_star: TierTable::known(&[
                        (Some(100), 45, 0, "hasta 100 hab"),
                        (None, 50, 0, "más de 100 hab"),
                    ]),
                    gran_turismo: TierTable::known(&[
                        (Some(100), 54, 0, "hasta 100 hab"),
                        (None, 60, 0, "más de 100 hab"),
                    ]),
                },
                tourist: TouristHotelTables {
                    four_star: TierTable::known(&[
                        (Some(100), 22, 0, "hasta 100 hab"),
                        (None, 25, 0, "más de 100 hab"),
                    ]),
                    five_star: TierTable::known(&[
                        (Some(170), 55, 0, "hasta 170 hab"),
                        (None, 625, 1, "más de 170 hab"),
                    ]),
                    gran_turismo: TierTable::known(&[
                        (Some(170), 66, 0, "hasta 170 hab"),
                        (None, 75, 0, "más de 170 hab"),
                    ]),
                },
            },
            discoteca: DiscotecaSchedule {
                special_high_season: TierTable::known(&[
                    (Some(250), 15, 0, "1-250 personas"),
                    (Some(500), 25, 0, "251-500 personas"),
                    (Some(750), 35, 0, "501-750 personas"),
                    (Some(1500), 45, 0, "751-1500 personas"),
                    (None, 80, 0, "1501+ personas"),
                ]),
                special_low_season: TierTable::known(&[
                    (Some(250), 10, 0, "1-250 personas"),
                    (Some(500), 15, 0, "251-500 personas"),
                    (Some(750), 20, 0, "501-750 personas"),
                    (Some(1500), 30, 0, "751-1500 personas"),
                    (None, 60, 0, "1501+ personas"),
                ]),
                general: TierTable::known(&[
                    (Some(300), 10, 0, "1-300 personas"),
                    (Some(700), 15, 0, "301-700 personas"),
                    (Some(1000), 20, 0, "701-1000 personas"),
                    (Some(2500), 40, 0, "1001-2500 personas"),
                    (None, 60, 0, "2501+ personas"),
                ]),
            },
            nightclub: NightclubSchedule {
                special: TierTable::known(&[
                    (Some(15), 10, 0, "1-15 mesas"),
                    (Some(25), 15, 0, "16-25 mesas"),
                    (None, 20, 0, "26+ mesas"),
                ]),
                general: TierTable::known(&[
                    (Some(15), 5, 0, "1-15 mesas"),
                    (Some(25), 10, 0, "16-25 mesas"),
                    (None, 15, 0, "26+ mesas"),
                ]),
            },
            water_park: WaterParkSchedule {
                recorded: TierTable::known(&[
                    (Some(1), 4, 0, "Con 1 alberca"),
                    (Some(3), 8, 0, "Con 2 a 3 albercas"),
                    (Some(5), 12, 0, "Con 4 a 5 albercas"),
                    (None, 18, 0, "Con 6+ albercas"),
                ]),
                live: TierTable::known(&[
                    (Some(1), 3, 0, "Con 1 alberca"),
                    (Some(3), 5, 0, "Con 2 a 3 albercas"),
                    (Some(5), 8, 0, "Con 4 a 5 albercas"),
                    (None, 10, 0, "Con 6+ albercas"),
                ]),
            },
            events: EventSchedule {
                ticketed_percent: Decimal::new(6, 0),
                non_ticketed: TierTable::known(&[
                    (Some(100), 30, 0, "Hasta 100 personas"),
                    (Some(200), 60, 0, "101-200 personas"),
                    (Some(300), 90, 0, "201-300 personas"),
                    (Some(400), 120, 0, "301-400 personas"),
                    (Some(500), 200, 0, "401-500 personas"),
                    (Some(600), 400, 0, "501-600 personas"),
                    (None, 600, 0, "601+ personas"),
                ]),
            },
        }
    }

    /// Every tier table in the schedule, named by its path.
    pub fn tier_tables(&self) -> Vec<(&'static str, &TierTable)> {
        let r = &self.restaurant;
        let h = &self.hotel;
        vec![
            ("restaurant.dance", &r.dance),
            ("restaurant.live_with_cover", &r.live_with_cover),
            ("restaurant.live_without_cover", &r.live_without_cover),
            ("restaurant.recorded", &r.recorded),
            ("karaoke", &self.karaoke),
            ("hotel.standard.one_star", &h.standard.one_star),
            ("hotel.standard.two_star", &h.standard.two_star),
            ("hotel.standard.three_star", &h.standard.three_star),
            ("hotel.standard.four_star", &h.standard.four_star),
            ("hotel.standard.five_star", &h.standard.five_star),
            ("hotel.standard.gran_turismo", &h.standard.gran_turismo),
            ("hotel.tourist.four_star", &h.tourist.four_star),
            ("hotel.tourist.five_star", &h.tourist.five_star),
            ("hotel.tourist.gran_turismo", &h.tourist.gran_turismo),
            ("discoteca.special_high_season", &self.discoteca.special_high_season),
            ("discoteca.special_low_season", &self.discoteca.special_low_season),
            ("discoteca.general", &self.discoteca.general),
            ("nightclub.special", &self.nightclub.special),
            ("nightclub.general", &self.nightclub.general),
            ("water_park.recorded", &self.water_park.recorded),
            ("water_park.live", &self.water_park.live),
            ("events.non_ticketed", &self.events.non_ticketed),
        ]
    }

    /// Whether a (normalized) zone tag is billed at metropolitan rates.
    pub fn is_special_zone(&self, zone: &str) -> bool {
        let zone = normalize_tag(zone);
        self.special_zones.iter().any(|z| normalize_tag(z) == zone)
    }

    /// Check the parts of a schedule that tier-table construction cannot:
    /// scalar fees, the UDA value and default capacities.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.version.trim().is_empty() {
            return Err(DomainError::InvalidSchedule("version label is empty".into()));
        }
        if self.uda_value <= Decimal::ZERO {
            return Err(DomainError::InvalidSchedule(format!(
                "UDA value must be positive, got {}",
                self.uda_value
            )));
        }

        let fixed = [
            ("generic_udas", self.generic_udas),
            ("commercial.gym", self.commercial.gym),
            ("commercial.store", self.commercial.store),
            ("commercial.mall", self.commercial.mall),
        ];
        if let Some((name, _)) = fixed.iter().find(|(_, fee)| *fee < Decimal::ZERO) {
            return Err(DomainError::InvalidSchedule(format!("{} is negative", name)));
        }

        // Every rate must convert to currency without overflowing.
        let tiered = self.tier_tables().into_iter().flat_map(|(name, table)| {
            table.tiers().iter().map(move |tier| (name, tier.udas))
        });
        if let Some((name, rate)) = fixed
            .into_iter()
            .chain(tiered)
            .find(|(_, rate)| rate.checked_mul(self.uda_value).is_none())
        {
            return Err(DomainError::InvalidSchedule(format!(
                "{} rate {} times UDA value {} overflows",
                name, rate, self.uda_value
            )));
        }

        let percent = self.events.ticketed_percent;
        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(DomainError::InvalidSchedule(format!(
                "ticketed event percentage {} is outside 0-100",
                percent
            )));
        }

        let d = &self.defaults;
        if [d.tables, d.persons, d.rooms, d.pools, d.event_attendees].contains(&0) {
            return Err(DomainError::InvalidSchedule(
                "default capacities must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────
