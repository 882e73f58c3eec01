//! Tariff domain entities
//!
//! Venue descriptor going into the calculator and the fee breakdown coming out.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::shared::serializations::{self, normalize_tag};

/// Zone tag used when the request does not name one
pub const DEFAULT_ZONE: &str = "general";

/// Kind of commercial venue with background music
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommercialKind {
    Gym,
    Store,
    Mall,
}

/// Establishment category.
///
/// Every tag maps to exactly one variant; tags outside the schedule land on
/// [`Category::Generic`] instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    /// Restaurants, restaurant-bars, bars and cantinas
    RestaurantBar,
    /// Hotels and motels
    Hotel,
    /// Discotecas and antros with dancing
    Discoteca,
    /// Night clubs
    CentroNocturno,
    /// Water parks and balnearios
    WaterPark,
    Karaoke,
    Commercial(CommercialKind),
    /// Anything not covered by a specific section
    #[default]
    Generic,
}

impl Category {
    /// Resolve a free-form tag (`"Restaurante"`, `"centro nocturno"`, `"Balneario"`...).
    pub fn from_tag(tag: &str) -> Self {
        match normalize_tag(tag).as_str() {
            "restaurante" | "restaurant" | "restaurante_bar" | "bar" | "cantina" => {
                Self::RestaurantBar
            }
            "hotel" | "motel" => Self::Hotel,
            "discoteca" | "disco" | "antro" => Self::Discoteca,
            "centro_nocturno" => Self::CentroNocturno,
            "parque_acuatico" | "balneario" => Self::WaterPark,
            "karaoke" => Self::Karaoke,
            "gimnasio" | "gym" => Self::Commercial(CommercialKind::Gym),
            "tienda" | "store" => Self::Commercial(CommercialKind::Store),
            "centro_comercial" | "mall" => Self::Commercial(CommercialKind::Mall),
            _ => Self::Generic,
        }
    }

    /// Canonical tag, accepted back by [`Category::from_tag`].
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::RestaurantBar => "restaurante",
            Self::Hotel => "hotel",
            Self::Discoteca => "discoteca",
            Self::CentroNocturno => "centro_nocturno",
            Self::WaterPark => "parque_acuatico",
            Self::Karaoke => "karaoke",
            Self::Commercial(CommercialKind::Gym) => "gimnasio",
            Self::Commercial(CommercialKind::Store) => "tienda",
            Self::Commercial(CommercialKind::Mall) => "centro_comercial",
            Self::Generic => "general",
        }
    }

    /// Category heading as printed in the tariff schedule.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RestaurantBar => "Restaurantes, Restaurantes Bar, Bares, Cantinas",
            Self::Hotel => "Hoteles y Moteles",
            Self::Discoteca => "Discotecas o Antros con Baile",
            Self::CentroNocturno => "Centros Nocturnos",
            Self::WaterPark => "Balnearios, Parques Acuáticos y Similares",
            Self::Karaoke => "Karaoke",
            Self::Commercial(_) => "Establecimientos Comerciales",
            Self::Generic => "Establecimiento General",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

/// How music is played in the venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MusicMode {
    Recorded,
    Live,
    /// Recorded and live music
    Mixed,
    #[default]
    None,
}

impl MusicMode {
    pub fn from_tag(tag: &str) -> Self {
        match normalize_tag(tag).as_str() {
            "grabada" | "recorded" => Self::Recorded,
            "vivo" | "en_vivo" | "live" => Self::Live,
            "mixta" | "mixed" => Self::Mixed,
            _ => Self::None,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Recorded => "grabada",
            Self::Live => "vivo",
            Self::Mixed => "mixta",
            Self::None => "ninguna",
        }
    }

    /// Live or mixed: anything with performers on site.
    pub fn has_live(&self) -> bool {
        matches!(self, Self::Live | Self::Mixed)
    }
}

impl fmt::Display for MusicMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

/// Hotel classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HotelRating {
    One,
    Two,
    Three,
    Four,
    Five,
    GranTurismo,
}

impl HotelRating {
    /// Rating used when the request gives none or an unrecognized one.
    pub const FALLBACK: HotelRating = HotelRating::Three;

    /// Accepts `"3"`, `"3 estrellas"`, `"gran_turismo"`, `"GT"`...
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = normalize_tag(tag);
        if matches!(tag.as_str(), "gran_turismo" | "granturismo" | "gt") {
            return Some(Self::GranTurismo);
        }
        // A single leading digit: "10" is not a rating.
        match tag.chars().next() {
            Some('1') => Some(Self::One),
            Some('2') => Some(Self::Two),
            Some('3') => Some(Self::Three),
            Some('4') => Some(Self::Four),
            Some('5') => Some(Self::Five),
            _ => None,
        }
        .filter(|_| tag.len() == 1 || !tag.as_bytes()[1].is_ascii_digit())
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::One => "1",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::GranTurismo => "gran_turismo",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::One => "Hotel 1 estrella",
            Self::Two => "Hotel 2 estrellas",
            Self::Three => "Hotel 3 estrellas",
            Self::Four => "Hotel 4 estrellas",
            Self::Five => "Hotel 5 estrellas",
            Self::GranTurismo => "Hotel Gran Turismo",
        }
    }
}

impl fmt::Display for HotelRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

/// Tourist season, only meaningful for discotecas in special zones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Season {
    #[default]
    High,
    Low,
}

impl Season {
    pub fn from_tag(tag: &str) -> Self {
        match normalize_tag(tag).as_str() {
            "baja" | "low" => Self::Low,
            _ => Self::High,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::High => "alta",
            Self::Low => "baja",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

/// Period a fee is charged for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingPeriod {
    Daily,
    Monthly,
    PerEvent,
    PercentageOfGross,
}

impl BillingPeriod {
    /// Spanish unit used in rationale lines ("8 UDAs por día").
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Daily => "día",
            Self::Monthly => "mes",
            Self::PerEvent => "evento",
            Self::PercentageOfGross => "taquilla",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Monthly => "monthly",
            Self::PerEvent => "per_event",
            Self::PercentageOfGross => "percentage_of_gross",
        }
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

macro_rules! tag_serde {
    ($ty:ty, $parse:expr) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_tag())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                Ok(serializations::text(deserializer)?
                    .map(|tag| $parse(&tag))
                    .unwrap_or_default())
            }
        }
    };
}

tag_serde!(Category, Category::from_tag);
tag_serde!(MusicMode, MusicMode::from_tag);
tag_serde!(Season, Season::from_tag);

impl Serialize for HotelRating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_tag())
    }
}

fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<HotelRating>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(serializations::text(deserializer)?.and_then(|tag| HotelRating::from_tag(&tag)))
}

fn lenient_zone<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(serializations::text(deserializer)?
        .map(|zone| normalize_tag(&zone))
        .unwrap_or_else(|| DEFAULT_ZONE.to_string()))
}

/// Venue attributes consumed by the calculator.
///
/// Only the fields relevant to the category are consulted. Field aliases
/// accept the snake_case names used by the quoting form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstablishmentDescriptor {
    #[serde(alias = "tipo_establecimiento", alias = "tipo")]
    pub category: Category,
    #[serde(alias = "capacidad_mesas", deserialize_with = "serializations::count")]
    pub tables: Option<u32>,
    #[serde(alias = "capacidad_personas", deserialize_with = "serializations::count")]
    pub persons: Option<u32>,
    #[serde(alias = "capacidad_habitaciones", deserialize_with = "serializations::count")]
    pub rooms: Option<u32>,
    #[serde(alias = "numero_albercas", deserialize_with = "serializations::count")]
    pub pools: Option<u32>,
    #[serde(alias = "tipo_musica")]
    pub music: MusicMode,
    #[serde(
        alias = "costo_entrada",
        alias = "cobra_entrada",
        deserialize_with = "serializations::flag"
    )]
    pub entrance_fee: bool,
    #[serde(alias = "permite_baile", deserialize_with = "serializations::flag")]
    pub dance_permitted: bool,
    #[serde(alias = "hotel_estrellas", deserialize_with = "lenient_rating")]
    pub hotel_rating: Option<HotelRating>,
    #[serde(alias = "zona_turistica", deserialize_with = "serializations::flag")]
    pub tourist_zone: bool,
    #[serde(alias = "zona_geografica", deserialize_with = "lenient_zone")]
    pub zone: String,
    #[serde(alias = "temporada")]
    pub season: Season,
}

impl Default for EstablishmentDescriptor {
    fn default() -> Self {
        Self::new(Category::Generic)
    }
}

impl EstablishmentDescriptor {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            tables: None,
            persons: None,
            rooms: None,
            pools: None,
            music: MusicMode::None,
            entrance_fee: false,
            dance_permitted: false,
            hotel_rating: None,
            tourist_zone: false,
            zone: DEFAULT_ZONE.to_string(),
            season: Season::High,
        }
    }

    pub fn with_tables(mut self, tables: u32) -> Self {
        self.tables = Some(tables);
        self
    }

    pub fn with_persons(mut self, persons: u32) -> Self {
        self.persons = Some(persons);
        self
    }

    pub fn with_rooms(mut self, rooms: u32) -> Self {
        self.rooms = Some(rooms);
        self
    }

    pub fn with_pools(mut self, pools: u32) -> Self {
        self.pools = Some(pools);
        self
    }

    pub fn with_music(mut self, music: MusicMode) -> Self {
        self.music = music;
        self
    }

    pub fn with_entrance_fee(mut self, entrance_fee: bool) -> Self {
        self.entrance_fee = entrance_fee;
        self
    }

    pub fn with_dance(mut self, dance_permitted: bool) -> Self {
        self.dance_permitted = dance_permitted;
        self
    }

    pub fn with_rating(mut self, rating: HotelRating) -> Self {
        self.hotel_rating = Some(rating);
        self
    }

    pub fn with_tourist_zone(mut self, tourist_zone: bool) -> Self {
        self.tourist_zone = tourist_zone;
        self
    }

    pub fn with_zone(mut self, zone: &str) -> Self {
        self.zone = normalize_tag(zone);
        self
    }

    pub fn with_season(mut self, season: Season) -> Self {
        self.season = season;
        self
    }
}

/// Fee breakdown for one establishment.
///
/// Built only through [`TariffResult::new`], which derives `fee_currency`
/// from `fee_udas` so the two never drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffResult {
    /// Category heading
    pub category: String,
    /// Schedule section that applied (empty when nothing is owed)
    pub section: String,
    pub billing_period: BillingPeriod,
    pub fee_udas: Decimal,
    /// `fee_udas * uda_value`, unrounded
    pub fee_currency: Decimal,
    /// Currency value of one UDA in the schedule used
    pub uda_value: Decimal,
    pub schedule_version: String,
    /// Why the fee came out this way, in evaluation order
    pub rationale: Vec<String>,
}

impl TariffResult {
    pub fn new(
        category: impl Into<String>,
        section: impl Into<String>,
        billing_period: BillingPeriod,
        fee_udas: Decimal,
        uda_value: Decimal,
        schedule_version: impl Into<String>,
        rationale: Vec<String>,
    ) -> Self {
        Self {
            category: category.into(),
            section: section.into(),
            billing_period,
            fee_udas,
            fee_currency: fee_udas * uda_value,
            uda_value,
            schedule_version: schedule_version.into(),
            rationale,
        }
    }

    /// Currency fee rounded to cents, as stored on a quote.
    pub fn fee_currency_rounded(&self) -> Decimal {
        self.fee_currency.round_dp(2)
    }

    /// No fee applies (e.g. a restaurant without music).
    pub fn is_exempt(&self) -> bool {
        self.fee_udas.is_zero()
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_synonyms_are_case_insensitive() {
        for tag in ["Restaurante", "restaurante", "Bar", "bar", "Cantina", "CANTINA"] {
            assert_eq!(Category::from_tag(tag), Category::RestaurantBar, "{tag}");
        }
        assert_eq!(Category::from_tag("Motel"), Category::Hotel);
        assert_eq!(Category::from_tag("Antro"), Category::Discoteca);
        assert_eq!(Category::from_tag("Centro Nocturno"), Category::CentroNocturno);
        assert_eq!(Category::from_tag("Parque Acuático"), Category::WaterPark);
        assert_eq!(Category::from_tag("balneario"), Category::WaterPark);
        assert_eq!(Category::from_tag("Karaoke"), Category::Karaoke);
    }

    #[test]
    fn commercial_tags_resolve_to_their_kind() {
        assert_eq!(
            Category::from_tag("gimnasio"),
            Category::Commercial(CommercialKind::Gym)
        );
        assert_eq!(
            Category::from_tag("centro_comercial"),
            Category::Commercial(CommercialKind::Mall)
        );
    }

    #[test]
    fn unknown_category_is_generic() {
        assert_eq!(Category::from_tag("spa"), Category::Generic);
        assert_eq!(Category::from_tag(""), Category::Generic);
    }

    #[test]
    fn category_tags_round_trip() {
        let all = [
            Category::RestaurantBar,
            Category::Hotel,
            Category::Discoteca,
            Category::CentroNocturno,
            Category::WaterPark,
            Category::Karaoke,
            Category::Commercial(CommercialKind::Gym),
            Category::Commercial(CommercialKind::Store),
            Category::Commercial(CommercialKind::Mall),
            Category::Generic,
        ];
        for category in all {
            assert_eq!(Category::from_tag(category.as_tag()), category);
        }
    }

    #[test]
    fn music_mode_parsing() {
        assert_eq!(MusicMode::from_tag("grabada"), MusicMode::Recorded);
        assert_eq!(MusicMode::from_tag("Vivo"), MusicMode::Live);
        assert_eq!(MusicMode::from_tag("mixta"), MusicMode::Mixed);
        assert_eq!(MusicMode::from_tag("ninguna"), MusicMode::None);
        assert!(MusicMode::Mixed.has_live());
        assert!(!MusicMode::Recorded.has_live());
    }

    #[test]
    fn hotel_rating_parsing() {
        assert_eq!(HotelRating::from_tag("3"), Some(HotelRating::Three));
        assert_eq!(HotelRating::from_tag("5 estrellas"), Some(HotelRating::Five));
        assert_eq!(HotelRating::from_tag("Gran Turismo"), Some(HotelRating::GranTurismo));
        assert_eq!(HotelRating::from_tag("GT"), Some(HotelRating::GranTurismo));
        assert_eq!(HotelRating::from_tag("7"), None);
        assert_eq!(HotelRating::from_tag("10"), None);
        assert_eq!(HotelRating::from_tag("lujo"), None);
    }

    #[test]
    fn season_defaults_to_high() {
        assert_eq!(Season::from_tag("baja"), Season::Low);
        assert_eq!(Season::from_tag("alta"), Season::High);
        assert_eq!(Season::from_tag("whatever"), Season::High);
    }

    #[test]
    fn descriptor_deserializes_form_field_names() {
        let json = r#"{
            "tipo_establecimiento": "Bar",
            "capacidad_mesas": "30",
            "tipo_musica": "vivo",
            "costo_entrada": "si",
            "permite_baile": "no",
            "zona_geografica": "CDMX",
            "temporada": "baja"
        }"#;
        let d: EstablishmentDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(d.category, Category::RestaurantBar);
        assert_eq!(d.tables, Some(30));
        assert_eq!(d.music, MusicMode::Live);
        assert!(d.entrance_fee);
        assert!(!d.dance_permitted);
        assert_eq!(d.zone, "cdmx");
        assert_eq!(d.season, Season::Low);
    }

    #[test]
    fn descriptor_defaults_missing_fields() {
        let d: EstablishmentDescriptor = serde_json::from_str(r#"{"category": "hotel"}"#).unwrap();
        assert_eq!(d.category, Category::Hotel);
        assert_eq!(d.rooms, None);
        assert_eq!(d.hotel_rating, None);
        assert_eq!(d.zone, DEFAULT_ZONE);
        assert_eq!(d.season, Season::High);
        assert!(!d.tourist_zone);
    }

    #[test]
    fn descriptor_tolerates_malformed_values() {
        let json = r#"{
            "category": 42,
            "tables": "muchas",
            "hotel_rating": "diamante",
            "music": null,
            "zone": ""
        }"#;
        let d: EstablishmentDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(d.category, Category::Generic);
        assert_eq!(d.tables, None);
        assert_eq!(d.hotel_rating, None);
        assert_eq!(d.music, MusicMode::None);
        assert_eq!(d.zone, DEFAULT_ZONE);
    }

    #[test]
    fn numeric_hotel_rating_is_accepted() {
        let d: EstablishmentDescriptor =
            serde_json::from_str(r#"{"category": "hotel", "hotel_estrellas": 4}"#).unwrap();
        assert_eq!(d.hotel_rating, Some(HotelRating::Four));
    }

    #[test]
    fn result_currency_is_derived_from_udas() {
        let r = TariffResult::new(
            "Karaoke",
            "",
            BillingPeriod::Monthly,
            Decimal::new(105, 1),
            Decimal::new(31000, 2),
            "SACM-2017",
            vec![],
        );
        assert_eq!(r.fee_currency, Decimal::new(3255, 0));
        assert_eq!(r.fee_currency_rounded(), Decimal::new(325500, 2));
        assert!(!r.is_exempt());
    }

    #[test]
    fn billing_period_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&BillingPeriod::PercentageOfGross).unwrap(),
            "\"percentage_of_gross\""
        );
        assert_eq!(BillingPeriod::Daily.unit(), "día");
    }
}
