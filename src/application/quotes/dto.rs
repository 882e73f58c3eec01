//! Quote DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::tariff::{
    Category, EstablishmentDescriptor, HotelRating, MusicMode, Season, TariffResult, DEFAULT_ZONE,
};
use crate::shared::serializations::{self, normalize_tag, parse_flag};

/// Quote request as submitted by the quoting form.
///
/// Every field is optional at the wire level; [`Validate`] enforces the
/// four the form marks as required. Capacities are coerced leniently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteRequest {
    /// Establishment name
    #[validate(required(message = "nombre es obligatorio"))]
    #[serde(deserialize_with = "serializations::text")]
    pub nombre: Option<String>,
    /// Category tag
    #[validate(required(message = "tipo es obligatorio"))]
    #[serde(deserialize_with = "serializations::text")]
    pub tipo: Option<String>,
    #[serde(deserialize_with = "serializations::text")]
    pub direccion: Option<String>,
    #[serde(alias = "capacidad_mesas", deserialize_with = "serializations::count")]
    pub capacidad_mesas: Option<u32>,
    #[serde(alias = "capacidad_personas", deserialize_with = "serializations::count")]
    pub capacidad_personas: Option<u32>,
    #[serde(alias = "capacidad_habitaciones", deserialize_with = "serializations::count")]
    pub capacidad_habitaciones: Option<u32>,
    #[serde(alias = "numero_albercas", deserialize_with = "serializations::count")]
    pub numero_albercas: Option<u32>,
    #[serde(alias = "hotel_estrellas", deserialize_with = "serializations::text")]
    pub hotel_estrellas: Option<String>,
    #[serde(alias = "zona_turistica", deserialize_with = "serializations::text")]
    pub zona_turistica: Option<String>,
    #[serde(alias = "zona_geografica", deserialize_with = "serializations::text")]
    pub zona_geografica: Option<String>,
    #[serde(deserialize_with = "serializations::text")]
    pub temporada: Option<String>,
    #[validate(required(message = "tipoMusica es obligatorio"))]
    #[serde(alias = "tipo_musica", deserialize_with = "serializations::text")]
    pub tipo_musica: Option<String>,
    /// Yes/no answer; required even though "no" is a valid value
    #[validate(required(message = "cobraEntrada es obligatorio"))]
    #[serde(alias = "cobra_entrada", deserialize_with = "serializations::text")]
    pub cobra_entrada: Option<String>,
    #[serde(alias = "permite_baile", deserialize_with = "serializations::text")]
    pub permite_baile: Option<String>,
}

fn flag(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(parse_flag)
}

impl QuoteRequest {
    /// Normalize the form values into a calculator descriptor.
    ///
    /// Zone falls back to `general` and season to high; unrecognized tags
    /// resolve the same way [`Category::from_tag`] and friends do.
    pub fn to_descriptor(&self) -> EstablishmentDescriptor {
        let category = Category::from_tag(self.tipo.as_deref().unwrap_or_default());

        EstablishmentDescriptor {
            category,
            tables: self.capacidad_mesas,
            persons: self.capacidad_personas,
            rooms: self.capacidad_habitaciones,
            pools: self.numero_albercas,
            music: MusicMode::from_tag(self.tipo_musica.as_deref().unwrap_or_default()),
            entrance_fee: flag(&self.cobra_entrada),
            dance_permitted: flag(&self.permite_baile),
            hotel_rating: self.hotel_estrellas.as_deref().and_then(HotelRating::from_tag),
            tourist_zone: flag(&self.zona_turistica),
            zone: self
                .zona_geografica
                .as_deref()
                .map(normalize_tag)
                .filter(|zone| !zone.is_empty())
                .unwrap_or_else(|| DEFAULT_ZONE.to_string()),
            season: self
                .temporada
                .as_deref()
                .map(Season::from_tag)
                .unwrap_or_default(),
        }
    }
}

/// A computed quote, ready to be stored or rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub establishment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Normalized input the fee was computed from
    pub descriptor: EstablishmentDescriptor,
    pub result: TariffResult,
    /// Fee in currency rounded to cents
    pub total_currency: Decimal,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_form() {
        let json = r#"{
            "nombre": "La Cantina del Centro",
            "tipo": "Cantina",
            "direccion": "Av. Juárez 12",
            "capacidadMesas": "30",
            "tipoMusica": "vivo",
            "cobraEntrada": "si",
            "permiteBaile": "no",
            "zonaGeografica": "CDMX"
        }"#;
        let req: QuoteRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_ok());

        let d = req.to_descriptor();
        assert_eq!(d.category, Category::RestaurantBar);
        assert_eq!(d.tables, Some(30));
        assert_eq!(d.music, MusicMode::Live);
        assert!(d.entrance_fee);
        assert!(!d.dance_permitted);
        assert_eq!(d.zone, "cdmx");
        assert_eq!(d.season, Season::High);
    }

    #[test]
    fn snake_case_aliases_are_accepted() {
        let json = r#"{"nombre": "X", "tipo": "hotel", "capacidad_habitaciones": 80,
                       "hotel_estrellas": 5, "zona_turistica": true,
                       "tipo_musica": "grabada", "cobra_entrada": "no"}"#;
        let d = serde_json::from_str::<QuoteRequest>(json).unwrap().to_descriptor();
        assert_eq!(d.rooms, Some(80));
        assert_eq!(d.hotel_rating, Some(HotelRating::Five));
        assert!(d.tourist_zone);
    }

    #[test]
    fn missing_required_fields_fail_validation() {
        let req: QuoteRequest = serde_json::from_str(r#"{"tipo": "bar"}"#).unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("nombre"));
        assert!(fields.contains_key("tipo_musica"));
        assert!(fields.contains_key("cobra_entrada"));
        assert!(!fields.contains_key("tipo"));
    }

    #[test]
    fn blank_strings_count_as_missing() {
        let req = QuoteRequest {
            nombre: Some("Bar".into()),
            tipo: Some("bar".into()),
            tipo_musica: Some("grabada".into()),
            ..Default::default()
        };
        assert!(req.validate().is_err());

        let req: QuoteRequest = serde_json::from_str(
            r#"{"nombre": "  ", "tipo": "bar", "tipoMusica": "grabada", "cobraEntrada": "no"}"#,
        )
        .unwrap();
        assert_eq!(req.nombre, None);
        assert!(req.validate().is_err());
    }

    #[test]
    fn garbage_capacities_fall_back_to_none() {
        let req: QuoteRequest =
            serde_json::from_str(r#"{"capacidadMesas": "muchas", "numeroAlbercas": -2}"#).unwrap();
        let d = req.to_descriptor();
        assert_eq!(d.tables, None);
        assert_eq!(d.pools, None);
        assert_eq!(d.category, Category::Generic);
        assert_eq!(d.zone, DEFAULT_ZONE);
    }
}
