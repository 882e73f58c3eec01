//! Property tests for the tariff calculator.

use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::Value;

use sacm_tariff::{
    compute_tariff, Category, CommercialKind, EstablishmentDescriptor, HotelRating, MusicMode,
    Season, TariffCalculator,
};

fn category() -> impl Strategy<Value = Category> {
    prop_oneof![
        Just(Category::RestaurantBar),
        Just(Category::Hotel),
        Just(Category::Discoteca),
        Just(Category::CentroNocturno),
        Just(Category::WaterPark),
        Just(Category::Karaoke),
        Just(Category::Commercial(CommercialKind::Gym)),
        Just(Category::Commercial(CommercialKind::Store)),
        Just(Category::Commercial(CommercialKind::Mall)),
        Just(Category::Generic),
    ]
}

fn music() -> impl Strategy<Value = MusicMode> {
    prop_oneof![
        Just(MusicMode::Recorded),
        Just(MusicMode::Live),
        Just(MusicMode::Mixed),
        Just(MusicMode::None),
    ]
}

fn rating() -> impl Strategy<Value = Option<HotelRating>> {
    proptest::option::of(prop_oneof![
        Just(HotelRating::One),
        Just(HotelRating::Two),
        Just(HotelRating::Three),
        Just(HotelRating::Four),
        Just(HotelRating::Five),
        Just(HotelRating::GranTurismo),
    ])
}

fn count() -> impl Strategy<Value = Option<u32>> {
    proptest::option::of(prop_oneof![0u32..3000, any::<u32>()])
}

prop_compose! {
    fn descriptor()(
        category in category(),
        tables in count(),
        persons in count(),
        rooms in count(),
        pools in count(),
        music in music(),
        entrance_fee in any::<bool>(),
        dance_permitted in any::<bool>(),
        hotel_rating in rating(),
        tourist_zone in any::<bool>(),
        zone in prop_oneof![
            Just("general"), Just("cdmx"), Just("guadalajara"), Just("monterrey"), Just("puebla")
        ],
        low_season in any::<bool>(),
    ) -> EstablishmentDescriptor {
        EstablishmentDescriptor {
            category,
            tables,
            persons,
            rooms,
            pools,
            music,
            entrance_fee,
            dance_permitted,
            hotel_rating,
            tourist_zone,
            zone: zone.to_string(),
            season: if low_season { Season::Low } else { Season::High },
        }
    }
}

fn json_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| serde_json::json!(n)),
        (-1.0e12f64..1.0e12).prop_map(|f| serde_json::json!(f)),
        "[a-zA-Z0-9 áéíóúñ_-]{0,20}".prop_map(Value::String),
        prop::collection::vec(any::<u8>().prop_map(|b| serde_json::json!(b)), 0..3)
            .prop_map(Value::Array),
    ]
}

// One name per field: an alias next to its field is a duplicate-key error.
const FIELDS: &[&str] = &[
    "category",
    "tables",
    "persons",
    "rooms",
    "pools",
    "music",
    "entrance_fee",
    "dance_permitted",
    "hotel_rating",
    "tourist_zone",
    "zone",
    "season",
];

proptest! {
    /// Currency is always the UDA fee times the schedule's UDA value.
    #[test]
    fn currency_matches_udas(d in descriptor()) {
        let r = compute_tariff(&d);
        prop_assert_eq!(r.fee_currency, r.fee_udas * r.uda_value);
        prop_assert!(r.fee_udas >= Decimal::ZERO);
        prop_assert!(!r.rationale.is_empty());
    }

    /// Identical descriptors give identical results.
    #[test]
    fn compute_is_deterministic(d in descriptor()) {
        let calc = TariffCalculator::default();
        prop_assert_eq!(calc.compute(&d), calc.compute(&d.clone()));
    }

    /// Allowing dance never lowers a restaurant's fee.
    #[test]
    fn dance_never_lowers_restaurant_fee(
        tables in 1u32..200,
        music in music(),
        cover in any::<bool>(),
    ) {
        let base = EstablishmentDescriptor::new(Category::RestaurantBar)
            .with_tables(tables)
            .with_music(music)
            .with_entrance_fee(cover);
        let with_dance = compute_tariff(&base.clone().with_dance(true));
        let without = compute_tariff(&base);
        prop_assert!(with_dance.fee_udas >= without.fee_udas);
    }

    /// More capacity never costs less.
    #[test]
    fn fee_is_monotone_in_capacity(d in descriptor(), a in 1u32..5000, b in 1u32..5000) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let at = |n: u32| {
            let mut d = d.clone();
            d.tables = Some(n);
            d.persons = Some(n);
            d.rooms = Some(n);
            d.pools = Some(n);
            compute_tariff(&d).fee_udas
        };
        prop_assert!(at(lo) <= at(hi));
    }

    /// Only music-less restaurants and water parks without recorded or live
    /// music owe nothing.
    #[test]
    fn only_silent_venues_are_exempt(d in descriptor()) {
        let r = compute_tariff(&d);
        let silent = (d.category == Category::WaterPark
            && matches!(d.music, MusicMode::None | MusicMode::Mixed))
            || (d.category == Category::RestaurantBar
                && d.music == MusicMode::None
                && !d.dance_permitted);
        prop_assert_eq!(r.is_exempt(), silent);
        prop_assert_eq!(r.section.is_empty(), silent);
    }

    /// Any JSON object deserializes into a descriptor the calculator accepts.
    #[test]
    fn arbitrary_json_never_panics(
        fields in prop::collection::btree_map(prop::sample::select(FIELDS), json_scalar(), 0..10)
    ) {
        let object: serde_json::Map<String, Value> =
            fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        let descriptor: EstablishmentDescriptor =
            serde_json::from_value(Value::Object(object)).unwrap();
        let r = compute_tariff(&descriptor);
        prop_assert_eq!(r.fee_currency, r.fee_udas * r.uda_value);
    }

    /// Ticketed events pay the schedule percentage of non-negative gross.
    #[test]
    fn ticketed_fee_is_a_share_of_gross(cents in -1_000_000_000i64..1_000_000_000_000) {
        let gross = Decimal::new(cents, 2);
        let fee = TariffCalculator::default().ticketed_event(gross);
        let expected = gross.max(Decimal::ZERO) * Decimal::new(6, 2);
        prop_assert_eq!(fee.fee_currency, expected);
        prop_assert!(fee.fee_currency >= Decimal::ZERO);
    }
}
