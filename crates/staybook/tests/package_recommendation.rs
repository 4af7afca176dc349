//! Recommendation and pricing scenarios exercised through the public package API.

use std::io::Cursor;

use staybook::workflows::packages::{
    compute_total, quote_stay, recommend, recommend_packages, CatalogError, CatalogSnapshot,
    Entitlement, PackageCategory, PackageDefinition, PackageId, PackageRates, QuoteRequest,
    RateCalculator, RecommendationRequest,
};

fn entry(id: &str, min: u32, max: u32, multiplier: f64, required: Entitlement) -> PackageDefinition {
    PackageDefinition {
        id: PackageId(id.to_string()),
        title: id.to_string(),
        description: String::new(),
        multiplier,
        min_nights: min,
        max_nights: max,
        category: PackageCategory::Standard,
        entitlement_required: required,
        features: Vec::new(),
    }
}

#[test]
fn single_entry_catalog_is_both_eligible_and_primary() {
    let catalog = CatalogSnapshot::new(vec![entry("basic", 1, 7, 1.0, Entitlement::None)]);

    let (eligible, primary) = recommend_packages(&catalog, 3, Entitlement::None, false);

    assert_eq!(eligible.len(), 1);
    assert_eq!(primary.expect("primary").id.0, "basic");
}

#[test]
fn uncovered_stay_yields_nothing() {
    let catalog = CatalogSnapshot::new(vec![
        entry("short", 1, 6, 1.0, Entitlement::None),
        entry("long", 14, 30, 0.8, Entitlement::Standard),
    ]);

    let (eligible, primary) = recommend_packages(&catalog, 10, Entitlement::Standard, false);

    assert!(eligible.is_empty());
    assert!(primary.is_none());
}

#[test]
fn anonymous_guests_never_see_gated_packages() {
    let catalog = CatalogSnapshot::standard();

    for nights in 1..=95 {
        let (eligible, _) = recommend_packages(&catalog, nights, Entitlement::None, false);
        assert!(
            eligible
                .iter()
                .all(|package| package.entitlement_required == Entitlement::None),
            "gated package offered for {nights} nights"
        );
    }
}

#[test]
fn pro_with_addons_sees_every_covering_entry() {
    let catalog = CatalogSnapshot::standard();

    for nights in [1_i64, 7, 14, 21, 45, 90] {
        let (eligible, _) = recommend_packages(&catalog, nights, Entitlement::Pro, true);
        let expected: Vec<&str> = catalog
            .packages()
            .iter()
            .filter(|package| package.covers(nights as u32))
            .map(|package| package.id.0.as_str())
            .collect();
        let actual: Vec<&str> = eligible.iter().map(|package| package.id.0.as_str()).collect();
        assert_eq!(actual, expected, "mismatch at {nights} nights");
    }
}

#[test]
fn hosted_preference_overrides_standard_primary() {
    let catalog = CatalogSnapshot::standard();
    let request = RecommendationRequest::new(3, Entitlement::Pro, false);

    let plain = recommend(&catalog, &request);
    assert_eq!(plain.primary.expect("primary").id.0, "per_night");

    let hosted = recommend(&catalog, &request.prefer_hosted(true));
    assert_eq!(hosted.primary.expect("primary").id.0, "hosted");
}

#[test]
fn worked_total_example() {
    assert_eq!(compute_total(150.0, 5, 1.2), 900.0);
}

#[test]
fn json_catalog_drives_quotes() {
    let raw = r#"[
        { "id": "loft", "title": "Loft week", "multiplier": 0.8, "min_nights": 5, "max_nights": 10 },
        { "id": "breakfast", "title": "Breakfast", "multiplier": 1.1, "min_nights": 1, "max_nights": 30, "category": "addon" }
    ]"#;
    let catalog = CatalogSnapshot::from_json_reader(Cursor::new(raw)).expect("catalog parses");

    let quote = quote_stay(
        &catalog,
        &RateCalculator::new(100.0),
        &QuoteRequest {
            nights: Some(5),
            include_addons: true,
            ..QuoteRequest::default()
        },
        Entitlement::None,
        &PackageRates::new(),
    );

    assert_eq!(quote.packages.len(), 2);
    let primary = quote.primary.expect("loft is primary");
    assert_eq!(primary.package.id.0, "loft");
    assert_eq!(primary.display_total, 400.0);
    assert_eq!(primary.adjustment_label, "-20%");
}

#[test]
fn json_catalog_rejects_invalid_entries() {
    let raw = r#"[{ "id": "bad", "title": "Bad", "multiplier": 9.0, "min_nights": 1, "max_nights": 2 }]"#;

    match CatalogSnapshot::from_json_str(raw) {
        Err(CatalogError::InvalidPackage { id, .. }) => assert_eq!(id, "bad"),
        other => panic!("expected invalid package, got {other:?}"),
    }
}
