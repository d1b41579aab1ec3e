use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use sales_predict::assemble::{assemble_features, MatchMethod};
use sales_predict::lags::LagFeatures;
use sales_predict::normalize::TokenMatch;
use sales_predict::temporal::calendar_features;

fn feature_list(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn sample_lags() -> LagFeatures {
    LagFeatures {
        lag_1: 120.0,
        lag_7: 100.0,
        lag_30: 0.0,
        roll_7: 110.0,
        roll_30: 105.0,
    }
}

#[test]
fn test_vector_matches_trained_length_and_order() {
    let features = feature_list(&[
        "sales_lag_1",
        "year",
        "Category_Electronics",
        "is_weekend",
        "month",
    ]);
    let calendar = calendar_features(NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());

    let (vector, _) = assemble_features(
        &features,
        &calendar,
        &sample_lags(),
        &[(
            "Category",
            "Electronics",
            TokenMatch::Exact("Electronics".to_string()),
        )],
    );

    // Exactly one entry per trained feature, in trained order
    assert_eq!(vector.len(), features.len());
    assert_eq!(vector.values(), &[120.0, 2024.0, 1.0, 1.0, 1.0][..]);
}

#[test]
fn test_absent_sources_stay_zero() {
    let features = feature_list(&["year", "sales_lag_30", "City_Dhaka"]);
    let calendar = calendar_features(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

    let (vector, report) = assemble_features(&features, &calendar, &sample_lags(), &[]);

    assert_eq!(vector.values()[1], 0.0);
    assert_eq!(vector.values()[2], 0.0);
    assert!(report.matched.is_empty());
    assert!(report.unmatched.is_empty());
}

#[test]
fn test_computed_features_without_trained_column_are_discarded() {
    // Training never saw lag or weekday columns here
    let features = feature_list(&["year", "month"]);
    let calendar = calendar_features(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());

    let (vector, _) = assemble_features(&features, &calendar, &sample_lags(), &[]);

    assert_eq!(vector.len(), 2);
    assert_eq!(vector.values(), &[2024.0, 3.0][..]);
}

#[test]
fn test_reference_token_yields_all_zero_encoding() {
    // "Electronics" was the dropped reference during training: no dummy
    // column exists, and that is a correct encoding, not an error.
    let features = feature_list(&["Category_Furniture", "Category_Office Supplies"]);
    let calendar = calendar_features(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

    let (vector, report) = assemble_features(
        &features,
        &calendar,
        &LagFeatures::default(),
        &[(
            "Category",
            "Electronics",
            TokenMatch::Exact("Electronics".to_string()),
        )],
    );

    assert_eq!(vector.values(), &[0.0, 0.0][..]);
    // The attribute still counts as matched in the report
    assert_eq!(report.matched["Category"].token, "Electronics");
}

#[test]
fn test_fuzzy_match_sets_dummy_and_records_method() {
    let features = feature_list(&["Subcategory_Phones"]);
    let calendar = calendar_features(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

    let (vector, report) = assemble_features(
        &features,
        &calendar,
        &LagFeatures::default(),
        &[(
            "Subcategory",
            "Fones",
            TokenMatch::Fuzzy {
                token: "Phones".to_string(),
                score: 0.67,
            },
        )],
    );

    assert_eq!(vector.values(), &[1.0][..]);
    let resolved = &report.matched["Subcategory"];
    assert_eq!(resolved.method, MatchMethod::Fuzzy);
    assert_eq!(resolved.score, Some(0.67));
}

#[test]
fn test_unmatched_attribute_probes_raw_value() {
    // Normalization failed, but the raw value happens to name a trained
    // column; the dummy is set as a last resort while the miss is still
    // reported.
    let features = feature_list(&["City_Dhaka"]);
    let calendar = calendar_features(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

    let (vector, report) = assemble_features(
        &features,
        &calendar,
        &LagFeatures::default(),
        &[("City", " Dhaka ", TokenMatch::NoMatch)],
    );

    assert_eq!(vector.values(), &[1.0][..]);
    assert_eq!(report.unmatched, vec!["City".to_string()]);
}

#[test]
fn test_unmatched_attribute_without_column_stays_zero() {
    let features = feature_list(&["City_Dhaka"]);
    let calendar = calendar_features(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

    let (vector, report) = assemble_features(
        &features,
        &calendar,
        &LagFeatures::default(),
        &[("City", "Atlantis", TokenMatch::NoMatch)],
    );

    assert_eq!(vector.values(), &[0.0][..]);
    assert_eq!(report.unmatched, vec!["City".to_string()]);
}
