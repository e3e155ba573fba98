use chrono::TimeZone;
use serde_json::json;

use super::*;

fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
}

fn normalize(raw: &Value) -> NormalizedBatch {
    normalize_products_at(raw, "Phones", "https://www.daraz.lk/smartphones/", 0, at()).unwrap()
}

// -----------------------------------------------------------------------
// normalize_products_at
// -----------------------------------------------------------------------

#[test]
fn normalizes_complete_record() {
    let raw = json!([{
        "sold": 1200,
        "reviews": 45,
        "rating": 4.5,
        "price": 12500,
        "name": "X",
        "seller": "Y",
        "productUrl": "u"
    }]);
    let batch = normalize(&raw);
    assert_eq!(batch.skipped, 0);
    assert_eq!(batch.products.len(), 1);

    let p = &batch.products[0];
    assert_eq!(p.score, 520.5);
    assert_eq!(p.price_value, 12500.0);
    assert_eq!(p.price, "Rs. 12,500");
    assert_eq!(p.funnel_stage, FunnelStage::Scraped);
    assert_eq!(p.name, "X");
    assert_eq!(p.seller, "Y");
    assert_eq!(p.product_url, "u");
    assert_eq!(p.category, "Phones");
    assert_eq!(p.source_url, "https://www.daraz.lk/smartphones/");
    assert_eq!(p.sold, 1200);
    assert_eq!(p.reviews, 45);
    assert_eq!(p.scraped_at, at());
}

#[test]
fn missing_rating_defaults_to_zero() {
    let raw = json!([{ "sold": 10, "reviews": 10, "name": "X" }]);
    let p = &normalize(&raw).products[0];
    assert_eq!(p.rating, 0.0);
    assert_eq!(p.score, 7.0);
}

#[test]
fn empty_record_gets_all_defaults() {
    let p = &normalize(&json!([{}])).products[0];
    assert_eq!(p.name, "N/A");
    assert_eq!(p.seller, "N/A");
    assert_eq!(p.sold, 0);
    assert_eq!(p.reviews, 0);
    assert_eq!(p.price, "Rs. 0");
    assert_eq!(p.product_url, "");
    assert_eq!(p.score, 0.0);
}

#[test]
fn ids_share_one_epoch_and_count_from_batch_start() {
    let raw = json!([{ "name": "a" }, { "name": "b" }, { "name": "c" }]);
    let batch = normalize_products_at(&raw, "Racks (Page 2)", "src", 10, at()).unwrap();
    let epoch = at().timestamp();
    let ids: Vec<String> = batch.products.into_iter().map(|p| p.id).collect();
    assert_eq!(
        ids,
        vec![
            format!("Racks (Page 2)_10_{epoch}"),
            format!("Racks (Page 2)_11_{epoch}"),
            format!("Racks (Page 2)_12_{epoch}"),
        ]
    );
}

#[test]
fn non_object_elements_are_skipped_not_fatal() {
    let raw = json!([{ "name": "a" }, "garbage", 42, null, { "name": "b" }]);
    let batch = normalize(&raw);
    assert_eq!(batch.skipped, 3);
    let names: Vec<&str> = batch.products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["a", "b"]);
    // Positions in the reply are kept in the id, so the gap shows.
    assert!(batch.products[1].id.starts_with("Phones_4_"));
}

#[test]
fn negative_counts_and_price_clamp_to_zero() {
    let raw = json!([{ "sold": -5, "reviews": -1, "price": -100, "rating": 4.0 }]);
    let p = &normalize(&raw).products[0];
    assert_eq!(p.sold, 0);
    assert_eq!(p.reviews, 0);
    assert_eq!(p.price_value, 0.0);
    assert_eq!(p.price, "Rs. 0");
    assert_eq!(p.score, 24.0);
}

#[test]
fn fractional_counts_round_to_nearest() {
    let raw = json!([{ "sold": 10.6, "reviews": "2.4" }]);
    let p = &normalize(&raw).products[0];
    assert_eq!(p.sold, 11);
    assert_eq!(p.reviews, 2);
}

#[test]
fn rating_is_not_clamped() {
    let raw = json!([{ "rating": 7.5 }]);
    let p = &normalize(&raw).products[0];
    assert_eq!(p.rating, 7.5);
    assert_eq!(p.score, 45.0);
}

#[test]
fn empty_array_yields_empty_batch() {
    let batch = normalize(&json!([]));
    assert!(batch.products.is_empty());
    assert_eq!(batch.skipped, 0);
}

#[test]
fn object_reply_is_malformed() {
    let err = normalize_products_at(&json!({ "products": [] }), "Phones", "src", 0, at())
        .unwrap_err();
    assert!(
        matches!(err, ScraperError::MalformedExtraction { ref reason } if reason.contains("an object"))
    );
}

#[test]
fn string_reply_is_malformed() {
    let err = normalize_products_at(&json!("no products"), "Phones", "src", 0, at()).unwrap_err();
    assert!(matches!(err, ScraperError::MalformedExtraction { .. }));
}

// -----------------------------------------------------------------------
// demand_score / format_price
// -----------------------------------------------------------------------

#[test]
fn demand_score_weights() {
    assert_eq!(demand_score(1200, 45, 4.5), 520.5);
    assert_eq!(demand_score(0, 0, 5.0), 30.0);
    assert_eq!(demand_score(1, 0, 0.0), 0.4);
    assert_eq!(demand_score(0, 1, 0.0), 0.3);
}

#[test]
fn demand_score_rounds_to_two_decimals() {
    // 3 * 0.4 + 0 + 4.33 * 6 = 1.2 + 25.98 = 27.18
    assert_eq!(demand_score(3, 0, 4.33), 27.18);
    // 0 + 0 + 4.111 * 6 = 24.666 → 24.67
    assert_eq!(demand_score(0, 0, 4.111), 24.67);
}

#[test]
fn format_price_groups_thousands() {
    assert_eq!(format_price(0.0), "Rs. 0");
    assert_eq!(format_price(999.0), "Rs. 999");
    assert_eq!(format_price(1000.0), "Rs. 1,000");
    assert_eq!(format_price(12_500.0), "Rs. 12,500");
    assert_eq!(format_price(1_234_567.0), "Rs. 1,234,567");
}

#[test]
fn format_price_rounds_to_whole_rupees() {
    assert_eq!(format_price(1499.6), "Rs. 1,500");
    assert_eq!(format_price(1499.4), "Rs. 1,499");
}

#[test]
fn format_price_handles_bad_input() {
    assert_eq!(format_price(-5.0), "Rs. 0");
    assert_eq!(format_price(f64::NAN), "Rs. 0");
}
