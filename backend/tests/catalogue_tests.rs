//! Material catalogue and storage tests
//!
//! Tests for:
//! - Material type parsing and wire names
//! - Material statistics and list filters
//! - Storage lot counters and valuation

use std::str::FromStr;

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    validate_code_unchanged, validate_lot_amounts, validate_material_code, ApiResponse,
    MaterialFilter, MaterialStatistics, MaterialType, StorageLot,
};
use uuid::Uuid;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn storage_lot(come: &str, work: &str, price: &str) -> StorageLot {
    StorageLot {
        id: Uuid::new_v4(),
        kind: MaterialType::Fabric,
        code: "FAB-001".to_string(),
        color_code: "#1E3A8A".to_string(),
        measurement: "m".to_string(),
        come_amount: dec(come),
        work_amount: dec(work),
        price: dec(price),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Test material type wire names
    #[test]
    fn test_material_type_names() {
        assert_eq!(
            MaterialType::valid_types(),
            vec!["fabric", "button", "thread", "zipper"]
        );
        assert_eq!(MaterialType::from_str("thread"), Ok(MaterialType::Thread));
        assert!(MaterialType::from_str("Fabric").is_err());
        assert!(MaterialType::from_str("leather").is_err());
    }

    /// Test material type serializes under its wire name
    #[test]
    fn test_material_type_serde() {
        assert_eq!(
            serde_json::to_string(&MaterialType::Zipper).unwrap(),
            "\"zipper\""
        );
        let kind: MaterialType = serde_json::from_str("\"button\"").unwrap();
        assert_eq!(kind, MaterialType::Button);
    }

    /// Test statistics report every type, even without rows
    #[test]
    fn test_statistics_fill_missing_types() {
        let stats = MaterialStatistics::from_counts(vec![
            (MaterialType::Fabric, 4),
            (MaterialType::Zipper, 1),
        ]);

        assert_eq!(stats.total, 5);
        assert_eq!(stats.by_type.len(), 4);
        assert_eq!(stats.by_type[&MaterialType::Button], 0);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["by_type"]["fabric"], 4);
        assert_eq!(json["by_type"]["thread"], 0);
    }

    /// Test blank search terms are dropped
    #[test]
    fn test_filter_normalization() {
        let filter = MaterialFilter {
            kind: Some(MaterialType::Fabric),
            search: Some("   ".to_string()),
        }
        .normalized();
        assert_eq!(filter.search, None);
        assert_eq!(filter.kind, Some(MaterialType::Fabric));

        let filter = MaterialFilter {
            kind: None,
            search: Some("  cotton ".to_string()),
        }
        .normalized();
        assert_eq!(filter.search.as_deref(), Some("cotton"));
    }

    /// Test the type filter deserializes from the `type` key
    #[test]
    fn test_filter_type_key() {
        let filter: MaterialFilter = serde_json::from_str(r#"{"type": "thread"}"#).unwrap();
        assert_eq!(filter.kind, Some(MaterialType::Thread));
    }

    /// Test material code rules
    #[test]
    fn test_material_code() {
        assert!(validate_material_code("BTN-12").is_ok());
        assert!(validate_material_code("").is_err());
        assert!(validate_material_code("BTN-12 ").is_err());
    }

    /// Test a material update cannot move the code its lots are keyed by
    #[test]
    fn test_material_code_is_immutable() {
        let err = validate_code_unchanged("FAB-1", Some("FAB-2")).unwrap_err();
        assert_eq!(err.field, "code");

        assert!(validate_code_unchanged("FAB-1", Some("FAB-1")).is_ok());
        assert!(validate_code_unchanged("FAB-1", None).is_ok());
    }

    /// Test lot valuation
    #[test]
    fn test_lot_total_price() {
        let lot = storage_lot("12.5", "0", "4.20");
        assert_eq!(lot.total_price(), Some(dec("52.5")));

        let huge = StorageLot {
            come_amount: Decimal::MAX,
            ..storage_lot("0", "0", "2")
        };
        assert_eq!(huge.total_price(), None);
    }

    /// Test lot counters
    #[test]
    fn test_lot_amounts() {
        assert!(validate_lot_amounts(dec("10"), dec("10"), dec("1")).is_ok());
        assert!(validate_lot_amounts(dec("10"), dec("10.01"), dec("1")).is_err());
        assert!(validate_lot_amounts(dec("-1"), dec("0"), dec("1")).is_err());
    }

    /// Test the stock view of a lot keeps its identity and counters
    #[test]
    fn test_as_stock_lot() {
        let lot = storage_lot("8", "3", "2");
        let stock = lot.as_stock_lot();
        assert_eq!(stock.id, lot.id);
        assert_eq!(stock.code, lot.code);
        assert_eq!(stock.work_amount, dec("3"));
    }

    /// Test the response envelope
    #[test]
    fn test_api_response_envelope() {
        let response = ApiResponse::ok("Materials fetched", vec![1, 2, 3]).with_count(3);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["message"], "Materials fetched");
        assert_eq!(json["count"], 3);
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));

        let json = serde_json::to_value(ApiResponse::ok("Deleted", ())).unwrap();
        assert!(json.get("count").is_none());
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        /// Statistics total equals the sum of per-type counts
        #[test]
        fn prop_statistics_total(
            counts in prop::collection::vec((0usize..4, 0i64..1_000), 0..10)
        ) {
            let expected: i64 = counts.iter().map(|(_, n)| n).sum();
            let stats = MaterialStatistics::from_counts(
                counts.into_iter().map(|(i, n)| (MaterialType::ALL[i], n)),
            );
            prop_assert_eq!(stats.total, expected);
            prop_assert_eq!(stats.by_type.values().sum::<i64>(), expected);
        }

        /// Work amount within the received amount is accepted
        #[test]
        fn prop_lot_amounts_within_bounds(
            come in amount_strategy(),
            work in amount_strategy(),
            price in amount_strategy(),
        ) {
            let result = validate_lot_amounts(come, work, price);
            prop_assert_eq!(result.is_ok(), work <= come);
        }

        /// Lot value is price times received amount
        #[test]
        fn prop_total_price(
            come in amount_strategy(),
            price in amount_strategy(),
        ) {
            let lot = StorageLot {
                come_amount: come,
                price,
                ..storage_lot("0", "0", "0")
            };
            prop_assert_eq!(lot.total_price(), Some(come * price));
        }

        /// Only the current code passes an update
        #[test]
        fn prop_code_change_rejected(
            current in "[A-Z]{3}-[0-9]{1,2}",
            requested in "[A-Z]{3}-[0-9]{1,2}",
        ) {
            let result = validate_code_unchanged(&current, Some(&requested));
            prop_assert_eq!(result.is_ok(), current == requested);
        }

        /// Every wire name parses back to its type
        #[test]
        fn prop_material_type_parse(index in 0usize..4) {
            let kind = MaterialType::ALL[index];
            prop_assert_eq!(MaterialType::from_str(kind.as_str()), Ok(kind));
        }
    }
}
