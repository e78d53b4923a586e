//! Material-requirement calculation tests
//!
//! Tests for the requirement calculator including:
//! - One entry per recipe line, in recipe order
//! - Need amount equals per-unit amount times count
//! - Coverage status against undepleted stock
//! - Missing clothing items and empty recipes

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    AvailabilityFormula, CalculationError, MaterialType, RecipeLine, RecipeStore,
    RequirementCalculator, StockLedger, StockLot,
};
use uuid::Uuid;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[derive(Debug, thiserror::Error)]
#[error("store unavailable")]
struct StoreError;

/// In-memory recipe and stock data
#[derive(Clone, Default)]
struct MemoryWorkshop {
    clothes: HashMap<Uuid, Vec<RecipeLine>>,
    lots: Vec<StockLot>,
    fail: bool,
}

impl MemoryWorkshop {
    fn with_clothing(mut self, id: Uuid, lines: Vec<RecipeLine>) -> Self {
        self.clothes.insert(id, lines);
        self
    }

    fn with_lot(mut self, code: &str, come: &str, work: &str) -> Self {
        self.lots.push(lot(code, come, work));
        self
    }
}

#[async_trait]
impl RecipeStore for MemoryWorkshop {
    type Error = StoreError;

    async fn get_requirements(&self, clothes_id: Uuid) -> Result<Vec<RecipeLine>, StoreError> {
        if self.fail {
            return Err(StoreError);
        }
        Ok(self.clothes.get(&clothes_id).cloned().unwrap_or_default())
    }

    async fn clothing_exists(&self, clothes_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.clothes.contains_key(&clothes_id))
    }
}

#[async_trait]
impl StockLedger for MemoryWorkshop {
    type Error = StoreError;

    async fn undepleted_lots(&self, code: &str) -> Result<Vec<StockLot>, StoreError> {
        Ok(self
            .lots
            .iter()
            .filter(|lot| lot.code == code && lot.come_amount != lot.work_amount)
            .cloned()
            .collect())
    }
}

fn line(code: &str, kind: MaterialType, per_unit: &str) -> RecipeLine {
    RecipeLine {
        material_id: Uuid::new_v4(),
        material_name: format!("Material {}", code),
        material_type: kind,
        measurement: "m".to_string(),
        material_code: code.to_string(),
        per_unit_amount: dec(per_unit),
    }
}

fn lot(code: &str, come: &str, work: &str) -> StockLot {
    StockLot {
        come_amount: dec(come),
        price: dec("4.50"),
        code: code.to_string(),
        id: Uuid::new_v4(),
        work_amount: dec(work),
    }
}

fn calculator(
    workshop: MemoryWorkshop,
) -> RequirementCalculator<MemoryWorkshop, MemoryWorkshop> {
    RequirementCalculator::new(workshop.clone(), workshop)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Shirt needing 2 of A and 1 of B, with 12 of A and 3 of B in stock
    fn shirt_workshop(shirt: Uuid) -> MemoryWorkshop {
        MemoryWorkshop::default()
            .with_clothing(
                shirt,
                vec![
                    line("A", MaterialType::Fabric, "2"),
                    line("B", MaterialType::Button, "1"),
                ],
            )
            .with_lot("A", "12", "4")
            .with_lot("B", "3", "0")
    }

    /// Test the worked example: A is covered, B falls short
    #[test]
    fn test_mixed_coverage() {
        let shirt = Uuid::new_v4();
        let report = tokio_test::block_on(calculator(shirt_workshop(shirt)).calculate(shirt, 5))
            .unwrap();

        assert_eq!(report.all_amount.len(), 2);

        let a = &report.all_amount[0];
        assert_eq!(a.material_code, "A");
        assert_eq!(a.need_amount, dec("10"));
        assert_eq!(a.need_amount_price_detail.has_amount, dec("12"));
        assert!(a.need_amount_price_detail.status);

        let b = &report.all_amount[1];
        assert_eq!(b.material_code, "B");
        assert_eq!(b.need_amount, dec("5"));
        assert_eq!(b.need_amount_price_detail.has_amount, dec("3"));
        assert!(!b.need_amount_price_detail.status);

        assert!(!report.is_feasible());
        assert_eq!(report.shortages().count(), 1);
    }

    /// Test the remaining formula subtracts allocated work
    #[test]
    fn test_remaining_formula() {
        let shirt = Uuid::new_v4();
        let calc = calculator(shirt_workshop(shirt)).with_formula(AvailabilityFormula::Remaining);
        let report = tokio_test::block_on(calc.calculate(shirt, 5)).unwrap();

        let a = &report.all_amount[0];
        assert_eq!(a.need_amount_price_detail.has_amount, dec("8"));
        assert!(!a.need_amount_price_detail.status);
    }

    /// Test an item without recipe lines yields an empty report
    #[test]
    fn test_empty_recipe() {
        let item = Uuid::new_v4();
        let workshop = MemoryWorkshop::default().with_clothing(item, Vec::new());
        let report = tokio_test::block_on(calculator(workshop).calculate(item, 3)).unwrap();

        assert!(report.is_empty());
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!({ "all_amount": [] })
        );
    }

    /// Test an unknown item is reported as not found
    #[test]
    fn test_unknown_clothing() {
        let missing = Uuid::new_v4();
        let result = tokio_test::block_on(calculator(MemoryWorkshop::default()).calculate(missing, 1));
        assert!(matches!(result, Err(CalculationError::ClothingNotFound(id)) if id == missing));
    }

    /// Test non-positive counts are rejected before any lookup
    #[test]
    fn test_invalid_count() {
        let workshop = MemoryWorkshop {
            fail: true,
            ..Default::default()
        };
        for count in [0, -1] {
            let result = tokio_test::block_on(calculator(workshop.clone()).calculate(Uuid::new_v4(), count));
            assert!(matches!(result, Err(CalculationError::InvalidCount(c)) if c == count));
        }
    }

    /// Test a need beyond the decimal range is an error, not a panic
    #[test]
    fn test_need_overflow() {
        let item = Uuid::new_v4();
        let workshop = MemoryWorkshop::default()
            .with_clothing(item, vec![line("F", MaterialType::Fabric, "9999999999.9999")]);

        let result = tokio_test::block_on(calculator(workshop.clone()).calculate(item, i64::MAX));
        assert!(matches!(
            result,
            Err(CalculationError::AmountOverflow { ref material_code }) if material_code == "F"
        ));

        let lines = workshop.clothes[&item].clone();
        let result =
            shared::calculate_from_snapshot(lines, &[], i64::MAX, AvailabilityFormula::Received);
        assert!(matches!(result, Err(CalculationError::AmountOverflow { .. })));
    }

    /// Test store failures surface as data access errors
    #[test]
    fn test_store_failure() {
        let workshop = MemoryWorkshop {
            fail: true,
            ..Default::default()
        };
        let result = tokio_test::block_on(calculator(workshop).calculate(Uuid::new_v4(), 1));
        assert!(matches!(result, Err(CalculationError::DataAccess(_))));
    }

    /// Test depleted lots are neither listed nor counted
    #[test]
    fn test_depleted_lots_excluded() {
        let item = Uuid::new_v4();
        let workshop = MemoryWorkshop::default()
            .with_clothing(item, vec![line("T", MaterialType::Thread, "1")])
            .with_lot("T", "10", "10")
            .with_lot("T", "6", "1");
        let report = tokio_test::block_on(calculator(workshop).calculate(item, 6)).unwrap();

        let detail = &report.all_amount[0].need_amount_price_detail;
        assert_eq!(detail.material.len(), 1);
        assert_eq!(detail.has_amount, dec("6"));
        assert!(detail.status);
    }

    /// Test the same material twice in a recipe yields two entries
    #[test]
    fn test_duplicate_material_lines() {
        let item = Uuid::new_v4();
        let workshop = MemoryWorkshop::default()
            .with_clothing(
                item,
                vec![
                    line("Z", MaterialType::Zipper, "1"),
                    line("Z", MaterialType::Zipper, "2"),
                ],
            )
            .with_lot("Z", "4", "0");
        let report = tokio_test::block_on(calculator(workshop).calculate(item, 2)).unwrap();

        assert_eq!(report.all_amount.len(), 2);
        assert!(report.all_amount[0].need_amount_price_detail.status);
        assert!(report.all_amount[1].need_amount_price_detail.status);
    }

    /// Test lot serialization hides work_amount
    #[test]
    fn test_lot_wire_shape() {
        let value = serde_json::to_value(lot("A", "12", "4")).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("come_amount"));
        assert!(object.contains_key("price"));
        assert!(!object.contains_key("work_amount"));
    }

    /// Test the snapshot calculation agrees with the store-backed one
    #[test]
    fn test_snapshot_matches_calculator() {
        let shirt = Uuid::new_v4();
        let workshop = shirt_workshop(shirt);
        let lines = workshop.clothes[&shirt].clone();

        let live = tokio_test::block_on(calculator(workshop.clone()).calculate(shirt, 5)).unwrap();
        let snapshot = shared::calculate_from_snapshot(
            lines,
            &workshop.lots,
            5,
            AvailabilityFormula::Received,
        )
        .unwrap();

        assert_eq!(live, snapshot);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..10_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn kind_strategy() -> impl Strategy<Value = MaterialType> {
        prop_oneof![
            Just(MaterialType::Fabric),
            Just(MaterialType::Button),
            Just(MaterialType::Thread),
            Just(MaterialType::Zipper),
        ]
    }

    fn recipe_strategy() -> impl Strategy<Value = Vec<RecipeLine>> {
        prop::collection::vec(
            (0usize..4, kind_strategy(), amount_strategy()),
            0..8,
        )
        .prop_map(|line_specs| {
            line_specs
                .into_iter()
                .map(|(code, kind, amount)| RecipeLine {
                    per_unit_amount: amount,
                    ..line(&format!("M{}", code), kind, "1")
                })
                .collect()
        })
    }

    fn lots_strategy() -> impl Strategy<Value = Vec<StockLot>> {
        prop::collection::vec((0usize..4, 0i64..500, 0i64..500), 0..12).prop_map(|line_specs| {
            line_specs
                .into_iter()
                .map(|(code, come, work)| {
                    let work = work.min(come);
                    lot(&format!("M{}", code), &come.to_string(), &work.to_string())
                })
                .collect()
        })
    }

    fn workshop(item: Uuid, lines: Vec<RecipeLine>, lots: Vec<StockLot>) -> MemoryWorkshop {
        MemoryWorkshop {
            lots,
            ..Default::default()
        }
        .with_clothing(item, lines)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Report has one entry per recipe line, in recipe order
        #[test]
        fn prop_one_entry_per_line(
            lines in recipe_strategy(),
            lots in lots_strategy(),
            count in 1i64..1_000,
        ) {
            let item = Uuid::new_v4();
            let calc = calculator(workshop(item, lines.clone(), lots));
            let report = tokio_test::block_on(calc.calculate(item, count)).unwrap();

            prop_assert_eq!(report.all_amount.len(), lines.len());
            for (need, line) in report.all_amount.iter().zip(&lines) {
                prop_assert_eq!(need.material_id, line.material_id);
                prop_assert_eq!(&need.material_code, &line.material_code);
            }
        }

        /// Need amount is per-unit amount times count
        #[test]
        fn prop_need_amount_scales(
            lines in recipe_strategy(),
            count in 1i64..1_000,
        ) {
            let item = Uuid::new_v4();
            let calc = calculator(workshop(item, lines.clone(), Vec::new()));
            let report = tokio_test::block_on(calc.calculate(item, count)).unwrap();

            for (need, line) in report.all_amount.iter().zip(&lines) {
                let expected = line.per_unit_amount * Decimal::from(count);
                prop_assert_eq!(need.need_amount, expected);
                prop_assert_eq!(need.need_amount_price_detail.need_amount, expected);
            }
        }

        /// Status is true exactly when availability reaches the need
        #[test]
        fn prop_status_matches_comparison(
            lines in recipe_strategy(),
            lots in lots_strategy(),
            count in 1i64..100,
            remaining in any::<bool>(),
        ) {
            let formula = if remaining {
                AvailabilityFormula::Remaining
            } else {
                AvailabilityFormula::Received
            };
            let item = Uuid::new_v4();
            let calc = calculator(workshop(item, lines, lots)).with_formula(formula);
            let report = tokio_test::block_on(calc.calculate(item, count)).unwrap();

            for need in &report.all_amount {
                let detail = &need.need_amount_price_detail;
                prop_assert_eq!(detail.status, detail.has_amount >= detail.need_amount);
            }
        }

        /// Listed lots are undepleted lots of the line's own code
        #[test]
        fn prop_listed_lots_undepleted(
            lines in recipe_strategy(),
            lots in lots_strategy(),
            count in 1i64..100,
        ) {
            let item = Uuid::new_v4();
            let calc = calculator(workshop(item, lines, lots));
            let report = tokio_test::block_on(calc.calculate(item, count)).unwrap();

            for need in &report.all_amount {
                for listed in &need.need_amount_price_detail.material {
                    prop_assert_eq!(&listed.code, &need.material_code);
                    prop_assert_ne!(listed.come_amount, listed.work_amount);
                }
            }
        }

        /// Repeating a calculation over unchanged data gives the same output
        #[test]
        fn prop_calculation_repeatable(
            lines in recipe_strategy(),
            lots in lots_strategy(),
            count in 1i64..100,
        ) {
            let item = Uuid::new_v4();
            let calc = calculator(workshop(item, lines, lots));
            let first = tokio_test::block_on(calc.calculate(item, count)).unwrap();
            let second = tokio_test::block_on(calc.calculate(item, count)).unwrap();

            prop_assert_eq!(
                serde_json::to_string(&first).unwrap(),
                serde_json::to_string(&second).unwrap()
            );
        }

        /// Large per-unit amounts and counts either compute or report overflow
        #[test]
        fn prop_large_inputs_never_panic(
            per_unit in 1i64..100_000_000_000_000i64,
            count in 1i64..=i64::MAX,
        ) {
            let item = Uuid::new_v4();
            let recipe = vec![RecipeLine {
                per_unit_amount: Decimal::new(per_unit, 4),
                ..line("L", MaterialType::Fabric, "1")
            }];
            let calc = calculator(workshop(item, recipe, Vec::new()));
            match tokio_test::block_on(calc.calculate(item, count)) {
                Ok(report) => prop_assert_eq!(
                    report.all_amount[0].need_amount,
                    Decimal::new(per_unit, 4) * Decimal::from(count)
                ),
                Err(CalculationError::AmountOverflow { .. }) => {}
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }

        /// Non-positive counts never produce a report
        #[test]
        fn prop_non_positive_count_rejected(count in -1_000i64..=0) {
            let item = Uuid::new_v4();
            let calc = calculator(workshop(item, Vec::new(), Vec::new()));
            let result = tokio_test::block_on(calc.calculate(item, count));
            prop_assert!(matches!(result, Err(CalculationError::InvalidCount(_))), "count {} accepted", count);
        }
    }
}
