//! Allotment maximization
//!
//! Greedy priority-fill: keep taking the heaviest enabled product that still
//! fits, starting over from the heaviest after every pick, until nothing fits.
//! This is deliberately not an optimal packing; staff expect the heaviest
//! products to be used up first.

use super::units::{convert_weight, round_to_tenths, WeightUnit};
use super::{AllotmentError, AllotmentResult};
use crate::models::{Allocation, AllocationLine, Catalog, Enablement, Product};

/// Largest allotment accepted, in ounces
pub const MAX_ALLOTMENT_OUNCES: f64 = 1000.0;

/// Most units a single calculation may hand out
pub const MAX_UNITS: u32 = 1_000_000;

/// Parse an allotment typed in by staff
pub fn parse_allotment(input: &str) -> AllotmentResult<f64> {
    let trimmed = input.trim();
    let invalid = || AllotmentError::InvalidInput(trimmed.to_string());
    let ounces: f64 = trimmed.parse().map_err(|_| invalid())?;
    validate_allotment(ounces).map_err(|_| invalid())?;
    Ok(ounces)
}

/// Reject allotments the allocator cannot work with
pub fn validate_allotment(ounces: f64) -> AllotmentResult<()> {
    if ounces.is_finite() && (0.0..=MAX_ALLOTMENT_OUNCES).contains(&ounces) {
        Ok(())
    } else {
        Err(AllotmentError::InvalidInput(ounces.to_string()))
    }
}

/// Rank products heaviest first. Equal weights keep their input order.
///
/// Products without a usable weight are dropped here, which keeps every pick
/// strictly shrinking the budget.
pub fn rank_by_weight(products: &[Product]) -> Vec<&Product> {
    let mut ranked: Vec<&Product> = products
        .iter()
        .filter(|p| {
            if !p.has_usable_weight() {
                tracing::warn!("Skipping '{}' with unusable weight {}", p.name, p.weight_grams);
            }
            p.has_usable_weight()
        })
        .collect();
    ranked.sort_by(|a, b| b.weight_grams.total_cmp(&a.weight_grams));
    ranked
}

/// Maximize an allotment against a catalog and a set of enable flags
pub fn maximize_allotment(
    allotment_ounces: f64,
    catalog: &Catalog,
    enabled: &Enablement,
) -> AllotmentResult<Allocation> {
    maximize(allotment_ounces, &catalog.products(enabled))
}

/// Maximize an allotment against explicit product records
pub fn maximize(allotment_ounces: f64, products: &[Product]) -> AllotmentResult<Allocation> {
    validate_allotment(allotment_ounces)?;

    let starting_budget = round_to_tenths(convert_weight(allotment_ounces, WeightUnit::Ounce));
    let ranked = rank_by_weight(products);

    // Never more than MAX_UNITS picks
    if let Some(lightest) = ranked.iter().filter(|p| p.enabled).map(|p| p.weight_grams).reduce(f64::min) {
        if starting_budget / lightest >= f64::from(MAX_UNITS) {
            tracing::warn!(
                "Allotment {} oz needs more than {} units of {} g",
                allotment_ounces,
                MAX_UNITS,
                lightest
            );
            return Err(AllotmentError::InvalidInput(allotment_ounces.to_string()));
        }
    }

    // Lightest product regardless of its flag; only a loop threshold
    let minimum_unit = ranked.last().map(|p| p.weight_grams).unwrap_or(0.0);

    let mut budget = starting_budget;
    let mut counts: Vec<(&Product, u32)> = Vec::new();

    while budget > 0.0 || budget >= minimum_unit {
        let Some(pick) = ranked
            .iter()
            .copied()
            .find(|p| p.enabled && p.weight_grams <= budget)
        else {
            break;
        };
        match counts.iter_mut().find(|(p, _)| p.name == pick.name) {
            Some((_, count)) => *count += 1,
            None => counts.push((pick, 1)),
        }
        budget -= pick.weight_grams;
    }

    tracing::debug!(
        "Allotment {} oz -> {} g budget, {} units picked, {} g left",
        allotment_ounces,
        starting_budget,
        counts.iter().map(|(_, n)| n).sum::<u32>(),
        budget
    );

    let mut allocation = Allocation::empty(allotment_ounces, starting_budget);
    allocation.lines = into_lines(counts);
    allocation.remainder_grams = budget;
    allocation.remainder_ounces = convert_weight(budget, WeightUnit::Gram);
    Ok(allocation)
}

/// Per-product counts in first-pick order, sorted by count (stable)
fn into_lines(counts: Vec<(&Product, u32)>) -> Vec<AllocationLine> {
    let mut lines: Vec<AllocationLine> = counts
        .into_iter()
        .map(|(product, count)| AllocationLine::new(product.name.clone(), count, product.weight_grams))
        .collect();
    lines.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Vec<Product> {
        vec![
            Product::new("A", 7.0),
            Product::new("B", 3.5),
            Product::new("C", 1.0),
        ]
    }

    /// Same greedy fill with the loop condition reduced to `budget > 0`
    fn simple_fill(budget: f64, products: &[Product]) -> (Vec<String>, f64) {
        let ranked = rank_by_weight(products);
        let mut budget = budget;
        let mut picks = Vec::new();
        while budget > 0.0 {
            match ranked.iter().find(|p| p.enabled && p.weight_grams <= budget) {
                Some(p) => {
                    picks.push(p.name.clone());
                    budget -= p.weight_grams;
                }
                None => break,
            }
        }
        (picks, budget)
    }

    #[test]
    fn test_reference_scenario() {
        let allocation = maximize_allotment(2.5, &Catalog::reference(), &Enablement::all_enabled()).unwrap();

        assert_eq!(allocation.budget_grams, 70.8);
        assert_eq!(allocation.lines.len(), 1);
        assert_eq!(allocation.lines[0].product, "Ground Flower");
        assert_eq!(allocation.lines[0].quantity, 10);
        assert_eq!(allocation.lines[0].summary(), "= 70.0 g / 2.469 oz");
        assert!((allocation.remainder_grams - 0.8).abs() < 1e-9);
        assert_eq!(allocation.remaining_summary(), "0.8 g / 0.028 oz");
    }

    #[test]
    fn test_priority_dominance() {
        let allocation = maximize(2.5, &abc()).unwrap();
        assert_eq!(allocation.quantity_of("A"), 10);
        assert_eq!(allocation.quantity_of("B"), 0);
        assert_eq!(allocation.quantity_of("C"), 0);
    }

    #[test]
    fn test_heavier_exhausted_before_lighter() {
        // 1 oz -> 28.3 g: 4 x A (28.0), then 0.3 left
        let allocation = maximize(1.0, &abc()).unwrap();
        assert_eq!(allocation.quantity_of("A"), 4);
        assert!((allocation.remainder_grams - 0.3).abs() < 1e-9);

        // 0.5 oz -> 14.1 g: 2 x A, then 0.1 left
        let allocation = maximize(0.5, &abc()).unwrap();
        assert_eq!(allocation.quantity_of("A"), 2);
        assert_eq!(allocation.total_units(), 2);

        // 0.3 oz -> 8.5 g: A, then C
        let allocation = maximize(0.3, &abc()).unwrap();
        assert_eq!(allocation.budget_grams, 8.5);
        assert_eq!(allocation.quantity_of("A"), 1);
        assert_eq!(allocation.quantity_of("B"), 0);
        assert_eq!(allocation.quantity_of("C"), 1);
        assert!((allocation.remainder_grams - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_disabled_product_excluded() {
        let products = vec![
            Product::new("A", 7.0).with_enabled(false),
            Product::new("B", 3.5),
            Product::new("C", 1.0),
        ];
        let allocation = maximize(2.5, &products).unwrap();

        assert_eq!(allocation.quantity_of("A"), 0);
        // 70.8 g -> 20 x B (70.0), 0.8 left
        assert_eq!(allocation.quantity_of("B"), 20);
        assert_eq!(allocation.quantity_of("C"), 0);
    }

    #[test]
    fn test_disabled_via_enablement() {
        let flags = Enablement::disabling(["Ground Flower"]);
        let allocation = maximize_allotment(2.5, &Catalog::reference(), &flags).unwrap();

        assert_eq!(allocation.quantity_of("Ground Flower"), 0);
        // Whole Flower ranks ahead of 10ct Pre-Rolls at the same weight
        assert_eq!(allocation.quantity_of("Whole Flower"), 20);
        assert_eq!(allocation.quantity_of("10ct Pre-Rolls"), 0);
    }

    #[test]
    fn test_zero_allotment() {
        let allocation = maximize(0.0, &abc()).unwrap();
        assert!(allocation.is_empty());
        assert_eq!(allocation.remainder_grams, 0.0);
        assert_eq!(allocation.remainder_ounces, 0.0);
        assert_eq!(allocation.remaining_summary(), "0.0 g / 0.000 oz");
    }

    #[test]
    fn test_insufficient_allotment() {
        // 0.03 oz -> 0.85 - 0.04 = 0.81 -> 0.8 g, below C
        let allocation = maximize(0.03, &abc()).unwrap();
        assert!(allocation.is_empty());
        assert_eq!(allocation.budget_grams, 0.8);
        assert_eq!(allocation.remainder_grams, 0.8);
    }

    #[test]
    fn test_all_disabled() {
        let products: Vec<Product> = abc().into_iter().map(|p| p.with_enabled(false)).collect();
        let allocation = maximize(2.5, &products).unwrap();
        assert!(allocation.is_empty());
        assert_eq!(allocation.remainder_grams, 70.8);
    }

    #[test]
    fn test_empty_catalog() {
        let allocation = maximize_allotment(2.5, &Catalog::default(), &Enablement::all_enabled()).unwrap();
        assert!(allocation.is_empty());
        assert_eq!(allocation.remainder_grams, 70.8);
    }

    #[test]
    fn test_unusable_weights_are_skipped() {
        let products = vec![
            Product::new("Zero", 0.0),
            Product::new("Negative", -3.5),
            Product::new("C", 1.0),
        ];
        let allocation = maximize(0.2, &products).unwrap();
        // 0.2 oz -> 5.67 - 0.04 = 5.63 -> 5.6 g
        assert_eq!(allocation.quantity_of("C"), 5);
        assert_eq!(allocation.quantity_of("Zero"), 0);
        assert_eq!(allocation.lines.len(), 1);
    }

    #[test]
    fn test_invalid_allotment_rejected() {
        assert!(matches!(maximize(-1.0, &abc()), Err(AllotmentError::InvalidInput(_))));
        assert!(matches!(maximize(f64::NAN, &abc()), Err(AllotmentError::InvalidInput(_))));
        assert!(matches!(maximize(f64::INFINITY, &abc()), Err(AllotmentError::InvalidInput(_))));
    }

    #[test]
    fn test_parse_allotment() {
        assert_eq!(parse_allotment(" 2.5 ").unwrap(), 2.5);
        assert_eq!(parse_allotment("0").unwrap(), 0.0);

        let err = parse_allotment("two ounces").unwrap_err();
        assert_eq!(err.to_string(), "The value two ounces was out of bounds.");
        assert!(parse_allotment("-0.5").is_err());
        assert!(parse_allotment("").is_err());
    }

    #[test]
    fn test_report_sorted_by_quantity() {
        // 0.35 oz -> 9.92 - 0.04 = 9.88 -> 9.9 g: A (7.0), B skipped, C x2, 0.9 left
        let allocation = maximize(0.35, &abc()).unwrap();
        assert_eq!(allocation.budget_grams, 9.9);
        let names: Vec<&str> = allocation.lines.iter().map(|l| l.product.as_str()).collect();
        assert_eq!(names, vec!["C", "A"]);
        assert_eq!(allocation.lines[0].quantity, 2);
        assert_eq!(allocation.lines[1].quantity, 1);
    }

    #[test]
    fn test_equal_counts_keep_priority_order() {
        // 0.4 oz -> 11.34 - 0.04 = 11.3 g: A, B, then 0.8 left
        let allocation = maximize(0.4, &abc()).unwrap();
        assert_eq!(allocation.budget_grams, 11.3);
        let names: Vec<&str> = allocation.lines.iter().map(|l| l.product.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_budget_strictly_decreases_and_iterations_bounded() {
        let products = Catalog::reference().products(&Enablement::all_enabled());
        for tenths in 0..200 {
            let ounces = f64::from(tenths) / 10.0;
            let allocation = maximize(ounces, &products).unwrap();

            let bound = (allocation.budget_grams / 1.0).floor() as u32 + 1;
            assert!(allocation.total_units() <= bound);
            assert!(allocation.remainder_grams >= 0.0);
            assert!(allocation.remainder_grams < 1.0 + 1e-9);

            let dispensed = allocation.dispensed_grams();
            assert!((dispensed + allocation.remainder_grams - allocation.budget_grams).abs() < 1e-6);
        }
    }

    #[test]
    fn test_huge_allotment_rejected() {
        let products = vec![Product::new("A", 7.0), Product::new("C", 1.0)];

        let err = parse_allotment("1e16").unwrap_err();
        assert_eq!(err.to_string(), "The value 1e16 was out of bounds.");
        assert!(matches!(maximize(1e16, &products), Err(AllotmentError::InvalidInput(_))));
        assert!(matches!(maximize(1e8, &products), Err(AllotmentError::InvalidInput(_))));
        assert!(parse_allotment("1000.1").is_err());
    }

    #[test]
    fn test_largest_allotment_completes() {
        // 1000 oz -> 28349.52 - 0.04 = 28349.48 -> 28349.5 g: 4049 x A, 6.5 left, then B
        let allocation = maximize(MAX_ALLOTMENT_OUNCES, &abc()).unwrap();
        assert_eq!(allocation.budget_grams, 28349.5);
        assert_eq!(allocation.quantity_of("A"), 4049);
        assert_eq!(allocation.quantity_of("B"), 1);
        assert!(allocation.remainder_grams < 1.0 + 1e-6);
    }

    #[test]
    fn test_too_many_units_rejected() {
        // 100 oz -> 2834.9 g of 0.001 g units is far past the unit limit
        let products = vec![Product::new("Dust", 0.001)];
        assert!(matches!(maximize(100.0, &products), Err(AllotmentError::InvalidInput(_))));

        // A disabled tiny product does not count against the limit
        let products = vec![Product::new("Dust", 0.001).with_enabled(false), Product::new("C", 1.0)];
        let allocation = maximize(100.0, &products).unwrap();
        assert_eq!(allocation.quantity_of("C"), 2834);
    }

    #[test]
    fn test_boundary_budgets_match_simple_loop() {
        let products = abc();
        // Budgets of 0.0 g, 1.0 g (exactly the lightest unit) and 7.0 g
        for ounces in [0.0, 0.0018, 0.003, 0.0366, 0.037, 0.036, 0.25] {
            let allocation = maximize(ounces, &products).unwrap();
            let (picks, left) = simple_fill(allocation.budget_grams, &products);
            assert_eq!(allocation.total_units() as usize, picks.len(), "ounces = {}", ounces);
            assert!((allocation.remainder_grams - left).abs() < 1e-12);
        }

        // Budget just below the lightest product
        let (picks, left) = simple_fill(0.9, &products);
        assert!(picks.is_empty());
        assert_eq!(left, 0.9);
    }
}
