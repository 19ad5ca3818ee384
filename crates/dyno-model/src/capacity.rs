//! Folding consumed-capacity reports across pages and operations.
//!
//! A single response reports its capacity as a [`ConsumedCapacity`]; callers
//! that issue many requests (a paginated scan, a batch of puts) sum them into
//! one [`CapacitySummary`]. Summation is associative and commutative, so pages
//! can be folded in any grouping.

use std::collections::HashMap;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::types::{Capacity, ConsumedCapacity};

fn add_units(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (None, None) => None,
        (a, b) => Some(a.unwrap_or(0.0) + b.unwrap_or(0.0)),
    }
}

impl Add for Capacity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            read_capacity_units: add_units(self.read_capacity_units, rhs.read_capacity_units),
            write_capacity_units: add_units(self.write_capacity_units, rhs.write_capacity_units),
            capacity_units: add_units(self.capacity_units, rhs.capacity_units),
        }
    }
}

impl AddAssign for Capacity {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Capacity consumed by one or more operations, keyed by table and index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapacitySummary {
    /// Totals across everything below.
    pub total: Capacity,
    /// Per-table capacity, excluding indexes.
    pub tables: HashMap<String, Capacity>,
    /// Per global secondary index.
    pub global_secondary_indexes: HashMap<String, Capacity>,
    /// Per local secondary index.
    pub local_secondary_indexes: HashMap<String, Capacity>,
}

fn merge_map(into: &mut HashMap<String, Capacity>, from: HashMap<String, Capacity>) {
    for (name, capacity) in from {
        *into.entry(name).or_default() += capacity;
    }
}

impl CapacitySummary {
    /// Returns `true` when no capacity has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == Capacity::default()
            && self.tables.is_empty()
            && self.global_secondary_indexes.is_empty()
            && self.local_secondary_indexes.is_empty()
    }

    /// Fold another summary into this one.
    pub fn merge(&mut self, other: Self) {
        self.total += other.total;
        merge_map(&mut self.tables, other.tables);
        merge_map(&mut self.global_secondary_indexes, other.global_secondary_indexes);
        merge_map(&mut self.local_secondary_indexes, other.local_secondary_indexes);
    }
}

impl From<ConsumedCapacity> for CapacitySummary {
    fn from(value: ConsumedCapacity) -> Self {
        let tables = match (value.table_name, value.table) {
            (Some(name), Some(table)) => HashMap::from([(name, table)]),
            _ => HashMap::new(),
        };
        Self {
            total: Capacity {
                read_capacity_units: value.read_capacity_units,
                write_capacity_units: value.write_capacity_units,
                capacity_units: value.capacity_units,
            },
            tables,
            global_secondary_indexes: value.global_secondary_indexes,
            local_secondary_indexes: value.local_secondary_indexes,
        }
    }
}

impl From<Option<ConsumedCapacity>> for CapacitySummary {
    fn from(value: Option<ConsumedCapacity>) -> Self {
        value.map(Self::from).unwrap_or_default()
    }
}

impl Add for CapacitySummary {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self.merge(rhs);
        self
    }
}

impl AddAssign for CapacitySummary {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(rhs);
    }
}

impl Sum for CapacitySummary {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(total: f64) -> Capacity {
        Capacity {
            capacity_units: Some(total),
            ..Default::default()
        }
    }

    fn page(table: &str, total: f64, gsi: Option<(&str, f64)>) -> CapacitySummary {
        ConsumedCapacity {
            table_name: Some(table.to_owned()),
            capacity_units: Some(total),
            table: Some(units(total)),
            global_secondary_indexes: gsi
                .map(|(name, u)| HashMap::from([(name.to_owned(), units(u))]))
                .unwrap_or_default(),
            ..Default::default()
        }
        .into()
    }

    #[test]
    fn test_should_treat_missing_units_as_zero() {
        let a = Capacity {
            read_capacity_units: Some(1.0),
            ..Default::default()
        };
        let b = Capacity {
            read_capacity_units: None,
            write_capacity_units: Some(2.0),
            capacity_units: None,
        };
        let sum = a + b;
        assert_eq!(sum.read_capacity_units, Some(1.0));
        assert_eq!(sum.write_capacity_units, Some(2.0));
        assert_eq!(sum.capacity_units, None);
    }

    #[test]
    fn test_should_union_tables_and_indexes() {
        let total = page("Dinosaurs", 1.0, Some(("by-colour", 0.5)))
            + page("Dinosaurs", 2.0, None)
            + page("Fossils", 0.5, Some(("by-colour", 0.25)));
        assert_eq!(total.total.capacity_units, Some(3.5));
        assert_eq!(total.tables["Dinosaurs"].capacity_units, Some(3.0));
        assert_eq!(total.tables["Fossils"].capacity_units, Some(0.5));
        assert_eq!(total.global_secondary_indexes["by-colour"].capacity_units, Some(0.75));
        assert!(total.local_secondary_indexes.is_empty());
    }

    #[test]
    fn test_should_be_associative_and_commutative() {
        let a = page("A", 1.0, Some(("i", 1.0)));
        let b = page("B", 2.0, None);
        let c = page("A", 4.0, Some(("i", 2.0)));
        assert_eq!((a.clone() + b.clone()) + c.clone(), a.clone() + (b.clone() + c.clone()));
        assert_eq!(a.clone() + b.clone(), b + a);
    }

    #[test]
    fn test_should_sum_iterator_from_empty() {
        let none: CapacitySummary = std::iter::empty().sum();
        assert!(none.is_empty());
        let total: CapacitySummary = vec![page("A", 1.0, None), page("A", 1.0, None)]
            .into_iter()
            .sum();
        assert_eq!(total.total.capacity_units, Some(2.0));
    }

    #[test]
    fn test_should_build_empty_summary_from_missing_report() {
        assert!(CapacitySummary::from(None).is_empty());
    }
}
