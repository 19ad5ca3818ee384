//! Decoded items together with the capacity it cost to read them.

use std::cmp::Ordering;

use dyno_model::CapacitySummary;

/// Items returned by one or more requests and the capacity they consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct DynoResult<T> {
    /// Decoded items in arrival order.
    pub items: Vec<T>,
    /// Capacity consumed by every request that produced `items`.
    pub consumed_capacity: CapacitySummary,
}

impl<T> Default for DynoResult<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            consumed_capacity: CapacitySummary::default(),
        }
    }
}

impl<T> DynoResult<T> {
    /// Wrap the items of a single request.
    pub fn new(items: Vec<T>, consumed_capacity: CapacitySummary) -> Self {
        Self {
            items,
            consumed_capacity,
        }
    }

    /// Append `other` after this result's items and add its capacity.
    pub fn aggregate(&mut self, other: Self) {
        self.items.extend(other.items);
        self.consumed_capacity.merge(other.consumed_capacity);
    }

    /// Sort the items in place with `compare`. The sort is stable.
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.items.sort_by(compare);
    }

    /// The first item, if any.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    /// Take the first item, dropping the rest.
    #[must_use]
    pub fn into_first(self) -> Option<T> {
        self.items.into_iter().next()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when there are no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> FromIterator<DynoResult<T>> for DynoResult<T> {
    fn from_iter<I: IntoIterator<Item = DynoResult<T>>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), |mut acc, page| {
            acc.aggregate(page);
            acc
        })
    }
}

impl<T> IntoIterator for DynoResult<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use dyno_model::types::{Capacity, ConsumedCapacity};

    use super::*;

    fn page(items: &[u32], units: f64) -> DynoResult<u32> {
        DynoResult::new(
            items.to_vec(),
            ConsumedCapacity {
                table_name: Some("Dinosaurs".to_owned()),
                capacity_units: Some(units),
                table: Some(Capacity {
                    capacity_units: Some(units),
                    ..Capacity::default()
                }),
                ..ConsumedCapacity::default()
            }
            .into(),
        )
    }

    #[test]
    fn test_should_fold_pages_in_arrival_order() {
        let folded: DynoResult<u32> = [page(&[3, 1], 0.5), page(&[], 0.5), page(&[2], 1.0)]
            .into_iter()
            .collect();
        assert_eq!(folded.items, [3, 1, 2]);
        assert_eq!(folded.consumed_capacity.total.capacity_units, Some(2.0));
        assert_eq!(
            folded.consumed_capacity.tables["Dinosaurs"].capacity_units,
            Some(2.0)
        );
    }

    #[test]
    fn test_should_sort_and_take_first() {
        let mut result = page(&[5, 2, 9], 1.0);
        result.sort_by(|a, b| b.cmp(a));
        assert_eq!(result.first(), Some(&9));
        assert_eq!(result.len(), 3);
        assert_eq!(result.into_first(), Some(9));
    }

    #[test]
    fn test_should_be_empty_by_default() {
        let result = DynoResult::<String>::default();
        assert!(result.is_empty());
        assert!(result.consumed_capacity.is_empty());
        assert_eq!(result.into_first(), None);
    }
}
