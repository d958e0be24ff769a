//! Subject selection by listing index.

use std::collections::BTreeSet;

/// Indices a user picked from a 0-based subject listing.
///
/// Negative or fractional numbers can never match a listing position and
/// are dropped on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectSelection {
    indices: BTreeSet<usize>,
}

impl SubjectSelection {
    pub fn from_numbers(numbers: &[f64]) -> Self {
        let indices = numbers
            .iter()
            .filter(|n| n.is_finite() && **n >= 0.0 && n.fract() == 0.0)
            .map(|n| *n as usize)
            .collect();
        Self { indices }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Items at the selected positions, in listing order.
    pub fn pick<'a, T>(&self, items: &'a [T]) -> Vec<&'a T> {
        items
            .iter()
            .enumerate()
            .filter(|(i, _)| self.indices.contains(i))
            .map(|(_, item)| item)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_and_negative_indices_are_ignored() {
        let items = ["a", "b", "c"];
        let selection = SubjectSelection::from_numbers(&[1.0, 4.0, -1.0]);
        assert_eq!(selection.pick(&items), vec![&"b"]);
    }

    #[test]
    fn fractional_numbers_never_match() {
        let selection = SubjectSelection::from_numbers(&[0.5]);
        assert!(selection.is_empty());
    }

    #[test]
    fn duplicates_pick_once_in_listing_order() {
        let items = ["a", "b", "c"];
        let selection = SubjectSelection::from_numbers(&[2.0, 0.0, 2.0]);
        assert_eq!(selection.pick(&items), vec![&"a", &"c"]);
    }
}
