//! Category facets and multi-select filtering.
//!
//! Categories are free-text labels on flashcards. The filter derives facets
//! (distinct non-empty values with occurrence counts) from a card set and
//! tracks a multi-select of active categories. An empty selection means "no
//! filter".

use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// A distinct category value with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFacet {
    pub name: String,
    pub count: usize,
}

/// Derive facets from an iterator of category values.
///
/// Empty values are skipped. Facets are sorted by count descending, with
/// name ascending as the tie-break.
pub fn category_facets<'a, I>(values: I) -> Vec<CategoryFacet>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        if !value.is_empty() {
            *counts.entry(value).or_default() += 1;
        }
    }

    let mut facets: Vec<CategoryFacet> = counts
        .into_iter()
        .map(|(name, count)| CategoryFacet {
            name: name.to_string(),
            count,
        })
        .collect();
    // BTreeMap already yields names ascending; a stable sort on the count
    // keeps that order within equal counts.
    facets.sort_by(|a, b| b.count.cmp(&a.count));
    facets
}

/// A multi-select of active categories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySelection {
    selected: BTreeSet<String>,
}

impl CategorySelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle a category in or out of the selection. Returns whether the
    /// category is selected afterwards.
    pub fn toggle(&mut self, category: &str) -> bool {
        if self.selected.remove(category) {
            false
        } else {
            self.selected.insert(category.to_string());
            true
        }
    }

    /// Reset to the empty selection (no filter).
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// The selected category values, ascending.
    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// Whether a card with this category passes the filter.
    ///
    /// An empty selection passes everything; otherwise the category must be
    /// a member of the selection.
    pub fn matches(&self, category: &str) -> bool {
        self.selected.is_empty() || self.selected.contains(category)
    }

    /// Narrow a card set to the cards passing the filter.
    pub fn filter<'a, T, F>(&self, cards: &'a [T], category_of: F) -> Vec<&'a T>
    where
        F: Fn(&T) -> &str,
    {
        cards
            .iter()
            .filter(|card| self.matches(category_of(card)))
            .collect()
    }
}
