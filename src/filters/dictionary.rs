use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::FilterError;

use super::criterion::{FilterCriterion, FilterType, Operator};
use super::range::{check_range, RangeUpdate};

/// Dictionary key of a criterion: `{operand}__{operator}`, or
/// `{operand}.{category}` for categoric criteria. Operands are plain
/// identifiers, so neither separator can appear before the split point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FilterKey(String);

impl FilterKey {
    pub fn for_criterion(criterion: &FilterCriterion) -> Self {
        match criterion.category_name() {
            Some(category) => Self::category(&criterion.operand, category),
            None => Self::comparison(&criterion.operand, criterion.operator),
        }
    }

    pub fn comparison(operand: &str, operator: Operator) -> Self {
        FilterKey(format!("{}__{}", operand.trim(), operator))
    }

    pub fn category(operand: &str, category: &str) -> Self {
        FilterKey(format!("{}.{}", operand.trim(), category.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FilterKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keys touched by [`FilterDictionary::reconcile_categories`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    pub added: Vec<FilterKey>,
    pub removed: Vec<FilterKey>,
}

impl Reconciliation {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Active screener criteria, serialized verbatim as the screening request body.
///
/// Insertion order is kept. Entries never hold an empty value: adding an
/// empty criterion removes whatever was stored under its key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FilterDictionary {
    entries: IndexMap<FilterKey, FilterCriterion>,
}

impl FilterDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dictionary from externally supplied criteria, rejecting
    /// criteria without an operand.
    pub fn from_criteria<I>(criteria: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = FilterCriterion>,
    {
        let mut dictionary = Self::new();
        for criterion in criteria {
            criterion.validate()?;
            dictionary.add(criterion);
        }
        Ok(dictionary)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&FilterCriterion> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &FilterKey> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FilterKey, &FilterCriterion)> {
        self.entries.iter()
    }

    /// Insert or overwrite the entry for `criterion`'s key and return the key.
    pub fn add(&mut self, criterion: FilterCriterion) -> FilterKey {
        debug_assert!(
            !criterion.operand.trim().is_empty(),
            "filter criterion without operand"
        );

        let key = FilterKey::for_criterion(&criterion);
        if criterion.has_effective_value() {
            log::debug!(target: "filters.add", "{key} = {}", criterion.describe());
            self.entries.insert(key.clone(), criterion);
        } else if self.entries.shift_remove(&key).is_some() {
            log::debug!(target: "filters.remove", "{key} cleared by empty value");
        }
        key
    }

    pub fn remove(&mut self, key: &str) -> Option<FilterCriterion> {
        let removed = self.entries.shift_remove(key);
        if removed.is_some() {
            log::debug!(target: "filters.remove", "{key}");
        }
        removed
    }

    pub fn clear(&mut self) {
        log::debug!(target: "filters.clear", "dropping {} filters", self.entries.len());
        self.entries.clear();
    }

    /// Make the categoric entries of `operand` match exactly the `checked` set.
    pub fn reconcile_categories<I, S>(&mut self, operand: &str, checked: I) -> Reconciliation
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let operand = operand.trim();
        let wanted: Vec<String> = checked
            .into_iter()
            .map(|category| category.as_ref().trim().to_string())
            .filter(|category| !category.is_empty())
            .collect();
        let wanted_set: HashSet<&str> = wanted.iter().map(String::as_str).collect();

        let stale: Vec<FilterKey> = self
            .entries
            .iter()
            .filter(|(_, criterion)| {
                criterion.operand == operand && criterion.filter_type == FilterType::Categoric
            })
            .filter(|(_, criterion)| {
                criterion
                    .category_name()
                    .map_or(true, |category| !wanted_set.contains(category))
            })
            .map(|(key, _)| key.clone())
            .collect();

        let mut outcome = Reconciliation::default();
        for key in stale {
            self.entries.shift_remove(&key);
            outcome.removed.push(key);
        }
        for category in &wanted {
            let key = FilterKey::category(operand, category);
            if !self.entries.contains_key(&key) {
                self.add(FilterCriterion::category(operand, category));
                outcome.added.push(key);
            }
        }

        if !outcome.is_noop() {
            log::debug!(
                target: "filters.reconcile",
                "{operand}: +{} -{}",
                outcome.added.len(),
                outcome.removed.len()
            );
        }
        outcome
    }

    /// Apply a min/max input pair as two independent criteria,
    /// `{operand}__gte` and `{operand}__lte`.
    ///
    /// An inverted pair is reported through [`RangeUpdate::warning`] but both
    /// bounds are stored anyway.
    pub fn set_range(&mut self, operand: &str, min: Option<f64>, max: Option<f64>) -> RangeUpdate {
        let bound = |operator: Operator, value: Option<f64>| match value {
            Some(value) => FilterCriterion::numeric(operand, operator, value),
            None => FilterCriterion::with_value(operand, operator, FilterType::Numeric, None),
        };

        let min_key = self.add(bound(Operator::Gte, min));
        let max_key = self.add(bound(Operator::Lte, max));
        RangeUpdate {
            min_key,
            max_key,
            warning: check_range(min, max),
        }
    }

    /// Free-text `contains` filter; blank text removes it.
    pub fn set_text(&mut self, operand: &str, text: &str) -> FilterKey {
        self.add(FilterCriterion::text(operand, text))
    }

    /// Checked categories of `operand`, in insertion order.
    pub fn categories<'a>(&'a self, operand: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .values()
            .filter(move |criterion| criterion.operand == operand)
            .filter_map(FilterCriterion::category_name)
    }
}
