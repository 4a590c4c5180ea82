//! Filter selection and its query-parameter form.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Known filter dimension names (also the query parameter names).
pub mod dimensions {
    pub const WORK_REQUEST_STATUS: &str = "work_request_status";
    pub const REQUESTED_BY: &str = "requested_by";
    pub const CRAFTSPERSON_NAME: &str = "craftsperson_name";
    pub const PRIMARY_TRADE: &str = "primary_trade";
    pub const TIME_TO_COMPLETE: &str = "time_to_complete";
}

/// Fixed buckets of the `time_to_complete` dimension, in days.
pub const TIME_TO_COMPLETE_BUCKETS: [&str; 3] = ["less_than_10", "10-30", "more_than_30"];

/// A selectable option value. Compared structurally.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Integer(i64),
    Text(String),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Integer(n) => write!(f, "{n}"),
            FilterValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Integer(n)
    }
}

/// Selected values per filter dimension.
///
/// An absent dimension places no constraint. A dimension that was touched
/// and then emptied stays present with an empty set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSelection {
    selected: BTreeMap<String, BTreeSet<FilterValue>>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` to `dimension` if absent, remove it if present.
    ///
    /// Returns whether the value is selected afterwards.
    pub fn toggle(&mut self, dimension: &str, value: impl Into<FilterValue>) -> bool {
        let value = value.into();
        let set = self.selected.entry(dimension.to_string()).or_default();
        if set.remove(&value) {
            false
        } else {
            set.insert(value);
            true
        }
    }

    /// Replace the selection of `dimension`. Returns whether anything changed.
    pub fn set<I, V>(&mut self, dimension: &str, values: I) -> bool
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        let values: BTreeSet<FilterValue> = values.into_iter().map(Into::into).collect();
        match self.selected.get(dimension) {
            Some(current) if *current == values => false,
            None if values.is_empty() => false,
            _ => {
                self.selected.insert(dimension.to_string(), values);
                true
            }
        }
    }

    /// Reset every dimension to an empty set.
    pub fn clear(&mut self) {
        for set in self.selected.values_mut() {
            set.clear();
        }
    }

    pub fn is_selected(&self, dimension: &str, value: &FilterValue) -> bool {
        self.selected
            .get(dimension)
            .is_some_and(|set| set.contains(value))
    }

    pub fn selected(&self, dimension: &str) -> Option<&BTreeSet<FilterValue>> {
        self.selected.get(dimension)
    }

    /// True when no dimension has any selected value.
    pub fn is_unconstrained(&self) -> bool {
        self.selected.values().all(BTreeSet::is_empty)
    }

    /// Flat `dimension -> "v1,v2"` form for query parameters.
    ///
    /// Every present dimension appears; an emptied one maps to `""`.
    pub fn to_query_descriptor(&self) -> QueryDescriptor {
        let params = self
            .selected
            .iter()
            .map(|(dimension, values)| {
                let joined = values
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                (dimension.clone(), joined)
            })
            .collect();
        QueryDescriptor { params }
    }
}

/// Filter selection flattened to query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryDescriptor {
    params: BTreeMap<String, String>,
}

impl QueryDescriptor {
    pub fn get(&self, dimension: &str) -> Option<&str> {
        self.params.get(dimension).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Legal values per dimension, as offered to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawOptions")]
pub struct FilterOptions {
    options: BTreeMap<String, Vec<FilterValue>>,
}

/// Server payload; option lists may contain nulls from empty columns.
#[derive(Deserialize)]
#[serde(transparent)]
struct RawOptions(BTreeMap<String, Vec<Option<FilterValue>>>);

impl From<RawOptions> for FilterOptions {
    fn from(raw: RawOptions) -> Self {
        let options = raw
            .0
            .into_iter()
            .map(|(dimension, values)| (dimension, values.into_iter().flatten().collect()))
            .collect();
        Self { options }
    }
}

impl FilterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, dimension: impl Into<String>, values: Vec<FilterValue>) {
        self.options.insert(dimension.into(), values);
    }

    /// Add the client-known `time_to_complete` buckets.
    pub fn with_static_buckets(mut self) -> Self {
        self.options.insert(
            dimensions::TIME_TO_COMPLETE.to_string(),
            TIME_TO_COMPLETE_BUCKETS
                .iter()
                .map(|b| FilterValue::from(*b))
                .collect(),
        );
        self
    }

    pub fn values(&self, dimension: &str) -> &[FilterValue] {
        self.options
            .get(dimension)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn dimensions(&self) -> impl Iterator<Item = &str> {
        self.options.keys().map(String::as_str)
    }
}
