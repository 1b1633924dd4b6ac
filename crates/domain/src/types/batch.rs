//! Batch invocation options and results

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::params::ParamSet;
use crate::errors::ArmoryError;

/// What the dispatcher does when an invocation fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Every parameter set gets its own outcome, failures included.
    #[default]
    CollectAll,
    /// The first completed failure becomes the batch error. Siblings that are
    /// still running are detached, not cancelled, and their outcomes are lost.
    FailFast,
}

/// Tuning for one batch dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// `None` runs one task per parameter set.
    pub max_concurrency: Option<usize>,
    pub failure_policy: FailurePolicy,
}

impl BatchOptions {
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit.max(1));
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

/// One parameter set paired with what its invocation produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub params: ParamSet,
    pub outcome: Result<Value, ArmoryError>,
}

/// Unordered (parameter set, outcome) pairs from one batch dispatch
///
/// Entries appear in completion order, not submission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    entries: Vec<BatchEntry>,
}

impl BatchResult {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::with_capacity(capacity) }
    }

    pub fn push(&mut self, params: ParamSet, outcome: Result<Value, ArmoryError>) {
        self.entries.push(BatchEntry { params, outcome });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BatchEntry> {
        self.entries.iter()
    }

    /// Entries whose invocation succeeded.
    pub fn successes(&self) -> impl Iterator<Item = (&ParamSet, &Value)> {
        self.entries.iter().filter_map(|e| e.outcome.as_ref().ok().map(|v| (&e.params, v)))
    }

    /// Entries whose invocation failed.
    pub fn failures(&self) -> impl Iterator<Item = (&ParamSet, &ArmoryError)> {
        self.entries.iter().filter_map(|e| e.outcome.as_ref().err().map(|err| (&e.params, err)))
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<BatchEntry> {
        self.entries
    }
}

impl IntoIterator for BatchResult {
    type Item = BatchEntry;
    type IntoIter = std::vec::IntoIter<BatchEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a BatchResult {
    type Item = &'a BatchEntry;
    type IntoIter = std::slice::Iter<'a, BatchEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
