use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::question::AnswerOption;

/// Selected option per question index. Missing entries are unanswered.
///
/// Serializes as `{"0": "A", "3": "C"}`, the shape stored in attempt snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers(BTreeMap<usize, AnswerOption>);

impl Answers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<AnswerOption> {
        self.0.get(&index).copied()
    }

    /// Upsert the answer for `index`. Returns true when the stored value changed.
    pub fn set(&mut self, index: usize, option: AnswerOption) -> bool {
        self.0.insert(index, option) != Some(option)
    }

    #[must_use]
    pub fn is_answered(&self, index: usize) -> bool {
        self.0.contains_key(&index)
    }

    /// Number of answered questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, AnswerOption)> + '_ {
        self.0.iter().map(|(index, option)| (*index, *option))
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }
}

impl FromIterator<(usize, AnswerOption)> for Answers {
    fn from_iter<T: IntoIterator<Item = (usize, AnswerOption)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
