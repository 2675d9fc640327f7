//! Labelled datasets built from a result set.
//!
//! A [`Dataset`] pairs each file path with the value of one metadata key,
//! the label. It can be split into train and test parts that keep the
//! label proportions of the whole, reproducibly for a given seed.

use std::collections::BTreeMap;

use pathmeta_seeker::{natural_cmp, ResultSet};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::error::{Error, Result};

/// Seed used by [`Dataset::train_test_split`] callers that have no
/// preference.
pub const DEFAULT_SEED: u64 = 42;

/// Fraction of each label moved to the test part by default.
pub const DEFAULT_TEST_RATE: f64 = 0.25;

/// File paths paired with the value of a target key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    target_key: String,
    entries: Vec<(String, String)>,
}

/// The two parts of a split dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
}

impl Dataset {
    /// Collects `(path, label)` pairs from every record carrying a file
    /// path, in result set order.
    ///
    /// Fails with [`Error::MissingLabel`] when such a record lacks
    /// `target_key`.
    pub fn new(set: &ResultSet, target_key: impl Into<String>) -> Result<Self> {
        let target_key = target_key.into();
        let entries = set
            .iter()
            .filter_map(|record| record.path().map(|path| (path, record)))
            .map(|(path, record)| match record.get(&target_key) {
                Some(label) => Ok((path.to_string(), label.to_string())),
                None => Err(Error::MissingLabel {
                    path: path.to_string(),
                    key: target_key.clone(),
                }),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Dataset {
            target_key,
            entries,
        })
    }

    pub fn target_key(&self) -> &str {
        &self.target_key
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `(path, label)` pair at `index`.
    pub fn get(&self, index: usize) -> Option<(&str, &str)> {
        self.entries
            .get(index)
            .map(|(path, label)| (path.as_str(), label.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(path, label)| (path.as_str(), label.as_str()))
    }

    pub fn paths(&self) -> Vec<&str> {
        self.iter().map(|(path, _)| path).collect()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.iter().map(|(_, label)| label).collect()
    }

    /// Distinct labels in natural order.
    pub fn classes(&self) -> Vec<&str> {
        let mut classes = self.labels();
        classes.sort_by(|a, b| natural_cmp(a, b));
        classes.dedup();
        classes
    }

    /// Maps each distinct label to its position in [`classes`](Self::classes).
    pub fn label_index(&self) -> BTreeMap<String, usize> {
        self.classes()
            .into_iter()
            .enumerate()
            .map(|(i, label)| (label.to_string(), i))
            .collect()
    }

    /// Splits into train and test parts, stratified by label.
    ///
    /// Each label contributes `round(count * test_rate)` entries to the test
    /// part, chosen by a shuffle seeded with `seed`. A label seen at least
    /// twice always keeps one entry on each side; a label seen once stays in
    /// train. Both parts keep the original entry order.
    pub fn train_test_split(&self, test_rate: f64, seed: u64) -> Result<Split> {
        if !(test_rate > 0.0 && test_rate < 1.0) {
            return Err(Error::InvalidSplit(test_rate));
        }

        let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (index, (_, label)) in self.entries.iter().enumerate() {
            groups.entry(label.as_str()).or_default().push(index);
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut in_test = vec![false; self.entries.len()];
        for indices in groups.values_mut() {
            let count = indices.len();
            let take = if count < 2 {
                0
            } else {
                ((count as f64 * test_rate).round() as usize).clamp(1, count - 1)
            };
            indices.shuffle(&mut rng);
            for &index in &indices[..take] {
                in_test[index] = true;
            }
        }

        let (test, train): (Vec<_>, Vec<_>) = self
            .entries
            .iter()
            .zip(&in_test)
            .partition(|(_, test)| **test);
        let part = |entries: Vec<(&(String, String), &bool)>| Dataset {
            target_key: self.target_key.clone(),
            entries: entries.into_iter().map(|(entry, _)| entry.clone()).collect(),
        };
        let split = Split {
            train: part(train),
            test: part(test),
        };

        debug!(
            key = %self.target_key,
            train = split.train.len(),
            test = split.test.len(),
            seed,
            "split dataset"
        );
        Ok(split)
    }
}
