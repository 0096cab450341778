//! Sparse interval storage for text attributes.
//!
//! Each [`AttributeKey`] owns an ordered list of runs. Runs of one key never
//! overlap, are never empty, and two touching runs with equal values are
//! always merged, so two stores describing the same styling compare equal.

use std::collections::BTreeMap;

use crate::attribute::{Attribute, AttributeKey};
use crate::types::TextRange;

/// One attribute value applied over a range.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub range: TextRange,
    pub value: Attribute,
}

/// Attribute runs for a whole text, keyed by attribute kind.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeStore {
    runs: BTreeMap<AttributeKey, Vec<Run>>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// The value of `key` at `offset`.
    pub fn get(&self, key: AttributeKey, offset: usize) -> Option<&Attribute> {
        self.get_with_range(key, offset).map(|(value, _)| value)
    }

    /// The value of `key` at `offset` together with the full run it belongs to.
    pub fn get_with_range(&self, key: AttributeKey, offset: usize) -> Option<(&Attribute, TextRange)> {
        let runs = self.runs.get(&key)?;
        let idx = runs.partition_point(|run| run.range.end <= offset);
        let run = runs.get(idx)?;
        run.range
            .contains(offset)
            .then_some((&run.value, run.range))
    }

    /// Every attribute present at `offset`.
    pub fn attributes_at(&self, offset: usize) -> Vec<Attribute> {
        AttributeKey::ALL
            .iter()
            .filter_map(|key| self.get(*key, offset).cloned())
            .collect()
    }

    /// Runs of `key` intersecting `range`, clipped to it, in order.
    pub fn runs_in(&self, key: AttributeKey, range: TextRange) -> impl Iterator<Item = (TextRange, &Attribute)> {
        let runs = self.runs.get(&key).map(Vec::as_slice).unwrap_or_default();
        let first = runs.partition_point(|run| run.range.end <= range.start);
        runs[first..]
            .iter()
            .take_while(move |run| run.range.start < range.end)
            .filter_map(move |run| {
                run.range
                    .intersection(&range)
                    .map(|clipped| (clipped, &run.value))
            })
    }

    /// All runs of `key`.
    pub fn runs(&self, key: AttributeKey) -> &[Run] {
        self.runs.get(&key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Apply `value` over `range`, replacing whatever that key held there.
    pub fn set(&mut self, range: TextRange, value: Attribute) {
        if range.is_empty() {
            return;
        }
        let key = value.key();
        self.clear(range, key);
        let runs = self.runs.entry(key).or_default();
        let idx = runs.partition_point(|run| run.range.start < range.start);
        runs.insert(idx, Run { range, value });
        Self::coalesce(runs);
    }

    /// Remove `key` from `range`, splitting runs that straddle its bounds.
    pub fn clear(&mut self, range: TextRange, key: AttributeKey) {
        if range.is_empty() {
            return;
        }
        let Some(runs) = self.runs.get_mut(&key) else {
            return;
        };
        let mut kept = Vec::with_capacity(runs.len() + 1);
        for run in runs.drain(..) {
            if !run.range.overlaps(&range) {
                kept.push(run);
                continue;
            }
            if run.range.start < range.start {
                kept.push(Run {
                    range: TextRange::new(run.range.start, range.start),
                    value: run.value.clone(),
                });
            }
            if run.range.end > range.end {
                kept.push(Run {
                    range: TextRange::new(range.end, run.range.end),
                    value: run.value,
                });
            }
        }
        if kept.is_empty() {
            self.runs.remove(&key);
        } else {
            *runs = kept;
        }
    }

    /// Account for `edited` being replaced by `inserted_len` characters.
    ///
    /// Runs after the edit shift, runs overlapping it lose the replaced part,
    /// and the inserted characters are left without attributes.
    pub fn splice(&mut self, edited: TextRange, inserted_len: usize) {
        let delta = inserted_len as isize - edited.len() as isize;
        for runs in self.runs.values_mut() {
            let mut spliced = Vec::with_capacity(runs.len() + 1);
            for run in runs.drain(..) {
                let range = run.range;
                if range.end <= edited.start {
                    spliced.push(run);
                } else if range.start >= edited.end {
                    spliced.push(Run {
                        range: range.shifted(delta),
                        value: run.value,
                    });
                } else {
                    if range.start < edited.start {
                        spliced.push(Run {
                            range: TextRange::new(range.start, edited.start),
                            value: run.value.clone(),
                        });
                    }
                    if range.end > edited.end {
                        let start = edited.start + inserted_len;
                        spliced.push(Run {
                            range: TextRange::new(start, start + (range.end - edited.end)),
                            value: run.value,
                        });
                    }
                }
            }
            Self::coalesce(&mut spliced);
            *runs = spliced;
        }
        self.runs.retain(|_, runs| !runs.is_empty());
    }

    /// A copy of the runs inside `range`, rebased so `range.start` becomes 0.
    pub fn slice(&self, range: TextRange) -> AttributeStore {
        let mut out = AttributeStore::new();
        for key in self.runs.keys() {
            let runs: Vec<Run> = self
                .runs_in(*key, range)
                .map(|(clipped, value)| Run {
                    range: clipped.shifted(-(range.start as isize)),
                    value: value.clone(),
                })
                .collect();
            if !runs.is_empty() {
                out.runs.insert(*key, runs);
            }
        }
        out
    }

    /// Copy every run of `other` into this store, shifted by `offset`.
    pub fn overlay(&mut self, offset: usize, other: &AttributeStore) {
        for runs in other.runs.values() {
            for run in runs {
                self.set(run.range.shifted(offset as isize), run.value.clone());
            }
        }
    }

    fn coalesce(runs: &mut Vec<Run>) {
        runs.dedup_by(|next, prev| {
            if prev.range.end == next.range.start && prev.value == next.value {
                prev.range.end = next.range.end;
                true
            } else {
                false
            }
        });
    }
}

/// An owned string with attribute runs, used as a replacement payload and
/// as the result of reading a range out of the storage.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributedString {
    text: String,
    attributes: AttributeStore,
}

impl AttributedString {
    /// Text with no attributes.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attributes: AttributeStore::new(),
        }
    }

    pub fn from_parts(text: String, attributes: AttributeStore) -> Self {
        Self { text, attributes }
    }

    /// Text with one attribute over all of it.
    pub fn styled(text: impl Into<String>, value: Attribute) -> Self {
        let mut out = Self::plain(text);
        let len = out.len();
        out.add_attribute(TextRange::new(0, len), value);
        out
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn add_attribute(&mut self, range: TextRange, value: Attribute) {
        let range = range.clamped(self.len());
        self.attributes.set(range, value);
    }

    pub fn with_attribute(mut self, range: TextRange, value: Attribute) -> Self {
        self.add_attribute(range, value);
        self
    }

    pub fn attribute_at(&self, key: AttributeKey, offset: usize) -> Option<&Attribute> {
        self.attributes.get(key, offset)
    }

    /// Append another attributed string.
    pub fn append(&mut self, other: &AttributedString) {
        let offset = self.len();
        self.text.push_str(&other.text);
        self.attributes.overlay(offset, &other.attributes);
    }

    /// Append unattributed text.
    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// The chars in `range`, with their attributes. None if out of bounds.
    pub fn substring(&self, range: TextRange) -> Option<AttributedString> {
        let text = char_slice(&self.text, range)?;
        Some(Self {
            text: text.to_string(),
            attributes: self.attributes.slice(range),
        })
    }
}

impl From<&str> for AttributedString {
    fn from(s: &str) -> Self {
        Self::plain(s)
    }
}

impl From<String> for AttributedString {
    fn from(s: String) -> Self {
        Self::plain(s)
    }
}

/// Slice a `str` by char offsets.
pub fn char_slice(s: &str, range: TextRange) -> Option<&str> {
    let mut indices = s.char_indices().map(|(i, _)| i).chain(std::iter::once(s.len()));
    let start = indices.nth(range.start)?;
    let end = if range.is_empty() {
        start
    } else {
        indices.nth(range.len() - 1)?
    };
    Some(&s[start..end])
}
