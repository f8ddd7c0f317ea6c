//! Custom-dictionary reconciliation.
//!
//! Hosts hand over the full custom word list whenever it changes. The
//! checker only needs the difference against what it was last told, so
//! `DictionarySync` keeps that set and turns each new list into the minimal
//! add/remove messages.

use std::collections::BTreeSet;

use crate::protocol::CheckerInput;

/// Words to add and remove, lowercased and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub to_add: Vec<String>,
    pub to_remove: Vec<String>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// One `ADD_WORD`/`REMOVE_WORD` per word, adds first.
    pub fn into_messages(self) -> Vec<CheckerInput> {
        self.to_add
            .into_iter()
            .map(|word| CheckerInput::AddWord { word })
            .chain(
                self.to_remove
                    .into_iter()
                    .map(|word| CheckerInput::RemoveWord { word }),
            )
            .collect()
    }

    /// At most one `ADD_WORDS` and one `REMOVE_WORDS`.
    pub fn into_batched_messages(self) -> Vec<CheckerInput> {
        let mut messages = Vec::with_capacity(2);
        if !self.to_add.is_empty() {
            messages.push(CheckerInput::AddWords { words: self.to_add });
        }
        if !self.to_remove.is_empty() {
            messages.push(CheckerInput::RemoveWords {
                words: self.to_remove,
            });
        }
        messages
    }
}

#[derive(Debug, Clone, Default)]
pub struct DictionarySync {
    synced: BTreeSet<String>,
}

impl DictionarySync {
    pub fn new() -> Self {
        Self::default()
    }

    /// The set the checker currently holds, as far as we know.
    pub fn synced(&self) -> &BTreeSet<String> {
        &self.synced
    }

    /// Difference between `current` and the synced set, without recording it.
    pub fn diff<I, S>(&self, current: I) -> SyncPlan
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.plan_for(&normalize(current))
    }

    fn plan_for(&self, current: &BTreeSet<String>) -> SyncPlan {
        SyncPlan {
            to_add: current.difference(&self.synced).cloned().collect(),
            to_remove: self.synced.difference(current).cloned().collect(),
        }
    }

    /// Compute the plan for `current` and record `current` as synced.
    ///
    /// The caller is expected to send the plan's messages.
    pub fn sync<I, S>(&mut self, current: I) -> SyncPlan
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let current = normalize(current);
        let plan = self.plan_for(&current);
        if !plan.is_empty() {
            tracing::debug!(
                target: "scrivener::spellcheck",
                add = plan.to_add.len(),
                remove = plan.to_remove.len(),
                "custom dictionary changed"
            );
        }
        self.synced = current;
        plan
    }

    /// Forget the synced set, e.g. after the worker was restarted.
    pub fn reset(&mut self) {
        self.synced.clear();
    }
}

fn normalize<I, S>(words: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| w.as_ref().trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sync_adds_everything() {
        let mut sync = DictionarySync::new();
        let plan = sync.sync(["Helo", "scrivener"]);
        assert_eq!(plan.to_add, vec!["helo", "scrivener"]);
        assert!(plan.to_remove.is_empty());
    }

    #[test]
    fn test_minimal_difference() {
        let mut sync = DictionarySync::new();
        sync.sync(["alpha", "beta", "gamma"]);
        let plan = sync.sync(["beta", "Gamma", "delta"]);
        assert_eq!(plan.to_add, vec!["delta"]);
        assert_eq!(plan.to_remove, vec!["alpha"]);
        assert!(sync.sync(["delta", "gamma", "beta"]).is_empty());
    }

    #[test]
    fn test_diff_does_not_record() {
        let mut sync = DictionarySync::new();
        sync.sync(["one"]);
        let plan = sync.diff(["two"]);
        assert_eq!(plan.to_add, vec!["two"]);
        assert_eq!(sync.synced().len(), 1);
    }

    #[test]
    fn test_message_forms() {
        let plan = SyncPlan {
            to_add: vec!["a".into(), "b".into()],
            to_remove: vec!["c".into()],
        };
        assert_eq!(
            plan.clone().into_messages(),
            vec![
                CheckerInput::AddWord { word: "a".into() },
                CheckerInput::AddWord { word: "b".into() },
                CheckerInput::RemoveWord { word: "c".into() },
            ]
        );
        assert_eq!(
            plan.into_batched_messages(),
            vec![
                CheckerInput::AddWords {
                    words: vec!["a".into(), "b".into()]
                },
                CheckerInput::RemoveWords {
                    words: vec!["c".into()]
                },
            ]
        );
    }
}
