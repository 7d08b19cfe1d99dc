//! # List Reconciliation
//!
//! Turns "the list currently on screen" plus "the list just published" into
//! the smallest set of edits that gets from one to the other, so the result
//! list can keep its selection and avoid a full rebuild.
//!
//! ```text
//! previous ──┐
//!            ├─ diff() ─→ [Remove…, Move…, Insert…, Update…] ─→ apply(previous) == next
//! next ──────┘
//! ```
//!
//! Items are matched by `Keyed::key()`. Operations are emitted in the order
//! they must be applied:
//!
//! 1. **Remove**: keys gone from `next`, highest index first.
//! 2. **Move**: retained items whose relative order changed. The longest
//!    increasing run (by target position) stays put; everything else moves
//!    to sit right after its target predecessor.
//! 3. **Insert**: new keys, lowest target index first.
//! 4. **Update**: retained items whose content changed, at their final index.
//!
//! `diff` is pure: same inputs, same output, no state between calls.

use std::collections::{HashMap, HashSet};
use std::fmt;

use log::warn;

/// Stable identity for reconciliation. Two items with the same key are "the
/// same item"; `PartialEq` decides whether its content changed.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// A single edit against the list as it stands after all previous edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation<T> {
    Insert { index: usize, item: T },
    Remove { index: usize },
    /// Remove at `from`, then insert at `to` in the shortened list.
    Move { from: usize, to: usize },
    Update { index: usize, item: T },
}

/// An operation pointed past the end of the list it was applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyError {
    pub index: usize,
    pub len: usize,
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "operation index {} out of range for list of {}", self.index, self.len)
    }
}

impl std::error::Error for ApplyError {}

/// Computes the edits that turn `previous` into `next`.
pub fn diff<T: Keyed + Clone + PartialEq>(previous: &[T], next: &[T]) -> Vec<Operation<T>> {
    let (Some(prev_index), Some(next_index)) = (index_by_key(previous), index_by_key(next)) else {
        warn!(
            "Duplicate keys in reconciliation input ({} -> {} items), rebuilding list",
            previous.len(),
            next.len()
        );
        return rebuild(previous, next);
    };

    let mut ops = Vec::new();

    for (i, item) in previous.iter().enumerate().rev() {
        if !next_index.contains_key(item.key()) {
            ops.push(Operation::Remove { index: i });
        }
    }

    // Retained keys as they sit after removals, and as they must end up.
    let mut work: Vec<&str> = previous
        .iter()
        .map(Keyed::key)
        .filter(|k| next_index.contains_key(k))
        .collect();
    let target: Vec<&str> = next
        .iter()
        .map(Keyed::key)
        .filter(|k| prev_index.contains_key(k))
        .collect();

    let rank: HashMap<&str, usize> = target.iter().enumerate().map(|(i, k)| (*k, i)).collect();
    let ranks: Vec<usize> = work.iter().map(|k| rank[k]).collect();
    let stable: HashSet<usize> = longest_increasing_run(&ranks).into_iter().collect();

    for (j, key) in target.iter().enumerate() {
        if stable.contains(&j) {
            continue;
        }
        let Some(from) = work.iter().position(|k| k == key) else {
            continue;
        };
        work.remove(from);
        let to = match j {
            0 => 0,
            _ => work
                .iter()
                .position(|k| *k == target[j - 1])
                .map_or(0, |p| p + 1),
        };
        work.insert(to, *key);
        if from != to {
            ops.push(Operation::Move { from, to });
        }
    }

    for (j, item) in next.iter().enumerate() {
        if !prev_index.contains_key(item.key()) {
            ops.push(Operation::Insert {
                index: j,
                item: item.clone(),
            });
        }
    }

    for (j, item) in next.iter().enumerate() {
        if let Some(&i) = prev_index.get(item.key())
            && previous[i] != *item
        {
            ops.push(Operation::Update {
                index: j,
                item: item.clone(),
            });
        }
    }

    ops
}

/// Applies `ops` in order. Stops at the first out-of-range operation, leaving
/// the list partially edited.
pub fn apply<T: Clone>(list: &mut Vec<T>, ops: &[Operation<T>]) -> Result<(), ApplyError> {
    for op in ops {
        let len = list.len();
        match op {
            Operation::Insert { index, item } => {
                check(*index, len + 1)?;
                list.insert(*index, item.clone());
            }
            Operation::Remove { index } => {
                check(*index, len)?;
                list.remove(*index);
            }
            Operation::Move { from, to } => {
                check(*from, len)?;
                check(*to, len)?;
                let item = list.remove(*from);
                list.insert(*to, item);
            }
            Operation::Update { index, item } => {
                check(*index, len)?;
                list[*index] = item.clone();
            }
        }
    }
    Ok(())
}

fn check(index: usize, bound: usize) -> Result<(), ApplyError> {
    if index < bound {
        Ok(())
    } else {
        Err(ApplyError {
            index,
            len: bound.saturating_sub(1),
        })
    }
}

/// Key → position, or `None` if any key repeats.
fn index_by_key<T: Keyed>(items: &[T]) -> Option<HashMap<&str, usize>> {
    let mut index = HashMap::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        if index.insert(item.key(), i).is_some() {
            return None;
        }
    }
    Some(index)
}

fn rebuild<T: Clone>(previous: &[T], next: &[T]) -> Vec<Operation<T>> {
    (0..previous.len())
        .rev()
        .map(|index| Operation::Remove { index })
        .chain(next.iter().enumerate().map(|(index, item)| Operation::Insert {
            index,
            item: item.clone(),
        }))
        .collect()
}

/// Values of one longest strictly increasing subsequence (patience sorting).
fn longest_increasing_run(values: &[usize]) -> Vec<usize> {
    // tails[k]: index of the smallest tail among increasing runs of length k + 1
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; values.len()];

    for (i, &v) in values.iter().enumerate() {
        let pos = tails.partition_point(|&t| values[t] < v);
        if pos > 0 {
            prev[i] = Some(tails[pos - 1]);
        }
        if pos == tails.len() {
            tails.push(i);
        } else {
            tails[pos] = i;
        }
    }

    let mut run = Vec::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        run.push(values[i]);
        cursor = prev[i];
    }
    run.reverse();
    run
}
