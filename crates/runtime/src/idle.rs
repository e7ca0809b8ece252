//! Deferred work that runs in the idle tail of a frame.
//!
//! Mirrors an idle-callback-with-timeout primitive on a single thread:
//! - Tasks are keyed, so the owner can cancel by key when the work is no
//!   longer wanted (e.g. a chunk left the active set before it was built).
//! - Tasks run in scheduling order while the frame budget lasts.
//! - A task whose deadline has passed runs this frame even if the budget is
//!   exhausted, so nothing starves during sustained load.
use std::collections::BTreeMap;

use foundation::time::Millis;

use crate::budget::FrameBudget;

#[derive(Debug)]
struct Task<K, T> {
    key: K,
    payload: T,
    deadline: Millis,
    cost_units: u32,
}

#[derive(Debug)]
pub struct IdleQueue<K: Ord + Clone, T> {
    next_seq: u64,
    tasks: BTreeMap<u64, Task<K, T>>,
    by_key: BTreeMap<K, u64>,
}

impl<K: Ord + Clone, T> Default for IdleQueue<K, T> {
    fn default() -> Self {
        Self {
            next_seq: 0,
            tasks: BTreeMap::new(),
            by_key: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Clone, T> IdleQueue<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.by_key.contains_key(key)
    }

    /// Schedule `payload` under `key`.
    ///
    /// Returns `false` (and drops `payload`) if work for `key` is already
    /// pending; the earlier task keeps its place and deadline.
    pub fn schedule(&mut self, key: K, payload: T, deadline: Millis, cost_units: u32) -> bool {
        if self.by_key.contains_key(&key) {
            return false;
        }
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.by_key.insert(key.clone(), seq);
        self.tasks.insert(
            seq,
            Task {
                key,
                payload,
                deadline,
                cost_units,
            },
        );
        true
    }

    pub fn cancel(&mut self, key: &K) -> bool {
        match self.by_key.remove(key) {
            Some(seq) => self.tasks.remove(&seq).is_some(),
            None => false,
        }
    }

    /// Drops every pending task, returning how many were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.tasks.len();
        self.tasks.clear();
        self.by_key.clear();
        n
    }

    /// Removes and returns the tasks that should run this frame.
    ///
    /// Overdue tasks come first (in scheduling order) and are charged to the
    /// budget unconditionally. Remaining tasks follow in scheduling order until
    /// the first one the budget cannot cover.
    pub fn take_ready(&mut self, now: Millis, budget: &mut FrameBudget) -> Vec<(K, T)> {
        let overdue: Vec<u64> = self
            .tasks
            .iter()
            .filter(|(_, t)| t.deadline <= now)
            .map(|(seq, _)| *seq)
            .collect();

        let mut out = Vec::new();
        for seq in overdue {
            if let Some(task) = self.remove_seq(seq) {
                budget.force_consume(task.cost_units);
                out.push((task.key, task.payload));
            }
        }

        while let Some((seq, cost_units)) = self.tasks.iter().next().map(|(s, t)| (*s, t.cost_units))
        {
            if !budget.try_consume(cost_units) {
                break;
            }
            if let Some(task) = self.remove_seq(seq) {
                out.push((task.key, task.payload));
            }
        }

        out
    }

    fn remove_seq(&mut self, seq: u64) -> Option<Task<K, T>> {
        let task = self.tasks.remove(&seq)?;
        self.by_key.remove(&task.key);
        Some(task)
    }
}
