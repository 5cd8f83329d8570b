// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::schedule::{derive_status, TaskStatus};
use crate::TaskTemplate;

/// Completion summary over an arbitrary set of tasks.
///
/// Only the counts are authoritative; `percent` is a rounded display value
/// recomputed from them, so snapshots compose by summing counts.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    pub completed_count: usize,
    pub total_count: usize,
    pub percent: u8,
}

impl ProgressSnapshot {
    pub fn new(completed_count: usize, total_count: usize) -> Self {
        let completed_count = completed_count.min(total_count);
        Self {
            completed_count,
            total_count,
            percent: rounded_percent(completed_count, total_count),
        }
    }

    /// Unrounded completion ratio in `[0, 1]`.
    pub fn ratio(&self) -> f64 {
        if self.total_count == 0 {
            0.0
        } else {
            self.completed_count as f64 / self.total_count as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total_count > 0 && self.completed_count == self.total_count
    }

    /// Merges snapshots of disjoint task sets.
    pub fn combine<'a>(snapshots: impl IntoIterator<Item = &'a ProgressSnapshot>) -> Self {
        let (completed, total) = snapshots
            .into_iter()
            .fold((0, 0), |(c, t), s| (c + s.completed_count, t + s.total_count));
        Self::new(completed, total)
    }
}

// Half-up rounding in integers: floor((200c + t) / 2t) == round(100c / t).
fn rounded_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed as u128;
    let total = total as u128;
    ((completed * 200 + total) / (total * 2)) as u8
}

pub fn aggregate(tasks: &[TaskTemplate]) -> ProgressSnapshot {
    let completed = tasks.iter().filter(|t| t.completed).count();
    ProgressSnapshot::new(completed, tasks.len())
}

/// Progress per bucket tag, in order of first appearance. Untagged tasks are
/// not part of any bucket and are skipped.
pub fn aggregate_by_bucket(tasks: &[TaskTemplate]) -> Vec<(String, ProgressSnapshot)> {
    let mut buckets: Vec<(String, ProgressSnapshot)> = Vec::new();
    for task in tasks {
        let Some(bucket) = task.bucket.as_deref() else {
            continue;
        };
        let idx = match buckets.iter().position(|(name, _)| name == bucket) {
            Some(idx) => idx,
            None => {
                buckets.push((bucket.to_string(), ProgressSnapshot::default()));
                buckets.len() - 1
            }
        };
        let snapshot = &mut buckets[idx].1;
        *snapshot = ProgressSnapshot::new(
            snapshot.completed_count + usize::from(task.completed),
            snapshot.total_count + 1,
        );
    }
    buckets
}

/// Number of tasks per derived status.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusBreakdown {
    pub completed: usize,
    pub overdue: usize,
    pub due_today: usize,
    pub upcoming: usize,
}

impl StatusBreakdown {
    pub fn tally(tasks: &[TaskTemplate], move_date: NaiveDate, today: NaiveDate) -> Self {
        let mut breakdown = Self::default();
        for task in tasks {
            match derive_status(task, move_date, today) {
                TaskStatus::Completed => breakdown.completed += 1,
                TaskStatus::Overdue => breakdown.overdue += 1,
                TaskStatus::DueToday => breakdown.due_today += 1,
                TaskStatus::Upcoming => breakdown.upcoming += 1,
            }
        }
        breakdown
    }

    pub fn total(&self) -> usize {
        self.completed + self.overdue + self.due_today + self.upcoming
    }
}
