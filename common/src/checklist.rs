// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog;
use crate::mutation::{self, ToggleOutcome, TogglePolicy};
use crate::progress::{aggregate, ProgressSnapshot};
use crate::TaskTemplate;

/// A statically authored group of tasks, e.g. "6 weeks before".
///
/// Membership is the `bucket` tag carried by each task; it is never derived
/// from the task's day offset.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WeekBucket {
    pub id: String,
    pub label: String,
    pub weeks_before: u32,
}

/// One bucket with its member tasks and their progress.
#[derive(Debug)]
pub struct BucketView<'a> {
    pub bucket: &'a WeekBucket,
    pub tasks: Vec<&'a TaskTemplate>,
    pub progress: ProgressSnapshot,
}

/// The checklist view state: week buckets plus the tasks tagged into them.
#[derive(Debug, Clone)]
pub struct Checklist {
    move_id: i64,
    buckets: Vec<WeekBucket>,
    tasks: Vec<TaskTemplate>,
    policy: TogglePolicy,
}

impl Checklist {
    pub fn new(move_id: i64, buckets: Vec<WeekBucket>, tasks: Vec<TaskTemplate>) -> Self {
        Self {
            move_id,
            buckets,
            tasks,
            policy: TogglePolicy::default(),
        }
    }

    /// A checklist seeded from the fixed catalog, all tasks pending.
    pub fn from_catalog(move_id: i64) -> Self {
        Self::new(move_id, catalog::week_buckets(), catalog::seed_tasks(move_id, 1))
    }

    pub fn with_policy(mut self, policy: TogglePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn tasks(&self) -> &[TaskTemplate] {
        &self.tasks
    }

    pub fn buckets(&self) -> &[WeekBucket] {
        &self.buckets
    }

    pub fn policy(&self) -> TogglePolicy {
        self.policy
    }

    pub fn toggle(&mut self, task_id: i64) -> ToggleOutcome {
        let outcome = mutation::toggle_task(&mut self.tasks, task_id, self.policy);
        info!("Checklist toggle of task {}: {:?}", task_id, outcome);
        outcome
    }

    /// Adds a custom task to `bucket_id`. Blank titles and unknown buckets
    /// are rejected without touching the checklist.
    pub fn add_custom_task(&mut self, title: &str, bucket_id: &str) -> Option<&TaskTemplate> {
        if !self.buckets.iter().any(|b| b.id == bucket_id) {
            debug!("Custom task rejected: unknown bucket {}.", bucket_id);
            return None;
        }
        let added = mutation::add_custom_task(&mut self.tasks, self.move_id, title, Some(bucket_id));
        if let Some(task) = added {
            info!("Added custom task {} to bucket {}.", task.id, bucket_id);
        }
        added
    }

    pub fn tasks_in<'a>(&'a self, bucket_id: &'a str) -> impl Iterator<Item = &'a TaskTemplate> + 'a {
        self.tasks
            .iter()
            .filter(move |t| t.bucket.as_deref() == Some(bucket_id))
    }

    pub fn bucket_progress(&self, bucket_id: &str) -> ProgressSnapshot {
        let (completed, total) = self
            .tasks_in(bucket_id)
            .fold((0, 0), |(done, all), t| (done + usize::from(t.completed), all + 1));
        ProgressSnapshot::new(completed, total)
    }

    pub fn overall_progress(&self) -> ProgressSnapshot {
        aggregate(&self.tasks)
    }

    /// Buckets in authoring order with their tasks.
    pub fn groups(&self) -> Vec<BucketView<'_>> {
        self.buckets
            .iter()
            .map(|bucket| {
                let tasks: Vec<&TaskTemplate> = self.tasks_in(&bucket.id).collect();
                let completed = tasks.iter().filter(|t| t.completed).count();
                BucketView {
                    bucket,
                    progress: ProgressSnapshot::new(completed, tasks.len()),
                    tasks,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, Priority};

    #[test]
    fn test_bucket_progress_composes_to_overall() {
        let mut checklist = Checklist::from_catalog(1);
        for id in [1, 2, 4, 9] {
            assert_eq!(checklist.toggle(id), ToggleOutcome::Completed);
        }

        let groups = checklist.groups();
        let combined = ProgressSnapshot::combine(groups.iter().map(|g| &g.progress));
        assert_eq!(combined, checklist.overall_progress());
        assert_eq!(combined.completed_count, 4);

        let eight_weeks = checklist.bucket_progress("8-weeks");
        assert_eq!(eight_weeks, ProgressSnapshot::new(2, 3));
        assert_eq!(eight_weeks.percent, 67);
    }

    #[test]
    fn test_bidirectional_by_default() {
        let mut checklist = Checklist::from_catalog(1);
        assert_eq!(checklist.toggle(3), ToggleOutcome::Completed);
        assert_eq!(checklist.toggle(3), ToggleOutcome::Reopened);
        assert_eq!(checklist.overall_progress().completed_count, 0);
    }

    #[test]
    fn test_one_way_policy() {
        let mut checklist = Checklist::from_catalog(1).with_policy(TogglePolicy::OneWay);
        assert_eq!(checklist.toggle(3), ToggleOutcome::Completed);
        assert_eq!(checklist.toggle(3), ToggleOutcome::Unchanged);
        assert_eq!(checklist.overall_progress().completed_count, 1);
    }

    #[test]
    fn test_custom_task_lands_in_its_bucket() {
        let mut checklist = Checklist::from_catalog(1);
        let before = checklist.bucket_progress("2-weeks").total_count;

        let added = checklist.add_custom_task("Pack garage", "2-weeks").unwrap();
        assert_eq!(added.category, Category::Custom);
        assert_eq!(added.priority, Priority::Medium);
        assert!(!added.completed);

        assert_eq!(checklist.bucket_progress("2-weeks").total_count, before + 1);
    }

    #[test]
    fn test_custom_task_rejections() {
        let mut checklist = Checklist::from_catalog(1);
        let len = checklist.tasks().len();
        assert!(checklist.add_custom_task("", "2-weeks").is_none());
        assert!(checklist.add_custom_task("Pack garage", "12-weeks").is_none());
        assert_eq!(checklist.tasks().len(), len);
    }

    #[test]
    fn test_empty_bucket_reports_zero() {
        let checklist = Checklist::new(1, catalog::week_buckets(), Vec::new());
        for group in checklist.groups() {
            assert_eq!(group.progress, ProgressSnapshot::default());
            assert!(group.tasks.is_empty());
        }
        assert_eq!(checklist.overall_progress().percent, 0);
    }
}
