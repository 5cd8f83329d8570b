// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
//! Fixed task catalog attached to every new move.

use crate::checklist::WeekBucket;
use crate::{Category, Priority, TaskTemplate};

/// An authored task before it is attached to a move.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub title: &'static str,
    pub description: &'static str,
    pub day_offset: i32,
    pub category: Category,
    pub priority: Priority,
    pub estimated_time: &'static str,
    pub bucket: &'static str,
}

pub const BUCKETS: [(&str, &str, u32); 6] = [
    ("8-weeks", "8 weeks before", 8),
    ("6-weeks", "6 weeks before", 6),
    ("4-weeks", "4 weeks before", 4),
    ("2-weeks", "2 weeks before", 2),
    ("1-week", "1 week before", 1),
    ("moving-day", "Moving day", 0),
];

// Buckets are authored alongside each entry, not computed from the offset.
const TIMELINE: &[CatalogEntry] = &[
    CatalogEntry {
        title: "Research moving companies",
        description: "Collect at least three quotes and check reviews.",
        day_offset: -56,
        category: Category::Logistics,
        priority: Priority::High,
        estimated_time: "3 hours",
        bucket: "8-weeks",
    },
    CatalogEntry {
        title: "Create a moving budget",
        description: "Estimate movers, supplies, deposits and travel.",
        day_offset: -54,
        category: Category::Preparation,
        priority: Priority::Medium,
        estimated_time: "1 hour",
        bucket: "8-weeks",
    },
    CatalogEntry {
        title: "Declutter and sort belongings",
        description: "Decide what to keep, sell, donate or throw away.",
        day_offset: -49,
        category: Category::Preparation,
        priority: Priority::Medium,
        estimated_time: "1 day",
        bucket: "8-weeks",
    },
    CatalogEntry {
        title: "Book the moving company",
        description: "Confirm the date, the crew size and the insurance cover.",
        day_offset: -42,
        category: Category::Logistics,
        priority: Priority::High,
        estimated_time: "1 hour",
        bucket: "6-weeks",
    },
    CatalogEntry {
        title: "Order packing supplies",
        description: "Boxes, tape, bubble wrap and markers.",
        day_offset: -35,
        category: Category::Supplies,
        priority: Priority::Medium,
        estimated_time: "30 minutes",
        bucket: "6-weeks",
    },
    CatalogEntry {
        title: "Schedule utility transfers",
        description: "Electricity, gas, water and internet at both addresses.",
        day_offset: -28,
        category: Category::Utilities,
        priority: Priority::High,
        estimated_time: "2 hours",
        bucket: "4-weeks",
    },
    CatalogEntry {
        title: "Start packing non-essentials",
        description: "Books, seasonal clothes and decorations first.",
        day_offset: -21,
        category: Category::Packing,
        priority: Priority::Medium,
        estimated_time: "1 week",
        bucket: "4-weeks",
    },
    CatalogEntry {
        title: "Submit change of address",
        description: "Postal service, bank, employer and subscriptions.",
        day_offset: -14,
        category: Category::AddressChange,
        priority: Priority::High,
        estimated_time: "1 hour",
        bucket: "2-weeks",
    },
    CatalogEntry {
        title: "Confirm moving day details",
        description: "Call the movers to confirm arrival time and access.",
        day_offset: -7,
        category: Category::Logistics,
        priority: Priority::High,
        estimated_time: "15 minutes",
        bucket: "1-week",
    },
    CatalogEntry {
        title: "Pack an essentials box",
        description: "Documents, medication, chargers and a change of clothes.",
        day_offset: -2,
        category: Category::Packing,
        priority: Priority::High,
        estimated_time: "1 hour",
        bucket: "1-week",
    },
    CatalogEntry {
        title: "Final walkthrough",
        description: "Check every room, closet and cupboard before leaving.",
        day_offset: 0,
        category: Category::MovingDay,
        priority: Priority::High,
        estimated_time: "30 minutes",
        bucket: "moving-day",
    },
    CatalogEntry {
        title: "Update vehicle registration",
        description: "Register the new address with the licensing office.",
        day_offset: 7,
        category: Category::AddressChange,
        priority: Priority::Low,
        estimated_time: "1 hour",
        bucket: "moving-day",
    },
];

pub fn timeline_catalog() -> &'static [CatalogEntry] {
    TIMELINE
}

/// Whether `bucket_id` names one of the authored week buckets.
pub fn is_known_bucket(bucket_id: &str) -> bool {
    BUCKETS.iter().any(|(id, _, _)| *id == bucket_id)
}

pub fn week_buckets() -> Vec<WeekBucket> {
    BUCKETS
        .iter()
        .map(|(id, label, weeks)| WeekBucket {
            id: id.to_string(),
            label: label.to_string(),
            weeks_before: *weeks,
        })
        .collect()
}

impl CatalogEntry {
    pub fn instantiate(&self, id: i64, move_id: i64) -> TaskTemplate {
        TaskTemplate {
            id,
            move_id,
            title: self.title.to_string(),
            description: self.description.to_string(),
            day_offset: Some(self.day_offset),
            category: self.category,
            priority: self.priority,
            completed: false,
            estimated_time: Some(self.estimated_time.to_string()),
            bucket: Some(self.bucket.to_string()),
        }
    }
}

/// The whole catalog as fresh tasks of `move_id`, numbered from `first_id`.
pub fn seed_tasks(move_id: i64, first_id: i64) -> Vec<TaskTemplate> {
    TIMELINE
        .iter()
        .zip(first_id..)
        .map(|(entry, id)| entry.instantiate(id, move_id))
        .collect()
}
