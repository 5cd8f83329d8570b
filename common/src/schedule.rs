// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::fmt;

use chrono::{DateTime, Days, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::TaskTemplate;

/// Urgency of a task, derived at read time and never stored.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Completed,
    Overdue,
    DueToday,
    Upcoming,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskStatus::Completed => "completed",
            TaskStatus::Overdue => "overdue",
            TaskStatus::DueToday => "due-today",
            TaskStatus::Upcoming => "upcoming",
        };
        f.write_str(label)
    }
}

/// Projects a day offset onto the calendar, relative to the move date.
///
/// The arithmetic is done on calendar days, so a daylight-saving change can
/// never push the result onto a neighbouring day. Offsets that would leave
/// the representable range saturate at `NaiveDate::MIN` / `NaiveDate::MAX`.
pub fn project_date(move_date: NaiveDate, day_offset: i32) -> NaiveDate {
    let days = Days::new(u64::from(day_offset.unsigned_abs()));
    if day_offset >= 0 {
        move_date.checked_add_days(days).unwrap_or(NaiveDate::MAX)
    } else {
        move_date.checked_sub_days(days).unwrap_or(NaiveDate::MIN)
    }
}

/// Absolute due date of a task, if it sits on the timeline at all.
pub fn due_date(task: &TaskTemplate, move_date: NaiveDate) -> Option<NaiveDate> {
    task.day_offset.map(|offset| project_date(move_date, offset))
}

pub fn is_same_day(a: NaiveDate, b: NaiveDate) -> bool {
    a == b
}

/// True when `date` lies strictly before the start of `today`.
pub fn is_before_day(date: NaiveDate, today: NaiveDate) -> bool {
    date < today
}

/// Classifies a task against a reference calendar day.
///
/// A completed task reports `Completed` whatever its due date, so finishing a
/// task late never leaves it flagged as overdue. Custom tasks without an
/// offset have no due date and stay `Upcoming` until done.
pub fn derive_status(task: &TaskTemplate, move_date: NaiveDate, today: NaiveDate) -> TaskStatus {
    if task.completed {
        return TaskStatus::Completed;
    }

    let Some(due) = due_date(task, move_date) else {
        return TaskStatus::Upcoming;
    };

    if is_same_day(due, today) {
        TaskStatus::DueToday
    } else if is_before_day(due, today) {
        TaskStatus::Overdue
    } else {
        TaskStatus::Upcoming
    }
}

/// Same as [`derive_status`], reducing `now` to its calendar day in its own
/// timezone first.
pub fn derive_status_at<Tz: TimeZone>(
    task: &TaskTemplate,
    move_date: NaiveDate,
    now: &DateTime<Tz>,
) -> TaskStatus {
    derive_status(task, move_date, now.date_naive())
}
