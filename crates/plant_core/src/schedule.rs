use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::dates::{add_days, start_of_day};
use crate::error::{CareError, CareResult};
use crate::plant::{Plant, PlantId, TaskKind};

/// Outcome of deriving a next-due date. A task that has never been performed
/// has nothing to count from and stays `Unscheduled` until its first action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "date", rename_all = "camelCase")]
pub enum NextDue {
    Scheduled(NaiveDate),
    Unscheduled,
}

impl NextDue {
    pub fn date(self) -> Option<NaiveDate> {
        match self {
            NextDue::Scheduled(date) => Some(date),
            NextDue::Unscheduled => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DueStatus {
    Overdue,
    DueToday,
    Upcoming,
    Future,
}

/// Reasons a next-due date could not be derived from otherwise valid data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleFault {
    ZeroFrequency,
    OutOfRange,
}

impl ScheduleFault {
    fn into_error(self, plant_id: &PlantId, task: TaskKind) -> CareError {
        match self {
            ScheduleFault::ZeroFrequency => CareError::InvalidFrequency {
                plant_id: plant_id.clone(),
                task,
                days: 0,
            },
            ScheduleFault::OutOfRange => CareError::DateOutOfRange {
                plant_id: plant_id.clone(),
                task,
            },
        }
    }
}

pub fn compute_next_due(
    last_action: Option<NaiveDate>,
    frequency_days: u32,
) -> Result<NextDue, ScheduleFault> {
    if frequency_days == 0 {
        return Err(ScheduleFault::ZeroFrequency);
    }
    let Some(last) = last_action else {
        return Ok(NextDue::Unscheduled);
    };
    add_days(last, i64::from(frequency_days))
        .map(NextDue::Scheduled)
        .ok_or(ScheduleFault::OutOfRange)
}

/// Places `due` into exactly one bucket relative to `now`.
pub fn classify(due: NaiveDate, now: NaiveDateTime, horizon_days: u32) -> DueStatus {
    let today = start_of_day(now).date();
    if due < today {
        return DueStatus::Overdue;
    }
    if due == today {
        return DueStatus::DueToday;
    }
    match add_days(today, i64::from(horizon_days)) {
        Some(limit) if due > limit => DueStatus::Future,
        _ => DueStatus::Upcoming,
    }
}

/// Whether a single task on a plant has a due date, and where it falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "status", rename_all = "camelCase")]
pub enum TaskState {
    Unscheduled,
    Due(DueStatus),
}

impl TaskState {
    pub fn is_overdue(self) -> bool {
        matches!(self, TaskState::Due(DueStatus::Overdue))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantStatus {
    pub watering: TaskState,
    pub fertilizing: TaskState,
}

/// Next-due dates for one plant, derived from its record and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantSchedule {
    pub next_watering: NextDue,
    pub next_fertilizing: NextDue,
}

impl PlantSchedule {
    pub fn for_plant(plant: &Plant) -> CareResult<Self> {
        let derive = |task: TaskKind| {
            compute_next_due(plant.last_action(task), plant.frequency_days(task)).map_err(|fault| {
                tracing::warn!(plant = %plant.id, %task, ?fault, "unable to derive due date");
                fault.into_error(&plant.id, task)
            })
        };
        Ok(Self {
            next_watering: derive(TaskKind::Watering)?,
            next_fertilizing: derive(TaskKind::Fertilizing)?,
        })
    }

    pub fn next_due(&self, task: TaskKind) -> NextDue {
        match task {
            TaskKind::Watering => self.next_watering,
            TaskKind::Fertilizing => self.next_fertilizing,
        }
    }

    pub fn task_state(&self, task: TaskKind, now: NaiveDateTime, horizon_days: u32) -> TaskState {
        match self.next_due(task) {
            NextDue::Scheduled(due) => TaskState::Due(classify(due, now, horizon_days)),
            NextDue::Unscheduled => TaskState::Unscheduled,
        }
    }

    pub fn status(&self, now: NaiveDateTime, horizon_days: u32) -> PlantStatus {
        PlantStatus {
            watering: self.task_state(TaskKind::Watering, now, horizon_days),
            fertilizing: self.task_state(TaskKind::Fertilizing, now, horizon_days),
        }
    }
}
