use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::dates::{days_between, midnight};
use crate::error::CareResult;
use crate::plant::{Plant, PlantId, TaskKind};
use crate::schedule::{classify, DueStatus, NextDue, PlantSchedule};

pub const DEFAULT_HORIZON_DAYS: u32 = 7;

/// One scheduled task that needs attention, built fresh on every pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueTask {
    pub plant_id: PlantId,
    pub plant_name: String,
    pub task: TaskKind,
    pub due_date: NaiveDate,
    /// Positive while the task lies ahead, negative once it is overdue.
    pub days_until_or_overdue: i64,
    pub status: DueStatus,
}

impl DueTask {
    pub fn days_overdue(&self) -> i64 {
        (-self.days_until_or_overdue).max(0)
    }

    pub fn days_until(&self) -> i64 {
        self.days_until_or_overdue.max(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCounts {
    pub total_plants: usize,
    pub overdue_watering: usize,
    pub overdue_fertilizing: usize,
}

/// Tasks due within the horizon, per kind. Tasks due today are included and
/// carry [`DueStatus::DueToday`]; the rest are [`DueStatus::Upcoming`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingTasks {
    pub watering: Vec<DueTask>,
    pub fertilizing: Vec<DueTask>,
}

impl UpcomingTasks {
    pub fn for_task(&self, task: TaskKind) -> &[DueTask] {
        match task {
            TaskKind::Watering => &self.watering,
            TaskKind::Fertilizing => &self.fertilizing,
        }
    }

    fn push(&mut self, due: DueTask) {
        match due.task {
            TaskKind::Watering => self.watering.push(due),
            TaskKind::Fertilizing => self.fertilizing.push(due),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardView {
    pub counts: DashboardCounts,
    pub upcoming: UpcomingTasks,
    pub missed: Vec<DueTask>,
}

/// Builds the dashboard from a snapshot of plants.
///
/// Watering and fertilizing are classified independently. Tasks due today sit
/// at the head of the upcoming lists; overdue tasks go to `missed`; tasks with
/// no recorded action appear nowhere. Fails only when a plant breaks the
/// frequency invariant.
pub fn compute_dashboard_view(
    plants: &[Plant],
    now: NaiveDateTime,
    horizon_days: u32,
) -> CareResult<DashboardView> {
    let mut view = DashboardView {
        counts: DashboardCounts {
            total_plants: plants.len(),
            ..DashboardCounts::default()
        },
        ..DashboardView::default()
    };

    for plant in plants {
        let schedule = PlantSchedule::for_plant(plant)?;
        for task in TaskKind::ALL {
            let NextDue::Scheduled(due_date) = schedule.next_due(task) else {
                continue;
            };
            let status = classify(due_date, now, horizon_days);
            let due = DueTask {
                plant_id: plant.id.clone(),
                plant_name: plant.name.clone(),
                task,
                due_date,
                days_until_or_overdue: days_between(now, midnight(due_date)),
                status,
            };
            match status {
                DueStatus::Overdue => {
                    match task {
                        TaskKind::Watering => view.counts.overdue_watering += 1,
                        TaskKind::Fertilizing => view.counts.overdue_fertilizing += 1,
                    }
                    view.missed.push(due);
                }
                DueStatus::DueToday | DueStatus::Upcoming => view.upcoming.push(due),
                DueStatus::Future => {}
            }
        }
    }

    view.upcoming.watering.sort_by(by_due_date);
    view.upcoming.fertilizing.sort_by(by_due_date);
    view.missed.sort_by(by_urgency);

    tracing::debug!(
        plants = view.counts.total_plants,
        overdue_watering = view.counts.overdue_watering,
        overdue_fertilizing = view.counts.overdue_fertilizing,
        missed = view.missed.len(),
        "computed dashboard view"
    );
    Ok(view)
}

fn by_due_date(a: &DueTask, b: &DueTask) -> Ordering {
    a.due_date
        .cmp(&b.due_date)
        .then_with(|| a.plant_id.cmp(&b.plant_id))
}

fn by_urgency(a: &DueTask, b: &DueTask) -> Ordering {
    b.days_overdue()
        .cmp(&a.days_overdue())
        .then_with(|| a.plant_id.cmp(&b.plant_id))
        .then_with(|| a.task.cmp(&b.task))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CareError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn midnight_of(y: i32, m: u32, d: u32) -> NaiveDateTime {
        midnight(date(y, m, d))
    }

    fn plant(id: &str, watered: Option<NaiveDate>, water: u32) -> Plant {
        Plant {
            id: PlantId::new(id),
            name: format!("Plant {id}"),
            kind: "Indoor".into(),
            watering_frequency_days: water,
            fertilizing_frequency_days: 30,
            last_watered_at: watered,
            last_fertilized_at: None,
            notes: None,
            image: None,
        }
    }

    #[test]
    fn empty_snapshot_yields_empty_view() {
        let view = compute_dashboard_view(&[], midnight_of(2024, 1, 10), 7).unwrap();
        assert_eq!(view, DashboardView::default());
    }

    #[test]
    fn overdue_watering_reports_days_overdue() {
        let plants = [plant("a", Some(date(2024, 1, 1)), 7)];
        let view = compute_dashboard_view(&plants, midnight_of(2024, 1, 10), 7).unwrap();
        assert_eq!(view.counts.total_plants, 1);
        assert_eq!(view.counts.overdue_watering, 1);
        assert_eq!(view.counts.overdue_fertilizing, 0);
        let missed = &view.missed[0];
        assert_eq!(missed.due_date, date(2024, 1, 8));
        assert_eq!(missed.status, DueStatus::Overdue);
        assert_eq!(missed.days_overdue(), 2);
        assert_eq!(missed.days_until(), 0);
    }

    #[test]
    fn days_overdue_does_not_depend_on_time_of_day() {
        let plants = [plant("a", Some(date(2024, 1, 1)), 7)];
        let evening = date(2024, 1, 10).and_hms_opt(21, 30, 0).unwrap();
        let view = compute_dashboard_view(&plants, evening, 7).unwrap();
        assert_eq!(view.missed[0].days_overdue(), 2);
    }

    #[test]
    fn missed_orders_most_overdue_first() {
        let plants = [
            plant("five", Some(date(2024, 1, 5)), 1),
            plant("ten", Some(date(2023, 12, 31)), 1),
        ];
        let view = compute_dashboard_view(&plants, midnight_of(2024, 1, 11), 7).unwrap();
        let ids: Vec<_> = view.missed.iter().map(|t| t.plant_id.as_str()).collect();
        assert_eq!(ids, ["ten", "five"]);
        assert_eq!(view.missed[0].days_overdue(), 10);
        assert_eq!(view.missed[1].days_overdue(), 5);
    }

    #[test]
    fn upcoming_sorted_by_date_then_plant_id() {
        let plants = [
            plant("c", Some(date(2024, 1, 10)), 3),
            plant("b", Some(date(2024, 1, 10)), 1),
            plant("a", Some(date(2024, 1, 10)), 3),
            plant("today", Some(date(2024, 1, 9)), 1),
            plant("far", Some(date(2024, 1, 10)), 20),
        ];
        let view = compute_dashboard_view(&plants, midnight_of(2024, 1, 10), 7).unwrap();
        let ids: Vec<_> = view
            .upcoming
            .watering
            .iter()
            .map(|t| (t.plant_id.as_str(), t.days_until()))
            .collect();
        assert_eq!(ids, [("today", 0), ("b", 1), ("a", 3), ("c", 3)]);
        assert_eq!(view.upcoming.watering[0].status, DueStatus::DueToday);
        assert!(view.upcoming.fertilizing.is_empty());
        assert!(view.missed.is_empty());
    }

    #[test]
    fn never_watered_plant_is_neither_upcoming_nor_missed() {
        let plants = [plant("new", None, 7)];
        let view = compute_dashboard_view(&plants, midnight_of(2024, 1, 10), 7).unwrap();
        assert_eq!(view.counts.total_plants, 1);
        assert_eq!(view.counts.overdue_watering, 0);
        assert!(view.upcoming.watering.is_empty());
        assert!(view.missed.is_empty());
    }

    #[test]
    fn tasks_are_classified_independently() {
        let mut fern = plant("fern", Some(date(2024, 1, 9)), 3);
        fern.last_fertilized_at = Some(date(2023, 12, 1));
        let view = compute_dashboard_view(&[fern], midnight_of(2024, 1, 10), 7).unwrap();
        assert_eq!(view.counts.overdue_fertilizing, 1);
        assert_eq!(view.counts.overdue_watering, 0);
        assert_eq!(view.upcoming.for_task(TaskKind::Watering).len(), 1);
        assert_eq!(view.missed[0].task, TaskKind::Fertilizing);
    }

    #[test]
    fn rerunning_gives_identical_output() {
        let plants = [
            plant("x", Some(date(2024, 1, 1)), 2),
            plant("y", Some(date(2024, 1, 1)), 2),
            plant("z", Some(date(2024, 1, 8)), 4),
        ];
        let now = midnight_of(2024, 1, 10);
        let first = compute_dashboard_view(&plants, now, 7).unwrap();
        let second = compute_dashboard_view(&plants, now, 7).unwrap();
        assert_eq!(first, second);
        let ids: Vec<_> = first.missed.iter().map(|t| t.plant_id.as_str()).collect();
        assert_eq!(ids, ["x", "y"]);
    }

    #[test]
    fn zero_frequency_is_rejected() {
        let plants = [plant("bad", Some(date(2024, 1, 1)), 0)];
        let err = compute_dashboard_view(&plants, midnight_of(2024, 1, 10), 7).unwrap_err();
        assert!(matches!(err, CareError::InvalidFrequency { .. }));
    }
}
