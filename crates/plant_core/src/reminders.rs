use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::dashboard::{DashboardView, DueTask};
use crate::plant::{PlantId, TaskKind};
use crate::schedule::DueStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRequest {
    pub plant_id: PlantId,
    pub task: TaskKind,
    pub title: String,
    pub body: String,
    pub scheduled_for: NaiveDateTime,
}

/// Platform-specific reminder adapters will implement this trait.
pub trait ReminderSink: Send + Sync {
    fn schedule(&self, reminder: ReminderRequest);
    fn clear_for_task(&self, plant_id: &PlantId, task: TaskKind);
}

/// Reminders for everything that needs doing today: overdue tasks fire at
/// `now`, tasks due today at `remind_at` (or `now`, if that has passed).
pub fn reminders_for(
    view: &DashboardView,
    now: NaiveDateTime,
    remind_at: NaiveTime,
) -> Vec<ReminderRequest> {
    let due_today = view
        .upcoming
        .watering
        .iter()
        .chain(view.upcoming.fertilizing.iter())
        .filter(|task| task.status == DueStatus::DueToday);

    view.missed
        .iter()
        .chain(due_today)
        .map(|task| reminder(task, now, remind_at))
        .collect()
}

fn reminder(task: &DueTask, now: NaiveDateTime, remind_at: NaiveTime) -> ReminderRequest {
    let verb = match task.task {
        TaskKind::Watering => "Water",
        TaskKind::Fertilizing => "Fertilize",
    };
    let (body, scheduled_for) = match task.status {
        DueStatus::Overdue => (
            format!("{} days overdue (due {})", task.days_overdue(), task.due_date),
            now,
        ),
        _ => (
            format!("Due today ({})", task.due_date),
            task.due_date.and_time(remind_at).max(now),
        ),
    };
    ReminderRequest {
        plant_id: task.plant_id.clone(),
        task: task.task,
        title: format!("{verb} {}", task.plant_name),
        body,
        scheduled_for,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::compute_dashboard_view;
    use crate::plant::Plant;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reminders_cover_missed_and_due_today_only() {
        let plants = [
            Plant {
                id: PlantId::new("ivy"),
                name: "Ivy".into(),
                kind: "Vine".into(),
                watering_frequency_days: 2,
                fertilizing_frequency_days: 10,
                last_watered_at: Some(date(2024, 6, 8)),
                last_fertilized_at: Some(date(2024, 5, 1)),
                notes: None,
                image: None,
            },
            Plant {
                id: PlantId::new("palm"),
                name: "Palm".into(),
                kind: "Tropical".into(),
                watering_frequency_days: 5,
                fertilizing_frequency_days: 30,
                last_watered_at: Some(date(2024, 6, 8)),
                last_fertilized_at: None,
                notes: None,
                image: None,
            },
        ];
        let now = date(2024, 6, 10).and_hms_opt(7, 0, 0).unwrap();
        let view = compute_dashboard_view(&plants, now, 7).unwrap();
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let reminders = reminders_for(&view, now, nine);

        assert_eq!(reminders.len(), 2);
        assert_eq!(reminders[0].task, TaskKind::Fertilizing);
        assert_eq!(reminders[0].scheduled_for, now);
        assert_eq!(reminders[0].title, "Fertilize Ivy");
        assert_eq!(reminders[1].task, TaskKind::Watering);
        assert_eq!(reminders[1].scheduled_for, date(2024, 6, 10).and_time(nine));
        assert_eq!(reminders[1].body, "Due today (2024-06-10)");
    }
}
