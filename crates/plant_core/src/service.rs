use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    activity::Activity,
    dashboard::{self, DashboardView, DEFAULT_HORIZON_DAYS},
    error::{CareError, CareResult},
    filter::{self, ActivityCriteria},
    history::{self, ActivityHistory},
    plant::{NewPlant, Plant, PlantChanges, PlantId, TaskKind},
    reminders::{self, ReminderSink},
    schedule::{PlantSchedule, PlantStatus},
    store::PlantStore,
};

/// Everything the detail page shows for one plant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantDetail {
    pub plant: Plant,
    pub schedule: PlantSchedule,
    pub status: PlantStatus,
    pub history: ActivityHistory,
}

pub struct CareService<S> {
    store: S,
    horizon_days: u32,
    remind_at: NaiveTime,
    reminder_sink: Option<Box<dyn ReminderSink>>,
}

pub struct CareServiceBuilder<S> {
    store: S,
    horizon_days: u32,
    remind_at: NaiveTime,
    reminder_sink: Option<Box<dyn ReminderSink>>,
}

impl<S: PlantStore> CareServiceBuilder<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            horizon_days: DEFAULT_HORIZON_DAYS,
            remind_at: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            reminder_sink: None,
        }
    }

    pub fn horizon_days(mut self, days: u32) -> Self {
        self.horizon_days = days;
        self
    }

    pub fn remind_at(mut self, time: NaiveTime) -> Self {
        self.remind_at = time;
        self
    }

    pub fn with_reminder_sink(mut self, sink: Box<dyn ReminderSink>) -> Self {
        self.reminder_sink = Some(sink);
        self
    }

    pub fn build(self) -> CareService<S> {
        CareService {
            store: self.store,
            horizon_days: self.horizon_days,
            remind_at: self.remind_at,
            reminder_sink: self.reminder_sink,
        }
    }
}

impl<S: PlantStore> CareService<S> {
    pub fn builder(store: S) -> CareServiceBuilder<S> {
        CareServiceBuilder::new(store)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }

    #[instrument(skip(self))]
    pub fn dashboard(&self, now: NaiveDateTime) -> CareResult<DashboardView> {
        let plants = self.store.fetch_plants()?;
        dashboard::compute_dashboard_view(&plants, now, self.horizon_days)
    }

    #[instrument(skip(self))]
    pub fn activities(&self, criteria: &ActivityCriteria) -> CareResult<Vec<Activity>> {
        let fetched = self.store.fetch_activities(criteria)?;
        Ok(filter::filter_activities(&fetched, criteria))
    }

    #[instrument(skip(self), fields(plant = %id))]
    pub fn plant_detail(&self, id: &PlantId, now: NaiveDateTime) -> CareResult<PlantDetail> {
        let plant = self.store.fetch_plant(id)?;
        self.detail_for(plant, now)
    }

    /// Records a completed task and returns the plant with freshly derived
    /// due dates.
    #[instrument(skip(self), fields(plant = %id))]
    pub fn mark_done(
        &self,
        id: &PlantId,
        task: TaskKind,
        now: NaiveDateTime,
    ) -> CareResult<PlantDetail> {
        let plant = self.store.record_action(id, task, now)?;
        if let Some(sink) = &self.reminder_sink {
            sink.clear_for_task(id, task);
        }
        tracing::info!(%task, "task marked done");
        self.detail_for(plant, now)
    }

    pub fn add_plant(&self, plant: NewPlant) -> CareResult<Plant> {
        for task in TaskKind::ALL {
            let days = match task {
                TaskKind::Watering => plant.watering_frequency_days,
                TaskKind::Fertilizing => plant.fertilizing_frequency_days,
            };
            if days == 0 {
                return Err(CareError::InvalidNewPlantFrequency {
                    name: plant.name.clone(),
                    task,
                    days,
                });
            }
        }
        Ok(self.store.create_plant(plant)?)
    }

    pub fn update_plant(&self, id: &PlantId, changes: &PlantChanges) -> CareResult<Plant> {
        if let Some(days) = changes.watering_frequency_days {
            validate_frequency(id, TaskKind::Watering, days)?;
        }
        if let Some(days) = changes.fertilizing_frequency_days {
            validate_frequency(id, TaskKind::Fertilizing, days)?;
        }
        Ok(self.store.update_plant(id, changes)?)
    }

    pub fn remove_plant(&self, id: &PlantId) -> CareResult<()> {
        Ok(self.store.delete_plant(id)?)
    }

    /// Pushes reminders for every overdue or due-today task to the sink and
    /// returns how many were scheduled.
    pub fn schedule_reminders(&self, now: NaiveDateTime) -> CareResult<usize> {
        let Some(sink) = &self.reminder_sink else {
            return Ok(0);
        };
        let view = self.dashboard(now)?;
        let requests = reminders::reminders_for(&view, now, self.remind_at);
        let count = requests.len();
        for request in requests {
            sink.schedule(request);
        }
        tracing::debug!(count, "scheduled reminders");
        Ok(count)
    }
}

impl<S: PlantStore> CareService<S> {
    fn detail_for(&self, plant: Plant, now: NaiveDateTime) -> CareResult<PlantDetail> {
        let schedule = PlantSchedule::for_plant(&plant)?;
        let log = self
            .store
            .fetch_activities(&ActivityCriteria::new().plant(plant.id.as_str()))?;
        Ok(PlantDetail {
            status: schedule.status(now, self.horizon_days),
            history: history::split_history(&log),
            schedule,
            plant,
        })
    }
}

fn validate_frequency(id: &PlantId, task: TaskKind, days: u32) -> CareResult<()> {
    if days == 0 {
        return Err(CareError::InvalidFrequency {
            plant_id: id.clone(),
            task,
            days,
        });
    }
    Ok(())
}
