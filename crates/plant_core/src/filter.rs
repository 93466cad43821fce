use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::activity::{Activity, ActivityKind};
use crate::dates::{is_same_calendar_day, midnight};
use crate::plant::PlantId;

/// Filter criteria for the activity log. Every field that is set must match;
/// unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityCriteria {
    pub plant_id: Option<PlantId>,
    pub kind: Option<ActivityKind>,
    pub date: Option<NaiveDate>,
}

impl ActivityCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to one plant. An empty id is the same as no restriction.
    pub fn plant(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.plant_id = if id.trim().is_empty() {
            None
        } else {
            Some(PlantId(id))
        };
        self
    }

    pub fn kind(mut self, kind: ActivityKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.active_plant().is_none() && self.kind.is_none() && self.date.is_none()
    }

    pub fn matches(&self, activity: &Activity) -> bool {
        if let Some(plant_id) = self.active_plant() {
            if activity.plant_id != *plant_id {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if activity.kind != kind {
                return false;
            }
        }
        if let Some(date) = self.date {
            if !is_same_calendar_day(activity.date, midnight(date)) {
                return false;
            }
        }
        true
    }

    // Deserialized criteria can still carry an empty id.
    fn active_plant(&self) -> Option<&PlantId> {
        self.plant_id
            .as_ref()
            .filter(|id| !id.as_str().trim().is_empty())
    }
}

/// Stable filter: matching activities keep their relative order.
pub fn filter_activities(activities: &[Activity], criteria: &ActivityCriteria) -> Vec<Activity> {
    if criteria.is_empty() {
        return activities.to_vec();
    }
    activities
        .iter()
        .filter(|activity| criteria.matches(activity))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityOrder {
    NewestFirst,
    OldestFirst,
}

/// Orders activities by timestamp. Equal timestamps keep their input order.
pub fn sort_activities(mut activities: Vec<Activity>, order: ActivityOrder) -> Vec<Activity> {
    match order {
        ActivityOrder::NewestFirst => activities.sort_by(|a, b| b.date.cmp(&a.date)),
        ActivityOrder::OldestFirst => activities.sort_by(|a, b| a.date.cmp(&b.date)),
    }
    activities
}
