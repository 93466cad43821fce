use serde::{Deserialize, Serialize};

use crate::activity::{Activity, ActivityKind};

/// A plant's activity log split per kind, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityHistory {
    pub watering: Vec<Activity>,
    pub fertilizing: Vec<Activity>,
}

impl ActivityHistory {
    pub fn entries(&self, kind: ActivityKind) -> &[Activity] {
        match kind {
            ActivityKind::Watered => &self.watering,
            ActivityKind::Fertilized => &self.fertilizing,
        }
    }

    pub fn latest(&self, kind: ActivityKind) -> Option<&Activity> {
        self.entries(kind).first()
    }

    pub fn len(&self) -> usize {
        self.watering.len() + self.fertilizing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partitions `activities` by kind and orders each side newest first. The sort
/// is stable, so entries sharing a timestamp keep their insertion order.
pub fn split_history(activities: &[Activity]) -> ActivityHistory {
    let (mut watering, mut fertilizing): (Vec<Activity>, Vec<Activity>) = activities
        .iter()
        .cloned()
        .partition(|activity| activity.kind == ActivityKind::Watered);
    watering.sort_by(|a, b| b.date.cmp(&a.date));
    fertilizing.sort_by(|a, b| b.date.cmp(&a.date));
    ActivityHistory {
        watering,
        fertilizing,
    }
}
