//! Boundary to the external data service.
//!
//! The core only reads snapshots through [`PlantStore`] and passes mutations
//! straight through. [`MemoryStore`] keeps everything in process and backs the
//! tests and the JSON snapshot loader.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::activity::{Activity, ActivityId, ActivityKind};
use crate::error::StoreError;
use crate::filter::{filter_activities, ActivityCriteria};
use crate::plant::{NewPlant, Plant, PlantChanges, PlantId, TaskKind};

pub type StoreResult<T> = Result<T, StoreError>;

/// Data-access operations the core relies on. Implementations own transport,
/// retries and authentication.
pub trait PlantStore: Send + Sync {
    fn fetch_plants(&self) -> StoreResult<Vec<Plant>>;
    fn fetch_plant(&self, id: &PlantId) -> StoreResult<Plant>;
    fn fetch_activities(&self, criteria: &ActivityCriteria) -> StoreResult<Vec<Activity>>;
    /// Marks `task` done at `at` and appends the matching activity.
    fn record_action(&self, id: &PlantId, task: TaskKind, at: NaiveDateTime) -> StoreResult<Plant>;
    fn create_plant(&self, plant: NewPlant) -> StoreResult<Plant>;
    fn update_plant(&self, id: &PlantId, changes: &PlantChanges) -> StoreResult<Plant>;
    fn delete_plant(&self, id: &PlantId) -> StoreResult<()>;
}

/// Point-in-time dump of the data service, as exported to JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub plants: Vec<Plant>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl Snapshot {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

#[derive(Debug, Default)]
struct Records {
    plants: BTreeMap<PlantId, Plant>,
    activities: Vec<Activity>,
    next_id: u64,
}

impl Records {
    fn allocate_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Records>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let plants = snapshot
            .plants
            .into_iter()
            .map(|plant| (plant.id.clone(), plant))
            .collect();
        Self {
            records: RwLock::new(Records {
                plants,
                activities: snapshot.activities,
                next_id: 0,
            }),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let records = self.records.read();
        Snapshot {
            plants: records.plants.values().cloned().collect(),
            activities: records.activities.clone(),
        }
    }
}

impl PlantStore for MemoryStore {
    fn fetch_plants(&self) -> StoreResult<Vec<Plant>> {
        Ok(self.records.read().plants.values().cloned().collect())
    }

    fn fetch_plant(&self, id: &PlantId) -> StoreResult<Plant> {
        self.records
            .read()
            .plants
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn fetch_activities(&self, criteria: &ActivityCriteria) -> StoreResult<Vec<Activity>> {
        Ok(filter_activities(&self.records.read().activities, criteria))
    }

    fn record_action(&self, id: &PlantId, task: TaskKind, at: NaiveDateTime) -> StoreResult<Plant> {
        let mut records = self.records.write();
        let activity_id = records.allocate_id("activity");
        let plant = records
            .plants
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        match task {
            TaskKind::Watering => plant.last_watered_at = Some(at.date()),
            TaskKind::Fertilizing => plant.last_fertilized_at = Some(at.date()),
        }
        let updated = plant.clone();
        records.activities.push(Activity {
            id: ActivityId(activity_id),
            plant_id: id.clone(),
            kind: ActivityKind::from(task),
            date: at,
            note: None,
        });
        Ok(updated)
    }

    fn create_plant(&self, plant: NewPlant) -> StoreResult<Plant> {
        let mut records = self.records.write();
        let id = PlantId(records.allocate_id("plant"));
        let plant = plant.into_plant(id.clone());
        records.plants.insert(id, plant.clone());
        Ok(plant)
    }

    fn update_plant(&self, id: &PlantId, changes: &PlantChanges) -> StoreResult<Plant> {
        let mut records = self.records.write();
        let plant = records
            .plants
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        changes.apply_to(plant);
        Ok(plant.clone())
    }

    fn delete_plant(&self, id: &PlantId) -> StoreResult<()> {
        let mut records = self.records.write();
        if records.plants.remove(id).is_none() {
            return Err(StoreError::NotFound(id.clone()));
        }
        records.activities.retain(|activity| activity.plant_id != *id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_plant() -> NewPlant {
        NewPlant {
            name: "Monstera".into(),
            kind: "Tropical".into(),
            watering_frequency_days: 7,
            fertilizing_frequency_days: 30,
            last_watered_at: None,
            last_fertilized_at: None,
            notes: None,
            image: None,
        }
    }

    #[test]
    fn record_action_updates_plant_and_appends_activity() {
        let store = MemoryStore::new();
        let plant = store.create_plant(new_plant()).unwrap();
        let at = NaiveDate::from_ymd_opt(2024, 5, 2)
            .unwrap()
            .and_hms_opt(18, 40, 0)
            .unwrap();
        let updated = store.record_action(&plant.id, TaskKind::Watering, at).unwrap();
        assert_eq!(updated.last_watered_at, Some(at.date()));
        assert_eq!(updated.last_fertilized_at, None);

        let log = store.fetch_activities(&ActivityCriteria::new()).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].kind, ActivityKind::Watered);
        assert_eq!(log[0].plant_id, plant.id);
    }

    #[test]
    fn delete_cascades_to_activities() {
        let store = MemoryStore::new();
        let plant = store.create_plant(new_plant()).unwrap();
        let at = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap().and_hms_opt(8, 0, 0).unwrap();
        store.record_action(&plant.id, TaskKind::Fertilizing, at).unwrap();
        store.delete_plant(&plant.id).unwrap();
        assert!(store.snapshot().activities.is_empty());
        assert_eq!(
            store.fetch_plant(&plant.id),
            Err(StoreError::NotFound(plant.id.clone()))
        );
        assert_eq!(
            store.delete_plant(&plant.id),
            Err(StoreError::NotFound(plant.id))
        );
    }

    #[test]
    fn snapshot_json_round_trips_through_store() {
        let raw = r#"{
            "plants": [{
                "id": "p1", "name": "Fern", "type": "Indoor",
                "wateringFrequencyDays": 3, "fertilizingFrequencyDays": 30,
                "lastWateredAt": "2024-01-01"
            }],
            "activities": [{
                "id": "a1", "plantId": "p1", "type": "watered",
                "date": "2024-01-01T09:30:00", "note": "morning"
            }]
        }"#;
        let store = MemoryStore::from_snapshot(Snapshot::from_json(raw).unwrap());
        assert_eq!(store.fetch_plants().unwrap().len(), 1);
        let log = store
            .fetch_activities(&ActivityCriteria::new().plant("p1"))
            .unwrap();
        assert_eq!(log[0].note.as_deref(), Some("morning"));
    }
}
