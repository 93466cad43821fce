use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlantId(pub String);

impl PlantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlantId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The two recurring care tasks. Ordering puts watering first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Watering,
    Fertilizing,
}

impl TaskKind {
    pub const ALL: [TaskKind; 2] = [TaskKind::Watering, TaskKind::Fertilizing];
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Watering => f.write_str("watering"),
            TaskKind::Fertilizing => f.write_str("fertilizing"),
        }
    }
}

/// A plant record as handed over by the data service. Next-due dates are not
/// part of the record; see [`crate::schedule::PlantSchedule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    #[serde(alias = "_id")]
    pub id: PlantId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(alias = "wateringFrequency")]
    pub watering_frequency_days: u32,
    #[serde(alias = "fertilizingFrequency")]
    pub fertilizing_frequency_days: u32,
    #[serde(default, alias = "lastWatered")]
    pub last_watered_at: Option<NaiveDate>,
    #[serde(default, alias = "lastFertilized")]
    pub last_fertilized_at: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Plant {
    pub fn frequency_days(&self, task: TaskKind) -> u32 {
        match task {
            TaskKind::Watering => self.watering_frequency_days,
            TaskKind::Fertilizing => self.fertilizing_frequency_days,
        }
    }

    pub fn last_action(&self, task: TaskKind) -> Option<NaiveDate> {
        match task {
            TaskKind::Watering => self.last_watered_at,
            TaskKind::Fertilizing => self.last_fertilized_at,
        }
    }
}

/// Fields for a plant that does not exist yet; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlant {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub watering_frequency_days: u32,
    pub fertilizing_frequency_days: u32,
    #[serde(default)]
    pub last_watered_at: Option<NaiveDate>,
    #[serde(default)]
    pub last_fertilized_at: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl NewPlant {
    pub fn into_plant(self, id: PlantId) -> Plant {
        Plant {
            id,
            name: self.name,
            kind: self.kind,
            watering_frequency_days: self.watering_frequency_days,
            fertilizing_frequency_days: self.fertilizing_frequency_days,
            last_watered_at: self.last_watered_at,
            last_fertilized_at: self.last_fertilized_at,
            notes: self.notes,
            image: self.image,
        }
    }
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantChanges {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub watering_frequency_days: Option<u32>,
    pub fertilizing_frequency_days: Option<u32>,
    pub last_watered_at: Option<NaiveDate>,
    pub last_fertilized_at: Option<NaiveDate>,
    pub notes: Option<String>,
    pub image: Option<String>,
}

impl PlantChanges {
    pub fn apply_to(&self, plant: &mut Plant) {
        if let Some(name) = &self.name {
            plant.name = name.clone();
        }
        if let Some(kind) = &self.kind {
            plant.kind = kind.clone();
        }
        if let Some(days) = self.watering_frequency_days {
            plant.watering_frequency_days = days;
        }
        if let Some(days) = self.fertilizing_frequency_days {
            plant.fertilizing_frequency_days = days;
        }
        if let Some(date) = self.last_watered_at {
            plant.last_watered_at = Some(date);
        }
        if let Some(date) = self.last_fertilized_at {
            plant.last_fertilized_at = Some(date);
        }
        if let Some(notes) = &self.notes {
            plant.notes = Some(notes.clone());
        }
        if let Some(image) = &self.image {
            plant.image = Some(image.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_data_service_record_names() {
        let raw = r#"{
            "_id": "p-1",
            "name": "Fern",
            "type": "Indoor",
            "wateringFrequency": 3,
            "fertilizingFrequency": 30,
            "lastWatered": "2024-01-01"
        }"#;
        let plant: Plant = serde_json::from_str(raw).expect("plant parses");
        assert_eq!(plant.id, PlantId::new("p-1"));
        assert_eq!(plant.kind, "Indoor");
        assert_eq!(plant.frequency_days(TaskKind::Watering), 3);
        assert_eq!(
            plant.last_action(TaskKind::Watering),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(plant.last_action(TaskKind::Fertilizing), None);
    }

    #[test]
    fn changes_leave_unset_fields_alone() {
        let mut plant = NewPlant {
            name: "Basil".into(),
            kind: "Herb".into(),
            watering_frequency_days: 2,
            fertilizing_frequency_days: 14,
            last_watered_at: None,
            last_fertilized_at: None,
            notes: None,
            image: None,
        }
        .into_plant(PlantId::new("b"));
        PlantChanges {
            watering_frequency_days: Some(3),
            ..PlantChanges::default()
        }
        .apply_to(&mut plant);
        assert_eq!(plant.watering_frequency_days, 3);
        assert_eq!(plant.fertilizing_frequency_days, 14);
        assert_eq!(plant.name, "Basil");
    }
}
