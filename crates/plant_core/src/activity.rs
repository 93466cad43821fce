use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::plant::{PlantId, TaskKind};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(pub String);

impl ActivityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Watered,
    Fertilized,
}

impl ActivityKind {
    pub fn task(self) -> TaskKind {
        match self {
            ActivityKind::Watered => TaskKind::Watering,
            ActivityKind::Fertilized => TaskKind::Fertilizing,
        }
    }
}

impl From<TaskKind> for ActivityKind {
    fn from(task: TaskKind) -> Self {
        match task {
            TaskKind::Watering => ActivityKind::Watered,
            TaskKind::Fertilizing => ActivityKind::Fertilized,
        }
    }
}

/// Immutable log entry written by the data service when an action is marked
/// complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(alias = "_id")]
    pub id: ActivityId,
    #[serde(alias = "plant", deserialize_with = "plant_reference")]
    pub plant_id: PlantId,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub date: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// The data service sends either a bare id or the populated plant record.
#[derive(Deserialize)]
#[serde(untagged)]
enum PlantReference {
    Id(PlantId),
    Record {
        #[serde(alias = "_id")]
        id: PlantId,
    },
}

fn plant_reference<'de, D>(deserializer: D) -> Result<PlantId, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match PlantReference::deserialize(deserializer)? {
        PlantReference::Id(id) | PlantReference::Record { id } => id,
    })
}
