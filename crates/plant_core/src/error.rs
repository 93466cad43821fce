use crate::plant::{PlantId, TaskKind};

/// Failures surfaced by the data collaborator. The core never retries these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("plant `{0}` not found")]
    NotFound(PlantId),
    #[error("unauthorized")]
    Unauthorized,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CareError {
    #[error("plant `{plant_id}` has an invalid {task} frequency of {days} days (must be at least 1)")]
    InvalidFrequency {
        plant_id: PlantId,
        task: TaskKind,
        days: u32,
    },
    #[error("new plant `{name}` has an invalid {task} frequency of {days} days (must be at least 1)")]
    InvalidNewPlantFrequency {
        name: String,
        task: TaskKind,
        days: u32,
    },
    #[error("{task} due date for plant `{plant_id}` is outside the supported calendar range")]
    DateOutOfRange { plant_id: PlantId, task: TaskKind },
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type CareResult<T> = Result<T, CareError>;
