use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use plant_core::{
    plant::PlantId,
    service::PlantDetail,
    store::{MemoryStore, Snapshot},
    CareService, DashboardView, DEFAULT_HORIZON_DAYS,
};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub(crate) snapshot_path: PathBuf,
    pub(crate) horizon_days: u32,
    pub(crate) today: Option<NaiveDate>,
    pub(crate) plant: Option<PlantId>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("plants.json"),
            horizon_days: DEFAULT_HORIZON_DAYS,
            today: None,
            plant: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = lookup("PLANTCARE_SNAPSHOT") {
            config.snapshot_path = PathBuf::from(path);
        }
        if let Some(span) = lookup("PLANTCARE_HORIZON_DAYS") {
            match span.trim().parse::<u32>() {
                Ok(value) if value > 0 => config.horizon_days = value,
                _ => warn!(value = %span, "ignoring invalid PLANTCARE_HORIZON_DAYS"),
            }
        }
        if let Some(today) = lookup("PLANTCARE_TODAY") {
            let date = NaiveDate::parse_from_str(today.trim(), "%Y-%m-%d")
                .with_context(|| format!("PLANTCARE_TODAY `{today}` is not a YYYY-MM-DD date"))?;
            config.today = Some(date);
        }
        if let Some(id) = lookup("PLANTCARE_PLANT") {
            if !id.trim().is_empty() {
                config.plant = Some(PlantId::new(id.trim()));
            }
        }
        Ok(config)
    }

    pub fn with_snapshot(mut self, path: impl AsRef<Path>) -> Self {
        self.snapshot_path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn with_plant(mut self, id: PlantId) -> Self {
        self.plant = Some(id);
        self
    }

    fn now(&self) -> NaiveDateTime {
        match self.today {
            Some(date) => date.and_time(NaiveTime::MIN),
            None => Local::now().naive_local(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub generated_at: NaiveDateTime,
    pub horizon_days: u32,
    pub dashboard: DashboardView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant: Option<PlantDetail>,
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("unable to read snapshot {}", path.display()))?;
    Snapshot::from_json(&raw).with_context(|| format!("malformed snapshot {}", path.display()))
}

pub fn build_report(config: &AppConfig) -> Result<Report> {
    let snapshot = load_snapshot(&config.snapshot_path)?;
    info!(
        path = %config.snapshot_path.display(),
        plants = snapshot.plants.len(),
        activities = snapshot.activities.len(),
        "loaded snapshot"
    );
    let service = CareService::builder(MemoryStore::from_snapshot(snapshot))
        .horizon_days(config.horizon_days)
        .build();

    let now = config.now();
    let dashboard = service.dashboard(now)?;
    let plant = match &config.plant {
        Some(id) => Some(
            service
                .plant_detail(id, now)
                .with_context(|| format!("unable to build detail for plant `{id}`"))?,
        ),
        None => None,
    };
    if !dashboard.missed.is_empty() {
        info!(missed = dashboard.missed.len(), "plants need attention");
    }
    Ok(Report {
        generated_at: now,
        horizon_days: config.horizon_days,
        dashboard,
        plant,
    })
}

pub fn run(config: AppConfig) -> Result<()> {
    let report = build_report(&config)?;
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &report).context("unable to write report")?;
    writeln!(stdout)?;
    Ok(())
}
