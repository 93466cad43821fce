pub mod activity;
pub mod dashboard;
pub mod dates;
pub mod error;
pub mod filter;
pub mod history;
pub mod plant;
pub mod reminders;
pub mod schedule;
pub mod service;
pub mod store;

pub use crate::dashboard::{compute_dashboard_view, DashboardView, DEFAULT_HORIZON_DAYS};
pub use crate::error::{CareError, CareResult};
pub use crate::filter::{filter_activities, ActivityCriteria};
pub use crate::history::split_history;
pub use crate::service::{CareService, CareServiceBuilder};
