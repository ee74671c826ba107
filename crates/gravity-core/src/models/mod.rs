//! Data models for gravity

pub mod filter;
pub mod series;
pub mod state;

pub use filter::{CategoryType, DateRange};
pub use series::{AlertsPayload, Anomaly, DataPoint};
pub use state::{AlertsQuery, AlertsState, CategoryFilter};
