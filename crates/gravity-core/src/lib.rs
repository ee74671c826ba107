//! gravity-core - Core library for gravity
//!
//! Provides alert models, update intents, the reducer and store, panel logic,
//! and the data source / refresher / watcher that keep the store fed.

pub mod error;
pub mod event;
pub mod format;
pub mod intent;
pub mod models;
pub mod panels;
pub mod preferences;
pub mod reducer;
pub mod refresh;
pub mod source;
pub mod store;
pub mod watcher;

pub use error::{CoreError, LoadError, LoadReport};
pub use event::{AlertsEvent, EventBus};
pub use intent::AlertsUpdate;
pub use preferences::{ColorScheme, Preferences};
pub use reducer::reduce;
pub use refresh::{RefreshOutcome, Refresher};
pub use source::{AlertsSource, Catalog, JsonFileSource};
pub use store::{AlertsStore, AlertsStoreConfig};
pub use watcher::FileWatcher;
