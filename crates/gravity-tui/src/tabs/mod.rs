//! TUI tab implementations

pub mod alerts;
pub mod chart_panel;
pub mod select_panel;

pub use alerts::AlertsTab;
pub use chart_panel::ChartPanel;
pub use select_panel::SelectPanel;
