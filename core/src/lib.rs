pub mod config;
pub mod controller;
pub mod dom;
pub mod layout;
pub mod schema;

// Re-exports for convenience
pub use config::{ConfigError, load_contract, load_layout, parse_contract, parse_layout};
pub use controller::{
    ContainerId, ContainerState, ControlError, EventBinding, EventKind, Interaction, LabelId,
    ViewToggleController,
};
pub use dom::{Dom, MemoryDom, NodeId};
pub use layout::{DatasetLayout, GraphLayout, ReportLayout};
pub use report_view_types::{
    ContainerSnapshot, ContractConfig, DisplayMode, LabelGrouping, PaneMatch, ViewSelection,
};
pub use schema::{DatasetContainer, SchemaError};
