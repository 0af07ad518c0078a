//! Explicit per-container view state

use report_view_types::{ContractConfig, DisplayMode, ViewSelection};

use crate::dom::Dom;
use crate::schema::DatasetContainer;

/// View state of one dataset container.
///
/// Read from the server-rendered document once at bind time, then kept in
/// step with every handler so nothing has to be re-derived from the live
/// document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerState {
    pub mode: DisplayMode,
    /// Indexed like [`DatasetContainer::panes`]
    pub pane_visible: Vec<bool>,
    /// Indexed like [`DatasetContainer::labels`]
    pub label_selected: Vec<bool>,
    pub view: ViewSelection,
    pub graph_variant: Option<String>,
}

impl ContainerState {
    pub fn observe<D: Dom + ?Sized>(
        dom: &D,
        container: &DatasetContainer,
        config: &ContractConfig,
    ) -> Self {
        let pane_visible: Vec<bool> = container
            .panes
            .iter()
            .map(|p| dom.is_visible(p.node))
            .collect();
        let label_selected = container
            .labels
            .iter()
            .map(|l| dom.has_class(l.node, &config.selected_class))
            .collect();
        let view = container
            .view_select
            .and_then(|s| dom.value(s))
            .map(|v| ViewSelection::from_value(&v, &config.rundata_value))
            .unwrap_or_default();
        let graph_variant = container.version_select.and_then(|s| dom.value(s));

        Self {
            mode: DisplayMode::from_any_visible(pane_visible.iter().any(|&v| v)),
            pane_visible,
            label_selected,
            view,
            graph_variant,
        }
    }

    pub fn any_pane_visible(&self) -> bool {
        self.pane_visible.iter().any(|&v| v)
    }
}
