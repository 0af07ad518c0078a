//! View toggle controller
//!
//! Reacts to user interaction on a rendered report:
//! - **Info / table mode**: show or hide every detail pane of a container
//! - **Pane toggle**: a label click shows or hides its own pane
//! - **Version graph**: the version dropdown swaps the graph image source
//! - **Table view**: the view dropdown picks a comparison subsection and the
//!   matching label grouping
//!
//! Each container carries two independent binary states, {info, table} and
//! {rundata, detail}. The trigger invariant (exactly one of the show/hide
//! triggers visible, matching whether any pane is visible) is restored at the
//! end of every pane toggle.

mod error;
mod state;


pub use error::ControlError;
pub use state::ContainerState;

use report_view_types::{
    ContainerSnapshot, ContractConfig, DisplayMode, LabelGrouping, ViewSelection,
};
use serde::{Deserialize, Serialize};

use crate::dom::{Dom, NodeId};
use crate::schema::{DatasetContainer, SchemaError, bind_all};

/// Index of a bound dataset container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(pub usize);

/// Index of a label within its container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabelId(pub usize);

/// DOM event a binding listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Click,
    Change,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Change => "change",
        }
    }
}

/// A user interaction, already resolved to its container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Interaction {
    /// Click on the "show info" trigger
    ShowInfo { container: ContainerId },
    /// Click on the "hide info" trigger
    HideInfo { container: ContainerId },
    /// Click on a label cell
    LabelClick {
        container: ContainerId,
        label: LabelId,
    },
    /// The version dropdown changed; the new value is read from the select
    VersionChange { container: ContainerId },
    /// The view dropdown changed; the new value is read from the select
    ViewChange { container: ContainerId },
}

/// One listener a host environment should register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventBinding {
    pub node: NodeId,
    pub event: EventKind,
    pub interaction: Interaction,
}

/// Controller over every dataset container of one document
#[derive(Debug)]
pub struct ViewToggleController<D: Dom> {
    dom: D,
    config: ContractConfig,
    containers: Vec<DatasetContainer>,
    states: Vec<ContainerState>,
}

impl<D: Dom> ViewToggleController<D> {
    /// Validate the document against the markup contract and bind every
    /// dataset container. The document itself is not modified.
    pub fn bind(dom: D, config: ContractConfig) -> Result<Self, SchemaError> {
        let containers = bind_all(&dom, &config)?;
        let states = containers
            .iter()
            .map(|c| ContainerState::observe(&dom, c, &config))
            .collect();

        tracing::info!(containers = containers.len(), "report view controller bound");

        Ok(Self {
            dom,
            config,
            containers,
            states,
        })
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn container_ids(&self) -> impl Iterator<Item = ContainerId> + use<D> {
        (0..self.containers.len()).map(ContainerId)
    }

    pub fn container(&self, id: ContainerId) -> Result<&DatasetContainer, ControlError> {
        self.containers
            .get(id.0)
            .ok_or(ControlError::UnknownContainer(id))
    }

    pub fn state(&self, id: ContainerId) -> Result<&ContainerState, ControlError> {
        self.states.get(id.0).ok_or(ControlError::UnknownContainer(id))
    }

    fn parts(
        &mut self,
        id: ContainerId,
    ) -> Result<(&mut D, &DatasetContainer, &mut ContainerState, &ContractConfig), ControlError>
    {
        let container = self
            .containers
            .get(id.0)
            .ok_or(ControlError::UnknownContainer(id))?;
        let state = self
            .states
            .get_mut(id.0)
            .ok_or(ControlError::UnknownContainer(id))?;
        Ok((&mut self.dom, container, state, &self.config))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Show every detail pane and mark every label selected
    pub fn enter_info_mode(&mut self, id: ContainerId) -> Result<(), ControlError> {
        let (dom, container, state, config) = self.parts(id)?;

        for (pane, visible) in container.panes.iter().zip(state.pane_visible.iter_mut()) {
            dom.set_visible(pane.node, true);
            *visible = true;
        }
        for (label, selected) in container.labels.iter().zip(state.label_selected.iter_mut()) {
            dom.add_class(label.node, &config.selected_class);
            *selected = true;
        }
        state.mode = DisplayMode::Info;
        apply_triggers(dom, container, state.mode);

        tracing::debug!(container = id.0, panes = container.panes.len(), "info mode");
        Ok(())
    }

    /// Hide every detail pane and clear every label's selected marker
    pub fn enter_table_mode(&mut self, id: ContainerId) -> Result<(), ControlError> {
        let (dom, container, state, config) = self.parts(id)?;

        for (pane, visible) in container.panes.iter().zip(state.pane_visible.iter_mut()) {
            dom.set_visible(pane.node, false);
            *visible = false;
        }
        for (label, selected) in container.labels.iter().zip(state.label_selected.iter_mut()) {
            dom.remove_class(label.node, &config.selected_class);
            *selected = false;
        }
        state.mode = DisplayMode::Table;
        apply_triggers(dom, container, state.mode);

        tracing::debug!(container = id.0, panes = container.panes.len(), "table mode");
        Ok(())
    }

    /// Show or hide the pane(s) a label refers to, then bring the show/hide
    /// triggers in line with whether any pane is still visible.
    ///
    /// A label whose reference matched no pane only gains its selected
    /// marker.
    pub fn toggle_pane(&mut self, id: ContainerId, label_id: LabelId) -> Result<(), ControlError> {
        let (dom, container, state, config) = self.parts(id)?;
        let label = container
            .labels
            .get(label_id.0)
            .ok_or(ControlError::UnknownLabel {
                container: id,
                label: label_id,
            })?;

        let show = !label.panes.iter().any(|&p| state.pane_visible[p]);
        for &p in &label.panes {
            dom.set_visible(container.panes[p].node, show);
            state.pane_visible[p] = show;
        }

        if show {
            dom.add_class(label.node, &config.selected_class);
        } else {
            dom.remove_class(label.node, &config.selected_class);
        }
        state.label_selected[label_id.0] = show;

        state.mode = DisplayMode::from_any_visible(state.any_pane_visible());
        apply_triggers(dom, container, state.mode);

        tracing::debug!(
            container = id.0,
            label = label_id.0,
            pane_ref = label.pane_ref.as_deref().unwrap_or(""),
            show,
            mode = ?state.mode,
            "pane toggled"
        );
        Ok(())
    }

    /// Point the graph image at the URL stored for `variant`.
    ///
    /// Without a value holder for the variant the image loses its `src`.
    pub fn select_version_graph(
        &mut self,
        id: ContainerId,
        variant: &str,
    ) -> Result<(), ControlError> {
        let (dom, container, state, _) = self.parts(id)?;
        state.graph_variant = Some(variant.to_string());

        let Some(img) = container.graph_image else {
            tracing::debug!(container = id.0, variant, "no graph image to update");
            return Ok(());
        };

        match container.graph_source(variant) {
            Some(src) => {
                dom.set_attr(img, "src", src);
                tracing::debug!(container = id.0, variant, src, "graph source set");
            }
            None => {
                dom.remove_attr(img, "src");
                tracing::debug!(container = id.0, variant, "graph variant has no source");
            }
        }
        Ok(())
    }

    /// Show only the comparison subsection for `value` and the label
    /// grouping that goes with it.
    pub fn select_table_view(&mut self, id: ContainerId, value: &str) -> Result<(), ControlError> {
        let (dom, container, state, config) = self.parts(id)?;

        for s in &container.subsections {
            dom.set_visible(s.node, false);
        }
        for s in container.subsections.iter().filter(|s| s.view == value) {
            dom.set_visible(s.node, true);
        }

        let view = ViewSelection::from_value(value, &config.rundata_value);
        let normal = view.label_grouping() == LabelGrouping::Normal;
        for &g in &container.normal_groups {
            dom.set_visible(g, normal);
        }
        for &g in &container.detail_groups {
            dom.set_visible(g, !normal);
        }

        tracing::debug!(container = id.0, view = value, normal, "table view selected");
        state.view = view;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Event Wiring
    // ─────────────────────────────────────────────────────────────────────────

    /// Every listener the host should register, one per interactive element
    pub fn bindings(&self) -> Vec<EventBinding> {
        let mut out = Vec::new();
        for (i, c) in self.containers.iter().enumerate() {
            let container = ContainerId(i);
            out.push(EventBinding {
                node: c.show_trigger,
                event: EventKind::Click,
                interaction: Interaction::ShowInfo { container },
            });
            out.push(EventBinding {
                node: c.hide_trigger,
                event: EventKind::Click,
                interaction: Interaction::HideInfo { container },
            });
            for (l, label) in c.labels.iter().enumerate() {
                out.push(EventBinding {
                    node: label.node,
                    event: EventKind::Click,
                    interaction: Interaction::LabelClick {
                        container,
                        label: LabelId(l),
                    },
                });
            }
            if let Some(select) = c.version_select {
                out.push(EventBinding {
                    node: select,
                    event: EventKind::Change,
                    interaction: Interaction::VersionChange { container },
                });
            }
            if let Some(select) = c.view_select {
                out.push(EventBinding {
                    node: select,
                    event: EventKind::Change,
                    interaction: Interaction::ViewChange { container },
                });
            }
        }
        out
    }

    /// Run the handler for one interaction
    pub fn dispatch(&mut self, interaction: Interaction) -> Result<(), ControlError> {
        match interaction {
            Interaction::ShowInfo { container } => self.enter_info_mode(container),
            Interaction::HideInfo { container } => self.enter_table_mode(container),
            Interaction::LabelClick { container, label } => self.toggle_pane(container, label),
            Interaction::VersionChange { container } => {
                let select = self.container(container)?.version_select;
                let value = select.and_then(|s| self.dom.value(s));
                match value {
                    Some(variant) => self.select_version_graph(container, &variant),
                    None => Ok(()),
                }
            }
            Interaction::ViewChange { container } => {
                let select = self.container(container)?.view_select;
                let value = select.and_then(|s| self.dom.value(s));
                match value {
                    Some(view) => self.select_table_view(container, &view),
                    None => Ok(()),
                }
            }
        }
    }

    /// Describe a container as it currently appears in the document
    pub fn snapshot(&self, id: ContainerId) -> Result<ContainerSnapshot, ControlError> {
        let container = self.container(id)?;
        let state = self.state(id)?;
        let dom = &self.dom;

        let (visible_panes, hidden_panes): (Vec<_>, Vec<_>) = container
            .panes
            .iter()
            .partition(|p| dom.is_visible(p.node));

        Ok(ContainerSnapshot {
            index: id.0,
            mode: state.mode,
            show_trigger_visible: dom.is_visible(container.show_trigger),
            hide_trigger_visible: dom.is_visible(container.hide_trigger),
            visible_panes: visible_panes.into_iter().map(|p| p.id.clone()).collect(),
            hidden_panes: hidden_panes.into_iter().map(|p| p.id.clone()).collect(),
            selected_labels: container
                .labels
                .iter()
                .zip(&state.label_selected)
                .filter(|(_, selected)| **selected)
                .map(|(l, _)| l.pane_ref.clone().unwrap_or_default())
                .collect(),
            graph_variant: state.graph_variant.clone(),
            graph_src: container.graph_image.and_then(|img| dom.attr(img, "src")),
            view: state.view.clone(),
            label_grouping: state.view.label_grouping(),
        })
    }
}

fn apply_triggers<D: Dom + ?Sized>(dom: &mut D, container: &DatasetContainer, mode: DisplayMode) {
    dom.set_visible(container.show_trigger, mode.show_trigger_visible());
    dom.set_visible(container.hide_trigger, mode.hide_trigger_visible());
}
