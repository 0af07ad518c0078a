//! Shared configuration types for report-view
//!
//! This crate contains serializable types that are shared between the native
//! controller (report-view-core, report-view-cli) and the WASM frontend
//! (report-view-web): the markup contract a rendered report is expected to
//! follow, and the small state enums each dataset container carries.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Markup Contract
// ─────────────────────────────────────────────────────────────────────────────

/// How a label's pane identifier is matched against pane ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaneMatch {
    /// Pane id must equal the label's value
    #[default]
    Exact,
    /// Every pane whose id contains the label's value is matched; an empty
    /// value matches nothing
    Substring,
}

impl PaneMatch {
    pub fn matches(&self, pane_id: &str, wanted: &str) -> bool {
        match self {
            PaneMatch::Exact => pane_id == wanted,
            PaneMatch::Substring => !wanted.is_empty() && pane_id.contains(wanted),
        }
    }
}

/// Class and attribute names the report generator uses for each structural
/// part of a dataset container.
///
/// Every field has a default matching the stock report markup, so an empty
/// TOML document yields a usable contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractConfig {
    #[serde(default = "default_dataset_class")]
    pub dataset_class: String,
    #[serde(default = "default_show_button_class")]
    pub show_button_class: String,
    #[serde(default = "default_hide_button_class")]
    pub hide_button_class: String,
    #[serde(default = "default_pane_class")]
    pub pane_class: String,
    /// Label cells: any `td` whose class list contains this token
    #[serde(default = "default_label_class")]
    pub label_class: String,
    /// Marker class added to a label while its pane is visible
    #[serde(default = "default_selected_class")]
    pub selected_class: String,
    /// Substring of the `name` of the hidden input nested in a label
    #[serde(default = "default_pane_id_input")]
    pub pane_id_input: String,
    #[serde(default = "default_version_select_class")]
    pub version_select_class: String,
    #[serde(default = "default_graph_image_class")]
    pub graph_image_class: String,
    /// Hidden inputs named `<prefix><variant>` carry per-variant graph URLs
    #[serde(default = "default_graph_holder_prefix")]
    pub graph_holder_prefix: String,
    #[serde(default = "default_view_select_class")]
    pub view_select_class: String,
    /// Comparison subsections carry a class `<prefix><view>`
    #[serde(default = "default_subsection_prefix")]
    pub subsection_prefix: String,
    /// The distinguished view value that selects the normal label grouping
    #[serde(default = "default_rundata_value")]
    pub rundata_value: String,
    #[serde(default = "default_normal_group_class")]
    pub normal_group_class: String,
    #[serde(default = "default_detail_group_class")]
    pub detail_group_class: String,
    #[serde(default)]
    pub pane_match: PaneMatch,
    /// Reject unresolvable label/graph references at bind time instead of
    /// logging and degrading to no-ops
    #[serde(default)]
    pub strict: bool,
}

fn default_dataset_class() -> String { "dataset".to_string() }
fn default_show_button_class() -> String { "dataset_info_show_button".to_string() }
fn default_hide_button_class() -> String { "dataset_info_hide_button".to_string() }
fn default_pane_class() -> String { "data_info_pane".to_string() }
fn default_label_class() -> String { "label".to_string() }
fn default_selected_class() -> String { "selected".to_string() }
fn default_pane_id_input() -> String { "pane_id".to_string() }
fn default_version_select_class() -> String { "nfsvers".to_string() }
fn default_graph_image_class() -> String { "data_graph".to_string() }
fn default_graph_holder_prefix() -> String { "data_graph_".to_string() }
fn default_view_select_class() -> String { "compare_select".to_string() }
fn default_subsection_prefix() -> String { "compare_".to_string() }
fn default_rundata_value() -> String { "rundata".to_string() }
fn default_normal_group_class() -> String { "group_normal".to_string() }
fn default_detail_group_class() -> String { "group_detail".to_string() }

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            dataset_class: default_dataset_class(),
            show_button_class: default_show_button_class(),
            hide_button_class: default_hide_button_class(),
            pane_class: default_pane_class(),
            label_class: default_label_class(),
            selected_class: default_selected_class(),
            pane_id_input: default_pane_id_input(),
            version_select_class: default_version_select_class(),
            graph_image_class: default_graph_image_class(),
            graph_holder_prefix: default_graph_holder_prefix(),
            view_select_class: default_view_select_class(),
            subsection_prefix: default_subsection_prefix(),
            rundata_value: default_rundata_value(),
            normal_group_class: default_normal_group_class(),
            detail_group_class: default_detail_group_class(),
            pane_match: PaneMatch::default(),
            strict: false,
        }
    }
}

impl ContractConfig {
    /// Name of the hidden input holding the graph URL for `variant`
    pub fn graph_holder_name(&self, variant: &str) -> String {
        format!("{}{}", self.graph_holder_prefix, variant)
    }

    /// Class of the comparison subsection for `view`
    pub fn subsection_class(&self, view: &str) -> String {
        format!("{}{}", self.subsection_prefix, view)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Per-Container View State
// ─────────────────────────────────────────────────────────────────────────────

/// Info/table state of a dataset container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// No detail pane visible; the "show info" trigger is offered
    #[default]
    Table,
    /// Detail panes shown; the "hide info" trigger is offered
    Info,
}

impl DisplayMode {
    pub fn from_any_visible(any_visible: bool) -> Self {
        if any_visible {
            DisplayMode::Info
        } else {
            DisplayMode::Table
        }
    }

    pub fn show_trigger_visible(&self) -> bool {
        matches!(self, DisplayMode::Table)
    }

    pub fn hide_trigger_visible(&self) -> bool {
        matches!(self, DisplayMode::Info)
    }
}

/// Which label grouping is displayed next to the results table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelGrouping {
    #[default]
    Normal,
    Detail,
}

/// Comparison view selected in a container's view dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewSelection {
    /// Per-run data view, paired with the normal label grouping
    #[default]
    Rundata,
    /// Any other comparison view, paired with the detail label grouping
    Compare(String),
}

impl ViewSelection {
    pub fn from_value(value: &str, rundata_value: &str) -> Self {
        if value == rundata_value {
            ViewSelection::Rundata
        } else {
            ViewSelection::Compare(value.to_string())
        }
    }

    /// The raw option value this selection corresponds to
    pub fn value<'a>(&'a self, rundata_value: &'a str) -> &'a str {
        match self {
            ViewSelection::Rundata => rundata_value,
            ViewSelection::Compare(v) => v,
        }
    }

    pub fn label_grouping(&self) -> LabelGrouping {
        match self {
            ViewSelection::Rundata => LabelGrouping::Normal,
            ViewSelection::Compare(_) => LabelGrouping::Detail,
        }
    }
}

/// Point-in-time description of one dataset container, as observed through
/// the controller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContainerSnapshot {
    pub index: usize,
    pub mode: DisplayMode,
    pub show_trigger_visible: bool,
    pub hide_trigger_visible: bool,
    pub visible_panes: Vec<String>,
    pub hidden_panes: Vec<String>,
    /// Pane ids of labels currently carrying the selected marker; labels
    /// without a pane id are reported as an empty string
    pub selected_labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_src: Option<String>,
    pub view: ViewSelection,
    pub label_grouping: LabelGrouping,
}
