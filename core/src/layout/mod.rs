//! Report layout
//!
//! Describes the dataset containers of a report the way the report
//! generator renders them, and builds the matching [`MemoryDom`]. Used by the
//! CLI to drive the controller without a browser, and by tests as a fixture
//! builder.
//!
//! ```toml
//! [[dataset]]
//! title = "read throughput"
//! panes = ["info_0", "info_1"]
//! visible_panes = []
//! views = ["averages", "hits", "rundata"]
//!
//! [[dataset.graph]]
//! variant = "v3"
//! src = "graphs/v3.png"
//! ```

use report_view_types::{ContractConfig, LabelGrouping, ViewSelection};
use serde::{Deserialize, Serialize};

use crate::dom::{Dom, MemoryDom, NodeId};

/// Every dataset container of a report, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLayout {
    #[serde(default, rename = "dataset")]
    pub datasets: Vec<DatasetLayout>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetLayout {
    #[serde(default)]
    pub title: String,
    /// Detail pane ids; one results row with a label is rendered per pane
    #[serde(default)]
    pub panes: Vec<String>,
    /// Panes rendered visible (their labels start selected)
    #[serde(default)]
    pub visible_panes: Vec<String>,
    #[serde(default, rename = "graph")]
    pub graphs: Vec<GraphLayout>,
    /// Variant initially chosen in the version dropdown (first graph if unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_variant: Option<String>,
    /// Comparison views, one `compare_<view>` subsection per results row each
    #[serde(default)]
    pub views: Vec<String>,
    /// View initially chosen in the view dropdown (first view if unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_view: Option<String>,
}

/// One entry of the version dropdown and its graph URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLayout {
    pub variant: String,
    pub src: String,
}

impl ReportLayout {
    /// Build the report document using the class names of `config`
    pub fn render(&self, config: &ContractConfig) -> MemoryDom {
        let mut dom = MemoryDom::new();
        let root = dom.root();
        for dataset in &self.datasets {
            dataset.render_into(&mut dom, root, config);
        }
        dom
    }
}

impl DatasetLayout {
    fn render_into(&self, dom: &mut MemoryDom, parent: NodeId, config: &ContractConfig) -> NodeId {
        let ds = dom.element(parent, "div").class(&config.dataset_class).build();
        if !self.title.is_empty() {
            dom.element(ds, "h2").text(&self.title).build();
        }

        let any_visible = self.panes.iter().any(|p| self.visible_panes.contains(p));
        dom.element(ds, "input")
            .attr("type", "button")
            .class(&config.show_button_class)
            .attr("value", "show info")
            .hidden_if(any_visible)
            .build();
        dom.element(ds, "input")
            .attr("type", "button")
            .class(&config.hide_button_class)
            .attr("value", "hide info")
            .hidden_if(!any_visible)
            .build();

        self.render_graph(dom, ds, config);

        let active_view = self.active_view.clone().or_else(|| self.views.first().cloned());
        let grouping = active_view
            .as_deref()
            .map(|v| ViewSelection::from_value(v, &config.rundata_value).label_grouping())
            .unwrap_or_default();

        if !self.views.is_empty() {
            let select = dom.element(ds, "select").class(&config.view_select_class).build();
            for view in &self.views {
                let mut opt = dom.element(select, "option").attr("value", view).text(view);
                if active_view.as_deref() == Some(view.as_str()) {
                    opt = opt.attr("selected", "selected");
                }
                opt.build();
            }
        }

        let table = dom.element(ds, "table").build();
        for pane_id in &self.panes {
            let visible = self.visible_panes.contains(pane_id);

            let row = dom.element(table, "tr").build();
            let mut label = dom.element(row, "td").class(&config.label_class);
            if visible {
                label = label.class(&config.selected_class);
            }
            let label = label.build();
            dom.element(label, "div")
                .class(&config.normal_group_class)
                .text(pane_id)
                .hidden_if(grouping != LabelGrouping::Normal)
                .build();
            dom.element(label, "div")
                .class(&config.detail_group_class)
                .text(pane_id)
                .hidden_if(grouping != LabelGrouping::Detail)
                .build();
            dom.element(label, "input")
                .attr("type", "hidden")
                .attr("name", &config.pane_id_input)
                .attr("value", pane_id)
                .build();

            let cell = dom.element(row, "td").build();
            for view in &self.views {
                dom.element(cell, "div")
                    .class(&config.subsection_class(view))
                    .hidden_if(active_view.as_deref() != Some(view.as_str()))
                    .build();
            }

            dom.element(table, "tr")
                .class(&config.pane_class)
                .attr("id", pane_id)
                .hidden_if(!visible)
                .build();
        }

        ds
    }

    fn render_graph(&self, dom: &mut MemoryDom, ds: NodeId, config: &ContractConfig) {
        if self.graphs.is_empty() {
            return;
        }

        let selected = self
            .selected_variant
            .as_deref()
            .or_else(|| self.graphs.first().map(|g| g.variant.as_str()));

        let select = dom.element(ds, "select").class(&config.version_select_class).build();
        for g in &self.graphs {
            let mut opt = dom
                .element(select, "option")
                .attr("value", &g.variant)
                .text(&g.variant);
            if selected == Some(g.variant.as_str()) {
                opt = opt.attr("selected", "selected");
            }
            opt.build();
        }

        for g in &self.graphs {
            dom.element(ds, "input")
                .attr("type", "hidden")
                .attr("name", &config.graph_holder_name(&g.variant))
                .attr("value", &g.src)
                .build();
        }

        let mut img = dom.element(ds, "img").class(&config.graph_image_class);
        if let Some(src) = self
            .graphs
            .iter()
            .find(|g| Some(g.variant.as_str()) == selected)
            .map(|g| g.src.as_str())
        {
            img = img.attr("src", src);
        }
        img.build();
    }
}
