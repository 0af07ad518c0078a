//! Dataset container binding
//!
//! A rendered report is scanned once. Every `div.dataset` becomes a
//! [`DatasetContainer`] holding explicit handles to its structural parts, so
//! event handlers never search the document again.
//!
//! Binding fails fast on markup that cannot work at all (missing show/hide
//! triggers, duplicate pane ids). References that merely cannot be resolved
//! are rejected only in strict mode; otherwise they are logged and degrade to
//! no-ops.

mod error;

pub use error::SchemaError;

use std::collections::HashMap;

use report_view_types::ContractConfig;

use crate::dom::{Dom, NodeId, descendants, descendants_until};

/// A hideable detail row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pane {
    pub node: NodeId,
    pub id: String,
}

/// A label cell. Labels carrying a pane reference toggle that pane on click;
/// the others only take part in info/table mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub node: NodeId,
    /// Value of the nested pane-id input, if any
    pub pane_ref: Option<String>,
    /// Indices into [`DatasetContainer::panes`] resolved from `pane_ref`
    pub panes: Vec<usize>,
}

/// A comparison subsection (`compare_<view>`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subsection {
    pub node: NodeId,
    pub view: String,
}

/// One validated dataset container
#[derive(Debug, Clone)]
pub struct DatasetContainer {
    pub node: NodeId,
    pub show_trigger: NodeId,
    pub hide_trigger: NodeId,
    pub panes: Vec<Pane>,
    pub labels: Vec<Label>,
    pub version_select: Option<NodeId>,
    pub graph_image: Option<NodeId>,
    pub view_select: Option<NodeId>,
    pub subsections: Vec<Subsection>,
    pub normal_groups: Vec<NodeId>,
    pub detail_groups: Vec<NodeId>,
    pane_index: HashMap<String, usize>,
    graph_sources: HashMap<String, String>,
}

/// Every dataset container in the document, outermost first
pub fn find_containers<D: Dom + ?Sized>(dom: &D, config: &ContractConfig) -> Vec<NodeId> {
    descendants(dom, dom.root())
        .into_iter()
        .filter(|&n| is_container(dom, n, config))
        .collect()
}

/// Bind every dataset container in the document
pub fn bind_all<D: Dom + ?Sized>(
    dom: &D,
    config: &ContractConfig,
) -> Result<Vec<DatasetContainer>, SchemaError> {
    find_containers(dom, config)
        .into_iter()
        .map(|node| DatasetContainer::bind(dom, node, config))
        .collect()
}

fn is_container<D: Dom + ?Sized>(dom: &D, node: NodeId, config: &ContractConfig) -> bool {
    dom.tag(node) == "div" && dom.has_class(node, &config.dataset_class)
}

impl DatasetContainer {
    /// Scan the subtree of `node` and resolve every structural part.
    ///
    /// Nested dataset containers are skipped: each part belongs to its
    /// nearest enclosing container only.
    pub fn bind<D: Dom + ?Sized>(
        dom: &D,
        node: NodeId,
        config: &ContractConfig,
    ) -> Result<Self, SchemaError> {
        let scope = descendants_until(dom, node, |n| is_container(dom, n, config));

        let first = |tag: &str, class: &str| {
            scope
                .iter()
                .copied()
                .find(|&n| dom.tag(n) == tag && dom.has_class(n, class))
        };
        let all_with_class = |class: &str| -> Vec<NodeId> {
            scope
                .iter()
                .copied()
                .filter(|&n| dom.has_class(n, class))
                .collect()
        };

        let show_trigger = first("input", &config.show_button_class).ok_or_else(|| {
            SchemaError::MissingShowTrigger {
                container: node,
                class: config.show_button_class.clone(),
            }
        })?;
        let hide_trigger = first("input", &config.hide_button_class).ok_or_else(|| {
            SchemaError::MissingHideTrigger {
                container: node,
                class: config.hide_button_class.clone(),
            }
        })?;

        // Panes
        let mut panes = Vec::new();
        let mut pane_index = HashMap::new();
        for n in scope
            .iter()
            .copied()
            .filter(|&n| dom.tag(n) == "tr" && dom.has_class(n, &config.pane_class))
        {
            let id = dom.attr(n, "id").unwrap_or_default();
            if id.is_empty() {
                tracing::warn!(container = ?node, pane = ?n, "detail pane without id");
            } else if pane_index.insert(id.clone(), panes.len()).is_some() {
                return Err(SchemaError::DuplicatePaneId {
                    container: node,
                    pane_id: id,
                });
            }
            panes.push(Pane { node: n, id });
        }

        // Labels
        let mut labels = Vec::new();
        for n in scope
            .iter()
            .copied()
            .filter(|&n| dom.tag(n) == "td" && dom.has_class(n, &config.label_class))
        {
            let pane_ref = descendants(dom, n)
                .into_iter()
                .find(|&i| {
                    dom.tag(i) == "input"
                        && dom
                            .attr(i, "name")
                            .is_some_and(|name| name.contains(&config.pane_id_input))
                })
                .map(|i| dom.attr(i, "value").unwrap_or_default());

            let resolved = match &pane_ref {
                Some(wanted) => {
                    let hits = resolve_panes(&panes, &pane_index, wanted, config);
                    if hits.is_empty() {
                        if config.strict {
                            return Err(SchemaError::UnknownPane {
                                container: node,
                                label: n,
                                pane_id: wanted.clone(),
                            });
                        }
                        tracing::warn!(container = ?node, label = ?n, pane_id = %wanted, "label refers to unknown pane");
                    }
                    hits
                }
                None => Vec::new(),
            };

            labels.push(Label {
                node: n,
                pane_ref,
                panes: resolved,
            });
        }

        // Graph selector, holders and image
        let version_select = first("select", &config.version_select_class);
        let graph_image = first("img", &config.graph_image_class);
        let graph_sources: HashMap<String, String> = scope
            .iter()
            .copied()
            .filter(|&n| dom.tag(n) == "input")
            .filter_map(|n| {
                let name = dom.attr(n, "name")?;
                let variant = name.strip_prefix(&config.graph_holder_prefix)?;
                Some((variant.to_string(), dom.attr(n, "value").unwrap_or_default()))
            })
            .collect();

        if let Some(select) = version_select {
            for variant in option_values(dom, select) {
                if graph_sources.contains_key(&variant) {
                    continue;
                }
                if config.strict {
                    return Err(SchemaError::MissingGraphHolder {
                        container: node,
                        variant,
                    });
                }
                tracing::warn!(container = ?node, %variant, "graph variant without value holder");
            }
        }
        if version_select.is_some() && graph_image.is_none() {
            tracing::warn!(container = ?node, "version selector without graph image");
        }

        // Comparison views
        let view_select = first("select", &config.view_select_class);
        let subsections = scope
            .iter()
            .copied()
            .filter(|&n| !matches!(dom.tag(n), "select" | "option"))
            .flat_map(|n| {
                dom.classes(n)
                    .into_iter()
                    .filter(|c| c != &config.view_select_class)
                    .filter_map(|c| {
                        c.strip_prefix(&config.subsection_prefix)
                            .filter(|v| !v.is_empty())
                            .map(str::to_string)
                    })
                    .map(move |view| Subsection { node: n, view })
            })
            .collect();

        let container = Self {
            node,
            show_trigger,
            hide_trigger,
            panes,
            labels,
            version_select,
            graph_image,
            view_select,
            subsections,
            normal_groups: all_with_class(&config.normal_group_class),
            detail_groups: all_with_class(&config.detail_group_class),
            pane_index,
            graph_sources,
        };

        tracing::debug!(
            container = ?node,
            panes = container.panes.len(),
            labels = container.labels.len(),
            graph_variants = container.graph_sources.len(),
            subsections = container.subsections.len(),
            "bound dataset container"
        );

        Ok(container)
    }

    /// Index of the pane with exactly this id
    pub fn pane_index(&self, pane_id: &str) -> Option<usize> {
        self.pane_index.get(pane_id).copied()
    }

    /// URL stored for a graph variant
    pub fn graph_source(&self, variant: &str) -> Option<&str> {
        self.graph_sources.get(variant).map(String::as_str)
    }

    /// Graph variants with a value holder, sorted
    pub fn graph_variants(&self) -> Vec<&str> {
        let mut variants: Vec<&str> = self.graph_sources.keys().map(String::as_str).collect();
        variants.sort_unstable();
        variants
    }

    /// Distinct comparison views in document order
    pub fn views(&self) -> Vec<&str> {
        let mut views: Vec<&str> = Vec::new();
        for s in &self.subsections {
            if !views.contains(&s.view.as_str()) {
                views.push(&s.view);
            }
        }
        views
    }

    /// Label whose pane reference is exactly `pane_id`
    pub fn label_for_pane(&self, pane_id: &str) -> Option<usize> {
        self.labels
            .iter()
            .position(|l| l.pane_ref.as_deref() == Some(pane_id))
    }
}

fn resolve_panes(
    panes: &[Pane],
    pane_index: &HashMap<String, usize>,
    wanted: &str,
    config: &ContractConfig,
) -> Vec<usize> {
    match config.pane_match {
        report_view_types::PaneMatch::Exact => pane_index.get(wanted).copied().into_iter().collect(),
        report_view_types::PaneMatch::Substring => panes
            .iter()
            .enumerate()
            .filter(|(_, p)| config.pane_match.matches(&p.id, wanted))
            .map(|(i, _)| i)
            .collect(),
    }
}

fn option_values<D: Dom + ?Sized>(dom: &D, select: NodeId) -> Vec<String> {
    descendants(dom, select)
        .into_iter()
        .filter(|&n| dom.tag(n) == "option")
        .filter_map(|n| dom.attr(n, "value"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;
    use report_view_types::PaneMatch;

    /// Container with two panes and the given label references
    fn build(label_refs: &[&str]) -> (MemoryDom, NodeId) {
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let ds = dom.element(root, "div").class("dataset").build();
        dom.element(ds, "input").class("dataset_info_show_button").build();
        dom.element(ds, "input").class("dataset_info_hide_button").hidden().build();
        let table = dom.element(ds, "table").build();
        for r in label_refs {
            let tr = dom.element(table, "tr").build();
            let td = dom.element(tr, "td").class("label").build();
            dom.element(td, "input").attr("name", "pane_id").attr("value", r).build();
        }
        for id in ["info_1", "info_12"] {
            dom.element(table, "tr")
                .class("data_info_pane")
                .attr("id", id)
                .hidden()
                .build();
        }
        (dom, ds)
    }

    #[test]
    fn test_bind_resolves_exact_panes() {
        let (dom, ds) = build(&["info_1", "info_12"]);
        let c = DatasetContainer::bind(&dom, ds, &ContractConfig::default()).unwrap();

        assert_eq!(c.panes.len(), 2);
        assert_eq!(c.labels[0].panes, vec![0]);
        assert_eq!(c.labels[1].panes, vec![1]);
        assert_eq!(c.pane_index("info_12"), Some(1));
        assert_eq!(c.label_for_pane("info_12"), Some(1));
    }

    #[test]
    fn test_bind_substring_matches_every_containing_pane() {
        let (dom, ds) = build(&["info_1"]);
        let config = ContractConfig {
            pane_match: PaneMatch::Substring,
            ..Default::default()
        };
        let c = DatasetContainer::bind(&dom, ds, &config).unwrap();
        assert_eq!(c.labels[0].panes, vec![0, 1]);
    }

    #[test]
    fn test_missing_trigger_fails_fast() {
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let ds = dom.element(root, "div").class("dataset").build();
        dom.element(ds, "input").class("dataset_info_show_button").build();

        let err = DatasetContainer::bind(&dom, ds, &ContractConfig::default()).unwrap_err();
        assert!(matches!(err, SchemaError::MissingHideTrigger { .. }));
    }

    #[test]
    fn test_duplicate_pane_id_rejected() {
        let (mut dom, ds) = build(&[]);
        dom.element(ds, "tr")
            .class("data_info_pane")
            .attr("id", "info_1")
            .build();

        let err = DatasetContainer::bind(&dom, ds, &ContractConfig::default()).unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicatePaneId {
                container: ds,
                pane_id: "info_1".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_pane_lenient_vs_strict() {
        let (dom, ds) = build(&["info_9"]);

        let lenient = DatasetContainer::bind(&dom, ds, &ContractConfig::default()).unwrap();
        assert!(lenient.labels[0].panes.is_empty());
        assert_eq!(lenient.labels[0].pane_ref.as_deref(), Some("info_9"));

        let strict = ContractConfig {
            strict: true,
            ..Default::default()
        };
        let err = DatasetContainer::bind(&dom, ds, &strict).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownPane { ref pane_id, .. } if pane_id == "info_9"));
    }

    #[test]
    fn test_nested_container_parts_are_not_shared() {
        let (mut dom, outer) = build(&["info_1"]);
        let inner = dom.element(outer, "div").class("dataset").build();
        dom.element(inner, "input").class("dataset_info_show_button").build();
        dom.element(inner, "input").class("dataset_info_hide_button").build();
        dom.element(inner, "tr")
            .class("data_info_pane")
            .attr("id", "inner_1")
            .build();

        let all = bind_all(&dom, &ContractConfig::default()).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].panes.len(), 2);
        assert_eq!(all[1].panes.len(), 1);
        assert_eq!(all[1].panes[0].id, "inner_1");
    }

    #[test]
    fn test_graph_holders_and_views() {
        let (mut dom, ds) = build(&[]);
        let select = dom.element(ds, "select").class("nfsvers").build();
        dom.element(select, "option").attr("value", "v3").build();
        dom.element(select, "option").attr("value", "v4.1").build();
        dom.element(ds, "input")
            .attr("type", "hidden")
            .attr("name", "data_graph_v4.1")
            .attr("value", "graphs/v41.png")
            .build();
        dom.element(ds, "img").class("data_graph").build();
        dom.element(ds, "select").class("compare_select").build();
        dom.element(ds, "div").class("compare_rundata").build();
        dom.element(ds, "div").class("compare_hits").build();
        dom.element(ds, "div").class("compare_rundata").build();

        let c = DatasetContainer::bind(&dom, ds, &ContractConfig::default()).unwrap();
        assert_eq!(c.graph_source("v4.1"), Some("graphs/v41.png"));
        assert_eq!(c.graph_source("v3"), None);
        assert_eq!(c.graph_variants(), vec!["v4.1"]);
        assert_eq!(c.views(), vec!["rundata", "hits"]);
        assert_eq!(c.subsections.len(), 3);

        let strict = ContractConfig {
            strict: true,
            ..Default::default()
        };
        let err = DatasetContainer::bind(&dom, ds, &strict).unwrap_err();
        assert!(matches!(err, SchemaError::MissingGraphHolder { ref variant, .. } if variant == "v3"));
    }
}
