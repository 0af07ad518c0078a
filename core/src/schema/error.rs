//! Error types for container binding

use thiserror::Error;

use crate::dom::NodeId;

/// Markup that violates the structural contract of a dataset container
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("dataset container {container:?} has no show trigger (input.{class})")]
    MissingShowTrigger { container: NodeId, class: String },

    #[error("dataset container {container:?} has no hide trigger (input.{class})")]
    MissingHideTrigger { container: NodeId, class: String },

    #[error("dataset container {container:?} has two detail panes with id '{pane_id}'")]
    DuplicatePaneId { container: NodeId, pane_id: String },

    #[error("label {label:?} in dataset container {container:?} refers to unknown pane '{pane_id}'")]
    UnknownPane {
        container: NodeId,
        label: NodeId,
        pane_id: String,
    },

    #[error("dataset container {container:?} offers graph variant '{variant}' without a value holder")]
    MissingGraphHolder { container: NodeId, variant: String },
}
