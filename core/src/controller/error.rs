//! Error types for controller operations

use thiserror::Error;

use super::{ContainerId, LabelId};

/// A handle passed to the controller does not belong to it
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControlError {
    #[error("no dataset container {0:?}")]
    UnknownContainer(ContainerId),

    #[error("dataset container {container:?} has no label {label:?}")]
    UnknownLabel {
        container: ContainerId,
        label: LabelId,
    },
}
