//! Error taxonomy.
//!
//! Configuration problems ([`InstanceError`], [`ConfigError`]) are raised
//! before any heuristic runs. Structural infeasibility (too few desks, no
//! eligible swap pair) is never an error: the builder leaves employees
//! unassigned and moves degrade to no-ops.

use std::path::PathBuf;
use thiserror::Error;

/// A malformed instance: duplicate identifiers or references to ids the
/// instance does not declare.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InstanceError {
    #[error("duplicate employee id `{0}`")]
    DuplicateEmployee(String),

    #[error("duplicate desk id `{0}`")]
    DuplicateDesk(String),

    #[error("duplicate day id `{0}`")]
    DuplicateDay(String),

    #[error("{context}: unknown employee `{id}`")]
    UnknownEmployee { context: String, id: String },

    #[error("{context}: unknown desk `{id}`")]
    UnknownDesk { context: String, id: String },

    #[error("{context}: unknown day `{id}`")]
    UnknownDay { context: String, id: String },
}

/// An invalid algorithm parameter.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("invalid {component} configuration: {reason}")]
pub struct ConfigError {
    pub component: &'static str,
    pub reason: String,
}

impl ConfigError {
    pub(crate) fn new(component: &'static str, reason: impl Into<String>) -> Self {
        Self {
            component,
            reason: reason.into(),
        }
    }
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Instance(#[from] InstanceError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "serde")]
    #[error("malformed json in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
