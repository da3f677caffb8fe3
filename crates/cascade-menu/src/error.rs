use thiserror::Error;

use crate::spec::ActionError;

/// Errors raised while building or driving a menu.
#[derive(Debug, Error)]
pub enum MenuError {
    /// The declarative menu could not be turned into a tree. `label` names
    /// the offending entry, or is `None` for the top level.
    #[error("invalid menu spec{}: {reason}", at_label(.label))]
    InvalidMenuSpec {
        label: Option<String>,
        reason: String,
    },

    /// An item's action callback failed. The menu chain was left open.
    #[error("action `{label}` failed")]
    Action {
        label: String,
        #[source]
        source: ActionError,
    },
}

impl MenuError {
    pub(crate) fn invalid(label: Option<&str>, reason: impl Into<String>) -> Self {
        Self::InvalidMenuSpec {
            label: label.map(str::to_owned),
            reason: reason.into(),
        }
    }
}

fn at_label(label: &Option<String>) -> String {
    match label {
        Some(l) => format!(" at `{l}`"),
        None => String::new(),
    }
}
