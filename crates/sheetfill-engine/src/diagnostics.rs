use std::fmt::{self, Display};

use sheetfill_common::NodeKind;

/// Data-quality finding recovered locally; collected per record and never
/// fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A collection element lacked a usable value for its re-key field and
    /// was dropped from the keyed result.
    MissingKeyField { path: String, key: &'static str },
    /// An `identifier` property held something other than a string; title
    /// resolution skipped that node.
    InvalidIdentifierType { path: String, found: NodeKind },
}

impl Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MissingKeyField { path, key } => {
                write!(f, "`{key}` is not specified on `{path}`; element dropped")
            }
            Warning::InvalidIdentifierType { path, found } => {
                write!(f, "invalid identifier type {found} at `{path}`")
            }
        }
    }
}

/// Emit a warning on the tracing channel as it is recorded.
pub(crate) fn report(warning: &Warning) {
    #[cfg(feature = "tracing")]
    tracing::warn!(%warning, "record normalization warning");
    #[cfg(not(feature = "tracing"))]
    let _ = warning;
}
