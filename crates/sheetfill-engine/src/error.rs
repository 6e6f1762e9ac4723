use sheetfill_common::NodeKind;
use thiserror::Error;

/// Fatal, per-record normalization failures.
///
/// The designated containers the normalizer re-keys and aggregates must
/// exist as objects; everything else on a record is free-form. A failure
/// here abandons the current record, not the batch. Recoverable findings
/// are collected as [`crate::Warning`]s instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("record root is not an object")]
    RootNotObject,

    #[error("designated container `{path}` is missing")]
    MissingContainer { path: String },

    #[error("designated container `{path}` must be an object, found {found}")]
    UnexpectedShape { path: String, found: NodeKind },
}
