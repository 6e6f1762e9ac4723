//! Record normalization and template binding.
//!
//! This crate turns one raw resource-mobilisation record at a time into the
//! cell values of a report sheet. The passes are deliberately separable:
//! [`Normalizer`] reshapes an owned record tree, [`flatten`] projects it
//! onto a dotted-path [`ValueMap`], [`scan`] discovers placeholder
//! [`Binding`]s in a template grid once per run, and [`resolve`] combines
//! one binding with one value map. Grid access and catalog I/O live in
//! sibling crates; nothing here touches the network or a workbook.

mod diagnostics;
mod error;
mod flatten;
mod normalize;
mod placeholder;
mod resolve;
mod terms;

pub use diagnostics::Warning;
pub use error::NormalizeError;
pub use flatten::{ValueMap, flatten};
pub use normalize::{NormalizedRecord, Normalizer, SOURCE_YEARS, TermAlias};
pub use placeholder::{Binding, scan};
pub use resolve::resolve;
pub use terms::{Term, TermDirectory, sheet_name};
