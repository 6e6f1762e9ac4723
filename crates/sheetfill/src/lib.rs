//! Meta crate that ties the sheetfill pipeline together: record shaping from
//! [`engine`], catalog access from [`catalog`], grid IO from [`template`].
//! Depend on this crate for the full stack, or on the individual crates when
//! a single layer is enough.

pub use sheetfill_catalog as catalog;
pub use sheetfill_common as common;
pub use sheetfill_engine as engine;
pub use sheetfill_template as template;

pub use sheetfill_common::{DateDetection, Node, Scalar};
pub use sheetfill_engine::{
    Binding, NormalizedRecord, Normalizer, TermDirectory, ValueMap, flatten, resolve, scan,
    sheet_name,
};
pub use sheetfill_template::{GridRead, GridWrite, MemoryGrid};
