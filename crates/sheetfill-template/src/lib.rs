//! Template grid access.
//!
//! The pipeline needs very little from a workbook: enumerate sheets, read
//! the used range of the template sheet as text, copy that sheet once per
//! report, and write resolved cell values. [`GridRead`] and [`GridWrite`]
//! capture exactly that, and [`MemoryGrid`] implements both over a plain
//! JSON file so runs are reproducible without a spreadsheet application.

mod error;
mod json;
mod memory;
mod traits;

pub use error::GridError;
pub use memory::MemoryGrid;
pub use traits::{GridRead, GridWrite};
