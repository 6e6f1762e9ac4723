use std::collections::BTreeMap;

use sheetfill_common::Scalar;

/// Read access to a workbook-like grid. Coordinates are 1-based.
pub trait GridRead: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error>;

    fn has_sheet(&self, name: &str) -> bool;

    /// Every non-empty cell of a sheet as display text, for placeholder
    /// scanning and menu layout.
    fn used_range(&self, sheet: &str) -> Result<BTreeMap<(u32, u32), String>, Self::Error>;
}

/// Write access to a workbook-like grid. Coordinates are 1-based.
pub trait GridWrite: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn create_sheet(&mut self, name: &str) -> Result<(), Self::Error>;

    /// Duplicate `source` (cells included) under the new name `target`.
    fn copy_sheet(&mut self, source: &str, target: &str) -> Result<(), Self::Error>;

    fn rename_sheet(&mut self, old: &str, new: &str) -> Result<(), Self::Error>;

    fn write_cell(
        &mut self,
        sheet: &str,
        row: u32,
        col: u32,
        value: Scalar,
    ) -> Result<(), Self::Error>;
}
