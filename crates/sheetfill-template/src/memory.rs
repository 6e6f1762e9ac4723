use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use sheetfill_common::Scalar;

use crate::error::GridError;
use crate::json::{self, JsonCell, JsonGrid, JsonSheet};
use crate::traits::{GridRead, GridWrite};

type Cells = BTreeMap<(u32, u32), Scalar>;

/// In-memory grid backed by the JSON file form.
#[derive(Debug, Default, Clone)]
pub struct MemoryGrid {
    sheets: BTreeMap<String, Cells>,
}

impl MemoryGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, GridError> {
        let data = fs::read(path)?;
        Self::from_json_slice(&data)
    }

    pub fn from_json_slice(data: &[u8]) -> Result<Self, GridError> {
        let grid: JsonGrid = serde_json::from_slice(data)?;
        let mut sheets = BTreeMap::new();
        for (name, sheet) in grid.sheets {
            let mut cells = Cells::new();
            for cell in sheet.cells {
                let value = cell
                    .value
                    .as_ref()
                    .map(json::json_to_scalar)
                    .unwrap_or(Scalar::Empty);
                cells.insert((cell.row, cell.col), value);
            }
            sheets.insert(name, cells);
        }
        Ok(Self { sheets })
    }

    pub fn save_path<P: AsRef<Path>>(&self, path: P) -> Result<(), GridError> {
        let data = serde_json::to_vec_pretty(&self.to_json())?;
        fs::write(path, data)?;
        Ok(())
    }

    fn to_json(&self) -> JsonGrid {
        let mut sheets = BTreeMap::new();
        for (name, cells) in &self.sheets {
            let cells = cells
                .iter()
                .map(|((row, col), value)| JsonCell {
                    row: *row,
                    col: *col,
                    value: Some(json::scalar_to_json(value)),
                })
                .collect();
            sheets.insert(name.clone(), JsonSheet { cells });
        }
        JsonGrid { version: 1, sheets }
    }

    fn sheet(&self, name: &str) -> Result<&Cells, GridError> {
        self.sheets.get(name).ok_or_else(|| GridError::MissingSheet {
            name: name.to_owned(),
        })
    }

    fn sheet_mut(&mut self, name: &str) -> Result<&mut Cells, GridError> {
        self.sheets.get_mut(name).ok_or_else(|| GridError::MissingSheet {
            name: name.to_owned(),
        })
    }
}

impl GridRead for MemoryGrid {
    type Error = GridError;

    fn sheet_names(&self) -> Result<Vec<String>, GridError> {
        Ok(self.sheets.keys().cloned().collect())
    }

    fn has_sheet(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    fn used_range(&self, sheet: &str) -> Result<BTreeMap<(u32, u32), String>, GridError> {
        let cells = self.sheet(sheet)?;
        Ok(cells
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(at, value)| (*at, value.to_string()))
            .collect())
    }
}

impl GridWrite for MemoryGrid {
    type Error = GridError;

    fn create_sheet(&mut self, name: &str) -> Result<(), GridError> {
        if self.sheets.contains_key(name) {
            return Err(GridError::DuplicateSheet {
                name: name.to_owned(),
            });
        }
        self.sheets.insert(name.to_owned(), Cells::new());
        Ok(())
    }

    fn copy_sheet(&mut self, source: &str, target: &str) -> Result<(), GridError> {
        if self.sheets.contains_key(target) {
            return Err(GridError::DuplicateSheet {
                name: target.to_owned(),
            });
        }
        let cells = self.sheet(source)?.clone();
        self.sheets.insert(target.to_owned(), cells);
        Ok(())
    }

    fn rename_sheet(&mut self, old: &str, new: &str) -> Result<(), GridError> {
        if self.sheets.contains_key(new) {
            return Err(GridError::DuplicateSheet {
                name: new.to_owned(),
            });
        }
        match self.sheets.remove(old) {
            Some(cells) => {
                self.sheets.insert(new.to_owned(), cells);
                Ok(())
            }
            None => Err(GridError::MissingSheet {
                name: old.to_owned(),
            }),
        }
    }

    fn write_cell(
        &mut self,
        sheet: &str,
        row: u32,
        col: u32,
        value: Scalar,
    ) -> Result<(), GridError> {
        self.sheet_mut(sheet)?.insert((row, col), value);
        Ok(())
    }
}
