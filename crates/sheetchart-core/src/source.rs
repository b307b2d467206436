//! Data-source providers: the host side that streams range values into a chart model.

use crate::cell::{CellValue, ChartDataSource};
use crate::observable::Subject;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// Inclusive cell range, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRange {
    pub start_row: usize,
    pub start_column: usize,
    pub end_row: usize,
    pub end_column: usize,
}

impl CellRange {
    pub fn new(start_row: usize, start_column: usize, end_row: usize, end_column: usize) -> Self {
        Self {
            start_row: start_row.min(end_row),
            start_column: start_column.min(end_column),
            end_row: start_row.max(end_row),
            end_column: start_column.max(end_column),
        }
    }

    pub fn rows(&self) -> usize {
        self.end_row - self.start_row + 1
    }

    pub fn columns(&self) -> usize {
        self.end_column - self.start_column + 1
    }
}

/// What the chart model needs from the host: a stream of range values and a way to move the
/// range.
pub trait DataSourceProvider {
    /// Stream of the current range values. Replaying, so new subscribers see the latest grid.
    fn source(&self) -> Subject<ChartDataSource>;

    fn set_range(&self, range: CellRange);

    fn range(&self) -> Option<CellRange>;
}

/// In-memory provider over a sheet grid.
///
/// Re-emits the selected range whenever the range or the sheet content changes. Cells outside
/// the sheet read as empty.
#[derive(Debug)]
pub struct SheetDataSource {
    sheet: RefCell<ChartDataSource>,
    range: RefCell<Option<CellRange>>,
    subject: Subject<ChartDataSource>,
}

impl SheetDataSource {
    pub fn new(sheet: ChartDataSource) -> Self {
        Self {
            sheet: RefCell::new(sheet),
            range: RefCell::new(None),
            subject: Subject::replay(),
        }
    }

    /// Provider whose range always covers the whole grid.
    pub fn from_grid(grid: ChartDataSource) -> Self {
        let source = Self::new(grid);
        if let Some(range) = source.full_range() {
            source.set_range(range);
        }
        source
    }

    fn full_range(&self) -> Option<CellRange> {
        let sheet = self.sheet.borrow();
        let rows = sheet.len();
        let columns = sheet.iter().map(Vec::len).max().unwrap_or(0);
        (rows > 0 && columns > 0).then(|| CellRange::new(0, 0, rows - 1, columns - 1))
    }

    /// Replaces the sheet content (an edit) and re-emits the selected range.
    pub fn set_sheet(&self, sheet: ChartDataSource) {
        *self.sheet.borrow_mut() = sheet;
        self.emit();
    }

    /// Writes one cell, growing the sheet as needed.
    pub fn set_cell(&self, row: usize, column: usize, value: CellValue) {
        {
            let mut sheet = self.sheet.borrow_mut();
            if sheet.len() <= row {
                sheet.resize_with(row + 1, Vec::new);
            }
            let cells = &mut sheet[row];
            if cells.len() <= column {
                cells.resize(column + 1, CellValue::Empty);
            }
            cells[column] = value;
        }
        self.emit();
    }

    fn emit(&self) {
        let Some(range) = *self.range.borrow() else {
            return;
        };
        let values = self.read(range);
        self.subject.next(values);
    }

    fn read(&self, range: CellRange) -> ChartDataSource {
        let sheet = self.sheet.borrow();
        (range.start_row..=range.end_row)
            .map(|row| {
                (range.start_column..=range.end_column)
                    .map(|column| {
                        sheet
                            .get(row)
                            .and_then(|cells| cells.get(column))
                            .cloned()
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect()
    }
}

impl DataSourceProvider for SheetDataSource {
    fn source(&self) -> Subject<ChartDataSource> {
        self.subject.clone()
    }

    fn set_range(&self, range: CellRange) {
        *self.range.borrow_mut() = Some(range);
        self.emit();
    }

    fn range(&self) -> Option<CellRange> {
        *self.range.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::rows;

    #[test]
    fn range_reads_pad_outside_cells() {
        let provider = SheetDataSource::new(rows(vec![
            vec![CellValue::from("a"), CellValue::from(1)],
            vec![CellValue::from("b")],
        ]));
        provider.set_range(CellRange::new(0, 0, 1, 1));
        assert_eq!(
            provider.source().value().unwrap(),
            rows(vec![
                vec![CellValue::from("a"), CellValue::from(1)],
                vec![CellValue::from("b"), CellValue::Empty],
            ])
        );
    }

    #[test]
    fn edits_reemit_the_range() {
        let provider = SheetDataSource::from_grid(rows(vec![vec![CellValue::from(1)]]));
        provider.set_cell(0, 0, CellValue::from(7));
        assert_eq!(
            provider.source().value().unwrap(),
            vec![vec![CellValue::Number(7.0)]]
        );
    }
}
