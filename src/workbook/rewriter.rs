/*!
 * Format-preserving rewriter.
 *
 * Merges a translated `Sheet` into a copy of the source `SheetLayout`. The
 * rewriter never classifies or translates anything: given the same source layout
 * and the same translated values it always produces the same output.
 */

use log::warn;

use super::model::{CellRange, CellValue, Position, Sheet, SheetLayout, StyledCell};
use crate::errors::StyleError;

/// Row of the header inside the data range
const HEADER_ROW: u32 = 1;

/// Build the output sheet from the source layout and the translated values
pub fn rewrite(source: &SheetLayout, translated: &Sheet) -> SheetLayout {
    let mut output = SheetLayout::new(source.name.clone());

    output.column_widths = source.column_widths.clone();
    output.row_heights = source.row_heights.clone();

    let (source_rows, source_cols) = source.occupied_extent();
    let data_rows = if translated.header.is_empty() && translated.rows.is_empty() {
        0
    } else {
        translated.rows.len() as u32 + 1
    };
    let data_cols = translated
        .rows
        .iter()
        .map(|row| row.len())
        .chain(std::iter::once(translated.header.len()))
        .max()
        .unwrap_or(0) as u32;

    let max_row = source_rows.max(data_rows);
    let max_col = source_cols.max(data_cols);

    for row in 1..=max_row {
        for col in 1..=max_col {
            let position = Position::new(row, col);
            let source_cell = source.cells.get(&position);
            let value = translated_value(translated, position)
                .cloned()
                .unwrap_or_else(|| source.value_at(position).clone());

            if source_cell.is_none() && value.is_empty() {
                continue;
            }

            let mut cell = StyledCell::new(value);
            if let Some(style) = source_cell.and_then(|c| c.style.as_ref()) {
                match style.try_copy() {
                    Ok(copy) => cell.style = Some(copy),
                    Err(e) => warn!("Skipping style of {}!{}: {}", source.name, position, e),
                }
            }
            output.cells.insert(position, cell);
        }
    }

    output.merged_ranges = copy_merged_ranges(&source.name, &source.merged_ranges);
    output
}

/// Value the translated data holds for a position, `None` outside its bounds
fn translated_value(translated: &Sheet, position: Position) -> Option<&CellValue> {
    let col = position.col.checked_sub(1)? as usize;
    if position.row == HEADER_ROW {
        translated.header.get(col)
    } else {
        let row = position.row.checked_sub(HEADER_ROW + 1)? as usize;
        translated.rows.get(row)?.get(col)
    }
}

/// Re-apply merged ranges in order, dropping any that cannot coexist with earlier ones
fn copy_merged_ranges(sheet_name: &str, ranges: &[CellRange]) -> Vec<CellRange> {
    let mut applied: Vec<CellRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match check_merge(range, &applied) {
            Ok(()) => applied.push(*range),
            Err(e) => warn!("Skipping merged range {} on sheet '{}': {}", range, sheet_name, e),
        }
    }
    applied
}

fn check_merge(range: &CellRange, applied: &[CellRange]) -> Result<(), StyleError> {
    if range.end.row < range.start.row || range.end.col < range.start.col {
        return Err(StyleError::InvalidRange(range.to_string()));
    }
    if let Some(other) = applied.iter().find(|other| other.overlaps(range)) {
        return Err(StyleError::OverlappingMerge {
            range: range.to_string(),
            other: other.to_string(),
        });
    }
    Ok(())
}
