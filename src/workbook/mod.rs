/*!
 * Workbook model, styles, rewriting and `.xlsx` I/O.
 *
 * - `model`: Cells, sheets and the workbook itself
 * - `style`: Per-cell style records
 * - `rewriter`: Merges translated values into a copy of a source sheet
 * - `xlsx`: Reading and writing `.xlsx` packages
 */

pub use self::model::{
    CellRange, CellValue, Position, Sheet, SheetLayout, StyledCell, Workbook, column_letters, column_number,
};
pub use self::rewriter::rewrite;
pub use self::style::StyleRecord;
pub use self::xlsx::XlsxDocument;

pub mod model;
pub mod rewriter;
pub mod style;
pub mod xlsx;
