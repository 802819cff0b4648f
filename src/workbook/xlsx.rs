/*!
 * `.xlsx` reading and writing.
 *
 * The source package is loaded once with umya-spreadsheet and converted into the
 * library-independent model. The rewritten model is then applied onto that same
 * in-memory package before saving, so drawings, charts, defined names and other
 * parts the pipeline does not model are carried over as they were read.
 */

use log::{debug, warn};
use std::path::{Path, PathBuf};
use umya_spreadsheet::{
    Cell, CellRawValue, HorizontalAlignmentValues, Spreadsheet, Style, VerticalAlignmentValues,
    Worksheet,
};

use super::model::{CellRange, CellValue, Position, SheetLayout, StyledCell, Workbook};
use super::style::{
    AlignmentStyle, BorderEdge, BorderStyle, FillStyle, FontStyle, HorizontalAlign,
    ProtectionStyle, StyleRecord, VerticalAlign,
};
use crate::errors::DocumentError;
use crate::file_utils::FileManager;

/// An opened `.xlsx` package
pub struct XlsxDocument {
    path: PathBuf,
    book: Spreadsheet,
}

impl XlsxDocument {
    /// Open a workbook, failing before any translation work when it is missing or unreadable
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        if !FileManager::file_exists(path) {
            return Err(DocumentError::NotFound(path.to_path_buf()));
        }
        if !FileManager::is_supported_workbook(path) {
            return Err(DocumentError::UnsupportedFormat(format!(
                "{:?} (only .xlsx workbooks are supported)",
                path
            )));
        }

        let book = umya_spreadsheet::reader::xlsx::read(path).map_err(|e| DocumentError::Unreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            book,
        })
    }

    /// Path the document was read from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Convert every sheet into the model, in workbook order
    pub fn workbook(&self) -> Result<Workbook, DocumentError> {
        let sheets = self
            .book
            .get_sheet_collection()
            .iter()
            .map(read_sheet)
            .collect();
        Workbook::new(sheets)
    }

    /// Apply rewritten sheets onto the in-memory package
    pub fn apply(&mut self, output: &Workbook) -> Result<(), DocumentError> {
        for layout in output.sheets() {
            let sheet = self
                .book
                .get_sheet_collection_mut()
                .iter_mut()
                .find(|sheet| sheet.get_name() == layout.name)
                .ok_or_else(|| DocumentError::SheetNotFound(layout.name.clone()))?;
            write_sheet(sheet, layout);
        }
        Ok(())
    }

    /// Save the package; the destination only appears once the write has completed
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let write_error = |message: String| DocumentError::Write {
            path: path.to_path_buf(),
            message,
        };

        let dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        FileManager::ensure_dir(dir).map_err(|e| write_error(e.to_string()))?;

        let temp = tempfile::Builder::new()
            .prefix(".celltrans-")
            .suffix(".xlsx")
            .tempfile_in(dir)
            .map_err(|e| write_error(e.to_string()))?;

        umya_spreadsheet::writer::xlsx::write(&self.book, temp.path())
            .map_err(|e| write_error(e.to_string()))?;

        temp.persist(path).map_err(|e| write_error(e.error.to_string()))?;
        debug!("Wrote workbook to {:?}", path);
        Ok(())
    }
}

fn read_sheet(sheet: &Worksheet) -> SheetLayout {
    let mut layout = SheetLayout::new(sheet.get_name());

    for cell in sheet.get_cell_collection() {
        let coordinate = cell.get_coordinate();
        let position = Position::new(coordinate.get_row_num().to_owned(), coordinate.get_col_num().to_owned());
        let styled = StyledCell {
            value: read_value(cell),
            style: read_style(cell.get_style()),
        };
        layout.cells.insert(position, styled);
    }

    for column in sheet.get_column_dimensions() {
        let width = column.get_width().to_owned();
        if width > 0.0 {
            layout.column_widths.insert(column.get_col_num().to_owned(), width);
        }
    }

    for row in sheet.get_row_dimensions() {
        let height = row.get_height().to_owned();
        if height > 0.0 {
            layout.row_heights.insert(row.get_row_num().to_owned(), height);
        }
    }

    for range in sheet.get_merge_cells() {
        let reference = range.get_range();
        match reference.parse::<CellRange>() {
            Ok(parsed) => layout.merged_ranges.push(parsed),
            Err(e) => warn!("Ignoring merged range '{}' on sheet '{}': {}", reference, layout.name, e),
        }
    }

    layout
}

fn read_value(cell: &Cell) -> CellValue {
    if cell.is_formula() {
        return CellValue::Formula(cell.get_formula().to_string());
    }
    match cell.get_raw_value() {
        CellRawValue::Numeric(number) => CellValue::Number(number.to_owned()),
        CellRawValue::Bool(flag) => CellValue::Bool(flag.to_owned()),
        // error cells are never sent for translation
        CellRawValue::Null | CellRawValue::Error => CellValue::Empty,
        _ => {
            let text = cell.get_value().to_string();
            if text.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(text)
            }
        }
    }
}

fn read_style(style: &Style) -> Option<StyleRecord> {
    let record = StyleRecord {
        font: style.get_font().map(|font| FontStyle {
            name: font.get_name().to_string(),
            size: font.get_size().to_owned(),
            bold: font.get_bold().to_owned(),
            italic: font.get_italic().to_owned(),
            underline: font.get_underline().to_string(),
            color: font.get_color().get_argb().to_string(),
            ..Default::default()
        }),
        border: style.get_borders().map(|borders| BorderStyle {
            left: read_edge(borders.get_left()),
            right: read_edge(borders.get_right()),
            top: read_edge(borders.get_top()),
            bottom: read_edge(borders.get_bottom()),
        }),
        fill: style.get_background_color().map(|color| FillStyle {
            background_color: color.get_argb().to_string(),
        }),
        number_format: style
            .get_number_format()
            .map(|format| format.get_format_code().to_string()),
        protection: style.get_protection().map(|protection| ProtectionStyle {
            locked: protection.get_locked().to_owned(),
            // the getter takes &mut self
            hidden: protection.clone().get_hidden().to_owned(),
        }),
        alignment: style.get_alignment().map(|alignment| AlignmentStyle {
            horizontal: horizontal_from(alignment.get_horizontal()),
            vertical: vertical_from(alignment.get_vertical()),
            wrap_text: alignment.get_wrap_text().to_owned(),
        }),
    };

    if record.is_plain() { None } else { Some(record) }
}

fn read_edge(border: &umya_spreadsheet::Border) -> BorderEdge {
    BorderEdge {
        style: border.get_border_style().to_string(),
        color: border.get_color().get_argb().to_string(),
    }
}

fn write_sheet(sheet: &mut Worksheet, layout: &SheetLayout) {
    for (col, width) in &layout.column_widths {
        sheet.get_column_dimension_by_number_mut(col).set_width(*width);
    }
    for (row, height) in &layout.row_heights {
        sheet.get_row_dimension_mut(row).set_height(*height);
    }

    for (position, styled) in &layout.cells {
        let cell = sheet.get_cell_mut((position.col, position.row));
        write_value(cell, &styled.value);
        if let Some(record) = &styled.style {
            let mut style = cell.get_style().clone();
            apply_style(&mut style, record);
            cell.set_style(style);
        }
    }

    let existing: Vec<String> = sheet
        .get_merge_cells()
        .iter()
        .map(|range| range.get_range().replace('$', "").to_uppercase())
        .collect();
    for range in &layout.merged_ranges {
        let reference = range.to_string();
        if !existing.contains(&reference) {
            sheet.add_merge_cells(reference);
        }
    }
}

/// Formula and empty cells are never rewritten; the package already holds them
fn write_value(cell: &mut Cell, value: &CellValue) {
    match value {
        CellValue::Text(text) => {
            cell.set_value_string(text.clone());
        }
        CellValue::Number(number) => {
            cell.set_value_number(*number);
        }
        CellValue::Bool(flag) => {
            cell.set_value_bool(*flag);
        }
        CellValue::Empty | CellValue::Formula(_) => {}
    }
}

fn apply_style(style: &mut Style, record: &StyleRecord) {
    if let Some(font) = &record.font {
        let target = style.get_font_mut();
        target.set_name(font.name.clone());
        target.set_size(font.size);
        target.set_bold(font.bold);
        target.set_italic(font.italic);
        if !font.underline.is_empty() {
            target.set_underline(font.underline.clone());
        }
        if !font.color.is_empty() {
            target.get_color_mut().set_argb(font.color.clone());
        }
    }

    if let Some(border) = &record.border {
        let borders = style.get_borders_mut();
        apply_edge(borders.get_left_mut(), &border.left);
        apply_edge(borders.get_right_mut(), &border.right);
        apply_edge(borders.get_top_mut(), &border.top);
        apply_edge(borders.get_bottom_mut(), &border.bottom);
    }

    if let Some(fill) = &record.fill {
        if !fill.background_color.is_empty() {
            style.set_background_color(fill.background_color.clone());
        }
    }

    if let Some(code) = &record.number_format {
        style.get_number_format_mut().set_format_code(code.clone());
    }

    if let Some(protection) = &record.protection {
        let target = style.get_protection_mut();
        target.set_locked(protection.locked);
        target.set_hidden(protection.hidden);
    }

    if let Some(alignment) = &record.alignment {
        let target = style.get_alignment_mut();
        target.set_horizontal(horizontal_to(alignment.horizontal));
        target.set_vertical(vertical_to(alignment.vertical));
        target.set_wrap_text(alignment.wrap_text);
    }
}

fn apply_edge(border: &mut umya_spreadsheet::Border, edge: &BorderEdge) {
    if !edge.style.is_empty() {
        border.set_border_style(edge.style.clone());
    }
    if !edge.color.is_empty() {
        border.get_color_mut().set_argb(edge.color.clone());
    }
}

fn horizontal_from(value: &HorizontalAlignmentValues) -> HorizontalAlign {
    match value {
        HorizontalAlignmentValues::Left => HorizontalAlign::Left,
        HorizontalAlignmentValues::Center => HorizontalAlign::Center,
        HorizontalAlignmentValues::Right => HorizontalAlign::Right,
        HorizontalAlignmentValues::Fill => HorizontalAlign::Fill,
        HorizontalAlignmentValues::Justify => HorizontalAlign::Justify,
        HorizontalAlignmentValues::CenterContinuous => HorizontalAlign::CenterContinuous,
        HorizontalAlignmentValues::Distributed => HorizontalAlign::Distributed,
        _ => HorizontalAlign::General,
    }
}

fn horizontal_to(value: HorizontalAlign) -> HorizontalAlignmentValues {
    match value {
        HorizontalAlign::General => HorizontalAlignmentValues::General,
        HorizontalAlign::Left => HorizontalAlignmentValues::Left,
        HorizontalAlign::Center => HorizontalAlignmentValues::Center,
        HorizontalAlign::Right => HorizontalAlignmentValues::Right,
        HorizontalAlign::Fill => HorizontalAlignmentValues::Fill,
        HorizontalAlign::Justify => HorizontalAlignmentValues::Justify,
        HorizontalAlign::CenterContinuous => HorizontalAlignmentValues::CenterContinuous,
        HorizontalAlign::Distributed => HorizontalAlignmentValues::Distributed,
    }
}

fn vertical_from(value: &VerticalAlignmentValues) -> VerticalAlign {
    match value {
        VerticalAlignmentValues::Top => VerticalAlign::Top,
        VerticalAlignmentValues::Center => VerticalAlign::Center,
        VerticalAlignmentValues::Justify => VerticalAlign::Justify,
        VerticalAlignmentValues::Distributed => VerticalAlign::Distributed,
        _ => VerticalAlign::Bottom,
    }
}

fn vertical_to(value: VerticalAlign) -> VerticalAlignmentValues {
    match value {
        VerticalAlign::Top => VerticalAlignmentValues::Top,
        VerticalAlign::Center => VerticalAlignmentValues::Center,
        VerticalAlign::Bottom => VerticalAlignmentValues::Bottom,
        VerticalAlign::Justify => VerticalAlignmentValues::Justify,
        VerticalAlign::Distributed => VerticalAlignmentValues::Distributed,
    }
}
