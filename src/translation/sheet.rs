/*!
 * Sheet-level orchestration.
 *
 * The header row is translated first, then the body column by column. The input
 * sheet is never modified; results are written into a fresh sheet of the same
 * shape.
 */

use log::debug;

use crate::errors::TranslationError;
use crate::translation::classifier::{CellRole, Classification, TranslationJob, classify};
use crate::translation::client::TranslationClient;
use crate::translation::progress::{CancellationToken, ProgressTracker};
use crate::translation::stats::RunStatistics;
use crate::workbook::{CellValue, Sheet, column_letters};

/// Translated sheet plus the old to new header labels, in column order
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTranslation {
    pub sheet: Sheet,
    pub header_mapping: Vec<(String, String)>,
}

/// Per-column outcome counts for the column summary log line
#[derive(Debug, Default)]
struct ColumnSummary {
    translated: usize,
    skipped: usize,
    failed: usize,
}

/// Drives classification and translation over one sheet
#[derive(Debug, Clone)]
pub struct SheetTranslator {
    client: TranslationClient,
    target_language: String,
}

/// What happened to a single cell
enum CellOutcome {
    Skipped,
    Translated,
    Failed,
}

impl SheetTranslator {
    pub fn new(client: TranslationClient, target_language: impl Into<String>) -> Self {
        Self {
            client,
            target_language: target_language.into(),
        }
    }

    pub fn client(&self) -> &TranslationClient {
        &self.client
    }

    /// Translate the header and body of `sheet`.
    ///
    /// The cancellation token is checked before every header cell, at the start of
    /// every column and before every body cell.
    pub async fn translate_sheet(
        &self,
        sheet: &Sheet,
        cancel: &CancellationToken,
        stats: &RunStatistics,
        progress: &mut ProgressTracker<'_>,
    ) -> Result<SheetTranslation, TranslationError> {
        let mut output = sheet.empty_like();
        let mut header_mapping = Vec::with_capacity(sheet.header.len());

        for (col, value) in sheet.header.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(TranslationError::Cancelled);
            }
            let (translated, _) = self.process_cell(value, CellRole::Header, stats).await;
            if !value.is_empty() {
                header_mapping.push((value.to_string(), translated.to_string()));
            }
            output.header[col] = translated;
            progress.advance(|| format!("Sheet '{}': header", sheet.name));
        }

        let width = sheet.rows.iter().map(Vec::len).max().unwrap_or(0).max(sheet.header.len());
        for col in 0..width {
            if cancel.is_cancelled() {
                return Err(TranslationError::Cancelled);
            }
            let label = column_label(&output, col);
            debug!("Sheet '{}': translating column '{}' ({}/{})", sheet.name, label, col + 1, width);

            let mut summary = ColumnSummary::default();
            for (row_index, row) in sheet.rows.iter().enumerate() {
                if cancel.is_cancelled() {
                    return Err(TranslationError::Cancelled);
                }
                let Some(value) = row.get(col) else {
                    continue;
                };
                let (translated, outcome) = self.process_cell(value, CellRole::Body, stats).await;
                match outcome {
                    CellOutcome::Skipped => summary.skipped += 1,
                    CellOutcome::Translated => summary.translated += 1,
                    CellOutcome::Failed => summary.failed += 1,
                }
                output.rows[row_index][col] = translated;
                progress.advance(|| format!("Sheet '{}': column '{}' ({}/{})", sheet.name, label, col + 1, width));
            }

            debug!(
                "Sheet '{}': column '{}' done ({} translated, {} skipped, {} failed)",
                sheet.name, label, summary.translated, summary.skipped, summary.failed
            );
        }

        progress.flush(format!("Sheet '{}' done", sheet.name));

        Ok(SheetTranslation {
            sheet: output,
            header_mapping,
        })
    }

    /// Classify one cell and translate it when needed
    async fn process_cell(&self, value: &CellValue, role: CellRole, stats: &RunStatistics) -> (CellValue, CellOutcome) {
        stats.record_examined();
        match classify(value, role) {
            Classification::Translate(text) => {
                let job = TranslationJob::new(text, role);
                let result = self.client.translate(&job.text, &self.target_language, stats).await;
                let outcome = if result.is_translated() {
                    CellOutcome::Translated
                } else {
                    CellOutcome::Failed
                };
                (CellValue::Text(result.into_text()), outcome)
            }
            Classification::SkipTargetScript(text) => {
                stats.record_skipped();
                (CellValue::Text(text), CellOutcome::Skipped)
            }
            Classification::SkipEmpty | Classification::SkipNumeric | Classification::SkipFormula => {
                stats.record_skipped();
                (value.clone(), CellOutcome::Skipped)
            }
        }
    }
}

/// Translated header label of a column, or its letter when the header is blank
fn column_label(sheet: &Sheet, col: usize) -> String {
    match sheet.header.get(col) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => column_letters(col as u32 + 1),
    }
}
