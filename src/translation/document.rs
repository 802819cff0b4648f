/*!
 * Document-level orchestration.
 *
 * Sheets are processed in workbook order: each one is translated and then
 * rewritten over its source layout. Statistics are fresh for every run.
 */

use log::info;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::ProgressConfig;
use crate::errors::{AppError, TranslationError};
use crate::language_utils::target_language_name;
use crate::translation::progress::{CancellationToken, ProgressSink, ProgressThrottle, ProgressTracker};
use crate::translation::sheet::SheetTranslator;
use crate::translation::stats::{RunStatistics, StatsSnapshot};
use crate::workbook::{Sheet, Workbook, rewrite};

/// Result of a document run
#[derive(Debug)]
pub enum RunOutcome {
    /// Every sheet was processed
    Completed { workbook: Workbook, stats: StatsSnapshot },
    /// The run was stopped; statistics cover the work done before the stop
    Cancelled { stats: StatsSnapshot },
}

impl RunOutcome {
    pub fn stats(&self) -> &StatsSnapshot {
        match self {
            Self::Completed { stats, .. } | Self::Cancelled { stats } => stats,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Runs the sheet translator and the rewriter across a workbook
#[derive(Debug, Clone)]
pub struct DocumentTranslator {
    sheet_translator: SheetTranslator,
    progress_config: ProgressConfig,
}

impl DocumentTranslator {
    pub fn new(sheet_translator: SheetTranslator, progress_config: ProgressConfig) -> Self {
        Self {
            sheet_translator,
            progress_config,
        }
    }

    /// Cells the run will examine: the header plus body of every sheet
    pub fn count_cells(sheets: &[Sheet]) -> usize {
        sheets.iter().map(Sheet::cell_count).sum()
    }

    /// Translate every sheet of `workbook` and rewrite it over its source layout
    pub async fn translate_document(
        &self,
        workbook: &Workbook,
        cancel: &CancellationToken,
        progress: &dyn ProgressSink,
    ) -> Result<RunOutcome, AppError> {
        let run_start = Instant::now();
        let stats = Arc::new(RunStatistics::new());

        let data_sheets: Vec<Sheet> = workbook.sheets().iter().map(|layout| layout.data_sheet()).collect();
        let total = Self::count_cells(&data_sheets);

        info!(
            "Translating {} sheet(s), {} cells into {} via {}",
            workbook.len(),
            total,
            target_language_name(),
            self.sheet_translator.client().provider_name()
        );

        let throttle = ProgressThrottle::new(
            self.progress_config.every_cells,
            Duration::from_millis(self.progress_config.interval_ms),
        );
        let mut tracker = ProgressTracker::new(progress, throttle, total);
        let mut output = Vec::with_capacity(workbook.len());

        for (layout, data) in workbook.sheets().iter().zip(&data_sheets) {
            let sheet_start = Instant::now();
            info!(
                "Sheet '{}': {} rows x {} columns",
                data.name,
                data.rows.len(),
                data.width()
            );

            let translation = match self
                .sheet_translator
                .translate_sheet(data, cancel, &stats, &mut tracker)
                .await
            {
                Ok(translation) => translation,
                Err(TranslationError::Cancelled) => {
                    let snapshot = stats.snapshot();
                    info!(
                        "Run stopped in sheet '{}' after {:.1?} ({} cells examined)",
                        data.name,
                        run_start.elapsed(),
                        snapshot.total_cells
                    );
                    return Ok(RunOutcome::Cancelled { stats: snapshot });
                }
                Err(e) => return Err(e.into()),
            };

            output.push(rewrite(layout, &translation.sheet));
            info!("Sheet '{}' finished in {:.1?}", data.name, sheet_start.elapsed());
        }

        let workbook = Workbook::new(output)?;
        let snapshot = stats.snapshot();
        info!(
            "Run finished in {:.1?}: {} translated, {} skipped, {} errors",
            run_start.elapsed(),
            snapshot.translated_count,
            snapshot.skipped_count,
            snapshot.error_count
        );

        Ok(RunOutcome::Completed {
            workbook,
            stats: snapshot,
        })
    }
}
