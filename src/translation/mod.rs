/*!
 * Cell translation pipeline.
 *
 * This module contains the translation side of the tool. It is split into
 * several submodules:
 *
 * - `classifier`: Decides per cell whether a value goes to the backend
 * - `client`: Retrying, rate-aware adapter around a provider
 * - `stats`: Shared run counters
 * - `progress`: Progress throttling and the cancellation token
 * - `sheet`: Header-then-columns orchestration of one sheet
 * - `document`: Sheet-by-sheet orchestration of a workbook
 */

// Re-export main types for easier usage
pub use self::classifier::{CellRole, Classification, TranslationJob, classify};
pub use self::client::{RetryPolicy, TranslationClient, TranslationResult};
pub use self::document::{DocumentTranslator, RunOutcome};
pub use self::progress::{
    CancellationToken, NoProgress, ProgressSink, ProgressSnapshot, ProgressThrottle, ProgressTracker,
};
pub use self::sheet::{SheetTranslation, SheetTranslator};
pub use self::stats::{RunStatistics, StatsSnapshot};

// Submodules
pub mod classifier;
pub mod client;
pub mod document;
pub mod progress;
pub mod sheet;
pub mod stats;
