/*!
 * # celltrans - format-preserving spreadsheet translator
 *
 * A Rust library for translating the text cells of `.xlsx` workbooks into Korean
 * while keeping the workbook's appearance intact.
 *
 * ## Features
 *
 * - Translate every textual cell of every sheet, header first
 * - Leave numbers, formulas and text already in Korean untouched
 * - Reproduce column widths, row heights, cell styles and merged ranges
 * - Retry transient network failures with exponential backoff
 * - Cooperative cancellation with partial statistics
 * - Translation backends:
 *   - Google translate web endpoint
 *   - LibreTranslate
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `workbook`: Workbook model, style records, rewriter and `.xlsx` I/O
 * - `translation`: Classification, client adapter and orchestration:
 *   - `translation::classifier`: Per-cell translation decision
 *   - `translation::client`: Retrying provider adapter
 *   - `translation::sheet`: Sheet orchestration
 *   - `translation::document`: Workbook orchestration
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: Target language and script heuristic
 * - `providers`: Client implementations for the translation backends
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod translation;
pub mod workbook;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunReport, RunStatus};
pub use errors::{AppError, DocumentError, ProviderError, StyleError, TranslationError};
pub use language_utils::{TARGET_LANGUAGE, looks_like_target_script};
pub use translation::{CancellationToken, DocumentTranslator, RunOutcome, StatsSnapshot};
pub use workbook::{CellValue, Sheet, SheetLayout, Workbook, XlsxDocument};
