/*!
 * Tests for sheet-level orchestration
 */

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use celltrans::errors::{ProviderError, TranslationError};
use celltrans::providers::mock::MockProvider;
use celltrans::translation::{
    CancellationToken, NoProgress, ProgressSnapshot, ProgressThrottle, ProgressTracker, RunStatistics,
    SheetTranslator,
};
use celltrans::workbook::{CellValue, Sheet};
use celltrans::TARGET_LANGUAGE;
use crate::common;

fn translator(provider: Arc<MockProvider>) -> SheetTranslator {
    SheetTranslator::new(common::test_client(provider), TARGET_LANGUAGE)
}

fn items_sheet() -> Sheet {
    Sheet::new(
        "Items",
        vec![CellValue::text("Name"), CellValue::text("Amount")],
        vec![vec![CellValue::text("apple"), CellValue::Number(5.0)]],
    )
}

/// Header labels and body text are translated; numbers are copied and counted as skipped
#[tokio::test(start_paused = true)]
async fn test_translate_sheet_withHeaderAndNumericCell_shouldTranslateTextOnly() {
    common::init_logger();
    let provider = Arc::new(MockProvider::working());
    let stats = RunStatistics::new();
    let sheet = items_sheet();
    let mut tracker = ProgressTracker::new(&NoProgress, ProgressThrottle::default(), sheet.cell_count());

    let translation = translator(provider.clone())
        .translate_sheet(&sheet, &CancellationToken::new(), &stats, &mut tracker)
        .await
        .unwrap();

    assert_eq!(
        translation.sheet.header,
        vec![CellValue::text("번역 Name"), CellValue::text("번역 Amount")]
    );
    assert_eq!(
        translation.sheet.rows[0],
        vec![CellValue::text("번역 apple"), CellValue::Number(5.0)]
    );
    assert_eq!(
        translation.header_mapping,
        vec![
            ("Name".to_string(), "번역 Name".to_string()),
            ("Amount".to_string(), "번역 Amount".to_string())
        ]
    );

    let snapshot = stats.snapshot();
    assert_eq!(snapshot.skipped_count, 1);
    assert_eq!(snapshot.translated_count, 3);
    assert_eq!(snapshot.total_cells, 4);
    assert!(snapshot.is_balanced());

    // input untouched
    assert_eq!(sheet, items_sheet());
}

/// Text already in the target script is passed through without a backend call
#[tokio::test(start_paused = true)]
async fn test_translate_sheet_withTargetScriptText_shouldSkipWithoutCall() {
    let provider = Arc::new(MockProvider::working());
    let stats = RunStatistics::new();
    let sheet = Sheet::new(
        "Fruit",
        vec![CellValue::text("이름")],
        vec![vec![CellValue::text(" 사과 ")], vec![CellValue::Empty]],
    );
    let mut tracker = ProgressTracker::new(&NoProgress, ProgressThrottle::default(), sheet.cell_count());

    let translation = translator(provider.clone())
        .translate_sheet(&sheet, &CancellationToken::new(), &stats, &mut tracker)
        .await
        .unwrap();

    assert_eq!(provider.request_count(), 0);
    assert_eq!(translation.sheet.header[0], CellValue::text("이름"));
    assert_eq!(translation.sheet.rows[0][0], CellValue::text("사과"));
    assert_eq!(translation.sheet.rows[1][0], CellValue::Empty);
    assert_eq!(stats.skipped_count(), 3);
    assert_eq!(stats.translated_count(), 0);
}

/// A cell whose translation keeps timing out keeps its trimmed text and the run continues
#[tokio::test(start_paused = true)]
async fn test_translate_sheet_withTimeoutOnOneCell_shouldPassThroughAndContinue() {
    let provider = Arc::new(MockProvider::failing_for(
        "pear",
        ProviderError::Timeout("read timed out".to_string()),
    ));
    let stats = RunStatistics::new();
    let sheet = Sheet::new(
        "Items",
        vec![CellValue::text("Name")],
        vec![vec![CellValue::text("  pear ")], vec![CellValue::text("plum")]],
    );
    let mut tracker = ProgressTracker::new(&NoProgress, ProgressThrottle::default(), sheet.cell_count());

    let translation = translator(provider.clone())
        .translate_sheet(&sheet, &CancellationToken::new(), &stats, &mut tracker)
        .await
        .unwrap();

    assert_eq!(translation.sheet.rows[0][0], CellValue::text("pear"));
    assert_eq!(translation.sheet.rows[1][0], CellValue::text("번역 plum"));
    assert_eq!(
        provider.requested_texts().iter().filter(|text| *text == "pear").count(),
        3
    );
    let snapshot = stats.snapshot();
    assert_eq!(snapshot.error_count, 1);
    assert_eq!(snapshot.translated_count, 2);
    assert!(snapshot.is_balanced());
}

/// The header goes first, then the body column by column
#[tokio::test(start_paused = true)]
async fn test_translate_sheet_withSeveralColumns_shouldVisitHeaderThenColumns() {
    let provider = Arc::new(MockProvider::working());
    let stats = RunStatistics::new();
    let sheet = Sheet::new(
        "Grid",
        vec![CellValue::text("H1"), CellValue::text("H2")],
        vec![
            vec![CellValue::text("a1"), CellValue::text("b1")],
            vec![CellValue::text("a2"), CellValue::text("b2")],
        ],
    );
    let mut tracker = ProgressTracker::new(&NoProgress, ProgressThrottle::default(), sheet.cell_count());

    translator(provider.clone())
        .translate_sheet(&sheet, &CancellationToken::new(), &stats, &mut tracker)
        .await
        .unwrap();

    assert_eq!(provider.requested_texts(), vec!["H1", "H2", "a1", "a2", "b1", "b2"]);
}

/// Header numbers are sent as text while body numbers are left alone
#[tokio::test(start_paused = true)]
async fn test_translate_sheet_withNumericHeader_shouldCoerceHeaderOnly() {
    let provider = Arc::new(MockProvider::working());
    let stats = RunStatistics::new();
    let sheet = Sheet::new("Years", vec![CellValue::Number(2024.0)], vec![vec![CellValue::Number(1.5)]]);
    let mut tracker = ProgressTracker::new(&NoProgress, ProgressThrottle::default(), sheet.cell_count());

    let translation = translator(provider.clone())
        .translate_sheet(&sheet, &CancellationToken::new(), &stats, &mut tracker)
        .await
        .unwrap();

    assert_eq!(provider.requested_texts(), vec!["2024"]);
    assert_eq!(translation.sheet.header[0], CellValue::text("번역 2024"));
    assert_eq!(translation.sheet.rows[0][0], CellValue::Number(1.5));
}

/// A token cancelled up front stops the sheet before any cell is examined
#[tokio::test(start_paused = true)]
async fn test_translate_sheet_withCancelledToken_shouldReturnCancelled() {
    let provider = Arc::new(MockProvider::working());
    let stats = RunStatistics::new();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let sheet = items_sheet();
    let mut tracker = ProgressTracker::new(&NoProgress, ProgressThrottle::default(), sheet.cell_count());

    let result = translator(provider.clone())
        .translate_sheet(&sheet, &cancel, &stats, &mut tracker)
        .await;

    assert!(matches!(result, Err(TranslationError::Cancelled)));
    assert_eq!(provider.request_count(), 0);
    assert_eq!(stats.total_cells(), 0);
}

/// Progress is throttled by count and always flushed at the end of the sheet
#[tokio::test(start_paused = true)]
async fn test_translate_sheet_withProgressSink_shouldEmitThrottledAndFinalSnapshots() {
    let provider = Arc::new(MockProvider::working());
    let stats = RunStatistics::new();
    let header: Vec<CellValue> = (0..3).map(|i| CellValue::text(format!("Column {}", i))).collect();
    let rows: Vec<Vec<CellValue>> = (0..4)
        .map(|r| (0..3).map(|c| CellValue::Number((r * 3 + c) as f64)).collect())
        .collect();
    let sheet = Sheet::new("Numbers", header, rows);

    let received = Mutex::new(Vec::new());
    let sink = |snapshot: ProgressSnapshot| received.lock().push(snapshot);
    let throttle = ProgressThrottle::new(10, Duration::from_secs(3600));
    let mut tracker = ProgressTracker::new(&sink, throttle, sheet.cell_count());

    translator(provider)
        .translate_sheet(&sheet, &CancellationToken::new(), &stats, &mut tracker)
        .await
        .unwrap();

    let received = received.lock();
    let counts: Vec<usize> = received.iter().map(|snapshot| snapshot.processed).collect();
    assert_eq!(counts, vec![10, 15]);
    assert!(received.iter().all(|snapshot| snapshot.total == 15));
    assert_eq!(received.last().and_then(|s| s.detail.clone()), Some("Sheet 'Numbers' done".to_string()));
}
