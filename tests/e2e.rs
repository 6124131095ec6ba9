//! End-to-end integration tests for file2table.
//!
//! Everything runs in-memory against the public API: image fixtures are
//! synthesized with the `image` crate and OCR goes through mock engines, so
//! the suite needs no network, no OCR installation, and no test files on
//! disk (apart from tempdirs it creates itself).

use async_trait::async_trait;
use file2table::{
    extract, extract_path, CellValue, EngineError, ExtractError, ExtractionConfig,
    ExtractionProgressCallback, ExtractionResult, Extractor, MockOcrEngine, OcrEngine, OcrRequest,
    SourceFile,
};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// A PNG with a hard light/dark split: left half nearly white, right half
/// nearly black. Plenty of both classes for binarization checks.
fn split_png(width: u32, height: u32) -> Vec<u8> {
    use image::{DynamicImage, Rgba, RgbaImage};
    let img = RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([200, 210, 220, 255])
        } else {
            Rgba([40, 30, 50, 255])
        }
    });
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn config_with(engine: Arc<dyn OcrEngine>) -> ExtractionConfig {
    ExtractionConfig::builder().engine(engine).build().unwrap()
}

fn row_text(result: &ExtractionResult, index: usize) -> String {
    match result.rows[index].get("text") {
        Some(CellValue::Text(s)) => s,
        other => panic!("row {index} has no text cell: {other:?}"),
    }
}

// ── Dispatch ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn image_media_type_routes_to_image_branch() {
    // Garbage bytes with an image media type must fail with ImageDecode —
    // proof the call entered the image branch, not dispatch rejection.
    let file = SourceFile::new(b"garbage".to_vec(), "image/png");
    let config = config_with(Arc::new(MockOcrEngine::new("unused")));
    let err = extract(&file, &config).await.unwrap_err();
    assert!(matches!(err, ExtractError::ImageDecode { .. }), "got {err:?}");
}

#[tokio::test]
async fn spreadsheet_media_type_routes_to_workbook_branch() {
    let file = SourceFile::new(
        b"garbage".to_vec(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    );
    let err = extract(&file, &ExtractionConfig::default()).await.unwrap_err();
    assert!(
        matches!(err, ExtractError::SpreadsheetParse { .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn plain_text_is_unsupported() {
    let file = SourceFile::new(b"a,b\n1,2\n".to_vec(), "text/plain");
    let err = extract(&file, &ExtractionConfig::default()).await.unwrap_err();
    match err {
        ExtractError::UnsupportedFileType { media_type } => assert_eq!(media_type, "text/plain"),
        other => panic!("expected UnsupportedFileType, got {other:?}"),
    }
}

#[tokio::test]
async fn csv_is_unsupported_despite_being_tabular() {
    // text/csv contains none of the workbook markers; dispatch rejects it.
    let file = SourceFile::new(b"a,b\n1,2\n".to_vec(), "text/csv");
    let err = extract(&file, &ExtractionConfig::default()).await.unwrap_err();
    assert!(matches!(err, ExtractError::UnsupportedFileType { .. }));
}

// ── Image branch ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn image_branch_produces_the_fixed_line_schema() {
    let file = SourceFile::new(split_png(8, 8), "image/png");
    let config = config_with(Arc::new(MockOcrEngine::new("Total 12.50\nMerci\nشكرا")));

    let result = extract(&file, &config).await.unwrap();

    let headers: Vec<&str> = result.columns.iter().map(|c| c.header.as_str()).collect();
    assert_eq!(headers, vec!["Line Number", "Text"]);
    assert_eq!(result.rows.len(), 3);
    assert_eq!(row_text(&result, 0), "Total 12.50");
    assert_eq!(row_text(&result, 2), "شكرا");
    assert!(result.is_consistent());
}

#[tokio::test]
async fn ocr_text_round_trips_through_rows() {
    // Blank lines included: every line must survive verbatim.
    let text = "\nSTORE 14\n\nitem   4.99\n";
    let file = SourceFile::new(split_png(4, 4), "image/png");
    let config = config_with(Arc::new(MockOcrEngine::new(text)));

    let result = extract(&file, &config).await.unwrap();

    let joined = (0..result.rows.len())
        .map(|i| row_text(&result, i))
        .collect::<Vec<_>>()
        .join("\n");
    assert_eq!(joined, text);
}

/// Engine that decodes what the pipeline hands it and verifies the
/// binarization contract from the receiving side.
struct BinarizationCheckingEngine {
    verdict: Mutex<Option<bool>>,
}

#[async_trait]
impl OcrEngine for BinarizationCheckingEngine {
    async fn recognize(
        &self,
        image_png: &[u8],
        _request: &OcrRequest,
        _events: &dyn ExtractionProgressCallback,
    ) -> Result<String, EngineError> {
        let img = image::load_from_memory(image_png)
            .map_err(|e| EngineError::new(e.to_string()))?
            .to_rgba8();
        let pure = img
            .pixels()
            .all(|p| p.0[..3].iter().all(|&c| c == 0 || c == 255));
        *self.verdict.lock().unwrap() = Some(pure);
        Ok("checked".to_string())
    }
}

#[tokio::test]
async fn engine_receives_pure_black_and_white_pixels() {
    let engine = Arc::new(BinarizationCheckingEngine {
        verdict: Mutex::new(None),
    });
    let file = SourceFile::new(split_png(16, 16), "image/png");

    extract(&file, &config_with(engine.clone())).await.unwrap();

    assert_eq!(*engine.verdict.lock().unwrap(), Some(true));
}

#[tokio::test]
async fn engine_events_reach_the_observer() {
    struct Collector(Mutex<Vec<String>>);
    impl ExtractionProgressCallback for Collector {
        fn on_engine_event(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    let collector = Arc::new(Collector(Mutex::new(Vec::new())));
    let config = ExtractionConfig::builder()
        .engine(Arc::new(MockOcrEngine::new("x")))
        .progress_callback(collector.clone())
        .build()
        .unwrap();

    let file = SourceFile::new(split_png(4, 4), "image/png");
    extract(&file, &config).await.unwrap();

    let events = collector.0.lock().unwrap();
    assert!(
        events.iter().any(|e| e.contains("recognizing text")),
        "engine events were not forwarded: {events:?}"
    );
}

// ── OCR deadline ─────────────────────────────────────────────────────────────

struct NeverFinishesEngine;

#[async_trait]
impl OcrEngine for NeverFinishesEngine {
    async fn recognize(
        &self,
        _image_png: &[u8],
        _request: &OcrRequest,
        _events: &dyn ExtractionProgressCallback,
    ) -> Result<String, EngineError> {
        std::future::pending::<()>().await;
        unreachable!()
    }
}

#[tokio::test(start_paused = true)]
async fn hanging_engine_hits_the_deadline() {
    let config = ExtractionConfig::builder()
        .engine(Arc::new(NeverFinishesEngine))
        .ocr_timeout_secs(60)
        .build()
        .unwrap();

    let file = SourceFile::new(split_png(4, 4), "image/png");
    let err = extract(&file, &config).await.unwrap_err();
    assert!(matches!(err, ExtractError::OcrTimeout { .. }), "got {err:?}");
}

// ── Single-slot Extractor ────────────────────────────────────────────────────

/// Engine that blocks until released — lets tests hold an extraction open
/// deterministically.
struct GatedEngine {
    release: Arc<Notify>,
}

#[async_trait]
impl OcrEngine for GatedEngine {
    async fn recognize(
        &self,
        _image_png: &[u8],
        _request: &OcrRequest,
        _events: &dyn ExtractionProgressCallback,
    ) -> Result<String, EngineError> {
        self.release.notified().await;
        Ok("released".to_string())
    }
}

#[tokio::test]
async fn second_extraction_is_rejected_while_one_is_in_flight() {
    let release = Arc::new(Notify::new());
    let config = ExtractionConfig::builder()
        .engine(Arc::new(GatedEngine {
            release: release.clone(),
        }))
        .no_ocr_timeout()
        .build()
        .unwrap();

    let extractor = Arc::new(Extractor::new(config));
    let file = SourceFile::new(split_png(4, 4), "image/png");

    let first = {
        let extractor = extractor.clone();
        let file = file.clone();
        tokio::spawn(async move { extractor.try_extract(&file).await })
    };

    // Wait until the first call actually owns the slot.
    for _ in 0..100 {
        if extractor.is_busy() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    assert!(extractor.is_busy(), "first extraction never took the slot");

    // Reject policy: the overlapping call fails fast, the running one is
    // untouched.
    let err = extractor.try_extract(&file).await.unwrap_err();
    assert!(matches!(err, ExtractError::ExtractionInFlight));

    release.notify_one();
    let result = first.await.unwrap().unwrap();
    assert_eq!(row_text(&result, 0), "released");

    // Slot is free again afterwards.
    assert!(!extractor.is_busy());
}

// ── Workbook branch ──────────────────────────────────────────────────────────

// The column-inference and multi-sheet rules are pinned at the Range level
// in src/pipeline/workbook.rs; here we only cover what needs the public
// entry points.

#[tokio::test]
async fn workbook_parse_failure_is_all_or_nothing() {
    let file = SourceFile::new(vec![0x50, 0x4b, 0x00, 0x00], "application/vnd.ms-excel");
    let config = ExtractionConfig::default();

    // Fails, and the identical re-invocation fails identically — no state.
    for _ in 0..2 {
        let err = extract(&file, &config).await.unwrap_err();
        assert!(matches!(err, ExtractError::SpreadsheetParse { .. }));
    }
}

// ── Path-based entry point ───────────────────────────────────────────────────

#[tokio::test]
async fn extract_path_infers_media_type_from_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.png");
    std::fs::write(&path, split_png(4, 4)).unwrap();

    let config = config_with(Arc::new(MockOcrEngine::new("from disk")));
    let result = extract_path(&path, &config).await.unwrap();
    assert_eq!(row_text(&result, 0), "from disk");
}

#[tokio::test]
async fn extract_path_rejects_unknown_extensions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, b"hello").unwrap();

    let err = extract_path(&path, &ExtractionConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::UnsupportedFileType { .. }));
}

#[tokio::test]
async fn extract_path_reports_missing_files() {
    let err = extract_path("/definitely/not/a/real/scan.png", &ExtractionConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::FileNotFound { .. }));
}

// ── Result serialization ─────────────────────────────────────────────────────

#[tokio::test]
async fn result_serializes_for_downstream_consumers() {
    let file = SourceFile::new(split_png(4, 4), "image/png");
    let config = config_with(Arc::new(MockOcrEngine::new("only line")));

    let result = extract(&file, &config).await.unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["columns"][0]["header"], "Line Number");
    assert_eq!(json["columns"][0]["accessor"], "id");
    assert_eq!(json["rows"][0]["id"], 0);
    assert_eq!(json["rows"][0]["text"], "only line");
}
