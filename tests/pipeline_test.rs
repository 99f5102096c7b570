//! Download and reconcile against a local HTTP fixture server

mod common;

use common::{
    WORKLIST_NAME, config_in, context_in, pdf_with_pages, read_sheet, refused_url, serve_truncated,
    write_worklist,
};
use httpmock::prelude::*;
use reportfetch::context::ExecutionContext;
use reportfetch::pipeline::{self, PipelineError};
use reportfetch::status::{DocumentStatus, StatusCounts};
use reportfetch::worker::DownloadSummary;
use reportfetch::worklist::WorklistError;
use std::fs;
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    ctx: ExecutionContext,
}

async fn serve<'a>(server: &'a MockServer, path: &str, body: Vec<u8>) -> httpmock::Mock<'a> {
    let path = path.to_string();
    server
        .mock_async(move |when, then| {
            when.method(GET).path(path);
            then.status(200)
                .header("content-type", "application/pdf")
                .body(body);
        })
        .await
}

fn fixture(rows: &[(&str, &str, &str)]) -> Fixture {
    let dir = TempDir::new().unwrap();
    write_worklist(&dir.path().join(WORKLIST_NAME), rows);
    let ctx = context_in(dir.path());
    Fixture { _dir: dir, ctx }
}

#[tokio::test]
async fn test_download_and_reconcile_scenarios() {
    let server = MockServer::start_async().await;
    let good_a = serve(&server, "/a.pdf", pdf_with_pages(1)).await;
    let good_b = serve(&server, "/b.pdf", pdf_with_pages(2)).await;
    let empty_pages = serve(&server, "/c.pdf", pdf_with_pages(0)).await;
    let gone = server
        .mock_async(|when, then| {
            when.method(GET).path("/gone.pdf");
            then.status(404);
        })
        .await;

    let refused = refused_url();
    let (url_a, url_b, url_c, url_gone) = (
        server.url("/a.pdf"),
        server.url("/b.pdf"),
        server.url("/c.pdf"),
        server.url("/gone.pdf"),
    );
    let f = fixture(&[
        ("BR001", &url_a, ""),
        ("BR002", &refused, &url_b),
        ("BR003", "", &url_c),
        ("BR004", "missing", "missing"),
        ("BR999", &url_gone, ""),
    ]);

    let summary = pipeline::download_worklist(&f.ctx).await.unwrap();
    assert_eq!(
        summary,
        DownloadSummary {
            downloaded: 3,
            already_present: 0,
            no_source: 1,
            failed: 1,
            skipped: 0,
        }
    );

    let output_dir = &f.ctx.paths.output_dir;
    assert_eq!(fs::read(output_dir.join("BR001.pdf")).unwrap(), pdf_with_pages(1));
    assert_eq!(fs::read(output_dir.join("BR002.pdf")).unwrap(), pdf_with_pages(2));
    assert!(!output_dir.join("BR004.pdf").exists());
    assert!(!output_dir.join("BR999.pdf").exists());

    let report = pipeline::reconcile_worklist(&f.ctx).unwrap();
    assert_eq!(
        report.counts,
        StatusCounts {
            downloaded: 2,
            corrupted: 1,
            not_found: 2,
        }
    );
    assert_eq!(report.rows, 5);
    assert_eq!(report.documents, 3);

    let rows = read_sheet(&report.annotated_worklist);
    assert_eq!(rows[0][3], "File Name");
    assert_eq!(rows[0][4], "Pdf Download Status");
    assert_eq!(rows[1][3..], ["BR001.pdf", "Downloaded"]);
    assert_eq!(rows[2][3..], ["BR002.pdf", "Downloaded"]);
    assert_eq!(rows[3][3..], ["BR003.pdf", DocumentStatus::Corrupted.as_str()]);
    assert_eq!(rows[4][3..], ["", "Not Found"]);
    assert_eq!(rows[5][3..], ["", "Not Found"]);

    good_a.assert_calls_async(1).await;
    good_b.assert_calls_async(1).await;
    empty_pages.assert_calls_async(1).await;
    gone.assert_calls_async(1).await;
}

#[tokio::test]
async fn test_rerun_does_not_refetch_present_documents() {
    let server = MockServer::start_async().await;
    let good = serve(&server, "/a.pdf", pdf_with_pages(1)).await;
    let url = server.url("/a.pdf");
    let f = fixture(&[("BR001", &url, "")]);

    pipeline::download_worklist(&f.ctx).await.unwrap();
    let second = pipeline::download_worklist(&f.ctx).await.unwrap();

    assert_eq!(second.already_present, 1);
    assert_eq!(second.downloaded, 0);
    good.assert_calls_async(1).await;
    assert_eq!(f.ctx.metrics.snapshot().downloaded, 1);
}

#[tokio::test]
async fn test_short_transfer_leaves_no_file() {
    let server = MockServer::start_async().await;
    let body = pdf_with_pages(1);
    let _full = serve(&server, "/full.pdf", body.clone()).await;

    let truncated_url = serve_truncated(100_000, b"%PDF-1.5 cut short").await;
    let full_url = server.url("/full.pdf");
    let f = fixture(&[
        ("BR010", &truncated_url, ""),
        ("BR011", &truncated_url, &full_url),
    ]);

    let summary = pipeline::download_worklist(&f.ctx).await.unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.downloaded, 1);
    assert!(!f.ctx.paths.output_dir.join("BR010.pdf").exists());
    assert_eq!(fs::read(f.ctx.paths.output_dir.join("BR011.pdf")).unwrap(), body);
}

#[tokio::test]
async fn test_run_reports_both_stages() {
    let server = MockServer::start_async().await;
    let _good = serve(&server, "/a.pdf", pdf_with_pages(1)).await;
    let url = server.url("/a.pdf");
    let f = fixture(&[("BR001", &url, ""), ("BR999", "", "")]);

    let report = pipeline::run(&f.ctx).await.unwrap();

    assert_eq!(report.download.downloaded, 1);
    assert_eq!(report.download.no_source, 1);
    assert_eq!(
        report.reconcile.counts.to_string(),
        "1 Downloaded, 0 Corrupted, 1 Not Found"
    );

    assert_eq!(report.metrics.downloaded, 1);
    assert_eq!(report.metrics.no_source, 1);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["reconcile"]["counts"]["not_found"], 1);
    assert_eq!(json["metrics"]["downloaded"], 1);
}

#[tokio::test]
async fn test_unwritable_output_dir_stops_the_run() {
    let server = MockServer::start_async().await;
    let good = serve(&server, "/a.pdf", pdf_with_pages(1)).await;
    let url = server.url("/a.pdf");
    let f = fixture(&[("BR001", &url, &url), ("BR002", &url, "")]);
    fs::remove_dir_all(&f.ctx.paths.output_dir).unwrap();

    let result = pipeline::download_worklist(&f.ctx).await;

    match result {
        Err(PipelineError::Destination(err)) => {
            assert_eq!(err.identifier, "BR001");
            assert_eq!(err.path, f.ctx.paths.output_dir.join("BR001.pdf"));
        }
        other => panic!("expected destination error, got {:?}", other),
    }
    // neither the fallback nor the next row is attempted
    good.assert_calls_async(1).await;
}

#[tokio::test]
async fn test_reconcile_counts_files_placed_by_hand() {
    let f = fixture(&[("BR001", "", ""), ("BR002", "", ""), ("BR003", "", "")]);
    let output_dir = &f.ctx.paths.output_dir;
    fs::write(output_dir.join("BR001.pdf"), pdf_with_pages(3)).unwrap();
    fs::write(output_dir.join("BR002.pdf"), b"<html>error page</html>").unwrap();
    // not in the worklist; classified but not counted
    fs::write(output_dir.join("BR500.pdf"), pdf_with_pages(1)).unwrap();

    let report = pipeline::reconcile_worklist(&f.ctx).unwrap();

    assert_eq!(report.documents, 3);
    assert_eq!(
        report.counts,
        StatusCounts {
            downloaded: 1,
            corrupted: 1,
            not_found: 1,
        }
    );
}

#[tokio::test]
async fn test_missing_columns_is_fatal() {
    let dir = TempDir::new().unwrap();
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "BRnum").unwrap();
    workbook.save(dir.path().join(WORKLIST_NAME)).unwrap();
    let ctx = ExecutionContext::from_config(config_in(dir.path())).unwrap();

    let result = pipeline::download_worklist(&ctx).await;

    match result {
        Err(PipelineError::Worklist(WorklistError::MissingColumns(columns))) => {
            assert_eq!(columns, vec!["Pdf_URL", "Report Html Address"]);
        }
        other => panic!("expected missing columns, got {:?}", other.map(|_| ())),
    }
}
