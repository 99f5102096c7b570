//! Shared fixtures for integration tests

#![allow(dead_code)]

use calamine::{Reader, Xlsx};
use lopdf::{Document, Object, dictionary};
use reportfetch::config::Config;
use reportfetch::context::ExecutionContext;
use rust_xlsxwriter::Workbook;
use std::net::TcpListener;
use std::path::Path;

pub const WORKLIST_NAME: &str = "GRI_2017_2020.xlsx";

/// A well-formed PDF with `pages` empty pages
pub fn pdf_with_pages(pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = (0..pages)
        .map(|_| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Write a worklist with the default headers; empty strings become blank cells
pub fn write_worklist(path: &Path, rows: &[(&str, &str, &str)]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "BRnum").unwrap();
    worksheet.write_string(0, 1, "Pdf_URL").unwrap();
    worksheet.write_string(0, 2, "Report Html Address").unwrap();

    for (idx, (id, primary, fallback)) in rows.iter().enumerate() {
        let row = idx as u32 + 1;
        for (col, value) in [id, primary, fallback].into_iter().enumerate() {
            if !value.is_empty() {
                worksheet.write_string(row, col as u16, *value).unwrap();
            }
        }
    }
    workbook.save(path).unwrap();
}

/// Every cell of the first sheet rendered as text
pub fn read_sheet(path: &Path) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> = calamine::open_workbook(path).unwrap();
    let range = workbook.worksheet_range_at(0).unwrap().unwrap();
    range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

/// Config pointing at `dir/GRI_2017_2020.xlsx` and `dir/pdf_output`
pub fn config_in(dir: &Path) -> Config {
    let mut config = Config::default();
    config.paths.source_dir = dir.to_path_buf();
    config.paths.source_filename = WORKLIST_NAME.to_string();
    config.paths.output_dir = dir.join("pdf_output");
    config.http.connect_timeout_secs = 5;
    config.http.read_timeout_secs = 5;
    config
}

pub fn context_in(dir: &Path) -> ExecutionContext {
    ExecutionContext::from_config(config_in(dir)).unwrap()
}

/// URL of a local port with nothing listening
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/report.pdf", port)
}

/// Serve a response that declares `declared` bytes but sends only `body`,
/// then drops the connection. Accepts any number of requests.
pub async fn serve_truncated(declared: usize, body: &'static [u8]) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/pdf\r\nContent-Length: {}\r\n\r\n",
                declared
            );
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.write_all(body).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{}/truncated.pdf", addr)
}
