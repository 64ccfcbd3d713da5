//! Report assembly: downloads, validation, thumbnails and output files

use image::{ImageFormat, RgbImage};
use kodegen_tools_imagescrape::report::{ImageDownloader, ReportError, THUMBNAIL_SEPARATOR};
use kodegen_tools_imagescrape::{
    ImageCandidate, ImageValidator, RecordStatus, ReportBuilder, ResultRecord, save_json_summary,
    write_csv_report,
};
use std::collections::HashMap;
use std::io::Cursor;
use std::time::Duration;
use tempfile::TempDir;

const TIMESTAMP: &str = "20250101093000";

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, image::Rgb([10, 120, 200]));
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

fn downloader(max_bytes: usize) -> ImageDownloader {
    ImageDownloader::new(Duration::from_secs(5), max_bytes).unwrap()
}

fn record(url: &str, status: RecordStatus, images: &[String]) -> ResultRecord {
    ResultRecord {
        url: url.to_string(),
        status,
        candidates: images
            .iter()
            .map(|image| ImageCandidate {
                resolved_url: image.clone(),
                source_url: url.to_string(),
            })
            .collect(),
    }
}

#[tokio::test]
async fn downloads_image_bytes() {
    let mut server = mockito::Server::new_async().await;
    let body = png(4, 4);
    let mock = server
        .mock("GET", "/p/1.png")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body(body.clone())
        .create_async()
        .await;

    let bytes = downloader(1024 * 1024)
        .download(&format!("{}/p/1.png", server.url()))
        .await
        .unwrap();

    assert_eq!(bytes, body);
    mock.assert_async().await;
}

#[tokio::test]
async fn http_errors_and_oversized_bodies_are_rejected() {
    let mut server = mockito::Server::new_async().await;
    let _missing = server
        .mock("GET", "/missing.jpg")
        .with_status(404)
        .create_async()
        .await;
    let _huge = server
        .mock("GET", "/huge.jpg")
        .with_status(200)
        .with_body(vec![0u8; 4096])
        .create_async()
        .await;

    let downloader = downloader(1024);

    let missing = downloader
        .download(&format!("{}/missing.jpg", server.url()))
        .await;
    assert!(matches!(missing, Err(ReportError::Status { status: 404, .. })));

    let huge = downloader.download(&format!("{}/huge.jpg", server.url())).await;
    assert!(matches!(huge, Err(ReportError::TooLarge { limit: 1024, .. })));
}

#[tokio::test]
async fn builds_rows_in_input_order_with_valid_thumbnails_only() {
    let mut server = mockito::Server::new_async().await;
    let _tall = server
        .mock("GET", "/tall.png")
        .with_status(200)
        .with_body(png(300, 400))
        .create_async()
        .await;
    let _short = server
        .mock("GET", "/short.png")
        .with_status(200)
        .with_body(png(300, 120))
        .create_async()
        .await;
    let _html = server
        .mock("GET", "/error.jpg")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html>not found</html>")
        .create_async()
        .await;
    let _gone = server
        .mock("GET", "/gone.jpg")
        .with_status(404)
        .create_async()
        .await;

    let base = server.url();
    let first = "https://shop.example.com/product/1";
    let second = "https://shop.example.com/product/2";
    let third = "https://shop.example.com/product/3";

    let mut snapshot = HashMap::new();
    snapshot.insert(
        first.to_string(),
        record(
            first,
            RecordStatus::Success,
            &[
                format!("{base}/short.png"),
                format!("{base}/tall.png"),
                format!("{base}/error.jpg"),
                format!("{base}/gone.jpg"),
            ],
        ),
    );
    snapshot.insert(second.to_string(), record(second, RecordStatus::Failed, &[]));
    snapshot.insert(
        third.to_string(),
        record(third, RecordStatus::Success, &[format!("{base}/tall.png")]),
    );

    let output = TempDir::new().unwrap();
    let builder = ReportBuilder::new(
        downloader(1024 * 1024),
        ImageValidator::default(),
        output.path(),
        TIMESTAMP,
        160,
    );

    let urls: Vec<String> = [third, first, second, first]
        .into_iter()
        .map(String::from)
        .collect();
    let rows = builder.build(&urls, &snapshot).await.unwrap();

    let order: Vec<&str> = rows.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(order, vec![third, first, second]);

    assert_eq!(rows[0].image_count(), 1);
    assert_eq!(rows[1].image_count(), 1);
    assert_eq!(rows[2].status, RecordStatus::Failed);
    assert_eq!(rows[2].image_count(), 0);

    let thumbnail = output.path().join(&rows[1].thumbnails[0]);
    let decoded = image::open(&thumbnail).unwrap();
    assert_eq!(decoded.height(), 160);
    assert!(decoded.width() <= 160);
    assert!(rows[1].thumbnails[0].starts_with(format!("thumbnails_{TIMESTAMP}")));
}

#[tokio::test]
async fn url_missing_from_snapshot_is_reported_failed() {
    let output = TempDir::new().unwrap();
    let builder = ReportBuilder::new(
        downloader(1024),
        ImageValidator::default(),
        output.path(),
        TIMESTAMP,
        160,
    );

    let rows = builder
        .build(&["https://shop.example.com/lost".to_string()], &HashMap::new())
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, RecordStatus::Failed);
}

#[tokio::test]
async fn csv_report_has_one_row_per_url() {
    let output = TempDir::new().unwrap();
    let rows = vec![
        kodegen_tools_imagescrape::ReportRow {
            url: "https://shop.example.com/product/1".into(),
            status: RecordStatus::Success,
            thumbnails: vec![
                format!("thumbnails_{TIMESTAMP}/0001_01.jpg").into(),
                format!("thumbnails_{TIMESTAMP}/0001_02.jpg").into(),
            ],
        },
        kodegen_tools_imagescrape::ReportRow {
            url: "https://shop.example.com/product/2".into(),
            status: RecordStatus::Failed,
            thumbnails: Vec::new(),
        },
    ];

    let path = write_csv_report(&rows, output.path(), TIMESTAMP).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        format!("product_images_{TIMESTAMP}.csv")
    );

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, vec!["url", "status", "image_count", "thumbnails"]);

    let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(&records[0][1], "success");
    assert_eq!(&records[0][2], "2");
    assert_eq!(
        &records[0][3],
        [
            format!("thumbnails_{TIMESTAMP}/0001_01.jpg"),
            format!("thumbnails_{TIMESTAMP}/0001_02.jpg"),
        ]
        .join(THUMBNAIL_SEPARATOR)
    );
    assert_eq!(&records[1][1], "failed");
    assert_eq!(&records[1][3], "");
}

#[tokio::test]
async fn json_summary_round_trips_records() {
    let output = TempDir::new().unwrap();
    let url = "https://shop.example.com/product/1";
    let mut snapshot = HashMap::new();
    snapshot.insert(
        url.to_string(),
        record(url, RecordStatus::Success, &["https://cdn.example.com/a.jpg".to_string()]),
    );

    let path = save_json_summary(&snapshot, output.path(), TIMESTAMP)
        .await
        .unwrap();

    let json = std::fs::read_to_string(path).unwrap();
    let parsed: HashMap<String, ResultRecord> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, snapshot);
    assert!(json.contains("\"status\": \"success\""));
}
