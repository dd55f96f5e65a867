use bifpreview::source::bif_download_url;
use bifpreview::{
    parse_summary, BifPreviewError, BifWriter, DataUrlStore, HandleStore, HttpBifSource,
    LoadOutcome, PreviewConfig, PreviewSession,
};
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const SUMMARY: &str = r#"{
    "status": "success",
    "key_points": [
        { "content": "Setup", "timestamp": "00:10", "importance": "low" },
        { "content": "Main result", "timestamp": "01:30", "importance": "high" },
        { "content": "After the end", "timestamp": "59:00", "importance": "medium" }
    ]
}"#;

/// Frames every 5 s from 0 to 200 s, JPEG-looking payloads
fn preview_bif() -> Vec<u8> {
    (0..=40u32)
        .fold(BifWriter::new(), |writer, i| {
            writer.push_frame(i * 5, vec![0xff, 0xd8, 0xff, 0xe0, i as u8])
        })
        .to_bytes()
        .unwrap()
}

#[tokio::test]
async fn test_remote_preview_session_with_wiremock() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/bif/BV1demo.bif"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(preview_bif())
                .insert_header("content-type", "application/octet-stream"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let key_points = parse_summary(SUMMARY).unwrap();
    let url = bif_download_url(&mock_server.uri(), "BV1demo.bif").unwrap();
    let source = HttpBifSource::new(url).unwrap();
    let config = PreviewConfig {
        frame_interval_ms: 50,
        ..PreviewConfig::default()
    };
    let mut session = PreviewSession::new(DataUrlStore::new(), config);

    let summary = match session.load(&source, &key_points).await {
        LoadOutcome::Activated(summary) => summary,
        other => panic!("expected activation, got {:?}", other),
    };
    // 00:10 -> [0, 20] s, 01:30 -> [80, 100] s, 59:00 -> nothing
    assert_eq!(summary.windows, 2);
    assert_eq!(summary.animated, 2);
    assert_eq!(summary.handles, 10);

    let scheduler = session.scheduler();
    assert!(!scheduler.preview(2).has_frames);
    let handle = scheduler.preview(1).current_handle.unwrap();
    assert!(scheduler
        .store()
        .resolve(&handle)
        .unwrap()
        .starts_with("data:image/jpeg;base64,"));

    let advance = tokio::time::timeout(
        Duration::from_secs(5),
        session.scheduler_mut().next_advance(),
    )
    .await
    .expect("no advance within timeout")
    .unwrap();
    assert_eq!(advance.current_index, 1);
    assert_eq!(advance.generation, summary.generation);

    session.shutdown();
    assert_eq!(session.scheduler().store().live_count(), 0);
    assert_eq!(session.scheduler().timer_count(), 0);
}

#[tokio::test]
async fn test_remote_fetch_failure_leaves_no_previews() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let key_points = parse_summary(SUMMARY).unwrap();
    let url = bif_download_url(&mock_server.uri(), "BV1demo.bif").unwrap();
    let source = HttpBifSource::new(url).unwrap();
    let mut session = PreviewSession::new(DataUrlStore::new(), PreviewConfig::default());

    match session.load(&source, &key_points).await {
        LoadOutcome::Failed(BifPreviewError::Source(err)) => {
            assert!(err.message.contains("500"), "unexpected message: {}", err)
        }
        other => panic!("expected fetch failure, got {:?}", other),
    }
    for i in 0..key_points.len() {
        assert!(!session.scheduler().preview(i).has_frames);
    }
    assert_eq!(session.scheduler().store().live_count(), 0);
}
