//! Integration tests for range-dl
//!
//! Drives the stepper over the real reqwest transport against a wiremock
//! server. Each GET mock matches an exact `Range` header value, so an
//! unexpected window falls through to wiremock's 404 and fails the
//! assertions below.

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use range_dl::{Error, Stepper, StepperConfig};

/// Deterministic test payload
fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Mounts a HEAD mock advertising range support for a resource of `len` bytes
async fn mount_head(server: &MockServer, len: usize) {
    Mock::given(method("HEAD"))
        .and(path("/file.bin"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("accept-ranges", "bytes")
                .insert_header("content-length", len.to_string().as_str()),
        )
        .mount(server)
        .await;
}

/// Mounts a GET mock serving `data[start..=end]` (clamped) for one exact range
async fn mount_chunk(server: &MockServer, data: &[u8], start: usize, end: usize) {
    let available = &data[start.min(data.len())..data.len().min(end + 1)];
    Mock::given(method("GET"))
        .and(path("/file.bin"))
        .and(header("Range", format!("bytes={start}-{end}").as_str()))
        .respond_with(
            ResponseTemplate::new(206).set_body_raw(available.to_vec(), "application/octet-stream"),
        )
        .mount(server)
        .await;
}

fn stepper_for(server: &MockServer) -> Stepper {
    let url = format!("{}/file.bin", server.uri());
    Stepper::new(url)
}

#[tokio::test]
async fn test_sequential_download_of_known_length_resource() {
    let server = MockServer::start().await;
    let data = payload(2000);

    mount_head(&server, data.len()).await;
    mount_chunk(&server, &data, 0, 1023).await;
    mount_chunk(&server, &data, 1024, 2047).await;

    let mut stepper = stepper_for(&server);

    assert!(stepper.server_supports_partial_requests().await.unwrap());
    assert_eq!(stepper.content_length(), Some(2000));

    let mut assembled = Vec::new();

    stepper.start().await.unwrap();
    let first = stepper.current().expect("first chunk stored");
    assert_eq!(first.status, 206);
    assert_eq!(first.body.len(), 1024);
    assembled.extend_from_slice(&first.body);
    assert!(!stepper.is_last_partial_request());

    // The advanced window overshoots the 2000-byte resource; the server
    // truncates it to the 976 remaining bytes.
    stepper.next().await.unwrap();
    let second = stepper.current().expect("second chunk stored");
    assert_eq!(second.body.len(), 976);
    assembled.extend_from_slice(&second.body);
    assert!(stepper.is_last_partial_request());

    assert_eq!(assembled, data);

    // Round-trip the result through a file like the CLI does.
    let temp = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(temp.path(), &assembled).unwrap();
    assert_eq!(std::fs::read(temp.path()).unwrap(), data);
}

#[tokio::test]
async fn test_start_next_prev_replays_first_chunk() {
    let server = MockServer::start().await;
    let data = payload(4096);

    mount_head(&server, data.len()).await;
    mount_chunk(&server, &data, 0, 1023).await;
    mount_chunk(&server, &data, 1024, 2047).await;

    let mut stepper = stepper_for(&server);
    assert!(stepper.server_supports_partial_requests().await.unwrap());

    stepper.start().await.unwrap();
    let first = stepper.current().unwrap();

    stepper.next().await.unwrap();
    stepper.prev().await.unwrap();

    assert_eq!(stepper.range_start(), 0);
    assert_eq!(stepper.range_end(), 1023);

    let replayed = stepper.current().unwrap();
    assert_eq!(replayed.body, first.body);
}

#[tokio::test]
async fn test_resume_from_absolute_bounds() {
    let server = MockServer::start().await;
    let data = payload(8192);

    mount_head(&server, data.len()).await;
    mount_chunk(&server, &data, 2048, 4097).await;

    let mut stepper = stepper_for(&server);
    assert!(stepper.server_supports_partial_requests().await.unwrap());

    stepper.resume(2048, 4097).await.unwrap();

    let chunk = stepper.current().unwrap();
    assert_eq!(chunk.body, data[2048..4098]);
    assert_eq!(stepper.range_start(), 2048);
    assert_eq!(stepper.range_end(), 4097);
}

#[tokio::test]
async fn test_invalid_resume_issues_no_request() {
    let server = MockServer::start().await;
    let data = payload(8192);

    mount_head(&server, data.len()).await;
    // No GET mocks mounted on purpose; a stray request would 404 below.

    let mut stepper = stepper_for(&server);
    assert!(stepper.server_supports_partial_requests().await.unwrap());

    let err = stepper.resume(10, 5).await.unwrap_err();
    assert!(matches!(err, Error::InvalidRange { start: 10, end: 5, .. }));
    assert!(stepper.current().is_none());
    assert_eq!(stepper.range_start(), 0);
    assert_eq!(stepper.range_end(), 1023);
}

#[tokio::test]
async fn test_probe_rejects_server_without_range_support() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/file.bin"))
        .respond_with(ResponseTemplate::new(200).insert_header("accept-ranges", "none"))
        .mount(&server)
        .await;

    let mut stepper = stepper_for(&server);
    assert!(!stepper.server_supports_partial_requests().await.unwrap());
    assert_eq!(stepper.content_length(), None);
}

#[tokio::test]
async fn test_probe_rejects_server_missing_accept_ranges() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/file.bin"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-length", "2000"))
        .mount(&server)
        .await;

    let mut stepper = stepper_for(&server);
    assert!(!stepper.server_supports_partial_requests().await.unwrap());
    // The length is only learned when the probe passes.
    assert_eq!(stepper.content_length(), None);
}

#[tokio::test]
async fn test_non_success_status_is_stored_not_interpreted() {
    let server = MockServer::start().await;

    mount_head(&server, 2000).await;
    Mock::given(method("GET"))
        .and(path("/file.bin"))
        .and(header("Range", "bytes=0-1023"))
        .respond_with(ResponseTemplate::new(416))
        .mount(&server)
        .await;

    let mut stepper = stepper_for(&server);
    assert!(stepper.server_supports_partial_requests().await.unwrap());

    // The core passes the status through; deciding what 416 means is the
    // caller's job.
    stepper.start().await.unwrap();
    let chunk = stepper.current().unwrap();
    assert_eq!(chunk.status, 416);
    assert!(chunk.body.is_empty());
}

#[tokio::test]
async fn test_custom_chunk_size_drives_window_width() {
    let server = MockServer::start().await;
    let data = payload(700);

    mount_head(&server, data.len()).await;
    mount_chunk(&server, &data, 0, 255).await;
    mount_chunk(&server, &data, 256, 511).await;
    mount_chunk(&server, &data, 512, 767).await;

    let config = StepperConfig {
        chunk_size: 256,
        ..Default::default()
    };
    let url = format!("{}/file.bin", server.uri());
    let mut stepper = Stepper::with_config(url, config).unwrap();

    assert!(stepper.server_supports_partial_requests().await.unwrap());

    let mut assembled = Vec::new();
    stepper.start().await.unwrap();
    loop {
        let chunk = stepper.current().expect("chunk stored after each step");
        assembled.extend_from_slice(&chunk.body);
        if stepper.is_last_partial_request() {
            break;
        }
        stepper.next().await.unwrap();
    }

    assert_eq!(assembled, data);
}

#[tokio::test]
async fn test_connection_failure_propagates_as_network_error() {
    // A pooled `MockServer::start()` server keeps its port alive after drop;
    // an explicit listener makes this server exclusive so dropping it really
    // closes the socket.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let server = MockServer::builder().listener(listener).start().await;
    let url = format!("{}/file.bin", server.uri());

    // Kill the server so the connection is refused.
    let addr = *server.address();
    drop(server);
    // Shutdown is asynchronous; wait until the port actually refuses
    // connections before stepping.
    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_err() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    let mut stepper = Stepper::new(url);
    let err = stepper.start().await.unwrap_err();
    assert!(matches!(err, Error::NetworkError(_)));

    // Failed step changed nothing.
    assert!(stepper.current().is_none());
    assert_eq!(stepper.range_start(), 0);
    assert_eq!(stepper.range_end(), 1023);
}
