use serde_json::json;
use std::time::Duration;
use tma_notes_core::{
    AvailabilityTransition, HttpNotesRemote, MemoryKvStore, Note, NoteMirror, NotesRemote,
    NotesSync, RemoteConfig, RemoteError, SyncMessage,
};
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INIT_DATA: &str = "query_id=AAH&user=%7B%22id%22%3A42%7D&auth_date=1700000000&hash=abc";

fn remote_for(server_uri: &str, init_data: &str) -> HttpNotesRemote {
    HttpNotesRemote::new(RemoteConfig {
        base_url: format!("{server_uri}/api"),
        init_data_raw: init_data.to_string(),
        timeout: Duration::from_secs(5),
    })
    .expect("remote should build")
}

/// Runs blocking client code off the async test runtime.
async fn blocking<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    tokio::task::spawn_blocking(f)
        .await
        .expect("blocking task should not panic")
}

#[tokio::test(flavor = "multi_thread")]
async fn fetch_all_sends_init_data_and_unwraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notes"))
        .and(header("X-Init-Data", INIT_DATA))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "notes": [
                {"id": "2", "text": "second", "timestamp": 20, "user_id": 42},
                {"id": "1", "text": "first", "timestamp": 10, "user_id": 42}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let notes = blocking(move || remote_for(&uri, INIT_DATA).fetch_all())
        .await
        .expect("fetch should succeed");

    assert_eq!(
        notes,
        vec![Note::new("2", "second", 20), Note::new("1", "first", 10)]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_init_data_is_sent_as_empty_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notes"))
        .and(header_exists("X-Init-Data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"notes": []})))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let notes = blocking(move || remote_for(&uri, "").fetch_all())
        .await
        .expect("fetch should succeed");
    assert!(notes.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn create_posts_text_and_decodes_created_note() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/notes"))
        .and(body_json(json!({"text": "buy milk"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "1700000000123456789",
            "text": "buy milk",
            "timestamp": 1_700_000_000_123_i64,
            "user_id": 42
        })))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let created = blocking(move || remote_for(&uri, INIT_DATA).create("buy milk"))
        .await
        .expect("create should succeed");

    assert_eq!(
        created,
        Note::new("1700000000123456789", "buy milk", 1_700_000_000_123)
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_targets_single_note_and_accepts_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/notes/42"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    blocking(move || remote_for(&uri, INIT_DATA).delete("42"))
        .await
        .expect("delete should succeed");
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_sends_reserved_characters_as_one_encoded_segment() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(3)
        .mount(&server)
        .await;

    let uri = server.uri();
    blocking(move || {
        let remote = remote_for(&uri, INIT_DATA);
        for id in ["a/b", "two words", "..."] {
            remote.delete(id).expect("delete should succeed");
        }
    })
    .await;

    let seen: Vec<(String, String)> = server
        .received_requests()
        .await
        .expect("request recording is enabled")
        .iter()
        .map(|request| (request.method.to_string(), request.url.path().to_string()))
        .collect();
    assert_eq!(
        seen,
        vec![
            ("DELETE".to_string(), "/api/notes/a%2Fb".to_string()),
            ("DELETE".to_string(), "/api/notes/two%20words".to_string()),
            ("DELETE".to_string(), "/api/notes/...".to_string()),
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn unaddressable_ids_are_rejected_without_contacting_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let uri = server.uri();
    let errors = blocking(move || {
        let remote = remote_for(&uri, INIT_DATA);
        ["", ".", ".."].map(|id| remote.delete(id).err())
    })
    .await;

    for (id, err) in ["", ".", ".."].into_iter().zip(errors) {
        match err {
            Some(RemoteError::InvalidNoteId(rejected)) => assert_eq!(rejected, id),
            other => panic!("expected InvalidNoteId for {id:?}, got {other:?}"),
        }
    }
    assert!(server
        .received_requests()
        .await
        .expect("request recording is enabled")
        .is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn session_delete_of_dot_segment_leaves_server_collection_alone() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "notes": [{"id": "1", "text": "keep", "timestamp": 10, "user_id": 42}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let uri = server.uri();
    let (report, notes) = blocking(move || {
        let remote = remote_for(&uri, INIT_DATA);
        let (mut session, _) = NotesSync::connect(&remote, NoteMirror::new(MemoryKvStore::new()));
        let report = session.delete("..");
        (report, session.notes().to_vec())
    })
    .await;

    assert!(!report.remote_ok);
    assert_eq!(report.transition, None);
    assert_eq!(report.message, None);
    assert_eq!(notes, vec![Note::new("1", "keep", 10)]);
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_all_targets_collection() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/notes"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    blocking(move || remote_for(&uri, INIT_DATA).delete_all())
        .await
        .expect("delete all should succeed");
}

#[tokio::test(flavor = "multi_thread")]
async fn non_success_status_maps_to_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notes"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string("Unauthorized: Invalid init data\n"),
        )
        .mount(&server)
        .await;

    let uri = server.uri();
    let err = blocking(move || remote_for(&uri, "bogus").fetch_all())
        .await
        .expect_err("401 must fail");

    match err {
        RemoteError::Status { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "Unauthorized: Invalid init data");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_body_maps_to_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notes"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let uri = server.uri();
    let err = blocking(move || remote_for(&uri, INIT_DATA).fetch_all())
        .await
        .expect_err("html body must fail");
    assert!(matches!(err, RemoteError::Decode(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn health_probe_hits_root_health_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "service": "tma-notes-api",
            "version": "1.0.0"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let health = blocking(move || remote_for(&uri, INIT_DATA).health())
        .await
        .expect("health should succeed");
    assert_eq!(health.status, "healthy");
    assert_eq!(health.service, "tma-notes-api");
}

#[test]
fn unreachable_server_maps_to_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let remote = remote_for(&format!("http://{addr}"), INIT_DATA);
    let err = remote.fetch_all().expect_err("closed port must fail");
    assert!(matches!(err, RemoteError::Transport(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn session_over_http_falls_back_when_create_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"notes": []})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/notes"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let (report, notes, message) = blocking(move || {
        let remote = remote_for(&uri, INIT_DATA);
        let (mut session, _) = NotesSync::connect(&remote, NoteMirror::new(MemoryKvStore::new()));
        let report = session.add("typed while the server is down").unwrap();
        (report, session.notes().to_vec(), session.message())
    })
    .await;

    assert_eq!(report.transition, Some(AvailabilityTransition::WentOffline));
    assert_eq!(message, Some(SyncMessage::SavedLocallyOnly));
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].text, "typed while the server is down");
}
