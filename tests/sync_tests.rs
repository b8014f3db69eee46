//! Library-level sync tests.
//!
//! Runs `run_sync` with the real HTTP client, downloader and SQLite store
//! against a mock Canvas server.

use mockito::{Matcher, Server, ServerGuard};
use tempfile::TempDir;

use canvas_sync::api::HttpCanvasApi;
use canvas_sync::config::ApiSettings;
use canvas_sync::db::Database;
use canvas_sync::download::HttpDownloader;
use canvas_sync::models::CourseId;
use canvas_sync::store::{load_records, record_key, KeyValueStore};
use canvas_sync::sync::{run_sync, SyncContext, SyncOptions, SyncReport};

// ═══════════════════════════════════════════════════════════════════════════════
// Test Setup Helpers
// ═══════════════════════════════════════════════════════════════════════════════

const COURSE: CourseId = CourseId(42);

fn settings(server: &ServerGuard) -> ApiSettings {
    ApiSettings {
        base_url: server.url(),
        token: Some("t0ken".into()),
        per_page: 100,
        timeout_secs: 5,
    }
}

fn file_json(server: &ServerGuard, id: u64, name: &str, folder: Option<u64>) -> String {
    let folder = folder.map_or_else(|| "null".to_string(), |f| f.to_string());
    format!(
        r#"{{"id":{id},"display_name":"{name}","folder_id":{folder},"url":"{}/files/{id}/download"}}"#,
        server.url()
    )
}

fn sync(server: &ServerGuard, root: &TempDir, db: &mut Database) -> SyncReport {
    let api = HttpCanvasApi::new(&settings(server)).expect("api client");
    let downloader = HttpDownloader::new(&settings(server), root.path()).expect("downloader");
    run_sync(SyncContext {
        course: COURSE,
        api: &api,
        downloader: &downloader,
        store: db,
        options: SyncOptions {
            course_folder: COURSE.to_string(),
            record_failed_downloads: true,
        },
    })
    .expect("sync succeeds")
}

// ═══════════════════════════════════════════════════════════════════════════════
// Folder resolution over HTTP
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn deep_chain_resolves_with_one_lookup_per_folder() {
    let mut server = Server::new();
    // A (1) -> B (2) -> C (3); files live in C and B.
    let listing = format!(
        "[{},{},{}]",
        file_json(&server, 10, "c1.txt", Some(3)),
        file_json(&server, 11, "b1.txt", Some(2)),
        file_json(&server, 12, "c2.txt", Some(3)),
    );
    let _listing = server
        .mock("GET", "/courses/42/files")
        .match_query(Matcher::UrlEncoded("per_page".into(), "100".into()))
        .match_header("authorization", "Bearer t0ken")
        .with_status(200)
        .with_body(listing)
        .create();
    let folders: Vec<_> = [
        (1, r#"{"name":"A","parent_folder_id":null}"#),
        (2, r#"{"name":"B","parent_folder_id":1}"#),
        (3, r#"{"name":"C","parent_folder_id":2}"#),
    ]
    .into_iter()
    .map(|(id, body)| {
        server
            .mock("GET", format!("/folders/{id}").as_str())
            .with_status(200)
            .with_body(body)
            .expect(1)
            .create()
    })
    .collect();
    let _files = server
        .mock("GET", Matcher::Regex(r"^/files/\d+/download$".into()))
        .with_status(200)
        .with_body("data")
        .create();

    let root = TempDir::new().unwrap();
    let mut db = Database::open(&root.path().join("state.db")).unwrap();
    let report = sync(&server, &root, &mut db);

    for mock in &folders {
        mock.assert();
    }
    assert_eq!(report.folder_lookups, 3);
    assert!(root.path().join("42/A/B/C/c1.txt").exists());
    assert!(root.path().join("42/A/B/b1.txt").exists());
    assert!(root.path().join("42/A/B/C/c2.txt").exists());
}

#[test]
fn unreachable_folder_places_file_at_course_root() {
    let mut server = Server::new();
    let listing = format!("[{}]", file_json(&server, 20, "lost.txt", Some(77)));
    let _listing = server
        .mock("GET", "/courses/42/files")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(listing)
        .create();
    let _folder = server.mock("GET", "/folders/77").with_status(500).create();
    let _file = server
        .mock("GET", "/files/20/download")
        .with_status(200)
        .with_body("x")
        .create();

    let root = TempDir::new().unwrap();
    let mut db = Database::open_in_memory().unwrap();
    let report = sync(&server, &root, &mut db);

    assert_eq!(report.files[0].path, "42/lost.txt");
    assert!(root.path().join("42/lost.txt").exists());
}

// ═══════════════════════════════════════════════════════════════════════════════
// Persistence
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn records_persist_in_sqlite_across_reopen() {
    let mut server = Server::new();
    let listing = format!(
        "[{},{}]",
        file_json(&server, 1, "one.pdf", None),
        file_json(&server, 2, "two.pdf", None)
    );
    let _listing = server
        .mock("GET", "/courses/42/files")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(listing)
        .create();
    let downloads = server
        .mock("GET", Matcher::Regex(r"^/files/\d+/download$".into()))
        .with_status(200)
        .with_body("pdf")
        .expect(2)
        .create();

    let root = TempDir::new().unwrap();
    let db_path = root.path().join("state.db");
    {
        let mut db = Database::open(&db_path).unwrap();
        assert_eq!(sync(&server, &root, &mut db).queued, 2);
    }

    let mut db = Database::open(&db_path).unwrap();
    let stored = load_records(&db, COURSE).unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored.get(2).unwrap().name, "two.pdf");
    assert!(db.get(&record_key(COURSE)).unwrap().is_some());

    assert_eq!(sync(&server, &root, &mut db).queued, 0);
    downloads.assert();
}
