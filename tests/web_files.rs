//! Web File Tests
//!
//! Integration tests for upload, listing, download and delete.

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use filedrop::auth::hash_password;
use filedrop::web::create_router;
use filedrop::web::handlers::AppState;
use filedrop::{Config, Database, FileRepository, MAX_FILE_SIZE};
use std::sync::Arc;

const TEST_PASSWORD: &str = "correct horse battery staple";

/// Create a test configuration.
fn create_test_config() -> Config {
    Config {
        secret_key: "test-secret-key-for-testing-only".to_string(),
        password_hash: hash_password(TEST_PASSWORD).expect("Failed to hash test password"),
        database_url: "sqlite::memory:".to_string(),
        port: 0,
    }
}

/// Create a test server with an in-memory database.
async fn create_test_server() -> (TestServer, Arc<Database>) {
    let config = create_test_config();

    // Create in-memory database
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let shared_db = Arc::new(db);

    // Create app state
    let app_state = AppState::new(shared_db.clone(), &config).expect("Failed to create app state");

    // Create router
    let router = create_router(app_state);

    // Create test server
    let mut server = TestServer::new(router).expect("Failed to create test server");
    server.save_cookies();

    (server, shared_db)
}

/// Helper to log in with the shared password.
async fn login(server: &TestServer) {
    let response = server
        .post("/login")
        .form(&[("password", TEST_PASSWORD)])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);

    // Consume the login flash so later assertions see a clean page
    server.get("/").await.assert_status_ok();
}

/// Helper to upload one file through the form.
async fn upload(server: &TestServer, name: &str, content: &[u8]) {
    let part = Part::bytes(content.to_vec()).file_name(name);
    let form = MultipartForm::new().add_part("file", part);

    let response = server.post("/upload").multipart(form).await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/");
}

/// Count stored files straight from the database.
async fn file_count(db: &Arc<Database>) -> i64 {
    FileRepository::new(db.pool())
        .count()
        .await
        .expect("Failed to count files")
}

// ============================================================================
// Upload Tests
// ============================================================================

#[tokio::test]
async fn test_upload_roundtrip() {
    let (server, db) = create_test_server().await;
    login(&server).await;

    let part = Part::bytes(b"Hello, World!".to_vec())
        .file_name("hello.txt")
        .mime_type("text/plain");
    let form = MultipartForm::new().add_part("file", part);

    let response = server.post("/upload").multipart(form).await;
    response.assert_status(StatusCode::SEE_OTHER);

    // The listing shows the flash and the new row
    let response = server.get("/").await;
    response.assert_status_ok();

    let body = response.text();
    // The template escapes the quotes around the file name
    assert!(body.contains("File &quot;hello.txt&quot; uploaded successfully!"));
    assert!(body.contains(">hello.txt</a>"));
    assert!(body.contains("13 B"));

    // The stored record matches
    let files = FileRepository::new(db.pool())
        .list()
        .await
        .expect("Failed to list files");
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "hello.txt");
    assert_eq!(files[0].size, 13);
}

#[tokio::test]
async fn test_upload_empty_file() {
    let (server, db) = create_test_server().await;
    login(&server).await;

    upload(&server, "empty.txt", b"").await;

    let files = FileRepository::new(db.pool())
        .list()
        .await
        .expect("Failed to list files");
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].size, 0);
}

#[tokio::test]
async fn test_upload_sanitizes_filename() {
    let (server, db) = create_test_server().await;
    login(&server).await;

    // Path components are stripped before storing
    upload(&server, "../../etc/passwd.txt", b"data").await;

    let files = FileRepository::new(db.pool())
        .list()
        .await
        .expect("Failed to list files");
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "etc_passwd.txt");
}

#[tokio::test]
async fn test_upload_extension_check_is_case_insensitive() {
    let (server, db) = create_test_server().await;
    login(&server).await;

    upload(&server, "PHOTO.PNG", b"not really a png").await;

    assert_eq!(file_count(&db).await, 1);
}

#[tokio::test]
async fn test_upload_rejects_disallowed_extension() {
    let (server, db) = create_test_server().await;
    login(&server).await;

    upload(&server, "evil.exe", b"MZ").await;

    let response = server.get("/").await;
    assert!(response.text().contains("File type not allowed"));
    assert_eq!(file_count(&db).await, 0);
}

#[tokio::test]
async fn test_upload_rejects_missing_extension() {
    let (server, db) = create_test_server().await;
    login(&server).await;

    upload(&server, "README", b"no extension").await;

    let response = server.get("/").await;
    assert!(response.text().contains("File type not allowed"));
    assert_eq!(file_count(&db).await, 0);
}

#[tokio::test]
async fn test_upload_without_file_part() {
    let (server, db) = create_test_server().await;
    login(&server).await;

    let form = MultipartForm::new().add_text("note", "no file here");

    let response = server.post("/upload").multipart(form).await;
    response.assert_status(StatusCode::SEE_OTHER);

    let response = server.get("/").await;
    assert!(response.text().contains("No file selected"));
    assert_eq!(file_count(&db).await, 0);
}

#[tokio::test]
async fn test_upload_with_empty_file_name() {
    let (server, db) = create_test_server().await;
    login(&server).await;

    // Submitting the form without choosing a file sends an empty name
    let part = Part::bytes(b"stray bytes".to_vec()).file_name("");
    let form = MultipartForm::new().add_part("file", part);

    let response = server.post("/upload").multipart(form).await;
    response.assert_status(StatusCode::SEE_OTHER);

    let response = server.get("/").await;
    assert!(response.text().contains("No file selected"));
    assert_eq!(file_count(&db).await, 0);
}

#[tokio::test]
async fn test_upload_rejects_oversized_file() {
    let (server, db) = create_test_server().await;
    login(&server).await;

    let content = vec![0u8; MAX_FILE_SIZE + 1];
    upload(&server, "big.zip", &content).await;

    let response = server.get("/").await;
    assert!(response
        .text()
        .contains("File is too large. Maximum size: 16MB"));
    assert_eq!(file_count(&db).await, 0);
}

#[tokio::test]
async fn test_upload_over_request_cap_reports_too_large() {
    let (server, db) = create_test_server().await;
    login(&server).await;

    // Past the whole request body cap, not just the stored-file limit;
    // the transport rejects this before the handler sees the file
    let content = vec![0u8; MAX_FILE_SIZE + 2 * 1024 * 1024];
    upload(&server, "huge.zip", &content).await;

    let response = server.get("/").await;
    assert!(response
        .text()
        .contains("File is too large. Maximum size: 16MB"));
    assert_eq!(file_count(&db).await, 0);
}

// ============================================================================
// Listing Tests
// ============================================================================

#[tokio::test]
async fn test_listing_orders_newest_first() {
    let (server, db) = create_test_server().await;
    login(&server).await;

    upload(&server, "c.txt", b"first").await;
    upload(&server, "b.txt", b"second").await;
    upload(&server, "a.txt", b"third").await;

    let files = FileRepository::new(db.pool())
        .list()
        .await
        .expect("Failed to list files");
    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);

    // Consume the pending upload flash, then check the page order
    server.get("/").await.assert_status_ok();
    let body = server.get("/").await.text();
    let pos_a = body.find(">a.txt</a>").expect("a.txt not on page");
    let pos_b = body.find(">b.txt</a>").expect("b.txt not on page");
    let pos_c = body.find(">c.txt</a>").expect("c.txt not on page");
    assert!(pos_a < pos_b);
    assert!(pos_b < pos_c);
}

// ============================================================================
// Download Tests
// ============================================================================

#[tokio::test]
async fn test_download_returns_exact_content() {
    let (server, db) = create_test_server().await;
    login(&server).await;

    upload(&server, "hello.txt", b"Hello, World!").await;

    let files = FileRepository::new(db.pool())
        .list()
        .await
        .expect("Failed to list files");
    let id = files[0].id;

    let response = server.get(&format!("/download/{}", id)).await;

    response.assert_status_ok();
    assert_eq!(response.as_bytes().as_ref(), b"Hello, World!");

    let content_type = response.header("content-type");
    assert!(content_type
        .to_str()
        .expect("Invalid content-type header")
        .starts_with("text/plain"));

    let disposition = response.header("content-disposition");
    assert_eq!(
        disposition
            .to_str()
            .expect("Invalid content-disposition header"),
        "attachment; filename=\"hello.txt\""
    );
}

#[tokio::test]
async fn test_download_preserves_binary_content() {
    let (server, db) = create_test_server().await;
    login(&server).await;

    let content = [0u8, 1, 255, 0, 42];
    upload(&server, "data.zip", &content).await;

    let files = FileRepository::new(db.pool())
        .list()
        .await
        .expect("Failed to list files");

    let response = server.get(&format!("/download/{}", files[0].id)).await;

    response.assert_status_ok();
    assert_eq!(response.as_bytes().as_ref(), &content);

    let content_type = response.header("content-type");
    assert_eq!(
        content_type.to_str().expect("Invalid content-type header"),
        "application/zip"
    );
}

#[tokio::test]
async fn test_download_missing_file() {
    let (server, _db) = create_test_server().await;
    login(&server).await;

    let response = server.get("/download/99999").await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/");

    let response = server.get("/").await;
    assert!(response.text().contains("File not found"));
}

// ============================================================================
// Delete Tests
// ============================================================================

#[tokio::test]
async fn test_delete_removes_file() {
    let (server, db) = create_test_server().await;
    login(&server).await;

    upload(&server, "doomed.txt", b"bye").await;

    let files = FileRepository::new(db.pool())
        .list()
        .await
        .expect("Failed to list files");
    let id = files[0].id;

    let response = server.post(&format!("/delete/{}", id)).await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/");

    let response = server.get("/").await;
    let body = response.text();
    assert!(body.contains("File deleted"));
    assert!(body.contains("No files uploaded yet."));
    assert_eq!(file_count(&db).await, 0);
}

#[tokio::test]
async fn test_delete_missing_file_still_reports_success() {
    let (server, db) = create_test_server().await;
    login(&server).await;

    upload(&server, "keep.txt", b"stays").await;

    let response = server.post("/delete/99999").await;
    response.assert_status(StatusCode::SEE_OTHER);

    // The flash reads the same whether or not the row existed
    let response = server.get("/").await;
    assert!(response.text().contains("File deleted"));
    assert_eq!(file_count(&db).await, 1);
}

// ============================================================================
// Full Lifecycle Test
// ============================================================================

#[tokio::test]
async fn test_full_upload_lifecycle() {
    let (server, db) = create_test_server().await;

    // Locked out before login
    let response = server.get("/").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/login");

    login(&server).await;

    // Upload a 10 byte file
    upload(&server, "a.txt", b"0123456789").await;

    let files = FileRepository::new(db.pool())
        .list()
        .await
        .expect("Failed to list files");
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "a.txt");
    assert_eq!(files[0].size, 10);
    let id = files[0].id;

    // Download returns exactly those bytes under the same name
    let response = server.get(&format!("/download/{}", id)).await;
    response.assert_status_ok();
    assert_eq!(response.as_bytes().as_ref(), b"0123456789");
    assert_eq!(
        response
            .header("content-disposition")
            .to_str()
            .expect("Invalid content-disposition header"),
        "attachment; filename=\"a.txt\""
    );

    // Delete and confirm it is gone
    let response = server.post(&format!("/delete/{}", id)).await;
    response.assert_status(StatusCode::SEE_OTHER);

    let body = server.get("/").await.text();
    assert!(!body.contains(">a.txt</a>"));
    assert_eq!(file_count(&db).await, 0);
}

#[tokio::test]
async fn test_deleted_file_cannot_be_downloaded() {
    let (server, db) = create_test_server().await;
    login(&server).await;

    upload(&server, "gone.txt", b"soon gone").await;

    let files = FileRepository::new(db.pool())
        .list()
        .await
        .expect("Failed to list files");
    let id = files[0].id;

    server.post(&format!("/delete/{}", id)).await;

    let response = server.get(&format!("/download/{}", id)).await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/");
}
