mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{lazy_pool, router, send, test_pool, unique_owner};

#[tokio::test]
async fn root_lists_endpoints() -> Result<()> {
    let app = router(lazy_pool());
    let (status, body) = send(&app, "GET", "/", None, None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Course Service");
    assert!(body["endpoints"]["create"].is_string());
    Ok(())
}

#[tokio::test]
async fn course_routes_require_principal() -> Result<()> {
    let app = router(lazy_pool());

    for (method, uri) in [
        ("GET", "/courses"),
        ("GET", "/courses/recent"),
        ("GET", "/courses/abc"),
        ("PATCH", "/courses/abc"),
        ("POST", "/courses/abc/upload-url"),
    ] {
        let (status, body) = send(&app, method, uri, None, None).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
    Ok(())
}

#[tokio::test]
async fn create_reports_missing_fields_before_touching_database() -> Result<()> {
    let app = router(lazy_pool());

    let (status, body) = send(&app, "POST", "/courses", Some("ada"), Some(json!({ "TimeTrack": 1, "Done": false }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing ContentId");

    let (status, body) = send(&app, "POST", "/courses", Some("ada"), Some(json!({ "ContentId": "c1", "TimeTrack": 1 }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing Done");
    Ok(())
}

#[tokio::test]
async fn malformed_requests_are_rejected() -> Result<()> {
    let app = router(lazy_pool());

    let (status, body) = send(&app, "GET", "/courses?size=lots", Some("ada"), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid size parameter");

    let (status, body) = send(&app, "PATCH", "/courses/abc", Some("ada"), Some(json!({ "Grade": "A" }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap_or_default().contains("Grade"));

    let (status, _) = send(&app, "PATCH", "/courses/abc", Some("ada"), Some(json!([1, 2]))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn course_lifecycle_against_database() -> Result<()> {
    let Some(pool) = test_pool().await else {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return Ok(());
    };
    let app = router(pool);
    let owner = unique_owner("lifecycle");

    let course = json!({ "ContentId": "intro-to-rust", "TimeTrack": 0, "Done": false, "Lessons": [] });
    let (status, body) = send(&app, "POST", "/courses", Some(&owner), Some(course.clone())).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Course created successfully");
    let id = body["id"].as_str().unwrap_or_default().to_string();

    let (status, body) = send(&app, "POST", "/courses", Some(&owner), Some(course)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Course already exists");

    let (_, rows) = send(&app, "GET", "/courses/intro-to-rust", Some(&owner), None).await?;
    let rows = rows.as_array().cloned().unwrap_or_default();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Id"], id);
    assert_eq!(rows[0]["User_Id"], owner);
    assert_eq!(rows[0]["Lessons"], "[]");

    // Lessons alone gets a legacy upload URL
    let uri = format!("/courses/{}", id);
    let (status, body) = send(&app, "PATCH", &uri, Some(&owner), Some(json!({ "Lessons": ["l1"] }))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rowsAffected"], 1);
    assert!(body["signedUrl"].as_str().unwrap_or_default().starts_with("https://uploads.test/"));

    let (_, body) = send(&app, "PATCH", &uri, Some(&owner), Some(json!({ "Lessons": ["l1", "l2"], "Done": true }))).await?;
    assert_eq!(body["rowsAffected"], 1);
    assert!(body.get("signedUrl").is_none());

    // Immutable keys are ignored
    let (_, body) = send(&app, "PATCH", &uri, Some(&owner), Some(json!({ "ContentId": "other", "timetrack": 42 }))).await?;
    assert_eq!(body["rowsAffected"], 1);
    let (_, rows) = send(&app, "GET", "/courses/intro-to-rust", Some(&owner), None).await?;
    assert_eq!(rows[0]["TimeTrack"], 42);
    assert_eq!(rows[0]["Done"], true);

    let (status, body) = send(&app, "POST", &format!("{}/upload-url", uri), Some(&owner), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expiresIn"], 900);
    Ok(())
}

#[tokio::test]
async fn courses_are_scoped_to_their_owner() -> Result<()> {
    let Some(pool) = test_pool().await else {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return Ok(());
    };
    let app = router(pool);
    let owner = unique_owner("owner");
    let intruder = unique_owner("intruder");

    let (_, body) = send(
        &app,
        "POST",
        "/courses",
        Some(&owner),
        Some(json!({ "ContentId": "scoped", "TimeTrack": 5, "Done": false })),
    )
    .await?;
    let uri = format!("/courses/{}", body["id"].as_str().unwrap_or_default());

    let (status, body) = send(&app, "PATCH", &uri, Some(&intruder), Some(json!({ "Done": true }))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rowsAffected"], 0);

    let (_, rows) = send(&app, "GET", "/courses/scoped", Some(&intruder), None).await?;
    assert_eq!(rows, json!([]));

    let (status, _) = send(&app, "POST", &format!("{}/upload-url", uri), Some(&intruder), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The intruder may enroll in the same content independently
    let (status, _) = send(
        &app,
        "POST",
        "/courses",
        Some(&intruder),
        Some(json!({ "ContentId": "scoped", "TimeTrack": 0, "Done": false })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn list_clamps_page_size() -> Result<()> {
    let Some(pool) = test_pool().await else {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return Ok(());
    };
    let app = router(pool);
    let owner = unique_owner("paging");

    for n in 0..22 {
        let (status, _) = send(
            &app,
            "POST",
            "/courses",
            Some(&owner),
            Some(json!({ "ContentId": format!("content-{}", n), "TimeTrack": n, "Done": false })),
        )
        .await?;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, rows) = send(&app, "GET", "/courses?size=50", Some(&owner), None).await?;
    assert_eq!(rows.as_array().map(Vec::len), Some(20));

    let (_, rows) = send(&app, "GET", "/courses", Some(&owner), None).await?;
    assert_eq!(rows.as_array().map(Vec::len), Some(10));

    let (_, rows) = send(&app, "GET", "/courses?page=3", Some(&owner), None).await?;
    assert_eq!(rows.as_array().map(Vec::len), Some(2));

    let (_, rows) = send(&app, "GET", "/courses/recent?size=3", Some(&owner), None).await?;
    assert_eq!(rows.as_array().map(Vec::len), Some(3));
    Ok(())
}

#[tokio::test]
async fn recent_is_ordered_by_last_update() -> Result<()> {
    let Some(pool) = test_pool().await else {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return Ok(());
    };
    let app = router(pool);
    let owner = unique_owner("recent");

    let mut ids = Vec::new();
    for content in ["first", "second"] {
        let (_, body) = send(
            &app,
            "POST",
            "/courses",
            Some(&owner),
            Some(json!({ "ContentId": content, "TimeTrack": 0, "Done": false })),
        )
        .await?;
        ids.push(body["id"].as_str().unwrap_or_default().to_string());
    }

    let (_, body) = send(&app, "PATCH", &format!("/courses/{}", ids[0]), Some(&owner), Some(json!({ "TimeTrack": 30 }))).await?;
    assert_eq!(body["rowsAffected"], 1);

    let (status, rows) = send(&app, "GET", "/courses/recent", Some(&owner), None).await?;
    assert_eq!(status, StatusCode::OK);
    let rows = rows.as_array().cloned().unwrap_or_default();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["Id"], ids[0]);
    assert_eq!(rows[1]["Id"], ids[1]);

    let stamps = rows
        .iter()
        .map(|row| chrono::DateTime::parse_from_rfc3339(row["UpdatedAt"].as_str().unwrap_or_default()))
        .collect::<Result<Vec<_>, _>>()?;
    assert!(stamps.windows(2).all(|pair| pair[0] >= pair[1]));
    Ok(())
}

#[tokio::test]
async fn concurrent_creates_insert_one_row() -> Result<()> {
    let Some(pool) = test_pool().await else {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return Ok(());
    };
    let app = router(pool);
    let owner = unique_owner("race");
    let course = json!({ "ContentId": "contended", "TimeTrack": 0, "Done": false });

    let results = futures::future::join_all(
        (0..8).map(|_| send(&app, "POST", "/courses", Some(&owner), Some(course.clone()))),
    )
    .await;

    let mut created = 0;
    for result in results {
        let (status, body) = result?;
        match status {
            StatusCode::OK => created += 1,
            _ => assert_eq!(body["code"], "CONFLICT"),
        }
    }
    assert_eq!(created, 1);

    let (_, rows) = send(&app, "GET", "/courses/contended", Some(&owner), None).await?;
    assert_eq!(rows.as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn recent_path_is_not_a_content_id() -> Result<()> {
    let app = router(lazy_pool());

    // Only the recent handler validates `size`
    let (status, body) = send(&app, "GET", "/courses/recent?size=many", Some("ada"), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid size parameter");
    Ok(())
}
