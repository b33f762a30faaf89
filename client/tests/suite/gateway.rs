#![allow(clippy::unwrap_used)]
use dossier_client::Client;
use dossier_client::ClientConfig;
use dossier_client::ClientError;
use dossier_protocol::records::CaseFileQuery;
use dossier_protocol::records::SearchQuery;
use dossier_protocol::records::TaskStatus;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_string;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::matchers::query_param;

fn test_client(server: &MockServer) -> Client {
    let config = ClientConfig::new(&format!("{}/api", server.uri())).unwrap();
    Client::new(config).unwrap()
}

#[tokio::test]
async fn import_tasks_unwrap_the_envelope() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/case-file/import-tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errorCode": 200,
            "message": "ok",
            "data": [{
                "id": 12,
                "taskName": "evening batch",
                "totalFiles": 40,
                "successFiles": 38,
                "failedFiles": 2,
                "status": "completed",
                "createdAt": "2024-01-15T10:30:00"
            }]
        })))
        .mount(&server)
        .await;

    let tasks = test_client(&server).list_import_tasks().await?;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].task_name.as_deref(), Some("evening batch"));
    assert_eq!(tasks[0].status, TaskStatus::Completed);
    Ok(())
}

#[tokio::test]
async fn non_success_error_code_becomes_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/case-file/import-tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errorCode": 5001,
            "message": "task not found"
        })))
        .mount(&server)
        .await;

    let result = test_client(&server).list_import_tasks().await;
    match result {
        Err(ClientError::Api { code, message }) => {
            assert_eq!(code, 5001);
            assert_eq!(message, "task not found");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn list_sends_snake_case_query_and_reads_the_page_block() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/case-file/list"))
        .and(query_param("keyword", "transfer"))
        .and(query_param("page", "2"))
        .and(query_param("page_size", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errorCode": 200,
            "message": "ok",
            "data": [{
                "id": 3,
                "caseNo": "AJ-2023-0117",
                "title": "Equipment transfer record",
                "fileSize": 482133,
                "tags": ["equipment"]
            }],
            "page": {"total": 41, "page": 2, "pageSize": 20}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = CaseFileQuery {
        keyword: Some("transfer".to_string()),
        page: Some(2),
        page_size: Some(20),
        ..CaseFileQuery::default()
    };
    let listing = test_client(&server).list_case_files(&query).await?;
    assert_eq!(listing.items.len(), 1);
    assert_eq!(listing.items[0].case_no.as_deref(), Some("AJ-2023-0117"));
    assert_eq!(listing.page.map(|page| page.total), Some(41));
    Ok(())
}

#[tokio::test]
async fn detail_fetch_decodes_the_flattened_record() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/case-file/detail/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errorCode": 200,
            "message": "ok",
            "data": {
                "id": 3,
                "title": "Equipment transfer record",
                "ocrText": "Transferred 12 crates...",
                "classification": "internal",
                "timeline": [{"date": "2023-06-01", "event": "filed"}]
            }
        })))
        .mount(&server)
        .await;

    let detail = test_client(&server).case_file_detail(3).await?;
    assert_eq!(
        detail.summary.title.as_deref(),
        Some("Equipment transfer record")
    );
    assert_eq!(detail.ocr_text.as_deref(), Some("Transferred 12 crates..."));
    assert_eq!(detail.timeline.len(), 1);
    Ok(())
}

#[tokio::test]
async fn search_sends_query_string_parameters_with_an_empty_body() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/case-file/search"))
        .and(query_param("keyword", "装备"))
        .and(query_param("search_mode", "exact"))
        .and(query_param("page", "1"))
        .and(body_string(""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errorCode": 200,
            "message": "ok",
            "data": [{
                "id": 9,
                "caseNo": "AJ-2023-0009",
                "title": "装备移交记录",
                "relevance": 2,
                "relevanceScore": "80%",
                "fragments": ["…装备…"]
            }],
            "page": {"total": 1, "page": 1, "pageSize": 10},
            "meta": {"took": 3, "keyword": "装备"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = SearchQuery {
        keyword: "装备".to_string(),
        search_mode: Some("exact".to_string()),
        page: Some(1),
        ..SearchQuery::default()
    };
    let results = test_client(&server).search_case_files(&query).await?;
    assert_eq!(results.hits.len(), 1);
    assert_eq!(results.hits[0].relevance, Some(2));
    assert_eq!(results.hits[0].relevance_score.as_deref(), Some("80%"));
    assert_eq!(results.meta.took, Some(3.0));
    assert_eq!(results.meta.keyword.as_deref(), Some("装备"));
    Ok(())
}

#[tokio::test]
async fn delete_resolves_on_a_success_envelope() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/case-file/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errorCode": 200,
            "message": "deleted",
            "data": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server).delete_case_file(9).await?;
    Ok(())
}

#[tokio::test]
async fn http_404_maps_to_the_fixed_user_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/case-file/detail/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "no such file"})))
        .mount(&server)
        .await;

    let err = test_client(&server).case_file_detail(404).await.unwrap_err();
    // The raw error keeps the server detail; the presentation layer uses
    // the fixed wording.
    assert_eq!(err.user_message(), "The requested resource does not exist");
    assert!(!err.is_auth_expired());
}

#[tokio::test]
async fn http_401_is_flagged_so_callers_clear_stored_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/case-file/import-tasks"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .mount(&server)
        .await;

    let err = test_client(&server).list_import_tasks().await.unwrap_err();
    assert!(err.is_auth_expired());
    assert_eq!(err.user_message(), "Session expired, please sign in again");
}
