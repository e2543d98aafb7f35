use chatbot_analyzer::config::Config;
use chatbot_analyzer::error::{ApiError, AppError};
use chatbot_analyzer::models::{AnalysisResponse, HotelForm};
use chatbot_analyzer::services::{load_results, HotelService, QuestionService};
use chatbot_analyzer::workflow::{BatchError, BatchRequest};
use chatbot_analyzer::{ApiClient, App, RunOptions};
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer, dir: &Path) -> Config {
    Config {
        api_base_url: format!("{}/api", server.uri()),
        batch_size: 4,
        batch_timeout_secs: 1,
        output_dir: dir.join("output").display().to_string(),
        transcript_file: dir.join("transcript.txt").display().to_string(),
        ..Config::default()
    }
}

fn answers(timestamp: &str, hotels: &[&str], questions: &[&str]) -> serde_json::Value {
    let results: Vec<_> = hotels
        .iter()
        .flat_map(|h| {
            questions.iter().map(move |q| {
                json!({
                    "hotel": h,
                    "question": q,
                    "response": format!("{h} says hi"),
                    "status": "success"
                })
            })
        })
        .collect();
    json!({ "timestamp": timestamp, "results": results })
}

async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/questions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "questions": ["q1", "q2"] })),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/hotels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hotels": [
                { "name": "A", "company_id": "1" },
                { "name": "B", "company_id": "2" },
                { "name": "C", "company_id": "3" }
            ]
        })))
        .mount(server)
        .await;
}

fn all_options() -> RunOptions {
    RunOptions {
        all_questions: true,
        all_hotels: true,
        ..RunOptions::default()
    }
}

#[tokio::test]
async fn test_list_questions_and_hotels() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_catalog(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/admin/hotels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hotels": [
                { "name": "A", "company_id": "1", "payload": { "lang": "fr" } }
            ]
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(&test_config(&server, dir.path())).unwrap();
    assert_eq!(client.get_questions().await.unwrap(), vec!["q1", "q2"]);

    let hotels = client.get_hotels().await.unwrap();
    assert_eq!(hotels.len(), 3);
    assert!(hotels[0].payload.is_null());

    let admin = HotelService::new(client).list().await.unwrap();
    assert_eq!(admin[0].payload["lang"], "fr");
}

#[tokio::test]
async fn test_add_duplicate_question_reports_server_message() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/admin/questions"))
        .and(body_json(json!({ "question": "Parking?" })))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "error": "Question already exists" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let service = QuestionService::new(ApiClient::new(&test_config(&server, dir.path())).unwrap());
    let err = service.add("  Parking?  ").await.unwrap_err();

    match err {
        AppError::Api(ApiError::BadResponse {
            status, message, ..
        }) => {
            assert_eq!(status, 409);
            assert_eq!(message.as_deref(), Some("Question already exists"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_hotel_name_is_encoded_in_path() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("DELETE"))
        .and(path("/api/admin/hotels/Hotel%20Sol"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/admin/hotels/Hotel%20Sol"))
        .and(body_json(json!({
            "name": "Hotel Sol Playa",
            "company_id": "7",
            "payload": { "lang": "es" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let service = HotelService::new(ApiClient::new(&test_config(&server, dir.path())).unwrap());
    let form = HotelForm {
        name: "Hotel Sol Playa".to_string(),
        company_id: " 7 ".to_string(),
        payload: r#"{"lang": "es"}"#.to_string(),
    };
    service.update("Hotel Sol", &form).await.unwrap();
    service.delete("Hotel Sol").await.unwrap();
}

#[tokio::test]
async fn test_invalid_hotel_payload_sends_nothing() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/admin/hotels"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let service = HotelService::new(ApiClient::new(&test_config(&server, dir.path())).unwrap());
    let form = HotelForm {
        name: "Hotel Luna".to_string(),
        company_id: "9".to_string(),
        payload: "{not json".to_string(),
    };
    assert!(matches!(service.add(&form).await, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_ask_sends_distinct_questions_and_hotels() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/ask"))
        .and(body_json(json!({ "questions": ["q1", "q2"], "hotels": ["A"] })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(answers("20240101_120000", &["A"], &["q1", "q2"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&test_config(&server, dir.path())).unwrap();
    let request = BatchRequest {
        questions: vec!["q1".to_string(), "q2".to_string()],
        hotels: vec!["A".to_string()],
    };
    let response: AnalysisResponse = client.ask(&request).await.unwrap();
    assert_eq!(response.timestamp, "20240101_120000");
    assert_eq!(response.results.len(), 2);
}

#[tokio::test]
async fn test_run_analysis_two_batches() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_catalog(&server).await;

    // 2 个问题 x 3 个酒店，每批 4 个组合：A、B 一批，C 一批
    Mock::given(method("POST"))
        .and(path("/api/ask"))
        .and(body_json(json!({ "questions": ["q1", "q2"], "hotels": ["A", "B"] })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(answers("20240101_120000", &["A", "B"], &["q1", "q2"])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/ask"))
        .and(body_json(json!({ "questions": ["q1", "q2"], "hotels": ["C"] })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(answers("20240101_120500", &["C"], &["q1", "q2"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let app = App::initialize(test_config(&server, dir.path())).unwrap();
    let summary = app.run_analysis(&all_options()).await.unwrap();

    assert!(summary.outcome.is_completed());
    assert_eq!(summary.total_combinations, 6);

    let response = summary.outcome.response();
    assert_eq!(response.timestamp, "20240101_120000");
    let hotels: Vec<_> = response.results.iter().map(|r| r.hotel.as_str()).collect();
    assert_eq!(hotels, vec!["A", "A", "B", "B", "C", "C"]);

    assert!(summary.results_path.ends_with("analysis_20240101_120000.json"));
    let saved = load_results(&summary.results_path).await.unwrap();
    assert_eq!(&saved, response);

    let transcript = tokio::fs::read_to_string(dir.path().join("transcript.txt"))
        .await
        .unwrap();
    assert!(transcript.contains("--- 第 2 批 ---"));
    assert!(transcript.contains("酒店 C | 问题 q2 | 成功"));
}

#[tokio::test]
async fn test_run_analysis_uneven_windows_cover_every_pair() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_catalog(&server).await;

    // 每批 3 个组合: [A-q1, A-q2, B-q1] 与 [B-q2, C-q1, C-q2]，后端每批都会多展开一个组合
    Mock::given(method("POST"))
        .and(path("/api/ask"))
        .and(body_json(json!({ "questions": ["q1", "q2"], "hotels": ["A", "B"] })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(answers("20240101_120000", &["A", "B"], &["q1", "q2"])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/ask"))
        .and(body_json(json!({ "questions": ["q2", "q1"], "hotels": ["B", "C"] })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(answers("20240101_120500", &["B", "C"], &["q2", "q1"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let app = App::initialize(test_config(&server, dir.path())).unwrap();
    let options = RunOptions {
        batch_size: Some(3),
        ..all_options()
    };
    let summary = app.run_analysis(&options).await.unwrap();
    assert!(summary.outcome.is_completed());

    let saved = load_results(&summary.results_path).await.unwrap();
    let mut pairs: Vec<(String, String)> = saved
        .results
        .iter()
        .map(|r| (r.hotel.clone(), r.question.clone()))
        .collect();
    pairs.sort();
    let expected: Vec<(String, String)> = ["A", "B", "C"]
        .iter()
        .flat_map(|h| ["q1", "q2"].iter().map(move |q| (h.to_string(), q.to_string())))
        .collect();
    assert_eq!(pairs, expected);

    // 对话记录与保存的结果一致
    let transcript = tokio::fs::read_to_string(dir.path().join("transcript.txt"))
        .await
        .unwrap();
    assert_eq!(transcript.matches("酒店 ").count(), 6);
    assert_eq!(transcript.matches("酒店 B |").count(), 2);
}

#[tokio::test]
async fn test_run_analysis_keeps_partial_results_on_failure() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_catalog(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/ask"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(answers("20240101_120000", &["A", "B"], &["q1", "q2"])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/ask"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "chatbot down" })))
        .mount(&server)
        .await;

    let app = App::initialize(test_config(&server, dir.path())).unwrap();
    let summary = app.run_analysis(&all_options()).await.unwrap();

    assert!(!summary.outcome.is_completed());
    let err = summary.outcome.error().unwrap();
    assert_eq!(err.batch_index(), 2);
    assert!(matches!(err, BatchError::Request { .. }));

    // 失败前收到的结果照常保存
    let saved = load_results(&summary.results_path).await.unwrap();
    assert_eq!(saved.results.len(), 4);
    assert!(summary.report_path.is_none());
}

#[tokio::test]
async fn test_run_analysis_batch_timeout() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_catalog(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/ask"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(answers("20240101_120000", &["A"], &["q1"]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let app = App::initialize(test_config(&server, dir.path())).unwrap();
    let summary = app.run_analysis(&all_options()).await.unwrap();

    let err = summary.outcome.error().unwrap();
    assert!(err.is_timeout());
    assert_eq!(err.batch_index(), 1);
    assert!(summary.outcome.response().results.is_empty());
}

#[tokio::test]
async fn test_run_analysis_rejects_unknown_hotel() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_catalog(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/ask"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = App::initialize(test_config(&server, dir.path())).unwrap();
    let options = RunOptions {
        all_questions: true,
        hotels: vec!["Nowhere Inn".to_string()],
        ..RunOptions::default()
    };
    assert!(app.run_analysis(&options).await.is_err());
}

#[tokio::test]
async fn test_run_with_report_download() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_catalog(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/ask"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(answers("20240101_120000", &["A"], &["q1"])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/report"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04xlsx".to_vec()))
        .expect(2)
        .mount(&server)
        .await;

    let app = App::initialize(test_config(&server, dir.path())).unwrap();
    let options = RunOptions {
        questions: vec!["q1".to_string()],
        hotels: vec!["A".to_string()],
        report: true,
        ..RunOptions::default()
    };
    let summary = app.run_analysis(&options).await.unwrap();

    let report_path = summary.report_path.unwrap();
    assert!(report_path.ends_with("report_20240101_120000.xlsx"));
    let bytes = tokio::fs::read(&report_path).await.unwrap();
    assert!(bytes.starts_with(b"PK"));

    // 从已保存的结果重新导出
    let again = app.export_report(&summary.results_path).await.unwrap();
    assert_eq!(again, report_path);
}
