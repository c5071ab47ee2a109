use quantdesk_api::server::{AppState, build_router};
use quantdesk_core::common::time::RealTimeProvider;
use quantdesk_core::project::port::ProjectConfigStore;
use quantdesk_manager::project::ProjectService;
use quantdesk_store::project::FsProjectManager;
use quantdesk_store::project_config::JsonProjectConfigStore;
use quantdesk_store::scaffold::TemplateScaffolder;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Value, json};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

struct TestServer {
    base: String,
    root: PathBuf,
    client: reqwest::Client,
    _tmp: tempfile::TempDir,
}

impl TestServer {
    async fn post(&self, path: &str, body: Value) -> Value {
        self.client
            .post(format!("{}{}", self.base, path))
            .json(&body)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    async fn get(&self, path_and_query: &str) -> Value {
        self.client
            .get(format!("{}{}", self.base, path_and_query))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    async fn post_form(&self, path: &str, body: &str) -> Value {
        self.client
            .post(format!("{}{}", self.base, path))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body.to_string())
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }
}

// 帮助函数：在随机端口启动测试服务器，工作区根目录为临时目录
async fn spawn_test_server() -> TestServer {
    let _provider = rustls::crypto::ring::default_provider().install_default();

    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let root = tmp.path().to_path_buf();

    let config_store: Arc<dyn ProjectConfigStore> = Arc::new(JsonProjectConfigStore::new());
    let projects = Arc::new(FsProjectManager::new(&root, config_store.clone()));
    let scaffolder = Arc::new(TemplateScaffolder::new(&root, config_store.clone()));
    let project_service =
        ProjectService::new(config_store, projects, scaffolder, Arc::new(RealTimeProvider));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let router = build_router(AppState { project_service });

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestServer {
        base: format!("http://127.0.0.1:{}", port),
        root,
        client: reqwest::Client::new(),
        _tmp: tmp,
    }
}

async fn create(server: &TestServer, name: &str, language: &str) -> i64 {
    let res = server
        .post("/projects/create", json!({"name": name, "language": language}))
        .await;
    assert_eq!(res["success"], json!(true), "create failed: {}", res);
    res["projects"][0]["projectId"].as_i64().unwrap()
}

#[tokio::test]
async fn test_account_read_and_cors_headers() {
    let server = spawn_test_server().await;

    let res = server
        .client
        .post(format!("{}/account/read", server.base))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
    assert_eq!(
        res.headers().get("access-control-allow-methods").unwrap(),
        "*"
    );
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({"organizationId": "fake-organization-id", "creditBalance": 1000, "success": true})
    );

    let body = server
        .post("/account/read", json!({"organizationId": "org-42"}))
        .await;
    assert_eq!(body["organizationId"], json!("org-42"));
}

#[tokio::test]
async fn test_project_lifecycle() {
    let server = spawn_test_server().await;

    let empty = server.get("/projects/read").await;
    assert_eq!(empty, json!({"projects": [], "success": true}));

    let id = create(&server, "/Momentum", "Py").await;
    assert!(server.root.join("Momentum/main.py").is_file());

    let all = server.get("/projects/read").await;
    let projects = all["projects"].as_array().unwrap();
    assert_eq!(projects.len(), 1);
    let project = &projects[0];
    assert_eq!(project["projectId"], json!(id));
    assert_eq!(project["name"], json!("Momentum"));
    assert_eq!(project["language"], json!("Py"));
    assert_eq!(project["description"], json!(""));
    assert_eq!(project["organizationId"], json!("fake-organization-id"));
    assert_eq!(project["collaborators"][0]["owner"], json!(true));
    assert_eq!(project["leanVersionId"], json!(-1));
    assert_eq!(project["liveResults"]["eStatus"], json!("Undefined"));
    assert_eq!(project["libraries"], json!([]));

    let updated = server
        .post(
            "/projects/update",
            json!({
                "projectId": id,
                "description": "Trend following",
                "parameters": [{"key": "a", "value": "1"}, {"key": "b", "value": "2"}]
            }),
        )
        .await;
    assert_eq!(updated, json!({"success": true}));

    let single = server.get(&format!("/projects/read?projectId={}", id)).await;
    let project = &single["projects"][0];
    assert_eq!(project["description"], json!("Trend following"));
    assert_eq!(
        project["parameters"],
        json!([{"key": "a", "value": "1"}, {"key": "b", "value": "2"}])
    );

    server
        .post("/projects/update", json!({"projectId": id, "parameters": []}))
        .await;
    let single = server
        .post("/projects/read", json!({"projectId": id}))
        .await;
    assert_eq!(single["projects"][0]["parameters"], json!([]));
    assert_eq!(single["projects"][0]["description"], json!("Trend following"));

    let deleted = server
        .get(&format!("/projects/delete?projectId={}", id))
        .await;
    assert_eq!(deleted["success"], json!(true));
    assert!(!server.root.join("Momentum").exists());
}

#[tokio::test]
async fn test_form_encoded_update_and_rename() {
    let server = spawn_test_server().await;
    let id = create(&server, "Alpha", "C#").await;

    let res = server
        .post_form(
            "/projects/update",
            &format!(
                "projectId={}&parameters%5B0%5D%5Bkey%5D=period&parameters%5B0%5D%5Bvalue%5D=20&name=%2Farchive%2FAlpha2",
                id
            ),
        )
        .await;
    assert_eq!(res["success"], json!(true), "update failed: {}", res);

    assert!(!server.root.join("Alpha").exists());
    assert!(server.root.join("archive/Alpha2/Main.cs").is_file());

    let read = server.post("/projects/read", json!({"projectId": id})).await;
    let project = &read["projects"][0];
    assert_eq!(project["name"], json!("archive/Alpha2"));
    assert_eq!(project["language"], json!("C#"));
    assert_eq!(project["parameters"], json!([{"key": "period", "value": "20"}]));
}

#[tokio::test]
async fn test_rename_conflict_keeps_original() {
    let server = spawn_test_server().await;
    let alpha = create(&server, "Alpha", "Py").await;
    create(&server, "Beta", "Py").await;

    let res = server
        .post("/projects/update", json!({"projectId": alpha, "name": "Beta"}))
        .await;
    assert_eq!(res["success"], json!(false));
    assert_eq!(
        res["errors"],
        json!(["There already exists a project named 'Beta'"])
    );
    assert!(server.root.join("Alpha/main.py").is_file());
}

#[tokio::test]
async fn test_errors_use_envelope() {
    let server = spawn_test_server().await;

    let res = server.post("/projects/read", json!({"projectId": 7})).await;
    assert_eq!(res["success"], json!(false));
    assert_eq!(res["errors"], json!(["Project with id 7 not found"]));

    let res = server.get("/projects/delete?projectId=7").await;
    assert_eq!(res["success"], json!(false));

    let res = server.post("/projects/delete", json!({})).await;
    assert_eq!(res["success"], json!(false));
    assert!(!res["errors"].as_array().unwrap().is_empty());

    let res = server.post("/projects/create", json!({"name": "NoLanguage"})).await;
    assert_eq!(res["success"], json!(false));
    assert!(!server.root.join("NoLanguage").exists());
}

#[tokio::test]
async fn test_invalid_stored_language_is_reported() {
    let server = spawn_test_server().await;
    let dir = server.root.join("Broken");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.json"), r#"{"language": "FSharp"}"#).unwrap();

    let res = server.get("/projects/read").await;
    assert_eq!(res["success"], json!(false));
    assert!(res["errors"][0].as_str().unwrap().contains("FSharp"));
}

#[tokio::test]
async fn test_unmatched_requests_use_envelope() {
    let server = spawn_test_server().await;

    let res = server
        .client
        .get(format!("{}/account/read", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["errors"],
        json!(["Method GET is not allowed for '/account/read'"])
    );

    let res = server
        .client
        .post(format!("{}/projects/nope", server.base))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
    assert_eq!(
        res.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({"errors": ["Unknown endpoint '/projects/nope'"], "success": false})
    );
}

#[tokio::test]
async fn test_parameters_keep_request_order() {
    let server = spawn_test_server().await;
    let id = create(&server, "Ordered", "Py").await;

    server
        .post(
            "/projects/update",
            json!({
                "projectId": id,
                "parameters": [{"key": "z", "value": "1"}, {"key": "a", "value": "2"}]
            }),
        )
        .await;

    let read = server.post("/projects/read", json!({"projectId": id})).await;
    assert_eq!(
        read["projects"][0]["parameters"],
        json!([{"key": "z", "value": "1"}, {"key": "a", "value": "2"}])
    );
}

#[tokio::test]
async fn test_project_under_hidden_directory_is_listed() {
    let server = spawn_test_server().await;
    let id = create(&server, ".drafts/Alpha", "Py").await;

    let read = server.post("/projects/read", json!({"projectId": id})).await;
    assert_eq!(read["projects"][0]["name"], json!(".drafts/Alpha"));

    let all = server.get("/projects/read").await;
    assert_eq!(all["projects"].as_array().unwrap().len(), 1);
}
