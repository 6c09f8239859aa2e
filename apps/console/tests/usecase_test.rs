//! ユースケースの統合テスト
//!
//! 実際の `ApiClient` を wiremock のモックサーバーに向け、
//! トークンの保存・破棄と画面状態の組み立てを確認する。

use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use wavvy_console::{
    client::{ApiClient, WavvyClient},
    config::ConsoleConfig,
    usecase::{
        AuthUseCaseImpl,
        DashboardStats,
        DashboardUseCaseImpl,
        SessionError,
        SessionUseCaseImpl,
        SignUpResult,
        StatsUseCaseImpl,
        UsersUseCaseImpl,
        ViewError,
        ViewState,
    },
};
use wavvy_domain::{
    access::AccessPolicy,
    clock::FixedClock,
    credentials::PlainPassword,
    stats::StatType,
    time_window::TimeWindow,
};
use wavvy_infra::{MemoryTokenStore, TokenStore};
use wiremock::{
    Mock,
    MockServer,
    ResponseTemplate,
    matchers::{body_json, body_string_contains, header, method, path, query_param},
};

// ===== ヘルパー =====

fn client_for(server: &MockServer) -> Arc<dyn WavvyClient> {
    Arc::new(ApiClient::new(&server.uri()))
}

/// モックサーバーを向いた設定（クライアント ID は任意）
fn config_for(server: &MockServer, client_id: Option<&str>) -> ConsoleConfig {
    let mut env = HashMap::from([("WAVVY_API_BASE", server.uri())]);
    if let Some(id) = client_id {
        env.insert("WAVVY_CLIENT_ID", id.to_string());
    }
    ConsoleConfig::from_lookup(|key| env.get(key).cloned()).unwrap()
}

async fn saved_token(tokens: &MemoryTokenStore) -> Option<String> {
    tokens.read().await.unwrap()
}

// ===== 認証 =====

#[tokio::test]
async fn test_ログイン成功でトークンを保存する() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token/"))
        .and(body_string_contains("client_id=console-app"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"token": {"access_token": "tok-1"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::new());
    let sut = AuthUseCaseImpl::new(
        client_for(&server),
        tokens.clone(),
        config_for(&server, Some("console-app")),
    );

    sut.login("admin@example.com", PlainPassword::new("pw"))
        .await
        .unwrap();

    assert_eq!(saved_token(&tokens).await.as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn test_ログイン失敗はサーバーのdetailを表示する() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"detail": "Bad credentials"})))
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::new());
    let sut = AuthUseCaseImpl::new(client_for(&server), tokens.clone(), config_for(&server, Some("c")));

    let err = sut
        .login("admin@example.com", PlainPassword::new("wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Bad credentials");
    assert_eq!(saved_token(&tokens).await, None);
}

#[tokio::test]
async fn test_ログイン応答にトークンがなければ失敗する() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token_type": "bearer"})))
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::new());
    let sut = AuthUseCaseImpl::new(client_for(&server), tokens.clone(), config_for(&server, Some("c")));

    let err = sut
        .login("admin", PlainPassword::new("pw"))
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Login succeeded but no access token was found in the response."
    );
    assert_eq!(saved_token(&tokens).await, None);
}

#[tokio::test]
async fn test_サインアップ応答にトークンがあればログイン済みになる() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/users/"))
        .and(body_json(json!({
            "email": "new@example.com",
            "password": "Secret123",
            "full_name": "New User",
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"token": {"access_token": "tok-2"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::new());
    let sut = AuthUseCaseImpl::new(client_for(&server), tokens.clone(), config_for(&server, None));

    let result = sut
        .signup(
            "new@example.com",
            PlainPassword::new("Secret123"),
            Some("  New User "),
        )
        .await
        .unwrap();

    assert_eq!(result, SignUpResult::SignedIn);
    assert_eq!(saved_token(&tokens).await.as_deref(), Some("tok-2"));
}

#[tokio::test]
async fn test_サインアップ応答にトークンがなければ作成のみ() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/users/"))
        .and(body_json(json!({"email": "new@example.com", "password": "Secret123"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9})))
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::new());
    let sut = AuthUseCaseImpl::new(client_for(&server), tokens.clone(), config_for(&server, None));

    let result = sut
        .signup("new@example.com", PlainPassword::new("Secret123"), Some("   "))
        .await
        .unwrap();

    assert_eq!(result, SignUpResult::Created);
    assert_eq!(saved_token(&tokens).await, None);
}

#[tokio::test]
async fn test_サインアップ失敗はフィールドエラーを表示する() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/users/"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"email": ["user with this email already exists."]})),
        )
        .mount(&server)
        .await;

    let sut = AuthUseCaseImpl::new(
        client_for(&server),
        Arc::new(MemoryTokenStore::new()),
        config_for(&server, None),
    );

    let err = sut
        .signup("dup@example.com", PlainPassword::new("Secret123"), None)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "user with this email already exists.");
}

#[tokio::test]
async fn test_パスワード再設定はトークンと新しいパスワードを送る() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/users/reset-password"))
        .and(body_json(json!({"token": "reset-abc", "password": "Secret123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/users/forgot-password"))
        .and(body_json(json!({"email": "a@example.com"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let sut = AuthUseCaseImpl::new(
        client_for(&server),
        Arc::new(MemoryTokenStore::new()),
        config_for(&server, None),
    );

    sut.forgot_password("a@example.com").await.unwrap();
    sut.reset_password(
        " reset-abc ",
        PlainPassword::new("Secret123"),
        &PlainPassword::new("Secret123"),
    )
    .await
    .unwrap();
}

// ===== 認証ガード =====

#[tokio::test]
async fn test_有効なトークンならセッションを返す() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/me/"))
        .and(header("authorization", "Bearer good"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 1, "email": "admin@example.com", "role": "A"})),
        )
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::with_token("good"));
    let sut = SessionUseCaseImpl::new(client_for(&server), tokens.clone(), AccessPolicy::AdminOnly);

    let session = sut.require_admin_session().await.unwrap();

    assert_eq!(session.token, "good");
    assert_eq!(session.user.email.as_deref(), Some("admin@example.com"));
    assert_eq!(saved_token(&tokens).await.as_deref(), Some("good"));
}

#[tokio::test]
async fn test_401ならトークンを破棄する() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/me/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::with_token("stale"));
    let sut = SessionUseCaseImpl::new(
        client_for(&server),
        tokens.clone(),
        AccessPolicy::AnyAuthenticated,
    );

    let err = sut.require_admin_session().await.unwrap_err();

    assert!(matches!(err, SessionError::SessionRejected { status: 401 }));
    assert_eq!(saved_token(&tokens).await, None);
}

#[tokio::test]
async fn test_通信エラーではトークンを保持する() {
    let tokens = Arc::new(MemoryTokenStore::with_token("keep-me"));
    let sut = SessionUseCaseImpl::new(
        Arc::new(ApiClient::new("http://127.0.0.1:1")),
        tokens.clone(),
        AccessPolicy::AnyAuthenticated,
    );

    let err = sut.require_admin_session().await.unwrap_err();

    assert!(matches!(err, SessionError::Transport(_)));
    assert_eq!(saved_token(&tokens).await.as_deref(), Some("keep-me"));
}

// ===== ダッシュボード =====

#[tokio::test]
async fn test_ダッシュボードは期間内のユーザーを集計する() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/"))
        .and(query_param("page", "1"))
        .and(query_param("page_size", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 57,
            "next": "page=3",
            "previous": "page=1",
            "results": [
                {"id": 1, "role": "A", "verified": true, "date_joined": "2024-01-01T00:00:00Z"},
                {"id": 2, "role": "N", "verified": false, "date_joined": "2024-06-01T00:00:00Z"},
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/activities/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 10, "action": "login", "actor": "ada"}
        ])))
        .mount(&server)
        .await;

    let now = Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap();
    let sut = DashboardUseCaseImpl::new(
        client_for(&server),
        Arc::new(MemoryTokenStore::with_token("t")),
        Arc::new(FixedClock::new(now)),
    );

    let view = sut.load("t", TimeWindow::Last7Days).await;

    assert_eq!(
        view.stats,
        DashboardStats {
            total_all: Some(57),
            total_in_range: 1,
            admins: 0,
            verified: 0,
        }
    );
    // 最近のユーザーは期間で絞らず、参加日時の新しい順
    let recent_ids: Vec<String> = view
        .recent_users
        .ready()
        .unwrap()
        .iter()
        .map(|u| u.id.as_ref().unwrap().to_string())
        .collect();
    assert_eq!(recent_ids, vec!["2".to_string(), "1".to_string()]);
    assert_eq!(view.activities.ready().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_全期間の統計はオブジェクトでないアイテムも数える() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}, 5, null])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/activities/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let sut = DashboardUseCaseImpl::new(
        client_for(&server),
        Arc::new(MemoryTokenStore::with_token("t")),
        Arc::new(FixedClock::new(Utc::now())),
    );

    let view = sut.load("t", TimeWindow::AllTime).await;

    assert_eq!(view.stats.total_in_range, 3);
    assert_eq!(view.stats.total_all, Some(3));
    // 最近のユーザーにはオブジェクトのアイテムだけが並ぶ
    assert_eq!(view.recent_users.ready().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_片方の一覧の失敗はもう片方に影響しない() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/activities/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::with_token("t"));
    let sut = DashboardUseCaseImpl::new(
        client_for(&server),
        tokens.clone(),
        Arc::new(FixedClock::new(Utc::now())),
    );

    let view = sut.load("t", TimeWindow::AllTime).await;

    assert_eq!(
        view.recent_users,
        ViewState::Failed("Failed to load users (500).".to_string())
    );
    assert_eq!(view.activities, ViewState::Empty);
    assert_eq!(view.stats, DashboardStats::default());
    assert_eq!(saved_token(&tokens).await.as_deref(), Some("t"));
}

// ===== ユーザー一覧 =====

#[tokio::test]
async fn test_ユーザー一覧の403はトークンを破棄する() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"detail": "forbidden"})))
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::with_token("t"));
    let sut = UsersUseCaseImpl::new(client_for(&server), tokens.clone());

    let err = sut.load("t", 1).await.unwrap_err();

    assert!(matches!(&err, ViewError::Unauthorized(_)));
    assert_eq!(err.to_string(), "Not allowed to list users.");
    assert_eq!(saved_token(&tokens).await, None);
}

#[tokio::test]
async fn test_ユーザー一覧の取得失敗は汎用メッセージになる() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "db down"})))
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::with_token("t"));
    let sut = UsersUseCaseImpl::new(client_for(&server), tokens.clone());

    let state = sut.select_page("t", 2).await;

    assert_eq!(
        state,
        Some(ViewState::Failed("Failed to load users.".to_string()))
    );
    assert_eq!(saved_token(&tokens).await.as_deref(), Some("t"));
}

#[tokio::test]
async fn test_追い越されたページの応答は破棄する() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"count": 30, "results": [{"id": 13}]}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/"))
        .and(query_param("page", "3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"count": 30, "results": [{"id": 25}]})),
        )
        .mount(&server)
        .await;

    let sut = UsersUseCaseImpl::new(client_for(&server), Arc::new(MemoryTokenStore::new()));

    let (slow, fast) = tokio::join!(sut.select_page("t", 2), sut.select_page("t", 3));

    assert_eq!(slow, None);
    assert!(fast.is_some());
    let current = sut.current();
    let page = current.ready().unwrap();
    assert_eq!(page.page, 3);
    assert_eq!(page.total_pages(), 3);
}

// ===== 統計 =====

#[tokio::test]
async fn test_グループ別統計の失敗は画面を失敗にしない() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/stats/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"total_users": 4, "verified_users": 1, "admin_users": 1})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/stats/day"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let sut = StatsUseCaseImpl::new(client_for(&server), Arc::new(MemoryTokenStore::new()));

    let view = sut.load("t", StatType::Day).await.unwrap();

    assert_eq!(view.stats.total(), 4);
    assert_eq!(view.verification_rate_label().as_deref(), Some("25.0%"));
    assert_eq!(view.grouped, None);
}

#[tokio::test]
async fn test_全体統計の失敗はステータス付きで表示する() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/stats/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/stats/month"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let sut = StatsUseCaseImpl::new(client_for(&server), Arc::new(MemoryTokenStore::new()));

    let err = sut.load("t", StatType::Month).await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to load statistics (503).");
    assert!(!err.requires_login());
}
