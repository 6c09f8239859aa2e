//! # 認証系エンドポイント
//!
//! ## エンドポイント
//!
//! - `POST /auth/token/` - OAuth2 パスワードグラントによるトークン発行
//! - `POST /api/v1/users/` - サインアップ
//! - `POST /api/v1/users/forgot-password` - パスワード再設定メールの送信
//! - `POST /api/v1/users/reset-password` - パスワード再設定
//!
//! トークン発行とサインアップの応答は、サーバーのバージョンによって
//! トークンの置き場所が異なる。[`login_token`] と [`signup_token`] が
//! 既知の置き場所を順に探す。

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Value, json};

use super::{
    api_client::{ApiClient, ApiReply, RequestBody},
    error::ApiError,
};

const TOKEN_PATH: &str = "/auth/token/";
const SIGNUP_PATH: &str = "/api/v1/users/";
const FORGOT_PASSWORD_PATH: &str = "/api/v1/users/forgot-password";
const RESET_PASSWORD_PATH: &str = "/api/v1/users/reset-password";

/// サインアップリクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

impl SignUpRequest {
    /// JSON ボディを組み立てる
    ///
    /// `full_name` は前後の空白を除いて空でない場合だけ含める。
    pub fn to_body(&self) -> Value {
        let mut body = json!({
            "email": self.email,
            "password": self.password,
        });
        if let Some(name) = self.full_name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            body["full_name"] = Value::String(name.to_string());
        }
        body
    }
}

/// 認証系エンドポイントのクライアントトレイト
#[async_trait]
pub trait WavvyAuthClient: Send + Sync {
    /// パスワードグラントでトークンを発行する
    ///
    /// `POST /auth/token/` をフォームエンコードで呼び出す。
    async fn request_token(
        &self,
        username: &str,
        password: &str,
        client_id: &str,
    ) -> Result<ApiReply, ApiError>;

    /// アカウントを作成する
    async fn sign_up(&self, request: &SignUpRequest) -> Result<ApiReply, ApiError>;

    /// パスワード再設定メールの送信を依頼する
    async fn forgot_password(&self, email: &str) -> Result<ApiReply, ApiError>;

    /// 再設定トークンを使ってパスワードを変更する
    async fn reset_password(&self, token: &str, password: &str) -> Result<ApiReply, ApiError>;
}

#[async_trait]
impl WavvyAuthClient for ApiClient {
    async fn request_token(
        &self,
        username: &str,
        password: &str,
        client_id: &str,
    ) -> Result<ApiReply, ApiError> {
        let form = vec![
            ("grant_type".to_string(), "password".to_string()),
            ("username".to_string(), username.to_string()),
            ("password".to_string(), password.to_string()),
            ("client_id".to_string(), client_id.to_string()),
        ];
        self.request(Method::POST, TOKEN_PATH, RequestBody::Form(form), None)
            .await
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<ApiReply, ApiError> {
        self.request(
            Method::POST,
            SIGNUP_PATH,
            RequestBody::Json(request.to_body()),
            None,
        )
        .await
    }

    async fn forgot_password(&self, email: &str) -> Result<ApiReply, ApiError> {
        let body = json!({ "email": email });
        self.request(
            Method::POST,
            FORGOT_PASSWORD_PATH,
            RequestBody::Json(body),
            None,
        )
        .await
    }

    async fn reset_password(&self, token: &str, password: &str) -> Result<ApiReply, ApiError> {
        let body = json!({ "token": token, "password": password });
        self.request(
            Method::POST,
            RESET_PASSWORD_PATH,
            RequestBody::Json(body),
            None,
        )
        .await
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// トークン発行応答からアクセストークンを取り出す
///
/// `access_token` → `token.access_token` → `token`（文字列）の順に探す。
pub fn login_token(data: &Value) -> Option<String> {
    non_empty_str(data.get("access_token"))
        .or_else(|| non_empty_str(data.pointer("/token/access_token")))
        .or_else(|| non_empty_str(data.get("token")))
}

/// サインアップ応答からアクセストークンを取り出す
///
/// `token.access_token` → `access_token` → `token.token` の順に探す。
pub fn signup_token(data: &Value) -> Option<String> {
    non_empty_str(data.pointer("/token/access_token"))
        .or_else(|| non_empty_str(data.get("access_token")))
        .or_else(|| non_empty_str(data.pointer("/token/token")))
}
