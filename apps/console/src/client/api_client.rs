//! # 認証付きリクエスト
//!
//! すべてのエンドポイント呼び出しが通る汎用リクエスト関数と、その応答型。
//!
//! ## リクエストの組み立て
//!
//! - URL: ベース URL の末尾 `/` を除き、パスとの間に `/` をちょうど 1 つ挟む
//! - Content-Type: マルチパート以外は `application/json`
//!   （トークンエンドポイント用のフォームボディは `application/x-www-form-urlencoded`）
//! - Authorization: 空でないトークンがあるときだけ `Bearer <token>` を付ける
//!
//! ## 応答の扱い
//!
//! ボディは JSON として読めれば `data` に入り、読めなければ `None`。
//! ステータスによる成否は [`ApiReply::outcome`] で分類する。

use reqwest::{Method, StatusCode, header::CONTENT_TYPE};
use serde_json::Value;
use wavvy_shared::{ListResponse, error_detail, normalize};

use super::error::ApiError;

/// リクエストボディ
#[derive(Debug, Default)]
pub enum RequestBody {
    /// ボディなし（Content-Type は JSON として送る）
    #[default]
    Empty,
    /// JSON ボディ
    Json(Value),
    /// フォームエンコードボディ（OAuth2 トークンエンドポイント専用）
    Form(Vec<(String, String)>),
    /// マルチパートボディ（Content-Type と境界は reqwest に任せる）
    Multipart(reqwest::multipart::Form),
}

/// API 応答
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    /// ステータスが 2xx か
    pub ok: bool,
    pub status: u16,
    /// JSON として解釈できたボディ
    pub data: Option<Value>,
}

/// 応答の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 2xx
    Success,
    /// 401 / 403。呼び出し側は保存済みトークンを破棄する
    Unauthorized,
    /// その他の非 2xx。トークンは保持したまま、画面内にエラーを表示する
    Failed,
}

impl ApiReply {
    /// HTTP レスポンスから応答を組み立てる
    ///
    /// ボディの読み取りや JSON 解釈に失敗しても `data = None` として扱い、
    /// エラーにはしない。
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let data = match response.bytes().await {
            Ok(bytes) => serde_json::from_slice::<Value>(&bytes).ok(),
            Err(e) => {
                tracing::debug!(error = %e, "レスポンスボディの読み取りに失敗しました");
                None
            }
        };

        Self {
            ok: status.is_success(),
            status: status.as_u16(),
            data,
        }
    }

    pub fn outcome(&self) -> Outcome {
        if self.ok {
            return Outcome::Success;
        }
        match StatusCode::from_u16(self.status) {
            Ok(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => Outcome::Unauthorized,
            _ => Outcome::Failed,
        }
    }

    /// エラー応答からユーザー向けのメッセージを取り出す
    pub fn error_detail(&self) -> Option<String> {
        self.data.as_ref().and_then(error_detail)
    }

    /// ボディを一覧レスポンスとして正規化する
    ///
    /// ボディがない、または一覧の形をしていない場合は空の一覧になる。
    pub fn into_list(self) -> ListResponse<Value> {
        normalize(self.data.unwrap_or(Value::Null))
    }
}

/// ベース URL とパスを結合する
///
/// ベース URL 末尾の `/` はすべて取り除き、パスが `/` で始まっていなければ補う。
pub fn join_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Wavvy API クライアント実装
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// 新しい ApiClient を作成する
    ///
    /// # 引数
    ///
    /// - `base_url`: REST API のベース URL（例: `https://api.wavvy.example`）
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// リクエストを送信する
    ///
    /// 4xx/5xx は `Ok(ApiReply { ok: false, .. })` として返る。
    /// `Err` になるのは通信エラーのみ。
    #[tracing::instrument(skip(self, body, token), level = "debug", fields(%method))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        token: Option<&str>,
    ) -> Result<ApiReply, ApiError> {
        let url = join_url(&self.base_url, path);
        let mut builder = self.client.request(method, &url);

        builder = match body {
            RequestBody::Empty => builder.header(CONTENT_TYPE, "application/json"),
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Form(pairs) => builder.form(&pairs),
            RequestBody::Multipart(form) => builder.multipart(form),
        };

        if let Some(token) = token.filter(|t| !t.is_empty()) {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.inspect_err(|e| {
            tracing::warn!(error = %e, "API への送信に失敗しました");
        })?;

        let reply = ApiReply::from_response(response).await;
        tracing::debug!(status = reply.status, ok = reply.ok, "API 応答を受信しました");
        Ok(reply)
    }
}
