//! # Wavvy REST API クライアント
//!
//! 外部 API との通信を担当する。
//!
//! ## 構成
//!
//! - [`ApiClient`]: URL 結合・ヘッダ付与・応答分類を行う汎用リクエスト関数
//! - [`WavvyAuthClient`]: トークン発行やパスワード再設定など認証系エンドポイント
//! - [`WavvyUserClient`]: ユーザー・アクティビティ・統計の取得
//! - [`WavvyClient`]: 上記 2 つを束ねるスーパートレイト
//!
//! 4xx/5xx は `Err` にならず [`ApiReply`] として返る。
//! `Err` になるのは通信そのものの失敗（[`ApiError`]）だけ。

pub mod api_client;
pub mod auth_client;
pub mod error;
pub mod user_client;

pub use api_client::{ApiClient, ApiReply, Outcome, RequestBody, join_url};
pub use auth_client::{SignUpRequest, WavvyAuthClient, login_token, signup_token};
pub use error::ApiError;
pub use user_client::WavvyUserClient;

/// Wavvy API クライアントトレイト（スーパートレイト）
///
/// ユースケースは `Arc<dyn WavvyClient>` として保持する。
/// テスト時にはサブトレイト単位でスタブを実装できる。
pub trait WavvyClient: WavvyAuthClient + WavvyUserClient {}

impl<T> WavvyClient for T where T: WavvyAuthClient + WavvyUserClient {}
