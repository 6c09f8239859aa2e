//! API クライアントのエラー型

use thiserror::Error;

/// API クライアントエラー
///
/// HTTP ステータスに関わらず応答が返ってきた場合はエラーにしない。
/// 接続失敗・TLS エラー・リクエスト構築失敗などの通信エラーだけを表す。
#[derive(Debug, Error)]
pub enum ApiError {
    /// 通信エラー
    #[error("通信エラー: {0}")]
    Transport(#[from] reqwest::Error),
}
