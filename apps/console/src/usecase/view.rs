//! # 画面状態とエラー
//!
//! 各画面は「読み込み中 / 空 / 表示可能 / 失敗」のいずれかの状態を取る。
//! 失敗は画面内に表示するエラーであり、認可エラー（トークン破棄を伴う）とは区別する。

use thiserror::Error;
use wavvy_domain::DomainError;
use wavvy_infra::InfraError;

use crate::{client::ApiError, config::ConfigError};

/// 画面（またはその一部）の状態
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Empty,
    Ready(T),
    /// 画面内に表示するエラーメッセージ
    Failed(String),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> ViewState<Vec<T>> {
    /// 取得したアイテムから状態を決める（0 件なら `Empty`）
    pub fn from_items(items: Vec<T>) -> Self {
        if items.is_empty() {
            Self::Empty
        } else {
            Self::Ready(items)
        }
    }
}

impl<T> ViewState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// ユースケースのエラー
///
/// `Display` はそのまま利用者に表示できるメッセージになっている。
#[derive(Debug, Error)]
pub enum ViewError {
    /// 入力値の検証エラー
    #[error("{0}")]
    Validation(#[from] DomainError),

    /// 認可エラー（401/403）。保存済みトークンは破棄済み
    #[error("{0}")]
    Unauthorized(String),

    /// API がエラーを返した（トークンは保持したまま）
    #[error("{0}")]
    RequestFailed(String),

    /// 通信エラー
    #[error("Network error: could not reach the API.")]
    Transport(#[from] ApiError),

    /// トークンストアの読み書きに失敗
    #[error("Could not access the saved session.")]
    TokenStore(#[from] InfraError),

    /// 設定不足
    #[error("Console is not configured: {0}")]
    Config(#[from] ConfigError),
}

impl ViewError {
    /// 再ログインが必要なエラーか
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}
