//! # コンソール設定
//!
//! 環境変数からコンソールの設定を読み込む。

use std::{env, path::PathBuf};

use thiserror::Error;
use wavvy_domain::access::AccessPolicy;

/// 設定読み込みエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 必須の環境変数が未設定または空
    #[error("{0} is not set")]
    Missing(&'static str),

    /// 値の形式が不正
    #[error("{name} is invalid: {reason}")]
    Invalid {
        name: &'static str,
        reason: String,
    },
}

/// コンソールの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// REST API のベース URL
    pub api_base: String,
    /// OAuth2 クライアント ID（ログイン時のみ必須）
    pub client_id: Option<String>,
    /// トークンファイルのパス（未指定なら OS の設定ディレクトリ配下）
    pub token_path: Option<PathBuf>,
    /// 管理画面へのアクセスポリシー
    ///
    /// `WAVVY_REQUIRE_ADMIN=true` のときに [`AccessPolicy::AdminOnly`] になる。
    pub access_policy: AccessPolicy,
}

impl ConsoleConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を組み立てる
    ///
    /// テストでプロセスの環境変数を書き換えずに済むよう、参照部分を差し替えられる。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_base = non_blank("WAVVY_API_BASE").ok_or(ConfigError::Missing("WAVVY_API_BASE"))?;
        if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                name: "WAVVY_API_BASE",
                reason: format!("{api_base:?} must start with http:// or https://"),
            });
        }

        let access_policy = if parse_flag(non_blank("WAVVY_REQUIRE_ADMIN").as_deref()) {
            AccessPolicy::AdminOnly
        } else {
            AccessPolicy::AnyAuthenticated
        };

        Ok(Self {
            api_base,
            client_id: non_blank("WAVVY_CLIENT_ID"),
            token_path: non_blank("WAVVY_TOKEN_PATH").map(PathBuf::from),
            access_policy,
        })
    }

    /// ログインに必要なクライアント ID を取得する
    pub fn require_client_id(&self) -> Result<&str, ConfigError> {
        self.client_id
            .as_deref()
            .ok_or(ConfigError::Missing("WAVVY_CLIENT_ID"))
    }
}

fn parse_flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}
