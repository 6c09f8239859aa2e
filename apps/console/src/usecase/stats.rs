//! # ユーザー統計ユースケース
//!
//! 全体統計とグループ別統計を並行して取得する。
//! グループ別統計は補足情報なので、取得に失敗してもログに残すだけで画面は失敗にしない。

use std::sync::Arc;

use serde_json::Value;
use wavvy_domain::stats::{StatType, UserStats};
use wavvy_infra::TokenStore;

use super::{helpers::discard_token, view::ViewError};
use crate::client::{ApiError, ApiReply, Outcome, WavvyClient};

/// 統計画面の表示内容
#[derive(Debug, Clone, PartialEq)]
pub struct StatsView {
    pub stats: UserStats,
    pub stat_type: StatType,
    /// グループ別統計（取得できなければ `None`）
    pub grouped: Option<Value>,
}

impl StatsView {
    /// 認証済み率（%、小数第 1 位まで）
    pub fn verification_rate_label(&self) -> Option<String> {
        self.stats
            .verification_rate()
            .map(|rate| format!("{rate:.1}%"))
    }

    /// グループ別統計の整形済み JSON
    pub fn grouped_pretty(&self) -> Option<String> {
        self.grouped
            .as_ref()
            .and_then(|value| serde_json::to_string_pretty(value).ok())
    }
}

/// ユーザー統計ユースケース実装
pub struct StatsUseCaseImpl {
    client: Arc<dyn WavvyClient>,
    tokens: Arc<dyn TokenStore>,
}

impl StatsUseCaseImpl {
    pub fn new(client: Arc<dyn WavvyClient>, tokens: Arc<dyn TokenStore>) -> Self {
        Self { client, tokens }
    }

    /// 統計を読み込む
    pub async fn load(&self, token: &str, stat_type: StatType) -> Result<StatsView, ViewError> {
        let (stats_result, grouped_result) = tokio::join!(
            self.client.get_user_stats(Some(token)),
            self.client.get_grouped_stats(Some(token), stat_type),
        );

        let reply = stats_result?;
        let stats = match reply.outcome() {
            Outcome::Success => reply
                .data
                .and_then(|data| serde_json::from_value::<UserStats>(data).ok())
                .unwrap_or_default(),
            outcome => {
                let message = format!("Failed to load statistics ({}).", reply.status);
                tracing::warn!(status = reply.status, "統計の取得に失敗しました");
                if outcome == Outcome::Unauthorized {
                    discard_token(self.tokens.as_ref()).await;
                    return Err(ViewError::Unauthorized(message));
                }
                return Err(ViewError::RequestFailed(message));
            }
        };

        Ok(StatsView {
            stats,
            stat_type,
            grouped: grouped_data(grouped_result, stat_type),
        })
    }
}

fn grouped_data(result: Result<ApiReply, ApiError>, stat_type: StatType) -> Option<Value> {
    match result {
        Ok(reply) if reply.ok => reply.data,
        Ok(reply) => {
            tracing::error!(
                %stat_type,
                status = reply.status,
                "グループ別統計の取得に失敗しました"
            );
            None
        }
        Err(e) => {
            tracing::error!(%stat_type, error = %e, "グループ別統計の取得中に通信エラーが発生しました");
            None
        }
    }
}
