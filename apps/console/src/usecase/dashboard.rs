//! # ダッシュボードユースケース
//!
//! ユーザー一覧とアクティビティを並行して取得し、ダッシュボードの表示内容を組み立てる。
//!
//! ## 統計項目
//!
//! - 総ユーザー数: サーバーが返した `count`（取得件数ではない）
//! - 期間内ユーザー数: 参加日時が選択期間内のユーザー数
//! - 管理者数: 期間内ユーザーのうちロール `A` の人数
//! - 認証済み数: 期間内ユーザーのうち `verified` が真と判定される人数
//!
//! 統計は正規化済みの生の一覧から数える。オブジェクトでないアイテムも
//! 全期間の件数には含まれる。
//!
//! ユーザー一覧とアクティビティは互いに独立しており、片方の失敗はもう片方に影響しない。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use wavvy_domain::{
    activity::ActivityEvent,
    aggregate::aggregate,
    clock::Clock,
    time_window::{TimeWindow, filter_by_window},
    user::{User, most_recent_users},
};
use wavvy_infra::TokenStore;
use wavvy_shared::ListResponse;

use super::{helpers::discard_token, view::ViewState};
use crate::client::{ApiError, ApiReply, Outcome, WavvyClient};

/// ダッシュボード用に取得するユーザー数
pub const DASHBOARD_USERS_PAGE_SIZE: u32 = 50;

/// ダッシュボード用に取得するアクティビティ数
pub const DASHBOARD_ACTIVITIES_PAGE_SIZE: u32 = 20;

const RECENT_USERS_LIMIT: usize = 9;
const RECENT_ACTIVITIES_LIMIT: usize = 20;

/// ダッシュボード統計情報
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// サーバー上の総ユーザー数（報告されなければ `None`）
    pub total_all: Option<u64>,
    pub total_in_range: usize,
    pub admins: usize,
    pub verified: usize,
}

impl DashboardStats {
    /// 正規化済みのユーザー一覧から統計を計算する
    ///
    /// 現在時刻を引数として受け取ることで、テスタビリティを確保する。
    pub fn compute(users: &ListResponse<Value>, window: TimeWindow, now: DateTime<Utc>) -> Self {
        let records: Vec<User> = users.items.iter().map(User::from_record).collect();
        let in_range = filter_by_window(&records, window, "date_joined", now);
        let summary = aggregate(&in_range);

        Self {
            total_all: users.count,
            total_in_range: summary.total(),
            admins: summary.count_by(User::is_admin),
            verified: summary.count_by(User::is_verified),
        }
    }
}

/// ダッシュボードの表示内容
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub window: TimeWindow,
    pub stats: DashboardStats,
    /// 参加日時の新しい順（期間フィルタは適用しない）
    pub recent_users: ViewState<Vec<User>>,
    /// サーバーが返した順
    pub activities: ViewState<Vec<ActivityEvent>>,
}

/// ダッシュボードユースケース実装
pub struct DashboardUseCaseImpl {
    client: Arc<dyn WavvyClient>,
    tokens: Arc<dyn TokenStore>,
    clock: Arc<dyn Clock>,
}

impl DashboardUseCaseImpl {
    pub fn new(
        client: Arc<dyn WavvyClient>,
        tokens: Arc<dyn TokenStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            client,
            tokens,
            clock,
        }
    }

    /// ダッシュボードを読み込む
    ///
    /// 個々の一覧の失敗は `ViewState::Failed` として表現し、全体はエラーにしない。
    pub async fn load(&self, token: &str, window: TimeWindow) -> DashboardView {
        let (users_result, activities_result) = tokio::join!(
            self.client
                .list_users(Some(token), 1, DASHBOARD_USERS_PAGE_SIZE),
            self.client
                .list_activities(Some(token), DASHBOARD_ACTIVITIES_PAGE_SIZE),
        );

        let (users, users_failure) = self.settle(users_result, "users").await;
        let (activities, activities_failure) =
            self.settle(activities_result, "activities").await;

        let stats = DashboardStats::compute(&users, window, self.clock.now());

        let users = users.into_records::<User>();
        let activities = activities.into_records::<ActivityEvent>();

        let recent_users = match users_failure {
            Some(message) => ViewState::Failed(message),
            None => ViewState::from_items(most_recent_users(&users.items, RECENT_USERS_LIMIT)),
        };
        let activities = match activities_failure {
            Some(message) => ViewState::Failed(message),
            None => {
                let mut items = activities.items;
                items.truncate(RECENT_ACTIVITIES_LIMIT);
                ViewState::from_items(items)
            }
        };

        DashboardView {
            window,
            stats,
            recent_users,
            activities,
        }
    }

    /// 一覧取得の結果を、正規化済みの一覧と表示用エラーメッセージに分ける
    async fn settle(
        &self,
        result: Result<ApiReply, ApiError>,
        label: &str,
    ) -> (ListResponse, Option<String>) {
        match result {
            Ok(reply) => match reply.outcome() {
                Outcome::Success => (reply.into_list(), None),
                outcome => {
                    tracing::warn!(label, status = reply.status, "一覧の取得に失敗しました");
                    if outcome == Outcome::Unauthorized {
                        discard_token(self.tokens.as_ref()).await;
                    }
                    (
                        ListResponse::default(),
                        Some(format!("Failed to load {label} ({}).", reply.status)),
                    )
                }
            },
            Err(e) => {
                tracing::error!(label, error = %e, "一覧の取得中に通信エラーが発生しました");
                (
                    ListResponse::default(),
                    Some(format!("Failed to load {label} (network error).")),
                )
            }
        }
    }
}
