//! # ユーザー・アクティビティ・統計エンドポイント
//!
//! すべて認証必須。トークンは呼び出し側がトークンストアから読み出して渡す。
//!
//! ## エンドポイント
//!
//! - `GET /api/v1/users/me/` - ログイン中のユーザー
//! - `GET /api/v1/users/?page={p}&page_size={n}` - ユーザー一覧
//! - `GET /api/v1/activities/?page_size={n}` - アクティビティ一覧
//! - `GET /api/v1/users/stats/` - ユーザー統計
//! - `GET /api/v1/users/stats/{day|month|year|all}` - グループ別統計

use async_trait::async_trait;
use reqwest::Method;
use wavvy_domain::stats::StatType;

use super::{
    api_client::{ApiClient, ApiReply, RequestBody},
    error::ApiError,
};

const ME_PATH: &str = "/api/v1/users/me/";
const USERS_PATH: &str = "/api/v1/users/";
const ACTIVITIES_PATH: &str = "/api/v1/activities/";
const STATS_PATH: &str = "/api/v1/users/stats/";

/// ユーザー系エンドポイントのクライアントトレイト
#[async_trait]
pub trait WavvyUserClient: Send + Sync {
    /// ログイン中のユーザーを取得する
    async fn get_me(&self, token: Option<&str>) -> Result<ApiReply, ApiError>;

    /// ユーザー一覧の 1 ページを取得する
    async fn list_users(
        &self,
        token: Option<&str>,
        page: u32,
        page_size: u32,
    ) -> Result<ApiReply, ApiError>;

    /// 最新のアクティビティを取得する
    async fn list_activities(
        &self,
        token: Option<&str>,
        page_size: u32,
    ) -> Result<ApiReply, ApiError>;

    /// ユーザー統計を取得する
    async fn get_user_stats(&self, token: Option<&str>) -> Result<ApiReply, ApiError>;

    /// 集計単位ごとのユーザー統計を取得する
    async fn get_grouped_stats(
        &self,
        token: Option<&str>,
        stat_type: StatType,
    ) -> Result<ApiReply, ApiError>;
}

#[async_trait]
impl WavvyUserClient for ApiClient {
    async fn get_me(&self, token: Option<&str>) -> Result<ApiReply, ApiError> {
        self.request(Method::GET, ME_PATH, RequestBody::Empty, token)
            .await
    }

    async fn list_users(
        &self,
        token: Option<&str>,
        page: u32,
        page_size: u32,
    ) -> Result<ApiReply, ApiError> {
        let path = format!("{USERS_PATH}?page={page}&page_size={page_size}");
        self.request(Method::GET, &path, RequestBody::Empty, token)
            .await
    }

    async fn list_activities(
        &self,
        token: Option<&str>,
        page_size: u32,
    ) -> Result<ApiReply, ApiError> {
        let path = format!("{ACTIVITIES_PATH}?page_size={page_size}");
        self.request(Method::GET, &path, RequestBody::Empty, token)
            .await
    }

    async fn get_user_stats(&self, token: Option<&str>) -> Result<ApiReply, ApiError> {
        self.request(Method::GET, STATS_PATH, RequestBody::Empty, token)
            .await
    }

    async fn get_grouped_stats(
        &self,
        token: Option<&str>,
        stat_type: StatType,
    ) -> Result<ApiReply, ApiError> {
        let path = grouped_stats_path(stat_type);
        self.request(Method::GET, &path, RequestBody::Empty, token)
            .await
    }
}

fn grouped_stats_path(stat_type: StatType) -> String {
    format!(
        "{STATS_PATH}{}",
        urlencoding::encode(&stat_type.to_string())
    )
}
