//! # ユースケース層
//!
//! 管理コンソールの各画面・操作のロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: API クライアントとトークンストアを `Arc<dyn Trait>` で外部から注入
//! - **時刻の注入**: 期間フィルタの基準時刻は [`Clock`](wavvy_domain::clock::Clock) から取得
//! - **薄い表示層**: CLI は結果を整形するだけで、判断はユースケースに集約
//!
//! ## モジュール構成
//!
//! - `auth`: ログイン・サインアップ・パスワード再設定・ログアウト
//! - `session`: 管理画面に入る前の認証ガード
//! - `dashboard`: ダッシュボード（統計カード・最近のユーザー・アクティビティ）
//! - `users`: ユーザー一覧（ページング・検索）
//! - `stats`: ユーザー統計
//! - `latest`: 古い応答を破棄するためのガード
//! - `view`: 画面状態とエラー型

pub(crate) mod helpers;

pub mod auth;
pub mod dashboard;
pub mod latest;
pub mod session;
pub mod stats;
pub mod users;
pub mod view;

pub use auth::{AuthUseCaseImpl, SignUpResult};
pub use dashboard::{DashboardStats, DashboardUseCaseImpl, DashboardView};
pub use latest::{LatestResponse, Ticket};
pub use session::{AdminSession, SessionError, SessionUseCaseImpl};
pub use stats::{StatsUseCaseImpl, StatsView};
pub use users::{USERS_PAGE_SIZE, UsersPage, UsersUseCaseImpl, total_pages};
pub use view::{ViewError, ViewState};
