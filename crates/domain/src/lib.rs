//! # Wavvy ドメイン層
//!
//! 管理コンソールが扱うレコードと、その上で行う集計ロジックを定義する。
//!
//! ## 設計方針
//!
//! - **防御的な読み取り**: 上流 API のレコードはスキーマが保証されないため、
//!   すべてのフィールドを `Option` とし、型が合わない値は欠損として扱う
//! - **純粋関数**: 期間フィルタや集計は入力のみに依存し、現在時刻も引数で受け取る
//! - **外部非依存**: HTTP やストレージには一切依存しない
//!
//! ## 依存関係の方向
//!
//! ```text
//! console → infra → domain
//!         → shared
//! ```
//!
//! ## モジュール構成
//!
//! - [`record`] - レコード共通のトレイトと寛容なデシリアライズ
//! - [`user`] / [`activity`] - 上流 API のレコード
//! - [`time_window`] - 期間フィルタ
//! - [`aggregate`] - 件数集計
//! - [`access`] - 管理画面へのアクセスポリシー
//! - [`credentials`] - 認証フォームの入力検証
//! - [`stats`] - ユーザー統計
//!
//! ## 使用例
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use serde_json::json;
//! use wavvy_domain::{aggregate::aggregate, time_window::{TimeWindow, filter_by_window}};
//!
//! let now = Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap();
//! let users = vec![
//!     json!({"date_joined": "2024-01-01T00:00:00Z"}),
//!     json!({"date_joined": "2024-06-01T00:00:00Z"}),
//! ];
//!
//! let recent = filter_by_window(&users, TimeWindow::Last7Days, "date_joined", now);
//! assert_eq!(aggregate(&recent).total(), 1);
//! ```

pub mod access;
pub mod activity;
pub mod aggregate;
pub mod clock;
pub mod credentials;
pub mod error;
pub mod record;
pub mod stats;
pub mod time_window;
pub mod user;

pub use error::DomainError;
