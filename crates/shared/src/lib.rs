//! # Wavvy 共有ユーティリティ
//!
//! このクレートは、Wavvy 管理コンソール全体で使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（domain, infra, console）から依存される
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - 外部クレートへの依存は最小限に抑える

pub mod error_detail;
pub mod list_response;
pub mod observability;

pub use error_detail::error_detail;
pub use list_response::{ListResponse, normalize};
