//! # Wavvy インフラ層
//!
//! ローカル環境との接続を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **トークンストア**: ベアラートークン 1 つだけを永続化する
//!
//! コンソールがローカルに保持する状態はこのトークンのみで、
//! それ以外の設定や取得データは保存しない。
//!
//! ## モジュール構成
//!
//! - [`error`] - インフラ層エラー定義
//! - [`token_store`] - トークンストアのトレイトと実装

pub mod error;
pub mod token_store;

pub use error::{FileOp, InfraError, InfraErrorKind};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
