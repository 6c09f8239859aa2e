//! # Wavvy 管理コンソール ライブラリ
//!
//! 外部の Wavvy REST API をベアラートークン認証で呼び出し、
//! 取得したデータを正規化・集計して画面ごとの状態を組み立てる。
//!
//! ## モジュール構成
//!
//! - `client`: REST API クライアント（URL 結合、認証ヘッダ、応答分類）
//! - `config`: 環境変数からの設定読み込み
//! - `usecase`: 認証フロー、管理者ガード、各画面の状態導出
//!
//! ## 処理の流れ
//!
//! ```text
//! usecase ──▶ client::ApiClient ──▶ ListResponse (normalize)
//!    │                                     │
//!    └──────── filter_by_window / aggregate ◀┘
//! ```

pub mod client;
pub mod config;
pub mod usecase;
