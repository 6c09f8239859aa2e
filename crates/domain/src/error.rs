//! # ドメイン層エラー
//!
//! 入力チェックの失敗を表す。HTTP や保存先のエラーはここに含めない。

use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// メッセージはそのまま利用者に表示する文言。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// 未入力、パスワード強度不足、不正な選択肢など
    #[error("{0}")]
    Validation(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
