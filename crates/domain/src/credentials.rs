//! # 認証フォームの入力値
//!
//! ログイン・パスワード再設定などで扱う入力値の値オブジェクト。
//! 送信前の検証はここで行い、サーバー側の検証結果はそのまま表示する。

use crate::DomainError;

/// 平文パスワード
///
/// Debug 出力ではパスワードの値をマスクする。
#[derive(Clone)]
pub struct PlainPassword(String);

impl std::fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PlainPassword").field(&"[REDACTED]").finish()
    }
}

impl PlainPassword {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// ログイン入力
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    identifier: String,
    password: PlainPassword,
}

impl LoginCredentials {
    /// ログイン入力を作成する
    ///
    /// メールアドレスまたはユーザー名は前後の空白を除去する。
    /// パスワードは入力されたまま扱う。
    pub fn new(identifier: &str, password: PlainPassword) -> Result<Self, DomainError> {
        let identifier = identifier.trim();
        if identifier.is_empty() || password.is_empty() {
            return Err(DomainError::Validation(
                "Please enter email/username and password.".to_string(),
            ));
        }
        Ok(Self {
            identifier: identifier.to_string(),
            password,
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn password(&self) -> &PlainPassword {
        &self.password
    }
}

/// パスワード再設定メールの宛先
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetEmail(String);

impl ResetEmail {
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(DomainError::Validation(
                "Please enter your email address.".to_string(),
            ));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// パスワード強度の判定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordStrength {
    pub has_length: bool,
    pub has_upper: bool,
    pub has_lower: bool,
    pub has_number: bool,
}

impl PasswordStrength {
    /// 最低文字数
    pub const MIN_LENGTH: usize = 8;

    pub fn evaluate(password: &str) -> Self {
        Self {
            has_length: password.chars().count() >= Self::MIN_LENGTH,
            has_upper: password.chars().any(|c| c.is_ascii_uppercase()),
            has_lower: password.chars().any(|c| c.is_ascii_lowercase()),
            has_number: password.chars().any(|c| c.is_ascii_digit()),
        }
    }

    pub fn is_strong(&self) -> bool {
        self.has_length && self.has_upper && self.has_lower && self.has_number
    }
}

/// 新しいパスワード（確認入力と一致し、強度要件を満たすもの）
#[derive(Debug, Clone)]
pub struct NewPassword(PlainPassword);

impl NewPassword {
    /// # エラー
    ///
    /// 未入力・強度不足・確認入力の不一致は `DomainError::Validation` を返す。
    pub fn new(password: PlainPassword, confirmation: &PlainPassword) -> Result<Self, DomainError> {
        if password.is_empty() {
            return Err(DomainError::Validation(
                "Please enter a new password.".to_string(),
            ));
        }
        if !PasswordStrength::evaluate(password.as_str()).is_strong() {
            return Err(DomainError::Validation(
                "Password doesn't meet all requirements.".to_string(),
            ));
        }
        if password.as_str() != confirmation.as_str() {
            return Err(DomainError::Validation(
                "Passwords do not match.".to_string(),
            ));
        }
        Ok(Self(password))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}
