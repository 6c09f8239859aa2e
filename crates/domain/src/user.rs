//! # ユーザー
//!
//! 上流 API が返すユーザーレコードと、それに関連する値オブジェクトを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 備考 |
//! |---|------------|------|
//! | [`User`] | ユーザー | すべてのフィールドが任意 |
//! | [`Role`] | ロール | 1 文字のロールコード（`A` / `N` / `C` / `T`） |
//!
//! ## 使用例
//!
//! ```rust
//! use serde_json::json;
//! use wavvy_domain::user::{Role, User};
//!
//! let user: User = serde_json::from_value(json!({
//!     "first_name": "Ada",
//!     "last_name": "Lovelace",
//!     "role": "A",
//! }))
//! .unwrap();
//!
//! assert_eq!(user.display_name(), "Ada Lovelace");
//! assert_eq!(user.role(), Some(Role::Admin));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    record::{Record, RecordId, is_truthy, lenient},
    time_window::parse_timestamp_millis,
};

/// 表示名がないときのプレースホルダ
pub const NO_VALUE: &str = "—";

/// ユーザーロール
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// 管理者（`A`）
    Admin,
    /// 一般ユーザー（`N`）
    Normal,
    /// ケア担当（`C`）
    Care,
    /// 技術担当（`T`）
    Technician,
    /// 未知のロールコード
    Other(String),
}

impl Role {
    /// ロールコードから変換する
    pub fn from_code(code: &str) -> Self {
        match code {
            "A" => Self::Admin,
            "N" => Self::Normal,
            "C" => Self::Care,
            "T" => Self::Technician,
            other => Self::Other(other.to_string()),
        }
    }

    /// 画面表示用のラベル
    ///
    /// 未知のロールはコードをそのまま表示する。
    pub fn label(&self) -> &str {
        match self {
            Self::Admin => "Admin",
            Self::Normal => "User",
            Self::Care => "Care",
            Self::Technician => "Tech",
            Self::Other(code) => code,
        }
    }
}

/// ユーザーレコード
///
/// 上流 API のスキーマは保証されないため、すべてのフィールドを任意とする。
/// 型が合わない値は欠損として読み込む。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_name: Option<String>,
    /// ロールコード
    #[serde(default, deserialize_with = "lenient")]
    pub role: Option<String>,
    /// 認証済みフラグ（値の型は問わず、真偽判定は [`is_truthy`] に従う）
    #[serde(default)]
    pub verified: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_superuser: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub date_joined: Option<String>,
}

impl User {
    /// 生の JSON レコードから読み込む
    ///
    /// オブジェクトでない値は、すべてのフィールドが欠損したユーザーとして扱う。
    pub fn from_record(value: &Value) -> Self {
        Self::deserialize(value).unwrap_or_default()
    }

    /// 表示名
    ///
    /// `full_name` → `first_name last_name` → `—` の順にフォールバックする。
    pub fn display_name(&self) -> String {
        let full = self.full_name.as_deref().unwrap_or_default().trim();
        if !full.is_empty() {
            return full.to_string();
        }

        let first = self.first_name.as_deref().unwrap_or_default().trim();
        let last = self.last_name.as_deref().unwrap_or_default().trim();
        let combined = format!("{first} {last}");
        let combined = combined.trim();
        if combined.is_empty() {
            NO_VALUE.to_string()
        } else {
            combined.to_string()
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().map(Role::from_code)
    }

    /// ロールコードが `A` か
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("A")
    }

    pub fn is_verified(&self) -> bool {
        self.verified.as_ref().is_some_and(is_truthy)
    }

    pub fn is_superuser(&self) -> bool {
        self.is_superuser == Some(true)
    }

    pub fn joined_at_millis(&self) -> Option<i64> {
        self.date_joined.as_deref().and_then(parse_timestamp_millis)
    }

    /// 検索クエリに一致するか
    ///
    /// 表示名・メールアドレス・ユーザー名のいずれかに、大文字小文字を区別せず
    /// 部分一致すれば真。前後の空白を除いたクエリが空なら常に真。
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [
            Some(self.display_name()),
            self.email.clone(),
            self.username.clone(),
        ]
        .into_iter()
        .flatten()
        .any(|haystack| haystack.to_lowercase().contains(&needle))
    }
}

impl Record for User {
    fn timestamp_millis(&self, field: &str) -> Option<i64> {
        match field {
            "date_joined" => self.joined_at_millis(),
            _ => None,
        }
    }
}

/// 参加日時の新しい順に並べて先頭 `limit` 件を返す
///
/// 参加日時のないユーザーは末尾に回る。同時刻のユーザーは入力順を保つ。
pub fn most_recent_users(users: &[User], limit: usize) -> Vec<User> {
    let mut sorted = users.to_vec();
    sorted.sort_by_key(|u| std::cmp::Reverse(u.joined_at_millis().unwrap_or(0)));
    sorted.truncate(limit);
    sorted
}
