//! # アクティビティ
//!
//! 上流 API のアクティビティ（操作履歴）レコード。
//! フィールド名はエンドポイントの実装によって揺れるため、
//! 表示用の値は複数の候補フィールドから順に拾う。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    record::{Record, RecordId, lenient, value_text},
    time_window::parse_timestamp_millis,
    user::NO_VALUE,
};

/// アクティビティレコード
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub details: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
    /// 実行ユーザー（文字列・数値・オブジェクトのいずれもありうる）
    #[serde(default)]
    pub user: Option<Value>,
    #[serde(default)]
    pub user_id: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub entity: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub timestamp: Option<String>,
}

impl ActivityEvent {
    /// 見出し（`title` → `action` → `name` → `Activity`）
    pub fn headline(&self) -> &str {
        self.title
            .as_deref()
            .or(self.action.as_deref())
            .or(self.name.as_deref())
            .unwrap_or("Activity")
    }

    /// 補足説明（`description` → `details` → `message` → 空文字）
    pub fn summary(&self) -> &str {
        self.description
            .as_deref()
            .or(self.details.as_deref())
            .or(self.message.as_deref())
            .unwrap_or_default()
    }

    /// 実行者（`user` → `user_id` → `email` → `entity` → `—`）
    pub fn actor(&self) -> String {
        self.user
            .as_ref()
            .and_then(value_text)
            .or_else(|| self.user_id.as_ref().and_then(value_text))
            .or_else(|| self.email.clone())
            .or_else(|| self.entity.clone())
            .unwrap_or_else(|| NO_VALUE.to_string())
    }

    /// 発生日時の生の文字列（`created_at` → `timestamp`）
    pub fn occurred_at(&self) -> Option<&str> {
        self.created_at.as_deref().or(self.timestamp.as_deref())
    }
}

impl Record for ActivityEvent {
    fn timestamp_millis(&self, field: &str) -> Option<i64> {
        let value = match field {
            "created_at" => self.created_at.as_deref(),
            "timestamp" => self.timestamp.as_deref(),
            _ => None,
        };
        value.and_then(parse_timestamp_millis)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn event(value: Value) -> ActivityEvent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_見出しは候補フィールドを順に参照する() {
        assert_eq!(event(json!({"title": "t", "action": "a"})).headline(), "t");
        assert_eq!(event(json!({"action": "login", "name": "n"})).headline(), "login");
        assert_eq!(event(json!({"name": "n"})).headline(), "n");
        assert_eq!(event(json!({})).headline(), "Activity");
    }

    #[test]
    fn test_補足説明は候補がなければ空文字() {
        assert_eq!(event(json!({"details": "d", "message": "m"})).summary(), "d");
        assert_eq!(event(json!({})).summary(), "");
    }

    #[test]
    fn test_実行者は数値やオブジェクトも表示できる() {
        assert_eq!(event(json!({"user": "alice", "email": "x"})).actor(), "alice");
        assert_eq!(event(json!({"user_id": 42})).actor(), "42");
        assert_eq!(event(json!({"user": null, "email": "e@x"})).actor(), "e@x");
        assert_eq!(event(json!({"entity": "user"})).actor(), "user");
        assert_eq!(event(json!({})).actor(), "—");
    }

    #[test]
    fn test_発生日時はcreated_atを優先する() {
        let e = event(json!({"created_at": "2024-06-01", "timestamp": "2024-05-01"}));

        assert_eq!(e.occurred_at(), Some("2024-06-01"));
        assert_eq!(event(json!({"timestamp": "2024-05-01"})).occurred_at(), Some("2024-05-01"));
        assert_eq!(e.timestamp_millis("created_at"), Some(1_717_200_000_000));
    }
}
