//! # レコード共通定義
//!
//! 上流 API のレコードはスキーマが保証されない。フィールドの欠損・`null`・
//! 想定外の型をすべて「値なし」として扱うための共通部品を置く。

use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::time_window::parse_timestamp_millis;

/// 日時フィールドを持つレコード
///
/// 期間フィルタや並び替えはフィールド名で日時を参照する。
/// 生の JSON レコードと型付きレコードのどちらにも実装する。
pub trait Record {
    /// 指定フィールドの日時をエポックミリ秒で返す
    ///
    /// フィールドが存在しない、`null`、または解釈できない場合は `None`。
    fn timestamp_millis(&self, field: &str) -> Option<i64>;
}

impl Record for Value {
    fn timestamp_millis(&self, field: &str) -> Option<i64> {
        match self.get(field)? {
            Value::String(s) => parse_timestamp_millis(s),
            // エポックミリ秒での表現も受け付ける
            Value::Number(n) => n.as_i64().filter(|ms| *ms != 0),
            _ => None,
        }
    }
}

/// レコード ID
///
/// 上流 API は数値 ID と文字列 ID（UUID など）の両方を返しうる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(untagged)]
pub enum RecordId {
    #[display("{_0}")]
    Number(i64),
    #[display("{_0}")]
    Text(String),
}

/// 型が合わない値を `None` として読み込むデシリアライザ
///
/// `#[serde(default, deserialize_with = "lenient")]` として使用する。
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// 任意の JSON 値を表示用の文字列にする
///
/// 文字列はそのまま、`null` は `None`、それ以外は JSON 表記。
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// JSON 値の真偽判定
///
/// `null`・`false`・`0`・`NaN`・空文字列を偽、それ以外（配列とオブジェクトを含む）を真とする。
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
