//! # 一覧レスポンスの正規化
//!
//! コレクション系エンドポイントのレスポンスを統一形式 [`ListResponse`] に変換する。
//!
//! ## 受け付ける形状
//!
//! ```json
//! { "count": 57, "next": "...", "previous": null, "results": [...] }
//! ```
//!
//! または素の配列 `[...]`。
//!
//! 上流 API のエラーペイロードは成功時のエンベロープ形状に従わないため、
//! 認識できない形状はすべて空の結果に縮退させる。[`normalize`] は決して失敗しない。

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// 正規化済みの一覧レスポンス
///
/// シリアライズ形式はページネーションエンベロープ
/// `{count, next, previous, results}` そのものなので、
/// 正規化済みの値を再度 [`normalize`] に通しても同じ結果になる。
///
/// # 不変条件
///
/// - `items` は常にシーケンス（不正な入力では空）
/// - `count` はサーバー上の総件数であり、`items.len()` とは一致しないことがある
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T = Value> {
    pub count: Option<u64>,
    #[serde(rename = "results")]
    pub items: Vec<T>,
    #[serde(rename = "next")]
    pub next_cursor: Option<String>,
    #[serde(rename = "previous")]
    pub previous_cursor: Option<String>,
}

impl<T> Default for ListResponse<T> {
    fn default() -> Self {
        Self {
            count: None,
            items: Vec::new(),
            next_cursor: None,
            previous_cursor: None,
        }
    }
}

impl ListResponse<Value> {
    /// アイテムを型付きレコードに変換する
    ///
    /// JSON オブジェクトでない、またはデシリアライズできないアイテムは
    /// 警告ログを出して読み飛ばす。`count` とカーソルはそのまま引き継ぐ。
    pub fn into_records<T: DeserializeOwned>(self) -> ListResponse<T> {
        let items = self
            .items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| {
                if !item.is_object() {
                    tracing::warn!(index, "オブジェクトでないアイテムを読み飛ばします");
                    return None;
                }
                match serde_json::from_value::<T>(item) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        tracing::warn!(index, error = %e, "アイテムのデシリアライズに失敗しました");
                        None
                    }
                }
            })
            .collect();

        ListResponse {
            count: self.count,
            items,
            next_cursor: self.next_cursor,
            previous_cursor: self.previous_cursor,
        }
    }
}

/// 任意の JSON ペイロードを [`ListResponse`] に正規化する
///
/// - `results` 配列を持つオブジェクト: `count` は数値なら採用、`next` / `previous` は文字列なら採用
/// - 配列: `count` は配列長、カーソルは `None`
/// - それ以外（null、スカラー、`results` を持たないオブジェクト）: 空の結果
pub fn normalize(raw: Value) -> ListResponse<Value> {
    match raw {
        Value::Object(mut map) => {
            let Some(Value::Array(items)) = map.remove("results") else {
                return ListResponse::default();
            };
            ListResponse {
                count: map.get("count").and_then(as_count),
                items,
                next_cursor: map.get("next").and_then(as_cursor),
                previous_cursor: map.get("previous").and_then(as_cursor),
            }
        }
        Value::Array(items) => ListResponse {
            count: Some(items.len() as u64),
            items,
            next_cursor: None,
            previous_cursor: None,
        },
        _ => ListResponse::default(),
    }
}

/// 総件数として解釈できる数値か
///
/// 負数や小数部を持つ値は「総件数の報告なし」として扱う。
fn as_count(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
        .map(|f| f as u64)
}

fn as_cursor(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}
