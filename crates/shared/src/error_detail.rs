//! # エラーペイロードからのメッセージ抽出
//!
//! 上流 API のエラーレスポンスは統一形式を持たない。
//! OAuth2 エンドポイントは `error_description`、一般的なエンドポイントは `detail` や
//! `message`、入力検証エラーはフィールドごとの配列（`{"email": ["..."]}`）を返す。
//! ここではそれらから人間可読なメッセージを 1 つ取り出す。

use serde_json::Value;

/// 優先的に参照するトップレベルのキー
const MESSAGE_KEYS: [&str; 3] = ["error_description", "detail", "message"];

/// 優先的に参照するフィールドエラーのキー
const FIELD_KEYS: [&str; 3] = ["email", "password", "non_field_errors"];

/// エラーペイロードから表示用メッセージを抽出する
///
/// 見つからない場合は `None` を返す。呼び出し側で汎用メッセージにフォールバックすること。
pub fn error_detail(data: &Value) -> Option<String> {
    let map = data.as_object()?;

    let message = MESSAGE_KEYS
        .iter()
        .filter_map(|key| map.get(*key))
        .find_map(non_blank);
    if message.is_some() {
        return message;
    }

    FIELD_KEYS
        .iter()
        .filter_map(|key| map.get(*key))
        .chain(map.values())
        .find_map(first_field_error)
}

fn non_blank(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn first_field_error(value: &Value) -> Option<String> {
    value.as_array()?.first().and_then(non_blank)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(json!({"error_description": "Invalid credentials given."}), "Invalid credentials given.")]
    #[case(json!({"detail": "forbidden"}), "forbidden")]
    #[case(json!({"message": "Something broke"}), "Something broke")]
    #[case(json!({"email": ["user with this email already exists."]}), "user with this email already exists.")]
    #[case(json!({"password": ["This password is too short."]}), "This password is too short.")]
    #[case(json!({"username": ["Required."]}), "Required.")]
    fn test_既知の形状からメッセージを抽出する(#[case] data: Value, #[case] expected: &str) {
        assert_eq!(error_detail(&data).as_deref(), Some(expected));
    }

    #[test]
    fn test_error_descriptionがdetailより優先される() {
        let data = json!({"detail": "second", "error_description": "first"});

        assert_eq!(error_detail(&data).as_deref(), Some("first"));
    }

    #[test]
    fn test_メッセージキーがフィールドエラーより優先される() {
        let data = json!({"email": ["field"], "detail": "top"});

        assert_eq!(error_detail(&data).as_deref(), Some("top"));
    }

    #[rstest]
    #[case(json!(null))]
    #[case(json!("plain text"))]
    #[case(json!({}))]
    #[case(json!({"detail": "   "}))]
    #[case(json!({"email": []}))]
    fn test_メッセージがないときはnoneを返す(#[case] data: Value) {
        assert_eq!(error_detail(&data), None);
    }
}
