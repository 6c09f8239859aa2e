//! # 期間フィルタ
//!
//! 取得済みのレコードを「直近 7 日」「直近 30 日」「全期間」で絞り込む。
//!
//! ## 判定ルール
//!
//! - 全期間: 入力をそのまま返す（日時のないレコードも含む）
//! - 直近 N 日: `cutoff = now - N * 86_400_000` ミリ秒とし、日時が `cutoff` 以上のレコードを残す
//! - 日時が欠損・解釈不能なレコードはタイムスタンプ 0 とみなす
//!
//! 出力の順序は入力の順序と一致する（並び替えは行わない）。

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::record::Record;

/// 1 日のミリ秒数
const MILLIS_PER_DAY: i64 = 86_400_000;

/// 期間フィルタの選択肢
///
/// 短い表記（`7d`）と長い表記（`last-7-days`）のどちらからもパースできる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
pub enum TimeWindow {
    /// 直近 7 日
    #[default]
    #[strum(to_string = "7d", serialize = "last-7-days")]
    Last7Days,
    /// 直近 30 日
    #[strum(to_string = "30d", serialize = "last-30-days")]
    Last30Days,
    /// 全期間
    #[strum(to_string = "all", serialize = "all-time")]
    AllTime,
}

impl TimeWindow {
    /// 期間の日数（全期間は `None`）
    pub fn days(self) -> Option<i64> {
        match self {
            Self::Last7Days => Some(7),
            Self::Last30Days => Some(30),
            Self::AllTime => None,
        }
    }

    /// 基準時刻からの下限（エポックミリ秒）
    pub fn cutoff_millis(self, now: DateTime<Utc>) -> Option<i64> {
        self.days()
            .map(|days| now.timestamp_millis() - days * MILLIS_PER_DAY)
    }

    /// 画面表示用のラベル
    pub fn label(self) -> &'static str {
        match self {
            Self::Last7Days => "Last 7 days",
            Self::Last30Days => "Last 30 days",
            Self::AllTime => "All-time",
        }
    }
}

/// レコードを期間で絞り込む
///
/// `date_field` で指定したフィールドの日時を基準時刻 `now` と比較する。
/// 境界（ちょうど `cutoff`）のレコードは含まれる。
pub fn filter_by_window<R>(
    items: &[R],
    window: TimeWindow,
    date_field: &str,
    now: DateTime<Utc>,
) -> Vec<R>
where
    R: Record + Clone,
{
    let Some(cutoff) = window.cutoff_millis(now) else {
        return items.to_vec();
    };

    items
        .iter()
        .filter(|item| item.timestamp_millis(date_field).unwrap_or(0) >= cutoff)
        .cloned()
        .collect()
}

/// 日時文字列をエポックミリ秒に変換する
///
/// 受け付ける形式:
///
/// - RFC 3339（`2024-06-01T00:00:00Z`、`2024-06-01T09:00:00+09:00`）
/// - タイムゾーンなしの日時（`2024-06-01T00:00:00`、UTC とみなす）
/// - 日付のみ（`2024-06-01`、UTC の 0 時とみなす）
pub fn parse_timestamp_millis(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp_millis());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    use super::*;

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap()
    }

    fn dated(id: i64, date: &str) -> Value {
        json!({"id": id, "date_joined": date})
    }

    #[rstest]
    fn test_全期間は入力をそのまま返す(now: DateTime<Utc>) {
        let items = vec![
            dated(1, "2020-01-01T00:00:00Z"),
            json!({"id": 2}),
            dated(3, "garbage"),
        ];

        let result = filter_by_window(&items, TimeWindow::AllTime, "date_joined", now);

        assert_eq!(result, items);
    }

    #[rstest]
    fn test_直近7日の境界ちょうどのレコードを含む(now: DateTime<Utc>) {
        let boundary = (now - Duration::days(7)).to_rfc3339();
        let just_before = (now - Duration::days(7) - Duration::milliseconds(1)).to_rfc3339();
        let items = vec![dated(1, &boundary), dated(2, &just_before)];

        let result = filter_by_window(&items, TimeWindow::Last7Days, "date_joined", now);

        assert_eq!(result, vec![dated(1, &boundary)]);
    }

    #[rstest]
    #[case::直近7日(TimeWindow::Last7Days)]
    #[case::直近30日(TimeWindow::Last30Days)]
    fn test_日時のないレコードは期間指定で除外される(
        now: DateTime<Utc>,
        #[case] window: TimeWindow,
    ) {
        let items = vec![
            json!({"id": 1}),
            json!({"id": 2, "date_joined": null}),
            dated(3, "not a date"),
            dated(4, "2024-06-01T00:00:00Z"),
        ];

        let result = filter_by_window(&items, window, "date_joined", now);

        assert_eq!(result, vec![dated(4, "2024-06-01T00:00:00Z")]);
    }

    #[rstest]
    fn test_直近30日は入力順を保つ(now: DateTime<Utc>) {
        let items = vec![
            dated(1, "2024-05-20T00:00:00Z"),
            dated(2, "2024-01-01T00:00:00Z"),
            dated(3, "2024-05-10T00:00:00Z"),
            dated(4, "2024-06-01T12:00:00Z"),
        ];

        let result = filter_by_window(&items, TimeWindow::Last30Days, "date_joined", now);

        let ids: Vec<_> = result.iter().map(|v| v["id"].clone()).collect();
        assert_eq!(ids, vec![json!(1), json!(3), json!(4)]);
    }

    #[rstest]
    fn test_別のフィールド名で絞り込める(now: DateTime<Utc>) {
        let items = vec![
            json!({"id": 1, "created_at": "2024-06-01T00:00:00Z"}),
            json!({"id": 2, "date_joined": "2024-06-01T00:00:00Z"}),
        ];

        let result = filter_by_window(&items, TimeWindow::Last7Days, "created_at", now);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["id"], json!(1));
    }

    #[rstest]
    #[case("2024-06-01T00:00:00Z", 1_717_200_000_000)]
    #[case("2024-06-01T09:00:00+09:00", 1_717_200_000_000)]
    #[case("2024-06-01T00:00:00.250Z", 1_717_200_000_250)]
    #[case("2024-06-01T00:00:00", 1_717_200_000_000)]
    #[case("2024-06-01T00:00:00.5", 1_717_200_000_500)]
    #[case("2024-06-01 00:00:00", 1_717_200_000_000)]
    #[case("2024-06-01", 1_717_200_000_000)]
    fn test_日時文字列を解釈する(#[case] input: &str, #[case] expected: i64) {
        assert_eq!(parse_timestamp_millis(input), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("yesterday")]
    #[case("2024-13-01")]
    fn test_解釈できない日時はnoneを返す(#[case] input: &str) {
        assert_eq!(parse_timestamp_millis(input), None);
    }

    #[rstest]
    #[case("7d", TimeWindow::Last7Days)]
    #[case("last-7-days", TimeWindow::Last7Days)]
    #[case("30d", TimeWindow::Last30Days)]
    #[case("last-30-days", TimeWindow::Last30Days)]
    #[case("all", TimeWindow::AllTime)]
    #[case("all-time", TimeWindow::AllTime)]
    fn test_文字列から期間をパースする(#[case] input: &str, #[case] expected: TimeWindow) {
        assert_eq!(input.parse::<TimeWindow>(), Ok(expected));
    }

    #[test]
    fn test_不正な期間はパースエラーになる() {
        assert_eq!(
            "90d".parse::<TimeWindow>(),
            Err(strum::ParseError::VariantNotFound)
        );
    }

    #[test]
    fn test_表示名はパース可能な文字列になる() {
        for window in [TimeWindow::Last7Days, TimeWindow::Last30Days, TimeWindow::AllTime] {
            assert_eq!(window.to_string().parse::<TimeWindow>(), Ok(window));
        }
    }
}
