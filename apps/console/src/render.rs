//! # テキスト表示
//!
//! ユースケースが組み立てた表示内容を標準出力用のテキストに整形する。

use chrono::{DateTime, Utc};
use wavvy_domain::{
    activity::ActivityEvent,
    user::{NO_VALUE, User},
};
use wavvy_console::usecase::{DashboardView, StatsView, UsersPage, ViewState};

fn joined_date(user: &User) -> String {
    user.joined_at_millis()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| NO_VALUE.to_string())
}

fn role_label(user: &User) -> String {
    user.role()
        .map(|role| role.label().to_string())
        .unwrap_or_else(|| NO_VALUE.to_string())
}

fn verified_label(user: &User) -> &'static str {
    if user.is_verified() {
        "verified"
    } else {
        "unverified"
    }
}

fn user_line(user: &User) -> String {
    format!(
        "  {:<24} {:<32} {:<6} {:<10} {}",
        user.display_name(),
        user.email.as_deref().unwrap_or(NO_VALUE),
        role_label(user),
        verified_label(user),
        joined_date(user),
    )
}

fn activity_line(event: &ActivityEvent) -> String {
    let mut line = format!("  {}", event.headline());
    let summary = event.summary();
    if !summary.is_empty() {
        line.push_str(&format!(": {summary}"));
    }
    line.push_str(&format!(
        " ({}, {})",
        event.actor(),
        event.occurred_at().unwrap_or(NO_VALUE)
    ));
    line
}

fn section<T>(
    title: &str,
    state: &ViewState<Vec<T>>,
    empty: &str,
    line: impl Fn(&T) -> String,
) -> Vec<String> {
    let mut lines = vec![title.to_string()];
    match state {
        ViewState::Loading => lines.push("  Loading…".to_string()),
        ViewState::Empty => lines.push(format!("  {empty}")),
        ViewState::Failed(message) => lines.push(format!("  {message}")),
        ViewState::Ready(items) => lines.extend(items.iter().map(line)),
    }
    lines
}

/// ログイン中のユーザー
pub fn render_user(user: &User) -> String {
    let id = user
        .id
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| NO_VALUE.to_string());
    [
        format!("Name:     {}", user.display_name()),
        format!("Email:    {}", user.email.as_deref().unwrap_or(NO_VALUE)),
        format!("Username: {}", user.username.as_deref().unwrap_or(NO_VALUE)),
        format!("ID:       {id}"),
        format!("Role:     {}", role_label(user)),
        format!("Status:   {}", verified_label(user)),
        format!("Joined:   {}", joined_date(user)),
    ]
    .join("\n")
}

pub fn render_dashboard(view: &DashboardView) -> String {
    let stats = &view.stats;
    let total_all = stats
        .total_all
        .map(|count| count.to_string())
        .unwrap_or_else(|| NO_VALUE.to_string());

    let mut lines = vec![
        format!("Dashboard ({})", view.window.label()),
        String::new(),
        format!("  Total users:       {total_all}"),
        format!("  Users in range:    {}", stats.total_in_range),
        format!("  Admins in range:   {}", stats.admins),
        format!("  Verified in range: {}", stats.verified),
        String::new(),
    ];
    lines.extend(section(
        "Recent users",
        &view.recent_users,
        "No users yet.",
        user_line,
    ));
    lines.push(String::new());
    lines.extend(section(
        "Recent activity",
        &view.activities,
        "No activity yet.",
        activity_line,
    ));
    lines.join("\n")
}

pub fn render_users(page: &UsersPage, query: Option<&str>) -> String {
    let total = page
        .count
        .map(|count| format!("{count} total"))
        .unwrap_or_else(|| "total unknown".to_string());
    let mut lines = vec![format!(
        "Users — page {} of {} ({total})",
        page.page,
        page.total_pages()
    )];

    let rows = page.search(query.unwrap_or_default());
    if rows.is_empty() {
        lines.push("  No users match.".to_string());
    } else {
        lines.extend(rows.into_iter().map(user_line));
    }
    lines.join("\n")
}

/// ユーザー一覧の状態を表示用の文字列にする
///
/// 読み込みに失敗していれば、そのメッセージをエラーとして返す。
pub fn render_users_state(
    state: &ViewState<UsersPage>,
    query: Option<&str>,
) -> anyhow::Result<String> {
    match state {
        ViewState::Ready(page) => Ok(render_users(page, query)),
        // 読み込みが完了していなければ結果なしとして扱う
        ViewState::Empty | ViewState::Loading => Ok("No users found.".to_string()),
        ViewState::Failed(message) => anyhow::bail!("{message}"),
    }
}

pub fn render_stats(view: &StatsView) -> String {
    let stats = &view.stats;
    let rate = view
        .verification_rate_label()
        .unwrap_or_else(|| NO_VALUE.to_string());

    let mut lines = vec![
        "User statistics".to_string(),
        String::new(),
        format!("  Total users:       {}", stats.total()),
        format!("  Verified users:    {}", stats.verified()),
        format!("  Unverified users:  {}", stats.unverified()),
        format!("  Verification rate: {rate}"),
        format!("  Admin users:       {}", stats.admins()),
        format!("  Normal users:      {}", stats.normal()),
        format!("  Care users:        {}", stats.care()),
        format!("  Technician users:  {}", stats.technicians()),
        format!("  Recent signups:    {}", stats.recent_signups()),
        String::new(),
        format!("Grouped by {}", view.stat_type),
    ];
    lines.push(
        view.grouped_pretty()
            .unwrap_or_else(|| "  No grouped data.".to_string()),
    );
    lines.join("\n")
}
