//! # ユーザー一覧ユースケース
//!
//! ユーザー一覧を 1 ページずつ取得し、読み込んだページの中で検索する。
//!
//! - ページサイズは 12 件固定
//! - 総ページ数はサーバーの `count` から計算し、`count` が 0 または不明なら 1
//! - 検索はサーバーに問い合わせず、読み込み済みの行だけを対象にする
//! - ページ切り替えは [`LatestResponse`] を通し、追い越された応答は捨てる

use std::sync::Arc;

use wavvy_domain::user::User;
use wavvy_infra::TokenStore;

use super::{
    helpers::discard_token,
    latest::LatestResponse,
    view::{ViewError, ViewState},
};
use crate::client::{Outcome, WavvyClient};

/// ユーザー一覧のページサイズ
pub const USERS_PAGE_SIZE: u32 = 12;

/// 総ページ数を計算する
pub fn total_pages(count: Option<u64>, page_size: u32) -> u64 {
    match count {
        Some(count) if count > 0 => count.div_ceil(u64::from(page_size.max(1))),
        _ => 1,
    }
}

/// 読み込んだユーザー一覧の 1 ページ
#[derive(Debug, Clone, PartialEq)]
pub struct UsersPage {
    pub page: u32,
    /// サーバー上の総件数
    pub count: Option<u64>,
    pub rows: Vec<User>,
}

impl UsersPage {
    pub fn total_pages(&self) -> u64 {
        total_pages(self.count, USERS_PAGE_SIZE)
    }

    /// 表示名・メールアドレス・ユーザー名で絞り込む
    ///
    /// 大文字小文字を区別しない部分一致。空白のみのクエリは全件を返す。
    pub fn search(&self, query: &str) -> Vec<&User> {
        self.rows.iter().filter(|u| u.matches_query(query)).collect()
    }
}

/// ユーザー一覧ユースケース実装
pub struct UsersUseCaseImpl {
    client: Arc<dyn WavvyClient>,
    tokens: Arc<dyn TokenStore>,
    latest: LatestResponse<u32, ViewState<UsersPage>>,
}

impl UsersUseCaseImpl {
    pub fn new(client: Arc<dyn WavvyClient>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            client,
            tokens,
            latest: LatestResponse::new(),
        }
    }

    /// 指定ページを取得する
    ///
    /// 401/403 の場合は保存済みトークンを破棄して [`ViewError::Unauthorized`] を返す。
    #[tracing::instrument(skip(self, token), level = "debug")]
    pub async fn load(&self, token: &str, page: u32) -> Result<UsersPage, ViewError> {
        let page = page.max(1);
        let reply = self
            .client
            .list_users(Some(token), page, USERS_PAGE_SIZE)
            .await?;

        match reply.outcome() {
            Outcome::Success => {
                let list = reply.into_list().into_records::<User>();
                Ok(UsersPage {
                    page,
                    count: list.count,
                    rows: list.items,
                })
            }
            Outcome::Unauthorized => {
                tracing::warn!(status = reply.status, "ユーザー一覧の取得が拒否されました");
                discard_token(self.tokens.as_ref()).await;
                Err(ViewError::Unauthorized(
                    "Not allowed to list users.".to_string(),
                ))
            }
            Outcome::Failed => {
                tracing::warn!(status = reply.status, "ユーザー一覧の取得に失敗しました");
                Err(ViewError::RequestFailed("Failed to load users.".to_string()))
            }
        }
    }

    /// ページを切り替える
    ///
    /// 取得中に別のページが選択された場合、この応答は破棄して `None` を返す。
    pub async fn select_page(&self, token: &str, page: u32) -> Option<ViewState<UsersPage>> {
        let ticket = self.latest.begin(page.max(1));

        let state = match self.load(token, *ticket.key()).await {
            Ok(loaded) if loaded.rows.is_empty() => ViewState::Empty,
            Ok(loaded) => ViewState::Ready(loaded),
            Err(e) => ViewState::Failed(e.to_string()),
        };

        self.latest.apply(&ticket, state.clone()).then_some(state)
    }

    /// 最後に適用されたページの状態
    pub fn current(&self) -> ViewState<UsersPage> {
        self.latest.current().unwrap_or_default()
    }
}
