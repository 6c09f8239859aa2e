//! # 管理画面へのアクセスポリシー
//!
//! ログイン済みユーザーのうち、誰に管理画面の利用を許可するかを決める。
//!
//! | ポリシー | 許可されるユーザー |
//! |---------|-----------------|
//! | [`AccessPolicy::AnyAuthenticated`] | `me` の取得に成功したすべてのユーザー |
//! | [`AccessPolicy::AdminOnly`] | ロール `A`、またはスーパーユーザー |
//!
//! 既定は `AnyAuthenticated`。管理者ロールの付与状況を確認できた環境では
//! `AdminOnly` に切り替える。

use crate::user::User;

/// アクセスポリシー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessPolicy {
    #[default]
    AnyAuthenticated,
    AdminOnly,
}

impl AccessPolicy {
    /// ユーザーに管理画面の利用を許可するか
    pub fn permits(&self, user: &User) -> bool {
        match self {
            Self::AnyAuthenticated => true,
            Self::AdminOnly => user.is_admin() || user.is_superuser(),
        }
    }
}
