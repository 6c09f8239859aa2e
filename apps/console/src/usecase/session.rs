//! # 管理画面の認証ガード
//!
//! 管理画面の各コマンドを実行する前に、保存済みトークンが有効かを確かめる。
//!
//! ## 判定
//!
//! | 状況 | 結果 | トークン |
//! |------|------|---------|
//! | トークン未保存 | [`SessionError::NotSignedIn`] | - |
//! | `me` が非 2xx | [`SessionError::SessionRejected`] | 破棄 |
//! | アクセスポリシーで拒否 | [`SessionError::AccessDenied`] | 破棄 |
//! | 通信エラー | [`SessionError::Transport`] | 保持 |
//! | それ以外 | ユーザーを返す | 保持 |

use std::sync::Arc;

use thiserror::Error;
use wavvy_domain::{access::AccessPolicy, user::User};
use wavvy_infra::{InfraError, TokenStore};

use super::helpers::discard_token;
use crate::client::{ApiError, WavvyClient};

/// 認証ガードのエラー
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Not signed in. Run `login` first.")]
    NotSignedIn,

    /// サーバーがトークンを受け付けなかった
    #[error("Session expired or invalid (status {status}). Please sign in again.")]
    SessionRejected { status: u16 },

    /// ログインはできたが管理画面の利用が許可されていない
    #[error("This account is not allowed to use the admin console.")]
    AccessDenied,

    #[error("Admin load failed: {0}")]
    Transport(#[from] ApiError),

    #[error("Could not access the saved session.")]
    TokenStore(#[from] InfraError),
}

/// 認証済みセッション
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub token: String,
    pub user: User,
}

/// 認証ガードユースケース実装
pub struct SessionUseCaseImpl {
    client: Arc<dyn WavvyClient>,
    tokens: Arc<dyn TokenStore>,
    policy: AccessPolicy,
}

impl SessionUseCaseImpl {
    pub fn new(
        client: Arc<dyn WavvyClient>,
        tokens: Arc<dyn TokenStore>,
        policy: AccessPolicy,
    ) -> Self {
        Self {
            client,
            tokens,
            policy,
        }
    }

    /// 管理画面を利用できるセッションを取得する
    pub async fn require_admin_session(&self) -> Result<AdminSession, SessionError> {
        let token = self
            .tokens
            .read()
            .await?
            .ok_or(SessionError::NotSignedIn)?;

        let reply = self.client.get_me(Some(&token)).await?;

        if !reply.ok {
            tracing::warn!(status = reply.status, "セッションが拒否されました");
            discard_token(self.tokens.as_ref()).await;
            return Err(SessionError::SessionRejected {
                status: reply.status,
            });
        }

        let user: User = reply
            .data
            .and_then(|data| serde_json::from_value(data).ok())
            .unwrap_or_default();

        if !self.policy.permits(&user) {
            tracing::warn!(policy = ?self.policy, "管理画面へのアクセスを拒否しました");
            discard_token(self.tokens.as_ref()).await;
            return Err(SessionError::AccessDenied);
        }

        Ok(AdminSession { token, user })
    }
}
