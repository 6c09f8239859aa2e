//! # 認証ユースケース
//!
//! ログイン・サインアップ・パスワード再設定・ログアウトを扱う。
//!
//! ## トークンの扱い
//!
//! - ログイン成功時は応答から取り出したトークンを保存する。取り出せなければ失敗
//! - サインアップ成功時はトークンが含まれていれば保存する（含まれないサーバーもある）
//! - ログアウトは保存済みトークンを削除するだけで、API は呼ばない

use std::sync::Arc;

use wavvy_domain::{
    DomainError,
    credentials::{LoginCredentials, NewPassword, PlainPassword, ResetEmail},
};
use wavvy_infra::TokenStore;

use super::view::ViewError;
use crate::{
    client::{SignUpRequest, WavvyClient, login_token, signup_token},
    config::ConsoleConfig,
};

/// サインアップの結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUpResult {
    /// アカウントを作成し、応答のトークンでログイン済み
    SignedIn,
    /// アカウントは作成されたが、応答にトークンが含まれなかった
    Created,
}

/// 認証ユースケース実装
pub struct AuthUseCaseImpl {
    client: Arc<dyn WavvyClient>,
    tokens: Arc<dyn TokenStore>,
    config: ConsoleConfig,
}

impl AuthUseCaseImpl {
    pub fn new(
        client: Arc<dyn WavvyClient>,
        tokens: Arc<dyn TokenStore>,
        config: ConsoleConfig,
    ) -> Self {
        Self {
            client,
            tokens,
            config,
        }
    }

    /// パスワードグラントでログインし、トークンを保存する
    pub async fn login(&self, identifier: &str, password: PlainPassword) -> Result<(), ViewError> {
        let client_id = self.config.require_client_id()?;
        let credentials = LoginCredentials::new(identifier, password)?;

        let reply = self
            .client
            .request_token(
                credentials.identifier(),
                credentials.password().as_str(),
                client_id,
            )
            .await?;

        if !reply.ok {
            tracing::warn!(status = reply.status, "ログインに失敗しました");
            return Err(ViewError::RequestFailed(
                reply
                    .error_detail()
                    .unwrap_or_else(|| format!("Login failed ({}).", reply.status)),
            ));
        }

        let token = reply.data.as_ref().and_then(login_token).ok_or_else(|| {
            ViewError::RequestFailed(
                "Login succeeded but no access token was found in the response.".to_string(),
            )
        })?;

        self.tokens.write(&token).await?;
        tracing::info!("ログインしました");
        Ok(())
    }

    /// アカウントを作成する
    ///
    /// `full_name` は前後の空白を除いて空でない場合のみ送信する。
    pub async fn signup(
        &self,
        email: &str,
        password: PlainPassword,
        full_name: Option<&str>,
    ) -> Result<SignUpResult, ViewError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(DomainError::Validation(
                "Please enter email and password.".to_string(),
            )
            .into());
        }

        let request = SignUpRequest {
            email: email.to_string(),
            password: password.as_str().to_string(),
            full_name: full_name.map(str::to_string),
        };
        let reply = self.client.sign_up(&request).await?;

        if !reply.ok {
            tracing::warn!(status = reply.status, "サインアップに失敗しました");
            return Err(ViewError::RequestFailed(
                reply
                    .error_detail()
                    .unwrap_or_else(|| "Signup failed.".to_string()),
            ));
        }

        match reply.data.as_ref().and_then(signup_token) {
            Some(token) => {
                self.tokens.write(&token).await?;
                tracing::info!("サインアップしてログインしました");
                Ok(SignUpResult::SignedIn)
            }
            None => {
                tracing::info!("サインアップしました（トークンなし）");
                Ok(SignUpResult::Created)
            }
        }
    }

    /// パスワード再設定メールの送信を依頼する
    pub async fn forgot_password(&self, email: &str) -> Result<(), ViewError> {
        let email = ResetEmail::new(email)?;

        let reply = self.client.forgot_password(email.as_str()).await?;

        if !reply.ok {
            return Err(ViewError::RequestFailed(
                reply
                    .error_detail()
                    .unwrap_or_else(|| "Failed to send reset email.".to_string()),
            ));
        }
        Ok(())
    }

    /// 再設定トークンでパスワードを変更する
    ///
    /// 送信前にトークンの有無・パスワード強度・確認入力の一致を検証する。
    pub async fn reset_password(
        &self,
        reset_token: &str,
        password: PlainPassword,
        confirmation: &PlainPassword,
    ) -> Result<(), ViewError> {
        let reset_token = reset_token.trim();
        if reset_token.is_empty() {
            return Err(DomainError::Validation(
                "Invalid or missing reset token.".to_string(),
            )
            .into());
        }
        let password = NewPassword::new(password, confirmation)?;

        let reply = self
            .client
            .reset_password(reset_token, password.as_str())
            .await?;

        if !reply.ok {
            return Err(ViewError::RequestFailed(
                reply
                    .error_detail()
                    .unwrap_or_else(|| "Failed to reset password.".to_string()),
            ));
        }
        tracing::info!("パスワードを再設定しました");
        Ok(())
    }

    /// 保存済みトークンを削除する
    pub async fn logout(&self) -> Result<(), ViewError> {
        self.tokens.clear().await?;
        tracing::info!("ログアウトしました");
        Ok(())
    }
}
