//! # トークンストア
//!
//! 認証 API が払い出したベアラートークンを 1 つだけ保持する。
//!
//! ## 設計方針
//!
//! - **単一値**: 保持するのはアクセストークン文字列のみ
//! - **空は未保存扱い**: 空文字列や空白のみのトークンは「トークンなし」と同義
//! - **冪等な削除**: 未保存の状態で `clear` しても成功する
//!
//! ## 実装
//!
//! - [`FileTokenStore`]: ユーザーの設定ディレクトリ配下のファイルに保存する
//! - [`MemoryTokenStore`]: プロセス内メモリに保持する（テスト用）

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};

use async_trait::async_trait;
use tokio::{fs::OpenOptions, io::AsyncWriteExt as _};

use crate::error::{FileOp, InfraError};

/// 設定ディレクトリ配下のアプリケーションディレクトリ名
const APP_DIR: &str = "wavvy-admin";

/// トークンファイル名
const TOKEN_FILE: &str = "wavvy_access_token";

/// トークンファイルのパーミッション（所有者のみ読み書き可）
#[cfg(unix)]
const TOKEN_FILE_MODE: u32 = 0o600;

/// トークンストアトレイト
///
/// ユースケース層はこのトレイトを通じてトークンを読み書きする。
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// 保存済みトークンを取得する
    ///
    /// 未保存、または空白のみの場合は `None` を返す。
    async fn read(&self) -> Result<Option<String>, InfraError>;

    /// トークンを保存する（既存の値は上書き）
    async fn write(&self, token: &str) -> Result<(), InfraError>;

    /// 保存済みトークンを削除する
    async fn clear(&self) -> Result<(), InfraError>;
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// ファイルベースのトークンストア
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// OS 標準の設定ディレクトリ配下にトークンファイルを置く
    ///
    /// Linux なら `$XDG_CONFIG_HOME/wavvy-admin/wavvy_access_token`。
    pub fn default_path() -> Result<PathBuf, InfraError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(TOKEN_FILE))
            .ok_or_else(InfraError::no_storage_location)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    #[tracing::instrument(skip_all, level = "debug", fields(path = %self.path.display()))]
    async fn read(&self) -> Result<Option<String>, InfraError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(non_blank(&raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(InfraError::token_file(FileOp::Read, &self.path, e)),
        }
    }

    #[tracing::instrument(skip_all, level = "debug", fields(path = %self.path.display()))]
    async fn write(&self, token: &str) -> Result<(), InfraError> {
        let write_err = |e| InfraError::token_file(FileOp::Write, &self.path, e);

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // トークンは本人以外に読ませない
        #[cfg(unix)]
        options.mode(TOKEN_FILE_MODE);

        let mut file = options.open(&self.path).await.map_err(write_err)?;

        // 既存ファイルは作成時のモードが適用されないため、書き込み前に絞る
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt as _;
            file.set_permissions(std::fs::Permissions::from_mode(TOKEN_FILE_MODE))
                .await
                .map_err(write_err)?;
        }

        file.write_all(token.as_bytes())
            .await
            .map_err(write_err)?;
        file.flush().await.map_err(write_err)?;

        tracing::debug!("トークンを保存しました");
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(path = %self.path.display()))]
    async fn clear(&self) -> Result<(), InfraError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!("トークンを削除しました");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(InfraError::token_file(FileOp::Remove, &self.path, e)),
        }
    }
}

/// メモリ上のトークンストア
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 初期トークンを持った状態で生成する
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // poison 時も保持値をそのまま使う
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn read(&self) -> Result<Option<String>, InfraError> {
        Ok(self.slot().as_deref().and_then(non_blank))
    }

    async fn write(&self, token: &str) -> Result<(), InfraError> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), InfraError> {
        *self.slot() = None;
        Ok(())
    }
}
