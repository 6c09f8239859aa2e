//! # インフラ層エラー定義
//!
//! トークンファイルの読み書きで発生するエラーを表現する。
//!
//! [`InfraError`] は種別（[`InfraErrorKind`]）と生成時点の [`SpanTrace`] を持つ。
//! `Display` は種別のメッセージだけを出し、スパン情報は [`InfraError::span_trace`] で取り出す。

use std::{fmt, path::PathBuf};

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// ファイル操作の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FileOp {
    #[display("読み込み")]
    Read,
    #[display("書き込み")]
    Write,
    #[display("削除")]
    Remove,
}

/// インフラ層で発生するエラー
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind: InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// トークンファイルの操作に失敗
    #[error("トークンファイルの{op}に失敗しました（{}）: {source}", path.display())]
    TokenFile {
        op: FileOp,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// ホームディレクトリや設定ディレクトリを解決できない
    #[error("トークンの保存先を決定できません")]
    NoStorageLocation,
}

impl InfraError {
    fn new(kind: InfraErrorKind) -> Self {
        Self {
            kind,
            span_trace: SpanTrace::capture(),
        }
    }

    pub fn token_file(op: FileOp, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::new(InfraErrorKind::TokenFile {
            op,
            path: path.into(),
            source,
        })
    }

    pub fn no_storage_location() -> Self {
        Self::new(InfraErrorKind::NoStorageLocation)
    }

    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }
}

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}
