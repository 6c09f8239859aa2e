//! # ログ出力の初期化
//!
//! コンソールの標準出力はコマンドの結果表示に使うため、ログは常に stderr に書く。
//!
//! | 環境変数 | 既定値 | 意味 |
//! |---------|-------|------|
//! | `RUST_LOG` | [`DEFAULT_FILTER`] | ログレベルのフィルタ |
//! | `LOG_FORMAT` | `pretty` | `json` で 1 行 1 イベントの JSON |

use std::str::FromStr;

/// `RUST_LOG` 未設定時のフィルタ
///
/// 依存クレート（reqwest, hyper など）の内部ログは警告以上に絞る。
pub const DEFAULT_FILTER: &str = "warn,wavvy_console=info,wavvy_infra=info";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// ログ収集基盤に流す場合
    Json,
    #[default]
    Pretty,
}

/// `LOG_FORMAT` に未知の値が指定された
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLogFormat(pub String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    /// 前後の空白と大文字小文字は無視する
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "" => Ok(Self::Pretty),
            _ => Err(UnknownLogFormat(s.to_string())),
        }
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// 呼び出し元が開く `app` スパンの `service` フィールドに入れる名前
    pub service_name: String,
    pub log_format: LogFormat,
    /// ANSI カラーを使うか（stderr が端末のときだけ）
    pub ansi: bool,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
            ansi: false,
        }
    }

    /// 環境変数から設定を読み取る
    pub fn from_env(service_name: impl Into<String>) -> Self {
        use std::io::IsTerminal as _;

        let mut config = Self::from_lookup(service_name, |key| std::env::var(key).ok());
        config.ansi = config.log_format == LogFormat::Pretty && std::io::stderr().is_terminal();
        config
    }

    /// 任意の参照関数から設定を読み取る
    ///
    /// 未知の `LOG_FORMAT` は `Pretty` として扱い、その旨を stderr に出す。
    /// この時点ではまだサブスクライバがないため `tracing` は使えない。
    pub fn from_lookup<F>(service_name: impl Into<String>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_format = match lookup("LOG_FORMAT").map(|v| v.parse::<LogFormat>()) {
            None => LogFormat::default(),
            Some(Ok(format)) => format,
            Some(Err(UnknownLogFormat(value))) => {
                eprintln!("warning: LOG_FORMAT={value:?} is not json or pretty; using pretty");
                LogFormat::Pretty
            }
        };
        Self::new(service_name, log_format)
    }
}

/// グローバルサブスクライバを登録する
///
/// `ErrorLayer` も登録するので、インフラ層のエラーが捕捉する `SpanTrace` に
/// 呼び出し経路のスパンが残る。二重に呼んだ場合は 2 回目を無視する。
#[cfg(feature = "observability")]
pub fn init_tracing(config: TracingConfig) {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .compact()
            .with_ansi(config.ansi)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .try_init();
    if result.is_ok() {
        tracing::debug!(service = %config.service_name, format = ?config.log_format, "トレーシングを初期化しました");
    }
}
