//! # Wavvy 管理コンソール
//!
//! Wavvy REST API を操作する管理者向けコマンドラインツール。
//!
//! ## 役割
//!
//! - **認証**: ログイン・サインアップ・パスワード再設定・ログアウト
//! - **ダッシュボード**: ユーザー数の集計と最近のユーザー・アクティビティ
//! - **ユーザー一覧**: ページ単位の取得と読み込み済みページ内の検索
//! - **統計**: 全体統計とグループ別統計
//!
//! ## 環境変数
//!
//! `.env` ファイルがあれば読み込む。
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `WAVVY_API_BASE` | **Yes** | REST API のベース URL |
//! | `WAVVY_CLIENT_ID` | `login` のみ | OAuth2 クライアント ID |
//! | `WAVVY_TOKEN_PATH` | No | トークンファイルのパス |
//! | `WAVVY_REQUIRE_ADMIN` | No | `true` で管理者のみ許可 |
//! | `LOG_FORMAT` | No | `json` / `pretty` |
//!
//! ## 使い方
//!
//! ```bash
//! wavvy-console login admin@example.com
//! wavvy-console dashboard --range 30d
//! wavvy-console users --page 2 --search ada
//! wavvy-console stats --group year
//! ```

mod render;

use std::{io::Write as _, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use wavvy_console::{
    client::{ApiClient, WavvyClient},
    config::ConsoleConfig,
    usecase::{
        AdminSession,
        AuthUseCaseImpl,
        DashboardUseCaseImpl,
        SessionUseCaseImpl,
        SignUpResult,
        StatsUseCaseImpl,
        UsersUseCaseImpl,
    },
};
use wavvy_domain::{
    clock::SystemClock,
    credentials::PlainPassword,
    stats::StatType,
    time_window::TimeWindow,
};
use wavvy_infra::{FileTokenStore, TokenStore};
use wavvy_shared::observability::{TracingConfig, init_tracing};

#[derive(Parser)]
#[command(name = "wavvy-console")]
#[command(about = "Admin console for the Wavvy REST API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email/username and password
    Login {
        identifier: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account
    Signup {
        email: String,
        #[arg(long)]
        full_name: Option<String>,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Request a password reset email
    ForgotPassword { email: String },
    /// Set a new password with a reset token
    ResetPassword {
        #[arg(long)]
        token: String,
    },
    /// Forget the saved session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Summary cards, recent users and recent activity
    Dashboard {
        /// 7d, 30d or all
        #[arg(long, default_value = "7d")]
        range: TimeWindow,
    },
    /// List users page by page
    Users {
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
        /// Filter the loaded page by name, email or username
        #[arg(long)]
        search: Option<String>,
    },
    /// User statistics
    Stats {
        /// day, month, year or all
        #[arg(long, default_value = "month")]
        group: StatType,
    },
}

/// 標準入力から 1 行読み、パスワードとして扱う
fn prompt_password(prompt: &str) -> anyhow::Result<PlainPassword> {
    eprint!("{prompt}: ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("failed to read password")?;
    Ok(PlainPassword::new(line.trim_end_matches(['\r', '\n'])))
}

fn password_or_prompt(value: Option<String>, prompt: &str) -> anyhow::Result<PlainPassword> {
    match value {
        Some(value) => Ok(PlainPassword::new(value)),
        None => prompt_password(prompt),
    }
}

/// 依存関係をまとめたもの
struct App {
    config: ConsoleConfig,
    client: Arc<dyn WavvyClient>,
    tokens: Arc<dyn TokenStore>,
}

impl App {
    fn new(config: ConsoleConfig) -> anyhow::Result<Self> {
        let token_path = match &config.token_path {
            Some(path) => path.clone(),
            None => FileTokenStore::default_path()?,
        };
        tracing::debug!(path = %token_path.display(), "トークンファイル");

        Ok(Self {
            client: Arc::new(ApiClient::new(&config.api_base)),
            tokens: Arc::new(FileTokenStore::new(token_path)),
            config,
        })
    }

    fn auth(&self) -> AuthUseCaseImpl {
        AuthUseCaseImpl::new(
            self.client.clone(),
            self.tokens.clone(),
            self.config.clone(),
        )
    }

    /// 管理画面のコマンドを実行する前に認証ガードを通す
    async fn admin_session(&self) -> anyhow::Result<AdminSession> {
        let guard = SessionUseCaseImpl::new(
            self.client.clone(),
            self.tokens.clone(),
            self.config.access_policy,
        );
        Ok(guard.require_admin_session().await?)
    }

    async fn run(&self, command: Commands) -> anyhow::Result<()> {
        match command {
            Commands::Login {
                identifier,
                password,
            } => {
                let password = password_or_prompt(password, "Password")?;
                self.auth().login(&identifier, password).await?;
                println!("Signed in.");
            }
            Commands::Signup {
                email,
                full_name,
                password,
            } => {
                let password = password_or_prompt(password, "Password")?;
                let result = self
                    .auth()
                    .signup(&email, password, full_name.as_deref())
                    .await?;
                match result {
                    SignUpResult::SignedIn => println!("Account created. Signed in."),
                    SignUpResult::Created => println!("Account created. Please sign in."),
                }
            }
            Commands::ForgotPassword { email } => {
                self.auth().forgot_password(&email).await?;
                println!("If an account exists for that email, a reset link has been sent.");
            }
            Commands::ResetPassword { token } => {
                let password = prompt_password("New password")?;
                let confirmation = prompt_password("Confirm new password")?;
                self.auth()
                    .reset_password(&token, password, &confirmation)
                    .await?;
                println!("Password has been reset. Please sign in.");
            }
            Commands::Logout => {
                self.auth().logout().await?;
                println!("Signed out.");
            }
            Commands::Whoami => {
                let session = self.admin_session().await?;
                println!("{}", render::render_user(&session.user));
            }
            Commands::Dashboard { range } => {
                let session = self.admin_session().await?;
                let dashboard = DashboardUseCaseImpl::new(
                    self.client.clone(),
                    self.tokens.clone(),
                    Arc::new(SystemClock),
                );
                let view = dashboard.load(&session.token, range).await;
                println!("{}", render::render_dashboard(&view));
            }
            Commands::Users { page, search } => {
                let session = self.admin_session().await?;
                let users = UsersUseCaseImpl::new(self.client.clone(), self.tokens.clone());
                users.select_page(&session.token, page).await;
                let text = render::render_users_state(&users.current(), search.as_deref())?;
                println!("{text}");
            }
            Commands::Stats { group } => {
                let session = self.admin_session().await?;
                let stats = StatsUseCaseImpl::new(self.client.clone(), self.tokens.clone());
                let view = stats.load(&session.token, group).await?;
                println!("{}", render::render_stats(&view));
            }
        }
        Ok(())
    }
}

/// コンソールのエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. 引数の解析と設定の読み込み
/// 4. コマンドの実行
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    let tracing_config = TracingConfig::from_env("console");
    init_tracing(tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "console").entered();

    let cli = Cli::parse();

    // 設定読み込み
    let config = ConsoleConfig::from_env().context("failed to load configuration")?;
    let app = App::new(config)?;

    app.run(cli.command).await
}
