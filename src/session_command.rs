use anyhow::{Context, Result};
use log::info;

use crate::auth::{LoginOutcome, SessionGate};
use crate::storage::KeyValueStore;

/// `login`サブコマンドの引数を表す構造体。
#[derive(Debug, clap::Args)]
pub struct LoginArgs {
    #[clap(short = 'u', long = "username", help = "User name")]
    username: String,

    #[clap(
        short = 'p',
        long = "password",
        env = "WORKHOURS_PASSWORD",
        hide_env_values = true,
        help = "Password"
    )]
    password: String,

    #[clap(
        long = "reset",
        help = "Reset the stored password when it does not match"
    )]
    reset: bool,
}

/// ログイン、ログアウトを行うサブコマンド。
pub struct SessionCommand<'a, S: KeyValueStore> {
    gate: SessionGate<'a, S>,
}

impl<'a, S: KeyValueStore> SessionCommand<'a, S> {
    /// 新しい`SessionCommand`を返す。
    ///
    /// # Arguments
    /// * `store` - 資格情報とログイン中のユーザーを保存するストレージ
    pub fn new(store: &'a S) -> Self {
        Self {
            gate: SessionGate::new(store),
        }
    }

    /// `login`サブコマンドの処理を行う。
    pub fn login(&self, args: LoginArgs) -> Result<LoginOutcome> {
        self.gate
            .login(&args.username, &args.password, args.reset)
            .with_context(|| format!("Failed to login as {}", args.username.trim()))
    }

    /// `logout`サブコマンドの処理を行う。ログインしていない場合も成功とする。
    pub fn logout(&self) -> Result<()> {
        if self.gate.current_user()?.is_none() {
            info!("Not logged in.");
            return Ok(());
        }
        self.gate.logout()
    }

    /// `whoami`サブコマンドの処理を行う。
    pub fn whoami(&self) -> Result<String> {
        self.gate.require_user()
    }
}
