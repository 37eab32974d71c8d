use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use log::{info, warn};

use crate::entry_store::EntryStore;
use crate::error::WorkError;
use crate::storage::{credentials_key, KeyValueStore, CURRENT_USER_KEY};

/// 保存済みのストアと互換性のあるパスワードの符号化を行う。
///
/// Base64で符号化しているだけで復元可能なため、一方向ハッシュではない。
pub fn hash_password(password: &str) -> String {
    B64.encode(password.as_bytes())
}

/// ログインの結果。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    /// 初めてのユーザーのため資格情報を作成した
    Created,
    /// 保存済みの資格情報と一致した
    Authenticated,
    /// 一致しなかったため、確認の上で資格情報を上書きした
    Reset,
}

/// ユーザーの資格情報の確認と、ログイン中のユーザーを管理する。
pub struct SessionGate<'a, S: KeyValueStore> {
    store: &'a S,
}

impl<'a, S: KeyValueStore> SessionGate<'a, S> {
    /// 新しい`SessionGate`を返す。
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// ユーザー名とパスワードを確認し、成功した場合はログイン中のユーザーとする。
    ///
    /// パスワードが一致しない場合、`reset`が`true`であれば資格情報を上書きしてログインする。
    /// `false`であれば`WorkError::AuthMismatch`を返し、何も変更しない。
    ///
    /// # Arguments
    ///
    /// * `username` - ユーザー名。前後の空白は取り除く。
    /// * `password` - パスワード
    /// * `reset` - 一致しない場合に資格情報を上書きすることを確認済みかどうか
    pub fn login(&self, username: &str, password: &str, reset: bool) -> Result<LoginOutcome> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(
                WorkError::Validation("Please fill in username and password.".to_string()).into(),
            );
        }

        let key = credentials_key(username);
        let hashed = hash_password(password);
        let saved = self
            .store
            .get(&key)
            .with_context(|| format!("Failed to read credentials of {}", username))?;

        let outcome = match saved {
            Some(saved) if saved == hashed => LoginOutcome::Authenticated,
            Some(_) if !reset => {
                return Err(WorkError::AuthMismatch {
                    username: username.to_string(),
                }
                .into());
            }
            Some(_) => {
                warn!("Reset credentials of {}", username);
                LoginOutcome::Reset
            }
            None => LoginOutcome::Created,
        };
        if outcome != LoginOutcome::Authenticated {
            self.store
                .set(&key, &hashed)
                .with_context(|| format!("Failed to save credentials of {}", username))?;
        }

        self.store
            .set(CURRENT_USER_KEY, username)
            .context("Failed to save current user")?;
        info!("Logged in as {} ({:?})", username, outcome);

        Ok(outcome)
    }

    /// ログイン中のユーザー名を返す。
    pub fn current_user(&self) -> Result<Option<String>> {
        self.store
            .get(CURRENT_USER_KEY)
            .context("Failed to read current user")
    }

    /// ログイン中のユーザー名を返す。ログインしていない場合は`WorkError::NotLoggedIn`を返す。
    pub fn require_user(&self) -> Result<String> {
        self.current_user()?
            .ok_or_else(|| WorkError::NotLoggedIn.into())
    }

    /// ログイン中のユーザーのwork entry一覧を読み込む。
    pub fn open_entries(&self) -> Result<EntryStore<'a, S>> {
        let username = self.require_user()?;
        EntryStore::load(self.store, &username)
    }

    /// ログアウトする。work entryと資格情報は残る。
    pub fn logout(&self) -> Result<()> {
        self.store
            .remove(CURRENT_USER_KEY)
            .context("Failed to remove current user")?;
        info!("Logged out");

        Ok(())
    }
}
