use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use tempfile::NamedTempFile;

/// ログイン中のユーザー名を保存するキー。
pub const CURRENT_USER_KEY: &str = "currentUser";

/// ユーザーのパスワードハッシュを保存するキーを返す。
pub fn credentials_key(username: &str) -> String {
    format!("credentials_{}", username)
}

/// ユーザーのwork entry一覧を保存するキーを返す。
pub fn entries_key(username: &str) -> String {
    format!("workEntries_{}", username)
}

/// 文字列のキーと値を保存するストレージ。
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore {
    /// キーに対応する値を取得する。存在しない場合は`None`を返す。
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// キーに値を保存する。既に値がある場合は上書きする。
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// キーと値を削除する。存在しない場合は何もしない。
    fn remove(&self, key: &str) -> Result<()>;
}

/// 1つのJSONファイルに全てのキーと値を保存するストレージ。
///
/// 書き込みの度にファイル全体を書き換える。
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// 保存先ファイルの名前。
    const FILE_NAME: &'static str = "store.json";

    /// 新しい`FileStore`を返す。
    ///
    /// # Arguments
    ///
    /// * `dir` - 保存先のディレクトリ。存在しない場合は最初の書き込み時に作成する。
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(Self::FILE_NAME),
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read store: {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse store: {}", self.path.display()))
    }

    /// 同じディレクトリの一時ファイルに書き込んでから置き換える。
    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        let content = serde_json::to_string_pretty(values).context("Failed to serialize store")?;

        let mut file = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
        file.write_all(content.as_bytes())
            .context("Failed to write temporary store")?;
        file.persist(&self.path)
            .with_context(|| format!("Failed to write store: {}", self.path.display()))?;

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        debug!("Read key: {}", key);
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        debug!("Write key: {}", key);
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }

    fn remove(&self, key: &str) -> Result<()> {
        debug!("Remove key: {}", key);
        let mut values = self.read_all()?;
        if values.remove(key).is_some() {
            self.write_all(&values)?;
        }
        Ok(())
    }
}

/// テストで利用するメモリ上のストレージ。
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    values: std::cell::RefCell<BTreeMap<String, String>>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}
