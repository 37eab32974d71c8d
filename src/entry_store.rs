use anyhow::{Context, Result};
use log::{debug, info};

use crate::error::WorkError;
use crate::storage::{entries_key, KeyValueStore};
use crate::time_entry::WorkEntry;

/// ユーザーのwork entry一覧をストレージから読み込む。
///
/// 保存されていない場合は空の一覧を返す。
/// 保存内容が入力時の検証を通らないwork entryを含む場合は`WorkError::Validation`を返す。
pub fn load_for_user<S: KeyValueStore>(store: &S, username: &str) -> Result<Vec<WorkEntry>> {
    let key = entries_key(username);
    let entries: Vec<WorkEntry> = match store
        .get(&key)
        .with_context(|| format!("Failed to read entries of {}", username))?
    {
        Some(json) => serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse entries of {}", username))?,
        None => vec![],
    };
    for (index, entry) in entries.iter().enumerate() {
        validate_stored(entry)
            .with_context(|| format!("Invalid entry {} of {}", index, username))?;
    }
    debug!("Loaded {} entries of {}", entries.len(), username);

    Ok(entries)
}

/// 保存済みのwork entryを入力値として作り直し、同じ内容になることを確認する。
fn validate_stored(entry: &WorkEntry) -> Result<(), WorkError> {
    let rebuilt = WorkEntry::new(
        &entry.date.format("%Y-%m-%d").to_string(),
        &entry.start_time,
        &entry.end_time,
    )?;
    if rebuilt != *entry {
        return Err(WorkError::Validation(format!(
            "Stored entry does not match its times: {} {}-{} ({} min)",
            entry.date, entry.start_time, entry.end_time, entry.total_minutes
        )));
    }

    Ok(())
}

/// ユーザーのwork entry一覧で保存内容を丸ごと置き換える。
pub fn persist<S: KeyValueStore>(store: &S, username: &str, entries: &[WorkEntry]) -> Result<()> {
    let json = serde_json::to_string(entries).context("Failed to serialize entries")?;
    store
        .set(&entries_key(username), &json)
        .with_context(|| format!("Failed to save entries of {}", username))
}

/// ログイン中のユーザーと、そのユーザーのwork entry一覧を保持する。
///
/// 一覧の順番は追加した順番であり、日付順とは限らない。
/// 変更した場合は常に一覧全体を保存する。
pub struct EntryStore<'a, S: KeyValueStore> {
    store: &'a S,
    username: String,
    entries: Vec<WorkEntry>,
}

impl<'a, S: KeyValueStore> EntryStore<'a, S> {
    /// ユーザーの保存済みのwork entry一覧を読み込んだ`EntryStore`を返す。
    pub fn load(store: &'a S, username: &str) -> Result<Self> {
        let entries = load_for_user(store, username)?;

        Ok(Self {
            store,
            username: username.to_string(),
            entries,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn entries(&self) -> &[WorkEntry] {
        &self.entries
    }

    /// work entryを末尾に追加して保存する。
    ///
    /// 入力が不正な場合は`WorkError::Validation`を返し、一覧は変更しない。
    pub fn add_entry(&mut self, date: &str, start: &str, end: &str) -> Result<WorkEntry> {
        let entry = WorkEntry::new(date, start, end)?;

        let mut entries = self.entries.clone();
        entries.push(entry.clone());
        persist(self.store, &self.username, &entries)?;
        self.entries = entries;
        info!(
            "Added entry: {} {}-{} ({} min)",
            entry.date, entry.start_time, entry.end_time, entry.total_minutes
        );

        Ok(entry)
    }

    /// 指定した位置のwork entryを削除して保存する。
    ///
    /// 範囲外の場合は`WorkError::Index`を返し、一覧は変更しない。
    pub fn delete_entry(&mut self, index: usize) -> Result<WorkEntry> {
        if index >= self.entries.len() {
            return Err(WorkError::Index {
                index,
                len: self.entries.len(),
            }
            .into());
        }

        let mut entries = self.entries.clone();
        let removed = entries.remove(index);
        persist(self.store, &self.username, &entries)?;
        self.entries = entries;
        info!("Deleted entry {}: {}", index, removed.date);

        Ok(removed)
    }
}
