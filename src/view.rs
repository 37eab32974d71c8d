use anyhow::Result;
use chrono::NaiveDate;

use crate::period::{monthly_summary, MonthlySummary};
use crate::time_entry::WorkEntry;
use crate::time_format::{format_minutes_as_hours, iso_week_number};

/// 表や帳票の1行として表示するwork entry。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryRow {
    pub index: usize,
    pub date: String,
    pub week_number: u32,
    pub start_time: String,
    pub end_time: String,
    pub total_hours: String,
}

impl EntryRow {
    pub fn new(index: usize, entry: &WorkEntry) -> Self {
        Self {
            index,
            date: entry.date.format("%Y-%m-%d").to_string(),
            week_number: iso_week_number(entry.date),
            start_time: entry.start_time.clone(),
            end_time: entry.end_time.clone(),
            total_hours: format_minutes_as_hours(entry.total_minutes),
        }
    }
}

/// work entryを追加した順番のまま表示用の行に変換する。
pub fn entry_rows(entries: &[WorkEntry]) -> Vec<EntryRow> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| EntryRow::new(index, entry))
        .collect()
}

/// 操作の後に表示する、work entryの表と集計結果。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkLogView {
    pub rows: Vec<EntryRow>,
    pub summary: MonthlySummary,
}

impl WorkLogView {
    /// `reference`を基準日として集計した表示内容を返す。
    pub fn new(entries: &[WorkEntry], reference: NaiveDate) -> Result<Self> {
        Ok(Self {
            rows: entry_rows(entries),
            summary: monthly_summary(entries, reference)?,
        })
    }
}
