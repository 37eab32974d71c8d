use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::WorkError;
use crate::time_format::{format_minutes_as_time, parse_time_to_minutes};

/// 1日分の作業区間の記録。
///
/// 作成後に変更されることはなく、削除のみ可能。
/// 保存時のJSONは`{"date", "startTime", "endTime", "totalMinutes"}`の形になる。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkEntry {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub total_minutes: i64,
}

impl WorkEntry {
    /// 入力値を検証して新しい`WorkEntry`を返す。
    ///
    /// いずれかの値が空の場合、形式が不正な場合、終了時刻が開始時刻より後でない場合は
    /// `WorkError::Validation`を返す。
    ///
    /// # Arguments
    ///
    /// * `date` - `YYYY-MM-DD`形式の日付
    /// * `start` - `HH:MM`形式の開始時刻。保存時は2桁ずつにゼロ埋めする。
    /// * `end` - `HH:MM`形式の終了時刻
    pub fn new(date: &str, start: &str, end: &str) -> Result<Self, WorkError> {
        let (date, start, end) = (date.trim(), start.trim(), end.trim());
        if date.is_empty() || start.is_empty() || end.is_empty() {
            return Err(WorkError::Validation(
                "Please fill in date, start time, and end time.".to_string(),
            ));
        }

        let invalid_date =
            || WorkError::Validation(format!("Invalid date (expected YYYY-MM-DD): {}", date));
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| invalid_date())?;
        // 符号付きや5桁以上の年、ゼロ埋めしていない月日は受け付けない
        if parsed.format("%Y-%m-%d").to_string() != date {
            return Err(invalid_date());
        }
        let start_minutes = parse_time_to_minutes(start)?;
        let end_minutes = parse_time_to_minutes(end)?;
        if end_minutes <= start_minutes {
            return Err(WorkError::Validation(
                "End time must be after start time.".to_string(),
            ));
        }

        Ok(Self {
            date: parsed,
            start_time: format_minutes_as_time(start_minutes),
            end_time: format_minutes_as_time(end_minutes),
            total_minutes: end_minutes - start_minutes,
        })
    }
}
