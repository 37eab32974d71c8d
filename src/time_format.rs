use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike};

use crate::error::WorkError;

/// 月の名前。インデックスは0始まり。
const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// `HH:MM`形式(24時間表記)の時刻を0時からの経過分に変換する。
///
/// 時は0-23、分は0-59の範囲でなければならず、それ以外は`WorkError::Validation`を返す。
///
/// # Examples
///
/// ```
/// assert_eq!(parse_time_to_minutes("09:30").unwrap(), 570);
/// ```
pub fn parse_time_to_minutes(s: &str) -> Result<i64, WorkError> {
    let time = NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| WorkError::Validation(format!("Invalid time (expected HH:MM): {}", s)))?;

    Ok(i64::from(time.hour()) * 60 + i64::from(time.minute()))
}

/// 0時からの経過分を`HH:MM`形式の時刻にする。
pub fn format_minutes_as_time(minutes: i64) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// 分を時間単位に変換し、小数点以下2桁の文字列にする。
pub fn format_minutes_as_hours(minutes: i64) -> String {
    format!("{:.2}", minutes as f64 / 60.0)
}

/// ISO-8601の週番号を返す。
///
/// 日付をその週の木曜日へずらし、木曜日が属する年の1月1日からの日数で週を数える。
/// そのため12月末の日付が翌年の第1週に、1月初めの日付が前年の第52/53週になることがある。
pub fn iso_week_number(date: NaiveDate) -> u32 {
    let weekday = i64::from(date.weekday().number_from_monday());
    match date.checked_add_signed(Duration::days(4 - weekday)) {
        Some(thursday) => (thursday.ordinal0() + 1 + 6) / 7,
        // 表現可能な範囲の端ではずらせないため、chronoの計算に任せる
        None => date.iso_week().week(),
    }
}

/// 0始まりの月のインデックスを英語の月名に変換する。範囲外の場合は空文字を返す。
pub fn month_name(index: usize) -> &'static str {
    MONTH_NAMES.get(index).copied().unwrap_or("")
}
