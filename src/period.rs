use std::fmt;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use log::debug;

use crate::time_entry::WorkEntry;
use crate::time_format::{format_minutes_as_hours, month_name};

/// 締め日の翌日。期間は20日から翌月19日までとなる。
const PERIOD_START_DAY: u32 = 20;

/// 20日から翌月19日までの集計期間。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PayPeriod {
    /// 開始日の00:00:00
    pub start: NaiveDateTime,
    /// 終了日の23:59:59
    pub end: NaiveDateTime,
}

impl PayPeriod {
    /// 日付が期間内(両端を含む)かどうかを返す。
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.date() <= date && date <= self.end.date()
    }
}

/// 基準日を含む集計期間を返す。
///
/// 基準日が20日以降の場合は当月20日から翌月19日まで、
/// それ以外の場合は前月20日から当月19日までとなる。
pub fn current_period_bounds(reference: NaiveDate) -> Result<PayPeriod> {
    let (year, month) = (reference.year(), reference.month());
    let ((start_year, start_month), (end_year, end_month)) =
        if reference.day() >= PERIOD_START_DAY {
            ((year, month), next_month(year, month))
        } else {
            (previous_month(year, month), (year, month))
        };

    let start = NaiveDate::from_ymd_opt(start_year, start_month, PERIOD_START_DAY)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .with_context(|| format!("Failed to build period start for {}", reference))?;
    let end = NaiveDate::from_ymd_opt(end_year, end_month, PERIOD_START_DAY - 1)
        .and_then(|date| date.and_hms_opt(23, 59, 59))
        .with_context(|| format!("Failed to build period end for {}", reference))?;
    debug!("Period of {}: {} - {}", reference, start, end);

    Ok(PayPeriod { start, end })
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// 期間内の日付を持つwork entryの合計時間(分)を返す。
pub fn sum_minutes_in_period(entries: &[WorkEntry], period: &PayPeriod) -> i64 {
    entries
        .iter()
        .filter(|entry| period.contains(entry.date))
        .map(|entry| entry.total_minutes)
        .sum()
}

/// 全てのwork entryの合計時間(分)を返す。
pub fn sum_minutes(entries: &[WorkEntry]) -> i64 {
    entries.iter().map(|entry| entry.total_minutes).sum()
}

/// 月ごとの集計結果。
///
/// work entryが1件もない場合は合計0とは区別して`NoEntries`とする。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MonthlySummary {
    NoEntries {
        month_name: String,
    },
    Total {
        month_name: String,
        total_minutes: i64,
    },
}

impl fmt::Display for MonthlySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthlySummary::NoEntries { month_name } => {
                write!(f, "Month: {}\n\nNo entries yet.", month_name)
            }
            MonthlySummary::Total {
                month_name,
                total_minutes,
            } => write!(
                f,
                "Month: {}\nMonth Total (20th to 19th): {} hrs",
                month_name,
                format_minutes_as_hours(*total_minutes)
            ),
        }
    }
}

/// 基準日の集計期間でwork entryを集計する。
///
/// 月名は期間の開始月ではなく基準日の月を利用する。
pub fn monthly_summary(entries: &[WorkEntry], reference: NaiveDate) -> Result<MonthlySummary> {
    let month_name = month_name(reference.month0() as usize).to_string();
    if entries.is_empty() {
        return Ok(MonthlySummary::NoEntries { month_name });
    }

    let period = current_period_bounds(reference)?;
    Ok(MonthlySummary::Total {
        month_name,
        total_minutes: sum_minutes_in_period(entries, &period),
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::rstest;

    use super::{
        current_period_bounds, monthly_summary, sum_minutes, sum_minutes_in_period,
        MonthlySummary,
    };
    use crate::time_entry::WorkEntry;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn entry(date: &str, start: &str, end: &str) -> WorkEntry {
        WorkEntry::new(date, start, end).unwrap()
    }

    #[rstest]
    #[case::after_20th("2025-06-25", "2025-06-20", "2025-07-19")]
    #[case::on_20th("2025-06-20", "2025-06-20", "2025-07-19")]
    #[case::on_19th("2025-06-19", "2025-05-20", "2025-06-19")]
    #[case::first_day("2025-06-01", "2025-05-20", "2025-06-19")]
    #[case::december_end("2025-12-31", "2025-12-20", "2026-01-19")]
    #[case::january_start("2026-01-05", "2025-12-20", "2026-01-19")]
    #[case::february("2024-02-29", "2024-02-20", "2024-03-19")]
    fn test_current_period_bounds(
        #[case] reference: &str,
        #[case] start: &str,
        #[case] end: &str,
    ) {
        let period = current_period_bounds(date(reference)).unwrap();

        assert_eq!(period.start, date(start).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(period.end, date(end).and_hms_opt(23, 59, 59).unwrap());
    }

    /// 19日と20日のwork entryが隣り合う期間に分かれることを確認する。
    #[test]
    fn test_sum_minutes_in_period_split() {
        let entries = vec![
            entry("2025-06-19", "09:00", "17:00"),
            entry("2025-06-20", "09:00", "17:00"),
        ];

        let current = current_period_bounds(date("2025-06-25")).unwrap();
        let previous = current_period_bounds(date("2025-06-10")).unwrap();

        assert_eq!(sum_minutes_in_period(&entries, &current), 480);
        assert_eq!(sum_minutes_in_period(&entries, &previous), 480);
    }

    /// 期間の両端を含み、外側は含まないことを確認する。
    #[test]
    fn test_sum_minutes_in_period_bounds() {
        let entries = vec![
            entry("2025-06-19", "09:00", "10:00"),
            entry("2025-06-20", "09:00", "11:00"),
            entry("2025-07-19", "09:00", "12:00"),
            entry("2025-07-20", "09:00", "13:00"),
        ];
        let period = current_period_bounds(date("2025-07-01")).unwrap();

        assert_eq!(sum_minutes_in_period(&entries, &period), 120 + 180);
    }

    /// 並び順に関係なく同じ合計になることを確認する。
    #[test]
    fn test_sum_minutes_in_period_order_independent() {
        let mut entries = vec![
            entry("2025-07-01", "09:00", "10:00"),
            entry("2025-06-21", "09:00", "11:30"),
            entry("2025-05-01", "09:00", "17:00"),
            entry("2025-07-10", "13:00", "14:15"),
        ];
        let period = current_period_bounds(date("2025-06-25")).unwrap();
        let expected = sum_minutes_in_period(&entries, &period);

        entries.reverse();

        assert_eq!(expected, 60 + 150 + 75);
        assert_eq!(sum_minutes_in_period(&entries, &period), expected);
    }

    #[test]
    fn test_sum_minutes() {
        let entries = vec![
            entry("2025-05-01", "09:00", "17:00"),
            entry("2025-06-20", "09:00", "09:30"),
        ];

        assert_eq!(sum_minutes(&entries), 510);
        assert_eq!(sum_minutes(&[]), 0);
    }

    #[test]
    fn test_monthly_summary() {
        let entries = vec![
            entry("2025-06-19", "09:00", "17:00"),
            entry("2025-06-20", "09:00", "17:00"),
        ];

        let summary = monthly_summary(&entries, date("2025-06-25")).unwrap();

        assert_eq!(
            summary,
            MonthlySummary::Total {
                month_name: "June".to_string(),
                total_minutes: 480,
            }
        );
        assert_eq!(
            summary.to_string(),
            "Month: June\nMonth Total (20th to 19th): 8.00 hrs"
        );
    }

    /// 期間外のwork entryしかない場合は0時間として表示する。
    #[test]
    fn test_monthly_summary_zero_total() {
        let entries = vec![entry("2025-01-10", "09:00", "17:00")];

        let summary = monthly_summary(&entries, date("2025-06-25")).unwrap();

        assert_eq!(
            summary.to_string(),
            "Month: June\nMonth Total (20th to 19th): 0.00 hrs"
        );
    }

    #[test]
    fn test_monthly_summary_no_entries() {
        let summary = monthly_summary(&[], date("2025-12-01")).unwrap();

        assert_eq!(
            summary,
            MonthlySummary::NoEntries {
                month_name: "December".to_string()
            }
        );
        assert_eq!(summary.to_string(), "Month: December\n\nNo entries yet.");
    }
}
