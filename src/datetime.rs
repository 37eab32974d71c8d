use chrono::{DateTime, Local, NaiveDate};

#[cfg(not(test))]
/// 現在のローカル時間を取得する。
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// 現在のローカル日付を取得する。集計期間の基準日として利用する。
pub fn today() -> NaiveDate {
    now().date_naive()
}


#[cfg(test)]
pub use mock_datetime::now;

#[cfg(test)]
mod tests {
    use chrono::{Local, NaiveDate, SecondsFormat, TimeZone};

    use super::{mock_datetime, today};

    /// 何も設定しない場合は、現在時間が取得できることを確認する。
    ///
    ///  - ミリ秒単位まで比較するとテストが失敗する可能性があるため、秒単位で比較している。
    #[test]
    fn test_now() {
        assert_eq!(
            mock_datetime::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            Local::now().to_rfc3339_opts(SecondsFormat::Secs, true)
        );
    }

    /// モック時間を設定した時に、その時間が取得できることを確認する。
    #[test]
    fn test_now_specific_datetime() {
        let datetime = Local.with_ymd_and_hms(2025, 6, 25, 9, 30, 0).unwrap();
        mock_datetime::set_mock_time(datetime);

        assert_eq!(mock_datetime::now(), datetime);
        mock_datetime::clear_mock_time();
    }

    /// モック時間をリセットした時に、現在時間が取得できることを確認する。
    #[test]
    fn test_now_after_clear_mock_time() {
        mock_datetime::set_mock_time(Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        mock_datetime::clear_mock_time();

        assert_eq!(
            mock_datetime::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            Local::now().to_rfc3339_opts(SecondsFormat::Secs, true)
        );
    }

    /// 日付の境界はローカル時間で判定することを確認する。
    #[test]
    fn test_today() {
        mock_datetime::set_mock_time(Local.with_ymd_and_hms(2025, 6, 19, 23, 59, 59).unwrap());

        assert_eq!(today(), NaiveDate::from_ymd_opt(2025, 6, 19).unwrap());
        mock_datetime::clear_mock_time();
    }
}
