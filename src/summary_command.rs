use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;

use crate::auth::SessionGate;
use crate::datetime;
use crate::period::{monthly_summary, MonthlySummary};
use crate::storage::KeyValueStore;

/// `summary`サブコマンドの引数を表す構造体。
#[derive(Debug, clap::Args)]
pub struct SummaryArgs {
    #[clap(
        short = 'd',
        long = "date",
        help = "Sets a custom reference date in the format YYYY-MM-DD",
        parse(try_from_str = parse_date),
    )]
    date: Option<NaiveDate>,
}

pub struct SummaryCommand<'a, S: KeyValueStore> {
    gate: SessionGate<'a, S>,
}

impl<'a, S: KeyValueStore> SummaryCommand<'a, S> {
    /// 新しい`SummaryCommand`を返す。
    pub fn new(store: &'a S) -> Self {
        Self {
            gate: SessionGate::new(store),
        }
    }

    /// `summary`サブコマンドの処理を行う。
    ///
    /// 基準日を含む20日から翌月19日までの期間でwork entryを集計する。
    /// 基準日が指定されていない場合は、Localタイムゾーンで現在の日付を利用する。
    pub fn run(&self, args: SummaryArgs) -> Result<MonthlySummary> {
        let reference = args
            .date
            .unwrap_or_else(datetime::today);
        info!("Reference date: {}", reference);

        let entry_store = self.gate.open_entries()?;
        monthly_summary(entry_store.entries(), reference)
            .with_context(|| format!("Failed to summarize entries for {}", reference))
    }
}

/// 日付をパースする。
fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Failed to parse date: {}", s))
}
