use std::io::Write;

use anyhow::{Context, Result};

use crate::period::MonthlySummary;
use crate::view::EntryRow;

/// Consoleにwork entryと集計結果を表示するためのtrait。
pub trait ConsolePresenter {
    /// work entryの一覧を表示する。
    ///
    /// # Arguments
    ///
    /// * `rows` - 表示するwork entry
    fn show_entries(&mut self, rows: &[EntryRow]) -> Result<()>;

    /// 集計期間の集計結果を表示する。
    fn show_summary(&mut self, summary: &MonthlySummary) -> Result<()>;
}

/// work entryをMarkdownの表形式で表示する。
pub struct ConsoleMarkdownTable<'a, W: Write> {
    writer: &'a mut W,
}

impl<'a, W: Write> ConsoleMarkdownTable<'a, W> {
    /// 新しい`ConsoleMarkdownTable`を返す。
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }
}

impl<'a, W: Write> ConsolePresenter for ConsoleMarkdownTable<'a, W> {
    // 1件もない場合は何も表示しない。
    fn show_entries(&mut self, rows: &[EntryRow]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        writeln!(
            self.writer,
            "| # | Date | Week Number | Start Time | End Time | Total Hours |"
        )
        .context("Failed to write table header")?;
        writeln!(self.writer, "|---|---|---|---|---|---|")
            .context("Failed to write table header")?;
        for row in rows {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} | {} | {} |",
                row.index, row.date, row.week_number, row.start_time, row.end_time, row.total_hours
            )
            .with_context(|| format!("Failed to write entry: {:?}", row))?;
        }
        writeln!(self.writer).context("Failed to write table footer")?;

        Ok(())
    }

    fn show_summary(&mut self, summary: &MonthlySummary) -> Result<()> {
        writeln!(self.writer, "{}", summary).context("Failed to write summary")
    }
}
