use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::auth::SessionGate;
use crate::datetime;
use crate::report::{report_file_name, PdfReportWriter, WorkReport};
use crate::storage::KeyValueStore;

/// `export`サブコマンドの引数を表す構造体。
#[derive(Debug, clap::Args)]
pub struct ExportArgs {
    #[clap(
        short = 'o',
        long = "output-dir",
        default_value = ".",
        parse(from_os_str),
        help = "Directory to write the PDF report to"
    )]
    output_dir: PathBuf,
}

pub struct ExportCommand<'a, S: KeyValueStore> {
    gate: SessionGate<'a, S>,
    writer: PdfReportWriter,
}

impl<'a, S: KeyValueStore> ExportCommand<'a, S> {
    /// 新しい`ExportCommand`を返す。
    pub fn new(store: &'a S, writer: PdfReportWriter) -> Self {
        Self {
            gate: SessionGate::new(store),
            writer,
        }
    }

    /// `export`サブコマンドの処理を行う。
    ///
    /// 全てのwork entryをPDFに出力し、出力したファイルのパスを返す。
    /// work entryが1件もない場合は何も出力せずに`None`を返す。
    pub fn run(&self, args: ExportArgs) -> Result<Option<PathBuf>> {
        let entry_store = self.gate.open_entries()?;
        if entry_store.entries().is_empty() {
            warn!("No entries to export.");
            return Ok(None);
        }

        let report = WorkReport::new(entry_store.entries());
        let path = args.output_dir.join(report_file_name(datetime::now()));
        let file = File::create(&path)
            .with_context(|| format!("Failed to create report: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        self.writer
            .write_to(&report, &mut writer)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush report: {}", path.display()))?;
        info!("Report written: {}", path.display());

        Ok(Some(path))
    }
}
