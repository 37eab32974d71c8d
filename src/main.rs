use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

mod auth;
mod console;
mod datetime;
mod entry_command;
mod entry_store;
mod error;
mod export_command;
mod period;
mod report;
mod session_command;
mod storage;
mod summary_command;
mod time_entry;
mod time_format;
mod view;

use console::{ConsoleMarkdownTable, ConsolePresenter};
use entry_command::{AddArgs, DeleteArgs, EntryCommand};
use export_command::{ExportArgs, ExportCommand};
use report::PdfReportWriter;
use session_command::{LoginArgs, SessionCommand};
use storage::FileStore;
use summary_command::{SummaryArgs, SummaryCommand};
use view::WorkLogView;

/// 作業時間を記録し、20日締めの期間で集計するCLIアプリケーション。
///
/// # Examples
/// ```
/// $ cargo run -- login -u alice -p secret
/// $ cargo run -- add -d 2025-06-20 -s 09:00 -e 17:00
/// $ cargo run -- summary
/// $ cargo run -- export
/// ```
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    #[clap(
        long = "data-dir",
        global = true,
        env = "WORKHOURS_DATA_DIR",
        parse(from_os_str),
        help = "Directory to store users and entries"
    )]
    data_dir: Option<PathBuf>,

    #[clap(short = 'v', long = "verbose", global = true, help = "Show debug logs")]
    verbose: bool,

    #[clap(subcommand)]
    subcommand: SubCommands,
}

/// サブコマンドを表す列挙型。
#[derive(Debug, Subcommand)]
enum SubCommands {
    /// Login, creating the account on first use
    Login(LoginArgs),
    /// Logout the current user
    Logout,
    /// Show the current user
    Whoami,
    /// Add a work entry
    Add(AddArgs),
    /// Delete a work entry
    Delete(DeleteArgs),
    /// Show all work entries and the period total
    List,
    /// Show the total of the period from the 20th to the 19th
    Summary(SummaryArgs),
    /// Export all work entries to a PDF report
    Export(ExportArgs),
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logger(args.verbose)?;

    let data_dir = match args.data_dir {
        Some(data_dir) => data_dir,
        None => dirs::data_dir()
            .context("Failed to find the data directory")?
            .join("workhours"),
    };
    let store = FileStore::new(&data_dir);

    match args.subcommand {
        SubCommands::Login(login) => {
            SessionCommand::new(&store).login(login)?;
            show_view(&EntryCommand::new(&store).list()?)?;
        }
        SubCommands::Logout => SessionCommand::new(&store).logout()?,
        SubCommands::Whoami => println!("{}", SessionCommand::new(&store).whoami()?),
        SubCommands::Add(add) => show_view(&EntryCommand::new(&store).add(add)?)?,
        SubCommands::Delete(delete) => show_view(&EntryCommand::new(&store).delete(delete)?)?,
        SubCommands::List => show_view(&EntryCommand::new(&store).list()?)?,
        SubCommands::Summary(summary) => {
            let summary = SummaryCommand::new(&store).run(summary)?;
            ConsoleMarkdownTable::new(&mut io::stdout()).show_summary(&summary)?;
        }
        SubCommands::Export(export) => {
            let command = ExportCommand::new(&store, PdfReportWriter::default());
            if let Some(path) = command.run(export)? {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

/// ログの出力を設定する。標準出力はコマンドの結果に使うため、ログは標準エラー出力に出す。
fn init_logger(verbose: bool) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .chain(io::stderr())
        .apply()
        .context("Failed to initialize logger")
}

/// work entryの表と集計結果を表示する。
fn show_view(view: &WorkLogView) -> Result<()> {
    let mut stdout = io::stdout();
    let mut presenter = ConsoleMarkdownTable::new(&mut stdout);
    presenter.show_entries(&view.rows)?;
    presenter.show_summary(&view.summary)
}
