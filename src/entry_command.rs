use anyhow::{Context, Result};
use log::info;

use crate::auth::SessionGate;
use crate::datetime;
use crate::storage::KeyValueStore;
use crate::view::WorkLogView;

/// `add`サブコマンドの引数を表す構造体。
#[derive(Debug, clap::Args)]
pub struct AddArgs {
    #[clap(short = 'd', long = "date", help = "Date in the format YYYY-MM-DD")]
    date: String,

    #[clap(short = 's', long = "start", help = "Start time in the format HH:MM")]
    start: String,

    #[clap(short = 'e', long = "end", help = "End time in the format HH:MM")]
    end: String,
}

/// `delete`サブコマンドの引数を表す構造体。
#[derive(Debug, clap::Args)]
pub struct DeleteArgs {
    #[clap(help = "Index of the entry shown in the # column")]
    index: usize,
}

/// ログイン中のユーザーのwork entryを追加、削除、一覧表示するサブコマンド。
///
/// 各操作の後は、表示する表と集計期間の集計結果を返す。
pub struct EntryCommand<'a, S: KeyValueStore> {
    gate: SessionGate<'a, S>,
}

impl<'a, S: KeyValueStore> EntryCommand<'a, S> {
    /// 新しい`EntryCommand`を返す。
    pub fn new(store: &'a S) -> Self {
        Self {
            gate: SessionGate::new(store),
        }
    }

    /// `add`サブコマンドの処理を行う。
    pub fn add(&self, args: AddArgs) -> Result<WorkLogView> {
        let mut entry_store = self.gate.open_entries()?;
        entry_store
            .add_entry(&args.date, &args.start, &args.end)
            .context("Failed to add entry")?;

        WorkLogView::new(entry_store.entries(), datetime::today())
    }

    /// `delete`サブコマンドの処理を行う。
    pub fn delete(&self, args: DeleteArgs) -> Result<WorkLogView> {
        let mut entry_store = self.gate.open_entries()?;
        entry_store
            .delete_entry(args.index)
            .context("Failed to delete entry")?;

        WorkLogView::new(entry_store.entries(), datetime::today())
    }

    /// `list`サブコマンドの処理を行う。
    pub fn list(&self) -> Result<WorkLogView> {
        let entry_store = self.gate.open_entries()?;
        info!(
            "{} entries of {}",
            entry_store.entries().len(),
            entry_store.username()
        );

        WorkLogView::new(entry_store.entries(), datetime::today())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use super::{AddArgs, DeleteArgs, EntryCommand};
    use crate::auth::SessionGate;
    use crate::datetime::mock_datetime;
    use crate::error::WorkError;
    use crate::period::MonthlySummary;
    use crate::storage::MemoryStore;

    fn add_args(date: &str, start: &str, end: &str) -> AddArgs {
        AddArgs {
            date: date.to_string(),
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    fn logged_in_store() -> MemoryStore {
        let store = MemoryStore::default();
        SessionGate::new(&store)
            .login("alice", "secret", false)
            .unwrap();
        store
    }

    /// 追加の後に表と集計期間の合計が更新されることを確認する。
    #[test]
    fn test_add() {
        mock_datetime::set_mock_time(Local.with_ymd_and_hms(2025, 6, 25, 12, 0, 0).unwrap());
        let store = logged_in_store();
        let command = EntryCommand::new(&store);

        command.add(add_args("2025-06-19", "09:00", "17:00")).unwrap();
        let view = command.add(add_args("2025-06-20", "09:00", "17:00")).unwrap();
        mock_datetime::clear_mock_time();

        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[1].date, "2025-06-20");
        assert_eq!(
            view.summary,
            MonthlySummary::Total {
                month_name: "June".to_string(),
                total_minutes: 480,
            }
        );
    }

    #[test]
    fn test_add_invalid() {
        let store = logged_in_store();
        let command = EntryCommand::new(&store);

        let err = command
            .add(add_args("2025-06-19", "17:00", "09:00"))
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<WorkError>(),
            Some(WorkError::Validation(_))
        ));
        assert!(command.list().unwrap().rows.is_empty());
    }

    #[test]
    fn test_delete() {
        mock_datetime::set_mock_time(Local.with_ymd_and_hms(2025, 6, 25, 12, 0, 0).unwrap());
        let store = logged_in_store();
        let command = EntryCommand::new(&store);
        command.add(add_args("2025-06-21", "09:00", "10:00")).unwrap();
        command.add(add_args("2025-06-22", "09:00", "11:00")).unwrap();

        let view = command.delete(DeleteArgs { index: 0 }).unwrap();
        mock_datetime::clear_mock_time();

        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].index, 0);
        assert_eq!(view.rows[0].date, "2025-06-22");
        assert_eq!(
            view.summary,
            MonthlySummary::Total {
                month_name: "June".to_string(),
                total_minutes: 120,
            }
        );
    }

    #[test]
    fn test_delete_out_of_range() {
        let store = logged_in_store();
        let command = EntryCommand::new(&store);

        let err = command.delete(DeleteArgs { index: 0 }).unwrap_err();

        assert_eq!(
            err.downcast_ref::<WorkError>(),
            Some(&WorkError::Index { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_not_logged_in() {
        let store = MemoryStore::default();
        let command = EntryCommand::new(&store);

        let err = command.list().unwrap_err();

        assert_eq!(err.downcast_ref::<WorkError>(), Some(&WorkError::NotLoggedIn));
    }
}
