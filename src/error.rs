use thiserror::Error;

/// ユーザーの操作で発生し、その場で修正可能なエラー。
///
/// `anyhow::Error`に包まれて呼び出し元へ返されるため、種類を判別したい場合は`downcast_ref`を利用する。
#[derive(Error, Debug, PartialEq, Eq)]
pub enum WorkError {
    #[error("{0}")]
    Validation(String),

    #[error("No entry at index {index} (entries: {len})")]
    Index { index: usize, len: usize },

    #[error("Incorrect password for {username}. Rerun with --reset to reset the account.")]
    AuthMismatch { username: String },

    #[error("Please login first.")]
    NotLoggedIn,
}
