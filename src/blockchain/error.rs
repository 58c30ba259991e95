use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// Mining was requested while the pending buffer is empty.
    #[error("No transactions to mine")]
    NothingToMine,
}
