pub mod block;
mod canonical;
pub mod error;
pub mod model;

pub use block::Block;
pub use error::ChainError;
pub use model::Blockchain;

/// Default Proof-of-Work difficulty (number of leading zeros).
pub const DEFAULT_DIFFICULTY: u32 = 4;

/// Highest accepted difficulty (keep low in dev to avoid long waits).
/// Each extra zero multiplies the expected search by 16.
pub const MAX_DIFFICULTY: u32 = 6;

/// `previous_hash` of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Sentinel payload carried by the genesis block.
pub const GENESIS_TRANSACTION: &str = "Genesis Block";
