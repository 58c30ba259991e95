use log::info;
use serde_json::Value;

use super::block::now_timestamp;
use super::{Block, ChainError, GENESIS_PREVIOUS_HASH};

/// Simple in-memory blockchain with Proof-of-Work and a pending-transaction buffer.
#[derive(Debug)]
pub struct Blockchain {
    blocks: Vec<Block>,
    difficulty: u32,
    pending_transactions: Vec<Value>,
}

impl Blockchain {
    /// Initialize a new blockchain with a genesis block.
    pub fn new(difficulty: u32) -> Self {
        Self {
            blocks: vec![Block::genesis()],
            difficulty,
            pending_transactions: Vec::new(),
        }
    }

    /// Return the last block in the chain.
    pub fn get_latest_block(&self) -> &Block {
        self.blocks
            .last()
            .expect("Blockchain should always have at least the genesis block")
    }

    /// Queue a transaction for the next mined block. Payloads are not inspected.
    pub fn add_transaction(&mut self, transaction: Value) {
        self.pending_transactions.push(transaction);
    }

    /// Package every pending transaction into a new block, mine it and append it.
    ///
    /// Holding `&mut self` for the whole call is what keeps a concurrent
    /// `add_transaction` from landing between the buffer snapshot and the clear.
    pub fn mine_pending_transactions(&mut self) -> Result<&Block, ChainError> {
        if self.pending_transactions.is_empty() {
            return Err(ChainError::NothingToMine);
        }

        let index = self.blocks.len() as u64;
        let prev_hash = self.get_latest_block().hash().to_string();
        let transactions = std::mem::take(&mut self.pending_transactions);

        let mut block = Block::new(index, transactions, now_timestamp(), prev_hash);
        block.mine(self.difficulty);
        info!(
            "MINER - sealed block #{} (txs={}, timestamp={}, nonce={}, hash={})",
            block.index(),
            block.transactions().len(),
            block.timestamp(),
            block.nonce(),
            block.hash()
        );

        self.blocks.push(block);
        Ok(self.get_latest_block())
    }

    /// Validate the entire chain: linkage, hashes and PoW.
    pub fn is_chain_valid(&self) -> bool {
        // Genesis is exempt from PoW but must be intact.
        let genesis = &self.blocks[0];
        if genesis.index() != 0
            || genesis.previous_hash() != GENESIS_PREVIOUS_HASH
            || genesis.hash() != genesis.calculate_hash()
        {
            return false;
        }

        // Each step only looks at the pair (i-1, i).
        self.blocks.windows(2).all(|pair| {
            let (prev, current) = (&pair[0], &pair[1]);
            current.previous_hash() == prev.hash() && current.is_valid(self.difficulty)
        })
    }

    /// Point-in-time copy of every block, in chain order.
    pub fn snapshot(&self) -> Vec<Block> {
        self.blocks().to_vec()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn pending_transactions(&self) -> &[Value] {
        &self.pending_transactions
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    #[cfg(test)]
    pub(crate) fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }
}
