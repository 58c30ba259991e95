use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};

use super::canonical::to_py_json;
use super::{GENESIS_PREVIOUS_HASH, GENESIS_TRANSACTION};

/// A single block in the blockchain holding a list of opaque transactions.
///
/// `nonce` and `hash` can only change together through [`Block::mine`], so a
/// block's cached hash always matches its content unless it was tampered with.
/// Serializes as the flat record exposed by `GET /chain`.
#[derive(Debug, Clone, Serialize)]
pub struct Block {
    index: u64,
    timestamp: f64, // Unix seconds, sub-second precision
    transactions: Vec<Value>,
    previous_hash: String,
    hash: String,
    nonce: u64,
}

/// Current time as fractional Unix seconds.
pub fn now_timestamp() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

impl Block {
    /// Create the genesis block (first block in the chain). It is never mined.
    pub fn genesis() -> Self {
        Self::new(
            0,
            vec![Value::from(GENESIS_TRANSACTION)],
            now_timestamp(),
            GENESIS_PREVIOUS_HASH.to_string(),
        )
    }

    /// Create a new block (not mined yet). Call `mine()` to perform PoW.
    pub fn new(index: u64, transactions: Vec<Value>, timestamp: f64, previous_hash: String) -> Self {
        let mut block = Self {
            index,
            timestamp,
            transactions,
            previous_hash,
            hash: String::new(),
            nonce: 0,
        };
        block.hash = block.calculate_hash();
        block
    }

    /// Bytes fed to SHA-256: every field except `hash` as a JSON object with
    /// keys sorted at every level (including inside payloads), laid out the
    /// way Python's `json.dumps(..., sort_keys=True)` writes it.
    pub fn canonical_payload(&self) -> Vec<u8> {
        let preimage = json!({
            "index": self.index,
            "transactions": self.transactions,
            "timestamp": self.timestamp,
            "previous_hash": self.previous_hash,
            "nonce": self.nonce,
        });
        to_py_json(&preimage).expect("serialize block preimage")
    }

    /// Hex-encoded SHA-256 of [`Block::canonical_payload`].
    pub fn calculate_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_payload());
        hex::encode(hasher.finalize())
    }

    /// Perform Proof-of-Work by finding a nonce that yields a hash
    /// starting with `difficulty` leading zeros (in hex).
    pub fn mine(&mut self, difficulty: u32) {
        let target_prefix = "0".repeat(difficulty as usize);
        while !self.hash.starts_with(&target_prefix) {
            self.nonce = self.nonce.wrapping_add(1);
            self.hash = self.calculate_hash();
        }
    }

    pub fn meets_difficulty(&self, difficulty: u32) -> bool {
        self.hash.starts_with(&"0".repeat(difficulty as usize))
    }

    /// Validate that the block's cached `hash` matches its content and
    /// satisfies the PoW difficulty. (Does NOT validate chain linkage.)
    pub fn is_valid(&self, difficulty: u32) -> bool {
        self.hash == self.calculate_hash() && self.meets_difficulty(difficulty)
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn transactions(&self) -> &[Value] {
        &self.transactions
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }
}

/// Raw field access for tampering scenarios. None of these rehash.
#[cfg(test)]
impl Block {
    pub(crate) fn transactions_mut(&mut self) -> &mut Vec<Value> {
        &mut self.transactions
    }

    pub(crate) fn set_nonce(&mut self, nonce: u64) {
        self.nonce = nonce;
    }

    pub(crate) fn set_previous_hash(&mut self, previous_hash: &str) {
        self.previous_hash = previous_hash.to_string();
    }

    pub(crate) fn set_hash(&mut self, hash: &str) {
        self.hash = hash.to_string();
    }

    pub(crate) fn rehash(&mut self) {
        self.hash = self.calculate_hash();
    }
}

#[cfg(test)]
mod tests {
    use super::Block;
    use serde_json::{Value, json};
    use sha2::{Digest, Sha256};

    fn sample() -> Block {
        Block::new(
            1,
            vec![json!("Alice pays Bob 10")],
            1_700_000_000.5,
            "abc".into(),
        )
    }

    #[test]
    fn genesis_has_valid_hash() {
        let b = Block::genesis();
        assert_eq!(b.index(), 0);
        assert_eq!(b.previous_hash(), "0");
        assert_eq!(b.nonce(), 0);
        assert_eq!(b.transactions(), &[Value::from("Genesis Block")]);
        assert_eq!(b.hash(), b.calculate_hash());
        assert_eq!(b.hash().len(), 64);
    }

    #[test]
    fn canonical_payload_sorts_keys() {
        let b = Block::new(
            1,
            vec![json!({"to": "Bob", "from": "Alice", "amount": 10})],
            1_700_000_000.5,
            "abc".into(),
        );
        let expected = r#"{"index": 1, "nonce": 0, "previous_hash": "abc", "timestamp": 1700000000.5, "transactions": [{"amount": 10, "from": "Alice", "to": "Bob"}]}"#;
        assert_eq!(String::from_utf8(b.canonical_payload()).unwrap(), expected);
        assert_eq!(b.hash(), hex::encode(Sha256::digest(expected.as_bytes())));
        assert_eq!(
            b.hash(),
            "99b97d168e7393fe039260cd6e4342eb497442c60fe65d67d60b9a0ab3a31c23"
        );
    }

    #[test]
    fn hash_matches_reference_digests() {
        // Digests of `json.dumps(..., sort_keys=True)` for the same fields.
        assert_eq!(
            sample().hash(),
            "9c498d49a4e641cd2d920e01175874d757e6032938b58ebab7f8fd7c8afbae2e"
        );

        let b = Block::new(
            1,
            vec![json!("Zoë pays \u{1F600} \u{7f}")],
            1_700_000_000.5,
            "abc".into(),
        );
        assert_eq!(
            String::from_utf8(b.canonical_payload()).unwrap(),
            r#"{"index": 1, "nonce": 0, "previous_hash": "abc", "timestamp": 1700000000.5, "transactions": ["Zo\u00eb pays \ud83d\ude00 \u007f"]}"#
        );
        assert_eq!(
            b.hash(),
            "6e402943d8c3fd2e46217808cf07e351b0952ba0553a4116c056dd9a0ba25487"
        );
    }

    #[test]
    fn identical_content_hashes_identically() {
        assert_eq!(sample().hash(), sample().hash());
        assert_eq!(sample().calculate_hash(), sample().calculate_hash());
    }

    #[test]
    fn every_field_affects_hash() {
        let base = sample().hash().to_string();

        let other_index = Block::new(2, vec![json!("Alice pays Bob 10")], 1_700_000_000.5, "abc".into());
        let other_txs = Block::new(1, vec![json!("Alice pays Bob 11")], 1_700_000_000.5, "abc".into());
        let other_time = Block::new(1, vec![json!("Alice pays Bob 10")], 1_700_000_000.6, "abc".into());
        let other_prev = Block::new(1, vec![json!("Alice pays Bob 10")], 1_700_000_000.5, "abd".into());
        let mut other_nonce = sample();
        other_nonce.set_nonce(1);
        other_nonce.rehash();

        for b in [other_index, other_txs, other_time, other_prev, other_nonce] {
            assert_ne!(b.hash(), base);
        }
    }

    #[test]
    fn mining_produces_leading_zeros() {
        let mut b = sample();
        b.mine(2);
        assert!(b.hash().starts_with("00"));
        assert_eq!(b.hash(), b.calculate_hash());
        assert!(b.is_valid(2));
    }

    #[test]
    fn mining_at_zero_difficulty_keeps_nonce() {
        let mut b = sample();
        b.mine(0);
        assert_eq!(b.nonce(), 0);
        assert!(b.is_valid(0));
    }

    #[test]
    fn difficulty_longer_than_hash_is_never_met() {
        assert!(!sample().meets_difficulty(65));
    }

    #[test]
    fn invalid_when_mutated() {
        let mut b = sample();
        b.mine(2);
        let old_hash = b.hash().to_string();

        b.transactions_mut().push(json!("Mallory pays Mallory 1000"));

        assert_ne!(old_hash, b.calculate_hash());
        assert!(!b.is_valid(2));
    }

    #[test]
    fn serializes_as_flat_record() {
        let b = sample();
        let record = serde_json::to_value(&b).unwrap();
        let obj = record.as_object().unwrap();
        assert_eq!(obj.len(), 6);
        assert_eq!(record["index"], 1);
        assert_eq!(record["timestamp"], 1_700_000_000.5);
        assert_eq!(record["transactions"], json!(["Alice pays Bob 10"]));
        assert_eq!(record["previous_hash"], "abc");
        assert_eq!(record["hash"], b.hash());
        assert_eq!(record["nonce"], 0);
    }
}
