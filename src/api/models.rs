use crate::blockchain::{Blockchain, DEFAULT_DIFFICULTY};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Mutex;

/// Shared application state. The chain owns its pending buffer, so a single
/// lock covers both and mining can never interleave with a submission.
pub struct AppState {
    pub blockchain: Mutex<Blockchain>,
}

impl AppState {
    pub fn new(difficulty: u32) -> Self {
        Self {
            blockchain: Mutex::new(Blockchain::new(difficulty)),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_DIFFICULTY)
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub height: usize,
    pub difficulty: u32,
}

/* ---------- TX API Models ---------- */

#[derive(Deserialize)]
pub struct AddTransactionRequest {
    #[serde(default)]
    pub transaction: Option<Value>,
}

#[derive(Serialize)]
pub struct PendingResponse {
    pub size: usize,
    pub transactions: Vec<Value>,
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct MinedBlock {
    pub index: u64,
    pub hash: String,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: String,
    pub block: MinedBlock,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
}
