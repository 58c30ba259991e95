use actix_web::{HttpResponse, get, post, web};
use log::{info, warn};
use std::time::Instant;

use super::error::ApiError;
use super::models::{AppState, MineResponse, MinedBlock, ValidateResponse};

/// Get the full blockchain as a flat list of block records.
#[get("/chain")]
pub async fn get_chain(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    // Copy under the lock, encode after releasing it.
    let blocks = web::block(move || {
        let bc = state.blockchain.lock().expect("mutex poisoned");
        bc.snapshot()
    })
    .await?;
    Ok(HttpResponse::Ok().json(blocks))
}

/// Validate the whole chain.
#[get("/validate")]
pub async fn validate_chain(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let valid = web::block(move || {
        let bc = state.blockchain.lock().expect("mutex poisoned");
        bc.is_chain_valid()
    })
    .await?;
    Ok(HttpResponse::Ok().json(ValidateResponse { valid }))
}

/// Mine every pending transaction into a new block.
///
/// The nonce search runs on the blocking pool while holding the chain lock,
/// so submissions wait for the block to be sealed instead of racing it.
/// Every other handler also takes the lock on the blocking pool, so a long
/// mine never parks an async worker.
#[post("/mine")]
pub async fn mine_block(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let t0 = Instant::now();

    let mined = web::block(move || {
        let mut bc = state.blockchain.lock().expect("mutex poisoned");
        bc.mine_pending_transactions().map(|b| MinedBlock {
            index: b.index(),
            hash: b.hash().to_string(),
        })
    })
    .await?
    .map_err(|e| {
        warn!("POST /mine - rejected: {e}");
        ApiError::from(e)
    })?;

    info!(
        "POST /mine - block #{} OK ({} ms)",
        mined.index,
        t0.elapsed().as_millis()
    );

    Ok(HttpResponse::Ok().json(MineResponse {
        message: format!("Block {} mined", mined.index),
        block: mined,
    }))
}
