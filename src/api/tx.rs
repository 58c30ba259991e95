use actix_web::{HttpResponse, get, post, web};
use log::{debug, warn};
use serde_json::Value;

use super::error::ApiError;
use super::models::{AddTransactionRequest, AppState, MessageResponse, PendingResponse};

/// Queue an arbitrary JSON payload for the next mined block.
#[post("/add_transaction")]
pub async fn add_transaction(
    state: web::Data<AppState>,
    body: web::Json<AddTransactionRequest>,
) -> Result<HttpResponse, ApiError> {
    let transaction = match body.into_inner().transaction {
        Some(tx) if is_truthy(&tx) => tx,
        _ => {
            warn!("POST /add_transaction - rejected: no transaction provided");
            return Err(ApiError::MissingTransaction);
        }
    };

    // Waits out an in-flight mine on the blocking pool, not on this worker.
    let pending = web::block(move || {
        let mut bc = state.blockchain.lock().expect("mutex poisoned");
        bc.add_transaction(transaction);
        bc.pending_transactions().len()
    })
    .await?;
    debug!("POST /add_transaction - accepted (pending: {pending})");

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Transaction added".to_string(),
    }))
}

/// List transactions waiting for the next block.
#[get("/pending")]
pub async fn get_pending(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let transactions = web::block(move || {
        let bc = state.blockchain.lock().expect("mutex poisoned");
        bc.pending_transactions().to_vec()
    })
    .await?;
    Ok(HttpResponse::Ok().json(PendingResponse {
        size: transactions.len(),
        transactions,
    }))
}

/// `null`, `false`, zero, and empty strings, arrays or objects count as "no transaction".
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
