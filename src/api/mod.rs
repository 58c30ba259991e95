mod chain;
pub mod error;
mod health;
pub mod models;
mod tx;

use actix_web::web::{self, ServiceConfig};

pub use error::ApiError;
pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::InvalidPayload(err.to_string()).into()),
    )
    .service(health::index)
    .service(health::health_check)
    .service(tx::add_transaction)
    .service(tx::get_pending)
    .service(chain::mine_block)
    .service(chain::get_chain)
    .service(chain::validate_chain);
}
