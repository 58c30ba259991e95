use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, Responder, get, web};

use super::error::ApiError;
use super::models::{AppState, HealthResponse};

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>pow_ledger</title></head>
<body>
<h1>pow_ledger</h1>
<ul>
<li>POST /add_transaction &mdash; {"transaction": ...}</li>
<li>GET /pending</li>
<li>POST /mine</li>
<li>GET /chain</li>
<li>GET /validate</li>
</ul>
</body>
</html>
"#;

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(INDEX_HTML)
}

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let (height, difficulty) = web::block(move || {
        let bc = state.blockchain.lock().expect("mutex poisoned");
        (bc.len(), bc.difficulty())
    })
    .await?;
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        height,
        difficulty,
    }))
}
