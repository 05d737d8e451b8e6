use actix_web::{http::StatusCode, web, HttpResponse};

use crate::db::{self, DbPool};

/// GET /health - the process is up
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// GET /health/ready - dependencies are reachable.
/// The database is the only dependency; 503 when it is not.
pub async fn readiness(pool: web::Data<DbPool>) -> HttpResponse {
    let database_up = db::health_check(pool.get_ref()).await;

    let (status, database, code) = if database_up {
        ("ready", "ok", StatusCode::OK)
    } else {
        ("not_ready", "error", StatusCode::SERVICE_UNAVAILABLE)
    };

    HttpResponse::build(code).json(serde_json::json!({
        "status": status,
        "checks": { "database": database }
    }))
}

/// Configure health routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/health")
            .route("", web::get().to(liveness))
            .route("/ready", web::get().to(readiness)),
    );
}
