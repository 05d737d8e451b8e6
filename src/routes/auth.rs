use actix_web::{web, HttpRequest, HttpResponse};

use crate::config::Config;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::RegisterRequest;
use crate::services::{RegistrationOutcome, RegistrationService};

/// POST /auth/register - Create an account, throttled per client IP
pub async fn register(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let ip = req
        .connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string();

    let outcome =
        RegistrationService::register(pool.get_ref(), &body.email, &ip, &config.quota).await?;

    match outcome {
        RegistrationOutcome::Created(user) => Ok(HttpResponse::Created().json(user)),
        RegistrationOutcome::Throttled { retry_after } => Ok(HttpResponse::TooManyRequests()
            .insert_header(("Retry-After", retry_after.to_string()))
            .json(serde_json::json!({
                "error": "registration_rate_limited",
                "retry_after": retry_after
            }))),
    }
}

/// Configure auth routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/auth").route("/register", web::post().to(register)));
}
