use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::Identity;
use crate::config::Config;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::QuotaUsage;
use crate::quota::{DayWindow, QuotaTracker, StoreErrorPolicy};

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Number of questions for this exam sitting
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub requested: i64,
    pub used_today: i64,
    pub remaining: i64,
}

#[derive(Debug, Serialize)]
pub struct QuotaResponse {
    pub used_today: i64,
    pub cap: i64,
    pub remaining: i64,
    pub window_resets_in_secs: u64,
}

/// POST /api/questions/generate - Reserve daily quota for an exam sitting
///
/// The per-request ceiling bounds a single sitting regardless of daily
/// remaining; the daily cap is enforced by the fused consume, so concurrent
/// sittings cannot overdraw it. Fails closed: question generation is the
/// product's metered resource.
pub async fn generate_questions(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    body: web::Json<GenerateRequest>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let quota = &config.quota;
    if body.count < 1 {
        return Err(AppError::Validation(
            "At least one question must be requested".to_string(),
        ));
    }
    if body.count > quota.max_questions_per_request {
        return Err(AppError::Validation(format!(
            "At most {} questions per request",
            quota.max_questions_per_request
        )));
    }

    let window = DayWindow::containing(Utc::now(), quota.day_offset_hours);
    let outcome = QuotaTracker::try_consume(
        pool.get_ref(),
        &identity.user_id.to_string(),
        body.count,
        quota.daily_question_cap,
        &window,
        StoreErrorPolicy::Deny,
    )
    .await?;

    if !outcome.allowed {
        let retry_after = window.retry_after_secs(Utc::now());
        log::warn!(
            "Daily question cap reached for user {}: used={} cap={}",
            identity.user_id,
            outcome.count,
            quota.daily_question_cap
        );
        return Ok(HttpResponse::TooManyRequests()
            .insert_header(("Retry-After", retry_after.to_string()))
            .json(serde_json::json!({
                "error": "daily_quota_exceeded",
                "used_today": outcome.count,
                "remaining": outcome.remaining,
                "retry_after": retry_after
            })));
    }

    Ok(HttpResponse::Ok().json(GenerateResponse {
        requested: body.count,
        used_today: outcome.count,
        remaining: outcome.remaining,
    }))
}

/// GET /api/quota/questions - Current daily usage snapshot for the caller
pub async fn question_quota(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let quota = &config.quota;
    let now = Utc::now();
    let window = DayWindow::containing(now, quota.day_offset_hours);

    let QuotaUsage { count, .. } =
        QuotaTracker::get_usage(pool.get_ref(), &identity.user_id.to_string(), &window).await?;
    let decision = QuotaTracker::check(count, 0, quota.daily_question_cap, None);

    Ok(HttpResponse::Ok().json(QuotaResponse {
        used_today: count,
        cap: quota.daily_question_cap,
        remaining: decision.remaining,
        window_resets_in_secs: window.retry_after_secs(now),
    }))
}

/// Configure question quota routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/questions").route("/generate", web::post().to(generate_questions)),
    );
    cfg.service(web::scope("/api/quota").route("/questions", web::get().to(question_quota)));
}
