use actix_web::{web, HttpResponse};

use crate::auth::Identity;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{CreateCoupon, RedeemCoupon};
use crate::services::CouponService;

/// POST /api/coupons - Create a coupon (admin)
pub async fn create_coupon(
    pool: web::Data<DbPool>,
    body: web::Json<CreateCoupon>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;
    let coupon = CouponService::create(pool.get_ref(), body.into_inner()).await?;

    Ok(HttpResponse::Created().json(coupon))
}

/// POST /api/coupons/redeem - Redeem a coupon for the calling user
///
/// 200 with the discount when admitted; 409 when either the global or the
/// per-user cap is exhausted.
pub async fn redeem_coupon(
    pool: web::Data<DbPool>,
    body: web::Json<RedeemCoupon>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let outcome = CouponService::redeem(pool.get_ref(), &body.code, identity.user_id).await?;

    if !outcome.allowed {
        return Ok(HttpResponse::Conflict().json(outcome));
    }

    Ok(HttpResponse::Ok().json(outcome))
}

/// Configure coupon routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/coupons")
            .route("", web::post().to(create_coupon))
            .route("/redeem", web::post().to(redeem_coupon)),
    );
}
