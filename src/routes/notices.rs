use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::auth::Identity;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{CreateNotice, UpdateNotice};
use crate::services::NoticeService;

/// GET /api/notices - List all notices (admin)
pub async fn list_notices(pool: web::Data<DbPool>, identity: Identity) -> AppResult<HttpResponse> {
    identity.require_admin()?;
    let notices = NoticeService::list(pool.get_ref()).await?;

    Ok(HttpResponse::Ok().json(notices))
}

/// GET /api/notices/active - The single active notice, if any (public)
pub async fn active_notice(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let notice = NoticeService::active(pool.get_ref()).await?;

    Ok(HttpResponse::Ok().json(notice))
}

/// POST /api/notices - Create a notice, optionally activating it (admin)
pub async fn create_notice(
    pool: web::Data<DbPool>,
    body: web::Json<CreateNotice>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;
    let notice = NoticeService::create(pool.get_ref(), body.into_inner()).await?;

    Ok(HttpResponse::Created().json(notice))
}

/// GET /api/notices/{id} - Get a notice by ID (admin)
pub async fn get_notice(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;
    let id = path.into_inner();
    let notice = NoticeService::get_by_id(pool.get_ref(), id).await?;

    Ok(HttpResponse::Ok().json(notice))
}

/// PATCH /api/notices/{id} - Update a notice (admin)
pub async fn update_notice(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateNotice>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;
    let id = path.into_inner();
    let notice = NoticeService::update(pool.get_ref(), id, body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(notice))
}

/// POST /api/notices/{id}/activate - Make this the only active notice (admin)
pub async fn activate_notice(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;
    let id = path.into_inner();
    let notice = NoticeService::activate_exclusively(pool.get_ref(), id).await?;

    Ok(HttpResponse::Ok().json(notice))
}

/// DELETE /api/notices/{id} - Delete a notice (admin)
pub async fn delete_notice(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;
    let id = path.into_inner();
    NoticeService::delete(pool.get_ref(), id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Configure notice routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/notices")
            .route("", web::get().to(list_notices))
            .route("", web::post().to(create_notice))
            .route("/active", web::get().to(active_notice))
            .route("/{id}", web::get().to(get_notice))
            .route("/{id}", web::patch().to(update_notice))
            .route("/{id}", web::delete().to(delete_notice))
            .route("/{id}/activate", web::post().to(activate_notice)),
    );
}
