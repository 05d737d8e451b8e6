use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{CreateNotice, Notice, UpdateNotice};

const NOTICE_COLUMNS: &str =
    "id, title, body, active, last_activated_at, created_at, updated_at";

pub struct NoticeService;

impl NoticeService {
    /// Lists all notices, newest first
    pub async fn list(pool: &PgPool) -> AppResult<Vec<Notice>> {
        let notices = sqlx::query_as::<_, Notice>(&format!(
            "SELECT {NOTICE_COLUMNS} FROM notices ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await?;

        Ok(notices)
    }

    /// Gets a notice by ID
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> AppResult<Notice> {
        let notice = sqlx::query_as::<_, Notice>(&format!(
            "SELECT {NOTICE_COLUMNS} FROM notices WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Notice with id {} not found", id)))?;

        Ok(notice)
    }

    /// The single currently active notice, if any
    pub async fn active(pool: &PgPool) -> AppResult<Option<Notice>> {
        let notice = sqlx::query_as::<_, Notice>(&format!(
            r#"
            SELECT {NOTICE_COLUMNS} FROM notices
            WHERE active = true
            ORDER BY last_activated_at DESC NULLS LAST
            LIMIT 1
            "#
        ))
        .fetch_optional(pool)
        .await?;

        Ok(notice)
    }

    /// Creates a notice. When `activate` is set the new notice becomes the
    /// single active one via `activate_exclusively`.
    pub async fn create(pool: &PgPool, input: CreateNotice) -> AppResult<Notice> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Title cannot be empty".to_string()));
        }
        if title.len() > 255 {
            return Err(AppError::Validation(
                "Title cannot exceed 255 characters".to_string(),
            ));
        }

        let notice = sqlx::query_as::<_, Notice>(&format!(
            r#"
            INSERT INTO notices (title, body, active)
            VALUES ($1, $2, false)
            RETURNING {NOTICE_COLUMNS}
            "#
        ))
        .bind(title)
        .bind(&input.body)
        .fetch_one(pool)
        .await?;

        if input.activate {
            return Self::activate_exclusively(pool, notice.id).await;
        }

        Ok(notice)
    }

    /// Updates title/body, and active state: activation goes through
    /// `activate_exclusively`, deactivation is a plain write.
    pub async fn update(pool: &PgPool, id: Uuid, input: UpdateNotice) -> AppResult<Notice> {
        if let Some(title) = &input.title {
            if title.trim().is_empty() {
                return Err(AppError::Validation("Title cannot be empty".to_string()));
            }
        }

        let notice = sqlx::query_as::<_, Notice>(&format!(
            r#"
            UPDATE notices
            SET title = COALESCE($2, title),
                body = COALESCE($3, body),
                updated_at = now()
            WHERE id = $1
            RETURNING {NOTICE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(input.title.as_deref().map(str::trim))
        .bind(input.body.as_deref())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Notice with id {} not found", id)))?;

        match input.active {
            Some(true) => Self::activate_exclusively(pool, id).await,
            Some(false) => Self::deactivate(pool, id).await,
            None => Ok(notice),
        }
    }

    /// Makes `id` the only active notice.
    ///
    /// One transaction flips every other active notice off and activates the
    /// target, so readers never settle on two active notices. Re-activating
    /// the already active notice only refreshes `last_activated_at` (a
    /// deliberate caller action; clients use the timestamp to re-show it).
    /// If the commit fails nothing is applied and the store error surfaces
    /// to the caller; no automatic retry.
    pub async fn activate_exclusively(pool: &PgPool, id: Uuid) -> AppResult<Notice> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE notices
            SET active = false, updated_at = now()
            WHERE active = true AND id <> $1
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let notice = sqlx::query_as::<_, Notice>(&format!(
            r#"
            UPDATE notices
            SET active = true, last_activated_at = now(), updated_at = now()
            WHERE id = $1
            RETURNING {NOTICE_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Notice with id {} not found", id)))?;

        tx.commit().await?;

        log::info!("Notice {} activated exclusively", id);
        Ok(notice)
    }

    /// Deactivates a single notice without touching its siblings
    pub async fn deactivate(pool: &PgPool, id: Uuid) -> AppResult<Notice> {
        let notice = sqlx::query_as::<_, Notice>(&format!(
            r#"
            UPDATE notices
            SET active = false, updated_at = now()
            WHERE id = $1
            RETURNING {NOTICE_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Notice with id {} not found", id)))?;

        Ok(notice)
    }

    /// Deletes a notice
    pub async fn delete(pool: &PgPool, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM notices WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Notice with id {} not found",
                id
            )));
        }

        Ok(())
    }
}
