//! Bot configuration CRUD operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::{BotConfig, BotConfigUpdate, NewBotConfig};
use crate::validation::ValidationError;

/// List every bot config, newest first.
pub async fn list_configs(pool: &PgPool) -> Result<Vec<BotConfig>> {
    let configs = sqlx::query_as::<_, BotConfig>(
        r#"
        SELECT id, page_id, page_name, system_prompt, access_token, is_active, created_at
        FROM bot_configs
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(configs)
}

/// Get the config for a page, if one exists.
pub async fn get_by_page_id(pool: &PgPool, page_id: &str) -> Result<Option<BotConfig>> {
    let config = sqlx::query_as::<_, BotConfig>(
        r#"
        SELECT id, page_id, page_name, system_prompt, access_token, is_active, created_at
        FROM bot_configs
        WHERE page_id = $1
        "#,
    )
    .bind(page_id)
    .fetch_optional(pool)
    .await?;

    Ok(config)
}

/// Create a config for a page.
pub async fn create_config(pool: &PgPool, config: &NewBotConfig) -> Result<BotConfig> {
    if config.page_id.trim().is_empty() {
        return Err(ValidationError::Empty("page_id".to_string()).into());
    }

    sqlx::query_as::<_, BotConfig>(
        r#"
        INSERT INTO bot_configs (page_id, page_name, system_prompt, access_token, is_active)
        VALUES ($1, $2, COALESCE($3, ''), $4, COALESCE($5, TRUE))
        RETURNING id, page_id, page_name, system_prompt, access_token, is_active, created_at
        "#,
    )
    .bind(config.page_id.trim())
    .bind(&config.page_name)
    .bind(&config.system_prompt)
    .bind(&config.access_token)
    .bind(config.is_active)
    .fetch_one(pool)
    .await
    .map_err(|e| DatabaseError::on_insert(e, "BotConfig", &config.page_id))
}

/// Update the config for a page. Fields left as `None` keep their value.
pub async fn update_by_page_id(
    pool: &PgPool,
    page_id: &str,
    update: &BotConfigUpdate,
) -> Result<BotConfig> {
    sqlx::query_as::<_, BotConfig>(
        r#"
        UPDATE bot_configs
        SET page_name = COALESCE($2, page_name),
            system_prompt = COALESCE($3, system_prompt),
            access_token = COALESCE($4, access_token),
            is_active = COALESCE($5, is_active)
        WHERE page_id = $1
        RETURNING id, page_id, page_name, system_prompt, access_token, is_active, created_at
        "#,
    )
    .bind(page_id)
    .bind(&update.page_name)
    .bind(&update.system_prompt)
    .bind(&update.access_token)
    .bind(update.is_active)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "BotConfig",
        id: page_id.to_string(),
    })
}

/// Update a config by row ID. Fields left as `None` keep their value.
pub async fn update_by_id(pool: &PgPool, id: Uuid, update: &BotConfigUpdate) -> Result<BotConfig> {
    sqlx::query_as::<_, BotConfig>(
        r#"
        UPDATE bot_configs
        SET page_name = COALESCE($2, page_name),
            system_prompt = COALESCE($3, system_prompt),
            access_token = COALESCE($4, access_token),
            is_active = COALESCE($5, is_active)
        WHERE id = $1
        RETURNING id, page_id, page_name, system_prompt, access_token, is_active, created_at
        "#,
    )
    .bind(id)
    .bind(&update.page_name)
    .bind(&update.system_prompt)
    .bind(&update.access_token)
    .bind(update.is_active)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "BotConfig",
        id: id.to_string(),
    })
}
