//! Lead (sales pipeline) operations.
//!
//! Leads are keyed by `(page_id, sender_id)`. Writes coming from the bot
//! upsert, so the first message from a customer creates their lead.

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::{Lead, LeadStatus, LeadUpdate};
use crate::validation::{validate_email, validate_text};

const LEAD_COLUMNS: &str = "id, page_id, sender_id, name, email, phone, interested_service, \
     objection, status, needs_human, human_reason, last_interaction, created_at";

/// List all leads, most recently active first.
pub async fn list_leads(pool: &PgPool) -> Result<Vec<Lead>> {
    let sql = format!(
        "SELECT {} FROM leads ORDER BY last_interaction DESC",
        LEAD_COLUMNS
    );
    let leads = sqlx::query_as::<_, Lead>(&sql).fetch_all(pool).await?;

    Ok(leads)
}

/// Get the lead for a customer on a page, if any.
pub async fn get_lead(pool: &PgPool, page_id: &str, sender_id: &str) -> Result<Option<Lead>> {
    let sql = format!(
        "SELECT {} FROM leads WHERE page_id = $1 AND sender_id = $2",
        LEAD_COLUMNS
    );
    let lead = sqlx::query_as::<_, Lead>(&sql)
        .bind(page_id)
        .bind(sender_id)
        .fetch_optional(pool)
        .await?;

    Ok(lead)
}

/// Record an interaction, creating the lead on first contact.
pub async fn touch_lead(pool: &PgPool, page_id: &str, sender_id: &str) -> Result<Lead> {
    let sql = format!(
        r#"
        INSERT INTO leads (page_id, sender_id, last_interaction)
        VALUES ($1, $2, NOW())
        ON CONFLICT (page_id, sender_id) DO UPDATE SET
            last_interaction = NOW()
        RETURNING {}
        "#,
        LEAD_COLUMNS
    );
    let lead = sqlx::query_as::<_, Lead>(&sql)
        .bind(page_id)
        .bind(sender_id)
        .fetch_one(pool)
        .await?;

    Ok(lead)
}

/// Reject profile fields that would not fit a lead row.
pub(crate) fn validate_update(update: &LeadUpdate) -> Result<()> {
    if let Some(ref email) = update.email {
        validate_email(email)?;
    }
    for (field, value) in [
        ("name", &update.name),
        ("phone", &update.phone),
        ("interested_service", &update.interested_service),
        ("objection", &update.objection),
    ] {
        if let Some(value) = value {
            validate_text(field, value)?;
        }
    }
    Ok(())
}

/// Upsert without validation, on any executor (pool or transaction).
pub(crate) async fn upsert_with<'e, E>(
    executor: E,
    page_id: &str,
    sender_id: &str,
    update: &LeadUpdate,
) -> Result<Lead>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        r#"
        INSERT INTO leads (
            page_id, sender_id, name, email, phone, interested_service, objection,
            status, last_interaction
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 'Lead'), NOW())
        ON CONFLICT (page_id, sender_id) DO UPDATE SET
            name = COALESCE(EXCLUDED.name, leads.name),
            email = COALESCE(EXCLUDED.email, leads.email),
            phone = COALESCE(EXCLUDED.phone, leads.phone),
            interested_service = COALESCE(EXCLUDED.interested_service, leads.interested_service),
            objection = COALESCE(EXCLUDED.objection, leads.objection),
            status = COALESCE($8, leads.status),
            last_interaction = NOW()
        RETURNING {}
        "#,
        LEAD_COLUMNS
    );
    let lead = sqlx::query_as::<_, Lead>(&sql)
        .bind(page_id)
        .bind(sender_id)
        .bind(update.name.as_deref().map(str::trim))
        .bind(update.email.as_deref().map(str::trim))
        .bind(update.phone.as_deref().map(str::trim))
        .bind(update.interested_service.as_deref().map(str::trim))
        .bind(update.objection.as_deref().map(str::trim))
        .bind(update.status.map(|s| s.as_str()))
        .fetch_one(executor)
        .await?;

    Ok(lead)
}

/// Merge profile fields into a lead, creating it if needed.
///
/// Fields left as `None` keep their stored value. The email, when given,
/// must look like an address.
pub async fn upsert_profile(
    pool: &PgPool,
    page_id: &str,
    sender_id: &str,
    update: &LeadUpdate,
) -> Result<Lead> {
    validate_update(update)?;
    let lead = upsert_with(pool, page_id, sender_id, update).await?;

    tracing::debug!(page_id, sender_id, status = %lead.status, "Updated lead profile");
    Ok(lead)
}

/// Hand a conversation to a human. The bot stops answering until released.
pub async fn flag_needs_human(
    pool: &PgPool,
    page_id: &str,
    sender_id: &str,
    reason: &str,
) -> Result<Lead> {
    let sql = format!(
        r#"
        INSERT INTO leads (page_id, sender_id, needs_human, human_reason, last_interaction)
        VALUES ($1, $2, TRUE, $3, NOW())
        ON CONFLICT (page_id, sender_id) DO UPDATE SET
            needs_human = TRUE,
            human_reason = EXCLUDED.human_reason,
            last_interaction = NOW()
        RETURNING {}
        "#,
        LEAD_COLUMNS
    );
    let lead = sqlx::query_as::<_, Lead>(&sql)
        .bind(page_id)
        .bind(sender_id)
        .bind(reason)
        .fetch_one(pool)
        .await?;

    tracing::info!(page_id, sender_id, reason, "Lead flagged for human takeover");
    Ok(lead)
}

/// Dashboard update of a lead's status or takeover flag.
///
/// Releasing a takeover (`needs_human = false`) clears the stored reason.
pub async fn update_lead(
    pool: &PgPool,
    id: Uuid,
    status: Option<LeadStatus>,
    needs_human: Option<bool>,
) -> Result<Lead> {
    let sql = format!(
        r#"
        UPDATE leads
        SET status = COALESCE($2, status),
            needs_human = COALESCE($3, needs_human),
            human_reason = CASE WHEN $3 = FALSE THEN NULL ELSE human_reason END
        WHERE id = $1
        RETURNING {}
        "#,
        LEAD_COLUMNS
    );
    sqlx::query_as::<_, Lead>(&sql)
        .bind(id)
        .bind(status.map(|s| s.as_str()))
        .bind(needs_human)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Lead",
            id: id.to_string(),
        })
}
