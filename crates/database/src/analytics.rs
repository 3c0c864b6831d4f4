//! Dashboard analytics over the message log.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::Result;
use crate::models::Platform;

/// Days covered by the message-volume chart, today included.
pub const CHART_DAYS: i64 = 7;

/// Rough token cost attributed to each assistant reply.
pub const TOKENS_PER_REPLY: i64 = 50;

/// Text that marks a conversation as converted (a booking link was sent).
pub const CONVERSION_MARKER: &str = "calendly";

/// Headline numbers for the last 24 hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_messages_24h: i64,
    pub active_leads: i64,
    pub estimated_tokens: i64,
    pub conversion_rate: i64,
}

/// Message volume for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    /// `YYYY-MM-DD` (UTC).
    pub date: String,
    pub facebook: i64,
    pub instagram: i64,
}

/// Full analytics payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub stats: Stats,
    pub chart_data: Vec<ChartPoint>,
}

/// Percentage of active senders that converted, rounded. Zero when idle.
pub fn conversion_rate(converted: i64, active: i64) -> i64 {
    if active <= 0 {
        return 0;
    }
    ((converted as f64 / active as f64) * 100.0).round() as i64
}

/// Lay per-day platform counts onto a fixed window ending at `today`.
///
/// Days with no messages are present with zero counts. Unknown platform
/// values are ignored.
pub fn build_chart(today: NaiveDate, counts: &[(NaiveDate, String, i64)]) -> Vec<ChartPoint> {
    (0..CHART_DAYS)
        .rev()
        .map(|days_ago| {
            let day = today - Duration::days(days_ago);
            let mut point = ChartPoint {
                date: day.format("%Y-%m-%d").to_string(),
                facebook: 0,
                instagram: 0,
            };
            for (_, platform, count) in counts.iter().filter(|(d, _, _)| *d == day) {
                match platform.parse::<Platform>() {
                    Ok(Platform::Facebook) => point.facebook += count,
                    Ok(Platform::Instagram) => point.instagram += count,
                    Err(_) => {}
                }
            }
            point
        })
        .collect()
}

/// Compute dashboard analytics as of `now`.
pub async fn compute(pool: &PgPool, now: DateTime<Utc>) -> Result<Analytics> {
    let since_24h = now - Duration::hours(24);

    let (total_messages_24h, active_leads): (i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(*), COUNT(DISTINCT sender_id)
        FROM messages
        WHERE created_at >= $1
        "#,
    )
    .bind(since_24h)
    .fetch_one(pool)
    .await?;

    let assistant_messages: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM messages
        WHERE role = 'assistant'
        "#,
    )
    .fetch_one(pool)
    .await?;

    let converted: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(DISTINCT sender_id)
        FROM messages
        WHERE created_at >= $1 AND message_text ILIKE $2
        "#,
    )
    .bind(since_24h)
    .bind(format!("%{}%", CONVERSION_MARKER))
    .fetch_one(pool)
    .await?;

    let today = now.date_naive();
    let window_start = (today - Duration::days(CHART_DAYS - 1))
        .and_hms_opt(0, 0, 0)
        .map(|t| t.and_utc())
        .unwrap_or(now);

    let counts: Vec<(NaiveDate, String, i64)> = sqlx::query_as(
        r#"
        SELECT (created_at AT TIME ZONE 'UTC')::date AS day, platform, COUNT(*)
        FROM messages
        WHERE created_at >= $1
        GROUP BY day, platform
        "#,
    )
    .bind(window_start)
    .fetch_all(pool)
    .await?;

    Ok(Analytics {
        stats: Stats {
            total_messages_24h,
            active_leads,
            estimated_tokens: assistant_messages * TOKENS_PER_REPLY,
            conversion_rate: conversion_rate(converted, active_leads),
        },
        chart_data: build_chart(today, &counts),
    })
}
