use afrikvent_core::{BannerRepository, CoreError, CoreResult};
use afrikvent_shared::{Banner, BannerPatch, OverlayText};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{Pool, Postgres};
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::info;

#[derive(Clone)]
pub struct DbClient {
    pub pool: Pool<Postgres>,
}

impl DbClient {
    pub async fn new(connection_string: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(connection_string)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations...");
        sqlx::migrate!("../migrations")
            .run(&self.pool)
            .await?;
        info!("Migrations completed successfully.");
        Ok(())
    }
}

const SELECT_BANNER: &str = r#"
    SELECT id, image_url, alt_text, href, open_in_new_tab, overlay_text, height,
           is_active, priority, start_date, end_date, click_count, impression_count,
           created_at, updated_at, client_id, campaign_id, budget, cost_per_click,
           cost_per_impression
    FROM promotion_banners
"#;

#[derive(sqlx::FromRow)]
struct BannerRow {
    id: String,
    image_url: String,
    alt_text: String,
    href: String,
    open_in_new_tab: bool,
    overlay_text: Option<Json<OverlayText>>,
    height: Option<i32>,
    is_active: bool,
    priority: i32,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    click_count: i64,
    impression_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    client_id: Option<String>,
    campaign_id: Option<String>,
    budget: Option<f64>,
    cost_per_click: Option<f64>,
    cost_per_impression: Option<f64>,
}

impl From<BannerRow> for Banner {
    fn from(row: BannerRow) -> Self {
        Banner {
            id: row.id,
            image_url: row.image_url,
            alt_text: row.alt_text,
            href: row.href,
            open_in_new_tab: row.open_in_new_tab,
            overlay_text: row.overlay_text.map(|Json(o)| o),
            height: row.height.and_then(|h| u32::try_from(h).ok()),
            is_active: row.is_active,
            priority: row.priority,
            start_date: row.start_date,
            end_date: row.end_date,
            click_count: to_count(row.click_count),
            impression_count: to_count(row.impression_count),
            created_at: row.created_at,
            updated_at: row.updated_at,
            client_id: row.client_id,
            campaign_id: row.campaign_id,
            budget: row.budget,
            cost_per_click: row.cost_per_click,
            cost_per_impression: row.cost_per_impression,
        }
    }
}

// Columns carry CHECK (>= 0).
fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

const LOCK_BANNERS_IN_ORDER: &str =
    "SELECT id FROM promotion_banners WHERE id = ANY($1) ORDER BY id FOR UPDATE";

/// Distinct ids in a stable order, for taking row locks.
fn lock_order(ids: &[String]) -> Vec<String> {
    ids.iter().cloned().collect::<BTreeSet<_>>().into_iter().collect()
}

fn store_error(err: sqlx::Error) -> CoreError {
    CoreError::StoreError(err.to_string())
}

pub struct PostgresBannerRepository {
    pub pool: Pool<Postgres>,
}

impl PostgresBannerRepository {
    pub fn new(db: &DbClient) -> Self {
        Self { pool: db.pool.clone() }
    }
}

#[async_trait]
impl BannerRepository for PostgresBannerRepository {
    async fn list_banners(&self) -> CoreResult<Vec<Banner>> {
        let rows = sqlx::query_as::<_, BannerRow>(&format!("{} ORDER BY seq", SELECT_BANNER))
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(rows.into_iter().map(Banner::from).collect())
    }

    async fn get_banner(&self, id: &str) -> CoreResult<Option<Banner>> {
        let row = sqlx::query_as::<_, BannerRow>(&format!("{} WHERE id = $1", SELECT_BANNER))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(row.map(Banner::from))
    }

    async fn update_banner(&self, id: &str, patch: BannerPatch, now: DateTime<Utc>) -> CoreResult<bool> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;

        let row = sqlx::query_as::<_, BannerRow>(&format!("{} WHERE id = $1 FOR UPDATE", SELECT_BANNER))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(store_error)?;

        let Some(row) = row else {
            return Ok(false);
        };

        let mut banner = Banner::from(row);
        patch.apply(&mut banner);
        banner.touch(now);

        // Counters are deliberately absent from this statement.
        sqlx::query(
            r#"
            UPDATE promotion_banners
            SET image_url = $2, alt_text = $3, href = $4, open_in_new_tab = $5,
                overlay_text = $6, height = $7, is_active = $8, priority = $9,
                start_date = $10, end_date = $11, client_id = $12, campaign_id = $13,
                budget = $14, cost_per_click = $15, cost_per_impression = $16,
                updated_at = $17
            WHERE id = $1
            "#,
        )
        .bind(&banner.id)
        .bind(&banner.image_url)
        .bind(&banner.alt_text)
        .bind(&banner.href)
        .bind(banner.open_in_new_tab)
        .bind(banner.overlay_text.clone().map(Json))
        .bind(banner.height.and_then(|h| i32::try_from(h).ok()))
        .bind(banner.is_active)
        .bind(banner.priority)
        .bind(banner.start_date)
        .bind(banner.end_date)
        .bind(&banner.client_id)
        .bind(&banner.campaign_id)
        .bind(banner.budget)
        .bind(banner.cost_per_click)
        .bind(banner.cost_per_impression)
        .bind(banner.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(store_error)?;

        tx.commit().await.map_err(store_error)?;
        Ok(true)
    }

    async fn increment_clicks(&self, id: &str, now: DateTime<Utc>) -> CoreResult<Option<u64>> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE promotion_banners
            SET click_count = click_count + 1, updated_at = GREATEST($2, created_at)
            WHERE id = $1
            RETURNING click_count
            "#,
        )
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(count.map(to_count))
    }

    async fn increment_impressions(&self, ids: &[String], now: DateTime<Utc>) -> CoreResult<Vec<Option<u64>>> {
        // One transaction for the batch: a failure part way rolls every increment back.
        let mut tx = self.pool.begin().await.map_err(store_error)?;
        let mut counts = Vec::with_capacity(ids.len());

        // Lock every touched row up front in id order, so batches listing the
        // same banners in different orders cannot deadlock each other.
        sqlx::query(LOCK_BANNERS_IN_ORDER)
            .bind(lock_order(ids))
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;

        for id in ids {
            let count = sqlx::query_scalar::<_, i64>(
                r#"
                UPDATE promotion_banners
                SET impression_count = impression_count + 1, updated_at = GREATEST($2, created_at)
                WHERE id = $1
                RETURNING impression_count
                "#,
            )
            .bind(id)
            .bind(now)
            .fetch_optional(&mut *tx)
            .await
            .map_err(store_error)?;
            counts.push(count.map(to_count));
        }

        tx.commit().await.map_err(store_error)?;
        Ok(counts)
    }
}
