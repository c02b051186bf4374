use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use std::time::Duration;

use crate::models::{
    Case, CaseFilter, DimensionFit, Dimensions, Gear, LengthUnit, MassUnit, MatchRecord,
    PriceCategory, ProtectionLevel, Weight,
};

use super::{CaseCatalog, GearCatalog, MatchRepository, RepositoryError};

/// Converts a stored dimension into inches so mixed-unit rows compare correctly
const INCHES_SQL: &str = "CASE dimension_unit WHEN 'cm' THEN 0.3937007874015748 \
                          WHEN 'mm' THEN 0.03937007874015748 ELSE 1.0 END";

const CASE_COLUMNS: &str = "id, brand, name, description, internal_length, internal_width, \
                            internal_height, dimension_unit, weight_value, weight_unit, \
                            protection_level, waterproof, shockproof, has_handle, has_wheels, \
                            material, color, features, price, currency, rating, review_count";

/// PostgreSQL-backed gear catalog, case catalog and match-record store
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, RepositoryError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, RepositoryError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl GearCatalog for PostgresClient {
    async fn get_gear_by_id(&self, id: &str) -> Result<Option<Gear>, RepositoryError> {
        let query = r#"
            SELECT id, category, gear_type, brand, name, length, width, height,
                   dimension_unit, weight_value, weight_unit
            FROM gear
            WHERE id = $1
        "#;

        let row = sqlx::query(query).bind(id).fetch_optional(&self.pool).await?;

        row.as_ref().map(decode_gear).transpose()
    }
}

#[async_trait]
impl CaseCatalog for PostgresClient {
    async fn query_cases(&self, filter: &CaseFilter) -> Result<Vec<Case>, RepositoryError> {
        let mut builder = build_case_query(filter);

        let rows = builder.build().fetch_all(&self.pool).await?;

        let cases: Vec<Case> = rows
            .iter()
            .filter_map(|row| match decode_case(row) {
                Ok(case) => Some(case),
                Err(e) => {
                    tracing::warn!("Skipping undecodable case row: {}", e);
                    None
                }
            })
            .collect();

        tracing::debug!("Queried {} cases ({} rows)", cases.len(), rows.len());

        Ok(cases)
    }
}

#[async_trait]
impl MatchRepository for PostgresClient {
    /// Uses INSERT ... ON CONFLICT so repeated searches overwrite the previous snapshot.
    async fn upsert_match_record(&self, record: &MatchRecord) -> Result<(), RepositoryError> {
        let query = r#"
            INSERT INTO gear_case_matches (
                id, gear_id, case_id, compatibility_score, dimension_fit,
                price_category, protection_level, features, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (gear_id, case_id)
            DO UPDATE SET
                compatibility_score = EXCLUDED.compatibility_score,
                dimension_fit = EXCLUDED.dimension_fit,
                price_category = EXCLUDED.price_category,
                protection_level = EXCLUDED.protection_level,
                features = EXCLUDED.features,
                updated_at = EXCLUDED.updated_at
        "#;

        sqlx::query(query)
            .bind(uuid::Uuid::new_v4())
            .bind(&record.gear_id)
            .bind(&record.case_id)
            .bind(i16::from(record.compatibility_score))
            .bind(Json(&record.dimension_fit))
            .bind(record.price_category.as_str())
            .bind(record.protection_level.as_str())
            .bind(&record.features)
            .bind(record.updated_at)
            .execute(&self.pool)
            .await?;

        tracing::trace!(
            "Upserted match record: {} -> {} ({})",
            record.gear_id,
            record.case_id,
            record.compatibility_score
        );

        Ok(())
    }

    async fn list_match_records(&self, gear_id: &str) -> Result<Vec<MatchRecord>, RepositoryError> {
        let query = r#"
            SELECT gear_id, case_id, compatibility_score, dimension_fit,
                   price_category, protection_level, features, updated_at
            FROM gear_case_matches
            WHERE gear_id = $1
            ORDER BY updated_at DESC
        "#;

        let rows = sqlx::query(query).bind(gear_id).fetch_all(&self.pool).await?;

        rows.iter().map(decode_match_record).collect()
    }
}

/// Build the dynamic case query for a filter
///
/// Dimension thresholds are compared in inches regardless of the unit a row is stored in.
fn build_case_query(filter: &CaseFilter) -> QueryBuilder<'_, Postgres> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM cases WHERE TRUE", CASE_COLUMNS));

    if let Some(minimum) = &filter.min_internal {
        let minimum = minimum.to_unit(LengthUnit::Inches);
        for (column, threshold) in [
            ("internal_length", minimum.length),
            ("internal_width", minimum.width),
            ("internal_height", minimum.height),
        ] {
            builder
                .push(format!(" AND {} * ({}) >= ", column, INCHES_SQL))
                .push_bind(threshold);
        }
    }

    if let Some(min_price) = filter.min_price {
        builder.push(" AND price >= ").push_bind(min_price);
    }
    if let Some(max_price) = filter.max_price {
        builder.push(" AND price <= ").push_bind(max_price);
    }
    if let Some(level) = filter.protection_level {
        builder.push(" AND protection_level = ").push_bind(level.as_str());
    }

    for (column, value) in [
        ("waterproof", filter.waterproof),
        ("shockproof", filter.shockproof),
        ("has_handle", filter.has_handle),
        ("has_wheels", filter.has_wheels),
    ] {
        if let Some(value) = value {
            builder.push(format!(" AND {} = ", column)).push_bind(value);
        }
    }

    if !filter.brands.is_empty() {
        let brands: Vec<String> = filter.brands.iter().map(|b| b.to_lowercase()).collect();
        builder.push(" AND LOWER(brand) = ANY(").push_bind(brands).push(")");
    }

    builder
}

fn decode_weight(row: &PgRow) -> Result<Option<Weight>, RepositoryError> {
    let value: Option<f64> = row.try_get("weight_value")?;
    let unit: Option<String> = row.try_get("weight_unit")?;

    Ok(value.map(|value| {
        let unit = unit.as_deref().and_then(MassUnit::parse).unwrap_or_default();
        Weight::new(value, unit)
    }))
}

fn decode_length_unit(row: &PgRow) -> Result<LengthUnit, RepositoryError> {
    let unit: String = row.try_get("dimension_unit")?;
    LengthUnit::parse(&unit)
        .ok_or_else(|| RepositoryError::Decode(format!("unknown length unit '{}'", unit)))
}

fn decode_protection_level(row: &PgRow) -> Result<ProtectionLevel, RepositoryError> {
    let level: String = row.try_get("protection_level")?;
    ProtectionLevel::parse(&level)
        .ok_or_else(|| RepositoryError::Decode(format!("unknown protection level '{}'", level)))
}

fn decode_gear(row: &PgRow) -> Result<Gear, RepositoryError> {
    Ok(Gear {
        id: row.try_get("id")?,
        category: row.try_get("category")?,
        gear_type: row.try_get("gear_type")?,
        brand: row.try_get("brand")?,
        name: row.try_get("name")?,
        dimensions: Dimensions::new(
            row.try_get("length")?,
            row.try_get("width")?,
            row.try_get("height")?,
            decode_length_unit(row)?,
        ),
        weight: decode_weight(row)?,
    })
}

fn decode_case(row: &PgRow) -> Result<Case, RepositoryError> {
    let review_count: Option<i32> = row.try_get("review_count")?;

    Ok(Case {
        id: row.try_get("id")?,
        brand: row.try_get("brand")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        internal_dimensions: Dimensions::new(
            row.try_get("internal_length")?,
            row.try_get("internal_width")?,
            row.try_get("internal_height")?,
            decode_length_unit(row)?,
        ),
        weight: decode_weight(row)?,
        protection_level: decode_protection_level(row)?,
        waterproof: row.try_get("waterproof")?,
        shockproof: row.try_get("shockproof")?,
        has_handle: row.try_get("has_handle")?,
        has_wheels: row.try_get("has_wheels")?,
        material: row.try_get("material")?,
        color: row.try_get("color")?,
        features: row.try_get::<Option<Vec<String>>, _>("features")?.unwrap_or_default(),
        price: row.try_get::<Option<f64>, _>("price")?.unwrap_or(0.0),
        currency: row.try_get("currency")?,
        rating: row.try_get("rating")?,
        review_count: review_count.and_then(|count| u32::try_from(count).ok()).unwrap_or(0),
    })
}

fn decode_match_record(row: &PgRow) -> Result<MatchRecord, RepositoryError> {
    let score: i16 = row.try_get("compatibility_score")?;
    let price_category: String = row.try_get("price_category")?;
    let price_category = match price_category.as_str() {
        "budget" => PriceCategory::Budget,
        "mid_range" => PriceCategory::MidRange,
        "premium" => PriceCategory::Premium,
        other => return Err(RepositoryError::Decode(format!("unknown price category '{}'", other))),
    };

    Ok(MatchRecord {
        gear_id: row.try_get("gear_id")?,
        case_id: row.try_get("case_id")?,
        compatibility_score: u8::try_from(score.clamp(0, 100)).unwrap_or(0),
        dimension_fit: row.try_get::<Json<DimensionFit>, _>("dimension_fit")?.0,
        price_category,
        protection_level: decode_protection_level(row)?,
        features: row.try_get::<Option<Vec<String>>, _>("features")?.unwrap_or_default(),
        updated_at: row.try_get("updated_at")?,
    })
}
