//! Production adapter: collections live as Postgres tables, one per
//! collection, with the scalar columns this module queries (`is_active`,
//! bounds rectangle, point position) alongside the full document in a
//! `doc JSONB` column. The ingest pipeline owns the tables; see `schema.sql`
//! for the composite bounds index the pre-filter depends on.

use async_trait::async_trait;
use deadpool_postgres::Pool;
use serde_json::Value;
use tokio_postgres::error::SqlState;
use tokio_postgres::types::ToSql;
use tokio_postgres::Row;

use super::{Collection, DocumentStore, StoreError, StoreQuery};

pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    pub fn new(pool: Pool) -> Self {
        PgStore { pool }
    }

    async fn client(&self) -> Result<deadpool_postgres::Object, StoreError> {
        self.pool
            .get()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

fn map_query_err(collection: Collection, err: tokio_postgres::Error) -> StoreError {
    if err.code() == Some(&SqlState::UNDEFINED_TABLE) {
        return StoreError::MissingCollection(collection.table());
    }
    if err.is_closed() {
        return StoreError::Unavailable(err.to_string());
    }
    StoreError::Query(err.to_string())
}

/// Returns the stored document with the row id spliced in, so callers can
/// rely on `id` being present even when ingest left it out of the JSON.
fn doc_from_row(row: &Row) -> Value {
    let id: String = row.get(0);
    let mut doc: Value = row.get(1);
    if let Value::Object(map) = &mut doc {
        map.entry("id").or_insert_with(|| Value::String(id));
    }
    doc
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, StoreError> {
        let client = self.client().await?;
        let sql = format!("SELECT id, doc FROM {} WHERE id = $1", collection.table());

        let row = client
            .query_opt(&sql, &[&id])
            .await
            .map_err(|e| map_query_err(collection, e))?;

        Ok(row.map(|r| doc_from_row(&r)))
    }

    async fn query_by_bounds(
        &self,
        collection: Collection,
        lat: f64,
        lon: f64,
        margin_deg: f64,
    ) -> Result<Vec<Value>, StoreError> {
        let client = self.client().await?;
        let sql = format!(
            "SELECT id, doc FROM {} \
             WHERE is_active \
             AND min_lat - $3 <= $1 AND max_lat + $3 >= $1 \
             AND min_lon - $3 <= $2 AND max_lon + $3 >= $2",
            collection.table()
        );

        let rows = client
            .query(&sql, &[&lat, &lon, &margin_deg])
            .await
            .map_err(|e| map_query_err(collection, e))?;

        Ok(rows.iter().map(doc_from_row).collect())
    }

    async fn query_by(
        &self,
        collection: Collection,
        query: &StoreQuery,
    ) -> Result<Vec<Value>, StoreError> {
        let client = self.client().await?;

        let mut sql = format!("SELECT id, doc FROM {} WHERE is_active", collection.table());
        let mut idx = 0usize;
        for (field, _) in &query.eq {
            idx += 1;
            sql.push_str(&format!(" AND doc->>'{field}' = ${idx}"));
        }
        if query.within.is_some() {
            sql.push_str(&format!(
                " AND lat BETWEEN ${} AND ${} AND lon BETWEEN ${} AND ${}",
                idx + 1,
                idx + 2,
                idx + 3,
                idx + 4
            ));
        }
        if let Some(limit) = query.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        let mut params: Vec<&(dyn ToSql + Sync)> = query
            .eq
            .iter()
            .map(|(_, value)| value as &(dyn ToSql + Sync))
            .collect();
        if let Some(bounds) = &query.within {
            params.push(&bounds.min_lat);
            params.push(&bounds.max_lat);
            params.push(&bounds.min_lon);
            params.push(&bounds.max_lon);
        }

        let rows = client
            .query(&sql, &params)
            .await
            .map_err(|e| map_query_err(collection, e))?;

        Ok(rows.iter().map(doc_from_row).collect())
    }
}
