use crate::traits::DeduplicationStore;
use crate::types::{CuratorError, PublishedRecord, Result};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// [`DeduplicationStore`] over a `published_posts` table in PostgreSQL.
pub struct PgDedupStore {
    db: PgPool,
    timeout: Duration,
    title_max_chars: usize,
}

/// Bound a database call by `timeout`; an elapsed deadline becomes
/// [`CuratorError::Timeout`].
pub async fn with_deadline<T, F>(timeout: Duration, what: &str, query: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(timeout, query).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(CuratorError::Timeout(format!("{} after {:?}", what, timeout))),
    }
}

impl PgDedupStore {
    /// Build a lazily connecting pool. An unreachable database surfaces on
    /// the first query, not here. Every query is bounded by `timeout`.
    pub fn new(database_url: &str, timeout: Duration, title_max_chars: usize) -> Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(timeout)
            .connect_lazy(database_url)?;

        Ok(Self {
            db,
            timeout,
            title_max_chars,
        })
    }

    pub async fn setup_schema(&self) -> Result<()> {
        let create = sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS published_posts (
                link TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                published_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.db);
        with_deadline(self.timeout, "schema setup", create).await?;

        info!("published_posts schema ready");
        Ok(())
    }
}

#[async_trait]
impl DeduplicationStore for PgDedupStore {
    async fn exists(&self, identifier: &str) -> Result<bool> {
        let query = sqlx::query("SELECT COUNT(*) AS count FROM published_posts WHERE link = $1")
            .bind(identifier)
            .fetch_one(&self.db);
        let row = with_deadline(self.timeout, "duplicate check", query).await?;
        Ok(row.get::<i64, _>("count") > 0)
    }

    async fn record(&self, identifier: &str, title: &str) -> Result<()> {
        let record = PublishedRecord::new(identifier, title, self.title_max_chars);

        let insert = sqlx::query(
            r#"
            INSERT INTO published_posts (link, title, published_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (link) DO NOTHING
            "#,
        )
        .bind(&record.identifier)
        .bind(&record.title)
        .bind(record.timestamp)
        .execute(&self.db);
        let result = with_deadline(self.timeout, "record insert", insert).await?;

        if result.rows_affected() == 0 {
            debug!("Record for {} already existed", identifier);
        }
        Ok(())
    }
}

/// In-process [`DeduplicationStore`] for dry runs and tests.
#[derive(Debug)]
pub struct MemoryDedupStore {
    records: RwLock<HashMap<String, PublishedRecord>>,
    title_max_chars: usize,
}

impl MemoryDedupStore {
    pub fn new(title_max_chars: usize) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            title_max_chars,
        }
    }

    /// Seed the store with identifiers that count as already published.
    pub fn with_identifiers<I, S>(title_max_chars: usize, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let records = identifiers
            .into_iter()
            .map(|id| {
                let id = id.as_ref();
                (id.to_string(), PublishedRecord::new(id, "", title_max_chars))
            })
            .collect();

        Self {
            records: RwLock::new(records),
            title_max_chars,
        }
    }

    pub async fn records(&self) -> Vec<PublishedRecord> {
        let mut records: Vec<_> = self.records.read().await.values().cloned().collect();
        records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.identifier.cmp(&b.identifier)));
        records
    }
}

#[async_trait]
impl DeduplicationStore for MemoryDedupStore {
    async fn exists(&self, identifier: &str) -> Result<bool> {
        Ok(self.records.read().await.contains_key(identifier))
    }

    async fn record(&self, identifier: &str, title: &str) -> Result<()> {
        self.records
            .write()
            .await
            .entry(identifier.to_string())
            .or_insert_with(|| PublishedRecord::new(identifier, title, self.title_max_chars));
        Ok(())
    }
}
