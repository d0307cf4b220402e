//! Metadata store trait and SQLite implementation.

use crate::error::{MetadataError, MetadataResult};
use crate::repos::{DeckRepo, FlashcardRepo};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Combined metadata store trait.
#[async_trait]
pub trait MetadataStore: DeckRepo + FlashcardRepo + Send + Sync {
    /// Run database migrations.
    async fn migrate(&self) -> MetadataResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> MetadataResult<()>;
}

/// SQLite-based metadata store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Create a new SQLite store.
    pub async fn new(path: impl AsRef<Path>) -> MetadataResult<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            // Prevent transient "database is locked" errors under concurrent access.
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // SQLite permits limited write concurrency; a single connection
            // avoids "database is locked" failures under axum concurrency.
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn migrate(&self) -> MetadataResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// Implement the repository traits for SqliteStore
mod sqlite_impl {
    use super::*;
    use crate::models::{DeckRow, FlashcardRow};
    use crate::repos::CategoryCount;
    use uuid::Uuid;

    #[async_trait]
    impl DeckRepo for SqliteStore {
        async fn create_deck(&self, deck: &DeckRow) -> MetadataResult<()> {
            sqlx::query(
                "INSERT INTO decks (deck_id, name, description, created_at) VALUES (?, ?, ?, ?)",
            )
            .bind(deck.deck_id)
            .bind(&deck.name)
            .bind(&deck.description)
            .bind(deck.created_at)
            .execute(&self.pool)
            .await?;
            Ok(())
        }

        async fn get_deck(&self, deck_id: Uuid) -> MetadataResult<Option<DeckRow>> {
            let row = sqlx::query_as::<_, DeckRow>("SELECT * FROM decks WHERE deck_id = ?")
                .bind(deck_id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn list_decks(&self) -> MetadataResult<Vec<DeckRow>> {
            let rows =
                sqlx::query_as::<_, DeckRow>("SELECT * FROM decks ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?;
            Ok(rows)
        }

        async fn delete_deck(&self, deck_id: Uuid) -> MetadataResult<()> {
            let result = sqlx::query("DELETE FROM decks WHERE deck_id = ?")
                .bind(deck_id)
                .execute(&self.pool)
                .await?;
            if result.rows_affected() == 0 {
                return Err(MetadataError::NotFound(format!(
                    "deck_id {deck_id} not found"
                )));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl FlashcardRepo for SqliteStore {
        async fn create_flashcard(&self, card: &FlashcardRow) -> MetadataResult<()> {
            sqlx::query(
                r#"
                INSERT INTO flashcards (
                    flashcard_id, deck_id, question, answer, category, hint, image, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(card.flashcard_id)
            .bind(card.deck_id)
            .bind(&card.question)
            .bind(&card.answer)
            .bind(&card.category)
            .bind(&card.hint)
            .bind(&card.image)
            .bind(card.created_at)
            .execute(&self.pool)
            .await?;
            Ok(())
        }

        async fn create_flashcards(&self, cards: &[FlashcardRow]) -> MetadataResult<()> {
            if cards.is_empty() {
                return Ok(());
            }

            // Single transaction for the whole batch - all land or none do
            let mut tx = self.pool.begin().await?;

            for card in cards {
                sqlx::query(
                    r#"
                    INSERT INTO flashcards (
                        flashcard_id, deck_id, question, answer, category, hint, image, created_at
                    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(card.flashcard_id)
                .bind(card.deck_id)
                .bind(&card.question)
                .bind(&card.answer)
                .bind(&card.category)
                .bind(&card.hint)
                .bind(&card.image)
                .bind(card.created_at)
                .execute(&mut *tx)
                .await?;
            }

            tx.commit().await?;
            Ok(())
        }

        async fn get_flashcard(
            &self,
            flashcard_id: Uuid,
        ) -> MetadataResult<Option<FlashcardRow>> {
            let row = sqlx::query_as::<_, FlashcardRow>(
                "SELECT * FROM flashcards WHERE flashcard_id = ?",
            )
            .bind(flashcard_id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        }

        async fn list_flashcards(&self, deck_id: Uuid) -> MetadataResult<Vec<FlashcardRow>> {
            let rows = sqlx::query_as::<_, FlashcardRow>(
                "SELECT * FROM flashcards WHERE deck_id = ? ORDER BY created_at DESC",
            )
            .bind(deck_id)
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }

        async fn list_flashcards_in_categories(
            &self,
            deck_id: Uuid,
            categories: &[String],
        ) -> MetadataResult<Vec<FlashcardRow>> {
            if categories.is_empty() {
                return self.list_flashcards(deck_id).await;
            }

            // Build query with dynamic IN clause
            let placeholders: Vec<&str> = categories.iter().map(|_| "?").collect();
            let query = format!(
                "SELECT * FROM flashcards WHERE deck_id = ? AND category IN ({}) ORDER BY created_at DESC",
                placeholders.join(", ")
            );

            let mut query_builder = sqlx::query_as::<_, FlashcardRow>(&query).bind(deck_id);
            for category in categories {
                query_builder = query_builder.bind(category);
            }

            let rows = query_builder.fetch_all(&self.pool).await?;
            Ok(rows)
        }

        async fn update_flashcard_text(
            &self,
            flashcard_id: Uuid,
            question: &str,
            answer: &str,
            category: &str,
            hint: &str,
        ) -> MetadataResult<()> {
            let result = sqlx::query(
                "UPDATE flashcards SET question = ?, answer = ?, category = ?, hint = ? WHERE flashcard_id = ?",
            )
            .bind(question)
            .bind(answer)
            .bind(category)
            .bind(hint)
            .bind(flashcard_id)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 0 {
                return Err(MetadataError::NotFound(format!(
                    "flashcard_id {flashcard_id} not found"
                )));
            }
            Ok(())
        }

        async fn set_flashcard_image(
            &self,
            flashcard_id: Uuid,
            image: Option<&str>,
        ) -> MetadataResult<()> {
            let result = sqlx::query("UPDATE flashcards SET image = ? WHERE flashcard_id = ?")
                .bind(image)
                .bind(flashcard_id)
                .execute(&self.pool)
                .await?;

            if result.rows_affected() == 0 {
                return Err(MetadataError::NotFound(format!(
                    "flashcard_id {flashcard_id} not found"
                )));
            }
            Ok(())
        }

        async fn delete_flashcard(&self, flashcard_id: Uuid) -> MetadataResult<()> {
            let result = sqlx::query("DELETE FROM flashcards WHERE flashcard_id = ?")
                .bind(flashcard_id)
                .execute(&self.pool)
                .await?;
            if result.rows_affected() == 0 {
                return Err(MetadataError::NotFound(format!(
                    "flashcard_id {flashcard_id} not found"
                )));
            }
            Ok(())
        }

        async fn delete_deck_flashcards(&self, deck_id: Uuid) -> MetadataResult<u64> {
            let result = sqlx::query("DELETE FROM flashcards WHERE deck_id = ?")
                .bind(deck_id)
                .execute(&self.pool)
                .await?;
            Ok(result.rows_affected())
        }

        async fn count_flashcards(&self, deck_id: Uuid) -> MetadataResult<u64> {
            let count: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM flashcards WHERE deck_id = ?")
                    .bind(deck_id)
                    .fetch_one(&self.pool)
                    .await?;
            Ok(count as u64)
        }

        async fn list_categories(&self, deck_id: Uuid) -> MetadataResult<Vec<CategoryCount>> {
            let rows: Vec<(String, i64)> = sqlx::query_as(
                r#"
                SELECT category, COUNT(*) AS cnt
                FROM flashcards
                WHERE deck_id = ? AND category <> ''
                GROUP BY category
                ORDER BY cnt DESC, category ASC
                "#,
            )
            .bind(deck_id)
            .fetch_all(&self.pool)
            .await?;

            Ok(rows
                .into_iter()
                .map(|(category, count)| CategoryCount {
                    category,
                    count: count as u64,
                })
                .collect())
        }
    }
}

/// Database schema.
///
/// `flashcards.deck_id` intentionally carries no FOREIGN KEY: the cascade
/// from a deck to its flashcards (and their media files) is performed by the
/// service so that image files are removed before the rows are.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS decks (
    deck_id BLOB PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS flashcards (
    flashcard_id BLOB PRIMARY KEY,
    deck_id BLOB NOT NULL,
    question TEXT NOT NULL,
    answer TEXT NOT NULL,
    category TEXT NOT NULL DEFAULT '',
    hint TEXT NOT NULL DEFAULT '',
    image TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_flashcards_deck ON flashcards(deck_id);
CREATE INDEX IF NOT EXISTS idx_flashcards_deck_category ON flashcards(deck_id, category);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeckRow, FlashcardRow};
    use crate::repos::CategoryCount;
    use time::OffsetDateTime;
    use uuid::Uuid;

    async fn build_store() -> (tempfile::TempDir, SqliteStore) {
        let temp = tempfile::tempdir().unwrap();
        let store = SqliteStore::new(temp.path().join("metadata.db"))
            .await
            .unwrap();
        (temp, store)
    }

    fn deck(name: &str) -> DeckRow {
        DeckRow {
            deck_id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn card(deck_id: Uuid, question: &str, category: &str) -> FlashcardRow {
        FlashcardRow {
            flashcard_id: Uuid::new_v4(),
            deck_id,
            question: question.to_string(),
            answer: format!("{question}-answer"),
            category: category.to_string(),
            hint: String::new(),
            image: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[tokio::test]
    async fn deck_roundtrip() {
        let (_temp, store) = build_store().await;
        let row = deck("Spanish");
        store.create_deck(&row).await.unwrap();

        let fetched = store.get_deck(row.deck_id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Spanish");
        assert_eq!(store.count_flashcards(row.deck_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn list_decks_newest_first() {
        let (_temp, store) = build_store().await;
        let mut older = deck("older");
        older.created_at = OffsetDateTime::from_unix_timestamp(1_000_000).unwrap();
        let mut newer = deck("newer");
        newer.created_at = OffsetDateTime::from_unix_timestamp(2_000_000).unwrap();

        store.create_deck(&older).await.unwrap();
        store.create_deck(&newer).await.unwrap();

        let decks = store.list_decks().await.unwrap();
        let names: Vec<&str> = decks.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["newer", "older"]);
    }

    #[tokio::test]
    async fn delete_deck_not_found() {
        let (_temp, store) = build_store().await;
        match store.delete_deck(Uuid::new_v4()).await {
            Err(MetadataError::NotFound(_)) => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_text_leaves_image_untouched() {
        let (_temp, store) = build_store().await;
        let d = deck("d");
        store.create_deck(&d).await.unwrap();
        let mut c = card(d.deck_id, "q", "");
        c.image = Some("123-abcd.png".to_string());
        store.create_flashcard(&c).await.unwrap();

        store
            .update_flashcard_text(c.flashcard_id, "q2", "a2", "cat", "hint")
            .await
            .unwrap();

        let fetched = store.get_flashcard(c.flashcard_id).await.unwrap().unwrap();
        assert_eq!(fetched.question, "q2");
        assert_eq!(fetched.category, "cat");
        assert_eq!(fetched.image.as_deref(), Some("123-abcd.png"));
    }

    #[tokio::test]
    async fn category_listing_counts_and_orders() {
        let (_temp, store) = build_store().await;
        let d = deck("Spanish");
        store.create_deck(&d).await.unwrap();
        for q in ["ser", "estar", "ir"] {
            store.create_flashcard(&card(d.deck_id, q, "Verbs")).await.unwrap();
        }
        for q in ["casa", "perro"] {
            store.create_flashcard(&card(d.deck_id, q, "Nouns")).await.unwrap();
        }
        store.create_flashcard(&card(d.deck_id, "hola", "")).await.unwrap();

        let categories = store.list_categories(d.deck_id).await.unwrap();
        assert_eq!(
            categories,
            vec![
                CategoryCount {
                    category: "Verbs".to_string(),
                    count: 3
                },
                CategoryCount {
                    category: "Nouns".to_string(),
                    count: 2
                },
            ]
        );
    }

    #[tokio::test]
    async fn category_filter_intersects() {
        let (_temp, store) = build_store().await;
        let d = deck("d");
        store.create_deck(&d).await.unwrap();
        store.create_flashcard(&card(d.deck_id, "a", "X")).await.unwrap();
        store.create_flashcard(&card(d.deck_id, "b", "Y")).await.unwrap();
        store.create_flashcard(&card(d.deck_id, "c", "Z")).await.unwrap();

        let filtered = store
            .list_flashcards_in_categories(d.deck_id, &["X".to_string(), "Y".to_string()])
            .await
            .unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|c| c.category == "X" || c.category == "Y"));

        // Empty filter means no filter.
        let all = store
            .list_flashcards_in_categories(d.deck_id, &[])
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn bulk_create_is_transactional() {
        let (_temp, store) = build_store().await;
        let d = deck("d");
        store.create_deck(&d).await.unwrap();

        let good = card(d.deck_id, "ok", "");
        // Duplicate primary key forces the second insert to fail.
        let mut dup = card(d.deck_id, "dup", "");
        dup.flashcard_id = good.flashcard_id;

        let result = store.create_flashcards(&[good, dup]).await;
        assert!(result.is_err());
        assert_eq!(store.count_flashcards(d.deck_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_deck_flashcards_reports_count() {
        let (_temp, store) = build_store().await;
        let d = deck("d");
        store.create_deck(&d).await.unwrap();
        for q in ["a", "b", "c"] {
            store.create_flashcard(&card(d.deck_id, q, "")).await.unwrap();
        }

        assert_eq!(store.delete_deck_flashcards(d.deck_id).await.unwrap(), 3);
        assert_eq!(store.count_flashcards(d.deck_id).await.unwrap(), 0);
    }
}
