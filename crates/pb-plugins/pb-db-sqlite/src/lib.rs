//! # pb-db-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite relational
//! model and the `pb-core` domain models, including the transactional
//! like toggle.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use pb_core::error::{AppError, Result};
use pb_core::models::{
    AboutEntry, AboutEntryType, Comment, EmergencyReport, Idea, LikeOutcome, Message,
    UrgencyLevel,
};
use pb_core::traits::SubmissionRepo;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use uuid::Uuid;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS ideas (
    id          TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    likes       INTEGER NOT NULL DEFAULT 0,
    category    TEXT,
    priority    TEXT,
    tags        TEXT NOT NULL DEFAULT '[]',
    created_at  TIMESTAMP NOT NULL,
    metadata    TEXT NOT NULL DEFAULT '{}'
);
CREATE TABLE IF NOT EXISTS idea_likes (
    idea_id     TEXT NOT NULL,
    user_id     TEXT NOT NULL,
    PRIMARY KEY (idea_id, user_id)
);
CREATE TABLE IF NOT EXISTS comments (
    id          TEXT PRIMARY KEY,
    idea_id     TEXT NOT NULL,
    content     TEXT NOT NULL,
    author      TEXT,
    created_at  TIMESTAMP NOT NULL
);
CREATE TABLE IF NOT EXISTS messages (
    id          TEXT PRIMARY KEY,
    content     TEXT NOT NULL,
    color       TEXT NOT NULL,
    title       TEXT,
    category    TEXT,
    mood        TEXT,
    is_advanced INTEGER NOT NULL DEFAULT 0,
    created_at  TIMESTAMP NOT NULL
);
CREATE TABLE IF NOT EXISTS emergencies (
    id                TEXT PRIMARY KEY,
    description       TEXT NOT NULL,
    name              TEXT,
    department        TEXT,
    urgency_level     TEXT NOT NULL,
    contact_agreement INTEGER NOT NULL DEFAULT 0,
    created_at        TIMESTAMP NOT NULL
);
CREATE TABLE IF NOT EXISTS about_entries (
    id                   TEXT PRIMARY KEY,
    content              TEXT NOT NULL,
    entry_type           TEXT NOT NULL,
    nickname             TEXT,
    is_surprise_unlocked INTEGER NOT NULL DEFAULT 0,
    created_at           TIMESTAMP NOT NULL
);
";

pub struct SqliteSubmissionRepo {
    pool: SqlitePool,
}

// Uuids are stored as hyphenated lowercase TEXT.
fn db_err(err: sqlx::Error) -> AppError {
    AppError::Internal(anyhow::Error::from(err))
}

impl SqliteSubmissionRepo {
    /// Connects (creating the file if needed) and bootstraps the schema.
    /// In-memory URLs get a single-connection pool so every caller sees
    /// the same database.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(db_err)?
            .create_if_missing(true);

        let max_connections = if database_url.contains(":memory:") { 1 } else { 16 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(db_err)?;

        sqlx::raw_sql(SCHEMA).execute(&pool).await.map_err(db_err)?;
        log::debug!("sqlite schema ready at {database_url}");

        Ok(Self { pool })
    }

    fn row_to_idea(row: &sqlx::sqlite::SqliteRow) -> Idea {
        Idea {
            id: Uuid::parse_str(row.get::<String, _>("id").as_str()).unwrap_or_default(),
            title: row.get("title"),
            description: row.get("description"),
            likes: row.get("likes"),
            category: row.get("category"),
            priority: row.get("priority"),
            tags: serde_json::from_str(&row.get::<String, _>("tags")).unwrap_or_default(),
            created_at: row.get("created_at"),
            metadata: serde_json::from_str(&row.get::<String, _>("metadata"))
                .unwrap_or_default(),
        }
    }

    fn row_to_message(row: &sqlx::sqlite::SqliteRow) -> Message {
        Message {
            id: Uuid::parse_str(row.get::<String, _>("id").as_str()).unwrap_or_default(),
            content: row.get("content"),
            color: row.get("color"),
            title: row.get("title"),
            category: row.get("category"),
            mood: row.get("mood"),
            is_advanced: row.get("is_advanced"),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl SubmissionRepo for SqliteSubmissionRepo {
    async fn create_idea(&self, idea: Idea) -> Result<()> {
        sqlx::query(
            "INSERT INTO ideas (id, title, description, likes, category, priority, tags, created_at, metadata) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(idea.id.to_string())
        .bind(idea.title)
        .bind(idea.description)
        .bind(idea.likes)
        .bind(idea.category)
        .bind(idea.priority)
        .bind(serde_json::to_string(&idea.tags).unwrap_or_else(|_| "[]".to_owned()))
        .bind(idea.created_at)
        .bind(idea.metadata.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    /// Lists ideas newest-first, each with its comments (also newest-first).
    async fn list_ideas(&self) -> Result<Vec<(Idea, Vec<Comment>)>> {
        let idea_rows = sqlx::query("SELECT * FROM ideas ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        let comment_rows =
            sqlx::query("SELECT * FROM comments ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await
                .map_err(db_err)?;

        let mut by_idea: HashMap<String, Vec<Comment>> = HashMap::new();
        for row in &comment_rows {
            let idea_id: String = row.get("idea_id");
            by_idea.entry(idea_id).or_default().push(Comment {
                id: Uuid::parse_str(row.get::<String, _>("id").as_str()).unwrap_or_default(),
                idea_id: Uuid::parse_str(row.get::<String, _>("idea_id").as_str())
                    .unwrap_or_default(),
                content: row.get("content"),
                author: row.get("author"),
                created_at: row.get("created_at"),
            });
        }

        Ok(idea_rows
            .iter()
            .map(|row| {
                let idea = Self::row_to_idea(row);
                let comments = by_idea.remove(&idea.id.to_string()).unwrap_or_default();
                (idea, comments)
            })
            .collect())
    }

    async fn has_liked(&self, idea_id: Uuid, user_id: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM idea_likes WHERE idea_id = ? AND user_id = ?")
            .bind(idea_id.to_string())
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.is_some())
    }

    /// Flips the like edge and adjusts the counter in one transaction.
    ///
    /// The DELETE runs first, so every toggle opens with a write and
    /// SQLite serializes concurrent toggles; `rows_affected` then tells us
    /// which direction this toggle went. The `(idea_id, user_id)` primary
    /// key rules out duplicate edges outright, keeping the counter equal
    /// to the edge count under any interleaving.
    async fn toggle_like(&self, idea_id: Uuid, user_id: &str) -> Result<LikeOutcome> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        let key = idea_id.to_string();

        let removed = sqlx::query("DELETE FROM idea_likes WHERE idea_id = ? AND user_id = ?")
            .bind(&key)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?
            .rows_affected();

        let has_liked = if removed == 1 {
            sqlx::query("UPDATE ideas SET likes = likes - 1 WHERE id = ?")
                .bind(&key)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
            false
        } else {
            // Nothing to unlike; confirm the idea exists before liking.
            let exists = sqlx::query("SELECT 1 FROM ideas WHERE id = ?")
                .bind(&key)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_err)?
                .is_some();
            if !exists {
                return Err(AppError::NotFound("Idea".to_owned(), key));
            }

            sqlx::query("INSERT INTO idea_likes (idea_id, user_id) VALUES (?, ?)")
                .bind(&key)
                .bind(user_id)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
            sqlx::query("UPDATE ideas SET likes = likes + 1 WHERE id = ?")
                .bind(&key)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
            true
        };

        let likes: i64 = sqlx::query("SELECT likes FROM ideas WHERE id = ?")
            .bind(&key)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err)?
            .map(|row| row.get("likes"))
            .ok_or_else(|| AppError::NotFound("Idea".to_owned(), key.clone()))?;

        tx.commit().await.map_err(db_err)?;
        Ok(LikeOutcome { likes, has_liked })
    }

    async fn create_comment(&self, comment: Comment) -> Result<()> {
        let idea_key = comment.idea_id.to_string();
        let exists = sqlx::query("SELECT 1 FROM ideas WHERE id = ?")
            .bind(&idea_key)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .is_some();
        if !exists {
            return Err(AppError::NotFound("Idea".to_owned(), idea_key));
        }

        sqlx::query(
            "INSERT INTO comments (id, idea_id, content, author, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(comment.id.to_string())
        .bind(idea_key)
        .bind(comment.content)
        .bind(comment.author)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    /// Removes the idea, its comments, and its like edges together so no
    /// orphan rows survive a partial failure.
    async fn delete_idea(&self, idea_id: Uuid) -> Result<()> {
        let key = idea_id.to_string();
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query("DELETE FROM comments WHERE idea_id = ?")
            .bind(&key)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        sqlx::query("DELETE FROM idea_likes WHERE idea_id = ?")
            .bind(&key)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        let deleted = sqlx::query("DELETE FROM ideas WHERE id = ?")
            .bind(&key)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?
            .rows_affected();

        if deleted == 0 {
            return Err(AppError::NotFound("Idea".to_owned(), key));
        }
        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn create_message(&self, message: Message) -> Result<()> {
        sqlx::query(
            "INSERT INTO messages (id, content, color, title, category, mood, is_advanced, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(message.id.to_string())
        .bind(message.content)
        .bind(message.color)
        .bind(message.title)
        .bind(message.category)
        .bind(message.mood)
        .bind(message.is_advanced)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn list_messages(&self) -> Result<Vec<Message>> {
        let rows = sqlx::query("SELECT * FROM messages ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(rows.iter().map(Self::row_to_message).collect())
    }

    async fn delete_message(&self, message_id: Uuid) -> Result<()> {
        let key = message_id.to_string();
        let deleted = sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(&key)
            .execute(&self.pool)
            .await
            .map_err(db_err)?
            .rows_affected();
        if deleted == 0 {
            return Err(AppError::NotFound("Message".to_owned(), key));
        }
        Ok(())
    }

    async fn create_emergency(&self, report: EmergencyReport) -> Result<()> {
        sqlx::query(
            "INSERT INTO emergencies (id, description, name, department, urgency_level, contact_agreement, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(report.id.to_string())
        .bind(report.description)
        .bind(report.name)
        .bind(report.department)
        .bind(report.urgency_level.as_str())
        .bind(report.contact_agreement)
        .bind(report.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn list_emergencies(&self) -> Result<Vec<EmergencyReport>> {
        let rows = sqlx::query("SELECT * FROM emergencies ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(rows
            .iter()
            .map(|row| EmergencyReport {
                id: Uuid::parse_str(row.get::<String, _>("id").as_str()).unwrap_or_default(),
                description: row.get("description"),
                name: row.get("name"),
                department: row.get("department"),
                urgency_level: UrgencyLevel::parse(row.get::<String, _>("urgency_level").as_str())
                    .unwrap_or_default(),
                contact_agreement: row.get("contact_agreement"),
                created_at: row.get("created_at"),
            })
            .collect())
    }

    async fn create_about_entry(&self, entry: AboutEntry) -> Result<()> {
        sqlx::query(
            "INSERT INTO about_entries (id, content, entry_type, nickname, is_surprise_unlocked, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(entry.id.to_string())
        .bind(entry.content)
        .bind(entry.entry_type.as_str())
        .bind(entry.nickname)
        .bind(entry.is_surprise_unlocked)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn list_about_entries(&self) -> Result<Vec<AboutEntry>> {
        let rows = sqlx::query("SELECT * FROM about_entries ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(rows
            .iter()
            .map(|row| AboutEntry {
                id: Uuid::parse_str(row.get::<String, _>("id").as_str()).unwrap_or_default(),
                content: row.get("content"),
                entry_type: AboutEntryType::parse(row.get::<String, _>("entry_type").as_str())
                    .unwrap_or_default(),
                nickname: row.get("nickname"),
                is_surprise_unlocked: row.get("is_surprise_unlocked"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}
