use sqlx::Sqlite;

use super::models::QuestionRow;
use super::Db;
use crate::error::Result;
use crate::models::{Category, Question};

impl Db {
    /// Replace the entire stored catalog atomically: delete all existing
    /// rows, insert the new set in one transaction. A concurrent reader
    /// sees either the full old catalog or the full new one.
    pub async fn replace_all(&self, questions: &[Question]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM questions").execute(&mut *tx).await?;
        Self::insert_questions_tx(&mut tx, questions).await?;

        tx.commit().await?;

        tracing::info!(count = questions.len(), "catalog replaced");
        Ok(())
    }

    /// Replace one category's questions atomically, leaving the rest of the
    /// catalog untouched. Backs the optional per-category override load.
    pub async fn replace_category(&self, category: Category, questions: &[Question]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM questions WHERE category_id = ?")
            .bind(category.id())
            .execute(&mut *tx)
            .await?;
        Self::insert_questions_tx(&mut tx, questions).await?;

        tx.commit().await?;

        tracing::info!(category = %category, count = questions.len(), "category questions replaced");
        Ok(())
    }

    async fn insert_questions_tx(
        tx: &mut sqlx::Transaction<'_, Sqlite>,
        questions: &[Question],
    ) -> Result<()> {
        for q in questions {
            let options_json = serde_json::to_string(&q.options)?;
            let tags_json = serde_json::to_string(&q.tags)?;

            sqlx::query(
                r#"
                INSERT INTO questions (id, category_id, text, options_json, correct_index, difficulty, explanation, tags_json)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(id) DO UPDATE SET
                    category_id = excluded.category_id,
                    text = excluded.text,
                    options_json = excluded.options_json,
                    correct_index = excluded.correct_index,
                    difficulty = excluded.difficulty,
                    explanation = excluded.explanation,
                    tags_json = excluded.tags_json
                "#,
            )
            .bind(&q.id)
            .bind(q.category.id())
            .bind(&q.text)
            .bind(&options_json)
            .bind(q.correct_index as i64)
            .bind(q.difficulty.as_str())
            .bind(&q.explanation)
            .bind(&tags_json)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }

    pub async fn get_by_category(&self, category: Category) -> Result<Vec<Question>> {
        let rows = sqlx::query_as::<_, QuestionRow>(
            "SELECT id, category_id, text, options_json, correct_index, difficulty, explanation, tags_json
             FROM questions WHERE category_id = ? ORDER BY id",
        )
        .bind(category.id())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().filter_map(QuestionRow::into_domain).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Question>> {
        let row = sqlx::query_as::<_, QuestionRow>(
            "SELECT id, category_id, text, options_json, correct_index, difficulty, explanation, tags_json
             FROM questions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(QuestionRow::into_domain))
    }

    pub async fn count_by_category(&self, category: Category) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions WHERE category_id = ?")
            .bind(category.id())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn count_all(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn delete_by_category(&self, category: Category) -> Result<()> {
        sqlx::query("DELETE FROM questions WHERE category_id = ?")
            .bind(category.id())
            .execute(&self.pool)
            .await?;

        tracing::info!(category = %category, "category questions deleted");
        Ok(())
    }
}
