use std::collections::HashMap;

use super::models::{CategoryScore, CategoryScoreRow, GlobalStats};
use super::Db;
use crate::error::Result;
use crate::models::Category;

impl Db {
    /// Record a completed quiz in one transaction: global totals, category
    /// deltas, and the category best score.
    ///
    /// The best score is computed store-side as `MAX(best_score, score)`
    /// inside the same transaction, so two racing submissions can never
    /// overwrite a higher best with a lower one. Returns whether this
    /// result set a new category best.
    pub async fn record_result(
        &self,
        category: Category,
        score: i64,
        correct_answers: i64,
        total_questions: i64,
    ) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let previous_best: i64 = sqlx::query_scalar(
            "SELECT best_score FROM category_stats WHERE category_id = ?",
        )
        .bind(category.id())
        .fetch_optional(&mut *tx)
        .await?
        .unwrap_or(0);

        sqlx::query(
            r#"
            INSERT INTO category_stats (category_id, total_score, best_score, attempts, correct_answers, total_questions)
            VALUES (?, ?, ?, 1, ?, ?)
            ON CONFLICT(category_id) DO UPDATE SET
                total_score = total_score + excluded.total_score,
                best_score = MAX(best_score, excluded.best_score),
                attempts = attempts + 1,
                correct_answers = correct_answers + excluded.correct_answers,
                total_questions = total_questions + excluded.total_questions
            "#,
        )
        .bind(category.id())
        .bind(score)
        .bind(score)
        .bind(correct_answers)
        .bind(total_questions)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE global_stats
            SET total_score = total_score + ?,
                total_quizzes = total_quizzes + 1,
                last_quiz_at = ?
            WHERE id = 1
            "#,
        )
        .bind(score)
        .bind(chrono::Utc::now().timestamp_millis())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let is_new_best = score > previous_best;
        tracing::info!(
            category = %category,
            score,
            correct_answers,
            total_questions,
            is_new_best,
            "quiz result recorded"
        );
        Ok(is_new_best)
    }

    /// Set the current day streak (computed by the caller) and fold it into
    /// the best streak via max.
    pub async fn update_streak(&self, new_streak: i64) -> Result<()> {
        sqlx::query(
            "UPDATE global_stats SET current_streak = ?, best_streak = MAX(best_streak, ?) WHERE id = 1",
        )
        .bind(new_streak)
        .bind(new_streak)
        .execute(&self.pool)
        .await?;

        tracing::info!(new_streak, "day streak updated");
        Ok(())
    }

    pub async fn get_category_best(&self, category: Category) -> Result<i64> {
        let best: Option<i64> =
            sqlx::query_scalar("SELECT best_score FROM category_stats WHERE category_id = ?")
                .bind(category.id())
                .fetch_optional(&self.pool)
                .await?;

        Ok(best.unwrap_or(0))
    }

    pub async fn get_category_stats(&self, category: Category) -> Result<CategoryScore> {
        let row = sqlx::query_as::<_, CategoryScoreRow>(
            "SELECT category_id, total_score, best_score, attempts, correct_answers, total_questions
             FROM category_stats WHERE category_id = ?",
        )
        .bind(category.id())
        .fetch_optional(&self.pool)
        .await?;

        Ok(match row {
            Some(row) => CategoryScore {
                category,
                total_score: row.total_score,
                best_score: row.best_score,
                attempts: row.attempts,
                correct_answers: row.correct_answers,
                total_questions: row.total_questions,
            },
            None => CategoryScore::zero(category),
        })
    }

    /// One entry per known category, zero-valued if never attempted.
    pub async fn get_all_category_stats(&self) -> Result<Vec<CategoryScore>> {
        let rows = sqlx::query_as::<_, CategoryScoreRow>(
            "SELECT category_id, total_score, best_score, attempts, correct_answers, total_questions
             FROM category_stats",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_id: HashMap<i64, CategoryScoreRow> =
            rows.into_iter().map(|r| (r.category_id, r)).collect();

        Ok(Category::ALL
            .into_iter()
            .map(|category| match by_id.remove(&category.id()) {
                Some(row) => CategoryScore {
                    category,
                    total_score: row.total_score,
                    best_score: row.best_score,
                    attempts: row.attempts,
                    correct_answers: row.correct_answers,
                    total_questions: row.total_questions,
                },
                None => CategoryScore::zero(category),
            })
            .collect())
    }

    pub async fn global_stats(&self) -> Result<GlobalStats> {
        let stats = sqlx::query_as::<_, GlobalStats>(
            "SELECT total_score, total_quizzes, current_streak, best_streak, last_quiz_at
             FROM global_stats WHERE id = 1",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }

    /// Reset every counter to zero. User-initiated resets only; normal
    /// gameplay never calls this.
    pub async fn clear_all(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM category_stats").execute(&mut *tx).await?;
        sqlx::query(
            r#"
            UPDATE global_stats
            SET total_score = 0, total_quizzes = 0, current_streak = 0, best_streak = 0, last_quiz_at = NULL
            WHERE id = 1
            "#,
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!("score ledger cleared");
        Ok(())
    }
}
