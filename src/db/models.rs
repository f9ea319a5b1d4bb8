// Database model structs

use crate::models::{AnswerOption, Category, Difficulty, Question};

/// Raw row of the `questions` table. Option and tag lists are stored as
/// JSON text columns.
#[derive(sqlx::FromRow)]
pub struct QuestionRow {
    pub id: String,
    pub category_id: i64,
    pub text: String,
    pub options_json: String,
    pub correct_index: i64,
    pub difficulty: String,
    pub explanation: Option<String>,
    pub tags_json: String,
}

impl QuestionRow {
    /// Convert a stored row back into a domain question. Rows that no
    /// longer decode (unknown category id, corrupt JSON) are dropped with
    /// a warning rather than failing the whole query.
    pub fn into_domain(self) -> Option<Question> {
        let Some(category) = Category::from_id(self.category_id) else {
            tracing::warn!(id = %self.id, category_id = self.category_id, "dropping stored question with unknown category");
            return None;
        };
        let options: Vec<AnswerOption> = match serde_json::from_str(&self.options_json) {
            Ok(options) => options,
            Err(e) => {
                tracing::warn!(id = %self.id, error = %e, "dropping stored question with undecodable options");
                return None;
            }
        };
        let tags: Vec<String> = serde_json::from_str(&self.tags_json).unwrap_or_default();
        let difficulty = Difficulty::parse(&self.difficulty).unwrap_or(Difficulty::Medium);

        Some(Question {
            id: self.id,
            category,
            text: self.text,
            options,
            correct_index: self.correct_index as usize,
            difficulty,
            explanation: self.explanation,
            tags,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct CategoryScoreRow {
    pub category_id: i64,
    pub total_score: i64,
    pub best_score: i64,
    pub attempts: i64,
    pub correct_answers: i64,
    pub total_questions: i64,
}

/// Persistent per-category aggregates. Mutated only by
/// [`Db::record_result`](super::Db::record_result).
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryScore {
    pub category: Category,
    pub total_score: i64,
    pub best_score: i64,
    pub attempts: i64,
    pub correct_answers: i64,
    pub total_questions: i64,
}

impl CategoryScore {
    pub fn zero(category: Category) -> Self {
        Self {
            category,
            total_score: 0,
            best_score: 0,
            attempts: 0,
            correct_answers: 0,
            total_questions: 0,
        }
    }

    pub fn accuracy(&self) -> f32 {
        if self.total_questions == 0 {
            return 0.0;
        }
        self.correct_answers as f32 / self.total_questions as f32 * 100.0
    }

    pub fn average_score(&self) -> f32 {
        if self.attempts == 0 {
            return 0.0;
        }
        self.total_score as f32 / self.attempts as f32
    }
}

/// Cross-category aggregates plus the externally-driven day streak.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct GlobalStats {
    pub total_score: i64,
    pub total_quizzes: i64,
    pub current_streak: i64,
    pub best_streak: i64,
    /// Unix millis of the most recent recorded result.
    pub last_quiz_at: Option<i64>,
}
