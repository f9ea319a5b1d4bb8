use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The fixed set of quiz categories shipped with the catalog. Ids are stable
/// and match the `id` field of the catalog document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Science,
    History,
    Geography,
    Literature,
    VideoGames,
    Technology,
    Sports,
    Food,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Science,
        Category::History,
        Category::Geography,
        Category::Literature,
        Category::VideoGames,
        Category::Technology,
        Category::Sports,
        Category::Food,
    ];

    pub fn id(self) -> i64 {
        match self {
            Category::Science => 1,
            Category::History => 2,
            Category::Geography => 3,
            Category::Literature => 4,
            Category::VideoGames => 5,
            Category::Technology => 6,
            Category::Sports => 7,
            Category::Food => 8,
        }
    }

    pub fn from_id(id: i64) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.id() == id)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Category::Science => "Science",
            Category::History => "History",
            Category::Geography => "Geography",
            Category::Literature => "Literature",
            Category::VideoGames => "Video Games",
            Category::Technology => "Technology",
            Category::Sports => "Sports",
            Category::Food => "Food & Cooking",
        }
    }

    /// File stem of the optional per-category catalog document.
    pub fn file_stem(self) -> &'static str {
        match self {
            Category::Science => "science",
            Category::History => "history",
            Category::Geography => "geography",
            Category::Literature => "literature",
            Category::VideoGames => "games",
            Category::Technology => "technology",
            Category::Sports => "sports",
            Category::Food => "food",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.file_stem() == needle)
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Per-question countdown, in seconds.
    pub fn time_limit(self) -> u32 {
        match self {
            Difficulty::Easy => 30,
            Difficulty::Medium => 45,
            Difficulty::Hard => 60,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }

    pub fn parse(s: &str) -> Option<Difficulty> {
        match s {
            "EASY" => Some(Difficulty::Easy),
            "MEDIUM" => Some(Difficulty::Medium),
            "HARD" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: String,
    pub text: String,
}

/// A normalized question record. The correct-answer reference from the
/// catalog is resolved to an option index at load time; an unresolvable
/// reference falls back to index 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: String,
    pub category: Category,
    pub text: String,
    pub options: Vec<AnswerOption>,
    pub correct_index: usize,
    pub difficulty: Difficulty,
    pub explanation: Option<String>,
    pub tags: Vec<String>,
}

impl Question {
    pub fn time_limit(&self) -> u32 {
        self.difficulty.time_limit()
    }
}

/// Immutable record of one answered question. `user_answer` is `None` when
/// the countdown expired with no answer.
#[derive(Debug, Clone)]
pub struct AnsweredQuestion {
    pub question: Question,
    pub user_answer: Option<usize>,
    pub is_correct: bool,
    /// Seconds elapsed: time limit minus time remaining at answer.
    pub time_spent: u32,
}

/// Final summary of a completed session.
#[derive(Debug, Clone)]
pub struct QuizResult {
    pub category: Category,
    pub total_questions: usize,
    pub correct_answers: usize,
    pub score: u32,
    pub max_streak: u32,
    pub answered_questions: Vec<AnsweredQuestion>,
}

impl QuizResult {
    pub fn percentage(&self) -> f32 {
        if self.total_questions == 0 {
            return 0.0;
        }
        self.correct_answers as f32 / self.total_questions as f32 * 100.0
    }
}
