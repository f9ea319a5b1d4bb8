use quizly::db::Db;
use quizly::models::{AnswerOption, Category, Difficulty, Question};

pub async fn create_test_db() -> Db {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path = std::env::temp_dir().join(format!("quizly_test_{}_{}.db", std::process::id(), id));
    // Clean up leftover file from previous runs
    let _ = std::fs::remove_file(&path);
    let path = path.display().to_string();
    Db::new(&path).await.expect("failed to create test database")
}

#[allow(dead_code)]
pub fn make_question(id: &str, category: Category, correct_index: usize) -> Question {
    Question {
        id: id.to_string(),
        category,
        text: format!("Question {id}"),
        options: vec![
            AnswerOption { id: "a".to_string(), text: "Option A".to_string() },
            AnswerOption { id: "b".to_string(), text: "Option B".to_string() },
            AnswerOption { id: "c".to_string(), text: "Option C".to_string() },
            AnswerOption { id: "d".to_string(), text: "Option D".to_string() },
        ],
        correct_index,
        difficulty: Difficulty::Easy,
        explanation: None,
        tags: Vec::new(),
    }
}

#[allow(dead_code)]
pub fn make_questions(category: Category, n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| make_question(&format!("{}_{}", category.file_stem(), i + 1), category, i % 4))
        .collect()
}
