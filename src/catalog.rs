//! Content catalog loader.
//!
//! Parses the bundled JSON document (categories -> questions -> options)
//! into normalized [`Question`] records. A full-catalog load is
//! all-or-nothing: any shape error aborts the load with
//! [`QuizError::MalformedCatalog`] and nothing is installed. Per-question
//! data problems are normalized instead of rejected, so one bad record
//! never takes down the whole catalog.

use std::path::Path;

use serde::Deserialize;

use crate::error::{QuizError, Result};
use crate::models::{AnswerOption, Category, Difficulty, Question};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogRoot {
    #[allow(dead_code)]
    version: u32,
    #[allow(dead_code)]
    last_updated: String,
    categories: Vec<CatalogCategory>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogCategory {
    id: i64,
    name: String,
    #[allow(dead_code)]
    icon: String,
    #[allow(dead_code)]
    color: String,
    questions: Vec<CatalogQuestion>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogQuestion {
    id: String,
    text: String,
    options: Vec<CatalogOption>,
    correct_answer_id: String,
    difficulty: String,
    explanation: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Deserialize)]
struct CatalogOption {
    id: String,
    text: String,
}

/// Parse a full catalog document into normalized question records.
///
/// Categories with ids outside the known set are skipped with a warning;
/// the rest of the document still loads.
pub fn parse_catalog(json: &str) -> Result<Vec<Question>> {
    let root: CatalogRoot =
        serde_json::from_str(json).map_err(|e| QuizError::MalformedCatalog(e.to_string()))?;

    let mut questions = Vec::new();
    for category_json in root.categories {
        let Some(category) = Category::from_id(category_json.id) else {
            tracing::warn!(
                id = category_json.id,
                name = %category_json.name,
                "skipping catalog category with unknown id"
            );
            continue;
        };
        for q in category_json.questions {
            questions.push(normalize(q, category));
        }
    }

    tracing::debug!(count = questions.len(), "parsed catalog document");
    Ok(questions)
}

/// Load and parse the full catalog document at `path`.
pub fn load_catalog(path: &Path) -> Result<Vec<Question>> {
    let json = std::fs::read_to_string(path)?;
    parse_catalog(&json)
}

/// Load the optional per-category document `<stem>.json` from `dir`.
///
/// Per-category documents are granular overrides; a missing file returns an
/// empty list rather than an error. The document shares the catalog shape
/// and only the matching category's questions are taken from it.
pub fn load_category(dir: &Path, category: Category) -> Result<Vec<Question>> {
    let path = dir.join(format!("{}.json", category.file_stem()));
    let json = match std::fs::read_to_string(&path) {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no per-category document, returning empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let root: CatalogRoot =
        serde_json::from_str(&json).map_err(|e| QuizError::MalformedCatalog(e.to_string()))?;

    let questions = root
        .categories
        .into_iter()
        .filter(|c| c.id == category.id())
        .flat_map(|c| c.questions)
        .map(|q| normalize(q, category))
        .collect();

    Ok(questions)
}

fn normalize(q: CatalogQuestion, category: Category) -> Question {
    // Unresolvable correct-answer ids fall back to index 0. Documented
    // behavior: availability over strict validation.
    let correct_index = match q.options.iter().position(|o| o.id == q.correct_answer_id) {
        Some(idx) => idx,
        None => {
            tracing::warn!(
                question = %q.id,
                answer_id = %q.correct_answer_id,
                "correct answer id does not match any option, defaulting to index 0"
            );
            0
        }
    };

    let difficulty = match Difficulty::parse(&q.difficulty) {
        Some(d) => d,
        None => {
            tracing::warn!(
                question = %q.id,
                difficulty = %q.difficulty,
                "unknown difficulty, defaulting to MEDIUM"
            );
            Difficulty::Medium
        }
    };

    Question {
        id: q.id,
        category,
        text: q.text,
        options: q
            .options
            .into_iter()
            .map(|o| AnswerOption { id: o.id, text: o.text })
            .collect(),
        correct_index,
        difficulty,
        explanation: q.explanation,
        tags: q.tags,
    }
}
