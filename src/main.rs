use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use quizly::db::Db;
use quizly::engine::QuizEngine;
use quizly::models::Category;
use quizly::{catalog, names, stats};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path of the local quiz database.
    #[arg(short, long, env = "QUIZLY_DB", default_value = "quizly.db")]
    database: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Install a catalog document into the question store.
    Load {
        /// Catalog file, or a directory containing per-category documents.
        #[arg(default_value = "assets")]
        path: PathBuf,

        /// Load only this category's override document from the directory.
        #[arg(long)]
        category: Option<Category>,
    },
    /// Play a quiz for one category.
    Play { category: Category },
    /// Show accumulated statistics and badges.
    Stats,
    /// Reset all scores, streaks and badges.
    Reset {
        #[arg(long)]
        force: bool,
    },
    /// Read or write a preference value.
    Config {
        key: String,
        value: Option<String>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "quizly=info".to_owned());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let db = Db::new(&args.database).await?;

    match args.command {
        Command::Load { path, category } => load(&db, path, category).await?,
        Command::Play { category } => play(&db, category).await?,
        Command::Stats => show_stats(&db).await?,
        Command::Reset { force } => {
            if force {
                db.clear_all().await?;
                println!("All scores and streaks have been reset.");
            } else {
                println!("This clears every score, streak and badge. Re-run with --force to confirm.");
            }
        }
        Command::Config { key, value } => match value {
            Some(value) => db.set_pref(&key, &value).await?,
            None => match db.get_pref(&key).await? {
                Some(value) => println!("{value}"),
                None => println!("{key} is not set"),
            },
        },
    }

    Ok(())
}

async fn load(db: &Db, path: PathBuf, category: Option<Category>) -> color_eyre::Result<()> {
    match category {
        Some(category) => {
            let questions = catalog::load_category(&path, category)?;
            if questions.is_empty() {
                println!("No override document for {category} under {}.", path.display());
                return Ok(());
            }
            db.replace_category(category, &questions).await?;
            println!("Installed {} {category} questions.", questions.len());
        }
        None => {
            let file = if path.is_dir() {
                path.join(names::DEFAULT_CATALOG_FILE)
            } else {
                path
            };
            // Parse before touching the store: a malformed document must
            // leave the prior catalog authoritative.
            let questions = catalog::load_catalog(&file)?;
            db.replace_all(&questions).await?;
            println!("Installed {} questions from {}.", questions.len(), file.display());
        }
    }
    Ok(())
}

async fn play(db: &Db, category: Category) -> color_eyre::Result<()> {
    // Read global totals before the session: record_result advances
    // last_quiz_at, and the day-streak policy needs the prior value.
    let before = db.global_stats().await?;

    let engine = QuizEngine::start(db.clone(), category).await?;
    let mut rx = engine.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut shown_question: Option<usize> = None;
    let mut shown_feedback: Option<usize> = None;

    loop {
        let snapshot = rx.borrow_and_update().clone();

        if let Some(message) = &snapshot.error {
            println!("{message}");
            return Ok(());
        }

        if snapshot.complete {
            let percentage = stats::percentage(
                (snapshot.score / names::POINTS_PER_CORRECT) as i64,
                snapshot.question_count as i64,
            );
            let level = stats::AchievementLevel::from_percentage(percentage);
            println!();
            println!("{} {}", level.emoji(), level.title());
            println!(
                "Final score: {} ({:.0}% correct, best streak {})",
                snapshot.score, percentage, snapshot.max_streak
            );
            if snapshot.new_best {
                println!("New personal best for {category} (previous: {}).", snapshot.previous_best);
            }

            // Day-streak adjacency is caller policy, not engine logic.
            let streak = next_day_streak(before.last_quiz_at, before.current_streak, Utc::now());
            db.update_streak(streak).await?;
            println!("Day streak: {streak}");
            return Ok(());
        }

        if let Some(question) = &snapshot.question {
            if snapshot.answered {
                if shown_feedback != Some(snapshot.current_index) {
                    shown_feedback = Some(snapshot.current_index);
                    // A correct answer always extends the streak, so a
                    // non-zero streak identifies it.
                    let was_correct = snapshot.current_streak > 0;
                    if was_correct {
                        println!("Correct! Score: {}, streak: {}", snapshot.score, snapshot.current_streak);
                    } else {
                        let correct = &question.options[question.correct_index];
                        println!("Wrong. The answer was: {}", correct.text);
                    }
                    if let Some(explanation) = &question.explanation {
                        println!("  {explanation}");
                    }
                }
                rx.changed().await?;
                continue;
            }

            if shown_question != Some(snapshot.current_index) {
                shown_question = Some(snapshot.current_index);
                println!();
                println!(
                    "[{}/{}] {} ({}s)",
                    snapshot.current_index + 1,
                    snapshot.question_count,
                    question.text,
                    snapshot.time_remaining
                );
                for (i, option) in question.options.iter().enumerate() {
                    println!("  {}) {}", i + 1, option.text);
                }
                print!("> ");
                use std::io::Write as _;
                let _ = std::io::stdout().flush();
            }

            tokio::select! {
                changed = rx.changed() => changed?,
                line = lines.next_line() => {
                    let Some(line) = line? else { return Ok(()) };
                    match line.trim().parse::<usize>() {
                        Ok(n) if (1..=question.options.len()).contains(&n) => {
                            engine.submit_answer(n - 1).await;
                        }
                        _ => println!("Pick a number between 1 and {}.", question.options.len()),
                    }
                }
            }
        } else {
            rx.changed().await?;
        }
    }
}

async fn show_stats(db: &Db) -> color_eyre::Result<()> {
    let overview = stats::overview(db).await?;

    println!(
        "Total score: {}  quizzes: {}  average: {:.1}",
        overview.totals.total_score,
        overview.totals.total_quizzes,
        overview.average_score()
    );
    println!(
        "Day streak: {} (best {})",
        overview.totals.current_streak, overview.totals.best_streak
    );

    for score in overview.categories.iter().filter(|c| c.attempts > 0) {
        println!(
            "  {:<28} best {:>4}  accuracy {:>5.1}%  attempts {}",
            score.category.display_name(),
            score.best_score,
            score.accuracy(),
            score.attempts
        );
    }
    if let Some(best) = overview.best_category {
        println!("Best category: {best}");
    }

    println!();
    for badge in &overview.badges {
        let mark = if badge.unlocked { badge.icon } else { "🔒" };
        println!("  {mark} {}: {}", badge.title, badge.description);
    }

    Ok(())
}

/// Day-streak policy: same day keeps the streak, the day after extends it,
/// any gap (or a fresh ledger) restarts at 1.
fn next_day_streak(last_quiz_at: Option<i64>, current_streak: i64, now: DateTime<Utc>) -> i64 {
    let Some(millis) = last_quiz_at else {
        return 1;
    };
    let Some(last) = Utc.timestamp_millis_opt(millis).single() else {
        return 1;
    };

    let today = now.date_naive();
    let last_day = last.date_naive();
    if last_day == today {
        current_streak.max(1)
    } else if Some(last_day) == today.pred_opt() {
        current_streak + 1
    } else {
        1
    }
}
