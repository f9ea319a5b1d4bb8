//! Quiz session engine.
//!
//! Drives a [`QuizSession`] with tokio timers: a once-per-second countdown
//! while a question is open, and a mandatory pause between answering and
//! advancing. State is published as immutable [`QuizSnapshot`] values over
//! a watch channel; after any command returns, a fresh snapshot reflecting
//! its effects is observable.
//!
//! Every answer, advance, and restart bumps an epoch counter. Timer and
//! advance tasks capture the epoch they were armed under and exit silently
//! if it has moved on, so a stale timer can never double-submit or advance
//! a session the user already acted on.

use std::sync::Arc;

use rand::seq::SliceRandom;
use tokio::sync::{watch, Mutex};

use crate::db::Db;
use crate::error::{QuizError, Result};
use crate::models::{Category, Question, QuizResult};
use crate::names::{ADVANCE_DELAY, DEFAULT_QUESTION_COUNT, TIMER_TICK};
use crate::session::{Advance, QuizSession};

/// Immutable view of the engine state for a presentation layer.
#[derive(Debug, Clone)]
pub struct QuizSnapshot {
    pub category: Category,
    pub loading: bool,
    pub error: Option<String>,
    pub question: Option<Question>,
    pub question_count: usize,
    pub current_index: usize,
    pub time_remaining: u32,
    pub answered: bool,
    pub score: u32,
    pub current_streak: u32,
    pub max_streak: u32,
    pub complete: bool,
    /// Category best on record when the session started.
    pub previous_best: i64,
    /// Set on completion when this session beat `previous_best`.
    pub new_best: bool,
}

enum Phase {
    Loading,
    Active(QuizSession),
    Complete { result: QuizResult, new_best: bool },
    Error(String),
}

struct Inner {
    category: Category,
    phase: Phase,
    previous_best: i64,
    epoch: u64,
}

struct EngineCore {
    db: Db,
    inner: Mutex<Inner>,
    tx: watch::Sender<QuizSnapshot>,
}

pub struct QuizEngine {
    core: Arc<EngineCore>,
    rx: watch::Receiver<QuizSnapshot>,
}

impl QuizEngine {
    /// Start a session for `category`: draw up to
    /// [`DEFAULT_QUESTION_COUNT`] questions (the whole pool if smaller),
    /// enter `Active` and arm the first countdown. An empty pool yields the
    /// `Error` state, recoverable only via [`restart`](Self::restart).
    ///
    /// Store failures during the draw propagate as errors; an engine is
    /// only returned once the session reached `Active` or `Error`.
    pub async fn start(db: Db, category: Category) -> Result<QuizEngine> {
        let previous_best = db.get_category_best(category).await?;
        let inner = Inner {
            category,
            phase: Phase::Loading,
            previous_best,
            epoch: 0,
        };
        let (tx, rx) = watch::channel(snapshot_of(&inner));

        let core = Arc::new(EngineCore {
            db,
            inner: Mutex::new(inner),
            tx,
        });
        core.begin_session().await?;

        Ok(QuizEngine { core, rx })
    }

    /// Submit an answer for the current question. Ignored unless the
    /// session is `Active` with the question still open, so a double tap or
    /// a late timer fire is a no-op.
    pub async fn submit_answer(&self, option_index: usize) {
        self.core.apply_answer(Some(option_index)).await;
    }

    /// Discard the session entirely and re-run the draw from scratch.
    pub async fn restart(&self) -> Result<()> {
        {
            let mut inner = self.core.inner.lock().await;
            inner.epoch += 1;
            inner.previous_best = self.core.db.get_category_best(inner.category).await?;
            inner.phase = Phase::Loading;
            self.core.publish(&inner);
        }
        self.core.begin_session().await
    }

    /// Watch channel carrying the latest snapshot.
    pub fn subscribe(&self) -> watch::Receiver<QuizSnapshot> {
        self.rx.clone()
    }

    pub fn snapshot(&self) -> QuizSnapshot {
        self.rx.borrow().clone()
    }
}

impl EngineCore {
    async fn begin_session(self: &Arc<Self>) -> Result<()> {
        let (category, epoch) = {
            let inner = self.inner.lock().await;
            (inner.category, inner.epoch)
        };

        let questions = self.draw_questions(category).await?;

        let mut inner = self.inner.lock().await;
        if inner.epoch != epoch {
            // A restart raced this load; the newer one wins.
            return Ok(());
        }

        if questions.is_empty() {
            tracing::warn!(category = %category, "no questions available");
            inner.phase = Phase::Error(QuizError::EmptyCategory.to_string());
            self.publish(&inner);
            return Ok(());
        }

        tracing::info!(category = %category, count = questions.len(), "quiz session started");
        inner.phase = Phase::Active(QuizSession::new(category, questions));
        self.arm_countdown(&mut inner);
        self.publish(&inner);
        Ok(())
    }

    async fn draw_questions(&self, category: Category) -> Result<Vec<Question>> {
        let mut pool = self.db.get_by_category(category).await?;
        pool.shuffle(&mut rand::thread_rng());
        pool.truncate(DEFAULT_QUESTION_COUNT);
        Ok(pool)
    }

    async fn apply_answer(self: &Arc<Self>, answer: Option<usize>) {
        let mut inner = self.inner.lock().await;
        self.record_answer(&mut inner, answer);
    }

    /// The single mutation path for score and streak. `None` is the
    /// timeout answer. Caller holds the lock; the timeout path relies on
    /// that, since its epoch check and submit must not be separable by a
    /// racing restart.
    fn record_answer(self: &Arc<Self>, inner: &mut Inner, answer: Option<usize>) {
        let Phase::Active(session) = &mut inner.phase else {
            return;
        };
        if session.submit(answer).is_none() {
            return;
        }

        // Disarm the countdown and schedule the post-answer advance.
        inner.epoch += 1;
        let epoch = inner.epoch;
        self.publish(inner);

        let core = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(ADVANCE_DELAY).await;
            core.advance(epoch).await;
        });
    }

    async fn advance(self: &Arc<Self>, epoch: u64) {
        let mut inner = self.inner.lock().await;
        if inner.epoch != epoch {
            return;
        }
        let Phase::Active(session) = &mut inner.phase else {
            return;
        };

        match session.advance() {
            Advance::Next => {
                self.arm_countdown(&mut inner);
                self.publish(&inner);
            }
            Advance::Complete => {
                let result = session.result();
                // Best-score comparison happens store-side in the same
                // transaction; the capture at session start is only for
                // display.
                let new_best = match self
                    .db
                    .record_result(
                        result.category,
                        result.score as i64,
                        result.correct_answers as i64,
                        result.total_questions as i64,
                    )
                    .await
                {
                    Ok(new_best) => new_best,
                    Err(e) => {
                        tracing::error!(error = %e, "failed to persist quiz result");
                        result.score as i64 > inner.previous_best
                    }
                };

                inner.epoch += 1;
                inner.phase = Phase::Complete { result, new_best };
                self.publish(&inner);
            }
        }
    }

    /// Arm a fresh once-per-second countdown for the current question.
    /// Must be called with the question open; bumps the epoch so any prior
    /// timer dies.
    fn arm_countdown(self: &Arc<Self>, inner: &mut Inner) {
        inner.epoch += 1;
        let epoch = inner.epoch;

        let core = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(TIMER_TICK).await;

                let mut inner = core.inner.lock().await;
                if inner.epoch != epoch {
                    return;
                }
                let Phase::Active(session) = &mut inner.phase else {
                    return;
                };
                if session.is_answered() {
                    return;
                }

                let timed_out = session.tick();
                core.publish(&inner);

                if timed_out {
                    // Submit under the same lock hold as the epoch check
                    // above, so a restart can never slip in between and
                    // have its fresh first question auto-failed.
                    core.record_answer(&mut inner, None);
                    return;
                }
                drop(inner);
            }
        });
    }

    fn publish(&self, inner: &Inner) {
        self.tx.send_replace(snapshot_of(inner));
    }
}

fn snapshot_of(inner: &Inner) -> QuizSnapshot {
    let mut snapshot = QuizSnapshot {
        category: inner.category,
        loading: false,
        error: None,
        question: None,
        question_count: 0,
        current_index: 0,
        time_remaining: 0,
        answered: false,
        score: 0,
        current_streak: 0,
        max_streak: 0,
        complete: false,
        previous_best: inner.previous_best,
        new_best: false,
    };

    match &inner.phase {
        Phase::Loading => snapshot.loading = true,
        Phase::Error(message) => snapshot.error = Some(message.clone()),
        Phase::Active(session) => {
            snapshot.question = Some(session.current_question().clone());
            snapshot.question_count = session.question_count();
            snapshot.current_index = session.current_index();
            snapshot.time_remaining = session.time_remaining();
            snapshot.answered = session.is_answered();
            snapshot.score = session.score();
            snapshot.current_streak = session.current_streak();
            snapshot.max_streak = session.max_streak();
        }
        Phase::Complete { result, new_best } => {
            snapshot.question_count = result.total_questions;
            snapshot.current_index = result.total_questions;
            snapshot.score = result.score;
            snapshot.max_streak = result.max_streak;
            snapshot.complete = true;
            snapshot.new_best = *new_best;
        }
    }

    snapshot
}
