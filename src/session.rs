//! Pure quiz-session state machine.
//!
//! Holds the drawn questions, the per-question countdown value, score and
//! streak bookkeeping, and the answered-question records. All transitions
//! are synchronous; the engine layers timers and persistence on top.

use crate::models::{AnsweredQuestion, Category, Question, QuizResult};
use crate::names::POINTS_PER_CORRECT;

/// Result of advancing past an answered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next,
    Complete,
}

#[derive(Debug)]
pub struct QuizSession {
    category: Category,
    questions: Vec<Question>,
    current_index: usize,
    time_remaining: u32,
    answered: bool,
    score: u32,
    current_streak: u32,
    max_streak: u32,
    answered_questions: Vec<AnsweredQuestion>,
    complete: bool,
}

impl QuizSession {
    /// Create a session over an already-drawn, non-empty question list.
    pub fn new(category: Category, questions: Vec<Question>) -> Self {
        debug_assert!(!questions.is_empty());
        let time_remaining = questions[0].time_limit();
        Self {
            category,
            questions,
            current_index: 0,
            time_remaining,
            answered: false,
            score: 0,
            current_streak: 0,
            max_streak: 0,
            answered_questions: Vec::new(),
            complete: false,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn is_answered(&self) -> bool {
        self.answered
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    pub fn max_streak(&self) -> u32 {
        self.max_streak
    }

    pub fn answered_questions(&self) -> &[AnsweredQuestion] {
        &self.answered_questions
    }

    pub fn correct_answers(&self) -> usize {
        self.answered_questions.iter().filter(|a| a.is_correct).count()
    }

    /// Decrement the countdown by one second. Returns `true` exactly when
    /// the countdown reaches zero on an unanswered question, i.e. when the
    /// caller must submit the timeout answer.
    pub fn tick(&mut self) -> bool {
        if self.answered || self.complete || self.time_remaining == 0 {
            return false;
        }
        self.time_remaining -= 1;
        self.time_remaining == 0
    }

    /// Record an answer for the current question. `None` means the countdown
    /// expired with no answer and is always incorrect.
    ///
    /// Returns `Some(is_correct)` when the answer was recorded, `None` when
    /// the question was already answered (late timer fire racing a tap);
    /// in that case nothing changes.
    pub fn submit(&mut self, answer: Option<usize>) -> Option<bool> {
        if self.answered || self.complete {
            return None;
        }

        let question = self.questions[self.current_index].clone();
        let is_correct = answer == Some(question.correct_index);
        let time_spent = question.time_limit() - self.time_remaining;

        if is_correct {
            self.score += POINTS_PER_CORRECT;
            self.current_streak += 1;
            self.max_streak = self.max_streak.max(self.current_streak);
        } else {
            self.current_streak = 0;
        }

        self.answered_questions.push(AnsweredQuestion {
            question,
            user_answer: answer,
            is_correct,
            time_spent,
        });
        self.answered = true;

        Some(is_correct)
    }

    /// Move past the current (answered) question: either on to the next one
    /// with a fresh countdown, or into the terminal `Complete` state.
    pub fn advance(&mut self) -> Advance {
        debug_assert!(self.answered && !self.complete);
        if self.current_index + 1 == self.questions.len() {
            self.complete = true;
            Advance::Complete
        } else {
            self.current_index += 1;
            self.answered = false;
            self.time_remaining = self.questions[self.current_index].time_limit();
            Advance::Next
        }
    }

    pub fn result(&self) -> QuizResult {
        QuizResult {
            category: self.category,
            total_questions: self.questions.len(),
            correct_answers: self.correct_answers(),
            score: self.score,
            max_streak: self.max_streak,
            answered_questions: self.answered_questions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnswerOption, Difficulty};

    fn question(id: &str, difficulty: Difficulty, correct_index: usize) -> Question {
        Question {
            id: id.to_string(),
            category: Category::Science,
            text: format!("question {id}"),
            options: vec![
                AnswerOption { id: "a".into(), text: "A".into() },
                AnswerOption { id: "b".into(), text: "B".into() },
                AnswerOption { id: "c".into(), text: "C".into() },
            ],
            correct_index,
            difficulty,
            explanation: None,
            tags: Vec::new(),
        }
    }

    fn three_question_session() -> QuizSession {
        QuizSession::new(
            Category::Science,
            vec![
                question("q1", Difficulty::Easy, 0),
                question("q2", Difficulty::Medium, 1),
                question("q3", Difficulty::Hard, 2),
            ],
        )
    }

    #[test]
    fn all_correct_run_scores_ten_per_answer() {
        let mut session = three_question_session();

        assert_eq!(session.time_remaining(), 30);
        assert_eq!(session.submit(Some(0)), Some(true));
        assert_eq!(session.advance(), Advance::Next);
        assert_eq!(session.time_remaining(), 45);
        assert_eq!(session.submit(Some(1)), Some(true));
        assert_eq!(session.advance(), Advance::Next);
        assert_eq!(session.time_remaining(), 60);
        assert_eq!(session.submit(Some(2)), Some(true));
        assert_eq!(session.advance(), Advance::Complete);

        assert!(session.is_complete());
        assert_eq!(session.score(), 30);
        assert_eq!(session.correct_answers(), 3);
        assert_eq!(session.max_streak(), 3);

        let result = session.result();
        assert_eq!(result.score, 30);
        assert_eq!(result.total_questions, 3);
        assert_eq!(result.percentage(), 100.0);
    }

    #[test]
    fn incorrect_answer_resets_streak_but_keeps_max() {
        let mut session = three_question_session();

        session.submit(Some(0));
        session.advance();
        session.submit(Some(1));
        session.advance();
        assert_eq!(session.current_streak(), 2);

        session.submit(Some(0)); // wrong, correct is 2
        assert_eq!(session.current_streak(), 0);
        assert_eq!(session.max_streak(), 2);
        assert_eq!(session.score(), 20);
    }

    #[test]
    fn timeout_scores_like_a_wrong_answer() {
        let mut session = three_question_session();

        session.submit(Some(0));
        session.advance();

        assert_eq!(session.submit(None), Some(false));
        assert_eq!(session.score(), 10);
        assert_eq!(session.current_streak(), 0);

        let answered = session.answered_questions().last().unwrap();
        assert!(!answered.is_correct);
        assert_eq!(answered.user_answer, None);
    }

    #[test]
    fn double_submit_is_a_no_op() {
        let mut session = three_question_session();

        assert_eq!(session.submit(Some(0)), Some(true));
        let score = session.score();
        let streak = session.current_streak();
        let answered = session.answered_questions().len();

        // Late timer fire after the user already tapped.
        assert_eq!(session.submit(None), None);
        assert_eq!(session.submit(Some(1)), None);

        assert_eq!(session.score(), score);
        assert_eq!(session.current_streak(), streak);
        assert_eq!(session.answered_questions().len(), answered);
    }

    #[test]
    fn tick_counts_down_and_signals_timeout_once() {
        let mut session = QuizSession::new(
            Category::Science,
            vec![question("q1", Difficulty::Easy, 0)],
        );

        for elapsed in 1..30 {
            assert!(!session.tick());
            assert_eq!(session.time_remaining(), 30 - elapsed);
        }
        assert!(session.tick());
        assert_eq!(session.time_remaining(), 0);

        // Countdown already at zero: no further timeout signals.
        assert!(!session.tick());
    }

    #[test]
    fn tick_stops_once_answered() {
        let mut session = three_question_session();
        session.submit(Some(0));

        let remaining = session.time_remaining();
        assert!(!session.tick());
        assert_eq!(session.time_remaining(), remaining);
    }

    #[test]
    fn time_spent_is_limit_minus_remaining() {
        let mut session = three_question_session();
        for _ in 0..12 {
            session.tick();
        }
        session.submit(Some(0));

        let answered = session.answered_questions().last().unwrap();
        assert_eq!(answered.time_spent, 12);
    }

    #[test]
    fn max_streak_is_non_decreasing() {
        let mut session = three_question_session();
        let mut last_max = 0;

        for answer in [Some(0), Some(0), Some(2)] {
            session.submit(answer);
            assert!(session.max_streak() >= last_max);
            assert!(session.max_streak() >= session.current_streak());
            last_max = session.max_streak();
            session.advance();
            if session.is_complete() {
                break;
            }
        }
    }
}
