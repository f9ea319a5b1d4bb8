//! Read-side derivations over the score ledger: achievement tiers, badge
//! unlock states, and the per-category leaderboard. Everything here is
//! recomputed fresh from current ledger values on each view; unlock state
//! is never stored.

use crate::db::{CategoryScore, Db, GlobalStats};
use crate::error::Result;
use crate::models::Category;

/// Five fixed achievement tiers by percentage correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementLevel {
    Outstanding,
    Excellent,
    Great,
    Good,
    KeepPracticing,
}

impl AchievementLevel {
    pub fn from_percentage(percentage: f32) -> AchievementLevel {
        match percentage {
            p if p >= 90.0 => AchievementLevel::Outstanding,
            p if p >= 75.0 => AchievementLevel::Excellent,
            p if p >= 60.0 => AchievementLevel::Great,
            p if p >= 50.0 => AchievementLevel::Good,
            _ => AchievementLevel::KeepPracticing,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AchievementLevel::Outstanding => "Outstanding!",
            AchievementLevel::Excellent => "Excellent!",
            AchievementLevel::Great => "Great Job!",
            AchievementLevel::Good => "Good Effort!",
            AchievementLevel::KeepPracticing => "Keep Practicing!",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            AchievementLevel::Outstanding => "🌟",
            AchievementLevel::Excellent => "🎉",
            AchievementLevel::Great => "👏",
            AchievementLevel::Good => "💪",
            AchievementLevel::KeepPracticing => "📚",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Badge {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub unlocked: bool,
}

pub fn percentage(correct: i64, total: i64) -> f32 {
    if total == 0 {
        return 0.0;
    }
    correct as f32 / total as f32 * 100.0
}

/// Best-performing category: max accuracy among categories with at least
/// one attempt.
pub fn best_category(categories: &[CategoryScore]) -> Option<Category> {
    categories
        .iter()
        .filter(|c| c.attempts > 0)
        .max_by(|a, b| a.accuracy().total_cmp(&b.accuracy()))
        .map(|c| c.category)
}

/// Evaluate the fixed badge list against current ledger values.
pub fn badges(totals: &GlobalStats, categories: &[CategoryScore]) -> Vec<Badge> {
    let has_master_category = categories
        .iter()
        .any(|c| c.accuracy() >= 90.0 && c.attempts >= 5);
    let all_categories_attempted = categories.iter().all(|c| c.attempts > 0);

    let badge = |id, title, description, icon, unlocked| Badge {
        id,
        title,
        description,
        icon,
        unlocked,
    };

    vec![
        badge(
            "first_quiz",
            "First Steps",
            "Complete your first quiz",
            "🎯",
            totals.total_quizzes >= 1,
        ),
        badge(
            "quiz_10",
            "Dedicated Learner",
            "Complete 10 quizzes",
            "📚",
            totals.total_quizzes >= 10,
        ),
        badge(
            "quiz_50",
            "Quiz Master",
            "Complete 50 quizzes",
            "🎓",
            totals.total_quizzes >= 50,
        ),
        badge(
            "quiz_100",
            "Century Club",
            "Complete 100 quizzes",
            "💯",
            totals.total_quizzes >= 100,
        ),
        badge(
            "score_100",
            "Century Scorer",
            "Score 100+ points",
            "⭐",
            totals.total_score >= 100,
        ),
        badge(
            "score_500",
            "Rising Star",
            "Score 500+ points",
            "🌟",
            totals.total_score >= 500,
        ),
        badge(
            "score_1000",
            "Point Millionaire",
            "Score 1000+ points",
            "💎",
            totals.total_score >= 1000,
        ),
        badge(
            "streak_3",
            "On Fire",
            "Maintain a 3-day streak",
            "🔥",
            totals.best_streak >= 3,
        ),
        badge(
            "streak_7",
            "Week Warrior",
            "Maintain a 7-day streak",
            "⚡",
            totals.best_streak >= 7,
        ),
        badge(
            "streak_30",
            "Unstoppable",
            "Maintain a 30-day streak",
            "👑",
            totals.best_streak >= 30,
        ),
        badge(
            "category_master",
            "Category Master",
            "90%+ accuracy in any category",
            "🏆",
            has_master_category,
        ),
        badge(
            "all_categories",
            "Well Rounded",
            "Complete quizzes in all categories",
            "🌈",
            all_categories_attempted,
        ),
    ]
}

/// Everything the stats screen needs, derived in one read pass.
#[derive(Debug, Clone)]
pub struct StatsOverview {
    pub totals: GlobalStats,
    pub categories: Vec<CategoryScore>,
    pub badges: Vec<Badge>,
    pub best_category: Option<Category>,
}

impl StatsOverview {
    pub fn average_score(&self) -> f32 {
        if self.totals.total_quizzes == 0 {
            return 0.0;
        }
        self.totals.total_score as f32 / self.totals.total_quizzes as f32
    }

    pub fn unlocked_badges(&self) -> impl Iterator<Item = &Badge> {
        self.badges.iter().filter(|b| b.unlocked)
    }
}

pub async fn overview(db: &Db) -> Result<StatsOverview> {
    let totals = db.global_stats().await?;
    let categories = db.get_all_category_stats().await?;
    let badges = badges(&totals, &categories);
    let best_category = best_category(&categories);

    Ok(StatsOverview {
        totals,
        categories,
        badges,
        best_category,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(total_score: i64, total_quizzes: i64, best_streak: i64) -> GlobalStats {
        GlobalStats {
            total_score,
            total_quizzes,
            current_streak: 0,
            best_streak,
            last_quiz_at: None,
        }
    }

    fn score(category: Category, attempts: i64, correct: i64, total: i64) -> CategoryScore {
        CategoryScore {
            category,
            total_score: correct * 10,
            best_score: 0,
            attempts,
            correct_answers: correct,
            total_questions: total,
        }
    }

    #[test]
    fn achievement_tier_thresholds() {
        assert_eq!(AchievementLevel::from_percentage(100.0), AchievementLevel::Outstanding);
        assert_eq!(AchievementLevel::from_percentage(90.0), AchievementLevel::Outstanding);
        assert_eq!(AchievementLevel::from_percentage(89.9), AchievementLevel::Excellent);
        assert_eq!(AchievementLevel::from_percentage(75.0), AchievementLevel::Excellent);
        assert_eq!(AchievementLevel::from_percentage(60.0), AchievementLevel::Great);
        assert_eq!(AchievementLevel::from_percentage(50.0), AchievementLevel::Good);
        assert_eq!(AchievementLevel::from_percentage(49.9), AchievementLevel::KeepPracticing);
        assert_eq!(AchievementLevel::from_percentage(0.0), AchievementLevel::KeepPracticing);
    }

    #[test]
    fn percentage_is_zero_for_empty_total() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(4, 10), 40.0);
    }

    #[test]
    fn fresh_ledger_unlocks_nothing() {
        let categories: Vec<CategoryScore> =
            Category::ALL.into_iter().map(CategoryScore::zero).collect();
        let badges = badges(&totals(0, 0, 0), &categories);

        assert_eq!(badges.len(), 12);
        // "all_categories" would trivially hold over an empty list; the
        // zero-valued entries keep it locked.
        assert!(badges.iter().all(|b| !b.unlocked));
    }

    #[test]
    fn first_quiz_and_score_badges_unlock() {
        let mut categories: Vec<CategoryScore> =
            Category::ALL.into_iter().map(CategoryScore::zero).collect();
        categories[0] = score(Category::Science, 1, 10, 10);

        let badges = badges(&totals(100, 1, 0), &categories);
        let unlocked: Vec<&str> =
            badges.iter().filter(|b| b.unlocked).map(|b| b.id).collect();

        assert_eq!(unlocked, vec!["first_quiz", "score_100"]);
    }

    #[test]
    fn category_master_needs_five_attempts() {
        let mut categories: Vec<CategoryScore> =
            Category::ALL.into_iter().map(CategoryScore::zero).collect();

        categories[0] = score(Category::Science, 4, 36, 40); // 90% but 4 attempts
        let badges4 = badges(&totals(0, 4, 0), &categories);
        assert!(!badges4.iter().find(|b| b.id == "category_master").unwrap().unlocked);

        categories[0] = score(Category::Science, 5, 45, 50);
        let badges5 = badges(&totals(0, 5, 0), &categories);
        assert!(badges5.iter().find(|b| b.id == "category_master").unwrap().unlocked);
    }

    #[test]
    fn streak_badges_follow_best_streak() {
        let categories: Vec<CategoryScore> =
            Category::ALL.into_iter().map(CategoryScore::zero).collect();
        let badges = badges(&totals(0, 0, 7), &categories);

        assert!(badges.iter().find(|b| b.id == "streak_3").unwrap().unlocked);
        assert!(badges.iter().find(|b| b.id == "streak_7").unwrap().unlocked);
        assert!(!badges.iter().find(|b| b.id == "streak_30").unwrap().unlocked);
    }

    #[test]
    fn best_category_ignores_unattempted() {
        let mut categories: Vec<CategoryScore> =
            Category::ALL.into_iter().map(CategoryScore::zero).collect();
        assert_eq!(best_category(&categories), None);

        // Zero-attempt categories have 0% accuracy but never win.
        categories[1] = score(Category::History, 1, 3, 10);
        categories[2] = score(Category::Geography, 1, 8, 10);
        assert_eq!(best_category(&categories), Some(Category::Geography));
    }
}
