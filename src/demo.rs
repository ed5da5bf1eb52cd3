use crate::database::Database;
use crate::error::{StoreError, ValidationError};
use crate::models::{
    Achievement, AchievementCriteria, AssessmentScore, AssessmentType, Course, CourseModule, CourseStatus,
    CriteriaType, DailyChallenge, DailyProblem, Difficulty, Feedback, FeedbackStatus, Lesson, ProblemType,
    Question, Quiz, TechnicalAssessment, TestCase, User, UserRole,
};
use chrono::Duration;
use log::info;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid demo content: {0}")]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemoSummary {
    pub courses: usize,
    pub modules: usize,
    pub lessons: usize,
    pub quizzes: usize,
    pub assessments: usize,
    pub users: usize,
    pub feedback: usize,
    /// Set when the store already held courses and nothing was written
    pub skipped: bool,
}

const COURSES: [(&str, &str, CourseStatus, &[&str]); 3] = [
    ("Intro to Rust", "Programming", CourseStatus::Published, &["Ownership", "Traits", "Error handling"]),
    ("SQL Fundamentals", "Databases", CourseStatus::Published, &["Selecting rows", "Joins"]),
    ("Web APIs", "Web", CourseStatus::Draft, &["HTTP basics"]),
];

/// Fills an empty store with a small, consistent data set for local runs
pub fn seed_demo(db: &Database) -> Result<DemoSummary, SeedError> {
    if db.courses().count()? > 0 {
        info!("Store already has courses, skipping demo seed");
        return Ok(DemoSummary {
            skipped: true,
            ..Default::default()
        });
    }

    let mut summary = DemoSummary::default();
    let mut course_ids = Vec::new();
    let mut first_modules = Vec::new();

    for (title, category, status, modules) in COURSES {
        let course_id = db.courses().create(&Course {
            title: title.to_string(),
            description: format!("A hands-on introduction to {}", title.to_lowercase()),
            status,
            duration: format!("{} weeks", modules.len() * 2),
            category: category.to_string(),
            ..Default::default()
        })?;
        summary.courses += 1;

        let mut module_ids = Vec::new();
        for (order, module_title) in modules.iter().enumerate() {
            let module_id = db.modules(&course_id).create(&CourseModule {
                title: module_title.to_string(),
                order: order as i64 + 1,
                lessons: 2,
                ..Default::default()
            })?;
            summary.modules += 1;

            for lesson in 1..=2 {
                db.lessons(&course_id, &module_id).create(&Lesson {
                    module_id: module_id.clone(),
                    course_id: course_id.clone(),
                    title: format!("{} part {}", module_title, lesson),
                    content: format!("Notes for {} part {}", module_title, lesson),
                    order: lesson,
                    duration: 15,
                    ..Default::default()
                })?;
                summary.lessons += 1;
            }
            module_ids.push(module_id);
        }

        if let Some(first) = module_ids.first() {
            first_modules.push((course_id.clone(), first.clone()));
        }
        course_ids.push((course_id, title, module_ids));
    }

    for (course_id, module_id) in &first_modules {
        let quiz = Quiz {
            module_id: module_id.clone(),
            course_id: course_id.clone(),
            title: "Checkpoint".to_string(),
            description: "Quick check of the first module".to_string(),
            difficulty: Difficulty::Easy,
            questions: vec![Question {
                question: "Which keyword declares an immutable binding?".to_string(),
                options: vec!["let".to_string(), "mut".to_string(), "static".to_string()],
                correct_option_index: 0,
                explanation: None,
            }],
            time_limit: 10,
            passing_score: 70,
            ..Default::default()
        };
        quiz.validate()?;
        db.quizzes().create(&quiz)?;
        summary.quizzes += 1;
    }

    let rust_course = course_ids.first().map(|(id, _, _)| id.clone()).unwrap_or_default();
    let sql_course = course_ids.get(1).map(|(id, _, _)| id.clone()).unwrap_or_default();
    let assessments = [
        TechnicalAssessment {
            course_id: rust_course,
            title: "Fix the borrow".to_string(),
            category: "Rust".to_string(),
            assessment_type: AssessmentType::CodeFix,
            difficulty: Difficulty::Medium,
            language: "rust".to_string(),
            broken_code: "let s = String::new(); let t = s; println!(\"{}\", s);".to_string(),
            correct_code: "let s = String::new(); let t = s.clone(); println!(\"{}\", s);".to_string(),
            points: 20,
            ..Default::default()
        },
        TechnicalAssessment {
            course_id: sql_course,
            title: "Top customers".to_string(),
            assessment_type: AssessmentType::SqlQuery,
            difficulty: Difficulty::Hard,
            sample_table: "customers(id, name, total)".to_string(),
            expected_query: "SELECT name FROM customers ORDER BY total DESC LIMIT 3".to_string(),
            points: 30,
            ..Default::default()
        },
    ];
    let mut assessment_ids = Vec::new();
    for assessment in &assessments {
        assessment.validate()?;
        assessment_ids.push(db.assessments().create(assessment)?);
        summary.assessments += 1;
    }

    db.users().create(&User {
        username: "admin".to_string(),
        email: "admin@example.com".to_string(),
        role: UserRole::Admin,
        ..Default::default()
    })?;
    summary.users += 1;

    let students = [("ada", 92.0, 55.0), ("grace", 71.0, 80.0), ("linus", 40.0, 65.0)];
    let mut student_ids = Vec::new();
    for (name, rust_score, sql_score) in students {
        let scores: BTreeMap<String, AssessmentScore> = assessment_ids
            .iter()
            .zip([rust_score, sql_score])
            .map(|(id, score)| {
                (
                    id.clone(),
                    AssessmentScore {
                        score,
                        passed: None,
                        attempts: 1,
                    },
                )
            })
            .collect();
        let id = db.users().create(&User {
            username: name.to_string(),
            email: format!("{}@example.com", name),
            assessment_scores: scores,
            course_taken: vec!["Web APIs".to_string()],
            ..Default::default()
        })?;
        summary.users += 1;
        student_ids.push(id);
    }

    let progress = db.progress();
    for (n, user_id) in student_ids.iter().enumerate() {
        for _ in 0..=n {
            progress.record_login(user_id, "web")?;
        }
        if let Some((course_id, _, module_ids)) = course_ids.first() {
            progress.set_course_progress(user_id, course_id, 0.0)?;
            for (m, module_id) in module_ids.iter().enumerate() {
                progress.set_module_progress(user_id, course_id, module_id, m <= n)?;
            }
        }
    }
    if let (Some(user_id), Some((course_id, _, _))) = (student_ids.first(), course_ids.get(1)) {
        progress.set_course_progress(user_id, course_id, 50.0)?;
    }

    let statuses = [
        FeedbackStatus::New,
        FeedbackStatus::New,
        FeedbackStatus::Reviewed,
        FeedbackStatus::Resolved,
        FeedbackStatus::Resolved,
    ];
    let now = db.date_provider().get_current_time();
    for (n, status) in statuses.into_iter().enumerate() {
        let author = student_ids.get(n % student_ids.len().max(1)).cloned().unwrap_or_default();
        let id = db.feedback().create(&Feedback {
            user_id: author,
            message: format!("Demo feedback #{}", n + 1),
            category: "content".to_string(),
            timestamp: Some(now - Duration::hours(n as i64)),
            ..Default::default()
        })?;
        if status != FeedbackStatus::New {
            db.feedback().update_status(&id, status)?;
        }
        summary.feedback += 1;
    }

    for (title, criteria, points) in [
        (
            "First steps",
            AchievementCriteria {
                criteria_type: CriteriaType::CoursesCompleted,
                count: Some(1),
                ..Default::default()
            },
            10,
        ),
        (
            "On a roll",
            AchievementCriteria {
                criteria_type: CriteriaType::LoginStreak,
                streak_days: Some(7),
                ..Default::default()
            },
            25,
        ),
    ] {
        let achievement = Achievement {
            title: title.to_string(),
            criteria,
            points,
            ..Default::default()
        };
        achievement.validate()?;
        db.achievements().create(&achievement)?;
    }

    let today = now.date_naive();
    for offset in 0..3 {
        let problem_id = db.daily_problems().create(&DailyProblem {
            title: format!("Daily puzzle {}", offset + 1),
            difficulty: Difficulty::Medium,
            problem_type: ProblemType::Coding,
            date: (today - Duration::days(offset)).format("%Y-%m-%d").to_string(),
            test_cases: vec![TestCase {
                input: "3".to_string(),
                expected_output: "6".to_string(),
                hidden: false,
            }],
            points: 10,
            ..Default::default()
        })?;
        if let Some(user_id) = student_ids.first() {
            progress.record_daily_problem(user_id, &problem_id)?;
        }
    }

    db.daily_challenges().create(&DailyChallenge {
        title: "Weekend sprint".to_string(),
        difficulty: Difficulty::Hard,
        expired_at: Some(now + Duration::days(2)),
        points: 50,
        ..Default::default()
    })?;

    info!(
        "Seeded {} courses, {} modules, {} lessons, {} users",
        summary.courses, summary.modules, summary.lessons, summary.users
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_demo_populates_reports() {
        let db = Database::in_memory();
        let summary = seed_demo(&db).unwrap();
        assert_eq!(summary.courses, 3);
        assert_eq!(summary.modules, 6);
        assert_eq!(summary.lessons, 12);

        let courses = db.courses().get_all().unwrap();
        let rust = courses.iter().find(|c| c.title == "Intro to Rust").unwrap();
        assert_eq!(rust.module_count, 3);

        let analytics = db.analytics();
        assert_eq!(analytics.assessment_performance().compute().unwrap().len(), 2);
        let progress = analytics.course_progress().compute().unwrap();
        let row = |title: &str| progress.iter().find(|r| r.title == title).unwrap().clone();
        // ada 1/3, grace 2/3, linus 3/3
        assert_eq!(row("Intro to Rust").learners, 3);
        assert_eq!(row("Intro to Rust").average_completion, 67);
        assert_eq!(row("SQL Fundamentals").learners, 1);
        assert_eq!(row("Web APIs").average_completion, 0);
        assert_eq!(progress.last().unwrap().title, "SQL Fundamentals");
    }

    #[test]
    fn test_seed_demo_runs_once() {
        let db = Database::in_memory();
        seed_demo(&db).unwrap();
        assert!(seed_demo(&db).unwrap().skipped);
        assert_eq!(db.courses().count().unwrap(), 3);
    }
}
