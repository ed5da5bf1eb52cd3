pub mod activity;
pub mod assessment_performance;
pub mod course_progress;
pub mod feedback_status;

use super::Database;

pub use activity::{ActivityDay, ActivityReport};
pub use assessment_performance::{AssessmentPerformanceReport, CategoryPerformance};
pub use course_progress::{CourseProgressReport, CourseProgressRow};
pub use feedback_status::{FeedbackStatusReport, FeedbackStatusSlice};

/// Analytics facade providing the dashboard reports
pub struct Analytics<'a> {
    pub db: &'a Database,
}

impl<'a> Analytics<'a> {
    pub fn new(db: &'a Database) -> Self {
        Analytics { db }
    }

    pub fn activity(&self) -> ActivityReport<'a> {
        ActivityReport::new(self.db)
    }

    pub fn feedback_status(&self) -> FeedbackStatusReport<'a> {
        FeedbackStatusReport::new(self.db)
    }

    pub fn assessment_performance(&self) -> AssessmentPerformanceReport<'a> {
        AssessmentPerformanceReport::new(self.db)
    }

    pub fn course_progress(&self) -> CourseProgressReport<'a> {
        CourseProgressReport::new(self.db)
    }
}

/// `part` as a whole percentage of `total`; 0 when `total` is 0
pub fn percentage(part: usize, total: usize) -> i64 {
    if total == 0 {
        return 0;
    }
    (part as f64 * 100.0 / total as f64).round() as i64
}
