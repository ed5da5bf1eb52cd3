use super::{View, ViewSource};
use crate::database::Database;
use crate::database::analytics::{ActivityDay, CategoryPerformance, CourseProgressRow, FeedbackStatusSlice};
use crate::error::StoreError;
use log::warn;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

pub type DashboardView = View<DashboardSource>;

/// Every report shown on the dashboard. A report whose read failed is left empty and its
/// error is listed in `errors`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dashboard {
    pub activity: Vec<ActivityDay>,
    pub feedback_status: Vec<FeedbackStatusSlice>,
    pub assessment_performance: Vec<CategoryPerformance>,
    pub course_progress: Vec<CourseProgressRow>,
    pub errors: Vec<SectionError>,
}

impl Dashboard {
    pub fn error_for(&self, section: Section) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.section == section)
            .map(|e| e.message.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Activity,
    FeedbackStatus,
    AssessmentPerformance,
    CourseProgress,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionError {
    pub section: Section,
    pub message: String,
}

/// Computes all reports. With a seed the activity jitter is reproducible across refreshes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardSource {
    pub seed: Option<u64>,
}

impl ViewSource for DashboardSource {
    type Data = Dashboard;

    /// Each report is computed on its own. The fetch only fails when all four do.
    fn fetch(&self, db: &Database) -> Result<Dashboard, StoreError> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let analytics = db.analytics();
        let mut dashboard = Dashboard::default();
        let mut failures = Vec::new();

        match analytics.activity().compute(&mut rng) {
            Ok(days) => dashboard.activity = days,
            Err(e) => failures.push((Section::Activity, e)),
        }
        match analytics.feedback_status().compute() {
            Ok(slices) => dashboard.feedback_status = slices,
            Err(e) => failures.push((Section::FeedbackStatus, e)),
        }
        match analytics.assessment_performance().compute() {
            Ok(rows) => dashboard.assessment_performance = rows,
            Err(e) => failures.push((Section::AssessmentPerformance, e)),
        }
        match analytics.course_progress().compute() {
            Ok(rows) => dashboard.course_progress = rows,
            Err(e) => failures.push((Section::CourseProgress, e)),
        }

        if failures.len() == 4 {
            let (_, first) = failures.remove(0);
            return Err(first);
        }
        for (section, e) in failures {
            warn!("Dashboard report {:?} unavailable: {}", section, e);
            dashboard.errors.push(SectionError {
                section,
                message: e.to_string(),
            });
        }
        Ok(dashboard)
    }
}
