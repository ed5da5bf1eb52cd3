use crate::database::Database;
use crate::error::StoreError;
use crate::models::{Course, CourseProgress, ModuleProgress, User};
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashMap;

/// Courses kept in the report
pub const TOP_COURSES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseProgressRow {
    pub course_id: String,
    pub title: String,
    pub learners: usize,
    /// Mean completion across learners, whole percent
    pub average_completion: i64,
}

pub struct CourseProgressReport<'a> {
    db: &'a Database,
}

impl<'a> CourseProgressReport<'a> {
    pub fn new(db: &'a Database) -> Self {
        CourseProgressReport { db }
    }

    /// Completion ratios per course id, one entry per user that has a progress record.
    /// Records that fail to load are skipped.
    pub fn collect_ratios(&self, courses: &[Course], users: &[User]) -> HashMap<String, Vec<f64>> {
        let progress = self.db.progress();
        let mut ratios: HashMap<String, Vec<f64>> = HashMap::new();

        for user in users {
            for course in courses {
                let record = match progress.course_progress(&user.id, &course.id) {
                    Ok(Some(record)) => record,
                    Ok(None) => continue,
                    Err(e) => {
                        warn!("Skipping progress of user {} in course {}: {}", user.id, course.id, e);
                        continue;
                    }
                };
                let modules = match progress.module_progress(&user.id, &course.id) {
                    Ok(modules) => modules,
                    Err(e) => {
                        warn!("Skipping module progress of user {} in course {}: {}", user.id, course.id, e);
                        continue;
                    }
                };
                ratios
                    .entry(course.id.clone())
                    .or_default()
                    .push(completion_ratio(&record, &modules));
            }
        }

        ratios
    }

    pub fn compute(&self) -> Result<Vec<CourseProgressRow>, StoreError> {
        let courses = self.db.courses().get_all_lenient()?;
        let users = self.db.users().get_all_lenient()?;
        let ratios = self.collect_ratios(&courses, &users);
        debug!(
            "Collected progress for {} of {} courses",
            ratios.len(),
            courses.len()
        );
        Ok(summarize(&courses, &users, &ratios))
    }
}

/// Completed share of the per-module records when there are any, else the flat field
pub fn completion_ratio(record: &CourseProgress, modules: &[ModuleProgress]) -> f64 {
    if modules.is_empty() {
        return record.flat_ratio();
    }
    let completed = modules.iter().filter(|m| m.completed).count();
    completed as f64 / modules.len() as f64
}

/// One row per course with learners, most learners first.
///
/// A course nobody has a progress record for falls back to the legacy `courseTaken` title
/// list; those learners count at 0% completion.
pub fn summarize(courses: &[Course], users: &[User], ratios: &HashMap<String, Vec<f64>>) -> Vec<CourseProgressRow> {
    let mut rows: Vec<CourseProgressRow> = courses
        .iter()
        .map(|course| match ratios.get(&course.id).filter(|r| !r.is_empty()) {
            Some(samples) => {
                let mean = samples.iter().sum::<f64>() / samples.len() as f64;
                CourseProgressRow {
                    course_id: course.id.clone(),
                    title: course.title.clone(),
                    learners: samples.len(),
                    average_completion: (mean * 100.0).round() as i64,
                }
            }
            None => CourseProgressRow {
                course_id: course.id.clone(),
                title: course.title.clone(),
                learners: users.iter().filter(|u| u.has_taken(&course.title)).count(),
                average_completion: 0,
            },
        })
        .filter(|row| row.learners > 0)
        .collect();

    rows.sort_by(|a, b| b.learners.cmp(&a.learners));
    rows.truncate(TOP_COURSES);
    rows
}
