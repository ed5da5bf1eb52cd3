use super::percentage;
use crate::database::Database;
use crate::error::StoreError;
use crate::models::{TechnicalAssessment, User};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Categories kept in the report
pub const TOP_CATEGORIES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPerformance {
    pub category: String,
    pub submissions: usize,
    pub passed: usize,
    pub failed: usize,
    /// Whole percent of submissions that passed
    pub pass_rate: i64,
}

pub struct AssessmentPerformanceReport<'a> {
    db: &'a Database,
}

impl<'a> AssessmentPerformanceReport<'a> {
    pub fn new(db: &'a Database) -> Self {
        AssessmentPerformanceReport { db }
    }

    pub fn compute(&self) -> Result<Vec<CategoryPerformance>, StoreError> {
        let assessments = self.db.assessments().get_all_lenient()?;
        let users = self.db.users().get_all_lenient()?;
        Ok(summarize(&assessments, &users))
    }
}

/// Attributes every user's score entry to the category of the assessment it belongs to.
/// Scores for unknown assessments are ignored. Categories nobody submitted to are dropped;
/// the rest are ordered by submissions, busiest first.
pub fn summarize(assessments: &[TechnicalAssessment], users: &[User]) -> Vec<CategoryPerformance> {
    let category_of: HashMap<&str, &str> = assessments
        .iter()
        .map(|a| (a.id.as_str(), a.report_category()))
        .collect();

    // (passed, failed)
    let mut tallies: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for category in category_of.values() {
        tallies.entry(*category).or_default();
    }

    for user in users {
        for (assessment_id, score) in &user.assessment_scores {
            let Some(category) = category_of.get(assessment_id.as_str()) else {
                continue;
            };
            let tally = tallies.entry(*category).or_default();
            if score.is_passed() {
                tally.0 += 1;
            } else {
                tally.1 += 1;
            }
        }
    }

    let mut rows: Vec<CategoryPerformance> = tallies
        .into_iter()
        .filter(|(_, (passed, failed))| passed + failed > 0)
        .map(|(category, (passed, failed))| CategoryPerformance {
            category: category.to_string(),
            submissions: passed + failed,
            passed,
            failed,
            pass_rate: percentage(passed, passed + failed),
        })
        .collect();

    rows.sort_by(|a, b| b.submissions.cmp(&a.submissions));
    rows.truncate(TOP_CATEGORIES);
    rows
}
