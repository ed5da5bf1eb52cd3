use super::{string_enum, timestamp};
use crate::database::Entity;
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

string_enum! {
    pub enum CriteriaType {
        CoursesCompleted => "courses_completed",
        CourseCompletion => "course_completion",
        LoginStreak => "login_streak",
        AssessmentScore => "assessment_score",
        DailyProblems => "daily_problems",
    }
    default = CoursesCompleted
}

/// Unlock rule of an achievement; which optional field matters depends on `criteria_type`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AchievementCriteria {
    #[serde(rename = "type")]
    pub criteria_type: CriteriaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streak_days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
}

impl AchievementCriteria {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.criteria_type {
            CriteriaType::CoursesCompleted | CriteriaType::DailyProblems => {
                positive("criteria.count", self.count)
            }
            CriteriaType::LoginStreak => positive("criteria.streakDays", self.streak_days),
            CriteriaType::CourseCompletion => match self.course_id.as_deref().map(str::trim) {
                Some(id) if !id.is_empty() => Ok(()),
                _ => Err(ValidationError::Missing {
                    field: "criteria.courseId",
                }),
            },
            CriteriaType::AssessmentScore => match self.score {
                Some(score) if (0..=100).contains(&score) => Ok(()),
                Some(score) => Err(ValidationError::OutOfRange {
                    field: "criteria.score",
                    value: score,
                    min: 0,
                    max: 100,
                }),
                None => Err(ValidationError::Missing {
                    field: "criteria.score",
                }),
            },
        }
    }
}

fn positive(field: &'static str, value: Option<i64>) -> Result<(), ValidationError> {
    match value {
        Some(v) if v > 0 => Ok(()),
        Some(v) => Err(ValidationError::OutOfRange {
            field,
            value: v,
            min: 1,
            max: i64::MAX,
        }),
        None => Err(ValidationError::Missing { field }),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Achievement {
    #[serde(skip_serializing)]
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub criteria: AchievementCriteria,
    pub points: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Achievement {
    const KIND: &'static str = "achievement";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Achievement {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Missing { field: "title" });
        }
        self.criteria.validate()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criteria: Option<AchievementCriteria>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria(criteria_type: CriteriaType) -> AchievementCriteria {
        AchievementCriteria {
            criteria_type,
            ..Default::default()
        }
    }

    #[test]
    fn test_streak_needs_days() {
        let mut c = criteria(CriteriaType::LoginStreak);
        assert_eq!(
            c.validate(),
            Err(ValidationError::Missing {
                field: "criteria.streakDays"
            })
        );
        c.streak_days = Some(7);
        assert_eq!(c.validate(), Ok(()));
    }

    #[test]
    fn test_count_ignored_for_course_completion() {
        let mut c = criteria(CriteriaType::CourseCompletion);
        c.count = Some(3);
        assert!(c.validate().is_err());
        c.course_id = Some("c1".to_string());
        assert_eq!(c.validate(), Ok(()));
    }

    #[test]
    fn test_score_must_be_percentage() {
        let mut c = criteria(CriteriaType::AssessmentScore);
        c.score = Some(120);
        assert!(matches!(
            c.validate(),
            Err(ValidationError::OutOfRange { value: 120, .. })
        ));
    }
}
