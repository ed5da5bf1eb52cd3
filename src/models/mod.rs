//! Document schemas for every collection.
//!
//! All structs deserialize with `#[serde(default)]` so a sparse or legacy document is filled
//! with defaults once, here, instead of at every read site. Closed enumerations fall back to
//! their default variant when a stored value is unknown.

pub mod achievement;
pub mod assessment;
pub mod course;
pub mod daily_problem;
pub mod feedback;
pub mod lesson;
pub mod module;
pub mod progress;
pub mod quiz;
pub mod timestamp;
pub mod user;

pub use achievement::{Achievement, AchievementCriteria, AchievementPatch, CriteriaType};
pub use assessment::{AssessmentPatch, AssessmentType, TechnicalAssessment};
pub use course::{Course, CoursePatch, CourseStatus};
pub use daily_problem::{
    DailyChallenge, DailyChallengePatch, DailyProblem, DailyProblemPatch, ProblemType, TestCase,
};
pub use feedback::{Feedback, FeedbackStatus};
pub use lesson::{Lesson, LessonPatch};
pub use module::{CourseModule, ModulePatch};
pub use progress::{CourseProgress, DailyProblemProgress, LoginRecord, ModuleProgress};
pub use quiz::{Question, Quiz, QuizPatch};
pub use user::{AssessmentScore, User, UserPatch, UserRole, UserStatus};

/// Declares a closed string enumeration stored as a lowercase/snake_case string.
///
/// Generates `as_str`, a case-insensitive `parse`, `ALL`, `Display`, and serde impls where
/// unknown or non-string values deserialize to the default variant.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $text:literal),+ $(,)?
        }
        default = $default:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub fn parse(s: &str) -> Option<Self> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
                Ok(raw.as_str().and_then($name::parse).unwrap_or_default())
            }
        }
    };
}

pub(crate) use string_enum;

string_enum! {
    /// Shared difficulty scale for quizzes, assessments and daily problems
    pub enum Difficulty {
        Easy => "easy",
        Medium => "medium",
        Hard => "hard",
    }
    default = Easy
}
