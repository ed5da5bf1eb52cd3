use crate::models::UserRole;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Administration tool for the learning platform's course content and reports
#[derive(Parser, Debug, Clone)]
#[command(name = "course_admin")]
#[command(about = "Manage course content, run data fixes and print dashboard reports", long_about = None)]
#[command(version)]
pub struct Args {
    /// Use in-memory database for testing
    #[arg(long, global = true, help = "Use in-memory database for testing")]
    pub test: bool,

    /// Custom database file path
    #[arg(long, global = true, value_name = "PATH", help = "Use custom database file path")]
    pub db_path: Option<PathBuf>,

    /// Override current date for testing (YYYY-MM-DD format)
    #[arg(
        long,
        global = true,
        value_name = "DATE",
        help = "Override current date (YYYY-MM-DD format)"
    )]
    pub override_date: Option<String>,

    /// Seed for the activity chart jitter
    #[arg(long, global = true, value_name = "SEED", help = "Seed the activity report for reproducible output")]
    pub seed: Option<u64>,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the activity, feedback, assessment and course progress reports
    Report,
    /// Populate the database with demo content
    SeedDemo,
    /// Recompute every course's moduleCount from its stored modules
    BackfillModuleCounts,
    /// Fill missing difficulty, type, test cases and points on daily problems
    BackfillDailyProblems,
    /// Rewrite feedback statuses to their canonical values
    NormalizeFeedback,
    /// Change the role of the user registered under an email address
    AssignRole {
        #[arg(long)]
        email: String,
        #[arg(long, value_parser = parse_role)]
        role: UserRole,
    },
}

fn parse_role(value: &str) -> Result<UserRole, String> {
    UserRole::parse(value).ok_or_else(|| {
        let known: Vec<&str> = UserRole::ALL.iter().map(|r| r.as_str()).collect();
        format!("unknown role '{}', expected one of: {}", value, known.join(", "))
    })
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate the override_date argument if provided
    pub fn validate_override_date(&self) -> Result<Option<NaiveDate>, String> {
        match &self.override_date {
            Some(date_str) => {
                NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                    .map(Some)
                    .map_err(|_| {
                        format!(
                            "Invalid date format for --override-date: '{}'. Expected YYYY-MM-DD",
                            date_str
                        )
                    })
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(override_date: Option<&str>) -> Args {
        Args {
            test: false,
            db_path: None,
            override_date: override_date.map(str::to_string),
            seed: None,
            no_color: false,
            command: Command::Report,
        }
    }

    #[test]
    fn test_parse_report_with_flags() {
        let args = Args::try_parse_from([
            "course_admin",
            "report",
            "--test",
            "--seed",
            "7",
            "--no-color",
        ])
        .unwrap();
        assert!(args.test);
        assert!(args.no_color);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.command, Command::Report);
    }

    #[test]
    fn test_parse_db_path() {
        let args = Args::try_parse_from(["course_admin", "--db-path", "/tmp/test.db", "seed-demo"]).unwrap();
        assert_eq!(args.db_path.as_deref(), Some(PathBuf::from("/tmp/test.db").as_path()));
        assert_eq!(args.command, Command::SeedDemo);
    }

    #[test]
    fn test_parse_assign_role() {
        let args = Args::try_parse_from([
            "course_admin",
            "assign-role",
            "--email",
            "a@example.com",
            "--role",
            "Instructor",
        ])
        .unwrap();
        assert_eq!(
            args.command,
            Command::AssignRole {
                email: "a@example.com".to_string(),
                role: UserRole::Instructor,
            }
        );
    }

    #[test]
    fn test_unknown_role_rejected() {
        let result = Args::try_parse_from([
            "course_admin",
            "assign-role",
            "--email",
            "a@example.com",
            "--role",
            "owner",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Args::try_parse_from(["course_admin"]).is_err());
    }

    #[test]
    fn test_validate_override_date_valid() {
        let result = args(Some("2024-01-15")).validate_override_date();
        assert_eq!(result.unwrap(), Some(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()));
    }

    #[test]
    fn test_validate_override_date_invalid_format() {
        let result = args(Some("2024/01/15")).validate_override_date();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid date format"));
    }

    #[test]
    fn test_validate_override_date_invalid_date() {
        assert!(args(Some("2024-13-01")).validate_override_date().is_err());
    }

    #[test]
    fn test_validate_override_date_none() {
        assert_eq!(args(None).validate_override_date().unwrap(), None);
    }
}
