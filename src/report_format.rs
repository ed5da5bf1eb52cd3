use crate::database::analytics::{ActivityDay, CategoryPerformance, CourseProgressRow, FeedbackStatusSlice};
use crate::views::{Dashboard, Section};
use colored::{ColoredString, Colorize};
use std::fmt::Write;

const BAR_WIDTH: i64 = 30;

/// Plain-text rendering of the dashboard, optionally with ANSI colors
pub struct ReportFormatter {
    color: bool,
}

impl ReportFormatter {
    pub fn new(color: bool) -> Self {
        ReportFormatter { color }
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().cyan().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint(&self, text: String, style: fn(ColoredString) -> ColoredString) -> String {
        if self.color {
            style(text.normal()).to_string()
        } else {
            text
        }
    }

    pub fn render(&self, dashboard: &Dashboard) -> String {
        let sections = [
            (Section::Activity, self.activity(&dashboard.activity)),
            (Section::FeedbackStatus, self.feedback_status(&dashboard.feedback_status)),
            (
                Section::AssessmentPerformance,
                self.assessment_performance(&dashboard.assessment_performance),
            ),
            (Section::CourseProgress, self.course_progress(&dashboard.course_progress)),
        ];
        let rendered: Vec<String> = sections
            .into_iter()
            .map(|(section, text)| match dashboard.error_for(section) {
                Some(message) => self.unavailable(&text, message),
                None => text,
            })
            .collect();
        rendered.join("\n")
    }

    /// Keeps the section heading and replaces the body with the failure
    fn unavailable(&self, section: &str, message: &str) -> String {
        let heading = section.lines().next().unwrap_or_default();
        let note = self.paint(format!("Unavailable: {}", message), |s| s.red());
        format!("{}\n  {}\n", heading, note)
    }

    pub fn activity(&self, days: &[ActivityDay]) -> String {
        let mut out = format!("{}\n", self.heading("Activity (last 7 days)"));
        let peak = days.iter().map(|d| d.count).max().unwrap_or(0);
        for day in days {
            let width = if peak > 0 { day.count * BAR_WIDTH / peak } else { 0 };
            let _ = write!(out, "  {} {}  {:>5}", day.label, day.date, day.count);
            if width > 0 {
                let bar = self.paint("#".repeat(width as usize), |s| s.green());
                let _ = write!(out, " {}", bar);
            }
            out.push('\n');
        }
        out
    }

    pub fn feedback_status(&self, slices: &[FeedbackStatusSlice]) -> String {
        let mut out = format!("{}\n", self.heading("Feedback status"));
        if slices.is_empty() {
            out.push_str("  No feedback\n");
        }
        for slice in slices {
            let percentage = self.paint(format!("{:>3}%", slice.percentage), |s| s.yellow());
            let _ = writeln!(out, "  {:<10} {:>5}  {}", slice.status.as_str(), slice.count, percentage);
        }
        out
    }

    pub fn assessment_performance(&self, rows: &[CategoryPerformance]) -> String {
        let mut out = format!("{}\n", self.heading("Assessment performance"));
        if rows.is_empty() {
            out.push_str("  No submissions\n");
        }
        for row in rows {
            let rate = format!("{:>3}%", row.pass_rate);
            let rate = if row.pass_rate >= 50 {
                self.paint(rate, |s| s.green())
            } else {
                self.paint(rate, |s| s.red())
            };
            let _ = writeln!(
                out,
                "  {:<20} submissions {:>4}  passed {:>4}  failed {:>4}  pass rate {}",
                row.category, row.submissions, row.passed, row.failed, rate
            );
        }
        out
    }

    pub fn course_progress(&self, rows: &[CourseProgressRow]) -> String {
        let mut out = format!("{}\n", self.heading("Course progress"));
        if rows.is_empty() {
            out.push_str("  No learners\n");
        }
        for row in rows {
            let completion = self.paint(format!("{:>3}%", row.average_completion), |s| s.yellow());
            let _ = writeln!(
                out,
                "  {:<30} learners {:>4}  average completion {}",
                row.title, row.learners, completion
            );
        }
        out
    }
}
