//! Output formatter trait

use interview_application::InterviewReport;

/// Trait for rendering the final interview report
pub trait ReportFormatter {
    /// Human-readable report
    fn format(&self, report: &InterviewReport) -> String;

    fn format_json(&self, report: &InterviewReport) -> String;
}
