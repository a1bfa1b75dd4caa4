//! Spreadsheet export of every child record in the dashboard state.
//!
//! One row per contact inquiry or internship application, with columns for
//! both kinds. Columns that do not apply to a row's kind hold `N/A`.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_xlsxwriter::{Workbook, XlsxError};
use thiserror::Error;

use relyce_core::{ChildKind, ContactInquiry, InternshipApplication};

use super::dashboard::{DashboardState, SubmitterRecords};

pub const FILE_NAME: &str = "Relyce_Users_Data.xlsx";
pub const SHEET_NAME: &str = "Users Data";
pub const CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Placeholder for absent or empty values.
pub const NOT_AVAILABLE: &str = "N/A";

pub const COLUMNS: [&str; 16] = [
    "Type",
    "FullName",
    "Email",
    "Phone",
    "Company",
    "Method",
    "Details",
    "Requirements",
    "Domain",
    "College",
    "LinkedIn",
    "AboutYou",
    "WhyInternship",
    "ResumeLink",
    "ResumePath",
    "SubmittedAt",
];

pub type ExportRow = [String; COLUMNS.len()];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No data available to export.")]
    Empty,

    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] XlsxError),
}

/// Escape values a spreadsheet would evaluate as a formula.
///
/// A value whose first non-whitespace character is `=`, `+`, `-` or `@` gets
/// a leading `'`. The original value, whitespace included, follows it.
#[must_use]
pub fn sanitize_cell(value: &str) -> String {
    if value.trim_start().starts_with(['=', '+', '-', '@']) {
        format!("'{value}")
    } else {
        value.to_owned()
    }
}

fn cell(value: &str) -> String {
    if value.is_empty() {
        NOT_AVAILABLE.to_owned()
    } else {
        sanitize_cell(value)
    }
}

fn optional_cell(value: Option<&str>) -> String {
    cell(value.unwrap_or_default())
}

fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn na() -> String {
    NOT_AVAILABLE.to_owned()
}

fn contact_row(records: &SubmitterRecords, inquiry: &ContactInquiry) -> ExportRow {
    let submitter = &records.submitter;
    [
        ChildKind::Contact.export_label().to_owned(),
        cell(&submitter.full_name),
        cell(submitter.email.as_str()),
        cell(&inquiry.phone),
        cell(&inquiry.company),
        cell(inquiry.contact_method.as_str()),
        cell(&inquiry.project_details),
        cell(&inquiry.requirements),
        na(),
        na(),
        na(),
        na(),
        na(),
        na(),
        na(),
        timestamp(inquiry.submitted_at.unwrap_or(submitter.last_submission_at)),
    ]
}

fn internship_row(records: &SubmitterRecords, application: &InternshipApplication) -> ExportRow {
    let submitter = &records.submitter;
    [
        ChildKind::Internship.export_label().to_owned(),
        cell(&submitter.full_name),
        cell(submitter.email.as_str()),
        cell(&application.phone),
        na(),
        cell(application.contact_method.as_str()),
        na(),
        na(),
        cell(application.domain.as_str()),
        cell(&application.college),
        cell(&application.linkedin_url),
        cell(&application.about_you),
        cell(&application.why_internship),
        optional_cell(application.resume_url.as_deref()),
        optional_cell(application.resume_path.as_deref()),
        timestamp(
            application
                .submitted_at
                .unwrap_or(submitter.last_submission_at),
        ),
    ]
}

/// Flatten every child record, regardless of the active tab.
#[must_use]
pub fn export_rows(state: &DashboardState) -> Vec<ExportRow> {
    state
        .submitters()
        .iter()
        .flat_map(|records| {
            let contacts = records.contacts.iter().map(|c| contact_row(records, c));
            let internships = records
                .internships
                .iter()
                .map(|a| internship_row(records, a));
            contacts.chain(internships)
        })
        .collect()
}

/// Serialize rows into a one-sheet workbook.
///
/// # Errors
///
/// Returns `ExportError::Empty` for zero rows, so no empty file is produced.
pub fn workbook(rows: &[ExportRow]) -> Result<Vec<u8>, ExportError> {
    if rows.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in (0u16..).zip(COLUMNS) {
        sheet.write_string(0, col, header)?;
    }
    for (row, values) in (1u32..).zip(rows) {
        for (col, value) in (0u16..).zip(values) {
            sheet.write_string(row, col, value)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Export the dashboard state as workbook bytes.
///
/// # Errors
///
/// See [`workbook`].
pub fn export(state: &DashboardState) -> Result<Vec<u8>, ExportError> {
    let rows = export_rows(state);
    tracing::info!(rows = rows.len(), "Exporting submissions");
    workbook(&rows)
}
