//! crates/interntrack_core/src/report.rs
//!
//! The monthly task export: the calendar window it covers and its CSV rendering.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::domain::MonthlyTaskRow;
use crate::ports::{PortError, PortResult};

pub const CSV_HEADER: &str =
    "task_id,intern_email,supervisor_email,title,status,star_rating,created_at";

/// First instant and last second of a calendar month, in UTC.
pub fn month_range(year: i32, month: u32) -> PortResult<(DateTime<Utc>, DateTime<Utc>)> {
    let invalid = || PortError::Validation("year and month must name a calendar month".to_string());

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    let last = next_month.pred_opt().ok_or_else(invalid)?;

    let start = first.and_hms_opt(0, 0, 0).ok_or_else(invalid)?;
    let end = last.and_hms_opt(23, 59, 59).ok_or_else(invalid)?;

    Ok((Utc.from_utc_datetime(&start), Utc.from_utc_datetime(&end)))
}

/// Renders rows as CSV. Titles are always quoted, with embedded double quotes replaced by
/// single quotes rather than escaped.
pub fn render_csv(rows: &[MonthlyTaskRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for row in rows {
        let title = row.title.replace('"', "'");
        let rating = row
            .star_rating
            .map(|r| r.value().to_string())
            .unwrap_or_default();
        lines.push(format!(
            "{},{},{},\"{}\",{},{},{}",
            row.task_id,
            row.intern_email,
            row.supervisor_email,
            title,
            row.status,
            rating,
            row.created_at.to_rfc3339()
        ));
    }
    lines.join("\n")
}

pub fn csv_filename(year: i32, month: u32) -> String {
    format!("monthly_report_{}_{}.csv", year, month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StarRating, TaskStatus};
    use uuid::Uuid;

    #[test]
    fn month_range_covers_whole_month() {
        let (start, end) = month_range(2024, 2).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-02-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-02-29T23:59:59+00:00");

        let (_, december_end) = month_range(2023, 12).unwrap();
        assert_eq!(december_end.to_rfc3339(), "2023-12-31T23:59:59+00:00");
    }

    #[test]
    fn month_out_of_range_is_rejected() {
        assert!(matches!(month_range(2024, 0), Err(PortError::Validation(_))));
        assert!(matches!(month_range(2024, 13), Err(PortError::Validation(_))));
    }

    #[test]
    fn csv_quotes_titles_and_substitutes_embedded_quotes() {
        let task_id = Uuid::new_v4();
        let created_at = Utc.with_ymd_and_hms(2024, 5, 3, 9, 30, 0).unwrap();
        let rows = vec![
            MonthlyTaskRow {
                task_id,
                intern_email: "intern@example.com".to_string(),
                supervisor_email: "sup@example.com".to_string(),
                title: "Fix \"login\", then deploy".to_string(),
                status: TaskStatus::Completed,
                star_rating: Some(StarRating::new(4).unwrap()),
                created_at,
            },
            MonthlyTaskRow {
                task_id,
                intern_email: "intern@example.com".to_string(),
                supervisor_email: "sup@example.com".to_string(),
                title: "Unrated".to_string(),
                status: TaskStatus::InProgress,
                star_rating: None,
                created_at,
            },
        ];

        let csv = render_csv(&rows);
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(
            lines[1],
            format!(
                "{},intern@example.com,sup@example.com,\"Fix 'login', then deploy\",COMPLETED,4,2024-05-03T09:30:00+00:00",
                task_id
            )
        );
        assert_eq!(
            lines[2],
            format!(
                "{},intern@example.com,sup@example.com,\"Unrated\",IN_PROGRESS,,2024-05-03T09:30:00+00:00",
                task_id
            )
        );
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn empty_report_is_header_only() {
        assert_eq!(render_csv(&[]), CSV_HEADER);
        assert_eq!(csv_filename(2024, 7), "monthly_report_2024_7.csv");
    }
}
