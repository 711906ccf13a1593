//! Read-only projections over a complaint snapshot.
//!
//! Nothing here touches the store or caches results; dashboards recompute
//! on every load.

use serde::{Deserialize, Serialize};

use crate::local_db_model::{Complaint, ComplaintCategory, ComplaintStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub resolved: usize,
}

/// Summary the public and admin dashboards render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintStats {
    #[serde(flatten)]
    pub counts: StatusCounts,
    pub completion_percentage: u32,
    pub in_progress_percentage: u32,
}

impl ComplaintStats {
    pub fn from_complaints(complaints: &[Complaint]) -> Self {
        let counts = count_by_status(complaints);
        Self {
            counts,
            completion_percentage: percentage(counts.resolved, counts.total),
            in_progress_percentage: percentage(counts.in_progress, counts.total),
        }
    }
}

pub fn count_by_status(complaints: &[Complaint]) -> StatusCounts {
    complaints.iter().fold(
        StatusCounts {
            total: complaints.len(),
            ..StatusCounts::default()
        },
        |mut counts, complaint| {
            match complaint.status {
                ComplaintStatus::Pending => counts.pending += 1,
                ComplaintStatus::InProgress => counts.in_progress += 1,
                ComplaintStatus::Resolved => counts.resolved += 1,
            }
            counts
        },
    )
}

/// Share of resolved complaints, rounded to a whole percent. 0 when empty.
pub fn completion_percentage(complaints: &[Complaint]) -> u32 {
    let counts = count_by_status(complaints);
    percentage(counts.resolved, counts.total)
}

pub fn in_progress_percentage(complaints: &[Complaint]) -> u32 {
    let counts = count_by_status(complaints);
    percentage(counts.in_progress, counts.total)
}

fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u32
}

/// Progress bar value for a single complaint.
pub fn status_progress(status: ComplaintStatus) -> u8 {
    match status {
        ComplaintStatus::Pending => 0,
        ComplaintStatus::InProgress => 50,
        ComplaintStatus::Resolved => 100,
    }
}

/// Sorts by creation time, most recent first.
pub fn newest_first(mut complaints: Vec<Complaint>) -> Vec<Complaint> {
    complaints.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    complaints
}

/// Keeps complaints of one category; `None` keeps everything.
pub fn filter_by_category(
    complaints: Vec<Complaint>,
    category: Option<ComplaintCategory>,
) -> Vec<Complaint> {
    match category {
        Some(category) => complaints
            .into_iter()
            .filter(|c| c.category == category)
            .collect(),
        None => complaints,
    }
}
