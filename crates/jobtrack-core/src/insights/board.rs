use serde::Serialize;

use crate::application::{ApplicationStatus, JobApplication};

/// One kanban column.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardColumn<'a> {
    pub status: ApplicationStatus,
    pub title: &'static str,
    pub applications: Vec<&'a JobApplication>,
}

/// Groups applications into one column per status, in pipeline order.
/// Within a column the collection order is kept.
pub fn board_columns(applications: &[JobApplication]) -> Vec<BoardColumn<'_>> {
    ApplicationStatus::ALL
        .iter()
        .map(|&status| BoardColumn {
            status,
            title: status.label(),
            applications: applications.iter().filter(|a| a.status == status).collect(),
        })
        .collect()
}
