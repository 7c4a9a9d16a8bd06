use anyhow::Result;
use chrono::{DateTime, Utc};
use jobtrack_core::application::JobApplication;
use jobtrack_core::insights::{
    board_columns, monthly_counts, recent_applications, status_breakdown, upcoming_interviews,
    PipelineStats,
};
use serde_json::{json, Value};

use super::{print_json, Runtime};

const RECENT_LIMIT: usize = 5;
const UPCOMING_LIMIT: usize = 3;

pub async fn stats(runtime: &Runtime, months: u32) -> Result<()> {
    let applications = runtime.store.applications().await;
    print_json(&summary(&applications, Utc::now(), months))
}

fn summary(applications: &[JobApplication], now: DateTime<Utc>, months: u32) -> Value {
    json!({
        "stats": PipelineStats::compute(applications, now),
        "statusBreakdown": status_breakdown(applications),
        "monthly": monthly_counts(applications, now, months),
        "recent": recent_applications(applications, RECENT_LIMIT),
        "upcomingInterviews": upcoming_interviews(applications, now, UPCOMING_LIMIT),
    })
}

pub async fn board(runtime: &Runtime) -> Result<()> {
    let applications = runtime.store.applications().await;
    print_json(&board_columns(&applications))
}
