use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use super::percentage;
use crate::application::{ApplicationStatus, JobApplication};

/// Number of applications in one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: ApplicationStatus,
    pub count: usize,
    pub percentage: u32,
}

/// One entry per status, in pipeline order, including empty ones.
pub fn status_breakdown(applications: &[JobApplication]) -> Vec<StatusCount> {
    ApplicationStatus::ALL
        .iter()
        .map(|&status| {
            let count = applications.iter().filter(|a| a.status == status).count();
            StatusCount {
                status,
                count,
                percentage: percentage(count, applications.len()),
            }
        })
        .collect()
}

/// Headline numbers for the dashboard and analytics views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStats {
    pub total: usize,
    pub this_month: usize,
    pub last_month: usize,
    pub offers: usize,
    /// Applications in `interview` or `final_interview`.
    pub interviews: usize,
    pub rejected: usize,
    /// Applications without an outcome yet.
    pub active: usize,
    /// `(interviews + offers) / total`, percent.
    pub response_rate: u32,
    /// `offers / total`, percent.
    pub success_rate: u32,
    /// `offers / (offers + rejected + withdrawn)`, percent.
    pub closed_success_rate: u32,
    /// Change from last month to this month, percent. Negative when fewer.
    pub monthly_growth: i64,
}

impl PipelineStats {
    pub fn compute(applications: &[JobApplication], now: DateTime<Utc>) -> Self {
        let count = |pred: &dyn Fn(&JobApplication) -> bool| {
            applications.iter().filter(|&a| pred(a)).count()
        };

        let (this_year, this_month) = (now.year(), now.month());
        let (last_year, last_month) = month_back(this_year, this_month, 1);

        let total = applications.len();
        let this_month_count = count(&|a| {
            let d = a.effective_date();
            d.year() == this_year && d.month() == this_month
        });
        let last_month_count = count(&|a| {
            let d = a.effective_date();
            d.year() == last_year && d.month() == last_month
        });
        let offers = count(&|a| a.status == ApplicationStatus::Offer);
        let interviews = count(&|a| a.status.is_interviewing());
        let rejected = count(&|a| a.status == ApplicationStatus::Rejected);
        let closed = count(&|a| a.status.is_closed());

        let monthly_growth = if last_month_count > 0 {
            let delta = this_month_count as f64 - last_month_count as f64;
            ((delta / last_month_count as f64) * 100.0).round() as i64
        } else {
            0
        };

        Self {
            total,
            this_month: this_month_count,
            last_month: last_month_count,
            offers,
            interviews,
            rejected,
            active: total - closed,
            response_rate: percentage(interviews + offers, total),
            success_rate: percentage(offers, total),
            closed_success_rate: percentage(offers, closed),
            monthly_growth,
        }
    }
}

/// Applications counted in one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCount {
    pub year: i32,
    pub month: u32,
    pub applications: usize,
}

/// Counts for the trailing `months` calendar months, oldest first, ending
/// with the month containing `now`.
pub fn monthly_counts(
    applications: &[JobApplication],
    now: DateTime<Utc>,
    months: u32,
) -> Vec<MonthlyCount> {
    (0..months)
        .rev()
        .map(|back| {
            let (year, month) = month_back(now.year(), now.month(), back);
            let applications = applications
                .iter()
                .filter(|a| {
                    let d = a.effective_date();
                    d.year() == year && d.month() == month
                })
                .count();
            MonthlyCount {
                year,
                month,
                applications,
            }
        })
        .collect()
}

fn month_back(year: i32, month: u32, back: u32) -> (i32, u32) {
    let index = year * 12 + (month as i32 - 1) - back as i32;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::NewApplication;
    use chrono::TimeZone;

    fn app(status: ApplicationStatus, applied: &str) -> JobApplication {
        let mut input = NewApplication::new("Acme", "Engineer", status);
        input.date_applied = Some(applied.to_string());
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        input.into_record(applied.to_string(), created)
    }

    #[test]
    fn test_empty_collection_has_zero_rates() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        let stats = PipelineStats::compute(&[], now);
        assert_eq!(stats, PipelineStats::default());
    }

    #[test]
    fn test_pipeline_stats() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        let apps = vec![
            app(ApplicationStatus::Applied, "2024-03-01"),
            app(ApplicationStatus::Interview, "2024-03-02"),
            app(ApplicationStatus::FinalInterview, "2024-02-10"),
            app(ApplicationStatus::Offer, "2024-02-11"),
            app(ApplicationStatus::Rejected, "2024-01-05"),
        ];

        let stats = PipelineStats::compute(&apps, now);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.this_month, 2);
        assert_eq!(stats.last_month, 2);
        assert_eq!(stats.offers, 1);
        assert_eq!(stats.interviews, 2);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.active, 3);
        assert_eq!(stats.response_rate, 60);
        assert_eq!(stats.success_rate, 20);
        assert_eq!(stats.closed_success_rate, 50);
        assert_eq!(stats.monthly_growth, 0);
    }

    #[test]
    fn test_status_breakdown_covers_every_status() {
        let apps = vec![
            app(ApplicationStatus::Applied, "2024-03-01"),
            app(ApplicationStatus::Applied, "2024-03-02"),
            app(ApplicationStatus::Offer, "2024-03-03"),
        ];
        let breakdown = status_breakdown(&apps);
        assert_eq!(breakdown.len(), 8);
        assert_eq!(breakdown[0].status, ApplicationStatus::Interested);
        assert_eq!(breakdown[1].count, 2);
        assert_eq!(breakdown[1].percentage, 67);
        assert_eq!(breakdown[5].count, 1);
    }

    #[test]
    fn test_monthly_counts_cross_year_boundary() {
        let now = Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap();
        let apps = vec![
            app(ApplicationStatus::Applied, "2023-12-24"),
            app(ApplicationStatus::Applied, "2024-02-01"),
        ];
        let months = monthly_counts(&apps, now, 3);
        assert_eq!(
            months,
            vec![
                MonthlyCount { year: 2023, month: 12, applications: 1 },
                MonthlyCount { year: 2024, month: 1, applications: 0 },
                MonthlyCount { year: 2024, month: 2, applications: 1 },
            ]
        );
    }
}
