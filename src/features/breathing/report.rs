//! Breathing practice reports.
//!
//! Summarizes stored sessions over a period: totals, per-technique and
//! per-day breakdowns, and the current streak of days with a completed run.
//! Days are calendar days in the local timezone.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::session::SessionRecord;
use super::storage::BreathingStorage;
use crate::error::MindfulError;

/// Report time period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    /// Today only
    Today,
    /// Last 7 days
    Week,
    /// Last 30 days
    Month,
    /// All time
    All,
}

impl ReportPeriod {
    /// Parse period from string; unknown values fall back to a week.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "today" | "t" | "d" => Self::Today,
            "month" | "m" | "30d" => Self::Month,
            "all" | "alltime" | "all-time" => Self::All,
            _ => Self::Week,
        }
    }

    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Week => "Last 7 Days",
            Self::Month => "Last 30 Days",
            Self::All => "All Time",
        }
    }

    /// Half-open `[start, end)` range ending at the close of `now`'s day,
    /// with day boundaries taken in `now`'s timezone.
    #[must_use]
    pub fn date_range<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> (DateTime<Utc>, DateTime<Utc>) {
        let tz = now.timezone();
        let today = now.date_naive();
        let end = start_of_day(&tz, today + Duration::days(1));

        let start = match self {
            Self::Today => start_of_day(&tz, today),
            Self::Week => start_of_day(&tz, today - Duration::days(6)),
            Self::Month => start_of_day(&tz, today - Duration::days(29)),
            Self::All => DateTime::<Utc>::UNIX_EPOCH,
        };

        (start, end)
    }
}

/// First instant of `date` in `tz`.
///
/// A midnight skipped by a DST change falls back to midnight UTC.
fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight).earliest().map_or_else(
        || DateTime::from_naive_utc_and_offset(midnight, Utc),
        |t| t.with_timezone(&Utc),
    )
}

/// Distinct local days of `times`, sorted.
fn local_days(times: impl IntoIterator<Item = DateTime<Utc>>) -> Vec<NaiveDate> {
    let mut days: Vec<NaiveDate> = times
        .into_iter()
        .map(|t| t.with_timezone(&Local).date_naive())
        .collect();
    days.sort_unstable();
    days.dedup();
    days
}

/// Practice per technique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechniqueBreakdown {
    /// Technique id
    pub technique: String,
    /// Sessions of any outcome
    pub sessions: i64,
    /// Sessions that reached their target
    pub completed: i64,
    /// Seconds breathed
    pub seconds: i64,
}

/// Practice per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBreathing {
    /// Date (YYYY-MM-DD)
    pub date: String,
    /// Sessions of any outcome
    pub sessions: i64,
    /// Seconds breathed
    pub seconds: i64,
}

/// Breathing report data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreathingReport {
    /// Report period name
    pub period: String,
    /// All sessions in the period
    pub total_sessions: i64,
    /// Sessions that reached their target
    pub completed_sessions: i64,
    /// Sessions stopped early
    pub partial_sessions: i64,
    /// Seconds breathed
    pub total_seconds: i64,
    /// Full cycles breathed
    pub total_cycles: i64,
    /// Completed / total, 0.0 when there are no sessions
    pub completion_rate: f64,
    /// Technique with the most sessions
    pub favourite_technique: Option<String>,
    /// Breakdown by technique, most practiced first
    pub by_technique: Vec<TechniqueBreakdown>,
    /// Breakdown by day, newest first
    pub daily: Vec<DailyBreathing>,
    /// Consecutive days with a completed session, ending today or yesterday
    pub streak_days: i64,
}

impl BreathingReport {
    /// Generate a report for `user_id` over `period`.
    ///
    /// The streak looks at every completed session, not only those in the
    /// period.
    ///
    /// # Errors
    ///
    /// Returns an error if sessions cannot be loaded.
    pub fn generate(
        storage: &BreathingStorage,
        user_id: &str,
        period: ReportPeriod,
    ) -> Result<Self, MindfulError> {
        let now = Local::now();
        let today = now.date_naive();
        let (start, end) = period.date_range(&now);
        let records = storage.range(user_id, start, end)?;

        let mut report = Self::from_records(&records, period, today);
        let completed_days = local_days(storage.completed_times(user_id)?);
        report.streak_days = calculate_streak(&completed_days, today);
        Ok(report)
    }

    /// Build a report from already loaded records.
    ///
    /// The streak is counted from these records alone.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_records(records: &[SessionRecord], period: ReportPeriod, today: NaiveDate) -> Self {
        let total_sessions = records.len() as i64;
        let completed_sessions = records.iter().filter(|r| r.completed).count() as i64;
        let total_seconds = records.iter().map(|r| r.duration_seconds).sum();
        let total_cycles = records.iter().map(|r| i64::from(r.cycles_completed)).sum();

        let completion_rate = if total_sessions > 0 {
            completed_sessions as f64 / total_sessions as f64
        } else {
            0.0
        };

        let mut technique_map: HashMap<&str, TechniqueBreakdown> = HashMap::new();
        for record in records {
            let entry = technique_map
                .entry(record.technique.as_str())
                .or_insert_with(|| TechniqueBreakdown {
                    technique: record.technique.clone(),
                    sessions: 0,
                    completed: 0,
                    seconds: 0,
                });
            entry.sessions += 1;
            entry.completed += i64::from(record.completed);
            entry.seconds += record.duration_seconds;
        }
        let mut by_technique: Vec<_> = technique_map.into_values().collect();
        by_technique.sort_by(|a, b| {
            b.sessions
                .cmp(&a.sessions)
                .then_with(|| a.technique.cmp(&b.technique))
        });

        let mut daily_map: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();
        for record in records {
            let entry = daily_map
                .entry(record.created_at_local().date_naive())
                .or_insert((0, 0));
            entry.0 += 1;
            entry.1 += record.duration_seconds;
        }
        let daily = daily_map
            .into_iter()
            .rev()
            .map(|(date, (sessions, seconds))| DailyBreathing {
                date: date.to_string(),
                sessions,
                seconds,
            })
            .collect();

        let completed_days = local_days(records.iter().filter(|r| r.completed).map(|r| r.created_at));

        Self {
            period: period.display_name().to_string(),
            total_sessions,
            completed_sessions,
            partial_sessions: total_sessions - completed_sessions,
            total_seconds,
            total_cycles,
            completion_rate,
            favourite_technique: by_technique.first().map(|t| t.technique.clone()),
            by_technique,
            daily,
            streak_days: calculate_streak(&completed_days, today),
        }
    }
}

/// Count consecutive days ending today, or yesterday if today has none.
fn calculate_streak(days: &[NaiveDate], today: NaiveDate) -> i64 {
    let mut check = today;
    if days.binary_search(&check).is_err() {
        check = today - Duration::days(1);
    }

    let mut streak = 0;
    while days.binary_search(&check).is_ok() {
        streak += 1;
        check -= Duration::days(1);
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::breathing::session::Session;
    use crate::storage::Database;
    use chrono::FixedOffset;

    fn record_on(date: NaiveDate, technique: &str, secs: i64, completed: bool) -> SessionRecord {
        let start = start_of_day(&Local, date) + Duration::hours(9);
        let cycles = if completed { 4 } else { 1 };
        let session = Session::new(technique, start, start + Duration::seconds(secs), cycles, completed);
        SessionRecord::from_session(&session, "local")
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_parse() {
        assert_eq!(ReportPeriod::parse("today"), ReportPeriod::Today);
        assert_eq!(ReportPeriod::parse("week"), ReportPeriod::Week);
        assert_eq!(ReportPeriod::parse("M"), ReportPeriod::Month);
        assert_eq!(ReportPeriod::parse("all"), ReportPeriod::All);
        assert_eq!(ReportPeriod::parse("whatever"), ReportPeriod::Week);
    }

    #[test]
    fn test_period_ranges() {
        let now = start_of_day(&Utc, day(2024, 3, 10)) + Duration::hours(15);

        let (start, end) = ReportPeriod::Today.date_range(&now);
        assert_eq!(start, start_of_day(&Utc, day(2024, 3, 10)));
        assert_eq!(end, start_of_day(&Utc, day(2024, 3, 11)));

        let (start, _) = ReportPeriod::Week.date_range(&now);
        assert_eq!(start, start_of_day(&Utc, day(2024, 3, 4)));

        let (start, _) = ReportPeriod::All.date_range(&now);
        assert_eq!(start.timestamp(), 0);
    }

    #[test]
    fn test_period_ranges_follow_the_local_day() {
        // 21:00 on the 10th at UTC-5 is already the 11th in UTC.
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2024, 3, 10, 21, 0, 0).unwrap();

        let (start, end) = ReportPeriod::Today.date_range(&now);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 10, 5, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 11, 5, 0, 0).unwrap());
        assert!(start <= now.with_timezone(&Utc) && now.with_timezone(&Utc) < end);
    }

    #[test]
    fn test_empty_report() {
        let report = BreathingReport::from_records(&[], ReportPeriod::Week, day(2024, 3, 10));
        assert_eq!(report.total_sessions, 0);
        assert!(report.completion_rate.abs() < f64::EPSILON);
        assert!(report.favourite_technique.is_none());
        assert_eq!(report.streak_days, 0);
    }

    #[test]
    fn test_report_totals_and_breakdowns() {
        let today = day(2024, 3, 10);
        let records = vec![
            record_on(today, "478", 76, true),
            record_on(today, "478", 10, false),
            record_on(day(2024, 3, 9), "box", 64, true),
        ];

        let report = BreathingReport::from_records(&records, ReportPeriod::Week, today);

        assert_eq!(report.total_sessions, 3);
        assert_eq!(report.completed_sessions, 2);
        assert_eq!(report.partial_sessions, 1);
        assert_eq!(report.total_seconds, 150);
        assert_eq!(report.total_cycles, 9);
        assert!((report.completion_rate - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.favourite_technique.as_deref(), Some("478"));
        assert_eq!(report.by_technique[0].sessions, 2);
        assert_eq!(report.by_technique[0].completed, 1);
        assert_eq!(report.daily[0].date, "2024-03-10");
        assert_eq!(report.daily[0].sessions, 2);
        assert_eq!(report.streak_days, 2);
    }

    #[test]
    fn test_streak_starts_yesterday_when_today_empty() {
        let today = day(2024, 3, 10);
        let days = vec![day(2024, 3, 7), day(2024, 3, 8), day(2024, 3, 9)];
        assert_eq!(calculate_streak(&days, today), 3);
    }

    #[test]
    fn test_streak_broken() {
        let today = day(2024, 3, 10);
        let days = vec![day(2024, 3, 6), day(2024, 3, 7)];
        assert_eq!(calculate_streak(&days, today), 0);
    }

    #[test]
    fn test_partial_sessions_do_not_extend_streak() {
        let today = day(2024, 3, 10);
        let records = vec![record_on(today, "box", 10, false)];
        let report = BreathingReport::from_records(&records, ReportPeriod::Today, today);
        assert_eq!(report.streak_days, 0);
    }

    #[test]
    fn test_daily_buckets_use_local_dates() {
        let today = day(2024, 3, 10);
        let late = start_of_day(&Local, today) + Duration::hours(23);
        let session = Session::new("478", late, late + Duration::seconds(76), 4, true);
        let records = vec![SessionRecord::from_session(&session, "local")];

        let report = BreathingReport::from_records(&records, ReportPeriod::Week, today);
        assert_eq!(report.daily.len(), 1);
        assert_eq!(report.daily[0].date, "2024-03-10");
        assert_eq!(report.streak_days, 1);
    }

    #[test]
    fn test_generated_streak_spans_beyond_the_period() {
        let storage = BreathingStorage::with_database(Database::open_in_memory().unwrap());
        let today = Local::now().date_naive();
        for offset in 0..10 {
            let record = record_on(today - Duration::days(offset), "478", 76, true);
            storage.insert(&record).unwrap();
        }

        for period in [ReportPeriod::Today, ReportPeriod::Week, ReportPeriod::All] {
            let report = BreathingReport::generate(&storage, "local", period).unwrap();
            assert_eq!(report.streak_days, 10, "{period:?}");
        }

        let today_report = BreathingReport::generate(&storage, "local", ReportPeriod::Today).unwrap();
        assert_eq!(today_report.total_sessions, 1);
    }
}
