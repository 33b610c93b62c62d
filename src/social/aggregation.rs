//! Reshaping account metrics into per-platform chart series.

use std::collections::{BTreeMap, BTreeSet};

use time::Date;

use super::models::AccountMetricsDay;

/// Per-platform follower counts aligned on a shared day axis.
pub(super) struct FollowerSeries {
    /// The shared x-axis, oldest day first.
    pub(super) days: Vec<Date>,
    /// One (platform, counts) pair per platform, with `None` for days the
    /// platform was not measured.
    pub(super) platforms: Vec<(String, Vec<Option<i64>>)>,
}

/// Align follower counts across platforms on a shared day axis.
pub(super) fn follower_series(metrics: &[AccountMetricsDay]) -> FollowerSeries {
    let days: BTreeSet<Date> = metrics.iter().map(|m| m.day).collect();

    let mut by_platform: BTreeMap<&str, BTreeMap<Date, i64>> = BTreeMap::new();
    for metric in metrics {
        by_platform
            .entry(metric.platform.as_str())
            .or_default()
            .insert(metric.day, metric.followers);
    }

    let days: Vec<Date> = days.into_iter().collect();
    let platforms = by_platform
        .into_iter()
        .map(|(platform, counts)| {
            let values = days.iter().map(|day| counts.get(day).copied()).collect();
            (platform.to_owned(), values)
        })
        .collect();

    FollowerSeries { days, platforms }
}

/// Daily impressions and engagements summed across platforms.
pub(super) struct ReachSeries {
    /// The x-axis, oldest day first.
    pub(super) days: Vec<Date>,
    /// Total impressions per day.
    pub(super) impressions: Vec<i64>,
    /// Total engagements per day.
    pub(super) engagements: Vec<i64>,
}

/// Sum impressions and engagements across platforms per day.
pub(super) fn reach_series(metrics: &[AccountMetricsDay]) -> ReachSeries {
    let mut by_day: BTreeMap<Date, (i64, i64)> = BTreeMap::new();

    for metric in metrics {
        let entry = by_day.entry(metric.day).or_insert((0, 0));
        entry.0 += metric.impressions;
        entry.1 += metric.engagements;
    }

    let mut series = ReachSeries {
        days: Vec::with_capacity(by_day.len()),
        impressions: Vec::with_capacity(by_day.len()),
        engagements: Vec::with_capacity(by_day.len()),
    };

    for (day, (impressions, engagements)) in by_day {
        series.days.push(day);
        series.impressions.push(impressions);
        series.engagements.push(engagements);
    }

    series
}
