//! Database queries for the social dashboard.

use std::ops::RangeInclusive;

use rusqlite::Connection;
use time::Date;

use crate::Error;

use super::models::{AccountMetricsDay, DemographicRow, DiscordDaySummary, Post};

/// Get the Discord daily summaries inside the inclusive range, oldest day
/// first.
pub(crate) fn get_discord_summaries(
    date_range: RangeInclusive<Date>,
    connection: &Connection,
) -> Result<Vec<DiscordDaySummary>, Error> {
    connection
        .prepare(
            "SELECT day, member_count, message_count, active_users \
            FROM discord_daily_summary WHERE day BETWEEN ?1 AND ?2 ORDER BY day ASC",
        )?
        .query_map(
            [
                date_range.start().to_string(),
                date_range.end().to_string(),
            ],
            |row| {
                Ok(DiscordDaySummary {
                    day: row.get(0)?,
                    member_count: row.get(1)?,
                    message_count: row.get(2)?,
                    active_users: row.get(3)?,
                })
            },
        )?
        .map(|row_result| row_result.map_err(Error::SqlError))
        .collect()
}

/// Get the per-platform daily account metrics, oldest day first.
pub(crate) fn get_account_metrics(
    connection: &Connection,
) -> Result<Vec<AccountMetricsDay>, Error> {
    connection
        .prepare(
            "SELECT day, platform, followers, impressions, engagements \
            FROM account_metrics_daily ORDER BY day ASC, platform ASC",
        )?
        .query_map([], |row| {
            Ok(AccountMetricsDay {
                day: row.get(0)?,
                platform: row.get(1)?,
                followers: row.get(2)?,
                impressions: row.get(3)?,
                engagements: row.get(4)?,
            })
        })?
        .map(|row_result| row_result.map_err(Error::SqlError))
        .collect()
}

/// Get the `limit` posts with the highest combined engagement.
///
/// Ties are broken by recency so the ordering is stable.
pub(crate) fn get_top_posts(connection: &Connection, limit: u64) -> Result<Vec<Post>, Error> {
    connection
        .prepare(
            "SELECT platform, posted_at, title, likes, comments, shares FROM posts \
            ORDER BY likes + comments + shares DESC, posted_at DESC LIMIT ?1",
        )?
        .query_map([limit], |row| {
            Ok(Post {
                platform: row.get(0)?,
                posted_at: row.get(1)?,
                title: row.get(2)?,
                likes: row.get(3)?,
                comments: row.get(4)?,
                shares: row.get(5)?,
            })
        })?
        .map(|row_result| row_result.map_err(Error::SqlError))
        .collect()
}

/// Get each platform's demographic breakdown for the most recent day it was
/// measured.
pub(crate) fn get_latest_demographics(
    connection: &Connection,
) -> Result<Vec<DemographicRow>, Error> {
    connection
        .prepare(
            "SELECT d.platform, d.segment, d.percentage FROM demographic_metrics_daily d \
            WHERE d.day = (SELECT MAX(day) FROM demographic_metrics_daily \
                WHERE platform = d.platform) \
            ORDER BY d.platform ASC, d.percentage DESC",
        )?
        .query_map([], |row| {
            Ok(DemographicRow {
                platform: row.get(0)?,
                segment: row.get(1)?,
                percentage: row.get(2)?,
            })
        })?
        .map(|row_result| row_result.map_err(Error::SqlError))
        .collect()
}
