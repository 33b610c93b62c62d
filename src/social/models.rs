//! Row structs for the social dashboard.

use time::Date;

/// One day of Discord server activity.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DiscordDaySummary {
    /// The day the summary covers.
    pub(crate) day: Date,
    /// Total server members at the end of the day.
    pub(crate) member_count: i64,
    /// Messages sent during the day.
    pub(crate) message_count: i64,
    /// Distinct users who sent at least one message.
    pub(crate) active_users: i64,
}

/// One day of metrics for one social account.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AccountMetricsDay {
    /// The day the metrics cover.
    pub(crate) day: Date,
    /// The platform the account lives on, e.g. "facebook" or "tiktok".
    pub(crate) platform: String,
    /// Follower count at the end of the day.
    pub(crate) followers: i64,
    /// Impressions during the day.
    pub(crate) impressions: i64,
    /// Engagements during the day.
    pub(crate) engagements: i64,
}

/// One published post with its engagement counters.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Post {
    /// The platform the post was published on.
    pub(crate) platform: String,
    /// When the post was published.
    pub(crate) posted_at: String,
    /// The post's title or first line.
    pub(crate) title: String,
    /// Like count.
    pub(crate) likes: i64,
    /// Comment count.
    pub(crate) comments: i64,
    /// Share count.
    pub(crate) shares: i64,
}

impl Post {
    /// The combined engagement score used to rank posts.
    pub(crate) fn engagement(&self) -> i64 {
        self.likes + self.comments + self.shares
    }
}

/// One audience segment share for one platform on one day.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DemographicRow {
    /// The platform the share was measured on.
    pub(crate) platform: String,
    /// The audience segment, e.g. an age band.
    pub(crate) segment: String,
    /// The segment's share of the audience, 0 to 100.
    pub(crate) percentage: f64,
}
