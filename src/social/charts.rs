//! Chart generation for the social page.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisPointer, AxisPointerType, AxisType, Tooltip, Trigger},
    series::Line,
};
use time::Date;

use super::{
    aggregation::{follower_series, reach_series},
    models::{AccountMetricsDay, DiscordDaySummary},
};

fn axis_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

/// Discord members and daily activity over time.
pub(super) fn discord_chart(summaries: &[DiscordDaySummary]) -> Chart {
    let labels: Vec<String> = summaries.iter().map(|s| s.day.to_string()).collect();
    let members: Vec<i64> = summaries.iter().map(|s| s.member_count).collect();
    let messages: Vec<i64> = summaries.iter().map(|s| s.message_count).collect();
    let active: Vec<i64> = summaries.iter().map(|s| s.active_users).collect();

    Chart::new()
        .title(Title::new().text("Discord").subtext("Members and daily activity"))
        .tooltip(axis_tooltip())
        .legend(Legend::new().top("1%").right("4%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Line::new().name("Members").data(members))
        .series(Line::new().name("Messages").data(messages))
        .series(Line::new().name("Active users").data(active))
}

/// Follower counts per platform on a shared day axis.
pub(super) fn followers_chart(metrics: &[AccountMetricsDay]) -> Chart {
    let series = follower_series(metrics);
    let labels: Vec<String> = series.days.iter().map(Date::to_string).collect();

    let mut chart = Chart::new()
        .title(Title::new().text("Followers").subtext("Per platform"))
        .tooltip(axis_tooltip())
        .legend(Legend::new().top("1%").right("4%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value));

    for (platform, values) in series.platforms {
        chart = chart.series(Line::new().name(platform).data(values));
    }

    chart
}

/// Impressions and engagements summed across platforms per day.
pub(super) fn reach_chart(metrics: &[AccountMetricsDay]) -> Chart {
    let series = reach_series(metrics);
    let labels: Vec<String> = series.days.iter().map(Date::to_string).collect();

    Chart::new()
        .title(Title::new().text("Reach").subtext("All platforms"))
        .tooltip(axis_tooltip())
        .legend(Legend::new().top("1%").right("4%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Line::new().name("Impressions").data(series.impressions))
        .series(Line::new().name("Engagements").data(series.engagements))
}
