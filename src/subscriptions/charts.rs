//! Chart generation for the subscriptions page.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisPointer, AxisPointerType, AxisType, Tooltip, Trigger},
    series::{Line, bar},
};
use time::{Date, Month};

use super::cohorts::Cohort;

pub(super) fn month_label(month: Date) -> String {
    format!("{} {}", month_abbrev(month.month()), month.year())
}

fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

/// Signups and conversions per signup cohort.
pub(super) fn cohort_chart(cohorts: &[Cohort]) -> Chart {
    let labels: Vec<String> = cohorts.iter().map(|c| month_label(c.month)).collect();
    let signups: Vec<i64> = cohorts.iter().map(|c| c.signups as i64).collect();
    let conversions: Vec<i64> = cohorts.iter().map(|c| c.conversions as i64).collect();

    Chart::new()
        .title(
            Title::new()
                .text("Signup Cohorts")
                .subtext("Signups and paid conversions per month"),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
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
        .series(bar::Bar::new().name("Signups").data(signups))
        .series(bar::Bar::new().name("Conversions").data(conversions))
}

/// Churned subscribers per expiry month.
pub(super) fn churn_chart(churn: &[(Date, u64)]) -> Chart {
    let labels: Vec<String> = churn.iter().map(|(month, _)| month_label(*month)).collect();
    let values: Vec<i64> = churn.iter().map(|(_, count)| *count as i64).collect();

    Chart::new()
        .title(
            Title::new()
                .text("Churn")
                .subtext("Subscriptions lapsed per month"),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Line::new().name("Churned").data(values))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::month_label;

    #[test]
    fn month_labels_abbreviate_the_month() {
        assert_eq!(month_label(date!(2025 - 01 - 01)), "Jan 2025");
        assert_eq!(month_label(date!(2025 - 12 - 01)), "Dec 2025");
    }
}
