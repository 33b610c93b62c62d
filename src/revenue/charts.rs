//! Chart generation for the revenue page.
//!
//! Three ECharts visualizations, each converted into the selected display
//! currency before serialization:
//! - **Monthly Revenue**: completed revenue per month over the trailing year
//! - **Revenue by Provider**: totals per payment provider
//! - **Revenue by Plan**: stacked bar of monthly revenue per subscription plan

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Emphasis, EmphasisFocus, JsFunction,
        Tooltip, Trigger,
    },
    series::{Line, bar},
};

use crate::currency::{DisplayCurrency, RateTable};

use super::{
    aggregation::{
        format_month_labels, get_monthly_label_and_value_pairs, get_sorted_months,
        group_monthly_revenue_by_plan, totals_by_month, totals_by_provider,
    },
    models::Transaction,
};

pub(super) fn monthly_revenue_chart(
    transactions: &[Transaction],
    rates: &RateTable,
    display_currency: DisplayCurrency,
) -> Chart {
    let monthly_totals = totals_by_month(transactions, rates);
    let (labels, values) = get_monthly_label_and_value_pairs(&monthly_totals);
    let values: Vec<f64> = values
        .into_iter()
        .map(|usd| rates.to_display(usd, display_currency.code()))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Monthly Revenue")
                .subtext("Completed transactions, last twelve months"),
        )
        .tooltip(currency_tooltip(display_currency))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter(display_currency))),
        )
        .series(Line::new().name("Revenue").data(values))
}

pub(super) fn provider_revenue_chart(
    transactions: &[Transaction],
    rates: &RateTable,
    display_currency: DisplayCurrency,
) -> Chart {
    let totals = totals_by_provider(transactions, rates);

    let mut sorted_providers: Vec<&String> = totals.keys().collect();
    sorted_providers.sort();

    let labels: Vec<String> = sorted_providers.iter().map(|p| (*p).clone()).collect();
    let values: Vec<f64> = sorted_providers
        .iter()
        .map(|provider| rates.to_display(totals[*provider], display_currency.code()))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Revenue by Provider")
                .subtext("Last twelve months"),
        )
        .tooltip(currency_tooltip(display_currency))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter(display_currency))),
        )
        .series(bar::Bar::new().name("Revenue").data(values))
}

pub(super) fn plan_revenue_chart(
    transactions: &[Transaction],
    rates: &RateTable,
    display_currency: DisplayCurrency,
) -> Chart {
    let sorted_months = get_sorted_months(transactions);
    let labels = format_month_labels(&sorted_months);
    let series_data = group_monthly_revenue_by_plan(transactions, &sorted_months, rates);

    let mut chart = Chart::new()
        .title(
            Title::new()
                .text("Revenue by Plan")
                .subtext("Last twelve months, stacked by subscription plan")
                .left(20)
                .top("1%"),
        )
        .tooltip(currency_tooltip(display_currency))
        .legend(Legend::new().left(250).top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(90)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter(display_currency))),
        );

    for (plan, data) in series_data {
        let data: Vec<Option<f64>> = data
            .into_iter()
            .map(|value| value.map(|usd| rates.to_display(usd, display_currency.code())))
            .collect();

        chart = chart.series(
            bar::Bar::new()
                .name(plan)
                .stack("Revenue")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(data),
        );
    }

    chart
}

#[inline]
fn currency_formatter(display_currency: DisplayCurrency) -> JsFunction {
    let (locale, code) = match display_currency {
        DisplayCurrency::Usd => ("en-US", "USD"),
        DisplayCurrency::Vnd => ("vi-VN", "VND"),
    };

    JsFunction::new_with_args(
        "number",
        &format!(
            "const currencyFormatter = new Intl.NumberFormat('{locale}', {{
              style: 'currency',
              currency: '{code}'
            }});
            return (number) ? currencyFormatter.format(number) : \"-\";"
        ),
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip(display_currency: DisplayCurrency) -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter(display_currency))
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
