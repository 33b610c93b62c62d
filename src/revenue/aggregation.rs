//! Transaction aggregation for the revenue charts and tables.
//!
//! Every amount is converted to USD through the session rate table before it
//! is bucketed, so each transaction contributes to exactly one bucket per
//! grouping.

use std::collections::{HashMap, HashSet};

use time::Date;

use crate::currency::RateTable;

use super::models::Transaction;

/// Label used when a transaction has no subscription plan.
pub(super) const NO_PLAN_LABEL: &str = "One-off";

/// Sums USD-converted amounts per calendar month.
///
/// # Returns
/// HashMap mapping each month (as Date with day=1) to the total revenue in USD.
pub(super) fn totals_by_month(
    transactions: &[Transaction],
    rates: &RateTable,
) -> HashMap<Date, f64> {
    let mut totals = HashMap::new();

    for transaction in transactions {
        let month = month_of(transaction.date);
        let amount_usd = rates.to_usd(transaction.amount, &transaction.currency);
        *totals.entry(month).or_insert(0.0) += amount_usd;
    }

    totals
}

/// Sums USD-converted amounts per payment provider.
pub(super) fn totals_by_provider(
    transactions: &[Transaction],
    rates: &RateTable,
) -> HashMap<String, f64> {
    let mut totals = HashMap::new();

    for transaction in transactions {
        let amount_usd = rates.to_usd(transaction.amount, &transaction.currency);
        *totals
            .entry(transaction.payment_provider.clone())
            .or_insert(0.0) += amount_usd;
    }

    totals
}

/// Extracts unique months from transactions in chronological order.
pub(super) fn get_sorted_months(transactions: &[Transaction]) -> Vec<Date> {
    let mut months = HashSet::new();

    for transaction in transactions {
        months.insert(month_of(transaction.date));
    }

    let mut sorted: Vec<_> = months.into_iter().collect();
    sorted.sort();
    sorted
}

/// Formats month dates as three-letter abbreviations.
pub(super) fn format_month_labels(months: &[Date]) -> Vec<String> {
    use time::Month;
    let month_to_str = |date: &Date| {
        match date.month() {
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
        .to_string()
    };

    months.iter().map(month_to_str).collect()
}

/// Converts monthly totals into sorted labels and values for charting.
pub(super) fn get_monthly_label_and_value_pairs(
    monthly_totals: &HashMap<Date, f64>,
) -> (Vec<String>, Vec<f64>) {
    let mut sorted_months: Vec<Date> = monthly_totals.keys().copied().collect();
    sorted_months.sort();

    let labels = format_month_labels(&sorted_months);
    let values = sorted_months
        .iter()
        .map(|month| monthly_totals[month])
        .collect();

    (labels, values)
}

/// Groups revenue by subscription plan and calculates monthly USD totals.
///
/// Plans are sorted alphabetically with the one-off bucket last. Returns data
/// in the shape ECharts stacked bar charts expect, with `None` for months a
/// plan earned nothing.
pub(super) fn group_monthly_revenue_by_plan(
    transactions: &[Transaction],
    sorted_months: &[Date],
    rates: &RateTable,
) -> Vec<(String, Vec<Option<f64>>)> {
    let mut transactions_by_plan: HashMap<&str, Vec<&Transaction>> = HashMap::new();

    for transaction in transactions {
        let plan = transaction
            .subscription_plan
            .as_deref()
            .unwrap_or(NO_PLAN_LABEL);
        transactions_by_plan.entry(plan).or_default().push(transaction);
    }

    let mut sorted_plans: Vec<&str> = transactions_by_plan
        .keys()
        .copied()
        .filter(|&plan| plan != NO_PLAN_LABEL)
        .collect();
    sorted_plans.sort();

    if transactions_by_plan.contains_key(NO_PLAN_LABEL) {
        sorted_plans.push(NO_PLAN_LABEL);
    }

    sorted_plans
        .into_iter()
        .map(|plan| {
            let monthly_data =
                calculate_monthly_revenue(&transactions_by_plan[plan], sorted_months, rates);
            (plan.to_owned(), monthly_data)
        })
        .collect()
}

/// Calculates monthly USD totals for one plan's transactions.
fn calculate_monthly_revenue(
    transactions: &[&Transaction],
    sorted_months: &[Date],
    rates: &RateTable,
) -> Vec<Option<f64>> {
    let mut totals_by_month: HashMap<Date, f64> = HashMap::new();

    for transaction in transactions {
        let month = month_of(transaction.date);
        let amount_usd = rates.to_usd(transaction.amount, &transaction.currency);
        *totals_by_month.entry(month).or_insert(0.0) += amount_usd;
    }

    sorted_months
        .iter()
        .map(|month| totals_by_month.get(month).copied())
        .collect()
}

fn month_of(date: Date) -> Date {
    // Day 1 exists in every month, so this cannot fail.
    date.replace_day(1).unwrap_or(date)
}
