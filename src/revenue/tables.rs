//! Table views for the revenue page.

use maud::{Markup, html};

use crate::{
    currency::{DisplayCurrency, RateTable},
    html::{TABLE_CELL_STYLE, TABLE_ROW_STYLE, format_amount},
};

use super::{
    aggregation::totals_by_month,
    models::{MonthlyRevenueSummary, Transaction},
};

const TABLE_HEADER_CELL_STYLE: &str = "px-3 py-3 text-center min-w-[100px]";
const TABLE_HEADER_FIRST_CELL_STYLE: &str =
    "px-3 py-3 sticky left-0 bg-gray-100 dark:bg-gray-700 z-10 font-semibold";
const TABLE_STICKY_CELL_STYLE: &str = "px-3 py-4 font-medium text-gray-900 dark:text-white sticky left-0 bg-white dark:bg-gray-800 z-10";
const TABLE_DATA_CELL_STYLE: &str = "text-center whitespace-nowrap";

/// Renders the headline revenue figures for the trailing year.
pub(super) fn revenue_summary_table(
    transactions: &[Transaction],
    rates: &RateTable,
    display_currency: DisplayCurrency,
) -> Markup {
    let monthly_totals = totals_by_month(transactions, rates);

    if monthly_totals.is_empty() {
        return html! {};
    }

    let total_usd: f64 = monthly_totals.values().sum();
    let monthly_avg_usd = total_usd / monthly_totals.len() as f64;

    let format = |usd: f64| {
        format_amount(
            rates.to_display(usd, display_currency.code()),
            display_currency,
        )
    };

    html! {
        div {
            h3 class="text-xl font-semibold mb-4" { "Revenue Summary" }

            div class="overflow-x-auto rounded-lg shadow" {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                    thead class="text-xs text-gray-900 uppercase bg-gray-100 dark:bg-gray-700 dark:text-gray-400" {
                        tr {
                            th scope="col" class={(TABLE_HEADER_FIRST_CELL_STYLE) " text-left"} { "" }
                            th scope="col" class={(TABLE_HEADER_CELL_STYLE) " font-semibold"} {
                                "Monthly Avg"
                            }
                            th scope="col" class={(TABLE_HEADER_CELL_STYLE) " font-bold"} {
                                "Total"
                            }
                        }
                    }
                    tbody {
                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class={(TABLE_STICKY_CELL_STYLE) " text-left"} {
                                "Revenue"
                            }
                            td class={(TABLE_CELL_STYLE) " " (TABLE_DATA_CELL_STYLE)} {
                                (format(monthly_avg_usd))
                            }
                            td class={(TABLE_CELL_STYLE) " " (TABLE_DATA_CELL_STYLE) " font-bold"} {
                                (format(total_usd))
                            }
                        }

                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class={(TABLE_STICKY_CELL_STYLE) " text-left"} {
                                "Transactions"
                            }
                            td class={(TABLE_CELL_STYLE) " " (TABLE_DATA_CELL_STYLE)} { "—" }
                            td class={(TABLE_CELL_STYLE) " " (TABLE_DATA_CELL_STYLE) " font-bold"} {
                                (transactions.len())
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the precomputed MRR summary, newest month first.
///
/// `churned_subscribers` is shown as a footer row when available.
pub(super) fn mrr_summary_table(
    summaries: &[MonthlyRevenueSummary],
    churned_subscribers: Option<i64>,
    rates: &RateTable,
    display_currency: DisplayCurrency,
) -> Markup {
    if summaries.is_empty() {
        return html! {};
    }

    html! {
        div {
            h3 class="text-xl font-semibold mb-4" { "Monthly Recurring Revenue" }

            div class="overflow-x-auto rounded-lg shadow" {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                    thead class="text-xs text-gray-900 uppercase bg-gray-100 dark:bg-gray-700 dark:text-gray-400" {
                        tr {
                            th scope="col" class={(TABLE_HEADER_FIRST_CELL_STYLE) " text-left"} {
                                "Month"
                            }
                            th scope="col" class={(TABLE_HEADER_CELL_STYLE) " font-semibold"} {
                                "MRR"
                            }
                            th scope="col" class={(TABLE_HEADER_CELL_STYLE) " font-semibold"} {
                                "Active Subscriptions"
                            }
                        }
                    }
                    tbody {
                        @for summary in summaries {
                            tr class=(TABLE_ROW_STYLE) {
                                th scope="row" class={(TABLE_STICKY_CELL_STYLE) " text-left"} {
                                    (format!("{} {}", summary.month.month(), summary.month.year()))
                                }
                                td class={(TABLE_CELL_STYLE) " " (TABLE_DATA_CELL_STYLE)} {
                                    (format_amount(
                                        rates.to_display(summary.mrr_usd, display_currency.code()),
                                        display_currency,
                                    ))
                                }
                                td class={(TABLE_CELL_STYLE) " " (TABLE_DATA_CELL_STYLE)} {
                                    (summary.active_subscriptions)
                                }
                            }
                        }

                        @if let Some(churned) = churned_subscribers {
                            tr class=(TABLE_ROW_STYLE) {
                                th scope="row" class={(TABLE_STICKY_CELL_STYLE) " text-left"} {
                                    "Churned subscribers"
                                }
                                td class={(TABLE_CELL_STYLE) " " (TABLE_DATA_CELL_STYLE) " font-bold"} {
                                    (churned)
                                }
                                td class={(TABLE_CELL_STYLE) " " (TABLE_DATA_CELL_STYLE)} { "" }
                            }
                        }
                    }
                }
            }
        }
    }
}
