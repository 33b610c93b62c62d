//! Cohort, funnel, and churn aggregation over subscriber rows.

use std::collections::HashMap;

use time::Date;

use super::models::{STATUS_ACTIVE, STATUS_CHURNED, Subscriber};

/// One signup cohort, keyed by the month the subscribers signed up.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Cohort {
    /// The first day of the cohort's signup month.
    pub(super) month: Date,
    /// How many subscribers signed up in the month.
    pub(super) signups: u64,
    /// How many of them went on to pay.
    pub(super) conversions: u64,
}

impl Cohort {
    /// The share of the cohort that converted, between 0 and 1.
    pub(super) fn conversion_rate(&self) -> f64 {
        if self.signups == 0 {
            0.0
        } else {
            self.conversions as f64 / self.signups as f64
        }
    }
}

/// One stage of the subscription funnel.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct FunnelStage {
    /// Human-readable stage name.
    pub(super) label: &'static str,
    /// How many subscribers reached the stage.
    pub(super) count: u64,
}

/// Group subscribers into signup cohorts, oldest month first.
pub(super) fn signup_cohorts(subscribers: &[Subscriber]) -> Vec<Cohort> {
    let mut by_month: HashMap<Date, (u64, u64)> = HashMap::new();

    for subscriber in subscribers {
        let month = month_of(subscriber.signup_date);
        let entry = by_month.entry(month).or_insert((0, 0));
        entry.0 += 1;
        if subscriber.converted_date.is_some() {
            entry.1 += 1;
        }
    }

    let mut cohorts: Vec<Cohort> = by_month
        .into_iter()
        .map(|(month, (signups, conversions))| Cohort {
            month,
            signups,
            conversions,
        })
        .collect();
    cohorts.sort_by_key(|cohort| cohort.month);
    cohorts
}

/// Build the signup-to-retention funnel.
///
/// Each stage counts a subset of the previous one, so the counts are
/// non-increasing by construction:
/// 1. everyone who signed up,
/// 2. those who converted to a paid plan,
/// 3. those who converted and are still active.
pub(super) fn conversion_funnel(subscribers: &[Subscriber]) -> [FunnelStage; 3] {
    let signed_up = subscribers.len() as u64;
    let converted = subscribers
        .iter()
        .filter(|s| s.converted_date.is_some())
        .count() as u64;
    let retained = subscribers
        .iter()
        .filter(|s| s.converted_date.is_some() && s.status == STATUS_ACTIVE)
        .count() as u64;

    [
        FunnelStage {
            label: "Signed up",
            count: signed_up,
        },
        FunnelStage {
            label: "Converted to paid",
            count: converted,
        },
        FunnelStage {
            label: "Still active",
            count: retained,
        },
    ]
}

/// Count churned subscribers per month of expiry, oldest month first.
///
/// Churned rows without an expiry date cannot be bucketed and are skipped.
pub(super) fn churn_by_month(subscribers: &[Subscriber]) -> Vec<(Date, u64)> {
    let mut by_month: HashMap<Date, u64> = HashMap::new();

    for subscriber in subscribers {
        if subscriber.status != STATUS_CHURNED {
            continue;
        }

        let Some(expiry_date) = subscriber.expiry_date else {
            continue;
        };

        *by_month.entry(month_of(expiry_date)).or_insert(0) += 1;
    }

    let mut churn: Vec<(Date, u64)> = by_month.into_iter().collect();
    churn.sort_by_key(|(month, _)| *month);
    churn
}

/// Count subscribers per plan, largest plan first with ties broken by name.
pub(super) fn plan_mix(subscribers: &[Subscriber]) -> Vec<(String, u64)> {
    let mut by_plan: HashMap<&str, u64> = HashMap::new();

    for subscriber in subscribers {
        *by_plan.entry(subscriber.plan.as_str()).or_insert(0) += 1;
    }

    let mut mix: Vec<(String, u64)> = by_plan
        .into_iter()
        .map(|(plan, count)| (plan.to_owned(), count))
        .collect();
    mix.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    mix
}

fn month_of(date: Date) -> Date {
    date.replace_day(1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{
        super::models::Subscriber, churn_by_month, conversion_funnel, plan_mix, signup_cohorts,
    };

    fn make_subscriber(
        signup: time::Date,
        converted: Option<time::Date>,
        expiry: Option<time::Date>,
        status: &str,
    ) -> Subscriber {
        Subscriber {
            plan: "monthly".to_owned(),
            signup_date: signup,
            converted_date: converted,
            expiry_date: expiry,
            status: status.to_owned(),
        }
    }

    #[test]
    fn cohorts_group_by_signup_month() {
        let subscribers = vec![
            make_subscriber(date!(2025 - 01 - 05), Some(date!(2025 - 01 - 10)), None, "active"),
            make_subscriber(date!(2025 - 01 - 20), None, None, "trialing"),
            make_subscriber(date!(2025 - 02 - 01), None, None, "trialing"),
        ];

        let cohorts = signup_cohorts(&subscribers);

        assert_eq!(cohorts.len(), 2);
        assert_eq!(cohorts[0].month, date!(2025 - 01 - 01));
        assert_eq!(cohorts[0].signups, 2);
        assert_eq!(cohorts[0].conversions, 1);
        assert_eq!(cohorts[0].conversion_rate(), 0.5);
        assert_eq!(cohorts[1].signups, 1);
        assert_eq!(cohorts[1].conversion_rate(), 0.0);
    }

    #[test]
    fn funnel_counts_are_non_increasing() {
        let subscribers = vec![
            make_subscriber(date!(2025 - 01 - 05), Some(date!(2025 - 01 - 10)), None, "active"),
            make_subscriber(
                date!(2025 - 01 - 06),
                Some(date!(2025 - 01 - 12)),
                Some(date!(2025 - 03 - 01)),
                "churned",
            ),
            make_subscriber(date!(2025 - 01 - 07), None, None, "trialing"),
        ];

        let funnel = conversion_funnel(&subscribers);

        assert_eq!(funnel[0].count, 3);
        assert_eq!(funnel[1].count, 2);
        assert_eq!(funnel[2].count, 1);
        assert!(funnel.windows(2).all(|pair| pair[0].count >= pair[1].count));
    }

    #[test]
    fn funnel_is_non_increasing_for_any_input() {
        // A subscriber marked active without a conversion date must not push a
        // later stage above an earlier one.
        let subscribers = vec![make_subscriber(date!(2025 - 01 - 05), None, None, "active")];

        let funnel = conversion_funnel(&subscribers);

        assert!(funnel.windows(2).all(|pair| pair[0].count >= pair[1].count));
    }

    #[test]
    fn plan_mix_sorts_by_count_then_name() {
        let mut subscribers = vec![
            make_subscriber(date!(2025 - 01 - 05), None, None, "trialing"),
            make_subscriber(date!(2025 - 01 - 06), None, None, "trialing"),
        ];
        let mut yearly = make_subscriber(date!(2025 - 01 - 07), None, None, "trialing");
        yearly.plan = "yearly".to_owned();
        subscribers.push(yearly);

        let mix = plan_mix(&subscribers);

        assert_eq!(
            mix,
            vec![("monthly".to_owned(), 2), ("yearly".to_owned(), 1)]
        );
    }

    #[test]
    fn churn_groups_by_expiry_month() {
        let subscribers = vec![
            make_subscriber(
                date!(2025 - 01 - 05),
                Some(date!(2025 - 01 - 10)),
                Some(date!(2025 - 03 - 15)),
                "churned",
            ),
            make_subscriber(
                date!(2025 - 01 - 06),
                Some(date!(2025 - 01 - 11)),
                Some(date!(2025 - 03 - 20)),
                "churned",
            ),
            // Churned but without an expiry date, so it cannot be bucketed.
            make_subscriber(date!(2025 - 01 - 07), None, None, "churned"),
            // Active with a future expiry, so it does not count as churn.
            make_subscriber(
                date!(2025 - 01 - 08),
                Some(date!(2025 - 01 - 12)),
                Some(date!(2026 - 01 - 08)),
                "active",
            ),
        ];

        let churn = churn_by_month(&subscribers);

        assert_eq!(churn, vec![(date!(2025 - 03 - 01), 2)]);
    }
}
