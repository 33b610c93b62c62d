//! Query parameters and SQL filtering for the transactions browser.

use serde::{Deserialize, Deserializer, Serialize};
use time::{Date, macros::format_description};

/// Query parameters accepted by the transactions page, the CSV export, and
/// the report endpoint.
///
/// All fields are optional; an absent field places no constraint on the
/// result set. The date bounds are inclusive on both ends.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub(crate) struct TransactionsQuery {
    /// The 1-based page to display. Ignored by the export and report
    /// endpoints, which always cover the whole filtered set.
    pub(crate) page: Option<u64>,
    /// Earliest transaction date to include.
    #[serde(default, deserialize_with = "empty_date_as_none")]
    pub(crate) start_date: Option<Date>,
    /// Latest transaction date to include.
    #[serde(default, deserialize_with = "empty_date_as_none")]
    pub(crate) end_date: Option<Date>,
    /// Exact payment provider to match.
    pub(crate) provider: Option<String>,
    /// Exact subscription plan to match.
    pub(crate) plan: Option<String>,
    /// Exact lifecycle status to match.
    pub(crate) status: Option<String>,
}

/// Parse a `YYYY-MM-DD` date field, treating the empty string an untouched
/// form input submits as absent.
fn empty_date_as_none<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;

    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(text) => Date::parse(text, format_description!("[year]-[month]-[day]"))
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl TransactionsQuery {
    /// Drop empty-string fields, which HTML forms submit for untouched inputs.
    pub(crate) fn normalized(mut self) -> Self {
        for field in [&mut self.provider, &mut self.plan, &mut self.status] {
            if field.as_deref().is_some_and(str::is_empty) {
                *field = None;
            }
        }

        self
    }

    /// Build the SQL `WHERE` clause and its positional parameters.
    ///
    /// Returns an empty string when no filter is set.
    pub(crate) fn where_clause(&self) -> (String, Vec<String>) {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        let mut push = |condition: &str, value: String| {
            params.push(value);
            conditions.push(condition.replace('?', &format!("?{}", params.len())));
        };

        if let Some(start_date) = self.start_date {
            push("transaction_date >= ?", start_date.to_string());
        }

        if let Some(end_date) = self.end_date {
            push("transaction_date <= ?", end_date.to_string());
        }

        if let Some(provider) = &self.provider {
            push("payment_provider = ?", provider.clone());
        }

        if let Some(plan) = &self.plan {
            push("subscription_plan = ?", plan.clone());
        }

        if let Some(status) = &self.status {
            push("status = ?", status.clone());
        }

        if conditions.is_empty() {
            (String::new(), params)
        } else {
            (format!(" WHERE {}", conditions.join(" AND ")), params)
        }
    }

    /// Encode the filter (without the page) as a query string for pager and
    /// export links.
    pub(crate) fn to_query_string(&self) -> String {
        let mut parts = Vec::new();

        if let Some(start_date) = self.start_date {
            parts.push(format!("start_date={start_date}"));
        }

        if let Some(end_date) = self.end_date {
            parts.push(format!("end_date={end_date}"));
        }

        for (name, value) in [
            ("provider", &self.provider),
            ("plan", &self.plan),
            ("status", &self.status),
        ] {
            if let Some(value) = value {
                parts.push(format!("{name}={value}"));
            }
        }

        parts.join("&")
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::TransactionsQuery;

    #[test]
    fn empty_filter_has_no_where_clause() {
        let (clause, params) = TransactionsQuery::default().where_clause();

        assert_eq!(clause, "");
        assert!(params.is_empty());
    }

    #[test]
    fn date_bounds_use_inclusive_comparisons() {
        let query = TransactionsQuery {
            start_date: Some(date!(2025 - 04 - 01)),
            end_date: Some(date!(2025 - 04 - 30)),
            ..Default::default()
        };

        let (clause, params) = query.where_clause();

        assert_eq!(
            clause,
            " WHERE transaction_date >= ?1 AND transaction_date <= ?2"
        );
        assert_eq!(params, vec!["2025-04-01", "2025-04-30"]);
    }

    #[test]
    fn equality_filters_are_combined_with_and() {
        let query = TransactionsQuery {
            provider: Some("stripe".to_owned()),
            status: Some("completed".to_owned()),
            ..Default::default()
        };

        let (clause, params) = query.where_clause();

        assert_eq!(clause, " WHERE payment_provider = ?1 AND status = ?2");
        assert_eq!(params, vec!["stripe", "completed"]);
    }

    #[test]
    fn normalized_drops_empty_strings() {
        let query = TransactionsQuery {
            provider: Some("".to_owned()),
            plan: Some("monthly".to_owned()),
            ..Default::default()
        }
        .normalized();

        assert_eq!(query.provider, None);
        assert_eq!(query.plan.as_deref(), Some("monthly"));
    }

    #[test]
    fn empty_date_fields_deserialize_as_absent() {
        let parsed: TransactionsQuery =
            serde_html_form::from_str("start_date=&end_date=&provider=stripe").unwrap();

        assert_eq!(parsed.start_date, None);
        assert_eq!(parsed.end_date, None);
        assert_eq!(parsed.provider.as_deref(), Some("stripe"));
    }

    #[test]
    fn query_string_round_trips_through_serde() {
        let query = TransactionsQuery {
            start_date: Some(date!(2025 - 01 - 01)),
            provider: Some("momo".to_owned()),
            ..Default::default()
        };

        let parsed: TransactionsQuery =
            serde_html_form::from_str(&query.to_query_string()).unwrap();

        assert_eq!(parsed, query);
    }
}
