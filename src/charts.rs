//! Shared plumbing for embedding ECharts visualizations in a page.
//!
//! Each dashboard page builds its own `charming::Chart` configurations; this
//! module renders the HTML containers and the initialization script that
//! wires them to the ECharts runtime.

use maud::{Markup, PreEscaped, html};

use crate::html::HeadElement;

/// The ECharts bundle served from the static directory.
pub const ECHARTS_SCRIPT: &str = "/static/echarts.6.0.0.min.js";

/// A chart with its HTML container ID and ECharts configuration.
pub struct PageChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for a page's charts.
pub fn charts_view(charts: &[PageChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for a page's charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub fn charts_script(charts: &[PageChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::html::HeadElement;

    use super::{PageChart, charts_script, charts_view};

    fn test_charts() -> Vec<PageChart> {
        vec![
            PageChart {
                id: "first-chart",
                options: "{}".to_owned(),
            },
            PageChart {
                id: "second-chart",
                options: "{}".to_owned(),
            },
        ]
    }

    #[test]
    fn renders_one_container_per_chart() {
        let markup = charts_view(&test_charts()).into_string();
        let html = Html::parse_fragment(&markup);

        for id in ["#first-chart", "#second-chart"] {
            let selector = Selector::parse(id).unwrap();
            assert!(html.select(&selector).next().is_some(), "missing {id}");
        }
    }

    #[test]
    fn script_initializes_each_chart() {
        let HeadElement::ScriptSource(script) = charts_script(&test_charts()) else {
            panic!("expected inline script");
        };

        assert!(script.0.contains("first-chart"));
        assert!(script.0.contains("second-chart"));
        assert!(script.0.contains("echarts.init"));
    }
}
