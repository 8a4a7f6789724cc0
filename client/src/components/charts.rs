//! Sample-data dashboard widgets.
//!
//! DESIGN
//! ======
//! Every widget draws from `util::sample` with a seed owned by the page, so a
//! refresh regenerates all charts together. Premium-only panels take an
//! `is_premium` signal and render a locked teaser otherwise.

use leptos::prelude::*;

use crate::util::sample::{METRICS, SeriesKind, bar_heights, series};

const SERIES_POINTS: usize = 30;
const HEATMAP_DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const HEATMAP_HOURS: usize = 12;

#[component]
pub fn MetricCards() -> impl IntoView {
    view! {
        <div class="metric-cards">
            {METRICS
                .iter()
                .map(|metric| {
                    let trend = if metric.is_positive() { "metric-card__change--up" } else { "metric-card__change--down" };
                    view! {
                        <div class="metric-card">
                            <span class="metric-card__title">{metric.title}</span>
                            <span class="metric-card__value">{metric.value}</span>
                            <span class=format!("metric-card__change {trend}")>
                                {format!("{:.1}%", metric.change.abs())}
                            </span>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}

#[component]
pub fn AnalyticsChart(#[prop(into)] seed: Signal<u64>, #[prop(into)] is_premium: Signal<bool>) -> impl IntoView {
    let selected = RwSignal::new(SeriesKind::Users);
    let heights = move || bar_heights(&series(selected.get(), seed.get(), SERIES_POINTS));

    view! {
        <section class="chart-card">
            <header class="chart-card__header">
                <h2>"Analytics Overview"</h2>
                <div class="chart-card__tabs">
                    {SeriesKind::ALL
                        .into_iter()
                        .map(|kind| {
                            view! {
                                <button
                                    class="chart-card__tab"
                                    class:chart-card__tab--active=move || selected.get() == kind
                                    on:click=move |_| selected.set(kind)
                                >
                                    {kind.label()}
                                </button>
                            }
                        })
                        .collect_view()}
                </div>
            </header>
            <div class="bar-chart">
                {move || {
                    heights()
                        .into_iter()
                        .map(|h| view! { <span class="bar-chart__bar" style=format!("height: {h}%")></span> })
                        .collect_view()
                }}
            </div>
            <Show
                when=move || is_premium.get()
                fallback=|| {
                    view! {
                        <p class="chart-card__teaser">
                            "Upgrade to Pro for advanced filters and data export."
                        </p>
                    }
                }
            >
                <p class="chart-card__premium">"Advanced filters and export enabled."</p>
            </Show>
        </section>
    }
}

/// Activity heat map: day-of-week by hour, locked for free accounts.
#[component]
pub fn HeatMap(#[prop(into)] seed: Signal<u64>, #[prop(into)] is_premium: Signal<bool>) -> impl IntoView {
    let cells = move || {
        let values = series(SeriesKind::Engagement, seed.get(), HEATMAP_DAYS.len() * HEATMAP_HOURS);
        bar_heights(&values)
    };

    view! {
        <section class="chart-card heat-map" class:heat-map--locked=move || !is_premium.get()>
            <header class="chart-card__header">
                <h2>"Engagement Heat Map"</h2>
            </header>
            <div class="heat-map__grid">
                {move || {
                    let cells = cells();
                    HEATMAP_DAYS
                        .iter()
                        .enumerate()
                        .map(|(row, day)| {
                            let start = row * HEATMAP_HOURS;
                            let row_cells = cells[start..start + HEATMAP_HOURS].to_vec();
                            view! {
                                <div class="heat-map__row">
                                    <span class="heat-map__day">{*day}</span>
                                    {row_cells
                                        .into_iter()
                                        .map(|pct| {
                                            view! {
                                                <span
                                                    class="heat-map__cell"
                                                    style=format!("opacity: {:.2}", f64::from(pct) / 100.0)
                                                ></span>
                                            }
                                        })
                                        .collect_view()}
                                </div>
                            }
                        })
                        .collect_view()
                }}
            </div>
            <Show when=move || !is_premium.get()>
                <div class="heat-map__lock">
                    <p>"Unlock advanced visualizations"</p>
                    <p class="heat-map__lock-sub">"with Premium Subscription"</p>
                </div>
            </Show>
        </section>
    }
}
