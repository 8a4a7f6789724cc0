//! Public landing page.

use leptos::prelude::*;

use crate::state::auth::AuthState;

const FEATURES: [(&str, &str); 4] = [
    (
        "Interactive Visualizations",
        "Explore your data with beautiful, interactive charts and graphs with smooth transitions.",
    ),
    ("Dark Theme Interface", "Reduce eye strain with our sleek dark-themed dashboard designed for extended use."),
    ("Advanced Filtering", "Filter and segment your data with powerful tools to uncover hidden insights."),
    (
        "Predictive Analytics",
        "Premium features include AI-powered predictions to help you make data-driven decisions.",
    ),
];

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let signed_in = move || matches!(auth.get(), AuthState::Authenticated(_));

    view! {
        <div class="home-page">
            <header class="home-header">
                <a class="home-header__brand" href="/">"Veltic"</a>
                <nav class="home-header__actions">
                    <Show
                        when=signed_in
                        fallback=|| {
                            view! {
                                <a class="home-header__link" href="/login">"Sign in"</a>
                                <a class="home-header__cta" href="/signup">"Get started"</a>
                            }
                        }
                    >
                        <a class="home-header__cta" href="/dashboard">"Dashboard"</a>
                    </Show>
                </nav>
            </header>
            <main>
                <section class="hero">
                    <h1>"Collaborative analytics for your whole team"</h1>
                    <p>"Explore dashboards together with live presence, cursors, and comments."</p>
                    <div class="hero__actions">
                        <a class="hero__cta" href="/signup">"Start for free"</a>
                        <a class="hero__secondary" href="/plans">"View plans"</a>
                    </div>
                    <ul class="hero__badges">
                        <li>"No credit card required"</li>
                        <li>"Free tier available"</li>
                    </ul>
                </section>
                <section class="features">
                    {FEATURES
                        .iter()
                        .map(|(title, body)| {
                            view! {
                                <article class="feature">
                                    <h3>{*title}</h3>
                                    <p>{*body}</p>
                                </article>
                            }
                        })
                        .collect_view()}
                </section>
            </main>
            <footer class="home-footer">"© Veltic"</footer>
        </div>
    }
}
