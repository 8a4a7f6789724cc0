//! Main product view: analytics plus live collaboration chrome.

use leptos::prelude::*;

use crate::components::collab_identity::CollabDocument;
use crate::components::top_nav::TopNav;
use crate::pages::analytics::AnalyticsView;
use crate::util::collab::DASHBOARD_DOCUMENT;

#[component]
pub fn DashboardPage() -> impl IntoView {
    view! {
        <div class="app-page">
            <CollabDocument name=DASHBOARD_DOCUMENT/>
            <TopNav/>
            <main class="app-page__main">
                <velt-presence></velt-presence>
                <velt-cursor></velt-cursor>
                <AnalyticsView/>
                <velt-comments-sidebar></velt-comments-sidebar>
                <div class="comment-tool">
                    <velt-comment-tool></velt-comment-tool>
                </div>
            </main>
        </div>
    }
}
