//! Comment thread mount points.
//!
//! Each component renders the container the matching embed widget looks
//! for. Attribute values are passed through untouched; host normalization
//! and validation happen when the embed initializes.

use leptos::prelude::*;

#[component]
pub fn CusdisComments(
    #[prop(into)] host: String,
    #[prop(into)] app_id: String,
    #[prop(into)] page_id: String,
    #[prop(optional, into)] page_title: Option<String>,
) -> impl IntoView {
    view! {
        <div
            id="cusdis_thread"
            class="comments comments--cusdis"
            data-cusdis-host=host
            data-cusdis-app-id=app_id
            data-cusdis-page-id=page_id
            data-cusdis-page-title=page_title
        ></div>
    }
}

#[component]
pub fn Remark42Comments(
    #[prop(into)] host: String,
    #[prop(into)] site_id: String,
    #[prop(into)] url: String,
) -> impl IntoView {
    view! {
        <div
            id="remark42"
            class="comments comments--remark42"
            data-remark-host=host
            data-remark-site-id=site_id
            data-remark-url=url
        ></div>
    }
}
