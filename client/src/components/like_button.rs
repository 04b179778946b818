//! Like button for a post.
//!
//! SYSTEM CONTEXT
//! ==============
//! Markup only. `util::like_buttons` binds every `[data-like-button]` after
//! each navigation and renders counts into `[data-like-count]`.

use leptos::prelude::*;

#[component]
pub fn LikeButton(#[prop(into)] slug: String) -> impl IntoView {
    view! {
        <button type="button" class="like-button" data-like-button="" data-slug=slug aria-label="Like this post">
            <span class="like-button__icon" aria-hidden="true">"\u{2665}"</span>
            <span class="like-button__count" data-like-count=""></span>
        </button>
    }
}
