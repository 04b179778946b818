//! Like button behavior.
//!
//! DESIGN
//! ======
//! Local-first: the cached personal count renders before any request, then
//! the server status is merged in. Every render re-queries the live
//! `[data-like-button]` / `[data-like-count]` elements, so a response that
//! lands after a navigation updates the new page rather than detached nodes.
//!
//! Reconciliation keeps the personal count monotonic for the session: it
//! becomes `max(server, shown)`. A server count ahead of the local guess
//! (another tab, another device behind the same address) replaces it. The
//! total is rendered exactly as the server reports it.
//!
//! ERROR HANDLING
//! ==============
//! Network and storage failures are logged. The optimistic state stays on
//! screen; there is no error UI. At the cap the button shakes instead.

#[cfg(test)]
#[path = "like_buttons_test.rs"]
mod like_buttons_test;

use std::rc::Rc;

use leptos::logging::warn;
use wire::{LIKE_STORAGE_KEY, LikeStatus, MAX_LIKES_PER_USER};

use crate::host::Env;
use crate::net::api::LikeApi;
use crate::state::likes::LikeCache;
use crate::util::storage::{load_json, save_json};
use crate::util::task::spawn_local;

pub const BUTTON_SELECTOR: &str = "[data-like-button]";
pub const COUNT_SELECTOR: &str = "[data-like-count]";
pub const BOUND_ATTR: &str = "data-like-bound";
pub const ANIMATION_ATTR: &str = "data-like-animation";

/// Feedback animation played on every like button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LikeAnimation {
    /// Click refused at the cap.
    Shake,
    /// Click accepted.
    Pop,
}

impl LikeAnimation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shake => "shake",
            Self::Pop => "pop",
        }
    }

    pub fn duration_ms(self) -> u32 {
        match self {
            Self::Shake => 300,
            Self::Pop => 200,
        }
    }
}

/// What a click did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Already at the cap locally; nothing was sent.
    Rejected,
    /// Counted locally and sent. `confirmed` holds the rendered status once
    /// the server answered.
    Accepted { optimistic: u32, confirmed: Option<LikeView> },
}

/// Values currently rendered into the like elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LikeView {
    pub count: u64,
    pub user_likes: u32,
    pub max_reached: bool,
}

pub struct LikeClient<A> {
    env: Env,
    api: A,
}

impl<A: LikeApi + 'static> LikeClient<A> {
    pub fn new(env: Env, api: A) -> Rc<Self> {
        Rc::new(Self { env, api })
    }

    fn cache(&self) -> LikeCache {
        load_json(self.env.storage.as_ref(), LIKE_STORAGE_KEY).unwrap_or_default()
    }

    fn save(&self, cache: &LikeCache) {
        save_json(self.env.storage.as_ref(), LIKE_STORAGE_KEY, cache);
    }

    /// Render the cached count for `slug`, then merge in the server status.
    pub async fn load(&self, slug: &str) -> LikeView {
        let local = self.cache().get(slug);
        let mut view = LikeView { count: u64::from(local), user_likes: local, max_reached: local >= MAX_LIKES_PER_USER };
        self.render(view);

        match self.api.fetch_status(slug).await {
            Ok(status) => {
                let mut cache = self.cache();
                let before = cache.get(slug);
                let merged = cache.reconcile(slug, status.user_likes);
                if merged != before {
                    self.save(&cache);
                }
                view = merged_view(status, merged);
                self.render(view);
            }
            Err(e) => warn!("likes: could not fetch status for {slug}: {e}"),
        }
        view
    }

    /// Handle one click on a like button for `slug`.
    pub async fn click(&self, slug: &str) -> ClickOutcome {
        let mut cache = self.cache();
        if cache.is_capped(slug) {
            self.animate(LikeAnimation::Shake);
            return ClickOutcome::Rejected;
        }

        let optimistic = cache.get(slug) + 1;
        cache.set(slug, optimistic);
        self.save(&cache);
        for button in self.env.document.query_all(BUTTON_SELECTOR) {
            button.set_attribute("data-liked", "");
            button.set_attribute("data-user-likes", &optimistic.to_string());
        }
        self.animate(LikeAnimation::Pop);

        let confirmed = match self.api.post_like(slug).await {
            Ok(status) => {
                let mut cache = self.cache();
                let personal = status.user_likes.max(cache.get(slug));
                cache.set(slug, personal);
                self.save(&cache);
                let view = merged_view(status, personal);
                self.render(view);
                Some(view)
            }
            Err(e) => {
                warn!("likes: could not record like for {slug}: {e}");
                None
            }
        };
        ClickOutcome::Accepted { optimistic, confirmed }
    }

    fn render(&self, view: LikeView) {
        let document = &self.env.document;
        for button in document.query_all(BUTTON_SELECTOR) {
            if view.user_likes > 0 {
                button.set_attribute("data-liked", "");
            } else {
                button.remove_attribute("data-liked");
            }
            if view.max_reached {
                button.set_attribute("data-max-reached", "");
            } else {
                button.remove_attribute("data-max-reached");
            }
            button.set_attribute("data-user-likes", &view.user_likes.to_string());
        }
        let text = if view.count > 0 { view.count.to_string() } else { String::new() };
        for counter in document.query_all(COUNT_SELECTOR) {
            counter.set_text(&text);
        }
    }

    fn animate(&self, animation: LikeAnimation) {
        for button in self.env.document.query_all(BUTTON_SELECTOR) {
            button.set_attribute(ANIMATION_ATTR, animation.as_str());
            let target = Rc::clone(&button);
            self.env.timers.set_timeout(
                animation.duration_ms(),
                Box::new(move || {
                    if target.attribute(ANIMATION_ATTR).as_deref() == Some(animation.as_str()) {
                        target.remove_attribute(ANIMATION_ATTR);
                    }
                }),
            );
        }
    }
}

fn merged_view(status: LikeStatus, personal: u32) -> LikeView {
    LikeView {
        count: status.count,
        user_likes: personal,
        max_reached: status.max_reached || personal >= status.max_likes,
    }
}

/// Bind click handling on unbound like buttons and load the status of the
/// first one. Returns the number of newly bound buttons.
pub fn bind_like_buttons<A: LikeApi + 'static>(client: &Rc<LikeClient<A>>) -> usize {
    let buttons = client.env.document.query_all(BUTTON_SELECTOR);
    let mut bound = 0;
    for button in &buttons {
        let Some(slug) = button.attribute("data-slug").filter(|s| !s.is_empty()) else {
            continue;
        };
        if button.has_attribute(BOUND_ATTR) {
            continue;
        }
        button.set_attribute(BOUND_ATTR, "");
        let client = Rc::clone(client);
        let _ = button.on_click(Rc::new(move || {
            let client = Rc::clone(&client);
            let slug = slug.clone();
            spawn_local(async move {
                client.click(&slug).await;
            });
        }));
        bound += 1;
    }

    if let Some(slug) = buttons.first().and_then(|b| b.attribute("data-slug")).filter(|s| !s.is_empty()) {
        let client = Rc::clone(client);
        spawn_local(async move {
            client.load(&slug).await;
        });
    }
    bound
}
