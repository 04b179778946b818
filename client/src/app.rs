//! Page behavior wiring.
//!
//! SYSTEM CONTEXT
//! ==============
//! The hydrate entry point calls [`start`] once per page load. Theme state is
//! initialized immediately; everything bound to page content is (re)bound on
//! first ready and after every in-place navigation:
//! theme toggles, both comment embeds, like buttons, and the radio player.
//! The radio player is persisted across navigations and its bound marker
//! keeps later passes from binding it again.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::embed::EmbedSystem;
use crate::embed::cusdis::Cusdis;
use crate::embed::remark42::Remark42;
use crate::host::{Env, Subscription};
use crate::net::api::{HttpLikeApi, LikeApi};
use crate::state::radio::RadioStore;
use crate::util::lifecycle::{NavigationTrigger, Once, auto_init};
use crate::util::like_buttons::{LikeClient, bind_like_buttons};
use crate::util::radio_player::bind_radio_player;
use crate::util::theme::ThemeEffects;

thread_local! {
    static STARTED: Once = const { Once::new() };
}

/// Wire every page behavior against the live browser page. Later calls are
/// ignored. Returns whether this call did the wiring.
pub fn start(env: Env) -> bool {
    STARTED.with(|once| {
        once.call(|| {
            let app = App::new(env, HttpLikeApi);
            let _ = app.mount();
        })
    })
}

pub struct App<A> {
    env: Env,
    theme: Rc<ThemeEffects>,
    cusdis: EmbedSystem<Cusdis>,
    remark42: EmbedSystem<Remark42>,
    likes: Rc<LikeClient<A>>,
    radio: RadioStore,
    toggles: RefCell<Option<Subscription>>,
}

impl<A: LikeApi + 'static> App<A> {
    pub fn new(env: Env, api: A) -> Rc<Self> {
        let theme = ThemeEffects::new(env.clone());
        Rc::new(Self {
            cusdis: EmbedSystem::new(Cusdis::new(&env), Rc::clone(&env.document), Rc::clone(&theme)),
            remark42: EmbedSystem::new(Remark42::new(&env), Rc::clone(&env.document), Rc::clone(&theme)),
            likes: LikeClient::new(env.clone(), api),
            radio: RadioStore::new(),
            toggles: RefCell::new(None),
            theme,
            env,
        })
    }

    pub fn theme(&self) -> &Rc<ThemeEffects> {
        &self.theme
    }

    pub fn radio(&self) -> &RadioStore {
        &self.radio
    }

    /// Apply the theme now and bind page content on ready and after every
    /// navigation. The handle detaches the navigation rebinding.
    pub fn mount(self: &Rc<Self>) -> Subscription {
        self.theme.init();
        let app = Rc::clone(self);
        auto_init(self.env.document.as_ref(), NavigationTrigger::AfterSwap, Rc::new(move || app.bind_page()))
    }

    fn bind_page(&self) {
        let previous = self.toggles.borrow_mut().take();
        if let Some(previous) = previous {
            previous.unsubscribe();
        }
        let toggles = self.theme.bind_toggles(&self.env.document.root());
        *self.toggles.borrow_mut() = toggles;

        self.cusdis.init();
        self.remark42.init();
        bind_like_buttons(&self.likes);
        bind_radio_player(&self.env.document, &self.radio);
    }
}
