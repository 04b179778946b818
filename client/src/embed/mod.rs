//! Third-party comment embeds.
//!
//! DESIGN
//! ======
//! [`EmbedSystem`] is the shared controller and [`EmbedWidget`] supplies the
//! per-SDK pieces: script URL, container selector, config parsing, the
//! bootstrap call, and optional theme sync and teardown.
//!
//! Per container, in order: widget cleanup, capture the theme, build the
//! config, replace this system's theme subscription (widgets that sync
//! theme only), ensure the shared `<script>` exists, then initialize now if
//! the script is marked loaded, or queue the config and initialize on the
//! script's `load` event otherwise.
//!
//! The script element is a page-wide singleton per widget kind. Its marker
//! attribute doubles as load state (`pending` / `loaded`), so a script left
//! over from a previous navigation is reused, never duplicated.
//!
//! While the script is pending, a system holds a single `load` listener and
//! a queue of configs from the latest [`EmbedSystem::init`] pass. A new pass
//! replaces the queue, so navigating away before the script loads never
//! initializes the previous page's containers.
//!
//! TRADE-OFFS
//! ==========
//! One theme subscription per system, not per container. With several
//! containers on a page only the last one keeps receiving theme updates;
//! pages carry a single comment thread, so this is not worth tracking.


pub mod cusdis;
pub mod remark42;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::logging::warn;

use crate::host::{Document, ElementRef, HostError, Subscription};
use crate::util::theme::ThemeEffects;
use crate::util::theme_core::ThemeState;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmbedError {
    #[error("container is missing {0}")]
    MissingAttribute(&'static str),
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Load state recorded on the shared `<script>` marker attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptState {
    Pending,
    Loaded,
}

impl ScriptState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Loaded => "loaded",
        }
    }

    /// Any marker value other than `loaded` counts as pending.
    pub fn from_marker(value: Option<&str>) -> Self {
        if value == Some(Self::Loaded.as_str()) { Self::Loaded } else { Self::Pending }
    }
}

/// SDK-specific half of an embed.
pub trait EmbedWidget {
    type Config: Clone + 'static;

    /// Marker attribute identifying this widget's `<script>`.
    const SCRIPT_ATTR: &'static str;
    /// Selector for mount points on the page.
    const CONTAINER_SELECTOR: &'static str;

    fn script_url(&self, config: &Self::Config) -> String;

    /// Read the container's data attributes.
    ///
    /// # Errors
    ///
    /// [`EmbedError::MissingAttribute`] when a required attribute is absent
    /// or empty.
    fn create_config(&self, container: &ElementRef, theme: ThemeState) -> Result<Self::Config, EmbedError>;

    /// Bootstrap the SDK for one container. `theme` is current at call time.
    fn initialize(&self, config: &Self::Config, theme: ThemeState);

    /// Runs when the script has not loaded yet, before waiting on it. SDKs
    /// that read a global config slot while their script executes get it
    /// written here.
    fn queue_config(&self, _config: &Self::Config, _theme: ThemeState) {}

    /// Whether [`Self::update_theme`] should be wired to theme changes.
    fn syncs_theme(&self) -> bool {
        false
    }

    fn update_theme(&self, _config: &Self::Config, _theme: ThemeState) {}

    /// Tear down the previous instance before a container is re-initialized.
    fn cleanup(&self) {}
}

/// Read a required, non-empty container attribute.
///
/// # Errors
///
/// [`EmbedError::MissingAttribute`] naming `name`.
pub fn required_attr(container: &ElementRef, name: &'static str) -> Result<String, EmbedError> {
    container.attribute(name).filter(|v| !v.trim().is_empty()).ok_or(EmbedError::MissingAttribute(name))
}

/// Strip trailing slashes from an SDK host.
pub fn normalize_host(host: &str) -> String {
    host.trim().trim_end_matches('/').to_owned()
}

pub struct EmbedSystem<W: EmbedWidget> {
    widget: Rc<W>,
    document: Rc<dyn Document>,
    theme: Rc<ThemeEffects>,
    theme_subscription: RefCell<Option<Subscription>>,
    pending: Rc<RefCell<Vec<W::Config>>>,
    awaiting_load: Rc<Cell<bool>>,
}

impl<W: EmbedWidget + 'static> EmbedSystem<W> {
    pub fn new(widget: W, document: Rc<dyn Document>, theme: Rc<ThemeEffects>) -> Self {
        Self {
            widget: Rc::new(widget),
            document,
            theme,
            theme_subscription: RefCell::new(None),
            pending: Rc::new(RefCell::new(Vec::new())),
            awaiting_load: Rc::new(Cell::new(false)),
        }
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    /// Initialize every container on the current page. A container that
    /// fails is logged and skipped. Returns how many succeeded.
    ///
    /// Configs still waiting on the script from an earlier pass are dropped.
    pub fn init(&self) -> usize {
        self.pending.borrow_mut().clear();
        let mut ready = 0;
        for container in self.document.query_all(W::CONTAINER_SELECTOR) {
            match self.init_container(&container) {
                Ok(()) => ready += 1,
                Err(e) => warn!("embed {}: skipping container: {e}", W::SCRIPT_ATTR),
            }
        }
        ready
    }

    /// # Errors
    ///
    /// Config or script injection failure for this container.
    pub fn init_container(&self, container: &ElementRef) -> Result<(), EmbedError> {
        self.widget.cleanup();

        let theme = self.theme.init();
        let config = self.widget.create_config(container, theme)?;

        let previous = self.theme_subscription.borrow_mut().take();
        if let Some(previous) = previous {
            previous.unsubscribe();
        }
        if self.widget.syncs_theme() {
            let widget = Rc::clone(&self.widget);
            let synced = config.clone();
            let subscription = self.theme.on_change(move |state| widget.update_theme(&synced, state));
            *self.theme_subscription.borrow_mut() = Some(subscription);
        }

        let script = self.ensure_script(&config)?;
        let state = ScriptState::from_marker(script.attribute(W::SCRIPT_ATTR).as_deref());
        if state == ScriptState::Loaded {
            self.widget.initialize(&config, self.theme.state());
        } else {
            self.widget.queue_config(&config, self.theme.state());
            self.pending.borrow_mut().push(config);
            if !self.awaiting_load.replace(true) {
                self.wait_for_load(&script);
            }
        }
        Ok(())
    }

    /// Whether a theme subscription is currently held.
    #[cfg(test)]
    pub fn has_theme_subscription(&self) -> bool {
        self.theme_subscription.borrow().is_some()
    }

    fn wait_for_load(&self, script: &ElementRef) {
        let widget = Rc::clone(&self.widget);
        let theme = Rc::clone(&self.theme);
        let pending = Rc::clone(&self.pending);
        let awaiting = Rc::clone(&self.awaiting_load);
        let marker = Rc::clone(script);
        script.listen_once(
            "load",
            Box::new(move || {
                marker.set_attribute(W::SCRIPT_ATTR, ScriptState::Loaded.as_str());
                awaiting.set(false);
                let configs = std::mem::take(&mut *pending.borrow_mut());
                for config in &configs {
                    widget.initialize(config, theme.state());
                }
            }),
        );
    }

    fn ensure_script(&self, config: &W::Config) -> Result<ElementRef, EmbedError> {
        if let Some(script) = self.document.query(&format!("script[{}]", W::SCRIPT_ATTR)) {
            return Ok(script);
        }
        let src = self.widget.script_url(config);
        Ok(self.document.append_script(&src, W::SCRIPT_ATTR, ScriptState::Pending.as_str())?)
    }
}
