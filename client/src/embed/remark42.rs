//! Remark42 comment thread.
//!
//! DESIGN
//! ======
//! The SDK either exposes `REMARK42.createInstance(config)` or reads
//! `window.remark_config` when its script executes. Before the script has
//! loaded the config is written to the slot; once loaded it is passed to
//! `createInstance` when present, the slot otherwise.
//!
//! A previous instance is destroyed and its iframes under `#remark42` are
//! removed before every re-initialization. Older SDK builds lack `destroy`
//! or throw from it; both are ignored.

#[cfg(test)]
#[path = "remark42_test.rs"]
mod remark42_test;

use std::rc::Rc;

use leptos::logging::warn;
use serde_json::{Value, json};

use super::{EmbedError, EmbedWidget, normalize_host, required_attr};
use crate::host::{Document, ElementRef, Env, Globals};
use crate::util::theme_core::{ThemeName, ThemeState};

const GLOBAL: &str = "REMARK42";
const CONFIG_SLOT: &str = "remark_config";
const THREAD_ID: &str = "remark42";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remark42Config {
    pub host: String,
    pub site_id: String,
    pub url: String,
}

impl Remark42Config {
    /// Full SDK config for `theme`.
    pub fn payload(&self, theme: ThemeName) -> Value {
        json!({
            "host": self.host,
            "site_id": self.site_id,
            "url": self.url,
            "components": ["embed"],
            "theme": theme.as_str(),
            "locale": "en",
            "show_email_subscription": true,
            "simple_view": false,
            "no_footer": true,
        })
    }
}

pub struct Remark42 {
    document: Rc<dyn Document>,
    globals: Rc<dyn Globals>,
}

impl Remark42 {
    pub fn new(env: &Env) -> Self {
        Self { document: Rc::clone(&env.document), globals: Rc::clone(&env.globals) }
    }

    fn write_slot(&self, config: &Remark42Config, theme: ThemeName) {
        if let Err(e) = self.globals.set_slot(CONFIG_SLOT, &config.payload(theme)) {
            warn!("remark42: could not queue config: {e}");
        }
    }
}

impl EmbedWidget for Remark42 {
    type Config = Remark42Config;

    const SCRIPT_ATTR: &'static str = "data-remark42";
    const CONTAINER_SELECTOR: &'static str = "[data-remark-host]";

    fn script_url(&self, config: &Remark42Config) -> String {
        format!("{}/web/embed.js", config.host)
    }

    fn create_config(&self, container: &ElementRef, _theme: ThemeState) -> Result<Remark42Config, EmbedError> {
        Ok(Remark42Config {
            host: normalize_host(&required_attr(container, "data-remark-host")?),
            site_id: required_attr(container, "data-remark-site-id")?,
            url: required_attr(container, "data-remark-url")?,
        })
    }

    fn queue_config(&self, config: &Remark42Config, theme: ThemeState) {
        self.write_slot(config, theme.theme);
    }

    fn initialize(&self, config: &Remark42Config, theme: ThemeState) {
        match self.globals.call(GLOBAL, "createInstance", &[config.payload(theme.theme)]) {
            Ok(true) => {}
            Ok(false) => self.write_slot(config, theme.theme),
            Err(e) => warn!("remark42: createInstance failed: {e}"),
        }
    }

    fn syncs_theme(&self) -> bool {
        true
    }

    fn update_theme(&self, _config: &Remark42Config, theme: ThemeState) {
        if let Err(e) = self.globals.call(GLOBAL, "changeTheme", &[json!(theme.theme.as_str())]) {
            warn!("remark42: changeTheme failed: {e}");
        }
    }

    fn cleanup(&self) {
        // Missing or throwing destroy is expected on older SDKs.
        let _ = self.globals.call(GLOBAL, "destroy", &[]);

        if let Some(thread) = self.document.by_id(THREAD_ID) {
            for frame in thread.query_all("iframe") {
                frame.remove();
            }
        }
    }
}
