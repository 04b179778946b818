//! Cusdis comment thread.
//!
//! The SDK renders into a container described by `data-host`, `data-app-id`,
//! `data-page-id`, `data-page-title` and `data-theme`. Those are written onto
//! the `[data-cusdis-host]` mount point itself. Re-initialization is attribute
//! driven, so there is no teardown.

#[cfg(test)]
#[path = "cusdis_test.rs"]
mod cusdis_test;

use std::rc::Rc;

use leptos::logging::warn;
use serde_json::{Value, json};

use super::{EmbedError, EmbedWidget, normalize_host, required_attr};
use crate::host::{Document, ElementRef, Env, Globals};
use crate::util::theme_core::{ThemeName, ThemeState};

const GLOBAL: &str = "CUSDIS";
const CONFIG_SLOT: &str = "cusdisConfig";

#[derive(Clone)]
pub struct CusdisConfig {
    pub container: ElementRef,
    pub host: String,
    pub app_id: String,
    pub page_id: String,
    pub page_title: String,
}

impl std::fmt::Debug for CusdisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CusdisConfig")
            .field("host", &self.host)
            .field("app_id", &self.app_id)
            .field("page_id", &self.page_id)
            .field("page_title", &self.page_title)
            .finish_non_exhaustive()
    }
}

impl CusdisConfig {
    /// Shape of `window.cusdisConfig`.
    pub fn payload(&self, theme: ThemeName) -> Value {
        json!({
            "host": self.host,
            "appId": self.app_id,
            "pageId": self.page_id,
            "pageTitle": self.page_title,
            "theme": theme.as_str(),
        })
    }

    fn prepare_container(&self, theme: ThemeName) {
        let container = &self.container;
        container.clear_children();
        container.set_attribute("data-host", &self.host);
        container.set_attribute("data-app-id", &self.app_id);
        container.set_attribute("data-page-id", &self.page_id);
        container.set_attribute("data-page-title", &self.page_title);
        container.set_attribute("data-theme", theme.as_str());
    }
}

pub struct Cusdis {
    document: Rc<dyn Document>,
    globals: Rc<dyn Globals>,
}

impl Cusdis {
    pub fn new(env: &Env) -> Self {
        Self { document: Rc::clone(&env.document), globals: Rc::clone(&env.globals) }
    }

    fn call(&self, method: &str, args: &[Value]) {
        if let Err(e) = self.globals.call(GLOBAL, method, args) {
            warn!("cusdis: {method} failed: {e}");
        }
    }
}

impl EmbedWidget for Cusdis {
    type Config = CusdisConfig;

    const SCRIPT_ATTR: &'static str = "data-cusdis";
    const CONTAINER_SELECTOR: &'static str = "[data-cusdis-host]";

    fn script_url(&self, config: &CusdisConfig) -> String {
        format!("{}/js/cusdis.es.js", config.host)
    }

    fn create_config(&self, container: &ElementRef, _theme: ThemeState) -> Result<CusdisConfig, EmbedError> {
        let host = normalize_host(&required_attr(container, "data-cusdis-host")?);
        let app_id = required_attr(container, "data-cusdis-app-id")?;
        let page_id = required_attr(container, "data-cusdis-page-id")?;
        let page_title = container
            .attribute("data-cusdis-page-title")
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| self.document.title());
        Ok(CusdisConfig { container: Rc::clone(container), host, app_id, page_id, page_title })
    }

    fn queue_config(&self, config: &CusdisConfig, theme: ThemeState) {
        config.prepare_container(theme.theme);
        if let Err(e) = self.globals.set_slot(CONFIG_SLOT, &config.payload(theme.theme)) {
            warn!("cusdis: could not queue config: {e}");
        }
    }

    fn initialize(&self, config: &CusdisConfig, theme: ThemeState) {
        // Already prepared when the config was queued before the script loaded.
        if config.container.attribute("data-page-id").as_deref() != Some(config.page_id.as_str()) {
            config.prepare_container(theme.theme);
        }
        self.call("initial", &[]);
    }

    fn syncs_theme(&self) -> bool {
        true
    }

    fn update_theme(&self, config: &CusdisConfig, theme: ThemeState) {
        config.container.set_attribute("data-theme", theme.theme.as_str());
        self.call("setTheme", &[json!(theme.theme.as_str())]);
    }
}
