//! Host-side runtime helpers for executing reducer effects and querying browser environment state.
//!
//! Storage and time are injected here so the rest of the runtime never touches `web_sys`
//! directly.

mod boot;
mod host_ui;

use std::rc::Rc;

use leptos::{Callback, SignalGetUntracked, SignalUpdate};
use platform_host::{Clock, PrefsStore, SystemClock};
use platform_host_web::{host_strategy_name, prefs_store};

use crate::{
    model::{AppKind, Viewport, WindowId},
    persistence,
    reducer::{DesktopAction, RuntimeEffect},
    runtime_context::DesktopRuntimeContext,
};

#[derive(Clone)]
/// Host service bundle for desktop runtime side effects.
pub struct DesktopHostContext {
    prefs: Rc<dyn PrefsStore>,
    clock: Rc<dyn Clock>,
    host_strategy_name: &'static str,
}

impl Default for DesktopHostContext {
    fn default() -> Self {
        Self {
            prefs: Rc::new(prefs_store()),
            clock: Rc::new(SystemClock),
            host_strategy_name: host_strategy_name(),
        }
    }
}

impl DesktopHostContext {
    /// Builds a host bundle from explicit services.
    pub fn new(
        prefs: Rc<dyn PrefsStore>,
        clock: Rc<dyn Clock>,
        host_strategy_name: &'static str,
    ) -> Self {
        Self {
            prefs,
            clock,
            host_strategy_name,
        }
    }

    /// Returns the configured preference store.
    pub fn prefs_store(&self) -> Rc<dyn PrefsStore> {
        self.prefs.clone()
    }

    /// Returns the configured clock.
    pub fn clock(&self) -> Rc<dyn Clock> {
        self.clock.clone()
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Returns the stable name of the selected host strategy.
    pub fn host_strategy_name(&self) -> &'static str {
        self.host_strategy_name
    }

    /// Restores the saved wallpaper and starts the boot-screen timer.
    pub fn install_boot(&self, dispatch: Callback<DesktopAction>) {
        boot::install_boot(self.clone(), dispatch);
    }

    /// Executes a single [`RuntimeEffect`] emitted by the reducer.
    pub fn run_runtime_effect(&self, runtime: DesktopRuntimeContext, effect: RuntimeEffect) {
        match effect {
            RuntimeEffect::TeardownApp {
                window_id,
                app_kind,
            } => {
                if app_kind == AppKind::Notes {
                    runtime.flush_autosave();
                }
                runtime
                    .sessions
                    .update(|sessions| sessions.teardown(window_id));
            }
            RuntimeEffect::PersistWallpaper => {
                let wallpaper = runtime.state.get_untracked().wallpaper;
                persistence::persist_wallpaper(self.prefs.as_ref(), &wallpaper);
            }
            RuntimeEffect::FocusWindowInput(window_id) => self.focus_window_input(window_id),
        }
    }

    /// Moves keyboard focus into the window's primary input, if it renders one.
    ///
    /// Apps opt in by giving their main text field the id from [`window_primary_input_dom_id`].
    pub fn focus_window_input(&self, window_id: WindowId) {
        host_ui::focus_window_input(window_id);
    }

    /// Returns the area available to the window manager.
    pub fn desktop_viewport(&self) -> Viewport {
        host_ui::desktop_viewport()
    }
}

/// DOM id of the input that receives focus when a window opens or is focused.
pub fn window_primary_input_dom_id(window_id: WindowId) -> String {
    format!("window-{}-primary-input", window_id.0)
}

#[cfg(test)]
mod tests {
    use platform_host::{ManualClock, MemoryPrefsStore};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn injected_services_are_shared() {
        let prefs = MemoryPrefsStore::default();
        let clock = ManualClock::new(42);
        let host =
            DesktopHostContext::new(Rc::new(prefs.clone()), Rc::new(clock.clone()), "memory");

        clock.advance(8);
        host.prefs_store()
            .save_pref("k", "v")
            .expect("memory prefs accept writes");

        assert_eq!(host.now_ms(), 50);
        assert_eq!(prefs.raw("k"), Some("v".to_string()));
        assert_eq!(host.host_strategy_name(), "memory");
    }

    #[test]
    fn primary_input_ids_are_per_window() {
        assert_eq!(
            window_primary_input_dom_id(WindowId(7)),
            "window-7-primary-input"
        );
    }
}
