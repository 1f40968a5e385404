//! Runtime provider and context wiring for the desktop shell.
//!
//! This module owns the long-lived reducer container, runtime effect queue, per-window app
//! sessions, the shared file store and host bootstrap wiring. UI composition stays in
//! [`crate::components`].

use std::time::Duration;

use leptos::{leptos_dom::helpers::TimeoutHandle, *};

use crate::{
    autosave::AutoSaveQueue,
    effect_executor,
    host::DesktopHostContext,
    model::{AppKind, DesktopState, InteractionState, Viewport, WindowId},
    navigation::open_file_action,
    reducer::{reduce_desktop, DesktopAction, RuntimeEffect},
    sessions::{AppSessions, TerminalSession},
    settings::{load_settings, save_settings, SystemSettings},
    shell::OpenTarget,
    vfs::{FilePatch, FileSubscription, VirtualFileStore},
};

const AUTOSAVE_CONSUMER: &str = "auto-save";

#[derive(Clone, Copy)]
/// Leptos context for reading desktop runtime state and dispatching [`DesktopAction`] values.
pub struct DesktopRuntimeContext {
    /// Host service bundle for executing runtime side effects and environment queries.
    pub host: StoredValue<DesktopHostContext>,
    /// Reactive desktop state signal.
    pub state: RwSignal<DesktopState>,
    /// Reactive pointer/drag/resize interaction state signal.
    pub interaction: RwSignal<InteractionState>,
    /// Queue of runtime effects emitted by the reducer and processed by the shell.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    /// Browser histories, note selections and terminal sessions keyed by window.
    pub sessions: RwSignal<AppSessions>,
    /// Shared virtual file store.
    pub files: StoredValue<VirtualFileStore>,
    /// System Settings preferences.
    pub settings: RwSignal<SystemSettings>,
    /// Pending editor writes.
    pub autosave: StoredValue<AutoSaveQueue>,
    autosave_timer: StoredValue<Option<TimeoutHandle>>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<DesktopAction>,
}

impl DesktopRuntimeContext {
    /// Dispatches a reducer action through the runtime context callback.
    pub fn dispatch_action(&self, action: DesktopAction) {
        self.dispatch.call(action);
    }

    pub fn files(&self) -> VirtualFileStore {
        self.files.get_value()
    }

    /// Subscribes the calling view to file store changes until it unmounts.
    ///
    /// The returned signal ticks once per store mutation; views read it to re-query the store.
    pub fn watch_files(&self, consumer: &str) -> ReadSignal<u64> {
        let (revision, set_revision) = create_signal(0_u64);
        let subscription = watch_store(&self.files(), consumer, set_revision);
        on_cleanup(move || subscription.unsubscribe());
        revision
    }

    pub fn now_ms(&self) -> u64 {
        self.host.get_value().now_ms()
    }

    pub fn viewport(&self) -> Viewport {
        self.host.get_value().desktop_viewport()
    }

    /// Opens `app_kind`, or focuses its existing window.
    pub fn open_app(&self, app_kind: AppKind) {
        self.dispatch_action(DesktopAction::OpenApp {
            app_kind,
            viewport: self.viewport(),
        });
    }

    /// Opens a stored file in the app that displays its kind. Unknown names are ignored.
    pub fn open_file(&self, name: &str) {
        match open_file_action(&self.files(), name, self.viewport()) {
            Some(action) => self.dispatch_action(action),
            None => logging::warn!("open requested for missing file `{name}`"),
        }
    }

    /// Runs one terminal line for `window_id` and performs any open request it produced.
    pub fn run_terminal_command(&self, window_id: WindowId, line: &str) {
        let host = self.host.get_value();
        let clock = host.clock();
        let now_ms = clock.now_ms();
        let running_apps = self.state.with_untracked(|desktop| {
            desktop
                .windows
                .iter()
                .map(|window| window.app_kind)
                .collect::<Vec<_>>()
        });

        // Commands may mutate the file store, which notifies views synchronously, so the session
        // is executed outside the signal borrow.
        let mut terminal = self
            .sessions
            .with_untracked(|sessions| sessions.terminal(window_id).cloned())
            .unwrap_or_else(|| TerminalSession::new(now_ms));
        terminal.shell.set_running_apps(running_apps);
        let open = terminal.submit(line, &self.files(), clock.as_ref());
        self.sessions
            .update(|sessions| *sessions.terminal_mut(window_id, now_ms) = terminal);

        match open {
            Some(OpenTarget::File(name)) => self.open_file(&name),
            Some(OpenTarget::App(app_kind)) => self.open_app(app_kind),
            None => {}
        }
    }

    /// Queues an editor write and re-arms the quiet-period timer.
    pub fn schedule_autosave(&self, name: &str, patch: FilePatch) {
        let now_ms = self.now_ms();
        self.autosave.update_value(|queue| {
            queue.schedule(name, patch, now_ms);
        });
        self.arm_autosave_timer(now_ms);
    }

    /// Commits every pending editor write immediately.
    pub fn flush_autosave(&self) {
        self.clear_autosave_timer();
        self.with_autosave_queue(|queue, store| {
            queue.flush_all(store);
        });
    }

    pub fn is_autosave_pending(&self, name: &str) -> bool {
        self.autosave.with_value(|queue| queue.is_pending(name))
    }

    /// Applies `update` to the settings signal and persists the result.
    pub fn update_settings(&self, update: impl FnOnce(&mut SystemSettings)) {
        self.settings.update(update);
        save_settings(
            self.host.get_value().prefs_store().as_ref(),
            &self.settings.get_untracked(),
        );
    }

    fn clear_autosave_timer(&self) {
        if let Some(handle) = self.autosave_timer.get_value() {
            handle.clear();
        }
        self.autosave_timer.set_value(None);
    }

    fn arm_autosave_timer(&self, now_ms: u64) {
        self.clear_autosave_timer();
        let Some(deadline) = self.autosave.with_value(AutoSaveQueue::next_deadline) else {
            return;
        };

        let runtime = *self;
        let armed = set_timeout_with_handle(
            move || {
                runtime.autosave_timer.set_value(None);
                let now_ms = runtime.now_ms();
                runtime.with_autosave_queue(|queue, store| {
                    queue.flush_due(now_ms, store);
                });
                runtime.arm_autosave_timer(now_ms);
            },
            Duration::from_millis(deadline.saturating_sub(now_ms)),
        );
        match armed {
            Ok(handle) => self.autosave_timer.set_value(Some(handle)),
            Err(err) => logging::warn!("auto-save timer failed: {err:?}"),
        }
    }

    // Flushing notifies store subscribers, which may re-render views that create new stored
    // values, so the queue is taken out of the arena for the duration.
    fn with_autosave_queue<R>(
        &self,
        run: impl FnOnce(&mut AutoSaveQueue, &VirtualFileStore) -> R,
    ) -> R {
        let mut queue = AutoSaveQueue::default();
        self.autosave
            .update_value(|current| std::mem::swap(current, &mut queue));
        let result = run(&mut queue, &self.files());
        self.autosave.set_value(queue);
        result
    }
}

fn watch_store(
    store: &VirtualFileStore,
    consumer: &str,
    revision: WriteSignal<u64>,
) -> FileSubscription {
    store.subscribe(consumer, move |_change| {
        revision.update(|revision| *revision += 1);
    })
}

fn install_runtime_orchestration(runtime: DesktopRuntimeContext) {
    runtime.host.get_value().install_boot(runtime.dispatch);
    effect_executor::install(runtime);
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components and boots persisted state.
pub fn DesktopProvider(
    /// Host services; defaults to the build's browser or in-memory adapters.
    #[prop(optional)]
    host: Option<DesktopHostContext>,
    children: Children,
) -> impl IntoView {
    let host = host.unwrap_or_default();
    let file_store = VirtualFileStore::load(host.prefs_store(), host.clock());
    let settings = create_rw_signal(load_settings(host.prefs_store().as_ref()));
    let host = store_value(host);
    let state = create_rw_signal(DesktopState::default());
    let interaction = create_rw_signal(InteractionState::default());
    let effects = create_rw_signal(Vec::<RuntimeEffect>::new());
    let sessions = create_rw_signal(AppSessions::default());
    let autosave = store_value(AutoSaveQueue::default());
    let autosave_timer = store_value(None::<TimeoutHandle>);

    let subscription = file_store.subscribe(AUTOSAVE_CONSUMER, move |change| {
        autosave.update_value(|queue| queue.discard_removed(change));
    });
    on_cleanup(move || subscription.unsubscribe());
    let files = store_value(file_store);

    let dispatch = Callback::new(move |action: DesktopAction| {
        let mut desktop = state.get_untracked();
        let mut ui = interaction.get_untracked();
        let previous_desktop = desktop.clone();
        let previous_ui = ui.clone();

        match reduce_desktop(&mut desktop, &mut ui, action) {
            Ok(new_effects) => {
                if desktop.windows != previous_desktop.windows {
                    sessions.update(|sessions| sessions.sync_windows(&desktop.windows));
                }
                if desktop != previous_desktop {
                    state.set(desktop);
                }
                if ui != previous_ui {
                    interaction.set(ui);
                }
                if !new_effects.is_empty() {
                    let mut queue = effects.get_untracked();
                    queue.extend(new_effects);
                    effects.set(queue);
                }
            }
            Err(err) => logging::warn!("desktop reducer error: {err}"),
        }
    });

    let runtime = DesktopRuntimeContext {
        host,
        state,
        interaction,
        effects,
        sessions,
        files,
        settings,
        autosave,
        autosave_timer,
        dispatch,
    };

    provide_context(runtime);

    install_runtime_orchestration(runtime);

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use platform_host::{ManualClock, MemoryPrefsStore};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn watched_views_tick_until_they_unsubscribe() {
        let runtime = create_runtime();
        let store = VirtualFileStore::load(
            Rc::new(MemoryPrefsStore::default()),
            Rc::new(ManualClock::new(1_000)),
        );
        let (revision, set_revision) = create_signal(0_u64);

        let finder = watch_store(&store, "finder", set_revision);
        assert_eq!(store.subscribers(), vec!["finder".to_string()]);

        store.upsert("plan.txt", FilePatch::new().content("a"));
        assert!(store.delete("plan.txt"));
        assert!(!store.delete("plan.txt"));
        assert_eq!(revision.get_untracked(), 2);

        finder.unsubscribe();
        assert!(store.subscribers().is_empty());
        store.upsert("plan.txt", FilePatch::new().content("b"));
        assert_eq!(revision.get_untracked(), 2);

        runtime.dispose();
    }
}
