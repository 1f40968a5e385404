//! Open-with dispatch: routes a stored file to the app that displays it.

use crate::model::{AppKind, Viewport};
use crate::reducer::DesktopAction;
use crate::vfs::{FileKind, VirtualFileStore};

/// App that displays files of `kind`.
pub fn route_for_kind(kind: FileKind) -> AppKind {
    match kind {
        FileKind::Page => AppKind::Browser,
        FileKind::Note | FileKind::Text | FileKind::Folder => AppKind::Notes,
    }
}

/// Builds the action that opens `name` in its target app.
///
/// Returns `None` when no live file has that name. The action queues the name in the target app's
/// pending-resource slot and opens or focuses the app.
pub fn open_file_action(
    store: &VirtualFileStore,
    name: &str,
    viewport: Viewport,
) -> Option<DesktopAction> {
    let record = store.read(name.trim())?;
    Some(DesktopAction::OpenResource {
        app_kind: route_for_kind(record.kind),
        name: record.name,
        viewport,
    })
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use platform_host::{ManualClock, MemoryPrefsStore};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{DesktopState, InteractionState};
    use crate::reducer::reduce_desktop;

    fn store() -> VirtualFileStore {
        VirtualFileStore::load(
            Rc::new(MemoryPrefsStore::default()),
            Rc::new(ManualClock::new(1_000_000)),
        )
    }

    #[test]
    fn pages_open_in_browser_and_everything_else_in_notes() {
        let store = store();
        let viewport = Viewport::default();
        assert_eq!(
            open_file_action(&store, "safari-tips.html", viewport),
            Some(DesktopAction::OpenResource {
                app_kind: AppKind::Browser,
                name: "safari-tips.html".to_string(),
                viewport,
            })
        );
        assert!(matches!(
            open_file_action(&store, "readme.txt", viewport),
            Some(DesktopAction::OpenResource {
                app_kind: AppKind::Notes,
                ..
            })
        ));
        assert_eq!(open_file_action(&store, "missing.txt", viewport), None);
    }

    #[test]
    fn welcome_note_opens_in_notes_when_notes_is_closed() {
        let store = store();
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let action =
            open_file_action(&store, "welcome-note", Viewport::default()).expect("seeded note");
        assert!(matches!(
            &action,
            DesktopAction::OpenResource {
                app_kind: AppKind::Notes,
                name,
                ..
            } if name == "welcome-note"
        ));

        assert!(!state.is_app_open(AppKind::Notes));
        reduce_desktop(&mut state, &mut interaction, action).expect("open resource");
        assert_eq!(state.pending_resource(AppKind::Notes), Some("welcome-note"));
        assert_eq!(state.pending_resource(AppKind::Browser), None);
        let notes = state.window_for_app(AppKind::Notes).expect("notes window");
        assert_eq!(state.active_window, Some(notes.id));
    }

    #[test]
    fn dispatching_open_action_fills_pending_slot_once() {
        let store = store();
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let action =
            open_file_action(&store, "todo-note", Viewport::default()).expect("seeded file");

        reduce_desktop(&mut state, &mut interaction, action).expect("open resource");
        assert_eq!(state.pending_resource(AppKind::Notes), Some("todo-note"));
        assert!(state.is_app_open(AppKind::Notes));

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::ConsumePendingResource {
                app_kind: AppKind::Notes,
            },
        )
        .expect("consume");
        assert_eq!(state.pending_resource(AppKind::Notes), None);
    }
}
