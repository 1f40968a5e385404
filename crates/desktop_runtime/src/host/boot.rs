use std::time::Duration;

use leptos::{set_timeout, Callable, Callback};

use crate::{host::DesktopHostContext, model::BOOT_DELAY_MS, persistence, reducer::DesktopAction};

pub(super) fn install_boot(host: DesktopHostContext, dispatch: Callback<DesktopAction>) {
    if let Some(wallpaper) = persistence::load_wallpaper(host.prefs_store().as_ref()) {
        dispatch.call(DesktopAction::HydrateWallpaper { wallpaper });
    }

    set_timeout(
        move || dispatch.call(DesktopAction::CompleteBoot),
        Duration::from_millis(BOOT_DELAY_MS),
    );
}
