use leptos::*;

use crate::{
    reducer::DesktopAction,
    runtime_context::use_desktop_runtime,
    settings::{Appearance, Toggle},
    wallpaper::{normalize_wallpaper, WALLPAPER_PRESETS},
};

const ACCENT_COLORS: [&str; 6] = ["blue", "purple", "pink", "red", "orange", "green"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingsPane {
    General,
    Desktop,
    Displays,
    Sound,
    Network,
    Privacy,
    Notifications,
    Accessibility,
}

impl SettingsPane {
    const ALL: [SettingsPane; 8] = [
        Self::General,
        Self::Desktop,
        Self::Displays,
        Self::Sound,
        Self::Network,
        Self::Privacy,
        Self::Notifications,
        Self::Accessibility,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Desktop => "Desktop & Dock",
            Self::Displays => "Displays",
            Self::Sound => "Sound",
            Self::Network => "Network",
            Self::Privacy => "Privacy & Security",
            Self::Notifications => "Notifications",
            Self::Accessibility => "Accessibility",
        }
    }

    fn toggles(self) -> &'static [Toggle] {
        match self {
            Self::General => &[],
            Self::Desktop => &[Toggle::AutoHideDock],
            Self::Displays => &[Toggle::NightShift, Toggle::TrueTone],
            Self::Sound => &[Toggle::SoundEffects],
            Self::Network => &[Toggle::Wifi, Toggle::Bluetooth],
            Self::Privacy => &[Toggle::FileVault, Toggle::Firewall],
            Self::Notifications => &[Toggle::Notifications, Toggle::LockScreenNotifications],
            Self::Accessibility => &[Toggle::Zoom, Toggle::DisplayContrast, Toggle::VoiceOver],
        }
    }
}

#[component]
fn ToggleRow(toggle: Toggle) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let enabled = Signal::derive(move || runtime.settings.get().is_enabled(toggle));

    view! {
        <label class="settings-row">
            <span>{toggle.label()}</span>
            <input
                type="checkbox"
                role="switch"
                prop:checked=move || enabled.get()
                on:change=move |ev| {
                    let checked = event_target_checked(&ev);
                    runtime.update_settings(|settings| settings.set_enabled(toggle, checked));
                }
            />
        </label>
    }
}

#[component]
fn LevelSlider(
    label: &'static str,
    #[prop(into)] value: Signal<u8>,
    on_change: Callback<i32>,
) -> impl IntoView {
    view! {
        <label class="settings-row">
            <span>{label}</span>
            <input
                type="range"
                min="0"
                max="100"
                prop:value=move || value.get().to_string()
                on:input=move |ev| {
                    if let Ok(level) = event_target_value(&ev).parse::<i32>() {
                        on_change.call(level);
                    }
                }
            />
            <span class="settings-value">{move || format!("{}%", value.get())}</span>
        </label>
    }
}

#[component]
fn WallpaperPicker() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let current = Signal::derive(move || runtime.state.get().wallpaper);
    let custom_url = create_rw_signal(String::new());
    let url_error = create_rw_signal(false);

    let apply_custom = move |_| match normalize_wallpaper(&custom_url.get_untracked()) {
        Some(wallpaper) => {
            url_error.set(false);
            runtime.dispatch_action(DesktopAction::SetWallpaper { wallpaper });
        }
        None => url_error.set(true),
    };

    view! {
        <div class="settings-group">
            <h3>"Wallpaper"</h3>
            <div class="wallpaper-grid">
                {WALLPAPER_PRESETS
                    .iter()
                    .map(|preset| {
                        view! {
                            <button
                                class="wallpaper-swatch"
                                class:selected=move || current.get() == preset.id
                                style=format!("background-image:{};", preset.css)
                                title=preset.label
                                aria-label=preset.label
                                on:click=move |_| {
                                    runtime.dispatch_action(DesktopAction::SetWallpaper {
                                        wallpaper: preset.id.to_string(),
                                    })
                                }
                            ></button>
                        }
                    })
                    .collect_view()}
            </div>
            <div class="settings-row">
                <input
                    type="url"
                    placeholder="https://example.com/wallpaper.jpg"
                    prop:value=move || custom_url.get()
                    on:input=move |ev| custom_url.set(event_target_value(&ev))
                />
                <button on:click=apply_custom>"Apply"</button>
            </div>
            <Show when=move || url_error.get() fallback=|| ()>
                <p class="settings-error">"Enter an http:// or https:// image URL."</p>
            </Show>
        </div>
    }
}

#[component]
fn GeneralPane() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let settings = runtime.settings;

    view! {
        <div class="settings-group">
            <h3>"Appearance"</h3>
            <div class="segmented">
                {Appearance::ALL
                    .into_iter()
                    .map(|appearance| {
                        view! {
                            <button
                                class:selected=move || settings.get().appearance == appearance
                                on:click=move |_| {
                                    runtime.update_settings(|s| s.appearance = appearance)
                                }
                            >
                                {appearance.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
            <h3>"Accent color"</h3>
            <div class="accent-colors">
                {ACCENT_COLORS
                    .into_iter()
                    .map(|color| {
                        view! {
                            <button
                                class=format!("accent-swatch accent-{color}")
                                class:selected=move || settings.get().accent_color == color
                                aria-label=color
                                on:click=move |_| {
                                    runtime.update_settings(|s| s.accent_color = color.to_string())
                                }
                            ></button>
                        }
                    })
                    .collect_view()}
            </div>
            <p class="settings-note">
                {move || format!("Storage backend: {}", runtime.host.get_value().host_strategy_name())}
            </p>
        </div>
    }
}

#[component]
pub(super) fn SettingsApp() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let settings = runtime.settings;
    let pane = create_rw_signal(SettingsPane::General);

    let pane_body = move || {
        let current = pane.get();
        let extra = match current {
            SettingsPane::General => view! { <GeneralPane /> }.into_view(),
            SettingsPane::Desktop => view! { <WallpaperPicker /> }.into_view(),
            SettingsPane::Displays => view! {
                <LevelSlider
                    label="Brightness"
                    value=Signal::derive(move || settings.get().brightness)
                    on_change=Callback::new(move |level| {
                        runtime.update_settings(|s| s.set_brightness(level))
                    })
                />
            }
            .into_view(),
            SettingsPane::Sound => view! {
                <LevelSlider
                    label="Output volume"
                    value=Signal::derive(move || settings.get().volume)
                    on_change=Callback::new(move |level| {
                        runtime.update_settings(|s| s.set_volume(level))
                    })
                />
            }
            .into_view(),
            _ => ().into_view(),
        };
        view! {
            <h2>{current.label()}</h2>
            {extra}
            <div class="settings-group">
                {current
                    .toggles()
                    .iter()
                    .map(|toggle| view! { <ToggleRow toggle=*toggle /> })
                    .collect_view()}
            </div>
        }
    };

    view! {
        <div class="settings-content">
            <nav class="settings-sidebar">
                {SettingsPane::ALL
                    .into_iter()
                    .map(|entry| {
                        view! {
                            <button
                                class="settings-nav-item"
                                class:active=move || pane.get() == entry
                                on:click=move |_| pane.set(entry)
                            >
                                {entry.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </nav>
            <section class="settings-pane">{pane_body}</section>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn every_switch_lives_on_exactly_one_pane() {
        let all = [
            Toggle::AutoHideDock,
            Toggle::NightShift,
            Toggle::TrueTone,
            Toggle::FileVault,
            Toggle::Firewall,
            Toggle::Notifications,
            Toggle::LockScreenNotifications,
            Toggle::SoundEffects,
            Toggle::Wifi,
            Toggle::Bluetooth,
            Toggle::Zoom,
            Toggle::DisplayContrast,
            Toggle::VoiceOver,
        ];
        for toggle in all {
            let panes = SettingsPane::ALL
                .into_iter()
                .filter(|pane| pane.toggles().contains(&toggle))
                .count();
            assert_eq!(panes, 1, "{toggle:?}");
        }
    }
}
