//! Persisted System Settings preferences.

use leptos::logging;
use platform_host::{load_pref_with, save_pref_with, PrefsStore, SETTINGS_KEY};
use serde::{Deserialize, Serialize};

pub const MAX_LEVEL: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    #[default]
    Light,
    Dark,
    Auto,
}

impl Appearance {
    pub const ALL: [Appearance; 3] = [Self::Light, Self::Dark, Self::Auto];

    pub fn label(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
            Self::Auto => "Auto",
        }
    }
}

/// On/off preferences shown as switches in System Settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    AutoHideDock,
    NightShift,
    TrueTone,
    FileVault,
    Firewall,
    Notifications,
    LockScreenNotifications,
    SoundEffects,
    Wifi,
    Bluetooth,
    Zoom,
    DisplayContrast,
    VoiceOver,
}

impl Toggle {
    pub fn label(self) -> &'static str {
        match self {
            Self::AutoHideDock => "Automatically hide and show the Dock",
            Self::NightShift => "Night Shift",
            Self::TrueTone => "True Tone",
            Self::FileVault => "FileVault",
            Self::Firewall => "Firewall",
            Self::Notifications => "Allow notifications",
            Self::LockScreenNotifications => "Show on lock screen",
            Self::SoundEffects => "Play sound effects",
            Self::Wifi => "Wi-Fi",
            Self::Bluetooth => "Bluetooth",
            Self::Zoom => "Zoom",
            Self::DisplayContrast => "Increase contrast",
            Self::VoiceOver => "VoiceOver",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemSettings {
    pub appearance: Appearance,
    pub accent_color: String,
    pub auto_hide_dock: bool,
    pub night_shift: bool,
    pub true_tone: bool,
    pub file_vault: bool,
    pub firewall: bool,
    pub notifications: bool,
    pub lock_screen_notifications: bool,
    pub sound_effects: bool,
    pub wifi_enabled: bool,
    pub bluetooth_enabled: bool,
    pub zoom: bool,
    pub display_contrast: bool,
    pub voice_over: bool,
    pub volume: u8,
    pub brightness: u8,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            appearance: Appearance::Light,
            accent_color: "blue".to_string(),
            auto_hide_dock: false,
            night_shift: false,
            true_tone: true,
            file_vault: false,
            firewall: true,
            notifications: true,
            lock_screen_notifications: false,
            sound_effects: true,
            wifi_enabled: true,
            bluetooth_enabled: true,
            zoom: false,
            display_contrast: false,
            voice_over: false,
            volume: 70,
            brightness: 80,
        }
    }
}

impl SystemSettings {
    fn toggle_slot(&mut self, toggle: Toggle) -> &mut bool {
        match toggle {
            Toggle::AutoHideDock => &mut self.auto_hide_dock,
            Toggle::NightShift => &mut self.night_shift,
            Toggle::TrueTone => &mut self.true_tone,
            Toggle::FileVault => &mut self.file_vault,
            Toggle::Firewall => &mut self.firewall,
            Toggle::Notifications => &mut self.notifications,
            Toggle::LockScreenNotifications => &mut self.lock_screen_notifications,
            Toggle::SoundEffects => &mut self.sound_effects,
            Toggle::Wifi => &mut self.wifi_enabled,
            Toggle::Bluetooth => &mut self.bluetooth_enabled,
            Toggle::Zoom => &mut self.zoom,
            Toggle::DisplayContrast => &mut self.display_contrast,
            Toggle::VoiceOver => &mut self.voice_over,
        }
    }

    pub fn is_enabled(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::AutoHideDock => self.auto_hide_dock,
            Toggle::NightShift => self.night_shift,
            Toggle::TrueTone => self.true_tone,
            Toggle::FileVault => self.file_vault,
            Toggle::Firewall => self.firewall,
            Toggle::Notifications => self.notifications,
            Toggle::LockScreenNotifications => self.lock_screen_notifications,
            Toggle::SoundEffects => self.sound_effects,
            Toggle::Wifi => self.wifi_enabled,
            Toggle::Bluetooth => self.bluetooth_enabled,
            Toggle::Zoom => self.zoom,
            Toggle::DisplayContrast => self.display_contrast,
            Toggle::VoiceOver => self.voice_over,
        }
    }

    pub fn set_enabled(&mut self, toggle: Toggle, enabled: bool) {
        *self.toggle_slot(toggle) = enabled;
    }

    pub fn set_volume(&mut self, volume: i32) {
        self.volume = clamp_level(volume);
    }

    pub fn set_brightness(&mut self, brightness: i32) {
        self.brightness = clamp_level(brightness);
    }

    /// Clamps levels that may have been hand-edited in storage.
    fn normalized(mut self) -> Self {
        self.volume = self.volume.min(MAX_LEVEL);
        self.brightness = self.brightness.min(MAX_LEVEL);
        self
    }
}

fn clamp_level(level: i32) -> u8 {
    level.clamp(0, i32::from(MAX_LEVEL)) as u8
}

/// Loads settings, falling back to defaults when nothing valid is stored.
pub fn load_settings(prefs: &dyn PrefsStore) -> SystemSettings {
    match load_pref_with::<_, SystemSettings>(prefs, SETTINGS_KEY) {
        Ok(settings) => settings.unwrap_or_default().normalized(),
        Err(err) => {
            logging::warn!("settings load failed, using defaults: {err}");
            SystemSettings::default()
        }
    }
}

pub fn save_settings(prefs: &dyn PrefsStore, settings: &SystemSettings) {
    if let Err(err) = save_pref_with(prefs, SETTINGS_KEY, settings) {
        logging::warn!("settings persist failed: {err}");
    }
}

#[cfg(test)]
mod tests {
    use platform_host::MemoryPrefsStore;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn levels_are_clamped_to_percentage_range() {
        let mut settings = SystemSettings::default();
        settings.set_volume(140);
        settings.set_brightness(-5);
        assert_eq!((settings.volume, settings.brightness), (100, 0));
    }

    #[test]
    fn toggles_address_their_own_field() {
        let mut settings = SystemSettings::default();
        assert!(settings.is_enabled(Toggle::Firewall));
        settings.set_enabled(Toggle::Firewall, false);
        settings.set_enabled(Toggle::VoiceOver, true);
        assert!(!settings.firewall);
        assert!(settings.voice_over);
        assert!(settings.is_enabled(Toggle::Wifi));
    }

    #[test]
    fn settings_round_trip_through_prefs() {
        let prefs = MemoryPrefsStore::default();
        assert_eq!(load_settings(&prefs), SystemSettings::default());

        let mut settings = SystemSettings::default();
        settings.appearance = Appearance::Dark;
        settings.set_volume(12);
        save_settings(&prefs, &settings);

        assert_eq!(load_settings(&prefs), settings);
        assert!(prefs
            .raw(SETTINGS_KEY)
            .is_some_and(|raw| raw.contains("\"appearance\":\"dark\"")));
    }

    #[test]
    fn partial_or_corrupt_settings_fall_back_field_by_field() {
        let prefs = MemoryPrefsStore::default();
        prefs
            .save_pref(SETTINGS_KEY, r#"{"volume":250,"wifiEnabled":false}"#)
            .expect("seed prefs");
        let loaded = load_settings(&prefs);
        assert_eq!(loaded.volume, 100);
        assert!(!loaded.wifi_enabled);
        assert_eq!(loaded.brightness, 80);

        prefs.save_pref(SETTINGS_KEY, "nope").expect("seed prefs");
        assert_eq!(load_settings(&prefs), SystemSettings::default());
    }
}
