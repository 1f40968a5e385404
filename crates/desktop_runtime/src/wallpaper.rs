//! Wallpaper presets and CSS background resolution.

use crate::model::DEFAULT_WALLPAPER;

pub struct WallpaperPreset {
    pub id: &'static str,
    pub label: &'static str,
    pub css: &'static str,
}

pub const WALLPAPER_PRESETS: &[WallpaperPreset] = &[
    WallpaperPreset {
        id: "gradient1",
        label: "Purple Haze",
        css: "linear-gradient(135deg, #667eea 0%, #764ba2 100%)",
    },
    WallpaperPreset {
        id: "gradient2",
        label: "Pink Sunset",
        css: "linear-gradient(135deg, #f093fb 0%, #f5576c 100%)",
    },
    WallpaperPreset {
        id: "gradient3",
        label: "Ocean",
        css: "linear-gradient(135deg, #4facfe 0%, #00f2fe 100%)",
    },
    WallpaperPreset {
        id: "gradient4",
        label: "Mint",
        css: "linear-gradient(135deg, #43e97b 0%, #38f9d7 100%)",
    },
    WallpaperPreset {
        id: "gradient5",
        label: "Peach",
        css: "linear-gradient(135deg, #fa709a 0%, #fee140 100%)",
    },
    WallpaperPreset {
        id: "solid-dark",
        label: "Midnight",
        css: "linear-gradient(135deg, #1a1a2e 0%, #16213e 100%)",
    },
    WallpaperPreset {
        id: "solid-light",
        label: "Silver",
        css: "linear-gradient(135deg, #e3e3e3 0%, #c9c9c9 100%)",
    },
];

pub fn preset(id: &str) -> Option<&'static WallpaperPreset> {
    WALLPAPER_PRESETS.iter().find(|preset| preset.id == id)
}

pub fn is_custom_url(value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Accepts a preset id or `http(s)` URL, trimmed. Anything else is rejected.
pub fn normalize_wallpaper(raw: &str) -> Option<String> {
    let value = raw.trim();
    (preset(value).is_some() || is_custom_url(value)).then(|| value.to_string())
}

/// CSS `background-image` for a wallpaper value. Unknown values use the default gradient.
pub fn wallpaper_css(value: &str) -> String {
    let fallback = preset(DEFAULT_WALLPAPER).map_or("none", |preset| preset.css);
    if let Some(preset) = preset(value) {
        return preset.css.to_string();
    }
    if is_custom_url(value) {
        let url = value.trim().replace('\'', "%27");
        return format!("url('{url}'), {fallback}");
    }
    fallback.to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn presets_and_urls_resolve_to_css() {
        assert_eq!(
            wallpaper_css("solid-dark"),
            "linear-gradient(135deg, #1a1a2e 0%, #16213e 100%)"
        );
        assert_eq!(
            wallpaper_css("https://img.example/a.jpg"),
            "url('https://img.example/a.jpg'), linear-gradient(135deg, #667eea 0%, #764ba2 100%)"
        );
    }

    #[test]
    fn unknown_values_fall_back_to_default_gradient() {
        assert_eq!(wallpaper_css("gradient9"), wallpaper_css(DEFAULT_WALLPAPER));
        assert_eq!(wallpaper_css(""), wallpaper_css(DEFAULT_WALLPAPER));
    }

    #[test]
    fn normalize_rejects_unknown_identifiers() {
        assert_eq!(normalize_wallpaper(" gradient3 "), Some("gradient3".to_string()));
        assert_eq!(
            normalize_wallpaper("HTTPS://x.test/p.png"),
            Some("HTTPS://x.test/p.png".to_string())
        );
        assert_eq!(normalize_wallpaper("ftp://x.test"), None);
        assert_eq!(normalize_wallpaper("  "), None);
    }
}
