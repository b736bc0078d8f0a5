//! Static lookups from provider codes and theme to what the UI draws.

use std::fmt;

/// Reference to a bundled icon image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId(&'static str);

impl AssetId {
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

pub const APP_ICON: AssetId = AssetId::new("icons/app_icon.png");
pub const SUNNY: AssetId = AssetId::new("icons/sunny.png");

const ICONS: &[(&str, AssetId)] = &[
    ("1", SUNNY),
    ("3", AssetId::new("icons/partly_cloudy.png")),
    ("4", AssetId::new("icons/cloudy.png")),
    ("6", AssetId::new("icons/mostly_cloudy.png")),
    ("7", AssetId::new("icons/overcast.png")),
    ("11", AssetId::new("icons/rain.png")),
];

/// Icon for a provider condition code, if one is bundled.
pub fn icon_for(condition_code: &str) -> Option<AssetId> {
    ICONS
        .iter()
        .find(|(code, _)| *code == condition_code)
        .map(|(_, asset)| *asset)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark(is_dark: bool) -> Self {
        if is_dark { Theme::Dark } else { Theme::Light }
    }

    pub fn style(&self) -> StyleConfig {
        match self {
            Theme::Light => LIGHT,
            Theme::Dark => DARK,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleConfig {
    pub background: &'static str,
    pub text: &'static str,
    pub input_background: &'static str,
    pub input_border: &'static str,
    pub accent: &'static str,
    pub accent_hover: &'static str,
    pub accent_pressed: &'static str,
    pub dropdown_arrow: AssetId,
}

const DARK: StyleConfig = StyleConfig {
    background: "#202020",
    text: "#ffffff",
    input_background: "#333333",
    input_border: "#404040",
    accent: "#0078d4",
    accent_hover: "#1984d8",
    accent_pressed: "#006cbd",
    dropdown_arrow: AssetId::new("down_arrow_white.png"),
};

const LIGHT: StyleConfig = StyleConfig {
    background: "#f0f0f0",
    text: "#000000",
    input_background: "#ffffff",
    input_border: "#d0d0d0",
    accent: "#0078d4",
    accent_hover: "#1984d8",
    accent_pressed: "#006cbd",
    dropdown_arrow: AssetId::new("down_arrow_black.png"),
};

pub fn style_for(is_dark: bool) -> StyleConfig {
    Theme::from_dark(is_dark).style()
}

impl StyleConfig {
    /// Qt style sheet for the whole window.
    pub fn stylesheet(&self) -> String {
        format!(
            "QMainWindow {{ background-color: {bg}; }}\n\
             QWidget {{ background-color: {bg}; color: {fg}; }}\n\
             QComboBox {{ background-color: {ibg}; color: {fg}; border: 1px solid {ib}; \
             border-radius: 4px; padding: 5px; min-height: 20px; }}\n\
             QComboBox::drop-down {{ border: none; width: 20px; }}\n\
             QComboBox::down-arrow {{ image: url({arrow}); }}\n\
             QPushButton {{ background-color: {acc}; color: white; border: none; \
             border-radius: 4px; padding: 6px; min-height: 20px; }}\n\
             QPushButton:hover {{ background-color: {hov}; }}\n\
             QPushButton:pressed {{ background-color: {prs}; }}\n\
             QLabel {{ color: {fg}; padding: 2px; }}\n",
            bg = self.background,
            fg = self.text,
            ibg = self.input_background,
            ib = self.input_border,
            arrow = self.dropdown_arrow,
            acc = self.accent,
            hov = self.accent_hover,
            prs = self.accent_pressed,
        )
    }
}
