//! The single piece of display state and the boundary the UI implements.

use crate::{
    error::FetchError,
    model::WeatherSnapshot,
    presentation::{AssetId, icon_for},
};

pub const DEFAULT_TOOLTIP: &str = "天氣小工具";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum View {
    #[default]
    Empty,
    Weather(WeatherSnapshot),
    Error(String),
}

/// What the UI and tray are told after a fetch completes.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayUpdate {
    Weather {
        text: String,
        icon: Option<AssetId>,
        tooltip: String,
    },
    Error {
        message: String,
    },
}

/// UI/tray boundary. Implementations only render; they never fetch.
pub trait DisplaySink {
    fn show_weather(&mut self, text: &str, icon: Option<AssetId>);
    fn show_error(&mut self, message: &str);
    fn set_tooltip(&mut self, tooltip: &str);

    fn present(&mut self, update: &DisplayUpdate) {
        match update {
            DisplayUpdate::Weather {
                text,
                icon,
                tooltip,
            } => {
                self.show_weather(text, *icon);
                self.set_tooltip(tooltip);
            }
            DisplayUpdate::Error { message } => self.show_error(message),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DisplayState {
    view: View,
    icon: Option<AssetId>,
    tooltip: String,
    last_good: Option<WeatherSnapshot>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            view: View::Empty,
            icon: None,
            tooltip: DEFAULT_TOOLTIP.to_string(),
            last_good: None,
        }
    }
}

impl DisplayState {
    /// Replace the current view with the outcome of a fetch.
    ///
    /// An unrecognised condition code keeps whatever icon was showing.
    pub fn apply(&mut self, result: Result<WeatherSnapshot, FetchError>) -> DisplayUpdate {
        match result {
            Ok(snapshot) => {
                if let Some(icon) = icon_for(&snapshot.condition_code) {
                    self.icon = Some(icon);
                }
                self.tooltip = snapshot.tooltip();
                let update = DisplayUpdate::Weather {
                    text: snapshot.display_text(),
                    icon: self.icon,
                    tooltip: self.tooltip.clone(),
                };
                self.last_good = Some(snapshot.clone());
                self.view = View::Weather(snapshot);
                update
            }
            Err(err) => {
                let message = err.message();
                self.view = View::Error(message.clone());
                DisplayUpdate::Error { message }
            }
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn icon(&self) -> Option<AssetId> {
        self.icon
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    /// The current snapshot, if the last fetch succeeded.
    pub fn current(&self) -> Option<&WeatherSnapshot> {
        match &self.view {
            View::Weather(s) => Some(s),
            _ => None,
        }
    }

    /// Most recent successful snapshot, kept across failures.
    pub fn last_good(&self) -> Option<&WeatherSnapshot> {
        self.last_good.as_ref()
    }
}
