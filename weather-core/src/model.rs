use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::location::Location;

/// Today's conditions for one location, as reported by the provider.
///
/// Values are kept as the provider's strings; nothing is converted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: Location,
    pub condition: String,
    pub condition_code: String,
    pub min_temp: String,
    pub max_temp: String,
    pub precipitation_probability: String,
    pub comfort: String,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// Multi-line block shown next to the icon.
    pub fn display_text(&self) -> String {
        format!(
            "地區：{}\n天氣：{}\n溫度：{}°C - {}°C\n降雨機率：{}%\n體感：{}",
            self.location,
            self.condition,
            self.min_temp,
            self.max_temp,
            self.precipitation_probability,
            self.comfort,
        )
    }

    /// Short one-line summary for the tray.
    pub fn tooltip(&self) -> String {
        format!(
            "{}: {} {}°C-{}°C",
            self.location, self.condition, self.min_temp, self.max_temp
        )
    }
}
