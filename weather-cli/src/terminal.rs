use std::io::Write;

use chrono::Local;
use weather_core::{AssetId, DisplaySink};

/// Prints display updates; the tooltip line stands in for the tray.
pub struct TerminalSink<W: Write> {
    out: W,
    timestamped: bool,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, timestamped: bool) -> Self {
        Self { out, timestamped }
    }

    fn header(&mut self) {
        if self.timestamped {
            let _ = writeln!(self.out, "── {} ──", Local::now().format("%Y-%m-%d %H:%M"));
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplaySink for TerminalSink<W> {
    fn show_weather(&mut self, text: &str, icon: Option<AssetId>) {
        self.header();
        let _ = writeln!(self.out, "{text}");
        if let Some(icon) = icon {
            let _ = writeln!(self.out, "圖示：{icon}");
        }
    }

    fn show_error(&mut self, message: &str) {
        self.header();
        let _ = writeln!(self.out, "{message}");
    }

    fn set_tooltip(&mut self, tooltip: &str) {
        let _ = writeln!(self.out, "[tray] {tooltip}");
        let _ = self.out.flush();
    }
}
