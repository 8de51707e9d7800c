use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`. Background values
/// 0–6 are dark, 7–15 light. Absent or unparseable means dark.
pub fn detect_background() -> BackgroundType {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|val| val.rsplit(';').next().and_then(|bg| bg.parse::<u8>().ok()))
        .map(|bg| {
            if bg <= 6 {
                BackgroundType::Dark
            } else {
                BackgroundType::Light
            }
        })
        .unwrap_or(BackgroundType::Dark)
}

/// Every style the dashboard components draw with.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_sparkle: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub warning: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    /// Bars of the "ROAS per campaign" chart.
    pub bar_roas: Style,
    /// Bars of the "visits per channel" chart.
    pub bar_traffic: Style,
    pub bar_label: Style,

    // ── ROAS tiers ───────────────────────────────────────────────────────────
    /// ROAS below 1.0 (losing money).
    pub roas_low: Style,
    /// ROAS from 1.0 up to 3.0.
    pub roas_medium: Style,
    /// ROAS of 3.0 and above.
    pub roas_high: Style,

    // ── Filters ──────────────────────────────────────────────────────────────
    pub filter_on: Style,
    pub filter_off: Style,
    pub cursor: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_total: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_sparkle: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),
            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            warning: Style::default().fg(Color::Yellow),
            bar_roas: Style::default().fg(Color::Blue),
            bar_traffic: Style::default().fg(Color::Green),
            bar_label: Style::default().fg(Color::Gray),
            roas_low: Style::default().fg(Color::Red),
            roas_medium: Style::default().fg(Color::Yellow),
            roas_high: Style::default().fg(Color::Green),
            filter_on: Style::default().fg(Color::Green),
            filter_off: Style::default().fg(Color::DarkGray),
            cursor: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan),
            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_sparkle: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),
            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            warning: Style::default().fg(Color::Yellow),
            bar_roas: Style::default().fg(Color::Blue),
            bar_traffic: Style::default().fg(Color::Green),
            bar_label: Style::default().fg(Color::DarkGray),
            roas_low: Style::default().fg(Color::Red),
            roas_medium: Style::default().fg(Color::Magenta),
            roas_high: Style::default().fg(Color::Green),
            filter_on: Style::default().fg(Color::Blue),
            filter_off: Style::default().fg(Color::Gray),
            cursor: Style::default()
                .fg(Color::White)
                .bg(Color::Blue),
            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_total: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Basic 8-colour ANSI palette without bold modifiers.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            header_sparkle: Style::default().fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),
            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),
            warning: Style::default().fg(Color::Yellow),
            bar_roas: Style::default().fg(Color::Cyan),
            bar_traffic: Style::default().fg(Color::Green),
            bar_label: Style::default().fg(Color::White),
            roas_low: Style::default().fg(Color::Red),
            roas_medium: Style::default().fg(Color::Yellow),
            roas_high: Style::default().fg(Color::Green),
            filter_on: Style::default().fg(Color::Green),
            filter_off: Style::default().fg(Color::DarkGray),
            cursor: Style::default().fg(Color::Black).bg(Color::White),
            table_header: Style::default().fg(Color::Cyan),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default().fg(Color::Yellow),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            BackgroundType::Dark => Self::dark(),
        }
    }

    /// Construct a theme by name. Unknown names auto-detect.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Colour a ROAS figure by tier.
    ///
    /// * `< 1.0`     → `roas_low`
    /// * `1.0 – 3.0` → `roas_medium`
    /// * `≥ 3.0`     → `roas_high`
    pub fn roas_style(&self, roas: f64) -> Style {
        if roas >= 3.0 {
            self.roas_high
        } else if roas >= 1.0 {
            self.roas_medium
        } else {
            self.roas_low
        }
    }

    pub fn filter_style(&self, selected: bool) -> Style {
        if selected {
            self.filter_on
        } else {
            self.filter_off
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
