use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Decorative sparkle string placed either side of the application title.
pub const SPARKLES: &str = "✦ ✧ ✦ ✧";

/// Dashboard title.
pub const TITLE: &str = "DASHBOARD DE RENDIMIENTO";

/// Dashboard header rendering four lines:
///
/// 1. Title with sparkle decorations.
/// 2. A 60-column `=` separator.
/// 3. Filter coverage in `[ 2/3 canales | 4/4 campañas ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    pub channels_selected: usize,
    pub channels_total: usize,
    pub campaigns_selected: usize,
    pub campaigns_total: usize,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(
        channels: (usize, usize),
        campaigns: (usize, usize),
        theme: &'a Theme,
    ) -> Self {
        Self {
            channels_selected: channels.0,
            channels_total: channels.1,
            campaigns_selected: campaigns.0,
            campaigns_total: campaigns.1,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        vec![
            Line::from(vec![
                Span::styled(SPARKLES, self.theme.header_sparkle),
                Span::styled(format!(" {} ", TITLE), self.theme.header),
                Span::styled(SPARKLES, self.theme.header_sparkle),
            ]),
            Line::from(Span::styled("=".repeat(60), self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(
                    format!("{}/{}", self.channels_selected, self.channels_total),
                    self.theme.value,
                ),
                Span::styled(" canales | ", self.theme.label),
                Span::styled(
                    format!("{}/{}", self.campaigns_selected, self.campaigns_total),
                    self.theme.value,
                ),
                Span::styled(" campañas ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
