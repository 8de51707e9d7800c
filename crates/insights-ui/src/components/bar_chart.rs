use crate::themes::Theme;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

/// Configuration controlling visual appearance of a bar chart.
pub struct BarChartConfig {
    /// Columns available to the longest bar.
    pub width: u16,
    /// Labels wider than this are truncated with `…`.
    pub max_label_width: usize,
    pub filled_char: char,
}

impl Default for BarChartConfig {
    fn default() -> Self {
        Self {
            width: 40,
            max_label_width: 24,
            filled_char: '\u{2588}', // █  FULL BLOCK
        }
    }
}

// ── HorizontalBarChart ───────────────────────────────────────────────────────

/// Labelled horizontal bars scaled to the largest value.
///
/// One line per bar: `<label padded> │<bar> <formatted value>`. The same
/// layout is available styled (for the terminal) and plain (for the deck).
pub struct HorizontalBarChart {
    /// `(label, value)` pairs in display order.
    pub bars: Vec<(String, f64)>,
    /// Renders a bar's value for the trailing label.
    pub format_value: fn(f64) -> String,
    pub config: BarChartConfig,
}

impl HorizontalBarChart {
    pub fn new(bars: Vec<(String, f64)>, format_value: fn(f64) -> String) -> Self {
        Self {
            bars,
            format_value,
            config: BarChartConfig::default(),
        }
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.config.width = width;
        self
    }

    /// Filled cells for `value`. Non-positive values and an all-zero chart
    /// draw nothing.
    pub fn bar_len(&self, value: f64) -> usize {
        let max = self.max_value();
        if max <= 0.0 || value <= 0.0 {
            return 0;
        }
        ((value / max) * self.config.width as f64).round() as usize
    }

    /// Styled lines; `bar_style` fills the bars, `value_style` colours each
    /// trailing figure.
    pub fn to_lines<'a>(
        &self,
        theme: &'a Theme,
        bar_style: Style,
        value_style: impl Fn(f64) -> Style,
    ) -> Vec<Line<'a>> {
        let label_width = self.label_width();
        self.bars
            .iter()
            .map(|(label, value)| {
                let fill = self.config.filled_char.to_string().repeat(self.bar_len(*value));
                Line::from(vec![
                    Span::styled(pad(&truncate(label, label_width), label_width), theme.bar_label),
                    Span::styled(" │", theme.separator),
                    Span::styled(fill, bar_style),
                    Span::styled(format!(" {}", (self.format_value)(*value)), value_style(*value)),
                ])
            })
            .collect()
    }

    /// Unstyled lines for text exports.
    pub fn to_plain_lines(&self) -> Vec<String> {
        let label_width = self.label_width();
        self.bars
            .iter()
            .map(|(label, value)| {
                let fill = self.config.filled_char.to_string().repeat(self.bar_len(*value));
                format!(
                    "{} │{} {}",
                    pad(&truncate(label, label_width), label_width),
                    fill,
                    (self.format_value)(*value)
                )
            })
            .collect()
    }

    fn max_value(&self) -> f64 {
        self.bars.iter().map(|(_, v)| *v).fold(0.0, f64::max)
    }

    fn label_width(&self) -> usize {
        self.bars
            .iter()
            .map(|(l, _)| l.width())
            .max()
            .unwrap_or(0)
            .min(self.config.max_label_width)
    }
}

/// Right-pad `s` with spaces to `width` display columns.
fn pad(s: &str, width: usize) -> String {
    let w = s.width();
    if w >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - w))
    }
}

/// Cut `s` to at most `width` display columns, marking the cut with `…`.
fn truncate(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + cw + 1 > width {
            break;
        }
        out.push(ch);
        used += cw;
    }
    out.push('…');
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
