use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Checkbox list for one filter dimension.
///
/// Renders a title line followed by one `[x] name` / `[ ] name` line per
/// option. The option under the cursor is highlighted only while the list
/// has focus. With `max_rows` set, only a window of options around the
/// cursor is drawn and the title shows `↑`/`↓` when rows are hidden.
pub struct FilterList<'a> {
    pub title: &'a str,
    /// `(option, selected)` pairs in display order.
    pub options: Vec<(&'a str, bool)>,
    pub cursor: usize,
    pub focused: bool,
    /// Option rows to draw; `None` draws them all.
    pub max_rows: Option<usize>,
    pub theme: &'a Theme,
}

impl<'a> FilterList<'a> {
    /// Index range of the options drawn: the smallest scroll offset that
    /// keeps the cursor visible.
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        let len = self.options.len();
        if len == 0 {
            return 0..0;
        }
        let rows = self.max_rows.unwrap_or(len).max(1).min(len);
        let cursor = self.cursor.min(len.saturating_sub(1));
        let start = (cursor + 1).saturating_sub(rows);
        start..start + rows
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let selected = self.options.iter().filter(|(_, on)| *on).count();
        let range = self.visible_range();
        let mut title = vec![
            Span::styled(self.title, self.theme.header),
            Span::styled(
                format!(" ({}/{})", selected, self.options.len()),
                self.theme.dim,
            ),
        ];
        if range.start > 0 {
            title.push(Span::styled(" ↑", self.theme.dim));
        }
        if range.end < self.options.len() {
            title.push(Span::styled(" ↓", self.theme.dim));
        }
        let mut lines = vec![Line::from(title)];

        if self.options.is_empty() {
            lines.push(Line::from(Span::styled("  (sin opciones)", self.theme.dim)));
            return lines;
        }

        for (i, (name, on)) in self
            .options
            .iter()
            .enumerate()
            .skip(range.start)
            .take(range.len())
        {
            let mark = if *on { "[x]" } else { "[ ]" };
            let marker = if self.focused && i == self.cursor {
                Span::styled("▶ ", self.theme.cursor)
            } else {
                Span::raw("  ")
            };
            let name_style = if self.focused && i == self.cursor {
                self.theme.cursor
            } else {
                self.theme.filter_style(*on)
            };
            lines.push(Line::from(vec![
                marker,
                Span::styled(mark, self.theme.filter_style(*on)),
                Span::raw(" "),
                Span::styled(*name, name_style),
            ]));
        }
        lines
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn list(theme: &Theme, focused: bool) -> FilterList<'_> {
        FilterList {
            title: "Canales",
            options: vec![("Search", true), ("Social", false), ("Email", true)],
            cursor: 1,
            focused,
            max_rows: None,
            theme,
        }
    }

    fn long_list(theme: &Theme, cursor: usize) -> FilterList<'_> {
        FilterList {
            title: "Campañas",
            options: vec![
                ("A", true),
                ("B", true),
                ("C", true),
                ("D", true),
                ("E", true),
                ("F", true),
            ],
            cursor,
            focused: true,
            max_rows: Some(3),
            theme,
        }
    }

    #[test]
    fn test_title_counts_selected() {
        let theme = Theme::dark();
        let lines = list(&theme, false).to_lines();
        assert_eq!(text(&lines[0]), "Canales (2/3)");
    }

    #[test]
    fn test_checkbox_marks() {
        let theme = Theme::dark();
        let lines = list(&theme, false).to_lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(text(&lines[1]), "  [x] Search");
        assert_eq!(text(&lines[2]), "  [ ] Social");
    }

    #[test]
    fn test_cursor_only_when_focused() {
        let theme = Theme::dark();
        let focused = list(&theme, true).to_lines();
        assert_eq!(text(&focused[2]), "▶ [ ] Social");
        assert_eq!(focused[2].spans[3].style, theme.cursor);

        let unfocused = list(&theme, false).to_lines();
        assert!(!text(&unfocused[2]).contains('▶'));
    }

    #[test]
    fn test_empty_options() {
        let theme = Theme::dark();
        let panel = FilterList {
            title: "Campañas",
            options: Vec::new(),
            cursor: 0,
            focused: true,
            max_rows: Some(4),
            theme: &theme,
        };
        let lines = panel.to_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(text(&lines[0]), "Campañas (0/0)");
        assert!(text(&lines[1]).contains("sin opciones"));
    }

    #[test]
    fn test_window_follows_cursor() {
        let theme = Theme::dark();

        let top = long_list(&theme, 0);
        assert_eq!(top.visible_range(), 0..3);
        let lines = top.to_lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(text(&lines[0]), "Campañas (6/6) ↓");

        let bottom = long_list(&theme, 5);
        assert_eq!(bottom.visible_range(), 3..6);
        let lines = bottom.to_lines();
        assert_eq!(text(&lines[0]), "Campañas (6/6) ↑");
        assert_eq!(text(&lines[3]), "▶ [x] F");

        let middle = long_list(&theme, 3);
        assert_eq!(middle.visible_range(), 1..4);
        assert_eq!(text(&middle.to_lines()[0]), "Campañas (6/6) ↑ ↓");
    }

    #[test]
    fn test_window_larger_than_list_shows_everything() {
        let theme = Theme::dark();
        let mut panel = list(&theme, true);
        panel.max_rows = Some(10);
        assert_eq!(panel.visible_range(), 0..3);
        assert_eq!(text(&panel.to_lines()[0]), "Canales (2/3)");
    }
}
