use crate::themes::Theme;
use insights_core::formatting::{format_count, format_number, format_roas};
use insights_core::models::AggregateKpis;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

/// Column width of a single card, borders included.
pub const CARD_WIDTH: usize = 18;

/// One headline figure.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiCard {
    pub label: &'static str,
    pub value: String,
}

/// The four KPI cards, in display order.
pub fn kpi_cards(kpis: &AggregateKpis) -> [KpiCard; 4] {
    [
        KpiCard {
            label: "Gasto (ARS)",
            value: format_number(kpis.total_spend, 0),
        },
        KpiCard {
            label: "Ingresos (ARS)",
            value: format_number(kpis.total_revenue, 0),
        },
        KpiCard {
            label: "Conversiones",
            value: format_count(kpis.total_conversions),
        },
        KpiCard {
            label: "ROAS",
            value: format_roas(kpis.global_roas),
        },
    ]
}

// ── KpiRow ────────────────────────────────────────────────────────────────────

/// Four boxed cards laid side by side over three lines:
///
/// ```text
/// ┌ Gasto (ARS) ───┐┌ Ingresos (ARS) ┐ ...
/// │          1,500 ││          3,600 │ ...
/// └────────────────┘└────────────────┘ ...
/// ```
pub struct KpiRow<'a> {
    pub kpis: AggregateKpis,
    pub theme: &'a Theme,
}

impl<'a> KpiRow<'a> {
    pub fn new(kpis: AggregateKpis, theme: &'a Theme) -> Self {
        Self { kpis, theme }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let inner = CARD_WIDTH - 2;
        let cards = kpi_cards(&self.kpis);

        let mut top = Vec::new();
        let mut middle = Vec::new();
        let mut bottom = Vec::new();

        for card in cards.iter() {
            let title = format!(" {} ", card.label);
            let fill = inner.saturating_sub(title.width());
            top.push(Span::styled("┌", self.theme.separator));
            top.push(Span::styled(title, self.theme.label));
            top.push(Span::styled(
                format!("{}┐", "─".repeat(fill)),
                self.theme.separator,
            ));

            let value_style = if card.label == "ROAS" {
                self.theme.roas_style(self.kpis.global_roas)
            } else {
                self.theme.value
            };
            let pad = inner.saturating_sub(card.value.width() + 1);
            middle.push(Span::styled("│", self.theme.separator));
            middle.push(Span::styled(
                format!("{}{} ", " ".repeat(pad), card.value),
                value_style,
            ));
            middle.push(Span::styled("│", self.theme.separator));

            bottom.push(Span::styled(
                format!("└{}┘", "─".repeat(inner)),
                self.theme.separator,
            ));
        }

        vec![Line::from(top), Line::from(middle), Line::from(bottom)]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn kpis() -> AggregateKpis {
        AggregateKpis {
            total_spend: 1500.0,
            total_revenue: 3600.0,
            total_conversions: 42,
            global_roas: 2.4,
        }
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_card_values() {
        let cards = kpi_cards(&kpis());
        assert_eq!(cards[0].value, "1,500");
        assert_eq!(cards[1].value, "3,600");
        assert_eq!(cards[2].value, "42");
        assert_eq!(cards[3].value, "2.40");
    }

    #[test]
    fn test_empty_kpis_render_zeroes() {
        let cards = kpi_cards(&AggregateKpis::default());
        assert_eq!(cards[0].value, "0");
        assert_eq!(cards[3].value, "0.00");
    }

    #[test]
    fn test_row_lines_have_equal_width() {
        let theme = Theme::dark();
        let lines = KpiRow::new(kpis(), &theme).to_lines();
        assert_eq!(lines.len(), 3);
        let widths: Vec<usize> = lines.iter().map(|l| text(l).width()).collect();
        assert!(widths.iter().all(|w| *w == CARD_WIDTH * 4), "{widths:?}");
    }

    #[test]
    fn test_row_contains_labels_and_values() {
        let theme = Theme::dark();
        let lines = KpiRow::new(kpis(), &theme).to_lines();
        let top = text(&lines[0]);
        let middle = text(&lines[1]);
        assert!(top.contains("Ingresos (ARS)"));
        assert!(top.contains("Conversiones"));
        assert!(middle.contains("3,600"));
        assert!(!middle.contains('$'), "amount cards carry no currency sign: {middle}");
        assert!(middle.contains("2.40"));
    }

    #[test]
    fn test_roas_value_uses_tier_style() {
        let theme = Theme::dark();
        let lines = KpiRow::new(kpis(), &theme).to_lines();
        let roas_span = lines[1]
            .spans
            .iter()
            .find(|s| s.content.contains("2.40"))
            .unwrap();
        assert_eq!(roas_span.style, theme.roas_medium);
    }
}
