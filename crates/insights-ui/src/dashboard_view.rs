//! Interactive dashboard screen.
//!
//! Lays out the header, KPI cards, the two bar charts, the filter panel and
//! (optionally) the campaign detail table for one [`MetricsSnapshot`].

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use insights_core::formatting::{format_count, format_roas};
use insights_data::analysis::MetricsSnapshot;

use crate::components::bar_chart::HorizontalBarChart;
use crate::components::filter_panel::FilterList;
use crate::components::header::Header;
use crate::components::kpi_cards::KpiRow;
use crate::table_view::{self, TableTotals};
use crate::themes::Theme;

pub const ROAS_CHART_TITLE: &str = "ROAS por campaña";
pub const TRAFFIC_CHART_TITLE: &str = "Visitas por canal";

/// Which filter list the cursor keys act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterFocus {
    Channels,
    Campaigns,
}

/// All data required to render the dashboard.
pub struct DashboardViewData<'a> {
    pub snapshot: &'a MetricsSnapshot,
    /// `(channel, selected)` in load order.
    pub channels: Vec<(&'a str, bool)>,
    /// `(campaign, selected)` in load order.
    pub campaigns: Vec<(&'a str, bool)>,
    pub channel_cursor: usize,
    pub campaign_cursor: usize,
    pub focus: FilterFocus,
    pub show_table: bool,
}

impl DashboardViewData<'_> {
    fn selected_count(options: &[(&str, bool)]) -> usize {
        options.iter().filter(|(_, on)| *on).count()
    }
}

// ── Chart series ──────────────────────────────────────────────────────────────

/// Ranked ROAS bars, one per filtered row. Labels carry the channel because
/// a campaign may run on several channels.
pub fn roas_chart(snapshot: &MetricsSnapshot) -> HorizontalBarChart {
    let bars = snapshot
        .ranked
        .iter()
        .map(|r| (format!("{} ({})", r.campaign, r.channel), r.roas))
        .collect();
    HorizontalBarChart::new(bars, format_roas)
}

/// Users per channel, in channel-name order.
pub fn traffic_chart(snapshot: &MetricsSnapshot) -> HorizontalBarChart {
    let bars = snapshot
        .traffic
        .iter()
        .map(|(channel, users)| (channel.to_string(), users as f64))
        .collect();
    HorizontalBarChart::new(bars, |v| format_count(v as u64))
}

// ── Main render ───────────────────────────────────────────────────────────────

/// Render the dashboard into the full frame.
pub fn render_dashboard(frame: &mut Frame, data: &DashboardViewData, theme: &Theme) {
    let area = frame.area();
    let detail_height = if data.show_table {
        Constraint::Min(6)
    } else {
        Constraint::Length(0)
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Min(8),
            detail_height,
            Constraint::Length(1),
        ])
        .split(area);

    render_summary_band(frame, rows[0], data, theme);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(32)])
        .split(rows[1]);
    render_charts(frame, middle[0], data.snapshot, theme);
    render_filters(frame, middle[1], data, theme);

    if data.show_table {
        if data.snapshot.detail.is_empty() {
            table_view::render_no_data(frame, rows[2], theme);
        } else {
            let totals = TableTotals::from_rows(&data.snapshot.detail, data.snapshot.kpis);
            table_view::render_table_view(frame, rows[2], &data.snapshot.detail, &totals, theme);
        }
    }

    frame.render_widget(Paragraph::new(key_help(theme)), rows[3]);
}

fn render_summary_band(frame: &mut Frame, area: Rect, data: &DashboardViewData, theme: &Theme) {
    let header = Header::new(
        (
            DashboardViewData::selected_count(&data.channels),
            data.channels.len(),
        ),
        (
            DashboardViewData::selected_count(&data.campaigns),
            data.campaigns.len(),
        ),
        theme,
    );
    let mut lines = header.to_lines();
    lines.extend(KpiRow::new(data.snapshot.kpis, theme).to_lines());
    frame.render_widget(Paragraph::new(Text::from(lines)), area);
}

fn render_charts(frame: &mut Frame, area: Rect, snapshot: &MetricsSnapshot, theme: &Theme) {
    let halves = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let bar_width = area.width.saturating_sub(40).clamp(10, 50);

    let roas_lines = if snapshot.ranked.is_empty() {
        vec![Line::from(Span::styled("Sin campañas seleccionadas", theme.dim))]
    } else {
        roas_chart(snapshot)
            .with_width(bar_width)
            .to_lines(theme, theme.bar_roas, |v| theme.roas_style(v))
    };
    frame.render_widget(
        Paragraph::new(Text::from(roas_lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", ROAS_CHART_TITLE)),
        ),
        halves[0],
    );

    let traffic_lines = if snapshot.traffic.is_empty() {
        vec![Line::from(Span::styled("Sin datos de tráfico", theme.dim))]
    } else {
        traffic_chart(snapshot)
            .with_width(bar_width)
            .to_lines(theme, theme.bar_traffic, |_| theme.value)
    };
    frame.render_widget(
        Paragraph::new(Text::from(traffic_lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", TRAFFIC_CHART_TITLE)),
        ),
        halves[1],
    );
}

/// Split `available` option rows between the two filter lists. A list that
/// fits in its half gives the rest to the other one.
pub fn split_filter_rows(available: usize, channels: usize, campaigns: usize) -> (usize, usize) {
    let half = available / 2;
    let (c, k) = if channels + campaigns <= available {
        (channels, campaigns)
    } else if channels <= half {
        (channels, available - channels)
    } else if campaigns <= available - half {
        (available - campaigns, campaigns)
    } else {
        (half, available - half)
    };
    (c.max(1), k.max(1))
}

fn render_filters(frame: &mut Frame, area: Rect, data: &DashboardViewData, theme: &Theme) {
    // Borders, two titles and the blank spacer.
    let available = (area.height as usize).saturating_sub(5);
    let (channel_rows, campaign_rows) =
        split_filter_rows(available, data.channels.len(), data.campaigns.len());

    let mut lines = FilterList {
        title: "Canales",
        options: data.channels.clone(),
        cursor: data.channel_cursor,
        focused: data.focus == FilterFocus::Channels,
        max_rows: Some(channel_rows),
        theme,
    }
    .to_lines();
    lines.push(Line::from(""));
    lines.extend(
        FilterList {
            title: "Campañas",
            options: data.campaigns.clone(),
            cursor: data.campaign_cursor,
            focused: data.focus == FilterFocus::Campaigns,
            max_rows: Some(campaign_rows),
            theme,
        }
        .to_lines(),
    );
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .block(Block::default().borders(Borders::ALL).title(" Filtros ")),
        area,
    );
}

fn key_help(theme: &Theme) -> Line<'_> {
    let keys = [
        ("c", "canal"),
        ("space", "marcar canal"),
        ("k", "campaña"),
        ("enter", "marcar campaña"),
        ("a", "todo"),
        ("x", "nada"),
        ("t", "tabla"),
        ("q", "salir"),
    ];
    let mut spans = Vec::with_capacity(keys.len() * 3);
    for (i, (key, action)) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", theme.dim));
        }
        spans.push(Span::styled(*key, theme.value));
        spans.push(Span::styled(format!(" {}", action), theme.dim));
    }
    Line::from(spans)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use insights_core::models::{AdRecord, FilterSelection, TrafficRecord};
    use insights_data::analysis::analyze;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn ad(campaign: &str, channel: &str, spend: f64, revenue: f64) -> AdRecord {
        AdRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            channel: channel.to_string(),
            campaign: campaign.to_string(),
            impressions: 1_000,
            clicks: 40,
            conversions: 2,
            spend_amount: Some(spend),
            revenue_amount: Some(revenue),
        }
    }

    fn traffic(channel: &str, users: u64) -> TrafficRecord {
        TrafficRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            channel: channel.to_string(),
            users,
            extra: Default::default(),
        }
    }

    fn make_snapshot(selection: Option<FilterSelection>) -> MetricsSnapshot {
        let ads = vec![
            ad("Verano", "Search", 100.0, 320.0),
            ad("Invierno", "Social", 100.0, 80.0),
        ];
        let visits = vec![traffic("Search", 900), traffic("Social", 300)];
        let selection = selection.unwrap_or_else(|| FilterSelection::all_of(&ads));
        analyze(&ads, &visits, &selection)
    }

    fn view(snapshot: &MetricsSnapshot, show_table: bool) -> DashboardViewData<'_> {
        DashboardViewData {
            snapshot,
            channels: vec![("Search", true), ("Social", true)],
            campaigns: vec![("Verano", true), ("Invierno", true)],
            channel_cursor: 0,
            campaign_cursor: 1,
            focus: FilterFocus::Campaigns,
            show_table,
        }
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_roas_chart_follows_ranking() {
        let snapshot = make_snapshot(None);
        let chart = roas_chart(&snapshot);
        assert_eq!(chart.bars[0], ("Verano (Search)".to_string(), 3.2));
        assert_eq!(chart.bars[1], ("Invierno (Social)".to_string(), 0.8));
    }

    #[test]
    fn test_traffic_chart_uses_unfiltered_traffic() {
        let snapshot = make_snapshot(Some(FilterSelection::default()));
        let chart = traffic_chart(&snapshot);
        assert_eq!(chart.bars.len(), 2);
        assert_eq!(chart.bars[0], ("Search".to_string(), 900.0));
    }

    #[test]
    fn test_render_dashboard_shows_sections() {
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let snapshot = make_snapshot(None);

        terminal
            .draw(|frame| render_dashboard(frame, &view(&snapshot, true), &theme))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("DASHBOARD DE RENDIMIENTO"));
        assert!(text.contains(ROAS_CHART_TITLE));
        assert!(text.contains(TRAFFIC_CHART_TITLE));
        assert!(text.contains("Detalle de campañas"));
        assert!(text.contains("Filtros"));
    }

    #[test]
    fn test_render_dashboard_without_table() {
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::light();
        let snapshot = make_snapshot(None);

        terminal
            .draw(|frame| render_dashboard(frame, &view(&snapshot, false), &theme))
            .unwrap();

        assert!(!buffer_text(&terminal).contains("Detalle de campañas"));
    }

    #[test]
    fn test_render_dashboard_empty_selection_does_not_panic() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::classic();
        let snapshot = make_snapshot(Some(FilterSelection::default()));
        let mut data = view(&snapshot, true);
        data.channels = vec![("Search", false), ("Social", false)];

        terminal
            .draw(|frame| render_dashboard(frame, &data, &theme))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Sin campañas seleccionadas"));
        assert!(text.contains("Sin datos"));
    }

    #[test]
    fn test_render_dashboard_tiny_terminal_does_not_panic() {
        let backend = TestBackend::new(20, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let snapshot = make_snapshot(None);

        terminal
            .draw(|frame| render_dashboard(frame, &view(&snapshot, true), &theme))
            .unwrap();
    }

    #[test]
    fn test_split_filter_rows() {
        assert_eq!(split_filter_rows(10, 3, 4), (3, 4));
        assert_eq!(split_filter_rows(10, 3, 20), (3, 7));
        assert_eq!(split_filter_rows(10, 20, 2), (8, 2));
        assert_eq!(split_filter_rows(10, 20, 20), (5, 5));
        assert_eq!(split_filter_rows(0, 5, 5), (1, 1));
    }

    #[test]
    fn test_render_dashboard_scrolls_long_campaign_list() {
        let backend = TestBackend::new(120, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let snapshot = make_snapshot(None);
        let names: Vec<String> = (0..40).map(|i| format!("Campania{i:02}")).collect();
        let mut data = view(&snapshot, true);
        data.campaigns = names.iter().map(|n| (n.as_str(), true)).collect();
        data.campaign_cursor = 39;

        terminal
            .draw(|frame| render_dashboard(frame, &data, &theme))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("▶ [x] Campania39"), "cursor row must stay visible");
        assert!(!text.contains("Campania00"));
        assert!(text.contains("↑"));
    }
}
