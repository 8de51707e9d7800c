//! Campaign detail table for the dashboard.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one row per filtered
//! ad record plus a highlighted totals row at the bottom.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use insights_core::formatting;
use insights_core::metrics::{click_through_rate, compute_roas, cost_per_acquisition};
use insights_core::models::{AdRecord, AggregateKpis};

use crate::themes::Theme;

const HEADERS: [&str; 11] = [
    "Campaña",
    "Canal",
    "Fecha",
    "Impr.",
    "Clicks",
    "CTR",
    "Conv.",
    "CPA",
    "Gasto",
    "Ingresos",
    "ROAS",
];

/// Totals shown under the detail rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableTotals {
    pub impressions: u64,
    pub clicks: u64,
    pub kpis: AggregateKpis,
    pub entries_count: usize,
}

impl TableTotals {
    pub fn from_rows(rows: &[AdRecord], kpis: AggregateKpis) -> Self {
        Self {
            impressions: rows.iter().fold(0, |acc, r| acc.saturating_add(r.impressions)),
            clicks: rows.iter().fold(0, |acc, r| acc.saturating_add(r.clicks)),
            kpis,
            entries_count: rows.len(),
        }
    }

    /// Clicks over impressions across every row.
    pub fn ctr(&self) -> f64 {
        if self.impressions == 0 {
            0.0
        } else {
            self.clicks as f64 / self.impressions as f64
        }
    }

    /// Total spend over total conversions.
    pub fn cpa(&self) -> f64 {
        if self.kpis.total_conversions == 0 {
            0.0
        } else {
            self.kpis.total_spend / self.kpis.total_conversions as f64
        }
    }
}

/// Render the campaign detail table into `area`.
pub fn render_table_view(
    frame: &mut Frame,
    area: Rect,
    rows: &[AdRecord],
    totals: &TableTotals,
    theme: &Theme,
) {
    let header = Row::new(
        HEADERS
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let mut all_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            let roas = compute_roas(row);
            Row::new(vec![
                Cell::from(row.campaign.clone()),
                Cell::from(row.channel.clone()),
                Cell::from(row.date.format("%Y-%m-%d").to_string()),
                Cell::from(formatting::format_count(row.impressions)),
                Cell::from(formatting::format_count(row.clicks)),
                Cell::from(formatting::format_percent(click_through_rate(row))),
                Cell::from(formatting::format_count(row.conversions)),
                Cell::from(formatting::format_ars(cost_per_acquisition(row))),
                Cell::from(formatting::format_ars(row.spend())),
                Cell::from(formatting::format_ars(row.revenue())),
                Cell::from(formatting::format_roas(roas)).style(theme.roas_style(roas)),
            ])
            .style(style)
        })
        .collect();

    all_rows.push(
        Row::new(vec![
            Cell::from("TOTAL"),
            Cell::from(format!("{} filas", totals.entries_count)),
            Cell::from(""),
            Cell::from(formatting::format_count(totals.impressions)),
            Cell::from(formatting::format_count(totals.clicks)),
            Cell::from(formatting::format_percent(totals.ctr())),
            Cell::from(formatting::format_count(totals.kpis.total_conversions)),
            Cell::from(formatting::format_ars(totals.cpa())),
            Cell::from(formatting::format_ars(totals.kpis.total_spend)),
            Cell::from(formatting::format_ars(totals.kpis.total_revenue)),
            Cell::from(formatting::format_roas(totals.kpis.global_roas)),
        ])
        .style(theme.table_total),
    );

    let widths = [
        Constraint::Min(14),
        Constraint::Length(12),
        Constraint::Length(11),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(9),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(6),
    ];

    let table = Table::new(all_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Detalle de campañas "),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Placeholder shown when the filter keeps no rows.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Sin datos para los filtros seleccionados",
            theme.warning,
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Presione 'a' para seleccionar todo, 'q' o Ctrl+C para salir",
            theme.dim,
        )),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text))
            .block(Block::default().borders(Borders::ALL).title(" Detalle ")),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
