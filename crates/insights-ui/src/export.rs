//! Plain-text outputs: the stdout summary, the Markdown slide deck and the
//! JSON snapshot written next to it.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use insights_core::error::Result;
use insights_core::formatting::format_roas;
use insights_data::analysis::MetricsSnapshot;

use crate::components::header::TITLE;
use crate::components::kpi_cards::kpi_cards;
use crate::dashboard_view::{roas_chart, traffic_chart, ROAS_CHART_TITLE, TRAFFIC_CHART_TITLE};

pub const DECK_FILE_NAME: &str = "presentacion.md";
pub const SNAPSHOT_FILE_NAME: &str = "resumen_dashboard.json";

/// Bar width used by text exports.
const EXPORT_BAR_WIDTH: u16 = 30;

/// A file produced by an export, with its size on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub bytes: u64,
}

// ── Rendering ─────────────────────────────────────────────────────────────────

fn selection_line(snapshot: &MetricsSnapshot) -> String {
    let join = |items: &[String]| {
        if items.is_empty() {
            "(ninguno)".to_string()
        } else {
            items.join(", ")
        }
    };
    format!(
        "Canales: {} | Campañas: {}",
        join(&snapshot.metadata.selected_channels),
        join(&snapshot.metadata.selected_campaigns)
    )
}

fn chart_block(out: &mut String, lines: Vec<String>, empty: &str) {
    if lines.is_empty() {
        out.push_str(empty);
        out.push('\n');
    }
    for line in lines {
        out.push_str(&line);
        out.push('\n');
    }
}

/// Text report printed by `--view summary`.
pub fn render_summary(snapshot: &MetricsSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", TITLE);
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(out, "{}", selection_line(snapshot));
    let _ = writeln!(
        out,
        "Filas: {} de {}",
        snapshot.metadata.filtered_rows, snapshot.metadata.ad_rows
    );
    out.push('\n');

    for card in kpi_cards(&snapshot.kpis) {
        let _ = writeln!(out, "{:<16}{:>14}", format!("{}:", card.label), card.value);
    }

    let _ = writeln!(out, "\n{}", ROAS_CHART_TITLE);
    chart_block(
        &mut out,
        roas_chart(snapshot)
            .with_width(EXPORT_BAR_WIDTH)
            .to_plain_lines(),
        "(sin campañas)",
    );

    let _ = writeln!(out, "\n{}", TRAFFIC_CHART_TITLE);
    chart_block(
        &mut out,
        traffic_chart(snapshot)
            .with_width(EXPORT_BAR_WIDTH)
            .to_plain_lines(),
        "(sin tráfico)",
    );
    out
}

/// Three Markdown slides separated by `---`:
///
/// 1. "Resumen ejecutivo" with the headline figures.
/// 2. "Resumen visual del dashboard" with both charts as text bars.
/// 3. The KPI table.
pub fn render_deck(snapshot: &MetricsSnapshot) -> String {
    let cards = kpi_cards(&snapshot.kpis);
    let mut out = String::new();

    // Slide 1
    let _ = writeln!(out, "# Resumen ejecutivo\n");
    for card in &cards {
        let _ = writeln!(out, "- **{}**: {}", card.label, card.value);
    }
    if let Some(best) = snapshot.ranked.first() {
        let _ = writeln!(
            out,
            "- **Mejor campaña**: {} ({}) con ROAS {}",
            best.campaign,
            best.channel,
            format_roas(best.roas)
        );
    }
    let _ = writeln!(out, "\n_{}_", selection_line(snapshot));
    let _ = writeln!(out, "\n_Generado: {}_", snapshot.metadata.generated_at);

    // Slide 2
    let _ = writeln!(out, "\n---\n\n# Resumen visual del dashboard\n");
    let _ = writeln!(out, "## {}\n\n```text", ROAS_CHART_TITLE);
    chart_block(
        &mut out,
        roas_chart(snapshot)
            .with_width(EXPORT_BAR_WIDTH)
            .to_plain_lines(),
        "(sin campañas)",
    );
    let _ = writeln!(out, "```\n\n## {}\n\n```text", TRAFFIC_CHART_TITLE);
    chart_block(
        &mut out,
        traffic_chart(snapshot)
            .with_width(EXPORT_BAR_WIDTH)
            .to_plain_lines(),
        "(sin tráfico)",
    );
    let _ = writeln!(out, "```");

    // Slide 3
    let _ = writeln!(out, "\n---\n\n# KPIs\n");
    let _ = writeln!(out, "| KPI | Valor |\n|---|---:|");
    for card in &cards {
        let _ = writeln!(out, "| {} | {} |", card.label, card.value);
    }
    out
}

// ── Writing ───────────────────────────────────────────────────────────────────

fn write_file(dir: &Path, name: &str, body: &str) -> Result<WrittenFile> {
    fs::create_dir_all(dir)?;
    let path = dir.join(name);
    fs::write(&path, body)?;
    let bytes = fs::metadata(&path)?.len();
    tracing::info!(path = %path.display(), bytes, "export written");
    Ok(WrittenFile { path, bytes })
}

/// Write the slide deck to `<dir>/presentacion.md`, creating `dir` if needed.
pub fn write_deck(dir: &Path, snapshot: &MetricsSnapshot) -> Result<WrittenFile> {
    write_file(dir, DECK_FILE_NAME, &render_deck(snapshot))
}

/// Write the snapshot as pretty JSON to `<dir>/resumen_dashboard.json`.
pub fn write_snapshot_json(dir: &Path, snapshot: &MetricsSnapshot) -> Result<WrittenFile> {
    let body = serde_json::to_string_pretty(snapshot)?;
    write_file(dir, SNAPSHOT_FILE_NAME, &body)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
