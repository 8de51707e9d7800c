mod bootstrap;

use std::process::ExitCode;

use anyhow::Result;
use insights_core::settings::Settings;
use insights_runtime::data_manager::DatasetCache;
use insights_runtime::filter_session::FilterSession;
use insights_ui::app::App;
use insights_ui::export;

/// Exit status for input files that cannot be loaded.
const LOAD_FAILURE_EXIT: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let settings = Settings::load();

    let logs_dir = bootstrap::ensure_directories()?;
    let log_file = match (&settings.log_file, settings.view.as_str()) {
        (Some(path), _) => Some(path.clone()),
        (None, "dashboard") => Some(logs_dir.join(bootstrap::DASHBOARD_LOG_NAME)),
        (None, _) => None,
    };
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("Campaign Insights v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Ads: {}, Traffic: {}, View: {}, Theme: {}",
        settings.ads.display(),
        settings.traffic.display(),
        settings.view,
        settings.theme
    );

    let mut cache = DatasetCache::new(settings.source_paths());
    let datasets = match cache.get_or_load() {
        Ok(datasets) => datasets,
        Err(e) if e.is_load_error() => {
            tracing::error!("load failed: {e}");
            eprintln!("ERROR: {e}");
            return Ok(ExitCode::from(LOAD_FAILURE_EXIT));
        }
        Err(e) => return Err(e.into()),
    };

    let selection = settings.initial_selection(&datasets.ads);
    let mut session = FilterSession::new(&datasets, selection);

    match settings.view.as_str() {
        "dashboard" => {
            tracing::info!("Starting interactive dashboard...");
            let app = App::new(&settings.theme, session);

            // Raw mode turns Ctrl+C into a key event, so the loop handles
            // it alongside 'q'.
            app.run_dashboard().await?;
        }

        "summary" => {
            print!("{}", export::render_summary(session.snapshot()));
        }

        "deck" => {
            let snapshot = session.snapshot();
            let json = export::write_snapshot_json(&settings.output_dir, snapshot)?;
            let deck = export::write_deck(&settings.deck_dir, snapshot)?;
            for file in [json, deck] {
                println!("Archivo generado: {}", file.path.display());
                println!("Tamaño (bytes): {}", file.bytes);
            }
        }

        unknown => {
            eprintln!("Unknown view mode: {}", unknown);
        }
    }

    Ok(ExitCode::SUCCESS)
}
