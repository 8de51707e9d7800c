use clap::Parser;
use std::path::PathBuf;

use crate::metrics::{distinct_campaigns, distinct_channels};
use crate::models::{AdRecord, FilterSelection};

/// Default location of the ad dataset.
pub const DEFAULT_ADS_CSV: &str = "analitica/datos_publicidad.csv";
/// Default location of the web traffic dataset.
pub const DEFAULT_TRAFFIC_CSV: &str = "analitica/datos_trafico_web.csv";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Campaign performance dashboard: ROAS, spend, revenue and web traffic
#[derive(Parser, Debug, Clone)]
#[command(
    name = "campaign-insights",
    about = "Campaign performance dashboard: ROAS, spend, revenue and web traffic",
    version
)]
pub struct Settings {
    /// Ad spend / performance CSV
    #[arg(long, default_value = DEFAULT_ADS_CSV)]
    pub ads: PathBuf,

    /// Web traffic CSV
    #[arg(long, default_value = DEFAULT_TRAFFIC_CSV)]
    pub traffic: PathBuf,

    /// Output mode
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "summary", "deck"])]
    pub view: String,

    /// Only include this channel (repeatable; default: all channels)
    #[arg(long = "channel")]
    pub channels: Vec<String>,

    /// Only include this campaign (repeatable; default: all campaigns)
    #[arg(long = "campaign")]
    pub campaigns: Vec<String>,

    /// Directory for the JSON snapshot written by the deck export
    #[arg(long, default_value = "resultados")]
    pub output_dir: PathBuf,

    /// Directory for the Markdown slide deck
    #[arg(long, default_value = "presentacion")]
    pub deck_dir: PathBuf,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// The two input files for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub ads: PathBuf,
    pub traffic: PathBuf,
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self {
            ads: PathBuf::from(DEFAULT_ADS_CSV),
            traffic: PathBuf::from(DEFAULT_TRAFFIC_CSV),
        }
    }
}

impl Settings {
    /// Parse the process arguments and apply `--debug`.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    pub fn source_paths(&self) -> SourcePaths {
        SourcePaths {
            ads: self.ads.clone(),
            traffic: self.traffic.clone(),
        }
    }

    /// Build the starting filter. A side left empty on the command line
    /// selects every value present in `ads`.
    pub fn initial_selection(&self, ads: &[AdRecord]) -> FilterSelection {
        let channels = if self.channels.is_empty() {
            distinct_channels(ads)
        } else {
            self.channels.clone()
        };
        let campaigns = if self.campaigns.is_empty() {
            distinct_campaigns(ads)
        } else {
            self.campaigns.clone()
        };

        let known_channels = distinct_channels(ads);
        for name in self.channels.iter().filter(|c| !known_channels.contains(c)) {
            tracing::warn!(channel = %name, "channel filter matches no ad rows");
        }
        let known_campaigns = distinct_campaigns(ads);
        for name in self.campaigns.iter().filter(|c| !known_campaigns.contains(c)) {
            tracing::warn!(campaign = %name, "campaign filter matches no ad rows");
        }

        FilterSelection::new(channels, campaigns)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ad(campaign: &str, channel: &str) -> AdRecord {
        AdRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            channel: channel.to_string(),
            campaign: campaign.to_string(),
            impressions: 0,
            clicks: 0,
            conversions: 0,
            spend_amount: None,
            revenue_amount: None,
        }
    }

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["campaign-insights"]);

        assert_eq!(settings.ads, PathBuf::from(DEFAULT_ADS_CSV));
        assert_eq!(settings.traffic, PathBuf::from(DEFAULT_TRAFFIC_CSV));
        assert_eq!(settings.view, "dashboard");
        assert!(settings.channels.is_empty());
        assert!(settings.campaigns.is_empty());
        assert_eq!(settings.output_dir, PathBuf::from("resultados"));
        assert_eq!(settings.deck_dir, PathBuf::from("presentacion"));
        assert_eq!(settings.theme, "auto");
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
    }

    #[test]
    fn test_settings_repeatable_filters() {
        let settings = Settings::parse_from([
            "campaign-insights",
            "--channel",
            "Search",
            "--channel",
            "Social",
            "--campaign",
            "Verano",
        ]);
        assert_eq!(settings.channels, vec!["Search", "Social"]);
        assert_eq!(settings.campaigns, vec!["Verano"]);
    }

    #[test]
    fn test_settings_rejects_unknown_view() {
        let result = Settings::try_parse_from(["campaign-insights", "--view", "web"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_overrides_log_level() {
        let settings = Settings::load_from_args(["campaign-insights", "--debug"]);
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_source_paths() {
        let settings =
            Settings::parse_from(["campaign-insights", "--ads", "a.csv", "--traffic", "t.csv"]);
        let paths = settings.source_paths();
        assert_eq!(paths.ads, PathBuf::from("a.csv"));
        assert_eq!(paths.traffic, PathBuf::from("t.csv"));
    }

    #[test]
    fn test_initial_selection_defaults_to_all() {
        let ads = vec![ad("A", "Search"), ad("B", "Social")];
        let settings = Settings::parse_from(["campaign-insights"]);
        let sel = settings.initial_selection(&ads);
        assert_eq!(sel, FilterSelection::all_of(&ads));
    }

    #[test]
    fn test_initial_selection_uses_cli_values() {
        let ads = vec![ad("A", "Search"), ad("B", "Social")];
        let settings = Settings::parse_from(["campaign-insights", "--channel", "Social"]);
        let sel = settings.initial_selection(&ads);
        assert_eq!(sel.channels.len(), 1);
        assert!(sel.channels.contains("Social"));
        assert_eq!(sel.campaigns.len(), 2);
    }
}
