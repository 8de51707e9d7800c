//! Metrics pipeline for Campaign Insights.
//!
//! Turns loaded datasets plus a filter selection into a [`MetricsSnapshot`]
//! ready for the presentation layer.

use chrono::Utc;
use insights_core::error::Result;
use insights_core::metrics::{aggregate_kpis, filter_by, group_by_channel, rank_by_roas};
use insights_core::models::{
    AdRecord, AggregateKpis, ChannelTrafficAggregate, FilterSelection, RankedCampaign,
    TrafficRecord,
};
use insights_core::settings::SourcePaths;
use serde::{Deserialize, Serialize};

use crate::reader::load_datasets;

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// RFC 3339 timestamp when this snapshot was computed.
    pub generated_at: String,
    /// Ad rows in the full dataset.
    pub ad_rows: usize,
    /// Ad rows kept by the filter.
    pub filtered_rows: usize,
    /// Traffic rows in the full dataset.
    pub traffic_rows: usize,
    /// Channels selected when the snapshot was computed.
    pub selected_channels: Vec<String>,
    /// Campaigns selected when the snapshot was computed.
    pub selected_campaigns: Vec<String>,
}

/// Everything the dashboard and the slide deck display for one filter
/// selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// KPI cards for the filtered rows.
    pub kpis: AggregateKpis,
    /// "ROAS per campaign" series, filtered rows ranked by ROAS.
    pub ranked: Vec<RankedCampaign>,
    /// "Visits per channel" series. Traffic is never filtered.
    pub traffic: ChannelTrafficAggregate,
    /// Filtered ad rows in load order, for the detail table.
    pub detail: Vec<AdRecord>,
    pub metadata: SnapshotMetadata,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Compute a snapshot from already-loaded datasets.
///
/// 1. Filter ad rows by `selection`.
/// 2. Aggregate KPIs over the filtered rows.
/// 3. Rank the filtered rows by ROAS.
/// 4. Sum traffic users per channel over the full traffic dataset.
pub fn analyze(
    ads: &[AdRecord],
    traffic: &[TrafficRecord],
    selection: &FilterSelection,
) -> MetricsSnapshot {
    let detail = filter_by(ads, selection);
    let kpis = aggregate_kpis(&detail);
    let ranked = rank_by_roas(&detail);
    let traffic_agg = group_by_channel(traffic);

    tracing::debug!(
        ad_rows = ads.len(),
        filtered_rows = detail.len(),
        traffic_channels = traffic_agg.len(),
        "metrics snapshot computed"
    );

    let metadata = SnapshotMetadata {
        generated_at: Utc::now().to_rfc3339(),
        ad_rows: ads.len(),
        filtered_rows: detail.len(),
        traffic_rows: traffic.len(),
        selected_channels: selection.channels.iter().cloned().collect(),
        selected_campaigns: selection.campaigns.iter().cloned().collect(),
    };

    MetricsSnapshot {
        kpis,
        ranked,
        traffic: traffic_agg,
        detail,
        metadata,
    }
}

/// Load both datasets from `paths` and compute a snapshot over every channel
/// and campaign.
pub fn analyze_sources(paths: &SourcePaths) -> Result<MetricsSnapshot> {
    let (ads, traffic) = load_datasets(paths)?;
    let selection = FilterSelection::all_of(&ads);
    Ok(analyze(&ads, &traffic, &selection))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn ad(campaign: &str, channel: &str, spend: f64, revenue: f64, conversions: u64) -> AdRecord {
        AdRecord {
            date: day(),
            channel: channel.to_string(),
            campaign: campaign.to_string(),
            impressions: 100,
            clicks: 10,
            conversions,
            spend_amount: Some(spend),
            revenue_amount: Some(revenue),
        }
    }

    fn visit(channel: &str, users: u64) -> TrafficRecord {
        TrafficRecord {
            date: day(),
            channel: channel.to_string(),
            users,
            extra: Default::default(),
        }
    }

    #[test]
    fn test_analyze_all_selected() {
        let ads = vec![
            ad("A", "Search", 100.0, 300.0, 5),
            ad("B", "Social", 0.0, 0.0, 0),
        ];
        let traffic = vec![visit("Search", 10), visit("Social", 5)];
        let snapshot = analyze(&ads, &traffic, &FilterSelection::all_of(&ads));

        assert_eq!(snapshot.kpis.total_spend, 100.0);
        assert_eq!(snapshot.kpis.global_roas, 3.0);
        assert_eq!(snapshot.ranked.len(), 2);
        assert_eq!(snapshot.ranked[0].campaign, "A");
        assert_eq!(snapshot.traffic.grand_total(), 15);
        assert_eq!(snapshot.metadata.filtered_rows, 2);
    }

    #[test]
    fn test_analyze_filter_does_not_touch_traffic() {
        let ads = vec![
            ad("A", "Search", 100.0, 300.0, 5),
            ad("B", "Social", 50.0, 50.0, 1),
        ];
        let traffic = vec![visit("Search", 10), visit("Social", 5)];
        let selection = FilterSelection::new(["Social"], ["A", "B"]);
        let snapshot = analyze(&ads, &traffic, &selection);

        assert_eq!(snapshot.detail.len(), 1);
        assert_eq!(snapshot.ranked.len(), 1);
        assert_eq!(snapshot.ranked[0].campaign, "B");
        assert_eq!(snapshot.kpis.total_spend, 50.0);
        assert_eq!(snapshot.traffic.len(), 2);
        assert_eq!(snapshot.metadata.selected_channels, vec!["Social"]);
    }

    #[test]
    fn test_analyze_empty_selection_is_valid() {
        let ads = vec![ad("A", "Search", 100.0, 300.0, 5)];
        let snapshot = analyze(&ads, &[], &FilterSelection::default());

        assert!(snapshot.detail.is_empty());
        assert!(snapshot.ranked.is_empty());
        assert_eq!(snapshot.kpis, AggregateKpis::default());
        assert_eq!(snapshot.metadata.ad_rows, 1);
    }

    #[test]
    fn test_snapshot_serialises_to_json() {
        let ads = vec![ad("A", "Search", 100.0, 300.0, 5)];
        let snapshot = analyze(&ads, &[visit("Search", 3)], &FilterSelection::all_of(&ads));
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["kpis"]["total_conversions"], 5);
        assert_eq!(value["traffic"]["users_by_channel"]["Search"], 3);
        assert_eq!(value["ranked"][0]["date"], "2024-03-01");
    }
}
