//! Pure metric functions over loaded datasets.
//!
//! Nothing here performs I/O. Every function is total: zero denominators and
//! ratios too large for an `f64` yield `0.0`, and integer sums saturate. The
//! loader rejects datasets whose totals would reach either case.

use std::collections::{BTreeMap, HashSet};

use crate::models::{
    AdRecord, AggregateKpis, ChannelTrafficAggregate, FilterSelection, RankedCampaign,
    TrafficRecord,
};

/// Decimal places kept on per-row ROAS.
pub const ROAS_PRECISION: u32 = 2;

// ── Per-row ───────────────────────────────────────────────────────────────────

/// Return on ad spend for one row, rounded to [`ROAS_PRECISION`] places.
///
/// Returns `0.0` when spend is zero or absent. This is a business rule, not
/// an error path.
pub fn compute_roas(record: &AdRecord) -> f64 {
    round_to(safe_ratio(record.revenue(), record.spend()), ROAS_PRECISION)
}

/// Click-through rate (`clicks / impressions`), `0.0` with no impressions.
pub fn click_through_rate(record: &AdRecord) -> f64 {
    safe_ratio(record.clicks as f64, record.impressions as f64)
}

/// Cost per acquisition (`spend / conversions`), `0.0` with no conversions.
pub fn cost_per_acquisition(record: &AdRecord) -> f64 {
    safe_ratio(record.spend(), record.conversions as f64)
}

// ── Filtering ─────────────────────────────────────────────────────────────────

/// Keep rows whose channel AND campaign are both selected.
///
/// An empty set on either side yields an empty subset. Load order is kept.
pub fn filter_by(ads: &[AdRecord], selection: &FilterSelection) -> Vec<AdRecord> {
    if selection.is_empty() {
        return Vec::new();
    }
    ads.iter()
        .filter(|r| {
            selection.channels.contains(&r.channel) && selection.campaigns.contains(&r.campaign)
        })
        .cloned()
        .collect()
}

/// Distinct channel names in order of first appearance.
pub fn distinct_channels(ads: &[AdRecord]) -> Vec<String> {
    distinct_by(ads, |r| r.channel.as_str())
}

/// Distinct campaign names in order of first appearance.
pub fn distinct_campaigns(ads: &[AdRecord]) -> Vec<String> {
    distinct_by(ads, |r| r.campaign.as_str())
}

// ── Aggregation ───────────────────────────────────────────────────────────────

/// Sum spend, revenue and conversions; global ROAS is revenue-over-spend of
/// the totals (spend-weighted), `0.0` when total spend is zero.
pub fn aggregate_kpis(subset: &[AdRecord]) -> AggregateKpis {
    let mut kpis = AggregateKpis::default();
    for record in subset {
        kpis.total_spend += record.spend();
        kpis.total_revenue += record.revenue();
        kpis.total_conversions = kpis.total_conversions.saturating_add(record.conversions);
    }
    kpis.global_roas = if kpis.total_spend > 0.0 {
        safe_ratio(kpis.total_revenue, kpis.total_spend)
    } else {
        0.0
    };
    kpis
}

/// Sum users per channel. Channels are compared by exact string equality.
pub fn group_by_channel(traffic: &[TrafficRecord]) -> ChannelTrafficAggregate {
    let mut users_by_channel: BTreeMap<String, u64> = BTreeMap::new();
    for record in traffic {
        let users = users_by_channel.entry(record.channel.clone()).or_default();
        *users = users.saturating_add(record.users);
    }
    ChannelTrafficAggregate { users_by_channel }
}

/// Rows ordered by ROAS descending. The sort is stable, so equal ROAS keeps
/// load order.
pub fn rank_by_roas(ads: &[AdRecord]) -> Vec<RankedCampaign> {
    let mut ranked: Vec<RankedCampaign> = ads
        .iter()
        .map(|r| RankedCampaign {
            campaign: r.campaign.clone(),
            channel: r.channel.clone(),
            date: r.date,
            roas: compute_roas(r),
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.roas
            .partial_cmp(&a.roas)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let ratio = numerator / denominator;
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

fn distinct_by<'a>(ads: &'a [AdRecord], key: impl Fn(&'a AdRecord) -> &'a str) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for record in ads {
        let k = key(record);
        if seen.insert(k) {
            out.push(k.to_string());
        }
    }
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
