//! Filter state for an interactive run.
//!
//! [`FilterSession`] owns the current [`FilterSelection`] and memoises the
//! [`MetricsSnapshot`] computed for it. Any selection change drops the
//! memoised snapshot as a whole; the next [`FilterSession::snapshot`] call
//! recomputes it from the immutable datasets.

use std::sync::Arc;

use insights_core::metrics::{distinct_campaigns, distinct_channels};
use insights_core::models::{AdDataset, FilterSelection, TrafficDataset};
use insights_data::analysis::{analyze, MetricsSnapshot};

use crate::data_manager::LoadedDatasets;

// ── FilterSession ─────────────────────────────────────────────────────────────

pub struct FilterSession {
    ads: Arc<AdDataset>,
    traffic: Arc<TrafficDataset>,
    /// Channel options in first-appearance order.
    channel_options: Vec<String>,
    /// Campaign options in first-appearance order.
    campaign_options: Vec<String>,
    selection: FilterSelection,
    snapshot: Option<MetricsSnapshot>,
    recomputations: u32,
}

impl FilterSession {
    /// Start a session with `selection` as the initial filter.
    pub fn new(datasets: &LoadedDatasets, selection: FilterSelection) -> Self {
        Self::from_parts(datasets.ads.clone(), datasets.traffic.clone(), selection)
    }

    pub fn from_parts(
        ads: Arc<AdDataset>,
        traffic: Arc<TrafficDataset>,
        selection: FilterSelection,
    ) -> Self {
        let channel_options = distinct_channels(&ads);
        let campaign_options = distinct_campaigns(&ads);
        Self {
            ads,
            traffic,
            channel_options,
            campaign_options,
            selection,
            snapshot: None,
            recomputations: 0,
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Snapshot for the current selection, computed on first use after any
    /// change.
    pub fn snapshot(&mut self) -> &MetricsSnapshot {
        if self.snapshot.is_none() {
            self.recomputations += 1;
            tracing::debug!(
                channels = self.selection.channels.len(),
                campaigns = self.selection.campaigns.len(),
                "recomputing snapshot"
            );
        }
        let (ads, traffic, selection) = (&self.ads, &self.traffic, &self.selection);
        self.snapshot
            .get_or_insert_with(|| analyze(ads, traffic, selection))
    }

    /// Snapshot for the current selection if it has already been computed.
    pub fn cached_snapshot(&self) -> Option<&MetricsSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn channel_options(&self) -> &[String] {
        &self.channel_options
    }

    pub fn campaign_options(&self) -> &[String] {
        &self.campaign_options
    }

    pub fn is_channel_selected(&self, channel: &str) -> bool {
        self.selection.channels.contains(channel)
    }

    pub fn is_campaign_selected(&self, campaign: &str) -> bool {
        self.selection.campaigns.contains(campaign)
    }

    /// How many times a snapshot has been computed.
    pub fn recomputations(&self) -> u32 {
        self.recomputations
    }

    // ── Mutations ─────────────────────────────────────────────────────────

    /// Add `channel` to the selection, or remove it if already selected.
    pub fn toggle_channel(&mut self, channel: &str) {
        if !self.selection.channels.remove(channel) {
            self.selection.channels.insert(channel.to_string());
        }
        self.invalidate();
    }

    /// Add `campaign` to the selection, or remove it if already selected.
    pub fn toggle_campaign(&mut self, campaign: &str) {
        if !self.selection.campaigns.remove(campaign) {
            self.selection.campaigns.insert(campaign.to_string());
        }
        self.invalidate();
    }

    /// Select every channel and campaign in the ad dataset.
    pub fn select_all(&mut self) {
        self.set_selection(FilterSelection::new(
            self.channel_options.clone(),
            self.campaign_options.clone(),
        ));
    }

    /// Deselect everything. The resulting snapshot is empty, not an error.
    pub fn clear(&mut self) {
        self.set_selection(FilterSelection::default());
    }

    pub fn set_selection(&mut self, selection: FilterSelection) {
        self.selection = selection;
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.snapshot = None;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
