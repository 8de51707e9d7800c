use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A single advertising row read from the ad dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdRecord {
    /// Calendar day the row reports on.
    pub date: NaiveDate,
    /// Distribution channel, e.g. `"Search"` or `"Social"`.
    pub channel: String,
    /// Campaign name.
    pub campaign: String,
    /// Ad impressions served.
    #[serde(default)]
    pub impressions: u64,
    /// Clicks on the ad.
    #[serde(default)]
    pub clicks: u64,
    /// Conversions attributed to the ad.
    #[serde(default)]
    pub conversions: u64,
    /// Spend in ARS; `None` when the cell was empty.
    #[serde(default)]
    pub spend_amount: Option<f64>,
    /// Revenue in ARS; `None` when the cell was empty.
    #[serde(default)]
    pub revenue_amount: Option<f64>,
}

impl AdRecord {
    /// Spend with an absent value read as zero.
    pub fn spend(&self) -> f64 {
        self.spend_amount.unwrap_or(0.0)
    }

    /// Revenue with an absent value read as zero.
    pub fn revenue(&self) -> f64 {
        self.revenue_amount.unwrap_or(0.0)
    }
}

/// A single web-traffic row read from the traffic dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficRecord {
    pub date: NaiveDate,
    pub channel: String,
    /// Unique users for the day and channel.
    pub users: u64,
    /// Columns the loader does not interpret, keyed by header name.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

/// Ad rows in load order.
pub type AdDataset = Vec<AdRecord>;

/// Traffic rows in load order.
pub type TrafficDataset = Vec<TrafficRecord>;

/// Headline figures for a (possibly filtered) set of ad rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateKpis {
    pub total_spend: f64,
    pub total_revenue: f64,
    pub total_conversions: u64,
    /// `total_revenue / total_spend`, or `0.0` when nothing was spent.
    pub global_roas: f64,
}

/// Summed users per channel, iterated in channel-name order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelTrafficAggregate {
    pub users_by_channel: BTreeMap<String, u64>,
}

impl ChannelTrafficAggregate {
    /// Users summed over every channel.
    pub fn grand_total(&self) -> u64 {
        self.users_by_channel
            .values()
            .fold(0u64, |acc, v| acc.saturating_add(*v))
    }

    pub fn get(&self, channel: &str) -> Option<u64> {
        self.users_by_channel.get(channel).copied()
    }

    pub fn len(&self) -> usize {
        self.users_by_channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users_by_channel.is_empty()
    }

    /// `(channel, users)` pairs in channel-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.users_by_channel.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// One bar of the "ROAS per campaign" chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCampaign {
    pub campaign: String,
    pub channel: String,
    pub date: NaiveDate,
    pub roas: f64,
}

/// The channels and campaigns a caller wants to see.
///
/// Both sets must match for a row to be kept; an empty set on either side
/// selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub channels: BTreeSet<String>,
    pub campaigns: BTreeSet<String>,
}

impl FilterSelection {
    pub fn new<C, P>(channels: C, campaigns: P) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            channels: channels.into_iter().map(Into::into).collect(),
            campaigns: campaigns.into_iter().map(Into::into).collect(),
        }
    }

    /// Select every channel and campaign present in `ads`.
    pub fn all_of(ads: &[AdRecord]) -> Self {
        Self::new(
            crate::metrics::distinct_channels(ads),
            crate::metrics::distinct_campaigns(ads),
        )
    }

    /// `true` when either side selects nothing.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty() || self.campaigns.is_empty()
    }
}
