//! Campaign status values, channel selection and create-time validation.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Status
-------------------------------------------------------------------------- */

/// Lifecycle status of a campaign. Stored as TEXT in `campaigns.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    Draft,
    PendingReview,
    Approved,
    Scheduled,
    Published,
    Completed,
    Archived,
}

impl CampaignStatus {
    pub const ALL: [CampaignStatus; 7] = [
        CampaignStatus::Draft,
        CampaignStatus::PendingReview,
        CampaignStatus::Approved,
        CampaignStatus::Scheduled,
        CampaignStatus::Published,
        CampaignStatus::Completed,
        CampaignStatus::Archived,
    ];

    /// The database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            CampaignStatus::Draft => "DRAFT",
            CampaignStatus::PendingReview => "PENDING_REVIEW",
            CampaignStatus::Approved => "APPROVED",
            CampaignStatus::Scheduled => "SCHEDULED",
            CampaignStatus::Published => "PUBLISHED",
            CampaignStatus::Completed => "COMPLETED",
            CampaignStatus::Archived => "ARCHIVED",
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CampaignStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = CampaignStatus::ALL.iter().map(|s| s.as_str()).collect();
                CoreError::Validation(format!(
                    "Invalid campaign status '{s}'. Must be one of: {}",
                    valid.join(", ")
                ))
            })
    }
}

/* --------------------------------------------------------------------------
Channels
-------------------------------------------------------------------------- */

/// A content surface a campaign can publish to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Blog,
    Email,
    Sms,
    Facebook,
    Instagram,
    Twitter,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::Blog,
        Channel::Email,
        Channel::Sms,
        Channel::Facebook,
        Channel::Instagram,
        Channel::Twitter,
    ];

    /// Channels that can carry a generated image.
    pub const IMAGE_CAPABLE: [Channel; 4] = [
        Channel::Blog,
        Channel::Facebook,
        Channel::Instagram,
        Channel::Twitter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Blog => "blog",
            Channel::Email => "email",
            Channel::Sms => "sms",
            Channel::Facebook => "facebook",
            Channel::Instagram => "instagram",
            Channel::Twitter => "twitter",
        }
    }
}

impl FromStr for Channel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Channel::ALL.iter().map(|c| c.as_str()).collect();
                CoreError::Validation(format!(
                    "Unknown channel '{s}'. Must be one of: {}",
                    valid.join(", ")
                ))
            })
    }
}

/// Channel name to enabled flag. Key order carries no meaning.
pub type ChannelSelection = BTreeMap<Channel, bool>;

/// Parse a `channels` JSON object into a [`ChannelSelection`].
///
/// Keys must belong to the closed channel set and values must be booleans.
pub fn parse_channels(value: &serde_json::Value) -> Result<ChannelSelection, CoreError> {
    parse_channel_map(value, "channels", &Channel::ALL)
}

/// Parse an `imageChannels` JSON object. Only image-capable channels are accepted.
pub fn parse_image_channels(value: &serde_json::Value) -> Result<ChannelSelection, CoreError> {
    parse_channel_map(value, "imageChannels", &Channel::IMAGE_CAPABLE)
}

fn parse_channel_map(
    value: &serde_json::Value,
    field: &str,
    allowed: &[Channel],
) -> Result<ChannelSelection, CoreError> {
    let map = value.as_object().ok_or_else(|| {
        CoreError::Validation(format!(
            "{field} must be an object mapping channel name to a boolean"
        ))
    })?;

    let mut selection = ChannelSelection::new();
    for (key, enabled) in map {
        let channel: Channel = key.parse()?;
        if !allowed.contains(&channel) {
            return Err(CoreError::Validation(format!(
                "Channel '{key}' is not allowed in {field}"
            )));
        }
        let enabled = enabled
            .as_bool()
            .ok_or_else(|| CoreError::Validation(format!("{field}.{key} must be a boolean")))?;
        selection.insert(channel, enabled);
    }
    Ok(selection)
}

/// Channels whose flag is set, in canonical order.
pub fn active_channels(selection: &ChannelSelection) -> Vec<Channel> {
    selection
        .iter()
        .filter(|(_, enabled)| **enabled)
        .map(|(channel, _)| *channel)
        .collect()
}

/* --------------------------------------------------------------------------
Content focus
-------------------------------------------------------------------------- */

pub const MIN_CONTENT_FOCUS: i16 = 1;
pub const MAX_CONTENT_FOCUS: i16 = 5;

/// Tone-bias dial used when a create request omits `contentFocus`.
pub const DEFAULT_CONTENT_FOCUS: i16 = 3;

pub fn validate_content_focus(value: i16) -> Result<(), CoreError> {
    if (MIN_CONTENT_FOCUS..=MAX_CONTENT_FOCUS).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "contentFocus must be between {MIN_CONTENT_FOCUS} and {MAX_CONTENT_FOCUS}, got {value}"
        )))
    }
}

/* --------------------------------------------------------------------------
Required fields
-------------------------------------------------------------------------- */

/// Check the three fields a new campaign cannot be created without.
///
/// Blank strings count as missing. The error message names every missing
/// field so the caller can fix them in one round-trip.
pub fn validate_required_fields(
    title: Option<&str>,
    topic: Option<&str>,
    channels: Option<&serde_json::Value>,
) -> Result<(), CoreError> {
    let mut missing = Vec::new();
    if title.map_or(true, |t| t.trim().is_empty()) {
        missing.push("title");
    }
    if topic.map_or(true, |t| t.trim().is_empty()) {
        missing.push("topic");
    }
    if channels.map_or(true, |c| c.is_null()) {
        missing.push("channels");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
