//! Channel kinds and the prefixes that select them.

use serde::{Deserialize, Serialize};

use crate::models::auth::significant_part;

const PRIVATE_PREFIX: &str = "private-";
const PRESENCE_PREFIX: &str = "presence-";

/// Channel kind, derived from the name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    /// Anyone may subscribe; nothing to sign.
    Public,
    /// `private-*`: needs an `auth` token.
    Private,
    /// `presence-*`: needs an `auth` token signed over member data.
    Presence,
}

impl ChannelType {
    /// Classify the signed part of a channel name (see [`significant_part`]).
    pub fn from_name(name: &str) -> Self {
        let name = significant_part(name);
        if name.starts_with(PRESENCE_PREFIX) {
            ChannelType::Presence
        } else if name.starts_with(PRIVATE_PREFIX) {
            ChannelType::Private
        } else {
            ChannelType::Public
        }
    }

    pub fn requires_auth(&self) -> bool {
        matches!(self, ChannelType::Private | ChannelType::Presence)
    }

    pub fn requires_presence_data(&self) -> bool {
        matches!(self, ChannelType::Presence)
    }
}
