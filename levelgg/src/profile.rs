//! Player profiles and skill tiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Player (profile) ID type
pub type PlayerId = Uuid;

/// Player skill rank. Only used to order players during the draft.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    #[default]
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Bronze,
        Tier::Silver,
        Tier::Gold,
        Tier::Platinum,
        Tier::Diamond,
    ];

    /// Numeric rank, BRONZE = 1 through DIAMOND = 5.
    pub fn rank(self) -> u8 {
        match self {
            Tier::Bronze => 1,
            Tier::Silver => 2,
            Tier::Gold => 3,
            Tier::Platinum => 4,
            Tier::Diamond => 5,
        }
    }

    /// Rank of an optional tier; a missing tier ranks as BRONZE.
    pub fn rank_or_default(tier: Option<Tier>) -> u8 {
        tier.unwrap_or_default().rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Bronze => "BRONZE",
            Tier::Silver => "SILVER",
            Tier::Gold => "GOLD",
            Tier::Platinum => "PLATINUM",
            Tier::Diamond => "DIAMOND",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .into_iter()
            .find(|tier| tier.as_str() == s)
            .ok_or_else(|| format!("Unknown tier: {s}"))
    }
}

/// Profile row as the engines consume it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: PlayerId,
    pub username: String,
    pub tier: Option<Tier>,
    pub is_admin: bool,
    pub is_team_lead: bool,
}

impl Profile {
    pub fn new(id: PlayerId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            tier: None,
            is_admin: false,
            is_team_lead: false,
        }
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = Some(tier);
        self
    }

    pub fn admin(mut self) -> Self {
        self.is_admin = true;
        self
    }

    pub fn team_lead(mut self) -> Self {
        self.is_team_lead = true;
        self
    }
}
