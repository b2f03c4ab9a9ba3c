// Player representation and role handling.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Playing positions used for swap compatibility.
///
/// A replacement is only ever considered for an outgoing player with the
/// same role; this rule is never relaxed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Role {
    /// Parse a role code into a Role enum.
    ///
    /// Handles the abbreviations used by the common quotation exports:
    /// - "GK"/"P"/"POR" -> Goalkeeper
    /// - "DEF"/"D"/"DIF" -> Defender
    /// - "MID"/"C"/"CEN" -> Midfielder
    /// - "FWD"/"A"/"ATT" -> Forward
    /// Full English words are accepted too. Comparison is case-insensitive.
    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "GK" | "P" | "POR" | "GOALKEEPER" => Some(Role::Goalkeeper),
            "DEF" | "D" | "DIF" | "DEFENDER" => Some(Role::Defender),
            "MID" | "C" | "CEN" | "MIDFIELDER" => Some(Role::Midfielder),
            "FWD" | "A" | "ATT" | "FORWARD" => Some(Role::Forward),
            _ => None,
        }
    }

    /// Return the display code for this role.
    pub fn code(&self) -> &'static str {
        match self {
            Role::Goalkeeper => "GK",
            Role::Defender => "DEF",
            Role::Midfielder => "MID",
            Role::Forward => "FWD",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Normalized identity key for player-name matching.
///
/// Lowercases and strips every non-alphanumeric character, so
/// "D'Ambrosio" and "dambrosio" compare equal. All downstream matching
/// (exclusion sets, used-incoming tracking, outgoing resolution) uses
/// this key, never the raw name.
pub fn name_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// A normalized player record, the engine's single internal shape for both
/// squad members and pool candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Display name as supplied by the provider.
    pub name: String,
    pub role: Role,
    /// Real-world club, used only for the ownership-diversity cap.
    pub club: String,
    /// Resource cost of owning this player (current quotation).
    pub current_value: f64,
    /// Season-performance score (source-opaque, precomputed upstream).
    pub season_score: f64,
    /// Expected-bonus score (source-opaque, precomputed upstream).
    pub bonus_score: f64,
    /// Squad-only flag: the player has left the league, which raises the
    /// outgoing-slot allowance by one.
    #[serde(default)]
    pub departed: bool,
    /// Pass-through play-time confidence in [0, 1], if the source has one.
    #[serde(default)]
    pub starter_odds: Option<f64>,
}

impl Player {
    /// The normalized identity key for this player.
    pub fn key(&self) -> String {
        name_key(&self.name)
    }
}
