// Provider record normalization.
//
// Squad and pool records arrive in whatever shape the roster/quotation
// provider exports: the same semantic attribute shows up under different
// field names depending on the source. Each attribute is collected into its
// own Option field (serde aliases cover spelling variants) and coalesced
// with an explicit precedence order, so the resolution table stays visible
// and testable field by field.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::warn;

use super::player::{Player, Role};

// ---------------------------------------------------------------------------
// Raw record
// ---------------------------------------------------------------------------

/// One player record as supplied by the provider, before normalization.
///
/// Every field is optional; `normalize` applies defaults. Unknown fields are
/// absorbed by the flatten map so provider additions never break parsing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlayerRecord {
    #[serde(default, alias = "player_name", alias = "player")]
    pub name: Option<String>,
    #[serde(default, alias = "position", alias = "r")]
    pub role: Option<String>,
    #[serde(default, alias = "team", alias = "real_team")]
    pub club: Option<String>,
    #[serde(default, alias = "current_quotation")]
    pub current_value: Option<f64>,
    #[serde(default, alias = "quote")]
    pub quotation: Option<f64>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default, alias = "acquisition_price")]
    pub price: Option<f64>,
    #[serde(default, alias = "average_score", alias = "mean_score")]
    pub season_score: Option<f64>,
    #[serde(default, alias = "expected_bonus", alias = "fanta_score")]
    pub bonus_score: Option<f64>,
    #[serde(default, alias = "left_league", alias = "starred")]
    pub departed: Option<bool>,
    #[serde(default, alias = "playtime", alias = "play_probability")]
    pub starter_odds: Option<f64>,
    /// Absorb any extra columns the provider includes.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl RawPlayerRecord {
    /// Resolved current value: `current_value` > `quotation` > `value` >
    /// `price`, defaulting to 0.0 when every variant is absent.
    pub fn resolved_value(&self) -> f64 {
        self.current_value
            .or(self.quotation)
            .or(self.value)
            .or(self.price)
            .unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Convert one raw record into the internal representation.
///
/// Returns `None` for records the engine cannot use: a missing/blank name
/// (no identity to match on) or an unparsable role (the role match is
/// mandatory and never relaxed, so a roleless record could never be
/// selected). Both cases are logged, not errored.
fn to_player(raw: &RawPlayerRecord) -> Option<Player> {
    let name = raw.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        warn!("dropping provider record with no player name");
        return None;
    }

    let role_code = raw.role.as_deref().unwrap_or_default();
    let Some(role) = Role::from_code(role_code) else {
        warn!(
            "dropping record for '{}': unrecognized role '{}'",
            name, role_code
        );
        return None;
    };

    Some(Player {
        name: name.to_string(),
        role,
        club: raw.club.as_deref().map(str::trim).unwrap_or_default().to_string(),
        current_value: raw.resolved_value(),
        season_score: raw.season_score.unwrap_or(0.0),
        bonus_score: raw.bonus_score.unwrap_or(0.0),
        departed: raw.departed.unwrap_or(false),
        starter_odds: raw.starter_odds,
    })
}

/// Normalize the provider's squad and pool record lists into the engine's
/// internal shape. Record order is preserved; unusable records are dropped.
pub fn normalize(
    raw_squad: &[RawPlayerRecord],
    raw_pool: &[RawPlayerRecord],
) -> (Vec<Player>, Vec<Player>) {
    let squad: Vec<Player> = raw_squad.iter().filter_map(to_player).collect();
    let pool: Vec<Player> = raw_pool.iter().filter_map(to_player).collect();
    (squad, pool)
}
