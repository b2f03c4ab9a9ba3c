// Swap and Solution records.

use serde::{Deserialize, Serialize};

use super::player::Player;

/// One outgoing-for-incoming substitution.
///
/// Valid only when the two roles match; the selector guarantees this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swap {
    pub out: Player,
    pub incoming: Player,
    /// Current value of the released player.
    pub out_value: f64,
    /// Current value of the replacement.
    pub in_value: f64,
}

impl Swap {
    pub fn new(out: Player, incoming: Player) -> Self {
        let out_value = out.current_value;
        let in_value = incoming.current_value;
        Swap {
            out,
            incoming,
            out_value,
            in_value,
        }
    }

    /// Credits freed by the substitution.
    pub fn gain(&self) -> f64 {
        self.out_value - self.in_value
    }

    /// Credits spent by the substitution (negative gain).
    pub fn net_cost(&self) -> f64 {
        self.in_value - self.out_value
    }
}

/// A complete, self-consistent set of swaps with aggregate figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub swaps: Vec<Swap>,
    pub total_gain: f64,
    pub budget_initial: f64,
    /// `budget_initial` minus the summed net cost of all swaps.
    pub budget_final: f64,
    /// Advisory notes (relaxed club cap, low play-time confidence,
    /// unresolvable slots). Never block solution construction.
    pub warnings: Vec<String>,
}

/// Package resolved swaps into a Solution with aggregate gain and budget.
pub fn assemble(swaps: Vec<Swap>, warnings: Vec<String>, budget_initial: f64) -> Solution {
    let total_gain: f64 = swaps.iter().map(Swap::gain).sum();
    let net_cost: f64 = swaps.iter().map(Swap::net_cost).sum();
    Solution {
        swaps,
        total_gain,
        budget_initial,
        budget_final: budget_initial - net_cost,
        warnings,
    }
}
