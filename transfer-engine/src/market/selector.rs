// Candidate scoring and per-slot selection.
//
// Selection is greedy and local: one outgoing slot at a time, in caller
// order, with the chosen incoming player immediately consumed so later
// slots cannot reuse it. The strict pass enforces role match and the club
// cap; when it yields nothing, a relaxed pass drops the cap (role match is
// never dropped) and the pick is flagged for an upstream warning.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::config::EngineConfig;

use super::constraints::{club_cap_respected, role_matches};
use super::player::Player;

/// One selected replacement candidate.
#[derive(Debug, Clone)]
pub struct CandidatePick {
    pub player: Player,
    pub score: f64,
    /// True when the pick only passed the relaxed (cap-free) pass.
    pub relaxed: bool,
}

/// Composite desirability score for a candidate.
///
/// Rewards season performance and expected bonus, penalizes acquisition
/// cost at the configured weight.
pub fn score(candidate: &Player, value_weight: f64) -> f64 {
    candidate.season_score + candidate.bonus_score - candidate.current_value * value_weight
}

/// Pick the best eligible replacement for one outgoing player.
///
/// Eligibility: present in `pool`, not consumed by an earlier slot
/// (`used`), not in `excluded`, same role as `out`, and — on the strict
/// pass — under the club cap. Ties keep the earliest pool entry, so
/// identical inputs always produce identical picks.
///
/// Returns `None` only when both passes find no candidate.
pub fn select_best(
    out: &Player,
    pool: &[Player],
    club_counts: &HashMap<String, usize>,
    used: &BTreeSet<String>,
    excluded: &BTreeSet<String>,
    config: &EngineConfig,
) -> Option<CandidatePick> {
    let eligible = |candidate: &Player| {
        role_matches(out, candidate)
            && !used.contains(&candidate.key())
            && !excluded.contains(&candidate.key())
    };

    // Strict pass: role + club cap.
    let strict = best_scoring(
        pool.iter()
            .filter(|c| eligible(c) && club_cap_respected(club_counts, c, config.rules.club_cap)),
        config.scoring.value_weight,
    );
    if let Some((player, best)) = strict {
        return Some(CandidatePick {
            player: player.clone(),
            score: best,
            relaxed: false,
        });
    }

    // Relaxed pass: role only. Guarantees a recommendation whenever the
    // role has any eligible pool entry, at the cost of a cap violation
    // that is surfaced as a warning, never hidden.
    let relaxed = best_scoring(pool.iter().filter(|c| eligible(c)), config.scoring.value_weight);
    relaxed.map(|(player, best)| {
        debug!(
            "club cap relaxed for outgoing '{}': best candidate '{}' ({})",
            out.name, player.name, player.club
        );
        CandidatePick {
            player: player.clone(),
            score: best,
            relaxed: true,
        }
    })
}

/// Highest-scoring player in the iterator; first-wins on ties.
fn best_scoring<'a>(
    candidates: impl Iterator<Item = &'a Player>,
    value_weight: f64,
) -> Option<(&'a Player, f64)> {
    let mut best: Option<(&'a Player, f64)> = None;
    for candidate in candidates {
        let s = score(candidate, value_weight);
        match best {
            Some((_, best_s)) if s <= best_s => {}
            _ => best = Some((candidate, s)),
        }
    }
    best
}
