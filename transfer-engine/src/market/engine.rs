// Transfer recommendation engine.
//
// Entry points for the presentation layer: `compute_automatic` produces up
// to N distinct solutions from a market snapshot, `compute_guided` runs one
// refinement round against a GuidedSession. Each call is a synchronous pure
// function over its inputs plus the session's accumulated state; callers
// serialize concurrent access to a single session.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeSet, HashMap};
use std::hash::{Hash, Hasher};

use serde::Deserialize;
use thiserror::Error;

use crate::config::EngineConfig;

use super::adapter::{normalize, RawPlayerRecord};
use super::constraints::{count_incoming, post_release_club_counts};
use super::player::{name_key, Player};
use super::selector::select_best;
use super::session::GuidedSession;
use super::solution::{assemble, Solution, Swap};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum MarketError {
    /// No non-empty outgoing slots in the request.
    #[error("no outgoing players selected")]
    EmptyRequest,

    /// An outgoing reference does not resolve to a squad player.
    #[error("unknown player reference: {name}")]
    UnknownPlayer { name: String },

    /// More outgoing slots than the allowance permits.
    #[error("{selected} outgoing slots selected, but the allowance is {allowance}")]
    TooManyOutgoing { selected: usize, allowance: usize },

    /// Every outgoing slot failed even the relaxed pass.
    #[error("no eligible replacement exists for any outgoing slot")]
    NoCandidates,

    /// A pin was requested before any solution was computed.
    #[error("no computed solution to pin from")]
    NothingComputed,
}

impl MarketError {
    /// Whether this is a malformed-request error (as opposed to a
    /// no-result outcome).
    pub fn is_input_error(&self) -> bool {
        !matches!(self, MarketError::NoCandidates)
    }
}

// ---------------------------------------------------------------------------
// Request / report types
// ---------------------------------------------------------------------------

/// Raw provider data for one computation: the user's squad, the
/// transfer-eligible pool, and the residual credits. Normalized once per
/// call by the adapter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketSnapshot {
    #[serde(default, alias = "user_squad", alias = "roster")]
    pub squad: Vec<RawPlayerRecord>,
    #[serde(default, alias = "available", alias = "market")]
    pub pool: Vec<RawPlayerRecord>,
    #[serde(default, alias = "budget", alias = "credits")]
    pub residual_credits: f64,
}

/// Result of the fully-automatic mode.
#[derive(Debug, Clone)]
pub struct AutomaticReport {
    /// Distinct solutions, best-first in generation order.
    pub solutions: Vec<Solution>,
    /// Set when fewer distinct solutions were derivable than requested.
    pub warning: Option<String>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct TransferEngine {
    config: EngineConfig,
}

impl TransferEngine {
    pub fn new(config: EngineConfig) -> Self {
        TransferEngine { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute up to `rules.max_solutions` distinct solutions for the given
    /// outgoing selection. Distinctness is guaranteed by excluding every
    /// previously proposed incoming player from later rounds.
    pub fn compute_automatic(
        &self,
        snapshot: &MarketSnapshot,
        outgoing: &[String],
    ) -> Result<AutomaticReport, MarketError> {
        let (squad, pool) = normalize(&snapshot.squad, &snapshot.pool);
        let outs = resolve_outgoing(&squad, outgoing)?;
        self.check_allowance(&squad, outs.len())?;

        let outgoing_keys: BTreeSet<String> = outs.iter().map(Player::key).collect();
        let squad_membership = membership_exclusions(&squad, &outgoing_keys);

        let wanted = self.config.rules.max_solutions;
        let mut proposed: BTreeSet<String> = BTreeSet::new();
        let mut solutions = Vec::new();

        for round in 0..wanted {
            let mut club_counts = post_release_club_counts(&squad, &outgoing_keys);
            let mut used = BTreeSet::new();
            let mut excluded = squad_membership.clone();
            excluded.extend(proposed.iter().cloned());

            let (swaps, warnings) =
                self.resolve_slots(&outs, &pool, &mut club_counts, &mut used, &excluded);

            if swaps.is_empty() {
                if round == 0 {
                    return Err(MarketError::NoCandidates);
                }
                break;
            }

            proposed.extend(swaps.iter().map(|s| s.incoming.key()));
            solutions.push(assemble(swaps, warnings, snapshot.residual_credits));
        }

        let warning = (solutions.len() < wanted).then(|| {
            format!(
                "only {} of {} distinct solutions available from the current pool",
                solutions.len(),
                wanted
            )
        });

        Ok(AutomaticReport { solutions, warning })
    }

    /// Run one guided refinement round.
    ///
    /// Pinned swaps whose outgoing player is still selected are carried
    /// verbatim; every other slot is recomputed with the session's
    /// exclusion set plus this round's dislikes. The session is mutated
    /// only on success, so a failed round is retryable against unchanged
    /// state.
    pub fn compute_guided(
        &self,
        session: &mut GuidedSession,
        snapshot: &MarketSnapshot,
    ) -> Result<Solution, MarketError> {
        let (squad, pool) = normalize(&snapshot.squad, &snapshot.pool);
        session.bind_snapshot(
            snapshot_fingerprint(&squad, &pool),
            self.outgoing_allowance(&squad),
        );

        let outs = resolve_outgoing(&squad, session.outgoing_slots())?;
        self.check_allowance(&squad, outs.len())?;

        let outgoing_keys: BTreeSet<String> = outs.iter().map(Player::key).collect();

        // Carry pins whose outgoing player is still selected.
        let fixed: Vec<Swap> = session
            .fixed_swaps()
            .iter()
            .filter(|s| outgoing_keys.contains(&s.out.key()))
            .cloned()
            .collect();
        let fixed_out_keys: BTreeSet<String> = fixed.iter().map(|s| s.out.key()).collect();
        let fresh_outs: Vec<Player> = outs
            .iter()
            .filter(|o| !fixed_out_keys.contains(&o.key()))
            .cloned()
            .collect();

        let mut club_counts = post_release_club_counts(&squad, &outgoing_keys);
        let mut used = BTreeSet::new();
        for swap in &fixed {
            used.insert(swap.incoming.key());
            count_incoming(&mut club_counts, &swap.incoming);
        }

        let mut excluded = membership_exclusions(&squad, &outgoing_keys);
        excluded.extend(session.excluded_incoming().iter().cloned());
        excluded.extend(session.disliked().iter().cloned());

        let (fresh_swaps, warnings) =
            self.resolve_slots(&fresh_outs, &pool, &mut club_counts, &mut used, &excluded);

        if fresh_swaps.is_empty() && fixed.is_empty() {
            return Err(MarketError::NoCandidates);
        }

        // Merge in the caller's slot order: pins verbatim, fresh picks for
        // the rest.
        let mut swaps = Vec::with_capacity(outs.len());
        for out in &outs {
            let key = out.key();
            if let Some(swap) = fixed.iter().find(|s| s.out.key() == key) {
                swaps.push(swap.clone());
            } else if let Some(swap) = fresh_swaps.iter().find(|s| s.out.key() == key) {
                swaps.push(swap.clone());
            }
        }

        let solution = assemble(swaps, warnings, snapshot.residual_credits);
        let fresh_incoming = fresh_swaps.iter().map(|s| s.incoming.key()).collect();
        session.commit_round(fresh_incoming, &solution);
        Ok(solution)
    }

    /// Outgoing allowance for a squad: the configured base plus one per
    /// departed player.
    pub fn outgoing_allowance(&self, squad: &[Player]) -> usize {
        self.config.rules.base_outgoing_allowance
            + squad.iter().filter(|p| p.departed).count()
    }

    fn check_allowance(&self, squad: &[Player], selected: usize) -> Result<(), MarketError> {
        let allowance = self.outgoing_allowance(squad);
        if selected > allowance {
            return Err(MarketError::TooManyOutgoing {
                selected,
                allowance,
            });
        }
        Ok(())
    }

    /// Greedy resolution of outgoing slots, in the order supplied.
    ///
    /// A slot that fails both passes produces a warning, never a silent
    /// drop; chosen incoming players are consumed immediately and counted
    /// toward the club tally.
    fn resolve_slots(
        &self,
        outs: &[Player],
        pool: &[Player],
        club_counts: &mut HashMap<String, usize>,
        used: &mut BTreeSet<String>,
        excluded: &BTreeSet<String>,
    ) -> (Vec<Swap>, Vec<String>) {
        let mut swaps = Vec::new();
        let mut warnings = Vec::new();

        for out in outs {
            match select_best(out, pool, club_counts, used, excluded, &self.config) {
                Some(pick) => {
                    if pick.relaxed {
                        warnings.push(format!(
                            "club cap relaxed for {}: {} arrives with {} already at {} owned",
                            out.name,
                            pick.player.name,
                            pick.player.club,
                            self.config.rules.club_cap
                        ));
                    }
                    if let Some(odds) = pick.player.starter_odds {
                        if odds < self.config.scoring.low_confidence_threshold {
                            warnings.push(format!(
                                "{} has low expected play time ({:.0}%)",
                                pick.player.name,
                                odds * 100.0
                            ));
                        }
                    }
                    used.insert(pick.player.key());
                    count_incoming(club_counts, &pick.player);
                    swaps.push(Swap::new(out.clone(), pick.player));
                }
                None => {
                    warnings.push(format!("no eligible replacement found for {}", out.name));
                }
            }
        }

        (swaps, warnings)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve outgoing slot names against the squad, preserving caller order.
/// Empty slots are skipped; an unmatched non-empty name is an input error.
fn resolve_outgoing(squad: &[Player], names: &[String]) -> Result<Vec<Player>, MarketError> {
    let mut outs = Vec::new();
    for name in names {
        if name.trim().is_empty() {
            continue;
        }
        let key = name_key(name);
        let Some(player) = squad.iter().find(|p| p.key() == key) else {
            return Err(MarketError::UnknownPlayer { name: name.clone() });
        };
        outs.push(player.clone());
    }
    if outs.is_empty() {
        return Err(MarketError::EmptyRequest);
    }
    Ok(outs)
}

/// Squad members that are not outgoing are never suggested as incoming.
fn membership_exclusions(squad: &[Player], outgoing_keys: &BTreeSet<String>) -> BTreeSet<String> {
    squad
        .iter()
        .map(Player::key)
        .filter(|k| !outgoing_keys.contains(k))
        .collect()
}

/// Identity of a squad/pool snapshot: a hash over the sorted name keys.
/// Used to detect that a session's accumulated state belongs to a
/// different market (e.g. a new login).
fn snapshot_fingerprint(squad: &[Player], pool: &[Player]) -> u64 {
    let mut keys: Vec<String> = squad.iter().chain(pool.iter()).map(Player::key).collect();
    keys.sort();
    keys.dedup();
    let mut hasher = DefaultHasher::new();
    keys.hash(&mut hasher);
    hasher.finish()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
