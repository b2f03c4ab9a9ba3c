// Guided refinement session state.
//
// Process-scoped state carried across recomputation rounds: pinned swaps,
// the monotonically growing exclusion set, and the user's outgoing-slot
// selection. The engine mutates a session only on a successful round, so a
// failed round can be retried against byte-identical state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::engine::MarketError;
use super::player::name_key;
use super::solution::{Solution, Swap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No result available yet.
    Idle,
    /// The last recomputation produced a solution.
    Computed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidedSession {
    state: SessionState,
    /// Swaps the user accepted; carried verbatim while their outgoing
    /// player stays selected.
    fixed_swaps: Vec<Swap>,
    /// Name keys never to suggest again: every previously proposed
    /// incoming player plus every disliked one. Grows monotonically until
    /// an explicit reset.
    excluded_incoming: BTreeSet<String>,
    /// Dislikes registered since the last successful round.
    disliked: BTreeSet<String>,
    /// Outgoing slot selection; empty strings are unfilled slots.
    outgoing: Vec<String>,
    /// Last successful solution, the source for pinning.
    last_solution: Option<Solution>,
    /// Identity of the squad/pool snapshot the accumulated state belongs
    /// to. A different snapshot (new login, new market window) invalidates
    /// the negotiation state.
    snapshot_fingerprint: Option<u64>,
    /// Outgoing allowance derived from the snapshot's squad.
    allowance: usize,
}

impl Default for GuidedSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GuidedSession {
    pub fn new() -> Self {
        GuidedSession {
            state: SessionState::Idle,
            fixed_swaps: Vec::new(),
            excluded_incoming: BTreeSet::new(),
            disliked: BTreeSet::new(),
            outgoing: Vec::new(),
            last_solution: None,
            snapshot_fingerprint: None,
            allowance: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn allowance(&self) -> usize {
        self.allowance
    }

    pub fn fixed_swaps(&self) -> &[Swap] {
        &self.fixed_swaps
    }

    pub fn excluded_incoming(&self) -> &BTreeSet<String> {
        &self.excluded_incoming
    }

    pub fn disliked(&self) -> &BTreeSet<String> {
        &self.disliked
    }

    pub fn outgoing_slots(&self) -> &[String] {
        &self.outgoing
    }

    pub fn last_solution(&self) -> Option<&Solution> {
        self.last_solution.as_ref()
    }

    /// Replace the outgoing-slot selection. Does not trigger computation.
    pub fn set_outgoing_slots(&mut self, slots: Vec<String>) {
        self.outgoing = slots;
    }

    /// Register a dislike for an incoming player. Takes effect on the next
    /// compute; does not itself recompute.
    pub fn mark_disliked(&mut self, player: &str) {
        let key = name_key(player);
        if !key.is_empty() {
            self.disliked.insert(key);
        }
    }

    /// Promote the last computed swap for `out_player` into the fixed set,
    /// replacing any earlier pin for the same outgoing slot.
    pub fn pin_swap(&mut self, out_player: &str) -> Result<(), MarketError> {
        let Some(solution) = &self.last_solution else {
            return Err(MarketError::NothingComputed);
        };
        let key = name_key(out_player);
        let Some(swap) = solution.swaps.iter().find(|s| s.out.key() == key) else {
            return Err(MarketError::UnknownPlayer {
                name: out_player.to_string(),
            });
        };
        let swap = swap.clone();
        self.fixed_swaps.retain(|s| s.out.key() != key);
        self.fixed_swaps.push(swap);
        Ok(())
    }

    /// Remove a pin. Returns whether one existed.
    pub fn unpin_swap(&mut self, out_player: &str) -> bool {
        let key = name_key(out_player);
        let before = self.fixed_swaps.len();
        self.fixed_swaps.retain(|s| s.out.key() != key);
        self.fixed_swaps.len() != before
    }

    /// Explicit reset: drop all negotiation state and re-initialize the
    /// outgoing selection to empty slots sized by the allowance.
    pub fn reset(&mut self) {
        self.clear_negotiation_state();
        self.outgoing = vec![String::new(); self.allowance];
    }

    /// Bind the session to a market snapshot. When the snapshot identity
    /// changes, accumulated negotiation state belongs to a stale market and
    /// is dropped; the outgoing selection is kept and re-validated against
    /// the new squad by the caller.
    pub(crate) fn bind_snapshot(&mut self, fingerprint: u64, allowance: usize) {
        if let Some(previous) = self.snapshot_fingerprint {
            if previous != fingerprint {
                info!("market snapshot changed; dropping accumulated session state");
                self.clear_negotiation_state();
            }
        }
        self.snapshot_fingerprint = Some(fingerprint);
        self.allowance = allowance;
    }

    /// Absorb the outcome of a successful round: remember every freshly
    /// proposed incoming player and every dislike, clear the round's
    /// dislikes, and store the solution for pinning.
    pub(crate) fn commit_round(&mut self, fresh_incoming: Vec<String>, solution: &Solution) {
        self.excluded_incoming.extend(fresh_incoming);
        self.excluded_incoming.append(&mut self.disliked);
        self.last_solution = Some(solution.clone());
        self.state = SessionState::Computed;
    }

    fn clear_negotiation_state(&mut self) {
        self.state = SessionState::Idle;
        self.fixed_swaps.clear();
        self.excluded_incoming.clear();
        self.disliked.clear();
        self.last_solution = None;
    }
}
