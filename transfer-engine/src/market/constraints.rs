// Roster-composition predicates.
//
// Both predicates are pure; the selector evaluates them in two passes
// (strict, then role-only relaxed). The club tally is seeded from the
// post-release squad and updated incrementally as swaps are chosen.

use std::collections::{BTreeSet, HashMap};

use super::player::Player;

/// Exact role equality between an outgoing player and a candidate.
pub fn role_matches(out: &Player, candidate: &Player) -> bool {
    out.role == candidate.role
}

/// Whether adding `candidate` keeps their real club under the cap.
///
/// Players with no known club never count toward the cap and always pass.
pub fn club_cap_respected(
    club_counts: &HashMap<String, usize>,
    candidate: &Player,
    cap: usize,
) -> bool {
    if candidate.club.is_empty() {
        return true;
    }
    club_counts.get(&candidate.club).copied().unwrap_or(0) < cap
}

/// Tally club occurrences over the squad minus the outgoing slots.
///
/// `outgoing` holds normalized name keys. Empty club strings are skipped,
/// matching `club_cap_respected`.
pub fn post_release_club_counts(
    squad: &[Player],
    outgoing: &BTreeSet<String>,
) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for player in squad {
        if outgoing.contains(&player.key()) || player.club.is_empty() {
            continue;
        }
        *counts.entry(player.club.clone()).or_insert(0) += 1;
    }
    counts
}

/// Record a chosen incoming player in the running tally.
pub fn count_incoming(club_counts: &mut HashMap<String, usize>, incoming: &Player) {
    if !incoming.club.is_empty() {
        *club_counts.entry(incoming.club.clone()).or_insert(0) += 1;
    }
}
