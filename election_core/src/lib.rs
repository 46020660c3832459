mod config;
mod election;
mod registry;
mod session;
use log::{debug, info, warn};

use std::cmp::Reverse;

pub use crate::config::*;
pub use crate::election::Election;
pub use crate::registry::CandidateRegistry;
pub use crate::session::VoterSession;

pub mod builder;
pub mod manual;
pub mod shared;

/// Computes the result of a race: the votes, share and projected seats of every party,
/// and the ranking of the candidates.
///
/// Arguments:
/// * `race` the race to tabulate. It is only read.
/// * `parties` the party reference set. Every party gets an entry in the result, even
/// without candidates.
/// * `total_seats` the size of the assembly elected by this race
/// * `rules` how the seats are allocated
///
/// A race without votes (or without candidates) is a valid input: all the shares and seats
/// are zero and the ranking follows the registration order.
pub fn tabulate(
    race: &Race,
    parties: &[Party],
    total_seats: u32,
    rules: &TabulationRules,
) -> TabulationResult {
    info!(
        "Tabulating the {} race: {} candidates, {} seats, rules: {:?}",
        race.id,
        race.candidates.len(),
        total_seats,
        rules
    );

    let total_votes: u64 = race.total_votes();

    let party_votes: Vec<u64> = parties
        .iter()
        .map(|p| {
            race.candidates
                .iter()
                .filter(|c| c.party == p.code)
                .map(|c| c.votes)
                .sum()
        })
        .collect();

    for c in race.candidates.iter() {
        if !parties.iter().any(|p| p.code == c.party) {
            warn!(
                "tabulate: candidate {} ({}) has unknown party {:?}, its votes are not attributed",
                c.id, c.name, c.party
            );
        }
    }

    let seats: Vec<u32> = match rules.seat_allocation {
        SeatAllocation::RoundedShare => party_votes
            .iter()
            .map(|v| rounded_seats(*v, total_votes, total_seats))
            .collect(),
        SeatAllocation::LargestRemainder => {
            largest_remainder_seats(&party_votes, total_votes, total_seats)
        }
    };
    debug!(
        "tabulate: total votes: {:?} party votes: {:?} seats: {:?}",
        total_votes, party_votes, seats
    );

    let tallies: Vec<PartyTally> = parties
        .iter()
        .zip(party_votes.iter().zip(seats.iter()))
        .map(|(p, (&votes, &seats))| PartyTally {
            party: p.code.clone(),
            votes,
            share: share(votes, total_votes),
            seats,
        })
        .collect();

    for pt in tallies.iter() {
        info!(
            "{:>8} {} ({:.1}%) -> {} seats",
            pt.votes,
            pt.party,
            pt.share * 100.0,
            pt.seats
        );
    }

    TabulationResult {
        race: race.id.clone(),
        total_seats,
        total_votes,
        parties: tallies,
        ranking: rank_candidates(&race.candidates),
    }
}

fn share(votes: u64, total_votes: u64) -> f64 {
    if total_votes == 0 {
        0.0
    } else {
        votes as f64 / total_votes as f64
    }
}

/// Seats in proportion to the share, rounded half away from zero.
///
/// Computed on integers so that exact halves are not lost to floating point.
fn rounded_seats(votes: u64, total_votes: u64, total_seats: u32) -> u32 {
    if total_votes == 0 {
        return 0;
    }
    let num = 2 * votes as u128 * total_seats as u128 + total_votes as u128;
    let den = 2 * total_votes as u128;
    (num / den) as u32
}

fn largest_remainder_seats(party_votes: &[u64], total_votes: u64, total_seats: u32) -> Vec<u32> {
    if total_votes == 0 {
        return vec![0; party_votes.len()];
    }
    // (whole seats, remainder of the quota in units of 1 / total_votes)
    let quotas: Vec<(u32, u128)> = party_votes
        .iter()
        .map(|&v| {
            let q = v as u128 * total_seats as u128;
            (
                (q / total_votes as u128) as u32,
                q % total_votes as u128,
            )
        })
        .collect();
    let mut seats: Vec<u32> = quotas.iter().map(|(s, _)| *s).collect();
    let allocated: u32 = seats.iter().sum();
    let remaining = total_seats.saturating_sub(allocated) as usize;

    // Stable: equal remainders favor the party listed first.
    let mut by_remainder: Vec<usize> = (0..quotas.len()).collect();
    by_remainder.sort_by_key(|&idx| Reverse(quotas[idx].1));
    for idx in by_remainder.into_iter().take(remaining) {
        seats[idx] += 1;
    }
    debug!(
        "largest_remainder_seats: quotas: {:?} seats: {:?}",
        quotas, seats
    );
    seats
}

/// Most votes first. `sort_by_key` is stable: tied candidates keep their registration order.
fn rank_candidates(candidates: &[Candidate]) -> Vec<Candidate> {
    let mut ranking = candidates.to_vec();
    ranking.sort_by_key(|c| Reverse(c.votes));
    ranking
}
