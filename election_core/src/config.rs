// ********* Input data structures ***********

use snafu::prelude::*;
use std::fmt::Display;

/// Seats in the national assembly.
pub const NATIONAL_SEATS: u32 = 200;

/// Default number of seats in each provincial assembly.
pub const PROVINCIAL_SEATS: u32 = 300;

/// Minimum age to register as a voter.
pub const VOTING_AGE: u32 = 18;

/// A political party, as displayed on the ballot.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Party {
    /// Short unique code, for example `PTI`.
    pub code: String,
    pub name: String,
    /// Display color, usually a CSS hex string.
    pub color: String,
}

impl Party {
    pub fn new(code: &str, name: &str, color: &str) -> ElectionResult<Party> {
        ensure!(
            !code.trim().is_empty(),
            ValidationSnafu {
                reason: "party code is empty"
            }
        );
        ensure!(
            !name.trim().is_empty(),
            ValidationSnafu {
                reason: format!("party {} has an empty name", code)
            }
        );
        ensure!(
            !color.trim().is_empty(),
            ValidationSnafu {
                reason: format!("party {} has an empty color", code)
            }
        );
        Ok(Party {
            code: code.trim().to_string(),
            name: name.trim().to_string(),
            color: color.trim().to_string(),
        })
    }
}

/// Identifier of a candidate. Only unique within a race.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct CandidateId(pub u32);

impl Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    /// The code of the party.
    pub party: String,
    pub votes: u64,
    /// Only set for the candidates of a provincial race.
    pub province: Option<String>,
}

/// The ballot a candidate runs on.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum RaceId {
    National,
    Provincial(String),
}

impl RaceId {
    /// Reads the textual form of a race: `national` (any case) or the name of a province.
    pub fn parse(s: &str) -> ElectionResult<RaceId> {
        let s = s.trim();
        ensure!(
            !s.is_empty(),
            ValidationSnafu {
                reason: "race name is empty"
            }
        );
        if s.eq_ignore_ascii_case("national") {
            Ok(RaceId::National)
        } else {
            Ok(RaceId::Provincial(s.to_string()))
        }
    }

    /// The vote flag of a session that a ballot in this race consumes.
    pub fn scope(&self) -> VoteScope {
        match self {
            RaceId::National => VoteScope::National,
            RaceId::Provincial(_) => VoteScope::Provincial,
        }
    }
}

impl Display for RaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RaceId::National => write!(f, "national"),
            RaceId::Provincial(p) => write!(f, "{}", p),
        }
    }
}

/// A set of candidates sharing one ballot.
///
/// Candidates are kept in registration order, which is also the order used to
/// break ties in the ranking.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Race {
    pub id: RaceId,
    /// Total seats of the assembly elected by this race.
    pub seats: u32,
    pub candidates: Vec<Candidate>,
}

impl Race {
    pub fn new(id: RaceId, seats: u32) -> Race {
        Race {
            id,
            seats,
            candidates: Vec::new(),
        }
    }

    pub fn candidate(&self, id: CandidateId) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    /// The identifier the next registered candidate receives.
    ///
    /// It is derived from the current candidates, so the id of a removed candidate
    /// may be handed out again.
    pub fn next_id(&self) -> CandidateId {
        self.candidates
            .iter()
            .map(|c| c.id)
            .max()
            .map(|CandidateId(x)| CandidateId(x + 1))
            .unwrap_or(CandidateId(1))
    }

    pub fn total_votes(&self) -> u64 {
        self.candidates.iter().map(|c| c.votes).sum()
    }
}

/// The identity given at registration.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VoterDetails {
    pub name: String,
    /// National identity card number or any other external id.
    pub id_number: String,
    pub age: u32,
    pub province: String,
}

/// The two ballots a voter may cast.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum VoteScope {
    National,
    Provincial,
}

impl Display for VoteScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoteScope::National => write!(f, "national"),
            VoteScope::Provincial => write!(f, "provincial"),
        }
    }
}

// ******** Output data structures *********

/// Aggregated result of one party in a race.
#[derive(PartialEq, Debug, Clone)]
pub struct PartyTally {
    pub party: String,
    pub votes: u64,
    /// Fraction of the votes of the race, between 0 and 1.
    pub share: f64,
    pub seats: u32,
}

#[derive(PartialEq, Debug, Clone)]
pub struct TabulationResult {
    pub race: RaceId,
    pub total_seats: u32,
    pub total_votes: u64,
    /// One entry per party, in the order of the party reference set.
    pub parties: Vec<PartyTally>,
    /// All the candidates, most votes first.
    pub ranking: Vec<Candidate>,
}

impl TabulationResult {
    pub fn party(&self, code: &str) -> Option<&PartyTally> {
        self.parties.iter().find(|pt| pt.party == code)
    }

    /// The vote share of a party in percent, for display.
    pub fn percentage(&self, code: &str) -> f64 {
        self.party(code).map(|pt| pt.share * 100.0).unwrap_or(0.0)
    }

    /// Share of the votes of the race received by a candidate, between 0 and 1.
    pub fn candidate_share(&self, candidate: &Candidate) -> f64 {
        if self.total_votes == 0 {
            0.0
        } else {
            candidate.votes as f64 / self.total_votes as f64
        }
    }

    /// The leading candidates.
    pub fn top(&self, n: usize) -> &[Candidate] {
        &self.ranking[..n.min(self.ranking.len())]
    }

    /// Sum of the projected seats. Under the rounded share rule this can differ from
    /// `total_seats`.
    pub fn seats_allocated(&self) -> u32 {
        self.parties.iter().map(|pt| pt.seats).sum()
    }

    pub fn has_votes(&self) -> bool {
        self.total_votes > 0
    }
}

/// Errors returned by the election operations. None of them is fatal: the election
/// is left unchanged when an operation fails.
#[derive(Debug, Snafu, Eq, PartialEq, Clone)]
#[snafu(visibility(pub(crate)))]
pub enum ElectionError {
    #[snafu(display("Invalid input: {reason}"))]
    Validation { reason: String },

    #[snafu(display("Not found: {what}"))]
    NotFound { what: String },

    #[snafu(display("You have already voted in the {scope} race"))]
    AlreadyVoted { scope: VoteScope },

    #[snafu(display("No voter is registered"))]
    NoActiveSession {},
}

pub type ElectionResult<T> = Result<T, ElectionError>;

// ********* Configuration **********

/// How the vote shares are turned into seats.
///
/// - RoundedShare rounds the share of every party independently (half away from zero).
/// The allocated seats may add up to slightly more or less than the assembly.
///
/// - LargestRemainder hands out the integer part of every quota, then the remaining seats
/// to the largest fractional parts. The allocated seats add up to the assembly as soon as
/// one vote is cast.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SeatAllocation {
    RoundedShare,
    LargestRemainder,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TabulationRules {
    pub seat_allocation: SeatAllocation,
}

impl TabulationRules {
    pub const DEFAULT_RULES: TabulationRules = TabulationRules {
        seat_allocation: SeatAllocation::RoundedShare,
    };
}

impl Default for TabulationRules {
    fn default() -> Self {
        TabulationRules::DEFAULT_RULES
    }
}
