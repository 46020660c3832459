use snafu::prelude::*;

use crate::config::*;

/// The registered voter and the ballots already cast during this session.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VoterSession {
    pub voter: VoterDetails,
    pub national_vote_cast: bool,
    pub provincial_vote_cast: bool,
}

impl VoterSession {
    /// Opens a session for a voter. Both ballots are still available.
    ///
    /// All the text fields must be filled and the voter must be of voting age.
    /// Whether the province exists is checked by the caller, which knows the registry.
    pub fn open(voter: VoterDetails) -> ElectionResult<VoterSession> {
        let fields = [
            ("name", &voter.name),
            ("id number", &voter.id_number),
            ("province", &voter.province),
        ];
        for (field, value) in fields {
            ensure!(
                !value.trim().is_empty(),
                ValidationSnafu {
                    reason: format!("the voter {} is empty", field)
                }
            );
        }
        ensure!(
            voter.age >= VOTING_AGE,
            ValidationSnafu {
                reason: format!(
                    "voters must be at least {} years old, got {}",
                    VOTING_AGE, voter.age
                )
            }
        );
        Ok(VoterSession {
            voter,
            national_vote_cast: false,
            provincial_vote_cast: false,
        })
    }

    pub fn has_voted(&self, scope: VoteScope) -> bool {
        match scope {
            VoteScope::National => self.national_vote_cast,
            VoteScope::Provincial => self.provincial_vote_cast,
        }
    }

    pub(crate) fn mark_voted(&mut self, scope: VoteScope) {
        match scope {
            VoteScope::National => self.national_vote_cast = true,
            VoteScope::Provincial => self.provincial_vote_cast = true,
        }
    }

    /// Both ballots have been cast.
    pub fn is_done(&self) -> bool {
        self.national_vote_cast && self.provincial_vote_cast
    }

    /// Checks that this voter may cast a ballot in the given race, and returns the vote
    /// flag it would use.
    pub fn check_ballot(&self, race: &RaceId) -> ElectionResult<VoteScope> {
        if let RaceId::Provincial(p) = race {
            ensure!(
                *p == self.voter.province,
                ValidationSnafu {
                    reason: format!(
                        "a voter registered in {} cannot vote in the {} race",
                        self.voter.province, p
                    )
                }
            );
        }
        let scope = race.scope();
        ensure!(!self.has_voted(scope), AlreadyVotedSnafu { scope });
        Ok(scope)
    }
}
