use log::{debug, info, warn};
use snafu::prelude::*;

use crate::config::*;
use crate::registry::CandidateRegistry;
use crate::session::VoterSession;

/// The complete state of an election: the candidate lists and the voter currently
/// at the booth.
///
/// Every operation takes the election by reference; there is no global state. An
/// election is created by the [`crate::builder::Builder`] and lives until dropped.
#[derive(Debug, Clone)]
pub struct Election {
    rules: TabulationRules,
    registry: CandidateRegistry,
    session: Option<VoterSession>,
}

impl Election {
    pub fn new(registry: CandidateRegistry, rules: &TabulationRules) -> Election {
        Election {
            rules: rules.clone(),
            registry,
            session: None,
        }
    }

    pub fn rules(&self) -> &TabulationRules {
        &self.rules
    }

    pub fn registry(&self) -> &CandidateRegistry {
        &self.registry
    }

    pub fn session(&self) -> Option<&VoterSession> {
        self.session.as_ref()
    }

    pub fn candidates(&self, race: &RaceId) -> ElectionResult<&[Candidate]> {
        Ok(&self.registry.race(race)?.candidates)
    }

    pub fn add_candidate(
        &mut self,
        race: &RaceId,
        name: &str,
        party: &str,
    ) -> ElectionResult<Candidate> {
        self.registry.add_candidate(race, name, party)
    }

    pub fn remove_candidate(
        &mut self,
        race: &RaceId,
        id: CandidateId,
    ) -> ElectionResult<Option<Candidate>> {
        self.registry.remove_candidate(race, id)
    }

    /// Registers the voter for this session.
    ///
    /// Only one voter can be registered at a time: the current session has to be ended
    /// first.
    pub fn register(
        &mut self,
        name: &str,
        id_number: &str,
        age: u32,
        province: &str,
    ) -> ElectionResult<&VoterSession> {
        if let Some(s) = &self.session {
            return ValidationSnafu {
                reason: format!("{} is still registered, end the session first", s.voter.name),
            }
            .fail();
        }
        let voter = VoterDetails {
            name: name.trim().to_string(),
            id_number: id_number.trim().to_string(),
            age,
            province: province.trim().to_string(),
        };
        let session = VoterSession::open(voter)?;
        ensure!(
            self.registry.has_province(&session.voter.province),
            ValidationSnafu {
                reason: format!("unknown province {}", session.voter.province)
            }
        );
        info!(
            "Voter registered: {} ({})",
            session.voter.name, session.voter.province
        );
        Ok(self.session.insert(session))
    }

    /// Logs the voter out. This also serves as the administrative reset: the identity and
    /// both vote flags are dropped.
    pub fn end_session(&mut self) -> Option<VoterSession> {
        let ended = self.session.take();
        match &ended {
            Some(s) => info!(
                "Session ended for {} (national: {}, provincial: {})",
                s.voter.name, s.national_vote_cast, s.provincial_vote_cast
            ),
            None => debug!("end_session: no active session"),
        }
        ended
    }

    /// Records one ballot of the registered voter and returns the updated candidate.
    ///
    /// The checks and the update happen under the same exclusive borrow: either the vote
    /// is counted and the flag is set, or nothing changes.
    pub fn cast_vote(&mut self, race: &RaceId, id: CandidateId) -> ElectionResult<Candidate> {
        let session = self.session.as_mut().context(NoActiveSessionSnafu)?;
        let r = self.registry.race_mut(race)?;
        let scope = match session.check_ballot(race) {
            Ok(scope) => scope,
            Err(e) => {
                warn!("cast_vote: {}: rejected ballot: {}", session.voter.name, e);
                return Err(e);
            }
        };
        let candidate = r
            .candidates
            .iter_mut()
            .find(|c| c.id == id)
            .context(NotFoundSnafu {
                what: format!("candidate {} in the {} race", id, race),
            })?;
        candidate.votes += 1;
        session.mark_voted(scope);
        debug!(
            "cast_vote: {} -> {} race: {} now has {} votes",
            session.voter.name, race, candidate.name, candidate.votes
        );
        Ok(candidate.clone())
    }

    /// Tabulates one race with its own number of seats.
    pub fn tabulate(&self, race: &RaceId) -> ElectionResult<TabulationResult> {
        let r = self.registry.race(race)?;
        Ok(crate::tabulate(
            r,
            self.registry.parties(),
            r.seats,
            &self.rules,
        ))
    }

    /// Tabulates every race, the national one first.
    pub fn tabulate_all(&self) -> Vec<TabulationResult> {
        self.registry
            .races()
            .map(|r| crate::tabulate(r, self.registry.parties(), r.seats, &self.rules))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn election() -> Election {
        Builder::new(&TabulationRules::DEFAULT_RULES)
            .unwrap()
            .parties(&[
                Party::new("X", "Party X", "#ff0000").unwrap(),
                Party::new("Y", "Party Y", "#0000ff").unwrap(),
            ])
            .unwrap()
            .province("Sindh", PROVINCIAL_SEATS)
            .unwrap()
            .province("Punjab", PROVINCIAL_SEATS)
            .unwrap()
            .candidate(RaceId::National, "Anna", "X")
            .unwrap()
            .candidate(RaceId::National, "Bob", "Y")
            .unwrap()
            .candidate(RaceId::Provincial("Sindh".to_string()), "Clara", "X")
            .unwrap()
            .candidate(RaceId::Provincial("Punjab".to_string()), "Dan", "Y")
            .unwrap()
            .build()
            .unwrap()
    }

    fn votes(e: &Election, race: &RaceId) -> Vec<u64> {
        e.candidates(race).unwrap().iter().map(|c| c.votes).collect()
    }

    #[test]
    fn vote_without_session() {
        init_logs();
        let mut e = election();
        assert_eq!(
            e.cast_vote(&RaceId::National, CandidateId(1)),
            Err(ElectionError::NoActiveSession {})
        );
        assert_eq!(votes(&e, &RaceId::National), vec![0, 0]);
    }

    #[test]
    fn second_national_vote_is_rejected() {
        init_logs();
        let mut e = election();
        e.register("Ayesha", "42101", 30, "Sindh").unwrap();
        let c = e.cast_vote(&RaceId::National, CandidateId(1)).unwrap();
        assert_eq!(c.votes, 1);
        assert_eq!(
            e.cast_vote(&RaceId::National, CandidateId(2)),
            Err(ElectionError::AlreadyVoted {
                scope: VoteScope::National
            })
        );
        assert_eq!(votes(&e, &RaceId::National), vec![1, 0]);

        // The provincial ballot is still available.
        let sindh = RaceId::Provincial("Sindh".to_string());
        e.cast_vote(&sindh, CandidateId(1)).unwrap();
        assert_eq!(votes(&e, &sindh), vec![1]);
        assert!(e.session().unwrap().is_done());
    }

    #[test]
    fn vote_in_another_province() {
        init_logs();
        let mut e = election();
        e.register("Ayesha", "42101", 30, "Sindh").unwrap();
        let punjab = RaceId::Provincial("Punjab".to_string());
        assert!(matches!(
            e.cast_vote(&punjab, CandidateId(1)),
            Err(ElectionError::Validation { .. })
        ));
        assert_eq!(votes(&e, &punjab), vec![0]);
        assert!(!e.session().unwrap().provincial_vote_cast);
    }

    #[test]
    fn unknown_candidate_does_not_consume_the_ballot() {
        init_logs();
        let mut e = election();
        e.register("Ayesha", "42101", 30, "Sindh").unwrap();
        assert!(matches!(
            e.cast_vote(&RaceId::National, CandidateId(9)),
            Err(ElectionError::NotFound { .. })
        ));
        assert!(!e.session().unwrap().national_vote_cast);
        assert!(e.cast_vote(&RaceId::National, CandidateId(2)).is_ok());
    }

    #[test]
    fn unknown_race_is_not_found() {
        let mut e = election();
        e.register("Ayesha", "42101", 30, "Sindh").unwrap();
        assert!(matches!(
            e.cast_vote(&RaceId::Provincial("KPK".to_string()), CandidateId(1)),
            Err(ElectionError::NotFound { .. })
        ));
        assert!(matches!(
            e.tabulate(&RaceId::Provincial("KPK".to_string())),
            Err(ElectionError::NotFound { .. })
        ));
    }

    #[test]
    fn one_voter_at_a_time() {
        let mut e = election();
        e.register("Ayesha", "42101", 30, "Sindh").unwrap();
        assert!(matches!(
            e.register("Bilal", "35202", 40, "Punjab"),
            Err(ElectionError::Validation { .. })
        ));
        assert_eq!(e.session().unwrap().voter.name, "Ayesha");
    }

    #[test]
    fn registration_checks_the_province() {
        let mut e = election();
        assert!(matches!(
            e.register("Ayesha", "42101", 30, "Atlantis"),
            Err(ElectionError::Validation { .. })
        ));
        assert!(e.session().is_none());
    }

    #[test]
    fn ending_the_session_resets_the_ballots() {
        init_logs();
        let mut e = election();
        e.register("Ayesha", "42101", 30, "Sindh").unwrap();
        e.cast_vote(&RaceId::National, CandidateId(1)).unwrap();
        let ended = e.end_session().unwrap();
        assert!(ended.national_vote_cast);
        assert!(e.session().is_none());
        assert_eq!(e.end_session(), None);

        // A new session may vote again; the counts persist.
        e.register("Bilal", "35202", 40, "Punjab").unwrap();
        assert!(!e.session().unwrap().national_vote_cast);
        e.cast_vote(&RaceId::National, CandidateId(1)).unwrap();
        assert_eq!(votes(&e, &RaceId::National), vec![2, 0]);
    }

    #[test]
    fn tabulate_all_covers_every_race() {
        let mut e = election();
        e.register("Ayesha", "42101", 30, "Sindh").unwrap();
        e.cast_vote(&RaceId::National, CandidateId(2)).unwrap();
        let results = e.tabulate_all();
        let races: Vec<String> = results.iter().map(|r| r.race.to_string()).collect();
        assert_eq!(races, vec!["national", "Sindh", "Punjab"]);
        assert_eq!(results[0].total_seats, NATIONAL_SEATS);
        assert_eq!(results[0].party("Y").unwrap().seats, NATIONAL_SEATS);
        assert_eq!(results[1].total_votes, 0);
    }
}
