//! A handle to drive one election from several threads.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::*;
use crate::election::Election;
use crate::session::VoterSession;

/// Clonable handle on an election guarded by a mutex.
///
/// Each call holds the lock for the whole operation. In particular two concurrent
/// ballots for the same race cannot both see an unused vote flag.
#[derive(Debug, Clone)]
pub struct SharedElection {
    inner: Arc<Mutex<Election>>,
}

impl SharedElection {
    pub fn new(election: Election) -> SharedElection {
        SharedElection {
            inner: Arc::new(Mutex::new(election)),
        }
    }

    // Operations never leave an election half-updated, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Election> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn register(
        &self,
        name: &str,
        id_number: &str,
        age: u32,
        province: &str,
    ) -> ElectionResult<VoterSession> {
        self.lock()
            .register(name, id_number, age, province)
            .cloned()
    }

    pub fn end_session(&self) -> Option<VoterSession> {
        self.lock().end_session()
    }

    pub fn cast_vote(&self, race: &RaceId, id: CandidateId) -> ElectionResult<Candidate> {
        self.lock().cast_vote(race, id)
    }

    pub fn add_candidate(
        &self,
        race: &RaceId,
        name: &str,
        party: &str,
    ) -> ElectionResult<Candidate> {
        self.lock().add_candidate(race, name, party)
    }

    pub fn remove_candidate(
        &self,
        race: &RaceId,
        id: CandidateId,
    ) -> ElectionResult<Option<Candidate>> {
        self.lock().remove_candidate(race, id)
    }

    /// Tabulates a race from a consistent view of its candidates.
    pub fn tabulate(&self, race: &RaceId) -> ElectionResult<TabulationResult> {
        self.lock().tabulate(race)
    }

    /// A copy of the whole election at this instant.
    pub fn snapshot(&self) -> Election {
        self.lock().clone()
    }
}
