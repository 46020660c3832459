pub use crate::config::*;
use crate::election::Election;
use crate::registry::CandidateRegistry;

/// The demo roster of the national race, in registration order.
pub const STANDARD_NATIONAL_CANDIDATES: [(&str, &str); 4] = [
    ("Imran Khan", "PTI"),
    ("General Asim Muneer", "PDM"),
    ("Shah Mehmood Qureshi", "PTI"),
    ("Nawaz Shareef", "PDM"),
];

/// The demo roster registered in every provincial race.
pub const STANDARD_PROVINCIAL_CANDIDATES: [(&str, &str); 4] = [
    ("Murad Saeed", "PTI"),
    ("Rana Snaullah", "PDM"),
    ("Omar Sarfraz", "PTI"),
    ("Maryam nawaz", "PDM"),
];

/// A builder for setting up an election.
///
/// Candidates added through the builder are registered in order, after all the
/// races exist, so they receive the same ids as if an administrator had added them
/// one by one. In a seeded election the demo rosters come first, in every race
/// that exists when [`Builder::build`] is called.
///
/// ```
/// use election_core::builder::Builder;
/// use election_core::{CandidateId, Party, RaceId, TabulationRules};
/// # use election_core::ElectionError;
///
/// let mut election = Builder::new(&TabulationRules::DEFAULT_RULES)?
///     .parties(&[Party::new("X", "Party X", "#ff4d4d")?, Party::new("Y", "Party Y", "#4d79ff")?])?
///     .province("Sindh", 300)?
///     .candidate(RaceId::National, "Anna", "X")?
///     .candidate(RaceId::National, "Bob", "Y")?
///     .build()?;
///
/// election.register("Clara", "42101-0000000-0", 30, "Sindh")?;
/// election.cast_vote(&RaceId::National, CandidateId(1))?;
///
/// let result = election.tabulate(&RaceId::National)?;
/// assert_eq!(result.party("X").unwrap().seats, 200);
///
/// # Ok::<(), ElectionError>(())
/// ```
pub struct Builder {
    pub(crate) _rules: TabulationRules,
    pub(crate) _parties: Vec<Party>,
    pub(crate) _national_seats: u32,
    pub(crate) _provinces: Vec<(String, u32)>,
    pub(crate) _candidates: Vec<(RaceId, String, String)>,
    pub(crate) _seeded: bool,
}

impl Builder {
    pub fn new(rules: &TabulationRules) -> ElectionResult<Builder> {
        Ok(Builder {
            _rules: rules.clone(),
            _parties: Vec::new(),
            _national_seats: NATIONAL_SEATS,
            _provinces: Vec::new(),
            _candidates: Vec::new(),
            _seeded: false,
        })
    }

    /// The election used when nothing else is configured: two parties, four provinces,
    /// 200 national seats and 300 seats per provincial assembly.
    ///
    /// It is seeded: every race starts with four demo candidates, with ids 1 to 4.
    /// The demo rosters use the parties `PTI` and `PDM`, so replacing the parties usually
    /// goes with [`Builder::seeded`]`(false)`.
    pub fn standard(rules: &TabulationRules) -> ElectionResult<Builder> {
        let mut b = Builder::new(rules)?.parties(&[
            Party::new("PTI", "PTI", "#ff4d4d")?,
            Party::new("PDM", "PDM", "#4d79ff")?,
        ])?;
        for province in ["Punjab", "Sindh", "Balochistan", "KPK"] {
            b = b.province(province, PROVINCIAL_SEATS)?;
        }
        b.seeded(true)
    }

    /// Whether the demo rosters are registered before the other candidates.
    pub fn seeded(self, seeded: bool) -> ElectionResult<Builder> {
        Ok(Builder {
            _seeded: seeded,
            ..self
        })
    }

    /// Replaces the party reference set.
    pub fn parties(self, parties: &[Party]) -> ElectionResult<Builder> {
        Ok(Builder {
            _parties: parties.to_vec(),
            ..self
        })
    }

    pub fn national_seats(self, seats: u32) -> ElectionResult<Builder> {
        Ok(Builder {
            _national_seats: seats,
            ..self
        })
    }

    /// Adds a province with its own race.
    pub fn province(mut self, name: &str, seats: u32) -> ElectionResult<Builder> {
        self._provinces.push((name.to_string(), seats));
        Ok(self)
    }

    /// Replaces all the provinces, for example the ones of [`Builder::standard`].
    pub fn provinces(self, provinces: &[(String, u32)]) -> ElectionResult<Builder> {
        Ok(Builder {
            _provinces: provinces.to_vec(),
            ..self
        })
    }

    /// Adds a candidate to a race.
    pub fn candidate(mut self, race: RaceId, name: &str, party: &str) -> ElectionResult<Builder> {
        self._candidates
            .push((race, name.to_string(), party.to_string()));
        Ok(self)
    }

    /// Validates the setup and creates the election, with no voter registered.
    pub fn build(self) -> ElectionResult<Election> {
        let mut registry =
            CandidateRegistry::new(self._parties, self._national_seats, &self._provinces)?;
        if self._seeded {
            for (name, party) in STANDARD_NATIONAL_CANDIDATES {
                registry.add_candidate(&RaceId::National, name, party)?;
            }
            for (province, _) in self._provinces.iter() {
                let race = RaceId::Provincial(province.trim().to_string());
                for (name, party) in STANDARD_PROVINCIAL_CANDIDATES {
                    registry.add_candidate(&race, name, party)?;
                }
            }
        }
        for (race, name, party) in self._candidates.iter() {
            registry.add_candidate(race, name, party)?;
        }
        Ok(Election::new(registry, &self._rules))
    }
}
