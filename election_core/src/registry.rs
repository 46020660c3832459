use log::{debug, info};
use snafu::prelude::*;

use crate::config::*;

/// Owns the parties and the candidate lists of every race.
///
/// The national race always exists. Provincial races are created when the registry is
/// built and cannot be added or removed afterwards.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CandidateRegistry {
    parties: Vec<Party>,
    national: Race,
    provinces: Vec<Race>,
}

impl CandidateRegistry {
    /// Creates a registry with empty races.
    ///
    /// The parties must be a non-empty set with distinct codes, the provinces distinct and
    /// non-empty. Every assembly needs at least one seat.
    ///
    /// The parties are checked again as by [`Party::new`], since their fields are public.
    pub fn new(
        parties: Vec<Party>,
        national_seats: u32,
        provinces: &[(String, u32)],
    ) -> ElectionResult<CandidateRegistry> {
        let parties = parties
            .iter()
            .map(|p| Party::new(&p.code, &p.name, &p.color))
            .collect::<ElectionResult<Vec<Party>>>()?;
        ensure!(
            !parties.is_empty(),
            ValidationSnafu {
                reason: "at least one party is required"
            }
        );
        for (idx, p) in parties.iter().enumerate() {
            ensure!(
                !parties[..idx].iter().any(|p2| p2.code == p.code),
                ValidationSnafu {
                    reason: format!("duplicate party code {}", p.code)
                }
            );
        }
        ensure!(
            national_seats > 0,
            ValidationSnafu {
                reason: "the national assembly has no seats"
            }
        );

        let mut races: Vec<Race> = Vec::new();
        for (name, seats) in provinces.iter() {
            let name = name.trim();
            ensure!(
                !name.is_empty(),
                ValidationSnafu {
                    reason: "province name is empty"
                }
            );
            // Would be ambiguous with the textual form of the national race.
            ensure!(
                RaceId::parse(name)? != RaceId::National,
                ValidationSnafu {
                    reason: format!("{} cannot be used as a province name", name)
                }
            );
            ensure!(
                !races.iter().any(|r| r.id.to_string() == name),
                ValidationSnafu {
                    reason: format!("duplicate province {}", name)
                }
            );
            ensure!(
                *seats > 0,
                ValidationSnafu {
                    reason: format!("the assembly of {} has no seats", name)
                }
            );
            races.push(Race::new(RaceId::Provincial(name.to_string()), *seats));
        }

        debug!(
            "CandidateRegistry::new: parties: {:?} provinces: {:?}",
            parties, provinces
        );
        Ok(CandidateRegistry {
            parties,
            national: Race::new(RaceId::National, national_seats),
            provinces: races,
        })
    }

    pub fn parties(&self) -> &[Party] {
        &self.parties
    }

    pub fn party(&self, code: &str) -> Option<&Party> {
        self.parties.iter().find(|p| p.code == code)
    }

    /// The province names, in registration order.
    pub fn provinces(&self) -> Vec<&str> {
        self.provinces
            .iter()
            .filter_map(|r| match &r.id {
                RaceId::Provincial(p) => Some(p.as_str()),
                RaceId::National => None,
            })
            .collect()
    }

    pub fn has_province(&self, province: &str) -> bool {
        self.provinces
            .iter()
            .any(|r| matches!(&r.id, RaceId::Provincial(p) if p == province))
    }

    /// All the races, the national one first.
    pub fn races(&self) -> impl Iterator<Item = &Race> {
        std::iter::once(&self.national).chain(self.provinces.iter())
    }

    pub fn race(&self, id: &RaceId) -> ElectionResult<&Race> {
        match id {
            RaceId::National => Ok(&self.national),
            RaceId::Provincial(p) => self
                .provinces
                .iter()
                .find(|r| r.id == *id)
                .context(NotFoundSnafu {
                    what: format!("province {}", p),
                }),
        }
    }

    pub(crate) fn race_mut(&mut self, id: &RaceId) -> ElectionResult<&mut Race> {
        match id {
            RaceId::National => Ok(&mut self.national),
            RaceId::Provincial(p) => self
                .provinces
                .iter_mut()
                .find(|r| r.id == *id)
                .context(NotFoundSnafu {
                    what: format!("province {}", p),
                }),
        }
    }

    /// Registers a new candidate with no votes.
    ///
    /// The candidate receives the largest id of the race plus one, or 1 in an empty race.
    pub fn add_candidate(
        &mut self,
        race: &RaceId,
        name: &str,
        party: &str,
    ) -> ElectionResult<Candidate> {
        let name = name.trim();
        ensure!(
            !name.is_empty(),
            ValidationSnafu {
                reason: "candidate name is empty"
            }
        );
        ensure!(
            self.party(party).is_some(),
            ValidationSnafu {
                reason: format!("unknown party {:?}", party)
            }
        );
        let r = self.race_mut(race)?;
        let candidate = Candidate {
            id: r.next_id(),
            name: name.to_string(),
            party: party.to_string(),
            votes: 0,
            province: match race {
                RaceId::National => None,
                RaceId::Provincial(p) => Some(p.clone()),
            },
        };
        info!(
            "Candidate {}: {} ({}) added to the {} race",
            candidate.id, candidate.name, candidate.party, race
        );
        r.candidates.push(candidate.clone());
        Ok(candidate)
    }

    /// Removes a candidate. Removing a candidate that does not exist does nothing.
    pub fn remove_candidate(
        &mut self,
        race: &RaceId,
        id: CandidateId,
    ) -> ElectionResult<Option<Candidate>> {
        let r = self.race_mut(race)?;
        let position = r.candidates.iter().position(|c| c.id == id);
        let removed = position.map(|idx| r.candidates.remove(idx));
        match &removed {
            Some(c) => info!("Candidate {}: {} removed from the {} race", id, c.name, race),
            None => debug!("remove_candidate: no candidate {} in the {} race", id, race),
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CandidateRegistry {
        CandidateRegistry::new(
            vec![
                Party::new("X", "Party X", "#ff0000").unwrap(),
                Party::new("Y", "Party Y", "#0000ff").unwrap(),
            ],
            NATIONAL_SEATS,
            &[("Sindh".to_string(), 300), ("Punjab".to_string(), 300)],
        )
        .unwrap()
    }

    #[test]
    fn first_candidate_gets_id_one() {
        let mut reg = registry();
        let c = reg.add_candidate(&RaceId::National, "Anna", "X").unwrap();
        assert_eq!(c.id, CandidateId(1));
        assert_eq!(c.votes, 0);
        assert_eq!(c.province, None);
    }

    #[test]
    fn ids_follow_the_largest_existing_id() {
        let mut reg = registry();
        let race = RaceId::Provincial("Sindh".to_string());
        reg.add_candidate(&race, "Anna", "X").unwrap();
        reg.add_candidate(&race, "Bob", "Y").unwrap();
        reg.add_candidate(&race, "Clara", "X").unwrap();
        reg.remove_candidate(&race, CandidateId(2)).unwrap();
        let d = reg.add_candidate(&race, "Dan", "Y").unwrap();
        assert_eq!(d.id, CandidateId(4));
        assert_eq!(d.province, Some("Sindh".to_string()));
    }

    #[test]
    fn ids_are_reused_after_emptying_a_race() {
        let mut reg = registry();
        let c = reg.add_candidate(&RaceId::National, "Anna", "X").unwrap();
        let removed = reg.remove_candidate(&RaceId::National, c.id).unwrap();
        assert_eq!(removed, Some(c));
        let c2 = reg.add_candidate(&RaceId::National, "Bob", "Y").unwrap();
        assert_eq!(c2.id, CandidateId(1));
    }

    #[test]
    fn ids_are_per_race() {
        let mut reg = registry();
        reg.add_candidate(&RaceId::National, "Anna", "X").unwrap();
        let c = reg
            .add_candidate(&RaceId::Provincial("Punjab".to_string()), "Bob", "Y")
            .unwrap();
        assert_eq!(c.id, CandidateId(1));
    }

    #[test]
    fn rejects_empty_name_and_unknown_party() {
        let mut reg = registry();
        assert!(matches!(
            reg.add_candidate(&RaceId::National, "  ", "X"),
            Err(ElectionError::Validation { .. })
        ));
        assert!(matches!(
            reg.add_candidate(&RaceId::National, "Anna", "Z"),
            Err(ElectionError::Validation { .. })
        ));
        assert!(reg.race(&RaceId::National).unwrap().candidates.is_empty());
    }

    #[test]
    fn unknown_province_is_not_found() {
        let mut reg = registry();
        let race = RaceId::Provincial("Balochistan".to_string());
        assert!(matches!(
            reg.add_candidate(&race, "Anna", "X"),
            Err(ElectionError::NotFound { .. })
        ));
        assert!(matches!(
            reg.remove_candidate(&race, CandidateId(1)),
            Err(ElectionError::NotFound { .. })
        ));
    }

    #[test]
    fn removing_a_missing_candidate_is_a_no_op() {
        let mut reg = registry();
        reg.add_candidate(&RaceId::National, "Anna", "X").unwrap();
        assert_eq!(
            reg.remove_candidate(&RaceId::National, CandidateId(7)),
            Ok(None)
        );
        assert_eq!(reg.race(&RaceId::National).unwrap().candidates.len(), 1);
    }

    #[test]
    fn races_start_with_the_national_one() {
        let reg = registry();
        let ids: Vec<String> = reg.races().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, vec!["national", "Sindh", "Punjab"]);
        assert_eq!(reg.provinces(), vec!["Sindh", "Punjab"]);
    }

    #[test]
    fn parties_built_by_hand_are_checked() {
        let no_color = Party {
            code: "X".to_string(),
            name: "Party X".to_string(),
            color: " ".to_string(),
        };
        let res = CandidateRegistry::new(vec![no_color], NATIONAL_SEATS, &[]);
        assert!(matches!(res, Err(ElectionError::Validation { .. })));

        let no_code = Party {
            code: "".to_string(),
            name: "Party X".to_string(),
            color: "#ff0000".to_string(),
        };
        let res = CandidateRegistry::new(vec![no_code], NATIONAL_SEATS, &[]);
        assert!(matches!(res, Err(ElectionError::Validation { .. })));

        let padded = Party {
            code: " X ".to_string(),
            name: "Party X".to_string(),
            color: "#ff0000".to_string(),
        };
        let reg = CandidateRegistry::new(vec![padded], NATIONAL_SEATS, &[]).unwrap();
        assert!(reg.party("X").is_some());
    }

    #[test]
    fn invalid_setups_are_rejected() {
        let x = Party::new("X", "Party X", "#ff0000").unwrap();
        assert!(CandidateRegistry::new(vec![], 200, &[]).is_err());
        assert!(CandidateRegistry::new(vec![x.clone(), x.clone()], 200, &[]).is_err());
        assert!(CandidateRegistry::new(vec![x.clone()], 0, &[]).is_err());
        assert!(CandidateRegistry::new(
            vec![x.clone()],
            200,
            &[("Sindh".to_string(), 300), ("Sindh".to_string(), 300)]
        )
        .is_err());
        assert!(CandidateRegistry::new(vec![x], 200, &[("National".to_string(), 300)]).is_err());
    }
}
