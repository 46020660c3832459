use crate::desk::*;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "contestDate")]
    pub contest_date: Option<String>,
    #[serde(rename = "topCandidates")]
    pub top_candidates: Option<usize>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: String,
    pub date: Option<String>,
    #[serde(rename = "seatAllocation")]
    pub seat_allocation: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DeskParty {
    pub code: String,
    pub name: String,
    pub color: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DeskProvince {
    pub name: String,
    pub seats: Option<u32>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DeskCandidate {
    pub race: String,
    pub name: String,
    pub party: String,
}

/// A CSV file listing the candidates of one race.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSource {
    pub race: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DeskRules {
    #[serde(rename = "seatAllocation")]
    pub _seat_allocation: Option<String>,
}

impl DeskRules {
    pub fn seat_allocation(&self) -> DeskResult<SeatAllocation> {
        match self._seat_allocation.as_deref() {
            None | Some("roundedShare") => Ok(SeatAllocation::RoundedShare),
            Some("largestRemainder") => Ok(SeatAllocation::LargestRemainder),
            Some(x) => whatever!("unknown seat allocation rule: {}", x),
        }
    }
}

/// One step of the replayed session, as a user of the voting booth or the
/// administrator would perform it.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum DeskAction {
    Register {
        name: String,
        #[serde(rename = "idNumber")]
        id_number: String,
        age: u32,
        province: String,
    },
    Vote {
        race: String,
        candidate: u32,
    },
    EndSession,
    AddCandidate {
        race: String,
        name: String,
        party: String,
    },
    RemoveCandidate {
        race: String,
        candidate: u32,
    },
}

impl DeskAction {
    pub fn name(&self) -> &'static str {
        match self {
            DeskAction::Register { .. } => "register",
            DeskAction::Vote { .. } => "vote",
            DeskAction::EndSession => "endSession",
            DeskAction::AddCandidate { .. } => "addCandidate",
            DeskAction::RemoveCandidate { .. } => "removeCandidate",
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DeskConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    pub parties: Option<Vec<DeskParty>>,
    #[serde(rename = "nationalSeats")]
    pub national_seats: Option<u32>,
    pub provinces: Option<Vec<DeskProvince>>,
    #[serde(default)]
    pub candidates: Vec<DeskCandidate>,
    #[serde(rename = "candidateFiles", default)]
    pub candidate_files: Vec<CandidateSource>,
    pub rules: Option<DeskRules>,
    #[serde(default)]
    pub actions: Vec<DeskAction>,
}

impl DeskConfig {
    /// The configuration used when no election file is given.
    pub fn standard() -> DeskConfig {
        DeskConfig {
            output_settings: OutputSettings {
                contest_name: "General election".to_string(),
                contest_date: None,
                top_candidates: None,
            },
            parties: None,
            national_seats: None,
            provinces: None,
            candidates: Vec::new(),
            candidate_files: Vec::new(),
            rules: None,
            actions: Vec::new(),
        }
    }

    /// True when the file lists no candidate and keeps the standard parties.
    pub fn uses_standard_rosters(&self) -> bool {
        self.parties.is_none() && self.candidates.is_empty() && self.candidate_files.is_empty()
    }

    pub fn seat_allocation(&self) -> DeskResult<SeatAllocation> {
        match &self.rules {
            Some(r) => r.seat_allocation(),
            None => Ok(SeatAllocation::RoundedShare),
        }
    }
}

pub fn read_config(path: &str) -> DeskResult<DeskConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: DeskConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> DeskResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}
