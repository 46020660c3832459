use log::{debug, info, warn};

use election_core::builder::Builder;
use election_core::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::desk::config_reader::*;
use crate::desk::io_csv::read_csv_roster;

pub mod config_reader;
pub mod io_csv;

/// Number of candidates listed per race when nothing is configured.
const DEFAULT_TOP_CANDIDATES: usize = 10;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DeskError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading JSON: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of a CSV file: {source}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("The election file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Invalid election setup: {source}"))]
    Setup { source: ElectionError },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type DeskResult<T> = Result<T, DeskError>;

/// An action of the replayed session that the election refused.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Rejection {
    /// Position of the action in the file, starting at 1.
    pub step: usize,
    pub action: &'static str,
    pub error: ElectionError,
}

fn seat_allocation_name(sa: SeatAllocation) -> &'static str {
    match sa {
        SeatAllocation::RoundedShare => "roundedShare",
        SeatAllocation::LargestRemainder => "largestRemainder",
    }
}

/// Creates the election described by the configuration, with its initial candidates.
///
/// Inline candidates are registered before the ones read from candidate files, in the
/// order of the file. A file without any candidate and without its own parties gets the
/// demo rosters of the standard election.
pub fn build_election(config: &DeskConfig, root_path: &Path) -> DeskResult<Election> {
    let rules = TabulationRules {
        seat_allocation: config.seat_allocation()?,
    };
    let mut builder = Builder::standard(&rules)
        .and_then(|b| b.seeded(config.uses_standard_rosters()))
        .context(SetupSnafu {})?;

    if let Some(parties) = &config.parties {
        let mut ps: Vec<Party> = Vec::new();
        for p in parties.iter() {
            ps.push(Party::new(&p.code, &p.name, &p.color).context(SetupSnafu {})?);
        }
        builder = builder.parties(&ps).context(SetupSnafu {})?;
    }
    if let Some(seats) = config.national_seats {
        builder = builder.national_seats(seats).context(SetupSnafu {})?;
    }
    if let Some(provinces) = &config.provinces {
        let ps: Vec<(String, u32)> = provinces
            .iter()
            .map(|p| (p.name.clone(), p.seats.unwrap_or(PROVINCIAL_SEATS)))
            .collect();
        builder = builder.provinces(&ps).context(SetupSnafu {})?;
    }

    for c in config.candidates.iter() {
        let race = RaceId::parse(&c.race).context(SetupSnafu {})?;
        builder = builder
            .candidate(race, &c.name, &c.party)
            .context(SetupSnafu {})?;
    }

    for cs in config.candidate_files.iter() {
        let race = RaceId::parse(&cs.race).context(SetupSnafu {})?;
        let p: PathBuf = root_path.join(&cs.file_path);
        let p2 = p.as_path().display().to_string();
        info!("Attempting to read candidate file {:?}", p2);
        for line in read_csv_roster(&p2)? {
            builder = builder
                .candidate(race.clone(), &line.name, &line.party)
                .context(SetupSnafu {})?;
        }
    }

    builder.build().context(SetupSnafu {})
}

fn apply_action(election: &mut Election, action: &DeskAction) -> ElectionResult<()> {
    match action {
        DeskAction::Register {
            name,
            id_number,
            age,
            province,
        } => {
            election.register(name, id_number, *age, province)?;
        }
        DeskAction::Vote { race, candidate } => {
            election.cast_vote(&RaceId::parse(race)?, CandidateId(*candidate))?;
        }
        DeskAction::EndSession => {
            election.end_session();
        }
        DeskAction::AddCandidate { race, name, party } => {
            election.add_candidate(&RaceId::parse(race)?, name, party)?;
        }
        DeskAction::RemoveCandidate { race, candidate } => {
            election.remove_candidate(&RaceId::parse(race)?, CandidateId(*candidate))?;
        }
    }
    Ok(())
}

/// Applies the actions in order. A refused action leaves the election unchanged; it is
/// recorded and the replay continues.
pub fn replay(election: &mut Election, actions: &[DeskAction]) -> Vec<Rejection> {
    let mut rejected: Vec<Rejection> = Vec::new();
    for (idx, action) in actions.iter().enumerate() {
        let step = idx + 1;
        debug!("replay: step {}: {:?}", step, action);
        if let Err(error) = apply_action(election, action) {
            warn!("replay: step {} ({}) refused: {}", step, action.name(), error);
            rejected.push(Rejection {
                step,
                action: action.name(),
                error,
            });
        }
    }
    rejected
}

fn result_to_json(res: &TabulationResult, parties: &[Party], top: usize) -> JSValue {
    let mut party_js: JSMap<String, JSValue> = JSMap::new();
    for pt in res.parties.iter() {
        let (name, color) = match parties.iter().find(|p| p.code == pt.party) {
            Some(p) => (p.name.clone(), p.color.clone()),
            None => (pt.party.clone(), "".to_string()),
        };
        party_js.insert(
            pt.party.clone(),
            json!({
                "name": name,
                "color": color,
                "votes": pt.votes,
                "share": pt.share,
                "seats": pt.seats,
            }),
        );
    }

    let ranking: Vec<JSValue> = res
        .top(top)
        .iter()
        .map(|c| {
            json!({
                "id": c.id.0,
                "name": c.name,
                "party": c.party,
                "votes": c.votes,
                "share": res.candidate_share(c),
            })
        })
        .collect();

    json!({
        "race": res.race.to_string(),
        "seats": res.total_seats,
        "totalVotes": res.total_votes,
        "seatsAllocated": res.seats_allocated(),
        "parties": party_js,
        "ranking": ranking,
    })
}

fn build_summary_js(
    config: &DeskConfig,
    election: &Election,
    rejected: &[Rejection],
    top: usize,
) -> JSValue {
    let c = OutputConfig {
        contest: config.output_settings.contest_name.clone(),
        date: config.output_settings.contest_date.clone(),
        seat_allocation: seat_allocation_name(election.rules().seat_allocation).to_string(),
    };
    let parties = election.registry().parties();
    let results: Vec<JSValue> = election
        .tabulate_all()
        .iter()
        .map(|res| result_to_json(res, parties, top))
        .collect();
    let rejected_js: Vec<JSValue> = rejected
        .iter()
        .map(|r| {
            json!({
                "step": r.step,
                "action": r.action,
                "error": r.error.to_string(),
            })
        })
        .collect();
    json!({
        "config": c,
        "results": results,
        "rejected": rejected_js,
    })
}

fn write_summary(out: Option<String>, pretty_js: &str) -> DeskResult<()> {
    match out.as_deref() {
        None | Some("stdout") => {
            println!("{}", pretty_js);
            Ok(())
        }
        Some(path) => {
            info!("Writing summary to {:?}", path);
            fs::write(path, pretty_js).context(WritingOutputSnafu { path })
        }
    }
}

/// Runs a complete session: builds the election, replays the actions, writes the
/// summary and compares it with the reference when one is given.
pub fn run_election(
    config_path: Option<String>,
    out: Option<String>,
    check_summary_path: Option<String>,
    top: Option<usize>,
) -> DeskResult<()> {
    let (config, root_p): (DeskConfig, PathBuf) = match &config_path {
        Some(path) => {
            let config = read_config(path)?;
            let root_p = Path::new(path)
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (config, root_p)
        }
        None => {
            info!("No election file given, using the standard election");
            (DeskConfig::standard(), PathBuf::from("."))
        }
    };
    info!("config: {:?}", config);

    let top = top
        .or(config.output_settings.top_candidates)
        .unwrap_or(DEFAULT_TOP_CANDIDATES);

    let mut election = build_election(&config, &root_p)?;
    let rejected = replay(&mut election, &config.actions);
    info!(
        "Replayed {} actions, {} refused",
        config.actions.len(),
        rejected.len()
    );

    let result_js = build_summary_js(&config, &election, &rejected, top);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    write_summary(out, &pretty_js_stats)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(&summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            return ReferenceMismatchSnafu {}.fail();
        }
        info!("The summary matches the reference {}", summary_p);
    }

    Ok(())
}
