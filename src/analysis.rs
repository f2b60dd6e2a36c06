//! Aggregate type analysis of a team.

use crate::effectiveness::compute_defensive;
use crate::roster::{MAX_TEAM_SIZE, Team, TeamMember};
use crate::types::PokemonType;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::watch;

/// A weakness shared by this many members is flagged.
pub const SHARED_WEAKNESS_THRESHOLD: usize = 3;
const TOP_ENTRIES: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamAnalysis {
    /// Every type on the team, first-seen order.
    pub all_types: Vec<PokemonType>,
    /// Members weak to each attacking type.
    pub weaknesses: BTreeMap<PokemonType, usize>,
    /// Members resisting each attacking type.
    pub resistances: BTreeMap<PokemonType, usize>,
    pub immunities: BTreeSet<PokemonType>,
    /// Whether some team type hits each defending type super effectively.
    pub coverage: BTreeMap<PokemonType, bool>,
    pub uncovered_types: Vec<PokemonType>,
}

pub fn analyze(team: &[TeamMember]) -> TeamAnalysis {
    if team.is_empty() {
        return TeamAnalysis::default();
    }

    let mut analysis = TeamAnalysis::default();
    for member in team {
        for ty in member.types.iter() {
            if !analysis.all_types.contains(&ty) {
                analysis.all_types.push(ty);
            }
        }

        let defensive = compute_defensive(&member.types);
        for ty in defensive.weaknesses.keys() {
            *analysis.weaknesses.entry(*ty).or_default() += 1;
        }
        for ty in defensive.resistances.keys() {
            *analysis.resistances.entry(*ty).or_default() += 1;
        }
        analysis.immunities.extend(defensive.immunities);
    }

    for defending in PokemonType::ALL {
        let covered = analysis
            .all_types
            .iter()
            .any(|attacking| attacking.is_super_effective_against(defending));
        analysis.coverage.insert(defending, covered);
        if !covered {
            analysis.uncovered_types.push(defending);
        }
    }

    analysis
}

fn by_count_desc(counts: &BTreeMap<PokemonType, usize>) -> Vec<(PokemonType, usize)> {
    let mut sorted: Vec<_> = counts.iter().map(|(ty, n)| (*ty, *n)).collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted.truncate(TOP_ENTRIES);
    sorted
}

impl TeamAnalysis {
    pub fn is_empty(&self) -> bool {
        self.all_types.is_empty()
    }

    /// 0..=100 heuristic, `None` for an empty team.
    pub fn score(&self) -> Option<u32> {
        if self.is_empty() {
            return None;
        }
        let raw = 50.0 + 5.0 * self.all_types.len() as f64 + 2.0 * self.resistances.len() as f64
            + 5.0 * self.immunities.len() as f64
            - 1.5 * self.weaknesses.len() as f64
            - 2.0 * self.uncovered_types.len() as f64;
        Some(raw.round().clamp(0.0, 100.0) as u32)
    }

    /// The ten most common weaknesses, most shared first.
    pub fn top_weaknesses(&self) -> Vec<(PokemonType, usize)> {
        by_count_desc(&self.weaknesses)
    }

    pub fn top_resistances(&self) -> Vec<(PokemonType, usize)> {
        by_count_desc(&self.resistances)
    }

    fn has_shared_weakness(&self) -> bool {
        self.weaknesses
            .values()
            .any(|count| *count >= SHARED_WEAKNESS_THRESHOLD)
    }

    pub fn recommendations(&self, team_size: usize) -> Vec<Recommendation> {
        let mut out = Vec::new();
        if team_size < MAX_TEAM_SIZE {
            out.push(Recommendation::OpenSlots(MAX_TEAM_SIZE - team_size));
        }
        if self.has_shared_weakness() {
            out.push(Recommendation::SharedWeakness);
        }
        if self.uncovered_types.len() > 5 {
            out.push(Recommendation::ThinCoverage);
        }
        if self.all_types.len() < 4 && team_size >= 3 {
            out.push(Recommendation::LowDiversity);
        }
        if self.all_types.len() >= 6 && team_size == MAX_TEAM_SIZE && !self.has_shared_weakness()
        {
            out.push(Recommendation::WellBalanced);
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ScoreLabel {
    NeedsImprovement,
    Average,
    Good,
    Excellent,
}

impl ScoreLabel {
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => ScoreLabel::Excellent,
            60..=79 => ScoreLabel::Good,
            40..=59 => ScoreLabel::Average,
            _ => ScoreLabel::NeedsImprovement,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreLabel::Excellent => "Excellent",
            ScoreLabel::Good => "Good",
            ScoreLabel::Average => "Average",
            ScoreLabel::NeedsImprovement => "Needs Improvement",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    OpenSlots(usize),
    SharedWeakness,
    ThinCoverage,
    LowDiversity,
    WellBalanced,
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recommendation::OpenSlots(n) => write!(
                f,
                "Add more Pokémon to complete your team ({n} slots remaining)"
            ),
            Recommendation::SharedWeakness => {
                f.write_str("Consider replacing a Pokémon to reduce shared weaknesses")
            }
            Recommendation::ThinCoverage => {
                f.write_str("Your team lacks offensive coverage against many types")
            }
            Recommendation::LowDiversity => f.write_str("Add more type diversity to your team"),
            Recommendation::WellBalanced => {
                f.write_str("Great job! Your team has excellent type diversity")
            }
        }
    }
}

/// Caches the analysis of a [`Team`] until its revision changes. Passing a
/// different team always recomputes.
#[derive(Debug, Default)]
pub struct TeamAnalyzer {
    cached: Option<CachedAnalysis>,
}

#[derive(Debug)]
struct CachedAnalysis {
    team: watch::Receiver<u64>,
    revision: u64,
    analysis: TeamAnalysis,
}

impl TeamAnalyzer {
    pub fn analysis(&mut self, team: &Team) -> &TeamAnalysis {
        let revision = team.revision();
        let observer = team.subscribe();
        if self
            .cached
            .as_ref()
            .is_none_or(|c| c.revision != revision || !c.team.same_channel(&observer))
        {
            self.cached = None;
        }
        let cached = self.cached.get_or_insert_with(|| {
            tracing::debug!("Recomputing team analysis at revision {}", revision);
            CachedAnalysis {
                team: observer,
                revision,
                analysis: analyze(team.members()),
            }
        });
        &cached.analysis
    }
}
