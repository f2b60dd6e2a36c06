//! Type matchups: what a typing takes from every attacking type, what an
//! attacker's types hit hard, and how two Pokémon fare against each other.

use crate::error::Error;
use crate::pokemon::TypeRelations;
use crate::types::{PokemonType, Typing};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Defensive classification of a typing against all 18 attacking types.
///
/// A type appears in at most one bucket. Weaknesses and resistances keep
/// the exact product, so a double weakness is recorded as `4.0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EffectivenessResult {
    pub weaknesses: BTreeMap<PokemonType, f64>,
    pub resistances: BTreeMap<PokemonType, f64>,
    pub immunities: BTreeSet<PokemonType>,
}

impl EffectivenessResult {
    /// Classifies the damage relations of a single type as served by the
    /// remote `type/{name}` endpoint.
    pub fn from_damage_relations(relations: &TypeRelations) -> Result<Self, Error> {
        let mut result = Self::default();
        for resource in &relations.double_damage_from {
            result.weaknesses.insert(resource.name.parse()?, 2.0);
        }
        for resource in &relations.half_damage_from {
            result.resistances.insert(resource.name.parse()?, 0.5);
        }
        for resource in &relations.no_damage_from {
            result.immunities.insert(resource.name.parse()?);
        }
        Ok(result)
    }

    /// Merges two independently classified results.
    ///
    /// Immunities absorb everything. A type that is a weakness on one side and
    /// a resistance on the other collapses to whichever side its combined
    /// product lands on, and disappears entirely at exactly 1.
    pub fn combine(&self, other: &EffectivenessResult) -> EffectivenessResult {
        let immunities: BTreeSet<PokemonType> =
            self.immunities.union(&other.immunities).copied().collect();

        let mut weaknesses = BTreeMap::new();
        for (ty, multiplier) in self.weaknesses.iter().chain(&other.weaknesses) {
            *weaknesses.entry(*ty).or_insert(1.0) *= multiplier;
        }
        let mut resistances = BTreeMap::new();
        for (ty, multiplier) in self.resistances.iter().chain(&other.resistances) {
            *resistances.entry(*ty).or_insert(1.0) *= multiplier;
        }

        for ty in &immunities {
            weaknesses.remove(ty);
            resistances.remove(ty);
        }

        let contested: Vec<PokemonType> = weaknesses
            .keys()
            .filter(|ty| resistances.contains_key(ty))
            .copied()
            .collect();
        for ty in contested {
            let weak = weaknesses.remove(&ty).unwrap_or(1.0);
            let resist = resistances.remove(&ty).unwrap_or(1.0);
            let combined = weak * resist;
            if combined > 1.0 {
                weaknesses.insert(ty, combined);
            } else if combined < 1.0 {
                resistances.insert(ty, combined);
            }
        }

        EffectivenessResult {
            weaknesses,
            resistances,
            immunities,
        }
    }

    /// Multiplier an attacking type deals to the classified typing.
    pub fn multiplier(&self, attacking: PokemonType) -> f64 {
        if self.immunities.contains(&attacking) {
            0.0
        } else if let Some(m) = self.weaknesses.get(&attacking) {
            *m
        } else if let Some(m) = self.resistances.get(&attacking) {
            *m
        } else {
            1.0
        }
    }

    /// Weaknesses sorted strongest first, as a matchup panel lists them.
    pub fn sorted_weaknesses(&self) -> Vec<(PokemonType, f64)> {
        let mut entries: Vec<_> = self.weaknesses.iter().map(|(t, m)| (*t, *m)).collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        entries
    }

    /// Resistances sorted most resistant first.
    pub fn sorted_resistances(&self) -> Vec<(PokemonType, f64)> {
        let mut entries: Vec<_> = self.resistances.iter().map(|(t, m)| (*t, *m)).collect();
        entries.sort_by(|a, b| a.1.total_cmp(&b.1));
        entries
    }
}

/// Product of chart lookups of `attacking` against every defending type.
pub fn defensive_multiplier(attacking: PokemonType, defending: &Typing) -> f64 {
    defending
        .iter()
        .map(|ty| PokemonType::effectiveness(attacking, ty))
        .product()
}

pub fn compute_defensive(defending: &Typing) -> EffectivenessResult {
    let mut result = EffectivenessResult::default();
    for attacking in PokemonType::ALL {
        let multiplier = defensive_multiplier(attacking, defending);
        if multiplier == 0.0 {
            result.immunities.insert(attacking);
        } else if multiplier >= 2.0 {
            result.weaknesses.insert(attacking, multiplier);
        } else if multiplier <= 0.5 {
            result.resistances.insert(attacking, multiplier);
        }
    }
    result
}

/// Best multiplier an attacker can reach against a defender, picking the
/// attacking type that matches up best.
pub fn compute_offensive_multiplier(attacking: &Typing, defending: &Typing) -> f64 {
    attacking
        .iter()
        .map(|ty| defensive_multiplier(ty, defending))
        .fold(0.0, f64::max)
}

/// What an attacker's own types hit, ignoring any defender.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OffensiveCoverage {
    /// Defending type → how many of the attacker's types hit it for 2×.
    pub super_effective: BTreeMap<PokemonType, usize>,
    pub not_effective: BTreeSet<PokemonType>,
    pub no_effect: BTreeSet<PokemonType>,
}

pub fn offensive_coverage(attacking: &Typing) -> OffensiveCoverage {
    let mut coverage = OffensiveCoverage::default();
    for attacker in attacking.iter() {
        for defending in PokemonType::ALL {
            let multiplier = PokemonType::effectiveness(attacker, defending);
            if multiplier == 2.0 {
                *coverage.super_effective.entry(defending).or_insert(0) += 1;
            } else if multiplier == 0.5 {
                coverage.not_effective.insert(defending);
            } else if multiplier == 0.0 {
                coverage.no_effect.insert(defending);
            }
        }
    }
    coverage
}

/// Head-to-head result band for a single multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Matchup {
    SuperEffective4x,
    SuperEffective,
    Neutral,
    NotEffective,
    NotEffective4x,
    Immune,
}

impl Matchup {
    pub fn from_multiplier(multiplier: f64) -> Self {
        if multiplier >= 4.0 {
            Matchup::SuperEffective4x
        } else if multiplier >= 2.0 {
            Matchup::SuperEffective
        } else if multiplier == 0.0 {
            Matchup::Immune
        } else if multiplier <= 0.25 {
            Matchup::NotEffective4x
        } else if multiplier <= 0.5 {
            Matchup::NotEffective
        } else {
            Matchup::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Matchup::SuperEffective4x => "4× Super Effective!",
            Matchup::SuperEffective => "2× Super Effective",
            Matchup::Neutral => "1× Neutral",
            Matchup::NotEffective => "½× Not Effective",
            Matchup::NotEffective4x => "¼× Not Effective",
            Matchup::Immune => "No Effect",
        }
    }
}

/// Both directions of a head-to-head comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeadToHead {
    pub first_vs_second: f64,
    pub second_vs_first: f64,
}

impl HeadToHead {
    pub fn new(first: &Typing, second: &Typing) -> Self {
        Self {
            first_vs_second: compute_offensive_multiplier(first, second),
            second_vs_first: compute_offensive_multiplier(second, first),
        }
    }

    pub fn matchups(&self) -> (Matchup, Matchup) {
        (
            Matchup::from_multiplier(self.first_vs_second),
            Matchup::from_multiplier(self.second_vs_first),
        )
    }
}
