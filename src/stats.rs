//! Battle stats: natures, IV/EV spreads and the final-stat formula.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_LEVEL: u32 = 1;
pub const MAX_LEVEL: u32 = 100;
pub const MAX_IV: u32 = 31;
pub const MAX_EV: u32 = 252;
pub const MAX_TOTAL_EVS: u32 = 510;
pub const MOVE_SLOTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatName {
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

impl StatName {
    pub const ALL: [StatName; 6] = [
        StatName::Hp,
        StatName::Attack,
        StatName::Defense,
        StatName::SpecialAttack,
        StatName::SpecialDefense,
        StatName::Speed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatName::Hp => "hp",
            StatName::Attack => "attack",
            StatName::Defense => "defense",
            StatName::SpecialAttack => "specialAttack",
            StatName::SpecialDefense => "specialDefense",
            StatName::Speed => "speed",
        }
    }

    /// Name used by the remote API's `stat` resources.
    pub fn api_name(&self) -> &'static str {
        match self {
            StatName::Hp => "hp",
            StatName::Attack => "attack",
            StatName::Defense => "defense",
            StatName::SpecialAttack => "special-attack",
            StatName::SpecialDefense => "special-defense",
            StatName::Speed => "speed",
        }
    }

    /// Short label used by Showdown team exports.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            StatName::Hp => "HP",
            StatName::Attack => "Atk",
            StatName::Defense => "Def",
            StatName::SpecialAttack => "SpA",
            StatName::SpecialDefense => "SpD",
            StatName::Speed => "Spe",
        }
    }
}

impl fmt::Display for StatName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatName::ALL
            .into_iter()
            .find(|stat| stat.as_str() == s || stat.api_name() == s)
            .ok_or_else(|| Error::UnknownStat(s.to_string()))
    }
}

/// One value per battle stat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatSpread {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
}

impl StatSpread {
    pub const fn uniform(value: u32) -> Self {
        Self {
            hp: value,
            attack: value,
            defense: value,
            special_attack: value,
            special_defense: value,
            speed: value,
        }
    }

    pub fn get(&self, stat: StatName) -> u32 {
        match stat {
            StatName::Hp => self.hp,
            StatName::Attack => self.attack,
            StatName::Defense => self.defense,
            StatName::SpecialAttack => self.special_attack,
            StatName::SpecialDefense => self.special_defense,
            StatName::Speed => self.speed,
        }
    }

    pub fn set(&mut self, stat: StatName, value: u32) {
        let slot = match stat {
            StatName::Hp => &mut self.hp,
            StatName::Attack => &mut self.attack,
            StatName::Defense => &mut self.defense,
            StatName::SpecialAttack => &mut self.special_attack,
            StatName::SpecialDefense => &mut self.special_defense,
            StatName::Speed => &mut self.speed,
        };
        *slot = value;
    }

    pub fn total(&self) -> u32 {
        StatName::ALL.iter().map(|stat| self.get(*stat)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatName, u32)> + '_ {
        StatName::ALL.into_iter().map(|stat| (stat, self.get(stat)))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nature {
    #[default]
    Hardy,
    Lonely,
    Brave,
    Adamant,
    Naughty,
    Bold,
    Docile,
    Relaxed,
    Impish,
    Lax,
    Timid,
    Hasty,
    Serious,
    Jolly,
    Naive,
    Modest,
    Mild,
    Quiet,
    Bashful,
    Rash,
    Calm,
    Gentle,
    Sassy,
    Careful,
    Quirky,
}

impl Nature {
    pub const ALL: [Nature; 25] = [
        Nature::Hardy,
        Nature::Lonely,
        Nature::Brave,
        Nature::Adamant,
        Nature::Naughty,
        Nature::Bold,
        Nature::Docile,
        Nature::Relaxed,
        Nature::Impish,
        Nature::Lax,
        Nature::Timid,
        Nature::Hasty,
        Nature::Serious,
        Nature::Jolly,
        Nature::Naive,
        Nature::Modest,
        Nature::Mild,
        Nature::Quiet,
        Nature::Bashful,
        Nature::Rash,
        Nature::Calm,
        Nature::Gentle,
        Nature::Sassy,
        Nature::Careful,
        Nature::Quirky,
    ];

    /// The (increased, decreased) stat pair, or `None` for neutral natures.
    pub fn modifiers(&self) -> Option<(StatName, StatName)> {
        use StatName::*;

        match self {
            Nature::Hardy | Nature::Docile | Nature::Serious | Nature::Bashful | Nature::Quirky => None,
            Nature::Lonely => Some((Attack, Defense)),
            Nature::Brave => Some((Attack, Speed)),
            Nature::Adamant => Some((Attack, SpecialAttack)),
            Nature::Naughty => Some((Attack, SpecialDefense)),
            Nature::Bold => Some((Defense, Attack)),
            Nature::Relaxed => Some((Defense, Speed)),
            Nature::Impish => Some((Defense, SpecialAttack)),
            Nature::Lax => Some((Defense, SpecialDefense)),
            Nature::Timid => Some((Speed, Attack)),
            Nature::Hasty => Some((Speed, Defense)),
            Nature::Jolly => Some((Speed, SpecialAttack)),
            Nature::Naive => Some((Speed, SpecialDefense)),
            Nature::Modest => Some((SpecialAttack, Attack)),
            Nature::Mild => Some((SpecialAttack, Defense)),
            Nature::Quiet => Some((SpecialAttack, Speed)),
            Nature::Rash => Some((SpecialAttack, SpecialDefense)),
            Nature::Calm => Some((SpecialDefense, Attack)),
            Nature::Gentle => Some((SpecialDefense, Defense)),
            Nature::Sassy => Some((SpecialDefense, Speed)),
            Nature::Careful => Some((SpecialDefense, SpecialAttack)),
        }
    }

    pub fn increased(&self) -> Option<StatName> {
        self.modifiers().map(|(up, _)| up)
    }

    pub fn decreased(&self) -> Option<StatName> {
        self.modifiers().map(|(_, down)| down)
    }

    pub fn is_neutral(&self) -> bool {
        self.modifiers().is_none()
    }

    pub fn multiplier(&self, stat: StatName) -> f64 {
        match self.modifiers() {
            Some((up, _)) if up == stat => 1.1,
            Some((_, down)) if down == stat => 0.9,
            _ => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Nature::Hardy => "hardy",
            Nature::Lonely => "lonely",
            Nature::Brave => "brave",
            Nature::Adamant => "adamant",
            Nature::Naughty => "naughty",
            Nature::Bold => "bold",
            Nature::Docile => "docile",
            Nature::Relaxed => "relaxed",
            Nature::Impish => "impish",
            Nature::Lax => "lax",
            Nature::Timid => "timid",
            Nature::Hasty => "hasty",
            Nature::Serious => "serious",
            Nature::Jolly => "jolly",
            Nature::Naive => "naive",
            Nature::Modest => "modest",
            Nature::Mild => "mild",
            Nature::Quiet => "quiet",
            Nature::Bashful => "bashful",
            Nature::Rash => "rash",
            Nature::Calm => "calm",
            Nature::Gentle => "gentle",
            Nature::Sassy => "sassy",
            Nature::Careful => "careful",
            Nature::Quirky => "quirky",
        }
    }

    /// Capitalized display name, e.g. "Adamant".
    pub fn display_name(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }
}

impl FromStr for Nature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Nature::ALL
            .into_iter()
            .find(|nature| nature.as_str() == name)
            .ok_or_else(|| Error::UnknownNature(s.to_string()))
    }
}

fn check_range(field: &'static str, value: u32, min: u32, max: u32) -> Result<(), Error> {
    if value < min || value > max {
        return Err(Error::InvalidStatInput { field, value });
    }
    Ok(())
}

/// Final stat using the mainline formula.
///
/// Floors are applied innermost first and the nature multiplier last, so
/// results match in-game values exactly. HP ignores nature.
pub fn calculate_stat(
    base: u32,
    level: u32,
    iv: u32,
    ev: u32,
    nature: Nature,
    stat: StatName,
) -> Result<u32, Error> {
    check_range("level", level, MIN_LEVEL, MAX_LEVEL)?;
    check_range("iv", iv, 0, MAX_IV)?;
    check_range("ev", ev, 0, MAX_EV)?;

    let core = (2 * base + iv + ev / 4) * level / 100;
    if stat == StatName::Hp {
        return Ok(core + level + 10);
    }
    Ok((f64::from(core + 5) * nature.multiplier(stat)).floor() as u32)
}

/// Canned EV spreads offered by the build editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvPreset {
    PhysicalSweeper,
    SpecialSweeper,
    PhysicalTank,
    SpecialTank,
    Balanced,
    Clear,
}

impl EvPreset {
    pub const ALL: [EvPreset; 6] = [
        EvPreset::PhysicalSweeper,
        EvPreset::SpecialSweeper,
        EvPreset::PhysicalTank,
        EvPreset::SpecialTank,
        EvPreset::Balanced,
        EvPreset::Clear,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EvPreset::PhysicalSweeper => "Sweeper (Physical)",
            EvPreset::SpecialSweeper => "Sweeper (Special)",
            EvPreset::PhysicalTank => "Tank (Physical)",
            EvPreset::SpecialTank => "Tank (Special)",
            EvPreset::Balanced => "Balanced",
            EvPreset::Clear => "Clear All",
        }
    }

    pub fn spread(&self) -> StatSpread {
        let mut evs = StatSpread::default();
        match self {
            EvPreset::PhysicalSweeper => {
                evs.attack = MAX_EV;
                evs.speed = MAX_EV;
            }
            EvPreset::SpecialSweeper => {
                evs.special_attack = MAX_EV;
                evs.speed = MAX_EV;
            }
            EvPreset::PhysicalTank => {
                evs.hp = MAX_EV;
                evs.defense = MAX_EV;
            }
            EvPreset::SpecialTank => {
                evs.hp = MAX_EV;
                evs.special_defense = MAX_EV;
            }
            EvPreset::Balanced => evs = StatSpread::uniform(84),
            EvPreset::Clear => {}
        }
        evs
    }
}

/// Competitive configuration of one team member.
///
/// The setters clamp rather than reject, so a build is always valid: level in
/// 1..=100, IVs in 0..=31, EVs in 0..=252 with a total of at most 510.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredBuild")]
pub struct StatBuild {
    level: u32,
    pub nature: Nature,
    pub ability: String,
    pub item: String,
    pub moves: [String; MOVE_SLOTS],
    ivs: StatSpread,
    evs: StatSpread,
    pub nickname: String,
}

/// A build as written to storage, before its limits are enforced.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredBuild {
    level: u32,
    nature: Nature,
    #[serde(default)]
    ability: String,
    #[serde(default)]
    item: String,
    #[serde(default)]
    moves: [String; MOVE_SLOTS],
    ivs: StatSpread,
    evs: StatSpread,
    #[serde(default)]
    nickname: String,
}

impl From<StoredBuild> for StatBuild {
    fn from(stored: StoredBuild) -> Self {
        let mut build = StatBuild {
            nature: stored.nature,
            ability: stored.ability,
            item: stored.item,
            moves: stored.moves,
            nickname: stored.nickname,
            ..StatBuild::default()
        };
        build.set_level(stored.level);
        build.evs = StatSpread::default();
        for stat in StatName::ALL {
            build.set_iv(stat, stored.ivs.get(stat));
            build.set_ev(stat, stored.evs.get(stat));
        }
        if build.evs != stored.evs || build.ivs != stored.ivs || build.level != stored.level {
            tracing::warn!("Stored build was out of range and has been clamped");
        }
        build
    }
}

impl Default for StatBuild {
    fn default() -> Self {
        Self {
            level: MAX_LEVEL,
            nature: Nature::Hardy,
            ability: String::new(),
            item: String::new(),
            moves: Default::default(),
            ivs: StatSpread::uniform(MAX_IV),
            evs: StatSpread::default(),
            nickname: String::new(),
        }
    }
}

impl StatBuild {
    /// Default build with the first listed ability selected.
    pub fn with_abilities(abilities: &[String]) -> Self {
        Self {
            ability: abilities.first().cloned().unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn ivs(&self) -> &StatSpread {
        &self.ivs
    }

    pub fn evs(&self) -> &StatSpread {
        &self.evs
    }

    pub fn set_level(&mut self, level: u32) {
        self.level = level.clamp(MIN_LEVEL, MAX_LEVEL);
    }

    pub fn set_iv(&mut self, stat: StatName, value: u32) {
        self.ivs.set(stat, value.min(MAX_IV));
    }

    /// Sets one EV, clamping it to 252 and then to whatever is left of the
    /// 510 total once the other five are counted.
    pub fn set_ev(&mut self, stat: StatName, value: u32) {
        let value = value.min(MAX_EV);
        let others = self.evs.total() - self.evs.get(stat);
        let value = if others + value <= MAX_TOTAL_EVS {
            value
        } else {
            MAX_TOTAL_EVS.saturating_sub(others)
        };
        self.evs.set(stat, value);
    }

    pub fn apply_ev_preset(&mut self, preset: EvPreset) {
        self.evs = preset.spread();
    }

    pub fn remaining_evs(&self) -> u32 {
        MAX_TOTAL_EVS.saturating_sub(self.evs.total())
    }

    /// An empty `name` clears the slot.
    pub fn set_move(&mut self, slot: usize, name: impl Into<String>) -> Result<(), Error> {
        let entry = self.moves.get_mut(slot).ok_or(Error::InvalidMoveSlot(slot))?;
        *entry = name.into();
        Ok(())
    }

    pub fn moves(&self) -> impl Iterator<Item = &str> {
        self.moves.iter().map(String::as_str).filter(|m| !m.is_empty())
    }

    pub fn final_stats(&self, base: &StatSpread) -> Result<StatSpread, Error> {
        let mut stats = StatSpread::default();
        for stat in StatName::ALL {
            let value = calculate_stat(
                base.get(stat),
                self.level,
                self.ivs.get(stat),
                self.evs.get(stat),
                self.nature,
                stat,
            )?;
            stats.set(stat, value);
        }
        Ok(stats)
    }
}
