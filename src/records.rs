//! Domain records normalized from raw API responses.

use crate::error::Error;
use crate::pokemon::{self, ChainLink, FlavorText, NamedAPIResource, PokemonCries, VerboseEffect};
use crate::stats::{StatName, StatSpread};
use crate::types::{PokemonType, Typing};
use serde::{Deserialize, Serialize};

const LANGUAGE: &str = "en";

fn english<'a>(entries: &'a [FlavorText]) -> Option<&'a FlavorText> {
    entries.iter().find(|entry| entry.language.name == LANGUAGE)
}

fn english_effect(entries: &[VerboseEffect]) -> Option<&VerboseEffect> {
    entries.iter().find(|entry| entry.language.name == LANGUAGE)
}

/// Flavor text in the API carries hard line breaks and form feeds.
fn clean_text(text: &str) -> String {
    text.replace(['\n', '\u{c}'], " ")
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// What the roster keeps about a Pokémon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonSummary {
    pub id: u32,
    pub name: String,
    pub image: Option<String>,
    pub sprite: Option<String>,
    pub types: Typing,
    pub stats: StatSpread,
    #[serde(default)]
    pub abilities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityRef {
    pub name: String,
    pub is_hidden: bool,
    pub url: String,
}

/// Everything the detail view shows about one Pokémon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonDetails {
    pub summary: PokemonSummary,
    pub shiny_image: Option<String>,
    pub shiny_sprite: Option<String>,
    /// Meters.
    pub height: f64,
    /// Kilograms.
    pub weight: f64,
    pub abilities: Vec<AbilityRef>,
    pub cries: PokemonCries,
    pub moves: Vec<pokemon::PokemonMove>,
    pub species_url: String,
}

impl TryFrom<pokemon::Pokemon> for PokemonDetails {
    type Error = Error;

    fn try_from(raw: pokemon::Pokemon) -> Result<Self, Self::Error> {
        let type_names: Vec<&str> = raw.types.iter().map(|slot| slot.r#type.name.as_str()).collect();
        let types = Typing::parse(&type_names)?;

        let mut stats = StatSpread::default();
        for entry in &raw.stats {
            if let Ok(stat) = entry.stat.name.parse::<StatName>() {
                stats.set(stat, entry.base_stat);
            }
        }

        let artwork = raw
            .sprites
            .other
            .as_ref()
            .and_then(|other| other.official_artwork.clone())
            .unwrap_or_default();
        let image = artwork.front_default.or_else(|| raw.sprites.front_default.clone());
        let shiny_image = artwork.front_shiny.or_else(|| raw.sprites.front_shiny.clone());

        let abilities: Vec<AbilityRef> = raw
            .abilities
            .iter()
            .map(|entry| AbilityRef {
                name: entry.ability.name.clone(),
                is_hidden: entry.is_hidden,
                url: entry.ability.url.clone(),
            })
            .collect();

        Ok(PokemonDetails {
            summary: PokemonSummary {
                id: raw.id,
                name: raw.name,
                image,
                sprite: raw.sprites.front_default,
                types,
                stats,
                abilities: abilities.iter().map(|a| a.name.clone()).collect(),
            },
            shiny_image,
            shiny_sprite: raw.sprites.front_shiny,
            height: f64::from(raw.height) / 10.0,
            weight: f64::from(raw.weight) / 10.0,
            abilities,
            cries: raw.cries.unwrap_or_default(),
            moves: raw.moves,
            species_url: raw.species.url,
        })
    }
}

/// One node of a flattened evolution tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionStage {
    pub name: String,
    pub id: Option<u32>,
    /// 1 for the base form, incremented per evolution step.
    pub stage: u32,
    pub trigger: Option<String>,
    pub min_level: Option<u32>,
    pub item: Option<String>,
    pub held_item: Option<String>,
    pub time_of_day: Option<String>,
    pub min_happiness: Option<u32>,
    pub min_affection: Option<u32>,
    pub location: Option<String>,
    pub known_move: Option<String>,
    pub known_move_type: Option<String>,
    pub image: Option<String>,
    pub sprite: Option<String>,
    pub types: Option<Typing>,
}

/// Depth-first flattening; branches (e.g. Eevee) appear in API order.
pub fn parse_evolution_chain(chain: &ChainLink) -> Vec<EvolutionStage> {
    fn traverse(node: &ChainLink, stage: u32, out: &mut Vec<EvolutionStage>) {
        let details = node.evolution_details.first();
        let name_of = |resource: Option<&NamedAPIResource>| resource.map(|r| r.name.clone());

        out.push(EvolutionStage {
            name: node.species.name.clone(),
            id: node.species.id(),
            stage,
            trigger: name_of(details.and_then(|d| d.trigger.as_ref())),
            min_level: details.and_then(|d| d.min_level),
            item: name_of(details.and_then(|d| d.item.as_ref())),
            held_item: name_of(details.and_then(|d| d.held_item.as_ref())),
            time_of_day: details.and_then(|d| non_empty(&d.time_of_day)),
            min_happiness: details.and_then(|d| d.min_happiness),
            min_affection: details.and_then(|d| d.min_affection),
            location: name_of(details.and_then(|d| d.location.as_ref())),
            known_move: name_of(details.and_then(|d| d.known_move.as_ref())),
            known_move_type: name_of(details.and_then(|d| d.known_move_type.as_ref())),
            image: None,
            sprite: None,
            types: None,
        });

        for next in &node.evolves_to {
            traverse(next, stage + 1, out);
        }
    }

    let mut stages = Vec::new();
    traverse(chain, 1, &mut stages);
    stages
}

/// Species-level facts layered on top of [`PokemonDetails`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokedexEntry {
    pub details: PokemonDetails,
    pub evolution_chain: Vec<EvolutionStage>,
    pub flavor_text: String,
    pub genus: String,
    pub generation: String,
    pub habitat: String,
    pub is_legendary: bool,
    pub is_mythical: bool,
}

impl PokedexEntry {
    pub fn new(
        details: PokemonDetails,
        species: &pokemon::PokemonSpecies,
        evolution_chain: Vec<EvolutionStage>,
    ) -> Self {
        Self {
            details,
            evolution_chain,
            flavor_text: english(&species.flavor_text_entries)
                .map(|entry| clean_text(&entry.flavor_text))
                .unwrap_or_default(),
            genus: species
                .genera
                .iter()
                .find(|g| g.language.name == LANGUAGE)
                .map(|g| g.genus.clone())
                .unwrap_or_default(),
            generation: species.generation.name.clone(),
            habitat: species
                .habitat
                .as_ref()
                .map(|h| h.name.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            is_legendary: species.is_legendary,
            is_mythical: species.is_mythical,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorTextEntry {
    pub text: String,
    pub version: Option<String>,
}

/// English entries with line breaks flattened, first occurrence of each text kept.
pub fn unique_flavor_texts(entries: &[FlavorText]) -> Vec<FlavorTextEntry> {
    let mut seen = std::collections::HashSet::new();
    entries
        .iter()
        .filter(|entry| entry.language.name == LANGUAGE)
        .map(|entry| FlavorTextEntry {
            text: clean_text(&entry.flavor_text),
            version: entry.version.as_ref().map(|v| v.name.clone()),
        })
        .filter(|entry| seen.insert(entry.text.clone()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveDetails {
    pub name: String,
    /// `None` for types outside the 18 (e.g. "shadow").
    pub r#type: Option<PokemonType>,
    pub power: Option<u32>,
    pub accuracy: Option<u32>,
    pub pp: Option<u32>,
    /// physical, special or status.
    pub damage_class: String,
    pub effect: String,
    pub flavor_text: String,
    pub priority: i32,
    pub target: String,
}

impl From<pokemon::Move> for MoveDetails {
    fn from(raw: pokemon::Move) -> Self {
        Self {
            r#type: raw.r#type.name.parse().ok(),
            power: raw.power,
            accuracy: raw.accuracy,
            pp: raw.pp,
            damage_class: raw.damage_class.name,
            effect: english_effect(&raw.effect_entries)
                .map(|e| e.short_effect.clone())
                .unwrap_or_default(),
            flavor_text: english(&raw.flavor_text_entries)
                .map(|e| e.flavor_text.clone())
                .unwrap_or_default(),
            priority: raw.priority,
            target: raw.target.name,
            name: raw.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnedMove {
    pub details: MoveDetails,
    pub level: u32,
}

/// A learnset grouped by how each move is learned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizedMoves {
    pub level_up: Vec<LearnedMove>,
    pub machine: Vec<LearnedMove>,
    pub egg: Vec<LearnedMove>,
    pub tutor: Vec<LearnedMove>,
}

impl OrganizedMoves {
    /// Files a move under `method`; unrecognized methods are dropped.
    pub fn push(&mut self, method: &str, learned: LearnedMove) {
        match method {
            "level-up" => self.level_up.push(learned),
            "machine" => self.machine.push(learned),
            "egg" => self.egg.push(learned),
            "tutor" => self.tutor.push(learned),
            _ => {}
        }
    }

    /// Every move once, sorted by name, as the build editor offers them.
    pub fn unique_by_name(&self) -> Vec<&MoveDetails> {
        let mut by_name = std::collections::BTreeMap::new();
        for learned in self.level_up.iter().chain(&self.machine).chain(&self.egg).chain(&self.tutor) {
            by_name.entry(learned.details.name.as_str()).or_insert(&learned.details);
        }
        by_name.into_values().collect()
    }
}

/// A move name with the first level recorded for each learn method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveLearnMethods {
    pub name: String,
    pub url: String,
    pub methods: Vec<(String, u32)>,
}

/// Collapses per-version learn entries, keeping API order of first appearance.
pub fn collect_learn_methods(moves: &[pokemon::PokemonMove]) -> Vec<MoveLearnMethods> {
    let mut collected: Vec<MoveLearnMethods> = Vec::new();
    for entry in moves {
        let index = match collected.iter().position(|m| m.name == entry.r#move.name) {
            Some(index) => index,
            None => {
                collected.push(MoveLearnMethods {
                    name: entry.r#move.name.clone(),
                    url: entry.r#move.url.clone(),
                    methods: Vec::new(),
                });
                collected.len() - 1
            }
        };
        let methods = &mut collected[index].methods;
        for detail in &entry.version_group_details {
            let method = &detail.move_learn_method.name;
            if !methods.iter().any(|(m, _)| m == method) {
                methods.push((method.clone(), detail.level_learned_at));
            }
        }
    }
    collected
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityDetails {
    pub name: String,
    pub effect: String,
    pub short_effect: String,
    pub flavor_text: String,
}

impl From<pokemon::Ability> for AbilityDetails {
    fn from(raw: pokemon::Ability) -> Self {
        let effect = english_effect(&raw.effect_entries);
        let short_effect = effect.map(|e| e.short_effect.clone()).unwrap_or_default();
        let long_effect = effect
            .and_then(|e| non_empty(&e.effect))
            .or_else(|| non_empty(&short_effect))
            .unwrap_or_else(|| "No description available.".to_string());
        Self {
            effect: long_effect,
            short_effect,
            flavor_text: english(&raw.flavor_text_entries)
                .map(|e| e.flavor_text.clone())
                .unwrap_or_default(),
            name: raw.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterInfo {
    pub min_level: u32,
    pub max_level: u32,
    pub chance: u32,
    pub method: String,
    pub conditions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEncounters {
    pub version: String,
    pub max_chance: u32,
    pub encounters: Vec<EncounterInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationEncounter {
    pub location_name: String,
    pub versions: Vec<VersionEncounters>,
}

impl From<pokemon::LocationAreaEncounter> for LocationEncounter {
    fn from(raw: pokemon::LocationAreaEncounter) -> Self {
        Self {
            location_name: raw.location_area.name.replace('-', " "),
            versions: raw
                .version_details
                .into_iter()
                .map(|v| VersionEncounters {
                    version: v.version.name,
                    max_chance: v.max_chance,
                    encounters: v
                        .encounter_details
                        .into_iter()
                        .map(|e| EncounterInfo {
                            min_level: e.min_level,
                            max_level: e.max_level,
                            chance: e.chance,
                            method: e.method.name,
                            conditions: e.condition_values.into_iter().map(|c| c.name).collect(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetails {
    pub id: u32,
    pub name: String,
    pub cost: u32,
    pub category: String,
    pub sprite: Option<String>,
    pub effect: String,
    pub short_effect: String,
    pub flavor_text: String,
    pub attributes: Vec<String>,
    pub fling_power: Option<u32>,
    pub fling_effect: Option<String>,
}

impl From<pokemon::Item> for ItemDetails {
    fn from(raw: pokemon::Item) -> Self {
        let effect = english_effect(&raw.effect_entries);
        Self {
            id: raw.id,
            cost: raw.cost,
            category: raw.category.name,
            sprite: raw.sprites.default,
            effect: effect.map(|e| e.effect.clone()).unwrap_or_default(),
            short_effect: effect.map(|e| e.short_effect.clone()).unwrap_or_default(),
            flavor_text: english(&raw.flavor_text_entries)
                .map(|e| e.flavor_text.clone())
                .unwrap_or_default(),
            attributes: raw.attributes.into_iter().map(|a| a.name).collect(),
            fling_power: raw.fling_power,
            fling_effect: raw.fling_effect.map(|f| f.name),
            name: raw.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BerryFlavor {
    pub name: String,
    pub potency: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BerryDetails {
    pub id: u32,
    pub name: String,
    pub growth_time: u32,
    pub max_harvest: u32,
    pub natural_gift_power: u32,
    pub natural_gift_type: String,
    pub size: u32,
    pub smoothness: u32,
    pub soil_dryness: u32,
    pub firmness: String,
    pub flavors: Vec<BerryFlavor>,
    /// The berry's item record, when it could be fetched.
    pub item: Option<ItemDetails>,
}

impl BerryDetails {
    pub fn new(raw: pokemon::Berry, item: Option<ItemDetails>) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            growth_time: raw.growth_time,
            max_harvest: raw.max_harvest,
            natural_gift_power: raw.natural_gift_power,
            natural_gift_type: raw.natural_gift_type.name,
            size: raw.size,
            smoothness: raw.smoothness,
            soil_dryness: raw.soil_dryness,
            firmness: raw.firmness.name,
            flavors: raw
                .flavors
                .into_iter()
                .map(|f| BerryFlavor {
                    name: f.flavor.name,
                    potency: f.potency,
                })
                .collect(),
            item,
        }
    }
}

/// A species name paired with its national dex id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpeciesRef {
    pub id: u32,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pokemon::{EvolutionDetail, PokemonMoveVersion};

    fn named(name: &str, url: &str) -> NamedAPIResource {
        NamedAPIResource {
            name: name.to_string(),
            url: url.to_string(),
        }
    }

    fn link(name: &str, id: u32, details: Vec<EvolutionDetail>, evolves_to: Vec<ChainLink>) -> ChainLink {
        ChainLink {
            species: named(name, &format!("https://pokeapi.co/api/v2/pokemon-species/{id}/")),
            evolution_details: details,
            evolves_to,
        }
    }

    #[test]
    fn test_pokemon_normalization() {
        let raw: pokemon::Pokemon = serde_json::from_value(serde_json::json!({
            "id": 6,
            "name": "charizard",
            "height": 17,
            "weight": 905,
            "sprites": {
                "front_default": "front.png",
                "front_shiny": "shiny.png",
                "other": {"official-artwork": {"front_default": "art.png", "front_shiny": null}}
            },
            "abilities": [
                {"is_hidden": false, "slot": 1, "ability": {"name": "blaze", "url": "a/66/"}},
                {"is_hidden": true, "slot": 3, "ability": {"name": "solar-power", "url": "a/94/"}}
            ],
            "species": {"name": "charizard", "url": "s/6/"},
            "stats": [
                {"base_stat": 78, "effort": 0, "stat": {"name": "hp", "url": ""}},
                {"base_stat": 84, "effort": 0, "stat": {"name": "attack", "url": ""}},
                {"base_stat": 78, "effort": 0, "stat": {"name": "defense", "url": ""}},
                {"base_stat": 109, "effort": 3, "stat": {"name": "special-attack", "url": ""}},
                {"base_stat": 85, "effort": 0, "stat": {"name": "special-defense", "url": ""}},
                {"base_stat": 100, "effort": 0, "stat": {"name": "speed", "url": ""}}
            ],
            "types": [
                {"slot": 1, "type": {"name": "fire", "url": ""}},
                {"slot": 2, "type": {"name": "flying", "url": ""}}
            ]
        }))
        .unwrap();

        let details = PokemonDetails::try_from(raw).unwrap();
        assert_eq!(details.summary.types, Typing::dual(PokemonType::Fire, PokemonType::Flying));
        assert_eq!(details.summary.image.as_deref(), Some("art.png"));
        assert_eq!(details.shiny_image.as_deref(), Some("shiny.png"));
        assert_eq!(details.summary.stats.special_attack, 109);
        assert_eq!(details.summary.abilities, vec!["blaze", "solar-power"]);
        assert!(details.abilities[1].is_hidden);
        assert_eq!(details.height, 1.7);
        assert_eq!(details.weight, 90.5);
        assert_eq!(details.cries, PokemonCries::default());
    }

    #[test]
    fn test_evolution_chain_flattening() {
        let level = |lvl: u32| EvolutionDetail {
            trigger: Some(named("level-up", "")),
            min_level: Some(lvl),
            ..EvolutionDetail::default()
        };
        let stone = |item: &str| EvolutionDetail {
            trigger: Some(named("use-item", "")),
            item: Some(named(item, "")),
            ..EvolutionDetail::default()
        };
        let chain = link(
            "oddish",
            43,
            vec![],
            vec![link(
                "gloom",
                44,
                vec![level(21)],
                vec![
                    link("vileplume", 45, vec![stone("leaf-stone")], vec![]),
                    link("bellossom", 182, vec![stone("sun-stone")], vec![]),
                ],
            )],
        );

        let stages = parse_evolution_chain(&chain);
        let names: Vec<_> = stages.iter().map(|s| (s.name.as_str(), s.stage)).collect();
        assert_eq!(
            names,
            vec![("oddish", 1), ("gloom", 2), ("vileplume", 3), ("bellossom", 3)]
        );
        assert_eq!(stages[0].trigger, None);
        assert_eq!(stages[1].min_level, Some(21));
        assert_eq!(stages[3].item.as_deref(), Some("sun-stone"));
        assert_eq!(stages[3].id, Some(182));
        assert_eq!(stages[1].time_of_day, None);
    }

    #[test]
    fn test_flavor_texts_deduplicated() {
        let entry = |text: &str, lang: &str, version: &str| FlavorText {
            flavor_text: text.to_string(),
            language: named(lang, ""),
            version: Some(named(version, "")),
        };
        let entries = vec![
            entry("Spits fire\nthat is hot.", "en", "red"),
            entry("Crache du feu.", "fr", "red"),
            entry("Spits fire\u{c}that is hot.", "en", "blue"),
            entry("Flies around.", "en", "gold"),
        ];
        let unique = unique_flavor_texts(&entries);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].text, "Spits fire that is hot.");
        assert_eq!(unique[0].version.as_deref(), Some("red"));
        assert_eq!(unique[1].version.as_deref(), Some("gold"));
    }

    #[test]
    fn test_learn_methods_keep_first_level() {
        let version = |method: &str, level: u32| PokemonMoveVersion {
            level_learned_at: level,
            move_learn_method: named(method, ""),
            version_group: None,
        };
        let moves = vec![
            pokemon::PokemonMove {
                r#move: named("ember", "m/52/"),
                version_group_details: vec![version("level-up", 7), version("level-up", 4), version("tutor", 0)],
            },
            pokemon::PokemonMove {
                r#move: named("ember", "m/52/"),
                version_group_details: vec![version("machine", 0)],
            },
        ];
        let collected = collect_learn_methods(&moves);
        assert_eq!(collected.len(), 1);
        assert_eq!(
            collected[0].methods,
            vec![
                ("level-up".to_string(), 7),
                ("tutor".to_string(), 0),
                ("machine".to_string(), 0)
            ]
        );
    }

    #[test]
    fn test_ability_effect_fallbacks() {
        let raw = pokemon::Ability {
            name: "stench".to_string(),
            effect_entries: vec![VerboseEffect {
                effect: String::new(),
                short_effect: "May cause flinching.".to_string(),
                language: named("en", ""),
            }],
            flavor_text_entries: vec![],
        };
        let details = AbilityDetails::from(raw);
        assert_eq!(details.effect, "May cause flinching.");

        let empty = AbilityDetails::from(pokemon::Ability {
            name: "mystery".to_string(),
            effect_entries: vec![],
            flavor_text_entries: vec![],
        });
        assert_eq!(empty.effect, "No description available.");
        assert_eq!(empty.short_effect, "");
    }

    #[test]
    fn test_location_names_are_spaced() {
        let raw: pokemon::LocationAreaEncounter = serde_json::from_value(serde_json::json!({
            "location_area": {"name": "viridian-forest-area", "url": ""},
            "version_details": [{
                "version": {"name": "red", "url": ""},
                "max_chance": 5,
                "encounter_details": [{
                    "min_level": 3, "max_level": 5, "chance": 5,
                    "method": {"name": "walk", "url": ""},
                    "condition_values": []
                }]
            }]
        }))
        .unwrap();
        let location = LocationEncounter::from(raw);
        assert_eq!(location.location_name, "viridian forest area");
        assert_eq!(location.versions[0].encounters[0].method, "walk");
    }
}
