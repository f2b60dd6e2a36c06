// pokemon.rs
// Raw response shapes of the remote Pokémon API. Only the fields the
// companion reads are modelled; everything else is ignored on deserialize.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct NamedAPIResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl NamedAPIResource {
    /// Numeric id from the trailing path segment, e.g. `.../pokemon-species/25/`.
    pub fn id(&self) -> Option<u32> {
        self.url
            .split('/')
            .filter(|segment| !segment.is_empty())
            .next_back()
            .and_then(|segment| segment.parse().ok())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct APIResource {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct NamedAPIResourceList {
    pub count: u32,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<NamedAPIResource>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub sprites: PokemonSprites,
    #[serde(default)]
    pub abilities: Vec<PokemonAbility>,
    #[serde(default)]
    pub moves: Vec<PokemonMove>,
    pub species: NamedAPIResource,
    #[serde(default)]
    pub stats: Vec<PokemonStat>,
    pub types: Vec<PokemonTypeSlot>,
    #[serde(default)]
    pub cries: Option<PokemonCries>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PokemonSprites {
    pub front_default: Option<String>,
    pub front_shiny: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<ArtworkSprites>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ArtworkSprites {
    pub front_default: Option<String>,
    pub front_shiny: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct PokemonCries {
    pub latest: Option<String>,
    pub legacy: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PokemonAbility {
    pub is_hidden: bool,
    pub slot: u32,
    pub ability: NamedAPIResource,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PokemonMove {
    pub r#move: NamedAPIResource,
    #[serde(default)]
    pub version_group_details: Vec<PokemonMoveVersion>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PokemonMoveVersion {
    pub level_learned_at: u32,
    pub move_learn_method: NamedAPIResource,
    #[serde(default)]
    pub version_group: Option<NamedAPIResource>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PokemonStat {
    pub base_stat: u32,
    #[serde(default)]
    pub effort: u32,
    pub stat: NamedAPIResource,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PokemonTypeSlot {
    pub slot: u32,
    pub r#type: NamedAPIResource,
}

/// A localized text entry. Items call the field `text`, everything else
/// calls it `flavor_text`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FlavorText {
    #[serde(alias = "text")]
    pub flavor_text: String,
    pub language: NamedAPIResource,
    #[serde(default)]
    pub version: Option<NamedAPIResource>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VerboseEffect {
    #[serde(default)]
    pub effect: String,
    #[serde(default)]
    pub short_effect: String,
    pub language: NamedAPIResource,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Genus {
    pub genus: String,
    pub language: NamedAPIResource,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PokemonSpecies {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorText>,
    #[serde(default)]
    pub genera: Vec<Genus>,
    pub generation: NamedAPIResource,
    pub habitat: Option<NamedAPIResource>,
    #[serde(default)]
    pub is_legendary: bool,
    #[serde(default)]
    pub is_mythical: bool,
    pub evolution_chain: Option<APIResource>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EvolutionChain {
    pub id: u32,
    pub chain: ChainLink,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChainLink {
    pub species: NamedAPIResource,
    #[serde(default)]
    pub evolution_details: Vec<EvolutionDetail>,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct EvolutionDetail {
    pub trigger: Option<NamedAPIResource>,
    pub min_level: Option<u32>,
    pub item: Option<NamedAPIResource>,
    pub held_item: Option<NamedAPIResource>,
    #[serde(default)]
    pub time_of_day: String,
    pub min_happiness: Option<u32>,
    pub min_affection: Option<u32>,
    pub location: Option<NamedAPIResource>,
    pub known_move: Option<NamedAPIResource>,
    pub known_move_type: Option<NamedAPIResource>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Type {
    pub id: u32,
    pub name: String,
    pub damage_relations: TypeRelations,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TypeRelations {
    pub double_damage_from: Vec<NamedAPIResource>,
    pub half_damage_from: Vec<NamedAPIResource>,
    pub no_damage_from: Vec<NamedAPIResource>,
    pub double_damage_to: Vec<NamedAPIResource>,
    pub half_damage_to: Vec<NamedAPIResource>,
    pub no_damage_to: Vec<NamedAPIResource>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Move {
    pub name: String,
    pub r#type: NamedAPIResource,
    pub power: Option<u32>,
    pub accuracy: Option<u32>,
    pub pp: Option<u32>,
    pub damage_class: NamedAPIResource,
    #[serde(default)]
    pub effect_entries: Vec<VerboseEffect>,
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorText>,
    #[serde(default)]
    pub priority: i32,
    pub target: NamedAPIResource,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Ability {
    pub name: String,
    #[serde(default)]
    pub effect_entries: Vec<VerboseEffect>,
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorText>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LocationAreaEncounter {
    pub location_area: NamedAPIResource,
    pub version_details: Vec<VersionEncounterDetail>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VersionEncounterDetail {
    pub version: NamedAPIResource,
    pub max_chance: u32,
    pub encounter_details: Vec<Encounter>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Encounter {
    pub min_level: u32,
    pub max_level: u32,
    pub chance: u32,
    pub method: NamedAPIResource,
    #[serde(default)]
    pub condition_values: Vec<NamedAPIResource>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Item {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub cost: u32,
    pub category: NamedAPIResource,
    #[serde(default)]
    pub sprites: ItemSprites,
    #[serde(default)]
    pub effect_entries: Vec<VerboseEffect>,
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorText>,
    #[serde(default)]
    pub attributes: Vec<NamedAPIResource>,
    pub fling_power: Option<u32>,
    pub fling_effect: Option<NamedAPIResource>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ItemSprites {
    pub default: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ItemCategory {
    pub name: String,
    pub items: Vec<NamedAPIResource>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Berry {
    pub id: u32,
    pub name: String,
    pub growth_time: u32,
    pub max_harvest: u32,
    pub natural_gift_power: u32,
    pub natural_gift_type: NamedAPIResource,
    pub size: u32,
    pub smoothness: u32,
    pub soil_dryness: u32,
    pub firmness: NamedAPIResource,
    #[serde(default)]
    pub flavors: Vec<BerryFlavorMap>,
    pub item: NamedAPIResource,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BerryFlavorMap {
    pub potency: u32,
    pub flavor: NamedAPIResource,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Generation {
    pub id: u32,
    pub name: String,
    pub pokemon_species: Vec<NamedAPIResource>,
}
