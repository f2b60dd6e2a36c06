use crate::config::PokemonConfig;
use crate::effectiveness::EffectivenessResult;
use crate::error::Error;
use crate::pokemon::{self, NamedAPIResource, NamedAPIResourceList, PokemonMove};
use crate::records::{
    self, AbilityDetails, BerryDetails, FlavorTextEntry, ItemDetails, LearnedMove,
    LocationEncounter, MoveDetails, OrganizedMoves, PokedexEntry, PokemonDetails, SpeciesRef,
};
use crate::types::Typing;
use rand::seq::SliceRandom;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use tokio::task::JoinSet;

/// Random draws allowed per quiz option before giving up.
const MAX_DRAWS_PER_OPTION: usize = 50;

fn normalize(name_or_id: &str) -> String {
    name_or_id.trim().to_lowercase()
}

/// Async client for the PokeAPI v2 REST endpoints.
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl PokeApiClient {
    pub fn new(config: &PokemonConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::Config(format!("HTTP client: {}", e))
            })?;
        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, resource: &str) -> Result<T, Error> {
        tracing::debug!("Fetching {} from URL: {}", resource, url);

        let response = self.http.get(url).send().await.map_err(|e| {
            tracing::error!("Failed to make HTTP request to {}: {}", url, e);
            Error::RemoteTransport {
                resource: resource.to_string(),
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!("{} not found at {}", resource, url);
            return Err(Error::RemoteNotFound(resource.to_string()));
        }
        if !status.is_success() {
            let error_msg = format!("API request failed with status: {}", status);
            tracing::error!("{}", error_msg);
            return Err(Error::RemoteTransport {
                resource: resource.to_string(),
                message: error_msg,
            });
        }

        let body = response.bytes().await.map_err(|e| {
            tracing::error!("Failed to read response body from {}: {}", url, e);
            Error::from(e)
        })?;
        serde_json::from_slice(&body).map_err(|e| {
            tracing::error!("Failed to parse JSON response from {}: {}", url, e);
            Error::Parse(format!("{}: {}", resource, e))
        })
    }

    async fn get_path<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.get_json(&self.endpoint(path), path).await
    }

    /// Fetches every URL concurrently, returning results in input order.
    async fn get_each<T>(&self, urls: Vec<String>) -> Vec<Result<T, Error>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let mut tasks = JoinSet::new();
        for (index, url) in urls.into_iter().enumerate() {
            let client = self.clone();
            tasks.spawn(async move {
                let result = client.get_json::<T>(&url, &url).await;
                (index, result)
            });
        }

        let mut results: Vec<Option<Result<T, Error>>> = Vec::new();
        results.resize_with(tasks.len(), || None);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(e) => tracing::error!("Fetch task failed: {}", e),
            }
        }
        results
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| {
                    Err(Error::RemoteTransport {
                        resource: "batch".to_string(),
                        message: "fetch task did not complete".to_string(),
                    })
                })
            })
            .collect()
    }

    pub async fn fetch_pokemon(&self, name_or_id: &str) -> Result<PokemonDetails, Error> {
        let raw: pokemon::Pokemon = self
            .get_path(&format!("pokemon/{}", normalize(name_or_id)))
            .await?;
        let details = PokemonDetails::try_from(raw)?;
        tracing::debug!(
            "Successfully fetched Pokemon: {} (ID: {})",
            details.summary.name,
            details.summary.id
        );
        Ok(details)
    }

    pub async fn fetch_species(&self, name_or_id: &str) -> Result<pokemon::PokemonSpecies, Error> {
        self.get_path(&format!("pokemon-species/{}", normalize(name_or_id)))
            .await
    }

    pub async fn fetch_evolution_chain(&self, url: &str) -> Result<pokemon::EvolutionChain, Error> {
        self.get_json(url, "evolution-chain").await
    }

    /// Details, species facts and the flattened evolution chain with each
    /// stage's artwork. A stage whose Pokémon cannot be fetched keeps empty
    /// artwork.
    pub async fn fetch_pokemon_with_evolution(
        &self,
        name_or_id: &str,
    ) -> Result<PokedexEntry, Error> {
        let details = self.fetch_pokemon(name_or_id).await?;
        let species = self.fetch_species(&details.summary.id.to_string()).await?;

        let mut stages = match &species.evolution_chain {
            Some(chain) => {
                let chain = self.fetch_evolution_chain(&chain.url).await?;
                records::parse_evolution_chain(&chain.chain)
            }
            None => Vec::new(),
        };

        let mut tasks = JoinSet::new();
        for (index, stage) in stages.iter().enumerate() {
            let Some(id) = stage.id else { continue };
            let client = self.clone();
            tasks.spawn(async move { (index, client.fetch_pokemon(&id.to_string()).await) });
        }
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(stage_details))) => {
                    let stage = &mut stages[index];
                    stage.image = stage_details.summary.image;
                    stage.sprite = stage_details.summary.sprite;
                    stage.types = Some(stage_details.summary.types);
                }
                Ok((index, Err(e))) => {
                    tracing::warn!("No artwork for evolution stage {}: {}", stages[index].name, e);
                }
                Err(e) => tracing::error!("Evolution stage task failed: {}", e),
            }
        }

        Ok(PokedexEntry::new(details, &species, stages))
    }

    pub async fn fetch_type(&self, name: &str) -> Result<pokemon::Type, Error> {
        self.get_path(&format!("type/{}", normalize(name))).await
    }

    /// Defensive profile assembled from the remote damage relations of each
    /// type rather than the built-in chart.
    pub async fn type_effectiveness_from_api(
        &self,
        typing: &Typing,
    ) -> Result<EffectivenessResult, Error> {
        let mut combined: Option<EffectivenessResult> = None;
        for ty in typing.iter() {
            let remote = self.fetch_type(ty.as_str()).await?;
            let single = EffectivenessResult::from_damage_relations(&remote.damage_relations)?;
            combined = Some(match combined {
                Some(previous) => previous.combine(&single),
                None => single,
            });
        }
        Ok(combined.unwrap_or_default())
    }

    pub async fn fetch_move(&self, url: &str) -> Result<MoveDetails, Error> {
        let raw: pokemon::Move = self.get_json(url, "move").await?;
        Ok(MoveDetails::from(raw))
    }

    /// Details for the first `limit` distinct moves, grouped by learn method.
    /// Moves whose details cannot be fetched are left out.
    pub async fn fetch_pokemon_moves(
        &self,
        moves: &[PokemonMove],
        limit: usize,
    ) -> OrganizedMoves {
        let learnable: Vec<_> = records::collect_learn_methods(moves)
            .into_iter()
            .take(limit)
            .collect();
        let urls = learnable.iter().map(|m| m.url.clone()).collect();
        let fetched = self.get_each::<pokemon::Move>(urls).await;

        let mut organized = OrganizedMoves::default();
        for (learn, result) in learnable.iter().zip(fetched) {
            let details = match result {
                Ok(raw) => MoveDetails::from(raw),
                Err(e) => {
                    tracing::warn!("Skipping move {}: {}", learn.name, e);
                    continue;
                }
            };
            for (method, level) in &learn.methods {
                organized.push(
                    method,
                    LearnedMove {
                        details: details.clone(),
                        level: *level,
                    },
                );
            }
        }
        organized.level_up.sort_by_key(|learned| learned.level);
        organized
    }

    pub async fn fetch_ability(&self, url: &str) -> Result<AbilityDetails, Error> {
        let raw: pokemon::Ability = self.get_json(url, "ability").await?;
        Ok(AbilityDetails::from(raw))
    }

    pub async fn fetch_locations(&self, id: u32) -> Result<Vec<LocationEncounter>, Error> {
        let raw: Vec<pokemon::LocationAreaEncounter> =
            self.get_path(&format!("pokemon/{}/encounters", id)).await?;
        Ok(raw.into_iter().map(LocationEncounter::from).collect())
    }

    pub async fn fetch_flavor_texts(&self, name_or_id: &str) -> Result<Vec<FlavorTextEntry>, Error> {
        let species = self.fetch_species(name_or_id).await?;
        Ok(records::unique_flavor_texts(&species.flavor_text_entries))
    }

    pub async fn fetch_item(&self, name_or_id: &str) -> Result<ItemDetails, Error> {
        let raw: pokemon::Item = self
            .get_path(&format!("item/{}", normalize(name_or_id)))
            .await?;
        Ok(ItemDetails::from(raw))
    }

    pub async fn fetch_item_list(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<NamedAPIResourceList, Error> {
        self.get_path(&format!("item?limit={}&offset={}", limit, offset))
            .await
    }

    pub async fn fetch_items_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<NamedAPIResource>, Error> {
        let raw: pokemon::ItemCategory = self
            .get_path(&format!("item-category/{}", normalize(category)))
            .await?;
        Ok(raw.items)
    }

    /// The berry together with its item record, when that can be fetched.
    pub async fn fetch_berry(&self, name_or_id: &str) -> Result<BerryDetails, Error> {
        let raw: pokemon::Berry = self
            .get_path(&format!("berry/{}", normalize(name_or_id)))
            .await?;
        let item = match self.fetch_item(&raw.item.name).await {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!("No item record for berry {}: {}", raw.name, e);
                None
            }
        };
        Ok(BerryDetails::new(raw, item))
    }

    pub async fn fetch_berry_list(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<NamedAPIResourceList, Error> {
        self.get_path(&format!("berry?limit={}&offset={}", limit, offset))
            .await
    }

    pub async fn fetch_generation(&self, id: u32) -> Result<pokemon::Generation, Error> {
        self.get_path(&format!("generation/{}", id)).await
    }

    pub async fn fetch_pokemon_by_generation(&self, id: u32) -> Result<Vec<SpeciesRef>, Error> {
        let generation = self.fetch_generation(id).await?;
        Ok(generation
            .pokemon_species
            .into_iter()
            .filter_map(|species| {
                species.id().map(|id| SpeciesRef {
                    id,
                    name: species.name,
                })
            })
            .collect())
    }

    pub async fn fetch_pokemon_list(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<NamedAPIResourceList, Error> {
        self.get_path(&format!("pokemon?limit={}&offset={}", limit, offset))
            .await
    }

    pub async fn fetch_random_pokemon(&self, max_id: u32) -> Result<PokemonDetails, Error> {
        let id: u32 = rand::random_range(1..=max_id.max(1));
        tracing::debug!("Picked random Pokémon ID: {}", id);
        self.fetch_pokemon(&id.to_string()).await
    }

    /// `count` distinct Pokémon including `correct`, in random order.
    /// Ids that fail to fetch are replaced by another draw.
    pub async fn fetch_random_options(
        &self,
        correct: &PokemonDetails,
        count: usize,
        max_id: u32,
    ) -> Result<Vec<PokemonDetails>, Error> {
        let mut options = vec![correct.clone()];
        let mut used = HashSet::from([correct.summary.id]);
        let mut draws = 0;

        while options.len() < count {
            if draws >= count * MAX_DRAWS_PER_OPTION {
                tracing::error!("Gave up picking quiz options after {} draws", draws);
                return Err(Error::RemoteTransport {
                    resource: "random options".to_string(),
                    message: format!("only found {} of {} options", options.len(), count),
                });
            }
            draws += 1;

            let id: u32 = rand::random_range(1..=max_id.max(1));
            if used.contains(&id) {
                continue;
            }
            match self.fetch_pokemon(&id.to_string()).await {
                Ok(pokemon) => {
                    used.insert(id);
                    options.push(pokemon);
                }
                Err(e) => tracing::debug!("Retrying quiz option after ID {} failed: {}", id, e),
            }
        }

        options.shuffle(&mut rand::rng());
        Ok(options)
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! In-process stand-in for the remote API.

    use axum::{
        Json, Router,
        extract::{Path, Query, State},
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::get,
    };
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    pub const SPECIES: [&str; 25] = [
        "bulbasaur", "ivysaur", "venusaur", "charmander", "charmeleon", "charizard", "squirtle",
        "wartortle", "blastoise", "caterpie", "metapod", "butterfree", "weedle", "kakuna",
        "beedrill", "pidgey", "pidgeotto", "pidgeot", "rattata", "raticate", "spearow", "fearow",
        "ekans", "arbok", "pikachu",
    ];

    pub struct MockState {
        pub base: String,
        pub list_hits: AtomicUsize,
        pub fail_list_once: AtomicBool,
    }

    type Shared = State<Arc<MockState>>;

    fn named(name: &str, url: String) -> Value {
        json!({"name": name, "url": url})
    }

    fn en() -> Value {
        named("en", String::new())
    }

    fn pokemon_json(base: &str, id: u32, name: &str, types: &[&str]) -> Value {
        let moves = if id == 1 {
            json!([
                {"move": named("vine-whip", format!("{base}/move/vine-whip/")), "version_group_details": [
                    {"level_learned_at": 7, "move_learn_method": {"name": "level-up", "url": ""}},
                    {"level_learned_at": 3, "move_learn_method": {"name": "level-up", "url": ""}}
                ]},
                {"move": named("tackle", format!("{base}/move/tackle/")), "version_group_details": [
                    {"level_learned_at": 1, "move_learn_method": {"name": "level-up", "url": ""}}
                ]},
                {"move": named("swords-dance", format!("{base}/move/swords-dance/")), "version_group_details": [
                    {"level_learned_at": 0, "move_learn_method": {"name": "machine", "url": ""}}
                ]},
                {"move": named("petal-dance", format!("{base}/move/petal-dance/")), "version_group_details": [
                    {"level_learned_at": 44, "move_learn_method": {"name": "level-up", "url": ""}}
                ]}
            ])
        } else {
            json!([])
        };
        let slots: Vec<Value> = types
            .iter()
            .enumerate()
            .map(|(i, ty)| json!({"slot": i + 1, "type": named(ty, format!("{base}/type/{ty}/"))}))
            .collect();
        let stat = |name: &str, value: u32| json!({"base_stat": value, "effort": 0, "stat": {"name": name, "url": ""}});
        json!({
            "id": id,
            "name": name,
            "height": 7,
            "weight": 69,
            "sprites": {
                "front_default": format!("{base}/sprites/{id}.png"),
                "front_shiny": null,
                "other": {"official-artwork": {"front_default": format!("{base}/artwork/{id}.png"), "front_shiny": null}}
            },
            "abilities": [
                {"is_hidden": false, "slot": 1, "ability": named("overgrow", format!("{base}/ability/overgrow/"))}
            ],
            "moves": moves,
            "species": named(name, format!("{base}/pokemon-species/{id}/")),
            "stats": [
                stat("hp", 45), stat("attack", 49), stat("defense", 49),
                stat("special-attack", 65), stat("special-defense", 65), stat("speed", 45)
            ],
            "types": slots,
            "cries": {"latest": format!("{base}/cries/{id}.ogg"), "legacy": null}
        })
    }

    fn lookup(key: &str) -> Option<(u32, &'static str, &'static [&'static str])> {
        const KNOWN: [(u32, &str, &[&str]); 4] = [
            (1, "bulbasaur", &["grass", "poison"]),
            (2, "ivysaur", &["grass", "poison"]),
            (3, "venusaur", &["grass", "poison"]),
            (6, "charizard", &["fire", "flying"]),
        ];
        KNOWN
            .into_iter()
            .find(|(id, name, _)| key == id.to_string() || key == *name)
    }

    async fn pokemon(State(state): Shared, Path(key): Path<String>) -> Response {
        match key.as_str() {
            "broken" => return (StatusCode::OK, "{not json").into_response(),
            "teapot" => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            _ => {}
        }
        match lookup(&key) {
            Some((id, name, types)) => Json(pokemon_json(&state.base, id, name, types)).into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        }
    }

    async fn encounters(Path(id): Path<u32>) -> Json<Value> {
        if id != 1 {
            return Json(json!([]));
        }
        Json(json!([{
            "location_area": {"name": "pallet-town-area", "url": ""},
            "version_details": [{
                "version": {"name": "red", "url": ""},
                "max_chance": 10,
                "encounter_details": [{
                    "min_level": 5, "max_level": 5, "chance": 10,
                    "method": {"name": "gift", "url": ""},
                    "condition_values": [{"name": "starter", "url": ""}]
                }]
            }]
        }]))
    }

    async fn species(State(state): Shared, Path(key): Path<String>) -> Response {
        if key != "1" && key != "bulbasaur" {
            return StatusCode::NOT_FOUND.into_response();
        }
        let entry = |text: &str, lang: &str, version: &str| {
            json!({"flavor_text": text, "language": {"name": lang, "url": ""}, "version": {"name": version, "url": ""}})
        };
        Json(json!({
            "id": 1,
            "name": "bulbasaur",
            "flavor_text_entries": [
                entry("A strange seed was\nplanted on its\u{c}back at birth.", "en", "red"),
                entry("Une graine.", "fr", "red"),
                entry("A strange seed was\nplanted on its\u{c}back at birth.", "en", "blue"),
                entry("It carries a seed on its back.", "en", "gold")
            ],
            "genera": [{"genus": "Seed Pokémon", "language": en()}],
            "generation": {"name": "generation-i", "url": ""},
            "habitat": null,
            "is_legendary": false,
            "is_mythical": false,
            "evolution_chain": {"url": format!("{}/evolution-chain/1/", state.base)}
        }))
        .into_response()
    }

    async fn evolution_chain(State(state): Shared) -> Json<Value> {
        let base = &state.base;
        let link = |name: &str, id: u32| named(name, format!("{base}/pokemon-species/{id}/"));
        let level = |lvl: u32| json!([{"trigger": {"name": "level-up", "url": ""}, "min_level": lvl, "time_of_day": ""}]);
        Json(json!({
            "id": 1,
            "chain": {
                "species": link("bulbasaur", 1),
                "evolution_details": [],
                "evolves_to": [{
                    "species": link("ivysaur", 2),
                    "evolution_details": level(16),
                    "evolves_to": [{
                        "species": link("venusaur", 3),
                        "evolution_details": level(32),
                        "evolves_to": []
                    }]
                }]
            }
        }))
    }

    async fn type_relations(Path(name): Path<String>) -> Response {
        let names = |list: &[&str]| -> Vec<Value> { list.iter().map(|n| named(n, String::new())).collect() };
        let (double, half, none): (Vec<&str>, Vec<&str>, Vec<&str>) = match name.as_str() {
            "grass" => (
                vec!["flying", "poison", "bug", "fire", "ice"],
                vec!["ground", "water", "grass", "electric"],
                vec![],
            ),
            "poison" => (
                vec!["ground", "psychic"],
                vec!["fighting", "poison", "bug", "grass", "fairy"],
                vec![],
            ),
            "ghost" => (vec!["ghost", "dark"], vec!["poison", "bug"], vec!["normal", "fighting"]),
            _ => return StatusCode::NOT_FOUND.into_response(),
        };
        Json(json!({
            "id": 1,
            "name": name,
            "damage_relations": {
                "double_damage_from": names(&double),
                "half_damage_from": names(&half),
                "no_damage_from": names(&none),
                "double_damage_to": [],
                "half_damage_to": [],
                "no_damage_to": []
            }
        }))
        .into_response()
    }

    async fn moves(Path(name): Path<String>) -> Response {
        let (ty, power, class) = match name.as_str() {
            "tackle" => ("normal", Some(40), "physical"),
            "vine-whip" => ("grass", Some(45), "physical"),
            "swords-dance" => ("normal", None, "status"),
            _ => return StatusCode::NOT_FOUND.into_response(),
        };
        Json(json!({
            "name": name,
            "type": {"name": ty, "url": ""},
            "power": power,
            "accuracy": power.map(|_| 100),
            "pp": 25,
            "damage_class": {"name": class, "url": ""},
            "effect_entries": [{"effect": "Long effect.", "short_effect": "Short effect.", "language": en()}],
            "flavor_text_entries": [{"flavor_text": "A move.", "language": en()}],
            "priority": 0,
            "target": {"name": "selected-pokemon", "url": ""}
        }))
        .into_response()
    }

    async fn ability(Path(name): Path<String>) -> Response {
        if name != "overgrow" {
            return StatusCode::NOT_FOUND.into_response();
        }
        Json(json!({
            "name": "overgrow",
            "effect_entries": [
                {"effect": "Raises grass moves when HP is low.", "short_effect": "Powers up grass moves.", "language": en()}
            ],
            "flavor_text_entries": [{"flavor_text": "Ups GRASS moves in a pinch.", "language": en()}]
        }))
        .into_response()
    }

    async fn item(State(state): Shared, Path(name): Path<String>) -> Response {
        if name != "oran-berry" && name != "132" {
            return StatusCode::NOT_FOUND.into_response();
        }
        Json(json!({
            "id": 132,
            "name": "oran-berry",
            "cost": 20,
            "category": {"name": "medicine", "url": ""},
            "sprites": {"default": format!("{}/items/oran-berry.png", state.base)},
            "effect_entries": [{"effect": "Restores 10 HP.", "short_effect": "Heals 10 HP.", "language": en()}],
            "flavor_text_entries": [{"text": "A berry that heals.", "language": en()}],
            "attributes": [{"name": "holdable", "url": ""}],
            "fling_power": 10,
            "fling_effect": null
        }))
        .into_response()
    }

    async fn item_category(State(state): Shared, Path(name): Path<String>) -> Response {
        if name != "medicine" {
            return StatusCode::NOT_FOUND.into_response();
        }
        Json(json!({
            "name": "medicine",
            "items": [named("oran-berry", format!("{}/item/132/", state.base))]
        }))
        .into_response()
    }

    async fn berry(Path(name): Path<String>) -> Response {
        let item = match name.as_str() {
            "oran" => "oran-berry",
            "mystery" => "mystery-berry",
            _ => return StatusCode::NOT_FOUND.into_response(),
        };
        Json(json!({
            "id": 7,
            "name": name,
            "growth_time": 4,
            "max_harvest": 5,
            "natural_gift_power": 60,
            "natural_gift_type": {"name": "poison", "url": ""},
            "size": 35,
            "smoothness": 20,
            "soil_dryness": 15,
            "firmness": {"name": "super-hard", "url": ""},
            "flavors": [{"potency": 10, "flavor": {"name": "spicy", "url": ""}}],
            "item": {"name": item, "url": ""}
        }))
        .into_response()
    }

    async fn generation(State(state): Shared, Path(id): Path<u32>) -> Response {
        if id != 1 {
            return StatusCode::NOT_FOUND.into_response();
        }
        let base = &state.base;
        Json(json!({
            "id": 1,
            "name": "generation-i",
            "pokemon_species": [
                named("bulbasaur", format!("{base}/pokemon-species/1/")),
                named("pikachu", format!("{base}/pokemon-species/25/")),
                named("unnumbered", String::new())
            ]
        }))
        .into_response()
    }

    fn page(base: &str, kind: &str, names: &[&str], query: &HashMap<String, String>) -> Value {
        let parse = |key: &str, default: usize| {
            query
                .get(key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        };
        let limit = parse("limit", 20);
        let offset = parse("offset", 0);
        let results: Vec<Value> = names
            .iter()
            .enumerate()
            .skip(offset)
            .take(limit)
            .map(|(i, name)| named(name, format!("{base}/{kind}/{}/", i + 1)))
            .collect();
        json!({"count": names.len(), "next": null, "previous": null, "results": results})
    }

    async fn pokemon_list(
        State(state): Shared,
        Query(query): Query<HashMap<String, String>>,
    ) -> Response {
        state.list_hits.fetch_add(1, Ordering::SeqCst);
        if state.fail_list_once.swap(false, Ordering::SeqCst) {
            return StatusCode::SERVICE_UNAVAILABLE.into_response();
        }
        Json(page(&state.base, "pokemon", &SPECIES, &query)).into_response()
    }

    async fn item_list(State(state): Shared, Query(query): Query<HashMap<String, String>>) -> Json<Value> {
        Json(page(&state.base, "item", &["master-ball", "ultra-ball", "great-ball"], &query))
    }

    async fn berry_list(State(state): Shared, Query(query): Query<HashMap<String, String>>) -> Json<Value> {
        Json(page(&state.base, "berry", &["cheri", "chesto", "pecha", "rawst"], &query))
    }

    /// Serves the API on an ephemeral local port. Returns its base URL.
    pub async fn spawn() -> (String, Arc<MockState>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let state = Arc::new(MockState {
            base: base.clone(),
            list_hits: AtomicUsize::new(0),
            fail_list_once: AtomicBool::new(false),
        });

        let app = Router::new()
            .route("/pokemon", get(pokemon_list))
            .route("/pokemon/{key}", get(pokemon))
            .route("/pokemon/{key}/encounters", get(encounters))
            .route("/pokemon-species/{key}", get(species))
            .route("/evolution-chain/{id}/", get(evolution_chain))
            .route("/type/{name}", get(type_relations))
            .route("/move/{name}/", get(moves))
            .route("/ability/{name}/", get(ability))
            .route("/item", get(item_list))
            .route("/item/{name}", get(item))
            .route("/item-category/{name}", get(item_category))
            .route("/berry", get(berry_list))
            .route("/berry/{name}", get(berry))
            .route("/generation/{id}", get(generation))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (base, state)
    }
}
