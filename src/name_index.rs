//! Autocomplete over the national dex name list.
//!
//! The list is fetched at most once per [`NameIndex`]. Concurrent callers
//! share one request, and a failed fetch leaves the index empty so the next
//! call tries again.

use crate::client::PokeApiClient;
use crate::error::Error;
use crate::records::SpeciesRef;
use tokio::sync::OnceCell;

pub const DEFAULT_SUGGESTIONS: usize = 8;

#[derive(Debug)]
pub struct NameIndex {
    client: PokeApiClient,
    limit: u32,
    names: OnceCell<Vec<SpeciesRef>>,
}

impl NameIndex {
    pub fn new(client: PokeApiClient, limit: u32) -> Self {
        Self {
            client,
            limit,
            names: OnceCell::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.names.initialized()
    }

    pub async fn names(&self) -> Result<&[SpeciesRef], Error> {
        let names = self
            .names
            .get_or_try_init(|| async {
                tracing::info!("Loading Pokémon name list (limit {})", self.limit);
                let list = self.client.fetch_pokemon_list(self.limit, 0).await?;
                Ok::<_, Error>(
                    list.results
                        .into_iter()
                        .enumerate()
                        .map(|(index, resource)| SpeciesRef {
                            id: index as u32 + 1,
                            name: resource.name,
                        })
                        .collect(),
                )
            })
            .await?;
        Ok(names)
    }

    pub async fn suggest(&self, query: &str, max: usize) -> Result<Vec<SpeciesRef>, Error> {
        Ok(suggest(self.names().await?, query, max))
    }
}

/// Numeric queries match the id itself or an id prefix. Text queries list
/// names starting with the query before names merely containing it.
pub fn suggest(names: &[SpeciesRef], query: &str, max: usize) -> Vec<SpeciesRef> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    if query.chars().all(|c| c.is_ascii_digit()) {
        let exact = query.parse::<u32>().ok();
        return names
            .iter()
            .filter(|species| {
                Some(species.id) == exact || species.id.to_string().starts_with(&query)
            })
            .take(max)
            .cloned()
            .collect();
    }

    let (prefix, rest): (Vec<&SpeciesRef>, Vec<&SpeciesRef>) = names
        .iter()
        .filter(|species| species.name.contains(&query))
        .partition(|species| species.name.starts_with(&query));
    prefix.into_iter().chain(rest).take(max).cloned().collect()
}
