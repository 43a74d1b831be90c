#![allow(missing_docs)]

//! Shared catalog models.
//!
//! Summaries and pages mirror the list endpoint; [`CatalogItemDetail`] is the
//! flattened form of the detail record, decoded from the nested wire shape.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static TRAILING_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|/)(\d+)/*$").expect("invalid trailing id regex"));

/// Parse the numeric identifier from the last path segment of a reference URL.
///
/// `https://pokeapi.co/api/v2/pokemon/25/` yields `Some(25)`; a URL whose last
/// segment is not purely numeric yields `None`.
pub fn extract_id(url: &str) -> Option<u32> {
    TRAILING_ID_RE
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Lightweight list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItemSummary {
    /// Entry name as returned by the API (lower-case slug).
    pub name: String,
    /// Link to the full record; its trailing segment is the identifier.
    #[serde(rename = "url")]
    pub reference_url: String,
}

impl CatalogItemSummary {
    /// Build a summary from its parts.
    pub fn new(name: impl Into<String>, reference_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference_url: reference_url.into(),
        }
    }

    /// Numeric identifier derived from the reference URL.
    pub fn id(&self) -> Option<u32> {
        extract_id(&self.reference_url)
    }
}

impl AsRef<CatalogItemSummary> for CatalogItemSummary {
    fn as_ref(&self) -> &CatalogItemSummary {
        self
    }
}

/// Raw body of the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    /// Total number of entries in the catalog.
    pub count: u32,
    /// Link to the following window, if any.
    #[serde(default)]
    pub next: Option<String>,
    /// Link to the preceding window, if any.
    #[serde(default)]
    pub previous: Option<String>,
    /// Entries in this window.
    #[serde(default)]
    pub results: Vec<CatalogItemSummary>,
}

/// One fetched window of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Entries in API order.
    pub items: Vec<CatalogItemSummary>,
    /// Total number of entries in the catalog.
    pub total_count: u32,
    /// Offset the window was requested at.
    pub offset: u32,
    /// Window size the page was requested with.
    pub limit: u32,
}

impl Page {
    /// Build a page from a list response and the request that produced it.
    pub fn from_response(response: ListResponse, offset: u32, limit: u32) -> Self {
        Self {
            items: response.results,
            total_count: response.count,
            offset,
            limit,
        }
    }

    /// One-based page number.
    pub fn current_page(&self) -> u32 {
        self.offset / self.limit.max(1) + 1
    }

    /// Number of pages needed to cover the catalog.
    pub fn total_pages(&self) -> u32 {
        self.total_count.div_ceil(self.limit.max(1))
    }

    /// Whether a following window exists.
    pub fn has_next(&self) -> bool {
        self.offset.saturating_add(self.limit) < self.total_count
    }

    /// Whether a preceding window exists.
    pub fn has_previous(&self) -> bool {
        self.offset > 0
    }
}

/// Type slot of a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSlot {
    pub type_name: String,
    pub slot_index: u32,
}

/// Base stat of a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatValue {
    pub stat_name: String,
    pub base_value: u32,
    pub effort: u32,
}

/// Ability of a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ability {
    pub ability_name: String,
    pub is_hidden: bool,
    pub slot_index: u32,
}

/// Sprite image links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sprites {
    pub front_default: Option<String>,
    pub front_shiny: Option<String>,
    pub back_default: Option<String>,
    pub official_artwork: Option<String>,
}

/// Full record for one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "wire::Detail")]
pub struct CatalogItemDetail {
    pub id: u32,
    pub name: String,
    /// Height in decimetres.
    pub height: u32,
    /// Weight in hectograms.
    pub weight: u32,
    pub base_experience: Option<u32>,
    pub types: Vec<TypeSlot>,
    pub stats: Vec<StatValue>,
    pub abilities: Vec<Ability>,
    pub moves: Vec<String>,
    pub forms: Vec<String>,
    pub sprites: Sprites,
}

/// Nested JSON shapes of the detail endpoint.
mod wire {
    use serde::Deserialize;

    #[derive(Deserialize)]
    pub struct Named {
        pub name: String,
    }

    #[derive(Deserialize)]
    pub struct TypeEntry {
        pub slot: u32,
        #[serde(rename = "type")]
        pub kind: Named,
    }

    #[derive(Deserialize)]
    pub struct StatEntry {
        pub base_stat: u32,
        #[serde(default)]
        pub effort: u32,
        pub stat: Named,
    }

    #[derive(Deserialize)]
    pub struct AbilityEntry {
        pub ability: Named,
        #[serde(default)]
        pub is_hidden: bool,
        #[serde(default)]
        pub slot: u32,
    }

    #[derive(Deserialize)]
    pub struct MoveEntry {
        #[serde(rename = "move")]
        pub kind: Named,
    }

    #[derive(Deserialize, Default)]
    pub struct Artwork {
        pub front_default: Option<String>,
    }

    #[derive(Deserialize, Default)]
    pub struct OtherSprites {
        #[serde(rename = "official-artwork", default)]
        pub official_artwork: Option<Artwork>,
    }

    #[derive(Deserialize, Default)]
    pub struct Sprites {
        #[serde(default)]
        pub front_default: Option<String>,
        #[serde(default)]
        pub front_shiny: Option<String>,
        #[serde(default)]
        pub back_default: Option<String>,
        #[serde(default)]
        pub other: Option<OtherSprites>,
    }

    #[derive(Deserialize)]
    pub struct Detail {
        pub id: u32,
        pub name: String,
        #[serde(default)]
        pub height: u32,
        #[serde(default)]
        pub weight: u32,
        #[serde(default)]
        pub base_experience: Option<u32>,
        #[serde(default)]
        pub types: Vec<TypeEntry>,
        #[serde(default)]
        pub stats: Vec<StatEntry>,
        #[serde(default)]
        pub abilities: Vec<AbilityEntry>,
        #[serde(default)]
        pub moves: Vec<MoveEntry>,
        #[serde(default)]
        pub forms: Vec<Named>,
        #[serde(default)]
        pub sprites: Sprites,
    }
}

impl From<wire::Detail> for CatalogItemDetail {
    fn from(raw: wire::Detail) -> Self {
        let official_artwork = raw
            .sprites
            .other
            .and_then(|other| other.official_artwork)
            .and_then(|artwork| artwork.front_default);
        Self {
            id: raw.id,
            name: raw.name,
            height: raw.height,
            weight: raw.weight,
            base_experience: raw.base_experience,
            types: raw
                .types
                .into_iter()
                .map(|entry| TypeSlot {
                    type_name: entry.kind.name,
                    slot_index: entry.slot,
                })
                .collect(),
            stats: raw
                .stats
                .into_iter()
                .map(|entry| StatValue {
                    stat_name: entry.stat.name,
                    base_value: entry.base_stat,
                    effort: entry.effort,
                })
                .collect(),
            abilities: raw
                .abilities
                .into_iter()
                .map(|entry| Ability {
                    ability_name: entry.ability.name,
                    is_hidden: entry.is_hidden,
                    slot_index: entry.slot,
                })
                .collect(),
            moves: raw.moves.into_iter().map(|entry| entry.kind.name).collect(),
            forms: raw.forms.into_iter().map(|form| form.name).collect(),
            sprites: Sprites {
                front_default: raw.sprites.front_default,
                front_shiny: raw.sprites.front_shiny,
                back_default: raw.sprites.back_default,
                official_artwork,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_trailing_identifier() {
        assert_eq!(extract_id("https://pokeapi.co/api/v2/pokemon/25/"), Some(25));
        assert_eq!(extract_id("https://pokeapi.co/api/v2/pokemon/4"), Some(4));
        assert_eq!(extract_id(".../1/"), Some(1));
        assert_eq!(extract_id("https://pokeapi.co/api/v2/pokemon/pikachu/"), None);
        assert_eq!(extract_id("https://pokeapi.co/api/v2/"), None);
        assert_eq!(extract_id(""), None);
    }

    #[test]
    fn pagination_helpers() {
        let page = Page {
            items: Vec::new(),
            total_count: 1302,
            offset: 40,
            limit: 20,
        };
        assert_eq!(page.current_page(), 3);
        assert_eq!(page.total_pages(), 66);
        assert!(page.has_next());
        assert!(page.has_previous());

        let last = Page {
            offset: 1300,
            ..page.clone()
        };
        assert!(!last.has_next());

        let first = Page { offset: 0, ..page };
        assert!(!first.has_previous());
    }

    #[test]
    fn decodes_list_response() -> anyhow::Result<()> {
        let body = json!({
            "count": 1302,
            "next": "https://pokeapi.co/api/v2/pokemon?offset=20&limit=20",
            "previous": null,
            "results": [
                {"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/"},
                {"name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon/2/"}
            ]
        });
        let response: ListResponse = serde_json::from_value(body)?;
        let page = Page::from_response(response, 0, 20);
        assert_eq!(page.total_count, 1302);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[1].name, "ivysaur");
        assert_eq!(page.items[1].id(), Some(2));
        Ok(())
    }

    #[test]
    fn decodes_nested_detail_record() -> anyhow::Result<()> {
        let body = json!({
            "id": 25,
            "name": "pikachu",
            "height": 4,
            "weight": 60,
            "base_experience": 112,
            "types": [{"slot": 1, "type": {"name": "electric", "url": "x"}}],
            "stats": [
                {"base_stat": 35, "effort": 0, "stat": {"name": "hp", "url": "x"}},
                {"base_stat": 90, "effort": 2, "stat": {"name": "speed", "url": "x"}}
            ],
            "abilities": [
                {"ability": {"name": "static", "url": "x"}, "is_hidden": false, "slot": 1},
                {"ability": {"name": "lightning-rod", "url": "x"}, "is_hidden": true, "slot": 3}
            ],
            "moves": [{"move": {"name": "thunder-shock", "url": "x"}}],
            "forms": [{"name": "pikachu", "url": "x"}],
            "sprites": {
                "front_default": "front.png",
                "other": {"official-artwork": {"front_default": "art.png"}}
            }
        });
        let detail: CatalogItemDetail = serde_json::from_value(body)?;
        assert_eq!(detail.id, 25);
        assert_eq!(detail.base_experience, Some(112));
        assert_eq!(detail.types[0].type_name, "electric");
        assert_eq!(detail.stats[1].base_value, 90);
        assert_eq!(detail.stats[1].effort, 2);
        assert!(detail.abilities[1].is_hidden);
        assert_eq!(detail.abilities[1].slot_index, 3);
        assert_eq!(detail.moves, vec!["thunder-shock".to_string()]);
        assert_eq!(detail.forms, vec!["pikachu".to_string()]);
        assert_eq!(detail.sprites.official_artwork.as_deref(), Some("art.png"));
        assert_eq!(detail.sprites.front_default.as_deref(), Some("front.png"));
        Ok(())
    }

    #[test]
    fn detail_tolerates_missing_collections() -> anyhow::Result<()> {
        let detail: CatalogItemDetail = serde_json::from_value(json!({
            "id": 1,
            "name": "bulbasaur",
            "height": 7,
            "weight": 69,
            "base_experience": null
        }))?;
        assert!(detail.types.is_empty());
        assert!(detail.stats.is_empty());
        assert_eq!(detail.sprites, Sprites::default());
        assert_eq!(detail.base_experience, None);
        Ok(())
    }
}
