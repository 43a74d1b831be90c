#![allow(missing_docs)]

//! Values derived from fetched records for presentation only.
//!
//! Nothing here is stored; every function is a pure function of its input.

use crate::models::CatalogItemDetail;

/// Type used when a record lists no types.
pub const DEFAULT_TYPE: &str = "normal";

/// Accent for type names missing from [`TYPE_COLORS`].
pub const NEUTRAL_COLOR: &str = "#777";

/// Highest base stat a bar is scaled against.
pub const MAX_BASE_STAT: u32 = 255;

/// Accent color per known type.
pub const TYPE_COLORS: [(&str, &str); 18] = [
    ("normal", "#A8A878"),
    ("fire", "#F08030"),
    ("water", "#6890F0"),
    ("electric", "#F8D030"),
    ("grass", "#78C850"),
    ("ice", "#98D8D8"),
    ("fighting", "#C03028"),
    ("poison", "#A040A0"),
    ("ground", "#E0C068"),
    ("flying", "#A890F0"),
    ("psychic", "#F85888"),
    ("bug", "#A8B820"),
    ("rock", "#B8A038"),
    ("ghost", "#705898"),
    ("dragon", "#7038F8"),
    ("dark", "#705848"),
    ("steel", "#B8B8D0"),
    ("fairy", "#EE99AC"),
];

/// Hex accent color for a type name, case-insensitive.
pub fn type_color(type_name: &str) -> &'static str {
    let wanted = type_name.trim().to_lowercase();
    TYPE_COLORS
        .iter()
        .find(|(name, _)| *name == wanted)
        .map(|(_, color)| *color)
        .unwrap_or(NEUTRAL_COLOR)
}

/// Name of the first listed type.
pub fn primary_type(detail: &CatalogItemDetail) -> &str {
    detail
        .types
        .first()
        .map(|slot| slot.type_name.as_str())
        .unwrap_or(DEFAULT_TYPE)
}

/// Fraction of a stat bar to fill, clamped to `0.0..=1.0`.
pub fn stat_fill(base_value: u32) -> f64 {
    (f64::from(base_value) / f64::from(MAX_BASE_STAT)).min(1.0)
}

/// Short label for a stat name.
pub fn stat_label(stat_name: &str) -> String {
    match stat_name {
        "hp" => "HP".to_string(),
        "attack" => "ATK".to_string(),
        "defense" => "DEF".to_string(),
        "special-attack" => "SATK".to_string(),
        "special-defense" => "SDEF".to_string(),
        "speed" => "SPD".to_string(),
        other => other.to_uppercase(),
    }
}

/// Capitalise the first letter of a name.
pub fn format_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Catalog number padded to three digits, e.g. `#007`.
pub fn format_number(id: u32) -> String {
    format!("#{id:03}")
}

/// Height in metres (the API reports decimetres).
pub fn height_m(detail: &CatalogItemDetail) -> f64 {
    f64::from(detail.height) / 10.0
}

/// Weight in kilograms (the API reports hectograms).
pub fn weight_kg(detail: &CatalogItemDetail) -> f64 {
    f64::from(detail.weight) / 10.0
}

/// Official artwork when available, otherwise the default front sprite.
pub fn preferred_sprite(detail: &CatalogItemDetail) -> Option<&str> {
    detail
        .sprites
        .official_artwork
        .as_deref()
        .or(detail.sprites.front_default.as_deref())
}

/// First two ability names with hyphens shown as spaces.
pub fn headline_abilities(detail: &CatalogItemDetail) -> Vec<String> {
    detail
        .abilities
        .iter()
        .take(2)
        .map(|ability| ability.ability_name.replace('-', " "))
        .collect()
}

/// One rendered stat row.
#[derive(Debug, Clone, PartialEq)]
pub struct StatBar {
    pub label: String,
    pub value: u32,
    pub fill: f64,
}

/// One type badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBadge {
    pub name: String,
    pub color: &'static str,
}

/// Everything the detail screen shows, computed from a record.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub title: String,
    pub number: String,
    pub primary_type: String,
    pub accent: &'static str,
    pub types: Vec<TypeBadge>,
    pub height_m: f64,
    pub weight_kg: f64,
    pub base_experience: Option<u32>,
    pub abilities: Vec<String>,
    pub stats: Vec<StatBar>,
    pub move_count: usize,
    pub forms: Vec<String>,
    pub sprite_url: Option<String>,
}

impl DetailView {
    /// Derive the view for `detail`.
    pub fn from_detail(detail: &CatalogItemDetail) -> Self {
        let primary = primary_type(detail).to_string();
        Self {
            title: format_name(&detail.name),
            number: format_number(detail.id),
            accent: type_color(&primary),
            primary_type: primary,
            types: detail
                .types
                .iter()
                .map(|slot| TypeBadge {
                    name: slot.type_name.clone(),
                    color: type_color(&slot.type_name),
                })
                .collect(),
            height_m: height_m(detail),
            weight_kg: weight_kg(detail),
            base_experience: detail.base_experience,
            abilities: headline_abilities(detail),
            stats: detail
                .stats
                .iter()
                .map(|stat| StatBar {
                    label: stat_label(&stat.stat_name),
                    value: stat.base_value,
                    fill: stat_fill(stat.base_value),
                })
                .collect(),
            move_count: detail.moves.len(),
            forms: detail.forms.clone(),
            sprite_url: preferred_sprite(detail).map(str::to_string),
        }
    }
}
