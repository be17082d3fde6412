//! Weather-driven song picks.

use crate::catalog_store::{CatalogStore, Song};
use anyhow::Result;
use std::collections::HashSet;

pub const DEFAULT_WEATHER: &str = "Sunny";

const MAX_MOODS: usize = 4;
const SONGS_PER_MOOD: usize = 5;
const FALLBACK_SONGS: usize = 10;
const MAX_RECOMMENDATIONS: usize = 20;

/// Used as the catalog moods when the catalog is empty.
const FALLBACK_MOODS: &[&str] = &["happy", "energetic", "calm", "sad", "romantic"];

pub fn weather_moods(weather: &str) -> &'static [&'static str] {
    match weather {
        "Sunny" => &["happy", "energetic", "upbeat"],
        "Rainy" => &["calm", "sad", "romantic", "chill"],
        "Cloudy" => &["calm", "melancholic", "focused"],
        "Snow" => &["calm", "cozy", "happy"],
        _ => &["happy", "energetic"],
    }
}

/// Weather moods first, then the moods found in the catalog, without
/// repeats, capped at four.
fn candidate_moods(weather: &str, catalog_moods: Vec<String>) -> Vec<String> {
    let catalog_moods = if catalog_moods.is_empty() {
        FALLBACK_MOODS.iter().map(|m| m.to_string()).collect()
    } else {
        catalog_moods
    };

    let mut moods: Vec<String> = Vec::with_capacity(MAX_MOODS);
    let all = weather_moods(weather)
        .iter()
        .map(|m| m.to_string())
        .chain(catalog_moods);
    for mood in all {
        if moods.len() == MAX_MOODS {
            break;
        }
        if !moods.contains(&mood) {
            moods.push(mood);
        }
    }
    moods
}

pub fn recommend(catalog: &dyn CatalogStore, weather: &str) -> Result<Vec<Song>> {
    let moods = candidate_moods(weather, catalog.list_moods()?);

    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut picks = Vec::new();
    for mood in moods.iter() {
        for song in catalog.find_songs_by_mood(mood, SONGS_PER_MOOD)? {
            if seen.insert((song.title.clone(), song.artist.clone())) {
                picks.push(song);
            }
        }
    }

    if picks.is_empty() {
        picks = catalog.list_songs(1, FALLBACK_SONGS)?;
    }
    picks.truncate(MAX_RECOMMENDATIONS);
    Ok(picks)
}
