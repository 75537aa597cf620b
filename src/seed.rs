use std::path::Path;

use anyhow::{Context, bail};
use serde_json::Value;
use tracing::info;

use crate::db::Database;
use crate::models::Song;

/// Parses a seed dataset: a JSON array of song objects.
pub fn parse_seed(raw: &str) -> anyhow::Result<Vec<Song>> {
    let values: Vec<Value> = serde_json::from_str(raw).context("seed file is not a JSON array")?;

    let mut songs = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match Song::from_value(value) {
            Some(song) if song.id().is_some() => songs.push(song),
            _ => bail!("seed entry {} is not an object with an integer `id`", index),
        }
    }
    Ok(songs)
}

/// Replaces the whole collection with the contents of `path`.
pub async fn seed_from_file(database: &Database, path: &Path) -> anyhow::Result<usize> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    let songs = parse_seed(&raw).with_context(|| format!("invalid seed file {}", path.display()))?;

    let loaded = database
        .replace_all(songs)
        .await
        .context("failed to replace the song collection")?;
    info!("Seeded {} songs from {}", loaded, path.display());
    Ok(loaded)
}
