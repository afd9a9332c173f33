use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{
    error::{DomainError, DomainResult},
    metatile::{LayerState, MetatileStore, SlotAssignment, SlotIndex},
    tileset::{TilesetResolver, TilesetTable},
};

/// Records written per metatile line.
pub const RECORDS_PER_LINE: usize = 8;
/// Reserved alias meaning "no tile".
pub const UNSET_ALIAS: &str = "-";
const FIELDS_PER_RECORD: usize = 4;

/// How unset layers are written on export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnsetLayerEncoding {
    /// Tile 0 of the first uploaded tileset. Unset layers come back set.
    #[default]
    FirstTileset,
    /// The reserved `-` alias, read back as unset.
    Explicit,
}

/// Result of parsing a definition file, ready for [`MetatileStore::apply`].
#[derive(Debug, Clone, Default)]
pub struct DecodedDefinition {
    pub aliases: HashMap<String, String>,
    pub assignments: Vec<SlotAssignment>,
}

impl DecodedDefinition {
    /// Slot of the final record, if any.
    #[must_use]
    pub fn last_slot(&self) -> Option<SlotIndex> {
        self.assignments.last().map(|assignment| assignment.slot)
    }
}

/// Writes alias lines for every tileset, then all slots as records.
#[must_use]
pub fn encode(
    tilesets: &TilesetTable,
    store: &MetatileStore,
    unset_encoding: UnsetLayerEncoding,
) -> String {
    let Some(first) = tilesets.first() else {
        return String::new();
    };
    let unset_alias = match unset_encoding {
        UnsetLayerEncoding::FirstTileset => first.id().as_str(),
        UnsetLayerEncoding::Explicit => UNSET_ALIAS,
    };
    let layer_field = |layer: &LayerState| match layer.tile() {
        Some(tile) => format!("{},{}", tile.tileset_id, tile.tile_index),
        None => format!("{unset_alias},0"),
    };

    let mut text = String::new();
    for tileset in tilesets.iter() {
        text.push_str(&format!("{}={}\n", tileset.id(), tileset.file_name()));
    }

    let records: Vec<String> = store
        .iter()
        .map(|(_, metatile)| {
            format!(
                "{},{}",
                layer_field(&metatile.bottom),
                layer_field(&metatile.top)
            )
        })
        .collect();
    for line in records.chunks(RECORDS_PER_LINE) {
        text.push_str(&line.join(" "));
        text.push('\n');
    }
    text
}

/// Parses a definition file against the tilesets `resolver` knows about.
///
/// Every record is resolved and its tiles extracted before anything is
/// returned, so the caller can apply the result without a partial failure.
/// Errors carry the 1-based line number and the raw line.
pub fn decode(text: &str, resolver: &impl TilesetResolver) -> DomainResult<DecodedDefinition> {
    let mut decoded = DecodedDefinition::default();

    for (number, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || line.starts_with('#') {
            continue;
        }

        let result = match trimmed.split_once('=') {
            Some((alias, file_name)) => define_alias(&mut decoded.aliases, alias, file_name),
            None => decode_metatile_line(trimmed, resolver, &mut decoded),
        };
        result.map_err(|error| error.at_line(number + 1, line))?;
    }

    Ok(decoded)
}

fn define_alias(
    aliases: &mut HashMap<String, String>,
    alias: &str,
    file_name: &str,
) -> DomainResult<()> {
    let alias = alias.trim();
    if alias.is_empty() {
        return Err(DomainError::MalformedRecord {
            record: format!("={file_name}"),
            reason: "alias definition has no name".to_string(),
        });
    }
    aliases.insert(alias.to_string(), file_name.trim().to_string());
    Ok(())
}

fn decode_metatile_line(
    line: &str,
    resolver: &impl TilesetResolver,
    decoded: &mut DecodedDefinition,
) -> DomainResult<()> {
    for record in line.split(' ').filter(|token| !token.is_empty()) {
        let slot = SlotIndex::new(decoded.assignments.len())?;
        let fields: Vec<&str> = record.split(',').collect();
        let [bottom_alias, bottom_index, top_alias, top_index] = fields.as_slice() else {
            return Err(DomainError::MalformedRecord {
                record: record.to_string(),
                reason: format!(
                    "expected {FIELDS_PER_RECORD} comma-separated fields, found {}",
                    fields.len()
                ),
            });
        };

        let bottom = decode_layer(record, bottom_alias, bottom_index, &decoded.aliases, resolver)?;
        let top = decode_layer(record, top_alias, top_index, &decoded.aliases, resolver)?;
        decoded.assignments.push(SlotAssignment { slot, bottom, top });
    }
    Ok(())
}

fn decode_layer(
    record: &str,
    alias: &str,
    index: &str,
    aliases: &HashMap<String, String>,
    resolver: &impl TilesetResolver,
) -> DomainResult<LayerState> {
    let malformed = || DomainError::MalformedRecord {
        record: record.to_string(),
        reason: format!("tile index '{index}' is not a non-negative integer"),
    };
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let index: u32 = index.parse().map_err(|_| malformed())?;
    if alias == UNSET_ALIAS {
        return Ok(LayerState::unset());
    }

    let file_name = aliases
        .get(alias)
        .ok_or_else(|| DomainError::UnresolvedAlias {
            alias: alias.to_string(),
        })?;
    let tileset =
        resolver
            .resolve_file_name(file_name)
            .ok_or_else(|| DomainError::UnknownTileset {
                name: file_name.clone(),
            })?;
    LayerState::from_tileset(tileset, index)
}
