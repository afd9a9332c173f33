use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, str::FromStr};

use crate::{
    addressing::tiles_per_row,
    error::{DomainError, DomainResult},
    extract::extract_tile_at,
    palette::Palette,
    pixels::{PixelImage, TILE_SIZE, TileBuffer},
};

/// Alphanumeric tileset identifier derived from the uploaded file name. It
/// doubles as the alias written to definition files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TilesetId(String);

impl TilesetId {
    /// Keeps only the ASCII letters and digits of `file_name`.
    pub fn from_file_name(file_name: &str) -> DomainResult<Self> {
        let id: String = file_name
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect();
        if id.is_empty() {
            return Err(DomainError::InvalidTilesetName {
                file_name: file_name.to_string(),
                reason: "does not contain any alphanumeric characters".to_string(),
            });
        }
        Ok(Self(id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TilesetId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::UnknownTileset {
                name: s.to_string(),
            });
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for TilesetId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TilesetId> for String {
    fn from(id: TilesetId) -> Self {
        id.0
    }
}

impl fmt::Display for TilesetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An uploaded image treated as a grid of 16x16 tiles. Immutable once built.
/// Indexed uploads also keep their palette for compilation.
#[derive(Debug, Clone)]
pub struct Tileset {
    id: TilesetId,
    file_name: String,
    image: PixelImage,
    palette: Option<Palette>,
}

impl Tileset {
    /// The file name must survive a trip through a definition file line, so
    /// it may not carry control characters or surrounding whitespace.
    pub fn new(file_name: impl Into<String>, image: PixelImage) -> DomainResult<Self> {
        let file_name = file_name.into();
        check_file_name(&file_name)?;
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 || width % TILE_SIZE != 0 || height % TILE_SIZE != 0 {
            return Err(DomainError::InvalidTilesetDimensions { width, height });
        }
        let id = TilesetId::from_file_name(&file_name)?;
        Ok(Self {
            id,
            file_name,
            image,
            palette: None,
        })
    }

    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = Some(palette);
        self
    }

    #[must_use]
    pub fn id(&self) -> &TilesetId {
        &self.id
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn image(&self) -> &PixelImage {
        &self.image
    }

    #[must_use]
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[must_use]
    pub fn tiles_per_row(&self) -> u32 {
        tiles_per_row(self.width())
    }

    #[must_use]
    pub fn tile_count(&self) -> u32 {
        self.tiles_per_row() * (self.height() / TILE_SIZE)
    }

    pub fn extract(&self, index: u32) -> DomainResult<TileBuffer> {
        extract_tile_at(&self.image, index)
    }
}

fn check_file_name(file_name: &str) -> DomainResult<()> {
    let reason = if file_name.chars().any(char::is_control) {
        "contains control characters"
    } else if file_name.trim() != file_name {
        "has leading or trailing whitespace"
    } else {
        return Ok(());
    };
    Err(DomainError::InvalidTilesetName {
        file_name: file_name.to_string(),
        reason: reason.to_string(),
    })
}

/// Looks up an uploaded tileset by its original file name.
pub trait TilesetResolver {
    fn resolve_file_name(&self, file_name: &str) -> Option<&Tileset>;
}

/// Upload registry, ordered by first insertion.
#[derive(Debug, Default, Clone)]
pub struct TilesetTable {
    tilesets: Vec<Tileset>,
    by_id: HashMap<TilesetId, usize>,
}

impl TilesetTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `tileset` and returns its id. Ids never change once taken.
    pub fn insert(&mut self, tileset: Tileset) -> DomainResult<TilesetId> {
        let id = tileset.id().clone();
        if self.by_id.contains_key(&id) {
            return Err(DomainError::DuplicateTileset { id: id.to_string() });
        }
        self.by_id.insert(id.clone(), self.tilesets.len());
        self.tilesets.push(tileset);
        Ok(id)
    }

    #[must_use]
    pub fn get(&self, id: &TilesetId) -> Option<&Tileset> {
        self.by_id
            .get(id)
            .and_then(|&position| self.tilesets.get(position))
    }

    pub fn require(&self, id: &TilesetId) -> DomainResult<&Tileset> {
        self.get(id).ok_or_else(|| DomainError::UnknownTileset {
            name: id.to_string(),
        })
    }

    /// The first uploaded tileset; its alias stands in for unset layers.
    #[must_use]
    pub fn first(&self) -> Option<&Tileset> {
        self.tilesets.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tileset> {
        self.tilesets.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tilesets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tilesets.is_empty()
    }
}

impl TilesetResolver for TilesetTable {
    fn resolve_file_name(&self, file_name: &str) -> Option<&Tileset> {
        self.tilesets
            .iter()
            .find(|tileset| tileset.file_name() == file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixels::Rgba;

    fn blank(width: u32, height: u32) -> PixelImage {
        PixelImage::filled(width, height, Rgba::new(0, 0, 0, 255))
    }

    #[test]
    fn id_strips_non_alphanumerics() {
        let id = TilesetId::from_file_name("grass_tiles-v2.png").unwrap();
        assert_eq!(id.as_str(), "grasstilesv2png");
    }

    #[test]
    fn id_requires_some_alphanumerics() {
        assert!(matches!(
            TilesetId::from_file_name("_-_.").unwrap_err(),
            DomainError::InvalidTilesetName { .. }
        ));
    }

    #[test]
    fn dimensions_must_be_multiples_of_sixteen() {
        assert!(Tileset::new("a.png", blank(32, 48)).is_ok());
        assert_eq!(
            Tileset::new("a.png", blank(30, 16)).unwrap_err(),
            DomainError::InvalidTilesetDimensions {
                width: 30,
                height: 16
            }
        );
        assert!(Tileset::new("a.png", blank(0, 16)).is_err());
    }

    #[test]
    fn tile_count_covers_grid() {
        let tileset = Tileset::new("a.png", blank(64, 32)).unwrap();
        assert_eq!(tileset.tiles_per_row(), 4);
        assert_eq!(tileset.tile_count(), 8);
    }

    #[test]
    fn file_names_that_break_definition_lines_are_rejected() {
        for name in [" a.png", "a.png ", "a\nb.png", "a\rb.png", "a\tb.png", "a.png\n"] {
            let error = Tileset::new(name, blank(16, 16)).unwrap_err();
            assert!(
                matches!(error, DomainError::InvalidTilesetName { .. }),
                "{name:?}"
            );
        }
        assert!(Tileset::new("my tiles=v2.png", blank(16, 16)).is_ok());
    }

    #[test]
    fn table_preserves_insertion_order_and_rejects_duplicates() {
        let mut table = TilesetTable::new();
        table.insert(Tileset::new("zeta.png", blank(16, 16)).unwrap()).unwrap();
        table.insert(Tileset::new("alpha.png", blank(16, 16)).unwrap()).unwrap();

        let ids: Vec<_> = table.iter().map(|t| t.id().as_str()).collect();
        assert_eq!(ids, vec!["zetapng", "alphapng"]);
        assert_eq!(table.first().unwrap().file_name(), "zeta.png");

        let duplicate = Tileset::new("zeta.png", blank(16, 16)).unwrap();
        assert!(matches!(
            table.insert(duplicate).unwrap_err(),
            DomainError::DuplicateTileset { .. }
        ));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn resolver_finds_by_file_name() {
        let mut table = TilesetTable::new();
        table.insert(Tileset::new("pic.png", blank(16, 16)).unwrap()).unwrap();

        assert!(table.resolve_file_name("pic.png").is_some());
        assert!(table.resolve_file_name("picpng").is_none());
    }
}
