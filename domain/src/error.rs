use std::fmt;
use thiserror::Error;

use crate::metatile::SLOT_COUNT;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Slot index {index} is outside 0..={max}", max = SLOT_COUNT - 1)]
    OutOfBoundsSlot { index: usize },

    #[error("Alias '{alias}' is not defined")]
    UnresolvedAlias { alias: String },

    #[error("No tileset named '{name}' has been uploaded")]
    UnknownTileset { name: String },

    #[error("Malformed record '{record}': {reason}")]
    MalformedRecord { record: String, reason: String },

    #[error("Tile ({column}, {row}) lies outside the {width}x{height} image")]
    TileOutOfImageBounds {
        column: u32,
        row: u32,
        width: u32,
        height: u32,
    },

    #[error("Tileset dimensions {width}x{height} are not positive multiples of 16")]
    InvalidTilesetDimensions { width: u32, height: u32 },

    #[error("File name {file_name:?} {reason}")]
    InvalidTilesetName { file_name: String, reason: String },

    #[error("A tileset with id '{id}' already exists")]
    DuplicateTileset { id: String },

    #[error("No metatile slot is selected")]
    NoSlotSelected,

    #[error("Expected {expected} bytes of RGBA pixel data, got {actual}")]
    InvalidPixelBuffer { expected: usize, actual: usize },

    #[error("Tileset '{tileset}' has no palette; upload it as an indexed PNG")]
    MissingPalette { tileset: String },

    #[error("Color {color} of tileset '{tileset}' is not among its first 16 palette entries")]
    ColorNotInPalette { tileset: String, color: String },

    #[error("Compiled tiles exceed the sheet capacity of {limit}")]
    TileCapacityExceeded { limit: usize },

    #[error("Referenced tilesets need more than {limit} palettes")]
    PaletteCapacityExceeded { limit: usize },

    #[error("No compiled palette has index {index}")]
    UnknownPalette { index: usize },

    #[error("Line {line}: {source} (`{text}`)")]
    DefinitionLine {
        line: usize,
        text: String,
        #[source]
        source: Box<DomainError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    OutOfBoundsSlot,
    UnresolvedAlias,
    UnknownTileset,
    MalformedRecord,
    TileOutOfImageBounds,
    InvalidTilesetDimensions,
    InvalidTilesetName,
    DuplicateTileset,
    NoSlotSelected,
    InvalidPixelBuffer,
    MissingPalette,
    ColorNotInPalette,
    TileCapacityExceeded,
    PaletteCapacityExceeded,
    UnknownPalette,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OutOfBoundsSlot => "OutOfBoundsSlot",
            Self::UnresolvedAlias => "UnresolvedAlias",
            Self::UnknownTileset => "UnknownTileset",
            Self::MalformedRecord => "MalformedRecord",
            Self::TileOutOfImageBounds => "TileOutOfImageBounds",
            Self::InvalidTilesetDimensions => "InvalidTilesetDimensions",
            Self::InvalidTilesetName => "InvalidTilesetName",
            Self::DuplicateTileset => "DuplicateTileset",
            Self::NoSlotSelected => "NoSlotSelected",
            Self::InvalidPixelBuffer => "InvalidPixelBuffer",
            Self::MissingPalette => "MissingPalette",
            Self::ColorNotInPalette => "ColorNotInPalette",
            Self::TileCapacityExceeded => "TileCapacityExceeded",
            Self::PaletteCapacityExceeded => "PaletteCapacityExceeded",
            Self::UnknownPalette => "UnknownPalette",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DomainError {
    /// Kind of the underlying failure, looking through line context.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::OutOfBoundsSlot { .. } => ErrorKind::OutOfBoundsSlot,
            Self::UnresolvedAlias { .. } => ErrorKind::UnresolvedAlias,
            Self::UnknownTileset { .. } => ErrorKind::UnknownTileset,
            Self::MalformedRecord { .. } => ErrorKind::MalformedRecord,
            Self::TileOutOfImageBounds { .. } => ErrorKind::TileOutOfImageBounds,
            Self::InvalidTilesetDimensions { .. } => ErrorKind::InvalidTilesetDimensions,
            Self::InvalidTilesetName { .. } => ErrorKind::InvalidTilesetName,
            Self::DuplicateTileset { .. } => ErrorKind::DuplicateTileset,
            Self::NoSlotSelected => ErrorKind::NoSlotSelected,
            Self::InvalidPixelBuffer { .. } => ErrorKind::InvalidPixelBuffer,
            Self::MissingPalette { .. } => ErrorKind::MissingPalette,
            Self::ColorNotInPalette { .. } => ErrorKind::ColorNotInPalette,
            Self::TileCapacityExceeded { .. } => ErrorKind::TileCapacityExceeded,
            Self::PaletteCapacityExceeded { .. } => ErrorKind::PaletteCapacityExceeded,
            Self::UnknownPalette { .. } => ErrorKind::UnknownPalette,
            Self::DefinitionLine { source, .. } => source.kind(),
        }
    }

    /// Line number and raw text when the error came from a definition file.
    #[must_use]
    pub fn line_context(&self) -> Option<(usize, &str)> {
        match self {
            Self::DefinitionLine { line, text, .. } => Some((*line, text.as_str())),
            _ => None,
        }
    }

    #[must_use]
    pub fn at_line(self, line: usize, text: &str) -> Self {
        match self {
            already @ Self::DefinitionLine { .. } => already,
            other => Self::DefinitionLine {
                line,
                text: text.to_string(),
                source: Box::new(other),
            },
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
