use serde::Serialize;

use crate::pixels::Rgba;

/// Colors per palette; compiled tile entries address them with four bits.
pub const PALETTE_SIZE: usize = 16;

const JASC_HEADER: &str = "JASC-PAL\r\n0100\r\n16\r\n";

/// The first sixteen colors of an indexed image, as read from its PLTE chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Palette {
    colors: [[u8; 3]; PALETTE_SIZE],
}

impl Palette {
    /// Takes up to sixteen RGB triplets from `plte`. Missing entries are black
    /// and a trailing partial triplet is dropped.
    #[must_use]
    pub fn from_rgb_triplets(plte: &[u8]) -> Self {
        let mut colors = [[0u8; 3]; PALETTE_SIZE];
        for (slot, triplet) in colors.iter_mut().zip(plte.chunks_exact(3)) {
            slot.copy_from_slice(triplet);
        }
        Self { colors }
    }

    #[must_use]
    pub fn colors(&self) -> &[[u8; 3]; PALETTE_SIZE] {
        &self.colors
    }

    /// Index of the first entry with the same RGB as `pixel`. Alpha is ignored.
    #[must_use]
    pub fn index_of(&self, pixel: Rgba) -> Option<u8> {
        self.colors
            .iter()
            .position(|&[r, g, b]| (r, g, b) == (pixel.r, pixel.g, pixel.b))
            .map(|index| index as u8)
    }

    /// Flat RGB bytes suitable for a PNG PLTE chunk.
    #[must_use]
    pub fn to_plte_bytes(&self) -> Vec<u8> {
        self.colors.iter().flatten().copied().collect()
    }

    /// JASC-PAL text with CRLF line endings, as gbagfx expects.
    #[must_use]
    pub fn to_jasc(&self) -> String {
        let mut text = String::from(JASC_HEADER);
        for [r, g, b] in &self.colors {
            text.push_str(&format!("{r} {g} {b}\r\n"));
        }
        text
    }
}
