use std::fmt;

use super::Result;

/// A rendered diagram: the encoded artifact plus its decoded RGBA pixels.
#[derive(Clone, PartialEq, Eq)]
pub struct DiagramImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
    pub encoded: Vec<u8>,
}

impl DiagramImage {
    pub fn decode(encoded: Vec<u8>) -> Result<Self> {
        let rgba = image::load_from_memory(&encoded)?.to_rgba8();
        Ok(Self {
            width: rgba.width() as usize,
            height: rgba.height() as usize,
            rgba: rgba.into_raw(),
            encoded,
        })
    }

    pub fn size(&self) -> [usize; 2] {
        [self.width, self.height]
    }
}

impl fmt::Debug for DiagramImage {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("DiagramImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("encoded_bytes", &self.encoded.len())
            .finish()
    }
}
