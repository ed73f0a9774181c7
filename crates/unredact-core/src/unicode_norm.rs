//! Unicode normalization of extracted text.

use unicode_normalization::UnicodeNormalization;

use crate::text::Char;

/// Normalization form applied to char text after extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnicodeNorm {
    #[default]
    None,
    Nfc,
    Nfd,
    Nfkc,
    Nfkd,
}

impl UnicodeNorm {
    pub fn normalize(&self, text: &str) -> String {
        match self {
            UnicodeNorm::None => text.to_string(),
            UnicodeNorm::Nfc => text.nfc().collect(),
            UnicodeNorm::Nfd => text.nfd().collect(),
            UnicodeNorm::Nfkc => text.nfkc().collect(),
            UnicodeNorm::Nfkd => text.nfkd().collect(),
        }
    }

    /// Normalize every char in place. A no-op for [`UnicodeNorm::None`].
    pub fn apply(&self, chars: &mut [Char]) {
        if *self == UnicodeNorm::None {
            return;
        }
        for ch in chars {
            ch.text = self.normalize(&ch.text);
        }
    }
}
