//! Style-selector bits

use std::fmt;

use crate::constants::{FS_SELECTION_BOLD, FS_SELECTION_ITALIC, STYLE_LABELS, UNKNOWN_STYLE_LABEL};

/// Bold/italic selection of a face, in the OS/2 `fsSelection` bit layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleBits(u8);

impl StyleBits {
    pub const REGULAR: StyleBits = StyleBits(0);
    pub const ITALIC: StyleBits = StyleBits(FS_SELECTION_ITALIC as u8);
    pub const BOLD: StyleBits = StyleBits(FS_SELECTION_BOLD as u8);
    pub const BOLD_ITALIC: StyleBits = StyleBits((FS_SELECTION_BOLD | FS_SELECTION_ITALIC) as u8);

    /// Raw bits, limited to the seven defined `fsSelection` style bits.
    pub const fn new(bits: u8) -> Self {
        StyleBits(bits & 0x7f)
    }

    /// Keeps only the bits that choose between style variants.
    pub const fn from_fs_selection(fs_selection: u16) -> Self {
        StyleBits((fs_selection & (FS_SELECTION_BOLD | FS_SELECTION_ITALIC)) as u8)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_bold(self) -> bool {
        self.0 & FS_SELECTION_BOLD as u8 != 0
    }

    pub const fn is_italic(self) -> bool {
        self.0 & FS_SELECTION_ITALIC as u8 != 0
    }

    /// Subfamily label written into relabeled fonts.
    pub fn label(self) -> &'static str {
        STYLE_LABELS
            .iter()
            .find(|(bits, _)| *bits == self.0)
            .map(|(_, label)| *label)
            .unwrap_or(UNKNOWN_STYLE_LABEL)
    }
}

impl fmt::Display for StyleBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_fs_selection() {
        // REGULAR (bit 6) and USE_TYPO_METRICS (bit 7) are dropped
        assert_eq!(StyleBits::from_fs_selection(0x0040), StyleBits::REGULAR);
        assert_eq!(StyleBits::from_fs_selection(0x00C1), StyleBits::ITALIC);
        assert_eq!(StyleBits::from_fs_selection(0x0020), StyleBits::BOLD);
        assert_eq!(StyleBits::from_fs_selection(0x0121), StyleBits::BOLD_ITALIC);
    }

    #[test]
    fn labels_cover_two_bit_domain() {
        assert_eq!(StyleBits::REGULAR.label(), "Regular");
        assert_eq!(StyleBits::ITALIC.label(), "Italic");
        assert_eq!(StyleBits::BOLD.label(), "Bold");
        assert_eq!(StyleBits::BOLD_ITALIC.label(), "Bold Italic");
        assert_eq!(StyleBits::new(0b000_0010).label(), "Unknown");
    }

    #[test]
    fn flags_and_display() {
        assert!(StyleBits::BOLD_ITALIC.is_bold());
        assert!(StyleBits::BOLD_ITALIC.is_italic());
        assert!(!StyleBits::REGULAR.is_bold());
        assert_eq!(StyleBits::BOLD_ITALIC.to_string(), "33");
    }
}
