//! Font identity: inventory scanning, name lookup and the font engine seam
//!
//! The inventory maps every Windows family name found in a font directory
//! to a synthetic canonical id, merging faces that share any name.

pub mod engine;
pub mod inventory;
pub mod memory;
pub mod names;
#[cfg(feature = "opentype")]
pub mod opentype;
pub mod style;

use std::fmt;

use rand::Rng;
use uuid::Builder;

use crate::constants::FALLBACK_ID;

pub use engine::{ContainerKind, FontEngine, FontEngineError, FontFace, LayoutTable, NameRecord, SubsetOptions};
pub use inventory::{walk_font_dir, FontIdentity, FontInventory, InventoryBuilder};
pub use memory::{MemoryEngine, MemoryFace};
pub use names::{NameIndex, NameMatching};
#[cfg(feature = "opentype")]
pub use opentype::{OpenTypeEngine, OpenTypeFace};
pub use style::StyleBits;

/// Synthetic family name shared by every face of one logical font.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalId(String);

impl CanonicalId {
    /// Mints a random version-4 UUID.
    pub fn mint<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 16];
        rng.fill(&mut bytes);
        Self(Builder::from_random_bytes(bytes).into_uuid().to_string())
    }

    /// The id substituted for unresolved names.
    pub fn fallback() -> Self {
        Self(FALLBACK_ID.to_string())
    }

    pub fn is_fallback(&self) -> bool {
        self.0 == FALLBACK_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CanonicalId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn minted_ids_look_like_uuid_v4() {
        let mut rng = StdRng::seed_from_u64(7);
        let id = CanonicalId::mint(&mut rng);
        let parts: Vec<_> = id.as_str().split('-').map(str::len).collect();
        assert_eq!(parts, vec![8, 4, 4, 4, 12]);
        assert_eq!(id.as_str().as_bytes()[14], b'4');
        assert!(matches!(id.as_str().as_bytes()[19], b'8' | b'9' | b'a' | b'b'));
        assert_ne!(id, CanonicalId::mint(&mut rng));
        assert_eq!(
            uuid::Uuid::parse_str(id.as_str()).unwrap().get_version(),
            Some(uuid::Version::Random)
        );
        assert!(!id.is_fallback());
    }

    #[test]
    fn fallback_id_is_nil_uuid() {
        assert_eq!(CanonicalId::fallback().as_str(), uuid::Uuid::nil().to_string());
        assert!(CanonicalId::fallback().is_fallback());
    }
}
