// src/constants.rs

/// Identifier substituted for fonts that could not be resolved.
pub const FALLBACK_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Leading character of a font reference that asks for the vertical variant.
pub const VERTICAL_MARKER: char = '@';

/// Characters that are laid out but never drawn with a glyph.
pub const LINE_BREAK: char = '\n';

// OS/2 fsSelection bits that select a style variant
pub const FS_SELECTION_ITALIC: u16 = 1 << 0;
pub const FS_SELECTION_BOLD: u16 = 1 << 5;

pub const STYLE_LABELS: [(u8, &str); 4] = [
    (0b000_0000, "Regular"),
    (0b000_0001, "Italic"),
    (0b010_0000, "Bold"),
    (0b010_0001, "Bold Italic"),
];
pub const UNKNOWN_STYLE_LABEL: &str = "Unknown";

// Font container extensions
pub const SINGLE_FONT_EXTENSIONS: [&str; 2] = ["ttf", "otf"];
pub const COLLECTION_EXTENSIONS: [&str; 2] = ["ttc", "otc"];
pub const OUTPUT_FONT_EXTENSION: &str = "otf";

// Subsetting
pub const KEPT_LAYOUT_FEATURES: [&str; 2] = ["vert", "vrt2"];
pub const DEFAULT_SCRIPT_TAG: &str = "DFLT";

// Name table
pub const WINDOWS_PLATFORM: u16 = 3;
pub const WINDOWS_UNICODE_BMP: u16 = 1;
pub const ENGLISH_US: u16 = 0x0409;
pub const TOOL_VERSION_STRING: &str = concat!("Version 0.1;subfont ", env!("CARGO_PKG_VERSION"));
