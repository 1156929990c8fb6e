//! Named render styles.
//!
//! A style is purely cosmetic — background and foreground colors have no
//! effect on decodability. Adding a style is one new table entry.

/// A named background/foreground color pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Style {
    /// Stable lookup key.
    pub key: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Background color, `#rrggbb`.
    pub background: &'static str,
    /// Foreground (wedge) color, `#rrggbb`.
    pub foreground: &'static str,
}

/// The recognized style set.
pub const STYLES: [Style; 12] = [
    Style {
        key: "classic",
        name: "Classic",
        background: "#ffffff",
        foreground: "#000000",
    },
    Style {
        key: "inverted",
        name: "Inverted",
        background: "#000000",
        foreground: "#ffffff",
    },
    Style {
        key: "midnight",
        name: "Midnight",
        background: "#0b1026",
        foreground: "#8fb8ff",
    },
    Style {
        key: "ember",
        name: "Ember",
        background: "#fff3e0",
        foreground: "#bf360c",
    },
    Style {
        key: "forest",
        name: "Forest",
        background: "#f1f8e9",
        foreground: "#1b5e20",
    },
    Style {
        key: "ocean",
        name: "Ocean",
        background: "#e0f7fa",
        foreground: "#01579b",
    },
    Style {
        key: "plum",
        name: "Plum",
        background: "#f3e5f5",
        foreground: "#4a148c",
    },
    Style {
        key: "slate",
        name: "Slate",
        background: "#eceff1",
        foreground: "#263238",
    },
    Style {
        key: "sand",
        name: "Sand",
        background: "#fdf6e3",
        foreground: "#586e75",
    },
    Style {
        key: "rose",
        name: "Rose",
        background: "#fce4ec",
        foreground: "#880e4f",
    },
    Style {
        key: "mint",
        name: "Mint",
        background: "#e8f5e9",
        foreground: "#004d40",
    },
    Style {
        key: "mono",
        name: "Mono",
        background: "#fafafa",
        foreground: "#212121",
    },
];

impl Style {
    /// Look up a style by key.
    pub fn by_key(key: &str) -> Option<&'static Style> {
        STYLES.iter().find(|s| s.key == key)
    }

    /// The default style (first table entry).
    pub fn default_style() -> &'static Style {
        &STYLES[0]
    }

    /// Parse a `#rrggbb` color into RGBA bytes (alpha 255).
    pub(crate) fn parse_hex(color: &str) -> [u8; 4] {
        let hex = color.trim_start_matches('#');
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        [channel(0), channel(2), channel(4), 0xFF]
    }

    /// Background color as RGBA bytes.
    pub fn background_rgba(&self) -> [u8; 4] {
        Self::parse_hex(self.background)
    }

    /// Foreground color as RGBA bytes.
    pub fn foreground_rgba(&self) -> [u8; 4] {
        Self::parse_hex(self.foreground)
    }
}
