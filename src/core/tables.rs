// src/core/tables.rs
//! Transliteration tables, one [`ScriptBlock`] per non-Latin script family.
//!
//! The nine Brahmic blocks share the ISCII-derived Unicode layout, so they are
//! generated from one offset table plus a handful of per-script substitutions
//! for letters a script does not have.

use crate::core::types::ScriptFamily;
use std::collections::HashMap;

/// Longest consonant cluster key.
pub const MAX_CONSONANT_LEN: usize = 3;
/// Longest vowel or vowel-sign key.
pub const MAX_VOWEL_LEN: usize = 2;

/// Maps from Latin clusters to native glyphs for a single script.
#[derive(Debug, Clone)]
pub struct ScriptBlock {
    pub script: ScriptFamily,
    consonants: HashMap<String, String>,
    vowels: HashMap<String, String>,
    vowel_signs: HashMap<String, String>,
    /// Joiner that suppresses the inherent vowel. Only used to build the
    /// conjuncts that are listed explicitly in the consonant map.
    pub virama: Option<char>,
}

impl ScriptBlock {
    pub fn new(script: ScriptFamily, virama: Option<char>) -> Self {
        Self {
            script,
            consonants: HashMap::new(),
            vowels: HashMap::new(),
            vowel_signs: HashMap::new(),
            virama,
        }
    }

    pub fn with_consonant(mut self, latin: &str, glyph: &str) -> Self {
        self.consonants.insert(latin.to_string(), glyph.to_string());
        self
    }

    pub fn with_vowel(mut self, latin: &str, glyph: &str) -> Self {
        self.vowels.insert(latin.to_string(), glyph.to_string());
        self
    }

    /// An empty glyph marks the inherent vowel: the cluster is consumed and
    /// nothing is emitted.
    pub fn with_vowel_sign(mut self, latin: &str, glyph: &str) -> Self {
        self.vowel_signs.insert(latin.to_string(), glyph.to_string());
        self
    }

    pub fn consonant(&self, latin: &str) -> Option<&str> {
        self.consonants.get(latin).map(String::as_str)
    }

    pub fn vowel(&self, latin: &str) -> Option<&str> {
        self.vowels.get(latin).map(String::as_str)
    }

    pub fn vowel_sign(&self, latin: &str) -> Option<&str> {
        self.vowel_signs.get(latin).map(String::as_str)
    }

    #[cfg(test)]
    fn glyphs(&self) -> impl Iterator<Item = &str> {
        self.consonants
            .values()
            .chain(self.vowels.values())
            .chain(self.vowel_signs.values())
            .map(String::as_str)
    }
}

/// Read-only store of every built-in script block.
#[derive(Debug, Clone)]
pub struct ScriptTables {
    blocks: HashMap<ScriptFamily, ScriptBlock>,
}

impl ScriptTables {
    pub fn builtin() -> Self {
        let mut blocks = HashMap::new();
        for (script, base, subs) in BRAHMIC {
            blocks.insert(*script, brahmic_block(*script, *base, subs));
        }
        for block in [sinhala(), cyrillic(), greek(), arabic(), hebrew(), georgian(), armenian()] {
            blocks.insert(block.script, block);
        }
        Self { blocks }
    }

    /// A store holding only the given blocks.
    pub fn from_blocks(blocks: impl IntoIterator<Item = ScriptBlock>) -> Self {
        Self {
            blocks: blocks.into_iter().map(|b| (b.script, b)).collect(),
        }
    }

    pub fn get(&self, script: ScriptFamily) -> Option<&ScriptBlock> {
        self.blocks.get(&script)
    }

    pub fn scripts(&self) -> impl Iterator<Item = ScriptFamily> + '_ {
        self.blocks.keys().copied()
    }
}

impl Default for ScriptTables {
    fn default() -> Self {
        Self::builtin()
    }
}

// --- Brahmic layout, offsets from the block base (Devanagari = U+0900) ---

const VIRAMA: u32 = 0x4D;

const CONSONANTS: &[(&str, &[u32])] = &[
    ("k", &[0x15]), ("q", &[0x15]), ("kh", &[0x16]), ("g", &[0x17]), ("gh", &[0x18]),
    ("c", &[0x1A]), ("ch", &[0x1A]), ("chh", &[0x1B]), ("j", &[0x1C]), ("z", &[0x1C]),
    ("jh", &[0x1D]), ("tt", &[0x1F]), ("tth", &[0x20]), ("dd", &[0x21]), ("ddh", &[0x22]),
    ("nn", &[0x23]), ("t", &[0x24]), ("th", &[0x25]), ("d", &[0x26]), ("dh", &[0x27]),
    ("n", &[0x28]), ("p", &[0x2A]), ("ph", &[0x2B]), ("f", &[0x2B]), ("b", &[0x2C]),
    ("bh", &[0x2D]), ("m", &[0x2E]), ("y", &[0x2F]), ("r", &[0x30]), ("l", &[0x32]),
    ("v", &[0x35]), ("w", &[0x35]), ("sh", &[0x36]), ("shh", &[0x37]), ("s", &[0x38]),
    ("h", &[0x39]),
    // Conjuncts the table models explicitly.
    ("x", &[0x15, VIRAMA, 0x38]), ("ksh", &[0x15, VIRAMA, 0x37]),
    ("gy", &[0x1C, VIRAMA, 0x1E]), ("tr", &[0x24, VIRAMA, 0x30]),
    ("shr", &[0x36, VIRAMA, 0x30]),
];

const VOWELS: &[(&str, u32)] = &[
    ("a", 0x05), ("aa", 0x06), ("i", 0x07), ("ii", 0x08), ("ee", 0x08),
    ("u", 0x09), ("uu", 0x0A), ("oo", 0x0A), ("e", 0x0F), ("ai", 0x10),
    ("o", 0x13), ("au", 0x14), ("ou", 0x14),
];

/// `None` is the inherent vowel.
const VOWEL_SIGNS: &[(&str, Option<u32>)] = &[
    ("a", None), ("aa", Some(0x3E)), ("i", Some(0x3F)), ("ii", Some(0x40)),
    ("ee", Some(0x40)), ("u", Some(0x41)), ("uu", Some(0x42)), ("oo", Some(0x42)),
    ("e", Some(0x47)), ("ai", Some(0x48)), ("o", Some(0x4B)), ("au", Some(0x4C)),
    ("ou", Some(0x4C)),
];

type Substitutions = &'static [(&'static str, &'static [u32])];

/// Base code point per script, plus replacements for consonants the script lacks.
const BRAHMIC: &[(ScriptFamily, u32, Substitutions)] = &[
    (ScriptFamily::Devanagari, 0x0900, &[]),
    (ScriptFamily::Bengali, 0x0980, &[("v", &[0x2C]), ("w", &[0x2C])]),
    (
        ScriptFamily::Gurmukhi,
        0x0A00,
        &[("shh", &[0x36]), ("ksh", &[0x15, VIRAMA, 0x36])],
    ),
    (ScriptFamily::Gujarati, 0x0A80, &[]),
    (ScriptFamily::Odia, 0x0B00, &[]),
    (
        ScriptFamily::Tamil,
        0x0B80,
        &[
            ("kh", &[0x15]), ("g", &[0x15]), ("gh", &[0x15]), ("chh", &[0x1A]),
            ("jh", &[0x1C]), ("tth", &[0x1F]), ("dd", &[0x1F]), ("ddh", &[0x1F]),
            ("th", &[0x24]), ("d", &[0x24]), ("dh", &[0x24]), ("ph", &[0x2A]),
            ("f", &[0x2A]), ("b", &[0x2A]), ("bh", &[0x2A]),
        ],
    ),
    (ScriptFamily::Telugu, 0x0C00, &[]),
    (ScriptFamily::Kannada, 0x0C80, &[]),
    (ScriptFamily::Malayalam, 0x0D00, &[]),
];

fn glyph(base: u32, offsets: &[u32]) -> String {
    offsets
        .iter()
        .filter_map(|off| char::from_u32(base + off))
        .collect()
}

fn brahmic_block(script: ScriptFamily, base: u32, subs: Substitutions) -> ScriptBlock {
    let mut block = ScriptBlock::new(script, char::from_u32(base + VIRAMA));
    for (latin, offsets) in CONSONANTS {
        let offsets = subs
            .iter()
            .find(|(key, _)| key == latin)
            .map_or(*offsets, |(_, replacement)| *replacement);
        block = block.with_consonant(latin, &glyph(base, offsets));
    }
    for (latin, offset) in VOWELS {
        block = block.with_vowel(latin, &glyph(base, &[*offset]));
    }
    for (latin, offset) in VOWEL_SIGNS {
        let sign = offset.map(|o| glyph(base, &[o])).unwrap_or_default();
        block = block.with_vowel_sign(latin, &sign);
    }
    block
}

// Sinhala sits outside the ISCII layout, so it is listed directly.
fn sinhala() -> ScriptBlock {
    let mut block = ScriptBlock::new(ScriptFamily::Sinhala, Some('\u{0DCA}'));
    for (latin, native) in [
        ("k", "ක"), ("q", "ක"), ("c", "ක"), ("kh", "ඛ"), ("g", "ග"), ("gh", "ඝ"),
        ("ch", "ච"), ("chh", "ඡ"), ("j", "ජ"), ("z", "ජ"), ("jh", "ඣ"), ("tt", "ට"),
        ("tth", "ඨ"), ("dd", "ඩ"), ("ddh", "ඪ"), ("nn", "ණ"), ("t", "ත"), ("th", "ථ"),
        ("d", "ද"), ("dh", "ධ"), ("n", "න"), ("p", "ප"), ("ph", "ඵ"), ("f", "ෆ"),
        ("b", "බ"), ("bh", "භ"), ("m", "ම"), ("y", "ය"), ("r", "ර"), ("l", "ල"),
        ("ll", "ළ"), ("v", "ව"), ("w", "ව"), ("sh", "ශ"), ("shh", "ෂ"), ("s", "ස"),
        ("h", "හ"), ("x", "ක්ස"),
    ] {
        block = block.with_consonant(latin, native);
    }
    for (latin, standalone, sign) in [
        ("a", "අ", ""), ("aa", "ආ", "ා"), ("ae", "ඇ", "ැ"), ("i", "ඉ", "ි"),
        ("ii", "ඊ", "ී"), ("ee", "ඊ", "ී"), ("u", "උ", "ු"), ("uu", "ඌ", "ූ"),
        ("oo", "ඌ", "ූ"), ("e", "එ", "ෙ"), ("ai", "ඓ", "ෛ"), ("o", "ඔ", "ො"),
        ("au", "ඖ", "ෞ"), ("ou", "ඖ", "ෞ"),
    ] {
        block = block.with_vowel(latin, standalone).with_vowel_sign(latin, sign);
    }
    block
}

// --- Alphabets and abjads: a vowel after a consonant is written the same way
// as a standalone vowel (or dropped, for the abjads). ---

fn alphabet(script: ScriptFamily, consonants: &[(&str, &str)], vowels: &[(&str, &str)]) -> ScriptBlock {
    let mut block = ScriptBlock::new(script, None);
    for (latin, native) in consonants {
        block = block.with_consonant(latin, native);
    }
    for (latin, native) in vowels {
        block = block.with_vowel(latin, native).with_vowel_sign(latin, native);
    }
    block
}

fn cyrillic() -> ScriptBlock {
    alphabet(
        ScriptFamily::Cyrillic,
        &[
            ("b", "б"), ("v", "в"), ("w", "в"), ("g", "г"), ("d", "д"), ("zh", "ж"),
            ("z", "з"), ("y", "й"), ("k", "к"), ("c", "к"), ("q", "к"), ("l", "л"),
            ("m", "м"), ("n", "н"), ("p", "п"), ("r", "р"), ("s", "с"), ("t", "т"),
            ("f", "ф"), ("kh", "х"), ("h", "х"), ("ts", "ц"), ("ch", "ч"), ("sh", "ш"),
            ("sch", "щ"), ("x", "кс"), ("j", "дж"), ("ya", "я"), ("yu", "ю"), ("yo", "ё"),
        ],
        &[
            ("a", "а"), ("e", "е"), ("i", "и"), ("ee", "и"), ("o", "о"), ("u", "у"),
            ("oo", "у"),
        ],
    )
}

fn greek() -> ScriptBlock {
    alphabet(
        ScriptFamily::Greek,
        &[
            ("b", "β"), ("v", "β"), ("g", "γ"), ("d", "δ"), ("z", "ζ"), ("th", "θ"),
            ("k", "κ"), ("c", "κ"), ("q", "κ"), ("l", "λ"), ("m", "μ"), ("n", "ν"),
            ("x", "ξ"), ("p", "π"), ("r", "ρ"), ("s", "σ"), ("t", "τ"), ("f", "φ"),
            ("ph", "φ"), ("ch", "χ"), ("kh", "χ"), ("ps", "ψ"), ("j", "τζ"), ("h", "χ"),
            ("w", "ου"),
        ],
        &[
            ("a", "α"), ("e", "ε"), ("ee", "η"), ("i", "ι"), ("o", "ο"), ("oo", "ω"),
            ("u", "ου"), ("y", "υ"),
        ],
    )
}

fn arabic() -> ScriptBlock {
    let mut block = alphabet(
        ScriptFamily::Arabic,
        &[
            ("b", "ب"), ("p", "پ"), ("t", "ت"), ("th", "ث"), ("j", "ج"), ("ch", "چ"),
            ("h", "ه"), ("kh", "خ"), ("d", "د"), ("dh", "ذ"), ("r", "ر"), ("z", "ز"),
            ("s", "س"), ("sh", "ش"), ("gh", "غ"), ("f", "ف"), ("v", "و"), ("q", "ق"),
            ("k", "ك"), ("c", "ك"), ("g", "گ"), ("l", "ل"), ("m", "م"), ("n", "ن"),
            ("w", "و"), ("y", "ي"), ("x", "كس"),
        ],
        &[],
    );
    for (latin, standalone, sign) in [
        ("a", "ا", ""), ("aa", "آ", "ا"), ("i", "ا", ""), ("ee", "اي", "ي"),
        ("ii", "اي", "ي"), ("u", "ا", ""), ("oo", "او", "و"), ("uu", "او", "و"),
        ("e", "ا", ""), ("o", "او", "و"), ("ai", "اي", "ي"), ("au", "او", "و"),
    ] {
        block = block.with_vowel(latin, standalone).with_vowel_sign(latin, sign);
    }
    block
}

fn hebrew() -> ScriptBlock {
    let mut block = alphabet(
        ScriptFamily::Hebrew,
        &[
            ("b", "ב"), ("v", "ו"), ("g", "ג"), ("j", "ג"), ("d", "ד"), ("h", "ה"),
            ("z", "ז"), ("ch", "ח"), ("kh", "כ"), ("t", "ת"), ("y", "י"), ("k", "כ"),
            ("c", "כ"), ("q", "ק"), ("l", "ל"), ("m", "מ"), ("n", "נ"), ("s", "ס"),
            ("p", "פ"), ("f", "פ"), ("ts", "צ"), ("tz", "צ"), ("r", "ר"), ("sh", "ש"),
            ("w", "ו"), ("x", "כס"),
        ],
        &[],
    );
    for (latin, standalone, sign) in [
        ("a", "א", ""), ("e", "א", ""), ("i", "אי", "י"), ("ee", "אי", "י"),
        ("o", "או", "ו"), ("oo", "או", "ו"), ("u", "או", "ו"),
    ] {
        block = block.with_vowel(latin, standalone).with_vowel_sign(latin, sign);
    }
    block
}

fn georgian() -> ScriptBlock {
    alphabet(
        ScriptFamily::Georgian,
        &[
            ("b", "ბ"), ("g", "გ"), ("d", "დ"), ("v", "ვ"), ("w", "ვ"), ("z", "ზ"),
            ("t", "თ"), ("k", "კ"), ("c", "კ"), ("l", "ლ"), ("m", "მ"), ("n", "ნ"),
            ("p", "პ"), ("zh", "ჟ"), ("r", "რ"), ("s", "ს"), ("f", "ფ"), ("q", "ქ"),
            ("gh", "ღ"), ("sh", "შ"), ("ch", "ჩ"), ("ts", "ც"), ("dz", "ძ"), ("kh", "ხ"),
            ("j", "ჯ"), ("h", "ჰ"), ("x", "ქს"), ("y", "ი"),
        ],
        &[("a", "ა"), ("e", "ე"), ("i", "ი"), ("ee", "ი"), ("o", "ო"), ("u", "უ"), ("oo", "უ")],
    )
}

fn armenian() -> ScriptBlock {
    alphabet(
        ScriptFamily::Armenian,
        &[
            ("b", "բ"), ("g", "գ"), ("d", "դ"), ("z", "զ"), ("zh", "ժ"), ("th", "թ"),
            ("l", "լ"), ("kh", "խ"), ("ts", "ծ"), ("k", "կ"), ("c", "կ"), ("h", "հ"),
            ("dz", "ձ"), ("gh", "ղ"), ("m", "մ"), ("y", "յ"), ("n", "ն"), ("sh", "շ"),
            ("ch", "չ"), ("p", "պ"), ("j", "ջ"), ("rr", "ռ"), ("s", "ս"), ("v", "վ"),
            ("w", "վ"), ("t", "տ"), ("r", "ր"), ("q", "ք"), ("f", "ֆ"), ("x", "քս"),
        ],
        &[
            ("a", "ա"), ("e", "ե"), ("i", "ի"), ("ee", "ի"), ("o", "ո"), ("u", "ու"),
            ("oo", "ու"),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_brahmic_glyph_is_an_assigned_letter() {
        let tables = ScriptTables::builtin();
        for (script, _, _) in BRAHMIC {
            let block = tables.get(*script).expect("brahmic block");
            let virama = block.virama.expect("brahmic virama");
            for glyph in block.glyphs() {
                for ch in glyph.chars().filter(|&c| c != virama) {
                    assert!(ch.is_alphabetic(), "{script:?}: U+{:04X} is not a letter", ch as u32);
                }
            }
        }
    }

    #[test]
    fn keys_fit_the_match_windows() {
        let tables = ScriptTables::builtin();
        for script in tables.scripts() {
            let block = tables.get(script).expect("block");
            assert!(block.consonants.keys().all(|k| k.len() <= MAX_CONSONANT_LEN));
            assert!(block.vowels.keys().all(|k| k.len() <= MAX_VOWEL_LEN));
            assert!(block.vowel_signs.keys().all(|k| k.len() <= MAX_VOWEL_LEN));
        }
    }

    #[test]
    fn tamil_substitutes_missing_aspirates() {
        let tables = ScriptTables::builtin();
        let tamil = tables.get(ScriptFamily::Tamil).expect("tamil");
        assert_eq!(tamil.consonant("kh"), Some("க"));
        assert_eq!(tamil.consonant("b"), Some("ப"));
        let devanagari = tables.get(ScriptFamily::Devanagari).expect("devanagari");
        assert_eq!(devanagari.consonant("kh"), Some("ख"));
        assert_eq!(devanagari.consonant("ksh"), Some("क्ष"));
        assert_eq!(devanagari.vowel_sign("a"), Some(""));
    }

    #[test]
    fn unsupported_scripts_have_no_block() {
        let tables = ScriptTables::builtin();
        assert!(tables.get(ScriptFamily::Cjk).is_none());
        assert!(tables.get(ScriptFamily::Latin).is_none());
        assert!(tables.get(ScriptFamily::Ethiopic).is_none());
    }

    #[test]
    fn sinhala_and_armenian_have_blocks() {
        let tables = ScriptTables::builtin();
        let sinhala = tables.get(ScriptFamily::Sinhala).expect("sinhala");
        assert_eq!(sinhala.virama, Some('\u{0DCA}'));
        assert_eq!(sinhala.consonant("k"), Some("ක"));
        assert_eq!(sinhala.vowel_sign("aa"), Some("ා"));
        assert_eq!(sinhala.vowel_sign("a"), Some(""));
        for glyph in sinhala.glyphs() {
            assert!(glyph.chars().all(|c| c == '\u{0DCA}' || c.is_alphabetic()));
        }
        let armenian = tables.get(ScriptFamily::Armenian).expect("armenian");
        assert_eq!(armenian.consonant("b"), Some("բ"));
        assert_eq!(armenian.vowel_sign("e"), Some("ե"));
    }
}
