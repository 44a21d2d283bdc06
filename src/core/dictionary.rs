// src/core/dictionary.rs
//! Per-language phrase dictionaries pivoting through English.

use crate::core::languages::LanguageRegistry;
use crate::core::trie::PhraseTrie;
use crate::error::{Result, TranslationError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Which way a lookup goes relative to English.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    ToEnglish,
    FromEnglish,
}

/// Serializable list of `(english, native)` pairs for one language.
/// This is the JSON phrase-pack format and the snapshot record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhrasePack {
    pub language: String,
    pub entries: Vec<(String, String)>,
}

/// Bidirectional phrase map for one language.
#[derive(Debug, Clone)]
pub struct PhraseDictionary {
    language: String,
    entries: Vec<(String, String)>,
    to_english: HashMap<String, String>,
    from_english: HashMap<String, String>,
    to_english_trie: PhraseTrie,
    from_english_trie: PhraseTrie,
}

impl PhraseDictionary {
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
            entries: Vec::new(),
            to_english: HashMap::new(),
            from_english: HashMap::new(),
            to_english_trie: PhraseTrie::new(),
            from_english_trie: PhraseTrie::new(),
        }
    }

    /// Adds a pair. Earlier entries win when several phrases share a rendering.
    pub fn insert(&mut self, english: &str, native: &str) {
        let english = normalize_phrase(english);
        let native = normalize_phrase(native);
        if english.is_empty() || native.is_empty() {
            return;
        }
        self.from_english.entry(english.clone()).or_insert_with(|| native.clone());
        self.to_english.entry(native.clone()).or_insert_with(|| english.clone());
        self.from_english_trie.insert(english.split(' '), &native);
        self.to_english_trie.insert(native.split(' '), &english);
        self.entries.push((english, native));
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn exact(&self, leg: Leg) -> &HashMap<String, String> {
        match leg {
            Leg::ToEnglish => &self.to_english,
            Leg::FromEnglish => &self.from_english,
        }
    }

    fn trie(&self, leg: Leg) -> &PhraseTrie {
        match leg {
            Leg::ToEnglish => &self.to_english_trie,
            Leg::FromEnglish => &self.from_english_trie,
        }
    }

    fn to_pack(&self) -> PhrasePack {
        PhrasePack {
            language: self.language.clone(),
            entries: self.entries.clone(),
        }
    }
}

/// Outcome of running text through one leg of the pivot.
#[derive(Debug, Clone, PartialEq)]
pub struct LegOutcome {
    pub text: String,
    /// Number of dictionary substitutions made.
    pub substitutions: usize,
    /// The whole input matched one entry.
    pub exact: bool,
}

impl LegOutcome {
    fn unchanged(text: &str) -> Self {
        Self { text: text.to_string(), substitutions: 0, exact: false }
    }
}

/// All phrase dictionaries, keyed by canonical language name.
/// Read-only once built; the lookup counter is the only interior state.
#[derive(Debug, Default)]
pub struct PhraseDictionaries {
    by_language: HashMap<String, PhraseDictionary>,
    lookups: AtomicUsize,
}

impl PhraseDictionaries {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The dictionaries shipped with the engine.
    pub fn builtin() -> Self {
        let mut dictionaries = Self::empty();
        for (language, entries) in BUILTIN {
            let mut dictionary = PhraseDictionary::new(language);
            for (english, native) in *entries {
                dictionary.insert(english, native);
            }
            dictionaries.insert(dictionary);
        }
        dictionaries
    }

    pub fn insert(&mut self, dictionary: PhraseDictionary) {
        self.by_language.insert(dictionary.language.clone(), dictionary);
    }

    /// Merges a phrase pack, creating the language if needed.
    /// The pack's language is resolved through the alias table.
    pub fn add_pack(&mut self, pack: &PhrasePack, languages: &LanguageRegistry) -> Result<usize> {
        let language = languages
            .resolve(&pack.language)
            .ok_or_else(|| TranslationError::UnknownLanguage(pack.language.clone()))?
            .name;
        let dictionary = self
            .by_language
            .entry(language.to_string())
            .or_insert_with(|| PhraseDictionary::new(language));
        for (english, native) in &pack.entries {
            dictionary.insert(english, native);
        }
        Ok(pack.entries.len())
    }

    pub fn from_packs(packs: &[PhrasePack], languages: &LanguageRegistry) -> Result<Self> {
        let mut dictionaries = Self::empty();
        for pack in packs {
            dictionaries.add_pack(pack, languages)?;
        }
        Ok(dictionaries)
    }

    /// Every dictionary as a pack, sorted by language for stable output.
    pub fn packs(&self) -> Vec<PhrasePack> {
        let mut packs: Vec<_> = self.by_language.values().map(PhraseDictionary::to_pack).collect();
        packs.sort_by(|a, b| a.language.cmp(&b.language));
        packs
    }

    pub fn get(&self, language: &str) -> Option<&PhraseDictionary> {
        self.by_language.get(language)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.by_language.keys().map(String::as_str)
    }

    /// How many legs have been looked up so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    /// Full-phrase lookup. A miss is reported as [`TranslationError::DictionaryMiss`].
    pub fn lookup_exact(&self, language: &str, phrase: &str, leg: Leg) -> Result<&str> {
        let key = normalize_phrase(phrase);
        self.by_language
            .get(language)
            .and_then(|d| d.exact(leg).get(&key))
            .map(String::as_str)
            .ok_or_else(|| TranslationError::DictionaryMiss {
                language: language.to_string(),
                phrase: key,
            })
    }

    /// Runs `text` through one leg: whole phrase first, then the longest
    /// sub-phrase at each position, down to single words. Unmatched tokens are
    /// kept as they are. A missing dictionary passes the text through.
    pub fn translate_leg(&self, language: &str, text: &str, leg: Leg) -> LegOutcome {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let Some(dictionary) = self.by_language.get(language) else {
            return LegOutcome::unchanged(text);
        };

        if let Ok(hit) = self.lookup_exact(language, text, leg) {
            return LegOutcome { text: hit.to_string(), substitutions: 1, exact: true };
        }
        // Whole phrase wrapped in punctuation, e.g. "thank you!".
        let (lead, core, trail) = split_punctuation(text.trim());
        if !core.is_empty() && (!lead.is_empty() || !trail.is_empty()) {
            if let Ok(hit) = self.lookup_exact(language, core, leg) {
                return LegOutcome {
                    text: format!("{lead}{hit}{trail}"),
                    substitutions: 1,
                    exact: true,
                };
            }
        }

        substitute(dictionary.trie(leg), text)
    }
}

struct Token<'a> {
    lead: &'a str,
    core: String,
    trail: &'a str,
    raw: &'a str,
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    text.split_whitespace()
        .map(|raw| {
            let (lead, core, trail) = split_punctuation(raw);
            Token { lead, core: core.to_lowercase(), trail, raw }
        })
        .collect()
}

fn substitute(trie: &PhraseTrie, text: &str) -> LegOutcome {
    let tokens = tokenize(text);
    let cores: Vec<&str> = tokens.iter().map(|t| t.core.as_str()).collect();
    let mut out: Vec<String> = Vec::with_capacity(tokens.len());
    let mut substitutions = 0;
    let mut i = 0;

    while i < tokens.len() {
        // A phrase may not run across punctuation on either side of a token.
        let trail_stop = tokens[i..]
            .iter()
            .position(|t| !t.trail.is_empty() || t.core.is_empty())
            .map_or(tokens.len(), |p| i + p + 1);
        let lead_stop = tokens[i + 1..]
            .iter()
            .position(|t| !t.lead.is_empty())
            .map_or(tokens.len(), |p| i + 1 + p);
        let limit = trail_stop.min(lead_stop);
        match trie.longest_match(&cores[i..limit]) {
            Some((len, value)) => {
                let last = &tokens[i + len - 1];
                out.push(format!("{}{}{}", tokens[i].lead, value, last.trail));
                substitutions += 1;
                i += len;
            }
            None => {
                out.push(tokens[i].raw.to_string());
                i += 1;
            }
        }
    }

    LegOutcome { text: out.join(" "), substitutions, exact: false }
}

// Combining marks such as the virama are not alphanumeric, so punctuation is
// matched explicitly instead of as "anything that is not a letter".
fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '¡' | '¿' | '«' | '»' | '“' | '”' | '‘' | '’' | '…' | '।' | '॥' | '،' | '؟' | '۔'
                | '。' | '、' | '，' | '！' | '？'
        )
}

fn split_punctuation(raw: &str) -> (&str, &str, &str) {
    let start = raw.find(|c: char| !is_punctuation(c)).unwrap_or(raw.len());
    let end = raw.rfind(|c: char| !is_punctuation(c)).map_or(start, |i| {
        i + raw[i..].chars().next().map_or(0, char::len_utf8)
    });
    (&raw[..start], &raw[start..end], &raw[end..])
}

fn normalize_phrase(phrase: &str) -> String {
    phrase.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

type Entries = &'static [(&'static str, &'static str)];

/// Built-in phrase books. Order matters: when two English phrases share a
/// rendering, the first one is used for the reverse direction.
static BUILTIN: &[(&str, Entries)] = &[
    ("hindi", &[
        ("hello", "नमस्ते"), ("thank you", "धन्यवाद"), ("thanks", "धन्यवाद"),
        ("how are you", "आप कैसे हैं"), ("i am fine", "मैं ठीक हूँ"),
        ("good morning", "सुप्रभात"), ("good night", "शुभ रात्रि"), ("yes", "हाँ"),
        ("no", "नहीं"), ("please", "कृपया"), ("sorry", "माफ़ कीजिए"),
        ("i love you", "मैं तुमसे प्यार करता हूँ"), ("what is your name", "आपका नाम क्या है"),
        ("see you later", "फिर मिलेंगे"), ("welcome", "स्वागत है"),
        ("happy birthday", "जन्मदिन मुबारक"), ("goodbye", "अलविदा"), ("bye", "अलविदा"),
        ("ok", "ठीक है"), ("friend", "दोस्त"), ("water", "पानी"), ("food", "खाना"),
        ("good", "अच्छा"), ("love", "प्यार"), ("where", "कहाँ"), ("what", "क्या"),
        ("i", "मैं"), ("you", "आप"), ("my", "मेरा"), ("name", "नाम"), ("call", "कॉल"),
    ]),
    ("marathi", &[
        ("hello", "नमस्कार"), ("thank you", "धन्यवाद"), ("how are you", "तुम्ही कसे आहात"),
        ("good morning", "सुप्रभात"), ("yes", "होय"), ("no", "नाही"), ("please", "कृपया"),
        ("friend", "मित्र"), ("water", "पाणी"), ("food", "जेवण"),
    ]),
    ("bengali", &[
        ("hello", "নমস্কার"), ("thank you", "ধন্যবাদ"), ("how are you", "আপনি কেমন আছেন"),
        ("good morning", "সুপ্রভাত"), ("good night", "শুভ রাত্রি"), ("yes", "হ্যাঁ"),
        ("no", "না"), ("please", "দয়া করে"), ("sorry", "দুঃখিত"),
        ("i love you", "আমি তোমাকে ভালোবাসি"), ("welcome", "স্বাগতম"),
        ("friend", "বন্ধু"), ("water", "জল"), ("food", "খাবার"),
    ]),
    ("tamil", &[
        ("hello", "வணக்கம்"), ("thank you", "நன்றி"), ("how are you", "எப்படி இருக்கிறீர்கள்"),
        ("i am fine", "நான் நலமாக இருக்கிறேன்"), ("good morning", "காலை வணக்கம்"),
        ("good night", "இனிய இரவு"), ("yes", "ஆம்"), ("no", "இல்லை"),
        ("please", "தயவுசெய்து"), ("sorry", "மன்னிக்கவும்"),
        ("i love you", "நான் உன்னை காதலிக்கிறேன்"), ("welcome", "வரவேற்கிறேன்"),
        ("friend", "நண்பன்"), ("water", "தண்ணீர்"), ("food", "உணவு"),
    ]),
    ("telugu", &[
        ("hello", "నమస్కారం"), ("thank you", "ధన్యవాదాలు"), ("how are you", "మీరు ఎలా ఉన్నారు"),
        ("i am fine", "నేను బాగున్నాను"), ("good morning", "శుభోదయం"),
        ("good night", "శుభ రాత్రి"), ("yes", "అవును"), ("no", "కాదు"),
        ("please", "దయచేసి"), ("sorry", "క్షమించండి"),
        ("i love you", "నేను నిన్ను ప్రేమిస్తున్నాను"), ("welcome", "స్వాగతం"),
        ("friend", "స్నేహితుడు"), ("water", "నీళ్ళు"), ("food", "ఆహారం"),
    ]),
    ("kannada", &[
        ("hello", "ನಮಸ್ಕಾರ"), ("thank you", "ಧನ್ಯವಾದಗಳು"), ("how are you", "ನೀವು ಹೇಗಿದ್ದೀರಿ"),
        ("yes", "ಹೌದು"), ("no", "ಇಲ್ಲ"), ("friend", "ಸ್ನೇಹಿತ"), ("water", "ನೀರು"),
    ]),
    ("malayalam", &[
        ("hello", "നമസ്കാരം"), ("thank you", "നന്ദി"), ("how are you", "സുഖമാണോ"),
        ("yes", "അതെ"), ("no", "ഇല്ല"), ("friend", "സുഹൃത്ത്"), ("water", "വെള്ളം"),
    ]),
    ("gujarati", &[
        ("hello", "નમસ્તે"), ("thank you", "આભાર"), ("how are you", "તમે કેમ છો"),
        ("yes", "હા"), ("no", "ના"), ("friend", "મિત્ર"), ("water", "પાણી"),
    ]),
    ("punjabi", &[
        ("hello", "ਸਤ ਸ੍ਰੀ ਅਕਾਲ"), ("thank you", "ਧੰਨਵਾਦ"), ("how are you", "ਤੁਸੀਂ ਕਿਵੇਂ ਹੋ"),
        ("yes", "ਹਾਂ"), ("no", "ਨਹੀਂ"), ("friend", "ਦੋਸਤ"), ("water", "ਪਾਣੀ"),
    ]),
    ("urdu", &[
        ("hello", "السلام علیکم"), ("thank you", "شکریہ"), ("how are you", "آپ کیسے ہیں"),
        ("yes", "ہاں"), ("no", "نہیں"), ("friend", "دوست"), ("water", "پانی"),
    ]),
    ("spanish", &[
        ("hello", "hola"), ("thank you", "gracias"), ("thanks", "gracias"),
        ("how are you", "cómo estás"), ("good morning", "buenos días"),
        ("good night", "buenas noches"), ("yes", "sí"), ("no", "no"),
        ("please", "por favor"), ("sorry", "lo siento"), ("i love you", "te quiero"),
        ("goodbye", "adiós"), ("welcome", "bienvenido"), ("friend", "amigo"),
        ("water", "agua"), ("food", "comida"),
    ]),
    ("french", &[
        ("hello", "bonjour"), ("thank you", "merci"), ("how are you", "comment ça va"),
        ("good morning", "bonjour"), ("good night", "bonne nuit"), ("yes", "oui"),
        ("no", "non"), ("please", "s'il vous plaît"), ("sorry", "désolé"),
        ("i love you", "je t'aime"), ("goodbye", "au revoir"), ("friend", "ami"),
        ("water", "eau"),
    ]),
];
