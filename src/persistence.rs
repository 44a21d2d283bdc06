// File: src/persistence.rs
use crate::core::dictionary::{PhraseDictionaries, PhrasePack};
use crate::core::languages::LanguageRegistry;
use crate::error::{Result, TranslationError};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Bumped whenever the snapshot layout changes.
const SNAPSHOT_VERSION: u32 = 1;

/// On-disk form of the phrase dictionaries.
#[derive(serde::Serialize, serde::Deserialize)]
struct DictionarySnapshot {
    version: u32,
    packs: Vec<PhrasePack>,
}

/// Writes every dictionary to `path`. The file is replaced atomically.
pub fn save_snapshot(dictionaries: &PhraseDictionaries, path: &Path) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let snapshot = DictionarySnapshot { version: SNAPSHOT_VERSION, packs: dictionaries.packs() };

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(temp_file.as_file());
        bincode::serialize_into(&mut writer, &snapshot)
            .map_err(|e| TranslationError::Snapshot(e.to_string()))?;
        writer.flush()?;
    }
    temp_file.persist(path).map_err(|e| TranslationError::Io(e.error))?;

    info!(path = %path.display(), languages = snapshot.packs.len(), "dictionary snapshot saved");
    Ok(())
}

/// Reads a snapshot written by [`save_snapshot`].
pub fn load_snapshot(path: &Path, languages: &LanguageRegistry) -> Result<PhraseDictionaries> {
    let reader = BufReader::new(File::open(path)?);
    let snapshot: DictionarySnapshot =
        bincode::deserialize_from(reader).map_err(|e| TranslationError::Snapshot(e.to_string()))?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(TranslationError::Snapshot(format!(
            "unsupported snapshot version {}",
            snapshot.version
        )));
    }

    let dictionaries = PhraseDictionaries::from_packs(&snapshot.packs, languages)?;
    info!(path = %path.display(), languages = snapshot.packs.len(), "dictionary snapshot loaded");
    Ok(dictionaries)
}

/// Parses a JSON phrase pack:
/// `{"language": "hindi", "entries": [["thank you", "धन्यवाद"]]}`.
pub fn parse_phrase_pack(json: &str) -> Result<PhrasePack> {
    serde_json::from_str(json).map_err(|e| TranslationError::Snapshot(format!("phrase pack: {e}")))
}

pub fn load_phrase_pack(path: &Path) -> Result<PhrasePack> {
    parse_phrase_pack(&fs::read_to_string(path)?)
}
