//*** START FILE: src/dictionary_io.rs ***//
use crate::error::{Error, Result};
use crate::simplification::dictionary::{EasyWordDictionary, SimplificationRule};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

// This struct will be serialized to/from JSON
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DictionarySnapshot {
    pub activation_threshold: u8,
    pub rules: Vec<SimplificationRule>,
}

impl DictionarySnapshot {
    pub fn from_dictionary(dictionary: &EasyWordDictionary) -> Self {
        DictionarySnapshot {
            activation_threshold: dictionary.activation_threshold(),
            rules: dictionary.rules().into_iter().cloned().collect(),
        }
    }

    /// Rebuilds the table. A single bad rule rejects the whole snapshot.
    pub fn into_dictionary(self) -> Result<EasyWordDictionary> {
        let mut dictionary = EasyWordDictionary::new(self.activation_threshold);
        for rule in self.rules {
            dictionary.insert(rule)?;
        }
        Ok(dictionary)
    }
}

/// Saves the easy-word table to a JSON file.
pub fn save_dictionary_snapshot(dictionary: &EasyWordDictionary, file_path: &Path) -> Result<()> {
    let file = File::create(file_path).map_err(|e| {
        Error::dictionary(format!(
            "Failed to create dictionary file at {:?}: {}",
            file_path, e
        ))
    })?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &DictionarySnapshot::from_dictionary(dictionary))?;
    log::info!(
        "[Dictionary] Saved {} rules to {:?}",
        dictionary.size(),
        file_path
    );
    Ok(())
}

/// Loads an easy-word table from a JSON file.
pub fn load_dictionary_snapshot(file_path: &Path) -> Result<EasyWordDictionary> {
    if !file_path.exists() {
        return Err(Error::dictionary(format!(
            "Dictionary file not found at {:?}",
            file_path
        )));
    }
    let file = File::open(file_path)?;
    let reader = BufReader::new(file);
    let snapshot: DictionarySnapshot = serde_json::from_reader(reader).map_err(|e| {
        Error::dictionary(format!(
            "Failed to read dictionary from {:?}: {}",
            file_path, e
        ))
    })?;
    let dictionary = snapshot.into_dictionary()?;
    log::info!(
        "[Dictionary] Loaded {} rules from {:?}",
        dictionary.size(),
        file_path
    );
    Ok(dictionary)
}

//*** END FILE: src/dictionary_io.rs ***//
