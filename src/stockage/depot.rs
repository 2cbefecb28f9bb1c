// src/stockage/depot.rs
//
// Dépôts clé -> valeur
// --------------------
// - MemoryRepository : en mémoire (tests, sessions jetables)
// - FileRepository   : un fichier JSON par clé, écrit via fichier temporaire + rename
//
// Contrat commun :
// - load() sur un dépôt vide => Ok(None)
// - contenu illisible (JSON corrompu) => Ok(None) + avertissement
// - clear() sur un dépôt vide => Ok(())

use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::erreur::StorageError;

pub trait Repository<T> {
    fn save(&mut self, value: &T) -> Result<(), StorageError>;
    fn load(&self) -> Result<Option<T>, StorageError>;
    fn clear(&mut self) -> Result<(), StorageError>;
}

/* ------------------------ Mémoire ------------------------ */

#[derive(Clone, Debug)]
pub struct MemoryRepository<T> {
    valeur: Option<T>,
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self { valeur: None }
    }
}

impl<T> MemoryRepository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dépôt pré-rempli.
    pub fn with_value(valeur: T) -> Self {
        Self {
            valeur: Some(valeur),
        }
    }
}

impl<T: Clone> Repository<T> for MemoryRepository<T> {
    fn save(&mut self, value: &T) -> Result<(), StorageError> {
        self.valeur = Some(value.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<T>, StorageError> {
        Ok(self.valeur.clone())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.valeur = None;
        Ok(())
    }
}

/* ------------------------ Fichier JSON ------------------------ */

#[derive(Debug)]
pub struct FileRepository<T> {
    chemin: PathBuf,
    _type: PhantomData<fn() -> T>,
}

impl<T> Clone for FileRepository<T> {
    fn clone(&self) -> Self {
        Self::at(self.chemin.clone())
    }
}

impl<T> FileRepository<T> {
    /// `<dir>/<key>.json`
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self::at(dir.as_ref().join(format!("{key}.json")))
    }

    pub fn at(chemin: PathBuf) -> Self {
        Self {
            chemin,
            _type: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.chemin
    }

    fn chemin_temporaire(&self) -> PathBuf {
        let mut nom = self
            .chemin
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        nom.push(".tmp");
        self.chemin.with_file_name(nom)
    }
}

impl<T: Serialize + DeserializeOwned> Repository<T> for FileRepository<T> {
    fn save(&mut self, value: &T) -> Result<(), StorageError> {
        let octets = serde_json::to_vec_pretty(value)?;

        if let Some(dir) = self.chemin.parent() {
            fs::create_dir_all(dir).map_err(|source| StorageError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        // jamais de fichier à moitié écrit sous le vrai nom
        let tmp = self.chemin_temporaire();
        fs::write(&tmp, &octets).map_err(|source| StorageError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.chemin).map_err(|source| StorageError::Write {
            path: self.chemin.clone(),
            source,
        })?;

        debug!(path = %self.chemin.display(), bytes = octets.len(), "saved");
        Ok(())
    }

    fn load(&self) -> Result<Option<T>, StorageError> {
        let texte = match fs::read_to_string(&self.chemin) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.chemin.clone(),
                    source,
                })
            }
        };

        match serde_json::from_str(&texte) {
            Ok(v) => Ok(Some(v)),
            Err(e) => {
                warn!(path = %self.chemin.display(), error = %e, "corrupt payload ignored");
                Ok(None)
            }
        }
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        match fs::remove_file(&self.chemin) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Remove {
                path: self.chemin.clone(),
                source,
            }),
        }
    }
}
