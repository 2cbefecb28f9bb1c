// src/stockage/registre.rs
//
// Registre mémoire (M+, M-, MR, MC)
// ---------------------------------
// - une seule valeur, 0 par défaut, persistée à chaque modification
// - la valeur reste finie : une opération qui la rendrait infinie est ignorée

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::depot::Repository;
use super::erreur::StorageError;

/// Clé du fichier du registre.
pub const CLE_REGISTRE: &str = "calculator-storage";

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryRegister {
    pub memory: f64,
}

#[derive(Debug)]
pub struct RegisterStore<R> {
    depot: R,
}

impl<R: Repository<MemoryRegister>> RegisterStore<R> {
    pub fn new(depot: R) -> Self {
        Self { depot }
    }

    /// MR
    pub fn recall(&self) -> Result<f64, StorageError> {
        let v = self.depot.load()?.unwrap_or_default().memory;
        Ok(if v.is_finite() { v } else { 0.0 })
    }

    /// M+ ; renvoie la valeur du registre après l’opération.
    pub fn add(&mut self, x: f64) -> Result<f64, StorageError> {
        let avant = self.recall()?;
        self.ecrire(avant, avant + x)
    }

    /// M-
    pub fn sub(&mut self, x: f64) -> Result<f64, StorageError> {
        let avant = self.recall()?;
        self.ecrire(avant, avant - x)
    }

    /// MC
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.depot.clear()
    }

    fn ecrire(&mut self, avant: f64, apres: f64) -> Result<f64, StorageError> {
        if !apres.is_finite() {
            debug!(avant, "memory update ignored (non-finite)");
            return Ok(avant);
        }
        self.depot.save(&MemoryRegister { memory: apres })?;
        debug!(memory = apres, "memory updated");
        Ok(apres)
    }
}
