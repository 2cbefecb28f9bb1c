// src/stockage/reglages.rs
//
// Réglages d’affichage persistés
// ------------------------------
// decimal_places borné à 0..=15, à l’écriture comme à la relecture.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::depot::Repository;
use super::erreur::StorageError;
use crate::noyau::{AngleMode, FormatOptions};

/// Clé du fichier de réglages.
pub const CLE_REGLAGES: &str = "settings-storage";

pub const DECIMALES_DEFAUT: usize = 10;
pub const DECIMALES_REGLAGE_MAX: usize = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub decimal_places: usize,
    pub thousands_separator: bool,
    pub angle_mode: AngleMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            decimal_places: DECIMALES_DEFAUT,
            thousands_separator: true,
            angle_mode: AngleMode::Deg,
        }
    }
}

impl Settings {
    pub fn with_decimal_places(mut self, places: usize) -> Self {
        self.decimal_places = places.min(DECIMALES_REGLAGE_MAX);
        self
    }

    fn borne(self) -> Self {
        self.with_decimal_places(self.decimal_places)
    }

    /// Options d’affichage ; les zéros de fin sont toujours retirés.
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            thousands_separator: self.thousands_separator,
            decimal_places: self.decimal_places,
            remove_trailing_zeros: true,
        }
    }
}

#[derive(Debug)]
pub struct SettingsStore<R> {
    depot: R,
}

impl<R: Repository<Settings>> SettingsStore<R> {
    pub fn new(depot: R) -> Self {
        Self { depot }
    }

    /// Réglages enregistrés, ou valeurs par défaut.
    pub fn load(&self) -> Result<Settings, StorageError> {
        Ok(self.depot.load()?.unwrap_or_default().borne())
    }

    pub fn save(&mut self, settings: &Settings) -> Result<Settings, StorageError> {
        let s = settings.borne();
        self.depot.save(&s)?;
        debug!(?s, "settings saved");
        Ok(s)
    }

    /// Lire, modifier, réécrire.
    pub fn update(&mut self, f: impl FnOnce(&mut Settings)) -> Result<Settings, StorageError> {
        let mut s = self.load()?;
        f(&mut s);
        self.save(&s)
    }

    pub fn reset(&mut self) -> Result<(), StorageError> {
        self.depot.clear()
    }
}
