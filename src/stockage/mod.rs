//! Stockage
//!
//! - depot.rs      : trait Repository + dépôts mémoire / fichier JSON
//! - historique.rs : historique des calculs (ajout, recherche, groupes par jour)
//! - reglages.rs   : réglages d’affichage persistés
//! - registre.rs   : registre mémoire (M+, M-, MR, MC)
//! - erreur.rs     : erreurs d’E/S et de sérialisation

pub mod depot;
pub mod erreur;
pub mod historique;
pub mod reglages;
pub mod registre;

pub use depot::{FileRepository, MemoryRepository, Repository};
pub use erreur::StorageError;
pub use historique::{HistoryEntry, HistoryGroup, HistoryManager};
pub use reglages::{Settings, SettingsStore};
pub use registre::{MemoryRegister, RegisterStore};
