//! Calculatrice scientifique
//!
//! - noyau      : validation, évaluation, affichage des nombres
//! - conversion : unités (longueur, masse, température, durée, volume, surface)
//! - stockage   : historique et réglages persistés
//! - app        : session + ligne de commande

pub mod app;
pub mod conversion;
pub mod noyau;
pub mod stockage;
