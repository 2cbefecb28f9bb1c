//! Conversion d’unités
//!
//! - unites.rs        : catégories, tables de rapports, registre
//! - convertisseur.rs : conversion (rapports ou formules de température)
//! - erreur.rs        : erreurs de conversion

pub mod convertisseur;
pub mod erreur;
pub mod unites;

pub use convertisseur::UnitConverter;
pub use erreur::ConversionError;
pub use unites::{UnitCategory, UnitRegistry};
