// src/conversion/erreur.rs
//
// Les noms d’unités figurent dans chaque message.

use thiserror::Error;

use super::unites::UnitCategory;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("invalid source unit: {0}")]
    InvalidSource(String),

    #[error("invalid target unit: {0}")]
    InvalidTarget(String),

    #[error("incompatible units: cannot convert {from} ({from_category}) to {to} ({to_category})")]
    Incompatible {
        from: String,
        from_category: UnitCategory,
        to: String,
        to_category: UnitCategory,
    },

    #[error("unknown temperature unit: {0}")]
    UnknownTemperature(String),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// Construction d’un registre : un nom doit appartenir à une seule catégorie.
    #[error("unit {unit} appears in both {first} and {second}")]
    DuplicateUnit {
        unit: String,
        first: UnitCategory,
        second: UnitCategory,
    },

    /// Construction d’un registre : la température n’a pas de table de rapports.
    #[error("category {0} cannot be defined by ratios")]
    NotRatioBased(UnitCategory),
}
