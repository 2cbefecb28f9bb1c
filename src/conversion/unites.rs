// src/conversion/unites.rs
//
// Catégories et tables d’unités
// -----------------------------
// - Chaque catégorie à rapports a une unité de base (rapport 1).
// - rapport(u) = taille(u) / taille(base)
// - La température n’a pas de table : trois noms fixes, conversion par formule.
// - Un nom d’unité appartient à une seule catégorie (vérifié à la construction).

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::erreur::ConversionError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    Length,
    Mass,
    Temperature,
    Time,
    Volume,
    Area,
}

impl UnitCategory {
    /// Ordre d’affichage fixe.
    pub const ALL: [UnitCategory; 6] = [
        UnitCategory::Length,
        UnitCategory::Mass,
        UnitCategory::Temperature,
        UnitCategory::Time,
        UnitCategory::Volume,
        UnitCategory::Area,
    ];

    pub fn name(self) -> &'static str {
        match self {
            UnitCategory::Length => "length",
            UnitCategory::Mass => "mass",
            UnitCategory::Temperature => "temperature",
            UnitCategory::Time => "time",
            UnitCategory::Volume => "volume",
            UnitCategory::Area => "area",
        }
    }
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UnitCategory {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitCategory::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| ConversionError::UnknownCategory(s.to_string()))
    }
}

/* ------------------------ Tables standard ------------------------ */

pub const TEMPERATURES: [&str; 3] = ["celsius", "fahrenheit", "kelvin"];

// base : mètre
const LONGUEURS: &[(&str, f64)] = &[
    ("meter", 1.0),
    ("kilometer", 1000.0),
    ("centimeter", 0.01),
    ("millimeter", 0.001),
    ("mile", 1609.344),
    ("yard", 0.9144),
    ("feet", 0.3048),
    ("inch", 0.0254),
];

// base : kilogramme ; ton = tonne métrique
const MASSES: &[(&str, f64)] = &[
    ("kilogram", 1.0),
    ("gram", 0.001),
    ("milligram", 0.000001),
    ("ton", 1000.0),
    ("pound", 0.453592),
    ("ounce", 0.0283495),
];

// base : seconde ; mois = 30.4375 j, année = 365.25 j
const DUREES: &[(&str, f64)] = &[
    ("second", 1.0),
    ("millisecond", 0.001),
    ("minute", 60.0),
    ("hour", 3600.0),
    ("day", 86400.0),
    ("week", 604800.0),
    ("month", 2629800.0),
    ("year", 31557600.0),
];

// base : litre ; mesures US
const VOLUMES: &[(&str, f64)] = &[
    ("liter", 1.0),
    ("milliliter", 0.001),
    ("cubicMeter", 1000.0),
    ("gallon", 3.78541),
    ("quart", 0.946353),
    ("pint", 0.473176),
    ("cup", 0.236588),
    ("fluidOunce", 0.0295735),
];

// base : mètre carré
const SURFACES: &[(&str, f64)] = &[
    ("squareMeter", 1.0),
    ("squareKilometer", 1000000.0),
    ("squareCentimeter", 0.0001),
    ("squareFoot", 0.092903),
    ("squareInch", 0.00064516),
    ("squareMile", 2589988.11),
    ("hectare", 10000.0),
    ("acre", 4046.86),
];

/* ------------------------ Registre ------------------------ */

/// Table d’une catégorie : noms dans l’ordre de déclaration.
#[derive(Clone, Debug, PartialEq)]
pub struct RatioTable {
    pub category: UnitCategory,
    pub units: Vec<(String, f64)>,
}

impl RatioTable {
    pub fn new(category: UnitCategory, units: &[(&str, f64)]) -> Self {
        Self {
            category,
            units: units.iter().map(|(n, r)| (n.to_string(), *r)).collect(),
        }
    }
}

/// Données immuables de conversion, injectées dans le convertisseur.
#[derive(Clone, Debug)]
pub struct UnitRegistry {
    tables: Vec<RatioTable>,
    index: HashMap<String, (UnitCategory, f64)>,
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl UnitRegistry {
    /// Les cinq tables de l’application.
    pub fn standard() -> Self {
        let tables = vec![
            RatioTable::new(UnitCategory::Length, LONGUEURS),
            RatioTable::new(UnitCategory::Mass, MASSES),
            RatioTable::new(UnitCategory::Time, DUREES),
            RatioTable::new(UnitCategory::Volume, VOLUMES),
            RatioTable::new(UnitCategory::Area, SURFACES),
        ];
        // les tables standard sont disjointes
        let mut index = HashMap::new();
        for t in &tables {
            for (nom, rapport) in &t.units {
                index.insert(nom.clone(), (t.category, *rapport));
            }
        }
        Self { tables, index }
    }

    /// Registre sur mesure : refuse un nom présent dans deux catégories
    /// (température comprise) et toute table de température.
    pub fn from_tables(tables: Vec<RatioTable>) -> Result<Self, ConversionError> {
        let mut index: HashMap<String, (UnitCategory, f64)> = HashMap::new();

        for t in &tables {
            if t.category == UnitCategory::Temperature {
                return Err(ConversionError::NotRatioBased(t.category));
            }
            for (nom, rapport) in &t.units {
                if TEMPERATURES.contains(&nom.as_str()) {
                    return Err(ConversionError::DuplicateUnit {
                        unit: nom.clone(),
                        first: UnitCategory::Temperature,
                        second: t.category,
                    });
                }
                if let Some((premiere, _)) = index.get(nom) {
                    return Err(ConversionError::DuplicateUnit {
                        unit: nom.clone(),
                        first: *premiere,
                        second: t.category,
                    });
                }
                index.insert(nom.clone(), (t.category, *rapport));
            }
        }

        Ok(Self { tables, index })
    }

    /// Catégorie d’une unité ; la température passe en premier.
    pub fn category_of(&self, unit: &str) -> Option<UnitCategory> {
        if TEMPERATURES.contains(&unit) {
            return Some(UnitCategory::Temperature);
        }
        self.index.get(unit).map(|(c, _)| *c)
    }

    pub fn ratio(&self, unit: &str) -> Option<f64> {
        self.index.get(unit).map(|(_, r)| *r)
    }

    /// Noms d’une catégorie, ordre de déclaration ; vide si la table manque.
    pub fn units(&self, category: UnitCategory) -> Vec<&str> {
        if category == UnitCategory::Temperature {
            return TEMPERATURES.to_vec();
        }
        self.tables
            .iter()
            .find(|t| t.category == category)
            .map(|t| t.units.iter().map(|(n, _)| n.as_str()).collect())
            .unwrap_or_default()
    }
}
