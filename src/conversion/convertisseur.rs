// src/conversion/convertisseur.rs
//
// Conversion d’une valeur entre deux unités
// -----------------------------------------
// 1) même nom => valeur inchangée (aucune recherche)
// 2) catégorie source, puis cible, puis compatibilité
// 3) température : passage par le Celsius
//    sinon        : valeur × rapport(source) ÷ rapport(cible)

use super::erreur::ConversionError;
use super::unites::{UnitCategory, UnitRegistry};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Temperature {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl Temperature {
    fn from_name(name: &str) -> Result<Self, ConversionError> {
        match name {
            "celsius" => Ok(Temperature::Celsius),
            "fahrenheit" => Ok(Temperature::Fahrenheit),
            "kelvin" => Ok(Temperature::Kelvin),
            _ => Err(ConversionError::UnknownTemperature(name.to_string())),
        }
    }

    fn vers_celsius(self, v: f64) -> f64 {
        match self {
            Temperature::Celsius => v,
            Temperature::Fahrenheit => (v - 32.0) * (5.0 / 9.0),
            Temperature::Kelvin => v - 273.15,
        }
    }

    fn depuis_celsius(self, c: f64) -> f64 {
        match self {
            Temperature::Celsius => c,
            Temperature::Fahrenheit => c * (9.0 / 5.0) + 32.0,
            Temperature::Kelvin => c + 273.15,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct UnitConverter {
    registre: UnitRegistry,
}

impl UnitConverter {
    pub fn new() -> Self {
        Self::with_registry(UnitRegistry::standard())
    }

    pub fn with_registry(registre: UnitRegistry) -> Self {
        Self { registre }
    }

    pub fn registry(&self) -> &UnitRegistry {
        &self.registre
    }

    pub fn convert(&self, value: f64, from: &str, to: &str) -> Result<f64, ConversionError> {
        if from == to {
            return Ok(value);
        }

        let cat_source = self
            .registre
            .category_of(from)
            .ok_or_else(|| ConversionError::InvalidSource(from.to_string()))?;
        let cat_cible = self
            .registre
            .category_of(to)
            .ok_or_else(|| ConversionError::InvalidTarget(to.to_string()))?;

        if cat_source != cat_cible {
            return Err(ConversionError::Incompatible {
                from: from.to_string(),
                from_category: cat_source,
                to: to.to_string(),
                to_category: cat_cible,
            });
        }

        if cat_source == UnitCategory::Temperature {
            return convertir_temperature(value, from, to);
        }

        let r_source = self
            .registre
            .ratio(from)
            .ok_or_else(|| ConversionError::InvalidSource(from.to_string()))?;
        let r_cible = self
            .registre
            .ratio(to)
            .ok_or_else(|| ConversionError::InvalidTarget(to.to_string()))?;

        // source -> base -> cible
        Ok(value * r_source / r_cible)
    }

    pub fn units_for_category(&self, category: UnitCategory) -> Vec<&str> {
        self.registre.units(category)
    }

    pub fn categories(&self) -> &'static [UnitCategory] {
        &UnitCategory::ALL
    }
}

fn convertir_temperature(value: f64, from: &str, to: &str) -> Result<f64, ConversionError> {
    let source = Temperature::from_name(from)?;
    let cible = Temperature::from_name(to)?;
    Ok(cible.depuis_celsius(source.vers_celsius(value)))
}

/// Raccourci : convertit avec les tables standard.
pub fn convert(value: f64, from: &str, to: &str) -> Result<f64, ConversionError> {
    UnitConverter::new().convert(value, from, to)
}
