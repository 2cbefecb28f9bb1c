// src/noyau/format.rs
//
// Affichage des résultats
// -----------------------
// - NaN / ±Infinity / -0 traités avant toute option
// - 0 < |v| < 1e-10 ou |v| ≥ 1e15 => notation exponentielle (1.5e+20)
// - sinon virgule fixe, puis zéros de queue, puis séparateur de milliers
//
// Ne peut pas échouer : toute valeur a un texte.

use serde::{Deserialize, Serialize};

use super::lecture::{exact, exponentielle, lire_prefixe, scaled_to_decimal, virgule_fixe};

const SEUIL_HAUT: f64 = 1e15;
const SEUIL_BAS: f64 = 1e-10;

/// Plafond des décimales (au-delà, les conversions à virgule fixe refusent).
pub const DECIMALES_MAX: usize = 100;

const SEPARATEUR: char = ',';

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatOptions {
    pub thousands_separator: bool,
    pub decimal_places: usize,
    pub remove_trailing_zeros: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            thousands_separator: true,
            decimal_places: 10,
            remove_trailing_zeros: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NumberFormatter;

impl NumberFormatter {
    pub fn new() -> Self {
        NumberFormatter
    }

    pub fn format(&self, value: f64, options: &FormatOptions) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
        }
        if value == 0.0 {
            // couvre -0
            return "0".to_string();
        }

        let decimales = options.decimal_places.min(DECIMALES_MAX);
        let abs = value.abs();
        if !(SEUIL_BAS..SEUIL_HAUT).contains(&abs) {
            return format_scientifique(value, decimales, options.remove_trailing_zeros);
        }
        format_standard(value, decimales, options)
    }

    /// Raccourci : options par défaut.
    pub fn format_default(&self, value: f64) -> String {
        self.format(value, &FormatOptions::default())
    }

    /// Retire les séparateurs puis lit le plus long préfixe numérique.
    pub fn parse(&self, formatted: &str) -> f64 {
        let nettoye: String = formatted.chars().filter(|c| *c != SEPARATEUR).collect();
        lire_prefixe(&nettoye)
    }
}

fn format_standard(value: f64, decimales: usize, options: &FormatOptions) -> String {
    let mut s = virgule_fixe(value, decimales);

    if options.remove_trailing_zeros {
        s = retirer_zeros(s);
    }
    if options.thousands_separator {
        s = separer_milliers(&s);
    }
    s
}

fn format_scientifique(value: f64, decimales: usize, sans_zeros: bool) -> String {
    let (mantisse, exposant) = match exact(value) {
        Some(r) => exponentielle(&r, decimales),
        None => return format!("{value:e}"),
    };

    let mut m = scaled_to_decimal(mantisse, decimales);
    if sans_zeros {
        m = retirer_zeros(m);
    }

    let signe = if exposant < 0 { '-' } else { '+' };
    format!("{m}e{signe}{}", exposant.abs())
}

/// "5.100" => "5.1", "5.000" => "5" ; sans point, rien ne change.
fn retirer_zeros(mut s: String) -> String {
    if !s.contains('.') {
        return s;
    }
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

/// Séparateur tous les trois chiffres, partie entière seulement.
fn separer_milliers(s: &str) -> String {
    let (signe, corps) = match s.strip_prefix('-') {
        Some(reste) => ("-", reste),
        None => ("", s),
    };
    let (entier, decimal) = match corps.split_once('.') {
        Some((e, d)) => (e, Some(d)),
        None => (corps, None),
    };

    let n = entier.len();
    let mut out = String::with_capacity(s.len() + n / 3);
    out.push_str(signe);
    for (i, c) in entier.chars().enumerate() {
        if i > 0 && (n - i) % 3 == 0 {
            out.push(SEPARATEUR);
        }
        out.push(c);
    }
    if let Some(d) = decimal {
        out.push('.');
        out.push_str(d);
    }
    out
}
