// src/noyau/validation.rs
//
// Garde-fou avant évaluation
// --------------------------
// Ordre des contrôles (le premier échec gagne) :
//   1) vide / blancs
//   2) motifs refusés (injection de code, accès prototype, objets globaux)
//   3) parenthèses : équilibre, "()" vide, opérateur avant ')'
//   4) placement des opérateurs (sur la chaîne trimée)
//
// Ce n’est PAS un analyseur : pas de contrôle des noms de fonctions ni de l’arité.
// Les listes FONCTIONS_AUTORISEES / CONSTANTES_AUTORISEES sont déclarées
// mais ne sont pas confrontées au texte.

use lazy_static::lazy_static;
use regex::Regex;

use super::erreur::ValidationError;

/// Vocabulaire de fonctions reconnu par l’évaluateur.
pub const FONCTIONS_AUTORISEES: &[&str] = &[
    "sin", "cos", "tan", "cot", "sec", "csc", "asin", "acos", "atan", "acot", "asec", "acsc",
    "sinh", "cosh", "tanh", "log", "log10", "log2", "ln", "exp", "sqrt", "cbrt", "nthRoot",
    "abs", "ceil", "floor", "round", "sign",
];

pub const CONSTANTES_AUTORISEES: &[&str] = &["pi", "e", "PI", "E"];

lazy_static! {
    /// Motifs refusés, insensibles à la casse (sous-chaîne, pas d’analyse).
    static ref MOTIFS_REFUSES: Vec<Regex> = [
        r"(?i)<script",
        r"(?i)javascript:",
        r"(?i)on\w+\s*=",
        r"(?i)eval\s*\(",
        r"(?i)function\s*\(",
        r"(?i)import\s*\(",
        r"(?i)require\s*\(",
        r"(?i)constructor",
        r"(?i)__proto__",
        r"(?i)prototype",
        r#"(?i)\[\s*['"]constructor['"]\s*\]"#,
        r"(?i)document\.",
        r"(?i)window\.",
        r"(?i)globalThis",
        r"(?i)fetch\s*\(",
        r"(?i)XMLHttpRequest",
    ]
    .iter()
    .map(|m| Regex::new(m).unwrap())
    .collect();

    static ref PARENTHESES_VIDES: Regex = Regex::new(r"\(\s*\)").unwrap();
    static ref OPERATEUR_AVANT_FERMANTE: Regex = Regex::new(r"[+\-*/^%]\s*\)").unwrap();

    // Moins unaire toléré en tête : seul '-' manque à la classe.
    static ref DEBUT_BINAIRE: Regex = Regex::new(r"^[+*/^%]").unwrap();
    static ref FIN_OPERATEUR: Regex = Regex::new(r"[+\-*/^%]$").unwrap();

    // "2 + + 3", "2 * / 3" ; "2 * -3" reste permis
    static ref OPERATEURS_CONSECUTIFS: Regex = Regex::new(r"[+\-*/^%]\s*[+*/^%]").unwrap();
    // "2 + - 3", "2 - - 3"
    static ref SIGNE_PUIS_MOINS: Regex = Regex::new(r"[+\-]\s*-").unwrap();
}

/// Validateur d’expressions.
///
/// La liste de motifs est copiée à la construction : deux validateurs
/// ne partagent rien, et un test peut injecter sa propre liste.
#[derive(Clone, Debug)]
pub struct Validator {
    motifs: Vec<Regex>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    pub fn new() -> Self {
        Self::with_patterns(MOTIFS_REFUSES.clone())
    }

    pub fn with_patterns(motifs: Vec<Regex>) -> Self {
        Self { motifs }
    }

    pub fn is_valid(&self, expression: &str) -> bool {
        self.validate(expression).is_ok()
    }

    pub fn validate(&self, expression: &str) -> Result<(), ValidationError> {
        if expression.trim().is_empty() {
            return Err(ValidationError::Empty);
        }
        self.verifier_motifs(expression)?;
        verifier_parentheses(expression)?;
        verifier_operateurs(expression.trim())
    }

    fn verifier_motifs(&self, expression: &str) -> Result<(), ValidationError> {
        if self.motifs.iter().any(|m| m.is_match(expression)) {
            return Err(ValidationError::DangerousPattern);
        }
        Ok(())
    }
}

fn verifier_parentheses(expression: &str) -> Result<(), ValidationError> {
    let mut ouvertes: usize = 0;
    for c in expression.chars() {
        match c {
            '(' => ouvertes += 1,
            ')' => {
                ouvertes = ouvertes
                    .checked_sub(1)
                    .ok_or(ValidationError::TooManyClosing)?;
            }
            _ => {}
        }
    }
    if ouvertes != 0 {
        return Err(ValidationError::UnclosedOpening);
    }

    if PARENTHESES_VIDES.is_match(expression) {
        return Err(ValidationError::EmptyParentheses);
    }
    if OPERATEUR_AVANT_FERMANTE.is_match(expression) {
        return Err(ValidationError::OperatorBeforeClosing);
    }
    Ok(())
}

fn verifier_operateurs(s: &str) -> Result<(), ValidationError> {
    if DEBUT_BINAIRE.is_match(s) {
        return Err(ValidationError::LeadingOperator);
    }
    if FIN_OPERATEUR.is_match(s) {
        return Err(ValidationError::TrailingOperator);
    }
    if OPERATEURS_CONSECUTIFS.is_match(s) || SIGNE_PUIS_MOINS.is_match(s) {
        return Err(ValidationError::ConsecutiveOperators);
    }
    Ok(())
}
