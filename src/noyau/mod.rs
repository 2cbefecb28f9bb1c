//! Noyau de calcul
//!
//! Organisation interne :
//! - jetons.rs     : tokenisation (+ multiplication implicite, √ et π)
//! - rpn.rs        : shunting-yard + construction Expr
//! - expr.rs       : AST numérique + fonctions (factorielle exacte, Γ)
//! - trig.rs       : mode d’angle + douze fonctions trig
//! - validation.rs : garde-fou avant évaluation
//! - eval.rs       : pipeline complet + démarche
//! - lecture.rs    : arrondi décimal exact d’un f64 + lecture de préfixe
//! - format.rs     : affichage des résultats
//! - erreur.rs     : erreurs de validation / d’évaluation
//!
//! Aucun module ici ne journalise : l’appelant décide quoi afficher.

pub mod erreur;
pub mod eval;
pub mod expr;
pub mod format;
pub mod jetons;
pub mod lecture;
pub mod rpn;
pub mod trig;
pub mod validation;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use erreur::{EvalError, ValidationError};
pub use eval::{evaluate_expression, Demarche, Evaluator};
pub use format::{FormatOptions, NumberFormatter};
pub use trig::AngleMode;
pub use validation::Validator;
