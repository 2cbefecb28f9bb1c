//! Noyau — évaluation (pipeline réel)
//!
//! tokenize -> RPN -> Expr -> evaluer(mode) -> contrôle de finitude
//!
//! Classement des erreurs :
//! - entrée vide, résultat complexe, résultat non fini : levées ici
//! - tout le reste (jetons, parenthèses, symboles, arité) : enveloppé en `Invalid`

use super::erreur::EvalError;
use super::expr::Expr;
use super::jetons::{format_tokens, tokenize, Tok};
use super::rpn::{from_rpn, to_rpn};
use super::trig::AngleMode;

/// Étapes intermédiaires, pour affichage.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct Demarche {
    pub jetons: String,
    pub rpn: String,
    pub arbre: String,
    pub resultat: f64,
}

/// Évaluateur sans état : un appel = une expression.
#[derive(Clone, Copy, Debug, Default)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Evaluator
    }

    pub fn evaluate(&self, expression: &str, mode: AngleMode) -> Result<f64, EvalError> {
        let (_, _, arbre) = analyser(expression)?;
        calculer(&arbre, mode)
    }

    /// Même pipeline que `evaluate`, en gardant les formes intermédiaires.
    pub fn explain(&self, expression: &str, mode: AngleMode) -> Result<Demarche, EvalError> {
        let (jetons, rpn, arbre) = analyser(expression)?;
        let resultat = calculer(&arbre, mode)?;

        Ok(Demarche {
            jetons: format_tokens(&jetons),
            rpn: format_tokens(&rpn),
            arbre: arbre.to_string(),
            resultat,
        })
    }
}

/// Raccourci : évalue avec un évaluateur neuf.
pub fn evaluate_expression(expression: &str, mode: AngleMode) -> Result<f64, EvalError> {
    Evaluator::new().evaluate(expression, mode)
}

fn analyser(expression: &str) -> Result<(Vec<Tok>, Vec<Tok>, Expr), EvalError> {
    let s = expression.trim();
    if s.is_empty() {
        return Err(EvalError::Empty);
    }

    let jetons = tokenize(s)?;
    let rpn = to_rpn(&jetons)?;
    let arbre = from_rpn(&rpn)?;
    Ok((jetons, rpn, arbre))
}

fn calculer(arbre: &Expr, mode: AngleMode) -> Result<f64, EvalError> {
    let v = arbre.evaluer(mode)?;
    // NaN (0/0, ∞-∞) traité comme l’infini
    if !v.is_finite() {
        return Err(EvalError::NonFinite);
    }
    Ok(v)
}
