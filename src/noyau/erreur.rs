// src/noyau/erreur.rs
//
// Erreurs du noyau (validation + évaluation)
// ------------------------------------------
// - ValidationError : message affichable tel quel, l’appelant bloque le calcul
// - EvalError       : classée par cause, pas par origine technique
//
// Les messages (Display) sont stables : l’appelant peut s’appuyer sur le préfixe.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("expression is empty")]
    Empty,

    #[error("expression contains a disallowed pattern")]
    DangerousPattern,

    #[error("mismatched parentheses: too many closing parentheses")]
    TooManyClosing,

    #[error("mismatched parentheses: unclosed opening parenthesis")]
    UnclosedOpening,

    #[error("empty parentheses")]
    EmptyParentheses,

    #[error("an operator cannot precede a closing parenthesis")]
    OperatorBeforeClosing,

    #[error("expression cannot start with a binary operator")]
    LeadingOperator,

    #[error("expression cannot end with an operator")]
    TrailingOperator,

    #[error("consecutive operators are not allowed")]
    ConsecutiveOperators,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("expression cannot be empty")]
    Empty,

    /// Résultat hors des réels (ex: √-1).
    #[error("expected a number but got {0}")]
    NonNumeric(String),

    #[error("division by zero or result is infinity")]
    NonFinite,

    /// Toute erreur d’analyse ou de calcul, enveloppée uniformément.
    #[error("invalid expression: {0}")]
    Invalid(String),
}

impl EvalError {
    /// Vrai pour les erreurs levées par l’évaluateur lui-même
    /// (entrée vide, résultat non numérique, résultat infini),
    /// par opposition aux erreurs d’analyse enveloppées.
    pub fn is_caller_raised(&self) -> bool {
        !matches!(self, EvalError::Invalid(_))
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        EvalError::Invalid(msg.into())
    }

    pub(crate) fn complexe() -> Self {
        EvalError::NonNumeric("complex".into())
    }
}

impl From<String> for EvalError {
    fn from(msg: String) -> Self {
        EvalError::Invalid(msg)
    }
}

impl From<&str> for EvalError {
    fn from(msg: &str) -> Self {
        EvalError::Invalid(msg.to_string())
    }
}
