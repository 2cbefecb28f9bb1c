// src/noyau/expr.rs
//
// AST numérique (f64).
// - Num      : littéral
// - Pi / E   : constantes
// - Appel    : fonction nommée + arguments (arité vérifiée à la construction)
//
// IMPORTANT :
// - evaluer() ne vérifie PAS la finitude du résultat final (c’est eval.rs).
// - Les résultats complexes (√-1, log(-1), (-8)^0.5) sont refusés ici.

use std::f64::consts::PI;
use std::fmt;

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive};

use super::erreur::EvalError;
use super::trig::{AngleMode, TrigFn};

/// Au-delà, n! dépasse f64::MAX.
const FACTORIELLE_MAX: u64 = 170;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fonction {
    Trig(TrigFn),
    Sinh,
    Cosh,
    Tanh,
    Log,
    Log10,
    Log2,
    Ln,
    Exp,
    Sqrt,
    Cbrt,
    NthRoot,
    Abs,
    Ceil,
    Floor,
    Round,
    Sign,
}

impl Fonction {
    pub fn from_name(name: &str) -> Option<Fonction> {
        if let Some(t) = TrigFn::from_name(name) {
            return Some(Fonction::Trig(t));
        }
        let f = match name {
            "sinh" => Fonction::Sinh,
            "cosh" => Fonction::Cosh,
            "tanh" => Fonction::Tanh,
            "log" => Fonction::Log,
            "log10" => Fonction::Log10,
            "log2" => Fonction::Log2,
            "ln" => Fonction::Ln,
            "exp" => Fonction::Exp,
            "sqrt" => Fonction::Sqrt,
            "cbrt" => Fonction::Cbrt,
            "nthRoot" => Fonction::NthRoot,
            "abs" => Fonction::Abs,
            "ceil" => Fonction::Ceil,
            "floor" => Fonction::Floor,
            "round" => Fonction::Round,
            "sign" => Fonction::Sign,
            _ => return None,
        };
        Some(f)
    }

    pub fn name(self) -> &'static str {
        match self {
            Fonction::Trig(t) => t.name(),
            Fonction::Sinh => "sinh",
            Fonction::Cosh => "cosh",
            Fonction::Tanh => "tanh",
            Fonction::Log => "log",
            Fonction::Log10 => "log10",
            Fonction::Log2 => "log2",
            Fonction::Ln => "ln",
            Fonction::Exp => "exp",
            Fonction::Sqrt => "sqrt",
            Fonction::Cbrt => "cbrt",
            Fonction::NthRoot => "nthRoot",
            Fonction::Abs => "abs",
            Fonction::Ceil => "ceil",
            Fonction::Floor => "floor",
            Fonction::Round => "round",
            Fonction::Sign => "sign",
        }
    }

    /// Arité acceptée (min, max).
    pub fn arite(self) -> (usize, usize) {
        match self {
            Fonction::Log | Fonction::Round | Fonction::NthRoot => (1, 2),
            _ => (1, 1),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Num(f64),
    Pi,
    E,

    Neg(Box<Expr>),
    Fact(Box<Expr>), // n!

    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Mod(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),

    Appel(Fonction, Vec<Expr>),
}

impl Expr {
    /// Évalue l’arbre. Le mode d’angle n’affecte que les douze fonctions trig.
    pub fn evaluer(&self, mode: AngleMode) -> Result<f64, EvalError> {
        use Expr::*;

        match self {
            Num(v) => Ok(*v),
            Pi => Ok(PI),
            E => Ok(std::f64::consts::E),

            Neg(x) => Ok(-x.evaluer(mode)?),
            Fact(x) => factorielle(x.evaluer(mode)?),

            Add(a, b) => Ok(a.evaluer(mode)? + b.evaluer(mode)?),
            Sub(a, b) => Ok(a.evaluer(mode)? - b.evaluer(mode)?),
            Mul(a, b) => Ok(a.evaluer(mode)? * b.evaluer(mode)?),
            Div(a, b) => Ok(a.evaluer(mode)? / b.evaluer(mode)?),

            Mod(a, b) => {
                let x = a.evaluer(mode)?;
                let y = b.evaluer(mode)?;
                if y == 0.0 {
                    return Ok(x);
                }
                Ok(x - y * (x / y).floor())
            }

            Pow(a, b) => {
                let x = a.evaluer(mode)?;
                let y = b.evaluer(mode)?;
                // base négative + exposant non entier => complexe
                if x < 0.0 && y.is_finite() && y.fract() != 0.0 {
                    return Err(EvalError::complexe());
                }
                Ok(x.powf(y))
            }

            Appel(f, args) => {
                let mut vals = Vec::with_capacity(args.len());
                for a in args {
                    vals.push(a.evaluer(mode)?);
                }
                appliquer(*f, &vals, mode)
            }
        }
    }
}

fn appliquer(f: Fonction, v: &[f64], mode: AngleMode) -> Result<f64, EvalError> {
    let x = v.first().copied().ok_or_else(|| EvalError::invalid(format!("missing argument for {}", f.name())))?;
    let y = v.get(1).copied();

    let r = match f {
        Fonction::Trig(t) => t.apply(x, mode),

        Fonction::Sinh => x.sinh(),
        Fonction::Cosh => x.cosh(),
        Fonction::Tanh => x.tanh(),

        Fonction::Log | Fonction::Ln => {
            let ln = ln_reel(x)?;
            match y {
                Some(base) => ln / ln_reel(base)?,
                None => ln,
            }
        }
        Fonction::Log10 => {
            ln_reel(x)?;
            x.log10()
        }
        Fonction::Log2 => {
            ln_reel(x)?;
            x.log2()
        }
        Fonction::Exp => x.exp(),

        Fonction::Sqrt => {
            if x < 0.0 {
                return Err(EvalError::complexe());
            }
            x.sqrt()
        }
        Fonction::Cbrt => x.cbrt(),
        Fonction::NthRoot => racine_n(x, y.unwrap_or(2.0))?,

        Fonction::Abs => x.abs(),
        Fonction::Ceil => x.ceil(),
        Fonction::Floor => x.floor(),
        Fonction::Round => arrondi(x, y.unwrap_or(0.0))?,
        Fonction::Sign => {
            if x == 0.0 {
                0.0
            } else {
                x.signum()
            }
        }
    };

    Ok(r)
}

/// ln sur ℝ : négatif => complexe ; ln(0) = -∞ (refusé plus tard comme non fini).
fn ln_reel(x: f64) -> Result<f64, EvalError> {
    if x < 0.0 {
        return Err(EvalError::complexe());
    }
    Ok(x.ln())
}

fn racine_n(x: f64, n: f64) -> Result<f64, EvalError> {
    if n == 0.0 || n.fract() != 0.0 {
        return Err(EvalError::invalid("nthRoot: root must be a non-zero integer"));
    }
    if x < 0.0 {
        // sur le f64 : une conversion entière sature pour les grandes racines
        if n % 2.0 == 0.0 {
            return Err(EvalError::invalid("nthRoot: root must be odd when the value is negative"));
        }
        return Ok(-(-x).powf(1.0 / n));
    }
    Ok(x.powf(1.0 / n))
}

/// Arrondi demi-écart vers l’extérieur, à `n` décimales.
fn arrondi(x: f64, n: f64) -> Result<f64, EvalError> {
    if n < 0.0 || n.fract() != 0.0 || n > 15.0 {
        return Err(EvalError::invalid("round: decimals must be an integer between 0 and 15"));
    }
    let p = 10f64.powi(n as i32);
    Ok((x * p).round() / p)
}

/* ------------------------ Factorielle ------------------------ */

fn factorielle(x: f64) -> Result<f64, EvalError> {
    if x.is_nan() {
        return Ok(f64::NAN);
    }
    if x.fract() != 0.0 {
        // non entier : Γ(x+1)
        return Ok(gamma(x + 1.0));
    }
    if x < 0.0 {
        return Err(EvalError::invalid("factorial: value must be a non-negative integer"));
    }
    if x > FACTORIELLE_MAX as f64 {
        return Ok(f64::INFINITY);
    }

    // produit exact, une seule conversion (arrondi correct)
    let mut acc = BigUint::one();
    for k in 2..=(x as u64) {
        acc *= k;
    }
    Ok(acc.to_f64().unwrap_or(f64::INFINITY))
}

/// Γ(x) par Lanczos (g = 7, 9 coefficients), réflexion pour x < 1/2.
fn gamma(x: f64) -> f64 {
    const G: f64 = 7.0;
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        return PI / ((PI * x).sin() * gamma(1.0 - x));
    }

    let x = x - 1.0;
    let mut a = COEFFS[0];
    let t = x + G + 0.5;
    for (i, c) in COEFFS.iter().enumerate().skip(1) {
        a += c / (x + i as f64);
    }
    (2.0 * PI).sqrt() * t.powf(x + 0.5) * (-t).exp() * a
}

/* ------------------------ Affichage (démarche) ------------------------ */

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Expr::*;

        match self {
            Num(v) => write!(f, "{v}"),
            Pi => f.write_str("pi"),
            E => f.write_str("e"),

            Neg(x) => write!(f, "-{x}"),
            Fact(x) => write!(f, "{x}!"),

            Add(a, b) => write!(f, "({a} + {b})"),
            Sub(a, b) => write!(f, "({a} - {b})"),
            Mul(a, b) => write!(f, "({a} * {b})"),
            Div(a, b) => write!(f, "({a} / {b})"),
            Mod(a, b) => write!(f, "({a} % {b})"),
            Pow(a, b) => write!(f, "({a} ^ {b})"),

            Appel(fonction, args) => {
                write!(f, "{}(", fonction.name())?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{a}")?;
                }
                f.write_str(")")
            }
        }
    }
}
