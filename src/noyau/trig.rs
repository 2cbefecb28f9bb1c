// src/noyau/trig.rs
//
// Trigonométrie selon le mode d’angle
// -----------------------------------
// - DEG : fonctions directes => argument converti en radians (deg × π/180)
//         fonctions inverses => résultat converti en degrés (rad × 180/π)
// - RAD : les douze fonctions passent telles quelles
// - Inverses hors domaine réel : on garde la partie réelle du résultat complexe

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AngleMode {
    #[default]
    Deg,
    Rad,
}

impl AngleMode {
    pub fn bascule(self) -> Self {
        match self {
            AngleMode::Deg => AngleMode::Rad,
            AngleMode::Rad => AngleMode::Deg,
        }
    }

    fn vers_radians(self, x: f64) -> f64 {
        match self {
            AngleMode::Deg => x * (PI / 180.0),
            AngleMode::Rad => x,
        }
    }

    fn depuis_radians(self, x: f64) -> f64 {
        match self {
            AngleMode::Deg => x * (180.0 / PI),
            AngleMode::Rad => x,
        }
    }
}

impl fmt::Display for AngleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AngleMode::Deg => f.write_str("DEG"),
            AngleMode::Rad => f.write_str("RAD"),
        }
    }
}

impl FromStr for AngleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEG" => Ok(AngleMode::Deg),
            "RAD" => Ok(AngleMode::Rad),
            _ => Err(format!("unknown angle mode '{s}' (expected DEG or RAD)")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrigFn {
    Sin,
    Cos,
    Tan,
    Cot,
    Sec,
    Csc,

    Asin,
    Acos,
    Atan,
    Acot,
    Asec,
    Acsc,
}

impl TrigFn {
    pub fn from_name(name: &str) -> Option<TrigFn> {
        let f = match name {
            "sin" => TrigFn::Sin,
            "cos" => TrigFn::Cos,
            "tan" => TrigFn::Tan,
            "cot" => TrigFn::Cot,
            "sec" => TrigFn::Sec,
            "csc" => TrigFn::Csc,
            "asin" => TrigFn::Asin,
            "acos" => TrigFn::Acos,
            "atan" => TrigFn::Atan,
            "acot" => TrigFn::Acot,
            "asec" => TrigFn::Asec,
            "acsc" => TrigFn::Acsc,
            _ => return None,
        };
        Some(f)
    }

    pub fn name(self) -> &'static str {
        match self {
            TrigFn::Sin => "sin",
            TrigFn::Cos => "cos",
            TrigFn::Tan => "tan",
            TrigFn::Cot => "cot",
            TrigFn::Sec => "sec",
            TrigFn::Csc => "csc",
            TrigFn::Asin => "asin",
            TrigFn::Acos => "acos",
            TrigFn::Atan => "atan",
            TrigFn::Acot => "acot",
            TrigFn::Asec => "asec",
            TrigFn::Acsc => "acsc",
        }
    }

    pub fn is_inverse(self) -> bool {
        matches!(
            self,
            TrigFn::Asin | TrigFn::Acos | TrigFn::Atan | TrigFn::Acot | TrigFn::Asec | TrigFn::Acsc
        )
    }

    /// Applique la fonction en tenant compte du mode d’angle.
    pub fn apply(self, x: f64, mode: AngleMode) -> f64 {
        if self.is_inverse() {
            return mode.depuis_radians(self.radians(x));
        }
        self.radians(mode.vers_radians(x))
    }

    /// Sémantique radian native.
    fn radians(self, x: f64) -> f64 {
        match self {
            TrigFn::Sin => x.sin(),
            TrigFn::Cos => x.cos(),
            TrigFn::Tan => x.tan(),
            TrigFn::Cot => 1.0 / x.tan(),
            TrigFn::Sec => 1.0 / x.cos(),
            TrigFn::Csc => 1.0 / x.sin(),

            TrigFn::Asin => asin_reel(x),
            TrigFn::Acos => acos_reel(x),
            TrigFn::Atan => x.atan(),
            TrigFn::Acot => (1.0 / x).atan(),
            TrigFn::Asec => acos_reel(1.0 / x),
            TrigFn::Acsc => asin_reel(1.0 / x),
        }
    }
}

/* ------------------------ Inverses : partie réelle ------------------------ */

/// asin sur ℝ : hors [-1, 1], Re(asin(x)) = ±π/2.
fn asin_reel(x: f64) -> f64 {
    if x > 1.0 {
        FRAC_PI_2
    } else if x < -1.0 {
        -FRAC_PI_2
    } else {
        x.asin()
    }
}

/// acos sur ℝ : hors [-1, 1], Re(acos(x)) = 0 (x > 1) ou π (x < -1).
fn acos_reel(x: f64) -> f64 {
    if x > 1.0 {
        0.0
    } else if x < -1.0 {
        PI
    } else {
        x.acos()
    }
}
