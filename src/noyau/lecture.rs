// src/noyau/lecture.rs
//
// Lecture décimale exacte d’un f64
// --------------------------------
// Un f64 fini est un rationnel exact (m·2^k). On arrondit ce rationnel,
// pas son écriture décimale courte : 3.145 vaut 3.14500000000000001776…
// donc 3.15 à deux décimales, comme les conversions à virgule fixe des
// navigateurs.
//
// Arrondi : demi-écart vers l’extérieur (BigRational::round).

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

/* ------------------------ Décimal (scaled -> texte) ------------------------ */

fn pow10(n: usize) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

/// 10^k pour k signé.
fn pow10_rat(k: i64) -> BigRational {
    let p = BigRational::from_integer(pow10(k.unsigned_abs() as usize));
    if k < 0 {
        p.recip()
    } else {
        p
    }
}

/// Valeur exacte d’un f64 fini.
pub fn exact(v: f64) -> Option<BigRational> {
    BigRational::from_float(v)
}

/// round(r × 10^digits), demi-écart vers l’extérieur.
pub fn arrondi_scaled(r: &BigRational, digits: usize) -> BigInt {
    (r * BigRational::from_integer(pow10(digits))).round().to_integer()
}

/// Convertit un entier “scalé” (×10^digits) en texte décimal.
/// Zéro n’a jamais de signe.
pub fn scaled_to_decimal(mut scaled: BigInt, digits: usize) -> String {
    let neg = scaled.is_negative();
    if neg {
        scaled = -scaled;
    }

    let scale = pow10(digits);
    let int_part = &scaled / &scale;
    let frac_part = &scaled % &scale;
    let signe = if neg { "-" } else { "" };

    if digits == 0 {
        return format!("{signe}{int_part}");
    }

    let mut frac = frac_part.to_str_radix(10);
    while frac.len() < digits {
        frac.insert(0, '0');
    }

    format!("{signe}{int_part}.{frac}")
}

/// Virgule fixe : `digits` décimales, toujours présentes.
pub fn virgule_fixe(v: f64, digits: usize) -> String {
    match exact(v) {
        Some(r) => scaled_to_decimal(arrondi_scaled(&r, digits), digits),
        None => format!("{v}"),
    }
}

/* ------------------------ Notation exponentielle ------------------------ */

/// Mantisse scalée et exposant : v ≈ (mantisse / 10^digits) × 10^exposant,
/// avec 10^digits ≤ |mantisse| < 10^(digits+1). Zéro donne (0, 0).
pub fn exponentielle(r: &BigRational, digits: usize) -> (BigInt, i64) {
    if r.is_zero() {
        return (BigInt::zero(), 0);
    }

    let abs = r.abs();

    // estimation par le nombre de chiffres, puis correction d’un cran
    let chiffres = |n: &BigInt| n.to_str_radix(10).len() as i64;
    let mut exposant = chiffres(abs.numer()) - chiffres(abs.denom());
    if abs < pow10_rat(exposant) {
        exposant -= 1;
    }

    let mut mantisse = arrondi_scaled(&(r / pow10_rat(exposant)), digits);

    // 9.99…5 arrondi à 10.0… : on décale
    if mantisse.abs() >= pow10(digits + 1) {
        mantisse /= 10;
        exposant += 1;
    }

    (mantisse, exposant)
}

/* ------------------------ Lecture de texte ------------------------ */

/// Lit le plus long préfixe numérique (blancs de tête ignorés) :
/// signe, chiffres, point, exposant, ou "Infinity". Sinon NaN.
///
/// "12abc" => 12, "-.5e2x" => -50, "1e" => 1, "abc" => NaN.
pub fn lire_prefixe(s: &str) -> f64 {
    let s = s.trim_start();
    let b = s.as_bytes();
    let mut i = 0;

    if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
        i += 1;
    }

    if s[i..].starts_with("Infinity") {
        return if b.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let debut_chiffres = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let mut nb_chiffres = i - debut_chiffres;

    if i < b.len() && b[i] == b'.' {
        let apres_point = i + 1;
        let mut j = apres_point;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        nb_chiffres += j - apres_point;
        if nb_chiffres > 0 {
            i = j;
        }
    }

    if nb_chiffres == 0 {
        return f64::NAN;
    }

    // exposant seulement s’il est complet
    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        let mut j = i + 1;
        if j < b.len() && (b[j] == b'+' || b[j] == b'-') {
            j += 1;
        }
        let debut = j;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        if j > debut {
            i = j;
        }
    }

    s[..i].parse::<f64>().unwrap_or(f64::NAN)
}
