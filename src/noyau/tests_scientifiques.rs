//! Tests scientifiques (campagne) : invariants + robustesse + limites contrôlées.
//!
//! But : vérifier des identités mathématiques à travers tout le pipeline
//! (texte -> jetons -> RPN -> Expr -> f64), pas fonction par fonction.
//! - budget temps global
//! - tolérances explicites (approx)
//! - les deux modes d’angle

use std::time::{Duration, Instant};

use approx::{assert_abs_diff_eq, assert_relative_eq};

use super::format::{FormatOptions, NumberFormatter};
use super::trig::AngleMode;
use super::{evaluate_expression, EvalError, Validator};

fn deg(expr: &str) -> f64 {
    evaluate_expression(expr, AngleMode::Deg).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
}

fn rad(expr: &str) -> f64 {
    evaluate_expression(expr, AngleMode::Rad).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Trigonométrie ------------------------ */

#[test]
fn sci_pythagore_tous_les_degres() {
    let t0 = Instant::now();
    for a in (-360..=360).step_by(5) {
        budget(t0, Duration::from_millis(500));
        let v = deg(&format!("sin({a})^2 + cos({a})^2"));
        assert_abs_diff_eq!(v, 1.0, epsilon = 1e-12);
    }
}

#[test]
fn sci_angles_remarquables_en_degres() {
    assert_abs_diff_eq!(deg("sin(90)"), 1.0, epsilon = 1e-15);
    assert_abs_diff_eq!(deg("cos(180)"), -1.0, epsilon = 1e-15);
    assert_abs_diff_eq!(deg("tan(45)"), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(deg("sec(60)"), 2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(deg("csc(30)"), 2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(deg("cot(45)"), 1.0, epsilon = 1e-12);
}

#[test]
fn sci_symetries_et_periodicite() {
    for a in [10, 25, 33, 60, 89] {
        assert_abs_diff_eq!(deg(&format!("sin(-{a})")), -deg(&format!("sin({a})")), epsilon = 1e-12);
        assert_abs_diff_eq!(deg(&format!("cos(-{a})")), deg(&format!("cos({a})")), epsilon = 1e-12);
        assert_abs_diff_eq!(deg(&format!("sin({a} + 360)")), deg(&format!("sin({a})")), epsilon = 1e-12);
        assert_abs_diff_eq!(rad(&format!("cos({a} + 2pi)")), rad(&format!("cos({a})")), epsilon = 1e-9);
    }
}

#[test]
fn sci_inverses_aller_retour() {
    for a in (-90..=90).step_by(10) {
        assert_abs_diff_eq!(deg(&format!("asin(sin({a}))")), a as f64, epsilon = 1e-9);
    }
    for a in (0..=180).step_by(10) {
        assert_abs_diff_eq!(deg(&format!("acos(cos({a}))")), a as f64, epsilon = 1e-9);
    }
    for a in (-80..=80).step_by(20) {
        assert_abs_diff_eq!(deg(&format!("atan(tan({a}))")), a as f64, epsilon = 1e-9);
    }
}

#[test]
fn sci_mode_deg_equivaut_a_rad_converti() {
    for a in [15.0_f64, 30.0, 72.5, 135.0] {
        let r = a.to_radians();
        assert_abs_diff_eq!(deg(&format!("tan({a})")), rad(&format!("tan({r})")), epsilon = 1e-9);
    }
    assert_abs_diff_eq!(deg("atan(1)"), rad("atan(1)") * 180.0 / std::f64::consts::PI, epsilon = 1e-12);
}

/* ------------------------ Logarithmes, puissances, racines ------------------------ */

#[test]
fn sci_log_exp_inverses() {
    for x in ["0.5", "1", "2", "10", "1234.5"] {
        assert_relative_eq!(deg(&format!("exp(ln({x}))")), x.parse::<f64>().unwrap(), max_relative = 1e-12);
        assert_relative_eq!(deg(&format!("10^log10({x})")), x.parse::<f64>().unwrap(), max_relative = 1e-12);
    }
    assert_abs_diff_eq!(deg("log(e)"), 1.0, epsilon = 1e-15);
    assert_abs_diff_eq!(deg("log2(1024)"), 10.0, epsilon = 1e-12);
    assert_abs_diff_eq!(deg("log(81, 3)"), 4.0, epsilon = 1e-12);
}

#[test]
fn sci_racines() {
    assert_abs_diff_eq!(deg("cbrt(-27)"), -3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(deg("nthRoot(81, 4)"), 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(deg("nthRoot(2)^2"), 2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(deg("sqrt(3^2 + 4^2)"), 5.0, epsilon = 1e-12);
    assert_eq!(
        evaluate_expression("nthRoot(-16, 4)", AngleMode::Deg).map_err(|e| e.is_caller_raised()),
        Err(false)
    );
}

/* ------------------------ Factorielle ------------------------ */

#[test]
fn sci_factorielle_recurrence() {
    for n in 1..=20 {
        let a = deg(&format!("{n}!"));
        let b = deg(&format!("{n} * ({} )!", n - 1));
        assert_eq!(a, b, "n={n}");
    }
    // 20! tient exactement dans un f64
    assert_eq!(deg("20!"), 2_432_902_008_176_640_000.0);
    // 170! est la dernière factorielle finie
    assert!(deg("170!").is_finite());
}

#[test]
fn sci_factorielle_gamma_continue() {
    // Γ(x+1) = x·Γ(x) aussi pour les non-entiers
    for x in [0.5, 1.5, 2.25, 3.75] {
        assert_relative_eq!(deg(&format!("{x}!")), x * deg(&format!("({x} - 1)!")), max_relative = 1e-10);
    }
}

/* ------------------------ Erreurs : classement stable ------------------------ */

#[test]
fn sci_classement_des_erreurs() {
    let cas: [(&str, fn(&EvalError) -> bool); 5] = [
        ("1/0", |e| *e == EvalError::NonFinite),
        ("-1/0", |e| *e == EvalError::NonFinite),
        ("sqrt(-4)", |e| matches!(e, EvalError::NonNumeric(_))),
        ("log(-2, 10)", |e| matches!(e, EvalError::NonNumeric(_))),
        ("sin()", |e| matches!(e, EvalError::Invalid(_))),
    ];
    for (expr, attendu) in cas {
        let e = evaluate_expression(expr, AngleMode::Rad).unwrap_err();
        assert!(attendu(&e), "expr={expr:?} err={e:?}");
    }
}

/* ------------------------ Chaîne complète : évaluation + affichage ------------------------ */

#[test]
fn sci_affichage_des_resultats() {
    let nf = NumberFormatter::new();
    let o = FormatOptions::default();

    assert_eq!(nf.format(deg("2 + 3 * 4"), &o), "14");
    assert_eq!(nf.format(deg("1000 * 1000"), &o), "1,000,000");
    assert_eq!(nf.format(deg("1/3"), &o), "0.3333333333");
    assert_eq!(nf.format(deg("10^20 * 1.5"), &o), "1.5e+20");
    // sin(180°) vaut 1.2e-16 en binaire : on arrondit avant d’afficher
    assert_eq!(nf.format(deg("round(sin(180), 10)"), &o), "0");
    assert_eq!(nf.format(deg("-round(cos(90), 10)"), &o), "0");
}

#[test]
fn sci_stress_longueur_bornee() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    // 1 + 1 + … (250 termes), gauche-associatif : profondeur d’arbre 250
    let expr = vec!["1"; 250].join(" + ");
    budget(t0, max);
    assert_eq!(deg(&expr), 250.0);

    // parenthèses imbriquées (profondeur 200)
    let expr = format!("{}2{}", "(".repeat(200), ")".repeat(200));
    assert_eq!(deg(&expr), 2.0);
    budget(t0, max);
}

#[test]
fn sci_profondeur_excessive_refusee() {
    let t0 = Instant::now();

    // acceptée par le validateur, refusée à l’analyse : jamais de débordement de pile
    let expr = vec!["1"; 100_000].join("+");
    assert!(Validator::new().is_valid(&expr));
    match evaluate_expression(&expr, AngleMode::Deg) {
        Err(EvalError::Invalid(cause)) => assert_eq!(cause, "expression too deeply nested"),
        r => panic!("attendu Invalid, obtenu {r:?}"),
    }
    budget(t0, Duration::from_secs(5));
}
