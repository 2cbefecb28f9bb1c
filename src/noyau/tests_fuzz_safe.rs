//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler validation + évaluation + affichage sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - invariant clé : une expression acceptée par le validateur n’échoue
//!   jamais à l’analyse (seulement non fini / non numérique)

use std::time::{Duration, Instant};

use super::format::{FormatOptions, NumberFormatter};
use super::trig::AngleMode;
use super::{evaluate_expression, EvalError, Validator};

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
    /// Flottant “lisible” dans [-mag, mag], au plus 4 décimales.
    fn nombre(&mut self, mag: u32) -> f64 {
        let entier = self.pick(mag + 1) as f64;
        let frac = self.pick(10_000) as f64 / 10_000.0;
        let v = entier + frac;
        if self.coin() {
            -v
        } else {
            v
        }
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

const FONCTIONS_1: &[&str] = &[
    "sin", "cos", "tan", "asin", "acos", "atan", "sinh", "cosh", "tanh", "ln", "log10", "log2",
    "exp", "sqrt", "cbrt", "abs", "ceil", "floor", "round", "sign",
];

fn gen_atom(rng: &mut Rng) -> String {
    match rng.pick(6) {
        0 => "pi".to_string(),
        1 => "e".to_string(),
        2 => format!("{}", rng.pick(10)),
        _ => {
            // littéral positif ; le signe passe par gen_expr
            let v = rng.nombre(100).abs();
            format!("{v}")
        }
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atom(rng);
    }

    let a = gen_expr(rng, depth - 1);
    match rng.pick(10) {
        0 => a,
        1 => format!("({a} + {})", gen_expr(rng, depth - 1)),
        2 => format!("({a} - {})", gen_expr(rng, depth - 1)),
        3 => format!("({a} * {})", gen_expr(rng, depth - 1)),
        4 => format!("({a} / {})", gen_expr(rng, depth - 1)),
        5 => format!("({a} % {})", gen_expr(rng, depth - 1)),
        6 => format!("({a})^{}", rng.pick(4)),
        7 => format!("(-{a})"),
        _ => {
            let f = FONCTIONS_1[rng.pick(FONCTIONS_1.len() as u32) as usize];
            format!("{f}({a})")
        }
    }
}

fn gen_bruit(rng: &mut Rng, len: usize) -> String {
    const ALPHABET: &[char] = &[
        '0', '1', '2', '9', '.', 'e', 'E', '+', '-', '*', '/', '%', '^', '!', '(', ')', ',', ' ',
        'p', 'i', 's', 'n', 'x', '√', 'π', '$',
    ];
    (0..len)
        .map(|_| ALPHABET[rng.pick(ALPHABET.len() as u32) as usize])
        .collect()
}

/* ------------------------ Helper somme balancée anti pile ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_validation_et_evaluation_d_accord() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let v = Validator::new();
    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..300 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4);
        assert!(v.is_valid(&expr), "généré mais refusé: {expr:?} ({:?})", v.validate(&expr));

        for mode in [AngleMode::Deg, AngleMode::Rad] {
            match evaluate_expression(&expr, mode) {
                Ok(r) => {
                    assert!(r.is_finite());
                    seen_ok += 1;
                }
                Err(e) => {
                    // jamais d’erreur d’analyse sur une expression validée
                    assert!(e.is_caller_raised(), "erreur non attendue: expr={expr:?} err={e}");
                    assert_ne!(e, EvalError::Empty);
                    seen_err += 1;
                }
            }
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 100, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_determinisme() {
    let run = || {
        let mut rng = Rng::new(0xBADC0DE_u64);
        (0..60)
            .map(|_| {
                let expr = gen_expr(&mut rng, 3);
                evaluate_expression(&expr, AngleMode::Deg).map(f64::to_bits)
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn fuzz_safe_bruit_sans_panique() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let v = Validator::new();
    let mut rng = Rng::new(0x5EED_u64);

    for _ in 0..2_000 {
        budget(t0, max);

        let len = rng.pick(24) as usize;
        let s = gen_bruit(&mut rng, len);

        // ni panique ni boucle : seul le résultat compte
        let _ = v.validate(&s);
        if let Ok(r) = evaluate_expression(&s, AngleMode::Rad) {
            assert!(r.is_finite(), "{s:?} => {r}");
        }
    }
}

#[test]
fn fuzz_safe_format_aller_retour() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    let nf = NumberFormatter::new();
    let o = FormatOptions::default();
    let mut rng = Rng::new(0xF0F0_u64);

    for _ in 0..1_000 {
        budget(t0, max);

        let x = rng.nombre(1_000_000);
        let s = nf.format(x, &o);
        assert_eq!(s, nf.format(x, &o), "format doit être pur");

        let back = nf.parse(&s);
        assert!((back - x).abs() <= 1e-10, "{x} -> {s:?} -> {back}");
    }
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_millis(200);

    let expr = somme_balancee("1/2", 800);
    budget(t0, max);

    let r = evaluate_expression(&expr, AngleMode::Deg).unwrap_or_else(|e| panic!("err: {e}"));

    // 800*(1/2) = 400
    assert_eq!(r, 400.0);
}
