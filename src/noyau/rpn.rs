// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> AST
// Objectif:
// - Convertir une suite de Tok en RPN (postfix)
// - Puis reconstruire Expr
//
// Règles:
// - Ident(name) suivi de '(' => fonction (sortie en RPN sous Appel(name, nb_args))
// - Ident(name) sinon         => constante (pi, PI, e, E), résolue dans from_rpn
// - Moins unaire => Tok::Neg (préfixe, plus fort que * /, plus faible que ^)
// - Plus unaire  => ignoré
// - '!' postfixe => sort immédiatement (plus fort que tout)
//
// Précédences : + - (1) < * / % (2) < neg (3) < ^ (4, associatif à droite)

use super::expr::{Expr, Fonction};
use super::jetons::Tok;

fn precedence(t: &Tok) -> i32 {
    match t {
        Tok::Plus | Tok::Minus => 1,
        Tok::Star | Tok::Slash | Tok::Percent => 2,
        Tok::Neg => 3,
        Tok::Caret => 4,
        _ => 0,
    }
}

fn is_right_associative(t: &Tok) -> bool {
    matches!(t, Tok::Caret | Tok::Neg)
}

fn est_operateur(t: &Tok) -> bool {
    precedence(t) > 0
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Ident("nthRoot"), LPar, Num(16), Comma, Num(4), RPar]
///   rpn:    [Num(16), Num(4), Appel("nthRoot", 2)]
pub fn to_rpn(tokens: &[Tok]) -> Result<Vec<Tok>, String> {
    let mut out: Vec<Tok> = Vec::new();
    let mut ops: Vec<Tok> = Vec::new();

    // Un compteur d’arguments par appel de fonction ouvert.
    let mut args: Vec<usize> = Vec::new();

    // “valeur” = un atome ou une expression fermée.
    // Sert à détecter les opérateurs unaires.
    let mut prev_was_value = false;

    for (i, tok) in tokens.iter().enumerate() {
        let suivant = tokens.get(i + 1);

        match tok {
            Tok::Num(_) => {
                if prev_was_value {
                    return Err("unexpected number".into());
                }
                out.push(tok.clone());
                prev_was_value = true;
            }

            Tok::Ident(name) => {
                if prev_was_value {
                    return Err(format!("unexpected symbol {name}"));
                }
                if matches!(suivant, Some(Tok::LPar)) {
                    // fonction : reste sur la pile jusqu’à sa parenthèse fermante
                    ops.push(tok.clone());
                    prev_was_value = false;
                } else {
                    out.push(tok.clone());
                    prev_was_value = true;
                }
            }

            Tok::LPar => {
                if let Some(Tok::Ident(_)) = ops.last() {
                    // ouverture d’un appel : 0 argument si ')' suit directement
                    let n = if matches!(suivant, Some(Tok::RPar)) { 0 } else { 1 };
                    args.push(n);
                }
                ops.push(Tok::LPar);
                prev_was_value = false;
            }

            Tok::Comma => {
                if !prev_was_value {
                    return Err("missing argument before ','".into());
                }
                depiler_jusqua_parenthese(&mut ops, &mut out).map_err(|_| "unexpected ','")?;
                // la virgule n’est permise que dans un appel
                let dans_appel = ops.len() >= 2 && matches!(ops[ops.len() - 2], Tok::Ident(_));
                match args.last_mut() {
                    Some(n) if dans_appel => *n += 1,
                    _ => return Err("unexpected ','".into()),
                }
                prev_was_value = false;
            }

            Tok::RPar => {
                if !prev_was_value && !matches!(tokens.get(i.wrapping_sub(1)), Some(Tok::LPar)) {
                    return Err("unexpected ')'".into());
                }
                depiler_jusqua_parenthese(&mut ops, &mut out)?;
                ops.pop(); // '('

                // si une fonction est au sommet, on la sort avec son nombre d’arguments
                if let Some(Tok::Ident(_)) = ops.last() {
                    if let Some(Tok::Ident(name)) = ops.pop() {
                        let n = args.pop().unwrap_or(0);
                        out.push(Tok::Appel(name, n));
                    }
                } else if !prev_was_value {
                    return Err("empty parentheses".into());
                }

                prev_was_value = true;
            }

            Tok::Bang => {
                if !prev_was_value {
                    return Err("unexpected '!'".into());
                }
                out.push(Tok::Bang);
            }

            Tok::Plus | Tok::Minus if !prev_was_value => {
                // unaire
                if matches!(tok, Tok::Minus) {
                    ops.push(Tok::Neg);
                }
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Percent | Tok::Caret => {
                if !prev_was_value {
                    return Err(format!("unexpected operator '{}'", symbole(tok)));
                }

                while let Some(top) = ops.last() {
                    // bloqué par '(' ou par une fonction
                    if !est_operateur(top) {
                        break;
                    }

                    let p_top = precedence(top);
                    let p_tok = precedence(tok);

                    let doit_pop = if is_right_associative(tok) {
                        p_top > p_tok
                    } else {
                        p_top >= p_tok
                    };

                    if doit_pop {
                        if let Some(op) = ops.pop() {
                            out.push(op);
                        }
                    } else {
                        break;
                    }
                }

                ops.push(tok.clone());
                prev_was_value = false;
            }

            Tok::Neg | Tok::Appel(_, _) => return Err("unexpected token".into()),
        }
    }

    if !prev_was_value {
        return Err("unexpected end of expression".into());
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        if matches!(op, Tok::LPar) {
            return Err("unclosed parenthesis".into());
        }
        out.push(op);
    }

    Ok(out)
}

/// Sort les opérateurs jusqu’à la '(' la plus proche (laissée sur la pile).
fn depiler_jusqua_parenthese(ops: &mut Vec<Tok>, out: &mut Vec<Tok>) -> Result<(), String> {
    loop {
        match ops.last() {
            Some(Tok::LPar) => return Ok(()),
            Some(_) => {
                if let Some(op) = ops.pop() {
                    out.push(op);
                }
            }
            None => return Err("unbalanced parenthesis".into()),
        }
    }
}

fn symbole(t: &Tok) -> &'static str {
    match t {
        Tok::Plus => "+",
        Tok::Minus => "-",
        Tok::Star => "*",
        Tok::Slash => "/",
        Tok::Percent => "%",
        Tok::Caret => "^",
        _ => "?",
    }
}

/// Hauteur maximale de l’arbre : evaluer() et Display sont récursifs.
pub const PROFONDEUR_MAX: usize = 256;

/// Construit une Expr à partir d’une RPN.
///
/// - Ident(name)        => constante (pi, PI, e, E) sinon symbole inconnu
/// - Appel(name, n)     => fonction connue + arité vérifiée
/// - hauteur de l’arbre bornée par PROFONDEUR_MAX
pub fn from_rpn(rpn: &[Tok]) -> Result<Expr, String> {
    // (sous-arbre, hauteur)
    let mut st: Vec<(Expr, usize)> = Vec::new();

    for tok in rpn.iter().cloned() {
        match tok {
            Tok::Num(v) => st.push((Expr::Num(v), 1)),

            Tok::Ident(name) => {
                let e = match name.as_str() {
                    "pi" | "PI" => Expr::Pi,
                    "e" | "E" => Expr::E,
                    _ => return Err(format!("undefined symbol {name}")),
                };
                st.push((e, 1));
            }

            Tok::Neg => {
                let (x, h) = depiler(&mut st)?;
                empiler(&mut st, Expr::Neg(Box::new(x)), h + 1)?;
            }

            Tok::Bang => {
                let (x, h) = depiler(&mut st)?;
                empiler(&mut st, Expr::Fact(Box::new(x)), h + 1)?;
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Percent | Tok::Caret => {
                let (b, hb) = depiler(&mut st)?;
                let (a, ha) = depiler(&mut st)?;
                let (a, b) = (Box::new(a), Box::new(b));

                let e = match tok {
                    Tok::Plus => Expr::Add(a, b),
                    Tok::Minus => Expr::Sub(a, b),
                    Tok::Star => Expr::Mul(a, b),
                    Tok::Slash => Expr::Div(a, b),
                    Tok::Percent => Expr::Mod(a, b),
                    _ => Expr::Pow(a, b),
                };
                empiler(&mut st, e, ha.max(hb) + 1)?;
            }

            Tok::Appel(name, n) => {
                let f = Fonction::from_name(&name)
                    .ok_or_else(|| format!("undefined function {name}"))?;

                let (min, max) = f.arite();
                if n < min || n > max {
                    return Err(format!(
                        "wrong number of arguments for {name} (expected {}, got {n})",
                        if min == max {
                            min.to_string()
                        } else {
                            format!("{min} to {max}")
                        }
                    ));
                }
                if st.len() < n {
                    return Err("missing operand".into());
                }
                let args = st.split_off(st.len() - n);
                let h = args.iter().map(|(_, h)| *h).max().unwrap_or(0);
                let argv = args.into_iter().map(|(e, _)| e).collect();
                empiler(&mut st, Expr::Appel(f, argv), h + 1)?;
            }

            Tok::LPar | Tok::RPar | Tok::Comma => {
                return Err("unexpected parenthesis in RPN".into())
            }
        }
    }

    if st.len() > 1 {
        return Err("unexpected operand".into());
    }
    st.pop()
        .map(|(e, _)| e)
        .ok_or_else(|| "missing operand".into())
}

fn depiler(st: &mut Vec<(Expr, usize)>) -> Result<(Expr, usize), String> {
    st.pop().ok_or_else(|| "missing operand".into())
}

fn empiler(st: &mut Vec<(Expr, usize)>, e: Expr, hauteur: usize) -> Result<(), String> {
    if hauteur > PROFONDEUR_MAX {
        return Err("expression too deeply nested".into());
    }
    st.push((e, hauteur));
    Ok(())
}
