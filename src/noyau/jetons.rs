// src/noyau/jetons.rs

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(f64),

    // Fonctions + constantes (tout ce qui n’est pas nombre / opérateur)
    // NOTE: l’analyse (rpn.rs) décide: suivi de '(' => fonction, sinon constante.
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Percent, // modulo
    Caret,   // ^
    Bang,    // ! (factorielle, postfixe)
    Comma,

    LPar,
    RPar,

    // Produits seulement par rpn.rs (jamais par tokenize)
    Neg,
    Appel(String, usize),
}

impl Tok {
    /// Fin d’une valeur : nombre, constante, ')' ou '!'.
    /// Un identifiant suivi de '(' est une fonction, pas une valeur.
    fn termine_valeur(&self, suivant: &Tok) -> bool {
        match self {
            Tok::Num(_) | Tok::RPar | Tok::Bang => true,
            Tok::Ident(_) => !matches!(suivant, Tok::LPar),
            _ => false,
        }
    }
}

/// Tokenize une chaîne en jetons.
/// Supporte:
/// - nombres décimaux (12, 3.14, .5) avec exposant optionnel (1e5, 2.5E-3)
/// - opérateurs + - * / % ^ ! et la virgule (arguments)
/// - parenthèses ( )
/// - π (=> ident "pi") et √ (=> ident "sqrt")
/// - identifiants [a-zA-Z_][a-zA-Z0-9_]* (casse conservée : nthRoot, PI…)
/// - multiplication implicite : 2pi, 2(3+1), (1)(2), sin(30)cos(60)
pub fn tokenize(s: &str) -> Result<Vec<Tok>, String> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    // √ sans parenthèse : √2 => sqrt(2), √sin(30) => sqrt(sin(30)).
    // On retient la profondeur de parenthèses à laquelle la racine s’est ouverte,
    // et on ferme dès qu’un atome complet termine à cette profondeur.
    let mut profondeur: usize = 0;
    let mut racines: Vec<usize> = Vec::new();

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let simple = match c {
            '(' => Some(Tok::LPar),
            ')' => Some(Tok::RPar),
            '+' => Some(Tok::Plus),
            '-' => Some(Tok::Minus),
            '*' => Some(Tok::Star),
            '/' => Some(Tok::Slash),
            '%' => Some(Tok::Percent),
            '^' => Some(Tok::Caret),
            '!' => Some(Tok::Bang),
            ',' => Some(Tok::Comma),
            'π' => Some(Tok::Ident("pi".to_string())),
            _ => None,
        };
        if let Some(t) = simple {
            i += 1;
            match t {
                Tok::LPar => profondeur += 1,
                Tok::RPar => profondeur = profondeur.saturating_sub(1),
                _ => {}
            }
            let atome = matches!(t, Tok::Ident(_) | Tok::RPar);
            out.push(t);
            if atome {
                fermer_racines(&mut out, &mut racines, profondeur);
            }
            continue;
        }

        if c == '√' {
            out.push(Tok::Ident("sqrt".to_string()));
            i += 1;
            if prochain_visible(&chars, i) != Some('(') {
                out.push(Tok::LPar);
                racines.push(profondeur);
            }
            continue;
        }

        // Identifiants ASCII
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            out.push(Tok::Ident(chars[start..i].iter().collect()));
            // une fonction se ferme avec sa parenthèse, pas ici
            if prochain_visible(&chars, i) != Some('(') {
                fermer_racines(&mut out, &mut racines, profondeur);
            }
            continue;
        }

        // Nombres : partie entière, partie décimale, exposant
        if c.is_ascii_digit() || (c == '.' && i + 1 < chars.len() && chars[i + 1].is_ascii_digit()) {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            if i < chars.len() && chars[i] == '.' {
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }

            // exposant seulement si un chiffre suit (sinon "2e" = 2·e)
            if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                let mut j = i + 1;
                if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                    j += 1;
                }
                if j < chars.len() && chars[j].is_ascii_digit() {
                    i = j;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
            }

            let txt: String = chars[start..i].iter().collect();
            let v = txt
                .parse::<f64>()
                .map_err(|_| format!("invalid number '{txt}'"))?;
            out.push(Tok::Num(v));
            fermer_racines(&mut out, &mut racines, profondeur);
            continue;
        }

        return Err(format!("unexpected character '{c}'"));
    }

    Ok(multiplication_implicite(out))
}

fn prochain_visible(chars: &[char], depuis: usize) -> Option<char> {
    chars.get(depuis..)?.iter().copied().find(|c| !c.is_whitespace())
}

fn fermer_racines(out: &mut Vec<Tok>, racines: &mut Vec<usize>, profondeur: usize) {
    while racines.last() == Some(&profondeur) {
        racines.pop();
        out.push(Tok::RPar);
    }
}

/// Insère '*' entre une fin de valeur et un début de valeur.
/// Deux nombres collés ne sont PAS multipliés (l’analyse les refusera).
fn multiplication_implicite(jetons: Vec<Tok>) -> Vec<Tok> {
    let mut out: Vec<Tok> = Vec::with_capacity(jetons.len());

    for t in &jetons {
        if let Some(prev) = out.last() {
            let debut_valeur = matches!(t, Tok::Ident(_) | Tok::LPar)
                || (matches!(t, Tok::Num(_)) && !matches!(prev, Tok::Num(_)));
            if debut_valeur && prev.termine_valeur(t) {
                out.push(Tok::Star);
            }
        }
        out.push(t.clone());
    }

    out
}

/// Format utilitaire (démarche) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    let mut out = Vec::new();
    for t in tokens {
        let s = match t {
            Tok::Num(v) => format!("{v}"),
            Tok::Ident(name) => name.clone(),

            Tok::Plus => "+".to_string(),
            Tok::Minus => "-".to_string(),
            Tok::Star => "*".to_string(),
            Tok::Slash => "/".to_string(),
            Tok::Percent => "%".to_string(),
            Tok::Caret => "^".to_string(),
            Tok::Bang => "!".to_string(),
            Tok::Comma => ",".to_string(),

            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),

            Tok::Neg => "neg".to_string(),
            Tok::Appel(name, n) => format!("{name}/{n}"),
        };
        out.push(s);
    }
    out.join(" ")
}
