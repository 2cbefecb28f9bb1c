// src/main.rs
//
// Calculatrice scientifique — point d’entrée terminal
// ---------------------------------------------------
// - Journal : tracing-subscriber, filtre RUST_LOG (défaut : warn), sur stderr
// - Données : --data-dir, CALCULATRICE_DATA_DIR, sinon <data_dir>/calculatrice
// - Sortie  : résultats sur stdout, erreurs via anyhow (code de sortie 1)

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use calculatrice_sci::app::{
    dossier_donnees, Cli, Commande, FileSession, HistoryAction, MemoryAction,
};
use calculatrice_sci::stockage::HistoryEntry;

fn installer_journal() {
    let filtre = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filtre)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    installer_journal();

    let cli = Cli::parse();
    let dossier = dossier_donnees(&cli).ok_or_else(|| {
        anyhow!("no data directory available; pass --data-dir or set CALCULATRICE_DATA_DIR")
    })?;
    let mut session = FileSession::open(&dossier)
        .with_context(|| format!("cannot open data directory {}", dossier.display()))?;

    executer(&mut session, cli.commande)
}

fn executer(session: &mut FileSession, commande: Commande) -> Result<()> {
    let options = commande.eval_options();

    match commande {
        Commande::Eval { expression, .. } => {
            let options = options.unwrap_or_default();
            let c = session.evaluate(&expression, options)?;
            if let Some(d) = &c.steps {
                println!("jetons : {}", d.jetons);
                println!("RPN    : {}", d.rpn);
                println!("arbre  : {}", d.arbre);
            }
            println!("{}", c.display);
        }

        Commande::Validate { expression } => {
            session.validate(&expression)?;
            println!("ok");
        }

        Commande::Convert { value, from, to } => {
            let c = session.convert(value, &from, &to)?;
            println!("{} {to}", c.display);
        }

        Commande::Units { category } => match category {
            Some(cat) => println!("{}", session.units(cat).join(" ")),
            None => {
                for cat in session.categories() {
                    println!("{cat}: {}", session.units(*cat).join(" "));
                }
            }
        },

        Commande::History { action } => match action.unwrap_or(HistoryAction::List) {
            HistoryAction::List => {
                for groupe in session.history().grouped(&Local::now()) {
                    println!("{}", groupe.title);
                    for e in &groupe.entries {
                        afficher_entree(e);
                    }
                }
            }
            HistoryAction::Search { query } => {
                for e in session.history().search(&query) {
                    afficher_entree(e);
                }
            }
            HistoryAction::Remove { id } => {
                if !session.history_mut().remove(&id)? {
                    return Err(anyhow!("no history entry with id {id}"));
                }
            }
            HistoryAction::Clear => session.history_mut().clear()?,
        },

        Commande::Memory { action } => {
            match action {
                MemoryAction::Add { value } => {
                    let v = valeur_ou_dernier(session, value)?;
                    session.memory_add(&v)?;
                }
                MemoryAction::Sub { value } => {
                    let v = valeur_ou_dernier(session, value)?;
                    session.memory_sub(&v)?;
                }
                MemoryAction::Recall => {}
                MemoryAction::Clear => session.memory_clear()?,
            }
            println!("M = {}", session.memory_display()?);
        }

        Commande::Settings {
            decimals,
            separator,
            angle,
        } => {
            let s = if decimals.is_none() && separator.is_none() && angle.is_none() {
                session.settings()?
            } else {
                session.update_settings(|s| {
                    if let Some(n) = decimals {
                        *s = s.with_decimal_places(n);
                    }
                    if let Some(sep) = separator {
                        s.thousands_separator = sep.into();
                    }
                    if let Some(a) = angle {
                        s.angle_mode = a.into();
                    }
                })?
            };
            println!("decimals  = {}", s.decimal_places);
            println!("separator = {}", if s.thousands_separator { "on" } else { "off" });
            println!("angle     = {}", s.angle_mode);
        }
    }

    Ok(())
}

/// Valeur donnée, sinon dernier résultat de l’historique.
fn valeur_ou_dernier(session: &FileSession, value: Option<String>) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => session
            .last_result()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("no previous result; pass a value")),
    }
}

fn afficher_entree(e: &HistoryEntry) {
    println!("  {}  {} = {}", e.id, e.expression, e.result);
}
