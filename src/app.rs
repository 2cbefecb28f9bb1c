// src/app.rs
//
// Calculatrice scientifique — module App (racine)
// ----------------------------------------------
// Rôle:
// - Déclarer le sous-module etat.rs (Session)
// - Décrire la ligne de commande (clap)
//
// Aucun calcul ici : main.rs lit `Cli`, ouvre une Session et affiche.

pub mod etat;

pub use etat::{Calcul, Conversion, EvalOptions, FileSession, MemorySession, Session, SessionError};

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::conversion::UnitCategory;
use crate::noyau::AngleMode;

/// Dossier par défaut sous le répertoire de données de l’utilisateur.
pub const DOSSIER_DONNEES: &str = "calculatrice";

/// Variable d’environnement qui remplace le dossier de données.
pub const ENV_DONNEES: &str = "CALCULATRICE_DATA_DIR";

/// Calculatrice scientifique en ligne de commande.
#[derive(Parser, Debug)]
#[command(name = "calculatrice")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Dossier de l’historique, des réglages et du registre mémoire
    #[arg(long, global = true, env = ENV_DONNEES, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub commande: Commande,
}

#[derive(Subcommand, Debug)]
pub enum Commande {
    /// Évaluer une expression
    Eval {
        expression: String,

        /// Mode d’angle pour ce calcul (sinon celui des réglages)
        #[arg(long, value_enum)]
        angle: Option<Angle>,

        /// Décimales affichées (0..=15)
        #[arg(long, value_name = "N")]
        decimals: Option<usize>,

        /// Pas de séparateur de milliers
        #[arg(long)]
        no_separator: bool,

        /// Afficher jetons, RPN et arbre
        #[arg(long)]
        steps: bool,

        /// Ne pas noter le calcul dans l’historique
        #[arg(long)]
        no_history: bool,
    },

    /// Vérifier une expression sans l’évaluer
    Validate { expression: String },

    /// Convertir une valeur d’une unité à une autre
    Convert {
        #[arg(allow_negative_numbers = true)]
        value: f64,
        from: String,
        to: String,
    },

    /// Lister les unités (toutes, ou d’une catégorie)
    Units {
        #[arg(value_parser = parse_categorie)]
        category: Option<UnitCategory>,
    },

    /// Consulter ou modifier l’historique
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },

    /// Registre mémoire (M+, M-, MR, MC)
    Memory {
        #[command(subcommand)]
        action: MemoryAction,
    },

    /// Afficher ou modifier les réglages
    Settings {
        /// Décimales affichées (0..=15)
        #[arg(long, value_name = "N")]
        decimals: Option<usize>,

        #[arg(long, value_enum)]
        separator: Option<Interrupteur>,

        #[arg(long, value_enum)]
        angle: Option<Angle>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum HistoryAction {
    /// Entrées groupées par jour (par défaut)
    List,
    /// Recherche sans casse dans les expressions et les résultats
    Search { query: String },
    /// Retirer une entrée
    Remove { id: String },
    /// Tout effacer
    Clear,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum MemoryAction {
    /// M+ : ajouter un résultat (par défaut le dernier de l’historique)
    Add {
        #[arg(allow_hyphen_values = true)]
        value: Option<String>,
    },
    /// M- : retrancher un résultat (par défaut le dernier de l’historique)
    Sub {
        #[arg(allow_hyphen_values = true)]
        value: Option<String>,
    },
    /// MR : afficher le registre
    Recall,
    /// MC : remettre le registre à zéro
    Clear,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Angle {
    Deg,
    Rad,
}

impl From<Angle> for AngleMode {
    fn from(a: Angle) -> Self {
        match a {
            Angle::Deg => AngleMode::Deg,
            Angle::Rad => AngleMode::Rad,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interrupteur {
    On,
    Off,
}

impl From<Interrupteur> for bool {
    fn from(i: Interrupteur) -> Self {
        i == Interrupteur::On
    }
}

fn parse_categorie(s: &str) -> Result<UnitCategory, String> {
    s.parse().map_err(|e: crate::conversion::ConversionError| e.to_string())
}

/// `--data-dir` / variable d’environnement, sinon `<data_dir>/calculatrice`.
pub fn dossier_donnees(cli: &Cli) -> Option<PathBuf> {
    cli.data_dir
        .clone()
        .or_else(|| dirs::data_dir().map(|d| d.join(DOSSIER_DONNEES)))
}

impl Commande {
    /// Options de calcul d’une commande `eval`.
    pub fn eval_options(&self) -> Option<EvalOptions> {
        match self {
            Commande::Eval {
                angle,
                decimals,
                no_separator,
                steps,
                no_history,
                ..
            } => Some(EvalOptions {
                angle_mode: angle.map(AngleMode::from),
                decimal_places: *decimals,
                thousands_separator: no_separator.then_some(false),
                steps: *steps,
                record: !no_history,
            }),
            _ => None,
        }
    }
}
