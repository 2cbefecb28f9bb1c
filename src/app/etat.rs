//! src/app/etat.rs
//!
//! Session : le noyau + l’historique + les réglages + le registre mémoire.
//!
//! Rôle : enchaîner validation -> évaluation -> affichage avec les réglages
//! persistés, et noter chaque calcul réussi dans l’historique.
//!
//! Contrats :
//! - Une expression refusée par le validateur n’est jamais évaluée.
//! - Un échec (validation, évaluation) ne laisse aucune trace dans l’historique.
//! - Les surcharges d’un appel (`EvalOptions`) ne modifient pas les réglages.
//! - M+ / M- relisent un résultat affiché ; un texte non numérique est ignoré.

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::conversion::{ConversionError, UnitCategory, UnitConverter};
use crate::noyau::{
    AngleMode, Demarche, EvalError, Evaluator, FormatOptions, NumberFormatter, ValidationError,
    Validator,
};
use crate::stockage::historique::{CLE_HISTORIQUE, HistoryEntry, HistoryManager};
use crate::stockage::reglages::{CLE_REGLAGES, Settings, SettingsStore};
use crate::stockage::registre::{CLE_REGISTRE, MemoryRegister, RegisterStore};
use crate::stockage::{FileRepository, MemoryRepository, Repository, StorageError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Evaluation(#[from] EvalError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Surcharges ponctuelles d’un calcul.
#[derive(Clone, Copy, Debug)]
pub struct EvalOptions {
    pub angle_mode: Option<AngleMode>,
    pub decimal_places: Option<usize>,
    pub thousands_separator: Option<bool>,
    /// Garder jetons / RPN / arbre.
    pub steps: bool,
    /// Noter le calcul dans l’historique.
    pub record: bool,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            angle_mode: None,
            decimal_places: None,
            thousands_separator: None,
            steps: false,
            record: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Calcul {
    pub expression: String,
    pub value: f64,
    pub display: String,
    pub angle_mode: AngleMode,
    pub steps: Option<Demarche>,
    /// Entrée d’historique créée, le cas échéant.
    pub entry: Option<HistoryEntry>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Conversion {
    pub value: f64,
    pub display: String,
    /// `None` pour une identité sur un nom inconnu.
    pub category: Option<UnitCategory>,
}

pub type FileSession = Session<
    FileRepository<Vec<HistoryEntry>>,
    FileRepository<Settings>,
    FileRepository<MemoryRegister>,
>;
pub type MemorySession = Session<
    MemoryRepository<Vec<HistoryEntry>>,
    MemoryRepository<Settings>,
    MemoryRepository<MemoryRegister>,
>;

pub struct Session<H, S, M> {
    validator: Validator,
    evaluator: Evaluator,
    formatter: NumberFormatter,
    converter: UnitConverter,
    history: HistoryManager<H>,
    settings: SettingsStore<S>,
    memory: RegisterStore<M>,
}

impl FileSession {
    /// Historique et réglages dans `dir` (créé à la première écriture).
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, SessionError> {
        let dir = dir.as_ref();
        debug!(dir = %dir.display(), "opening session");
        Self::with_repositories(
            FileRepository::new(dir, CLE_HISTORIQUE),
            FileRepository::new(dir, CLE_REGLAGES),
            FileRepository::new(dir, CLE_REGISTRE),
        )
    }
}

impl MemorySession {
    pub fn in_memory() -> Result<Self, SessionError> {
        Self::with_repositories(MemoryRepository::new(), MemoryRepository::new(), MemoryRepository::new())
    }
}

impl<H, S, M> Session<H, S, M>
where
    H: Repository<Vec<HistoryEntry>>,
    S: Repository<Settings>,
    M: Repository<MemoryRegister>,
{
    pub fn with_repositories(history: H, settings: S, memory: M) -> Result<Self, SessionError> {
        Ok(Self {
            validator: Validator::new(),
            evaluator: Evaluator::new(),
            formatter: NumberFormatter::new(),
            converter: UnitConverter::new(),
            history: HistoryManager::new(history)?,
            settings: SettingsStore::new(settings),
            memory: RegisterStore::new(memory),
        })
    }

    /// Remplace le convertisseur (autres tables d’unités).
    pub fn with_converter(mut self, converter: UnitConverter) -> Self {
        self.converter = converter;
        self
    }

    /// Remplace le validateur (autre liste de motifs refusés).
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /* ------------------------ Calcul ------------------------ */

    pub fn validate(&self, expression: &str) -> Result<(), ValidationError> {
        self.validator.validate(expression)
    }

    pub fn evaluate(&mut self, expression: &str, options: EvalOptions) -> Result<Calcul, SessionError> {
        self.validator.validate(expression)?;

        let reglages = self.settings.load()?;
        let angle_mode = options.angle_mode.unwrap_or(reglages.angle_mode);
        let format = self.format_options(&reglages, &options);

        let (value, steps) = if options.steps {
            let d = self.evaluator.explain(expression, angle_mode)?;
            (d.resultat, Some(d))
        } else {
            (self.evaluator.evaluate(expression, angle_mode)?, None)
        };

        let affichage = self.formatter.format(value, &format);
        debug!(expression, %angle_mode, value, display = %affichage, "calculated");

        let entry = if options.record {
            Some(self.history.record(expression.trim(), &affichage)?)
        } else {
            None
        };

        Ok(Calcul {
            expression: expression.to_string(),
            value,
            display: affichage,
            angle_mode,
            steps,
            entry,
        })
    }

    fn format_options(&self, reglages: &Settings, options: &EvalOptions) -> FormatOptions {
        let mut s = *reglages;
        if let Some(n) = options.decimal_places {
            s = s.with_decimal_places(n);
        }
        if let Some(sep) = options.thousands_separator {
            s.thousands_separator = sep;
        }
        s.format_options()
    }

    /* ------------------------ Conversion ------------------------ */

    pub fn convert(&self, value: f64, from: &str, to: &str) -> Result<Conversion, SessionError> {
        let resultat = self.converter.convert(value, from, to)?;
        // identité : aucune recherche, donc catégorie éventuellement inconnue
        let category = self.converter.registry().category_of(to);
        let reglages = self.settings.load()?;
        let display = self.formatter.format(resultat, &reglages.format_options());
        debug!(value, from, to, result = resultat, "converted");

        Ok(Conversion {
            value: resultat,
            display,
            category,
        })
    }

    pub fn units(&self, category: UnitCategory) -> Vec<&str> {
        self.converter.units_for_category(category)
    }

    pub fn categories(&self) -> &'static [UnitCategory] {
        self.converter.categories()
    }

    /* ------------------------ Historique / réglages ------------------------ */

    pub fn history(&self) -> &HistoryManager<H> {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryManager<H> {
        &mut self.history
    }

    pub fn settings(&self) -> Result<Settings, SessionError> {
        Ok(self.settings.load()?)
    }

    pub fn update_settings(&mut self, f: impl FnOnce(&mut Settings)) -> Result<Settings, SessionError> {
        Ok(self.settings.update(f)?)
    }

    /* ------------------------ Registre mémoire ------------------------ */

    /// Dernier résultat affiché (entrée la plus récente de l’historique).
    pub fn last_result(&self) -> Option<&str> {
        self.history.entries().first().map(|e| e.result.as_str())
    }

    /// M+ avec un résultat affiché ("1,024") ; renvoie le registre.
    pub fn memory_add(&mut self, display: &str) -> Result<f64, SessionError> {
        match self.lire_affichage(display) {
            Some(x) => Ok(self.memory.add(x)?),
            None => self.memory_recall(),
        }
    }

    /// M-
    pub fn memory_sub(&mut self, display: &str) -> Result<f64, SessionError> {
        match self.lire_affichage(display) {
            Some(x) => Ok(self.memory.sub(x)?),
            None => self.memory_recall(),
        }
    }

    /// MR
    pub fn memory_recall(&self) -> Result<f64, SessionError> {
        Ok(self.memory.recall()?)
    }

    /// MC
    pub fn memory_clear(&mut self) -> Result<(), SessionError> {
        Ok(self.memory.clear()?)
    }

    /// Registre formaté avec les réglages.
    pub fn memory_display(&self) -> Result<String, SessionError> {
        let reglages = self.settings.load()?;
        Ok(self.formatter.format(self.memory_recall()?, &reglages.format_options()))
    }

    fn lire_affichage(&self, texte: &str) -> Option<f64> {
        let x = self.formatter.parse(texte.trim());
        if x.is_nan() {
            debug!(texte, "memory operation ignored (not a number)");
            return None;
        }
        Some(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tempfile::TempDir;

    fn sans_historique() -> EvalOptions {
        EvalOptions {
            record: false,
            ..Default::default()
        }
    }

    #[test]
    fn calcul_formate_et_note() {
        let mut s = MemorySession::in_memory().unwrap();
        let c = s.evaluate("1000 * 1000", EvalOptions::default()).unwrap();
        assert_eq!(c.value, 1_000_000.0);
        assert_eq!(c.display, "1,000,000");
        assert_eq!(c.angle_mode, AngleMode::Deg);

        let e = c.entry.unwrap();
        assert_eq!(e.expression, "1000 * 1000");
        assert_eq!(e.result, "1,000,000");
        assert_eq!(s.history().entries(), [e]);
    }

    #[test]
    fn surcharges_sans_effet_sur_les_reglages() {
        let mut s = MemorySession::in_memory().unwrap();
        let c = s
            .evaluate(
                "1/3 * 3000",
                EvalOptions {
                    decimal_places: Some(2),
                    thousands_separator: Some(false),
                    ..sans_historique()
                },
            )
            .unwrap();
        assert_eq!(c.display, "1000");
        assert!(c.entry.is_none());
        assert!(s.history().is_empty());

        let c = s
            .evaluate("sin(pi/2)", EvalOptions { angle_mode: Some(AngleMode::Rad), ..sans_historique() })
            .unwrap();
        assert_eq!(c.value, 1.0);
        assert_eq!(s.settings().unwrap(), Settings::default());
    }

    #[test]
    fn reglages_appliques() {
        let mut s = MemorySession::in_memory().unwrap();
        s.update_settings(|r| {
            r.angle_mode = AngleMode::Rad;
            r.decimal_places = 3;
        })
        .unwrap();

        let c = s.evaluate("pi", sans_historique()).unwrap();
        assert_eq!(c.display, "3.142");
        let c = s.evaluate("cos(pi)", sans_historique()).unwrap();
        assert_eq!(c.value, -1.0);
    }

    #[test]
    fn demarche_sur_demande() {
        let mut s = MemorySession::in_memory().unwrap();
        let c = s.evaluate("2 + 3 * 4", EvalOptions { steps: true, ..sans_historique() }).unwrap();
        let d = c.steps.unwrap();
        assert_eq!(d.rpn, "2 3 4 * +");
        assert_eq!(d.resultat, 14.0);
        assert!(s.evaluate("2 + 3 * 4", sans_historique()).unwrap().steps.is_none());
    }

    #[test]
    fn echecs_sans_trace() {
        let mut s = MemorySession::in_memory().unwrap();

        let e = s.evaluate("eval(2)", EvalOptions::default()).unwrap_err();
        assert!(matches!(e, SessionError::Validation(ValidationError::DangerousPattern)));

        let e = s.evaluate("5/0", EvalOptions::default()).unwrap_err();
        assert!(matches!(e, SessionError::Evaluation(EvalError::NonFinite)));
        assert_eq!(e.to_string(), "division by zero or result is infinity");

        let e = s.evaluate("(2+3", EvalOptions::default()).unwrap_err();
        assert!(matches!(e, SessionError::Validation(ValidationError::UnclosedOpening)));

        assert!(s.history().is_empty());
    }

    #[test]
    fn conversion_formatee() {
        let s = MemorySession::in_memory().unwrap();
        let c = s.convert(1.0, "mile", "meter").unwrap();
        assert_eq!(c.value, 1609.344);
        assert_eq!(c.display, "1,609.344");
        assert_eq!(c.category, Some(UnitCategory::Length));

        let c = s.convert(100.0, "celsius", "fahrenheit").unwrap();
        assert_eq!(c.display, "212");

        let e = s.convert(1.0, "meter", "kilogram").unwrap_err();
        assert!(matches!(e, SessionError::Conversion(ConversionError::Incompatible { .. })));
        // même nom inconnu : valeur inchangée, catégorie absente
        let c = s.convert(7.0, "parsec", "parsec").unwrap();
        assert_eq!((c.value, c.category), (7.0, None));
    }

    #[test]
    fn unites_et_categories() {
        let s = MemorySession::in_memory().unwrap();
        assert_eq!(s.categories().len(), 6);
        assert_eq!(s.units(UnitCategory::Temperature), ["celsius", "fahrenheit", "kelvin"]);
    }

    #[test]
    fn collaborateurs_remplaces() {
        use crate::conversion::unites::RatioTable;
        use crate::conversion::UnitRegistry;
        use regex::Regex;

        let registre = UnitRegistry::from_tables(vec![RatioTable::new(
            UnitCategory::Length,
            &[("meter", 1.0), ("league", 4828.032)],
        )])
        .unwrap();
        let mut s = MemorySession::in_memory()
            .unwrap()
            .with_converter(UnitConverter::with_registry(registre))
            .with_validator(Validator::with_patterns(vec![Regex::new("42").unwrap()]));

        assert_eq!(s.convert(1.0, "league", "meter").unwrap().value, 4828.032);
        assert!(s.convert(1.0, "kilogram", "gram").is_err());
        assert!(matches!(
            s.evaluate("40 + 2", EvalOptions::default()),
            Ok(Calcul { value, .. }) if value == 42.0
        ));
        assert!(s.validate("6 * 42").is_err());
    }

    #[test]
    fn journal_de_calcul_au_niveau_debug() {
        let abonne = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::with_default(abonne, || {
            let mut s = MemorySession::in_memory().unwrap();
            let c = s.evaluate("2^10", EvalOptions::default()).unwrap();
            assert_eq!(c.display, "1,024");
            assert_eq!(s.memory_add(&c.display).unwrap(), 1024.0);
        });
    }

    #[test]
    fn registre_memoire() {
        let mut s = MemorySession::in_memory().unwrap();
        assert_eq!(s.memory_recall().unwrap(), 0.0);
        assert_eq!(s.last_result(), None);

        let c = s.evaluate("1000 * 1.5", EvalOptions::default()).unwrap();
        assert_eq!(s.last_result(), Some("1,500"));
        assert_eq!(s.memory_add(&c.display).unwrap(), 1500.0);
        assert_eq!(s.memory_add("1,500").unwrap(), 3000.0);
        assert_eq!(s.memory_sub("500.25").unwrap(), 2499.75);
        assert_eq!(s.memory_display().unwrap(), "2,499.75");

        // texte non numérique : registre inchangé
        assert_eq!(s.memory_add("Error").unwrap(), 2499.75);
        assert_eq!(s.memory_sub("").unwrap(), 2499.75);
        // résultat négatif ou en notation scientifique
        assert_eq!(s.memory_sub("-0.25").unwrap(), 2500.0);
        assert_eq!(s.memory_add("1.5e+3").unwrap(), 4000.0);

        s.memory_clear().unwrap();
        assert_eq!(s.memory_recall().unwrap(), 0.0);
        // le registre n’écrit rien dans l’historique
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn session_fichier_persistante() {
        let dir = TempDir::new().unwrap();
        {
            let mut s = FileSession::open(dir.path()).unwrap();
            s.update_settings(|r| r.thousands_separator = false).unwrap();
            s.evaluate("2^20", EvalOptions::default()).unwrap();
        }

        let mut s = FileSession::open(dir.path()).unwrap();
        assert!(!s.settings().unwrap().thousands_separator);
        assert_eq!(s.memory_add("1048576").unwrap(), 1048576.0);
        assert_eq!(s.history().entries()[0].result, "1048576");

        let c = s.evaluate("sqrt(2)", EvalOptions::default()).unwrap();
        assert_abs_diff_eq!(c.value, std::f64::consts::SQRT_2, epsilon = 1e-15);
        assert_eq!(s.history().len(), 2);
        assert!(dir.path().join("calculator-history.json").exists());
        assert!(dir.path().join("settings-storage.json").exists());
        drop(s);
        assert_eq!(FileSession::open(dir.path()).unwrap().memory_recall().unwrap(), 1048576.0);
    }
}
