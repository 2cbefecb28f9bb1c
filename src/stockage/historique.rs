// src/stockage/historique.rs
//
// Historique des calculs
// ----------------------
// - plus récent en tête, 1000 entrées au plus
// - chaque modification est écrite aussitôt dans le dépôt
// - recherche : sous-chaîne sans casse, sur l’expression OU le résultat
// - regroupement par jour local : "Today", "Yesterday", puis "YYYY-MM-DD"

use std::cmp::Reverse;

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::depot::Repository;
use super::erreur::StorageError;

pub const HISTORIQUE_MAX: usize = 1000;

/// Clé du fichier d’historique.
pub const CLE_HISTORIQUE: &str = "calculator-history";

pub const TITRE_AUJOURD_HUI: &str = "Today";
pub const TITRE_HIER: &str = "Yesterday";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub expression: String,
    /// Résultat tel qu’affiché.
    pub result: String,
    /// Millisecondes depuis l’époque Unix.
    pub timestamp: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryGroup {
    pub title: String,
    pub entries: Vec<HistoryEntry>,
}

#[derive(Debug)]
pub struct HistoryManager<R> {
    depot: R,
    entrees: Vec<HistoryEntry>,
}

impl<R: Repository<Vec<HistoryEntry>>> HistoryManager<R> {
    /// Charge l’historique existant (absent ou corrompu => vide).
    pub fn new(depot: R) -> Result<Self, StorageError> {
        let entrees = depot.load()?.unwrap_or_default();
        debug!(count = entrees.len(), "history loaded");
        Ok(Self { depot, entrees })
    }

    pub fn record(&mut self, expression: &str, result: &str) -> Result<HistoryEntry, StorageError> {
        self.record_at(expression, result, Utc::now().timestamp_millis())
    }

    /// Comme `record`, avec un horodatage imposé.
    pub fn record_at(
        &mut self,
        expression: &str,
        result: &str,
        timestamp: i64,
    ) -> Result<HistoryEntry, StorageError> {
        let entree = HistoryEntry {
            id: Uuid::new_v4().to_string(),
            expression: expression.to_string(),
            result: result.to_string(),
            timestamp,
        };

        // écrire d’abord : en cas d’échec, la liste en mémoire reste intacte
        let mut nouvelles = Vec::with_capacity((self.entrees.len() + 1).min(HISTORIQUE_MAX));
        nouvelles.push(entree.clone());
        nouvelles.extend(self.entrees.iter().take(HISTORIQUE_MAX - 1).cloned());
        self.depot.save(&nouvelles)?;
        self.entrees = nouvelles;

        debug!(id = %entree.id, expression, result, "history entry recorded");
        Ok(entree)
    }

    /// `true` si une entrée a été retirée.
    pub fn remove(&mut self, id: &str) -> Result<bool, StorageError> {
        let restantes: Vec<HistoryEntry> = self.entrees.iter().filter(|e| e.id != id).cloned().collect();
        if restantes.len() == self.entrees.len() {
            return Ok(false);
        }
        self.depot.save(&restantes)?;
        self.entrees = restantes;
        Ok(true)
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.depot.clear()?;
        self.entrees.clear();
        Ok(())
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entrees
    }

    pub fn len(&self) -> usize {
        self.entrees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entrees.is_empty()
    }

    pub fn search(&self, query: &str) -> Vec<&HistoryEntry> {
        let q = query.to_lowercase();
        self.entrees
            .iter()
            .filter(|e| e.expression.to_lowercase().contains(&q) || e.result.to_lowercase().contains(&q))
            .collect()
    }

    /// Groupes par jour, dans le fuseau de `now`.
    pub fn grouped<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<HistoryGroup> {
        let tz = now.timezone();
        let aujourd_hui = now.date_naive();
        let hier = aujourd_hui.checked_sub_days(Days::new(1));

        let mut jours: Vec<(NaiveDate, Vec<HistoryEntry>)> = Vec::new();
        for e in &self.entrees {
            let Some(instant) = tz.timestamp_millis_opt(e.timestamp).earliest() else {
                warn!(id = %e.id, timestamp = e.timestamp, "history entry with invalid timestamp skipped");
                continue;
            };
            let jour = instant.date_naive();
            match jours.iter_mut().find(|(j, _)| *j == jour) {
                Some((_, v)) => v.push(e.clone()),
                None => jours.push((jour, vec![e.clone()])),
            }
        }

        // Today, Yesterday, puis le reste du plus récent au plus ancien
        jours.sort_by_key(|(j, _)| {
            let rang = if *j == aujourd_hui {
                0
            } else if Some(*j) == hier {
                1
            } else {
                2
            };
            (rang, Reverse(*j))
        });

        jours
            .into_iter()
            .map(|(j, entries)| {
                let title = if j == aujourd_hui {
                    TITRE_AUJOURD_HUI.to_string()
                } else if Some(j) == hier {
                    TITRE_HIER.to_string()
                } else {
                    j.format("%Y-%m-%d").to_string()
                };
                HistoryGroup { title, entries }
            })
            .collect()
    }

    pub fn repository(&self) -> &R {
        &self.depot
    }
}
