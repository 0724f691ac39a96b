//! Observation store & modifier merge (C6): accumulates decoded records
//! during a single decoding pass and, at flush, folds pending amendment
//! and correction modifiers into a primary store keyed by
//! `(station_id, timestamp)`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::decode::{Modifier, ModifierKind, Observation};

type Key = (String, DateTime<Utc>);

/// A primary-store row: the observation plus the two independent
/// modifier-sequence slots tracked across merges (`spec.md` §4.6).
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObservation {
    pub observation: Observation,
    pub correction_sequence: Option<char>,
    pub amendment_sequence: Option<char>,
}

/// Append-only collector for a decoding pass, with a deterministic
/// three-pass merge (base insert, amendments, corrections) run at
/// [`ObservationStore::flush`] (`spec.md` §9's "modifier records as a
/// separate stream" design note).
#[derive(Debug, Clone, Default)]
pub struct ObservationStore {
    pending: Vec<Observation>,
}

impl ObservationStore {
    pub fn new() -> Self {
        ObservationStore { pending: Vec::new() }
    }

    /// Append a decoded observation unless a record already exists in
    /// this pass with the same `(station_id, timestamp)` and the same
    /// modifier (both null, or same kind and sequence).
    pub fn ingest(&mut self, observation: Observation) -> bool {
        let duplicate = self.pending.iter().any(|existing| {
            existing.station_id == observation.station_id
                && existing.timestamp == observation.timestamp
                && existing.modifier == observation.modifier
        });
        if duplicate {
            tracing::debug!(
                station_id = %observation.station_id,
                timestamp = %observation.timestamp,
                "dropping duplicate observation"
            );
            return false;
        }
        self.pending.push(observation);
        true
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Run the three-pass merge and return the primary store.
    ///
    /// Pass 1 bulk-inserts every record with no modifier, or with an
    /// `RR` (additional data) modifier, under insert-or-ignore
    /// semantics. Passes 2 and 3 apply amendment and correction records
    /// respectively, each comparing its own sequence slot with strict
    /// `<` and preserving the other slot across the replacement.
    pub fn flush(self) -> BTreeMap<Key, StoredObservation> {
        let mut primary: BTreeMap<Key, StoredObservation> = BTreeMap::new();
        let mut amendments = Vec::new();
        let mut corrections = Vec::new();

        for observation in self.pending {
            match observation.modifier {
                None => {
                    insert_base(&mut primary, observation);
                }
                Some(Modifier {
                    kind: ModifierKind::Additional,
                    ..
                }) => {
                    insert_base(&mut primary, observation);
                }
                Some(Modifier {
                    kind: ModifierKind::Amendment,
                    ..
                }) => amendments.push(observation),
                Some(Modifier {
                    kind: ModifierKind::Correction,
                    ..
                }) => corrections.push(observation),
            }
        }

        for observation in amendments {
            apply_amendment(&mut primary, observation);
        }
        for observation in corrections {
            apply_correction(&mut primary, observation);
        }

        primary
    }
}

fn key_of(observation: &Observation) -> Key {
    (observation.station_id.clone(), observation.timestamp)
}

fn insert_base(primary: &mut BTreeMap<Key, StoredObservation>, observation: Observation) {
    let key = key_of(&observation);
    primary.entry(key).or_insert_with(|| StoredObservation {
        observation,
        correction_sequence: None,
        amendment_sequence: None,
    });
}

fn apply_amendment(primary: &mut BTreeMap<Key, StoredObservation>, observation: Observation) {
    let sequence = observation
        .modifier
        .expect("amendment records carry a modifier")
        .sequence;
    let key = key_of(&observation);
    match primary.get(&key) {
        Some(existing) if !supersedes(existing.amendment_sequence, sequence) => {}
        Some(existing) => {
            let correction_sequence = existing.correction_sequence;
            primary.insert(
                key,
                StoredObservation {
                    observation,
                    correction_sequence,
                    amendment_sequence: Some(sequence),
                },
            );
        }
        None => {
            primary.insert(
                key,
                StoredObservation {
                    observation,
                    correction_sequence: None,
                    amendment_sequence: Some(sequence),
                },
            );
        }
    }
}

fn apply_correction(primary: &mut BTreeMap<Key, StoredObservation>, observation: Observation) {
    let sequence = observation
        .modifier
        .expect("correction records carry a modifier")
        .sequence;
    let key = key_of(&observation);
    match primary.get(&key) {
        Some(existing) if !supersedes(existing.correction_sequence, sequence) => {}
        Some(existing) => {
            let amendment_sequence = existing.amendment_sequence;
            primary.insert(
                key,
                StoredObservation {
                    observation,
                    correction_sequence: Some(sequence),
                    amendment_sequence,
                },
            );
        }
        None => {
            primary.insert(
                key,
                StoredObservation {
                    observation,
                    correction_sequence: Some(sequence),
                    amendment_sequence: None,
                },
            );
        }
    }
}

/// Whether a new sequence letter should replace the stored one: no
/// prior sequence, or the prior sequence sorts strictly before the new
/// one.
fn supersedes(stored: Option<char>, incoming: char) -> bool {
    match stored {
        None => true,
        Some(existing) => existing < incoming,
    }
}
