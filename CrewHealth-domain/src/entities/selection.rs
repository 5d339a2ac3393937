use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Set of ticked options on a form.
///
/// Serializes as a sorted list so saved drafts compare equal regardless of
/// the order items were ticked in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet<T: Ord> {
    items: BTreeSet<T>,
}

impl<T: Ord> Default for SelectionSet<T> {
    fn default() -> Self {
        Self { items: BTreeSet::new() }
    }
}

impl<T: Ord> SelectionSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership; returns whether the item is selected afterwards
    pub fn toggle(&mut self, item: T) -> bool {
        if self.items.remove(&item) {
            false
        } else {
            self.items.insert(item);
            true
        }
    }

    pub fn insert(&mut self, item: T) -> bool {
        self.items.insert(item)
    }

    pub fn remove(&mut self, item: &T) -> bool {
        self.items.remove(item)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: Ord> FromIterator<T> for SelectionSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { items: iter.into_iter().collect() }
    }
}

impl<T: Ord> IntoIterator for SelectionSet<T> {
    type Item = T;
    type IntoIter = std::collections::btree_set::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Symptoms a crew member can report alongside a health check
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Symptom {
    Fever,
    Cough,
    SoreThroat,
    Headache,
    Fatigue,
    Nausea,
    ShortnessOfBreath,
    ChestPain,
    Dizziness,
    MuscleAche,
    LossOfTasteOrSmell,
    Other,
}

impl Symptom {
    pub const ALL: [Symptom; 12] = [
        Symptom::Fever,
        Symptom::Cough,
        Symptom::SoreThroat,
        Symptom::Headache,
        Symptom::Fatigue,
        Symptom::Nausea,
        Symptom::ShortnessOfBreath,
        Symptom::ChestPain,
        Symptom::Dizziness,
        Symptom::MuscleAche,
        Symptom::LossOfTasteOrSmell,
        Symptom::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Symptom::Fever => "Fever",
            Symptom::Cough => "Cough",
            Symptom::SoreThroat => "Sore throat",
            Symptom::Headache => "Headache",
            Symptom::Fatigue => "Fatigue",
            Symptom::Nausea => "Nausea",
            Symptom::ShortnessOfBreath => "Shortness of breath",
            Symptom::ChestPain => "Chest pain",
            Symptom::Dizziness => "Dizziness",
            Symptom::MuscleAche => "Muscle ache",
            Symptom::LossOfTasteOrSmell => "Loss of taste or smell",
            Symptom::Other => "Other",
        }
    }
}

impl fmt::Display for Symptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
