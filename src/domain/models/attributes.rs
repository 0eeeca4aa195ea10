//! Attribute domain model.
//!
//! A subject has exactly six attributes, each clamped to [0,100]. Mutation
//! only happens through relative deltas; there is no absolute overwrite.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default value every attribute starts at.
pub const DEFAULT_ATTRIBUTE_VALUE: i64 = 50;

/// One of the six tracked traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Physical,
    Intelligence,
    Discipline,
    Charisma,
    Confidence,
    Creativity,
}

impl Attribute {
    /// Fixed enumeration order. Ties in weakest-attribute selection break in
    /// this order, first eligible wins.
    pub const ALL: [Attribute; 6] = [
        Self::Physical,
        Self::Intelligence,
        Self::Discipline,
        Self::Charisma,
        Self::Confidence,
        Self::Creativity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Physical => "physical",
            Self::Intelligence => "intelligence",
            Self::Discipline => "discipline",
            Self::Charisma => "charisma",
            Self::Confidence => "confidence",
            Self::Creativity => "creativity",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "physical" => Some(Self::Physical),
            "intelligence" => Some(Self::Intelligence),
            "discipline" => Some(Self::Discipline),
            "charisma" => Some(Self::Charisma),
            "confidence" => Some(Self::Confidence),
            "creativity" => Some(Self::Creativity),
            _ => None,
        }
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The six clamped attribute values for one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSet {
    pub subject_id: Uuid,
    pub physical: i64,
    pub intelligence: i64,
    pub discipline: i64,
    pub charisma: i64,
    pub confidence: i64,
    pub creativity: i64,
}

impl AttributeSet {
    /// Create the initial set for a new subject, all attributes at 50.
    pub fn new(subject_id: Uuid) -> Self {
        Self {
            subject_id,
            physical: DEFAULT_ATTRIBUTE_VALUE,
            intelligence: DEFAULT_ATTRIBUTE_VALUE,
            discipline: DEFAULT_ATTRIBUTE_VALUE,
            charisma: DEFAULT_ATTRIBUTE_VALUE,
            confidence: DEFAULT_ATTRIBUTE_VALUE,
            creativity: DEFAULT_ATTRIBUTE_VALUE,
        }
    }

    pub fn get(&self, attr: Attribute) -> i64 {
        match attr {
            Attribute::Physical => self.physical,
            Attribute::Intelligence => self.intelligence,
            Attribute::Discipline => self.discipline,
            Attribute::Charisma => self.charisma,
            Attribute::Confidence => self.confidence,
            Attribute::Creativity => self.creativity,
        }
    }

    pub fn set(&mut self, attr: Attribute, value: i64) {
        let slot = match attr {
            Attribute::Physical => &mut self.physical,
            Attribute::Intelligence => &mut self.intelligence,
            Attribute::Discipline => &mut self.discipline,
            Attribute::Charisma => &mut self.charisma,
            Attribute::Confidence => &mut self.confidence,
            Attribute::Creativity => &mut self.creativity,
        };
        *slot = value;
    }

    /// Apply a relative delta to one attribute: `round(clamp(old + delta, 0, 100))`.
    pub fn apply_delta(&mut self, attr: Attribute, delta: f64) {
        let new_value = clamp_round(self.get(attr) as f64 + delta);
        self.set(attr, new_value);
    }

    /// The attribute with the strictly lowest value; ties break by the fixed
    /// `Attribute::ALL` order.
    pub fn weakest(&self) -> Attribute {
        let mut best = Attribute::ALL[0];
        for attr in Attribute::ALL {
            if self.get(attr) < self.get(best) {
                best = attr;
            }
        }
        best
    }

    /// Iterate (attribute, value) pairs in fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (Attribute, i64)> + '_ {
        Attribute::ALL.into_iter().map(|a| (a, self.get(a)))
    }
}

/// Clamp to [0,100], then round half-away-from-zero to an integer.
pub fn clamp_round(value: f64) -> i64 {
    value.clamp(0.0, 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_at_50() {
        let set = AttributeSet::new(Uuid::new_v4());
        for (_, value) in set.iter() {
            assert_eq!(value, 50);
        }
    }

    #[test]
    fn test_delta_clamps_high_and_low() {
        let mut set = AttributeSet::new(Uuid::new_v4());
        set.apply_delta(Attribute::Physical, 500.0);
        assert_eq!(set.physical, 100);
        set.apply_delta(Attribute::Physical, -500.0);
        assert_eq!(set.physical, 0);
        // Repeated large deltas never escape the range
        for _ in 0..10 {
            set.apply_delta(Attribute::Physical, 75.0);
        }
        assert_eq!(set.physical, 100);
    }

    #[test]
    fn test_sub_unit_delta_rounds_away() {
        // -0.5 on 50 rounds back to 50; per-application rounding is intended.
        let mut set = AttributeSet::new(Uuid::new_v4());
        set.apply_delta(Attribute::Confidence, -0.5);
        assert_eq!(set.confidence, 50);
    }

    #[test]
    fn test_weakest_prefers_enumeration_order_on_tie() {
        let mut set = AttributeSet::new(Uuid::new_v4());
        assert_eq!(set.weakest(), Attribute::Physical);

        set.discipline = 30;
        set.creativity = 30;
        assert_eq!(set.weakest(), Attribute::Discipline);

        set.physical = 30;
        assert_eq!(set.weakest(), Attribute::Physical);
    }

    #[test]
    fn test_attribute_codec_round_trip() {
        for attr in Attribute::ALL {
            assert_eq!(Attribute::from_str(attr.as_str()), Some(attr));
        }
        assert_eq!(Attribute::from_str("luck"), None);
    }
}
