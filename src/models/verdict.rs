use std::collections::BTreeSet;
use std::fmt::Display;

use serde::{Serialize, Serializer};

use super::ServiceUsed;

/// A customer sentence together with every keyword that flagged it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flag {
    pub sentence: String,
    /// Sorted union of keywords from every matching rule
    pub matched_keywords: BTreeSet<String>,
}

/// Wall-clock seconds spent in each phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Timings {
    pub translation: f64,
    pub matching: f64,
}

impl Timings {
    pub fn total(&self) -> f64 {
        self.translation + self.matching
    }
}

/// Outcome of processing one transcript
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    pub flagged: bool,
    pub flags: Vec<Flag>,
    #[serde(serialize_with = "serialize_display")]
    pub translation_service_used: ServiceUsed,
    /// True when translation failed and the flag reflects the failure policy
    pub degraded: bool,
    pub timings: Timings,
}

impl Verdict {
    /// Verdict for a transcript that was never matched
    pub fn unflagged(service: ServiceUsed, timings: Timings) -> Self {
        Self {
            flagged: false,
            flags: vec![],
            translation_service_used: service,
            degraded: false,
            timings,
        }
    }

    pub fn sentences(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(|f| f.sentence.as_str())
    }
}

fn serialize_display<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
