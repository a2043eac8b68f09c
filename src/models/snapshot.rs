use indexmap::IndexMap;
use serde::Serialize;

use super::{Domain, MetricReading};

/// Latest reading per domain. Applying a reading replaces the previous one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    readings: IndexMap<Domain, MetricReading>,
}

impl Snapshot {
    pub fn apply(&mut self, reading: MetricReading) {
        self.readings.insert(reading.domain, reading);
    }

    pub fn get(&self, domain: Domain) -> Option<&MetricReading> {
        self.readings.get(&domain)
    }

    /// Readings in pass order, skipping domains not yet observed.
    pub fn iter(&self) -> impl Iterator<Item = &MetricReading> {
        Domain::ALL.iter().filter_map(|domain| self.readings.get(domain))
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}
