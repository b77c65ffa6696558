// file: src/models/guide.rs
// description: top-level vehicle guide record and its fixed category enumerations
// reference: internal data structures

use crate::models::issue::Issue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpecCategory {
    EngineAndPowertrain,
    FuelEconomy,
    VehicleWeight,
    ConfigurationsAndSubmodels,
}

impl SpecCategory {
    pub const ALL: [SpecCategory; 4] = [
        SpecCategory::EngineAndPowertrain,
        SpecCategory::FuelEconomy,
        SpecCategory::VehicleWeight,
        SpecCategory::ConfigurationsAndSubmodels,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecCategory::EngineAndPowertrain => "Engine and Powertrain",
            SpecCategory::FuelEconomy => "Fuel Economy (EPA Estimates)",
            SpecCategory::VehicleWeight => "Vehicle Weight",
            SpecCategory::ConfigurationsAndSubmodels => "Configurations and Submodels",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IssueCategory {
    Brakes,
    Suspension,
    Ignition,
    Steering,
    Engine,
    FuelDelivery,
    ElectricalSystem,
    DrivelineTransmission,
    Others,
}

impl IssueCategory {
    pub const ALL: [IssueCategory; 9] = [
        IssueCategory::Brakes,
        IssueCategory::Suspension,
        IssueCategory::Ignition,
        IssueCategory::Steering,
        IssueCategory::Engine,
        IssueCategory::FuelDelivery,
        IssueCategory::ElectricalSystem,
        IssueCategory::DrivelineTransmission,
        IssueCategory::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::Brakes => "Brakes",
            IssueCategory::Suspension => "Suspension",
            IssueCategory::Ignition => "Ignition",
            IssueCategory::Steering => "Steering",
            IssueCategory::Engine => "Engine",
            IssueCategory::FuelDelivery => "Fuel Delivery",
            IssueCategory::ElectricalSystem => "Electrical System",
            IssueCategory::DrivelineTransmission => "Driveline/Transmission",
            IssueCategory::Others => "Others",
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewName {
    Front,
    Side,
    Rear,
    Quarter,
}

impl ViewName {
    pub const ALL: [ViewName; 4] = [ViewName::Front, ViewName::Side, ViewName::Rear, ViewName::Quarter];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewName::Front => "front",
            ViewName::Side => "side",
            ViewName::Rear => "rear",
            ViewName::Quarter => "quarter",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecEntry {
    pub key: String,
    pub value: String,
}

/// Key/value pairs of one spec category, kept in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecTable {
    entries: Vec<SpecEntry>,
}

impl SpecTable {
    /// Inserts or replaces in place; a repeated key keeps its first position.
    pub fn insert(&mut self, key: String, value: String) {
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.value = value,
            None => self.entries.push(SpecEntry { key, value }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpecEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleGuide {
    pub heading: String,
    pub description: String,
    pub issues_heading: String,
    pub images: BTreeMap<ViewName, String>,
    pub specs: BTreeMap<SpecCategory, SpecTable>,
    pub issues: BTreeMap<IssueCategory, Vec<Issue>>,
}

impl VehicleGuide {
    /// Empty guide with every spec and issue category present.
    pub fn new() -> Self {
        Self {
            heading: String::new(),
            description: String::new(),
            issues_heading: String::new(),
            images: BTreeMap::new(),
            specs: SpecCategory::ALL
                .iter()
                .map(|c| (*c, SpecTable::default()))
                .collect(),
            issues: IssueCategory::ALL.iter().map(|c| (*c, Vec::new())).collect(),
        }
    }

    pub fn issue_count(&self) -> usize {
        self.issues.values().map(Vec::len).sum()
    }

    pub fn spec_count(&self) -> usize {
        self.specs.values().map(SpecTable::len).sum()
    }

    pub fn issues_in(&self, category: IssueCategory) -> &[Issue] {
        self.issues
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn merge_images(&mut self, images: BTreeMap<ViewName, String>) {
        for (view, url) in images {
            if !url.is_empty() {
                self.images.insert(view, url);
            }
        }
    }
}

impl Default for VehicleGuide {
    fn default() -> Self {
        Self::new()
    }
}
