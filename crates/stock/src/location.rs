use serde::{Deserialize, Serialize};

use stockreport_core::{Entity, LocationId};

/// Location classification; the reports infer a move's business meaning from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Warehouse,
    Storage,
    View,
    Supplier,
    Customer,
    Production,
    LostFound,
}

/// A node of the location tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub kind: LocationType,
    #[serde(default)]
    pub parent: Option<LocationId>,
}

impl Location {
    pub fn new(name: impl Into<String>, kind: LocationType) -> Self {
        Self {
            id: LocationId::new(),
            name: name.into(),
            code: None,
            kind,
            parent: None,
        }
    }

    pub fn with_parent(mut self, parent: LocationId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Report ordering: by name, ties broken by id.
    pub fn sort_key(&self) -> (String, LocationId) {
        (self.name.clone(), self.id)
    }

    /// Label printed on reports: `[code] name` when a code is set.
    pub fn label(&self) -> String {
        match &self.code {
            Some(code) if !code.is_empty() => format!("[{code}] {}", self.name),
            _ => self.name.clone(),
        }
    }
}

impl Entity for Location {
    type Id = LocationId;

    fn id(&self) -> Self::Id {
        self.id
    }
}
