use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::EditorError;

pub const RASTER_ITEM_COUNT: usize = 39;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shapes drawn from primitives instead of a raster asset.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Stud,
    Hoop,
    Barbell,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Graphic {
    Raster { url: String },
    Procedural { shape: Shape },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ItemDefinition {
    pub id: ItemId,
    pub label: String,
    pub graphic: Graphic,
    #[serde(default)]
    pub scalable_length: bool,
}

impl ItemDefinition {
    pub fn raster(id: &str, label: &str, url: &str) -> Self {
        Self {
            id: ItemId::new(id),
            label: label.to_string(),
            graphic: Graphic::Raster {
                url: url.to_string(),
            },
            scalable_length: false,
        }
    }

    pub fn procedural(id: &str, label: &str, shape: Shape, scalable_length: bool) -> Self {
        Self {
            id: ItemId::new(id),
            label: label.to_string(),
            graphic: Graphic::Procedural { shape },
            scalable_length,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    items: Vec<Arc<ItemDefinition>>,
}

impl Catalog {
    pub fn new(items: Vec<ItemDefinition>) -> Result<Self, EditorError> {
        let mut seen = std::collections::HashSet::new();
        for item in &items {
            if !seen.insert(item.id.clone()) {
                return Err(EditorError::InvalidConfig {
                    reason: format!("duplicate catalog id {}", item.id),
                });
            }
        }
        Ok(Self {
            items: items.into_iter().map(Arc::new).collect(),
        })
    }

    /// The stock palette: numbered earring rasters followed by the procedural pieces.
    pub fn builtin() -> Self {
        let mut items: Vec<Arc<ItemDefinition>> = (1..=RASTER_ITEM_COUNT)
            .map(|num| {
                let id = format!("earring_{num:02}");
                let url = format!("img/{id}.png");
                Arc::new(ItemDefinition::raster(&id, &format!("Earring {num}"), &url))
            })
            .collect();
        items.push(Arc::new(ItemDefinition::procedural(
            "stud",
            "Stud",
            Shape::Stud,
            false,
        )));
        items.push(Arc::new(ItemDefinition::procedural(
            "hoop",
            "Hoop",
            Shape::Hoop,
            false,
        )));
        items.push(Arc::new(ItemDefinition::procedural(
            "barbell",
            "Barbell",
            Shape::Barbell,
            true,
        )));
        Self { items }
    }

    /// Parses a JSON manifest: an array of item definitions.
    pub fn from_json(text: &str) -> Result<Self, EditorError> {
        let items: Vec<ItemDefinition> =
            serde_json::from_str(text).map_err(|err| EditorError::InvalidConfig {
                reason: err.to_string(),
            })?;
        Self::new(items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ItemDefinition>> {
        self.items.iter()
    }

    pub fn get(&self, id: &ItemId) -> Result<&Arc<ItemDefinition>, EditorError> {
        self.items
            .iter()
            .find(|item| &item.id == id)
            .ok_or_else(|| EditorError::UnknownItem { id: id.to_string() })
    }

    pub fn get_index(&self, index: usize) -> Option<&Arc<ItemDefinition>> {
        self.items.get(index)
    }

    pub fn position(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }
}
