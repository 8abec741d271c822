use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::item::{ItemCategory, ItemRecord};
use crate::{ItemStacksError, Result};

/// JSON stand-in for the game's item database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemDatabase {
    #[serde(default)]
    pub items: Vec<ItemRecord>,
}

impl ItemDatabase {
    pub fn new(items: Vec<ItemRecord>) -> Self {
        Self { items }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(|e| {
            ItemStacksError::Config(format!("item database {}: {}", path.display(), e))
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, shared_name: &str) -> Option<&ItemRecord> {
        self.items
            .iter()
            .find(|item| item.shared_name.as_deref() == Some(shared_name))
    }

    pub fn items_in_category_mut(
        &mut self,
        category: ItemCategory,
    ) -> impl Iterator<Item = &mut ItemRecord> {
        self.items
            .iter_mut()
            .filter(move |item| item.category == category)
    }
}
