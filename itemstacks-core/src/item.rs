use serde::{Deserialize, Serialize};

/// Read/write view of one item type owned by the host game.
///
/// The core only reads the two identity strings and writes the two numeric
/// fields; everything else about the host's item model is opaque.
pub trait ItemKind {
    fn shared_name(&self) -> Option<&str>;
    fn prefab_name(&self) -> Option<&str>;
    fn stack_size(&self) -> i32;
    fn set_stack_size(&mut self, stack_size: i32);
    fn weight(&self) -> f32;
    fn set_weight(&mut self, weight: f32);
}

/// Item type categories, in the order the game enumerates them.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    #[default]
    None,
    Material,
    Consumable,
    OneHandedWeapon,
    Bow,
    Shield,
    Helmet,
    Chest,
    Ammo,
    Customization,
    Legs,
    Hidden,
    Torch,
    Misc,
    Shoulder,
    Utility,
    Tool,
    AttachAtgeir,
    Fish,
    TwoHandedWeapon,
    AmmoNonEquipable,
    Trophy,
    TwoHandedWeaponLeft,
}

impl ItemCategory {
    pub const ALL: [ItemCategory; 23] = [
        ItemCategory::None,
        ItemCategory::Material,
        ItemCategory::Consumable,
        ItemCategory::OneHandedWeapon,
        ItemCategory::Bow,
        ItemCategory::Shield,
        ItemCategory::Helmet,
        ItemCategory::Chest,
        ItemCategory::Ammo,
        ItemCategory::Customization,
        ItemCategory::Legs,
        ItemCategory::Hidden,
        ItemCategory::Torch,
        ItemCategory::Misc,
        ItemCategory::Shoulder,
        ItemCategory::Utility,
        ItemCategory::Tool,
        ItemCategory::AttachAtgeir,
        ItemCategory::Fish,
        ItemCategory::TwoHandedWeapon,
        ItemCategory::AmmoNonEquipable,
        ItemCategory::Trophy,
        ItemCategory::TwoHandedWeaponLeft,
    ];
}

/// Plain item record used by the JSON item database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(default)]
    pub category: ItemCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefab_name: Option<String>,
    pub stack_size: i32,
    pub weight: f32,
}

impl ItemRecord {
    pub fn new(category: ItemCategory, shared_name: &str, stack_size: i32, weight: f32) -> Self {
        Self {
            category,
            shared_name: Some(shared_name.to_string()),
            prefab_name: None,
            stack_size,
            weight,
        }
    }

    pub fn with_prefab(mut self, prefab_name: &str) -> Self {
        self.prefab_name = Some(prefab_name.to_string());
        self
    }
}

impl ItemKind for ItemRecord {
    fn shared_name(&self) -> Option<&str> {
        self.shared_name.as_deref()
    }

    fn prefab_name(&self) -> Option<&str> {
        self.prefab_name.as_deref()
    }

    fn stack_size(&self) -> i32 {
        self.stack_size
    }

    fn set_stack_size(&mut self, stack_size: i32) {
        self.stack_size = stack_size;
    }

    fn weight(&self) -> f32 {
        self.weight
    }

    fn set_weight(&mut self, weight: f32) {
        self.weight = weight;
    }
}
