use std::path::PathBuf;
use thiserror::Error;

pub mod config;
pub mod database;
pub mod item;
pub mod matcher;
pub mod tracker;

pub use config::{ItemStacksConfig, PassSettings};
pub use database::ItemDatabase;
pub use item::{ItemCategory, ItemKind, ItemRecord};
pub use matcher::{classify, rebuild, Classification, InclusionSet, MatchKey};
pub use tracker::{OriginalTracker, TrackedOriginal};

#[derive(Debug, Error)]
pub enum ItemStacksError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ItemStacksError>;

/// A single configuration value changing underneath a live [`ItemStacks`].
#[derive(Debug, Clone, PartialEq)]
pub enum SettingChange {
    StackSizeEnabled(bool),
    StackSizeMultiplier(f32),
    WeightEnabled(bool),
    WeightMultiplier(f32),
    AdditionalItemsEnabled(bool),
    AdditionalItems(String),
}

/// Counters for one modification pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub scanned: usize,
    pub default_items: usize,
    pub additional_items: usize,
    pub out_of_scope: usize,
    pub stack_updated: usize,
    pub weight_updated: usize,
    pub non_stackable: usize,
}

impl PassSummary {
    fn merge(&mut self, other: &PassSummary) {
        self.scanned += other.scanned;
        self.default_items += other.default_items;
        self.additional_items += other.additional_items;
        self.out_of_scope += other.out_of_scope;
        self.stack_updated += other.stack_updated;
        self.weight_updated += other.weight_updated;
        self.non_stackable += other.non_stackable;
    }
}

/// Process-wide modifier state: the live configuration, the inclusion set
/// derived from it, and the original values of every item touched so far.
#[derive(Debug)]
pub struct ItemStacks {
    config: ItemStacksConfig,
    inclusion: InclusionSet,
    tracker: OriginalTracker,
}

impl ItemStacks {
    pub fn new(config: ItemStacksConfig) -> Self {
        let mut stacks = Self {
            config,
            inclusion: InclusionSet::default(),
            tracker: OriginalTracker::new(),
        };
        stacks.rebuild_inclusion();
        stacks
    }

    pub fn config(&self) -> &ItemStacksConfig {
        &self.config
    }

    pub fn inclusion(&self) -> &InclusionSet {
        &self.inclusion
    }

    pub fn tracker(&self) -> &OriginalTracker {
        &self.tracker
    }

    fn rebuild_inclusion(&mut self) {
        let section = &self.config.additional_items;
        self.inclusion = rebuild(&section.items, section.enabled);
        tracing::debug!("parsed additional items: {}", self.inclusion);
    }

    /// Applies one configuration change. Returns `true` when the inclusion
    /// set had to be rebuilt.
    pub fn on_setting_changed(&mut self, change: SettingChange) -> bool {
        match change {
            SettingChange::StackSizeEnabled(v) => self.config.item_stack_size.enabled = v,
            SettingChange::StackSizeMultiplier(v) => {
                self.config.item_multipliers.stack_size_multiplier = v
            }
            SettingChange::WeightEnabled(v) => self.config.item_weight.enabled = v,
            SettingChange::WeightMultiplier(v) => {
                self.config.item_multipliers.weight_multiplier = v
            }
            SettingChange::AdditionalItemsEnabled(v) => {
                self.config.additional_items.enabled = v;
                self.rebuild_inclusion();
                return true;
            }
            SettingChange::AdditionalItems(v) => {
                self.config.additional_items.items = v;
                self.rebuild_inclusion();
                return true;
            }
        }
        false
    }

    /// Swaps in a whole new configuration, rebuilding the inclusion set only
    /// if the additional-items section changed.
    pub fn replace_config(&mut self, config: ItemStacksConfig) -> bool {
        let rebuild_needed = config.additional_items != self.config.additional_items;
        self.config = config;
        if rebuild_needed {
            self.rebuild_inclusion();
        }
        rebuild_needed
    }

    /// Runs one modification pass over `items`.
    pub fn run_pass<'a, T, I>(&mut self, items: I) -> PassSummary
    where
        T: ItemKind + ?Sized + 'a,
        I: IntoIterator<Item = &'a mut T>,
    {
        let mut summary = PassSummary::default();
        let settings = self.config.pass_settings();
        if settings.is_noop() {
            return summary;
        }

        for item in items {
            summary.scanned += 1;
            let class = classify(item.shared_name(), item.prefab_name(), &self.inclusion);
            if !class.in_scope() {
                summary.out_of_scope += 1;
                continue;
            }
            if class.is_default {
                summary.default_items += 1;
            }

            let outcome =
                self.tracker
                    .apply(item, settings.stack_multiplier, settings.weight_multiplier);
            summary.stack_updated += usize::from(outcome.stack_updated);
            summary.weight_updated += usize::from(outcome.weight_updated);
            summary.non_stackable += usize::from(outcome.non_stackable);

            if class.is_included {
                summary.additional_items += 1;
                tracing::debug!(
                    shared = item.shared_name().unwrap_or(""),
                    prefab = item.prefab_name().unwrap_or(""),
                    "applied changes to additional item"
                );
            }
        }

        summary
    }

    /// Runs the pass over every category of `db`, in category order.
    pub fn apply_to_database(&mut self, db: &mut ItemDatabase) -> PassSummary {
        let mut summary = PassSummary::default();
        for category in ItemCategory::ALL {
            let part = self.run_pass(db.items_in_category_mut(category));
            summary.merge(&part);
        }
        tracing::info!(
            scanned = summary.scanned,
            default_items = summary.default_items,
            additional_items = summary.additional_items,
            stack_updated = summary.stack_updated,
            weight_updated = summary.weight_updated,
            "item stack pass complete"
        );
        summary
    }
}

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub config: ItemStacksConfig,
    pub database_path: PathBuf,
    pub output_path: PathBuf,
    /// How many item-database load events to simulate.
    pub passes: usize,
}

/// Loads the item database, applies the configured pass and writes the
/// result to `output_path`.
pub fn run(settings: RunSettings) -> Result<PassSummary> {
    if !settings.database_path.exists() {
        return Err(ItemStacksError::Config(format!(
            "Item database does not exist: {}",
            settings.database_path.display()
        )));
    }
    if settings.passes == 0 {
        return Err(ItemStacksError::Config(
            "at least one pass is required".to_string(),
        ));
    }

    let mut db = ItemDatabase::load(&settings.database_path)?;
    let mut stacks = ItemStacks::new(settings.config);

    let mut summary = stacks.apply_to_database(&mut db);
    for _ in 1..settings.passes {
        summary = stacks.apply_to_database(&mut db);
    }

    db.save(&settings.output_path)?;
    tracing::info!(
        tracked = stacks.tracker().len(),
        output = %settings.output_path.display(),
        "wrote item database"
    );

    Ok(summary)
}
