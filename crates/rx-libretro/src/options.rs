//! Core option registry
//!
//! A core declares its options as `key -> "Description; value1|value2|..."`.
//! Every declaration replaces the whole set. Configured overrides are
//! applied to the new set before it becomes visible.

use parking_lot::RwLock;
use rx_core::{CoreOption, CoreOptions, OptionOverride};
use std::sync::Arc;
use tracing::{debug, warn};

/// Parse the value half of a variable declaration
fn parse_declaration(raw: &str) -> Option<CoreOption> {
    let (description, values) = raw.split_once(';')?;
    let values = values.strip_prefix(' ').unwrap_or(values);
    if values.is_empty() {
        return None;
    }
    Some(CoreOption::new(
        description,
        values.split('|').map(str::to_string).collect(),
    ))
}

/// Options declared by the core plus the overrides to force on them
pub struct OptionRegistry {
    current: RwLock<Arc<CoreOptions>>,
    overrides: Vec<OptionOverride>,
}

impl OptionRegistry {
    pub fn new(overrides: Vec<OptionOverride>) -> Self {
        Self {
            current: RwLock::new(Arc::new(CoreOptions::new())),
            overrides,
        }
    }

    /// Replace the option set with a new declaration
    pub fn declare(&self, entries: &[(String, String)]) {
        let mut options = CoreOptions::with_capacity(entries.len());
        for (key, raw) in entries {
            match parse_declaration(raw) {
                Some(option) => {
                    options.insert(key.clone(), option);
                }
                None => warn!("Skipping malformed option {}: {:?}", key, raw),
            }
        }

        for over in &self.overrides {
            match options.get_mut(&over.key) {
                Some(option) if (over.index as usize) < option.values.len() => {
                    option.selected_index = over.index;
                }
                Some(option) => warn!(
                    "Override index {} out of range for {} ({} values)",
                    over.index,
                    over.key,
                    option.values.len()
                ),
                None => warn!("Override for undeclared option {}", over.key),
            }
        }

        debug!("Core declared {} options", options.len());
        *self.current.write() = Arc::new(options);
    }

    /// Current option set
    pub fn snapshot(&self) -> Arc<CoreOptions> {
        Arc::clone(&self.current.read())
    }

    /// Selected value for `key`, without the description
    pub fn selected_value(&self, key: &str) -> Option<String> {
        self.current
            .read()
            .get(key)
            .and_then(|option| option.selected_value())
            .map(str::to_string)
    }
}
