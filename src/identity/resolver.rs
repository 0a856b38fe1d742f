use std::collections::HashMap;

use crate::config::{FALLBACK_NAME, LINEUP_SLOTS};
use crate::types::{Lineup, ResolvedLineup};

/// Resolved display names for one batch of player identifiers.
#[derive(Debug, Default)]
pub struct NameBook {
    names: HashMap<String, String>,
}

impl NameBook {
    /// Display name for `id`, or the fallback label when it is absent, empty or unknown.
    pub fn name_of(&self, id: Option<&str>) -> String {
        id.filter(|id| !id.is_empty())
            .and_then(|id| self.names.get(id))
            .cloned()
            .unwrap_or_else(|| FALLBACK_NAME.to_string())
    }

    pub fn resolve_lineup(&self, lineup: &Lineup) -> ResolvedLineup {
        let batters: [String; LINEUP_SLOTS] =
            std::array::from_fn(|slot| self.name_of(lineup.batters[slot].as_deref()));
        ResolvedLineup {
            pitcher: self.name_of(lineup.pitcher.as_deref()),
            batters,
        }
    }
}

/// Look up every id in `ids` against `directory` in one pass.
/// Ids missing from the directory, or with a blank name, resolve to the fallback label.
pub fn resolve<'a, I>(directory: &HashMap<String, String>, ids: I) -> NameBook
where
    I: IntoIterator<Item = &'a str>,
{
    let mut names = HashMap::new();
    for id in ids {
        if id.is_empty() || names.contains_key(id) {
            continue;
        }
        let name = directory
            .get(id)
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .unwrap_or(FALLBACK_NAME);
        names.insert(id.to_string(), name.to_string());
    }
    NameBook { names }
}
