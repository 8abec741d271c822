use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// Prefix the game puts in front of the shared name of every built-in item.
pub const ITEM_PREFIX: &str = "$item_";

/// Suffix the engine appends to instantiated prefab names.
pub const CLONE_SUFFIX: &str = "(Clone)";

/// Returns the part of `name` after a case-insensitive `$item_` prefix.
pub fn strip_item_prefix(name: &str) -> Option<&str> {
    let head = name.get(..ITEM_PREFIX.len())?;
    if head.eq_ignore_ascii_case(ITEM_PREFIX) {
        Some(&name[ITEM_PREFIX.len()..])
    } else {
        None
    }
}

pub fn has_item_prefix(name: &str) -> bool {
    strip_item_prefix(name).is_some()
}

/// A name token compared without regard to case.
///
/// The original spelling is kept for display; equality, ordering and lookups
/// all go through the folded form.
#[derive(Debug, Clone)]
pub struct MatchKey {
    raw: String,
    folded: String,
}

impl MatchKey {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let folded = fold(&raw);
        Self { raw, folded }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Ordinal ignore-case: only ASCII letters fold, everything else compares
/// byte for byte.
fn fold(name: &str) -> String {
    name.to_ascii_lowercase()
}

impl PartialEq for MatchKey {
    fn eq(&self, other: &Self) -> bool {
        self.folded == other.folded
    }
}

impl Eq for MatchKey {}

impl PartialOrd for MatchKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MatchKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded.cmp(&other.folded)
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// The canonical set of names an operator asked to include on top of the
/// built-in `$item_` items.
///
/// Always produced whole by [`rebuild`]; there is no way to edit one in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InclusionSet {
    enabled: bool,
    keys: BTreeSet<MatchKey>,
}

impl InclusionSet {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.keys.contains(&MatchKey::new(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchKey> {
        self.keys.iter()
    }

    fn insert(&mut self, name: &str) {
        if !name.is_empty() {
            self.keys.insert(MatchKey::new(name));
        }
    }

    /// Inserts `name` together with its other `$item_` form.
    fn insert_both_forms(&mut self, name: &str) {
        self.insert(name);
        match strip_item_prefix(name) {
            Some(stripped) => self.insert(stripped),
            None => self.insert(&format!("{ITEM_PREFIX}{name}")),
        }
    }
}

impl fmt::Display for InclusionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

/// Strips one layer of matching `"` or `'` quotes.
///
/// Returns `None` when a quote is left dangling on either side, so a fragment
/// like `"Flint` contributes nothing instead of a key that can never match.
fn unquote(token: &str) -> Option<&str> {
    let is_quote = |c: char| c == '"' || c == '\'';
    let mut chars = token.chars();
    let (first, last) = (chars.next()?, chars.next_back());

    if is_quote(first) && last == Some(first) {
        return Some(&token[1..token.len() - 1]);
    }
    if is_quote(first) || last.is_some_and(is_quote) {
        return None;
    }
    Some(token)
}

/// Parses the raw comma-separated inclusion list into a fresh set.
pub fn rebuild(raw_list: &str, enabled: bool) -> InclusionSet {
    let mut set = InclusionSet {
        enabled,
        keys: BTreeSet::new(),
    };
    if !enabled || raw_list.trim().is_empty() {
        return set;
    }

    for fragment in raw_list.split(',') {
        let trimmed = fragment.trim();
        if trimmed.is_empty() {
            continue;
        }
        match unquote(trimmed) {
            Some(name) if !name.is_empty() => set.insert_both_forms(name),
            _ => {}
        }
    }

    set
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    pub is_default: bool,
    pub is_included: bool,
}

impl Classification {
    pub fn in_scope(&self) -> bool {
        self.is_default || self.is_included
    }
}

/// Decides whether an item belongs to the built-in set or was listed by the
/// operator.
pub fn classify(
    shared_name: Option<&str>,
    prefab_name: Option<&str>,
    set: &InclusionSet,
) -> Classification {
    let is_default = shared_name.is_some_and(has_item_prefix);

    let is_included = set.is_enabled() && !set.is_empty() && {
        let shared_hit = shared_name.is_some_and(|name| {
            set.contains(name) || strip_item_prefix(name).is_some_and(|s| set.contains(s))
        });
        shared_hit
            || prefab_name.is_some_and(|name| {
                set.contains(name)
                    || (name.contains(CLONE_SUFFIX)
                        && set.contains(name.replace(CLONE_SUFFIX, "").trim()))
            })
    };

    Classification {
        is_default,
        is_included,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(set: &InclusionSet) -> Vec<String> {
        set.iter().map(|k| k.as_str().to_lowercase()).collect()
    }

    #[test]
    fn expands_both_prefix_forms() {
        let set = rebuild("rk_pork, $item_rare_gem", true);
        assert_eq!(set.len(), 4);
        for name in ["rk_pork", "$item_rk_pork", "$item_rare_gem", "rare_gem"] {
            assert!(set.contains(name), "missing {name}");
        }
    }

    #[test]
    fn disabled_or_blank_is_empty() {
        assert!(rebuild("rk_pork, Flint", false).is_empty());
        assert!(rebuild("", true).is_empty());
        assert!(rebuild("   ", true).is_empty());
        assert!(rebuild(" , ,,", true).is_empty());
    }

    #[test]
    fn strips_whitespace_and_one_layer_of_quotes() {
        let set = rebuild(" \"Flint\" , 'Resin',\"'Amber'\"", true);
        assert!(set.contains("Flint"));
        assert!(set.contains("$item_resin"));
        assert!(set.contains("'Amber'"));
        assert!(!set.contains("Amber"));
    }

    #[test]
    fn dangling_quotes_and_empty_quotes_contribute_nothing() {
        let set = rebuild("\"Flint, Resin', \"\", ''", true);
        assert!(set.is_empty(), "unexpected keys: {:?}", names(&set));
    }

    #[test]
    fn bare_prefix_adds_only_itself() {
        let set = rebuild("$item_", true);
        assert_eq!(names(&set), vec!["$item_"]);
    }

    #[test]
    fn lookups_ignore_case_and_duplicates_collapse() {
        let set = rebuild("Flint, FLINT, $ITEM_flint", true);
        assert_eq!(set.len(), 2);
        assert!(set.contains("fLiNt"));
        assert!(set.contains("$Item_FLINT"));
    }

    #[test]
    fn non_ascii_letters_do_not_fold() {
        let set = rebuild("\u{212A}nife", true);
        assert!(set.contains("\u{212A}NIFE"));
        assert!(!set.contains("knife"));
        assert!(!set.contains("$item_knife"));
    }

    #[test]
    fn builtin_items_are_default_scope() {
        let set = InclusionSet::default();
        let c = classify(Some("$ITEM_Wood"), None, &set);
        assert!(c.is_default);
        assert!(!c.is_included);
        assert!(c.in_scope());

        let c = classify(Some("rk_pork"), Some("rk_pork"), &set);
        assert!(!c.in_scope());
    }

    #[test]
    fn matches_clone_suffixed_prefab() {
        let set = rebuild("Flint", true);
        let c = classify(None, Some("Flint(Clone)"), &set);
        assert!(c.is_included);

        let c = classify(None, Some("Flint (Clone)"), &set);
        assert!(c.is_included);
    }

    #[test]
    fn clone_removal_is_case_sensitive() {
        let set = rebuild("Flint", true);
        let c = classify(None, Some("Flint(clone)"), &set);
        assert!(!c.is_included);
    }

    #[test]
    fn matches_stripped_shared_name() {
        let set = rebuild("rare_gem", true);
        let c = classify(Some("$item_rare_gem"), Some("RareGem"), &set);
        assert!(c.is_default);
        assert!(c.is_included);
    }

    #[test]
    fn missing_names_never_match() {
        let set = rebuild("Flint", true);
        assert_eq!(classify(None, None, &set), Classification::default());
    }
}
