//! Ordered alias strategies for locating a star's archive file.

use crate::catalog::CatalogEntry;

/// One way of naming a star in an archive.
///
/// An instrument lists strategies in priority order; the loader stops at the
/// first candidate whose file exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasStrategy {
    /// Primary designation.
    PrimaryDesignation,
    /// Primary designation without a multiple-star component suffix (`"HD 75732 A"` -> `"HD75732"`).
    StripComponentSuffix,
    /// Secondary catalog (GJ) name.
    SecondaryCatalog,
    /// Hipparcos designation.
    Hipparcos,
    /// Tycho-2 designation, prefixed with `TYC`.
    Tycho,
}

impl AliasStrategy {
    /// Archive designation produced by this strategy, with whitespace removed.
    pub fn candidate(&self, entry: &CatalogEntry) -> Option<String> {
        match self {
            AliasStrategy::PrimaryDesignation => non_empty(compact(&entry.hd_name)),
            AliasStrategy::StripComponentSuffix => strip_component_suffix(&entry.hd_name),
            AliasStrategy::SecondaryCatalog => entry.gj_name.as_deref().map(compact).and_then(non_empty),
            AliasStrategy::Hipparcos => entry.hip_name.as_deref().map(compact).and_then(non_empty),
            AliasStrategy::Tycho => entry
                .tycho2_id
                .as_deref()
                .map(compact)
                .and_then(non_empty)
                .map(|id| format!("TYC{id}")),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AliasStrategy::PrimaryDesignation => "primary",
            AliasStrategy::StripComponentSuffix => "component-stripped",
            AliasStrategy::SecondaryCatalog => "gj",
            AliasStrategy::Hipparcos => "hip",
            AliasStrategy::Tycho => "tyc",
        }
    }
}

/// Walk `strategies` in order, yielding each distinct candidate once.
pub fn candidates(strategies: &[AliasStrategy], entry: &CatalogEntry) -> Vec<(AliasStrategy, String)> {
    let mut out: Vec<(AliasStrategy, String)> = Vec::with_capacity(strategies.len());
    for strategy in strategies {
        if let Some(name) = strategy.candidate(entry) {
            if !out.iter().any(|(_, seen)| *seen == name) {
                out.push((*strategy, name));
            }
        }
    }
    out
}

fn compact(name: &str) -> String {
    name.split_whitespace().collect()
}

fn non_empty(name: String) -> Option<String> {
    (!name.is_empty()).then_some(name)
}

/// Drop a trailing component letter such as `A` or `AB`.
fn strip_component_suffix(name: &str) -> Option<String> {
    let tokens: Vec<&str> = name.split_whitespace().collect();
    let (last, rest) = tokens.split_last()?;
    let is_component =
        !rest.is_empty() && last.len() <= 2 && last.chars().all(|c| c.is_ascii_uppercase());
    if is_component {
        non_empty(rest.concat())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_entry;

    #[test]
    fn primary_designation_drops_whitespace() {
        let entry = sample_entry("HD 75732 A");
        assert_eq!(
            AliasStrategy::PrimaryDesignation.candidate(&entry).as_deref(),
            Some("HD75732A")
        );
    }

    #[test]
    fn component_suffix_is_stripped_only_when_present() {
        let entry = sample_entry("HD 75732 A");
        assert_eq!(
            AliasStrategy::StripComponentSuffix.candidate(&entry).as_deref(),
            Some("HD75732")
        );
        let single = sample_entry("HD 190360");
        assert_eq!(AliasStrategy::StripComponentSuffix.candidate(&single), None);
    }

    #[test]
    fn alternate_catalog_names() {
        let entry = sample_entry("HD 75732 A");
        assert_eq!(
            AliasStrategy::SecondaryCatalog.candidate(&entry).as_deref(),
            Some("GJ324A")
        );
        assert_eq!(
            AliasStrategy::Hipparcos.candidate(&entry).as_deref(),
            Some("HIP43587")
        );
        assert_eq!(
            AliasStrategy::Tycho.candidate(&entry).as_deref(),
            Some("TYC1949-1837-1")
        );
    }

    #[test]
    fn missing_identifiers_yield_no_candidate() {
        let mut entry = sample_entry("HD 1");
        entry.gj_name = None;
        entry.tycho2_id = Some("   ".to_string());
        assert_eq!(AliasStrategy::SecondaryCatalog.candidate(&entry), None);
        assert_eq!(AliasStrategy::Tycho.candidate(&entry), None);
    }

    #[test]
    fn candidates_keep_order_and_skip_duplicates() {
        let entry = sample_entry("HD 190360");
        let list = candidates(
            &[
                AliasStrategy::PrimaryDesignation,
                AliasStrategy::StripComponentSuffix,
                AliasStrategy::PrimaryDesignation,
                AliasStrategy::Hipparcos,
            ],
            &entry,
        );
        let names: Vec<&str> = list.iter().map(|(_, n)| n.as_str()).collect();
        assert_eq!(names, vec!["HD190360", "HIP43587"]);
    }
}
