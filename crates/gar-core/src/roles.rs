// crates/gar-core/src/roles.rs

//! The Level-Pattern Classifier.
//!
//! Registry practice does not guarantee a stable level → role mapping
//! nationwide: which level holds the street or the town varies per region
//! and per chain. The classifier therefore decides roles from the *set* of
//! levels present in a chain (its level pattern), independent of the
//! concrete objects occupying them, and the decision is cached per distinct
//! pattern — patterns number in the dozens while chains number in the
//! millions.

use std::collections::HashMap;

use crate::catalog::HOUSE_LEVEL;

/// The region always reads level 1's occupant, even when level 1 was also
/// consumed as the town.
pub const REGION_LEVEL: u8 = 1;

/// Street candidates, most granular first.
const STREET_PRECEDENCE: [u8; 8] = [8, 7, 6, 5, 4, 3, 2, 1];

/// Town candidates in registry precedence order.
const TOWN_PRECEDENCE: [u8; 5] = [5, 6, 4, 7, 1];

/// Levels that denote municipal divisions.
const MUNICIPAL_LEVELS: [u8; 2] = [2, 3];

/// The set of hierarchy levels populated in a chain, as a bitset over
/// levels 1–9. Level 10 (the building itself) is excluded; two chains with
/// equal patterns always receive the same role assignment.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct LevelPattern(u16);

impl LevelPattern {
    pub fn from_levels<I: IntoIterator<Item = u8>>(levels: I) -> Self {
        let mut p = LevelPattern::default();
        for l in levels {
            p.insert(l);
        }
        p
    }

    pub fn insert(&mut self, level: u8) {
        if (1..HOUSE_LEVEL).contains(&level) {
            self.0 |= 1 << level;
        }
    }

    pub fn contains(self, level: u8) -> bool {
        (1..HOUSE_LEVEL).contains(&level) && self.0 & (1 << level) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Present levels in ascending order.
    pub fn levels(self) -> impl Iterator<Item = u8> {
        (1..HOUSE_LEVEL).filter(move |&l| self.contains(l))
    }
}

/// Which level plays which semantic role, derived from one level pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleAssignment {
    pub street: Option<u8>,
    pub town: Option<u8>,
    /// Ascending; never overlaps street/town/municipal/region.
    pub leftover: Vec<u8>,
    /// Ascending; present levels among {2,3}.
    pub municipal: Vec<u8>,
    /// Always [`REGION_LEVEL`].
    pub region: u8,
}

/// Derive the role assignment for one level pattern.
///
/// - street: most granular present level (precedence 8..1); levels 9 and 10
///   never compete for any role;
/// - town: registry precedence [5,6,4,7,1], excluding the street level;
/// - municipal: present levels among {2,3};
/// - leftover: remaining present levels 1–8 minus street, town, region and
///   municipal levels.
///
/// Patterns with no candidates are not an error — the undefined roles
/// simply render as empty strings downstream.
pub fn classify(pattern: LevelPattern) -> RoleAssignment {
    let street = STREET_PRECEDENCE
        .iter()
        .copied()
        .find(|&l| pattern.contains(l));
    let town = TOWN_PRECEDENCE
        .iter()
        .copied()
        .find(|&l| Some(l) != street && pattern.contains(l));

    let municipal: Vec<u8> = MUNICIPAL_LEVELS
        .iter()
        .copied()
        .filter(|&l| pattern.contains(l))
        .collect();

    let leftover: Vec<u8> = pattern
        .levels()
        .filter(|&l| l <= 8)
        .filter(|&l| Some(l) != street && Some(l) != town)
        .filter(|&l| l != REGION_LEVEL && !MUNICIPAL_LEVELS.contains(&l))
        .collect();

    RoleAssignment {
        street,
        town,
        leftover,
        municipal,
        region: REGION_LEVEL,
    }
}

/// Memoized pattern → role assignment cache.
///
/// Warmed once by the resolver before assembly fans out, then only read —
/// safe to share across parallel workers without locking.
#[derive(Debug, Default)]
pub struct RoleCache {
    map: HashMap<LevelPattern, RoleAssignment>,
}

impl RoleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `pattern` unless already cached.
    pub fn warm(&mut self, pattern: LevelPattern) {
        self.map.entry(pattern).or_insert_with(|| classify(pattern));
    }

    pub fn get(&self, pattern: LevelPattern) -> Option<&RoleAssignment> {
        self.map.get(&pattern)
    }

    /// Number of distinct patterns seen so far.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pat(levels: &[u8]) -> LevelPattern {
        LevelPattern::from_levels(levels.iter().copied())
    }

    #[test]
    fn most_granular_level_becomes_street() {
        let roles = classify(pat(&[1, 4, 8]));
        assert_eq!(roles.street, Some(8));
        assert_eq!(roles.town, Some(4));
        assert!(roles.leftover.is_empty());
        assert!(roles.municipal.is_empty());
        assert_eq!(roles.region, 1);
    }

    #[test]
    fn town_precedence_prefers_level_five() {
        let roles = classify(pat(&[1, 4, 5, 6, 8]));
        assert_eq!(roles.street, Some(8));
        assert_eq!(roles.town, Some(5));
        assert_eq!(roles.leftover, vec![4, 6]);
    }

    #[test]
    fn street_consumes_the_sole_town_candidate() {
        // 5 is the best street candidate here, so town falls through to 4.
        let roles = classify(pat(&[1, 4, 5]));
        assert_eq!(roles.street, Some(5));
        assert_eq!(roles.town, Some(4));
    }

    #[test]
    fn municipal_levels_never_land_in_leftover() {
        let roles = classify(pat(&[1, 2, 3, 4, 7, 8]));
        assert_eq!(roles.street, Some(8));
        assert_eq!(roles.town, Some(4));
        assert_eq!(roles.municipal, vec![2, 3]);
        assert_eq!(roles.leftover, vec![7]);
    }

    #[test]
    fn level_nine_gets_no_role() {
        let roles = classify(pat(&[1, 8, 9]));
        assert_eq!(roles.street, Some(8));
        assert!(!roles.leftover.contains(&9));
        assert!(!roles.municipal.contains(&9));
    }

    #[test]
    fn empty_pattern_leaves_roles_undefined() {
        let roles = classify(LevelPattern::default());
        assert_eq!(roles.street, None);
        assert_eq!(roles.town, None);
        assert!(roles.leftover.is_empty());
        assert_eq!(roles.region, 1);
    }

    #[test]
    fn region_is_fixed_even_when_town_takes_level_one() {
        let roles = classify(pat(&[1, 8]));
        assert_eq!(roles.town, Some(1));
        assert_eq!(roles.region, 1);
    }

    #[test]
    fn role_exclusivity_over_all_street_bearing_patterns() {
        // Exhaustive over all 2^8 subsets of levels 1..=8.
        for bits in 0u16..256 {
            let levels = (1..=8u8).filter(|&l| bits & (1 << (l - 1)) != 0);
            let pattern = LevelPattern::from_levels(levels);
            let roles = classify(pattern);
            if let (Some(s), Some(t)) = (roles.street, roles.town) {
                assert_ne!(s, t, "pattern {bits:#b}");
            }
            // For patterns holding a street-bearing level (>= 4), street and
            // town stay clear of the municipal/region levels.
            if roles.street.is_some_and(|s| s >= 4) {
                for role in [roles.street, roles.town].into_iter().flatten() {
                    if role >= 4 {
                        assert!(!roles.municipal.contains(&role));
                    }
                }
                for l in &roles.leftover {
                    assert!(*l >= 4, "leftover never holds region/municipal levels");
                    assert_ne!(Some(*l), roles.street);
                    assert_ne!(Some(*l), roles.town);
                }
            }
        }
    }

    #[test]
    fn cache_returns_identical_assignments_per_pattern() {
        let mut cache = RoleCache::new();
        let a = pat(&[1, 4, 8]);
        let b = pat(&[4, 8, 1]); // same set, different construction order
        cache.warm(a);
        cache.warm(b);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(a), cache.get(b));
    }

    #[test]
    fn pattern_ignores_building_level() {
        let p = LevelPattern::from_levels([1u8, 8, 10]);
        assert!(!p.contains(10));
        assert_eq!(p.levels().collect::<Vec<_>>(), vec![1, 8]);
    }
}
