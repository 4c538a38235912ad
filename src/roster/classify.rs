//! Role classification of raw signup entries.
//!
//! Signup producers do not agree on where role information lives: some
//! templates use a dedicated role field, others encode the DPS split in the
//! class field, and spellings vary. Classification therefore runs an ordered
//! rule table over a normalized key; the order is a contract (an ambiguous
//! key like "tankheal" resolves to the first matching rule) and is pinned by
//! tests.

use crate::roster::resolver::SignUp;

/// The fixed output vocabulary of the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleBucket {
    Tank,
    Healer,
    MeleeDps,
    RangedDps,
}

/// How a rule tests the classification key.
#[derive(Debug, Clone, Copy)]
enum KeyTest {
    Contains(&'static str),
    Equals(&'static str),
}

impl KeyTest {
    fn matches(&self, key: &str) -> bool {
        match self {
            KeyTest::Contains(needle) => key.contains(needle),
            KeyTest::Equals(expected) => key == *expected,
        }
    }
}

/// Ordered rule table, evaluated top to bottom, first match wins.
///
/// The bare "dps"/"damage" rules map to ranged on purpose: undifferentiated
/// DPS signups still have to land in a counted bucket.
const ROLE_RULES: &[(KeyTest, RoleBucket)] = &[
    (KeyTest::Contains("tank"), RoleBucket::Tank),
    (KeyTest::Contains("heal"), RoleBucket::Healer),
    (KeyTest::Contains("ranged"), RoleBucket::RangedDps),
    (KeyTest::Contains("rdps"), RoleBucket::RangedDps),
    (KeyTest::Contains("melee"), RoleBucket::MeleeDps),
    (KeyTest::Contains("mdps"), RoleBucket::MeleeDps),
    (KeyTest::Equals("dps"), RoleBucket::RangedDps),
    (KeyTest::Equals("damage"), RoleBucket::RangedDps),
];

/// Class-field values that mark a non-participating entry, not a role.
const IGNORED_CLASSES: &[&str] = &["late", "bench", "tentative", "absence"];

/// Status values that mark an entry as not actually signed up.
///
/// Anything absent or unrecognized counts as participating: producers often
/// omit the status for ordinary signups.
const NON_PRIMARY_STATUSES: &[&str] = &["declined", "cancelled", "canceled"];

/// Canonical per-team signup counts.
///
/// Invariant: `healers == melee_healers + ranged_healers`, and every signup
/// entry contributes to at most one of tanks/healers/melee_dps/ranged_dps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanonicalCounts {
    pub tanks: u32,
    pub healers: u32,
    pub melee_dps: u32,
    pub ranged_dps: u32,
    pub melee_healers: u32,
    pub ranged_healers: u32,
}

impl CanonicalCounts {
    pub fn dps(&self) -> u32 {
        self.melee_dps + self.ranged_dps
    }
}

/// Classifies raw signup entries into canonical role buckets.
pub struct RoleClassifier {
    melee_healer_specs: Vec<String>,
}

impl RoleClassifier {
    /// `melee_healer_specs` holds the spec names whose healers count as
    /// melee in the healer sub-split (display only).
    pub fn new(melee_healer_specs: &[String]) -> Self {
        Self {
            melee_healer_specs: melee_healer_specs
                .iter()
                .map(|s| normalize(s))
                .collect(),
        }
    }

    /// Tally a whole signup set into canonical counts.
    pub fn count(&self, sign_ups: &[SignUp]) -> CanonicalCounts {
        let mut counts = CanonicalCounts::default();

        for entry in sign_ups {
            let Some(bucket) = self.classify(entry) else {
                continue;
            };
            match bucket {
                RoleBucket::Tank => counts.tanks += 1,
                RoleBucket::Healer => {
                    counts.healers += 1;
                    if self.is_melee_healer(entry) {
                        counts.melee_healers += 1;
                    } else {
                        counts.ranged_healers += 1;
                    }
                }
                RoleBucket::MeleeDps => counts.melee_dps += 1,
                RoleBucket::RangedDps => counts.ranged_dps += 1,
            }
        }

        counts
    }

    /// Classify a single entry, or discard it (`None`).
    pub fn classify(&self, entry: &SignUp) -> Option<RoleBucket> {
        let class = normalize(entry.class_name.as_deref().unwrap_or(""));
        if IGNORED_CLASSES.contains(&class.as_str()) {
            return None;
        }

        if let Some(status) = entry.status.as_deref() {
            if NON_PRIMARY_STATUSES.contains(&normalize(status).as_str()) {
                return None;
            }
        }

        // Prefer the dedicated role field; some templates only fill the
        // class field with the DPS split.
        let role = normalize(entry.role_name.as_deref().unwrap_or(""));
        let key = if role.is_empty() { class } else { role };
        if key.is_empty() {
            return None;
        }

        ROLE_RULES
            .iter()
            .find(|(test, _)| test.matches(&key))
            .map(|(_, bucket)| *bucket)
    }

    fn is_melee_healer(&self, entry: &SignUp) -> bool {
        let spec = normalize(entry.spec_name.as_deref().unwrap_or(""));
        self.melee_healer_specs.iter().any(|s| *s == spec)
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}
