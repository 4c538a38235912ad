//! Gap computation against a team's target composition.

use crate::config::types::TargetsConfig;
use crate::roster::classify::CanonicalCounts;

/// Display bucket for a DPS shortfall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeedBadge {
    FullyStaffed,
    One,
    OneOrTwo,
    ThreeOrMore,
}

impl NeedBadge {
    fn from_need(need: u32) -> Self {
        match need {
            0 => NeedBadge::FullyStaffed,
            1 => NeedBadge::One,
            2 => NeedBadge::OneOrTwo,
            _ => NeedBadge::ThreeOrMore,
        }
    }
}

/// Per-role shortfalls for one team.
///
/// The raw integers stay available; the badges are a presentation layer on
/// top of `dps_need`. Melee and ranged DPS draw from one shared pool, so
/// both badges reflect the pooled shortfall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapReport {
    pub tank_need: u32,
    pub healer_need: u32,
    pub dps_need: u32,
    pub dps_target: u32,
    pub melee_dps_badge: NeedBadge,
    pub ranged_dps_badge: NeedBadge,
}

/// Shortfall between a count and its target, clamped at zero.
fn need(have: u32, target: u32) -> u32 {
    target.saturating_sub(have)
}

/// Compute per-role needs for one team.
///
/// The DPS target is whatever roster room remains once tanks and healers are
/// accounted for; a `roster_size` of 0 means no DPS ceiling at all.
pub fn compute_gaps(counts: &CanonicalCounts, targets: TargetsConfig, roster_size: u32) -> GapReport {
    let dps_target = roster_size.saturating_sub(targets.tanks + targets.healers);
    let dps_need = need(counts.dps(), dps_target);
    let badge = NeedBadge::from_need(dps_need);

    GapReport {
        tank_need: need(counts.tanks, targets.tanks),
        healer_need: need(counts.healers, targets.healers),
        dps_need,
        dps_target,
        melee_dps_badge: badge,
        ranged_dps_badge: badge,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(tanks: u32, healers: u32) -> TargetsConfig {
        TargetsConfig { tanks, healers }
    }

    #[test]
    fn test_twenty_roster_needs_four_dps() {
        // roster 20, targets {2, 4}, counts {2, 4, 5M, 5R}
        let counts = CanonicalCounts {
            tanks: 2,
            healers: 4,
            melee_dps: 5,
            ranged_dps: 5,
            melee_healers: 1,
            ranged_healers: 3,
        };

        let report = compute_gaps(&counts, targets(2, 4), 20);
        assert_eq!(report.dps_target, 14);
        assert_eq!(report.tank_need, 0);
        assert_eq!(report.healer_need, 0);
        assert_eq!(report.dps_need, 4);
        assert_eq!(report.melee_dps_badge, NeedBadge::ThreeOrMore);
    }

    #[test]
    fn test_need_never_negative() {
        let counts = CanonicalCounts {
            tanks: 5,
            healers: 9,
            melee_dps: 30,
            ranged_dps: 30,
            ..Default::default()
        };

        let report = compute_gaps(&counts, targets(2, 4), 20);
        assert_eq!(report.tank_need, 0);
        assert_eq!(report.healer_need, 0);
        assert_eq!(report.dps_need, 0);
        assert_eq!(report.melee_dps_badge, NeedBadge::FullyStaffed);
    }

    #[test]
    fn test_roster_smaller_than_targets_gives_zero_dps_target() {
        let report = compute_gaps(&CanonicalCounts::default(), targets(2, 4), 5);
        assert_eq!(report.dps_target, 0);
        assert_eq!(report.dps_need, 0);
    }

    #[test]
    fn test_badge_buckets() {
        let mk = |melee_dps| CanonicalCounts {
            tanks: 2,
            healers: 4,
            melee_dps,
            ..Default::default()
        };
        let t = targets(2, 4);

        assert_eq!(compute_gaps(&mk(14), t, 20).melee_dps_badge, NeedBadge::FullyStaffed);
        assert_eq!(compute_gaps(&mk(13), t, 20).melee_dps_badge, NeedBadge::One);
        assert_eq!(compute_gaps(&mk(12), t, 20).melee_dps_badge, NeedBadge::OneOrTwo);
        assert_eq!(compute_gaps(&mk(11), t, 20).melee_dps_badge, NeedBadge::ThreeOrMore);
    }
}
