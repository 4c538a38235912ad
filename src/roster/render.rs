//! Rendering of the two output artifacts.
//!
//! Pure text formatting; transport lives in the publisher. Both artifacts
//! are rebuilt from scratch every run, which is what keeps the published
//! messages stable under repeated runs with unchanged source data.

use chrono::{Datelike, Days, NaiveDate};

use crate::config::types::TargetsConfig;
use crate::roster::gaps::{compute_gaps, NeedBadge};
use crate::roster::pipeline::TeamSummary;

/// Compact operational summary, one line per team.
///
/// Expects `summaries` already sorted by event start time.
pub fn render_dashboard(summaries: &[TeamSummary], targets: TargetsConfig, today: NaiveDate) -> String {
    let mut out = format!("**Raid needs — week of {}**\n", week_of(today));

    if summaries.is_empty() {
        out.push_str("_No upcoming events found._\n");
        return out;
    }

    for summary in summaries {
        let counts = &summary.counts;
        let report = compute_gaps(counts, targets, summary.team.roster_size);
        out.push_str(&format!(
            "**{}** <t:{}:f> — Tanks {}/{} · Healers {}/{} ({}M/{}R) · DPS {}/{} ({}M/{}R)\n",
            summary.team.display_name,
            summary.start_time,
            counts.tanks,
            targets.tanks,
            counts.healers,
            targets.healers,
            counts.melee_healers,
            counts.ranged_healers,
            counts.dps(),
            report.dps_target,
            counts.melee_dps,
            counts.ranged_dps,
        ));
    }

    out
}

/// Recruitment-style post, one card per team.
pub fn render_recruitment(summaries: &[TeamSummary], targets: TargetsConfig) -> String {
    if summaries.is_empty() {
        return "_No teams are currently recruiting._\n".to_string();
    }

    let mut cards = Vec::with_capacity(summaries.len());
    for summary in summaries {
        let team = &summary.team;
        let report = compute_gaps(&summary.counts, targets, team.roster_size);

        let mut header = format!("**{}**", team.display_name);
        if let Some(window) = &team.time_window {
            header.push_str(&format!(" — {}", window));
        }
        if let Some(leader) = &team.leader {
            header.push_str(&format!(" — contact {}", leader));
        }

        let mut card = header;
        if let Some(notes) = &team.notes {
            card.push('\n');
            card.push_str(notes);
        }
        card.push_str(&format!(
            "\n> Tank: {} · Healer: {} · Melee DPS: {} · Ranged DPS: {}",
            need_marker(report.tank_need),
            need_marker(report.healer_need),
            dps_marker(report.melee_dps_badge, team.roster_size),
            dps_marker(report.ranged_dps_badge, team.roster_size),
        ));
        cards.push(card);
    }

    let mut out = cards.join("\n\n");
    out.push('\n');
    out
}

/// Monday of the ISO week containing `today`, e.g. "May 6".
fn week_of(today: NaiveDate) -> String {
    let monday = today
        .checked_sub_days(Days::new(today.weekday().num_days_from_monday() as u64))
        .unwrap_or(today);
    monday.format("%b %-d").to_string()
}

fn need_marker(need: u32) -> String {
    if need == 0 {
        "✅".to_string()
    } else {
        need.to_string()
    }
}

/// DPS display state: fully-staffed marker, badge text, or "no cap" for
/// teams without a roster-derived ceiling.
fn dps_marker(badge: NeedBadge, roster_size: u32) -> String {
    if roster_size == 0 {
        return "no cap".to_string();
    }
    match badge {
        NeedBadge::FullyStaffed => "✅".to_string(),
        NeedBadge::One => "1".to_string(),
        NeedBadge::OneOrTwo => "1-2".to_string(),
        NeedBadge::ThreeOrMore => "3+".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::TeamConfig;
    use crate::roster::classify::CanonicalCounts;

    fn team(name: &str, roster_size: u32) -> TeamConfig {
        TeamConfig {
            key: name.to_lowercase(),
            display_name: name.to_string(),
            channel: 1,
            roster_size,
            leader: Some("@lead".to_string()),
            time_window: Some("Wed 20:00".to_string()),
            notes: None,
        }
    }

    fn summary(name: &str, start_time: i64, counts: CanonicalCounts) -> TeamSummary {
        TeamSummary {
            team: team(name, 20),
            start_time,
            counts,
        }
    }

    fn targets() -> TargetsConfig {
        TargetsConfig { tanks: 2, healers: 4 }
    }

    fn full_counts() -> CanonicalCounts {
        CanonicalCounts {
            tanks: 2,
            healers: 4,
            melee_dps: 7,
            ranged_dps: 7,
            melee_healers: 1,
            ranged_healers: 3,
        }
    }

    #[test]
    fn test_dashboard_lists_teams_in_given_order() {
        let summaries = vec![
            summary("Alpha", 100, full_counts()),
            summary("Bravo", 200, full_counts()),
        ];

        let text = render_dashboard(&summaries, targets(), NaiveDate::from_ymd_opt(2024, 5, 8).unwrap());
        let alpha = text.find("Alpha").unwrap();
        let bravo = text.find("Bravo").unwrap();
        assert!(alpha < bravo);
        assert!(text.contains("week of May 6"));
        assert!(text.contains("Tanks 2/2"));
        assert!(text.contains("DPS 14/14 (7M/7R)"));
    }

    #[test]
    fn test_dashboard_fallback_when_no_events() {
        let text = render_dashboard(&[], targets(), NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());
        assert!(text.contains("No upcoming events found"));
    }

    #[test]
    fn test_recruitment_card_markers() {
        let counts = CanonicalCounts {
            tanks: 1,
            healers: 4,
            melee_dps: 5,
            ranged_dps: 5,
            melee_healers: 0,
            ranged_healers: 4,
        };
        let text = render_recruitment(&[summary("Alpha", 100, counts)], targets());

        assert!(text.contains("**Alpha** — Wed 20:00 — contact @lead"));
        assert!(text.contains("Tank: 1"));
        assert!(text.contains("Healer: ✅"));
        // dps need is 4, shared pool -> both sides show "3+"
        assert!(text.contains("Melee DPS: 3+"));
        assert!(text.contains("Ranged DPS: 3+"));
    }

    #[test]
    fn test_recruitment_no_cap_for_uncapped_roster() {
        let mut s = summary("Open", 100, full_counts());
        s.team.roster_size = 0;

        let text = render_recruitment(&[s], targets());
        assert!(text.contains("DPS: no cap"));
    }

    #[test]
    fn test_recruitment_includes_notes() {
        let mut s = summary("Alpha", 100, full_counts());
        s.team.notes = Some("mains only".to_string());

        let text = render_recruitment(&[s], targets());
        assert!(text.contains("mains only"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let summaries = vec![summary("Alpha", 100, full_counts())];
        let date = NaiveDate::from_ymd_opt(2024, 5, 8).unwrap();

        let first = render_dashboard(&summaries, targets(), date);
        let second = render_dashboard(&summaries, targets(), date);
        assert_eq!(first, second);

        assert_eq!(
            render_recruitment(&summaries, targets()),
            render_recruitment(&summaries, targets())
        );
    }
}
