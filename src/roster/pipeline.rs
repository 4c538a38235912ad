//! The aggregation pipeline: scan, resolve, classify, and render.
//!
//! Teams run sequentially; a failure in any one team is logged and that team
//! is simply left out of the summary list. Summaries are re-sorted by event
//! start time before rendering, so resolution order never shows in output.

use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use chrono::Utc;
use tracing::{info, warn};

use crate::common::error::{RosterError, RosterResult};
use crate::config::types::{RosterConfig, TargetsConfig, TeamConfig};
use crate::roster::classify::{CanonicalCounts, RoleClassifier};
use crate::roster::render::{render_dashboard, render_recruitment};
use crate::roster::resolver::{EventResolver, EventSource};
use crate::roster::scanner::{HistorySource, LinkScanner};

/// One team's resolved state for this run. Rebuilt from scratch every run,
/// never carried across runs.
#[derive(Debug, Clone)]
pub struct TeamSummary {
    pub team: TeamConfig,
    /// Event start as epoch seconds.
    pub start_time: i64,
    pub counts: CanonicalCounts,
}

/// Both rendered artifacts of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutputs {
    pub dashboard: String,
    pub recruitment: String,
}

/// Orchestrates the per-team scan/resolve/classify steps and the rendering.
pub struct Pipeline {
    scanner: LinkScanner,
    classifier: RoleClassifier,
    events: Box<dyn EventSource>,
    targets: TargetsConfig,
    scan_window: usize,
}

impl Pipeline {
    pub fn new(roster: &RosterConfig) -> RosterResult<Self> {
        let resolver = EventResolver::new(Duration::from_secs(roster.fetch_timeout_secs()))?;
        Ok(Self::with_event_source(roster, Box::new(resolver)))
    }

    /// Build a pipeline around any event-fetch capability.
    pub fn with_event_source(roster: &RosterConfig, events: Box<dyn EventSource>) -> Self {
        Self {
            scanner: LinkScanner::new(),
            classifier: RoleClassifier::new(roster.melee_healer_specs()),
            events,
            targets: roster.targets,
            scan_window: roster.scan_window(),
        }
    }

    /// Build the summary for one team: find its signup link, resolve the
    /// event, and tally the signups.
    pub async fn team_summary(
        &self,
        team: &TeamConfig,
        history: &dyn HistorySource,
    ) -> RosterResult<TeamSummary> {
        let reference = self
            .scanner
            .find_reference(history, self.scan_window)
            .await?
            .ok_or(RosterError::NoReferenceFound {
                channel: team.channel,
                window: self.scan_window,
            })?;

        info!("Team {}: resolving event {}", team.key, reference);

        // Transient failures get a short retry; a 4xx is not going to
        // change and fails the team immediately.
        let event = (|| self.events.fetch(&reference))
            .retry(ExponentialBuilder::default().with_max_times(2))
            .when(|e| {
                matches!(e, RosterError::Http(_))
                    || matches!(e, RosterError::EventFetchFailed { status, .. } if *status >= 500)
            })
            .await?;

        Ok(TeamSummary {
            team: team.clone(),
            start_time: event.start_time,
            counts: self.classifier.count(&event.sign_ups),
        })
    }

    /// Run the per-team steps for every configured team, keeping whatever
    /// succeeded, sorted by event start time ascending.
    pub async fn collect_summaries(
        &self,
        teams: &[(&TeamConfig, &dyn HistorySource)],
    ) -> Vec<TeamSummary> {
        let mut summaries = Vec::with_capacity(teams.len());

        for (team, history) in teams {
            match self.team_summary(team, *history).await {
                Ok(summary) => summaries.push(summary),
                Err(e) => warn!("Team {} omitted from this run: {}", team.key, e),
            }
        }

        summaries.sort_by_key(|s| s.start_time);
        summaries
    }

    /// Render both artifacts from the summary list.
    pub fn render(&self, summaries: &[TeamSummary]) -> RenderedOutputs {
        let today = Utc::now().date_naive();
        RenderedOutputs {
            dashboard: render_dashboard(summaries, self.targets, today),
            recruitment: render_recruitment(summaries, self.targets),
        }
    }
}
