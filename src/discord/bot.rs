//! Discord bot setup and the refresh loop.
//!
//! Owns the run lock: scheduled refreshes queue up behind it, on-demand
//! refreshes are rejected while a run is in flight, so two runs can never
//! race against the same destination messages.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serenity::all::{ChannelId, Ready, UserId};
use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::prelude::*;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::common::error::{PublishError, PublishResult, RosterResult};
use crate::config::types::{Config, OutputConfig, TeamConfig};
use crate::discord::commands::CommandHandler;
use crate::discord::history::ChannelHistory;
use crate::discord::publisher::{ChannelTarget, PublishOutcome, Publisher};
use crate::roster::scanner::HistorySource;
use crate::roster::Pipeline;

/// What one refresh accomplished; the command handler turns this into a
/// reply.
#[derive(Debug, Clone, Copy)]
pub struct RefreshReport {
    pub team_count: usize,
    pub dashboard_ok: bool,
    pub recruitment_ok: bool,
}

impl RefreshReport {
    pub fn summary(&self) -> String {
        let artifact = |ok: bool| if ok { "updated" } else { "failed" };
        format!(
            "Aggregated {} team(s); dashboard {}, recruitment post {}.",
            self.team_count,
            artifact(self.dashboard_ok),
            artifact(self.recruitment_ok)
        )
    }
}

/// The publishers for the two fixed destinations, guarded together by the
/// run lock.
struct Outputs {
    dashboard: Publisher,
    recruitment: Publisher,
}

/// Runs the full pipeline and publishes the artifacts.
pub struct Refresher {
    config: Config,
    pipeline: Pipeline,
    /// Run lock; holding it for the whole pipeline duration is what keeps
    /// scheduled and on-demand runs from overlapping.
    outputs: Mutex<Outputs>,
}

impl Refresher {
    pub fn new(config: Config) -> RosterResult<Self> {
        let pipeline = Pipeline::new(&config.roster)?;
        let outputs = Outputs {
            dashboard: Publisher::new("dashboard", config.outputs.dashboard.message_id),
            recruitment: Publisher::new("recruitment", config.outputs.recruitment.message_id),
        };
        Ok(Self {
            config,
            pipeline,
            outputs: Mutex::new(outputs),
        })
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.config.roster.refresh_minutes() * 60)
    }

    /// Scheduled refresh: waits for any in-flight run to finish first.
    pub async fn refresh(&self, ctx: &Context) -> RefreshReport {
        let mut outputs = self.outputs.lock().await;
        self.run(ctx, &mut outputs).await
    }

    /// On-demand refresh; `None` means a run is already in flight.
    pub async fn try_refresh(&self, ctx: &Context) -> Option<RefreshReport> {
        let mut outputs = self.outputs.try_lock().ok()?;
        Some(self.run(ctx, &mut outputs).await)
    }

    async fn run(&self, ctx: &Context, outputs: &mut Outputs) -> RefreshReport {
        let teams = &self.config.roster.teams;
        info!("Refreshing roster needs for {} team(s)", teams.len());

        let histories: Vec<ChannelHistory> = teams
            .iter()
            .map(|team| ChannelHistory::new(ctx.http.clone(), ChannelId::new(team.channel)))
            .collect();
        let team_sources: Vec<(&TeamConfig, &dyn HistorySource)> = teams
            .iter()
            .zip(histories.iter())
            .map(|(team, history)| (team, history as &dyn HistorySource))
            .collect();

        let summaries = self.pipeline.collect_summaries(&team_sources).await;
        let rendered = self.pipeline.render(&summaries);
        let self_id = ctx.cache.current_user().id;

        // The two artifacts publish independently; one failing must not
        // keep the other from updating.
        let dashboard_ok = self
            .publish_artifact(
                ctx,
                self_id,
                &mut outputs.dashboard,
                &self.config.outputs.dashboard,
                &rendered.dashboard,
            )
            .await;
        let recruitment_ok = self
            .publish_artifact(
                ctx,
                self_id,
                &mut outputs.recruitment,
                &self.config.outputs.recruitment,
                &rendered.recruitment,
            )
            .await;

        RefreshReport {
            team_count: summaries.len(),
            dashboard_ok,
            recruitment_ok,
        }
    }

    async fn publish_artifact(
        &self,
        ctx: &Context,
        self_id: UserId,
        publisher: &mut Publisher,
        destination: &OutputConfig,
        text: &str,
    ) -> bool {
        match self.publish_to(ctx, self_id, publisher, destination, text).await {
            Ok(outcome) => {
                if outcome.created {
                    info!(
                        "Pinned a new output message {} in channel {}",
                        outcome.message_id, destination.channel
                    );
                }
                true
            }
            Err(e) => {
                error!(
                    "Skipping artifact for channel {} this run: {}",
                    destination.channel, e
                );
                false
            }
        }
    }

    async fn publish_to(
        &self,
        ctx: &Context,
        self_id: UserId,
        publisher: &mut Publisher,
        destination: &OutputConfig,
        text: &str,
    ) -> PublishResult<PublishOutcome> {
        let channel = ChannelId::new(destination.channel);
        ctx.http.get_channel(channel).await.map_err(|e| {
            warn!("Output channel {} not resolvable: {}", destination.channel, e);
            PublishError::SourceUnavailable {
                channel: destination.channel,
            }
        })?;

        let target = ChannelTarget::new(ctx.http.clone(), channel, self_id);
        publisher.publish(&target, text).await
    }
}

/// Discord event handler: commands plus the scheduled refresh task.
pub struct Handler {
    refresher: Arc<Refresher>,
    commands: CommandHandler,
    refresh_started: AtomicBool,
}

impl Handler {
    pub fn new(config: Config) -> RosterResult<Self> {
        let refresher = Arc::new(Refresher::new(config)?);
        Ok(Self {
            commands: CommandHandler::new(refresher.clone()),
            refresher,
            refresh_started: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Connected to Discord as {}", ready.user.name);

        // Reconnects fire ready again; the refresh task must only exist once.
        if self.refresh_started.swap(true, Ordering::SeqCst) {
            return;
        }

        let refresher = self.refresher.clone();
        let interval = refresher.refresh_interval();
        info!("Scheduling refresh every {:?}", interval);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let report = refresher.refresh(&ctx).await;
                info!("Scheduled refresh: {}", report.summary());
            }
        });
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        if let Err(e) = self.commands.handle_command(&ctx, &msg, &msg.content).await {
            error!("Command error: {}", e);
        }
    }
}
