use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use chrono_tz::Tz;
use serenity::async_trait;
use serenity::gateway::ShardManager;
use serenity::model::channel::{Channel, ChannelType, Message};
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::clients::google_calendar::{CalendarApi, EventWindow};
use crate::handlers::sender::{ChannelTarget, ReplyTarget, UserTarget};
use crate::messages::MessageTemplates;
use crate::service::datefmt;
use crate::service::render::EventRenderer;
use crate::service::routing::{self, BotIdentity, ChannelKind, Command, InboundMessage, ReplyRoute};

pub struct ShardManagerContainer;

impl TypeMapKey for ShardManagerContainer {
    type Value = Arc<ShardManager>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Continue,
    Shutdown,
}

pub struct BotHandler {
    calendar: Arc<dyn CalendarApi>,
    renderer: EventRenderer,
    templates: Arc<MessageTemplates>,
    timezone: Tz,
    admin_users: Vec<String>,
    calendar_timeout: Duration,
    in_flight: Mutex<HashSet<String>>,
}

impl BotHandler {
    pub fn new(
        calendar: Arc<dyn CalendarApi>,
        renderer: EventRenderer,
        templates: Arc<MessageTemplates>,
        timezone: Tz,
        admin_users: Vec<String>,
        calendar_timeout: Duration,
    ) -> Self {
        BotHandler {
            calendar,
            renderer,
            templates,
            timezone,
            admin_users,
            calendar_timeout,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Unrecognized names are logged and produce no reply.
    pub async fn dispatch(
        &self,
        target: &dyn ReplyTarget,
        target_key: &str,
        author_id: &str,
        command: &Command,
    ) -> Disposition {
        match command.name.as_str() {
            "help" => {
                if let Err(err) = target.send_text(&self.templates.help).await {
                    error!(%err, "failed to send help reply");
                }
                Disposition::Continue
            }
            // `sudoku` has always been the shutdown command; the name stuck.
            "sudoku" => {
                if !self.admin_users.iter().any(|id| id == author_id) {
                    warn!(author = %author_id, "refusing shutdown request from non-admin");
                    if let Err(err) = target.send_text(&self.templates.not_authorized).await {
                        error!(%err, "failed to send authorization notice");
                    }
                    return Disposition::Continue;
                }
                if let Err(err) = target.send_text(&self.templates.shutting_down).await {
                    error!(%err, "failed to send shutdown notice");
                }
                Disposition::Shutdown
            }
            "upcoming" => {
                self.handle_upcoming(target, target_key).await;
                Disposition::Continue
            }
            other => {
                warn!(command = %other, "ignoring unrecognized command");
                Disposition::Continue
            }
        }
    }

    /// One lookup per target at a time; a provider error is logged
    /// without a reply, a timeout gets an explicit notice.
    async fn handle_upcoming(&self, target: &dyn ReplyTarget, target_key: &str) {
        {
            let mut in_flight = self.in_flight.lock().await;
            if !in_flight.insert(target_key.to_string()) {
                info!(target = %target_key, "upcoming lookup already in flight, dropping request");
                return;
            }
        }

        let window = EventWindow {
            time_min: Some(datefmt::start_of_today(self.timezone).with_timezone(&Utc)),
            time_max: None,
        };

        match timeout(self.calendar_timeout, self.calendar.list_events(&window)).await {
            Ok(Ok(events)) => {
                let reply = self.renderer.render(&events);
                if let Err(err) = target.send_text(&reply).await {
                    error!(%err, "failed to send upcoming reply");
                }
            }
            Ok(Err(err)) => {
                error!(%err, "the calendar API returned an error");
            }
            Err(_) => {
                error!(target = %target_key, "calendar lookup timed out");
                if let Err(err) = target.send_text(&self.templates.upcoming.timed_out).await {
                    error!(%err, "failed to send timeout notice");
                }
            }
        }

        self.in_flight.lock().await.remove(target_key);
    }
}

#[async_trait]
impl EventHandler for BotHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, "logged in");
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let bot = BotIdentity {
            user_id: ctx.cache.current_user().id.to_string(),
        };

        let kind = match msg.channel(&ctx).await {
            Ok(Channel::Guild(channel)) if channel.kind == ChannelType::Text => ChannelKind::Group,
            Ok(Channel::Private(_)) => ChannelKind::Direct,
            Ok(_) => ChannelKind::Other,
            Err(err) => {
                error!(%err, "failed to resolve message channel");
                ChannelKind::Other
            }
        };

        let inbound = InboundMessage {
            author_id: msg.author.id.to_string(),
            author_name: msg.author.name.clone(),
            channel: kind,
            text: msg.content.clone(),
        };
        let Some(routed) = routing::route(&inbound, &bot) else {
            return;
        };

        let disposition = match routed.route {
            ReplyRoute::Channel => {
                let target = ChannelTarget::new(ctx.http.clone(), msg.channel_id);
                self.dispatch(&target, &msg.channel_id.to_string(), &inbound.author_id, &routed.command)
                    .await
            }
            ReplyRoute::Author => {
                let target = UserTarget::new(ctx.http.clone(), msg.author.clone());
                self.dispatch(&target, &inbound.author_id, &inbound.author_id, &routed.command)
                    .await
            }
        };

        if disposition == Disposition::Shutdown {
            let data = ctx.data.read().await;
            if let Some(manager) = data.get::<ShardManagerContainer>() {
                manager.shutdown_all().await;
            } else {
                error!("shard manager unavailable, exiting directly");
                std::process::exit(0);
            }
        }
    }
}
