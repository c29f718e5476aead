use std::sync::Arc;

use serenity::async_trait;
use serenity::builder::CreateMessage;
use serenity::http::Http;
use serenity::model::id::ChannelId;
use serenity::model::user::User;

#[async_trait]
pub trait ReplyTarget: Send + Sync {
    async fn send_text(&self, content: &str) -> Result<(), String>;
}

pub struct ChannelTarget {
    http: Arc<Http>,
    channel_id: ChannelId,
}

impl ChannelTarget {
    pub fn new(http: Arc<Http>, channel_id: ChannelId) -> Self {
        Self { http, channel_id }
    }
}

#[async_trait]
impl ReplyTarget for ChannelTarget {
    async fn send_text(&self, content: &str) -> Result<(), String> {
        self.channel_id
            .say(&*self.http, content)
            .await
            .map(|_| ())
            .map_err(|e| format!("Error sending message: {:?}", e))
    }
}

pub struct UserTarget {
    http: Arc<Http>,
    user: User,
}

impl UserTarget {
    pub fn new(http: Arc<Http>, user: User) -> Self {
        Self { http, user }
    }
}

#[async_trait]
impl ReplyTarget for UserTarget {
    async fn send_text(&self, content: &str) -> Result<(), String> {
        self.user
            .direct_message(&*self.http, CreateMessage::new().content(content))
            .await
            .map(|_| ())
            .map_err(|e| format!("Error sending direct message: {:?}", e))
    }
}
