use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Group,
    Direct,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyRoute {
    Channel,
    Author,
}

#[derive(Debug, Clone)]
pub struct BotIdentity {
    pub user_id: String,
}

#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub author_id: String,
    pub author_name: String,
    pub channel: ChannelKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedCommand {
    pub route: ReplyRoute,
    pub command: Command,
}

/// `None` means the message is not for us: sent by the bot itself, in a
/// group channel without a leading mention, in a channel kind we cannot
/// reply to, or empty once the mention is stripped.
pub fn route(message: &InboundMessage, bot: &BotIdentity) -> Option<RoutedCommand> {
    // Ignore messages we send to ourself
    if message.author_id == bot.user_id {
        return None;
    }

    let mut tokens: Vec<&str> = message.text.split(' ').collect();

    let route = match message.channel {
        ChannelKind::Group => {
            // Commands in group channels must lead with a mention of the bot
            match tokens.first() {
                Some(first) if first.contains(&bot.user_id) => {
                    tokens.remove(0);
                }
                _ => return None,
            }
            ReplyRoute::Channel
        }
        ChannelKind::Direct => ReplyRoute::Author,
        ChannelKind::Other => {
            error!(author = %message.author_name, "could not find a valid target");
            return None;
        }
    };

    if tokens.is_empty() {
        return None;
    }

    info!(author = %message.author_name, commands = ?tokens, "got commands");

    let name = tokens[0].to_string();
    let args = tokens[1..].iter().map(|t| t.to_string()).collect();
    Some(RoutedCommand {
        route,
        command: Command { name, args },
    })
}
