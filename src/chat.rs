use derive_more::Constructor;
use serde::{Deserialize, Serialize};

use crate::config::ChatConfig;
use crate::error::{Error, ErrorKind, Result};

#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct ChatReply {
    pub text: String,
}

/// Anything that turns a user message into a reply. A hosted completion
/// service plugs in here.
pub trait ChatService {
    fn reply(&self, request: &ChatRequest) -> Result<ChatReply>;
}

/// Reply used when any of `keywords` occurs in the message.
#[derive(Debug, Clone, PartialEq, Constructor, Serialize, Deserialize)]
pub struct ReplyRule {
    pub keywords: Vec<String>,
    pub reply: String,
}

impl ReplyRule {
    fn matches(&self, message: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| !keyword.is_empty() && message.contains(&keyword.to_lowercase()))
    }
}

pub struct CannedReplies {
    rules: Vec<ReplyRule>,
    default_reply: String,
}

impl CannedReplies {
    pub fn new(rules: Vec<ReplyRule>, default_reply: &str) -> Self {
        CannedReplies {
            rules,
            default_reply: default_reply.to_owned(),
        }
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        CannedReplies::new(config.replies.clone(), &config.default_reply)
    }
}

impl ChatService for CannedReplies {
    fn reply(&self, request: &ChatRequest) -> Result<ChatReply> {
        let message = request.message.trim().to_lowercase();
        if message.is_empty() {
            return Err(Error::new(ErrorKind::Chat, "empty message"));
        }

        let text = self
            .rules
            .iter()
            .find(|rule| rule.matches(&message))
            .map_or(&self.default_reply, |rule| &rule.reply);

        Ok(ChatReply::new(text.clone()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

/// Transcript of one chat session.
pub struct Conversation {
    messages: Vec<ChatMessage>,
    fallback: String,
}

impl Conversation {
    pub fn new(fallback: &str) -> Self {
        Conversation {
            messages: Vec::new(),
            fallback: fallback.to_owned(),
        }
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        Conversation::new(&config.fallback)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Records `message`, asks `service` and records its reply. A failing
    /// service is answered with the fallback reply.
    pub fn send(&mut self, service: &dyn ChatService, message: &str) -> &ChatMessage {
        self.messages
            .push(ChatMessage::new(Role::User, message.to_owned()));

        let text = match service.reply(&ChatRequest::new(message.to_owned())) {
            Ok(reply) => reply.text,
            Err(e) => {
                log::warn!("Chat service failed: {}", e);
                self.fallback.clone()
            }
        };

        self.messages.push(ChatMessage::new(Role::Assistant, text));
        &self.messages[self.messages.len() - 1]
    }
}
