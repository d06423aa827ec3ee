//! Interfaccia verso il backend di chat

use std::path::Path;

use async_trait::async_trait;

use crate::command::Command;
use crate::error::Result;
use crate::transfer::ProgressSink;

pub type ConversationId = i64;
pub type MessageId = i64;
pub type UserId = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub label: String,
    pub payload: String,
}

impl Control {
    pub fn new(label: impl Into<String>, command: &Command) -> Self {
        Self {
            label: label.into(),
            payload: command.to_string(),
        }
    }
}

/// Righe di controlli
pub type Controls = Vec<Vec<Control>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    pub text: String,
    pub controls: Controls,
}

impl View {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            controls: Vec::new(),
        }
    }

    pub fn with_controls(text: impl Into<String>, controls: Controls) -> Self {
        Self {
            text: text.into(),
            controls,
        }
    }

    pub fn payloads(&self) -> impl Iterator<Item = &str> {
        self.controls
            .iter()
            .flatten()
            .map(|control| control.payload.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Document,
    Photo,
}

/// Allegato ricevuto dalla chat, ancora da scaricare
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMedia {
    pub message_id: MessageId,
    pub kind: MediaKind,
    pub file_name: Option<String>,
    /// Riferimento opaco del backend al contenuto
    pub file_ref: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Start,
    Callback {
        message_id: MessageId,
        payload: String,
    },
    Media(IncomingMedia),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub origin: UserId,
    pub conversation: ConversationId,
    pub kind: EventKind,
}

#[async_trait]
pub trait Messenger: Send + Sync + 'static {
    async fn send_view(&self, conversation: ConversationId, view: &View) -> Result<MessageId>;

    async fn edit_view(
        &self,
        conversation: ConversationId,
        message_id: MessageId,
        view: &View,
    ) -> Result<()>;

    /// Best-effort
    async fn delete_messages(
        &self,
        conversation: ConversationId,
        message_ids: &[MessageId],
    ) -> Result<()>;

    /// `progress` va invocato ad ogni blocco; un suo errore interrompe l'invio
    async fn send_media(
        &self,
        conversation: ConversationId,
        path: &Path,
        caption: &str,
        controls: &Controls,
        progress: ProgressSink,
    ) -> Result<MessageId>;

    async fn download_media(
        &self,
        source: &IncomingMedia,
        destination: &Path,
        progress: ProgressSink,
    ) -> Result<()>;
}
