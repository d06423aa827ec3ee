use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::Result;
use crate::messenger::{ConversationId, MessageId, Messenger, View};

use super::utils::path_resolver::PathResolver;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub current_path: Option<PathBuf>,
    pub menu_message_id: Option<MessageId>,
    /// Tutti i messaggi visibili della vista attiva, menu compreso
    pub transient_message_ids: Vec<MessageId>,
}

/// Stato di navigazione per conversazione.
///
/// La pagina corrente non vive qui: viaggia nel payload dei controlli.
#[derive(Debug, Default)]
pub struct NavigationSession {
    states: HashMap<ConversationId, NavigationState>,
}

impl NavigationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, conversation: ConversationId) -> Option<&NavigationState> {
        self.states.get(&conversation)
    }

    pub fn current_path(&self, conversation: ConversationId) -> Option<&Path> {
        self.states
            .get(&conversation)
            .and_then(|state| state.current_path.as_deref())
    }

    /// Sostituisce la vista: cancella tutti i messaggi della vista precedente,
    /// poi imposta il nuovo path
    pub async fn enter<M: Messenger + ?Sized>(
        &mut self,
        messenger: &M,
        conversation: ConversationId,
        path: Option<PathBuf>,
    ) {
        let previous = {
            let state = self.states.entry(conversation).or_default();
            state.menu_message_id = None;
            std::mem::take(&mut state.transient_message_ids)
        };

        if !previous.is_empty() {
            debug!(
                "clearing {} messages in conversation {}",
                previous.len(),
                conversation
            );
            if let Err(e) = messenger.delete_messages(conversation, &previous).await {
                warn!("Failed to delete navigation messages: {}", e);
            }
        }

        info!("conversation {} now at {:?}", conversation, path);
        self.states.entry(conversation).or_default().current_path = path;
    }

    pub async fn go_home<M: Messenger + ?Sized>(
        &mut self,
        messenger: &M,
        conversation: ConversationId,
    ) {
        self.enter(messenger, conversation, None).await;
    }

    /// Risale al padre del path corrente; senza padre torna allo stato vuoto
    pub async fn go_back<M: Messenger + ?Sized>(
        &mut self,
        messenger: &M,
        conversation: ConversationId,
    ) -> Option<PathBuf> {
        let parent = self
            .current_path(conversation)
            .and_then(PathResolver::parent_of);
        self.enter(messenger, conversation, parent.clone()).await;
        parent
    }

    /// Mostra il menu principale della vista, modificandolo se possibile
    pub async fn render<M: Messenger + ?Sized>(
        &mut self,
        messenger: &M,
        conversation: ConversationId,
        view: &View,
    ) -> Result<MessageId> {
        let menu = self
            .states
            .get(&conversation)
            .and_then(|state| state.menu_message_id);

        if let Some(message_id) = menu {
            match messenger.edit_view(conversation, message_id, view).await {
                Ok(()) => return Ok(message_id),
                Err(e) => {
                    warn!("Failed to edit menu message {}: {}", message_id, e);
                    self.forget(conversation, message_id);
                }
            }
        }

        let message_id = messenger.send_view(conversation, view).await?;
        let state = self.states.entry(conversation).or_default();
        state.menu_message_id = Some(message_id);
        state.transient_message_ids.push(message_id);
        Ok(message_id)
    }

    /// Invia un messaggio che appartiene alla vista attiva
    pub async fn send_transient<M: Messenger + ?Sized>(
        &mut self,
        messenger: &M,
        conversation: ConversationId,
        view: &View,
    ) -> Result<MessageId> {
        let message_id = messenger.send_view(conversation, view).await?;
        self.record(conversation, message_id);
        Ok(message_id)
    }

    pub fn record(&mut self, conversation: ConversationId, message_id: MessageId) {
        self.states
            .entry(conversation)
            .or_default()
            .transient_message_ids
            .push(message_id);
    }

    /// Messaggio della vista attiva diverso dal menu (una voce, un prompt, un avanzamento)
    pub fn is_item(&self, conversation: ConversationId, message_id: MessageId) -> bool {
        self.states.get(&conversation).is_some_and(|state| {
            state.menu_message_id != Some(message_id)
                && state.transient_message_ids.contains(&message_id)
        })
    }

    /// Da usare quando un messaggio della vista viene rimosso singolarmente
    pub fn forget(&mut self, conversation: ConversationId, message_id: MessageId) {
        if let Some(state) = self.states.get_mut(&conversation) {
            state.transient_message_ids.retain(|id| *id != message_id);
            if state.menu_message_id == Some(message_id) {
                state.menu_message_id = None;
            }
        }
    }
}
