use std::path::Path;

use log::{info, warn};
use tokio::process::Command as Process;

use crate::browser::SessionOrchestrator;
use crate::browser::handles::Handle;
use crate::command::Command;
use crate::error::{BrowserError, Result};
use crate::file_info::FileInfo;
use crate::menu::MenuRenderer;
use crate::messenger::{ConversationId, MessageId, Messenger, View};
use crate::transfer::{Direction, ProgressTarget};

/// Invia un file del filesystem nella chat
pub async fn upload<M: Messenger>(
    session: &mut SessionOrchestrator<M>,
    conversation: ConversationId,
    id: &str,
) -> Result<()> {
    let handle = resolve_file(session, id)?;
    let file = FileInfo::new(handle.target.clone()).await?;
    if file.is_dir {
        return Err(BrowserError::InvalidCommand(format!("upload|{}", id)));
    }

    // la chiave del trasferimento è l'handle del file
    let key = handle.id.clone();
    session.state.transfers.admit(&key, file.size)?;

    let progress = View::with_controls(
        "Uploading file, please wait...",
        MenuRenderer::cancel_controls(&key),
    );
    let message_id = session
        .state
        .navigation
        .send_transient(&*session.messenger, conversation, &progress)
        .await?;

    let messenger = session.messenger.clone();
    let path = file.path.clone();
    let caption = file.name.clone();
    session.state.transfers.start(
        key,
        Direction::Upload,
        file.size,
        ProgressTarget {
            conversation,
            message_id,
        },
        file.path,
        move |sink| async move {
            messenger
                .send_media(conversation, &path, &caption, &Vec::new(), sink)
                .await
                .map(|_| ())
        },
    )?;

    Ok(())
}

pub async fn prompt_delete<M: Messenger>(
    session: &mut SessionOrchestrator<M>,
    conversation: ConversationId,
    id: &str,
) -> Result<()> {
    let handle = session.state.handles.resolve(id)?.clone();
    let view = MenuRenderer::confirm(
        format!("Are you sure you want to delete {}?", display_name(&handle.target)),
        Command::ConfirmDelete(handle.id.clone()),
        Command::CancelDelete(handle.id),
    );
    session
        .state
        .navigation
        .send_transient(&*session.messenger, conversation, &view)
        .await?;
    Ok(())
}

/// Una seconda conferma trova l'handle già rilasciato e riporta NotFound
pub async fn confirm_delete<M: Messenger>(
    session: &mut SessionOrchestrator<M>,
    conversation: ConversationId,
    message_id: MessageId,
    id: &str,
) -> Result<()> {
    let handle = match resolve_file(session, id) {
        Ok(handle) => handle,
        Err(BrowserError::Vanished(path)) => {
            session.state.handles.release(id);
            return Err(BrowserError::Vanished(path));
        }
        Err(e) => return Err(e),
    };

    tokio::fs::remove_file(&handle.target).await?;
    session.state.handles.release(id);
    info!("deleted {:?}", handle.target);

    let done = View::text(format!("File deleted: {}", display_name(&handle.target)));
    replace_prompt(session, conversation, message_id, &done).await
}

pub async fn prompt_execute<M: Messenger>(
    session: &mut SessionOrchestrator<M>,
    conversation: ConversationId,
    id: &str,
) -> Result<()> {
    let handle = resolve_file(session, id)?;
    let view = MenuRenderer::confirm(
        format!("Are you sure you want to open {}?", display_name(&handle.target)),
        Command::ConfirmExecute(handle.id.clone()),
        Command::CancelExecute(handle.id),
    );
    session
        .state
        .navigation
        .send_transient(&*session.messenger, conversation, &view)
        .await?;
    Ok(())
}

pub async fn confirm_execute<M: Messenger>(
    session: &mut SessionOrchestrator<M>,
    conversation: ConversationId,
    message_id: MessageId,
    id: &str,
) -> Result<()> {
    let handle = resolve_file(session, id)?;
    let file = FileInfo::new(handle.target.clone()).await?;
    if !file.is_openable() {
        return Err(BrowserError::InvalidCommand(format!("execute|{}", id)));
    }

    opener(&file.path).spawn()?;
    info!("opened {:?}", file.path);

    let done = View::text(format!("Opened: {}", file.name));
    replace_prompt(session, conversation, message_id, &done).await
}

/// Risposta "No" a una conferma: il prompt sparisce
pub async fn dismiss<M: Messenger>(
    session: &mut SessionOrchestrator<M>,
    conversation: ConversationId,
    message_id: MessageId,
) -> Result<()> {
    info!("operation cancelled in conversation {}", conversation);
    if let Err(e) = session
        .messenger
        .delete_messages(conversation, &[message_id])
        .await
    {
        warn!("Failed to delete confirmation message: {}", e);
    }
    session.state.navigation.forget(conversation, message_id);
    Ok(())
}

fn resolve_file<M: Messenger>(session: &mut SessionOrchestrator<M>, id: &str) -> Result<Handle> {
    let handle = session.state.handles.resolve_existing(id)?;
    session.path_resolver.confine(&handle.target)?;
    Ok(handle)
}

/// Modifica il prompt con l'esito; se non è più modificabile invia un nuovo messaggio
async fn replace_prompt<M: Messenger>(
    session: &mut SessionOrchestrator<M>,
    conversation: ConversationId,
    message_id: MessageId,
    view: &View,
) -> Result<()> {
    if let Err(e) = session
        .messenger
        .edit_view(conversation, message_id, view)
        .await
    {
        warn!("Failed to edit prompt {}: {}", message_id, e);
        session.state.navigation.forget(conversation, message_id);
        session
            .state
            .navigation
            .send_transient(&*session.messenger, conversation, view)
            .await?;
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Apertura con l'applicazione predefinita della piattaforma
fn opener(path: &Path) -> Process {
    if cfg!(windows) {
        let mut cmd = Process::new("cmd");
        cmd.arg("/C").arg("start").arg("").arg(path);
        cmd
    } else if cfg!(target_os = "macos") {
        let mut cmd = Process::new("open");
        cmd.arg(path);
        cmd
    } else {
        let mut cmd = Process::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}
