use std::path::{Path, PathBuf};

use chrono::Local;
use log::{info, warn};
use uuid::Uuid;

use crate::browser::utils::path_resolver::PathResolver;
use crate::browser::{PendingMedia, SessionOrchestrator};
use crate::command::Command;
use crate::error::{BrowserError, Result};
use crate::menu::MenuRenderer;
use crate::messenger::{
    Control, ConversationId, IncomingMedia, MediaKind, MessageId, Messenger, View,
};
use crate::transfer::{Direction, ProgressTarget, TransferEvent, TransferOutcome};

/// Allegato ricevuto: va salvato nella cartella corrente della conversazione
pub async fn receive_media<M: Messenger>(
    session: &mut SessionOrchestrator<M>,
    conversation: ConversationId,
    media: IncomingMedia,
) -> Result<()> {
    let folder = session
        .state
        .navigation
        .current_path(conversation)
        .map(|p| p.to_path_buf())
        .ok_or(BrowserError::NoActiveFolder)?;

    let limit = session.state.transfers.limits().max_size;
    if media.size > limit {
        return Err(BrowserError::SizeExceeded {
            size: media.size,
            limit,
        });
    }

    let file_name = match (media.kind, &media.file_name) {
        (MediaKind::Document, Some(name)) => name.clone(),
        (MediaKind::Document, None) => media.file_ref.clone(),
        (MediaKind::Photo, _) => format!("{}.jpg", media.file_ref),
    };
    let destination = PathResolver::destination(&folder, &file_name)?;

    // anche un download ancora in corso verso lo stesso path è una collisione
    if destination.exists() || session.state.transfers.is_writing(&destination) {
        return ask_collision(session, conversation, media, destination).await;
    }

    start_download(session, conversation, media, destination).await
}

/// La collisione non si risolve da sola: l'utente sceglie tra sovrascrivere e rinominare
async fn ask_collision<M: Messenger>(
    session: &mut SessionOrchestrator<M>,
    conversation: ConversationId,
    media: IncomingMedia,
    destination: PathBuf,
) -> Result<()> {
    info!("{}", BrowserError::Collision(destination.clone()));

    let key = Uuid::new_v4().simple().to_string();
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let view = View::with_controls(
        format!("The file '{}' already exists. Overwrite or rename it?", name),
        vec![
            vec![Control::new("Overwrite", &Command::Overwrite(key.clone()))],
            vec![Control::new("Rename", &Command::Rename(key.clone()))],
        ],
    );
    session
        .state
        .pending_media
        .insert(key, PendingMedia { media, destination });
    session
        .state
        .navigation
        .send_transient(&*session.messenger, conversation, &view)
        .await?;
    Ok(())
}

/// Consuma la scelta: una seconda risposta sullo stesso prompt riporta NotFound
pub async fn resolve_collision<M: Messenger>(
    session: &mut SessionOrchestrator<M>,
    conversation: ConversationId,
    message_id: MessageId,
    key: &str,
    overwrite: bool,
) -> Result<()> {
    let pending = session
        .state
        .pending_media
        .remove(key)
        .ok_or_else(|| BrowserError::UnknownHandle(key.to_string()))?;

    let destination = if overwrite && session.state.transfers.is_writing(&pending.destination) {
        // il file di un download in corso non si tocca: il nuovo verrà numerato
        info!("{:?} is still being written, not removing it", pending.destination);
        pending.destination
    } else if overwrite {
        match tokio::fs::remove_file(&pending.destination).await {
            Ok(()) => info!("removed {:?} before overwrite", pending.destination),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        pending.destination
    } else {
        PathResolver::timestamped(&pending.destination, Local::now())
    };

    if let Err(e) = session
        .messenger
        .delete_messages(conversation, &[message_id])
        .await
    {
        warn!("Failed to delete collision prompt: {}", e);
    }
    session.state.navigation.forget(conversation, message_id);

    start_download(session, conversation, pending.media, destination).await
}

async fn start_download<M: Messenger>(
    session: &mut SessionOrchestrator<M>,
    conversation: ConversationId,
    media: IncomingMedia,
    destination: PathBuf,
) -> Result<()> {
    let key = Uuid::new_v4().simple().to_string();
    session.state.transfers.admit(&key, media.size)?;
    let destination = unclaimed(session, destination);

    let progress = View::with_controls(
        "Downloading file, please wait...",
        MenuRenderer::cancel_controls(&key),
    );
    let message_id = session
        .state
        .navigation
        .send_transient(&*session.messenger, conversation, &progress)
        .await?;

    let messenger = session.messenger.clone();
    let target = destination.clone();
    let size = media.size;
    session.state.transfers.start(
        key,
        Direction::Download,
        size,
        ProgressTarget {
            conversation,
            message_id,
        },
        destination,
        move |sink| async move { messenger.download_media(&media, &target, sink).await },
    )?;

    Ok(())
}

/// Il nome scelto viene numerato se nel frattempo qualcuno lo ha occupato
fn unclaimed<M: Messenger>(session: &SessionOrchestrator<M>, destination: PathBuf) -> PathBuf {
    let taken = |path: &Path| path.exists() || session.state.transfers.is_writing(path);
    if !taken(&destination) {
        return destination;
    }

    let mut n = 1;
    loop {
        let candidate = PathResolver::numbered(&destination, n);
        if !taken(&candidate) {
            info!("{:?} is taken, saving as {:?}", destination, candidate);
            return candidate;
        }
        n += 1;
    }
}

/// Annullare due volte equivale ad annullare una volta
pub async fn cancel<M: Messenger>(
    session: &mut SessionOrchestrator<M>,
    conversation: ConversationId,
    key: &str,
) -> Result<()> {
    if session.state.transfers.cancel(key) {
        return Ok(());
    }

    let view = View::text("There is no active transfer to cancel.");
    session
        .state
        .navigation
        .send_transient(&*session.messenger, conversation, &view)
        .await?;
    Ok(())
}

/// Eseguito sul loop: unico punto in cui i trasferimenti toccano i messaggi
pub async fn on_transfer_event<M: Messenger>(
    session: &mut SessionOrchestrator<M>,
    event: TransferEvent,
) {
    match event {
        TransferEvent::Progress {
            key,
            direction,
            target,
            percentage,
        } => {
            if !session.state.transfers.is_active(&key) {
                return;
            }
            let view = MenuRenderer::progress(direction, percentage, &key);
            if let Err(e) = session
                .messenger
                .edit_view(target.conversation, target.message_id, &view)
                .await
            {
                warn!("Failed to update progress for {}: {}", key, e);
            }
        }
        TransferEvent::Finished { key, outcome } => {
            let Some(transfer) = session.state.transfers.finish(&key) else {
                warn!("Completion for unknown transfer {}", key);
                return;
            };
            let conversation = transfer.target.conversation;
            let message_id = transfer.target.message_id;
            let name = transfer
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            match outcome {
                TransferOutcome::Completed => {
                    let text = match transfer.direction {
                        Direction::Upload => format!("Sent: {}", name),
                        Direction::Download => {
                            format!("File saved to:\n{}", transfer.path.display())
                        }
                    };
                    finish_progress(session, conversation, message_id, View::text(text)).await;
                }
                TransferOutcome::Cancelled => {
                    if let Err(e) = session
                        .messenger
                        .delete_messages(conversation, &[message_id])
                        .await
                    {
                        warn!("Failed to delete cancelled progress message: {}", e);
                    }
                    session.state.navigation.forget(conversation, message_id);

                    let text = match transfer.direction {
                        Direction::Upload => "Upload cancelled.",
                        Direction::Download => "Download cancelled.",
                    };
                    if let Err(e) = session
                        .state
                        .navigation
                        .send_transient(&*session.messenger, conversation, &View::text(text))
                        .await
                    {
                        warn!("Failed to send cancellation notice: {}", e);
                    }
                }
                TransferOutcome::Failed(reason) => {
                    let text = format!(
                        "Transfer failed:\n{}\n{}",
                        transfer.path.display(),
                        reason
                    );
                    finish_progress(session, conversation, message_id, View::text(text)).await;
                }
            }
        }
    }
}

async fn finish_progress<M: Messenger>(
    session: &mut SessionOrchestrator<M>,
    conversation: ConversationId,
    message_id: MessageId,
    view: View,
) {
    if session
        .messenger
        .edit_view(conversation, message_id, &view)
        .await
        .is_ok()
    {
        return;
    }

    session.state.navigation.forget(conversation, message_id);
    if let Err(e) = session
        .state
        .navigation
        .send_transient(&*session.messenger, conversation, &view)
        .await
    {
        warn!("Failed to report transfer result: {}", e);
    }
}
