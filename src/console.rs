//! Backend di chat da terminale: stdin come sorgente eventi, stdout come chat.
//!
//! I file inviati finiscono nella cartella outbox; gli allegati ricevuti sono
//! percorsi locali indicati con `send <percorso>` o `photo <percorso>`.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};

use anyhow::Context;
use async_trait::async_trait;
use log::{info, warn};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::error::Result;
use crate::messenger::{
    ConversationId, Controls, EventKind, InboundEvent, IncomingMedia, MediaKind, MessageId,
    Messenger, UserId, View,
};
use crate::transfer::ProgressSink;

pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

pub struct ConsoleMessenger {
    next_id: AtomicI64,
    outbox: PathBuf,
    chunk_size: usize,
}

impl ConsoleMessenger {
    pub fn new(outbox: PathBuf, chunk_size: usize) -> Self {
        Self {
            next_id: AtomicI64::new(1),
            outbox,
            chunk_size: chunk_size.max(1),
        }
    }

    fn print(&self, header: String, view: &View) {
        println!("{}\n{}", header, view.text);
        for row in &view.controls {
            for control in row {
                println!("    [{}] {}", control.label, control.payload);
            }
        }
        println!();
    }

    /// Con `fresh` la destinazione non deve esistere: nessun file viene mai troncato
    async fn copy(
        &self,
        source: &Path,
        destination: &Path,
        fresh: bool,
        progress: &ProgressSink,
    ) -> Result<u64> {
        let mut reader = File::open(source).await?;
        let total = reader.metadata().await?.len();
        let mut writer = if fresh {
            OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(destination)
                .await?
        } else {
            File::create(destination).await?
        };
        let mut buffer = vec![0u8; self.chunk_size];
        let mut copied = 0u64;

        if total == 0 {
            progress.report(0, 0)?;
        }
        loop {
            let read = reader.read(&mut buffer).await?;
            if read == 0 {
                break;
            }
            writer.write_all(&buffer[..read]).await?;
            copied += read as u64;
            progress.report(copied, total)?;
        }
        writer.flush().await?;
        Ok(copied)
    }
}

#[async_trait]
impl Messenger for ConsoleMessenger {
    async fn send_view(&self, conversation: ConversationId, view: &View) -> Result<MessageId> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.print(format!("--- #{} (chat {}) ---", id, conversation), view);
        Ok(id)
    }

    async fn edit_view(
        &self,
        conversation: ConversationId,
        message_id: MessageId,
        view: &View,
    ) -> Result<()> {
        self.print(
            format!("--- #{} edited (chat {}) ---", message_id, conversation),
            view,
        );
        Ok(())
    }

    async fn delete_messages(
        &self,
        _conversation: ConversationId,
        message_ids: &[MessageId],
    ) -> Result<()> {
        if !message_ids.is_empty() {
            println!("--- deleted {:?} ---\n", message_ids);
        }
        Ok(())
    }

    async fn send_media(
        &self,
        conversation: ConversationId,
        path: &Path,
        caption: &str,
        controls: &Controls,
        progress: ProgressSink,
    ) -> Result<MessageId> {
        let name = path.file_name().unwrap_or(path.as_os_str());
        let destination = self.outbox.join(name);
        let copied = self.copy(path, &destination, false, &progress).await?;
        info!("{} bytes delivered to {:?}", copied, destination);

        let view = View::with_controls(
            format!("{}\n<{}>", caption, destination.display()),
            controls.clone(),
        );
        self.send_view(conversation, &view).await
    }

    async fn download_media(
        &self,
        source: &IncomingMedia,
        destination: &Path,
        progress: ProgressSink,
    ) -> Result<()> {
        let copied = self
            .copy(Path::new(&source.file_ref), destination, true, &progress)
            .await?;
        info!("{} bytes received into {:?}", copied, destination);
        Ok(())
    }
}

/// Traduce una riga di input in un evento. Il mittente è sempre `origin`.
pub async fn parse_line(origin: UserId, line: &str) -> Option<InboundEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let kind = if line == "/start" {
        EventKind::Start
    } else if let Some(path) = line.strip_prefix("send ") {
        EventKind::Media(local_media(path.trim(), MediaKind::Document).await?)
    } else if let Some(path) = line.strip_prefix("photo ") {
        EventKind::Media(local_media(path.trim(), MediaKind::Photo).await?)
    } else {
        // "<id messaggio> <payload>" oppure solo il payload
        let (message_id, payload) = match line.split_once(' ') {
            Some((id, payload)) => match id.parse::<MessageId>() {
                Ok(id) => (id, payload.trim()),
                Err(_) => (0, line),
            },
            None => (0, line),
        };
        EventKind::Callback {
            message_id,
            payload: payload.to_string(),
        }
    };

    Some(InboundEvent {
        origin,
        conversation: origin,
        kind,
    })
}

async fn local_media(path: &str, kind: MediaKind) -> Option<IncomingMedia> {
    let size = match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => meta.len(),
        Ok(_) => {
            warn!("{} is not a file", path);
            return None;
        }
        Err(e) => {
            warn!("Cannot read {}: {}", path, e);
            return None;
        }
    };

    let file_name = match kind {
        MediaKind::Document => Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned()),
        MediaKind::Photo => None,
    };
    Some(IncomingMedia {
        message_id: 0,
        kind,
        file_name,
        file_ref: path.to_string(),
        size,
    })
}

/// Legge stdin fino a EOF o `/quit`; alla chiusura il canale si chiude con lui
pub async fn read_events(
    origin: UserId,
    events: mpsc::Sender<InboundEvent>,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if line.trim() == "/quit" {
            break;
        }
        match parse_line(origin, &line).await {
            Some(event) => events
                .send(event)
                .await
                .context("Server stopped accepting events")?,
            None => continue,
        }
    }
    info!("Console input closed");
    Ok(())
}
