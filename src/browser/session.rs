use std::sync::Arc;

use log::{error, info, warn};
use tokio::sync::mpsc::UnboundedSender;

use crate::command::Command;
use crate::error::{BrowserError, ErrorKind, Result};
use crate::menu::MenuRenderer;
use crate::messenger::{ConversationId, EventKind, InboundEvent, MessageId, Messenger, View};
use crate::server::ServerConfig;
use crate::transfer::{TransferController, TransferEvent};

use super::{
    SessionState,
    handlers::{dir_ops, file_ops, transfer_ops},
    handles::HandleRegistry,
    utils::path_resolver::PathResolver,
};

/// Punto d'ingresso per ogni evento già autorizzato.
///
/// Un solo evento alla volta: lo stato non richiede lock. Nessun errore
/// risale oltre [`SessionOrchestrator::handle`].
pub struct SessionOrchestrator<M: Messenger> {
    pub(crate) state: SessionState,
    pub(crate) path_resolver: PathResolver,
    pub(crate) menu: MenuRenderer,
    pub(crate) messenger: Arc<M>,
}

impl<M: Messenger> SessionOrchestrator<M> {
    pub fn new(
        config: Arc<ServerConfig>,
        messenger: Arc<M>,
        transfer_events: UnboundedSender<TransferEvent>,
    ) -> Self {
        Self {
            state: SessionState::new(
                HandleRegistry::with_limit(config.max_handles),
                TransferController::new(config.limits, transfer_events),
            ),
            path_resolver: PathResolver::new(config.drives.clone()),
            menu: MenuRenderer::new(config.page_size, config.limits.max_size),
            messenger,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn active_transfers(&self) -> usize {
        self.state.transfers.active_count()
    }

    pub async fn handle(&mut self, event: InboundEvent) {
        let conversation = event.conversation;
        let source = match &event.kind {
            EventKind::Callback { message_id, .. } => Some(*message_id),
            _ => None,
        };
        if let Err(e) = self.dispatch(event).await {
            self.report(conversation, source, &e).await;
        }
    }

    async fn dispatch(&mut self, event: InboundEvent) -> Result<()> {
        let conversation = event.conversation;
        match event.kind {
            EventKind::Start => {
                info!("start received from {}", conversation);
                dir_ops::show_drives(self, conversation).await
            }
            EventKind::Media(media) => {
                transfer_ops::receive_media(self, conversation, media).await
            }
            EventKind::Callback {
                message_id,
                payload,
            } => {
                info!("callback from {}: {}", conversation, payload);
                match payload.parse::<Command>()? {
                    Command::Home => dir_ops::show_drives(self, conversation).await,
                    Command::Back => dir_ops::go_back(self, conversation).await,
                    Command::Drive(id) | Command::Folder(id) => {
                        dir_ops::show_folder(self, conversation, &id).await
                    }
                    Command::ListSubfolders { folder, page } => {
                        dir_ops::list_subfolders(self, conversation, &folder, page).await
                    }
                    Command::ListFiles { folder, page } => {
                        dir_ops::list_files(self, conversation, &folder, page).await
                    }
                    Command::Upload(id) => file_ops::upload(self, conversation, &id).await,
                    Command::Cancel(key) => transfer_ops::cancel(self, conversation, &key).await,
                    Command::Delete(id) => file_ops::prompt_delete(self, conversation, &id).await,
                    Command::ConfirmDelete(id) => {
                        file_ops::confirm_delete(self, conversation, message_id, &id).await
                    }
                    Command::Execute(id) => {
                        file_ops::prompt_execute(self, conversation, &id).await
                    }
                    Command::ConfirmExecute(id) => {
                        file_ops::confirm_execute(self, conversation, message_id, &id).await
                    }
                    Command::CancelDelete(_) | Command::CancelExecute(_) => {
                        file_ops::dismiss(self, conversation, message_id).await
                    }
                    Command::Overwrite(key) => {
                        transfer_ops::resolve_collision(self, conversation, message_id, &key, true)
                            .await
                    }
                    Command::Rename(key) => {
                        transfer_ops::resolve_collision(self, conversation, message_id, &key, false)
                            .await
                    }
                }
            }
        }
    }

    pub async fn on_transfer_event(&mut self, event: TransferEvent) {
        transfer_ops::on_transfer_event(self, event).await
    }

    /// Risposta a un evento bloccato dalla guardia: non tocca lo stato
    pub async fn reject(&self, event: &InboundEvent, err: &BrowserError) {
        warn!(
            "Rejected event from {} in conversation {}: {}",
            event.origin, event.conversation, err
        );
        if let Err(e) = self
            .messenger
            .send_view(event.conversation, &View::text(err.user_message()))
            .await
        {
            warn!("Failed to send rejection notice: {}", e);
        }
    }

    /// Un errore nato da una singola voce non sovrascrive il menu della vista
    async fn report(
        &mut self,
        conversation: ConversationId,
        source: Option<MessageId>,
        err: &BrowserError,
    ) {
        match err.kind() {
            ErrorKind::Cancelled => info!("conversation {}: {}", conversation, err),
            ErrorKind::NotFound | ErrorKind::Rejected | ErrorKind::Collision => {
                warn!("conversation {}: {}", conversation, err)
            }
            ErrorKind::Io | ErrorKind::SizeExceeded => {
                error!("conversation {}: {}", conversation, err)
            }
        }

        let current = self
            .state
            .navigation
            .current_path(conversation)
            .map(|p| p.to_path_buf());
        let view = MenuRenderer::notice(
            &mut self.state.handles,
            err.user_message(),
            current.as_deref(),
        );

        let from_item = source.is_some_and(|id| self.state.navigation.is_item(conversation, id));
        let sent = if from_item {
            self.state
                .navigation
                .send_transient(&*self.messenger, conversation, &view)
                .await
        } else {
            self.state
                .navigation
                .render(&*self.messenger, conversation, &view)
                .await
        };
        if let Err(e) = sent {
            error!("Failed to report error to {}: {}", conversation, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    use tempfile::TempDir;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    use super::*;
    use crate::messenger::mock::RecordingMessenger;
    use crate::messenger::{IncomingMedia, MediaKind};
    use crate::transfer::TransferLimits;

    const OWNER: i64 = 7;

    struct Fixture {
        _dir: TempDir,
        drive: PathBuf,
        messenger: Arc<RecordingMessenger>,
        session: SessionOrchestrator<RecordingMessenger>,
        events: UnboundedReceiver<TransferEvent>,
    }

    fn fixture_with(messenger: RecordingMessenger, max_size: u64) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let drive = dir.path().canonicalize().unwrap();
        let mut config = ServerConfig::new(OWNER, vec![drive.clone()]);
        config.limits = TransferLimits {
            max_size,
            min_interval: Duration::ZERO,
            ..TransferLimits::default()
        };

        let messenger = Arc::new(messenger);
        let (tx, events) = mpsc::unbounded_channel();
        let session = SessionOrchestrator::new(Arc::new(config), messenger.clone(), tx);
        Fixture {
            _dir: dir,
            drive,
            messenger,
            session,
            events,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(RecordingMessenger::default(), 1024 * 1024)
    }

    impl Fixture {
        async fn send(&mut self, kind: EventKind) {
            self.session
                .handle(InboundEvent {
                    origin: OWNER,
                    conversation: OWNER,
                    kind,
                })
                .await;
        }

        async fn click(&mut self, message_id: MessageId, payload: &str) {
            self.send(EventKind::Callback {
                message_id,
                payload: payload.to_string(),
            })
            .await;
        }

        /// Primo controllo visibile il cui payload inizia con `action|`
        fn control(&self, action: &str) -> (MessageId, String) {
            let prefix = format!("{}|", action);
            self.messenger
                .live_views()
                .into_iter()
                .find_map(|(id, view)| {
                    view.payloads()
                        .find(|p| p.starts_with(&prefix))
                        .map(|p| (id, p.to_string()))
                })
                .unwrap_or_else(|| panic!("no {} control visible", action))
        }

        fn has_control(&self, action: &str) -> bool {
            let prefix = format!("{}|", action);
            self.messenger
                .live_views()
                .iter()
                .any(|(_, view)| view.payloads().any(|p| p.starts_with(&prefix)))
        }

        fn texts(&self) -> Vec<String> {
            self.messenger
                .live_views()
                .into_iter()
                .map(|(_, view)| view.text)
                .collect()
        }

        async fn open_drive(&mut self) {
            self.send(EventKind::Start).await;
            let (id, payload) = self.control("drive");
            self.click(id, &payload).await;
        }

        async fn open_files(&mut self) {
            self.open_drive().await;
            let (id, payload) = self.control("list_files");
            self.click(id, &payload).await;
        }

        async fn drain_transfers(&mut self) {
            while self.session.active_transfers() > 0 {
                let event = self.events.recv().await.unwrap();
                self.session.on_transfer_event(event).await;
            }
        }

        fn write(&self, name: &str, content: &[u8]) -> PathBuf {
            let path = self.drive.join(name);
            std::fs::write(&path, content).unwrap();
            path
        }
    }

    fn document(name: &str, size: u64) -> EventKind {
        EventKind::Media(IncomingMedia {
            message_id: 100,
            kind: MediaKind::Document,
            file_name: Some(name.to_string()),
            file_ref: "remote-ref".to_string(),
            size,
        })
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_entering_a_view_replaces_the_previous_one() {
        let mut fx = fixture();
        fx.write("a.txt", b"a");

        fx.send(EventKind::Start).await;
        assert_eq!(fx.messenger.live_ids().len(), 1);

        let (id, payload) = fx.control("drive");
        fx.click(id, &payload).await;
        let live = fx.messenger.live_ids();
        assert_eq!(live.len(), 1);
        assert!(!live.contains(&id));
        assert_eq!(fx.session.state().navigation.current_path(OWNER), Some(fx.drive.as_path()));

        let (id, payload) = fx.control("list_files");
        fx.click(id, &payload).await;
        assert_eq!(fx.messenger.live_ids().len(), 2);

        fx.click(0, "home").await;
        let texts = fx.texts();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].starts_with("File manager"));
        assert_eq!(fx.session.state().navigation.current_path(OWNER), None);
    }

    #[tokio::test]
    async fn test_back_from_drive_root_returns_to_drive_list() {
        let mut fx = fixture();
        fx.open_drive().await;

        let (menu, back) = fx.control("folder");
        fx.click(menu, &back).await;
        let texts = fx.texts();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].starts_with("File manager"));

        fx.open_drive().await;
        fx.click(0, "back").await;
        assert!(fx.texts()[0].starts_with("File manager"));
        assert_eq!(fx.session.state().navigation.current_path(OWNER), None);
    }

    #[tokio::test]
    async fn test_files_are_listed_one_page_at_a_time() {
        let mut fx = fixture();
        for i in 0..11 {
            fx.write(&format!("file{:02}.txt", i), b"data");
        }

        fx.open_files().await;
        // 10 file + messaggio di navigazione
        assert_eq!(fx.messenger.live_ids().len(), 11);
        let (nav_id, next) = fx.control("list_files");
        assert!(next.ends_with("|1"));

        fx.click(nav_id, &next).await;
        assert_eq!(fx.messenger.live_ids().len(), 2);
        assert!(!fx.has_control("list_files"));
        assert!(fx.has_control("upload"));
    }

    #[tokio::test]
    async fn test_exactly_one_page_has_no_next_control() {
        let mut fx = fixture();
        for i in 0..10 {
            fx.write(&format!("file{:02}.txt", i), b"data");
        }

        fx.open_files().await;
        assert_eq!(fx.messenger.live_ids().len(), 11);
        assert!(!fx.has_control("list_files"));
    }

    #[tokio::test]
    async fn test_second_delete_confirmation_reports_not_found() {
        let mut fx = fixture();
        let path = fx.write("a.txt", b"a");
        fx.open_files().await;

        let (file_msg, delete) = fx.control("delete");
        fx.click(file_msg, &delete).await;
        let (prompt, confirm) = fx.control("confirm_delete");

        fx.click(prompt, &confirm).await;
        assert!(!path.exists());
        assert_eq!(fx.messenger.view(prompt).unwrap().text, "File deleted: a.txt");

        fx.click(prompt, &confirm).await;
        assert!(
            fx.texts()
                .iter()
                .any(|t| t == &BrowserError::UnknownHandle(String::new()).user_message())
        );
    }

    #[tokio::test]
    async fn test_declined_delete_keeps_the_file() {
        let mut fx = fixture();
        let path = fx.write("keep.txt", b"k");
        fx.open_files().await;

        let (file_msg, delete) = fx.control("delete");
        fx.click(file_msg, &delete).await;
        let (prompt, decline) = fx.control("cancel_delete");
        fx.click(prompt, &decline).await;

        assert!(path.exists());
        assert!(fx.messenger.view(prompt).is_none());
    }

    #[tokio::test]
    async fn test_delete_of_vanished_file_releases_its_handle() {
        let mut fx = fixture();
        let path = fx.write("gone.txt", b"g");
        fx.open_files().await;

        let (file_msg, delete) = fx.control("delete");
        fx.click(file_msg, &delete).await;
        let (prompt, confirm) = fx.control("confirm_delete");
        std::fs::remove_file(&path).unwrap();

        fx.click(prompt, &confirm).await;
        assert!(fx.texts().contains(&BrowserError::Vanished(path).user_message()));

        // l'handle è stato rilasciato: ora è sconosciuto
        fx.click(prompt, &confirm).await;
        let unknown = BrowserError::UnknownHandle(String::new()).user_message();
        assert!(fx.texts().contains(&unknown));
    }

    #[tokio::test]
    async fn test_declined_open_removes_the_prompt() {
        let mut fx = fixture();
        fx.write("photo.png", b"png");
        fx.open_files().await;

        let (file_msg, execute) = fx.control("execute");
        fx.click(file_msg, &execute).await;
        let (prompt, decline) = fx.control("cancel_execute");
        assert!(fx.has_control("confirm_execute"));

        fx.click(prompt, &decline).await;
        assert!(fx.messenger.view(prompt).is_none());
        assert!(!fx.has_control("confirm_execute"));
        assert!(fx.has_control("execute"));
    }

    #[tokio::test]
    async fn test_open_outside_whitelist_is_rejected() {
        let mut fx = fixture();
        fx.write("notes.txt", b"n");
        fx.open_files().await;

        assert!(!fx.has_control("execute"));
        let (file_msg, delete) = fx.control("delete");
        let id = delete.trim_start_matches("delete|").to_string();
        fx.click(file_msg, &format!("confirm_execute|{}", id)).await;

        let invalid = BrowserError::InvalidCommand(String::new()).user_message();
        assert!(fx.texts().contains(&invalid));
    }

    #[tokio::test]
    async fn test_upload_runs_to_completion() {
        let mut fx = fixture();
        fx.write("b.txt", b"payload");
        fx.open_files().await;

        let (file_msg, upload) = fx.control("upload");
        fx.click(file_msg, &upload).await;
        let (progress, cancel) = fx.control("cancel");
        assert_eq!(&cancel[7..], &upload[7..]);
        assert_eq!(fx.session.active_transfers(), 1);

        fx.drain_transfers().await;
        assert_eq!(fx.messenger.recorded().media_sent, vec!["b.txt".to_string()]);
        assert_eq!(fx.messenger.view(progress).unwrap().text, "Sent: b.txt");
        assert!(fx.messenger.recorded().edits.contains(&progress));
    }

    #[tokio::test]
    async fn test_cancel_twice_behaves_like_once() {
        let messenger = RecordingMessenger {
            chunk_delay: Duration::from_millis(10),
            ..RecordingMessenger::default()
        };
        let mut fx = fixture_with(messenger, 1024 * 1024);
        fx.write("big.bin", &[0u8; 4096]);
        fx.open_files().await;

        let (file_msg, upload) = fx.control("upload");
        fx.click(file_msg, &upload).await;
        let (progress, cancel) = fx.control("cancel");

        fx.click(progress, &cancel).await;
        fx.click(progress, &cancel).await;
        fx.drain_transfers().await;

        let texts = fx.texts();
        assert!(fx.messenger.view(progress).is_none());
        assert_eq!(texts.iter().filter(|t| *t == "Upload cancelled.").count(), 1);
        assert!(!texts.iter().any(|t| t.contains("no active transfer")));
        assert!(fx.messenger.recorded().media_sent.is_empty());

        // a trasferimento chiuso la chiave non esiste più
        fx.click(0, &cancel).await;
        assert!(fx.texts().iter().any(|t| t.contains("no active transfer")));
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_rejected() {
        let mut fx = fixture_with(RecordingMessenger::default(), 4);
        fx.write("large.txt", b"0123456789");
        fx.open_files().await;

        assert!(!fx.has_control("upload"));
        let (file_msg, delete) = fx.control("delete");
        let id = delete.trim_start_matches("delete|").to_string();
        fx.click(file_msg, &format!("upload|{}", id)).await;

        assert_eq!(fx.session.active_transfers(), 0);
        let texts = fx.texts();
        assert!(texts.contains(&"The file exceeds the allowed size limit.".to_string()));
        // il menu in fondo alla pagina resta intatto
        assert!(texts.contains(&"Navigation:".to_string()));
    }

    #[tokio::test]
    async fn test_item_error_keeps_the_page_navigation() {
        let mut fx = fixture();
        for i in 0..11 {
            fx.write(&format!("file{:02}.txt", i), b"data");
        }
        fx.open_files().await;

        let (file_msg, upload) = fx.control("upload");
        fx.click(file_msg, &upload).await;
        fx.click(file_msg, &upload).await;

        let busy = BrowserError::TransferActive(String::new()).user_message();
        assert!(fx.texts().contains(&busy));
        assert!(fx.has_control("list_files"));
        assert_eq!(fx.session.active_transfers(), 1);
    }

    #[tokio::test]
    async fn test_incoming_media_over_limit_is_rejected() {
        let mut fx = fixture_with(RecordingMessenger::default(), 4);
        fx.open_drive().await;

        fx.send(document("big.bin", 10)).await;

        assert_eq!(fx.session.active_transfers(), 0);
        assert!(
            fx.texts()
                .contains(&"The file exceeds the allowed size limit.".to_string())
        );
        assert!(entries(&fx.drive).is_empty());
    }

    #[tokio::test]
    async fn test_photo_is_named_after_its_reference() {
        let mut fx = fixture();
        fx.open_drive().await;

        fx.send(EventKind::Media(IncomingMedia {
            message_id: 101,
            kind: MediaKind::Photo,
            file_name: None,
            file_ref: "AgACph1".to_string(),
            size: 3,
        }))
        .await;
        fx.drain_transfers().await;

        assert_eq!(entries(&fx.drive), vec!["AgACph1.jpg".to_string()]);
    }

    #[tokio::test]
    async fn test_media_without_current_folder_is_rejected() {
        let mut fx = fixture();
        fx.send(document("report.pdf", 3)).await;

        assert_eq!(fx.session.active_transfers(), 0);
        assert_eq!(
            fx.texts(),
            vec![BrowserError::NoActiveFolder.user_message()]
        );
        assert!(entries(&fx.drive).is_empty());
    }

    #[tokio::test]
    async fn test_media_is_saved_into_current_folder() {
        let mut fx = fixture();
        fx.open_drive().await;

        fx.send(document("../escape/report.pdf", 3)).await;
        fx.drain_transfers().await;

        assert_eq!(entries(&fx.drive), vec!["report.pdf".to_string()]);
        let saved = format!("File saved to:\n{}", fx.drive.join("report.pdf").display());
        assert!(fx.texts().contains(&saved));
    }

    #[tokio::test]
    async fn test_collision_rename_keeps_both_files() {
        let mut fx = fixture();
        let existing = fx.write("c.txt", b"old");
        fx.open_drive().await;

        fx.send(document("c.txt", 4)).await;
        assert_eq!(fx.session.active_transfers(), 0);
        let (prompt, rename) = fx.control("rename");
        assert!(fx.has_control("overwrite"));

        fx.click(prompt, &rename).await;
        fx.drain_transfers().await;

        assert_eq!(std::fs::read(&existing).unwrap(), b"old");
        let names = entries(&fx.drive);
        assert_eq!(names.len(), 2);
        let stamp_len = "c_.txt".len() + 14;
        assert!(
            names
                .iter()
                .any(|n| n.starts_with("c_") && n.ends_with(".txt") && n.len() == stamp_len)
        );

        // la scelta è già stata consumata
        fx.click(prompt, &rename).await;
        assert_eq!(fx.session.active_transfers(), 0);
        assert_eq!(entries(&fx.drive).len(), 2);
    }

    #[tokio::test]
    async fn test_two_renames_of_the_same_name_keep_three_files() {
        let mut fx = fixture();
        fx.write("c.txt", b"old");
        fx.open_drive().await;

        fx.send(document("c.txt", 4)).await;
        fx.send(document("c.txt", 6)).await;
        let prompts: Vec<(MessageId, String)> = fx
            .messenger
            .live_views()
            .into_iter()
            .filter_map(|(id, view)| {
                view.payloads()
                    .find(|p| p.starts_with("rename|"))
                    .map(|p| (id, p.to_string()))
            })
            .collect();
        assert_eq!(prompts.len(), 2);

        for (prompt, rename) in &prompts {
            fx.click(*prompt, rename).await;
        }
        fx.drain_transfers().await;

        let names = entries(&fx.drive);
        assert_eq!(names.len(), 3);
        let mut sizes: Vec<u64> = names
            .iter()
            .map(|n| std::fs::metadata(fx.drive.join(n)).unwrap().len())
            .collect();
        sizes.sort();
        assert_eq!(sizes, vec![3, 4, 6]);

        let saved = fx
            .texts()
            .into_iter()
            .filter(|t| t.starts_with("File saved to:"))
            .collect::<Vec<_>>();
        assert_eq!(saved.len(), 2);
        assert_ne!(saved[0], saved[1]);
    }

    #[tokio::test]
    async fn test_same_name_during_download_asks_first() {
        let mut fx = fixture();
        fx.open_drive().await;

        fx.send(document("e.txt", 4)).await;
        assert_eq!(fx.session.active_transfers(), 1);
        fx.send(document("e.txt", 6)).await;

        assert_eq!(fx.session.active_transfers(), 1);
        let (prompt, overwrite) = fx.control("overwrite");
        fx.click(prompt, &overwrite).await;
        fx.drain_transfers().await;

        let names = entries(&fx.drive);
        assert_eq!(names, vec!["e.txt".to_string(), "e_1.txt".to_string()]);
        assert_eq!(std::fs::metadata(fx.drive.join("e.txt")).unwrap().len(), 4);
        assert_eq!(std::fs::metadata(fx.drive.join("e_1.txt")).unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_collision_overwrite_replaces_content() {
        let mut fx = fixture();
        let existing = fx.write("d.txt", b"old");
        fx.open_drive().await;

        fx.send(document("d.txt", 5)).await;
        let (prompt, overwrite) = fx.control("overwrite");
        fx.click(prompt, &overwrite).await;
        fx.drain_transfers().await;

        assert_eq!(std::fs::read(&existing).unwrap(), b"xxxxx");
        assert_eq!(entries(&fx.drive), vec!["d.txt".to_string()]);
        assert!(fx.messenger.view(prompt).is_none());
    }

    #[tokio::test]
    async fn test_vanished_folder_reports_not_found() {
        let mut fx = fixture();
        std::fs::create_dir(fx.drive.join("sub")).unwrap();
        fx.open_drive().await;
        let (id, list) = fx.control("list_subfolders");
        fx.click(id, &list).await;

        let (menu, folder) = fx
            .messenger
            .live_views()
            .into_iter()
            .find_map(|(id, view)| {
                view.controls
                    .iter()
                    .flatten()
                    .find(|c| c.label == "sub")
                    .map(|c| (id, c.payload.clone()))
            })
            .unwrap();
        std::fs::remove_dir(fx.drive.join("sub")).unwrap();

        fx.click(menu, &folder).await;
        let expected = BrowserError::Vanished(fx.drive.join("sub")).user_message();
        assert!(fx.texts().contains(&expected));
    }
}
