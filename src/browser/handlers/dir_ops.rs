use std::path::Path;

use log::info;

use crate::browser::SessionOrchestrator;
use crate::browser::handles::{Handle, HandleKind};
use crate::error::Result;
use crate::file_info::DirContents;
use crate::menu::MenuRenderer;
use crate::messenger::{ConversationId, Messenger};

/// Home: pulisce tutto ciò che resta e mostra le unità
pub async fn show_drives<M: Messenger>(
    session: &mut SessionOrchestrator<M>,
    conversation: ConversationId,
) -> Result<()> {
    session
        .state
        .navigation
        .go_home(&*session.messenger, conversation)
        .await;

    let view = MenuRenderer::drive_list(&mut session.state.handles, session.path_resolver.drives());
    session
        .state
        .navigation
        .render(&*session.messenger, conversation, &view)
        .await?;
    Ok(())
}

pub async fn go_back<M: Messenger>(
    session: &mut SessionOrchestrator<M>,
    conversation: ConversationId,
) -> Result<()> {
    match session
        .state
        .navigation
        .go_back(&*session.messenger, conversation)
        .await
    {
        Some(parent) => {
            let id = session.state.handles.allocate(parent, HandleKind::Folder);
            show_folder(session, conversation, &id).await
        }
        None => show_drives(session, conversation).await,
    }
}

pub async fn show_folder<M: Messenger>(
    session: &mut SessionOrchestrator<M>,
    conversation: ConversationId,
    id: &str,
) -> Result<()> {
    let folder = session.state.handles.resolve_existing(id)?;
    if session.path_resolver.is_above_drives(&folder.target) {
        info!("{:?} is above the exposed drives, back to drive list", folder.target);
        return show_drives(session, conversation).await;
    }
    session.path_resolver.confine(&folder.target)?;
    info!("opening folder {:?}", folder.target);

    let contents = DirContents::read(&folder.target).await?;

    session
        .state
        .navigation
        .enter(&*session.messenger, conversation, Some(folder.target.clone()))
        .await;

    let view = if contents.is_empty() {
        MenuRenderer::notice(
            &mut session.state.handles,
            format!("{} is empty.", folder.target.display()),
            Some(&folder.target),
        )
    } else {
        MenuRenderer::folder_summary(&mut session.state.handles, &folder, &contents)
    };

    session
        .state
        .navigation
        .render(&*session.messenger, conversation, &view)
        .await?;
    Ok(())
}

pub async fn list_subfolders<M: Messenger>(
    session: &mut SessionOrchestrator<M>,
    conversation: ConversationId,
    id: &str,
    page: usize,
) -> Result<()> {
    let folder = resolve_folder(session, id)?;
    let listing = session
        .menu
        .list_subfolders_page(&folder.target, page)
        .await?;

    ensure_at(session, conversation, &folder.target).await;

    let view = if listing.items.is_empty() {
        MenuRenderer::notice(
            &mut session.state.handles,
            format!("No subfolders in {}.", folder.target.display()),
            Some(&folder.target),
        )
    } else {
        session
            .menu
            .subfolder_page(&mut session.state.handles, &folder, &listing)
    };

    session
        .state
        .navigation
        .render(&*session.messenger, conversation, &view)
        .await?;
    Ok(())
}

/// Un messaggio per file, poi il messaggio di navigazione in fondo
pub async fn list_files<M: Messenger>(
    session: &mut SessionOrchestrator<M>,
    conversation: ConversationId,
    id: &str,
    page: usize,
) -> Result<()> {
    let folder = resolve_folder(session, id)?;
    let listing = session.menu.list_page(&folder.target, page).await?;

    session
        .state
        .navigation
        .enter(&*session.messenger, conversation, Some(folder.target.clone()))
        .await;

    if listing.items.is_empty() {
        let view = MenuRenderer::notice(
            &mut session.state.handles,
            format!("No files in {}.", folder.target.display()),
            Some(&folder.target),
        );
        session
            .state
            .navigation
            .render(&*session.messenger, conversation, &view)
            .await?;
        return Ok(());
    }

    info!(
        "listing page {} of {:?} ({} files)",
        page,
        folder.target,
        listing.items.len()
    );

    for file in &listing.items {
        let view = session.menu.file_item(&mut session.state.handles, file);
        session
            .state
            .navigation
            .send_transient(&*session.messenger, conversation, &view)
            .await?;
    }

    let nav = session.menu.files_nav(&folder, &listing);
    session
        .state
        .navigation
        .render(&*session.messenger, conversation, &nav)
        .await?;
    Ok(())
}

fn resolve_folder<M: Messenger>(session: &mut SessionOrchestrator<M>, id: &str) -> Result<Handle> {
    let folder = session.state.handles.resolve_existing(id)?;
    session.path_resolver.confine(&folder.target)?;
    Ok(folder)
}

/// Sostituisce la vista solo se la conversazione è altrove
async fn ensure_at<M: Messenger>(
    session: &mut SessionOrchestrator<M>,
    conversation: ConversationId,
    path: &Path,
) {
    if session.state.navigation.current_path(conversation) != Some(path) {
        session
            .state
            .navigation
            .enter(&*session.messenger, conversation, Some(path.to_path_buf()))
            .await;
    }
}
