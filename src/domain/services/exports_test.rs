use std::fs;
use std::io::Cursor;
use std::io::Read;

use anyhow::Result;
use tempfile::TempDir;

use super::Exports;
use super::PendingExport;
use crate::domain::models::ChatError;
use crate::domain::models::ExportFormat;
use crate::domain::models::Message;
use crate::domain::models::Role;
use crate::domain::services::Sessions;

const SESSION_ID: &str = "3d6c9a2e-8b1f-4c7d-a5e0-9f8b7c6d5e4a";

async fn setup(tmp_dir: &TempDir) -> Result<Exports> {
    let sessions = Sessions::new(tmp_dir.path().join("chat_history"));
    sessions
        .save(
            SESSION_ID,
            &[
                Message::new(Role::System, "You are helpful.".into()),
                Message::new(Role::User, "Hello".into()),
                Message::new(Role::Assistant, "Hi there!".into()),
            ],
        )
        .await?;

    return Ok(Exports::new(sessions, tmp_dir.path().join("exported_chats")));
}

fn exports_dir_entries(tmp_dir: &TempDir) -> usize {
    return fs::read_dir(tmp_dir.path().join("exported_chats"))
        .map(|dir| return dir.count())
        .unwrap_or(0);
}

fn assert_chat_error(err: anyhow::Error, check: fn(&ChatError) -> bool) {
    let chat_err = err.downcast_ref::<ChatError>();
    assert!(chat_err.is_some(), "expected a ChatError, got {err:?}");
    assert!(check(chat_err.unwrap()), "unexpected error {err:?}");
}

#[tokio::test]
async fn it_builds_document_without_system_messages() -> Result<()> {
    let tmp_dir = TempDir::new()?;
    let exports = setup(&tmp_dir).await?;

    let document = exports.document(SESSION_ID).await?;
    let texts = document
        .paragraphs
        .iter()
        .map(|e| return e.text.as_str())
        .collect::<Vec<&str>>();

    assert_eq!(document.title, format!("Chat Session: {SESSION_ID}"));
    assert_eq!(texts, vec!["User: Hello", "Assistant: Hi there!"]);

    return Ok(());
}

#[tokio::test]
async fn it_renders_markdown() -> Result<()> {
    let tmp_dir = TempDir::new()?;
    let exports = setup(&tmp_dir).await?;

    let text = String::from_utf8(exports.render(SESSION_ID, ExportFormat::Markdown).await?)?;
    insta::assert_snapshot!(text, @r###"
    # Chat Session: 3d6c9a2e-8b1f-4c7d-a5e0-9f8b7c6d5e4a

    > User: Hello

    Assistant: Hi there!
    "###);

    return Ok(());
}

#[tokio::test]
async fn it_fails_without_active_session() -> Result<()> {
    let tmp_dir = TempDir::new()?;
    let exports = setup(&tmp_dir).await?;

    let err = exports
        .prepare(None, ExportFormat::Docx)
        .await
        .err()
        .unwrap();

    assert_chat_error(err, |e| return matches!(e, ChatError::ExportNotFound(_)));
    assert_eq!(exports_dir_entries(&tmp_dir), 0);

    return Ok(());
}

#[tokio::test]
async fn it_fails_for_session_without_history() -> Result<()> {
    let tmp_dir = TempDir::new()?;
    let exports = setup(&tmp_dir).await?;

    let err = exports
        .prepare(Some("missing"), ExportFormat::Docx)
        .await
        .err()
        .unwrap();

    assert_chat_error(err, |e| return matches!(e, ChatError::ExportNotFound(_)));
    assert_eq!(exports_dir_entries(&tmp_dir), 0);

    return Ok(());
}

#[tokio::test]
async fn it_saves_to_destination() -> Result<()> {
    let tmp_dir = TempDir::new()?;
    let exports = setup(&tmp_dir).await?;

    let pending = exports.prepare(Some(SESSION_ID), ExportFormat::Docx).await?;
    assert_eq!(pending.file_name, format!("{SESSION_ID}.docx"));
    assert!(pending.temp_path.exists());

    let destination = tmp_dir.path().join("out").join("chat.docx");
    let saved = pending.save_to(&destination).await?;

    assert_eq!(saved, destination);
    assert_eq!(exports_dir_entries(&tmp_dir), 0);

    let bytes = fs::read(&destination)?;
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut body = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut body)?;
    assert!(body.contains("User: Hello"));
    assert!(body.contains("Hi there!"));
    assert!(!body.contains("You are helpful."));

    return Ok(());
}

#[tokio::test]
async fn it_removes_artifact_when_cancelled() -> Result<()> {
    let tmp_dir = TempDir::new()?;
    let exports = setup(&tmp_dir).await?;

    let pending = exports.prepare(Some(SESSION_ID), ExportFormat::Markdown).await?;
    assert_eq!(pending.file_name, format!("{SESSION_ID}.md"));
    assert_eq!(exports_dir_entries(&tmp_dir), 1);

    pending.discard().await?;
    assert_eq!(exports_dir_entries(&tmp_dir), 0);

    return Ok(());
}

#[tokio::test]
async fn it_removes_artifact_when_save_fails() -> Result<()> {
    let tmp_dir = TempDir::new()?;
    let exports = setup(&tmp_dir).await?;
    let destination = tmp_dir.path().join("taken");
    fs::create_dir_all(destination.join("not-empty"))?;

    let pending = exports.prepare(Some(SESSION_ID), ExportFormat::Docx).await?;
    let err = pending.save_to(&destination).await.err().unwrap();

    assert_chat_error(err, |e| return matches!(e, ChatError::ExportSaveFailed { .. }));
    assert_eq!(exports_dir_entries(&tmp_dir), 0);

    return Ok(());
}

#[tokio::test]
async fn it_reports_save_failure_when_cleanup_fails() -> Result<()> {
    let tmp_dir = TempDir::new()?;
    let destination = tmp_dir.path().join("taken");
    fs::create_dir_all(destination.join("not-empty"))?;
    let staged = tmp_dir.path().join("staged");
    fs::create_dir_all(staged.join("inner"))?;

    let pending = PendingExport {
        session_id: SESSION_ID.to_string(),
        file_name: format!("{SESSION_ID}.docx"),
        temp_path: staged.to_path_buf(),
    };
    let err = pending.save_to(&destination).await.err().unwrap();

    assert_chat_error(err, |e| return matches!(e, ChatError::ExportSaveFailed { .. }));
    assert!(staged.exists());

    return Ok(());
}

#[tokio::test]
async fn it_treats_invalid_ids_as_missing_history() -> Result<()> {
    let tmp_dir = TempDir::new()?;
    let exports = setup(&tmp_dir).await?;

    let err = exports.document("..").await.err().unwrap();
    assert_chat_error(err, |e| return matches!(e, ChatError::ExportNotFound(_)));

    return Ok(());
}
