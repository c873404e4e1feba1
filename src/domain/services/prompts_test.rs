use std::fs;

use anyhow::Result;
use tempfile::TempDir;
use test_utils::prompt_fixture;

use super::PromptCatalog;
use crate::domain::models::ChatError;

#[tokio::test]
async fn it_loads_prompts_with_exact_content() -> Result<()> {
    let tmp_dir = TempDir::new()?;
    let multiline = "Line one.\n\n  Indented line two.\n";
    fs::write(tmp_dir.path().join("assistant.txt"), prompt_fixture())?;
    fs::write(tmp_dir.path().join("writer.txt"), multiline)?;

    let loaded = PromptCatalog::new(tmp_dir.path().to_path_buf())
        .list()
        .await?;

    assert!(loaded.skipped.is_empty());
    assert_eq!(loaded.prompts.len(), 2);
    assert_eq!(loaded.prompts[0].name, "assistant.txt");
    assert_eq!(loaded.prompts[0].content, "You are helpful.");
    assert_eq!(loaded.prompts[1].name, "writer.txt");
    assert_eq!(loaded.prompts[1].content, multiline);

    return Ok(());
}

#[tokio::test]
async fn it_ignores_non_text_files_and_directories() -> Result<()> {
    let tmp_dir = TempDir::new()?;
    fs::write(tmp_dir.path().join("assistant.txt"), prompt_fixture())?;
    fs::write(tmp_dir.path().join("notes.md"), "# Not a prompt")?;
    fs::create_dir(tmp_dir.path().join("nested.txt"))?;

    let loaded = PromptCatalog::new(tmp_dir.path().to_path_buf())
        .list()
        .await?;

    assert_eq!(loaded.prompts.len(), 1);
    assert_eq!(loaded.prompts[0].name, "assistant.txt");
    assert!(loaded.skipped.is_empty());

    return Ok(());
}

#[tokio::test]
async fn it_skips_unreadable_files() -> Result<()> {
    let tmp_dir = TempDir::new()?;
    fs::write(tmp_dir.path().join("assistant.txt"), prompt_fixture())?;
    fs::write(tmp_dir.path().join("broken.txt"), [0xff, 0xfe, 0xfd])?;

    let loaded = PromptCatalog::new(tmp_dir.path().to_path_buf())
        .list()
        .await?;

    assert_eq!(loaded.prompts.len(), 1);
    assert_eq!(loaded.prompts[0].name, "assistant.txt");
    assert_eq!(loaded.skipped.len(), 1);
    match &loaded.skipped[0] {
        ChatError::PromptLoadFailed { name, .. } => assert_eq!(name, "broken.txt"),
        err => panic!("unexpected error {err:?}"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_fails_on_missing_directory() -> Result<()> {
    let tmp_dir = TempDir::new()?;
    let res = PromptCatalog::new(tmp_dir.path().join("missing"))
        .list()
        .await;

    let err = res.err().unwrap();
    assert!(matches!(
        err.downcast_ref::<ChatError>(),
        Some(ChatError::PromptDirectoryMissing(_))
    ));

    return Ok(());
}

#[tokio::test]
async fn it_returns_empty_for_empty_directory() -> Result<()> {
    let tmp_dir = TempDir::new()?;
    let loaded = PromptCatalog::new(tmp_dir.path().to_path_buf())
        .list()
        .await?;

    assert!(loaded.prompts.is_empty());

    return Ok(());
}
