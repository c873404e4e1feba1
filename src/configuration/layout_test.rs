use anyhow::Result;
use tempfile::TempDir;

use super::Layout;

#[tokio::test]
async fn it_creates_everything_but_prompts() -> Result<()> {
    let tmp_dir = TempDir::new()?;
    let layout = Layout::from_data_dir(tmp_dir.path());

    layout.ensure().await?;

    assert!(layout.sessions_dir.ends_with("chat_history"));
    assert!(layout.sessions_dir.is_dir());
    assert!(layout.exports_dir.is_dir());
    assert!(layout.attachments_dir.is_dir());
    assert!(!layout.prompts_dir.exists());

    // Running twice is fine.
    layout.ensure().await?;

    return Ok(());
}
