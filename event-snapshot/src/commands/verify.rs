use std::path::{Path, PathBuf};

use error_stack::{Result, ResultExt};
use tokio::io::AsyncReadExt;
use tracing::info;

use crate::output::SnapshotDocument;
use crate::Error;

#[derive(clap::Args, Debug)]
pub struct Args {
    /// Snapshot artifact to audit, either a full envelope or a bare snapshot. Use - for stdin
    file: PathBuf,
}

pub async fn run(args: Args) -> Result<Option<String>, Error> {
    let content = read(&args.file)
        .await
        .change_context(Error::ReadFile)
        .attach_printable_lazy(|| args.file.display().to_string())?;

    verify(&content).map(Some)
}

fn verify(content: &str) -> Result<String, Error> {
    let document = SnapshotDocument::parse(content).change_context(Error::ReadFile)?;
    let snapshot = document.snapshot();

    snapshot.verify().change_context(Error::Verify)?;

    info!(
        events = snapshot.event_count(),
        from_block = snapshot.from_block(),
        to_block = snapshot.to_block(),
        "snapshot verified"
    );

    Ok(format!(
        "verified commitmentKeccak {} over {} events",
        snapshot.commitment(),
        snapshot.event_count()
    ))
}

async fn read(path: &Path) -> Result<String, std::io::Error> {
    let mut content = String::new();

    if path == Path::new("-") {
        tokio::io::stdin().read_to_string(&mut content).await?;
    } else {
        content = tokio::fs::read_to_string(path).await?;
    }

    Ok(content)
}
