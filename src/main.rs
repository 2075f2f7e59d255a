//! Command-line host for the zip viewer.
//!
//! Opens one archive as a document, then either prints its listing (text or
//! HTML), extracts the named entries, or serves view events from stdin.

use anyhow::{Result, bail};
use clap::Parser;
use log::warn;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use zipview::{
    ArchiveBackend, Cli, DocumentId, HostRequest, Session, StorageRoot, ViewEvent, ZipBackend,
    render_page,
};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    // An empty root is treated as unset; extraction then reports it
    let storage_root = cli
        .storage_root
        .clone()
        .filter(|p| !p.as_os_str().is_empty())
        .map(StorageRoot::new)
        .transpose()?;

    let mut session = Session::new(ZipBackend, storage_root);
    let (id, listing) = session.open_document(&cli.file).await?;

    if cli.prints_listing() {
        if cli.html {
            print!("{}", render_page(&listing));
        } else {
            print!("{listing}");
        }
    } else if cli.events {
        serve_events(&mut session, id).await?;
    } else {
        extract_entries(&session, id, &cli).await?;
    }

    session.close_document(id);
    Ok(())
}

/// Extract each requested entry, reporting failures without stopping.
async fn extract_entries<B: ArchiveBackend>(
    session: &Session<B>,
    id: DocumentId,
    cli: &Cli,
) -> Result<()> {
    let mut failed = 0usize;

    for name in &cli.entries {
        match session.open_entry(id, name).await {
            Ok(file) => {
                if !cli.is_very_quiet() {
                    println!("{}", file.path.display());
                }
            }
            Err(err) => {
                failed += 1;
                if !cli.is_quiet() {
                    eprintln!("{err}");
                }
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} entries could not be extracted", cli.entries.len());
    }
    Ok(())
}

/// Answer JSON-line view events from stdin with JSON-line host requests.
async fn serve_events<B: ArchiveBackend>(session: &mut Session<B>, id: DocumentId) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let requests = match serde_json::from_str::<ViewEvent>(line) {
            Ok(event) => session.handle_event(id, event).await,
            Err(err) => {
                warn!("ignoring malformed event {line:?}: {err}");
                vec![HostRequest::ShowMessage {
                    text: format!("invalid event: {err}"),
                }]
            }
        };

        for request in &requests {
            let mut out = serde_json::to_vec(request)?;
            out.push(b'\n');
            stdout.write_all(&out).await?;
        }
        stdout.flush().await?;
    }

    Ok(())
}
