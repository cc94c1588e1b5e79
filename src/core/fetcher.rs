use crate::utils::error::Result;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

pub fn build_client(timeout_seconds: Option<u64>) -> Result<Client> {
    let mut builder = Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(secs) = timeout_seconds {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

/// Downloads `url` into `dest` and returns the number of bytes written.
///
/// The destination is created before any request goes out, so an unwritable
/// location fails without touching the network. The status code is not
/// checked: whatever body the server returns ends up in the file.
pub async fn download_file(client: &Client, url: &str, dest: &Path) -> Result<u64> {
    let mut out = File::create(dest).await?;

    tracing::debug!("Requesting template archive from {}", url);
    let mut response = client.get(url).send().await?;

    let status = response.status();
    tracing::debug!("Template server responded with {}", status);
    if !status.is_success() {
        tracing::warn!(
            "Template server returned {}; saving the body anyway, extraction will likely fail",
            status
        );
    }

    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await? {
        out.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    out.flush().await?;

    tracing::debug!("Wrote {} bytes to {}", written, dest.display());
    Ok(written)
}
