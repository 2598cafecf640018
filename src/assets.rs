//! Static bundle serving with an entry-document fallback.
//!
//! The client bundle is served straight from disk; any path that is not
//! a bundle file (and was not claimed by a probe or the forwarding
//! prefix) gets the entry document instead, so client-side routes
//! resolve on hard refresh. The service is wired as the router's
//! fallback — last-checked by construction.

use std::path::Path;

use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_status::SetStatus;

use crate::error::GatewayError;

/// The single HTML document bootstrapping the client application.
pub const ENTRY_DOCUMENT: &str = "index.html";

pub fn bundle_service(dir: &Path) -> ServeDir<SetStatus<ServeFile>> {
    ServeDir::new(dir).not_found_service(ServeFile::new(dir.join(ENTRY_DOCUMENT)))
}

/// Startup check: a bundle without its entry document would turn every
/// client route into a 404, so fail fast instead.
pub async fn ensure_entry_document(dir: &Path) -> Result<(), GatewayError> {
    let path = dir.join(ENTRY_DOCUMENT);
    if tokio::fs::try_exists(&path).await.unwrap_or(false) {
        Ok(())
    } else {
        Err(GatewayError::EntryDocumentMissing { path })
    }
}
