//! Opening the post-session submission resource

use log::info;

use crate::error::{RelayError, Result};

/// Opens external resources on behalf of the session.
pub trait Navigator: Send + Sync {
    /// Open `url` in a new browsing context, leaving the session view in place.
    fn open_in_new_context(&self, url: &str) -> Result<()>;

    /// Move the current browsing context to `url`.
    fn redirect(&self, url: &str) -> Result<()>;
}

/// Navigator backed by the system web browser
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserNavigator;

impl BrowserNavigator {
    fn open(url: &str) -> Result<()> {
        url::Url::parse(url).map_err(|e| RelayError::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        webbrowser::open(url).map_err(|e| RelayError::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

impl Navigator for BrowserNavigator {
    fn open_in_new_context(&self, url: &str) -> Result<()> {
        info!("Opening submission resource {}", url);
        Self::open(url)
    }

    // A terminal has no current page to replace, so a redirect also opens the
    // browser.
    fn redirect(&self, url: &str) -> Result<()> {
        info!("Redirecting to {}", url);
        Self::open(url)
    }
}
