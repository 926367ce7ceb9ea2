//! The browsing surface boundary.
//!
//! A surface accepts a location to load and reports back, as events, every
//! location it ends up showing. The session only consumes the location; the
//! other fields are for display.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::{redirect, Client};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::ApiError;
use crate::models::{NavigationEvent, PortalLocation};

/// Redirect hops followed before a load is abandoned.
const MAX_REDIRECTS: usize = 10;

/// Page title shown in the browsing view is cut to this many characters.
const MAX_TITLE_LENGTH: usize = 120;

static TITLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid regex"));

/// Something the surface wants the application to know.
#[derive(Debug, Clone)]
pub enum SurfaceEvent {
    /// An intermediate redirect hop is now the displayed location.
    Redirected(NavigationEvent),
    /// A page finished loading.
    Loaded {
        event: NavigationEvent,
        status: u16,
        title: Option<String>,
    },
    /// A load could not complete. The displayed location is unchanged.
    Failed {
        location: PortalLocation,
        reason: String,
    },
}

impl SurfaceEvent {
    /// Navigation carried by this event, if any.
    pub fn navigation(&self) -> Option<&NavigationEvent> {
        match self {
            SurfaceEvent::Redirected(event) | SurfaceEvent::Loaded { event, .. } => Some(event),
            SurfaceEvent::Failed { .. } => None,
        }
    }
}

/// Anything that can display a location and report navigation.
pub trait BrowsingSurface {
    /// Start showing `location`. Outcomes arrive as [`SurfaceEvent`]s.
    fn load(&mut self, location: &PortalLocation);
}

/// Surface that fetches pages over HTTP, following redirects.
pub struct HttpSurface {
    client: Client,
    events: mpsc::UnboundedSender<SurfaceEvent>,
}

impl HttpSurface {
    /// Must be called inside a Tokio runtime; loads run as spawned tasks.
    pub fn new(
        events: mpsc::UnboundedSender<SurfaceEvent>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let hops = events.clone();
        let policy = redirect::Policy::custom(move |attempt| {
            if attempt.previous().len() >= MAX_REDIRECTS {
                return attempt.error("too many redirects");
            }
            let _ = hops.send(SurfaceEvent::Redirected(NavigationEvent::new(
                attempt.url().as_str(),
            )));
            attempt.follow()
        });

        let client = Client::builder()
            .timeout(timeout)
            .redirect(policy)
            .build()?;

        Ok(Self { client, events })
    }

    async fn fetch(client: Client, location: PortalLocation) -> SurfaceEvent {
        let response = match client.get(location.as_str()).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Page load failed");
                return SurfaceEvent::Failed {
                    location,
                    reason: e.to_string(),
                };
            }
        };

        let status = response.status().as_u16();
        let final_location = PortalLocation::new(response.url().as_str());
        let body = response.text().await.unwrap_or_default();

        debug!(status, location = %final_location, "Page loaded");

        SurfaceEvent::Loaded {
            event: NavigationEvent::new(final_location),
            status,
            title: extract_title(&body),
        }
    }
}

impl BrowsingSurface for HttpSurface {
    fn load(&mut self, location: &PortalLocation) {
        let client = self.client.clone();
        let events = self.events.clone();
        let location = location.clone();

        tokio::spawn(async move {
            let outcome = Self::fetch(client, location).await;
            let _ = events.send(outcome);
        });
    }
}

/// Pull the `<title>` text out of an HTML document.
pub fn extract_title(html: &str) -> Option<String> {
    let raw = TITLE_PATTERN.captures(html)?.get(1)?.as_str();
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }
    Some(collapsed.chars().take(MAX_TITLE_LENGTH).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title() {
        assert_eq!(
            extract_title("<html><head><title>Tenant One</title></head></html>"),
            Some("Tenant One".to_string())
        );
        assert_eq!(
            extract_title("<TITLE lang=\"en\">\n  Multi\n  line  </TITLE>"),
            Some("Multi line".to_string())
        );
    }

    #[test]
    fn test_extract_title_missing_or_blank() {
        assert_eq!(extract_title("<html><body>no title</body></html>"), None);
        assert_eq!(extract_title("<title>   </title>"), None);
        assert_eq!(extract_title(""), None);
    }

    #[test]
    fn test_extract_title_is_capped() {
        let html = format!("<title>{}</title>", "a".repeat(500));
        assert_eq!(extract_title(&html).map(|t| t.len()), Some(MAX_TITLE_LENGTH));
    }

    #[test]
    fn test_failed_event_carries_no_navigation() {
        let failed = SurfaceEvent::Failed {
            location: PortalLocation::from("https://a"),
            reason: "refused".to_string(),
        };
        assert!(failed.navigation().is_none());

        let redirected = SurfaceEvent::Redirected(NavigationEvent::new("https://b"));
        assert_eq!(
            redirected.navigation().map(|e| e.location.as_str()),
            Some("https://b")
        );
    }
}
