//! # Updater
//!
//! Decides what to tell the user after checking for a newer release.
//!
//! ## Philosophy
//!
//! - **Mechanism not policy**: the HTTP client and the alert presentation
//!   live outside this crate; it only fetches through [`ReleaseSource`] and
//!   returns an [`UpdateDecision`]
//! - **Explicit checks speak, implicit checks whisper**: a check the user
//!   asked for always gets an answer, a background check only speaks up
//!   when there is something new that was not skipped

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Latest-release endpoint of the upstream repository
pub const LATEST_RELEASE_ENDPOINT: &str =
    "https://api.github.com/repos/MarkEdit-app/MarkEdit/releases/latest";

/// Release history page, offered when a check fails
pub const RELEASES_PAGE: &str = "https://github.com/MarkEdit-app/MarkEdit/releases";

/// A published release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppVersion {
    /// Version name, compared verbatim with the running version
    pub name: String,
    /// Release notes in markdown
    pub body: String,
    pub html_url: String,
    /// Set for releases that only shipped through the app store
    #[serde(default)]
    pub released_to_mas: bool,
}

impl AppVersion {
    pub fn from_json(bytes: &[u8]) -> Result<Self, UpdateError> {
        serde_json::from_slice(bytes).map_err(|err| UpdateError::Decode(err.to_string()))
    }
}

/// Raw response from the release endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Network client used to reach the release endpoint
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    async fn get(&self, url: &str) -> Result<ReleaseResponse, UpdateError>;
}

/// Error types for update checks
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    #[error("Failed to reach the server: {0}")]
    Unreachable(String),

    #[error("Release endpoint answered with status {0}")]
    BadStatus(u16),

    #[error("Failed to decode the release: {0}")]
    Decode(String),
}

impl UpdateError {
    /// Checks if the user should see this failure
    ///
    /// Only a bad status on an explicit check is surfaced; everything else
    /// is logged.
    pub fn should_report(&self, explicitly: bool) -> bool {
        explicitly && matches!(self, UpdateError::BadStatus(_))
    }
}

/// Versions the user chose to skip
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkippedVersions(BTreeSet<String>);

impl SkippedVersions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip(&mut self, name: impl Into<String>) {
        self.0.insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }
}

/// What to present after a check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateDecision {
    /// Nothing to say
    Ignored,
    /// Tell the user the running version is current
    UpToDate { current: String },
    /// Offer the release; `allow_skip` adds "Skip This Version"
    Available { version: AppVersion, allow_skip: bool },
}

/// The user's answer to an `Available` prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateResponse {
    LearnMore,
    NotNow,
    SkipThisVersion,
}

/// Decides what a check should present
pub fn decide(
    current: &str,
    release: AppVersion,
    explicitly: bool,
    skipped: &SkippedVersions,
) -> UpdateDecision {
    if !explicitly && skipped.contains(&release.name) {
        return UpdateDecision::Ignored;
    }
    if release.name == current || release.released_to_mas {
        return if explicitly {
            UpdateDecision::UpToDate {
                current: current.to_string(),
            }
        } else {
            UpdateDecision::Ignored
        };
    }
    UpdateDecision::Available {
        version: release,
        allow_skip: !explicitly,
    }
}

/// Applies the user's answer, returning a page to open if any
pub fn respond(
    response: UpdateResponse,
    version: &AppVersion,
    skipped: &mut SkippedVersions,
) -> Option<String> {
    match response {
        UpdateResponse::LearnMore => Some(version.html_url.clone()),
        UpdateResponse::SkipThisVersion => {
            skipped.skip(version.name.clone());
            None
        }
        UpdateResponse::NotNow => None,
    }
}

/// Fetches the latest release and decides what to present
pub async fn check_for_updates(
    source: &dyn ReleaseSource,
    current: &str,
    explicitly: bool,
    skipped: &SkippedVersions,
) -> Result<UpdateDecision, UpdateError> {
    let response = source.get(LATEST_RELEASE_ENDPOINT).await.map_err(|err| {
        tracing::error!(%err, "update check failed");
        err
    })?;
    if response.status != 200 {
        tracing::error!(status = response.status, "failed to get the update");
        return Err(UpdateError::BadStatus(response.status));
    }
    let release = AppVersion::from_json(&response.body)?;
    Ok(decide(current, release, explicitly, skipped))
}
