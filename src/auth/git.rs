//! Git credentials for pushing the update branch
//!
//! The token is handed to git as an `Authorization` extra header scoped to
//! the GitHub server URL, and removed again by the post phase.

use crate::error::Result;
use crate::git::Git;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use tracing::debug;

/// Default GitHub server URL
pub const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Extra-header credentials for one GitHub server
pub struct GitAuth {
    server_url: String,
    token: String,
    mask: bool,
}

impl GitAuth {
    /// Credentials for `token` on `server_url`
    pub fn new(server_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            token: token.into(),
            mask: false,
        }
    }

    /// Emit a GitHub Actions `::add-mask::` command for the encoded token
    #[must_use]
    pub const fn masked(mut self, mask: bool) -> Self {
        self.mask = mask;
        self
    }

    /// Base64 of `x-access-token:<token>`
    pub fn encoded_credentials(&self) -> String {
        BASE64.encode(format!("x-access-token:{}", self.token))
    }

    /// Value written to the extra-header key
    pub fn header_value(&self) -> String {
        format!("Authorization: basic {}", self.encoded_credentials())
    }

    /// Configure the extra header in the local repository
    pub async fn setup(&self, git: &dyn Git) -> Result<()> {
        let credentials = self.encoded_credentials();
        if self.mask {
            println!("::add-mask::{credentials}");
        }

        let key = extraheader_key(&self.server_url);
        debug!("Setting {key}");
        git.config(&key, &self.header_value()).await
    }
}

/// Remove the extra header configured by [`GitAuth::setup`]
pub async fn cleanup(git: &dyn Git, server_url: &str) -> Result<()> {
    let key = extraheader_key(server_url);
    debug!("Unsetting {key}");
    git.unset_config(&key).await
}

/// `http.<server-url>/.extraheader`
pub fn extraheader_key(server_url: &str) -> String {
    format!("http.{}/.extraheader", server_url.trim_end_matches('/'))
}
