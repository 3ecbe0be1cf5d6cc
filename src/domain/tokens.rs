//! `~site` / `~sitecollection` URL token replacement

use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// URLs of the current page's web and site collection.
///
/// `None` means unknown; `Some("")` is a real (root) URL and still replaces tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageContext {
    pub site_absolute_url: Option<String>,
    pub site_server_relative_url: Option<String>,
    pub web_absolute_url: Option<String>,
    pub web_server_relative_url: Option<String>,
}

impl PageContext {
    /// True when neither URL used for `server_relative` replacement is known.
    pub fn lacks_urls(&self, server_relative: bool) -> bool {
        self.site_collection_url(server_relative).is_none()
            && self.web_url(server_relative).is_none()
    }

    fn site_collection_url(&self, server_relative: bool) -> Option<&str> {
        if server_relative {
            self.site_server_relative_url.as_deref()
        } else {
            self.site_absolute_url.as_deref()
        }
    }

    fn web_url(&self, server_relative: bool) -> Option<&str> {
        if server_relative {
            self.web_server_relative_url.as_deref()
        } else {
            self.web_absolute_url.as_deref()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TokenPrefix {
    /// `~site`, `~sitecollection`
    #[default]
    Standard,
    /// `#site`, `#sitecollection`
    Custom,
}

impl TokenPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenPrefix::Standard => "~",
            TokenPrefix::Custom => "#",
        }
    }
}

fn token_regex(prefix: TokenPrefix, token: &str) -> Regex {
    let pattern = format!("(?i){}{}", regex::escape(prefix.as_str()), token);
    Regex::new(&pattern).expect("escaped token pattern is valid")
}

/// Replace site-collection and web tokens in `s`.
///
/// `sitecollection` is replaced before `site` so the shorter token cannot eat
/// the longer one. Trailing slashes are trimmed from the substituted URLs.
#[instrument(level = "trace", skip(ctx))]
pub fn replace_sp_tokens(
    s: &str,
    ctx: &PageContext,
    prefix: TokenPrefix,
    server_relative: bool,
) -> String {
    let site_collection_url = ctx
        .site_collection_url(server_relative)
        .map(|u| u.trim_end_matches('/'));
    let web_url = ctx.web_url(server_relative).map(|u| u.trim_end_matches('/'));

    let mut out = s.to_string();
    if let Some(url) = site_collection_url {
        out = token_regex(prefix, "sitecollection")
            .replace_all(&out, NoExpand(url))
            .into_owned();
    }
    if let Some(url) = web_url {
        out = token_regex(prefix, "site")
            .replace_all(&out, NoExpand(url))
            .into_owned();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_only_absolute_urls_when_checking_server_relative_then_lacks_urls() {
        let ctx = PageContext {
            site_absolute_url: Some("https://x".into()),
            web_absolute_url: Some("https://x/web".into()),
            ..Default::default()
        };
        assert!(ctx.lacks_urls(true));
        assert!(!ctx.lacks_urls(false));

        let root = PageContext {
            site_server_relative_url: Some("".into()),
            ..Default::default()
        };
        assert!(!root.lacks_urls(true));
    }

    #[test]
    fn given_dollar_in_url_when_replacing_then_inserted_literally() {
        let ctx = PageContext {
            web_absolute_url: Some("https://x/$1/".into()),
            ..Default::default()
        };
        assert_eq!(
            replace_sp_tokens("~site/a", &ctx, TokenPrefix::Standard, false),
            "https://x/$1/a"
        );
    }
}
