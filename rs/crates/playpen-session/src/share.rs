//! Shareable links: `<origin>?id=<snippet id>`.

use playpen_snippet::SnippetId;
use reqwest::Url;

/// Query parameter that carries the snippet id.
pub const ID_PARAM: &str = "id";

/// A saved snippet and the URL that reopens it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    pub id: SnippetId,
    pub url: String,
}

/// Build the share URL for `id` on the playground at `origin`.
pub fn share_url(origin: &Url, id: &SnippetId) -> String {
    let mut url = origin.clone();
    url.set_fragment(None);
    url.query_pairs_mut().clear().append_pair(ID_PARAM, id.as_str());
    url.to_string()
}

/// Extract the snippet reference from a playground URL.
///
/// Empty values and the literal strings `null` and `undefined` (what a
/// browser client writes when it had no id) count as absent.
pub fn reference_from_url(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    let value = url
        .query_pairs()
        .find(|(k, _)| k == ID_PARAM)
        .map(|(_, v)| v.into_owned())?;
    is_present(&value).then_some(value)
}

/// Whether a raw reference value should be looked up at all.
pub fn is_present(raw: &str) -> bool {
    let raw = raw.trim();
    !raw.is_empty() && raw != "null" && raw != "undefined"
}
