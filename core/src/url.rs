//! Endpoint URL construction.
//!
//! Values are written with their plain string form and are not
//! percent-encoded; existing consumers pass pre-safe values and some
//! rely on literal passthrough (e.g. a path that already carries `?`).

use crate::http::QueryParams;

/// Join `base`, `relative` and `params` into a full endpoint URL.
///
/// A single leading `/` on `relative` is dropped. Empty or absent params add
/// nothing, not even a `?`.
pub fn build_url(base: &str, relative: &str, params: Option<&QueryParams>) -> String {
    let relative = relative.strip_prefix('/').unwrap_or(relative);
    let mut url = format!("{base}{relative}");
    if let Some(params) = params.filter(|p| !p.is_empty()) {
        let query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
        url.push('?');
        url.push_str(&query.join("&"));
    }
    url
}
