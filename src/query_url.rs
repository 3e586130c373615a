//! Query URL Builder

use url::form_urlencoded;

/// Name of the query parameter carrying the search term.
pub const QUERY_PARAM: &str = "q";

/// Build the search URL for `query` sent through an engine `template`.
///
/// The search term is `"{template} {query}"`, form-encoded as the `q`
/// parameter and appended to `address` with `?` (or `&` when `address`
/// already carries a query string).
pub fn build(template: &str, query: &str, address: &str) -> String {
    let term = format!("{} {}", template, query);
    let encoded = form_urlencoded::Serializer::new(String::new())
        .append_pair(QUERY_PARAM, &term)
        .finish();

    let separator = if address.ends_with('?') || address.ends_with('&') {
        ""
    } else if address.contains('?') {
        "&"
    } else {
        "?"
    };

    format!("{}{}{}", address, separator, encoded)
}
