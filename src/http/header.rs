/// Returns the canonical form of a header name.
///
/// The first letter and every letter following a hyphen are upper-cased,
/// the rest lower-cased: "content-type" becomes "Content-Type". Names that
/// contain anything outside the HTTP token alphabet are returned unchanged.
///
/// ```
/// # use lantern::http::header::canonical_header_key;
/// assert_eq!(canonical_header_key("last-MODIFIED"), "Last-Modified");
/// assert_eq!(canonical_header_key("bad key"), "bad key");
/// ```
pub fn canonical_header_key(key: &str) -> String {
    if !key.bytes().all(is_token_byte) {
        return key.to_string();
    }

    let mut upper = true;
    key.chars()
        .map(|c| {
            let out = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            out
        })
        .collect()
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}
