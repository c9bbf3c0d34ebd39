use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters escaped when a public id is placed in a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'?')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Encodes a hierarchical public id (`folder/sub/id`) into one URL path segment.
pub fn encode_public_id(public_id: &str) -> String {
    utf8_percent_encode(public_id, SEGMENT).to_string()
}

/// Route that deletes `public_id` through `DELETE /upload/{segment}`.
pub fn delete_path(public_id: &str) -> String {
    format!("/upload/{}", encode_public_id(public_id))
}

/// Recovers the store identifier from an already percent-decoded path segment.
///
/// A segment that still contains `/` after decoding was produced by
/// [`encode_public_id`] and is used verbatim. Otherwise the legacy form is
/// assumed, where every `-` stands in for a `/`.
pub fn decode_public_id(segment: &str) -> String {
    if segment.contains('/') {
        return segment.to_string();
    }
    segment.replace('-', "/")
}
