//! Graph API endpoint paths, relative to the configured base URL.
//!
//! Caller IDs are percent-encoded before they enter a path. `/` and `:` are
//! left alone since external IDs such as `DOI:10.1038/nature14539` use them.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

pub const PAPER_SEARCH: &str = "/graph/v1/paper/search";
pub const AUTHOR_SEARCH: &str = "/graph/v1/author/search";

/// Bytes that URL parsing would read as a path terminator or an escape.
const ID_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

fn encode_id(id: &str) -> String {
    utf8_percent_encode(id, ID_ENCODE_SET).to_string()
}

#[must_use]
pub fn paper(paper_id: &str) -> String {
    format!("/graph/v1/paper/{}", encode_id(paper_id))
}

#[must_use]
pub fn paper_authors(paper_id: &str) -> String {
    format!("/graph/v1/paper/{}/authors", encode_id(paper_id))
}

#[must_use]
pub fn paper_citations(paper_id: &str) -> String {
    format!("/graph/v1/paper/{}/citations", encode_id(paper_id))
}

#[must_use]
pub fn paper_references(paper_id: &str) -> String {
    format!("/graph/v1/paper/{}/references", encode_id(paper_id))
}

#[must_use]
pub fn author(author_id: &str) -> String {
    format!("/graph/v1/author/{}", encode_id(author_id))
}

#[must_use]
pub fn author_papers(author_id: &str) -> String {
    format!("/graph/v1/author/{}/papers", encode_id(author_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_ids_kept_readable() {
        assert_eq!(paper("DOI:10.1038/nature14539"), "/graph/v1/paper/DOI:10.1038/nature14539");
        assert_eq!(paper_citations("ARXIV:2106.15928"), "/graph/v1/paper/ARXIV:2106.15928/citations");
    }

    #[test]
    fn test_query_and_fragment_chars_encoded() {
        assert_eq!(paper_authors("abc?x=1"), "/graph/v1/paper/abc%3Fx=1/authors");
        assert_eq!(paper("abc#frag"), "/graph/v1/paper/abc%23frag");
        assert_eq!(author("a b%2E"), "/graph/v1/author/a%20b%252E");
        assert_eq!(author_papers("x\\y"), "/graph/v1/author/x%5Cy/papers");
    }
}
