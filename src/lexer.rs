//! Tag lexer for annotation blocks.
//!
//! An annotation block is the text of one comment region with its comment
//! markers already stripped. The lexer cuts it into [`Tag`]s: a tag starts on a
//! line whose first whitespace-delimited run is `@` followed by letters only
//! (`@apiParam`), and its body runs until the next tag start or the end of the
//! block. Bodies keep their internal newlines and indentation, which is what
//! lets a formatted JSON example span several lines as one tag body.
//!
//! There is no escaping: a body line that starts with `@name ` always opens a
//! new tag.

use crate::error::{Error, ErrorKind, Result};
use log::debug;

/// Position in a source file, both 1-based
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// One `@name body` unit of an annotation block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Tag name without the leading `@`
    pub name: String,
    /// Everything after the name up to the next tag, trailing whitespace trimmed
    pub body: String,
    /// Position of the `@` in the source file
    pub location: Location,
}

impl Tag {
    /// Split the body into at most `count` fields.
    ///
    /// The first `count - 1` fields are whitespace-delimited tokens. The last
    /// field is the remainder of the body, kept verbatim apart from its outer
    /// whitespace. Fewer fields are returned when the body runs out.
    pub fn fields(&self, count: usize) -> Vec<&str> {
        split_fields(&self.body, count)
    }
}

/// See [`Tag::fields`]
pub fn split_fields(body: &str, count: usize) -> Vec<&str> {
    let mut fields = Vec::with_capacity(count);
    if count == 0 {
        return fields;
    }

    let mut rest = body.trim_start();
    while !rest.is_empty() && fields.len() + 1 < count {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        fields.push(&rest[..end]);
        rest = rest[end..].trim_start();
    }

    let rest = rest.trim_end();
    if !rest.is_empty() {
        fields.push(rest);
    }
    fields
}

/// Splits annotation blocks into tags
pub struct Lexer<'a> {
    text: &'a str,
    origin: Location,
}

impl<'a> Lexer<'a> {
    /// Create a lexer for a block whose first character sits at `origin` in its file
    pub fn new(text: &'a str, origin: Location) -> Self {
        Self { text, origin }
    }

    /// Lex the whole block.
    ///
    /// Prose before the first tag is ignored. Unknown tag names are kept; it
    /// is the dispatcher's job to drop them.
    ///
    /// # Errors
    ///
    /// Returns a `LexError` when a line starts with a run that begins with
    /// `@api` but is not a valid tag name, such as `@api-param`.
    pub fn tokenize(&self) -> Result<Vec<Tag>> {
        let mut tags = Vec::new();
        let mut current: Option<Tag> = None;

        for (index, line) in self.text.lines().enumerate() {
            let trimmed = line.trim_start();
            let indent = line[..line.len() - trimmed.len()].chars().count();
            let run = trimmed.split(char::is_whitespace).next().unwrap_or("");

            match tag_name(run) {
                Some(name) => {
                    if let Some(tag) = current.take() {
                        tags.push(finish(tag));
                    }
                    current = Some(Tag {
                        name: name.to_string(),
                        body: trimmed[run.len()..].trim_start().to_string(),
                        location: self.location_of(index, indent),
                    });
                }
                None if run.starts_with("@api") => {
                    return Err(Error::new(ErrorKind::LexError, "")
                        .at(self.location_of(index, indent)));
                }
                None => {
                    if let Some(tag) = current.as_mut() {
                        tag.body.push('\n');
                        tag.body.push_str(line);
                    }
                }
            }
        }

        if let Some(tag) = current.take() {
            tags.push(finish(tag));
        }

        debug!("Lexed {} tags at {}:{}", tags.len(), self.origin.line, self.origin.column);
        Ok(tags)
    }

    fn location_of(&self, index: usize, indent: usize) -> Location {
        let column = if index == 0 { self.origin.column } else { 1 };
        Location::new(self.origin.line + index, column + indent)
    }
}

/// Lex a block that starts at line 1, column 1
pub fn lex(text: &str) -> Result<Vec<Tag>> {
    Lexer::new(text, Location::new(1, 1)).tokenize()
}

fn tag_name(run: &str) -> Option<&str> {
    let name = run.strip_prefix('@')?;
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(name)
    } else {
        None
    }
}

fn finish(mut tag: Tag) -> Tag {
    let len = tag.body.trim_end().len();
    tag.body.truncate(len);
    tag
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_tags() {
        let tags = lex("@apiHeader content-type required json\n@apiHeader ETag optional etag").unwrap();

        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "apiHeader");
        assert_eq!(tags[0].body, "content-type required json");
        assert_eq!(tags[1].name, "apiHeader");
        assert_eq!(tags[1].body, "ETag optional etag");
    }

    #[test]
    fn test_multi_line_body_keeps_indentation() {
        let block = "@apiExample application/json summary\n{\n\t\"id\": 1\n}\n@apiParam id int required ID";
        let tags = lex(block).unwrap();

        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].body, "application/json summary\n{\n\t\"id\": 1\n}");
        assert_eq!(tags[1].name, "apiParam");
    }

    #[test]
    fn test_indented_tag_lines() {
        let block = "@apiHeader a optional first\n\t@apiParam id int required ID\n    @apiUnknown xxx";
        let tags = lex(block).unwrap();

        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["apiHeader", "apiParam", "apiUnknown"]);
        assert_eq!(tags[1].location, Location::new(2, 2));
        assert_eq!(tags[2].location, Location::new(3, 5));
    }

    #[test]
    fn test_prose_before_first_tag_is_ignored() {
        let tags = lex("Some description of the handler.\n\n@api GET /users list users").unwrap();

        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "api");
        assert_eq!(tags[0].location.line, 3);
    }

    #[test]
    fn test_empty_block() {
        assert!(lex("").unwrap().is_empty());
        assert!(lex("just a comment").unwrap().is_empty());
    }

    #[test]
    fn test_trailing_whitespace_trimmed() {
        let tags = lex("@apiResponse 200 array.object * \n\n").unwrap();
        assert_eq!(tags[0].body, "200 array.object *");
    }

    #[test]
    fn test_at_sign_inside_run_does_not_start_tag() {
        let block = "@apiExample json sample\n@user.name is not a tag\n\"@apiParam\": 1";
        let tags = lex(block).unwrap();

        assert_eq!(tags.len(), 1);
        assert!(tags[0].body.contains("@user.name is not a tag"));
        assert!(tags[0].body.contains("\"@apiParam\": 1"));
    }

    #[test]
    fn test_tag_like_line_always_starts_new_tag() {
        // No escaping: a body line opening with `@name ` is always a new tag
        let block = "@apiExample text/plain sample\nline one\n@apiParam x\nline two";
        let tags = lex(block).unwrap();

        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].body, "text/plain sample\nline one");
        assert_eq!(tags[1].body, "x\nline two");
    }

    #[test]
    fn test_malformed_api_tag_is_lex_error() {
        let err = lex("@api GET /users\n  @api-param id").unwrap_err();

        assert_eq!(err.kind, ErrorKind::LexError);
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 3);
    }

    #[test]
    fn test_location_uses_block_origin() {
        let lexer = Lexer::new("@api GET /\n@apiTags users", Location::new(10, 4));
        let tags = lexer.tokenize().unwrap();

        assert_eq!(tags[0].location, Location::new(10, 4));
        assert_eq!(tags[1].location, Location::new(11, 1));
    }

    #[test]
    fn test_split_fields_greedy_last() {
        assert_eq!(
            split_fields("content-type required json 或 xml", 3),
            vec!["content-type", "required", "json 或 xml"]
        );
        assert_eq!(split_fields("  a   b  ", 3), vec!["a", "b"]);
        assert_eq!(split_fields("a b\n  c d", 2), vec!["a", "b\n  c d"]);
        assert!(split_fields("", 3).is_empty());
        assert!(split_fields("a b", 0).is_empty());
    }
}
