//! Tag parsers: turn a lexed tag stream into document model entities.
//!
//! Every tag kind has a fixed grammar: an ordered list of whitespace-delimited
//! fields followed by one greedy trailing field that keeps the rest of the body
//! verbatim. A tag with fewer fields than its grammar's minimum is dropped
//! without an error. Type tokens and response statuses are the exception: a
//! malformed one cannot be guessed, so it fails the parse.
//!
//! | Tag                | Grammar                                       | Minimum        |
//! |--------------------|-----------------------------------------------|----------------|
//! | `@apidoc`          | `title` NL `description`                      | 1              |
//! | `@apiVersion`      | `version`                                     | 1              |
//! | `@apiServer`       | `url description…`                            | 1              |
//! | `@apiLicense`      | `name url`                                    | 1              |
//! | `@apiTag`          | `name description…`                           | 1              |
//! | `@apiExternalDocs` | `url description…`                            | 1              |
//! | `@api`             | `method path summary…` NL `description`       | 2              |
//! | `@apiTags`         | `name[,name…]`                                | 1              |
//! | `@apiParam`        | `name type flag description…`                 | 3              |
//! | `@apiQuery`        | `name type flag description…`                 | 3              |
//! | `@apiHeader`       | `name flag summary…`                          | 2              |
//! | `@apiExample`      | `mimetype summary…` NL `value`                | mimetype+value |
//! | `@apiRequest`      | `type mimetype description…`                  | 2              |
//! | `@apiResponse`     | `status type mimetype description…`           | 3              |

use crate::doc::{
    Api, Body, Doc, Example, ExternalDocs, Group, Header, HttpMethod, License, Param, Request,
    Response, Server,
};
use crate::error::{Error, ErrorKind, Result};
use crate::lexer::{split_fields, Tag};
use crate::type_grammar::Type;
use indexmap::IndexMap;
use log::{debug, warn};

/// The closed set of tags the parsers understand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Apidoc,
    Version,
    Server,
    License,
    Tag,
    ExternalDocs,
    Api,
    Tags,
    Param,
    Query,
    Header,
    Example,
    Request,
    Response,
    /// Any other name; always a no-op so unknown annotations never fail a parse
    Unknown,
}

impl TagKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "apidoc" => TagKind::Apidoc,
            "apiVersion" => TagKind::Version,
            "apiServer" => TagKind::Server,
            "apiLicense" => TagKind::License,
            "apiTag" => TagKind::Tag,
            "apiExternalDocs" => TagKind::ExternalDocs,
            "api" => TagKind::Api,
            "apiTags" => TagKind::Tags,
            "apiParam" => TagKind::Param,
            "apiQuery" => TagKind::Query,
            "apiHeader" => TagKind::Header,
            "apiExample" => TagKind::Example,
            "apiRequest" => TagKind::Request,
            "apiResponse" => TagKind::Response,
            _ => TagKind::Unknown,
        }
    }

    /// Whether the tag opens a request/response section
    fn is_section(self) -> bool {
        matches!(self, TagKind::Request | TagKind::Response)
    }
}

impl Tag {
    pub fn kind(&self) -> TagKind {
        TagKind::from_name(&self.name)
    }
}

/// What one annotation block turned out to declare
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// An `@apidoc` block
    Doc(Doc),
    /// An `@api` block
    Api(Api),
    /// No opener, or an opener below its minimum arity
    Empty,
}

/// Whether a required/optional flag says "optional".
///
/// Only a case-insensitive `optional` counts; anything else, `required` and
/// garbage included, means the value is required.
pub fn is_optional(flag: &str) -> bool {
    flag.eq_ignore_ascii_case("optional")
}

/// Parse one lexed block.
///
/// The first `@apidoc` or `@api` tag decides what the block declares; tags
/// before it are ignored.
pub fn parse_block(tags: &[Tag]) -> Result<Block> {
    let Some(start) = tags
        .iter()
        .position(|t| matches!(t.kind(), TagKind::Apidoc | TagKind::Api))
    else {
        return Ok(Block::Empty);
    };

    let tags = &tags[start..];
    let block = match tags[0].kind() {
        TagKind::Apidoc => parse_doc(tags)?.map(Block::Doc),
        _ => parse_api(tags)?.map(Block::Api),
    };
    Ok(block.unwrap_or(Block::Empty))
}

/// Index one past the end of the section opened at `index`
fn section_end(tags: &[Tag], index: usize) -> usize {
    tags[index + 1..]
        .iter()
        .position(|t| t.kind().is_section())
        .map_or(tags.len(), |offset| index + 1 + offset)
}

fn parse_doc(tags: &[Tag]) -> Result<Option<Doc>> {
    let (opener, rest) = match tags.split_first() {
        Some(split) => split,
        None => return Ok(None),
    };

    let (title, description) = head_and_tail(&opener.body);
    if title.is_empty() {
        debug!("Dropping @apidoc without a title at line {}", opener.location.line);
        return Ok(None);
    }

    let mut doc = Doc {
        title: title.to_string(),
        description: description.to_string(),
        ..Doc::default()
    };

    let mut index = 0;
    while index < rest.len() {
        let tag = &rest[index];
        match tag.kind() {
            TagKind::Version => {
                if let Some(version) = tag.fields(1).first() {
                    doc.version = version.to_string();
                }
            }
            TagKind::Server => {
                let fields = tag.fields(2);
                if let Some(url) = fields.first() {
                    doc.servers.push(Server {
                        url: url.to_string(),
                        description: field_or_empty(&fields, 1),
                    });
                }
            }
            TagKind::License => {
                let fields = tag.fields(2);
                if let Some(name) = fields.first() {
                    doc.license = Some(License {
                        name: name.to_string(),
                        url: field_or_empty(&fields, 1),
                    });
                }
            }
            TagKind::Tag => {
                let fields = tag.fields(2);
                if let Some(name) = fields.first() {
                    doc.groups.push(Group {
                        name: name.to_string(),
                        description: field_or_empty(&fields, 1),
                    });
                }
            }
            TagKind::ExternalDocs => {
                let fields = tag.fields(2);
                if let Some(url) = fields.first() {
                    doc.external_docs = Some(ExternalDocs {
                        url: url.to_string(),
                        description: field_or_empty(&fields, 1),
                    });
                }
            }
            TagKind::Response => {
                let end = section_end(rest, index);
                if let Some(response) = parse_response(tag, &rest[index + 1..end])? {
                    doc.responses.push(response);
                }
                index = end;
                continue;
            }
            TagKind::Unknown => debug!("Skipping unknown tag @{}", tag.name),
            _ => debug!("Ignoring @{} inside an @apidoc block", tag.name),
        }
        index += 1;
    }

    Ok(Some(doc))
}

fn parse_api(tags: &[Tag]) -> Result<Option<Api>> {
    let (opener, rest) = match tags.split_first() {
        Some(split) => split,
        None => return Ok(None),
    };

    let (head, description) = head_and_tail(&opener.body);
    let fields = split_fields(head, 3);
    if fields.len() < 2 {
        debug!("Dropping @api without method and path at line {}", opener.location.line);
        return Ok(None);
    }

    let method = HttpMethod::parse(fields[0])
        .ok_or_else(|| Error::new(ErrorKind::InvalidFormat, "method").at(opener.location))?;
    let mut api = Api::new(method, fields[1]);
    api.summary = field_or_empty(&fields, 2);
    api.description = description.to_string();
    api.location = opener.location;

    let mut index = 0;
    while index < rest.len() {
        let tag = &rest[index];
        match tag.kind() {
            TagKind::Tags => {
                api.tags.extend(
                    tag.body
                        .split(|c: char| c == ',' || c.is_whitespace())
                        .filter(|name| !name.is_empty())
                        .map(str::to_string),
                );
            }
            TagKind::Param => {
                if let Some(param) = parse_param(tag)? {
                    attach_param(&mut api.params, param);
                }
            }
            TagKind::Query => {
                if let Some(param) = parse_param(tag)? {
                    attach_param(&mut api.queries, param);
                }
            }
            TagKind::Header => {
                if let Some(header) = parse_header(tag) {
                    api.headers.push(header);
                }
            }
            TagKind::Request => {
                let end = section_end(rest, index);
                if let Some(request) = parse_request(tag, &rest[index + 1..end])? {
                    if api.request.is_some() {
                        warn!(
                            "Ignoring second @apiRequest for {} {} at line {}",
                            api.method.as_str(),
                            api.path,
                            tag.location.line
                        );
                    } else {
                        api.request = Some(request);
                    }
                }
                index = end;
                continue;
            }
            TagKind::Response => {
                let end = section_end(rest, index);
                if let Some(response) = parse_response(tag, &rest[index + 1..end])? {
                    api.responses.push(response);
                }
                index = end;
                continue;
            }
            TagKind::Unknown => debug!("Skipping unknown tag @{}", tag.name),
            _ => debug!("Ignoring @{} inside an @api block", tag.name),
        }
        index += 1;
    }

    Ok(Some(api))
}

/// Build a response from its `@apiResponse` tag and the body tags that follow it.
///
/// The builder keeps no state between calls: running it twice on the same
/// input yields two equal, independent responses.
pub fn parse_response(tag: &Tag, body_tags: &[Tag]) -> Result<Option<Response>> {
    let fields = tag.fields(4);
    if fields.len() < 3 {
        debug!("Dropping @apiResponse with {} fields at line {}", fields.len(), tag.location.line);
        return Ok(None);
    }

    let status = fields[0]
        .parse::<u16>()
        .map_err(|_| Error::new(ErrorKind::InvalidStatus, "status").at(tag.location))?;
    let mut ty = Type::parse(fields[1]).map_err(|e| e.at(tag.location))?;
    ty.description = field_or_empty(&fields, 3);

    let mut body = Body {
        ty: Some(ty),
        ..Body::default()
    };
    body.parse_tags(body_tags)?;

    Ok(Some(Response {
        status,
        mimetype: fields[2].to_string(),
        body,
    }))
}

/// Build a request from its `@apiRequest` tag and the body tags that follow it
pub fn parse_request(tag: &Tag, body_tags: &[Tag]) -> Result<Option<Request>> {
    let fields = tag.fields(3);
    if fields.len() < 2 {
        debug!("Dropping @apiRequest with {} fields at line {}", fields.len(), tag.location.line);
        return Ok(None);
    }

    let mut ty = Type::parse(fields[0]).map_err(|e| e.at(tag.location))?;
    ty.description = field_or_empty(&fields, 2);

    let mut body = Body {
        ty: Some(ty),
        ..Body::default()
    };
    body.parse_tags(body_tags)?;

    Ok(Some(Request {
        mimetype: fields[1].to_string(),
        body,
    }))
}

/// `@apiParam name type flag description…`
pub fn parse_param(tag: &Tag) -> Result<Option<Param>> {
    let fields = tag.fields(4);
    if fields.len() < 3 {
        debug!("Dropping @{} with {} fields at line {}", tag.name, fields.len(), tag.location.line);
        return Ok(None);
    }

    let ty = Type::parse(fields[1]).map_err(|e| e.at(tag.location))?;
    Ok(Some(Param::new(
        fields[0],
        ty,
        is_optional(fields[2]),
        fields.get(3).copied().unwrap_or_default(),
    )))
}

/// `@apiHeader name flag summary…`
pub fn parse_header(tag: &Tag) -> Option<Header> {
    let fields = tag.fields(3);
    if fields.len() < 2 {
        debug!("Dropping @apiHeader with {} fields at line {}", fields.len(), tag.location.line);
        return None;
    }

    Some(Header {
        name: fields[0].to_string(),
        optional: is_optional(fields[1]),
        summary: field_or_empty(&fields, 2),
    })
}

/// `@apiExample mimetype summary…` NL `value`
pub fn parse_example(tag: &Tag) -> Option<Example> {
    let (head, value) = match tag.body.split_once('\n') {
        Some((head, value)) => (head, value),
        None => (tag.body.as_str(), ""),
    };

    let fields = split_fields(head, 2);
    let Some(mimetype) = fields.first() else {
        debug!("Dropping @apiExample without mimetype at line {}", tag.location.line);
        return None;
    };
    if value.trim().is_empty() {
        debug!("Dropping @apiExample without value at line {}", tag.location.line);
        return None;
    }

    Some(Example {
        mimetype: mimetype.to_string(),
        summary: field_or_empty(&fields, 1),
        value: value.to_string(),
    })
}

impl Body {
    /// Dispatch the body-level tags of a request/response section
    pub fn parse_tags(&mut self, tags: &[Tag]) -> Result<()> {
        for tag in tags {
            match tag.kind() {
                TagKind::Header => self.parse_header(tag),
                TagKind::Example => self.parse_example(tag),
                TagKind::Param => self.parse_param(tag)?,
                TagKind::Unknown => debug!("Skipping unknown tag @{}", tag.name),
                _ => debug!("Ignoring @{} inside a request/response", tag.name),
            }
        }
        Ok(())
    }

    pub fn parse_header(&mut self, tag: &Tag) {
        if let Some(header) = parse_header(tag) {
            self.headers.push(header);
        }
    }

    pub fn parse_example(&mut self, tag: &Tag) {
        if let Some(example) = parse_example(tag) {
            self.examples.push(example);
        }
    }

    /// Attach a member to the body's object type.
    ///
    /// A dotted name such as `user.name` attaches to the member `user`, which
    /// must itself be object-like. Members that have nowhere to go are dropped.
    pub fn parse_param(&mut self, tag: &Tag) -> Result<()> {
        let Some(mut param) = parse_param(tag)? else {
            return Ok(());
        };

        let (parents, leaf) = split_param_name(&param.name);
        let parents: Vec<&str> = parents.iter().map(String::as_str).collect();
        let scope = self
            .ty
            .as_mut()
            .and_then(|ty| ty.property_scope_mut(&parents));

        match scope {
            Some(scope) => {
                param.name = leaf.clone();
                scope.insert(leaf, param);
            }
            None => warn!(
                "Dropping @apiParam {} at line {}: no enclosing object",
                param.name, tag.location.line
            ),
        }
        Ok(())
    }
}

/// Attach an API-level parameter, descending into earlier object params for dotted names
fn attach_param(params: &mut Vec<Param>, mut param: Param) {
    let (parents, leaf) = split_param_name(&param.name);
    let Some((first, nested)) = parents.split_first() else {
        params.push(param);
        return;
    };

    let nested: Vec<&str> = nested.iter().map(String::as_str).collect();
    let scope: Option<&mut IndexMap<String, Param>> = params
        .iter_mut()
        .find(|p| &p.name == first)
        .and_then(|p| p.ty.property_scope_mut(&nested));

    match scope {
        Some(scope) => {
            param.name = leaf.clone();
            scope.insert(leaf, param);
        }
        None => warn!("Dropping parameter {}: no enclosing object", param.name),
    }
}

/// Split `a.b.c` into (`["a", "b"]`, `"c"`)
fn split_param_name(name: &str) -> (Vec<String>, String) {
    let mut segments: Vec<String> = name.split('.').map(str::to_string).collect();
    let leaf = segments.pop().unwrap_or_default();
    (segments, leaf)
}

/// First line of a body (trimmed) and the rest (trimmed)
fn head_and_tail(body: &str) -> (&str, &str) {
    match body.split_once('\n') {
        Some((head, tail)) => (head.trim(), tail.trim()),
        None => (body.trim(), ""),
    }
}

fn field_or_empty(fields: &[&str], index: usize) -> String {
    fields.get(index).map(|s| s.to_string()).unwrap_or_default()
}
