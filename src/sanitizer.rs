//! Validation and default-filling over the document model.
//!
//! Sanitizing is depth-first and fail-fast: the first violated rule aborts the
//! whole pass. The failing check reports the leaf field name and every
//! enclosing level prefixes its own position on the way back up, so the caller
//! receives a fully qualified path such as `apis[1].responses[0].headers[1].name`.

use crate::doc::{
    Api, Body, Doc, Example, ExternalDocs, Group, Header, HttpMethod, License, Param, Request,
    Response, Server, DEFAULT_VERSION,
};
use crate::error::{Error, ErrorKind, Result};
use crate::openapi_builder::OpenApiBuilder;
use crate::type_grammar::Type;
use indexmap::IndexMap;
use log::debug;
use std::collections::HashMap;

/// Validate a value in place, filling defaults where the model allows them
pub trait Sanitize {
    fn sanitize(&mut self) -> Result<()>;
}

/// Sanitize every element, prefixing errors with `field[index]`
pub(crate) fn sanitize_each<T: Sanitize>(items: &mut [T], field: &str) -> Result<()> {
    for (index, item) in items.iter_mut().enumerate() {
        item.sanitize().map_err(|e| e.within_index(field, index))?;
    }
    Ok(())
}

/// Sanitize every map entry, prefixing errors with `field[key]`
pub(crate) fn sanitize_entries<T: Sanitize>(
    entries: &mut IndexMap<String, T>,
    field: &str,
) -> Result<()> {
    for (key, item) in entries.iter_mut() {
        require(key, "").map_err(|e| e.within(field))?;
        item.sanitize().map_err(|e| e.within_key(field, key))?;
    }
    Ok(())
}

/// Fail with `MissingRequiredField` when `value` is empty
pub(crate) fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::new(ErrorKind::MissingRequiredField, field));
    }
    Ok(())
}

/// An absolute URL, or a path relative to the host serving the document
pub(crate) fn is_valid_url(value: &str) -> bool {
    value.starts_with('/') || url::Url::parse(value).is_ok()
}

/// A valid semantic version such as `1.0.0`
pub(crate) fn is_valid_version(value: &str) -> bool {
    semver::Version::parse(value).is_ok()
}

impl Sanitize for Doc {
    fn sanitize(&mut self) -> Result<()> {
        debug!("Sanitizing document {:?}", self.title);

        require(&self.title, "title")?;

        if self.version.is_empty() {
            self.version = DEFAULT_VERSION.to_string();
        }
        if !is_valid_version(&self.version) {
            return Err(Error::new(ErrorKind::InvalidFormat, "version"));
        }

        if self.servers.is_empty() {
            self.servers.push(Server::root());
        }
        sanitize_each(&mut self.servers, "servers")?;

        if let Some(license) = &mut self.license {
            license.sanitize().map_err(|e| e.within("license"))?;
        }
        if let Some(docs) = &mut self.external_docs {
            docs.sanitize().map_err(|e| e.within("externalDocs"))?;
        }

        sanitize_each(&mut self.groups, "tags")?;

        sanitize_each(&mut self.responses, "responses")?;
        for (index, response) in self.responses.iter().enumerate() {
            let conflicting = self.responses[..index]
                .iter()
                .any(|earlier| earlier.status == response.status && earlier != response);
            if conflicting {
                return Err(Error::new(ErrorKind::DuplicateReference, "status")
                    .within_index("responses", index));
            }
        }

        if self.apis.is_empty() {
            return Err(Error::new(ErrorKind::MissingRequiredField, "paths"));
        }

        let mut seen: HashMap<(HttpMethod, String), usize> = HashMap::new();
        for (index, api) in self.apis.iter_mut().enumerate() {
            let location = api.location;
            let file = api.file.clone();
            let located = |e: Error| {
                let e = e.within_index("apis", index).at(location);
                match &file {
                    Some(file) => e.in_file(file),
                    None => e,
                }
            };

            api.sanitize().map_err(&located)?;

            // `/users/:id` and `/users/{id}` export to the same operation
            let key = (api.method, OpenApiBuilder::convert_path_format(&api.path));
            if seen.insert(key, index).is_some() {
                return Err(located(Error::new(ErrorKind::DuplicateReference, "path")));
            }
        }

        Ok(())
    }
}

impl Sanitize for Api {
    fn sanitize(&mut self) -> Result<()> {
        require(&self.path, "path")?;
        if !self.path.starts_with('/') {
            return Err(Error::new(ErrorKind::InvalidFormat, "path"));
        }

        for (index, tag) in self.tags.iter().enumerate() {
            require(tag, "").map_err(|e| e.within_index("tags", index))?;
        }

        sanitize_each(&mut self.headers, "headers")?;
        sanitize_each(&mut self.params, "params")?;
        sanitize_each(&mut self.queries, "queries")?;

        if let Some(request) = &mut self.request {
            request.sanitize().map_err(|e| e.within("request"))?;
        }
        sanitize_each(&mut self.responses, "responses")
    }
}

impl Sanitize for Request {
    fn sanitize(&mut self) -> Result<()> {
        require(&self.mimetype, "mimetype")?;
        self.body.sanitize()
    }
}

impl Sanitize for Response {
    fn sanitize(&mut self) -> Result<()> {
        if !(100..=599).contains(&self.status) {
            return Err(Error::new(ErrorKind::InvalidStatus, "status"));
        }
        require(&self.mimetype, "mimetype")?;
        self.body.sanitize()
    }
}

impl Sanitize for Body {
    fn sanitize(&mut self) -> Result<()> {
        sanitize_each(&mut self.headers, "headers")?;
        for (index, header) in self.headers.iter().enumerate() {
            if self.headers[..index].iter().any(|earlier| earlier.name == header.name) {
                return Err(Error::new(ErrorKind::DuplicateReference, "name")
                    .within_index("headers", index));
            }
        }
        sanitize_each(&mut self.examples, "examples")?;
        if let Some(ty) = &mut self.ty {
            ty.sanitize().map_err(|e| e.within("type"))?;
        }
        Ok(())
    }
}

impl Sanitize for Type {
    fn sanitize(&mut self) -> Result<()> {
        match self.object_properties_mut() {
            Some(properties) => sanitize_entries(properties, "properties"),
            None => Ok(()),
        }
    }
}

impl Sanitize for Param {
    fn sanitize(&mut self) -> Result<()> {
        require(&self.name, "name")?;
        self.ty.sanitize().map_err(|e| e.within("type"))
    }
}

impl Sanitize for Header {
    fn sanitize(&mut self) -> Result<()> {
        require(&self.name, "name")
    }
}

impl Sanitize for Example {
    fn sanitize(&mut self) -> Result<()> {
        require(&self.mimetype, "mimetype")
    }
}

impl Sanitize for Server {
    fn sanitize(&mut self) -> Result<()> {
        require(&self.url, "url")?;
        if !is_valid_url(&self.url) {
            return Err(Error::new(ErrorKind::InvalidFormat, "url"));
        }
        Ok(())
    }
}

impl Sanitize for License {
    fn sanitize(&mut self) -> Result<()> {
        require(&self.name, "name")?;
        if !self.url.is_empty() && !is_valid_url(&self.url) {
            return Err(Error::new(ErrorKind::InvalidFormat, "url"));
        }
        Ok(())
    }
}

impl Sanitize for ExternalDocs {
    fn sanitize(&mut self) -> Result<()> {
        if !is_valid_url(&self.url) {
            return Err(Error::new(ErrorKind::InvalidFormat, "url"));
        }
        Ok(())
    }
}

impl Sanitize for Group {
    fn sanitize(&mut self) -> Result<()> {
        require(&self.name, "name")
    }
}
