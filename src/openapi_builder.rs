use crate::doc::{self, Api, Doc, HttpMethod};
use crate::error::{Error, ErrorKind, Result};
use crate::sanitizer::{
    is_valid_url, is_valid_version, require, sanitize_each, sanitize_entries, Sanitize,
};
use crate::schema_generator::{Schema, SchemaGenerator};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

/// OpenAPI version written to exported documents
pub const LATEST_VERSION: &str = "3.0.1";

/// OpenAPI document builder
pub struct OpenApiBuilder {
    /// OpenAPI info section
    info: Info,
    servers: Vec<Server>,
    /// Paths collection (URL path -> PathItem), in insertion order
    paths: IndexMap<String, PathItem>,
    /// Components section (reusable responses, etc.)
    components: Components,
    tags: Vec<Tag>,
    external_docs: Option<ExternalDocumentation>,
    schema_gen: SchemaGenerator,
}

/// OpenAPI Info object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// API title
    pub title: String,
    /// API description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
    /// API version
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// OpenAPI PathItem object - represents all operations for a single path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    /// GET operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// POST operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// PUT operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    /// DELETE operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    /// PATCH operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    /// OPTIONS operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    /// HEAD operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
}

impl PathItem {
    /// The operation slot for `method`
    pub fn operation_mut(&mut self, method: HttpMethod) -> &mut Option<Operation> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Options => &mut self.options,
            HttpMethod::Head => &mut self.head,
        }
    }

    /// Operations present on this path, with their lower-case method names
    pub fn operations(&self) -> Vec<(&'static str, &Operation)> {
        [
            ("get", &self.get),
            ("post", &self.post),
            ("put", &self.put),
            ("delete", &self.delete),
            ("patch", &self.patch),
            ("options", &self.options),
            ("head", &self.head),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
        .collect()
    }

    fn operations_mut(&mut self) -> Vec<(&'static str, &mut Operation)> {
        [
            ("get", &mut self.get),
            ("post", &mut self.post),
            ("put", &mut self.put),
            ("delete", &mut self.delete),
            ("patch", &mut self.patch),
            ("options", &mut self.options),
            ("head", &mut self.head),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.as_mut().map(|op| (method, op)))
        .collect()
    }
}

/// OpenAPI Operation object - represents a single API operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Operation summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Operation description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parameters (path, query, header)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Request body
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Responses keyed by status code
    pub responses: IndexMap<String, Referable<Response>>,
}

/// OpenAPI Parameter object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Parameter location (path, query, header)
    #[serde(rename = "in")]
    pub location: String,
    /// Parameter description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the parameter is required
    pub required: bool,
    /// Parameter schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// OpenAPI RequestBody object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    /// Request body description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Content types and their schemas
    pub content: IndexMap<String, MediaType>,
    /// Whether the request body is required
    pub required: bool,
}

/// OpenAPI MediaType object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    /// Schema for this media type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub examples: IndexMap<String, Example>,
}

impl MediaType {
    /// Append an example under the next free `exampleN` key
    pub fn push_example(&mut self, example: Example) {
        let key = format!("example{}", self.examples.len() + 1);
        self.examples.insert(key, example);
    }
}

/// OpenAPI Response object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Response description
    pub description: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, Header>,
    /// Response content keyed by mimetype
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,
}

impl Response {
    /// Fold another response with the same status into this one.
    ///
    /// Content merges by mimetype and headers by name. A header or schema
    /// declared on both sides must be identical; examples accumulate.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateReference` at `headers[name]` or
    /// `content[mimetype].schema` when the two sides disagree.
    pub fn merge(&mut self, other: Response) -> Result<()> {
        if self.description.is_empty() {
            self.description = other.description;
        }
        for (name, header) in other.headers {
            match self.headers.get(&name) {
                Some(existing) if *existing != header => {
                    return Err(
                        Error::new(ErrorKind::DuplicateReference, "").within_key("headers", &name)
                    );
                }
                Some(_) => {}
                None => {
                    self.headers.insert(name, header);
                }
            }
        }
        for (mimetype, media) in other.content {
            let existing = self.content.entry(mimetype.clone()).or_default();
            if let Some(theirs) = media.schema {
                if existing.schema.as_ref().is_some_and(|own| *own != theirs) {
                    return Err(Error::new(ErrorKind::DuplicateReference, "schema")
                        .within_key("content", &mimetype));
                }
                if existing.schema.is_none() {
                    existing.schema = Some(theirs);
                }
            }
            for example in media.examples.into_values() {
                existing.push_example(example);
            }
        }
        Ok(())
    }
}

/// OpenAPI Header object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// OpenAPI Example object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Example {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The sample payload, verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "externalValue", skip_serializing_if = "Option::is_none")]
    pub external_value: Option<String>,
}

/// OpenAPI Link object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    #[serde(rename = "operationRef", skip_serializing_if = "Option::is_none")]
    pub operation_ref: Option<String>,
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<Server>,
}

/// A callback: expression -> path item
pub type Callback = IndexMap<String, PathItem>;

/// OpenAPI Components object - named entities shared across operations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, Schema>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, Response>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, Parameter>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub examples: IndexMap<String, Example>,
    #[serde(rename = "requestBodies", default, skip_serializing_if = "IndexMap::is_empty")]
    pub request_bodies: IndexMap<String, RequestBody>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, Header>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub links: IndexMap<String, Link>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub callbacks: IndexMap<String, Callback>,
}

impl Components {
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
            && self.responses.is_empty()
            && self.parameters.is_empty()
            && self.examples.is_empty()
            && self.request_bodies.is_empty()
            && self.headers.is_empty()
            && self.links.is_empty()
            && self.callbacks.is_empty()
    }
}

/// Either a `$ref` into the components table or an inline value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Referable<T> {
    Reference {
        #[serde(rename = "$ref")]
        reference: String,
    },
    Item(T),
}

impl<T> Referable<T> {
    /// Reference to `#/components/{table}/{name}`
    pub fn to_component(table: &str, name: &str) -> Self {
        Referable::Reference {
            reference: format!("#/components/{}/{}", table, name),
        }
    }

    /// The inline value, or the entry of `table` the reference points at
    pub fn resolve<'a>(&'a self, table: &'a IndexMap<String, T>) -> Option<&'a T> {
        match self {
            Referable::Item(item) => Some(item),
            Referable::Reference { reference } => {
                let name = reference.rsplit('/').next()?;
                table.get(name)
            }
        }
    }
}

/// OpenAPI Tag object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocumentation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalDocumentation {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Complete OpenAPI document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    /// OpenAPI version
    pub openapi: String,
    /// API info
    pub info: Info,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    /// API paths
    pub paths: IndexMap<String, PathItem>,
    /// Components (reusable responses, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocumentation>,
}

impl OpenApiBuilder {
    /// Create a new OpenApiBuilder with default info
    pub fn new() -> Self {
        debug!("Initializing OpenApiBuilder");
        Self {
            info: Info {
                title: "Generated API".to_string(),
                description: None,
                license: None,
                version: doc::DEFAULT_VERSION.to_string(),
            },
            servers: Vec::new(),
            paths: IndexMap::new(),
            components: Components::default(),
            tags: Vec::new(),
            external_docs: None,
            schema_gen: SchemaGenerator::new(),
        }
    }

    /// Set custom info for the API
    pub fn with_info(mut self, title: String, version: String, description: Option<String>) -> Self {
        self.info = Info {
            title,
            description,
            license: self.info.license,
            version,
        };
        self
    }

    pub fn with_license(mut self, license: &doc::License) -> Self {
        self.info.license = Some(License {
            name: license.name.clone(),
            url: non_empty(&license.url),
        });
        self
    }

    pub fn with_external_docs(mut self, docs: &doc::ExternalDocs) -> Self {
        self.external_docs = Some(ExternalDocumentation {
            url: docs.url.clone(),
            description: non_empty(&docs.description),
        });
        self
    }

    pub fn add_server(&mut self, server: &doc::Server) {
        self.servers.push(Server {
            url: server.url.clone(),
            description: non_empty(&server.description),
        });
    }

    /// Add a group as a root-level tag
    pub fn add_group(&mut self, group: &doc::Group) {
        self.tags.push(Tag {
            name: group.name.clone(),
            description: non_empty(&group.description),
            external_docs: None,
        });
    }

    /// Hoist a response shared by every API into `components.responses`.
    ///
    /// Responses with the same status merge like they do on an operation.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateReference` when the status is already taken by a
    /// response of a different shape.
    pub fn add_common_response(&mut self, response: &doc::Response) -> Result<()> {
        let key = response.status.to_string();
        debug!("Adding common response: {}", key);

        let mut converted = self.convert_response(response);
        fill_description(&key, &mut converted);
        match self.components.responses.get(&key) {
            Some(existing) if *existing == converted => {}
            Some(_) => {
                return Err(Error::new(ErrorKind::DuplicateReference, "")
                    .within_key("responses", &key)
                    .within("components"));
            }
            None => {
                self.components.responses.insert(key, converted);
            }
        }
        Ok(())
    }

    /// Add an API to the OpenAPI document
    ///
    /// # Errors
    ///
    /// Returns `DuplicateReference` when the method is already taken on the
    /// path once `:id` segments are rewritten, or when two responses with the
    /// same status disagree (see [`Response::merge`]).
    pub fn add_api(&mut self, api: &Api) -> Result<()> {
        debug!("Adding API: {} {}", api.method.as_str(), api.path);

        let openapi_path = Self::convert_path_format(&api.path);
        let method = api.method.as_str().to_ascii_lowercase();
        let taken = self
            .paths
            .get_mut(&openapi_path)
            .is_some_and(|item| item.operation_mut(api.method).is_some());
        if taken {
            return Err(Error::new(ErrorKind::DuplicateReference, "")
                .within(&method)
                .within_key("paths", &openapi_path));
        }

        let mut parameters = Vec::new();
        for param in &api.params {
            parameters.push(self.convert_param(param, "path", true));
        }
        for query in &api.queries {
            parameters.push(self.convert_param(query, "query", !query.optional));
        }
        let request_headers = api
            .headers
            .iter()
            .chain(api.request.iter().flat_map(|r| r.body.headers.iter()));
        for header in request_headers {
            parameters.push(Parameter {
                name: header.name.clone(),
                location: "header".to_string(),
                description: non_empty(&header.summary),
                required: !header.optional,
                schema: Some(string_schema()),
            });
        }

        let request_body = api.request.as_ref().map(|request| RequestBody {
            description: request
                .body
                .ty
                .as_ref()
                .and_then(|ty| non_empty(&ty.description)),
            content: self.convert_content(&request.mimetype, &request.body),
            required: true,
        });

        let mut responses: IndexMap<String, Response> = IndexMap::new();
        for response in &api.responses {
            let status = response.status.to_string();
            let converted = self.convert_response(response);
            match responses.get_mut(&status) {
                Some(existing) => existing.merge(converted).map_err(|e| {
                    e.within_key("responses", &status)
                        .within(&method)
                        .within_key("paths", &openapi_path)
                })?,
                None => {
                    responses.insert(status, converted);
                }
            }
        }
        for (status, response) in responses.iter_mut() {
            fill_description(status, response);
        }

        let operation = Operation {
            tags: api.tags.clone(),
            summary: non_empty(&api.summary),
            description: non_empty(&api.description),
            parameters,
            request_body,
            responses: responses
                .into_iter()
                .map(|(status, response)| (status, Referable::Item(response)))
                .collect(),
        };

        // Add operation to the appropriate path and method
        *self
            .paths
            .entry(openapi_path)
            .or_default()
            .operation_mut(api.method) = Some(operation);
        Ok(())
    }

    /// Convert path format from :param to OpenAPI {param} format
    pub(crate) fn convert_path_format(path: &str) -> String {
        path.split('/')
            .map(|part| match part.strip_prefix(':') {
                Some(name) => format!("{{{}}}", name),
                None => part.to_string(),
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Build the final OpenAPI document and validate it
    ///
    /// # Errors
    ///
    /// Returns the first violation found by [`OpenApiDocument`]'s sanitize pass.
    pub fn build(mut self) -> Result<OpenApiDocument> {
        debug!("Building final OpenAPI document");

        self.link_common_responses();

        let components = if self.components.is_empty() {
            None
        } else {
            Some(self.components)
        };

        let mut document = OpenApiDocument {
            openapi: LATEST_VERSION.to_string(),
            info: self.info,
            servers: self.servers,
            paths: self.paths,
            components,
            tags: self.tags,
            external_docs: self.external_docs,
        };
        document.sanitize()?;
        Ok(document)
    }

    /// Point every operation at the shared responses it does not override
    fn link_common_responses(&mut self) {
        let shared = &self.components.responses;
        for item in self.paths.values_mut() {
            for (_, operation) in item.operations_mut() {
                for (status, common) in shared {
                    let use_reference = match operation.responses.get(status) {
                        None => true,
                        Some(Referable::Item(own)) => own == common,
                        Some(Referable::Reference { .. }) => false,
                    };
                    if use_reference {
                        operation
                            .responses
                            .insert(status.clone(), Referable::to_component("responses", status));
                    }
                }
            }
        }
    }

    fn convert_param(&self, param: &doc::Param, location: &str, required: bool) -> Parameter {
        let mut schema = self.schema_gen.generate_schema(&param.ty);
        if let Some(schema) = schema.as_mut() {
            schema.description = None;
        }
        Parameter {
            name: param.name.clone(),
            location: location.to_string(),
            description: non_empty(&param.description),
            required,
            schema,
        }
    }

    fn convert_response(&self, response: &doc::Response) -> Response {
        let description = response
            .body
            .ty
            .as_ref()
            .map(|ty| ty.description.clone())
            .unwrap_or_default();

        let headers = response
            .body
            .headers
            .iter()
            .map(|header| {
                let converted = Header {
                    description: non_empty(&header.summary),
                    required: !header.optional,
                    schema: Some(string_schema()),
                };
                (header.name.clone(), converted)
            })
            .collect();

        Response {
            description,
            headers,
            content: self.convert_content(&response.mimetype, &response.body),
        }
    }

    /// Map a body's type and examples to content keyed by mimetype.
    ///
    /// The type lands under `mimetype`; each example lands under its own
    /// mimetype, which is created with the body schema when missing.
    fn convert_content(&self, mimetype: &str, body: &doc::Body) -> IndexMap<String, MediaType> {
        let schema = body
            .ty
            .as_ref()
            .and_then(|ty| self.schema_gen.generate_schema(ty));

        let mut content = IndexMap::new();
        if schema.is_some() {
            content.insert(
                media_type_name(mimetype),
                MediaType {
                    schema: schema.clone(),
                    examples: IndexMap::new(),
                },
            );
        }

        for example in &body.examples {
            let media = content
                .entry(media_type_name(&example.mimetype))
                .or_insert_with(|| MediaType {
                    schema: schema.clone(),
                    examples: IndexMap::new(),
                });
            media.push_example(Example {
                summary: non_empty(&example.summary),
                description: None,
                value: Some(example.value.clone()),
                external_value: None,
            });
        }
        content
    }

    /// Convert a sanitized document in one go
    ///
    /// # Arguments
    ///
    /// * `doc` - A document that already passed its own sanitize pass
    ///
    /// # Errors
    ///
    /// Returns `DuplicateReference` for conflicting common responses or
    /// operations, or the first violation found while validating the exported
    /// document.
    pub fn from_doc(doc: &Doc) -> Result<OpenApiDocument> {
        let mut builder = OpenApiBuilder::new().with_info(
            doc.title.clone(),
            doc.version.clone(),
            non_empty(&doc.description),
        );
        if let Some(license) = &doc.license {
            builder = builder.with_license(license);
        }
        if let Some(docs) = &doc.external_docs {
            builder = builder.with_external_docs(docs);
        }

        for server in &doc.servers {
            builder.add_server(server);
        }
        for group in &doc.groups {
            builder.add_group(group);
        }
        for response in &doc.responses {
            builder.add_common_response(response)?;
        }
        for api in &doc.apis {
            builder.add_api(api)?;
        }

        builder.build()
    }
}

impl Default for OpenApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// OpenAPI requires a description on every response
fn fill_description(status: &str, response: &mut Response) {
    if response.description.is_empty() {
        response.description = format!("{} response", status);
    }
}

fn string_schema() -> Schema {
    Schema {
        schema_type: Some("string".to_string()),
        ..Schema::default()
    }
}

/// `*` stands for any mimetype
fn media_type_name(mimetype: &str) -> String {
    if mimetype == "*" {
        "*/*".to_string()
    } else {
        mimetype.to_string()
    }
}

impl Sanitize for OpenApiDocument {
    fn sanitize(&mut self) -> Result<()> {
        if self.openapi.is_empty() {
            self.openapi = LATEST_VERSION.to_string();
        }
        if !is_valid_version(&self.openapi) {
            return Err(Error::new(ErrorKind::InvalidFormat, "openapi"));
        }

        self.info.sanitize().map_err(|e| e.within("info"))?;

        if self.servers.is_empty() {
            self.servers.push(Server {
                url: "/".to_string(),
                description: None,
            });
        }
        sanitize_each(&mut self.servers, "servers")?;

        if self.paths.is_empty() {
            return Err(Error::new(ErrorKind::MissingRequiredField, "paths"));
        }
        sanitize_entries(&mut self.paths, "paths")?;

        if let Some(components) = &mut self.components {
            components.sanitize().map_err(|e| e.within("components"))?;
        }

        sanitize_each(&mut self.tags, "tags")?;

        if let Some(docs) = &mut self.external_docs {
            docs.sanitize().map_err(|e| e.within("externalDocs"))?;
        }
        Ok(())
    }
}

impl Sanitize for Info {
    fn sanitize(&mut self) -> Result<()> {
        require(&self.title, "title")?;
        require(&self.version, "version")?;
        if let Some(license) = &mut self.license {
            license.sanitize().map_err(|e| e.within("license"))?;
        }
        Ok(())
    }
}

impl Sanitize for License {
    fn sanitize(&mut self) -> Result<()> {
        require(&self.name, "name")?;
        match &self.url {
            Some(url) if !is_valid_url(url) => Err(Error::new(ErrorKind::InvalidFormat, "url")),
            _ => Ok(()),
        }
    }
}

impl Sanitize for Server {
    fn sanitize(&mut self) -> Result<()> {
        if !is_valid_url(&self.url) {
            return Err(Error::new(ErrorKind::InvalidFormat, "url"));
        }
        Ok(())
    }
}

impl Sanitize for PathItem {
    fn sanitize(&mut self) -> Result<()> {
        for (method, operation) in self.operations_mut() {
            operation.sanitize().map_err(|e| e.within(method))?;
        }
        Ok(())
    }
}

impl Sanitize for Operation {
    fn sanitize(&mut self) -> Result<()> {
        sanitize_each(&mut self.parameters, "parameters")?;
        if let Some(body) = &mut self.request_body {
            body.sanitize().map_err(|e| e.within("requestBody"))?;
        }
        if self.responses.is_empty() {
            return Err(Error::new(ErrorKind::MissingRequiredField, "responses"));
        }
        sanitize_entries(&mut self.responses, "responses")
    }
}

impl<T: Sanitize> Sanitize for Referable<T> {
    fn sanitize(&mut self) -> Result<()> {
        match self {
            Referable::Reference { reference } => require(reference, "$ref"),
            Referable::Item(item) => item.sanitize(),
        }
    }
}

impl Sanitize for Parameter {
    fn sanitize(&mut self) -> Result<()> {
        require(&self.name, "name")?;
        match self.location.as_str() {
            "path" if !self.required => Err(Error::new(ErrorKind::InvalidFormat, "required")),
            "path" | "query" | "header" | "cookie" => Ok(()),
            _ => Err(Error::new(ErrorKind::InvalidFormat, "in")),
        }
    }
}

impl Sanitize for RequestBody {
    fn sanitize(&mut self) -> Result<()> {
        if self.content.is_empty() {
            return Err(Error::new(ErrorKind::MissingRequiredField, "content"));
        }
        Ok(())
    }
}

impl Sanitize for Response {
    fn sanitize(&mut self) -> Result<()> {
        require(&self.description, "description")
    }
}

impl Sanitize for Schema {
    fn sanitize(&mut self) -> Result<()> {
        if let Some(properties) = &mut self.properties {
            sanitize_entries(properties, "properties")?;
        }
        if let Some(items) = &mut self.items {
            items.sanitize().map_err(|e| e.within("items"))?;
        }
        Ok(())
    }
}

impl Sanitize for Header {
    fn sanitize(&mut self) -> Result<()> {
        Ok(())
    }
}

impl Sanitize for Example {
    fn sanitize(&mut self) -> Result<()> {
        if self.value.is_some() && self.external_value.is_some() {
            return Err(Error::new(ErrorKind::InvalidFormat, "externalValue"));
        }
        Ok(())
    }
}

impl Sanitize for Link {
    fn sanitize(&mut self) -> Result<()> {
        if let Some(server) = &mut self.server {
            server.sanitize().map_err(|e| e.within("server"))?;
        }
        Ok(())
    }
}

impl Sanitize for Components {
    fn sanitize(&mut self) -> Result<()> {
        sanitize_entries(&mut self.schemas, "schemas")?;
        sanitize_entries(&mut self.responses, "responses")?;
        sanitize_entries(&mut self.parameters, "parameters")?;
        sanitize_entries(&mut self.examples, "examples")?;
        sanitize_entries(&mut self.request_bodies, "requestBodies")?;
        sanitize_entries(&mut self.headers, "headers")?;
        sanitize_entries(&mut self.links, "links")?;
        for (name, callback) in self.callbacks.iter_mut() {
            for (expression, item) in callback.iter_mut() {
                item.sanitize()
                    .map_err(|e| e.within_key(name, expression).within("callbacks"))?;
            }
        }
        Ok(())
    }
}

impl Sanitize for Tag {
    fn sanitize(&mut self) -> Result<()> {
        require(&self.name, "name")?;
        if let Some(docs) = &mut self.external_docs {
            docs.sanitize().map_err(|e| e.within("externalDocs"))?;
        }
        Ok(())
    }
}

impl Sanitize for ExternalDocumentation {
    fn sanitize(&mut self) -> Result<()> {
        if !is_valid_url(&self.url) {
            return Err(Error::new(ErrorKind::InvalidFormat, "url"));
        }
        Ok(())
    }
}
