use crate::doc::Param;
use crate::type_grammar::{Type, TypeKind};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

/// Schema generator - converts document types to OpenAPI schemas
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaGenerator;

/// OpenAPI Schema definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// The type of the schema (string, number, object, array, etc.), absent for `*`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Properties for object types, in declaration order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,
    /// Required property names for object types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    /// Items schema for array types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
}

impl Schema {
    fn typed(schema_type: &str) -> Self {
        Self {
            schema_type: Some(schema_type.to_string()),
            ..Self::default()
        }
    }
}

impl SchemaGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a schema for a type tree.
    ///
    /// # Arguments
    ///
    /// * `ty` - The type to convert
    ///
    /// # Returns
    ///
    /// `None` for the `none` kind, which carries no content. A `*` type maps to
    /// an untyped schema that accepts anything, as do the items of a bare `array`.
    pub fn generate_schema(&self, ty: &Type) -> Option<Schema> {
        debug!("Generating schema for type: {:?}", ty.kind);

        let mut schema = match ty.kind {
            TypeKind::None => return None,
            TypeKind::Any => Schema::default(),
            TypeKind::Bool => Schema::typed("boolean"),
            TypeKind::Number => Schema::typed("number"),
            TypeKind::String => Schema::typed("string"),
            TypeKind::Array => {
                let items = ty
                    .items()
                    .and_then(|items| self.generate_schema(items))
                    .unwrap_or_default();
                Schema {
                    items: Some(Box::new(items)),
                    ..Schema::typed("array")
                }
            }
            TypeKind::Object => self.object_schema(ty),
        };

        if !ty.description.is_empty() {
            schema.description = Some(ty.description.clone());
        }
        Some(schema)
    }

    /// Generate the schema of a single parameter or object member.
    ///
    /// The parameter's own description wins over the one on its type.
    pub fn generate_param_schema(&self, param: &Param) -> Schema {
        let mut schema = self.generate_schema(&param.ty).unwrap_or_default();
        if !param.description.is_empty() {
            schema.description = Some(param.description.clone());
        }
        schema
    }

    fn object_schema(&self, ty: &Type) -> Schema {
        let mut schema = Schema::typed("object");
        let members = match ty.properties() {
            Some(members) if !members.is_empty() => members,
            _ => return schema,
        };

        let mut properties = IndexMap::new();
        let mut required = Vec::new();
        for (name, param) in members {
            properties.insert(name.clone(), self.generate_param_schema(param));
            if !param.optional {
                required.push(name.clone());
            }
        }

        schema.properties = Some(properties);
        if !required.is_empty() {
            schema.required = Some(required);
        }
        schema
    }
}
