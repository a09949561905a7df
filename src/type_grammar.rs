use crate::doc::Param;
use crate::error::{Error, ErrorKind, Result};
use indexmap::IndexMap;
use log::debug;

/// Type kind - the closed set of kinds a type token can name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// `none` / `void`: no content
    None,
    Bool,
    Number,
    String,
    /// An object whose members come from later `@apiParam` tags
    Object,
    /// An array, the only kind allowed to wrap another in a dotted token
    Array,
    /// The `*` wildcard
    Any,
}

impl TypeKind {
    /// Look up a single type keyword, case-insensitively
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let kind = match keyword.to_ascii_lowercase().as_str() {
            "bool" => TypeKind::Bool,
            "number" | "int" | "float" => TypeKind::Number,
            "string" => TypeKind::String,
            "object" => TypeKind::Object,
            "array" => TypeKind::Array,
            "none" | "void" => TypeKind::None,
            "*" => TypeKind::Any,
            _ => return None,
        };
        Some(kind)
    }
}

/// A parsed type tree.
///
/// `items` is only present for `Array` and `properties` only for `Object`;
/// the constructors are the only way to build one, which keeps the two
/// mutually exclusive. A bare `array` has no `items`: its elements are untyped.
#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    pub kind: TypeKind,
    items: Option<Box<Type>>,
    properties: Option<IndexMap<String, Param>>,
    /// Free text attached by the declaring tag
    pub description: String,
}

impl Type {
    /// Create a leaf type. A leaf `Array` has untyped items; use [`Type::array`] to give it some.
    pub fn new(kind: TypeKind) -> Self {
        match kind {
            TypeKind::Object => Self {
                kind,
                items: None,
                properties: Some(IndexMap::new()),
                description: String::new(),
            },
            _ => Self {
                kind,
                items: None,
                properties: None,
                description: String::new(),
            },
        }
    }

    /// Create an array of `items`
    pub fn array(items: Type) -> Self {
        Self {
            kind: TypeKind::Array,
            items: Some(Box::new(items)),
            properties: None,
            description: String::new(),
        }
    }

    /// Parse a dotted type token such as `string`, `array.object` or `array.array.int`.
    ///
    /// The last segment is the leaf; every segment before it must be `array`
    /// and wraps the result built so far.
    ///
    /// # Errors
    ///
    /// Returns `InvalidType` (field `type`) for an unknown or empty segment, or
    /// for a non-array kind in a non-terminal position.
    pub fn parse(token: &str) -> Result<Self> {
        debug!("Parsing type token: {}", token);

        let mut segments = token.split('.').rev();
        let leaf = segments
            .next()
            .and_then(TypeKind::from_keyword)
            .ok_or_else(|| Error::new(ErrorKind::InvalidType, "type"))?;

        let mut ty = Type::new(leaf);
        for segment in segments {
            match TypeKind::from_keyword(segment) {
                Some(TypeKind::Array) => ty = Type::array(ty),
                _ => return Err(Error::new(ErrorKind::InvalidType, "type")),
            }
        }
        Ok(ty)
    }

    pub fn items(&self) -> Option<&Type> {
        self.items.as_deref()
    }

    pub fn properties(&self) -> Option<&IndexMap<String, Param>> {
        self.properties.as_ref()
    }

    /// Number of dotted segments the type was built from
    pub fn depth(&self) -> usize {
        match &self.items {
            Some(items) => 1 + items.depth(),
            None => 1,
        }
    }

    /// Whether members can be attached, directly or through array items
    pub fn is_object_like(&self) -> bool {
        self.object_properties().is_some()
    }

    /// Properties of this object, or of the innermost object under its arrays
    pub fn object_properties(&self) -> Option<&IndexMap<String, Param>> {
        match self.kind {
            TypeKind::Array => self.items.as_ref()?.object_properties(),
            TypeKind::Object => self.properties.as_ref(),
            _ => None,
        }
    }

    /// Mutable form of [`Type::object_properties`]
    pub fn object_properties_mut(&mut self) -> Option<&mut IndexMap<String, Param>> {
        match self.kind {
            TypeKind::Array => self.items.as_mut()?.object_properties_mut(),
            TypeKind::Object => self.properties.as_mut(),
            _ => None,
        }
    }

    /// Walk down through the named object members and return the innermost member map.
    ///
    /// `parents` are the leading segments of a dotted param name: for
    /// `user.address.city` they are `["user", "address"]`. Returns `None` when
    /// a parent is missing or is not object-like.
    pub fn property_scope_mut(&mut self, parents: &[&str]) -> Option<&mut IndexMap<String, Param>> {
        let mut scope = self.object_properties_mut()?;
        for name in parents {
            scope = scope.get_mut(*name)?.ty.object_properties_mut()?;
        }
        Some(scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_primitives() {
        let cases = vec![
            ("bool", TypeKind::Bool),
            ("number", TypeKind::Number),
            ("int", TypeKind::Number),
            ("float", TypeKind::Number),
            ("string", TypeKind::String),
            ("object", TypeKind::Object),
            ("none", TypeKind::None),
            ("void", TypeKind::None),
            ("*", TypeKind::Any),
        ];

        for (token, kind) in cases {
            let ty = Type::parse(token).unwrap();
            assert_eq!(ty.kind, kind, "token {}", token);
            assert_eq!(ty.depth(), 1);
            assert!(ty.items().is_none());
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Type::parse("String").unwrap().kind, TypeKind::String);
        assert_eq!(Type::parse("ARRAY.Object").unwrap().kind, TypeKind::Array);
    }

    #[test]
    fn test_parse_nested_arrays() {
        let ty = Type::parse("array.array.string").unwrap();

        assert_eq!(ty.kind, TypeKind::Array);
        assert_eq!(ty.depth(), 3);

        let inner = ty.items().unwrap();
        assert_eq!(inner.kind, TypeKind::Array);
        assert_eq!(inner.items().unwrap().kind, TypeKind::String);
    }

    #[test]
    fn test_depth_matches_segment_count() {
        for token in [
            "int",
            "array",
            "array.array",
            "array.int",
            "array.array.object",
            "array.array.array.*",
        ] {
            let ty = Type::parse(token).unwrap();
            assert_eq!(ty.depth(), token.split('.').count(), "token {}", token);
        }
    }

    #[test]
    fn test_bare_array_has_untyped_items() {
        let ty = Type::parse("array").unwrap();
        assert_eq!(ty.kind, TypeKind::Array);
        assert!(ty.items().is_none());
        assert!(!ty.is_object_like());
        assert_eq!(ty.depth(), 1);

        // Verify the inner bare array of `array.array` is a leaf as well
        let nested = Type::parse("array.array").unwrap();
        assert_eq!(nested.depth(), 2);
        assert!(nested.items().unwrap().items().is_none());
    }

    #[test]
    fn test_parse_unknown_segment() {
        for token in ["integer", "array.map", "", "array.", ".string", "array..int"] {
            let err = Type::parse(token).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidType, "token {:?}", token);
            assert_eq!(err.field_path(), "type");
        }
    }

    #[test]
    fn test_parse_non_array_wrapper() {
        for token in ["object.string", "string.array", "array.object.int"] {
            let err = Type::parse(token).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidType, "token {}", token);
        }
    }

    #[test]
    fn test_items_and_properties_exclusive() {
        let object = Type::parse("object").unwrap();
        assert!(object.properties().is_some());
        assert!(object.items().is_none());

        let array = Type::parse("array.object").unwrap();
        assert!(array.properties().is_none());
        assert!(array.items().is_some());

        let string = Type::parse("string").unwrap();
        assert!(string.properties().is_none());
        assert!(string.items().is_none());
    }

    #[test]
    fn test_object_properties_through_arrays() {
        let mut ty = Type::parse("array.array.object").unwrap();
        assert!(ty.is_object_like());

        ty.object_properties_mut().unwrap().insert(
            "id".to_string(),
            Param::new("id", Type::new(TypeKind::Number), false, "ID"),
        );

        let props = ty.items().unwrap().items().unwrap().properties().unwrap();
        assert!(props.contains_key("id"));
        assert!(!Type::parse("array.string").unwrap().is_object_like());
    }

    #[test]
    fn test_property_scope_nested() {
        let mut ty = Type::parse("object").unwrap();
        let props = ty.object_properties_mut().unwrap();
        props.insert(
            "user".to_string(),
            Param::new("user", Type::parse("array.object").unwrap(), false, ""),
        );
        props.insert(
            "name".to_string(),
            Param::new("name", Type::parse("string").unwrap(), false, ""),
        );

        assert!(ty.property_scope_mut(&["user"]).is_some());
        assert!(ty.property_scope_mut(&["name"]).is_none());
        assert!(ty.property_scope_mut(&["missing"]).is_none());
    }
}
