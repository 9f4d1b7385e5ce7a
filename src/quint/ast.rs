//! Data model for the document emitted by `quint compile`.
//!
//! Only the type-level subset of the compiler output is modelled; everything
//! else (expressions, source maps, lookup tables) is ignored during decoding.
//! Field names are fixed by the upstream compiler and matched exactly.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Document {
    pub modules: Vec<Module>,
}

#[derive(Debug, Deserialize)]
pub struct Module {
    pub declarations: Vec<Declaration>,
}

/// A top-level declaration. Compiled specifications contain many declaration
/// kinds (`def`, `var`, `const`, `import`, ...); only named `typedef`s define
/// types, so `name` and `type` stay optional at the decode boundary.
#[derive(Debug, Deserialize)]
pub struct Declaration {
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub type_: Option<TypeNode>,
}

/// A type-level AST node, tagged by the compiler's `kind` discriminator.
///
/// The set of kinds is closed: a document using any other kind fails to
/// decode, which the tool reports as malformed input.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeNode {
    Str,
    Int,
    Bool,
    Set { elem: Box<TypeNode> },
    List { elem: Box<TypeNode> },
    Fun { arg: Box<TypeNode>, res: Box<TypeNode> },
    Const { name: String },
    Var { name: String },
    Oper,
    Tup { fields: Row },
    Rec { id: u64, fields: Row },
    Sum { fields: Row },
}

/// The member row of a record, sum, or tuple type.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Row {
    Row { fields: Vec<RowField> },
    Var { name: String },
    Empty,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowField {
    pub field_name: String,
    pub field_type: TypeNode,
}

impl Document {
    /// Declarations in module order, then declaration order within a module.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.modules.iter().flat_map(|m| m.declarations.iter())
    }

    pub fn find_typedef(&self, name: &str) -> Option<&Declaration> {
        self.declarations()
            .find(|d| d.is_typedef() && d.name.as_deref() == Some(name))
    }

    /// Locates the `typedef` whose defining record node carries the given
    /// structural id. Inline record references are resolved through this.
    pub fn find_typedef_by_type_id(&self, id: u64) -> Option<&Declaration> {
        self.declarations().find(|d| {
            d.is_typedef()
                && matches!(&d.type_, Some(TypeNode::Rec { id: type_id, .. }) if *type_id == id)
        })
    }
}

impl Declaration {
    pub fn is_typedef(&self) -> bool {
        self.kind == "typedef"
    }
}

impl TypeNode {
    /// The compiler-side kind string, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeNode::Str => "str",
            TypeNode::Int => "int",
            TypeNode::Bool => "bool",
            TypeNode::Set { .. } => "set",
            TypeNode::List { .. } => "list",
            TypeNode::Fun { .. } => "fun",
            TypeNode::Const { .. } => "const",
            TypeNode::Var { .. } => "var",
            TypeNode::Oper => "oper",
            TypeNode::Tup { .. } => "tup",
            TypeNode::Rec { .. } => "rec",
            TypeNode::Sum { .. } => "sum",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(value: serde_json::Value) -> Document {
        serde_json::from_value(value).expect("document should decode")
    }

    #[test]
    fn decodes_typedef_with_record_type() {
        let doc = document(serde_json::json!({
            "stage": "compiling",
            "modules": [{
                "name": "main",
                "declarations": [{
                    "kind": "typedef",
                    "name": "Point",
                    "type": {
                        "kind": "rec",
                        "id": 42,
                        "fields": {
                            "kind": "row",
                            "fields": [
                                {"fieldName": "x", "fieldType": {"kind": "int"}},
                                {"fieldName": "y", "fieldType": {"kind": "int"}}
                            ]
                        }
                    }
                }]
            }]
        }));

        let decl = doc.find_typedef("Point").unwrap();
        let Some(TypeNode::Rec { id, fields: Row::Row { fields } }) = &decl.type_ else {
            panic!("expected a record typedef");
        };
        assert_eq!(*id, 42);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].field_name, "x");
        assert!(doc.find_typedef_by_type_id(42).is_some());
        assert!(doc.find_typedef_by_type_id(7).is_none());
    }

    #[test]
    fn tolerates_non_typedef_declarations() {
        let doc = document(serde_json::json!({
            "modules": [{
                "declarations": [
                    {"kind": "var", "name": "height", "typeAnnotation": {"kind": "int"}},
                    {"kind": "def", "name": "init", "qualifier": "action"},
                    {"kind": "import", "protoName": "basicSpells"}
                ]
            }]
        }));
        assert_eq!(doc.declarations().count(), 3);
        assert!(doc.find_typedef("height").is_none());
    }

    #[test]
    fn unknown_type_kind_is_a_decode_error() {
        let result: Result<Document, _> = serde_json::from_value(serde_json::json!({
            "modules": [{
                "declarations": [{
                    "kind": "typedef",
                    "name": "T",
                    "type": {"kind": "abs"}
                }]
            }]
        }));
        assert!(result.is_err());
    }
}
