//! Derives Rust data-type declarations from a compiled specification.
//!
//! The engine walks a small set of well-known top-level declarations, maps
//! their type trees onto Rust types, and chases named references to a fixed
//! point through the [`TypeRegistry`]. Rendering only happens once the whole
//! declaration set has resolved.

mod error;
mod naming;
mod registry;
mod render;

pub use error::DeriveError;
pub use registry::{
    AliasEntry, EnumEntry, FieldEntry, RegistryEntry, StructEntry, TypeRegistry, VariantEntry,
};
pub use render::{render_all, render_entry};

use syn::{parse_quote, Type};

use crate::quint::{Declaration, Document, Row, RowField, TypeNode};
use naming::name_to_ident;

/// Declaration holding the specification's state record.
const STATE_DECL: &str = "StateFields";
/// Output name of the state struct.
const STATE_STRUCT: &str = "SpecState";
/// Declarations named with this suffix each become their own struct.
const MESSAGE_SUFFIX: &str = "Msg";
/// Declaration enumerating the transition labels.
const TRANSITION_DECL: &str = "TransitionLabel";
/// Variant tag marking the present case of an optional-shaped sum.
const PRESENT_TAG: &str = "Some";

/// Derives all types reachable from the well-known declarations and renders
/// them as a sequence of standalone Rust declarations.
pub fn generate(document: &Document) -> Result<String, DeriveError> {
    let registry = derive(document)?;
    Ok(render::render_all(&registry))
}

/// Runs seeding and fixpoint resolution, producing the resolved registry.
pub fn derive(document: &Document) -> Result<TypeRegistry, DeriveError> {
    let mut ctx = DeriveContext::new(document);
    ctx.seed()?;
    ctx.resolve_pending()?;
    Ok(ctx.registry)
}

/// State of one generation run: the source document and the registry it
/// populates. Owned by the fixpoint driver, threaded through the mapper and
/// builder.
struct DeriveContext<'a> {
    document: &'a Document,
    registry: TypeRegistry,
}

impl<'a> DeriveContext<'a> {
    fn new(document: &'a Document) -> Self {
        Self {
            document,
            registry: TypeRegistry::new(),
        }
    }

    /// Resolves the well-known declarations before the fixpoint runs. The
    /// state record is mandatory; messages and transition labels are not.
    fn seed(&mut self) -> Result<(), DeriveError> {
        self.seed_state()?;
        self.seed_messages()?;
        self.seed_transitions()
    }

    fn seed_state(&mut self) -> Result<(), DeriveError> {
        let decl = self
            .document
            .declarations()
            .find(|d| d.name.as_deref() == Some(STATE_DECL))
            .ok_or(DeriveError::MissingStateFields)?;
        let mut entry = self.build_struct(decl)?;
        entry.name = STATE_STRUCT.to_owned();
        self.registry
            .overwrite(STATE_DECL, RegistryEntry::Struct(entry));
        Ok(())
    }

    fn seed_messages(&mut self) -> Result<(), DeriveError> {
        let document = self.document;
        for decl in document.declarations() {
            let Some(name) = decl.name.as_deref() else {
                continue;
            };
            if !name.ends_with(MESSAGE_SUFFIX) {
                continue;
            }
            let entry = self.build_struct(decl)?;
            self.registry.overwrite(name, RegistryEntry::Struct(entry));
        }
        Ok(())
    }

    fn seed_transitions(&mut self) -> Result<(), DeriveError> {
        let document = self.document;
        let Some(decl) = document
            .declarations()
            .find(|d| d.name.as_deref() == Some(TRANSITION_DECL))
        else {
            return Ok(());
        };
        let entry = self.build_enum(decl)?;
        self.registry
            .overwrite(TRANSITION_DECL, RegistryEntry::Enum(entry));
        Ok(())
    }

    /// Expands unresolved registry entries until none remain. Each pass
    /// resolves at least one name or the run aborts, so the loop is bounded
    /// by the number of distinct named references.
    fn resolve_pending(&mut self) -> Result<(), DeriveError> {
        loop {
            let pending = self.registry.pending_unresolved();
            if pending.is_empty() {
                return Ok(());
            }
            let mut resolved = 0usize;
            for name in &pending {
                let decl = self
                    .document
                    .find_typedef(name)
                    .ok_or_else(|| DeriveError::UnresolvedReference(name.clone()))?;
                let entry = self.build_declaration(decl)?;
                self.registry.overwrite(name, entry);
                resolved += 1;
            }
            if resolved == 0 {
                return Err(DeriveError::StalledResolution {
                    pending: self.registry.pending_unresolved(),
                });
            }
        }
    }

    /// Converts one named `typedef` into a concrete registry entry,
    /// dispatching on the declared type's kind.
    fn build_declaration(&mut self, decl: &Declaration) -> Result<RegistryEntry, DeriveError> {
        match &decl.type_ {
            Some(TypeNode::Rec { .. }) => Ok(RegistryEntry::Struct(self.build_struct(decl)?)),
            Some(TypeNode::Sum { .. }) => Ok(RegistryEntry::Enum(self.build_enum(decl)?)),
            Some(node @ (TypeNode::Str | TypeNode::Int | TypeNode::Bool)) => {
                let target = self.map_field_type(node)?;
                Ok(RegistryEntry::Alias(AliasEntry {
                    name: declared_name(decl),
                    target,
                }))
            }
            _ => Err(underivable(decl)),
        }
    }

    fn build_struct(&mut self, decl: &Declaration) -> Result<StructEntry, DeriveError> {
        let Some(TypeNode::Rec {
            fields: Row::Row { fields },
            ..
        }) = &decl.type_
        else {
            return Err(underivable(decl));
        };
        let fields = fields
            .iter()
            .map(|field| self.build_field(field))
            .collect::<Result<_, _>>()?;
        Ok(StructEntry {
            name: declared_name(decl),
            fields,
        })
    }

    fn build_field(&mut self, field: &RowField) -> Result<FieldEntry, DeriveError> {
        let ty = self.map_field_type(&field.field_type)?;
        let optional = is_option(&ty);
        Ok(FieldEntry {
            name: field.field_name.clone(),
            ty,
            optional,
        })
    }

    fn build_enum(&mut self, decl: &Declaration) -> Result<EnumEntry, DeriveError> {
        let Some(TypeNode::Sum {
            fields: Row::Row { fields },
        }) = &decl.type_
        else {
            return Err(underivable(decl));
        };
        let variants = fields
            .iter()
            .map(|arm| self.build_variant(arm))
            .collect::<Result<_, _>>()?;
        Ok(EnumEntry {
            name: declared_name(decl),
            variants,
        })
    }

    fn build_variant(&mut self, arm: &RowField) -> Result<VariantEntry, DeriveError> {
        let name = arm.field_name.clone();
        let payload = match &arm.field_type {
            TypeNode::Tup { .. } => None,
            TypeNode::Rec {
                fields: Row::Row { fields },
                ..
            } if !fields.is_empty() => {
                // An inline record payload is lifted into its own struct and
                // referenced by name from the variant.
                let args_name = format!("{name}Args");
                let args_fields = fields
                    .iter()
                    .map(|field| self.build_field(field))
                    .collect::<Result<_, _>>()?;
                self.registry.insert_synthetic(
                    args_name.clone(),
                    RegistryEntry::Struct(StructEntry {
                        name: args_name.clone(),
                        fields: args_fields,
                    }),
                )?;
                let ident = name_to_ident(&args_name);
                Some(parse_quote!(#ident))
            }
            node => Some(self.map_field_type(node)?),
        };
        Ok(VariantEntry { name, payload })
    }

    /// Maps one type node onto a Rust type reference, registering any newly
    /// encountered named reference as unresolved.
    fn map_field_type(&mut self, node: &TypeNode) -> Result<Type, DeriveError> {
        match node {
            TypeNode::Str => Ok(parse_quote!(String)),
            TypeNode::Int => Ok(parse_quote!(i64)),
            TypeNode::Bool => Ok(parse_quote!(bool)),
            TypeNode::Set { elem } | TypeNode::List { elem } => {
                let inner = self.map_field_type(elem)?;
                Ok(parse_quote!(Vec<#inner>))
            }
            TypeNode::Fun { arg, res } => {
                let key = self.map_field_type(arg)?;
                let value = self.map_field_type(res)?;
                Ok(parse_quote!(BTreeMap<#key, #value>))
            }
            TypeNode::Const { name } => {
                self.registry.insert_unresolved_if_absent(name);
                let ident = name_to_ident(name);
                Ok(parse_quote!(#ident))
            }
            TypeNode::Sum { fields } => {
                // In field position a sum may only take the optional shape;
                // every other sum is resolved as a top-level declaration.
                let Some(inner) = present_payload(fields) else {
                    return Err(DeriveError::UnderivableNode {
                        kind: node.kind_name(),
                    });
                };
                let inner = self.map_field_type(inner)?;
                Ok(parse_quote!(Option<#inner>))
            }
            TypeNode::Rec { id, .. } => {
                let decl = self
                    .document
                    .find_typedef_by_type_id(*id)
                    .ok_or(DeriveError::UnknownRecordId { id: *id })?;
                let Some(name) = decl.name.as_deref() else {
                    return Err(DeriveError::UnknownRecordId { id: *id });
                };
                self.registry.insert_unresolved_if_absent(name);
                let ident = name_to_ident(name);
                Ok(parse_quote!(#ident))
            }
            TypeNode::Var { .. } | TypeNode::Oper | TypeNode::Tup { .. } => {
                Err(DeriveError::UnderivableNode {
                    kind: node.kind_name(),
                })
            }
        }
    }
}

/// Matches the strict optional shape: a sum with a single `Some`-tagged
/// variant. Sums with any further variant do not collapse.
fn present_payload(row: &Row) -> Option<&TypeNode> {
    match row {
        Row::Row { fields } if fields.len() == 1 && fields[0].field_name == PRESENT_TAG => {
            Some(&fields[0].field_type)
        }
        _ => None,
    }
}

fn is_option(ty: &Type) -> bool {
    matches!(
        ty,
        Type::Path(path) if path.path.segments.last().is_some_and(|s| s.ident == "Option")
    )
}

fn declared_name(decl: &Declaration) -> String {
    decl.name.clone().unwrap_or_default()
}

fn underivable(decl: &Declaration) -> DeriveError {
    DeriveError::UnderivableDeclaration {
        name: declared_name(decl),
        kind: decl
            .type_
            .as_ref()
            .map(|node| node.kind_name().to_owned())
            .unwrap_or_else(|| decl.kind.clone()),
    }
}
