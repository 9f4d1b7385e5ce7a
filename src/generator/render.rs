//! Renders resolved registry entries as standalone Rust declarations.
//!
//! Pure formatting: items are assembled with `parse_quote!` and printed with
//! prettyplease. No document access, no failure modes.

use syn::{parse_quote, Attribute, Field, FieldMutability, Fields, Item, Variant};

use super::naming::name_to_ident;
use super::registry::{
    AliasEntry, EnumEntry, FieldEntry, RegistryEntry, StructEntry, TypeRegistry, VariantEntry,
};

/// Renders every entry, in registry insertion order, as a sequence of
/// independent declaration blocks.
pub fn render_all(registry: &TypeRegistry) -> String {
    registry
        .entries()
        .map(render_entry)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders one entry as a standalone declaration block. The caller guarantees
/// a resolved registry; unresolved entries cannot reach the renderer.
pub fn render_entry(entry: &RegistryEntry) -> String {
    let item = match entry {
        RegistryEntry::Unresolved => {
            unreachable!("the fixpoint driver resolves every entry before rendering")
        }
        RegistryEntry::Alias(alias) => render_alias(alias),
        RegistryEntry::Struct(entry) => render_struct(entry),
        RegistryEntry::Enum(entry) => render_enum(entry),
    };
    let file = syn::File {
        shebang: None,
        attrs: vec![],
        items: vec![item],
    };
    prettyplease::unparse(&file)
}

fn derive_attr() -> Attribute {
    parse_quote!(#[derive(Eq, PartialEq, Serialize, Deserialize, Clone, Debug)])
}

fn render_alias(alias: &AliasEntry) -> Item {
    let name = name_to_ident(&alias.name);
    let target = &alias.target;
    parse_quote! {
        pub type #name = #target;
    }
}

fn render_struct(entry: &StructEntry) -> Item {
    let name = name_to_ident(&entry.name);
    let fields: Vec<Field> = entry.fields.iter().map(render_field).collect();
    let derive = derive_attr();
    parse_quote! {
        #derive
        pub struct #name {
            #(#fields),*
        }
    }
}

fn render_field(field: &FieldEntry) -> Field {
    let attrs: Vec<Attribute> = if field.optional {
        vec![parse_quote!(#[serde(with = "As::<de::Option<_>>")])]
    } else {
        vec![]
    };
    Field {
        attrs,
        vis: parse_quote!(pub),
        mutability: FieldMutability::None,
        ident: Some(name_to_ident(&field.name)),
        colon_token: None,
        ty: field.ty.clone(),
    }
}

fn render_enum(entry: &EnumEntry) -> Item {
    let name = name_to_ident(&entry.name);
    let variants: Vec<Variant> = entry.variants.iter().map(render_variant).collect();
    let derive = derive_attr();
    // Enums with any content-bearing variant serialize tag and content
    // uniformly; content-free enums serialize by tag alone.
    let serde: Attribute = if entry.has_content() {
        parse_quote!(#[serde(tag = "tag", content = "value")])
    } else {
        parse_quote!(#[serde(tag = "tag")])
    };
    parse_quote! {
        #derive
        #serde
        pub enum #name {
            #(#variants),*
        }
    }
}

fn render_variant(variant: &VariantEntry) -> Variant {
    let ident = name_to_ident(&variant.name);
    let fields = match &variant.payload {
        Some(ty) => Fields::Unnamed(parse_quote!((#ty))),
        None => Fields::Unit,
    };
    Variant {
        attrs: vec![],
        ident,
        fields,
        discriminant: None,
    }
}
