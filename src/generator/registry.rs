//! The type registry: an insertion-ordered symbol table mapping source-level
//! type names to their resolution state for one generation run.

use indexmap::IndexMap;

use super::error::DeriveError;

/// Resolution state of a named type. A name transitions from [`Unresolved`]
/// to exactly one concrete variant; entries are never deleted.
///
/// [`Unresolved`]: RegistryEntry::Unresolved
#[derive(Debug)]
pub enum RegistryEntry {
    /// Seen via a forward reference, not yet expanded. The registry key is
    /// the referenced name.
    Unresolved,
    Alias(AliasEntry),
    Struct(StructEntry),
    Enum(EnumEntry),
}

impl RegistryEntry {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, RegistryEntry::Unresolved)
    }
}

/// A scalar type rename, `pub type Name = Target;`.
#[derive(Debug)]
pub struct AliasEntry {
    pub name: String,
    pub target: syn::Type,
}

#[derive(Debug)]
pub struct StructEntry {
    /// Output name. Usually the registry key, except for the state struct,
    /// which is keyed by its source name but rendered under a fixed one.
    pub name: String,
    pub fields: Vec<FieldEntry>,
}

#[derive(Debug)]
pub struct FieldEntry {
    pub name: String,
    pub ty: syn::Type,
    /// The field maps to `Option<..>` and must serialize the absent case
    /// through the `As::<de::Option<_>>` adapter.
    pub optional: bool,
}

#[derive(Debug)]
pub struct EnumEntry {
    pub name: String,
    pub variants: Vec<VariantEntry>,
}

#[derive(Debug)]
pub struct VariantEntry {
    pub name: String,
    pub payload: Option<syn::Type>,
}

impl VariantEntry {
    pub fn has_content(&self) -> bool {
        self.payload.is_some()
    }
}

impl EnumEntry {
    /// Whether any variant carries a payload. Selects the wire encoding:
    /// tag-only when false, uniform tag+content when true.
    pub fn has_content(&self) -> bool {
        self.variants.iter().any(VariantEntry::has_content)
    }
}

#[derive(Debug, Default)]
pub struct TypeRegistry {
    entries: IndexMap<String, RegistryEntry>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a forward reference. Existing entries, resolved or not, are
    /// left untouched.
    pub fn insert_unresolved_if_absent(&mut self, name: &str) {
        if !self.entries.contains_key(name) {
            self.entries
                .insert(name.to_owned(), RegistryEntry::Unresolved);
        }
    }

    /// Installs a concrete entry for `name`. Resolution is monotonic: an
    /// already-concrete entry stays as it is, so re-resolving is a no-op.
    /// Replacing an `Unresolved` entry keeps its insertion position.
    pub fn overwrite(&mut self, name: &str, entry: RegistryEntry) {
        debug_assert!(entry.is_resolved());
        match self.entries.get_mut(name) {
            Some(existing) if existing.is_resolved() => {}
            Some(existing) => *existing = entry,
            None => {
                self.entries.insert(name.to_owned(), entry);
            }
        }
    }

    /// Registers a freshly lifted struct under a synthetic name. The name
    /// colliding with any existing entry is a reported failure, never a
    /// silent overwrite.
    pub fn insert_synthetic(
        &mut self,
        name: String,
        entry: RegistryEntry,
    ) -> Result<(), DeriveError> {
        if self.entries.contains_key(&name) {
            return Err(DeriveError::SyntheticNameCollision(name));
        }
        self.entries.insert(name, entry);
        Ok(())
    }

    /// Names still awaiting resolution, in insertion order.
    pub fn pending_unresolved(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, entry)| !entry.is_resolved())
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(name)
    }

    /// Entries in insertion order; drives the rendered declaration order.
    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn alias(name: &str, target: syn::Type) -> RegistryEntry {
        RegistryEntry::Alias(AliasEntry {
            name: name.to_owned(),
            target,
        })
    }

    #[test]
    fn unresolved_insert_is_idempotent() {
        let mut registry = TypeRegistry::new();
        registry.insert_unresolved_if_absent("Height");
        registry.insert_unresolved_if_absent("Height");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.pending_unresolved(), vec!["Height"]);
    }

    #[test]
    fn overwrite_resolves_exactly_once() {
        let mut registry = TypeRegistry::new();
        registry.insert_unresolved_if_absent("Height");
        registry.overwrite("Height", alias("Height", parse_quote!(i64)));
        // A later overwrite must not regress or replace the concrete entry.
        registry.overwrite("Height", alias("Height", parse_quote!(String)));

        let Some(RegistryEntry::Alias(entry)) = registry.get("Height") else {
            panic!("expected an alias");
        };
        assert_eq!(entry.target, parse_quote!(i64));
        assert!(registry.pending_unresolved().is_empty());
    }

    #[test]
    fn unresolved_reference_does_not_clobber_concrete_entry() {
        let mut registry = TypeRegistry::new();
        registry.overwrite("Height", alias("Height", parse_quote!(i64)));
        registry.insert_unresolved_if_absent("Height");
        assert!(registry.get("Height").unwrap().is_resolved());
    }

    #[test]
    fn resolving_keeps_insertion_position() {
        let mut registry = TypeRegistry::new();
        registry.insert_unresolved_if_absent("First");
        registry.overwrite("Second", alias("Second", parse_quote!(i64)));
        registry.overwrite("First", alias("First", parse_quote!(String)));

        let names: Vec<_> = registry
            .entries()
            .map(|entry| match entry {
                RegistryEntry::Alias(a) => a.name.as_str(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn synthetic_collision_is_reported() {
        let mut registry = TypeRegistry::new();
        registry.insert_unresolved_if_absent("ProposeArgs");
        let result = registry.insert_synthetic(
            "ProposeArgs".to_owned(),
            alias("ProposeArgs", parse_quote!(i64)),
        );
        assert!(matches!(
            result,
            Err(DeriveError::SyntheticNameCollision(name)) if name == "ProposeArgs"
        ));
    }
}
