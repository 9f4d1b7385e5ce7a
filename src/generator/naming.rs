use check_keyword::CheckKeyword;
use syn::{Ident, __private::Span};

/// Turns a source-level name into a Rust identifier. Names are kept verbatim
/// so the generated types match the compiler's wire format; keywords become
/// raw identifiers.
pub fn name_to_ident(name: &str) -> Ident {
    if ["crate", "self", "super", "Self"].contains(&name) {
        // These are keywords that are not allowed as raw identifiers
        Ident::new(&format!("{}_", name), Span::call_site())
    } else if name.is_keyword() {
        Ident::new_raw(name, Span::call_site())
    } else {
        Ident::new(name, Span::call_site())
    }
}
