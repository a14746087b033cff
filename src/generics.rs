//! Generic resolver: rebuilds a generic class's type-parameter lists.
//!
//! The factory re-declares the wrapped class's type parameters with their
//! bounds (the long form), so bound types are shortened and imported like any
//! parameter type. Everywhere the wrapped class itself is referenced, only
//! the bare parameter names appear (the short form).

use crate::model::TypeParamDecl;
use crate::typeref::{shorten, ImportSet, TypeParseError};

/// Comma-joined `name` / `name extends Bound` list in declaration order.
/// Empty for a non-generic class.
pub fn long_generics(
    params: &[TypeParamDecl],
    imports: &mut ImportSet,
) -> Result<String, TypeParseError> {
    let mut parts = Vec::with_capacity(params.len());
    for tp in params {
        match &tp.bound {
            None => parts.push(tp.name.clone()),
            Some(bound) => {
                parts.push(format!("{} extends {}", tp.name, shorten(bound, imports)?));
            }
        }
    }
    Ok(parts.join(", "))
}

/// Comma-joined bare parameter names in declaration order.
pub fn short_generics(params: &[TypeParamDecl]) -> String {
    params
        .iter()
        .map(|tp| tp.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tp(name: &str, bound: Option<&str>) -> TypeParamDecl {
        TypeParamDecl {
            name: name.to_string(),
            bound: bound.map(str::to_string),
        }
    }

    #[test]
    fn non_generic_class_yields_empty_forms() {
        let mut imports = ImportSet::new();
        assert_eq!(long_generics(&[], &mut imports).unwrap(), "");
        assert_eq!(short_generics(&[]), "");
    }

    #[test]
    fn unbounded_parameter_is_just_its_name() {
        let mut imports = ImportSet::new();
        let params = [tp("T", None), tp("U", None)];
        assert_eq!(long_generics(&params, &mut imports).unwrap(), "T, U");
        assert_eq!(short_generics(&params), "T, U");
    }

    #[test]
    fn bound_is_shortened_and_imported() {
        let mut imports = ImportSet::new();
        let params = [tp("T", Some("java.lang.Number"))];
        assert_eq!(
            long_generics(&params, &mut imports).unwrap(),
            "T extends Number"
        );
        assert_eq!(imports.sorted(), vec!["java.lang.Number".to_string()]);
        assert_eq!(short_generics(&params), "T");
    }

    #[test]
    fn declaration_order_is_preserved() {
        let mut imports = ImportSet::new();
        let params = [
            tp("K", Some("java.lang.Comparable<K>")),
            tp("V", None),
        ];
        assert_eq!(
            long_generics(&params, &mut imports).unwrap(),
            "K extends Comparable<K>, V"
        );
        assert_eq!(short_generics(&params), "K, V");
    }
}
