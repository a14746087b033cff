//! Class model: the input contract of the generator.
//!
//! A host analysis pass (or the `soygen` CLI's JSON loader) produces one
//! [`CandidateClass`] per class marked for factory generation. The model is
//! immutable for the duration of a run.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Errors loading or decoding a class model document.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The document could not be read.
    #[error("failed to read {0}: {1}")]
    Io(String, #[source] std::io::Error),
    /// The document is not a valid class model.
    #[error("invalid class model in {0}: {1}")]
    Decode(String, #[source] serde_json::Error),
}

/// Root of a class model document.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ClassModel {
    /// Classes marked for factory generation, in discovery order.
    #[serde(default)]
    pub classes: Vec<CandidateClass>,
}

impl ClassModel {
    /// Load a class model from a JSON document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| ModelError::Io(path.display().to_string(), e))?;
        serde_json::from_str(&text)
            .map_err(|e| ModelError::Decode(path.display().to_string(), e))
    }
}

/// One class marked for factory generation.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateClass {
    /// Fully-qualified class name, e.g. `com.acme.Widget`.
    pub name: String,
    /// Declared constructors. A class declaring none has an implicit no-arg
    /// constructor.
    #[serde(default)]
    pub constructors: Vec<ConstructorDecl>,
    /// Declared type parameters, in declaration order.
    #[serde(default)]
    pub type_params: Vec<TypeParamDecl>,
    /// Import declarations of the enclosing compilation unit. Used to infer
    /// the import of a bare type name the unit references without
    /// qualification.
    #[serde(default)]
    pub imports: Vec<String>,
}

impl CandidateClass {
    /// Package portion of the class name, if any.
    pub fn package(&self) -> Option<&str> {
        match self.name.rfind('.') {
            Some(i) if i > 0 => Some(&self.name[..i]),
            _ => None,
        }
    }
}

/// A declared constructor.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConstructorDecl {
    /// Whether the constructor carries the injection marker.
    #[serde(default)]
    pub inject: bool,
    /// Parameters in declaration order.
    #[serde(default)]
    pub params: Vec<ParameterDecl>,
}

/// A constructor parameter as declared in source.
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterDecl {
    /// Parameter name.
    pub name: String,
    /// Textual type signature, possibly parameterized,
    /// e.g. `java.util.List<com.acme.Task>`.
    #[serde(rename = "type")]
    pub ty: String,
    /// Whether the parameter is supplied by the factory caller instead of
    /// being resolved by the injector.
    #[serde(default)]
    pub assisted: bool,
}

/// A declared type parameter of a generic class.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeParamDecl {
    /// Type parameter name, e.g. `T`.
    pub name: String,
    /// Declared upper bound, if any.
    #[serde(default)]
    pub bound: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_minimal_class() {
        let model: ClassModel = serde_json::from_str(
            r#"{ "classes": [ { "name": "com.acme.Widget" } ] }"#,
        )
        .unwrap();
        assert_eq!(model.classes.len(), 1);
        let class = &model.classes[0];
        assert_eq!(class.name, "com.acme.Widget");
        assert!(class.constructors.is_empty());
        assert!(class.type_params.is_empty());
    }

    #[test]
    fn decodes_constructor_and_markers() {
        let model: ClassModel = serde_json::from_str(
            r#"{
              "classes": [
                {
                  "name": "com.acme.Widget",
                  "imports": ["com.acme.parts.WidgetPart"],
                  "constructors": [
                    {
                      "inject": true,
                      "params": [
                        { "name": "part", "type": "WidgetPart" },
                        { "name": "label", "type": "String", "assisted": true }
                      ]
                    }
                  ]
                }
              ]
            }"#,
        )
        .unwrap();
        let ctor = &model.classes[0].constructors[0];
        assert!(ctor.inject);
        assert!(!ctor.params[0].assisted);
        assert!(ctor.params[1].assisted);
        assert_eq!(ctor.params[1].ty, "String");
    }

    #[test]
    fn package_splits_on_last_dot() {
        let class = CandidateClass {
            name: "com.acme.Widget".into(),
            constructors: vec![],
            type_params: vec![],
            imports: vec![],
        };
        assert_eq!(class.package(), Some("com.acme"));
    }

    #[test]
    fn package_absent_without_dot() {
        let class = CandidateClass {
            name: "Widget".into(),
            constructors: vec![],
            type_params: vec![],
            imports: vec![],
        };
        assert_eq!(class.package(), None);
    }
}
