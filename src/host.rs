//! Host environment surface: type resolution in, source files out.
//!
//! The generator core is host-agnostic. [`Analysis`] answers what a
//! parameter's static type currently resolves to, and [`Filer`] owns the
//! create-once source output. The bundled [`ModelAnalysis`] resolves against
//! the class model plus the factories emitted so far, which is what makes a
//! later round succeed where an earlier one deferred.

use crate::model::{CandidateClass, ParameterDecl};
use crate::typeref::TypeRef;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;

/// Errors from emitting a generated source file.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// A factory source with this name was already created.
    #[error("source file already exists for {0}")]
    AlreadyExists(String),
    /// The file could not be written.
    #[error("failed to write {0}: {1}")]
    Io(String, #[source] std::io::Error),
}

/// Static-type oracle of the host analysis environment.
pub trait Analysis {
    /// The parameter's resolved static type, or `None` while the analyzer
    /// only sees a placeholder for it (typically because the type is
    /// produced by a generation round that has not run yet).
    fn static_type(&self, class: &CandidateClass, param: &ParameterDecl) -> Option<String>;

    /// Notification that a factory source file now exists, so the next
    /// round can resolve references to it.
    fn factory_created(&mut self, _factory_fqn: &str) {}
}

/// Create-once sink for generated source files, named by fully-qualified
/// factory name.
pub trait Filer {
    fn create_source_file(&mut self, fqn: &str, contents: &str) -> Result<(), EmitError>;
}

/// [`Analysis`] over a class model.
///
/// Every type is assumed present on the classpath except a factory type of
/// one of the model's own candidates: that one is a placeholder until its
/// source has been created.
#[derive(Debug)]
pub struct ModelAnalysis {
    factory_bases: HashMap<String, String>,
    emitted: HashSet<String>,
}

impl ModelAnalysis {
    pub fn new(classes: &[CandidateClass]) -> Self {
        let factory_bases = classes
            .iter()
            .map(|c| (format!("{}Factory", c.name), c.name.clone()))
            .collect();
        Self {
            factory_bases,
            emitted: HashSet::new(),
        }
    }

    /// Resolve a type name appearing in `class` to a fully-qualified name:
    /// dotted names stand alone, bare names go through the unit's imports
    /// and fall back to the class's own package.
    fn qualify(&self, class: &CandidateClass, name: &str) -> String {
        if name.contains('.') {
            return name.to_string();
        }
        if let Some(import) = class
            .imports
            .iter()
            .find(|import| import.ends_with(&format!(".{name}")))
        {
            return import.clone();
        }
        match class.package() {
            Some(package) => format!("{package}.{name}"),
            None => name.to_string(),
        }
    }
}

impl Analysis for ModelAnalysis {
    fn static_type(&self, class: &CandidateClass, param: &ParameterDecl) -> Option<String> {
        // Malformed signatures pass through; extraction reports them.
        let Ok(tree) = TypeRef::parse(&param.ty) else {
            return Some(param.ty.clone());
        };
        let mut unresolved = false;
        tree.visit_names(&mut |name| {
            if class.type_params.iter().any(|tp| tp.name == name) {
                return;
            }
            let fqn = self.qualify(class, name);
            if self.factory_bases.contains_key(&fqn) && !self.emitted.contains(&fqn) {
                unresolved = true;
            }
        });
        if unresolved {
            None
        } else {
            Some(param.ty.clone())
        }
    }

    fn factory_created(&mut self, factory_fqn: &str) {
        self.emitted.insert(factory_fqn.to_string());
    }
}

/// In-memory [`Filer`] used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryFiler {
    files: IndexMap<String, String>,
}

impl MemoryFiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, fqn: &str) -> Option<&str> {
        self.files.get(fqn).map(String::as_str)
    }

    /// Created files in creation order.
    pub fn files(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Filer for MemoryFiler {
    fn create_source_file(&mut self, fqn: &str, contents: &str) -> Result<(), EmitError> {
        if self.files.contains_key(fqn) {
            return Err(EmitError::AlreadyExists(fqn.to_string()));
        }
        self.files.insert(fqn.to_string(), contents.to_string());
        Ok(())
    }
}

/// [`Filer`] writing `.java` sources under a package directory tree.
#[derive(Debug)]
pub struct DirFiler {
    root: PathBuf,
    created: HashSet<String>,
}

impl DirFiler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            created: HashSet::new(),
        }
    }

    /// File path for a fully-qualified factory name, e.g.
    /// `com.acme.WidgetFactory` under `out/` maps to
    /// `out/com/acme/WidgetFactory.java`.
    pub fn path_for(&self, fqn: &str) -> PathBuf {
        let mut path = self.root.clone();
        for segment in fqn.split('.') {
            path.push(segment);
        }
        path.set_extension("java");
        path
    }
}

impl Filer for DirFiler {
    fn create_source_file(&mut self, fqn: &str, contents: &str) -> Result<(), EmitError> {
        let path = self.path_for(fqn);
        if self.created.contains(fqn) || path.exists() {
            return Err(EmitError::AlreadyExists(fqn.to_string()));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| EmitError::Io(path.display().to_string(), e))?;
        }
        fs::write(&path, contents).map_err(|e| EmitError::Io(path.display().to_string(), e))?;
        self.created.insert(fqn.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConstructorDecl, ParameterDecl};

    fn candidate(name: &str) -> CandidateClass {
        CandidateClass {
            name: name.to_string(),
            constructors: vec![ConstructorDecl::default()],
            type_params: vec![],
            imports: vec![],
        }
    }

    fn param(ty: &str) -> ParameterDecl {
        ParameterDecl {
            name: "p".to_string(),
            ty: ty.to_string(),
            assisted: false,
        }
    }

    #[test]
    fn ordinary_types_resolve_immediately() {
        let classes = [candidate("com.acme.A")];
        let analysis = ModelAnalysis::new(&classes);
        assert_eq!(
            analysis.static_type(&classes[0], &param("java.util.List<String>")),
            Some("java.util.List<String>".to_string())
        );
    }

    #[test]
    fn candidate_factory_type_is_placeholder_until_created() {
        let classes = [candidate("com.acme.A"), candidate("com.acme.B")];
        let mut analysis = ModelAnalysis::new(&classes);
        let p = param("BFactory");
        assert_eq!(analysis.static_type(&classes[0], &p), None);
        analysis.factory_created("com.acme.BFactory");
        assert_eq!(
            analysis.static_type(&classes[0], &p),
            Some("BFactory".to_string())
        );
    }

    #[test]
    fn factory_reference_nested_in_generics_is_placeholder() {
        let classes = [candidate("com.acme.A"), candidate("com.acme.B")];
        let analysis = ModelAnalysis::new(&classes);
        let p = param("java.util.List<com.acme.BFactory>");
        assert_eq!(analysis.static_type(&classes[0], &p), None);
    }

    #[test]
    fn unit_imports_qualify_bare_factory_names() {
        let classes = [
            CandidateClass {
                name: "com.acme.A".to_string(),
                constructors: vec![ConstructorDecl::default()],
                type_params: vec![],
                imports: vec!["com.other.BFactory".to_string()],
            },
            candidate("com.other.B"),
        ];
        let analysis = ModelAnalysis::new(&classes);
        assert_eq!(analysis.static_type(&classes[0], &param("BFactory")), None);
    }

    #[test]
    fn memory_filer_is_create_once() {
        let mut filer = MemoryFiler::new();
        filer.create_source_file("com.acme.WidgetFactory", "x").unwrap();
        let err = filer
            .create_source_file("com.acme.WidgetFactory", "y")
            .unwrap_err();
        assert!(matches!(err, EmitError::AlreadyExists(_)));
        assert_eq!(filer.get("com.acme.WidgetFactory"), Some("x"));
    }

    #[test]
    fn dir_filer_maps_packages_to_directories() {
        let filer = DirFiler::new("/tmp/out");
        assert_eq!(
            filer.path_for("com.acme.WidgetFactory"),
            PathBuf::from("/tmp/out/com/acme/WidgetFactory.java")
        );
        assert_eq!(
            filer.path_for("WidgetFactory"),
            PathBuf::from("/tmp/out/WidgetFactory.java")
        );
    }
}
