//! Naming resolver: package, simple class name, and factory names.

/// Resolved names for one class and its factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNames {
    /// Package of the class, `None` for the root package.
    pub package: Option<String>,
    /// Wrapped class simple name, generic-decorated with the short form.
    pub simple_class: String,
    /// Fully-qualified factory name (class name + `Factory`), used to name
    /// the generated file.
    pub factory_class: String,
    /// Factory simple name, generic-decorated with the long form.
    pub simple_factory: String,
}

impl ClassNames {
    /// Derive all names from a fully-qualified class name and the resolved
    /// generic forms. The factory simple name splits at the same dot as the
    /// wrapped class; generic suffixes are appended only after both simple
    /// names are computed.
    pub fn resolve(fqn: &str, long_generics: &str, short_generics: &str) -> Self {
        let last_dot = fqn.rfind('.');
        let package = match last_dot {
            Some(i) if i > 0 => Some(fqn[..i].to_string()),
            _ => None,
        };
        let split = last_dot.map(|i| i + 1).unwrap_or(0);
        let mut simple_class = fqn[split..].to_string();
        let factory_class = format!("{fqn}Factory");
        let mut simple_factory = factory_class[split..].to_string();
        if !short_generics.is_empty() {
            simple_class = format!("{simple_class}<{short_generics}>");
        }
        if !long_generics.is_empty() {
            simple_factory = format!("{simple_factory}<{long_generics}>");
        }
        Self {
            package,
            simple_class,
            factory_class,
            simple_factory,
        }
    }
}
