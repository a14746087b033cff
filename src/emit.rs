//! Source emitter: renders one resolved factory into source text.
//!
//! Rendering is byte-deterministic: identical input state always produces
//! identical output, so repeated rounds or repeated builds never appear to
//! change a generated file.

use crate::extract::Parameter;
use std::fmt::Write;

/// Names of the runtime facilities the generated code binds to.
///
/// The simple names (`SoyDi`, `SoyEvents`, `TypeReference`, `Factory`,
/// `DefaultBean`) are fixed; only the package they are imported from can be
/// relocated.
#[derive(Debug, Clone)]
pub struct RuntimeFacilities {
    /// Package holding the runtime facilities.
    pub package: String,
}

impl Default for RuntimeFacilities {
    fn default() -> Self {
        Self {
            package: "soy.di".to_string(),
        }
    }
}

impl RuntimeFacilities {
    pub fn with_package(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
        }
    }

    /// Marker declaring the factory a default-registered, singleton-eligible
    /// component.
    pub fn default_bean(&self) -> String {
        format!("{}.DefaultBean", self.package)
    }

    /// The `@Generated` annotation type.
    pub fn generated(&self) -> String {
        "javax.annotation.processing.Generated".to_string()
    }

    /// Event system the constructed instance is registered with.
    pub fn soy_events(&self) -> String {
        format!("{}.SoyEvents", self.package)
    }

    /// Marker capability every generated factory implements.
    pub fn factory(&self) -> String {
        format!("{}.Factory", self.package)
    }

    /// Static injector lookup.
    pub fn soy_di(&self) -> String {
        format!("{}.SoyDi", self.package)
    }

    /// Type token distinguishing parameterized types.
    pub fn type_reference(&self) -> String {
        format!("{}.TypeReference", self.package)
    }
}

/// A fully resolved factory, ready to render.
///
/// Created fresh per processing round per candidate class and written once;
/// never mutated afterwards.
#[derive(Debug, Clone)]
pub struct GeneratedFactory {
    /// Package of the generated file; `None` suppresses the package line.
    pub package: Option<String>,
    /// Fully-qualified imports, deduplicated. Sorted at render time.
    pub imports: Vec<String>,
    /// Factory simple name, generic-decorated with the long form.
    pub simple_factory: String,
    /// Wrapped class simple name, generic-decorated with the short form.
    pub simple_class: String,
    /// Constructor parameters in declaration order.
    pub params: Vec<Parameter>,
}

impl GeneratedFactory {
    /// Render the factory source.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(package) = &self.package {
            let _ = writeln!(out, "package {package};");
            out.push('\n');
        }
        if !self.imports.is_empty() {
            let mut imports = self.imports.clone();
            imports.sort();
            imports.dedup();
            for import in &imports {
                let _ = writeln!(out, "import {import};");
            }
            out.push('\n');
        }
        out.push_str("// Generated with SoyDi\n");
        out.push_str("@Generated(\"soygen\")\n");
        out.push_str("@DefaultBean\n");
        let _ = writeln!(
            out,
            "public class {} implements Factory {{",
            self.simple_factory
        );
        out.push('\n');
        let assisted = self
            .params
            .iter()
            .filter(|p| p.assisted)
            .map(|p| format!("{} {}", p.ty, p.name))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "  public {} create({}){{", self.simple_class, assisted);
        out.push('\n');
        if !self.params.is_empty() {
            for param in self.params.iter().filter(|p| !p.assisted) {
                let _ = writeln!(
                    out,
                    "    {} {} = SoyDi.inject({});",
                    param.ty, param.name, param.reference
                );
            }
            out.push('\n');
        }
        let arguments = self
            .params
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(",\n          ");
        let _ = writeln!(
            out,
            "    {} instance = new {}({});",
            self.simple_class, self.simple_class, arguments
        );
        out.push_str("    SoyEvents.registerInstance(instance);\n");
        out.push_str("    return instance;\n");
        out.push_str("  }\n");
        out.push_str("}\n");
        out
    }
}
