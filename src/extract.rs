//! Symbol extractor: constructor selection and parameter resolution.
//!
//! Extraction never aborts the run. Its outcome is an explicit variant:
//! resolved parameters, a deferral (a referenced type does not exist yet in
//! this round, retry in the next one), or a rejection with a diagnostic
//! message.

use crate::emit::RuntimeFacilities;
use crate::host::Analysis;
use crate::model::{CandidateClass, ParameterDecl};
use crate::typeref::{ImportSet, TypeRef};

/// A resolved constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Supplied by the factory caller instead of the injector.
    pub assisted: bool,
    /// Shortened display type.
    pub ty: String,
    /// Parameter name.
    pub name: String,
    /// Injection expression: a class literal, or a type-token construction
    /// when the type carries generic information.
    pub reference: String,
}

/// Outcome of extracting one class.
#[derive(Debug, Clone)]
pub enum Extraction {
    /// Constructor parameters in declaration order.
    Resolved(Vec<Parameter>),
    /// A parameter's static type is still a placeholder; retry next round.
    Deferred {
        /// The declared type text that failed to resolve.
        unresolved: String,
    },
    /// The class cannot be processed; a diagnostic is due and no output is
    /// produced.
    Rejected { message: String },
}

/// Select the injection constructor and extract its parameters.
///
/// Imports accumulate into `imports`: the injector facility for every
/// non-assisted parameter, the type-token facility for every generic-typed
/// parameter, and an inferred import for every bare type name the
/// compilation unit imports explicitly.
pub fn extract_class(
    class: &CandidateClass,
    analysis: &dyn Analysis,
    runtime: &RuntimeFacilities,
    imports: &mut ImportSet,
) -> Extraction {
    let decls = match select_constructor(class) {
        Ok(decls) => decls,
        Err(message) => return Extraction::Rejected { message },
    };

    let mut params = Vec::with_capacity(decls.len());
    for decl in decls {
        let Some(type_string) = analysis.static_type(class, decl) else {
            return Extraction::Deferred {
                unresolved: decl.ty.clone(),
            };
        };
        let tree = match TypeRef::parse(&type_string) {
            Ok(tree) => tree,
            Err(e) => {
                return Extraction::Rejected {
                    message: format!("Exception parsing {}: {}", class.name, e),
                };
            }
        };
        if let Some(plain) = tree.plain_name() {
            if !plain.contains('.') {
                if let Some(import) = find_unit_import(class, plain) {
                    imports.add(import);
                }
            }
        }
        let shortened = tree.shortened(imports).render();
        if !decl.assisted {
            imports.add(runtime.soy_di());
        }
        let reference = if shortened.contains('<') || is_type_param(class, &shortened) {
            imports.add(runtime.type_reference());
            format!("new TypeReference<{shortened}>(){{}}")
        } else {
            format!("{shortened}.class")
        };
        params.push(Parameter {
            assisted: decl.assisted,
            ty: shortened,
            name: decl.name.clone(),
            reference,
        });
    }
    Extraction::Resolved(params)
}

/// Pick the constructor to inject: the only one declared, or, among several,
/// the single one carrying the injection marker. A class declaring no
/// constructor has an implicit no-arg one.
fn select_constructor(class: &CandidateClass) -> Result<&[ParameterDecl], String> {
    match class.constructors.len() {
        0 => Ok(&[]),
        1 => Ok(&class.constructors[0].params),
        _ => {
            let mut marked = class.constructors.iter().filter(|c| c.inject);
            match (marked.next(), marked.next()) {
                (Some(ctor), None) => Ok(&ctor.params),
                (None, _) => Err(format!(
                    "If more than one constructor exists, exactly one must be marked for injection: {}",
                    class.name
                )),
                (Some(_), Some(_)) => Err(format!(
                    "Only one constructor can be marked for injection: {}",
                    class.name
                )),
            }
        }
    }
}

/// Resolve a bare simple name against the compilation unit's own imports.
/// No match means the type is assumed to live in the same package.
fn find_unit_import(class: &CandidateClass, simple: &str) -> Option<String> {
    class
        .imports
        .iter()
        .find(|import| import.ends_with(&format!(".{simple}")))
        .cloned()
}

fn is_type_param(class: &CandidateClass, name: &str) -> bool {
    class.type_params.iter().any(|tp| tp.name == name)
}
