//! Build-time factory generator for the Soy dependency injection runtime.
//!
//! Given a class model (classes marked for injection, their constructors,
//! parameter markers, declared generics, and compilation-unit imports), the
//! generator selects each class's injection constructor, resolves parameter
//! types, and emits one companion factory source file per class. The factory
//! constructs the class by injecting every non-assisted parameter through the
//! runtime injector, registers the instance with the runtime event system,
//! and returns it.
//!
//! Generation runs in rounds: a parameter may reference a factory type that
//! only exists after an earlier class has been processed, so classes with
//! still-unresolved types are deferred and retried until a fixpoint or the
//! round budget is reached.

mod config;
mod diagnostics;
mod emit;
mod extract;
mod generics;
mod host;
mod model;
mod naming;
mod scheduler;
mod typeref;

pub use config::{ConfigError, GenerateConfig, SoyConfig};
pub use diagnostics::{render_diagnostic, Diagnostic, DiagnosticCollector, Severity};
pub use emit::{GeneratedFactory, RuntimeFacilities};
pub use extract::{extract_class, Extraction, Parameter};
pub use host::{Analysis, DirFiler, EmitError, Filer, MemoryFiler, ModelAnalysis};
pub use model::{
    CandidateClass, ClassModel, ConstructorDecl, ModelError, ParameterDecl, TypeParamDecl,
};
pub use naming::ClassNames;
pub use scheduler::{ClassFate, RunReport, Scheduler, DEFAULT_ROUNDS};
pub use typeref::{ImportSet, TypeParseError, TypeRef, WildcardBound};
