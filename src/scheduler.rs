//! Round scheduler: drives the per-class pipeline to a fixpoint.
//!
//! Each candidate class moves `Pending -> Succeeded | Rejected | Deferred`.
//! Deferral re-queues the class for the next round and is never a
//! diagnostic while rounds remain; it only means some referenced type has
//! not been generated yet. Classes are attempted independently: one class's
//! failure never blocks another.

use crate::diagnostics::DiagnosticCollector;
use crate::emit::{GeneratedFactory, RuntimeFacilities};
use crate::extract::{extract_class, Extraction};
use crate::generics::{long_generics, short_generics};
use crate::host::{Analysis, Filer};
use crate::model::CandidateClass;
use crate::naming::ClassNames;
use crate::typeref::ImportSet;
use indexmap::IndexMap;

/// Default number of rounds before a still-deferred class is escalated.
pub const DEFAULT_ROUNDS: usize = 10;

/// Terminal state of one candidate class after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassFate {
    /// A factory source file was created.
    Succeeded,
    /// Rejected with a diagnostic; no output.
    Rejected,
    /// Still deferred when the rounds ended; the named type never resolved.
    Unresolved { unresolved: String },
}

/// Result of a full generation run.
#[derive(Debug)]
pub struct RunReport {
    /// Terminal state per class, in input order.
    pub fates: IndexMap<String, ClassFate>,
    /// Rounds actually executed.
    pub rounds: usize,
}

impl RunReport {
    /// True when every class succeeded.
    pub fn success(&self) -> bool {
        self.fates.values().all(|f| *f == ClassFate::Succeeded)
    }

    pub fn succeeded(&self) -> usize {
        self.fates
            .values()
            .filter(|f| **f == ClassFate::Succeeded)
            .count()
    }

    pub fn fate(&self, class: &str) -> Option<&ClassFate> {
        self.fates.get(class)
    }
}

/// Drives repeated processing rounds over the candidate set.
#[derive(Debug)]
pub struct Scheduler {
    rounds: usize,
    runtime: RuntimeFacilities,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(DEFAULT_ROUNDS)
    }
}

impl Scheduler {
    pub fn new(rounds: usize) -> Self {
        Self {
            rounds: rounds.max(1),
            runtime: RuntimeFacilities::default(),
        }
    }

    pub fn with_runtime(mut self, runtime: RuntimeFacilities) -> Self {
        self.runtime = runtime;
        self
    }

    /// Process every candidate class to a terminal state.
    ///
    /// Stops early at a fixpoint: a round in which no class succeeds or
    /// rejects cannot change what the next round would resolve. Classes
    /// still deferred at the end are escalated to an unresolved-type error
    /// so output is never dropped silently.
    pub fn run(
        &self,
        classes: &[CandidateClass],
        analysis: &mut dyn Analysis,
        filer: &mut dyn Filer,
        diags: &mut DiagnosticCollector,
    ) -> RunReport {
        let mut fates: IndexMap<String, ClassFate> = IndexMap::new();
        let mut pending: Vec<&CandidateClass> = classes.iter().collect();
        let mut leftover: Vec<(&CandidateClass, String)> = Vec::new();
        let mut rounds = 0;

        for round in 1..=self.rounds {
            if pending.is_empty() {
                break;
            }
            rounds = round;
            let mut deferred: Vec<(&CandidateClass, String)> = Vec::new();
            let mut progressed = false;
            for class in pending {
                match self.process_class(class, analysis) {
                    Processed::Generated {
                        factory_fqn,
                        source,
                    } => match filer.create_source_file(&factory_fqn, &source) {
                        Ok(()) => {
                            analysis.factory_created(&factory_fqn);
                            fates.insert(class.name.clone(), ClassFate::Succeeded);
                            progressed = true;
                        }
                        Err(e) => {
                            diags.error(
                                &class.name,
                                format!("Exception processing {}: {}", class.name, e),
                            );
                            fates.insert(class.name.clone(), ClassFate::Rejected);
                            progressed = true;
                        }
                    },
                    Processed::Deferred { unresolved } => {
                        deferred.push((class, unresolved));
                    }
                    Processed::Rejected { message } => {
                        diags.error(&class.name, message);
                        fates.insert(class.name.clone(), ClassFate::Rejected);
                        progressed = true;
                    }
                }
            }
            pending = deferred.iter().map(|(class, _)| *class).collect();
            leftover = deferred;
            if !progressed {
                break;
            }
        }

        for (class, unresolved) in leftover {
            diags.error(
                &class.name,
                format!("unresolved type {} referenced by {}", unresolved, class.name),
            );
            fates.insert(
                class.name.clone(),
                ClassFate::Unresolved { unresolved },
            );
        }

        // Input order, regardless of which round a class finished in.
        let mut ordered = IndexMap::with_capacity(fates.len());
        for class in classes {
            if let Some(fate) = fates.shift_remove(&class.name) {
                ordered.insert(class.name.clone(), fate);
            }
        }
        RunReport {
            fates: ordered,
            rounds,
        }
    }

    /// One class through the whole pipeline: extract, resolve generics,
    /// derive names, render.
    fn process_class(&self, class: &CandidateClass, analysis: &dyn Analysis) -> Processed {
        let mut imports = ImportSet::new();
        imports.add(self.runtime.default_bean());
        imports.add(self.runtime.generated());
        imports.add(self.runtime.soy_events());
        imports.add(self.runtime.factory());

        let params = match extract_class(class, analysis, &self.runtime, &mut imports) {
            Extraction::Resolved(params) => params,
            Extraction::Deferred { unresolved } => return Processed::Deferred { unresolved },
            Extraction::Rejected { message } => return Processed::Rejected { message },
        };
        let long = match long_generics(&class.type_params, &mut imports) {
            Ok(long) => long,
            Err(e) => {
                return Processed::Rejected {
                    message: format!("Exception parsing {}: {}", class.name, e),
                };
            }
        };
        let short = short_generics(&class.type_params);
        let names = ClassNames::resolve(&class.name, &long, &short);
        let factory = GeneratedFactory {
            package: names.package,
            imports: imports.sorted(),
            simple_factory: names.simple_factory,
            simple_class: names.simple_class,
            params,
        };
        Processed::Generated {
            factory_fqn: names.factory_class,
            source: factory.render(),
        }
    }
}

enum Processed {
    Generated { factory_fqn: String, source: String },
    Deferred { unresolved: String },
    Rejected { message: String },
}
