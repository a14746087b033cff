//! Structured type references and import shortening.
//!
//! Textual type signatures (`java.util.Map<String, com.acme.Task>`) are
//! parsed once into a small tree of name + generic arguments, shortened by
//! walking the tree against a per-class [`ImportSet`], and rendered back to
//! text. Working on the tree keeps rewrites anchored to whole names, so a
//! name can never be clipped inside another token.

use indexmap::{IndexMap, IndexSet};
use std::fmt::Write;

/// Errors from parsing a textual type signature.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeParseError {
    /// A type name was expected but something else was found.
    #[error("malformed type signature `{0}`: expected a type name at offset {1}")]
    ExpectedName(String, usize),
    /// A generic argument list or array suffix was left unterminated.
    #[error("malformed type signature `{0}`: unterminated `{1}`")]
    Unterminated(String, char),
    /// Input continued past a complete type.
    #[error("malformed type signature `{0}`: unexpected trailing input at offset {1}")]
    Trailing(String, usize),
    /// A dotted name had an empty segment, e.g. `com..Foo`.
    #[error("malformed type signature `{0}`: empty name segment")]
    EmptySegment(String),
}

/// Kind of wildcard bound in a generic argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WildcardBound {
    Extends,
    Super,
}

/// A parsed type reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// A named type, possibly parameterized and/or an array:
    /// `java.util.List<com.acme.Task>[]`.
    Named {
        name: String,
        args: Vec<TypeRef>,
        dims: usize,
    },
    /// A wildcard generic argument: `?`, `? extends T`, `? super T`.
    Wildcard {
        bound: Option<(WildcardBound, Box<TypeRef>)>,
    },
}

impl TypeRef {
    /// Parse a textual type signature.
    pub fn parse(input: &str) -> Result<Self, TypeParseError> {
        let mut parser = Parser {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        };
        let ty = parser.parse_type()?;
        parser.skip_ws();
        if parser.pos < parser.bytes.len() {
            return Err(TypeParseError::Trailing(input.to_string(), parser.pos));
        }
        Ok(ty)
    }

    /// Outermost plain name of the reference, before any generic arguments
    /// or array suffix. Wildcards have none.
    pub fn plain_name(&self) -> Option<&str> {
        match self {
            TypeRef::Named { name, .. } => Some(name),
            TypeRef::Wildcard { .. } => None,
        }
    }

    /// Visit every named node in the tree, outermost first, arguments in
    /// declaration order.
    pub fn visit_names(&self, visit: &mut impl FnMut(&str)) {
        match self {
            TypeRef::Named { name, args, .. } => {
                visit(name);
                for arg in args {
                    arg.visit_names(visit);
                }
            }
            TypeRef::Wildcard { bound } => {
                if let Some((_, inner)) = bound {
                    inner.visit_names(visit);
                }
            }
        }
    }

    /// Shorten every dotted name in the tree that can still claim its simple
    /// name, recording claimed names as imports.
    pub fn shortened(&self, imports: &mut ImportSet) -> TypeRef {
        match self {
            TypeRef::Named { name, args, dims } => TypeRef::Named {
                name: imports.claim(name),
                args: args.iter().map(|a| a.shortened(imports)).collect(),
                dims: *dims,
            },
            TypeRef::Wildcard { bound } => TypeRef::Wildcard {
                bound: bound
                    .as_ref()
                    .map(|(kind, inner)| (*kind, Box::new(inner.shortened(imports)))),
            },
        }
    }

    /// Render the reference back to text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        match self {
            TypeRef::Named { name, args, dims } => {
                out.push_str(name);
                if !args.is_empty() {
                    out.push('<');
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        arg.render_into(out);
                    }
                    out.push('>');
                }
                for _ in 0..*dims {
                    out.push_str("[]");
                }
            }
            TypeRef::Wildcard { bound } => match bound {
                None => out.push('?'),
                Some((WildcardBound::Extends, inner)) => {
                    let _ = write!(out, "? extends {}", inner.render());
                }
                Some((WildcardBound::Super, inner)) => {
                    let _ = write!(out, "? super {}", inner.render());
                }
            },
        }
    }
}

/// Parse and shorten a type signature in one step.
pub fn shorten(type_str: &str, imports: &mut ImportSet) -> Result<String, TypeParseError> {
    Ok(TypeRef::parse(type_str)?.shortened(imports).render())
}

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn parse_type(&mut self) -> Result<TypeRef, TypeParseError> {
        self.skip_ws();
        if self.peek() == Some(b'?') {
            self.pos += 1;
            return self.parse_wildcard();
        }
        let name = self.take_name()?;
        let mut args = Vec::new();
        self.skip_ws();
        if self.peek() == Some(b'<') {
            self.pos += 1;
            loop {
                args.push(self.parse_type()?);
                self.skip_ws();
                match self.peek() {
                    Some(b',') => self.pos += 1,
                    Some(b'>') => {
                        self.pos += 1;
                        break;
                    }
                    _ => {
                        return Err(TypeParseError::Unterminated(self.input.to_string(), '<'));
                    }
                }
            }
        }
        let mut dims = 0;
        loop {
            self.skip_ws();
            if self.peek() == Some(b'[') {
                self.pos += 1;
                self.skip_ws();
                if self.peek() != Some(b']') {
                    return Err(TypeParseError::Unterminated(self.input.to_string(), '['));
                }
                self.pos += 1;
                dims += 1;
            } else {
                break;
            }
        }
        Ok(TypeRef::Named { name, args, dims })
    }

    fn parse_wildcard(&mut self) -> Result<TypeRef, TypeParseError> {
        let mark = self.pos;
        self.skip_ws();
        let keyword = self.take_name_opt();
        let bound = match keyword.as_deref() {
            Some("extends") => Some((WildcardBound::Extends, Box::new(self.parse_type()?))),
            Some("super") => Some((WildcardBound::Super, Box::new(self.parse_type()?))),
            Some(_) => {
                return Err(TypeParseError::ExpectedName(self.input.to_string(), mark));
            }
            None => None,
        };
        Ok(TypeRef::Wildcard { bound })
    }

    fn take_name(&mut self) -> Result<String, TypeParseError> {
        self.take_name_opt()
            .ok_or_else(|| TypeParseError::ExpectedName(self.input.to_string(), self.pos))
            .and_then(|name| {
                if name.split('.').any(str::is_empty) {
                    Err(TypeParseError::EmptySegment(self.input.to_string()))
                } else {
                    Ok(name)
                }
            })
    }

    fn take_name_opt(&mut self) -> Option<String> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b == b'.' {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start {
            None
        } else {
            Some(self.input[start..self.pos].to_string())
        }
    }

    fn skip_ws(&mut self) {
        while self.peek() == Some(b' ') {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Claim {
    /// Claimed by a bare simple name seen in source.
    Bare,
    /// Claimed by a fully-qualified name that was shortened.
    Qualified(String),
}

/// The import and claimed-name state for one class's processing.
///
/// Scoped to a single class: claims made while shortening one parameter type
/// persist for every later type of the same class, so repeated runs over the
/// same class produce identical output, and two different qualified names can
/// never collapse onto the same simple name.
#[derive(Debug, Clone, Default)]
pub struct ImportSet {
    imports: IndexSet<String>,
    claims: IndexMap<String, Claim>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an import directly, without claiming a simple name.
    pub fn add(&mut self, fqn: impl Into<String>) {
        self.imports.insert(fqn.into());
    }

    /// Claim the simple name for `name` if possible and return the display
    /// form: the simple name when this qualified name owns (or now takes)
    /// the claim, the unchanged input otherwise.
    pub fn claim(&mut self, name: &str) -> String {
        let Some(i) = name.rfind('.') else {
            self.claims.entry(name.to_string()).or_insert(Claim::Bare);
            return name.to_string();
        };
        let simple = &name[i + 1..];
        match self.claims.get(simple) {
            None => {
                self.claims
                    .insert(simple.to_string(), Claim::Qualified(name.to_string()));
                self.imports.insert(name.to_string());
                simple.to_string()
            }
            Some(Claim::Qualified(owner)) if owner == name => simple.to_string(),
            Some(_) => name.to_string(),
        }
    }

    /// All recorded imports, sorted for emission.
    pub fn sorted(&self) -> Vec<String> {
        let mut imports: Vec<String> = self.imports.iter().cloned().collect();
        imports.sort();
        imports
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }
}
