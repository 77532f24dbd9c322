//! Structural representation of one scanned Go source file.

use crate::diagnostics::Warning;

/// One parsed input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// The declared package name.
    pub package: String,
    /// Import specs in file order, duplicates included.
    pub imports: Vec<ImportSpec>,
    /// Annotated struct types in first-seen declaration order.
    pub types: Vec<AnnotatedType>,
    /// Diagnostics raised while scanning.
    pub warnings: Vec<Warning>,
}

impl SourceUnit {
    /// True when no declaration in the file carried the builder marker.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Looks up an annotated type by name.
    pub fn annotated(&self, name: &str) -> Option<&AnnotatedType> {
        self.types.iter().find(|ty| ty.name == name)
    }

    /// Registers an annotated type, replacing a same-name entry in place.
    ///
    /// Returns true when an earlier declaration was replaced.
    pub(crate) fn register(&mut self, ty: AnnotatedType) -> bool {
        match self.types.iter_mut().find(|existing| existing.name == ty.name) {
            Some(existing) => {
                *existing = ty;
                true
            }
            None => {
                self.types.push(ty);
                false
            }
        }
    }
}

/// A single import as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// The path literal, quotes included (`"k8s.io/api/core/v1"`).
    pub path: String,
    /// The local name, when one is declared (`metav1`, `_` or `.`).
    pub alias: Option<String>,
}

impl ImportSpec {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: None,
        }
    }

    pub fn aliased(alias: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: Some(alias.into()),
        }
    }
}

/// A struct type declaration selected by the builder marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedType {
    pub name: String,
    /// Struct members in declaration order.
    pub members: Vec<Member>,
}

impl AnnotatedType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, ty: TypeExpr) -> Self {
        self.members.push(Member::Field(Field {
            name: name.into(),
            ty,
        }));
        self
    }

    pub fn with_embedded(mut self, relation: EmbeddedRelation) -> Self {
        self.members.push(Member::Embedded(relation));
        self
    }

    /// Named members, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.members.iter().filter_map(|member| match member {
            Member::Field(field) => Some(field),
            Member::Embedded(_) => None,
        })
    }

    /// Embedded members, in declaration order.
    pub fn embedded(&self) -> impl Iterator<Item = &EmbeddedRelation> {
        self.members.iter().filter_map(|member| match member {
            Member::Embedded(relation) => Some(relation),
            Member::Field(_) => None,
        })
    }
}

/// One member of an annotated struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Field(Field),
    Embedded(EmbeddedRelation),
}

/// A named member of an annotated struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: TypeExpr,
}

/// An unnamed struct member, e.g. `metav1.ObjectMeta`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedRelation {
    /// The selector name of the embedded type (`ObjectMeta`).
    pub name: String,
    pub ty: TypeExpr,
    /// Embedded as `*T` rather than `T`.
    pub pointer: bool,
}

impl EmbeddedRelation {
    /// Builds a relation from the embedded type expression.
    pub fn from_type(ty: TypeExpr, pointer: bool) -> Self {
        let name = match &ty {
            TypeExpr::Qualified { name, .. } | TypeExpr::Ident(name) => name.clone(),
            other => crate::render::render(other),
        };

        Self { name, ty, pointer }
    }

    /// True for a non-pointer, cross-package embed like `metav1.ObjectMeta`.
    pub fn is_qualified(&self) -> bool {
        !self.pointer && matches!(self.ty, TypeExpr::Qualified { .. })
    }
}

/// A Go type expression, as far as the generator understands it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// `string`, `RestartPolicy`
    Ident(String),
    /// `*T`
    Pointer(Box<TypeExpr>),
    /// `metav1.Time`
    Qualified { package: String, name: String },
    /// `[]T` when `len` is `None`, `[N]T` otherwise.
    Sequence {
        len: Option<String>,
        element: Box<TypeExpr>,
    },
    /// `map[K]V`
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    /// Any other shape, tagged with its syntax node kind.
    Unsupported { shape: String },
}

impl TypeExpr {
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Ident(name.into())
    }

    pub fn qualified(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Qualified {
            package: package.into(),
            name: name.into(),
        }
    }

    pub fn pointer(inner: Self) -> Self {
        Self::Pointer(Box::new(inner))
    }

    pub fn slice(element: Self) -> Self {
        Self::Sequence {
            len: None,
            element: Box::new(element),
        }
    }

    pub fn array(len: impl Into<String>, element: Self) -> Self {
        Self::Sequence {
            len: Some(len.into()),
            element: Box::new(element),
        }
    }

    pub fn map(key: Self, value: Self) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn unsupported(shape: impl Into<String>) -> Self {
        Self::Unsupported {
            shape: shape.into(),
        }
    }

    /// Returns the first unsupported shape found in the expression tree.
    pub fn unsupported_shape(&self) -> Option<&str> {
        match self {
            Self::Ident(_) | Self::Qualified { .. } => None,
            Self::Pointer(inner) => inner.unsupported_shape(),
            Self::Sequence { element, .. } => element.unsupported_shape(),
            Self::Map { key, value } => key
                .unsupported_shape()
                .or_else(|| value.unsupported_shape()),
            Self::Unsupported { shape } => Some(shape),
        }
    }
}
