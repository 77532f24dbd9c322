//! Renders [`TypeExpr`] trees back into Go source text.

use crate::model::TypeExpr;

/// Prefix of the placeholder emitted for shapes the renderer cannot express.
pub const UNSUPPORTED_PREFIX: &str = "unsupported-";

/// Renders a type expression as Go source.
///
/// Unsupported shapes become `unsupported-<shape>` so generation can carry on;
/// the synthesizer reports them as warnings.
///
/// ## Examples
///
/// ```
/// use gobuilder_lib::model::TypeExpr;
/// use gobuilder_lib::render::render;
///
/// let ty = TypeExpr::pointer(TypeExpr::slice(TypeExpr::map(
///     TypeExpr::ident("string"),
///     TypeExpr::ident("string"),
/// )));
/// assert_eq!(render(&ty), "*[]map[string]string");
/// ```
pub fn render(ty: &TypeExpr) -> String {
    match ty {
        TypeExpr::Ident(name) => name.clone(),
        TypeExpr::Pointer(inner) => format!("*{}", render(inner)),
        TypeExpr::Qualified { package, name } => format!("{package}.{name}"),
        TypeExpr::Sequence { len, element } => {
            format!("[{}]{}", len.as_deref().unwrap_or_default(), render(element))
        }
        TypeExpr::Map { key, value } => format!("map[{}]{}", render(key), render(value)),
        TypeExpr::Unsupported { shape } => format!("{UNSUPPORTED_PREFIX}{shape}"),
    }
}
