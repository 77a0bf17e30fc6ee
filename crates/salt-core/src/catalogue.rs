//! User-selectable schemes, in the order they are offered.

use serde::Serialize;

use crate::lang_tag::{normalize_scheme, LanguageTag, SchemeId, UNDEFINED};
use crate::scheme::SchemeRegistry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogueEntry {
    /// Tag selecting the scheme, e.g. `x-iso`.
    pub tag: LanguageTag,
    pub scheme: SchemeId,
    /// Short description, e.g. `vh`.
    pub label: String,
    /// Long description, e.g. `Velthuis`.
    pub name: String,
}

pub fn catalogue(registry: &SchemeRegistry) -> Vec<CatalogueEntry> {
    registry
        .iter()
        .map(|scheme| {
            let id = SchemeId::new(scheme.id());
            CatalogueEntry {
                tag: LanguageTag::with_scheme("", &id),
                scheme: id,
                label: scheme.label().to_string(),
                name: scheme.name().to_string(),
            }
        })
        .collect()
}

/// Short description of the scheme `tag` denotes, or `und`.
pub fn describe<'r>(registry: &'r SchemeRegistry, tag: &str) -> &'r str {
    let id = normalize_scheme(registry, tag);
    registry
        .get(id.as_str())
        .map(|scheme| scheme.label())
        .unwrap_or(UNDEFINED)
}
