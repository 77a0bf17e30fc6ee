use std::collections::HashMap;
use std::sync::OnceLock;

use tracing::debug;

use super::config::{parse_schemes_toml, SchemeConfigError};
use super::{Group, Scheme, SchemeKind, UnknownSchemeError};

const DEFAULT_TOML: &str = include_str!("default_schemes.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Returns the embedded default scheme TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_TOML
}

/// Named schemes, looked up by id or alias (case-insensitively).
///
/// Built once at startup and read-only afterwards; pass it by reference to
/// the transliterator and the tag resolver.
#[derive(Debug, Default)]
pub struct SchemeRegistry {
    /// Registration order, which is also the order schemes are offered to users.
    schemes: Vec<Scheme>,
    /// Lowercased id or alias -> position in `schemes`.
    index: HashMap<String, usize>,
}

impl SchemeRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a registry from scheme TOML, requiring at least one Brahmic
    /// and one Roman scheme.
    pub fn from_toml(toml_str: &str) -> Result<Self, SchemeConfigError> {
        let mut registry = Self::empty();
        for def in parse_schemes_toml(toml_str)? {
            registry.register(Scheme::from_def(def)?)?;
        }
        for kind in [SchemeKind::Brahmic, SchemeKind::Roman] {
            if !registry.schemes.iter().any(|s| s.kind() == kind) {
                return Err(SchemeConfigError::MissingKind(kind));
            }
        }
        Ok(registry)
    }

    /// The built-in schemes.
    pub fn builtin() -> Self {
        match Self::from_toml(DEFAULT_TOML) {
            Ok(registry) => registry,
            // build.rs and the tests below keep the embedded file valid
            Err(e) => unreachable!("embedded scheme TOML is invalid: {e}"),
        }
    }

    /// Set custom scheme TOML before first `global()` call.
    pub fn init_custom(toml_content: String) -> Result<(), SchemeConfigError> {
        // Validate eagerly
        Self::from_toml(&toml_content)?;
        CUSTOM_TOML
            .set(toml_content)
            .map_err(|_| SchemeConfigError::AlreadyInitialized)
    }

    /// Get or initialize the process-wide registry.
    pub fn global() -> &'static SchemeRegistry {
        static INSTANCE: OnceLock<SchemeRegistry> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            CUSTOM_TOML
                .get()
                .and_then(|s| Self::from_toml(s).ok())
                .unwrap_or_else(Self::builtin)
        })
    }

    /// Add `scheme`, replacing any scheme with the same id.
    ///
    /// The scheme must be positionally aligned with those already
    /// registered, and its aliases must not name another scheme.
    pub fn register(&mut self, scheme: Scheme) -> Result<(), SchemeConfigError> {
        if let Some(first) = self.schemes.first() {
            for ((group, expected), (_, found)) in
                first.alphabet().shape().into_iter().zip(scheme.alphabet().shape())
            {
                // Roman vowel marks are derived, so they align by construction.
                if group == Group::VowelMark {
                    continue;
                }
                if expected != found {
                    return Err(SchemeConfigError::Misaligned {
                        scheme: scheme.id().to_string(),
                        group: group.name(),
                        expected,
                        found,
                    });
                }
            }
        }

        let replaced = self.index.get(scheme.id()).copied();
        for name in std::iter::once(scheme.id()).chain(scheme.aliases().iter().map(String::as_str))
        {
            match self.index.get(name) {
                Some(&pos) if Some(pos) != replaced => {
                    return Err(SchemeConfigError::DuplicateId(name.to_string()));
                }
                _ => {}
            }
        }

        let pos = match replaced {
            Some(pos) => {
                debug!(scheme = scheme.id(), "replacing registered scheme");
                self.index.retain(|_, p| *p != pos);
                self.schemes[pos] = scheme;
                pos
            }
            None => {
                self.schemes.push(scheme);
                self.schemes.len() - 1
            }
        };
        let scheme = &self.schemes[pos];
        self.index.insert(scheme.id().to_string(), pos);
        for alias in scheme.aliases() {
            self.index.insert(alias.clone(), pos);
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Scheme> {
        let key = id.trim().to_ascii_lowercase();
        self.index.get(&key).map(|&pos| &self.schemes[pos])
    }

    pub fn resolve(&self, id: &str) -> Result<&Scheme, UnknownSchemeError> {
        self.get(id)
            .ok_or_else(|| UnknownSchemeError(id.trim().to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// The canonical id for `id`: alias-resolved when registered, otherwise
    /// just trimmed and lowercased.
    pub fn canonical_id(&self, id: &str) -> String {
        match self.get(id) {
            Some(scheme) => scheme.id().to_string(),
            None => id.trim().to_ascii_lowercase(),
        }
    }

    /// The Brahmic scheme whose id, alias or script code equals `subtag`.
    pub fn brahmic_script(&self, subtag: &str) -> Option<&Scheme> {
        self.schemes
            .iter()
            .filter(|s| s.is_brahmic())
            .find(|s| s.matches_script_subtag(subtag))
    }

    /// Schemes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Scheme> {
        self.schemes.iter()
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}
