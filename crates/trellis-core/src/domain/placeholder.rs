//! `${...}` placeholder substitution.
//!
//! Supports defaults (`${key:default}`), placeholders nested inside keys and
//! defaults (`${db.${env}.url}`), recursive resolution of substituted values
//! and detection of circular references.

use std::collections::HashSet;

use crate::domain::error::DomainError;

/// Replaces `${key}` placeholders using a caller-supplied lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderResolver {
    prefix: String,
    suffix: String,
    value_separator: Option<String>,
    ignore_unresolvable: bool,
}

impl PlaceholderResolver {
    /// Standard `${` / `}` / `:` syntax.
    ///
    /// Strict resolvers fail on unresolvable placeholders; lenient ones
    /// leave them in place.
    pub fn new(ignore_unresolvable: bool) -> Self {
        Self {
            prefix: "${".into(),
            suffix: "}".into(),
            value_separator: Some(":".into()),
            ignore_unresolvable,
        }
    }

    pub fn strict() -> Self {
        Self::new(false)
    }

    pub fn lenient() -> Self {
        Self::new(true)
    }

    pub fn with_value_separator(mut self, separator: Option<&str>) -> Self {
        self.value_separator = separator.map(str::to_owned);
        self
    }

    /// Substitute every placeholder in `value`.
    pub fn replace_placeholders<F>(&self, value: &str, resolve: F) -> Result<String, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.parse(value, &resolve, &mut HashSet::new())
    }

    fn parse(
        &self,
        value: &str,
        resolve: &dyn Fn(&str) -> Option<String>,
        visited: &mut HashSet<String>,
    ) -> Result<String, DomainError> {
        let mut result = value.to_owned();
        let mut search_from = 0;

        while let Some(offset) = result[search_from..].find(&self.prefix) {
            let start = search_from + offset;
            let Some(end) = self.find_placeholder_end(&result, start) else {
                break;
            };

            let raw = result[start + self.prefix.len()..end].to_owned();
            if !visited.insert(raw.clone()) {
                return Err(DomainError::CircularPlaceholder { placeholder: raw });
            }

            // Placeholders may appear inside the key itself.
            let key = self.parse(&raw, resolve, visited)?;
            let replacement = resolve(&key).or_else(|| self.resolve_default(&key, resolve));

            match replacement {
                Some(found) => {
                    let found = self.parse(&found, resolve, visited)?;
                    result.replace_range(start..end + self.suffix.len(), &found);
                    search_from = start + found.len();
                }
                None if self.ignore_unresolvable => {
                    search_from = end + self.suffix.len();
                }
                None => {
                    return Err(DomainError::UnresolvablePlaceholder {
                        placeholder: key,
                        value: value.to_owned(),
                    });
                }
            }

            visited.remove(&raw);
        }

        Ok(result)
    }

    fn resolve_default(
        &self,
        key: &str,
        resolve: &dyn Fn(&str) -> Option<String>,
    ) -> Option<String> {
        let separator = self.value_separator.as_deref()?;
        let (actual, default) = key.split_once(separator)?;
        resolve(actual).or_else(|| Some(default.to_owned()))
    }

    /// Byte index of the suffix closing the placeholder opened at `start`.
    fn find_placeholder_end(&self, buf: &str, start: usize) -> Option<usize> {
        let bytes = buf.as_bytes();
        let prefix = self.prefix.as_bytes();
        let suffix = self.suffix.as_bytes();
        let mut index = start + prefix.len();
        let mut nested = 0usize;

        while index < bytes.len() {
            if bytes[index..].starts_with(suffix) {
                if nested == 0 {
                    return Some(index);
                }
                nested -= 1;
                index += suffix.len();
            } else if bytes[index..].starts_with(prefix) {
                nested += 1;
                index += prefix.len();
            } else {
                index += 1;
            }
        }

        None
    }
}

impl Default for PlaceholderResolver {
    fn default() -> Self {
        Self::strict()
    }
}
