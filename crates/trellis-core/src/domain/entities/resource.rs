//! Loaded resources and their text encodings.
//!
//! A [`Resource`] is the byte content a `ResourceLoader` produced for one
//! location. Decoding into text happens here, in the domain, so every
//! factory sees the same charset rules.

use std::fmt;
use std::sync::Arc;

use crate::domain::error::DomainError;

/// Bytes read from one resolved location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    location: String,
    description: String,
    content: Arc<[u8]>,
}

impl Resource {
    pub fn new(
        location: impl Into<String>,
        description: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        let content: Vec<u8> = content.into();
        Self {
            location: location.into(),
            description: description.into(),
            content: Arc::from(content),
        }
    }

    /// The (placeholder-resolved) location this resource was loaded from.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Human-readable description, e.g. `file [/etc/app.properties]`.
    ///
    /// Also used as the property source name when a descriptor has none.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Lowercased extension of the location, if any.
    pub fn extension(&self) -> Option<String> {
        let file = self.location.rsplit(['/', '\\', ':']).next()?;
        let (stem, ext) = file.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// Supported text encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Charset {
    #[default]
    Utf8,
    Latin1,
    Ascii,
}

impl Charset {
    /// Parse an encoding label such as `UTF-8`, `iso-8859-1` or `US-ASCII`.
    pub fn from_label(label: &str) -> Result<Self, DomainError> {
        let normalized: String = label
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_uppercase();

        match normalized.as_str() {
            "UTF8" => Ok(Self::Utf8),
            "ISO88591" | "LATIN1" => Ok(Self::Latin1),
            "USASCII" | "ASCII" => Ok(Self::Ascii),
            _ => Err(DomainError::UnsupportedEncoding {
                encoding: label.to_string(),
            }),
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Latin1 => "ISO-8859-1",
            Self::Ascii => "US-ASCII",
        }
    }

    /// Decode `bytes` read from `resource`.
    pub fn decode(&self, bytes: &[u8], resource: &str) -> Result<String, DomainError> {
        match self {
            Self::Utf8 => {
                let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                String::from_utf8(bytes.to_vec()).map_err(|e| DomainError::MalformedResource {
                    resource: resource.to_string(),
                    encoding: self.label().into(),
                    reason: e.to_string(),
                })
            }
            // Every byte maps to the code point of the same value.
            Self::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            Self::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
                Some(offset) => Err(DomainError::MalformedResource {
                    resource: resource.to_string(),
                    encoding: self.label().into(),
                    reason: format!("non-ASCII byte at offset {offset}"),
                }),
                None => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            },
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A resource paired with the encoding its descriptor asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedResource {
    resource: Resource,
    charset: Option<Charset>,
}

impl EncodedResource {
    pub fn new(resource: Resource, encoding: Option<&str>) -> Result<Self, DomainError> {
        let charset = encoding.map(Charset::from_label).transpose()?;
        Ok(Self { resource, charset })
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// The explicit charset, or `None` when the default (UTF-8) applies.
    pub fn charset(&self) -> Option<Charset> {
        self.charset
    }

    pub fn read_to_string(&self) -> Result<String, DomainError> {
        self.charset
            .unwrap_or_default()
            .decode(self.resource.content(), self.resource.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_labels_are_lenient() {
        assert_eq!(Charset::from_label("utf-8").unwrap(), Charset::Utf8);
        assert_eq!(Charset::from_label("ISO-8859-1").unwrap(), Charset::Latin1);
        assert_eq!(Charset::from_label("us_ascii").unwrap(), Charset::Ascii);
        assert!(Charset::from_label("shift-jis").is_err());
    }

    #[test]
    fn utf8_strips_bom() {
        let resource = Resource::new("a.properties", "memory [a]", b"\xEF\xBB\xBFk=v".to_vec());
        let encoded = EncodedResource::new(resource, None).unwrap();
        assert_eq!(encoded.read_to_string().unwrap(), "k=v");
    }

    #[test]
    fn latin1_maps_high_bytes() {
        let resource = Resource::new("a.properties", "memory [a]", vec![b'k', b'=', 0xE9]);
        let encoded = EncodedResource::new(resource, Some("ISO-8859-1")).unwrap();
        assert_eq!(encoded.read_to_string().unwrap(), "k=é");
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let resource = Resource::new("a.properties", "memory [a]", vec![0xFF, 0xFE]);
        let encoded = EncodedResource::new(resource, None).unwrap();
        assert!(matches!(
            encoded.read_to_string(),
            Err(DomainError::MalformedResource { .. })
        ));
    }

    #[test]
    fn ascii_rejects_high_bytes() {
        let resource = Resource::new("a", "memory [a]", vec![b'a', 0xC3]);
        let encoded = EncodedResource::new(resource, Some("ASCII")).unwrap();
        assert!(encoded.read_to_string().is_err());
    }

    #[test]
    fn extension_detection() {
        let r = |loc: &str| Resource::new(loc, loc, Vec::new());
        assert_eq!(r("classpath:conf/app.TOML").extension().as_deref(), Some("toml"));
        assert_eq!(r("file:/etc/app.properties").extension().as_deref(), Some("properties"));
        assert_eq!(r("file:/etc/.hidden").extension(), None);
        assert_eq!(r("memory").extension(), None);
    }
}
