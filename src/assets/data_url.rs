use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::foundation::error::{StudioError, StudioResult};

/// A base64 `data:` URL holding an embeddable raster (`data:image/png;base64,...`).
#[derive(Clone, PartialEq, Eq)]
pub struct DataUrl {
    mime: String,
    bytes: Vec<u8>,
}

impl DataUrl {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    pub fn png(bytes: Vec<u8>) -> Self {
        Self::new("image/png", bytes)
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn parse(s: &str) -> StudioResult<Self> {
        let rest = s
            .strip_prefix("data:")
            .ok_or_else(|| StudioError::validation("data url must start with \"data:\""))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| StudioError::validation("data url is missing the ',' separator"))?;
        let mime = header.strip_suffix(";base64").ok_or_else(|| {
            StudioError::validation("only base64-encoded data urls are supported")
        })?;
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| StudioError::validation(format!("invalid base64 payload: {e}")))?;
        Ok(Self::new(mime, bytes))
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

// Payloads can be megabytes; keep debug output to the header.
impl fmt::Debug for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataUrl")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl FromStr for DataUrl {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// What a design entry displays: a predefined gallery asset or an embedded raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageRef {
    /// Path of a predefined design, e.g. `/vintage-logo.jpg`.
    Gallery(String),
    /// Uploaded or generated image carried inline.
    Data(DataUrl),
}

impl ImageRef {
    pub fn as_data(&self) -> Option<&DataUrl> {
        match self {
            ImageRef::Data(d) => Some(d),
            ImageRef::Gallery(_) => None,
        }
    }

    /// Value usable as an SVG/HTML `href`.
    pub fn to_href(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageRef::Gallery(path) => f.write_str(path),
            ImageRef::Data(d) => fmt::Display::fmt(d, f),
        }
    }
}

impl From<DataUrl> for ImageRef {
    fn from(d: DataUrl) -> Self {
        ImageRef::Data(d)
    }
}

impl FromStr for ImageRef {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("data:") {
            return DataUrl::parse(s).map(ImageRef::Data);
        }
        if s.trim().is_empty() {
            return Err(StudioError::validation("image reference must not be empty"));
        }
        Ok(ImageRef::Gallery(s.to_owned()))
    }
}

impl serde::Serialize for ImageRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for ImageRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
