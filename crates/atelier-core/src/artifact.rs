use base64::{Engine, engine::general_purpose::STANDARD};

/// Final output of a generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// Raw bytes as returned by the provider
    Binary { mime: String, bytes: Vec<u8> },
    /// Bytes the provider already delivered base64-encoded
    Encoded { mime: String, base64: String },
    /// Generated text
    Text(String),
}

impl Artifact {
    pub fn binary(mime: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::Binary {
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    pub fn encoded(mime: impl Into<String>, base64: impl Into<String>) -> Self {
        Self::Encoded {
            mime: mime.into(),
            base64: base64.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// MIME type of the payload
    pub fn mime(&self) -> &str {
        match self {
            Self::Binary { mime, .. } | Self::Encoded { mime, .. } => mime,
            Self::Text(_) => "text/plain",
        }
    }

    /// Whether the artifact carries no content at all
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Binary { bytes, .. } => bytes.is_empty(),
            Self::Encoded { base64, .. } => base64.trim().is_empty(),
            Self::Text(text) => text.trim().is_empty(),
        }
    }

    /// Text content, if this is a text artifact
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Render as a `data:<mime>;base64,<payload>` URI
    ///
    /// Pre-encoded payloads are embedded verbatim.
    pub fn to_data_uri(&self) -> String {
        match self {
            Self::Binary { mime, bytes } => format!("data:{mime};base64,{}", STANDARD.encode(bytes)),
            Self::Encoded { mime, base64 } => format!("data:{mime};base64,{base64}"),
            Self::Text(text) => format!("data:text/plain;base64,{}", STANDARD.encode(text.as_bytes())),
        }
    }
}
