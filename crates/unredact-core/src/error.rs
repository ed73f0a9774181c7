//! Error and warning types shared by every unredact crate.
//!
//! [`PdfError`] stops processing of the current document. [`ExtractWarning`]
//! records a non-fatal problem found while interpreting a page; extraction
//! continues on a best-effort basis. [`ExtractOptions`] carries the limits and
//! switches that control extraction.

use std::fmt;

use crate::unicode_norm::UnicodeNorm;

/// Fatal error while reading or writing a PDF.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfError {
    /// Error parsing PDF structure or syntax.
    ParseError(String),
    /// I/O error reading or writing PDF data.
    IoError(String),
    /// Error resolving font or encoding information.
    FontError(String),
    /// Error during content stream interpretation.
    InterpreterError(String),
    /// A configured resource limit was exceeded.
    ResourceLimitExceeded {
        /// Name of the limit (e.g. "max_input_bytes").
        limit_name: String,
        /// The configured limit value.
        limit_value: usize,
        /// The value that exceeded it.
        actual_value: usize,
    },
    /// The PDF is encrypted.
    PasswordRequired,
    /// Error while building or saving the output document.
    WriteError(String),
    /// Anything else.
    Other(String),
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::ParseError(msg) => write!(f, "parse error: {msg}"),
            PdfError::IoError(msg) => write!(f, "I/O error: {msg}"),
            PdfError::FontError(msg) => write!(f, "font error: {msg}"),
            PdfError::InterpreterError(msg) => write!(f, "interpreter error: {msg}"),
            PdfError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
            } => write!(
                f,
                "resource limit exceeded: {limit_name} (limit: {limit_value}, actual: {actual_value})"
            ),
            PdfError::PasswordRequired => write!(f, "PDF is encrypted and requires a password"),
            PdfError::WriteError(msg) => write!(f, "write error: {msg}"),
            PdfError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PdfError {}

impl From<std::io::Error> for PdfError {
    fn from(err: std::io::Error) -> Self {
        PdfError::IoError(err.to_string())
    }
}

/// Category of a non-fatal extraction problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExtractWarningCode {
    /// A font resource referenced by `Tf` could not be found.
    MissingFont,
    /// An object had an unexpected type or shape.
    MalformedObject,
    /// Form XObject nesting hit `max_recursion_depth`.
    ResourceLimitReached,
    /// Uncategorized.
    Other,
}

impl ExtractWarningCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractWarningCode::MissingFont => "MISSING_FONT",
            ExtractWarningCode::MalformedObject => "MALFORMED_OBJECT",
            ExtractWarningCode::ResourceLimitReached => "RESOURCE_LIMIT_REACHED",
            ExtractWarningCode::Other => "OTHER",
        }
    }
}

impl fmt::Display for ExtractWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal problem found during extraction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractWarning {
    pub code: ExtractWarningCode,
    pub description: String,
    /// 0-based page index, when known.
    pub page: Option<usize>,
    /// Font resource name, when the warning concerns a font.
    pub font_name: Option<String>,
}

impl ExtractWarning {
    pub fn new(code: ExtractWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            page: None,
            font_name: None,
        }
    }

    /// Attach a page index (builder style).
    pub fn on_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    /// Attach a font name (builder style).
    pub fn with_font(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = Some(font_name.into());
        self
    }
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(page) = self.page {
            write!(f, " (page {page})")?;
        }
        if let Some(ref font_name) = self.font_name {
            write!(f, " [font {font_name}]")?;
        }
        Ok(())
    }
}

/// Options controlling extraction behavior and resource limits.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Maximum nesting depth for Form XObjects (default: 10).
    pub max_recursion_depth: usize,
    /// Collect [`ExtractWarning`]s while interpreting pages (default: true).
    pub collect_warnings: bool,
    /// Unicode normalization applied to char text (default: none).
    pub unicode_norm: UnicodeNorm,
    /// Reject inputs larger than this many bytes (default: 256 MiB).
    pub max_input_bytes: Option<usize>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_recursion_depth: 10,
            collect_warnings: true,
            unicode_norm: UnicodeNorm::None,
            max_input_bytes: Some(256 * 1024 * 1024),
        }
    }
}

impl ExtractOptions {
    /// Check `len` against `max_input_bytes`.
    pub fn check_input_size(&self, len: usize) -> Result<(), PdfError> {
        match self.max_input_bytes {
            Some(limit) if len > limit => Err(PdfError::ResourceLimitExceeded {
                limit_name: "max_input_bytes".to_string(),
                limit_value: limit,
                actual_value: len,
            }),
            _ => Ok(()),
        }
    }
}
