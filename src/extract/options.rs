//! Extraction options and configuration.

/// Options for extracting plain text from letter markup.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Local name of the paragraph element whose text is kept
    pub paragraph_element: String,

    /// Local names of elements whose content is skipped entirely
    pub excluded_elements: Vec<String>,

    /// Whether to normalize extracted text to Unicode NFC
    pub normalize_unicode: bool,

    /// Whether to keep the original markup on the document
    pub keep_markup: bool,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip malformed documents).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set the paragraph element name.
    pub fn with_paragraph_element(mut self, name: impl Into<String>) -> Self {
        self.paragraph_element = name.into();
        self
    }

    /// Add an element whose content should be skipped.
    pub fn exclude_element(mut self, name: impl Into<String>) -> Self {
        self.excluded_elements.push(name.into());
        self
    }

    /// Enable or disable NFC normalization.
    pub fn with_unicode_normalization(mut self, enabled: bool) -> Self {
        self.normalize_unicode = enabled;
        self
    }

    /// Enable or disable keeping the raw markup.
    pub fn with_markup(mut self, keep: bool) -> Self {
        self.keep_markup = keep;
        self
    }

    pub(crate) fn is_excluded(&self, local_name: &[u8]) -> bool {
        self.excluded_elements
            .iter()
            .any(|e| e.as_bytes() == local_name)
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            paragraph_element: "p".to_string(),
            excluded_elements: vec!["address".to_string(), "addrLine".to_string()],
            normalize_unicode: true,
            keep_markup: true,
        }
    }
}

/// Error handling mode for batch stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    #[default]
    Strict,
    /// Log the failing item, skip it and continue
    Lenient,
}
