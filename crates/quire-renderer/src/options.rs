use pulldown_cmark::Options;
use serde::{Deserialize, Serialize};

/// Knobs for markdown to document conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConvertOptions {
    /// Parse `~~text~~` as strikethrough.
    pub strikethrough: bool,
    /// Parse `- [ ] item` task markers. The marker is kept as literal text.
    pub tasklists: bool,
    /// Stored on every code block as its highlighting theme.
    pub code_theme: Option<String>,
    /// Inserted between the paragraphs of a multi-paragraph block quote.
    pub quote_line_separator: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            strikethrough: true,
            tasklists: true,
            code_theme: None,
            quote_line_separator: "\n".to_string(),
        }
    }
}

impl ConvertOptions {
    pub fn with_strikethrough(mut self, enabled: bool) -> Self {
        self.strikethrough = enabled;
        self
    }

    pub fn with_tasklists(mut self, enabled: bool) -> Self {
        self.tasklists = enabled;
        self
    }

    pub fn with_code_theme(mut self, theme: impl Into<String>) -> Self {
        self.code_theme = Some(theme.into());
        self
    }

    pub fn with_quote_line_separator(mut self, separator: impl Into<String>) -> Self {
        self.quote_line_separator = separator.into();
        self
    }

    pub(crate) fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        if self.strikethrough {
            options |= Options::ENABLE_STRIKETHROUGH;
        }
        if self.tasklists {
            options |= Options::ENABLE_TASKLISTS;
        }
        options
    }
}
