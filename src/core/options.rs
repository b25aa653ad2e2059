//! Render options

use crate::utils::color::normalize_shade;

/// Default fill of header cells
pub const DEFAULT_HEADER_SHADE: &str = "#EEEEEE";

/// Options that control how tables are rendered into a document
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Base URL joined with relative link targets
    /// Default: None
    pub base_url: Option<String>,

    /// Background of cells flagged as headers; `None` disables shading
    /// Default: `#EEEEEE`
    pub header_shade: Option<String>,

    /// Table style name applied to every native table
    /// Default: `Table Grid`
    pub table_style: String,

    /// Force a landscape page even for variants that default to portrait
    /// Default: false
    pub landscape: bool,

    /// Core property title of newly created documents
    /// Default: None
    pub title: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            header_shade: Some(DEFAULT_HEADER_SHADE.to_string()),
            table_style: "Table Grid".to_string(),
            landscape: false,
            title: None,
        }
    }
}

impl RenderOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for quick previews: no shading, no link rewriting
    pub fn preview() -> Self {
        Self {
            header_shade: None,
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_header_shade(mut self, shade: Option<&str>) -> Self {
        self.header_shade = shade.map(str::to_string);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_landscape(mut self, landscape: bool) -> Self {
        self.landscape = landscape;
        self
    }

    /// Header shade as `RRGGBB`, if set and valid
    pub fn header_fill(&self) -> Option<String> {
        let shade = self.header_shade.as_deref()?;
        let fill = normalize_shade(shade);
        if fill.is_none() {
            log::warn!("ignoring invalid header shade {:?}", shade);
        }
        fill
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = RenderOptions::default();
        assert_eq!(opts.base_url, None);
        assert_eq!(opts.header_fill().as_deref(), Some("EEEEEE"));
        assert_eq!(opts.table_style, "Table Grid");
        assert!(!opts.landscape);
    }

    #[test]
    fn test_preview_preset() {
        let opts = RenderOptions::preview();
        assert_eq!(opts.header_fill(), None);
    }

    #[test]
    fn test_builders() {
        let opts = RenderOptions::new()
            .with_base_url("https://hawc.example.org")
            .with_header_shade(Some("#ddd"))
            .with_title("Table 1")
            .with_landscape(true);
        assert_eq!(opts.base_url.as_deref(), Some("https://hawc.example.org"));
        assert_eq!(opts.header_fill().as_deref(), Some("DDDDDD"));
        assert_eq!(opts.title.as_deref(), Some("Table 1"));
        assert!(opts.landscape);
    }

    #[test]
    fn test_invalid_header_shade_ignored() {
        let opts = RenderOptions::new().with_header_shade(Some("grey"));
        assert_eq!(opts.header_fill(), None);
    }
}
