use std::collections::BTreeSet;
use std::str::FromStr;

use itertools::Itertools;

/// Rendering of the tags column.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TagFormat {
    /// Space-separated Anki tags. Whitespace inside a tag becomes `_`.
    #[default]
    Anki,
    /// `<ul class="tags"><li>..</li></ul>`, for use in a card template.
    Html,
}

impl TagFormat {
    pub fn render(&self, tags: &BTreeSet<&str>) -> String {
        if tags.is_empty() {
            return String::new();
        }

        match self {
            TagFormat::Anki => tags
                .iter()
                .map(|tag| tag.split_whitespace().join("_"))
                .join(" "),
            TagFormat::Html => format!(
                r#"<ul class="tags"><li>{}</li></ul>"#,
                tags.iter().map(|tag| escape_html(tag)).join("</li><li>")
            ),
        }
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl FromStr for TagFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anki" => Ok(TagFormat::Anki),
            "html" => Ok(TagFormat::Html),
            other => Err(format!("unknown tag format {other:?} (expected anki or html)")),
        }
    }
}
