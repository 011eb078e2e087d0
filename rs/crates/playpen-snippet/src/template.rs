//! Built-in starter templates.

use crate::Snippet;

/// A named preset offered in the template picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub name: &'static str,
    pub label: &'static str,
    pub html: &'static str,
    pub css: &'static str,
    pub js: &'static str,
}

impl Template {
    pub fn to_snippet(&self) -> Snippet {
        Snippet::new(self.html, self.css, self.js)
    }
}

/// Name of the template a fresh session starts from.
pub const DEFAULT_TEMPLATE: &str = "basic";

pub const TEMPLATES: &[Template] = &[
    Template {
        name: "basic",
        label: "Basic Template",
        html: "<div class='centered'>Hello World</div>",
        css: "body { background: #f5f5f5; } .centered { font-size: 2em; text-align: center; margin-top: 20vh; }",
        js: "console.log('Hello World');",
    },
    Template {
        name: "dark",
        label: "Dark Template",
        html: "<div class='container'>Dark Theme</div>",
        css: "body { background: #121212; color: #fff; } .container { padding: 20px; font-family: sans-serif; }",
        js: "document.body.style.fontFamily = 'monospace';",
    },
];

pub fn find_template(name: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.name == name)
}

/// The template a fresh session starts from.
pub fn default_template() -> &'static Template {
    // DEFAULT_TEMPLATE is always the first entry
    &TEMPLATES[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_basic() {
        assert_eq!(default_template().name, DEFAULT_TEMPLATE);
        assert_eq!(find_template(DEFAULT_TEMPLATE), Some(default_template()));
    }

    #[test]
    fn test_unknown_template() {
        assert!(find_template("neon").is_none());
    }

    #[test]
    fn test_names_are_unique() {
        for (i, t) in TEMPLATES.iter().enumerate() {
            assert!(TEMPLATES[i + 1..].iter().all(|o| o.name != t.name));
        }
    }
}
