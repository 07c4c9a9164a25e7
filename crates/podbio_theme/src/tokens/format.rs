//! Output formatting by token category

use crate::tokens::TokenLeaf;

/// Output category of a token, derived from its path
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    /// Unitless scale values rendered in `rem`
    Rem,
    /// Motion durations rendered in `ms`
    Milliseconds,
    /// Everything else, passed through
    Plain,
}

impl Category {
    /// Classify a dotted path (relative to its layer).
    pub fn for_path(path: &str) -> Self {
        let mut segments = path.split('.');
        match (segments.next(), segments.next()) {
            (Some("space" | "spacing"), _) => Self::Rem,
            (Some("typography"), Some("scale")) => Self::Rem,
            (Some("motion"), Some("duration")) => Self::Milliseconds,
            _ => Self::Plain,
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Rem => "rem",
            Self::Milliseconds => "ms",
            Self::Plain => "",
        }
    }

    /// Render a literal leaf. Only numbers receive a unit suffix.
    pub fn format(self, leaf: &TokenLeaf) -> String {
        match leaf {
            TokenLeaf::Number(n) => format!("{}{}", format_number(*n), self.unit()),
            TokenLeaf::Text(s) => s.clone(),
        }
    }
}

/// Shortest decimal form of a number (`1`, `0.25`, `1.125`).
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        // avoid "-0"
        return "0".to_string();
    }
    n.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_and_type_scale_get_rem() {
        assert_eq!(Category::for_path("space.scale.md"), Category::Rem);
        assert_eq!(Category::for_path("spacing.inset"), Category::Rem);
        assert_eq!(Category::for_path("typography.scale.lg"), Category::Rem);
        assert_eq!(
            Category::Rem.format(&TokenLeaf::Number(0.25)),
            "0.25rem"
        );
    }

    #[test]
    fn durations_get_ms() {
        assert_eq!(
            Category::for_path("motion.duration.fast"),
            Category::Milliseconds
        );
        assert_eq!(
            Category::Milliseconds.format(&TokenLeaf::Number(150.0)),
            "150ms"
        );
    }

    #[test]
    fn other_categories_pass_through() {
        assert_eq!(Category::for_path("typography.weight.bold"), Category::Plain);
        assert_eq!(Category::for_path("motion.easing.standard"), Category::Plain);
        assert_eq!(Category::Plain.format(&TokenLeaf::Number(700.0)), "700");
        assert_eq!(
            Category::Rem.format(&TokenLeaf::Text("12px".into())),
            "12px"
        );
    }
}
