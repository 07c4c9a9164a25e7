//! Color-shape validation shared by every place that accepts a color.
//!
//! Accepted shapes: hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`), the
//! `rgb()`/`rgba()`/`hsl()`/`hsla()` functions, CSS gradients, `var(--name)`
//! references, and `transparent`. `var(--name)` is kept as an opaque literal;
//! resolving it is left to the renderer.

const COLOR_FUNCTIONS: [&str; 4] = ["rgb", "rgba", "hsl", "hsla"];
const GRADIENT_FUNCTIONS: [&str; 6] = [
    "linear-gradient",
    "radial-gradient",
    "conic-gradient",
    "repeating-linear-gradient",
    "repeating-radial-gradient",
    "repeating-conic-gradient",
];

/// Whether `value` has the shape of a color, gradient, or CSS variable reference.
pub fn is_valid_color(value: &str) -> bool {
    let value = value.trim();
    if value.eq_ignore_ascii_case("transparent") {
        return true;
    }
    if let Some(hex) = value.strip_prefix('#') {
        return is_hex_color(hex);
    }
    if let Some(inner) = function_args(value, "var") {
        return is_css_variable(inner);
    }
    if let Some(name) = function_name(value) {
        let lower = name.to_ascii_lowercase();
        if COLOR_FUNCTIONS.contains(&lower.as_str()) {
            return function_args(value, name).is_some_and(is_color_args);
        }
        if GRADIENT_FUNCTIONS.contains(&lower.as_str()) {
            return function_args(value, name).is_some_and(|args| !args.trim().is_empty());
        }
    }
    false
}

/// Whether `value` is a CSS variable reference (`var(--name)`).
pub fn is_css_variable_ref(value: &str) -> bool {
    function_args(value.trim(), "var").is_some_and(is_css_variable)
}

fn is_hex_color(hex: &str) -> bool {
    matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

fn is_css_variable(inner: &str) -> bool {
    // `var(--name)` or `var(--name, fallback)`
    let name = inner.split(',').next().unwrap_or("").trim();
    name.len() > 2
        && name.starts_with("--")
        && name[2..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn is_color_args(args: &str) -> bool {
    let parts: Vec<&str> = args
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    (3..=4).contains(&parts.len())
        && parts.iter().all(|p| {
            let number = p.trim_end_matches('%').trim_end_matches("deg");
            number.parse::<f64>().is_ok()
        })
}

fn function_name(value: &str) -> Option<&str> {
    let open = value.find('(')?;
    let name = &value[..open];
    (!name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic() || c == '-')).then_some(name)
}

fn function_args<'a>(value: &'a str, name: &str) -> Option<&'a str> {
    let rest = value.get(..name.len())?;
    if !rest.eq_ignore_ascii_case(name) {
        return None;
    }
    value[name.len()..]
        .strip_prefix('(')?
        .strip_suffix(')')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        for ok in ["#fff", "#ffff", "#0066ff", "#0066ffcc", "#ABCDEF"] {
            assert!(is_valid_color(ok), "{ok}");
        }
        for bad in ["#ff", "#12345", "#gggggg", "0066ff", "#"] {
            assert!(!is_valid_color(bad), "{bad}");
        }
    }

    #[test]
    fn functional_colors() {
        assert!(is_valid_color("rgb(0, 102, 255)"));
        assert!(is_valid_color("rgba(15, 23, 42, 0.15)"));
        assert!(is_valid_color("hsl(210deg 100% 50%)"));
        assert!(is_valid_color("hsla(210, 100%, 50%, 0.5)"));
        assert!(!is_valid_color("rgb(0, 102)"));
        assert!(!is_valid_color("rgb(red, green, blue)"));
    }

    #[test]
    fn gradients() {
        assert!(is_valid_color(
            "linear-gradient(135deg, #667eea 0%, #764ba2 100%)"
        ));
        assert!(is_valid_color("radial-gradient(circle, #fff, #000)"));
        assert!(!is_valid_color("linear-gradient()"));
    }

    #[test]
    fn css_variables_are_opaque_but_valid() {
        assert!(is_valid_color("var(--brand-primary)"));
        assert!(is_valid_color("var(--brand, #fff)"));
        assert!(is_css_variable_ref("var(--x)"));
        assert!(!is_valid_color("var(brand)"));
        assert!(!is_valid_color("var(--)"));
    }

    #[test]
    fn other_strings_are_rejected() {
        assert!(is_valid_color("transparent"));
        assert!(!is_valid_color("red"));
        assert!(!is_valid_color("url(javascript:alert(1))"));
        assert!(!is_valid_color(""));
        assert!(!is_valid_color("color.primary"));
    }
}
