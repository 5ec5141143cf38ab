use ratatui::style::Color;
use serde::Deserialize;

/// Semantic color slots for the revdiff UI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    pub accent: Color,
    pub text: Color,
    pub text_muted: Color,
    pub surface: Color,
    pub selection_bg: Color,

    pub diff_add_fg: Color,
    pub diff_del_fg: Color,
    pub diff_context_fg: Color,
    pub diff_hunk_header_fg: Color,
    pub current_hunk_bg: Color,

    pub success: Color,
    pub error: Color,
    pub warning: Color,
}

pub const THEME_NAMES: &[&str] = &["one-dark", "github-dark", "dracula"];

impl Theme {
    pub fn from_name(name: &str) -> Self {
        if !THEME_NAMES.contains(&name) {
            tracing::warn!(theme = name, "unknown theme, using one-dark");
        }
        match name {
            "github-dark" => github_dark(),
            "dracula" => dracula(),
            _ => one_dark(),
        }
    }
}

pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// `[colors]` table of the config file; every slot is an optional hex string.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ThemeOverrides {
    pub accent: Option<String>,
    pub text: Option<String>,
    pub text_muted: Option<String>,
    pub surface: Option<String>,
    pub selection_bg: Option<String>,
    pub diff_add_fg: Option<String>,
    pub diff_del_fg: Option<String>,
    pub diff_context_fg: Option<String>,
    pub diff_hunk_header_fg: Option<String>,
    pub current_hunk_bg: Option<String>,
    pub success: Option<String>,
    pub error: Option<String>,
    pub warning: Option<String>,
}

pub fn apply_overrides(theme: &mut Theme, overrides: &ThemeOverrides) {
    macro_rules! apply {
        ($($field:ident),* $(,)?) => {
            $(
                if let Some(c) = overrides.$field.as_deref().and_then(parse_hex_color) {
                    theme.$field = c;
                }
            )*
        };
    }
    apply!(
        accent,
        text,
        text_muted,
        surface,
        selection_bg,
        diff_add_fg,
        diff_del_fg,
        diff_context_fg,
        diff_hunk_header_fg,
        current_hunk_bg,
        success,
        error,
        warning,
    );
}

// ── Built-in themes ──────────────────────────────────────────────

fn one_dark() -> Theme {
    Theme {
        name: "one-dark".to_string(),
        accent: Color::Cyan,
        text: Color::White,
        text_muted: Color::DarkGray,
        surface: Color::Rgb(30, 30, 30),
        selection_bg: Color::Rgb(40, 40, 50),
        diff_add_fg: Color::Green,
        diff_del_fg: Color::Red,
        diff_context_fg: Color::Rgb(171, 178, 191),
        diff_hunk_header_fg: Color::Magenta,
        current_hunk_bg: Color::Rgb(35, 35, 45),
        success: Color::Green,
        error: Color::Red,
        warning: Color::Yellow,
    }
}

fn github_dark() -> Theme {
    Theme {
        name: "github-dark".to_string(),
        accent: Color::Rgb(88, 166, 255),
        text: Color::Rgb(230, 237, 243),
        text_muted: Color::Rgb(125, 133, 144),
        surface: Color::Rgb(22, 27, 34),
        selection_bg: Color::Rgb(38, 50, 72),
        diff_add_fg: Color::Rgb(63, 185, 80),
        diff_del_fg: Color::Rgb(248, 81, 73),
        diff_context_fg: Color::Rgb(230, 237, 243),
        diff_hunk_header_fg: Color::Rgb(188, 140, 255),
        current_hunk_bg: Color::Rgb(30, 40, 58),
        success: Color::Rgb(63, 185, 80),
        error: Color::Rgb(248, 81, 73),
        warning: Color::Rgb(210, 153, 34),
    }
}

fn dracula() -> Theme {
    Theme {
        name: "dracula".to_string(),
        accent: Color::Rgb(139, 233, 253),
        text: Color::Rgb(248, 248, 242),
        text_muted: Color::Rgb(98, 114, 164),
        surface: Color::Rgb(40, 42, 54),
        selection_bg: Color::Rgb(68, 71, 90),
        diff_add_fg: Color::Rgb(80, 250, 123),
        diff_del_fg: Color::Rgb(255, 85, 85),
        diff_context_fg: Color::Rgb(248, 248, 242),
        diff_hunk_header_fg: Color::Rgb(255, 121, 198),
        current_hunk_bg: Color::Rgb(55, 58, 75),
        success: Color::Rgb(80, 250, 123),
        error: Color::Rgb(255, 85, 85),
        warning: Color::Rgb(241, 250, 140),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse_with_or_without_hash() {
        assert_eq!(parse_hex_color("#ff0080"), Some(Color::Rgb(255, 0, 128)));
        assert_eq!(parse_hex_color("00ff00"), Some(Color::Rgb(0, 255, 0)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("zzzzzz"), None);
        // six bytes, but not six digits
        assert_eq!(parse_hex_color("#\u{20ac}abc"), None);
    }

    #[test]
    fn overrides_replace_only_valid_slots() {
        let mut theme = Theme::from_name("unknown");
        assert_eq!(theme.name, "one-dark");

        let overrides = ThemeOverrides {
            accent: Some("#010203".into()),
            error: Some("nope".into()),
            ..Default::default()
        };
        apply_overrides(&mut theme, &overrides);
        assert_eq!(theme.accent, Color::Rgb(1, 2, 3));
        assert_eq!(theme.error, Color::Red);
    }
}
