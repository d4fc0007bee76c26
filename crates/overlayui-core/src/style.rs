//! Named styles and typed property binding.
//!
//! A stylesheet maps style names to flat `name -> value` string tables. Nodes
//! opt in through [`Node::style_name`](crate::node::Node::style_name); binding
//! runs each property through a registry of typed setters. Unknown names and
//! unparsable values are logged and skipped, the rest still apply.

use peniko::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::element::{Element, Fill, TextAlign};
use crate::error::{UiError, UiResult};
use crate::widget::Widget;

/// Raw property values of one style.
pub type StyleProperties = HashMap<String, String>;

/// Looks up styles by name.
pub trait StyleProvider {
    fn style(&self, name: &str) -> Option<&StyleProperties>;
}

/// Styles loaded from a JSON document.
///
/// ```json
/// { "title": { "font_size": "18", "font_color": "#202020" } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stylesheet {
    styles: HashMap<String, StyleProperties>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> UiResult<Self> {
        let sheet: Self = serde_json::from_str(json)?;
        log::debug!("loaded {} styles", sheet.styles.len());
        Ok(sheet)
    }

    /// Read and parse a stylesheet file.
    pub fn load(path: impl AsRef<Path>) -> UiResult<Self> {
        let path = path.as_ref();
        log::debug!("loading stylesheet from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn insert(&mut self, name: impl Into<String>, properties: StyleProperties) {
        self.styles.insert(name.into(), properties);
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl StyleProvider for Stylesheet {
    fn style(&self, name: &str) -> Option<&StyleProperties> {
        self.styles.get(name)
    }
}

type Setter<T> = Box<dyn Fn(&mut T, &str) -> UiResult<()>>;

/// Name to typed setter table for one target type.
pub struct PropertyRegistry<T> {
    setters: HashMap<&'static str, Setter<T>>,
}

impl<T> Default for PropertyRegistry<T> {
    fn default() -> Self {
        Self {
            setters: HashMap::new(),
        }
    }
}

impl<T> PropertyRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a setter that parses its value with `parse`.
    pub fn register<V, P, S>(&mut self, name: &'static str, parse: P, set: S) -> &mut Self
    where
        P: Fn(&str) -> Option<V> + 'static,
        S: Fn(&mut T, V) + 'static,
    {
        self.setters.insert(
            name,
            Box::new(move |target, raw| {
                let value = parse(raw).ok_or_else(|| UiError::InvalidValue {
                    property: name.to_string(),
                    value: raw.to_string(),
                })?;
                set(target, value);
                Ok(())
            }),
        );
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.setters.contains_key(name)
    }

    /// Set a single property.
    pub fn set(&self, target: &mut T, name: &str, value: &str) -> UiResult<()> {
        let setter = self
            .setters
            .get(name)
            .ok_or_else(|| UiError::UnknownProperty(name.to_string()))?;
        setter(target, value)
    }

    /// Apply every property of a style, logging and skipping failures.
    ///
    /// Returns the number of properties applied.
    pub fn apply(&self, target: &mut T, properties: &StyleProperties) -> usize {
        let mut applied = 0;
        for (name, value) in properties {
            match self.set(target, name, value) {
                Ok(()) => applied += 1,
                Err(e) => log::error!("failed to apply style property {}: {}", name, e),
            }
        }
        applied
    }
}

impl<T> std::fmt::Debug for PropertyRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.setters.keys().collect();
        names.sort();
        f.debug_struct("PropertyRegistry").field("properties", &names).finish()
    }
}

/// Parse `#rgb`, `#rrggbb`, `#rrggbbaa` or `r,g,b[,a]`.
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("transparent") {
        return Some(Color::TRANSPARENT);
    }
    if let Some(hex) = value.strip_prefix('#') {
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range).and_then(|s| u8::from_str_radix(s, 16).ok())
        };
        return match hex.len() {
            3 => Some(Color::from_rgba8(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
                255,
            )),
            6 => Some(Color::from_rgba8(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Some(Color::from_rgba8(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        };
    }

    let parts: Vec<u8> = value
        .split(',')
        .map(|p| p.trim().parse().ok())
        .collect::<Option<_>>()?;
    match parts[..] {
        [r, g, b] => Some(Color::from_rgba8(r, g, b, 255)),
        [r, g, b, a] => Some(Color::from_rgba8(r, g, b, a)),
        _ => None,
    }
}

pub fn parse_f64(value: &str) -> Option<f64> {
    value.trim().parse().ok().filter(|v: &f64| v.is_finite())
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn parse_string(value: &str) -> Option<String> {
    Some(value.to_string())
}

fn parse_align(value: &str) -> Option<TextAlign> {
    match value.trim().to_ascii_lowercase().as_str() {
        "left" => Some(TextAlign::Left),
        "center" | "centre" => Some(TextAlign::Center),
        _ => None,
    }
}

/// Setters for element styles.
pub fn element_properties() -> PropertyRegistry<Element> {
    let mut registry = PropertyRegistry::new();
    registry
        .register("font_family", parse_string, |e: &mut Element, v| e.style.font_family = v)
        .register("font_size", parse_f64, |e: &mut Element, v| e.style.font_size = v)
        .register("font_color", parse_color, |e: &mut Element, v| e.style.font_color = v)
        .register("disabled_font_color", parse_color, |e: &mut Element, v| {
            e.style.disabled_font_color = v
        })
        .register("border_color", parse_color, |e: &mut Element, v| e.style.border_color = v)
        .register("border_width", parse_f64, |e: &mut Element, v| e.style.border_width = v)
        .register("left_padding", parse_f64, |e: &mut Element, v| e.style.left_padding = v)
        .register("line_gap", parse_f64, |e: &mut Element, v| e.style.line_gap = v)
        .register("highlight_background", parse_color, |e: &mut Element, v| {
            e.style.highlight_background = v
        })
        .register("highlight_font_color", parse_color, |e: &mut Element, v| {
            e.style.highlight_font_color = v
        })
        .register("scrollbar_inner", parse_color, |e: &mut Element, v| e.style.scrollbar_inner = v)
        .register("scrollbar_outer", parse_color, |e: &mut Element, v| e.style.scrollbar_outer = v)
        .register("scrollbar_width", parse_f64, |e: &mut Element, v| e.style.scrollbar_width = v)
        .register("caret_color", parse_color, |e: &mut Element, v| e.style.caret_color = v)
        .register("align", parse_align, |e: &mut Element, v| e.style.align = v)
        .register("background_color", parse_color, |e: &mut Element, v| e.fill = Fill::Color(v))
        .register("texture", parse_string, |e: &mut Element, v| e.fill = Fill::Texture(v))
        .register("text", parse_string, |e: &mut Element, v| e.text = Some(v))
        .register("enabled", parse_bool, |e: &mut Element, v| e.enabled = v);
    registry
}

/// Setters for widget styles.
pub fn widget_properties() -> PropertyRegistry<Widget> {
    let mut registry = PropertyRegistry::new();
    registry
        .register("background_color", parse_color, |w: &mut Widget, v| w.background = Fill::Color(v))
        .register("texture", parse_string, |w: &mut Widget, v| w.background = Fill::Texture(v))
        .register("modal", parse_bool, |w: &mut Widget, v| w.modal = v)
        .register("name", parse_string, |w: &mut Widget, v| w.name = v);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn rgba(color: Color) -> [u8; 4] {
        let c = color.to_rgba8();
        [c.r, c.g, c.b, c.a]
    }

    #[test]
    fn test_parse_color_formats() {
        assert_eq!(parse_color("#fff").map(rgba), Some([255, 255, 255, 255]));
        assert_eq!(parse_color("#ed0000").map(rgba), Some([237, 0, 0, 255]));
        assert_eq!(parse_color("#10203040").map(rgba), Some([16, 32, 48, 64]));
        assert_eq!(parse_color(" 177, 177, 177 ").map(rgba), Some([177, 177, 177, 255]));
        assert_eq!(parse_color("1,2,3,4").map(rgba), Some([1, 2, 3, 4]));
        assert!(parse_color("#12").is_none());
        assert!(parse_color("#zzzzzz").is_none());
        assert!(parse_color("1,2").is_none());
        assert!(parse_color("300,0,0").is_none());
    }

    #[test]
    fn test_parse_scalars() {
        assert_eq!(parse_f64(" 14.5"), Some(14.5));
        assert_eq!(parse_f64("NaN"), None);
        assert_eq!(parse_bool("True"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_apply_skips_bad_properties() {
        let registry = element_properties();
        let mut element = Element::text_box("hi");
        let properties: StyleProperties = [
            ("font_size", "18"),
            ("font_color", "#ff0000"),
            ("border_width", "wide"),
            ("no_such_property", "1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        assert_eq!(registry.apply(&mut element, &properties), 2);
        assert!((element.style.font_size - 18.0).abs() < f64::EPSILON);
        assert_eq!(rgba(element.style.font_color), [255, 0, 0, 255]);
        assert!((element.style.border_width - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_reports_errors() {
        let registry = widget_properties();
        let mut widget = Widget::new();
        assert!(matches!(
            registry.set(&mut widget, "opacity", "1"),
            Err(UiError::UnknownProperty(_))
        ));
        assert!(matches!(
            registry.set(&mut widget, "modal", "perhaps"),
            Err(UiError::InvalidValue { .. })
        ));
        registry.set(&mut widget, "modal", "true").unwrap();
        assert!(widget.modal);
    }

    #[test]
    fn test_load_stylesheet_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r##"{{ "title": {{ "font_size": "18" }}, "panel": {{ "texture": "panel.png" }} }}"##
        )
        .unwrap();

        let sheet = Stylesheet::load(file.path()).unwrap();
        assert_eq!(sheet.len(), 2);
        assert_eq!(
            sheet.style("title").and_then(|s| s.get("font_size")).map(String::as_str),
            Some("18")
        );
        assert!(sheet.style("missing").is_none());
    }

    #[test]
    fn test_load_errors() {
        assert!(matches!(Stylesheet::from_json("{ nope"), Err(UiError::Config(_))));
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Stylesheet::load(dir.path().join("missing.json")),
            Err(UiError::Io(_))
        ));
    }
}
