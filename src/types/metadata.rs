//! Region metadata dictionaries.
//!
//! `RegionMeta` holds descriptive attributes (`include`, `label`, `tag`, ...)
//! and `RegionVisual` holds drawing attributes (`color`, `linewidth`, ...).
//! Both are fixed-schema maps: keys pass through an alias table and are
//! rejected unless they appear in the allow-list.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{RegionError, Result};

/// A metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<MetaValue>),
}

impl MetaValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetaValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetaValue::Int(i) => Some(*i as f64),
            MetaValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl From<bool> for MetaValue {
    fn from(v: bool) -> Self {
        MetaValue::Bool(v)
    }
}

impl From<i64> for MetaValue {
    fn from(v: i64) -> Self {
        MetaValue::Int(v)
    }
}

impl From<f64> for MetaValue {
    fn from(v: f64) -> Self {
        MetaValue::Float(v)
    }
}

impl From<&str> for MetaValue {
    fn from(v: &str) -> Self {
        MetaValue::Text(v.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(v: String) -> Self {
        MetaValue::Text(v)
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Bool(b) => write!(f, "{b}"),
            MetaValue::Int(i) => write!(f, "{i}"),
            MetaValue::Float(v) => write!(f, "{v}"),
            MetaValue::Text(s) => write!(f, "{s}"),
            MetaValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// The key schema of a metadata map.
pub trait MetaSchema {
    /// Name used in error messages.
    const NAME: &'static str;
    /// Canonical keys accepted by the map.
    const VALID_KEYS: &'static [&'static str];
    /// `(alias, canonical)` pairs resolved before validation.
    const ALIASES: &'static [(&'static str, &'static str)];

    fn canonical(key: &str) -> &str {
        Self::ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map_or(key, |(_, canonical)| *canonical)
    }
}

/// Schema of `RegionMeta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegionKeys;

impl MetaSchema for RegionKeys {
    const NAME: &'static str = "RegionMeta";
    const VALID_KEYS: &'static [&'static str] = &[
        "background",
        "comment",
        "corr",
        "delete",
        "edit",
        "fixed",
        "frame",
        "highlite",
        "include",
        "label",
        "line",
        "move",
        "name",
        "range",
        "restfreq",
        "rotate",
        "select",
        "source",
        "tag",
        "text",
        "type",
        "veltype",
    ];
    const ALIASES: &'static [(&'static str, &'static str)] = &[];
}

/// Schema of `RegionVisual`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisualKeys;

impl MetaSchema for VisualKeys {
    const NAME: &'static str = "RegionVisual";
    const VALID_KEYS: &'static [&'static str] = &[
        "color",
        "dash",
        "dashlist",
        "fill",
        "font",
        "fontsize",
        "fontstyle",
        "fontweight",
        "labeloff",
        "labelpos",
        "line",
        "linestyle",
        "linewidth",
        "symbol",
        "symsize",
        "symthick",
        "textangle",
        "usetex",
        "default_style",
    ];
    const ALIASES: &'static [(&'static str, &'static str)] =
        &[("point", "symbol"), ("width", "linewidth")];
}

/// A validated metadata map.
pub struct Meta<S> {
    entries: BTreeMap<String, MetaValue>,
    schema: PhantomData<S>,
}

/// Descriptive attributes of a region.
pub type RegionMeta = Meta<RegionKeys>;

/// Drawing attributes of a region.
pub type RegionVisual = Meta<VisualKeys>;

impl<S: MetaSchema> Meta<S> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            schema: PhantomData,
        }
    }

    /// Build from key/value pairs, validating every key.
    pub fn from_pairs<K, V, I>(pairs: I) -> Result<Self>
    where
        K: AsRef<str>,
        V: Into<MetaValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut meta = Self::new();
        for (key, value) in pairs {
            meta.insert(key.as_ref(), value)?;
        }
        Ok(meta)
    }

    /// Insert a value after alias resolution.
    pub fn insert(&mut self, key: &str, value: impl Into<MetaValue>) -> Result<Option<MetaValue>> {
        let canonical = S::canonical(key);
        if !S::VALID_KEYS.contains(&canonical) {
            return Err(RegionError::InvalidArgument {
                message: format!("'{}' is not a valid key for {}", key, S::NAME),
                help: Some(format!("valid keys: {}", S::VALID_KEYS.join(", "))),
            });
        }
        Ok(self.entries.insert(canonical.to_string(), value.into()))
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<MetaValue>) -> Result<Self> {
        self.insert(key, value)?;
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.get(S::canonical(key))
    }

    pub fn remove(&mut self, key: &str) -> Option<MetaValue> {
        self.entries.remove(S::canonical(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(S::canonical(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl RegionMeta {
    /// The `include` flag; regions are included unless it is explicitly false.
    pub fn include(&self) -> bool {
        self.get("include").and_then(MetaValue::as_bool).unwrap_or(true)
    }
}

impl<S: MetaSchema> Default for Meta<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for Meta<S> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            schema: PhantomData,
        }
    }
}

impl<S> PartialEq for Meta<S> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<S: MetaSchema> fmt::Debug for Meta<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(S::NAME).field(&self.entries).finish()
    }
}

impl<S> Serialize for Meta<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> std::result::Result<Ser::Ok, Ser::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de, S: MetaSchema> Deserialize<'de> for Meta<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let entries = BTreeMap::<String, MetaValue>::deserialize(deserializer)?;
        Meta::from_pairs(entries).map_err(serde::de::Error::custom)
    }
}

/// The plotting artist families a region can be drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArtistKind {
    Patch,
    Line2D,
    Text,
}

impl FromStr for ArtistKind {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Patch" => Ok(ArtistKind::Patch),
            "Line2D" => Ok(ArtistKind::Line2D),
            "Text" => Ok(ArtistKind::Text),
            other => Err(RegionError::InvalidArgument {
                message: format!("artist \"{other}\" is not supported"),
                help: Some("use one of Patch, Line2D, Text".to_string()),
            }),
        }
    }
}

/// Plot keyword arguments derived from visual metadata.
pub type PlotStyle = BTreeMap<String, MetaValue>;

/// Green as drawn by ds9 (X11 green is darker).
const DS9_GREEN: &str = "#00ff00";

impl RegionVisual {
    /// Keyword arguments for drawing with `artist`: the style defaults
    /// overlaid with this map's entries renamed for the artist.
    pub fn plot_style(&self, artist: ArtistKind) -> Result<PlotStyle> {
        let mut style = self.default_plot_style(artist)?;
        style.extend(self.renamed_plot_style(artist));
        Ok(style)
    }

    /// Like `plot_style` but with the artist named by a string.
    pub fn plot_style_for(&self, artist: &str) -> Result<PlotStyle> {
        self.plot_style(artist.parse()?)
    }

    fn default_plot_style(&self, artist: ArtistKind) -> Result<PlotStyle> {
        let mut style = PlotStyle::new();
        let default_style = self.get("default_style").and_then(MetaValue::as_str);

        match default_style {
            None | Some("mpl") => {
                match artist {
                    ArtistKind::Patch => {
                        style.insert("fill".into(), false.into());
                    }
                    ArtistKind::Line2D => {
                        style.insert("fillstyle".into(), "none".into());
                        style.insert("marker".into(), "o".into());
                    }
                    ArtistKind::Text => {}
                }
            }
            Some("ds9") => match artist {
                ArtistKind::Text => {
                    style.insert("color".into(), DS9_GREEN.into());
                    style.insert("ha".into(), "center".into());
                    style.insert("va".into(), "center".into());
                }
                ArtistKind::Line2D => {
                    style.insert("marker".into(), "boxcircle".into());
                    style.insert("markersize".into(), MetaValue::Int(11));
                    style.insert("markeredgecolor".into(), DS9_GREEN.into());
                    style.insert("fillstyle".into(), "none".into());
                }
                ArtistKind::Patch => {
                    style.insert("edgecolor".into(), DS9_GREEN.into());
                    style.insert("fill".into(), false.into());
                }
            },
            Some(other) => {
                return Err(RegionError::InvalidArgument {
                    message: format!("invalid visual default_style '{other}'"),
                    help: Some("use 'mpl' or 'ds9'".to_string()),
                })
            }
        }

        Ok(style)
    }

    fn renamed_plot_style(&self, artist: ArtistKind) -> PlotStyle {
        let keymap: &[(&str, &str)] = match artist {
            ArtistKind::Text => &[
                ("font", "family"),
                ("fontstyle", "style"),
                ("fontweight", "weight"),
                ("fontsize", "size"),
                ("textangle", "rotation"),
            ],
            ArtistKind::Line2D => &[
                ("symbol", "marker"),
                ("symsize", "markersize"),
                ("color", "markeredgecolor"),
                ("linewidth", "markeredgewidth"),
                ("fill", "fillstyle"),
            ],
            ArtistKind::Patch => &[("color", "edgecolor"), ("fill", "fill")],
        };

        let mut style = PlotStyle::new();
        for (key, value) in self.iter() {
            let name = keymap
                .iter()
                .find(|(from, _)| *from == key)
                .map_or(key, |(_, to)| *to);
            style.insert(name.to_string(), value.clone());
        }

        if let Some(MetaValue::Text(default_style)) = style.remove("default_style") {
            if default_style == "ds9" {
                for value in style.values_mut() {
                    if value.as_str() == Some("green") {
                        *value = DS9_GREEN.into();
                    }
                }
            }
        }

        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_rejects_unknown_key() {
        let mut meta = RegionMeta::new();
        assert!(meta.insert("label", "src").is_ok());
        let err = meta.insert("colour", "red").unwrap_err();
        assert!(matches!(err, RegionError::InvalidArgument { .. }));
    }

    #[test]
    fn test_visual_aliases() {
        let visual = RegionVisual::from_pairs([("point", "x"), ("width", "2")]).unwrap();
        assert_eq!(visual.get("symbol"), Some(&MetaValue::from("x")));
        assert_eq!(visual.get("linewidth"), Some(&MetaValue::from("2")));
        // lookups go through the alias table too
        assert_eq!(visual.get("point"), Some(&MetaValue::from("x")));
        assert!(!visual.contains_key("width_px"));
    }

    #[test]
    fn test_include_defaults_true() {
        let meta = RegionMeta::new();
        assert!(meta.include());

        let meta = RegionMeta::new().with("include", false).unwrap();
        assert!(!meta.include());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: RegionVisual = serde_yaml::from_str("color: red\nwidth: 3").unwrap();
        assert_eq!(ok.get("linewidth"), Some(&MetaValue::Int(3)));

        let bad: std::result::Result<RegionMeta, _> = serde_yaml::from_str("bogus: 1");
        assert!(bad.is_err());
    }

    #[test]
    fn test_serialize_uses_canonical_keys() {
        let visual = RegionVisual::from_pairs([("point", "D")]).unwrap();
        let json = serde_json::to_string(&visual).unwrap();
        assert_eq!(json, r#"{"symbol":"D"}"#);
    }

    #[test]
    fn test_plot_style_mpl_defaults() {
        let visual = RegionVisual::new();
        let patch = visual.plot_style(ArtistKind::Patch).unwrap();
        assert_eq!(patch.get("fill"), Some(&MetaValue::Bool(false)));

        let line = visual.plot_style(ArtistKind::Line2D).unwrap();
        assert_eq!(line.get("marker"), Some(&MetaValue::from("o")));
        assert_eq!(line.get("fillstyle"), Some(&MetaValue::from("none")));
    }

    #[test]
    fn test_plot_style_keymap_overrides_defaults() {
        let visual = RegionVisual::from_pairs([("color", "red"), ("fill", "true")]).unwrap();
        let patch = visual.plot_style(ArtistKind::Patch).unwrap();
        assert_eq!(patch.get("edgecolor"), Some(&MetaValue::from("red")));
        assert_eq!(patch.get("fill"), Some(&MetaValue::from("true")));
        assert!(!patch.contains_key("color"));
    }

    #[test]
    fn test_plot_style_ds9_green() {
        let visual = RegionVisual::from_pairs([("default_style", "ds9"), ("color", "green")]).unwrap();
        let patch = visual.plot_style(ArtistKind::Patch).unwrap();
        assert_eq!(patch.get("edgecolor"), Some(&MetaValue::from("#00ff00")));
        assert!(!patch.contains_key("default_style"));

        let text = visual.plot_style(ArtistKind::Text).unwrap();
        assert_eq!(text.get("ha"), Some(&MetaValue::from("center")));
    }

    #[test]
    fn test_plot_style_unknown_artist() {
        let visual = RegionVisual::new();
        let err = visual.plot_style_for("Scatter").unwrap_err();
        assert!(matches!(err, RegionError::InvalidArgument { .. }));
    }

    #[test]
    fn test_plot_style_bad_default_style() {
        let visual = RegionVisual::from_pairs([("default_style", "gnuplot")]).unwrap();
        assert!(visual.plot_style(ArtistKind::Patch).is_err());
    }
}
