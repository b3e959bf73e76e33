//! Form configuration, loaded from JSON.
//!
//! Every key is optional; missing keys fall back to the two-field name form
//! laid out for a terminal.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, FieldSet};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub label: String,
    pub placeholder: String,
    pub clear_on_submit: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            placeholder: String::new(),
            clear_on_submit: true,
        }
    }
}

impl FieldConfig {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            placeholder: label.to_string(),
            clear_on_submit: true,
        }
    }
}

/// Geometry of the accessory bar, in layout units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarMetrics {
    pub height: f32,
    pub inset_x: f32,
    pub inset_y: f32,
}

impl BarMetrics {
    /// Touch-screen metrics in points: 70pt bar, field inset 16pt / 8pt.
    pub const TOUCH: BarMetrics = BarMetrics {
        height: 70.0,
        inset_x: 16.0,
        inset_y: 8.0,
    };

    /// Terminal metrics in cells: a three-row bordered field.
    pub const TERMINAL: BarMetrics = BarMetrics {
        height: 3.0,
        inset_x: 1.0,
        inset_y: 0.0,
    };
}

impl Default for BarMetrics {
    fn default() -> Self {
        Self::TERMINAL
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub fields: Vec<FieldConfig>,
    pub bar: BarMetrics,
    pub field_height: f32,
    pub padding: f32,
    pub gap: f32,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            fields: vec![FieldConfig::new("First Name"), FieldConfig::new("Last Name")],
            bar: BarMetrics::default(),
            field_height: 3.0,
            padding: 1.0,
            gap: 1.0,
        }
    }
}

impl FormConfig {
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let cfg: FormConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_json(&s)?;
        log::debug!("loaded {} field(s) from {}", cfg.fields.len(), path.display());
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fields.is_empty() {
            return Err(ConfigError::Invalid("at least one field is required".into()));
        }
        if self.fields.len() > usize::from(u8::MAX) {
            return Err(ConfigError::Invalid(format!(
                "{} fields given, at most {} supported",
                self.fields.len(),
                u8::MAX
            )));
        }
        if !(self.bar.height > 0.0) {
            return Err(ConfigError::Invalid("bar.height must be positive".into()));
        }
        if self.bar.inset_x < 0.0 || self.bar.inset_y < 0.0 {
            return Err(ConfigError::Invalid("bar insets must not be negative".into()));
        }
        if !(self.field_height > 0.0) {
            return Err(ConfigError::Invalid("field_height must be positive".into()));
        }
        Ok(())
    }

    pub fn build_fields(&self) -> FieldSet {
        self.fields.iter().fold(FieldSet::new(), |set, f| {
            set.with_field(f.label.clone(), f.placeholder.clone(), f.clear_on_submit)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldId;

    #[test]
    fn empty_object_is_the_name_form() {
        let cfg = FormConfig::from_json("{}").unwrap();
        assert_eq!(cfg, FormConfig::default());
        let fields = cfg.build_fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get(FieldId(1)).unwrap().placeholder, "First Name");
        assert_eq!(fields.get(FieldId(2)).unwrap().placeholder, "Last Name");
    }

    #[test]
    fn partial_field_entries_use_defaults() {
        let cfg = FormConfig::from_json(
            r#"{ "fields": [ { "label": "Email", "clear_on_submit": false } ],
                 "bar": { "height": 70.0 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.fields.len(), 1);
        assert_eq!(cfg.fields[0].placeholder, "");
        assert!(!cfg.fields[0].clear_on_submit);
        assert_eq!(cfg.bar.height, 70.0);
        assert_eq!(cfg.bar.inset_x, BarMetrics::TERMINAL.inset_x);
    }

    #[test]
    fn rejects_empty_field_list() {
        let err = FormConfig::from_json(r#"{ "fields": [] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_height_bar() {
        let err = FormConfig::from_json(r#"{ "bar": { "height": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = FormConfig::from_json("{ fields").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = FormConfig::load("/nonexistent/accessory-form.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
