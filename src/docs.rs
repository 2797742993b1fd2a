//! Documentation generator for a settings schema
//!
//! Renders Markdown or reStructuredText reference pages from [`Schema`]
//! definitions: name, type, default, importance, documentation and the
//! accepted values of any validator.

use crate::config::{ConfigValue, Importance, Schema, SettingDefinition};

/// Output markup for [`generate_docs`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocsFormat {
    #[default]
    Markdown,
    Rst,
}

/// Configuration for docs generation
#[derive(Debug, Clone, Default)]
pub struct DocsConfig {
    /// Title for the documentation
    pub title: Option<String>,
    /// Description/introduction text
    pub description: Option<String>,
    pub format: DocsFormat,
    /// Required settings first, then by importance, then by name.
    /// When false the schema's insertion order is kept.
    pub sort_by_importance: bool,
    /// Leave out settings less important than this
    pub min_importance: Option<Importance>,
}

impl DocsConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: DocsFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn sort_by_importance(mut self) -> Self {
        self.sort_by_importance = true;
        self
    }

    #[must_use]
    pub fn min_importance(mut self, importance: Importance) -> Self {
        self.min_importance = Some(importance);
        self
    }
}

/// Generate documentation for every setting of `schema`
///
/// # Example
///
/// ```
/// use confdef::{generate_docs, DocsConfig, Schema, SettingDefinition, SettingType};
///
/// # fn main() -> confdef::Result<()> {
/// let mut builder = Schema::builder();
/// builder.define(
///     SettingDefinition::new("producer.threads", SettingType::Int)
///         .default_value(5)
///         .doc("Number of threads to run produce requests on."),
/// )?;
///
/// let docs = generate_docs(&builder.build()?, DocsConfig::new().with_title("REST Proxy"));
/// assert!(docs.starts_with("# REST Proxy"));
/// assert!(docs.contains("### `producer.threads`"));
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn generate_docs(schema: &Schema, config: DocsConfig) -> String {
    let mut settings: Vec<&SettingDefinition> = schema
        .iter()
        .filter(|def| config.min_importance.is_none_or(|min| def.importance <= min))
        .collect();

    if config.sort_by_importance {
        // Importance orders High first
        settings.sort_by(|a, b| {
            (!a.is_required(), a.importance, &a.name).cmp(&(!b.is_required(), b.importance, &b.name))
        });
    }

    let title = config
        .title
        .as_deref()
        .unwrap_or("Configuration Reference");

    let mut output = String::new();
    match config.format {
        DocsFormat::Markdown => {
            output.push_str(&format!("# {title}\n\n"));
            if let Some(desc) = &config.description {
                output.push_str(&format!("{desc}\n\n"));
            }
            for def in settings {
                format_markdown(&mut output, def);
            }
        }
        DocsFormat::Rst => {
            output.push_str(&format!("{title}\n{}\n\n", "=".repeat(title.chars().count())));
            if let Some(desc) = &config.description {
                output.push_str(&format!("{desc}\n\n"));
            }
            for def in settings {
                format_rst(&mut output, def);
            }
        }
    }

    output
}

fn format_markdown(out: &mut String, def: &SettingDefinition) {
    out.push_str(&format!("### `{}`\n\n", def.name));

    if !def.documentation.is_empty() {
        out.push_str(&format!("{}\n\n", def.documentation));
    }

    out.push_str("| Property | Value |\n");
    out.push_str("|----------|-------|\n");
    out.push_str(&format!("| **Type** | {} |\n", def.setting_type.as_str().to_lowercase()));
    out.push_str(&format!("| **Default** | {} |\n", format_default(def)));
    out.push_str(&format!("| **Importance** | {} |\n", def.importance));
    if let Some(validator) = &def.validator {
        out.push_str(&format!("| **Valid values** | {} |\n", validator.describe()));
    }

    out.push_str("\n---\n\n");
}

fn format_rst(out: &mut String, def: &SettingDefinition) {
    out.push_str(&format!("``{}``\n", def.name));
    if !def.documentation.is_empty() {
        out.push_str(&format!("  {}\n\n", def.documentation));
    } else {
        out.push('\n');
    }

    out.push_str(&format!("  * Type: {}\n", def.setting_type.as_str().to_lowercase()));
    out.push_str(&format!("  * Default: {}\n", format_default(def)));
    out.push_str(&format!("  * Importance: {}\n", def.importance));
    if let Some(validator) = &def.validator {
        out.push_str(&format!("  * Valid values: {}\n", validator.describe()));
    }

    out.push('\n');
}

fn format_default(def: &SettingDefinition) -> String {
    match def.default() {
        None => "*required*".to_string(),
        Some(ConfigValue::String(s)) if s.is_empty() => "\"\"".to_string(),
        Some(ConfigValue::List(items)) if items.is_empty() => "\"\"".to_string(),
        Some(value) => format!("`{value}`"),
    }
}

// =============================================================================
// Tests
// =============================================================================
