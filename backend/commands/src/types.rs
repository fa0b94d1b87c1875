/// Command schema types.
///
/// A schema describes one command the model may emit inside its reply: the
/// fields it carries and the example phrasings that teach the model when to
/// emit it.
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Key carrying the command name inside a structured block.
pub const REQUEST_KEY: &str = "request";

// ---------------------------------------------------------------------------
// Field
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Integer,
    Boolean,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
}

impl FieldDef {
    pub fn required(name: &str, description: &str, field_type: FieldType) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            field_type,
            required: true,
        }
    }

    pub fn optional(name: &str, description: &str, field_type: FieldType) -> Self {
        Self {
            required: false,
            ..Self::required(name, description, field_type)
        }
    }
}

// ---------------------------------------------------------------------------
// Usage example
// ---------------------------------------------------------------------------

/// A concrete instance of a command plus the situations it fits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageExample {
    /// Field values in declaration order. Does not include `request`.
    pub values: Vec<(String, String)>,
    /// Trigger phrases, each completing "Use this when ...".
    pub use_when: Vec<String>,
}

impl UsageExample {
    pub fn new(values: &[(&str, &str)], use_when: &[&str]) -> Self {
        Self {
            values: values
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            use_when: use_when.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Render this example as a block in the wire format, with double quotes.
    pub fn to_wire(&self, command: &str) -> String {
        let mut parts = vec![format!("\"{}\": \"{}\"", REQUEST_KEY, escape(command))];
        for (key, value) in &self.values {
            parts.push(format!("\"{}\": \"{}\"", escape(key), escape(value)));
        }
        format!("{{{}}}", parts.join(", "))
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

// ---------------------------------------------------------------------------
// Command schema
// ---------------------------------------------------------------------------

/// Declared shape and documentation for one command.
///
/// Built through [`CommandSchema::new`], which checks that every example only
/// references declared fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSchema {
    pub name: String,
    pub description: String,
    pub fields: Vec<FieldDef>,
    pub examples: Vec<UsageExample>,
}

impl CommandSchema {
    pub fn new(
        name: &str,
        description: &str,
        fields: Vec<FieldDef>,
        examples: Vec<UsageExample>,
    ) -> Result<Self, SchemaError> {
        let schema = Self {
            name: name.to_string(),
            description: description.to_string(),
            fields,
            examples,
        };
        schema.validate()?;
        Ok(schema)
    }

    fn validate(&self) -> Result<(), SchemaError> {
        let command = self.name.clone();
        for (i, field) in self.fields.iter().enumerate() {
            if field.name == REQUEST_KEY {
                return Err(SchemaError::ReservedField { command });
            }
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(SchemaError::DuplicateField {
                    command,
                    field: field.name.clone(),
                });
            }
        }
        if self.examples.is_empty() {
            return Err(SchemaError::NoExamples { command });
        }
        for (index, example) in self.examples.iter().enumerate() {
            if example.use_when.is_empty() {
                return Err(SchemaError::NoTriggerPhrases { command, index });
            }
            if let Some((key, _)) = example.values.iter().find(|(k, _)| self.field(k).is_none()) {
                return Err(SchemaError::UndeclaredExampleField {
                    command,
                    field: key.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// All trigger phrases across every example, in order.
    pub fn trigger_phrases(&self) -> impl Iterator<Item = &str> {
        self.examples
            .iter()
            .flat_map(|ex| ex.use_when.iter().map(|s| s.as_str()))
    }

    /// Self-contained instructions telling a model how and when to emit
    /// this command. Every trigger phrase appears verbatim.
    pub fn usage_example(&self) -> String {
        let mut lines = vec![format!("Command `{}`: {}", self.name, self.description)];

        if self.fields.is_empty() {
            lines.push("Fields: none besides `request`.".to_string());
        } else {
            lines.push("Fields:".to_string());
            for f in &self.fields {
                let req = if f.required { "required" } else { "optional" };
                lines.push(format!(
                    "- `{}` ({}, {}): {}",
                    f.name,
                    f.field_type.as_str(),
                    req,
                    f.description
                ));
            }
        }

        for example in &self.examples {
            lines.push(String::new());
            for phrase in &example.use_when {
                lines.push(format!("Use this when {}", phrase));
            }
            lines.push(format!("Example: {}", example.to_wire(&self.name)));
        }
        lines.join("\n")
    }
}
