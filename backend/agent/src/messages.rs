//! Commands the docker-chat agent understands.
//!
//! Each command is a typed struct bound to a schema; [`DockerChatCommand`]
//! closes over all of them so dispatch is an exhaustive match.

use parley_commands::{
    decode, Command, CommandSchema, CommandSet, DecodeError, FieldDef, FieldType,
    ParsedCandidate, UsageExample,
};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// inform_url
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InformUrl {
    pub url: String,
}

impl Command for InformUrl {
    const NAME: &'static str = "inform_url";

    fn schema() -> CommandSchema {
        CommandSchema::new(
            Self::NAME,
            "Tell the agent the URL of the repository to containerize.",
            vec![FieldDef::required("url", "Repository URL", FieldType::String)],
            vec![UsageExample::new(
                &[("url", "https://github.com/openai/chatgpt-retrieval-plugin")],
                &[
                    "you want to confirm the URL of the repo with the user",
                    "the user has just told you the repo URL",
                ],
            )],
        )
        .expect("inform_url schema is valid")
    }
}

// ---------------------------------------------------------------------------
// file_exists
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileExists {
    pub filename: String,
}

impl Command for FileExists {
    const NAME: &'static str = "file_exists";

    fn schema() -> CommandSchema {
        CommandSchema::new(
            Self::NAME,
            "Check whether a file exists in the repository.",
            vec![FieldDef::required(
                "filename",
                "Path relative to the repository root",
                FieldType::String,
            )],
            vec![
                UsageExample::new(
                    &[("filename", "requirements.txt")],
                    &["you need to know whether the repo lists its dependencies"],
                ),
                UsageExample::new(
                    &[("filename", "Dockerfile")],
                    &[
                        "you want to check if the repo already has a Dockerfile",
                        "you need to know whether a given file is in the repo",
                    ],
                ),
            ],
        )
        .expect("file_exists schema is valid")
    }
}

// ---------------------------------------------------------------------------
// python_version
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PythonVersion {}

impl Command for PythonVersion {
    const NAME: &'static str = "python_version";

    fn schema() -> CommandSchema {
        CommandSchema::new(
            Self::NAME,
            "Find out which Python version the repository expects.",
            vec![],
            vec![UsageExample::new(
                &[],
                &["you need to pick a Python base image for the Dockerfile"],
            )],
        )
        .expect("python_version schema is valid")
    }
}

// ---------------------------------------------------------------------------
// python_dependency
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PythonDependency {}

impl Command for PythonDependency {
    const NAME: &'static str = "python_dependency";

    fn schema() -> CommandSchema {
        CommandSchema::new(
            Self::NAME,
            "Find out how the repository declares its Python dependencies.",
            vec![],
            vec![UsageExample::new(
                &[],
                &[
                    "you need to know how to install the repo's dependencies",
                    "you want to know whether the repo uses requirements.txt or pyproject.toml",
                ],
            )],
        )
        .expect("python_dependency schema is valid")
    }
}

// ---------------------------------------------------------------------------
// Command set
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockerChatCommand {
    InformUrl(InformUrl),
    FileExists(FileExists),
    PythonVersion(PythonVersion),
    PythonDependency(PythonDependency),
}

impl CommandSet for DockerChatCommand {
    fn decode(
        schema: &CommandSchema,
        candidate: &ParsedCandidate,
    ) -> Option<Result<Self, DecodeError>> {
        Some(match schema.name.as_str() {
            InformUrl::NAME => decode(schema, candidate).map(Self::InformUrl),
            FileExists::NAME => decode(schema, candidate).map(Self::FileExists),
            PythonVersion::NAME => decode(schema, candidate).map(Self::PythonVersion),
            PythonDependency::NAME => decode(schema, candidate).map(Self::PythonDependency),
            _ => return None,
        })
    }

    fn name(&self) -> &'static str {
        match self {
            Self::InformUrl(_) => InformUrl::NAME,
            Self::FileExists(_) => FileExists::NAME,
            Self::PythonVersion(_) => PythonVersion::NAME,
            Self::PythonDependency(_) => PythonDependency::NAME,
        }
    }

    fn schemas() -> Vec<CommandSchema> {
        vec![
            InformUrl::schema(),
            FileExists::schema(),
            PythonVersion::schema(),
            PythonDependency::schema(),
        ]
    }
}

/// Names of every command the docker-chat agent can enable.
pub fn known_commands() -> Vec<&'static str> {
    vec![
        InformUrl::NAME,
        FileExists::NAME,
        PythonVersion::NAME,
        PythonDependency::NAME,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_commands::detect_candidate;

    #[test]
    fn every_usage_example_contains_a_trigger_phrase() {
        for schema in DockerChatCommand::schemas() {
            let usage = schema.usage_example();
            let phrases: Vec<&str> = schema.trigger_phrases().collect();
            assert!(!phrases.is_empty(), "{} has no phrases", schema.name);
            assert!(
                phrases.iter().any(|p| usage.contains(p)),
                "{} usage lacks its trigger phrases",
                schema.name
            );
        }
    }

    #[test]
    fn schema_names_match_known_commands() {
        let names: Vec<String> = DockerChatCommand::schemas().into_iter().map(|s| s.name).collect();
        assert_eq!(names, known_commands());
    }

    #[test]
    fn rendered_examples_decode_to_their_variant() {
        for schema in DockerChatCommand::schemas() {
            for example in &schema.examples {
                let candidate = detect_candidate(&example.to_wire(&schema.name)).unwrap();
                let command = DockerChatCommand::decode(&schema, &candidate).unwrap().unwrap();
                assert_eq!(command.name(), schema.name);
            }
        }
    }

    #[test]
    fn foreign_schema_has_no_variant() {
        let schema = CommandSchema::new("launch", "x", vec![], vec![UsageExample::new(&[], &["never"])])
            .unwrap();
        let candidate = detect_candidate("{'request': 'launch'}").unwrap();
        assert!(DockerChatCommand::decode(&schema, &candidate).is_none());
    }
}
