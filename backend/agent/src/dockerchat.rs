//! Docker-chat agent: helps a user write a Dockerfile for a Python repository.
//!
//! The model is told to confirm the repository URL first; until it does,
//! the fallback keeps steering it back to asking for the URL.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use parley_commands::{CommandHandler, CommandSet};
use parley_config::AgentConfig;
use parley_logging::redact_sensitive_data;
use tracing::{debug, info};

use crate::agent::Agent;
use crate::messages::{DockerChatCommand, FileExists, InformUrl, PythonDependency, PythonVersion};
use crate::session_state::AgentState;

/// Fallback reply while no repository URL is known.
pub const ASK_URL_RESPONSE: &str =
    "You have not yet sent me the URL. Start by asking for the URL, then confirm the URL with me";

/// Reply once `inform_url` has recorded the URL.
pub const GOT_URL_RESPONSE: &str = "Ok, confirming the URL.";

const DEPENDENCY_FILES: &[&str] = &["requirements.txt", "pyproject.toml", "setup.py", "Pipfile"];

pub struct DockerChatHandler {
    /// Directory holding local checkouts, one subdirectory per repo name.
    checkout_dir: Option<PathBuf>,
}

impl DockerChatHandler {
    pub fn new(checkout_dir: Option<PathBuf>) -> Self {
        Self { checkout_dir }
    }

    fn inform_url(&self, msg: InformUrl, state: &mut AgentState) -> Result<Option<String>> {
        let url = msg.url.trim();
        if url.is_empty() {
            return Ok(Some("The URL you sent is empty. Please send the repository URL.".into()));
        }

        state.repo_path = self.resolve_checkout(url);
        state.repo_url = Some(url.to_string());
        info!(
            url = %redact_sensitive_data(url),
            checkout = ?state.repo_path,
            "repository URL confirmed"
        );
        Ok(Some(GOT_URL_RESPONSE.to_string()))
    }

    /// A local directory for `url`: the URL itself when it points at one,
    /// else `<checkout_dir>/<repo name>` when that exists.
    fn resolve_checkout(&self, url: &str) -> Option<PathBuf> {
        let local = Path::new(url.strip_prefix("file://").unwrap_or(url));
        if local.is_dir() {
            return Some(local.to_path_buf());
        }

        let repo_name = url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .map(|name| name.trim_end_matches(".git"))
            .filter(|name| !name.is_empty())?;
        let candidate = self.checkout_dir.as_ref()?.join(repo_name);
        candidate.is_dir().then_some(candidate)
    }

    fn file_exists(&self, msg: FileExists, state: &mut AgentState) -> Result<Option<String>> {
        let root = match checkout(state) {
            Ok(root) => root,
            Err(reply) => return Ok(Some(reply)),
        };

        let relative = Path::new(msg.filename.trim());
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative.as_os_str().is_empty() {
            return Ok(Some(format!(
                "I can only look inside the repository; `{}` is not a path within it.",
                msg.filename
            )));
        }

        let exists = root
            .join(relative)
            .try_exists()
            .with_context(|| format!("checking {} in {}", relative.display(), root.display()))?;
        debug!(file = %relative.display(), exists, "file_exists");

        Ok(Some(if exists {
            format!("Yes, `{}` exists in the repository.", msg.filename)
        } else {
            format!("No, `{}` does not exist in the repository.", msg.filename)
        }))
    }

    fn python_version(&self, _msg: PythonVersion, state: &mut AgentState) -> Result<Option<String>> {
        let root = match checkout(state) {
            Ok(root) => root.to_path_buf(),
            Err(reply) => return Ok(Some(reply)),
        };

        let Some(version) = detect_python_version(&root)? else {
            return Ok(Some(
                "I could not determine the Python version; \
                 there is no .python-version file and pyproject.toml does not declare one."
                    .into(),
            ));
        };
        state
            .context_vars
            .insert("python_version".into(), version.clone());
        Ok(Some(format!("The repository expects Python {version}.")))
    }

    fn python_dependency(
        &self,
        _msg: PythonDependency,
        state: &mut AgentState,
    ) -> Result<Option<String>> {
        let root = match checkout(state) {
            Ok(root) => root,
            Err(reply) => return Ok(Some(reply)),
        };

        let mut found = Vec::new();
        for name in DEPENDENCY_FILES {
            let path = root.join(name);
            if path
                .try_exists()
                .with_context(|| format!("checking {}", path.display()))?
            {
                found.push(*name);
            }
        }

        Ok(Some(if found.is_empty() {
            "The repository has no requirements.txt, pyproject.toml, setup.py or Pipfile.".into()
        } else {
            format!("The repository declares its dependencies in: {}.", found.join(", "))
        }))
    }
}

/// The local checkout to inspect, or the reply explaining why there is none.
fn checkout(state: &AgentState) -> Result<&Path, String> {
    let Some(url) = &state.repo_url else {
        return Err(ASK_URL_RESPONSE.to_string());
    };
    state.repo_path.as_deref().ok_or_else(|| {
        format!("The repository {url} is not available locally, so I cannot inspect its files yet.")
    })
}

/// `.python-version` first, then `requires-python` in pyproject.toml.
fn detect_python_version(root: &Path) -> Result<Option<String>> {
    let pinned = root.join(".python-version");
    if pinned.is_file() {
        let text = fs::read_to_string(&pinned)
            .with_context(|| format!("reading {}", pinned.display()))?;
        if let Some(line) = text.lines().map(str::trim).find(|l| !l.is_empty()) {
            return Ok(Some(line.to_string()));
        }
    }

    let pyproject = root.join("pyproject.toml");
    if !pyproject.is_file() {
        return Ok(None);
    }
    let text = fs::read_to_string(&pyproject)
        .with_context(|| format!("reading {}", pyproject.display()))?;
    let Ok(doc) = text.parse::<toml::Table>() else {
        debug!("pyproject.toml is not valid TOML");
        return Ok(None);
    };

    let requires = doc
        .get("project")
        .and_then(|p| p.get("requires-python"))
        .or_else(|| {
            doc.get("tool")
                .and_then(|t| t.get("poetry"))
                .and_then(|p| p.get("dependencies"))
                .and_then(|d| d.get("python"))
        })
        .and_then(|v| v.as_str());
    Ok(requires.map(str::to_string))
}

impl CommandHandler for DockerChatHandler {
    type Command = DockerChatCommand;
    type State = AgentState;

    fn handle_command(
        &self,
        command: DockerChatCommand,
        state: &mut AgentState,
    ) -> Result<Option<String>> {
        match command {
            DockerChatCommand::InformUrl(msg) => self.inform_url(msg, state),
            DockerChatCommand::FileExists(msg) => self.file_exists(msg, state),
            DockerChatCommand::PythonVersion(msg) => self.python_version(msg, state),
            DockerChatCommand::PythonDependency(msg) => self.python_dependency(msg, state),
        }
    }

    /// Until the URL is known, steer the model back to asking for it unless
    /// the message already talks about a URL.
    fn fallback(&self, text: &str, state: &mut AgentState) -> Option<String> {
        if !state.knows_repo() && !text.to_lowercase().contains("url") {
            return Some(ASK_URL_RESPONSE.to_string());
        }
        None
    }
}

pub type DockerChatAgent = Agent<DockerChatHandler>;

impl Agent<DockerChatHandler> {
    /// Build a docker-chat agent from its config section.
    ///
    /// With no `enabled_commands`, every known command starts enabled.
    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        let handler = DockerChatHandler::new(config.checkout_dir.clone());
        let mut agent = Agent::new(config.name(), handler, AgentState::new())
            .with_policy(config.decode_failure());

        match &config.enabled_commands {
            Some(names) => {
                for name in names {
                    agent.enable_command(name)?;
                }
            }
            None => {
                for schema in DockerChatCommand::schemas() {
                    agent.enable(schema);
                }
            }
        }
        Ok(agent)
    }
}
