// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recursive descent through a fleet-of-fleets config tree into a flat
//! list of fully-resolved agents.

use crate::error::ConfigError;
use crate::interpolate::{build_env, interpolate_value};
use crate::merge::{deep_merge, strip_web_unless_overridden};
use crate::raw::{AgentFile, FleetRef, RootConfig, WebConfig};
use herd_core::{qualified_name, validate_agent_name, Agent, InvalidAgentName};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Everything the loader produced from one root config tree.
pub struct LoadedFleet {
    pub agents: Vec<Agent>,
    pub root_name: Option<String>,
    pub web: Option<WebConfig>,
}

/// Load and fully resolve a fleet-of-fleets config tree rooted at `root_path`.
///
/// `dotenv_path`, if given, is read as a `.env` overlay; process environment
/// variables always take priority over it.
pub fn load(root_path: &Path, dotenv_path: Option<&Path>) -> Result<LoadedFleet, ConfigError> {
    let env = build_env(dotenv_path);
    let mut visited = vec![canonicalize(root_path)];
    let mut agents = Vec::new();
    let mut agent_names: HashMap<String, PathBuf> = HashMap::new();

    let root_value = read_yaml(root_path, &env)?;
    let root: RootConfig = deserialize(&root_value, root_path)?;
    let root_name = root.fleet.name.clone();

    let defaults = root.defaults.clone();
    descend(
        root_path,
        &root,
        defaults,
        &[],
        &env,
        &mut visited,
        &mut agents,
        &mut agent_names,
    )?;

    tracing::info!(
        root = %root_path.display(),
        agent_count = agents.len(),
        "fleet config loaded"
    );

    Ok(LoadedFleet {
        agents,
        root_name,
        web: root.web,
    })
}

#[allow(clippy::too_many_arguments)]
fn descend(
    fleet_path_file: &Path,
    fleet: &RootConfig,
    effective_defaults: serde_yaml::Value,
    fleet_path: &[String],
    env: &HashMap<String, String>,
    visited: &mut Vec<PathBuf>,
    agents: &mut Vec<Agent>,
    agent_names: &mut HashMap<String, PathBuf>,
) -> Result<(), ConfigError> {
    let fleet_dir = fleet_path_file
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    // Step 3: same-level name collisions among child fleet references.
    let mut seen_names: HashMap<String, PathBuf> = HashMap::new();

    for child_ref in &fleet.fleets {
        let child_path = resolve_relative(&fleet_dir, &child_ref.path);
        let canonical = canonicalize(&child_path);

        if visited.contains(&canonical) {
            let mut chain: Vec<PathBuf> = visited.clone();
            chain.push(canonical);
            return Err(ConfigError::FleetCycle { chain });
        }

        let child_value = read_yaml(&child_path, env)?;
        let mut child_value = child_value;
        let name = resolve_child_name(child_ref, &child_value, &child_path)?;
        validate_agent_name(&name).map_err(|InvalidAgentName { name }| {
            ConfigError::InvalidFleetName {
                name,
                path: child_path.clone(),
            }
        })?;

        if let Some(first) = seen_names.get(&name) {
            return Err(ConfigError::FleetNameCollision {
                name,
                first: first.clone(),
                second: child_path.clone(),
            });
        }
        seen_names.insert(name.clone(), child_path.clone());

        // Step 4: overrides deep-merged in before recursing; web stripped
        // unless the reference's overrides explicitly set it.
        strip_web_unless_overridden(&mut child_value, &child_ref.overrides);
        let merged_value = deep_merge(&child_value, &child_ref.overrides);
        let child_fleet: RootConfig = deserialize(&merged_value, &child_path)?;

        // Step 5: defaults merging.
        let child_defaults = deep_merge(&effective_defaults, &child_fleet.defaults);

        let mut child_fleet_path = fleet_path.to_vec();
        child_fleet_path.push(name);

        visited.push(canonical);
        tracing::debug!(fleet = %child_path.display(), "descending into sub-fleet");
        descend(
            &child_path,
            &child_fleet,
            child_defaults,
            &child_fleet_path,
            env,
            visited,
            agents,
            agent_names,
        )
        .map_err(|source| ConfigError::FleetLoad {
            path: child_path.clone(),
            source: Box::new(source),
        })?;
        visited.pop();
    }

    for agent_ref in &fleet.agents {
        let agent_path = resolve_relative(&fleet_dir, &agent_ref.path);
        let agent = load_agent(&agent_path, &agent_ref.overrides, &effective_defaults, fleet_path, env)
            .map_err(|source| ConfigError::AgentLoad {
                path: agent_path.clone(),
                source: Box::new(source),
            })?;

        if let Some(first) = agent_names.get(&agent.qualified_name) {
            return Err(ConfigError::AgentNameCollision {
                name: agent.qualified_name.clone(),
                first: first.clone(),
                second: agent_path.clone(),
            });
        }
        agent_names.insert(agent.qualified_name.clone(), agent_path.clone());

        agents.push(agent);
    }

    Ok(())
}

fn load_agent(
    agent_path: &Path,
    overrides: &serde_yaml::Value,
    effective_defaults: &serde_yaml::Value,
    fleet_path: &[String],
    env: &HashMap<String, String>,
) -> Result<Agent, ConfigError> {
    let raw_value = read_yaml(agent_path, env)?;
    // agent-file config <- defaults as gap-filler <- per-agent overrides
    let with_defaults = deep_merge(effective_defaults, &raw_value);
    let merged_value = deep_merge(&with_defaults, overrides);
    let file: AgentFile = deserialize(&merged_value, agent_path)?;

    validate_agent_name(&file.name).map_err(|InvalidAgentName { name }| {
        ConfigError::InvalidFleetName {
            name,
            path: agent_path.to_path_buf(),
        }
    })?;

    let agent_dir = agent_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let working_directory = match &file.working_directory {
        Some(raw) => {
            let p = PathBuf::from(raw);
            if p.is_absolute() {
                p
            } else {
                agent_dir.join(p)
            }
        }
        None => agent_dir.clone(),
    };

    if let Some(docker) = &file.docker {
        docker
            .parsed_volumes()
            .map_err(|source| ConfigError::InvalidVolume {
                path: agent_path.to_path_buf(),
                source,
            })?;
        if let Some(memory) = &docker.memory {
            herd_core::parse_memory_to_bytes(memory).map_err(|source| {
                ConfigError::InvalidMemory {
                    path: agent_path.to_path_buf(),
                    source,
                }
            })?;
        }
        if let Some(user) = &docker.user {
            user.parse::<herd_core::DockerUser>()
                .map_err(|source| ConfigError::InvalidUser {
                    path: agent_path.to_path_buf(),
                    source,
                })?;
        }
    }

    let name = file.name.clone();
    Ok(Agent {
        qualified_name: qualified_name(fleet_path, &name),
        name,
        fleet_path: fleet_path.to_vec(),
        description: file.description,
        model: file.model,
        prompt: file.prompt,
        working_directory,
        permission_mode: file.permission_mode,
        allowed_tools: file.allowed_tools,
        denied_tools: file.denied_tools,
        max_concurrent: file.max_concurrent.unwrap_or(1),
        schedules: file.schedules,
        chat: file.chat,
        runtime: file.runtime,
        docker: file.docker,
        config_path: agent_path.to_path_buf(),
    })
}

/// Name resolution order: reference's explicit `name`, else the sub-fleet's
/// own `fleet.name`, else the directory basename of the sub-fleet file.
fn resolve_child_name(
    child_ref: &FleetRef,
    child_value: &serde_yaml::Value,
    child_path: &Path,
) -> Result<String, ConfigError> {
    if let Some(name) = &child_ref.name {
        return Ok(name.clone());
    }
    if let Some(name) = child_value
        .get("fleet")
        .and_then(|f| f.get("name"))
        .and_then(|n| n.as_str())
    {
        return Ok(name.to_string());
    }
    child_path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| ConfigError::InvalidFleetName {
            name: String::new(),
            path: child_path.to_path_buf(),
        })
}

fn resolve_relative(base: &Path, relative: &str) -> PathBuf {
    let candidate = PathBuf::from(relative);
    if candidate.is_absolute() {
        candidate
    } else {
        base.join(candidate)
    }
}

fn canonicalize(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn read_yaml(path: &Path, env: &HashMap<String, String>) -> Result<serde_yaml::Value, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut value: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|err| ConfigError::SchemaValidation {
            path: path.to_path_buf(),
            issues: vec![err.to_string()],
        })?;
    interpolate_value(&mut value, env);
    Ok(value)
}

fn deserialize<T: serde::de::DeserializeOwned>(
    value: &serde_yaml::Value,
    path: &Path,
) -> Result<T, ConfigError> {
    serde_yaml::from_value(value.clone()).map_err(|err| ConfigError::SchemaValidation {
        path: path.to_path_buf(),
        issues: vec![err.to_string()],
    })
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
