// Docker delegation via the docker CLI

use crate::command_runner::{self, CommandError, CommandOutput};
use crate::models::{
    ContainerListResponse, ContainerRecord, ImageListResponse, ImageRecord, SearchRecord,
    SearchResponse,
};
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

const DOCKER_TIMEOUT: Duration = Duration::from_secs(15);

/// Adapter over the `docker` CLI using its structured `--format
/// '{{json .}}'` output. A missing binary or an unreachable daemon is
/// reported in-band; an unparseable output line is logged and skipped,
/// never silently folded into the listing.
pub struct DockerRepo {
    binary: String,
}

impl Default for DockerRepo {
    fn default() -> Self {
        Self::new()
    }
}

// Raw shapes as the CLI emits them (one JSON object per line).
#[derive(Debug, Deserialize)]
struct RawContainer {
    #[serde(rename = "ID", default)]
    id: String,
    #[serde(rename = "Image", default)]
    image: String,
    #[serde(rename = "Names", default)]
    names: String,
    #[serde(rename = "Status", default)]
    status: String,
    #[serde(rename = "State", default)]
    state: String,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    #[serde(rename = "ID", default)]
    id: String,
    #[serde(rename = "Repository", default)]
    repository: String,
    #[serde(rename = "Tag", default)]
    tag: String,
    #[serde(rename = "Size", default)]
    size: String,
}

#[derive(Debug, Deserialize)]
struct RawSearch {
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "StarCount", default)]
    star_count: String,
    #[serde(rename = "IsOfficial", default)]
    is_official: String,
}

impl DockerRepo {
    pub fn new() -> Self {
        Self {
            binary: "docker".into(),
        }
    }

    /// Overrides the CLI binary name (tests point this at a nonexistent
    /// executable to exercise degradation).
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub async fn list_containers(&self, all: bool) -> ContainerListResponse {
        let mut args = vec!["ps", "--format", "{{json .}}"];
        if all {
            args.push("-a");
        }
        match self.run(&args).await {
            Ok(out) if out.success => ContainerListResponse {
                docker_installed: true,
                daemon_running: true,
                containers: parse_json_lines::<RawContainer>(&out.output)
                    .into_iter()
                    .map(|raw| ContainerRecord {
                        id: raw.id,
                        image: raw.image,
                        name: raw.names,
                        status: raw.status,
                        state: raw.state,
                    })
                    .collect(),
                message: String::new(),
            },
            Ok(out) => ContainerListResponse {
                docker_installed: true,
                daemon_running: false,
                containers: vec![],
                message: daemon_message(&out),
            },
            Err(e) => ContainerListResponse {
                docker_installed: !matches!(e, CommandError::ToolMissing(_)),
                daemon_running: false,
                containers: vec![],
                message: e.to_string(),
            },
        }
    }

    pub async fn list_images(&self) -> ImageListResponse {
        match self.run(&["images", "--format", "{{json .}}"]).await {
            Ok(out) if out.success => ImageListResponse {
                docker_installed: true,
                daemon_running: true,
                images: parse_json_lines::<RawImage>(&out.output)
                    .into_iter()
                    .map(|raw| ImageRecord {
                        id: raw.id,
                        repository: raw.repository,
                        tag: raw.tag,
                        size: raw.size,
                    })
                    .collect(),
                message: String::new(),
            },
            Ok(out) => ImageListResponse {
                docker_installed: true,
                daemon_running: false,
                images: vec![],
                message: daemon_message(&out),
            },
            Err(e) => ImageListResponse {
                docker_installed: !matches!(e, CommandError::ToolMissing(_)),
                daemon_running: false,
                images: vec![],
                message: e.to_string(),
            },
        }
    }

    pub async fn search(&self, term: &str) -> SearchResponse {
        match self
            .run(&["search", "--format", "{{json .}}", "--limit", "25", term])
            .await
        {
            Ok(out) if out.success => SearchResponse {
                docker_installed: true,
                results: parse_json_lines::<RawSearch>(&out.output)
                    .into_iter()
                    .map(|raw| SearchRecord {
                        name: raw.name,
                        description: raw.description,
                        stars: raw.star_count.trim().parse().unwrap_or(0),
                        official: raw.is_official.contains("OK") || raw.is_official == "true",
                    })
                    .collect(),
                message: String::new(),
            },
            Ok(out) => SearchResponse {
                docker_installed: true,
                results: vec![],
                message: daemon_message(&out),
            },
            Err(e) => SearchResponse {
                docker_installed: !matches!(e, CommandError::ToolMissing(_)),
                results: vec![],
                message: e.to_string(),
            },
        }
    }

    /// Container lifecycle actions ("start", "stop", "rm").
    pub async fn container_action(
        &self,
        action: &str,
        id: &str,
    ) -> Result<CommandOutput, CommandError> {
        self.run(&[action, id]).await
    }

    async fn run(&self, args: &[&str]) -> Result<CommandOutput, CommandError> {
        command_runner::run(&self.binary, args, DOCKER_TIMEOUT).await
    }
}

fn daemon_message(out: &CommandOutput) -> String {
    let text = out.output.trim();
    if text.is_empty() {
        "docker command failed".into()
    } else {
        text.lines().next().unwrap_or(text).to_string()
    }
}

/// One JSON object per line; a bad line is an adapter error for that line,
/// logged and skipped.
fn parse_json_lines<T: serde::de::DeserializeOwned>(output: &str) -> Vec<T> {
    output
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|line| match serde_json::from_str::<T>(line) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(error = %e, line, "unparseable docker output line");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_container_lines() {
        let output = concat!(
            r#"{"ID":"abc123","Image":"nginx:latest","Names":"web","Status":"Up 2 hours","State":"running"}"#,
            "\n",
            r#"{"ID":"def456","Image":"redis:7","Names":"cache","Status":"Exited (0)","State":"exited"}"#,
            "\n",
        );
        let rows: Vec<RawContainer> = parse_json_lines(output);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "abc123");
        assert_eq!(rows[1].state, "exited");
    }

    #[test]
    fn test_unparseable_line_skipped_not_fatal() {
        let output = concat!(
            r#"{"ID":"abc123","Image":"nginx","Names":"web","Status":"Up","State":"running"}"#,
            "\n",
            "this is not json\n",
            r#"{"ID":"def456","Image":"redis","Names":"cache","Status":"Up","State":"running"}"#,
            "\n",
        );
        let rows: Vec<RawContainer> = parse_json_lines(output);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_parse_search_lines() {
        let output =
            r#"{"Name":"nginx","Description":"Web server","StarCount":"19000","IsOfficial":"[OK]"}"#;
        let rows: Vec<RawSearch> = parse_json_lines(output);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].star_count, "19000");
        assert!(rows[0].is_official.contains("OK"));
    }
}
