//! Tools for loading request sets from YAML files.

use std::path::{Path, PathBuf};

use mrprov_cloud::user_class::UserClass;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    request::{Job, Request, RequestError},
    task::{SimpleTask, Task},
};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("can't read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("can't parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid request {id}: {source}")]
    Request {
        id: u64,
        #[source]
        source: RequestError,
    },
}

/// Struct representing [SimpleTask], see parameter description there.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct YamlTask {
    pub length: f64,
    #[serde(default)]
    pub data_size: f64,
}

/// Struct representing [Request].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct YamlRequest {
    pub id: u64,
    #[serde(default)]
    pub user_class: UserClass,
    /// Deadline in seconds.
    pub deadline: f64,
    pub map_tasks: Vec<YamlTask>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reduce_tasks: Vec<YamlTask>,
}

impl YamlRequest {
    /// Builds a [Request]. Map tasks get ids `0..m`, reduce tasks continue with `m..m + r`.
    pub fn to_request(&self) -> Result<Request, RequestError> {
        let tasks = |tasks: &[YamlTask], first_id: usize| -> Vec<Box<dyn Task>> {
            tasks
                .iter()
                .enumerate()
                .map(|(i, task)| {
                    Box::new(SimpleTask::new((first_id + i) as u64, task.length, task.data_size)) as Box<dyn Task>
                })
                .collect()
        };
        let job = Job::new(
            tasks(&self.map_tasks, 0),
            tasks(&self.reduce_tasks, self.map_tasks.len()),
        )?;
        Request::new(self.id, self.user_class, self.deadline, job)
    }
}

/// YAML representation of a set of requests.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct YamlRequestSet {
    #[serde(default)]
    pub requests: Vec<YamlRequest>,
}

impl YamlRequestSet {
    /// Read [YamlRequestSet] from YAML file and check that every request is valid.
    pub fn from_yaml<P: AsRef<Path>>(file: P) -> Result<Self, ParseError> {
        let content = std::fs::read_to_string(&file).map_err(|source| ParseError::Io {
            path: file.as_ref().to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ParseError> {
        let set: YamlRequestSet = serde_yaml::from_str(content)?;
        for request in set.requests.iter() {
            request
                .to_request()
                .map_err(|source| ParseError::Request { id: request.id, source })?;
        }
        Ok(set)
    }

    /// Builds all requests.
    pub fn to_requests(&self) -> Result<Vec<Request>, ParseError> {
        self.requests
            .iter()
            .map(|request| {
                request
                    .to_request()
                    .map_err(|source| ParseError::Request { id: request.id, source })
            })
            .collect()
    }
}
