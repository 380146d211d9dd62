// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;

use crate::id::Oid;
use crate::meta::Meta;
use crate::otype::Otype;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a spawned remote command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Running,
    Done,
    Error,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobExitInfo {
    #[serde(default)]
    pub exit_code: Option<i32>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub exited_ts: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub oid: Oid,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub meta: Meta,
    pub connection_name: String,
    pub cmd: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default)]
    pub pid: Option<u32>,
    #[serde(default)]
    pub exit_info: Option<JobExitInfo>,
    pub status: JobStatus,
}

impl Job {
    pub fn new(connection_name: String, cmd: String) -> Self {
        Self {
            oid: Oid::new(),
            version: 0,
            meta: Meta::default(),
            connection_name,
            cmd,
            args: Vec::new(),
            env: HashMap::new(),
            pid: None,
            exit_info: None,
            status: JobStatus::Running,
        }
    }
}

super::impl_header!(Job, Otype::Job);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_job_starts_running_with_no_exit_info() {
        let job = Job::new("mybox".into(), "ls".into());
        assert_eq!(job.status, JobStatus::Running);
        assert!(job.exit_info.is_none());
        assert!(job.pid.is_none());
    }
}
