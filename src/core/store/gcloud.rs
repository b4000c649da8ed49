//! Google Cloud Secret Manager store.
//!
//! Talks to Secret Manager through the gcloud CLI with JSON output.
//!
//! ## Requirements
//!
//! - `gcloud` CLI must be installed and authenticated
//! - The caller needs `secretmanager.secrets.get`, `secretmanager.secrets.create`,
//!   `secretmanager.versions.add` and `secretmanager.versions.access`
//!
//! Payloads are passed on stdin (`--data-file=-`) and never appear on the
//! command line.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use ::base64::Engine;
use serde::Deserialize;
use tracing::{debug, trace};
use zeroize::Zeroizing;

use super::RemoteStore;
use crate::core::cancel::Cancel;
use crate::core::domain::{Labels, Lookup, SecretRecord, VersionRef};
use crate::error::RemoteError;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Secret Manager store backed by the gcloud CLI.
#[derive(Debug, Clone)]
pub struct GcloudStore {
    gcloud: String,
}

#[derive(Deserialize)]
struct SecretJson {
    name: String,
    #[serde(default)]
    labels: Labels,
}

#[derive(Deserialize)]
struct VersionJson {
    name: String,
}

#[derive(Deserialize)]
struct AccessJson {
    payload: PayloadJson,
}

#[derive(Deserialize)]
struct PayloadJson {
    #[serde(default)]
    data: String,
}

impl GcloudStore {
    /// Create a store invoking `gcloud` (a binary name or path).
    pub fn new(gcloud: impl Into<String>) -> Self {
        Self {
            gcloud: gcloud.into(),
        }
    }

    fn binary(&self) -> Result<PathBuf, RemoteError> {
        which::which(&self.gcloud).map_err(|_| {
            RemoteError::Backend(format!(
                "{} not found. Install it from https://cloud.google.com/sdk/docs/install",
                self.gcloud
            ))
        })
    }

    /// Run gcloud with `args`, optionally feeding `input` on stdin.
    ///
    /// Returns stdout on success. gcloud runs in its own process group, and
    /// the whole group is killed if `cancel` fires before it exits.
    fn run(
        &self,
        args: &[&str],
        input: Option<&[u8]>,
        cancel: &Cancel,
    ) -> Result<Vec<u8>, RemoteError> {
        cancel.check()?;
        let bin = self.binary()?;

        trace!(?args, "running gcloud");
        let mut command = Command::new(bin);
        command
            .arg("--quiet")
            .args(args)
            .arg("--format=json")
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // the gcloud launcher is a wrapper script around a python worker
            command.process_group(0);
        }

        let mut child = command
            .spawn()
            .map_err(|e| RemoteError::Backend(format!("failed to spawn gcloud: {}", e)))?;

        let writer = match (child.stdin.take(), input) {
            (Some(mut pipe), Some(data)) => {
                let data = Zeroizing::new(data.to_vec());
                Some(thread::spawn(move || pipe.write_all(&data)))
            }
            _ => None,
        };
        let out = drain(child.stdout.take());
        let err = drain(child.stderr.take());

        // on cancel the pipe threads are left to finish once the pipes close
        let status = wait(&mut child, cancel)?;

        if let Some(writer) = writer {
            // a child that exits early leaves a broken pipe; the status decides
            let _ = writer.join();
        }
        let stdout = out
            .join()
            .map_err(|_| RemoteError::Backend("stdout reader panicked".into()))?;
        let stderr = err
            .join()
            .map_err(|_| RemoteError::Backend("stderr reader panicked".into()))?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            debug!(code = ?status.code(), "gcloud failed");
            return Err(classify(&stderr));
        }
        Ok(stdout)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

fn wait(child: &mut Child, cancel: &Cancel) -> Result<ExitStatus, RemoteError> {
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if let Err(e) = cancel.check() {
                    debug!(pid = child.id(), "cancelling gcloud");
                    terminate(child);
                    return Err(e);
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => return Err(RemoteError::Backend(format!("gcloud wait failed: {}", e))),
        }
    }
}

/// Kill the child and everything it started, then reap it.
fn terminate(child: &mut Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Err(e) = killpg(Pid::from_raw(child.id() as i32), Signal::SIGKILL) {
            debug!(error = %e, "killing gcloud process group failed");
        }
    }
    let _ = child.kill();
    let _ = child.wait();
}

/// Map gcloud's stderr onto a `RemoteError` kind.
///
/// Permission errors are checked first: Secret Manager words them as
/// "denied ... (or it may not exist)", which must not read as absence.
fn classify(stderr: &str) -> RemoteError {
    let message = stderr.trim().to_string();
    let lower = message.to_ascii_lowercase();

    if lower.contains("permission_denied")
        || lower.contains("permission denied")
        || (lower.contains("permission") && lower.contains("denied"))
    {
        RemoteError::PermissionDenied(message)
    } else if lower.contains("already_exists") || lower.contains("already exists") {
        RemoteError::AlreadyExists(message)
    } else if lower.contains("not_found") || lower.contains("not found") {
        RemoteError::NotFound(message)
    } else if lower.contains("unavailable")
        || lower.contains("deadline_exceeded")
        || lower.contains("connection")
    {
        RemoteError::Unavailable(message)
    } else {
        RemoteError::Backend(message)
    }
}

fn parse<T: for<'de> Deserialize<'de>>(stdout: &[u8]) -> Result<T, RemoteError> {
    serde_json::from_slice(stdout).map_err(|e| RemoteError::Malformed(e.to_string()))
}

fn decode_payload(data: &str) -> Result<Vec<u8>, RemoteError> {
    use ::base64::engine::general_purpose::{STANDARD, URL_SAFE};

    STANDARD
        .decode(data)
        .or_else(|_| URL_SAFE.decode(data))
        .map_err(|e| RemoteError::Malformed(format!("invalid base64 payload: {}", e)))
}

fn format_labels(labels: &Labels) -> String {
    labels
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(",")
}

impl RemoteStore for GcloudStore {
    fn get(&self, secret_path: &str, cancel: &Cancel) -> Lookup {
        let result = self
            .run(&["secrets", "describe", secret_path], None, cancel)
            .and_then(|out| parse::<SecretJson>(&out))
            .map(|json| SecretRecord {
                name: json.name,
                labels: json.labels,
            });
        Lookup::from_result(result)
    }

    fn create(
        &self,
        parent: &str,
        secret_id: &str,
        labels: &Labels,
        cancel: &Cancel,
    ) -> Result<SecretRecord, RemoteError> {
        let project = parent
            .strip_prefix("projects/")
            .filter(|p| !p.is_empty() && !p.contains('/'))
            .ok_or_else(|| RemoteError::Malformed(format!("invalid parent: {}", parent)))?;

        let label_arg = format_labels(labels);
        let mut args = vec!["secrets", "create", secret_id, "--project", project];
        if !label_arg.is_empty() {
            args.extend(["--labels", label_arg.as_str()]);
        }

        let out = self.run(&args, None, cancel)?;
        // older gcloud releases print nothing on create
        if out.iter().all(u8::is_ascii_whitespace) {
            return Ok(SecretRecord {
                name: format!("{}/secrets/{}", parent, secret_id),
                labels: labels.clone(),
            });
        }
        let json: SecretJson = parse(&out)?;
        Ok(SecretRecord {
            name: json.name,
            labels: json.labels,
        })
    }

    fn add_version(
        &self,
        record: &SecretRecord,
        payload: &[u8],
        cancel: &Cancel,
    ) -> Result<VersionRef, RemoteError> {
        trace!(secret = %record.name, payload_len = payload.len(), "adding version");
        let out = self.run(
            &["secrets", "versions", "add", &record.name, "--data-file=-"],
            Some(payload),
            cancel,
        )?;
        let json: VersionJson = parse(&out)?;
        Ok(VersionRef { name: json.name })
    }

    fn access_version(
        &self,
        version_path: &str,
        cancel: &Cancel,
    ) -> Result<Vec<u8>, RemoteError> {
        let out = self.run(&["secrets", "versions", "access", version_path], None, cancel)?;
        let json: AccessJson = parse(&out)?;
        decode_payload(&json.payload.data)
    }

    fn name(&self) -> &'static str {
        "gcloud"
    }
}
