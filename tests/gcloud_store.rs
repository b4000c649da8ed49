//! Secret Manager store tests against a scripted gcloud.
//!
//! A shell script stands in for the gcloud CLI. It keeps one directory per
//! secret and one file per version, answers with the JSON gcloud prints, and
//! reports failures on stderr the way gcloud does. Marker files in the state
//! directory switch on failure modes:
//! - `deny`: every describe is a permission error
//! - `hide-once`: the next describe answers NOT_FOUND
//! - `hang`: every call sleeps in a child process

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use kloak::error::{Operation, RemoteError};
use kloak::{Cancel, Context, Error, GcloudStore, Lookup, RemoteStore, SecretHandle, Synchronizer};
use tempfile::TempDir;

const SCRIPT: &str = r#"#!/bin/sh
STATE="__STATE__"
[ "$1" = "--quiet" ] && shift
echo "$*" >> "$STATE/calls"
if [ -f "$STATE/hang" ]; then
  sleep 30
  exit 1
fi
case "$1 $2" in
"secrets describe")
  if [ -f "$STATE/deny" ]; then
    echo "ERROR: (gcloud.secrets.describe) PERMISSION_DENIED: Permission 'secretmanager.secrets.get' denied for resource '$3' (or it may not exist)." >&2
    exit 1
  fi
  id=${3##*/}
  if [ -f "$STATE/hide-once" ] || [ ! -d "$STATE/secrets/$id" ]; then
    rm -f "$STATE/hide-once"
    echo "ERROR: (gcloud.secrets.describe) NOT_FOUND: Secret [$3] not found or has no versions." >&2
    exit 1
  fi
  printf '{"name": "%s", "labels": {"managed-by": "kloak"}, "replication": {"automatic": {}}}\n' "$3"
  ;;
"secrets create")
  if [ -d "$STATE/secrets/$3" ]; then
    echo "ERROR: (gcloud.secrets.create) ALREADY_EXISTS: Secret [projects/$5/secrets/$3] already exists." >&2
    exit 1
  fi
  mkdir -p "$STATE/secrets/$3"
  printf '{"name": "projects/%s/secrets/%s"}\n' "$5" "$3"
  ;;
"secrets versions")
  case "$3" in
  add)
    id=${4##*/}
    n=$(ls "$STATE/secrets/$id" | wc -l)
    n=$((n + 1))
    cat > "$STATE/secrets/$id/$n"
    printf '{"name": "%s/versions/%s"}\n' "$4" "$n"
    ;;
  access)
    rest=${4%/versions/*}
    id=${rest##*/}
    latest=$(ls "$STATE/secrets/$id" 2>/dev/null | sort -n | tail -n 1)
    if [ -z "$latest" ]; then
      echo "ERROR: (gcloud.secrets.versions.access) NOT_FOUND: Secret Version [$4] not found." >&2
      exit 1
    fi
    data=$(base64 < "$STATE/secrets/$id/$latest" | tr -d '\n')
    printf '{"name": "%s", "payload": {"data": "%s"}}\n' "$4" "$data"
    ;;
  esac
  ;;
*)
  echo "ERROR: (gcloud) unexpected arguments: $*" >&2
  exit 2
  ;;
esac
"#;

/// A fake gcloud installation with its own state directory.
struct FakeGcloud {
    dir: TempDir,
}

impl FakeGcloud {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("secrets")).unwrap();

        let script = SCRIPT.replace("__STATE__", dir.path().to_str().unwrap());
        let bin = dir.path().join("gcloud");
        fs::write(&bin, script).unwrap();
        fs::set_permissions(&bin, fs::Permissions::from_mode(0o755)).unwrap();
        Self { dir }
    }

    fn bin(&self) -> PathBuf {
        self.dir.path().join("gcloud")
    }

    fn state(&self) -> &Path {
        self.dir.path()
    }

    fn mark(&self, marker: &str) {
        fs::write(self.state().join(marker), "").unwrap();
    }

    fn create_remote(&self, handle: &SecretHandle) {
        fs::create_dir(self.state().join("secrets").join(handle.remote_name())).unwrap();
    }

    /// Subcommands seen so far, e.g. `secrets describe`.
    fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.state().join("calls"))
            .unwrap_or_default()
            .lines()
            .map(|line| {
                let words: Vec<&str> = line.split_whitespace().collect();
                match words.as_slice() {
                    ["secrets", "versions", op, ..] => format!("secrets versions {}", op),
                    [group, op, ..] => format!("{} {}", group, op),
                    _ => line.to_string(),
                }
            })
            .collect()
    }

    fn raw_calls(&self) -> String {
        fs::read_to_string(self.state().join("calls")).unwrap_or_default()
    }

    fn synchronizer(&self) -> Synchronizer<GcloudStore> {
        Synchronizer::new(
            GcloudStore::new(self.bin().to_str().unwrap()),
            Context::with_project("kloak-test"),
        )
    }
}

fn cancel() -> Cancel {
    Cancel::with_timeout(Duration::from_secs(20))
}

#[test]
fn test_exists_set_unveil_roundtrip() {
    let gcloud = FakeGcloud::new();
    let sync = gcloud.synchronizer();
    let handle = SecretHandle::new("database", "password");

    assert!(!sync.exists(&handle, &cancel()).unwrap());

    let version = sync.set(&handle, b"first\n\x00binary", &cancel()).unwrap();
    assert_eq!(version.version(), "1");
    assert!(sync.exists(&handle, &cancel()).unwrap());
    assert_eq!(
        &*sync.unveil(&handle, &cancel()).unwrap(),
        b"first\n\x00binary"
    );

    let version = sync.set(&handle, b"second", &cancel()).unwrap();
    assert_eq!(version.version(), "2");
    assert_eq!(&*sync.unveil(&handle, &cancel()).unwrap(), b"second");
}

#[test]
fn test_set_sequence_and_arguments() {
    let gcloud = FakeGcloud::new();
    let sync = gcloud.synchronizer();
    let handle = SecretHandle::new("database", "password");

    sync.set(&handle, b"hunter2", &cancel()).unwrap();

    assert_eq!(
        gcloud.calls(),
        vec![
            "secrets describe",
            "secrets create",
            "secrets versions add",
        ]
    );
    let raw = gcloud.raw_calls();
    let remote = handle.remote_name();
    assert!(raw.contains(&format!("secrets describe projects/kloak-test/secrets/{}", remote)));
    assert!(raw.contains(&format!("secrets create {} --project kloak-test", remote)));
    assert!(raw.contains("--labels kloak-schema=v1,managed-by=kloak"));
    assert!(raw.contains("--data-file=-"));
    assert!(raw.lines().all(|line| line.ends_with("--format=json")));
    // payload travels on stdin only
    assert!(!raw.contains("hunter2"));

    let stored = gcloud.state().join("secrets").join(&remote).join("1");
    assert_eq!(fs::read(stored).unwrap(), b"hunter2");
}

#[test]
fn test_set_existing_skips_create() {
    let gcloud = FakeGcloud::new();
    let sync = gcloud.synchronizer();
    let handle = SecretHandle::new("api", "token");
    gcloud.create_remote(&handle);

    sync.set(&handle, b"abc", &cancel()).unwrap();
    assert_eq!(
        gcloud.calls(),
        vec!["secrets describe", "secrets versions add"]
    );
}

#[test]
fn test_create_race_appends_to_existing() {
    let gcloud = FakeGcloud::new();
    let sync = gcloud.synchronizer();
    let handle = SecretHandle::new("api", "token");
    gcloud.create_remote(&handle);
    gcloud.mark("hide-once");

    sync.set(&handle, b"raced", &cancel()).unwrap();

    assert_eq!(
        gcloud.calls(),
        vec![
            "secrets describe",
            "secrets create",
            "secrets describe",
            "secrets versions add",
        ]
    );
    assert_eq!(&*sync.unveil(&handle, &cancel()).unwrap(), b"raced");
}

#[test]
fn test_unveil_missing_is_not_found() {
    let gcloud = FakeGcloud::new();
    let sync = gcloud.synchronizer();
    let handle = SecretHandle::new("api", "token");

    assert!(matches!(
        sync.unveil(&handle, &cancel()),
        Err(Error::NotFound { .. })
    ));

    // container without versions
    gcloud.create_remote(&handle);
    assert!(matches!(
        sync.unveil(&handle, &cancel()),
        Err(Error::NotFound { .. })
    ));
}

#[test]
fn test_permission_denied_is_not_absence() {
    let gcloud = FakeGcloud::new();
    let sync = gcloud.synchronizer();
    let handle = SecretHandle::new("api", "token");
    gcloud.mark("deny");

    let err = sync.exists(&handle, &cancel()).unwrap_err();
    assert!(matches!(
        err,
        Error::Sync {
            op: Operation::Lookup,
            source: RemoteError::PermissionDenied(_),
            ..
        }
    ));

    let err = sync.set(&handle, b"x", &cancel()).unwrap_err();
    assert!(matches!(err, Error::Sync { op: Operation::Lookup, .. }));
    assert_eq!(gcloud.calls(), vec!["secrets describe", "secrets describe"]);
}

#[test]
fn test_deadline_kills_whole_gcloud_process_tree() {
    let gcloud = FakeGcloud::new();
    gcloud.mark("hang");
    let store = GcloudStore::new(gcloud.bin().to_str().unwrap());

    let started = Instant::now();
    let lookup = store.get(
        "projects/kloak-test/secrets/s",
        &Cancel::with_timeout(Duration::from_secs(1)),
    );
    let elapsed = started.elapsed();

    assert_eq!(lookup, Lookup::Failure(RemoteError::DeadlineExceeded));
    assert!(elapsed < Duration::from_secs(10), "took {:?}", elapsed);
}

#[test]
fn test_cancel_from_another_thread() {
    let gcloud = FakeGcloud::new();
    gcloud.mark("hang");
    let sync = gcloud.synchronizer();
    let handle = SecretHandle::new("api", "token");

    let cancel = Cancel::never();
    let trigger = cancel.clone();
    let canceller = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(300));
        trigger.cancel();
    });

    let started = Instant::now();
    let err = sync.set(&handle, b"x", &cancel).unwrap_err();
    canceller.join().unwrap();

    assert!(matches!(
        err,
        Error::Sync {
            source: RemoteError::Cancelled,
            ..
        }
    ));
    assert!(started.elapsed() < Duration::from_secs(10));
}
