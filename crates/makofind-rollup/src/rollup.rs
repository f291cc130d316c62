//! Account usage accumulation and Prometheus rendering.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use tracing::trace;

use makofind_core::Entry;
use makofind_walk::{Flow, Reporter, Visitor, apply_policy};

use crate::account::account_of;

/// Configuration for a rollup.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct RollupConfig {
    /// Tree to roll up; accounts are the directories directly below it.
    #[builder(default = "PathBuf::from(\"/manta\")")]
    #[serde(default = "default_base")]
    pub base: PathBuf,

    /// Prefix for every metric name (e.g. `mako_`).
    #[builder(default)]
    #[serde(default)]
    pub metric_prefix: String,
}

fn default_base() -> PathBuf {
    PathBuf::from("/manta")
}

impl RollupConfig {
    /// Create a new rollup config builder.
    pub fn builder() -> RollupConfigBuilder {
        RollupConfigBuilder::default()
    }
}

impl Default for RollupConfig {
    fn default() -> Self {
        Self {
            base: default_base(),
            metric_prefix: String::new(),
        }
    }
}

/// Logical bytes and object count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub bytes: u64,
    pub objects: u64,
}

impl Usage {
    fn add(&mut self, size: u64) {
        self.bytes = self.bytes.saturating_add(size);
        self.objects += 1;
    }
}

/// Usage of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUsage {
    pub account: CompactString,
    #[serde(flatten)]
    pub usage: Usage,
}

/// Sums regular-file sizes per account while walking.
///
/// Non-file entries go through the same error policy as the manifest.
#[derive(Debug)]
pub struct RollupVisitor {
    base: PathBuf,
    accounts: BTreeMap<CompactString, Usage>,
    unattributed: Usage,
}

impl RollupVisitor {
    pub fn new(config: &RollupConfig) -> Self {
        Self {
            base: config.base.clone(),
            accounts: BTreeMap::new(),
            unattributed: Usage::default(),
        }
    }

    /// Usage recorded so far for an account.
    pub fn usage(&self, account: &str) -> Option<Usage> {
        self.accounts.get(account).copied()
    }

    /// Finish the rollup.
    pub fn into_report(self, duration: Duration, finished_at: DateTime<Utc>) -> RollupReport {
        RollupReport {
            accounts: self
                .accounts
                .into_iter()
                .map(|(account, usage)| AccountUsage { account, usage })
                .collect(),
            unattributed: self.unattributed,
            duration_seconds: duration.as_secs(),
            last_run_time: finished_at.timestamp(),
        }
    }
}

impl Visitor for RollupVisitor {
    fn visit<E: Write>(&mut self, entry: &Entry, reporter: &mut Reporter<E>) -> Flow {
        let Some(stat) = entry.stat.filter(|_| entry.is_file()) else {
            return apply_policy(entry, reporter);
        };

        match account_of(&self.base, &entry.path) {
            Some(account) => {
                let account = CompactString::new(account.to_string_lossy());
                self.accounts.entry(account).or_default().add(stat.size);
            }
            None => {
                trace!(path = %entry.path.display(), "object outside any account");
                self.unattributed.add(stat.size);
            }
        }
        Flow::Continue
    }
}

/// Finished rollup, sorted by account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollupReport {
    pub accounts: Vec<AccountUsage>,
    /// Objects that did not belong to any account.
    pub unattributed: Usage,
    pub duration_seconds: u64,
    /// Unix timestamp of when the rollup finished.
    pub last_run_time: i64,
}

impl RollupReport {
    /// Total usage over all accounts (unattributed objects excluded).
    pub fn total(&self) -> Usage {
        self.accounts.iter().fold(Usage::default(), |mut acc, a| {
            acc.bytes = acc.bytes.saturating_add(a.usage.bytes);
            acc.objects += a.usage.objects;
            acc
        })
    }

    /// Per-account usage in output order, followed by unattributed usage
    /// under the empty account label when there is any.
    fn labelled(&self) -> impl Iterator<Item = (&str, Usage)> {
        let unattributed = (self.unattributed.objects > 0).then_some(("", self.unattributed));
        self.accounts
            .iter()
            .map(|a| (a.account.as_str(), a.usage))
            .chain(unattributed)
    }

    /// Render as Prometheus text exposition format.
    pub fn to_prometheus(&self, prefix: &str) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "# HELP {prefix}used_bytes The current number of bytes used on a mako");
        let _ = writeln!(out, "# TYPE {prefix}used_bytes gauge");
        for (account, usage) in self.labelled() {
            let _ = writeln!(
                out,
                "{prefix}used_bytes{{account=\"{}\"}} {}",
                escape_label(account),
                usage.bytes
            );
        }

        let _ = writeln!(out, "# HELP {prefix}object_count The current number of objects on a mako");
        let _ = writeln!(out, "# TYPE {prefix}object_count gauge");
        for (account, usage) in self.labelled() {
            let _ = writeln!(
                out,
                "{prefix}object_count{{account=\"{}\"}} {}",
                escape_label(account),
                usage.objects
            );
        }

        let _ = writeln!(
            out,
            "# HELP {prefix}rollup_duration_seconds Duration in seconds of the mako rollup process"
        );
        let _ = writeln!(out, "# TYPE {prefix}rollup_duration_seconds gauge");
        let _ = writeln!(out, "{prefix}rollup_duration_seconds {}", self.duration_seconds);

        let _ = writeln!(
            out,
            "# HELP {prefix}rollup_last_run_time Last run of the mako rollup process expressed as a UNIX timestamp"
        );
        let _ = writeln!(out, "# TYPE {prefix}rollup_last_run_time gauge");
        let _ = writeln!(out, "{prefix}rollup_last_run_time {}", self.last_run_time);

        out
    }
}

/// Escape a Prometheus label value.
fn escape_label(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    escaped
}
