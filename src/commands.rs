//! Command execution for the `check`, `write`, `query` and `sweep` subcommands.
//!
//! Output written here is the line-oriented contract callers scrape:
//! status lines first, then the source label and content marker on a hit.

use std::io::{Read, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::debug;

use crate::cache::{join_excerpts, resolve_key, CacheKey, DocCache, KeyMode, Lookup, QueryOutcome};
use crate::cli::Command;
use crate::config::Config;
use crate::error::CacheError;

/// Marker printed before cached content.
pub const CONTENT_MARKER: &str = "---CACHED-CONTENT---";

/// How a store command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Ran to completion, including cache misses
    Success,
    /// Rejected input; the store was not modified
    InvocationError,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => ExitCode::SUCCESS,
            Status::InvocationError => ExitCode::FAILURE,
        }
    }
}

/// Runs a store subcommand, reading write bodies from `input`.
///
/// Cache misses are successful runs. Returns `Status::InvocationError` for
/// invocation errors (bad key, empty write input) without touching the store.
pub fn execute(
    command: &Command,
    mode: KeyMode,
    config: &Config,
    input: &mut impl Read,
    out: &mut impl Write,
) -> Result<Status> {
    let mut cache = DocCache::from_config(config);

    match command {
        Command::Check { key } => {
            let Some(key) = resolve_or_report(mode, key, out)? else {
                return Ok(Status::InvocationError);
            };
            check(&mut cache, &key, out)?;
        }
        Command::Write { key, source } => {
            let Some(key) = resolve_or_report(mode, key, out)? else {
                return Ok(Status::InvocationError);
            };

            let mut body = String::new();
            input
                .read_to_string(&mut body)
                .context("Failed to read documentation from stdin")?;

            match cache.write(&key, source, body.trim()) {
                Ok(receipt) => writeln!(out, "{}", receipt)?,
                Err(CacheError::EmptyDocument) => {
                    writeln!(out, "ERROR: No documentation provided via stdin")?;
                    return Ok(Status::InvocationError);
                }
                Err(err) => {
                    return Err(err).with_context(|| format!("Failed to cache '{}'", key));
                }
            }
        }
        Command::Query { key, terms } => {
            let Some(key) = resolve_or_report(mode, key, out)? else {
                return Ok(Status::InvocationError);
            };
            let terms = terms.join(" ");
            query(&mut cache, &key, &terms, config.context_lines, out)?;
        }
        Command::Sweep => {
            let removed = cache
                .sweep_expired()
                .with_context(|| format!("Failed to sweep {}", config.cache_root.display()))?;
            writeln!(
                out,
                "SWEPT: {} expired entries removed from {}",
                removed,
                config.cache_root.display()
            )?;
        }
        Command::Serve { .. } => {
            anyhow::bail!("serve is not a store command");
        }
    }

    Ok(Status::Success)
}

/// Prints the lookup status and, on a hit, the cached document.
pub fn check(cache: &mut DocCache, key: &CacheKey, out: &mut impl Write) -> Result<Lookup> {
    let lookup = cache.check(key);
    writeln!(out, "{}", lookup)?;

    if let Lookup::Hit(doc) = &lookup {
        writeln!(out, "SOURCE: {} (Cached)", doc.source())?;
        writeln!(out, "{}", CONTENT_MARKER)?;
        writeln!(out, "{}", doc.body)?;
    }

    Ok(lookup)
}

/// Prints the lookup status followed by `QUERY HIT` excerpts or `QUERY MISS`.
pub fn query(
    cache: &mut DocCache,
    key: &CacheKey,
    terms: &str,
    context: usize,
    out: &mut impl Write,
) -> Result<()> {
    let outcome = cache.query(key, terms, context);
    writeln!(out, "{}", outcome.lookup_status_line())?;

    if let Some(line) = outcome.status_line(key, terms) {
        writeln!(out, "{}", line)?;
    }

    if let QueryOutcome::Found { document, excerpts } = &outcome {
        writeln!(out, "SOURCE: {} (Cached)", document.source())?;
        writeln!(out, "{}", CONTENT_MARKER)?;
        writeln!(out, "{}", join_excerpts(excerpts))?;
    }

    Ok(())
}

/// Resolves a key, printing an `ERROR:` line for invalid input.
fn resolve_or_report(mode: KeyMode, input: &str, out: &mut impl Write) -> Result<Option<CacheKey>> {
    match resolve_key(mode, input) {
        Ok(key) => {
            debug!(key = %key, path = %key.relative_path().display(), "resolved key");
            Ok(Some(key))
        }
        Err(err) => {
            writeln!(out, "ERROR: {}", err)?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> Config {
        Config {
            cache_root: dir.path().join("cache"),
            ..Config::default()
        }
    }

    fn run(command: Command, config: &Config, stdin: &str) -> (Status, String) {
        let mut out = Vec::new();
        let code = execute(&command, KeyMode::Library, config, &mut stdin.as_bytes(), &mut out)
            .unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_write_then_check() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        let (code, out) = run(
            Command::Write {
                key: "/x/y".to_string(),
                source: "Context7".to_string(),
            },
            &config,
            "  hello docs\n",
        );
        assert_eq!(code, Status::Success);
        assert!(out.starts_with("CACHED: 10 chars (10 bytes) at "), "{}", out);

        let (code, out) = run(Command::Check { key: "/x/y".to_string() }, &config, "");
        assert_eq!(code, Status::Success);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("HIT: Found cache (0.0h old) at "));
        assert_eq!(lines[1], "SOURCE: Context7 (Cached)");
        assert_eq!(lines[2], CONTENT_MARKER);
        assert_eq!(lines[3], "hello docs");
    }

    #[test]
    fn test_write_empty_input_fails_without_entry() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        let (code, out) = run(
            Command::Write {
                key: "/x/y".to_string(),
                source: "Context7".to_string(),
            },
            &config,
            " \n\t",
        );
        assert_eq!(code, Status::InvocationError);
        assert_eq!(out, "ERROR: No documentation provided via stdin\n");
        assert!(!config.cache_root.exists());
    }

    #[test]
    fn test_check_miss_is_success() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        let (code, out) = run(Command::Check { key: "absent".to_string() }, &config, "");
        assert_eq!(code, Status::Success);
        assert!(out.starts_with("MISS: No cache found at "));
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_invalid_key_fails() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        let (code, out) = run(Command::Check { key: "/".to_string() }, &config, "");
        assert_eq!(code, Status::InvocationError);
        assert!(out.starts_with("ERROR: Invalid key"));
    }

    #[test]
    fn test_query_hit_and_miss() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        run(
            Command::Write {
                key: "/x/y".to_string(),
                source: "Context7".to_string(),
            },
            &config,
            "line1\nfoo\nline3\nline4\nline5\nbar\nline7",
        );

        let (code, out) = run(
            Command::Query {
                key: "/x/y".to_string(),
                terms: vec!["foo".to_string()],
            },
            &config,
            "",
        );
        assert_eq!(code, Status::Success);
        assert!(out.contains("QUERY HIT: Found 1 relevant sections in /x/y\n"));
        assert!(out.ends_with("---CACHED-CONTENT---\nline1\nfoo\nline3\nline4\nline5\n"));

        let (code, out) = run(
            Command::Query {
                key: "/x/y".to_string(),
                terms: vec!["zzz".to_string()],
            },
            &config,
            "",
        );
        assert_eq!(code, Status::Success);
        assert!(out.contains("QUERY MISS: No relevant content found for 'zzz' in /x/y"));
    }

    #[test]
    fn test_query_joins_sections() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            context_lines: 0,
            ..test_config(&dir)
        };
        run(
            Command::Write {
                key: "lib".to_string(),
                source: "src".to_string(),
            },
            &config,
            "foo\nmiddle\nbar",
        );

        let (_, out) = run(
            Command::Query {
                key: "lib".to_string(),
                terms: vec!["foo".to_string(), "bar".to_string()],
            },
            &config,
            "",
        );
        assert!(out.contains("QUERY HIT: Found 2 relevant sections in lib"));
        assert!(out.ends_with("foo\n\n---SECTION---\nbar\n"));
    }

    #[test]
    fn test_sweep_reports_count() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        let (code, out) = run(Command::Sweep, &config, "");
        assert_eq!(code, Status::Success);
        assert!(out.starts_with("SWEPT: 0 expired entries removed from "));
    }
}
