//! Filesystem path coercion and lexical normalization.
//!
//! Everything here is pure text manipulation: no existence checks, no
//! directory creation, no current-directory resolution. An amendment that
//! read the filesystem would stop being deterministic across runs, which
//! the amendment contract forbids.

use amend_engine::{Amendment, Check, Correction};
use amend_types::Value;
use camino::{Utf8Component, Utf8PathBuf};
use tracing::debug;

/// Coerce non-empty text into a path.
#[derive(Debug, Clone, Default)]
pub struct CoerceToPath {
    pub fallback: Option<Utf8PathBuf>,
}

impl CoerceToPath {
    const IDENTITY: &'static str = "coerce-path";

    pub fn with_fallback(fallback: impl Into<Utf8PathBuf>) -> Self {
        Self {
            fallback: Some(fallback.into()),
        }
    }
}

impl Amendment for CoerceToPath {
    fn identity(&self) -> &'static str {
        Self::IDENTITY
    }

    fn check(&self, value: &Value) -> Check {
        match value {
            Value::Path(_) => Check::Conforms,
            Value::Text(_) => Check::Amendable,
            _ => Check::Unsupported,
        }
    }

    fn correct(&self, value: Value) -> anyhow::Result<Correction> {
        let Value::Text(s) = value else {
            anyhow::bail!("correct called outside the text domain: {value:?}");
        };
        if !s.is_empty() {
            return Ok(Correction::amended(Utf8PathBuf::from(s)));
        }
        Ok(match &self.fallback {
            Some(fallback) => {
                debug!(identity = Self::IDENTITY, "empty text, substituting fallback");
                Correction::amended(fallback.clone())
            }
            None => Correction::uncorrectable("empty text is not a path"),
        })
    }
}

/// Lexical cleanup: drop `.` segments and redundant separators.
///
/// `..` segments are kept as-is: resolving them lexically changes meaning
/// when a parent is a symlink, and resolving them truthfully needs the
/// filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizePath;

impl NormalizePath {
    fn normalized(path: &Utf8PathBuf) -> Utf8PathBuf {
        let mut out = Utf8PathBuf::new();
        for component in path.components() {
            match component {
                Utf8Component::CurDir => {}
                other => out.push(other.as_str()),
            }
        }
        if out.as_str().is_empty() {
            out.push(".");
        }
        out
    }
}

impl Amendment for NormalizePath {
    fn identity(&self) -> &'static str {
        "normalize-path"
    }

    fn check(&self, value: &Value) -> Check {
        match value {
            Value::Path(p) if Self::normalized(p) == *p => Check::Conforms,
            Value::Path(_) => Check::Amendable,
            _ => Check::Unsupported,
        }
    }

    fn correct(&self, value: Value) -> anyhow::Result<Correction> {
        let Value::Path(p) = value else {
            anyhow::bail!("correct called outside the path domain: {value:?}");
        };
        Ok(Correction::amended(Self::normalized(&p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amend_engine::apply;
    use amend_types::AmendOutcome;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn run(amendment: impl Amendment + 'static, value: Value) -> AmendOutcome {
        apply(&[Arc::new(amendment)], value).expect("apply")
    }

    #[test]
    fn text_converts_to_path() {
        let outcome = run(CoerceToPath::default(), Value::from("etc/config.toml"));
        assert!(outcome.conforms);
        assert_eq!(
            outcome.value,
            Value::Path(Utf8PathBuf::from("etc/config.toml"))
        );
    }

    #[test]
    fn empty_text_is_uncorrectable_without_fallback() {
        let outcome = run(CoerceToPath::default(), Value::from(""));
        assert!(!outcome.conforms);
        assert!(outcome.reason.expect("reason").kind.is_uncorrectable());

        let outcome = run(CoerceToPath::with_fallback("."), Value::from(""));
        assert_eq!(outcome.value, Value::Path(Utf8PathBuf::from(".")));
    }

    #[test]
    fn normalization_drops_dot_segments_and_doubled_separators() {
        let outcome = run(NormalizePath, Value::Path(Utf8PathBuf::from("a//b/./c")));
        assert_eq!(outcome.value, Value::Path(Utf8PathBuf::from("a/b/c")));

        let outcome = run(NormalizePath, Value::Path(Utf8PathBuf::from("./a")));
        assert_eq!(outcome.value, Value::Path(Utf8PathBuf::from("a")));
    }

    #[test]
    fn parent_segments_and_roots_are_preserved() {
        let outcome = run(NormalizePath, Value::Path(Utf8PathBuf::from("a/../b")));
        assert_eq!(outcome.value, Value::Path(Utf8PathBuf::from("a/../b")));

        let outcome = run(NormalizePath, Value::Path(Utf8PathBuf::from("/a/./b")));
        assert_eq!(outcome.value, Value::Path(Utf8PathBuf::from("/a/b")));
    }

    #[test]
    fn bare_dot_stays_a_dot() {
        let outcome = run(NormalizePath, Value::Path(Utf8PathBuf::from(".")));
        assert!(outcome.conforms);
        assert_eq!(outcome.value, Value::Path(Utf8PathBuf::from(".")));
    }

    #[test]
    fn already_clean_paths_pass_untouched() {
        let outcome = run(NormalizePath, Value::Path(Utf8PathBuf::from("a/b")));
        assert!(outcome.conforms);
    }
}
