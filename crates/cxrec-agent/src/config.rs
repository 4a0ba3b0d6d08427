//! Recorder configuration.

use cxrec_host::CachePolicy;
use cxrec_types::{RecorderError, Result, MAX_STACK_DEPTH};
use std::path::PathBuf;

/// Configuration for one recorder instance.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Directory the two record streams are created in.
    pub directory: PathBuf,
    /// Frame cap for class-load stack capture.
    pub max_stack_depth: usize,
    /// Policy for the reflective member cache.
    pub cache_policy: CachePolicy,
}

impl RecorderConfig {
    /// Configuration with defaults for everything but the directory.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            max_stack_depth: MAX_STACK_DEPTH,
            cache_policy: CachePolicy::default(),
        }
    }

    /// Parse the agent options string.
    ///
    /// A bare value is the output directory. Comma-separated `key=value`
    /// pairs are also accepted: `dir=/var/log/cx,max_depth=64,cache=fresh`.
    /// Empty options is an initialization error, since there is nowhere to
    /// write records.
    pub fn from_options(options: &str) -> Result<Self> {
        let options = options.trim();
        if options.is_empty() {
            return Err(RecorderError::init(
                "expecting options to contain the output directory",
            ));
        }
        if !options.contains('=') {
            return Ok(Self::new(options));
        }

        let mut directory = None;
        let mut max_stack_depth = MAX_STACK_DEPTH;
        let mut cache_policy = CachePolicy::default();
        for pair in options.split(',') {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| RecorderError::init(format!("malformed option: {}", pair)))?;
            match key.trim() {
                "dir" => directory = Some(PathBuf::from(value.trim())),
                "max_depth" => {
                    max_stack_depth = value.trim().parse().map_err(|_| {
                        RecorderError::init(format!("invalid max_depth: {}", value))
                    })?;
                }
                "cache" => {
                    cache_policy = match value.trim() {
                        "fresh" => CachePolicy::Fresh,
                        "memoize" => CachePolicy::Memoize,
                        other => {
                            return Err(RecorderError::init(format!(
                                "unknown cache policy: {}",
                                other
                            )))
                        }
                    };
                }
                other => {
                    return Err(RecorderError::init(format!("unknown option: {}", other)));
                }
            }
        }

        let directory =
            directory.ok_or_else(|| RecorderError::init("options missing dir="))?;
        Ok(Self {
            directory,
            max_stack_depth,
            cache_policy,
        })
    }

    /// Apply `CX_RECORDER_*` environment overrides on top of parsed
    /// options.
    pub fn apply_env(mut self) -> Self {
        if let Ok(dir) = std::env::var("CX_RECORDER_DIR") {
            self.directory = PathBuf::from(dir);
        }
        if let Ok(depth) = std::env::var("CX_RECORDER_MAX_DEPTH") {
            if let Ok(parsed) = depth.parse() {
                self.max_stack_depth = parsed;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_value_is_the_directory() {
        let config = RecorderConfig::from_options("/var/log/cx").unwrap();
        assert_eq!(config.directory, PathBuf::from("/var/log/cx"));
        assert_eq!(config.max_stack_depth, MAX_STACK_DEPTH);
        assert_eq!(config.cache_policy, CachePolicy::Memoize);
    }

    #[test]
    fn test_key_value_options() {
        let config = RecorderConfig::from_options("dir=/tmp/cx,max_depth=64,cache=fresh").unwrap();
        assert_eq!(config.directory, PathBuf::from("/tmp/cx"));
        assert_eq!(config.max_stack_depth, 64);
        assert_eq!(config.cache_policy, CachePolicy::Fresh);
    }

    #[test]
    fn test_empty_options_is_an_init_error() {
        let err = RecorderConfig::from_options("  ").unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        assert!(RecorderConfig::from_options("dir=/tmp,frobnicate=yes").is_err());
    }

    #[test]
    fn test_key_value_without_dir_is_rejected() {
        assert!(RecorderConfig::from_options("max_depth=10").is_err());
    }
}
