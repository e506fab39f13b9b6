//! Default values for the mirror registry.
//!
//! Centralized so the home resolver, the file codec, and the CLI agree on
//! names without duplicating string literals.

/// Directory name appended to the user's home directory.
pub const HOME_DIR_NAME: &str = ".dep";

/// File name of the mirror list inside the home directory.
pub const MIRRORS_FILENAME: &str = "mirrors.yaml";

/// VCS kind used when `-s` is not given on the command line.
pub const DEFAULT_VCS: &str = "git";

/// Environment variable that overrides the resolved home directory.
pub const HOME_ENV_VAR: &str = "DEP_HOME";
