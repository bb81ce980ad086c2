use std::fmt;

/// Build metadata captured by the build script.
///
/// Construct with the [`build_info!`](crate::build_info) macro so the
/// values come from the calling crate's build environment.
#[derive(Debug, Clone, Copy)]
pub struct BuildInfo {
    pub package: &'static str,
    pub version: &'static str,
    pub repo_version: &'static str,
    pub profile: &'static str,
    pub timestamp: &'static str,
    pub rustc: &'static str,
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.package, self.version)?;
        writeln!(f, "  revision:  {}", self.repo_version)?;
        writeln!(f, "  profile:   {}", self.profile)?;
        writeln!(f, "  built at:  {}", self.timestamp)?;
        write!(f, "  toolchain: {}", self.rustc)
    }
}

/// Capture build information at the call site.
///
/// The calling crate must have a build script exporting `REPO_VERSION`,
/// `BUILD_PROFILE`, `BUILD_TIMESTAMP` and `RUST_VERSION`.
#[macro_export]
macro_rules! build_info {
    () => {
        $crate::version::BuildInfo {
            package: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            repo_version: env!("REPO_VERSION"),
            profile: env!("BUILD_PROFILE"),
            timestamp: env!("BUILD_TIMESTAMP"),
            rustc: env!("RUST_VERSION"),
        }
    };
}
