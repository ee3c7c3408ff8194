//! Host platform detection and triplet file selection.
//!
//! The triplet installer only cares about three operating systems, and only
//! macOS branches on the CPU architecture. Both are modeled as closed enums
//! with an `Other` variant carrying whatever name was seen, so that an
//! unsupported host resolves to `None` instead of falling through a string
//! comparison.

use std::fmt;

/// Operating system of the host, named the way `uname -s` reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    Darwin,
    Linux,
    Other(String),
}

impl HostOs {
    /// Parse an OS name. Accepts both the `uname`-style names
    /// (`Windows`, `Darwin`, `Linux`) and Rust's target names
    /// (`windows`, `macos`, `linux`), case-insensitively.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "windows" => HostOs::Windows,
            "darwin" | "macos" => HostOs::Darwin,
            "linux" => HostOs::Linux,
            _ => HostOs::Other(name.trim().to_string()),
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostOs::Windows => write!(f, "Windows"),
            HostOs::Darwin => write!(f, "Darwin"),
            HostOs::Linux => write!(f, "Linux"),
            HostOs::Other(name) => write!(f, "{}", name),
        }
    }
}

/// CPU architecture of the host. Only `arm64` changes the selected triplet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostArch {
    Arm64,
    Other(String),
}

impl HostArch {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "arm64" | "aarch64" => HostArch::Arm64,
            _ => HostArch::Other(name.trim().to_string()),
        }
    }
}

impl fmt::Display for HostArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostArch::Arm64 => write!(f, "arm64"),
            HostArch::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Platform information used to pick a triplet file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: HostOs,
    pub arch: HostArch,
}

impl Platform {
    pub fn new(os: HostOs, arch: HostArch) -> Self {
        Self { os, arch }
    }

    /// Detect the current platform from the compile target.
    /// Returns `None` when the OS name is unknown.
    pub fn detect() -> Option<Self> {
        let os = std::env::consts::OS;
        if os.is_empty() {
            return None;
        }
        Some(Self {
            os: HostOs::from_name(os),
            arch: HostArch::from_name(std::env::consts::ARCH),
        })
    }

    /// Name of the triplet file for this platform, if it is supported.
    pub fn triplet_file(&self) -> Option<&'static str> {
        resolve_platform_file(&self.os, &self.arch)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.os, self.arch)
    }
}

/// Maps a platform to the fixed name of its triplet file.
pub fn resolve_platform_file(os: &HostOs, arch: &HostArch) -> Option<&'static str> {
    match (os, arch) {
        (HostOs::Windows, _) => Some("x64-windows-tactile.cmake"),
        (HostOs::Darwin, HostArch::Arm64) => Some("arm64-osx-tactile.cmake"),
        (HostOs::Darwin, HostArch::Other(_)) => Some("x64-osx-tactile.cmake"),
        (HostOs::Linux, _) => Some("x64-linux-tactile.cmake"),
        (HostOs::Other(_), _) => None,
    }
}

/// Trait for platform detection (useful for testing)
#[cfg_attr(test, mockall::automock)]
pub trait PlatformDetector: Send + Sync {
    fn detect(&self) -> Option<Platform>;
}

/// Default platform detector using compile-time detection
pub struct DefaultPlatformDetector;

impl PlatformDetector for DefaultPlatformDetector {
    fn detect(&self) -> Option<Platform> {
        Platform::detect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_platform_file_by_name(os_name: &str, arch: &str) -> Option<&'static str> {
        resolve_platform_file(&HostOs::from_name(os_name), &HostArch::from_name(arch))
    }

    #[test]
    fn test_resolve_supported_platforms() {
        assert_eq!(
            resolve_platform_file_by_name("Windows", "AMD64"),
            Some("x64-windows-tactile.cmake")
        );
        assert_eq!(
            resolve_platform_file_by_name("Linux", "x86_64"),
            Some("x64-linux-tactile.cmake")
        );
        assert_eq!(
            resolve_platform_file_by_name("Darwin", "x86_64"),
            Some("x64-osx-tactile.cmake")
        );
    }

    #[test]
    fn test_resolve_darwin_branches_on_arch() {
        assert_eq!(
            resolve_platform_file_by_name("Darwin", "arm64"),
            Some("arm64-osx-tactile.cmake")
        );
        assert_eq!(
            resolve_platform_file_by_name("Darwin", "aarch64"),
            Some("arm64-osx-tactile.cmake")
        );

        for arch in ["x86_64", "i386", "ppc", ""] {
            let file = resolve_platform_file_by_name("Darwin", arch).unwrap();
            assert!(file.starts_with("x64-osx"), "arch {:?} gave {}", arch, file);
        }
    }

    #[test]
    fn test_resolve_arch_ignored_outside_darwin() {
        assert_eq!(
            resolve_platform_file_by_name("Linux", "arm64"),
            Some("x64-linux-tactile.cmake")
        );
        assert_eq!(
            resolve_platform_file_by_name("Windows", "arm64"),
            Some("x64-windows-tactile.cmake")
        );
    }

    #[test]
    fn test_resolve_unsupported_platforms() {
        assert_eq!(resolve_platform_file_by_name("FreeBSD", "amd64"), None);
        assert_eq!(resolve_platform_file_by_name("SunOS", "arm64"), None);
        assert_eq!(resolve_platform_file_by_name("", ""), None);
    }

    #[test]
    fn test_os_names_are_case_insensitive_and_accept_target_names() {
        assert_eq!(HostOs::from_name("darwin"), HostOs::Darwin);
        assert_eq!(HostOs::from_name("macos"), HostOs::Darwin);
        assert_eq!(HostOs::from_name("LINUX"), HostOs::Linux);
        assert_eq!(HostOs::from_name("windows"), HostOs::Windows);
        assert_eq!(
            HostOs::from_name("Haiku"),
            HostOs::Other("Haiku".to_string())
        );
    }

    #[test]
    fn test_platform_detect() {
        let platform = Platform::detect().unwrap();

        #[cfg(target_os = "macos")]
        assert_eq!(platform.os, HostOs::Darwin);

        #[cfg(target_os = "linux")]
        assert_eq!(platform.os, HostOs::Linux);

        #[cfg(target_os = "windows")]
        assert_eq!(platform.os, HostOs::Windows);

        #[cfg(target_arch = "aarch64")]
        assert_eq!(platform.arch, HostArch::Arm64);

        #[cfg(any(target_os = "macos", target_os = "linux", target_os = "windows"))]
        assert!(platform.triplet_file().is_some());
    }

    #[test]
    fn test_default_platform_detector() {
        let detector = DefaultPlatformDetector;
        assert_eq!(detector.detect(), Platform::detect());
    }

    #[test]
    fn test_platform_display() {
        let platform = Platform::new(HostOs::Darwin, HostArch::Arm64);
        assert_eq!(platform.to_string(), "Darwin (arm64)");
    }
}
