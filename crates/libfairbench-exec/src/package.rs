//! Wheel build of the package under test

use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::Utc;
use tracing::info;

use crate::error::{ExecError, Result};

/// Builds a wheel from a setuptools checkout
#[derive(Debug, Clone)]
pub struct PackageBuilder {
    python: String,
    package_dir: PathBuf,
    package_name: String,
}

impl PackageBuilder {
    pub fn new(python: impl Into<String>, package_dir: impl Into<PathBuf>, package_name: impl Into<String>) -> Self {
        Self {
            python: python.into(),
            package_dir: package_dir.into(),
            package_name: package_name.into(),
        }
    }

    pub fn dist_dir(&self) -> PathBuf {
        self.package_dir.join("dist")
    }

    /// Clean, run `setup.py bdist_wheel`, and copy the single resulting
    /// wheel to a name unique to this build. Returns the copy's path.
    pub fn build(&self) -> Result<PathBuf> {
        self.clean()?;

        let command = format!("{} setup.py bdist_wheel", self.python);
        info!("running {} in {}", command, self.package_dir.display());
        let status = Command::new(&self.python)
            .args(["setup.py", "bdist_wheel"])
            .current_dir(&self.package_dir)
            .status()
            .map_err(|source| ExecError::Spawn {
                command: command.clone(),
                source,
            })?;
        if !status.success() {
            return Err(ExecError::Process {
                command,
                code: status.code(),
            });
        }

        let wheel = find_single_wheel(&self.dist_dir())?;
        info!("found wheel {}", wheel.display());

        let now = Utc::now();
        let unique_name = format!(
            "{}-v{}.{:06}-py3-none-any.whl",
            self.package_name,
            now.timestamp(),
            now.timestamp_subsec_micros()
        );
        let destination = self.dist_dir().join(unique_name);
        std::fs::copy(&wheel, &destination)?;
        info!("copied wheel to {}", destination.display());
        Ok(destination)
    }

    /// Remove previous build outputs
    fn clean(&self) -> Result<()> {
        let egg_info = format!("{}.egg-info", self.package_name);
        for name in ["build", egg_info.as_str(), "dist"] {
            let path = self.package_dir.join(name);
            info!("removing {}", path.display());
            match std::fs::remove_dir_all(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

/// The only `*.whl` file in `dist_dir`
pub fn find_single_wheel(dist_dir: &Path) -> Result<PathBuf> {
    let dir = dist_dir.to_str().ok_or_else(|| {
        ExecError::BuildArtifact(format!("non UTF-8 dist directory: {}", dist_dir.display()))
    })?;
    let pattern = format!("{}/*.whl", glob::Pattern::escape(dir));
    let paths = glob::glob(&pattern).map_err(|e| ExecError::BuildArtifact(e.to_string()))?;

    let mut wheels = Vec::new();
    for entry in paths {
        wheels.push(entry.map_err(|e| ExecError::BuildArtifact(e.to_string()))?);
    }

    match wheels.len() {
        0 => Err(ExecError::BuildArtifact(format!(
            "couldn't find wheel file in {}",
            dist_dir.display()
        ))),
        1 => Ok(wheels.remove(0)),
        n => Err(ExecError::BuildArtifact(format!(
            "expected one wheel in {}, found {}",
            dist_dir.display(),
            n
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_find_single_wheel() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("pkg-0.1-py3-none-any.whl"), b"wheel").unwrap();
        std::fs::write(dir.path().join("pkg-0.1.tar.gz"), b"sdist").unwrap();

        let wheel = find_single_wheel(dir.path()).unwrap();
        assert_eq!(wheel.file_name().unwrap(), "pkg-0.1-py3-none-any.whl");
    }

    #[test]
    fn test_no_wheel_is_build_artifact_error() {
        let dir = tempdir().unwrap();
        let err = find_single_wheel(dir.path()).unwrap_err();
        assert!(matches!(err, ExecError::BuildArtifact(_)));
        assert!(err.to_string().contains("couldn't find wheel"));
    }

    #[test]
    fn test_several_wheels_rejected() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a-1-py3-none-any.whl"), b"").unwrap();
        std::fs::write(dir.path().join("b-1-py3-none-any.whl"), b"").unwrap();
        assert!(matches!(find_single_wheel(dir.path()), Err(ExecError::BuildArtifact(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_build_cleans_and_copies_wheel() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("demo");
        std::fs::create_dir_all(pkg.join("build")).unwrap();
        std::fs::create_dir_all(pkg.join("dist")).unwrap();
        std::fs::write(pkg.join("dist").join("stale-0.0-py3-none-any.whl"), b"old").unwrap();
        // `sh setup.py bdist_wheel` runs this as a shell script
        std::fs::write(
            pkg.join("setup.py"),
            "mkdir -p dist\nprintf wheel > dist/demo-0.1-py3-none-any.whl\n",
        )
        .unwrap();

        let copied = PackageBuilder::new("sh", &pkg, "demo").build().unwrap();

        assert!(!pkg.join("build").exists());
        assert!(!pkg.join("dist").join("stale-0.0-py3-none-any.whl").exists());
        let name = copied.file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with("demo-v"));
        assert!(name.ends_with("-py3-none-any.whl"));
        assert_eq!(std::fs::read(&copied).unwrap(), b"wheel");
    }

    #[cfg(unix)]
    #[test]
    fn test_build_without_wheel_fails() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("setup.py"), "true\n").unwrap();
        let err = PackageBuilder::new("sh", dir.path(), "demo").build().unwrap_err();
        assert!(matches!(err, ExecError::BuildArtifact(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_build_command() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("setup.py"), "exit 3\n").unwrap();
        let err = PackageBuilder::new("sh", dir.path(), "demo").build().unwrap_err();
        assert_eq!(err.exit_code(), Some(3));
    }
}
