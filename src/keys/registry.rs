//! Bulk installation of every configured package's key

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use super::{PackageKeyManager, PackageStatus, ResolvedContext};
use crate::config::{PackageConfig, ValidatedConfig};
use crate::error::Result;
use crate::utils::fs::{ensure_private_dir, ensure_private_file};
use crate::utils::path::home_dir;

/// The configured packages of a project together with their resolved locations
#[derive(Debug, Clone)]
pub struct Registry {
    context: ResolvedContext,
    packages: IndexMap<String, PackageConfig>,
}

impl Registry {
    /// Create a registry for the project at `root`, using the user's home directory
    pub fn new(config: ValidatedConfig, root: &Path) -> Result<Self> {
        Self::with_home_dir(config, root, home_dir())
    }

    /// Create a registry with an explicit home directory for `~` expansion
    pub fn with_home_dir(
        config: ValidatedConfig,
        root: &Path,
        home: Option<PathBuf>,
    ) -> Result<Self> {
        let context = ResolvedContext::resolve(root, &config.keys_dir, home.as_deref())?;
        Ok(Self {
            context,
            packages: config.packages,
        })
    }

    pub fn context(&self) -> &ResolvedContext {
        &self.context
    }

    /// Configured packages in sweep order
    pub fn packages(&self) -> &IndexMap<String, PackageConfig> {
        &self.packages
    }

    /// Create the SSH directory and an empty config file if they are missing
    pub fn prepare(&self) -> Result<()> {
        let dir = self.context.ssh_config_dir();
        if ensure_private_dir(dir)? {
            tracing::info!(path = %dir.display(), "Created SSH directory");
        }

        let config = self.context.ssh_config_path();
        if ensure_private_file(config)? {
            tracing::info!(path = %config.display(), "Created SSH config file");
        }
        Ok(())
    }

    /// Build a manager for every package, in order
    ///
    /// Each item fails independently with `MissingKeyFile`.
    pub fn managers(&self) -> impl Iterator<Item = Result<PackageKeyManager>> + '_ {
        self.packages
            .iter()
            .map(|(name, package)| PackageKeyManager::new(&self.context, name, package))
    }

    /// Run `f` on each package's manager, stopping at the first error
    fn for_each_package<F>(&self, mut f: F) -> Result<usize>
    where
        F: FnMut(&PackageKeyManager) -> Result<()>,
    {
        let mut count = 0;
        for manager in self.managers() {
            f(&manager?)?;
            count += 1;
        }
        Ok(count)
    }

    /// Install every package's key and stanza
    ///
    /// Stops at the first failing package; packages already handled stay
    /// installed. Returns the number of packages processed.
    pub fn add_keys(&self) -> Result<usize> {
        self.prepare()?;
        let count = self.for_each_package(PackageKeyManager::add)?;
        tracing::debug!(count, "Added all package keys");
        Ok(count)
    }

    /// Remove every package's key and stanza, with the same failure policy as [`Self::add_keys`]
    pub fn remove_keys(&self) -> Result<usize> {
        self.prepare()?;
        let count = self.for_each_package(PackageKeyManager::remove)?;
        tracing::debug!(count, "Removed all package keys");
        Ok(count)
    }

    /// Report what is installed for each package without changing anything
    pub fn status(&self) -> Result<Vec<PackageStatus>> {
        self.managers()
            .map(|manager| manager?.status())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::Error;
    use std::fs;
    use tempfile::TempDir;

    struct Project {
        root: TempDir,
        home: TempDir,
    }

    impl Project {
        fn new() -> Self {
            let root = TempDir::new().unwrap();
            fs::create_dir(root.path().join("keys")).unwrap();
            Self {
                root,
                home: TempDir::new().unwrap(),
            }
        }

        fn key(&self, name: &str, content: &str) -> &Self {
            fs::write(self.root.path().join("keys").join(name), content).unwrap();
            self
        }

        fn registry(&self, config: Config) -> Registry {
            Registry::with_home_dir(
                config.validate().unwrap(),
                self.root.path(),
                Some(self.home.path().to_path_buf()),
            )
            .unwrap()
        }

        fn ssh_dir(&self) -> PathBuf {
            self.home.path().join(".ssh")
        }
    }

    #[test]
    fn test_prepare_creates_dir_and_config() {
        let project = Project::new();
        let registry = project.registry(Config::new("keys"));

        registry.prepare().unwrap();

        assert!(project.ssh_dir().is_dir());
        assert_eq!(fs::read(project.ssh_dir().join("config")).unwrap(), b"");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let dir_mode = fs::metadata(project.ssh_dir()).unwrap().permissions().mode();
            let file_mode = fs::metadata(project.ssh_dir().join("config"))
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(dir_mode & 0o777, 0o700);
            assert_eq!(file_mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_prepare_is_idempotent() {
        let project = Project::new();
        let registry = project.registry(Config::new("keys"));

        registry.prepare().unwrap();
        fs::write(project.ssh_dir().join("config"), "Host *\n").unwrap();
        registry.prepare().unwrap();

        assert_eq!(
            fs::read_to_string(project.ssh_dir().join("config")).unwrap(),
            "Host *\n"
        );
    }

    #[test]
    fn test_add_keys_in_configured_order() {
        let project = Project::new();
        project.key("b_key", "B").key("a_key", "A");
        let registry = project.registry(
            Config::new("keys")
                .with_package("beta", "b.example.com", "b_key")
                .with_package("alpha", "a.example.com", "a_key"),
        );

        assert_eq!(registry.add_keys().unwrap(), 2);

        let config = fs::read_to_string(project.ssh_dir().join("config")).unwrap();
        let beta = config.find("Host b.example.com").unwrap();
        let alpha = config.find("Host a.example.com").unwrap();
        assert!(beta < alpha);
        assert_eq!(fs::read_to_string(project.ssh_dir().join("a_key")).unwrap(), "A");
        assert_eq!(fs::read_to_string(project.ssh_dir().join("b_key")).unwrap(), "B");
    }

    #[test]
    fn test_add_keys_stops_at_missing_key() {
        let project = Project::new();
        project.key("first_key", "FIRST").key("third_key", "THIRD");
        let registry = project.registry(
            Config::new("keys")
                .with_package("first", "first.example.com", "first_key")
                .with_package("second", "second.example.com", "second_key")
                .with_package("third", "third.example.com", "third_key"),
        );

        let result = registry.add_keys();
        assert!(matches!(result, Err(Error::MissingKeyFile(_))));

        // Work done before the failure is kept; later packages are untouched
        assert!(project.ssh_dir().join("first_key").exists());
        assert!(!project.ssh_dir().join("third_key").exists());
        let config = fs::read_to_string(project.ssh_dir().join("config")).unwrap();
        assert!(config.contains("Host first.example.com"));
        assert!(!config.contains("Host third.example.com"));
    }

    #[test]
    fn test_round_trip_restores_config() {
        let project = Project::new();
        project.key("web_key", "WEB").key("api_key", "API");
        let registry = project.registry(
            Config::new("keys")
                .with_package("web", "web.example.com", "web_key")
                .with_package("api", "api.example.com", "api_key"),
        );

        fs::create_dir(project.ssh_dir()).unwrap();
        let original = "Host *\n  ServerAliveInterval 30\n";
        fs::write(project.ssh_dir().join("config"), original).unwrap();

        registry.add_keys().unwrap();
        assert_ne!(
            fs::read_to_string(project.ssh_dir().join("config")).unwrap(),
            original
        );

        assert_eq!(registry.remove_keys().unwrap(), 2);
        assert_eq!(
            fs::read_to_string(project.ssh_dir().join("config")).unwrap(),
            original
        );
        assert!(!project.ssh_dir().join("web_key").exists());
        assert!(!project.ssh_dir().join("api_key").exists());
    }

    #[test]
    fn test_remove_keys_without_prior_add() {
        let project = Project::new();
        project.key("web_key", "WEB");
        let registry =
            project.registry(Config::new("keys").with_package("web", "web.example.com", "web_key"));

        assert_eq!(registry.remove_keys().unwrap(), 1);
        assert_eq!(fs::read(project.ssh_dir().join("config")).unwrap(), b"");
    }

    #[test]
    fn test_status_reports_each_package() {
        let project = Project::new();
        project.key("web_key", "WEB").key("api_key", "API");
        let registry = project.registry(
            Config::new("keys")
                .with_package("web", "web.example.com", "web_key")
                .with_package("api", "api.example.com", "api_key"),
        );

        let status = registry.status().unwrap();
        assert_eq!(status.len(), 2);
        assert!(status.iter().all(|s| !s.installed));
        // Reporting does not prepare anything
        assert!(!project.ssh_dir().exists());

        registry.add_keys().unwrap();
        let status = registry.status().unwrap();
        assert_eq!(status[0].name, "web");
        assert_eq!(status[1].name, "api");
        assert!(status.iter().all(|s| s.installed));
    }

    #[test]
    fn test_ssh_location_override() {
        let project = Project::new();
        project.key("web_key", "WEB");
        fs::write(project.root.path().join(".sshlocation"), "~/alt-ssh\n").unwrap();
        let registry =
            project.registry(Config::new("keys").with_package("web", "web.example.com", "web_key"));

        registry.add_keys().unwrap();

        let alt = project.home.path().join("alt-ssh");
        assert_eq!(registry.context().ssh_config_dir(), alt);
        assert_eq!(fs::read_to_string(alt.join("web_key")).unwrap(), "WEB");
        assert!(!project.ssh_dir().exists());
    }
}
