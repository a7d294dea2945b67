//! Bundle orchestration.
//!
//! The [`Bundler`] turns one resolved release into a Debian package by
//! walking the packaging stages in order:
//!
//! 1. Ensure `output/` exists and rebuild the workspace tree
//! 2. Validate the template inputs
//! 3. Download the release archive
//! 4. Unpack it into the install directory
//! 5. Install launcher, desktop entry, sysctl snippet and postinst
//! 6. Rewrite the VM-options files
//! 7. Render `DEBIAN/control`
//! 8. Normalize ownership and compile the package
//! 9. Copy the artifact to `output/` and checksum it
//!
//! The bundler never removes its workspace; the caller owns cleanup so that
//! it happens exactly once, after success or failure.
//!
//! # Example
//!
//! ```no_run
//! use ide_packager::bundler::Bundler;
//! use ide_packager::catalog::{Catalog, Edition};
//! use ide_packager::config::PackagerConfig;
//! use ide_packager::release::ReleaseInfo;
//!
//! # async fn example(release: ReleaseInfo) -> ide_packager::bundler::Result<()> {
//! let catalog = Catalog::builtin().map_err(|e| ide_packager::bundler::Error::GenericError(e.to_string()))?;
//! let config = PackagerConfig::from_env(".");
//! let ide = catalog.get("idea").expect("builtin IDE");
//!
//! let bundler = Bundler::new(&config, ide, Edition::Community, release)?;
//! let result = bundler.bundle_with(|stage| println!("{}", stage)).await;
//! bundler.workspace().cleanup().await?;
//!
//! let artifact = result?;
//! println!("SHA256: {}", artifact.checksum);
//! # Ok(())
//! # }
//! ```

use crate::bundler::{
    BundledArtifact, PackageType,
    error::{Context, Error, ErrorExt, Result},
    platform::linux::debian,
    templates::TemplateSet,
    utils::{
        fs::{check_file_exists, check_folder, copy_file, create_folder, delete_file, set_readable_executable},
        http::download_to_file,
        process::Cmd,
    },
    workspace::Workspace,
};
use crate::catalog::{Edition, IdeDescriptor};
use crate::config::PackagerConfig;
use crate::release::ReleaseInfo;
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// A packaging stage, reported before it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Output directory and workspace tree
    Prepare,
    /// Template input checks
    Validate,
    /// Archive download
    Download,
    /// Archive extraction
    Unpack,
    /// Launcher, desktop entry, sysctl snippet, postinst
    Assets,
    /// VM-options rewrite
    VmOptions,
    /// Control file rendering
    Control,
    /// Ownership normalization and package compilation
    Build,
    /// Copy to output and checksum
    Finalize,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 9] = [
        Stage::Prepare,
        Stage::Validate,
        Stage::Download,
        Stage::Unpack,
        Stage::Assets,
        Stage::VmOptions,
        Stage::Control,
        Stage::Build,
        Stage::Finalize,
    ];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Stage::Prepare => "Preparing workspace",
            Stage::Validate => "Validating template inputs",
            Stage::Download => "Downloading release archive",
            Stage::Unpack => "Unpacking archive",
            Stage::Assets => "Installing launcher and configuration",
            Stage::VmOptions => "Rewriting VM options",
            Stage::Control => "Writing control file",
            Stage::Build => "Building package",
            Stage::Finalize => "Copying package to output",
        };
        f.write_str(text)
    }
}

/// Packages one release of one IDE edition.
#[derive(Debug)]
pub struct Bundler {
    config: PackagerConfig,
    ide: String,
    edition: Edition,
    release: ReleaseInfo,
    package_type: PackageType,
    workspace: Workspace,
    templates: TemplateSet,
    client: reqwest::Client,
}

impl Bundler {
    /// Creates a bundler for `release` of `ide` in `edition`.
    ///
    /// Nothing touches the filesystem until a stage runs.
    pub fn new(
        config: &PackagerConfig,
        ide: &IdeDescriptor,
        edition: Edition,
        release: ReleaseInfo,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            workspace: Workspace::new(config.workspace_dir(), ide.key()),
            templates: TemplateSet::new(config.data_dir(), ide.key()),
            config: config.clone(),
            ide: ide.key().to_string(),
            edition,
            release,
            package_type: PackageType::Deb,
            client,
        })
    }

    /// The workspace this bundler builds in.
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// File name of the package: `<ide>-<edition>-<version>.deb`.
    pub fn artifact_name(&self) -> String {
        self.package_type
            .artifact_name(&self.ide, self.edition.name(), &self.release.version)
    }

    /// Where the downloaded archive is stored.
    pub fn archive_path(&self) -> PathBuf {
        self.workspace.file(&self.release.file_name)
    }

    /// Runs every stage without progress reporting.
    pub async fn bundle(&self) -> Result<BundledArtifact> {
        self.bundle_with(|_| {}).await
    }

    /// Runs every stage, calling `on_stage` before each one.
    ///
    /// Stops at the first failing stage. The workspace is left in place.
    pub async fn bundle_with<F>(&self, mut on_stage: F) -> Result<BundledArtifact>
    where
        F: FnMut(Stage),
    {
        on_stage(Stage::Prepare);
        self.prepare().await?;
        on_stage(Stage::Validate);
        self.validate()?;
        on_stage(Stage::Download);
        self.download().await?;
        on_stage(Stage::Unpack);
        self.unpack().await?;
        on_stage(Stage::Assets);
        self.install_assets().await?;
        on_stage(Stage::VmOptions);
        self.rewrite_vmoptions().await?;
        on_stage(Stage::Control);
        self.write_control().await?;
        on_stage(Stage::Build);
        let built = self.build().await?;
        on_stage(Stage::Finalize);
        self.finalize(&built).await
    }

    /// Ensures `output/` exists and recreates the workspace tree.
    pub async fn prepare(&self) -> Result<()> {
        let output = self.config.output_dir();
        if !check_folder(&output, false, true) {
            create_folder(&output)
                .await
                .with_context(|| format!("{} can not be created", output.display()))?;
        }
        self.workspace.prepare().await
    }

    /// Checks that all template inputs are present.
    pub fn validate(&self) -> Result<()> {
        self.templates.validate()
    }

    /// Downloads the release archive into the workspace.
    ///
    /// A stale archive of the same name is removed first. Returns the number
    /// of bytes written.
    pub async fn download(&self) -> Result<u64> {
        let archive = self.archive_path();
        delete_file(&archive, true).await?;

        let written = download_to_file(
            &self.client,
            &self.release.download_url,
            &archive,
            self.config.min_download_size,
            self.config.download_timeout,
        )
        .await?;

        if let Some(expected) = self.release.size {
            if expected != written {
                log::warn!(
                    "Downloaded {} bytes but the release listing announced {}",
                    written,
                    expected
                );
            }
        }
        Ok(written)
    }

    /// Extracts the archive into the install directory, dropping its top-level folder.
    pub async fn unpack(&self) -> Result<()> {
        Cmd::new("tar")
            .args(["--strip-components", "1", "-C"])
            .arg(self.workspace.install_dir())
            .arg("-zxf")
            .arg(self.archive_path())
            .run(self.config.command_timeout)
            .await
            .with_context(|| format!("failed to unpack {}", self.release.file_name))
    }

    /// Copies the templated assets into the package root.
    pub async fn install_assets(&self) -> Result<()> {
        let ide = &self.ide;
        let ws = &self.workspace;
        let t = &self.templates;

        // (source, destination, make readable + executable)
        let assets: [(PathBuf, PathBuf, bool); 5] = [
            (t.common("start.sh"), ws.bin_dir().join(ide), true),
            (
                t.common("icon.desktop"),
                ws.applications_dir().join(format!("{}.desktop", ide)),
                false,
            ),
            (t.common("vmoptions.README"), self.vmoptions_readme(), false),
            (
                t.debian("sysctl-99.conf"),
                ws.sysctl_dir().join(format!("99-{}.conf", ide)),
                true,
            ),
            (t.debian("postinst"), ws.control_dir().join("postinst"), true),
        ];

        for (from, to, executable) in &assets {
            copy_file(from, to).await?;
            if *executable {
                set_readable_executable(to).await?;
            }
        }
        Ok(())
    }

    /// Strips the profiling agent from the unpacked VM options.
    pub async fn rewrite_vmoptions(&self) -> Result<Vec<PathBuf>> {
        debian::rewrite_vmoptions(&self.workspace.install_dir(), &self.ide, &self.vmoptions_readme())
            .await
    }

    /// Renders `DEBIAN/control` for this edition and version.
    pub async fn write_control(&self) -> Result<()> {
        debian::write_control(
            &self.templates.debian("control.in"),
            &self.workspace.control_dir().join("control"),
            self.edition,
            &self.release.version,
        )
        .await
    }

    /// Compiles the package root into `tmp/<artifact>`.
    pub async fn build(&self) -> Result<PathBuf> {
        let artifact = self.workspace.file(&self.artifact_name());
        debian::build_package(&self.workspace, &artifact, self.config.command_timeout).await?;
        Ok(artifact)
    }

    /// Copies a built package to `output/`, replacing an older copy.
    pub async fn finalize(&self, built: &Path) -> Result<BundledArtifact> {
        if !check_file_exists(built) {
            return Err(Error::ArtifactMissing(built.to_path_buf()));
        }

        let dest = self.config.output_dir().join(self.artifact_name());
        copy_file(built, &dest).await?;

        let size = tokio::fs::metadata(&dest)
            .await
            .fs_context("reading artifact metadata", &dest)?
            .len();
        let checksum = calculate_sha256(&dest).await?;

        Ok(BundledArtifact {
            package_type: self.package_type,
            path: dest,
            version: self.release.version.clone(),
            size,
            checksum,
        })
    }

    fn vmoptions_readme(&self) -> PathBuf {
        self.workspace
            .config_dir()
            .join(format!("{}.vmoptions.README", self.ide))
    }
}

/// Hex-encoded SHA-256 of a file, read in 8 KiB chunks.
async fn calculate_sha256(path: &Path) -> Result<String> {
    use sha2::{Digest, Sha256};
    use tokio::io::AsyncReadExt;

    let mut file = tokio::fs::File::open(path)
        .await
        .fs_context("opening artifact for hashing", path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading artifact for hashing", path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn release(version: &str) -> ReleaseInfo {
        ReleaseInfo {
            version: version.to_string(),
            download_url: format!("https://download.example.invalid/idea/ideaIC-{version}.tar.gz"),
            file_name: format!("ideaIC-{version}.tar.gz"),
            size: None,
        }
    }

    fn bundler(root: &Path, edition: Edition) -> Bundler {
        let catalog = Catalog::builtin().unwrap();
        let config = PackagerConfig::new(root);
        Bundler::new(&config, catalog.get("idea").unwrap(), edition, release("2023.1.2")).unwrap()
    }

    #[test]
    fn test_paths() {
        let b = bundler(Path::new("/srv"), Edition::Professional);
        assert_eq!(b.artifact_name(), "idea-professional-2023.1.2.deb");
        assert_eq!(b.archive_path(), PathBuf::from("/srv/tmp/ideaIC-2023.1.2.tar.gz"));
        assert_eq!(
            b.vmoptions_readme(),
            PathBuf::from("/srv/tmp/root/etc/idea/idea.vmoptions.README")
        );
    }

    #[test]
    fn test_stage_order() {
        assert_eq!(Stage::ALL.first(), Some(&Stage::Prepare));
        assert_eq!(Stage::ALL.last(), Some(&Stage::Finalize));
    }

    #[tokio::test]
    async fn test_prepare_creates_output_and_tree() {
        let dir = tempfile::tempdir().unwrap();
        let b = bundler(dir.path(), Edition::Community);

        b.prepare().await.unwrap();
        // Existing output directory is accepted on the next run.
        b.prepare().await.unwrap();

        assert!(dir.path().join("output").is_dir());
        assert!(b.workspace().control_dir().is_dir());
        b.workspace().cleanup().await.unwrap();
    }

    #[tokio::test]
    async fn test_finalize_without_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let b = bundler(dir.path(), Edition::Community);
        b.prepare().await.unwrap();

        let missing = b.workspace().file(&b.artifact_name());
        match b.finalize(&missing).await.unwrap_err() {
            Error::ArtifactMissing(path) => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_finalize_copies_and_hashes() {
        let dir = tempfile::tempdir().unwrap();
        let b = bundler(dir.path(), Edition::Community);
        b.prepare().await.unwrap();
        let built = b.workspace().file(&b.artifact_name());
        std::fs::write(&built, b"abc").unwrap();
        std::fs::write(dir.path().join("output").join(b.artifact_name()), b"old").unwrap();

        let artifact = b.finalize(&built).await.unwrap();

        assert_eq!(artifact.path, dir.path().join("output/idea-community-2023.1.2.deb"));
        assert_eq!(std::fs::read(&artifact.path).unwrap(), b"abc");
        assert_eq!(artifact.size, 3);
        assert_eq!(
            artifact.checksum,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
