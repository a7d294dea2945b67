//! Command line behaviour of the `ide_packager` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn packager() -> Command {
    let mut cmd = Command::cargo_bin("ide_packager").unwrap();
    cmd.env_remove("IDE_PACKAGER_ROOT")
        .env_remove("IDE_PACKAGER_API_URL");
    cmd
}

#[test]
fn test_list_prints_supported_ides() {
    packager()
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::eq("Supported JetBrains IDEs:\npycharm\nidea\n"));
}

#[test]
fn test_short_version_flag() {
    packager()
        .arg("-v")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_lists_choices() {
    packager()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("[possible values: pycharm, idea]"))
        .stdout(predicate::str::contains("[possible values: community, professional]"))
        .stdout(predicate::str::contains("Run with --list"));
}

#[test]
fn test_quiet_list_prints_nothing() {
    packager()
        .args(["-q", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_invalid_edition_rejected() {
    packager()
        .args(["--edition", "enterprise"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("enterprise"));
}

#[test]
fn test_unknown_ide_rejected() {
    packager()
        .args(["-i", "goland", "-l"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("goland"));
}

#[test]
fn test_unreachable_api_fails_without_workspace() {
    let root = tempfile::tempdir().unwrap();

    packager()
        .args(["--ide", "idea", "--root"])
        .arg(root.path())
        .env("IDE_PACKAGER_API_URL", "http://127.0.0.1:9/products/releases")
        .assert()
        .code(255)
        .stdout(predicate::str::contains("Finished packaging").not());

    assert!(!root.path().join("tmp").exists());
}

/// Serves one HTTP response with `Connection: close` on a background thread.
fn serve_once(content_type: &'static str, body: Vec<u8>) -> std::net::SocketAddr {
    use std::io::{Read, Write};

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        let (mut socket, _) = listener.accept().unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf);
        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            content_type,
            body.len()
        );
        socket.write_all(head.as_bytes()).unwrap();
        socket.write_all(&body).unwrap();
    });
    addr
}

/// Serves a listing whose latest IntelliJ IDEA Community release links to `link`.
fn serve_listing(link: &str, size: usize) -> String {
    let body = format!(
        r#"{{"IIC":[{{"downloads":{{"linux":{{"link":"{}","size":{}}}}}}}]}}"#,
        link, size
    );
    let addr = serve_once("application/json", body.into_bytes());
    format!("http://{}/products/releases", addr)
}

/// Serves `archive` once, returning its download URL.
fn serve_archive(archive: Vec<u8>) -> String {
    let addr = serve_once("application/gzip", archive);
    format!("http://{}/idea/ideaIC-2023.1.2.tar.gz", addr)
}

/// A directory of stand-in executables for every required tool.
///
/// `dpkg` runs `dpkg_script`; the other tools do nothing.
#[cfg(unix)]
fn stub_tools(dpkg_script: &str) -> tempfile::TempDir {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    for (tool, script) in [
        ("dpkg", dpkg_script),
        ("tar", "#!/bin/sh\nexit 0\n"),
        ("fakeroot", "#!/bin/sh\nexit 0\n"),
        ("dpkg-deb", "#!/bin/sh\nexit 0\n"),
    ] {
        let path = dir.path().join(tool);
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
    dir
}

/// A `dpkg` stand-in whose listing is `listing`.
fn listing_script(listing: &str) -> String {
    format!("#!/bin/sh\nprintf '%s' '{}'\n", listing)
}

const DPKG_HEADER: &str = "\
Desired=Unknown/Install/Remove/Purge/Hold
||/ Name                 Version      Architecture Description
+++-====================-============-============-==============================
ii  bash                 5.2.15-2     amd64        GNU Bourne Again SHell
";

#[cfg(unix)]
#[test]
fn test_check_reports_missing_installation() {
    let root = tempfile::tempdir().unwrap();
    let tools = stub_tools(&listing_script(DPKG_HEADER));
    let api = serve_listing("https://example.invalid/idea/ideaIC-2023.1.2.tar.gz", 900_000_000);

    packager()
        .args(["--ide", "idea", "--check", "--root"])
        .arg(root.path())
        .env("PATH", tools.path())
        .env("IDE_PACKAGER_API_URL", api)
        .assert()
        .code(0)
        .stdout(predicate::eq("idea community is not installed.\n"));

    assert!(!root.path().join("tmp").exists());
}

#[cfg(unix)]
#[test]
fn test_check_reports_available_upgrade() {
    let root = tempfile::tempdir().unwrap();
    let listing = format!(
        "{}ii  idea-community       2023.1.1     all          IntelliJ IDEA community edition\n",
        DPKG_HEADER
    );
    let tools = stub_tools(&listing_script(&listing));
    let api = serve_listing("https://example.invalid/idea/ideaIC-2023.1.2.tar.gz", 900_000_000);

    packager()
        .args(["--ide", "idea", "--check", "--root"])
        .arg(root.path())
        .env("PATH", tools.path())
        .env("IDE_PACKAGER_API_URL", api)
        .assert()
        .code(1)
        .stdout(predicate::eq(
            "There is a newer version (2023.1.2) than installed (2023.1.1) available!\n",
        ));
}

#[cfg(unix)]
#[test]
fn test_check_up_to_date_is_silent() {
    let root = tempfile::tempdir().unwrap();
    let listing = format!(
        "{}ii  idea-community       2023.1.2     all          IntelliJ IDEA community edition\n",
        DPKG_HEADER
    );
    let tools = stub_tools(&listing_script(&listing));
    let api = serve_listing("https://example.invalid/idea/ideaIC-2023.1.2.tar.gz", 900_000_000);

    packager()
        .args(["--ide", "idea", "--check", "--root"])
        .arg(root.path())
        .env("PATH", tools.path())
        .env("IDE_PACKAGER_API_URL", api)
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty());
}

#[cfg(unix)]
#[test]
fn test_failed_package_query_skips_command_log() {
    let root = tempfile::tempdir().unwrap();
    let tools = stub_tools("#!/bin/sh\nprintf 'dpkg: error: database locked' >&2\nexit 2\n");
    let api = serve_listing("https://example.invalid/idea/ideaIC-2023.1.2.tar.gz", 900_000_000);

    packager()
        .args(["--ide", "idea", "--check", "--root"])
        .arg(root.path())
        .env("PATH", tools.path())
        .env("IDE_PACKAGER_API_URL", api)
        .env_remove("RUST_LOG")
        .assert()
        .code(255)
        .stderr(predicate::str::contains("Error while querying the package database"))
        .stderr(predicate::str::contains("database locked").not());
}

#[cfg(unix)]
#[test]
fn test_rejected_download_removes_workspace() {
    let root = tempfile::tempdir().unwrap();
    copy_data(root.path());
    let tools = stub_tools(&listing_script(DPKG_HEADER));
    let archive = serve_archive(vec![0x1f; 512]);
    let api = serve_listing(&archive, 512);

    packager()
        .args(["--ide", "idea", "--root"])
        .arg(root.path())
        .env("PATH", tools.path())
        .env("IDE_PACKAGER_API_URL", api)
        .assert()
        .code(255)
        .stdout(predicate::str::contains("Finished packaging").not())
        .stderr(predicate::str::contains("ideaIC-2023.1.2.tar.gz"));

    assert!(!root.path().join("tmp").exists());
    assert!(!root.path().join("output/idea-community-2023.1.2.deb").exists());
}

#[test]
fn test_package_reports_artifact_and_removes_workspace() {
    if !["tar", "dpkg", "fakeroot", "dpkg-deb"]
        .iter()
        .all(|tool| which::which(tool).is_ok())
    {
        eprintln!("skipping: packaging tools not available");
        return;
    }

    let root = tempfile::tempdir().unwrap();
    copy_data(root.path());
    let archive = release_archive();
    let size = archive.len();
    let api = serve_listing(&serve_archive(archive), size);
    let deb = root.path().join("output/idea-community-2023.1.2.deb");

    packager()
        .args(["--ide", "idea", "--root"])
        .arg(root.path())
        .env("IDE_PACKAGER_API_URL", api)
        .assert()
        .code(0)
        .stdout(predicate::str::contains(format!(
            "Finished packaging idea to {}. Install now with dpkg -i {}.",
            deb.display(),
            deb.display()
        )));

    assert!(deb.is_file());
    assert!(!root.path().join("tmp").exists());
}

fn copy_data(root: &std::path::Path) {
    let data = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    for entry in walkdir::WalkDir::new(&data) {
        let entry = entry.unwrap();
        let dest = root.join("data").join(entry.path().strip_prefix(&data).unwrap());
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dest).unwrap();
        } else {
            std::fs::copy(entry.path(), &dest).unwrap();
        }
    }
}

/// A release archive large enough to pass the download size check.
fn release_archive() -> Vec<u8> {
    use flate2::{Compression, write::GzEncoder};

    // Incompressible filler keeps the compressed archive above the minimum size.
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    let filler: Vec<u8> = (0..200_000)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 24) as u8
        })
        .collect();

    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    let files: [(&str, &[u8], u32); 3] = [
        ("idea-IC-231.9011.34/bin/idea.sh", b"#!/bin/sh\necho idea\n", 0o755),
        ("idea-IC-231.9011.34/bin/idea64.vmoptions", b"-Xmx750m\n", 0o644),
        ("idea-IC-231.9011.34/lib/app.jar", &filler, 0o644),
    ];
    for (path, data, mode) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(mode);
        header.set_cksum();
        builder.append_data(&mut header, path, data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}
