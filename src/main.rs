//! IDE Packager - Debian packages from JetBrains IDE releases.

use ide_packager::cli;
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let exit_code = cli::run().await;
    process::exit(exit_code);
}
