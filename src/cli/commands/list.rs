//! List command implementation.

use crate::catalog::Catalog;
use crate::cli::RuntimeConfig;
use crate::error::Result;

use super::EXIT_SUCCESS;

/// Print the supported IDE keys, one per line
pub(super) fn execute_list(catalog: &Catalog, config: &RuntimeConfig) -> Result<i32> {
    config.println("Supported JetBrains IDEs:");
    for key in catalog.keys() {
        config.println(key);
    }
    Ok(EXIT_SUCCESS)
}
