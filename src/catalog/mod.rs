//! Supported IDEs and editions.
//!
//! The descriptor table is static data compiled into a [`Catalog`] once at
//! startup and passed by reference afterwards; nothing mutates it.

use regex::Regex;
use std::fmt;

/// Static descriptor row.
struct DescriptorRow {
    key: &'static str,
    community_code: &'static str,
    professional_code: &'static str,
    version_pattern: &'static str,
}

/// Built-in descriptors, in listing order.
const DESCRIPTORS: &[DescriptorRow] = &[
    DescriptorRow {
        key: "pycharm",
        community_code: "PCC",
        professional_code: "PCP",
        version_pattern: r"[0-9]+\.[0-9]+\.[0-9]+",
    },
    DescriptorRow {
        key: "idea",
        community_code: "IIC",
        professional_code: "IIU",
        version_pattern: r"[0-9]+\.[0-9]+\.[0-9]+",
    },
];

/// Keys of the supported IDEs, in listing order.
pub const SUPPORTED_IDES: [&str; DESCRIPTORS.len()] = descriptor_keys();

const fn descriptor_keys() -> [&'static str; DESCRIPTORS.len()] {
    let mut keys = [""; DESCRIPTORS.len()];
    let mut i = 0;
    while i < DESCRIPTORS.len() {
        keys[i] = DESCRIPTORS[i].key;
        i += 1;
    }
    keys
}

/// Licensing tier of an IDE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Edition {
    /// Free, open-source edition
    Community,
    /// Commercial edition
    Professional,
}

impl Edition {
    /// Lower-case name as used in file names and CLI values.
    pub fn name(&self) -> &'static str {
        match self {
            Edition::Community => "community",
            Edition::Professional => "professional",
        }
    }

    /// Legacy two-letter abbreviation used by the control template.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Edition::Community => "ic",
            Edition::Professional => "iu",
        }
    }

    /// The other edition.
    pub fn other(&self) -> Edition {
        match self {
            Edition::Community => Edition::Professional,
            Edition::Professional => Edition::Community,
        }
    }

    /// All editions, in listing order.
    pub fn all() -> [Edition; 2] {
        [Edition::Community, Edition::Professional]
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static record for one supported IDE family.
#[derive(Debug, Clone)]
pub struct IdeDescriptor {
    key: &'static str,
    community_code: &'static str,
    professional_code: &'static str,
    version_pattern: Regex,
}

impl IdeDescriptor {
    /// Product key, e.g. `pycharm`.
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Vendor product code for an edition, e.g. `PCC`.
    pub fn product_code(&self, edition: Edition) -> &'static str {
        match edition {
            Edition::Community => self.community_code,
            Edition::Professional => self.professional_code,
        }
    }

    /// Version pattern applied to archive names and installed-package listings.
    pub fn version_pattern(&self) -> &Regex {
        &self.version_pattern
    }

    /// Extracts the version from a release file name.
    pub fn extract_version(&self, file_name: &str) -> Option<String> {
        self.version_pattern
            .find(file_name)
            .map(|m| m.as_str().to_string())
    }
}

/// Immutable lookup of supported IDEs.
#[derive(Debug, Clone)]
pub struct Catalog {
    ides: Vec<IdeDescriptor>,
}

impl Catalog {
    /// Builds the catalog of built-in descriptors.
    pub fn builtin() -> Result<Self, regex::Error> {
        let ides = DESCRIPTORS
            .iter()
            .map(|row| -> Result<IdeDescriptor, regex::Error> {
                Ok(IdeDescriptor {
                    key: row.key,
                    community_code: row.community_code,
                    professional_code: row.professional_code,
                    version_pattern: Regex::new(row.version_pattern)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { ides })
    }

    /// Looks up a descriptor by product key.
    pub fn get(&self, key: &str) -> Option<&IdeDescriptor> {
        self.ides.iter().find(|ide| ide.key == key)
    }

    /// Product keys in listing order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.ides.iter().map(IdeDescriptor::key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_supported_keys() {
        let catalog = Catalog::builtin().unwrap();
        let keys: Vec<_> = catalog.keys().collect();
        assert_eq!(keys, SUPPORTED_IDES);
        assert_eq!(SUPPORTED_IDES, ["pycharm", "idea"]);
        assert!(catalog.get("clion").is_none());
    }

    #[test]
    fn test_product_codes() {
        let catalog = Catalog::builtin().unwrap();
        let idea = catalog.get("idea").unwrap();
        assert_eq!(idea.product_code(Edition::Community), "IIC");
        assert_eq!(idea.product_code(Edition::Professional), "IIU");
        let pycharm = catalog.get("pycharm").unwrap();
        assert_eq!(pycharm.product_code(Edition::Professional), "PCP");
    }

    #[test]
    fn test_extract_version() {
        let catalog = Catalog::builtin().unwrap();
        let ide = catalog.get("pycharm").unwrap();
        assert_eq!(ide.extract_version("product-1.2.3.tar.gz").as_deref(), Some("1.2.3"));
        assert_eq!(
            ide.extract_version("pycharm-community-2023.1.2.tar.gz").as_deref(),
            Some("2023.1.2")
        );
        assert_eq!(ide.extract_version("product-nightly.tar.gz"), None);
    }

    #[test]
    fn test_edition_other_and_abbreviation() {
        assert_eq!(Edition::Community.other(), Edition::Professional);
        assert_eq!(Edition::Professional.other(), Edition::Community);
        assert_eq!(Edition::Community.abbreviation(), "ic");
        assert_eq!(Edition::Professional.to_string(), "professional");
    }
}
