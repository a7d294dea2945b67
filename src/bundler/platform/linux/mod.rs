//! Linux package formats.
//!
//! | Format | Required Tools |
//! |--------|----------------|
//! | .deb | `fakeroot`, `dpkg-deb` |

pub mod debian;
