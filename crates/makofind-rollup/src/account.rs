//! Mapping object paths to accounts.

use std::ffi::OsStr;
use std::path::{Component, Path};

/// Directory under the base that holds owner-keyed trees.
const V2_DIR: &str = "v2";

/// Account an object path belongs to, relative to `base`.
///
/// `BASE/<account>/...` yields `<account>`; `BASE/v2/<owner>/...` yields
/// `<owner>`. Paths outside `base`, or with nothing below the account
/// directory, have no account.
pub fn account_of<'a>(base: &Path, path: &'a Path) -> Option<&'a OsStr> {
    let mut components = path.strip_prefix(base).ok()?.components().filter_map(|c| match c {
        Component::Normal(name) => Some(name),
        _ => None,
    });

    let mut account = components.next()?;
    if account == V2_DIR {
        account = components.next()?;
    }
    // The account component must be a directory, not the object itself.
    components.next()?;
    Some(account)
}
