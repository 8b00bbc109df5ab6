//! [`IgnoreResolver`]: the ordered rule stack that determines whether an
//! entry is ignored (§4.3).
//!
//! The `.gitignore`/`.ignore`/`.fdignore`/global-exclude stack (rule 1 and
//! 2 of §4.3) is the tree-structured, reference-counted machinery
//! `ignore::WalkBuilder` already implements natively; this module only
//! layers rule 3 — caller-supplied `custom_ignore_files` at arbitrary
//! absolute paths — on top, since `WalkBuilder` only supports ignore files
//! looked up by *name* per directory, not by an arbitrary path.

use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};

/// Rule 3 of §4.3: a flat list of caller-supplied ignore files, each
/// compiled relative to its own parent directory. A path that does not
/// exist is silently skipped, not an error.
pub struct CustomIgnoreStack {
    stacks: Vec<Gitignore>,
}

impl CustomIgnoreStack {
    pub fn build(custom_ignore_files: &[PathBuf]) -> Self {
        let mut stacks = Vec::with_capacity(custom_ignore_files.len());
        for file in custom_ignore_files {
            if !file.exists() {
                continue;
            }
            let Some(parent) = file.parent() else { continue };
            let mut builder = GitignoreBuilder::new(parent);
            if builder.add(file).is_some() {
                // `add` returns `Some(Error)` only on I/O failure reading
                // the file; treat the same as "does not exist".
                continue;
            }
            if let Ok(stack) = builder.build() {
                stacks.push(stack);
            }
        }
        Self { stacks }
    }

    /// Applied after the native `ignore::WalkBuilder` stack and before the
    /// hidden-file rule, per §4.3's rule ordering.
    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        self.stacks.iter().any(|stack| {
            matches!(
                stack.matched(path, is_dir),
                ignore::Match::Ignore(_)
            )
        })
    }
}
