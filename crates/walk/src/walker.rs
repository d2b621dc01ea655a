use crate::entry::WalkNode;
use crate::error::WalkError;
use crate::policy::{Order, TraversalPolicy};
use logging::debug_log;
use std::ffi::OsStr;
use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

/// Paths of this many bytes or more are reported instead of accessed.
pub const PATH_LIMIT: usize = 4096;

/// Recursive walk over one root under a fixed [`TraversalPolicy`].
#[derive(Clone, Debug)]
pub struct Walker {
    root: PathBuf,
    policy: TraversalPolicy,
}

impl Walker {
    pub(crate) fn new(root: PathBuf, policy: TraversalPolicy) -> Self {
        Self { root, policy }
    }

    /// The starting path.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The policy in force.
    #[must_use]
    pub const fn policy(&self) -> &TraversalPolicy {
        &self.policy
    }

    /// Visits every node and returns the sum of the visitor's results.
    ///
    /// The visitor returns the number of errors it produced for a node. A
    /// failed node always counts as at least one error. No failure stops the
    /// walk: siblings and remaining subtrees are still visited.
    pub fn walk<F>(&self, mut visit: F) -> usize
    where
        F: FnMut(&WalkNode) -> usize,
    {
        let mut ancestors = Vec::new();
        self.walk_path(&self.root, 1, &mut ancestors, &mut visit)
    }

    fn walk_path(
        &self,
        path: &Path,
        depth: usize,
        ancestors: &mut Vec<(u64, u64)>,
        visit: &mut dyn FnMut(&WalkNode) -> usize,
    ) -> usize {
        if path.as_os_str().len() >= PATH_LIMIT {
            let error = WalkError::name_too_long(path.to_path_buf());
            return report(visit, WalkNode::failure(path, None, depth, error));
        }

        let own = match fs::symlink_metadata(path) {
            Ok(metadata) => metadata,
            Err(source) => {
                let error = WalkError::metadata(path.to_path_buf(), source);
                return report(visit, WalkNode::failure(path, None, depth, error));
            }
        };

        let is_symlink = own.file_type().is_symlink();
        if is_symlink && !self.policy.symlink_mode.follows_at(depth) {
            debug_log!(Walk, 2, "not following symlink {}", path.display());
            return visit(&WalkNode::ok(path, own, depth, true));
        }

        let resolved = if is_symlink {
            match fs::metadata(path) {
                Ok(target) => target,
                Err(source) => {
                    let error = WalkError::target(path.to_path_buf(), source);
                    return report(visit, WalkNode::failure(path, Some(own), depth, error));
                }
            }
        } else {
            own.clone()
        };

        let id = (resolved.dev(), resolved.ino());
        if is_symlink && resolved.is_dir() && ancestors.contains(&id) {
            let error = WalkError::symlink_loop(path.to_path_buf());
            return report(visit, WalkNode::failure(path, Some(own), depth, error));
        }

        let descend = self.policy.recursive && resolved.is_dir();
        let reported = if is_symlink && !self.policy.dereference {
            own
        } else {
            resolved
        };
        let node = WalkNode::ok(path, reported, depth, false);

        let mut errors = 0;
        if self.policy.order == Order::Preorder {
            errors += visit(&node);
        }
        if descend {
            ancestors.push(id);
            errors += self.walk_children(&node, ancestors, visit);
            ancestors.pop();
        }
        if self.policy.order == Order::Postorder {
            errors += visit(&node);
        }
        errors
    }

    fn walk_children(
        &self,
        dir: &WalkNode,
        ancestors: &mut Vec<(u64, u64)>,
        visit: &mut dyn FnMut(&WalkNode) -> usize,
    ) -> usize {
        let path = dir.path();
        debug_log!(Walk, 1, "entering directory {}", path.display());

        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(source) => {
                let error = WalkError::read_dir(path.to_path_buf(), source);
                return report(
                    visit,
                    WalkNode::failure(path, dir.metadata.clone(), dir.depth, error),
                );
            }
        };

        let mut errors = 0;
        let mut names = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => names.push(entry.file_name()),
                Err(source) => {
                    let error = WalkError::read_dir_entry(path.to_path_buf(), source);
                    errors += report(
                        visit,
                        WalkNode::failure(path, dir.metadata.clone(), dir.depth, error),
                    );
                }
            }
        }
        names.sort();
        debug_log!(Walk, 3, "{} entries in {}", names.len(), path.display());

        for name in &names {
            let child = join(path, name);
            errors += self.walk_path(&child, dir.depth + 1, ancestors, visit);
        }
        errors
    }
}

fn report(visit: &mut dyn FnMut(&WalkNode) -> usize, node: WalkNode) -> usize {
    if let Some(error) = node.error() {
        debug_log!(Walk, 1, "{error}");
    }
    visit(&node).max(1)
}

/// Appends `name` with a single `/`, tolerating a trailing separator.
fn join(dir: &Path, name: &OsStr) -> PathBuf {
    let mut child = dir.as_os_str().to_os_string();
    if child.as_encoded_bytes().last() != Some(&b'/') {
        child.push("/");
    }
    child.push(name);
    PathBuf::from(child)
}
