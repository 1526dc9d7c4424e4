use std::collections::BTreeSet;

use crate::reconcile::ReconcileOps;

/// One abstract filesystem action. The plan decides what to do; the
/// executor decides how (render vs. apply).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    EnsureDir(String),
    Move { from: String, to: String },
    Copy { from: String, to: String },
    Delete(String),
}

impl Operation {
    /// Shell-equivalent rendering of this action.
    pub fn to_command(&self) -> String {
        match self {
            Operation::EnsureDir(dir) => format!("mkdir -p {}", dir),
            Operation::Move { from, to } => format!("mv {} {}", from, to),
            Operation::Copy { from, to } => format!("cp {} {}", from, to),
            Operation::Delete(path) => format!("rm {}", path),
        }
    }
}

/// Ordered, side-effect-free reconciliation plan.
///
/// Operation order is copies, then moves, then deletes: a leftover copy may
/// read a source that a later move consumes, and moves consume their own
/// sources ahead of any deletes. Each destination's parent directory is
/// ensured once, immediately before the first write into it; the root needs
/// no ensuring. Missing entries are diagnostics, never actions.
#[derive(Debug, Default)]
pub struct Plan {
    pub operations: Vec<Operation>,
    pub unchanged: Vec<String>,
    pub missing: Vec<String>,
    pub echo_unchanged: bool,
}

impl Plan {
    pub fn build(
        unchanged: Vec<String>,
        ops: ReconcileOps,
        missing: Vec<String>,
        delete_extra: bool,
        echo_unchanged: bool,
    ) -> Plan {
        let mut operations = Vec::new();
        let mut ensured: BTreeSet<String> = BTreeSet::new();

        for copy in &ops.copies {
            push_ensure_dir(&mut operations, &mut ensured, &copy.dest);
            operations.push(Operation::Copy {
                from: copy.source.clone(),
                to: copy.dest.clone(),
            });
        }
        for mv in &ops.moves {
            push_ensure_dir(&mut operations, &mut ensured, &mv.to);
            operations.push(Operation::Move {
                from: mv.from.clone(),
                to: mv.to.clone(),
            });
        }
        if delete_extra {
            for path in &ops.deletes {
                operations.push(Operation::Delete(path.clone()));
            }
        }

        Plan {
            operations,
            unchanged,
            missing,
            echo_unchanged,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Render the plan as shell-equivalent lines, ordering preserved.
    /// Missing entries come out as comment lines: they have no source to
    /// copy from, and must be surfaced rather than silently dropped.
    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.echo_unchanged {
            for path in &self.unchanged {
                lines.push(format!("echo {} unchanged", path));
            }
        }
        for operation in &self.operations {
            lines.push(operation.to_command());
        }
        for path in &self.missing {
            lines.push(format!("# missing: {} (no source in target)", path));
        }
        lines
    }
}

fn push_ensure_dir(
    operations: &mut Vec<Operation>,
    ensured: &mut BTreeSet<String>,
    dest: &str,
) {
    if let Some(folder) = parent_folder(dest) {
        if ensured.insert(folder.to_string()) {
            operations.push(Operation::EnsureDir(folder.to_string()));
        }
    }
}

/// Folder part of a relative path, `None` for files at the root.
fn parent_folder(path: &str) -> Option<&str> {
    match path.rsplit_once('/') {
        Some((folder, _)) if !folder.is_empty() => Some(folder),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::{CopySpec, MoveSpec};

    #[test]
    fn parent_folder_of_root_files_is_none() {
        assert_eq!(parent_folder("a.txt"), None);
        assert_eq!(parent_folder("sub/a.txt"), Some("sub"));
        assert_eq!(parent_folder("sub/deep/a.txt"), Some("sub/deep"));
    }

    #[test]
    fn ensure_dir_is_emitted_once_per_parent_before_first_write() {
        let ops = ReconcileOps {
            moves: vec![MoveSpec {
                from: "old/c.txt".into(),
                to: "sub/c.txt".into(),
            }],
            copies: vec![
                CopySpec {
                    source: "src/a.txt".into(),
                    dest: "sub/a.txt".into(),
                },
                CopySpec {
                    source: "src/a.txt".into(),
                    dest: "sub/b.txt".into(),
                },
            ],
            deletes: vec![],
        };

        let plan = Plan::build(vec![], ops, vec![], true, false);
        assert_eq!(
            plan.operations,
            vec![
                Operation::EnsureDir("sub".into()),
                Operation::Copy {
                    from: "src/a.txt".into(),
                    to: "sub/a.txt".into()
                },
                Operation::Copy {
                    from: "src/a.txt".into(),
                    to: "sub/b.txt".into()
                },
                Operation::Move {
                    from: "old/c.txt".into(),
                    to: "sub/c.txt".into()
                },
            ]
        );
    }

    #[test]
    fn deletes_are_gated_by_delete_extra() {
        let ops = ReconcileOps {
            moves: vec![],
            copies: vec![],
            deletes: vec!["junk.bin".into()],
        };
        let plan = Plan::build(vec![], ops, vec![], false, false);
        assert!(plan.is_empty());
    }

    #[test]
    fn render_surfaces_missing_as_comments() {
        let plan = Plan::build(
            vec!["kept.txt".into()],
            ReconcileOps::default(),
            vec!["gone.txt".into()],
            true,
            true,
        );
        assert_eq!(
            plan.render(),
            vec![
                "echo kept.txt unchanged".to_string(),
                "# missing: gone.txt (no source in target)".to_string(),
            ]
        );
    }
}
