use crate::{
    error::ExprError,
    hasher::Structural,
    printer::render,
    util::{finish, fold, hash_bytes, TAG_APPLICATION, TAG_REFERENCE, TAG_VARIABLE},
};
use std::{fmt, mem};

/// Identifier assigned to a subtree at its first occurrence. Starts at 1.
pub type Slot = u32;

/// Non-empty sequence of ASCII letters.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub fn new(name: impl Into<String>) -> Result<Self, ExprError> {
        let name = name.into();
        if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(ExprError::InvalidName { name });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn hash(&self) -> u64 {
        hash_bytes(self.0.as_bytes())
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    Variable(Name),
    Application {
        operator: Name,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Back-reference to a previously numbered subtree. Only produced by CSE.
    Reference(Slot),
}

/// Expression tree node with its structural hash cached at construction.
///
/// Nodes are immutable from outside the crate, so the cached hash always
/// describes the current contents. Cloning, dropping and comparing never
/// recurse, so tree depth is bounded only by memory.
pub struct Expr {
    hash: u64,
    kind: ExprKind,
}

impl Expr {
    /// Builds a leaf. Fails if `name` is empty or contains non-letters.
    ///
    /// ```
    /// use cse_rust::Expr;
    /// assert!(Expr::variable("x").is_ok());
    /// assert!(Expr::variable("x1").is_err());
    /// ```
    pub fn variable(name: &str) -> Result<Self, ExprError> {
        Ok(Self::from_variable(Name::new(name)?))
    }

    /// Builds a two-argument application, taking ownership of both children.
    pub fn application(operator: &str, left: Expr, right: Expr) -> Result<Self, ExprError> {
        Ok(Self::from_application(Name::new(operator)?, left, right))
    }

    pub fn reference(slot: Slot) -> Self {
        Self {
            hash: finish(fold(TAG_REFERENCE, slot as u64)),
            kind: ExprKind::Reference(slot),
        }
    }

    pub(crate) fn from_variable(name: Name) -> Self {
        Self {
            hash: finish(fold(TAG_VARIABLE, name.hash())),
            kind: ExprKind::Variable(name),
        }
    }

    pub(crate) fn from_application(operator: Name, left: Expr, right: Expr) -> Self {
        Self {
            hash: Self::application_hash(&operator, &left, &right),
            kind: ExprKind::Application {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            },
        }
    }

    fn application_hash(operator: &Name, left: &Expr, right: &Expr) -> u64 {
        let hash = fold(TAG_APPLICATION, operator.hash());
        finish(fold(fold(hash, left.hash), right.hash))
    }

    pub fn kind(&self) -> &ExprKind {
        &self.kind
    }

    /// Name of a variable or operator of an application.
    pub fn name(&self) -> Option<&Name> {
        match &self.kind {
            ExprKind::Variable(name) | ExprKind::Application { operator: name, .. } => Some(name),
            ExprKind::Reference(_) => None,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self.kind, ExprKind::Reference(_))
    }

    /// Cached structural hash. Equal trees always have equal hashes.
    pub fn structural_hash(&self) -> u64 {
        self.hash
    }

    /// Recursive value equality over the whole shape.
    ///
    /// Walks both trees with an explicit stack, so depth is bounded only by
    /// memory.
    pub fn structural_eq(&self, other: &Expr) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if a.hash != b.hash {
                return false;
            }
            match (&a.kind, &b.kind) {
                (ExprKind::Variable(x), ExprKind::Variable(y)) => {
                    if x != y {
                        return false;
                    }
                }
                (ExprKind::Reference(x), ExprKind::Reference(y)) => {
                    if x != y {
                        return false;
                    }
                }
                (
                    ExprKind::Application {
                        operator: op1,
                        left: l1,
                        right: r1,
                    },
                    ExprKind::Application {
                        operator: op2,
                        left: l2,
                        right: r2,
                    },
                ) => {
                    if op1 != op2 {
                        return false;
                    }
                    pending.push((r1, r2));
                    pending.push((l1, l2));
                }
                _ => return false,
            }
        }
        true
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(expr) = pending.pop() {
            count += 1;
            if let ExprKind::Application { left, right, .. } = &expr.kind {
                pending.push(right);
                pending.push(left);
            }
        }
        count
    }

    /// Shallow copy of a leaf; `None` for applications.
    pub(crate) fn clone_leaf(&self) -> Option<Expr> {
        let kind = match &self.kind {
            ExprKind::Variable(name) => ExprKind::Variable(name.clone()),
            ExprKind::Reference(slot) => ExprKind::Reference(*slot),
            ExprKind::Application { .. } => return None,
        };
        Some(Self {
            hash: self.hash,
            kind,
        })
    }

    /// Splits an application into its parts, handing leaves back unchanged.
    pub(crate) fn into_application(mut self) -> Result<(Name, Expr, Expr), Expr> {
        match mem::replace(&mut self.kind, ExprKind::Reference(0)) {
            ExprKind::Application {
                operator,
                left,
                right,
            } => Ok((operator, *left, *right)),
            kind => {
                self.kind = kind;
                Err(self)
            }
        }
    }

    /// Builds a new tree in pre-order. `step` decides per node whether it is
    /// emitted as the given leaf or descended into; leaves are always emitted.
    pub(crate) fn rebuild_with<'a>(&'a self, mut step: impl FnMut(&'a Expr) -> Step) -> Expr {
        enum Task<'a> {
            Visit(&'a Expr),
            Build(&'a Name),
        }
        let mut tasks = vec![Task::Visit(self)];
        let mut built = Vec::new();
        while let Some(task) = tasks.pop() {
            match task {
                Task::Visit(expr) => match (step(expr), &expr.kind) {
                    (Step::Leaf(leaf), _) => built.push(leaf),
                    (
                        Step::Descend,
                        ExprKind::Application {
                            operator,
                            left,
                            right,
                        },
                    ) => {
                        tasks.push(Task::Build(operator));
                        tasks.push(Task::Visit(right));
                        tasks.push(Task::Visit(left));
                    }
                    (Step::Descend, _) => built.extend(expr.clone_leaf()),
                },
                Task::Build(operator) => assemble(operator.clone(), &mut built),
            }
        }
        built.pop().unwrap_or_else(|| Expr::reference(0))
    }
}

pub(crate) enum Step {
    Leaf(Expr),
    Descend,
}

/// Replaces the two topmost finished subtrees with their application.
pub(crate) fn assemble(operator: Name, built: &mut Vec<Expr>) {
    let right = built.pop();
    let left = built.pop();
    match (left, right) {
        (Some(left), Some(right)) => built.push(Expr::from_application(operator, left, right)),
        _ => unreachable!("application assembled without both children"),
    }
}

impl Clone for Expr {
    fn clone(&self) -> Self {
        self.rebuild_with(|expr| match expr.clone_leaf() {
            Some(leaf) => Step::Leaf(leaf),
            None => Step::Descend,
        })
    }
}

impl Drop for Expr {
    fn drop(&mut self) {
        if !matches!(self.kind, ExprKind::Application { .. }) {
            return;
        }
        // Children are emptied before their boxes are freed.
        let mut pending = vec![mem::replace(&mut self.kind, ExprKind::Reference(0))];
        while let Some(kind) = pending.pop() {
            if let ExprKind::Application {
                mut left,
                mut right,
                ..
            } = kind
            {
                pending.push(mem::replace(&mut left.kind, ExprKind::Reference(0)));
                pending.push(mem::replace(&mut right.kind, ExprKind::Reference(0)));
            }
        }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({})", render(self))
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.structural_eq(other)
    }
}

impl Eq for Expr {}

impl Structural for Expr {
    fn structural_hash(&self) -> u64 {
        self.hash
    }

    fn structural_eq(&self, other: &Self) -> bool {
        Expr::structural_eq(self, other)
    }
}
