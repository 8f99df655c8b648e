//! 受理済み全域木からのノード分類: プロトタイプ選択 + 木上の多始点 BFS。

pub mod propagate;
pub mod prototype;

use std::fmt;

use serde::{Serialize, Serializer};

pub use propagate::{NodeClassAssignment, NodeClassifier};
pub use prototype::{PrototypeSelector, PrototypeStrategy, Prototypes};

/// Identifier of a class: an external label, or the index of a tree component
/// when no labels are available.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClassTag {
    Label(String),
    Component(usize),
}

impl fmt::Display for ClassTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(label) => f.write_str(label),
            Self::Component(index) => write!(f, "component-{index}"),
        }
    }
}

// Serialised as its display string so it can key JSON maps.
impl Serialize for ClassTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
