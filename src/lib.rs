mod batch;
mod cse;
mod error;
mod expression;
mod hasher;
mod io;
mod map;
mod parser;
mod printer;
mod set;
mod util;

#[cfg(test)]
mod proptests;

pub use batch::{CseBatch, Mode};
pub use cse::{
    eliminate, eliminate_in_place, eliminate_in_place_with_stats, eliminate_with_stats, Eliminated,
};
pub use error::ExprError;
pub use expression::{Expr, ExprKind, Name, Slot};
pub use hasher::{FnStrategy, KeyStrategy, MethodStrategy, Structural};
pub use map::{ChainedMap, KeyProjection, KeyValue};
pub use parser::Parser;
pub use printer::render;
pub use set::ChainedSet;
