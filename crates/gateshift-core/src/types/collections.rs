//! Re-exports of performance-oriented collection types.

pub use rustc_hash::FxHashMap;
pub use smallvec::SmallVec;

/// SmallVec sized for suggestion rationale lists (usually <4 entries).
pub type SmallVec4<T> = SmallVec<[T; 4]>;
