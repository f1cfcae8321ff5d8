/// A set type based on the fxhash algorithm, used where iteration order does
/// not matter.
pub type Set<S> = fxhash::FxHashSet<S>;

/// A set type with deterministic ascending iteration order. Terminal vertex
/// sets and subset-construction keys live in these, since they get compared
/// and rendered.
pub type OrderedSet<S> = std::collections::BTreeSet<S>;

/// Represents a bidirectional mapping between `L` and `R`, implemented
/// through [`bimap::BiBTreeMap`] as both sides need lookups.
pub type Bijection<L, R> = bimap::BiBTreeMap<L, R>;
