/// Expected marginal seat revenue, version a: pairwise Littlewood levels, summed
pub mod emsr_a;
pub use emsr_a::EmsrA;

/// Expected marginal seat revenue, version b: one Littlewood level against an aggregated class
pub mod emsr_b;
pub use emsr_b::EmsrB;
