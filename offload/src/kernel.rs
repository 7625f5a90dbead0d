//! Pure Fibonacci compute kernel.
//!
//! This is the CPU-bound workload the dispatcher offloads. The naive
//! recursive formulation is deliberate: its exponential running time models
//! a genuinely blocking computation, which is the whole reason the isolated
//! execution path exists. Do not "optimize" it into the iterative form.
//!
//! Two entry points:
//!
//! - [`fib`] - the pure kernel, used by the inline path.
//! - [`fib_interruptible`] - same recursion shape with a stop predicate
//!   checked at every level, used by isolated execution units so a
//!   cancelled unit can actually terminate.

/// Largest input whose Fibonacci number fits in a `u64`.
///
/// `fib(94)` is 19740274219868223167, which exceeds `u64::MAX`. Inputs above
/// this bound are rejected by the dispatcher before any computation starts.
pub const MAX_COMPUTABLE_INPUT: u64 = 93;

/// Computes the `n`-th Fibonacci number by naive recursion.
///
/// Pure and deterministic for all `n <= MAX_COMPUTABLE_INPUT`. Running time
/// is exponential in `n` (roughly `phi^n` calls), so anything past n ~ 45
/// takes minutes to hours on current hardware. Callers are expected to
/// bound `n` and/or run this under a timeout; the kernel itself has no
/// failure modes given a bounded input.
pub fn fib(n: u64) -> u64 {
    if n < 2 {
        n
    } else {
        fib(n - 1) + fib(n - 2)
    }
}

/// Computes the `n`-th Fibonacci number, checking a stop predicate at each
/// recursion level.
///
/// Returns `None` as soon as the predicate reports true; otherwise returns
/// exactly the same value as [`fib`]. The per-call predicate cost is a
/// constant factor, which is noise next to the exponential recursion.
///
/// # Arguments
///
/// * `n` - Input value
/// * `stop` - Predicate polled at every recursion level; return true to
///   abandon the computation
pub fn fib_interruptible<F>(n: u64, stop: &F) -> Option<u64>
where
    F: Fn() -> bool,
{
    if stop() {
        return None;
    }
    if n < 2 {
        return Some(n);
    }
    let a = fib_interruptible(n - 1, stop)?;
    let b = fib_interruptible(n - 2, stop)?;
    Some(a + b)
}
