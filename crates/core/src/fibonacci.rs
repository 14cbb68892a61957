//! The pure computation applied to every accepted job.

/// Naive recursive fibonacci with `fib(0) = fib(1) = 1`.
///
/// Exponential in `n`. The accepted index domain is capped at
/// [`MAX_INDEX`](crate::job::MAX_INDEX), which keeps the worst case at a
/// few hundred million calls.
pub fn fibonacci(n: u32) -> u64 {
    if n < 2 {
        return 1;
    }
    fibonacci(n - 1) + fibonacci(n - 2)
}
