/// Stack space that must remain before a recursive step runs.
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Runs `f`, first moving to a fresh stack segment if fewer than
/// `RED_ZONE` bytes remain.
///
/// Deeply nested expressions and recursive script functions use many native
/// frames per level. Wrapping each recursive step keeps the language-level
/// limits (`MAX_CALL_DEPTH`, the parser's nesting limit) in charge instead
/// of the thread's stack size.
///
/// # Example
/// ```
/// use finlite::util::stack::ensure_sufficient_stack;
///
/// fn depth(n: u64) -> u64 {
///     ensure_sufficient_stack(|| if n == 0 { 0 } else { depth(n - 1) + 1 })
/// }
///
/// assert_eq!(depth(100_000), 100_000);
/// ```
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
