//! Per-thread scratch buffer for building interpolated output.

use std::cell::RefCell;

thread_local! {
    static SCRATCH: RefCell<String> = const { RefCell::new(String::new()) };
}

/// Run `build` against this thread's scratch buffer, cleared beforehand.
///
/// Falls back to a fresh buffer when the scratch buffer is already in use
/// further up the stack on this thread. After the call the buffer is shrunk
/// to `max_retained` if it grew beyond that.
pub fn with_scratch<T>(
    reserve: usize,
    max_retained: usize,
    build: impl FnOnce(&mut String) -> T,
) -> T {
    SCRATCH.with(|cell| match cell.try_borrow_mut() {
        Ok(mut buf) => {
            buf.clear();
            buf.reserve(reserve);
            let result = build(&mut buf);
            if buf.capacity() > max_retained {
                buf.clear();
                buf.shrink_to(max_retained);
            }
            result
        }
        Err(_) => {
            tracing::trace!("Scratch buffer busy, using a fresh buffer");
            build(&mut String::with_capacity(reserve))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_is_cleared_between_uses() {
        with_scratch(16, 1024, |buf| buf.push_str("leftover"));
        let seen = with_scratch(16, 1024, |buf| buf.clone());
        assert!(seen.is_empty());
    }

    #[test]
    fn test_nested_use_gets_fresh_buffer() {
        let (outer, inner) = with_scratch(16, 1024, |outer| {
            outer.push_str("outer");
            let inner = with_scratch(16, 1024, |inner| {
                inner.push_str("inner");
                inner.clone()
            });
            (outer.clone(), inner)
        });
        assert_eq!(outer, "outer");
        assert_eq!(inner, "inner");
    }

    #[test]
    fn test_oversized_buffer_is_shrunk() {
        with_scratch(4096, 64, |buf| buf.push_str("x"));
        let capacity = SCRATCH.with(|cell| cell.borrow().capacity());
        assert!(capacity < 4096);
    }
}
