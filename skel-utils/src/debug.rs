//! `custom_debug` formatters that keep large per-vertex and per-keyframe
//! collections readable in `{:?}` output.

use std::{cmp, fmt};

const FIRST_N_ELEMENTS: usize = 3;

/// Collections that can show a prefix of their elements.
pub trait HasLength {
    type Item: fmt::Debug;

    fn len2(&self) -> usize;
    fn get_first_n(&self, elements: usize) -> &[Self::Item];
}

impl<T: fmt::Debug> HasLength for [T] {
    type Item = T;
    fn len2(&self) -> usize {
        self.len()
    }
    fn get_first_n(&self, elements: usize) -> &[Self::Item] {
        let end = cmp::min(elements, self.len());
        &self[..end]
    }
}

impl<T: fmt::Debug> HasLength for Vec<T> {
    type Item = T;
    fn len2(&self) -> usize {
        self.len()
    }
    fn get_first_n(&self, elements: usize) -> &[Self::Item] {
        self.as_slice().get_first_n(elements)
    }
}

/// Print the first few elements followed by the number left out.
#[cfg(not(feature = "debug-print-all"))]
pub fn trimmed_collection_fmt<T: HasLength + fmt::Debug + ?Sized>(
    n: &T,
    f: &mut fmt::Formatter,
) -> fmt::Result {
    let first = n.get_first_n(FIRST_N_ELEMENTS);
    let remaining = n.len2().saturating_sub(first.len());

    if remaining == 0 {
        write!(f, "{:?}", first)
    } else {
        write!(f, "{:?} + {} elements", first, remaining)
    }
}

#[cfg(feature = "debug-print-all")]
pub fn trimmed_collection_fmt<T: HasLength + fmt::Debug + ?Sized>(
    n: &T,
    f: &mut fmt::Formatter,
) -> fmt::Result {
    write!(f, "{:?}", n)
}

#[cfg(all(test, not(feature = "debug-print-all")))]
mod tests {
    use super::*;
    use custom_debug::Debug;

    #[derive(Debug)]
    struct Holder {
        #[debug(with = trimmed_collection_fmt)]
        values: Vec<u32>,
    }

    #[test]
    fn test_short_collection_printed_in_full() {
        let holder = Holder {
            values: vec![1, 2],
        };
        let out = format!("{:?}", holder);
        assert!(out.contains("[1, 2]"));
        assert!(!out.contains("elements"));
    }

    #[test]
    fn test_long_collection_trimmed() {
        let holder = Holder {
            values: (0..10).collect(),
        };
        let out = format!("{:?}", holder);
        assert!(out.contains("[0, 1, 2] + 7 elements"));
    }
}
