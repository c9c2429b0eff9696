use std::{
    cmp::Ordering,
    fmt::Debug,
    iter::{Fuse, FusedIterator},
};

/// An iterator over the items of one sorted sequence that have no equal
/// counterpart in another sorted sequence.
///
/// Both cursors walk forward together: the other sequence is advanced while it is
/// behind, and each of its items cancels at most one equal item.
///
/// This `struct` is created by [`SeqExt::comm_left()`](crate::SeqExt::comm_left),
/// [`SeqExt::comm_right()`](crate::SeqExt::comm_right) and their `_by` forms.
/// See their documentation for more.
pub struct CommLeft<L, R, F>
where
    R: Iterator,
{
    keep: L,
    other: Fuse<R>,
    // `None` until primed, then the current head of `other`.
    head: Option<Option<R::Item>>,
    cmp: F,
}

impl<L, R, F> CommLeft<L, R, F>
where
    L: Iterator,
    R: Iterator<Item = L::Item>,
{
    pub(crate) fn new(keep: L, other: R, cmp: F) -> Self {
        Self {
            keep,
            other: other.fuse(),
            head: None,
            cmp,
        }
    }
}

impl<L, R, F> Iterator for CommLeft<L, R, F>
where
    L: Iterator,
    R: Iterator<Item = L::Item>,
    F: FnMut(&L::Item, &L::Item) -> Ordering,
{
    type Item = L::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let other = &mut self.other;
        let head = self.head.get_or_insert_with(|| other.next());

        loop {
            let item = self.keep.next()?;
            match advance_past(head, other, &item, &mut self.cmp) {
                Ordering::Equal => *head = other.next(),
                _ => return Some(item),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.keep.size_hint().1)
    }
}

impl<L, R, F> FusedIterator for CommLeft<L, R, F>
where
    L: FusedIterator,
    R: Iterator<Item = L::Item>,
    F: FnMut(&L::Item, &L::Item) -> Ordering,
{
}

impl<L, R, F> Debug for CommLeft<L, R, F>
where
    L: Debug,
    R: Iterator<Item: Debug> + Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommLeft")
            .field("keep", &self.keep)
            .field("other", &self.other)
            .field("head", &self.head)
            .finish()
    }
}

/// An iterator over the items that two sorted sequences have in common.
///
/// This `struct` is created by [`SeqExt::comm_both()`](crate::SeqExt::comm_both)
/// and [`SeqExt::comm_both_by()`](crate::SeqExt::comm_both_by).
/// See their documentation for more.
pub struct CommBoth<L, R, F>
where
    R: Iterator,
{
    left: L,
    right: Fuse<R>,
    head: Option<Option<R::Item>>,
    cmp: F,
    done: bool,
}

impl<L, R, F> CommBoth<L, R, F>
where
    L: Iterator,
    R: Iterator<Item = L::Item>,
{
    pub(crate) fn new(left: L, right: R, cmp: F) -> Self {
        Self {
            left,
            right: right.fuse(),
            head: None,
            cmp,
            done: false,
        }
    }
}

impl<L, R, F> Iterator for CommBoth<L, R, F>
where
    L: Iterator,
    R: Iterator<Item = L::Item>,
    F: FnMut(&L::Item, &L::Item) -> Ordering,
{
    type Item = L::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let right = &mut self.right;
        let head = self.head.get_or_insert_with(|| right.next());

        while head.is_some() {
            let Some(item) = self.left.next() else {
                break;
            };
            if advance_past(head, right, &item, &mut self.cmp) == Ordering::Equal {
                *head = right.next();
                return Some(item);
            }
        }

        // Once either side runs out nothing else can match, so stop pulling the left side.
        self.done = true;
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            (0, self.left.size_hint().1)
        }
    }
}

impl<L, R, F> FusedIterator for CommBoth<L, R, F>
where
    L: Iterator,
    R: Iterator<Item = L::Item>,
    F: FnMut(&L::Item, &L::Item) -> Ordering,
{
}

impl<L, R, F> Debug for CommBoth<L, R, F>
where
    L: Debug,
    R: Iterator<Item: Debug> + Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommBoth")
            .field("left", &self.left)
            .field("right", &self.right)
            .field("head", &self.head)
            .field("done", &self.done)
            .finish()
    }
}

// Advances `other` while its head sorts before `item`.
// Returns how `item` compares to the final head; `Less` if `other` ran out.
fn advance_past<T, R, F>(head: &mut Option<T>, other: &mut R, item: &T, cmp: &mut F) -> Ordering
where
    R: Iterator<Item = T>,
    F: FnMut(&T, &T) -> Ordering,
{
    while let Some(current) = head.as_ref() {
        match cmp(item, current) {
            Ordering::Greater => *head = other.next(),
            ordering => return ordering,
        }
    }
    Ordering::Less
}
