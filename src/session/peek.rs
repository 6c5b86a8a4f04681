use std::iter::FusedIterator;

/// Pairs each element with its successor, using `end` after the last one.
///
/// `[1, 2, 3]` with end `0` yields `(1, 2), (2, 3), (3, 0)`. An empty
/// input yields nothing. The source is pulled lazily, one element ahead.
#[derive(Debug, Clone)]
pub struct Peeks<I: Iterator> {
    iter: I,
    current: Option<I::Item>,
    started: bool,
    end: I::Item,
}

pub fn insert_peeks<I>(xs: I, end: I::Item) -> Peeks<I::IntoIter>
where
    I: IntoIterator,
{
    Peeks {
        iter: xs.into_iter(),
        current: None,
        started: false,
        end,
    }
}

impl<I> Iterator for Peeks<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = (I::Item, I::Item);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            self.current = self.iter.next();
        }

        let current = self.current.take()?;
        match self.iter.next() {
            Some(peek) => {
                self.current = Some(peek.clone());
                Some((current, peek))
            }
            None => Some((current, self.end.clone())),
        }
    }
}

impl<I> FusedIterator for Peeks<I>
where
    I: Iterator,
    I::Item: Clone,
{
}
