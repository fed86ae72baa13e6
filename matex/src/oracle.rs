//! Prediction sequences for oracular extraction
//!
//! An oracle replays the client-supplied sequence of upcoming primary
//! indices, strictly in the order given, without deduplication (repeats are
//! legitimate re-visits). Extractors use it purely to schedule prefetches;
//! the literal index passed to each extraction call stays authoritative for
//! the output.

/// Source of predicted upcoming primary indices
pub trait Oracle {
    /// Next predicted index, or `None` once the sequence is exhausted
    fn next(&mut self) -> Option<usize>;
}

/// Oracle over a client-supplied prediction vector
pub struct SequenceOracle {
    predictions: Vec<usize>,
    cursor: usize,
}

impl SequenceOracle {
    pub fn new(predictions: Vec<usize>) -> Self {
        Self { predictions, cursor: 0 }
    }

    /// Number of predictions not yet consumed
    pub fn remaining(&self) -> usize {
        self.predictions.len() - self.cursor
    }
}

impl Oracle for SequenceOracle {
    fn next(&mut self) -> Option<usize> {
        let prediction = self.predictions.get(self.cursor).copied();
        if prediction.is_some() {
            self.cursor += 1;
        }
        prediction
    }
}

/// Oracle predicting a consecutive run `[start, start + length)`
///
/// Used by the reduction engine, where every partition visits its range in
/// order.
pub struct ConsecutiveOracle {
    next: usize,
    end: usize,
}

impl ConsecutiveOracle {
    pub fn new(start: usize, length: usize) -> Self {
        Self { next: start, end: start + length }
    }
}

impl Oracle for ConsecutiveOracle {
    fn next(&mut self) -> Option<usize> {
        if self.next >= self.end {
            return None;
        }
        let prediction = self.next;
        self.next += 1;
        Some(prediction)
    }
}

/// One-step lookahead cursor over an oracle
///
/// Predictions line up one-to-one with extraction calls. Each `advance`
/// retires the prediction paired with the current call and surfaces the one
/// after it, which is the index worth fetching before the next call arrives.
pub(crate) struct Lookahead {
    oracle: Box<dyn Oracle>,
    upcoming: Option<usize>,
}

impl Lookahead {
    pub(crate) fn new(oracle: Box<dyn Oracle>) -> Self {
        Self { oracle, upcoming: None }
    }

    /// Retire the current prediction and return the one after it
    pub(crate) fn advance(&mut self) -> Option<usize> {
        if self.upcoming.take().is_none() {
            // First call (or exhausted sequence): the prediction paired
            // with this request has not been pulled yet.
            self.oracle.next();
        }
        self.upcoming = self.oracle.next();
        self.upcoming
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(mut oracle: impl Oracle) -> Vec<usize> {
        let mut out = Vec::new();
        while let Some(i) = oracle.next() {
            out.push(i);
        }
        out
    }

    #[test]
    fn test_sequence_preserves_order_and_repeats() {
        let oracle = SequenceOracle::new(vec![4, 1, 1, 0, 4]);
        assert_eq!(drain(oracle), vec![4, 1, 1, 0, 4]);
    }

    #[test]
    fn test_sequence_remaining() {
        let mut oracle = SequenceOracle::new(vec![7, 8]);
        assert_eq!(oracle.remaining(), 2);
        oracle.next();
        assert_eq!(oracle.remaining(), 1);
        oracle.next();
        oracle.next();
        assert_eq!(oracle.remaining(), 0);
    }

    #[test]
    fn test_consecutive_range() {
        assert_eq!(drain(ConsecutiveOracle::new(3, 4)), vec![3, 4, 5, 6]);
        assert_eq!(drain(ConsecutiveOracle::new(5, 0)), Vec::<usize>::new());
    }

    #[test]
    fn test_lookahead_runs_one_ahead() {
        let mut ahead = Lookahead::new(Box::new(SequenceOracle::new(vec![5, 6, 7])));
        assert_eq!(ahead.advance(), Some(6));
        assert_eq!(ahead.advance(), Some(7));
        assert_eq!(ahead.advance(), None);
        assert_eq!(ahead.advance(), None);
    }
}
