use std::iter::zip;
use std::sync::mpsc;
use std::thread;

use crate::solver::Solver;

pub trait Split: Sized {
    /// Break into exactly `n` parts, in order.
    fn split_parts(self, n: usize) -> Vec<Self>;

    fn parts(self, n: usize) -> Vec<SplitPart<Self>> {
        self.split_parts(n)
            .into_iter()
            .enumerate()
            .map(|(n, part)| SplitPart::new(part, n))
            .collect()
    }
}

pub trait Join: Sized {
    /// Inverse of `Split::split_parts`; `parts` is non-empty and in order.
    fn join_parts(parts: Vec<Self>) -> Self;
}

impl<T> Split for Vec<T> {
    fn split_parts(mut self, n: usize) -> Vec<Self> {
        let mut parts = Vec::with_capacity(n);
        for (start, end) in RangeSplitter::split(0, self.len(), n).into_iter().rev() {
            parts.push(self.split_off(start));
            debug_assert_eq!(parts.last().map(|p| p.len()), Some(end - start));
        }
        parts.reverse();
        parts
    }
}

impl<T> Join for Vec<T> {
    fn join_parts(parts: Vec<Self>) -> Self {
        parts.into_iter().flatten().collect()
    }
}

pub struct RangeSplitter;

impl RangeSplitter {
    /// `n` contiguous ranges covering `start..end`; sizes differ by at most
    /// one, larger ranges first.
    pub fn split(start: usize, end: usize, n: usize) -> Vec<(usize, usize)> {
        if n == 0 {
            return vec![];
        }
        let len = end.saturating_sub(start);
        let size = len / n;
        let extra = len % n;

        let mut ranges = Vec::with_capacity(n);
        let mut lo = start;
        for i in 0..n {
            let hi = lo + size + usize::from(i < extra);
            ranges.push((lo, hi));
            lo = hi;
        }
        ranges
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinError {
    Empty,
    OutOfRange(usize),
    Duplicate(usize),
}

#[derive(Debug)]
pub struct SplitPart<T> {
    pub n: usize,
    pub part: T,
}

impl<T> SplitPart<T> {
    pub fn new(part: T, n: usize) -> Self {
        Self { part, n }
    }
}

impl<T> SplitPart<T>
where
    T: Join,
{
    pub fn join(splits: Vec<SplitPart<T>>) -> Result<T, JoinError> {
        let n = splits.len();
        if n == 0 {
            return Err(JoinError::Empty);
        }
        let mut parts: Vec<Option<T>> = (0..n).map(|_| None).collect();
        for s in splits {
            if s.n >= n {
                return Err(JoinError::OutOfRange(s.n));
            }
            if parts[s.n].is_some() {
                return Err(JoinError::Duplicate(s.n));
            }
            parts[s.n] = Some(s.part);
        }
        // n parts, n distinct indices below n: every slot is filled
        Ok(T::join_parts(parts.into_iter().flatten().collect()))
    }
}

struct Worker<T> {
    tx: mpsc::Sender<SplitPart<T>>,
}

impl<T> Worker<T>
where
    T: Send + 'static,
{
    fn new<S>(solver: S, sol_tx: mpsc::Sender<SplitPart<T>>) -> Self
    where
        S: Solver<T> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<SplitPart<T>>();
        thread::spawn(move || {
            while let Ok(split) = rx.recv() {
                let soln = solver.solve(split.part);
                if sol_tx.send(SplitPart::new(soln, split.n)).is_err() {
                    return;
                }
            }
        });

        Self { tx }
    }

    fn send(&self, part: SplitPart<T>) {
        if self.tx.send(part).is_err() {
            panic!("solver worker thread died");
        }
    }
}

/// Fixed pool of solver threads. `solve` splits the state into one part per
/// worker and joins the results in their original order.
pub struct ThreadedSolver<T> {
    workers: Vec<Worker<T>>,
    rx: mpsc::Receiver<SplitPart<T>>,
    tx: mpsc::Sender<SplitPart<T>>,
}

impl<T> ThreadedSolver<T>
where
    T: Split + Join + Send + 'static,
{
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            workers: vec![],
            rx,
            tx,
        }
    }

    pub fn add_solver<S>(&mut self, solver: S)
    where
        S: Solver<T> + Send + 'static,
    {
        let worker = Worker::new(solver, self.tx.clone());
        self.workers.push(worker);
    }

    pub fn with_cloned_solvers<S>(n: usize, solver: &S) -> Self
    where
        S: Solver<T> + Send + 'static + Clone,
    {
        let mut this = Self::new();
        for _ in 0..n {
            this.add_solver(solver.clone());
        }
        this
    }

    pub fn threads(&self) -> usize {
        self.workers.len()
    }
}

impl<T> Default for ThreadedSolver<T>
where
    T: Split + Join + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Solver<T> for ThreadedSolver<T>
where
    T: Split + Join + Send + 'static,
{
    fn solve(&self, state: T) -> T {
        let sn = self.workers.len();
        assert!(sn > 0, "no workers");

        for (worker, part) in zip(&self.workers, state.parts(sn)) {
            worker.send(part);
        }
        let mut parts: Vec<SplitPart<T>> = Vec::with_capacity(sn);
        for _ in 0..sn {
            match self.rx.recv() {
                Ok(part) => parts.push(part),
                Err(_) => panic!("solver worker thread died"),
            }
        }
        match SplitPart::join(parts) {
            Ok(joined) => joined,
            Err(e) => panic!("could not join solver parts: {:?}", e),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Clone)]
    struct Double;

    impl Solver<Vec<i64>> for Double {
        fn solve(&self, state: Vec<i64>) -> Vec<i64> {
            state.into_iter().map(|x| 2 * x).collect()
        }
    }

    fn test_vec_split(length: usize, n: usize) {
        let v: Vec<usize> = (0..length).collect();
        let vs = v.clone().parts(n);
        assert_eq!(vs.len(), n);
        let vj: Vec<usize> = SplitPart::join(vs).unwrap();
        assert_eq!(v, vj);
    }

    #[test]
    fn test_vec_splits() {
        test_vec_split(1, 1);
        test_vec_split(0, 2);
        test_vec_split(5, 8);
        test_vec_split(8, 5);
        test_vec_split(100, 1);
        test_vec_split(55, 47);
    }

    #[test]
    fn test_range_splitter() {
        assert_eq!(RangeSplitter::split(0, 10, 3), vec![(0, 4), (4, 7), (7, 10)]);
        assert_eq!(RangeSplitter::split(5, 7, 4), vec![(5, 6), (6, 7), (7, 7), (7, 7)]);
        assert!(RangeSplitter::split(0, 10, 0).is_empty());
    }

    #[test]
    fn test_join_errors() {
        let empty: Vec<SplitPart<Vec<u8>>> = vec![];
        assert_eq!(SplitPart::join(empty), Err(JoinError::Empty));
        let dup = vec![SplitPart::new(vec![1u8], 0), SplitPart::new(vec![2u8], 0)];
        assert_eq!(SplitPart::join(dup), Err(JoinError::Duplicate(0)));
        let out = vec![SplitPart::new(vec![1u8], 3)];
        assert_eq!(SplitPart::join(out), Err(JoinError::OutOfRange(3)));
    }

    #[test]
    fn test_join_restores_order() {
        let parts = vec![
            SplitPart::new(vec![3, 4], 1),
            SplitPart::new(vec![5], 2),
            SplitPart::new(vec![1, 2], 0),
        ];
        assert_eq!(SplitPart::join(parts), Ok(vec![1, 2, 3, 4, 5]));
    }

    #[test]
    fn test_threaded_solver_matches_inline() {
        let input: Vec<i64> = (0..1000).collect();
        let pool = Double.threaded(4);
        assert_eq!(pool.threads(), 4);
        assert_eq!(pool.solve(input.clone()), Double.solve(input.clone()));
        // pool is reusable
        assert_eq!(pool.solve(input.clone()), Double.solve(input));
    }
}
