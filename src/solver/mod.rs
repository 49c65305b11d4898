use crate::complex::*;
use crate::threads::{Join, Split, ThreadedSolver};

pub mod grid;

pub use grid::{EscapeGrid, GridSolver};

pub use crate::config::MAX_ITER;

/// `|z|²` at or above this has escaped.
pub const ESCAPE_RADIUS_SQR: f64 = 4.0;

pub trait Solver<T> {
    fn solve(&self, state: T) -> T;

    fn threaded(self, n: usize) -> ThreadedSolver<T>
    where
        Self: Sized + Clone + Send + 'static,
        T: Split + Join + Send + 'static,
    {
        ThreadedSolver::with_cloned_solvers(n, &self)
    }
}

impl<T, S> Solver<T> for Box<S>
where
    S: Solver<T> + ?Sized,
{
    fn solve(&self, state: T) -> T {
        self.as_ref().solve(state)
    }
}

/// Number of `z ← z² + c` steps from `z = 0` until `|z|² >= 4`, capped at
/// `max_iter`.
///
/// The first step is always taken, so any `c` yields at least 1 (for a
/// nonzero cap). A result equal to `max_iter` means the point did not escape.
pub fn escape_time(c: C<f64>, max_iter: u16) -> u16 {
    if max_iter == 0 {
        return 0;
    }
    let mut z = zero();
    let mut i = 0;
    loop {
        z = z * z + c;
        i += 1;
        if i >= max_iter || z.norm_sqr() >= ESCAPE_RADIUS_SQR {
            return i;
        }
    }
}

pub fn make_solver(threads: usize) -> Box<dyn Solver<EscapeGrid> + Send> {
    if threads == 0 {
        Box::<GridSolver>::default()
    } else {
        Box::new(GridSolver::default().threaded(threads))
    }
}

pub fn default_solver() -> ThreadedSolver<EscapeGrid> {
    GridSolver::default().threaded(num_cpus::get_physical())
}
