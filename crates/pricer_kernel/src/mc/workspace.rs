//! Reusable scratch buffers for Monte Carlo simulation.
//!
//! [`PathWorkspace`] owns the flat buffers shared by path generation and
//! payoff evaluation, so repeated pricing calls on the same
//! [`MonteCarloPricer`](super::pricer::MonteCarloPricer) do not reallocate.

/// Scratch buffers for a Monte Carlo run.
///
/// Paths are stored as a flat `n_paths * (n_steps + 1)` buffer, row-major by
/// path: path `i`'s value at step `s` lives at `i * (n_steps + 1) + s`.
/// Randoms are a flat `n_paths * n_steps` buffer in the same row-major
/// layout (one normal draw per step per path). Payoffs are one value per
/// path.
#[derive(Clone, Debug, Default)]
pub struct PathWorkspace {
    n_paths: usize,
    n_steps: usize,
    paths: Vec<f64>,
    randoms: Vec<f64>,
    payoffs: Vec<f64>,
}

impl PathWorkspace {
    /// Allocates a workspace sized for `n_paths` paths of `n_steps` steps.
    pub fn new(n_paths: usize, n_steps: usize) -> Self {
        let mut workspace = Self::default();
        workspace.ensure_capacity(n_paths, n_steps);
        workspace
    }

    /// Resizes internal buffers to fit `n_paths`/`n_steps`, if larger than
    /// the current capacity. Existing contents are not preserved once a
    /// resize occurs.
    pub fn ensure_capacity(&mut self, n_paths: usize, n_steps: usize) {
        if n_paths == self.n_paths && n_steps == self.n_steps {
            return;
        }
        self.n_paths = n_paths;
        self.n_steps = n_steps;
        self.paths.resize(n_paths * (n_steps + 1), 0.0);
        self.randoms.resize(n_paths * n_steps, 0.0);
        self.payoffs.resize(n_paths, 0.0);
    }

    /// Zeroes all buffers in place without changing their size.
    pub fn reset(&mut self) {
        self.paths.iter_mut().for_each(|v| *v = 0.0);
        self.randoms.iter_mut().for_each(|v| *v = 0.0);
        self.payoffs.iter_mut().for_each(|v| *v = 0.0);
    }

    /// Number of paths the workspace is currently sized for.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Number of steps per path the workspace is currently sized for.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Mutable access to the flat random-draw buffer.
    #[inline]
    pub fn randoms_mut(&mut self) -> &mut [f64] {
        &mut self.randoms
    }

    /// Read-only access to the flat random-draw buffer.
    #[inline]
    pub fn randoms(&self) -> &[f64] {
        &self.randoms
    }

    /// Read-only access to the flat path buffer.
    #[inline]
    pub fn paths(&self) -> &[f64] {
        &self.paths
    }

    /// Mutable access to the flat path buffer.
    #[inline]
    pub fn paths_mut(&mut self) -> &mut [f64] {
        &mut self.paths
    }

    /// Read-only access to the per-path payoff buffer.
    #[inline]
    pub fn payoffs(&self) -> &[f64] {
        &self.payoffs
    }

    /// Mutable access to the per-path payoff buffer.
    #[inline]
    pub fn payoffs_mut(&mut self) -> &mut [f64] {
        &mut self.payoffs
    }

    /// Borrows the path and payoff buffers simultaneously (disjoint fields).
    #[inline]
    pub fn paths_and_payoffs_mut(&mut self) -> (&mut [f64], &mut [f64]) {
        (&mut self.paths, &mut self.payoffs)
    }

    /// Borrows the path buffer mutably alongside a read-only view of the
    /// random draws (disjoint fields), for path generation.
    #[inline]
    pub fn paths_mut_and_randoms(&mut self) -> (&mut [f64], &[f64]) {
        (&mut self.paths, &self.randoms)
    }
}
