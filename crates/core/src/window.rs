use std::collections::VecDeque;

/// Rolling window of the most recent samples, oldest first.
#[derive(Debug, Clone)]
pub(crate) struct SampleWindow {
    samples:  VecDeque<f64>,
    capacity: usize,
}

impl SampleWindow {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new sample, evicting the oldest if at capacity.
    pub(crate) fn push(&mut self, value: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    pub(crate) fn len(&self) -> usize {
        self.samples.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    /// `true` when every stored sample is the same value (or the window is empty).
    pub(crate) fn is_constant(&self) -> bool {
        match self.samples.front() {
            Some(&first) => self.samples.iter().all(|&x| x == first),
            None => true,
        }
    }

    /// Largest absolute value in the window; `0.0` when empty.
    fn magnitude(&self) -> f64 {
        self.samples.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()))
    }

    /// Mean and sample standard deviation (`n - 1` divisor) of the window,
    /// both expressed in units of `scale`.
    ///
    /// Returns `(scale, mean / scale, stddev / scale)`.  Sums are taken over
    /// values divided by the largest magnitude so they stay within `[-n, n]`
    /// even for inputs near `f64::MAX`.
    pub(crate) fn scaled_moments(&self) -> (f64, f64, f64) {
        let scale = self.magnitude();
        if scale == 0.0 {
            return (0.0, 0.0, 0.0);
        }

        let n = self.samples.len() as f64;
        let mean = self.samples.iter().map(|x| x / scale).sum::<f64>() / n;

        let stddev = if self.samples.len() < 2 {
            0.0
        } else {
            let ss: f64 = self
                .samples
                .iter()
                .map(|x| (x / scale - mean).powi(2))
                .sum();
            (ss / (n - 1.0)).sqrt()
        };

        (scale, mean, stddev)
    }

    /// Arithmetic mean of the window; `0.0` when empty.
    pub(crate) fn mean(&self) -> f64 {
        let (scale, mean, _) = self.scaled_moments();
        mean * scale
    }
}
