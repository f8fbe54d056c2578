/// Moving average over the last `N` samples.
///
/// Before the window fills, the average covers only the samples seen so far.
#[derive(Debug, Clone)]
pub struct AveragedInput<const N: usize> {
    samples: [f32; N],
    index: usize,
    sum: f32,
    count: usize,
}

impl<const N: usize> AveragedInput<N> {
    pub const fn new() -> Self {
        Self {
            samples: [0.0; N],
            index: 0,
            sum: 0.0,
            count: 0,
        }
    }

    pub fn add_sample(&mut self, value: f32) {
        if N == 0 {
            return;
        }
        if self.count < N {
            self.samples[self.index] = value;
            self.sum += value;
            self.count += 1;
        } else {
            self.sum -= self.samples[self.index];
            self.samples[self.index] = value;
            self.sum += value;
        }
        self.index = (self.index + 1) % N;
    }

    pub fn average(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f32
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl<const N: usize> Default for AveragedInput<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_average_is_zero() {
        let avg = AveragedInput::<4>::new();
        assert!(avg.is_empty());
        assert_eq!(avg.average(), 0.0);
    }

    #[test]
    fn partial_window_averages_seen_samples() {
        let mut avg = AveragedInput::<4>::new();
        avg.add_sample(2.0);
        avg.add_sample(4.0);
        assert_eq!(avg.len(), 2);
        assert_eq!(avg.average(), 3.0);
    }

    #[test]
    fn full_window_drops_oldest() {
        let mut avg = AveragedInput::<3>::new();
        for v in [1.0, 2.0, 3.0, 10.0] {
            avg.add_sample(v);
        }
        assert_eq!(avg.len(), 3);
        assert_eq!(avg.average(), 5.0);
    }
}
