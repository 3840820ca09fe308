use crate::loss::Loss;

/// Huber loss: quadratic near zero, linear past `delta`.  Pair with an
/// Identity output.
#[derive(Debug, Clone, Copy)]
pub struct Huber {
    pub delta: f64,
}

impl Huber {
    pub fn new(delta: f64) -> Huber {
        Huber { delta }
    }
}

impl Default for Huber {
    fn default() -> Self {
        Huber { delta: 1.0 }
    }
}

impl Loss for Huber {
    /// Scalar Huber: mean(h(predicted − target))
    /// where h(x) = 0.5·x²  if |x| ≤ δ
    ///              δ·(|x| − 0.5·δ)  otherwise
    fn loss(&self, predicted: &[f64], target: &[f64]) -> f64 {
        let n = predicted.len() as f64;
        predicted.iter().zip(target.iter())
            .map(|(p, y)| {
                let x = p - y;
                if x.abs() <= self.delta {
                    0.5 * x * x
                } else {
                    self.delta * (x.abs() - 0.5 * self.delta)
                }
            })
            .sum::<f64>() / n
    }

    /// Per-output gradient: x  if |x| ≤ δ,  else δ·sign(x)
    fn gradient(&self, predicted: &[f64], target: &[f64]) -> Vec<f64> {
        predicted.iter().zip(target.iter())
            .map(|(p, y)| {
                let x = p - y;
                if x.abs() <= self.delta { x } else { self.delta * x.signum() }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadratic_inside_delta_linear_outside() {
        let h = Huber::new(1.0);
        assert!((h.loss(&[0.5], &[0.0]) - 0.125).abs() < 1e-12);
        // |x| = 3 > δ: δ(|x| − δ/2) = 1·(3 − 0.5) = 2.5
        assert!((h.loss(&[3.0], &[0.0]) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn gradient_saturates_at_delta() {
        let h = Huber::new(1.0);
        assert_eq!(h.gradient(&[5.0], &[0.0]), vec![1.0]);
        assert_eq!(h.gradient(&[-5.0], &[0.0]), vec![-1.0]);
        assert_eq!(h.gradient(&[0.3], &[0.0]), vec![0.3]);
    }
}
