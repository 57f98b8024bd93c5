/// One hit in the reaction-time export: 1-based click index and its reaction time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactionPoint {
    pub index: usize,
    pub millis: u64,
}

impl ReactionPoint {
    pub fn new(index: usize, millis: u64) -> Self {
        Self { index, millis }
    }
}

impl From<ReactionPoint> for (f64, f64) {
    fn from(p: ReactionPoint) -> Self {
        (p.index as f64, p.millis as f64)
    }
}

/// Numbers reaction-time samples from 1 in hit order.
pub fn reaction_series(samples: &[u64]) -> Vec<ReactionPoint> {
    samples
        .iter()
        .enumerate()
        .map(|(i, &ms)| ReactionPoint::new(i + 1, ms))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_is_one_based_and_ordered() {
        let series = reaction_series(&[310, 250, 480]);
        assert_eq!(
            series,
            vec![
                ReactionPoint::new(1, 310),
                ReactionPoint::new(2, 250),
                ReactionPoint::new(3, 480)
            ]
        );
    }

    #[test]
    fn point_converts_to_chart_pair() {
        let pair: (f64, f64) = ReactionPoint::new(2, 250).into();
        assert_eq!(pair, (2.0, 250.0));
    }
}
