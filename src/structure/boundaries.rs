use crate::features::FRAME_RATE;
use crate::stats;

/// Picks section boundaries from a novelty curve
#[derive(Debug, Clone)]
pub struct BoundaryDetector {
    /// Minimum section length in frames
    min_segment: usize,

    /// Threshold as a multiple of the novelty standard deviation
    threshold_std: f64,

    /// Beat snapping tolerance in frames
    snap_frames: f64,
}

impl BoundaryDetector {
    pub fn new(min_segment_secs: f64, threshold_std: f64, beat_snap_secs: f64) -> Self {
        Self {
            min_segment: (min_segment_secs * FRAME_RATE) as usize,
            threshold_std,
            snap_frames: beat_snap_secs * FRAME_RATE,
        }
    }

    /// Minimum section length in frames
    pub fn min_segment(&self) -> usize {
        self.min_segment
    }

    /// Whether a curve of `frames` samples is too short to be segmented
    pub fn is_degenerate(&self, frames: usize) -> bool {
        frames < 2 * self.min_segment
    }

    /// Novelty level a frame must exceed to become a boundary
    pub fn threshold(&self, novelty: &[f64]) -> f64 {
        stats::mean(novelty) + self.threshold_std * stats::std_dev(novelty)
    }

    /// Ordered boundary times in seconds, always starting at 0 and ending at `duration`.
    ///
    /// After a boundary is emitted the scan skips ahead by the minimum
    /// section length. Candidates snap to the nearest beat within tolerance.
    pub fn detect(&self, novelty: &[f64], beats: &[f64], duration: f64) -> Vec<f64> {
        let n = novelty.len();
        let mut interior = Vec::new();

        if !self.is_degenerate(n) {
            let threshold = self.threshold(novelty);
            let beat_frames: Vec<i64> = beats.iter().map(|&b| (b * FRAME_RATE) as i64).collect();

            let mut i = self.min_segment;
            while i < n - self.min_segment {
                if novelty[i] > threshold {
                    let frame = self.snap_to_beat(i, &beat_frames);
                    interior.push(frame as f64 / FRAME_RATE);
                    i = frame + self.min_segment;
                } else {
                    i += 1;
                }
            }

            tracing::debug!(
                "Novelty threshold {:.4} produced {} candidate boundaries",
                threshold,
                interior.len()
            );
        }

        let mut boundaries = Vec::with_capacity(interior.len() + 2);
        boundaries.push(0.0);
        boundaries.extend(interior.into_iter().filter(|&t| t > 0.0 && t < duration));
        if duration > 0.0 {
            boundaries.push(duration);
        }

        boundaries.sort_by(|a, b| a.total_cmp(b));
        boundaries.dedup();
        boundaries
    }

    /// Move `frame` onto the nearest beat when that beat is close enough
    fn snap_to_beat(&self, frame: usize, beat_frames: &[i64]) -> usize {
        let target = frame as i64;
        let nearest = beat_frames
            .iter()
            .copied()
            .min_by_key(|&b| (b - target).abs());

        match nearest {
            Some(beat) if beat >= 0 && ((beat - target).abs() as f64) < self.snap_frames => {
                beat as usize
            }
            _ => frame,
        }
    }
}

impl Default for BoundaryDetector {
    fn default() -> Self {
        Self::new(4.0, 0.5, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_novelty(frames: usize, peak: usize) -> Vec<f64> {
        let mut novelty = vec![0.0; frames];
        novelty[peak] = 1.0;
        novelty
    }

    #[test]
    fn test_sentinels_always_present() {
        let detector = BoundaryDetector::default();
        let boundaries = detector.detect(&vec![0.0; 200], &[], 20.0);
        assert_eq!(boundaries, vec![0.0, 20.0]);
    }

    #[test]
    fn test_short_track_is_single_section() {
        let detector = BoundaryDetector::default();
        assert!(detector.is_degenerate(79));
        let boundaries = detector.detect(&step_novelty(79, 45), &[], 7.9);
        assert_eq!(boundaries, vec![0.0, 7.9]);
    }

    #[test]
    fn test_peak_becomes_boundary() {
        let detector = BoundaryDetector::default();
        let boundaries = detector.detect(&step_novelty(300, 150), &[], 30.0);
        assert_eq!(boundaries, vec![0.0, 15.0, 30.0]);
    }

    #[test]
    fn test_boundary_snaps_to_nearby_beat() {
        let detector = BoundaryDetector::default();
        let beats = [10.0, 14.6, 20.0];
        let boundaries = detector.detect(&step_novelty(300, 150), &beats, 30.0);
        assert_eq!(boundaries, vec![0.0, 14.6, 30.0]);
    }

    #[test]
    fn test_distant_beat_is_ignored() {
        let detector = BoundaryDetector::default();
        let beats = [13.0];
        let boundaries = detector.detect(&step_novelty(300, 150), &beats, 30.0);
        assert_eq!(boundaries, vec![0.0, 15.0, 30.0]);
    }

    #[test]
    fn test_minimum_spacing_between_boundaries() {
        let detector = BoundaryDetector::default();
        let mut novelty = vec![0.0; 300];
        for frame in 100..120 {
            novelty[frame] = 1.0;
        }
        let boundaries = detector.detect(&novelty, &[], 30.0);
        assert_eq!(boundaries, vec![0.0, 10.0, 30.0]);
        assert!(boundaries.windows(2).all(|w| w[0] < w[1]));
    }
}
