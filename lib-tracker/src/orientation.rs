use math::Quaternion;
use protocol::StatusFlags;

/// Corrects raw sensor orientations against a reference pose.
/// 
/// After [`Orientation::reset`] at raw pose `R` the offset is `R⁻¹`, every later sample is
/// corrected as `raw ⊗ offset`, so a sample taken at `R` again reads as the identity. Before the
/// first reset samples pass through unchanged.
/// 
#[derive(Debug, Clone, Copy, Default)]
pub struct Orientation {
    offset: Option<Quaternion>,
}

impl Orientation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> Option<Quaternion> {
        self.offset
    }

    /// Makes `raw` the new reference pose. A degenerate (zero) sample keeps the old offset.
    /// 
    pub fn reset(&mut self, raw: &Quaternion) {
        match raw.inverse() {
            Some(offset) => {
                log::info!("Orientation reset, offset {:?}", offset);
                self.offset = Some(offset);
            }
            None => log::warn!("Ignoring orientation reset on degenerate sample {:?}", raw),
        }
    }

    /// Applies the offset, then mirrors the axes selected in `status`.
    /// 
    pub fn correct(&self, raw: &Quaternion, status: StatusFlags) -> Quaternion {
        let corrected = match &self.offset {
            Some(offset) => raw * offset,
            None => *raw,
        };
        corrected.invert_axes(
            status.contains(StatusFlags::INVERT_X),
            status.contains(StatusFlags::INVERT_Y),
            status.contains(StatusFlags::INVERT_Z),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose() -> Quaternion {
        Quaternion::new(0.8, 0.2, -0.4, 0.4).normalize()
    }

    #[test]
    fn test_passthrough_before_reset() {
        let orientation = Orientation::new();

        assert_eq!(orientation.correct(&pose(), StatusFlags::empty()), pose());
    }

    #[test]
    fn test_reset_pose_reads_as_identity() {
        let mut orientation = Orientation::new();
        orientation.reset(&pose());

        let corrected = orientation.correct(&pose(), StatusFlags::empty());

        assert!(corrected.approx_eq(&Quaternion::identity(), 1e-6));
        assert_eq!(corrected.to_q14(), [16384, 0, 0, 0]);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut once = Orientation::new();
        once.reset(&pose());

        let mut twice = Orientation::new();
        twice.reset(&pose());
        twice.reset(&pose());

        assert_eq!(once.offset(), twice.offset());
    }

    #[test]
    fn test_reset_keeps_offset_on_zero_sample() {
        let mut orientation = Orientation::new();
        orientation.reset(&pose());
        let offset = orientation.offset();

        orientation.reset(&Quaternion::new(0.0, 0.0, 0.0, 0.0));

        assert_eq!(orientation.offset(), offset);
    }

    #[test]
    fn test_inversion_after_offset() {
        let mut orientation = Orientation::new();
        orientation.reset(&Quaternion::identity());
        let raw = pose();

        let plain = orientation.correct(&raw, StatusFlags::empty());
        let inverted = orientation.correct(&raw, StatusFlags::INVERT_X | StatusFlags::INVERT_Z);

        assert_eq!(inverted, plain.invert_axes(true, false, true));
        assert_eq!(inverted.invert_axes(true, false, true), plain);
    }
}
