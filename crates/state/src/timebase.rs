use crate::Timestamp;

/// Integer-safe proportional rescale: `round(value * new_max / old_max)`.
///
/// Every pixel/timestamp conversion in the workspace goes through this one
/// function so that the selection tracker, the frame tracker and the speed
/// slider stay pixel-consistent with each other.
pub fn rescale(value: i64, old_max: i64, new_max: i64) -> i64 {
    if old_max <= 0 {
        return 0;
    }
    (value as f64 * new_max as f64 / old_max as f64).round() as i64
}

/// Bidirectional mapping between a pixel span and a timestamp span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelMapper {
    pub min_pixel: i32,
    pub max_pixel: i32,
    pub min_ts: Timestamp,
    pub max_ts: Timestamp,
}

impl PixelMapper {
    pub fn new(min_pixel: i32, max_pixel: i32, min_ts: Timestamp, max_ts: Timestamp) -> Self {
        Self {
            min_pixel,
            max_pixel,
            min_ts,
            max_ts,
        }
    }

    pub fn pixel_span(&self) -> i64 {
        (self.max_pixel - self.min_pixel) as i64
    }

    pub fn ts_span(&self) -> i64 {
        self.max_ts - self.min_ts
    }

    pub fn coord_from_timestamp(&self, ts: Timestamp) -> i32 {
        self.min_pixel + rescale(ts - self.min_ts, self.ts_span(), self.pixel_span()) as i32
    }

    pub fn timestamp_from_coord(&self, pixel: i32) -> Timestamp {
        self.min_ts + rescale((pixel - self.min_pixel) as i64, self.pixel_span(), self.ts_span())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rescale_is_proportional() {
        assert_eq!(rescale(50, 100, 200), 100);
        assert_eq!(rescale(1, 3, 300), 100);
        assert_eq!(rescale(0, 100, 200), 0);
        assert_eq!(rescale(100, 100, 200), 200);
    }

    #[test]
    fn rescale_rounds_to_nearest() {
        // 1 * 3 / 2 = 1.5 rounds up.
        assert_eq!(rescale(1, 2, 3), 2);
        // 1 * 1 / 3 = 0.33 rounds down.
        assert_eq!(rescale(1, 3, 1), 0);
    }

    #[test]
    fn rescale_degenerate_range_yields_zero() {
        assert_eq!(rescale(50, 0, 200), 0);
        assert_eq!(rescale(50, -10, 200), 0);
    }

    #[test]
    fn mapper_round_trips_within_one_unit() {
        let mapper = PixelMapper::new(30, 730, 0, 100_000);
        for ts in (0..=100_000).step_by(97) {
            let px = mapper.coord_from_timestamp(ts);
            let back = mapper.timestamp_from_coord(px);
            let unit = (mapper.ts_span() as f64 / mapper.pixel_span() as f64).ceil() as i64;
            assert!(
                (back - ts).abs() <= unit,
                "ts {ts} -> px {px} -> ts {back}"
            );
        }
    }

    #[test]
    fn mapper_pixel_round_trip_is_exact_within_one_pixel() {
        let mapper = PixelMapper::new(30, 730, 0, 250_000);
        for px in 30..=730 {
            let ts = mapper.timestamp_from_coord(px);
            let back = mapper.coord_from_timestamp(ts);
            assert!((back - px).abs() <= 1, "px {px} -> ts {ts} -> px {back}");
        }
    }

    #[test]
    fn mapper_endpoints_are_fixed_points() {
        let mapper = PixelMapper::new(10, 500, 4_000, 90_000);
        assert_eq!(mapper.coord_from_timestamp(4_000), 10);
        assert_eq!(mapper.coord_from_timestamp(90_000), 500);
        assert_eq!(mapper.timestamp_from_coord(10), 4_000);
        assert_eq!(mapper.timestamp_from_coord(500), 90_000);
    }
}
