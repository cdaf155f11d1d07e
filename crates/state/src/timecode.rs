use crate::Timestamp;

/// Display format for the current-position and duration labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimecodeFormat {
    #[default]
    ClassicTime,
    Frames,
    Milliseconds,
    /// 1 unit = 360 ms.
    TenThousandthOfHours,
    /// 1 unit = 600 ms.
    HundredthOfMinutes,
    TimeAndFrames,
    Timestamps,
}

/// Timing metadata needed to turn raw timestamps into display time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaTiming {
    pub average_ticks_per_frame: i64,
    pub average_ticks_per_second: f64,
    pub fps: f64,
}

/// Formats an absolute timestamp (or a duration, or a sync-relative value,
/// which may be negative) for display.
///
/// `high_speed_factor` compensates for footage captured faster than it plays
/// back: displayed time is real-world time, not playback time. Degenerate
/// timing metadata formats as "0" rather than failing.
pub fn format_timecode(
    ts: Timestamp,
    format: TimecodeFormat,
    timing: &MediaTiming,
    high_speed_factor: f64,
) -> String {
    let factor = if high_speed_factor > 0.0 {
        high_speed_factor
    } else {
        1.0
    };

    let seconds = if timing.average_ticks_per_second > 0.0 {
        ts as f64 / timing.average_ticks_per_second
    } else {
        0.0
    };
    let milliseconds = seconds * 1000.0 / factor;

    // Above 100 effective frames per second the hundredth digit is too
    // coarse, switch the sub-second field to milliseconds.
    let thousandth = factor * timing.fps >= 100.0;

    match format {
        TimecodeFormat::ClassicTime => milliseconds_to_timecode(milliseconds, thousandth, true),
        TimecodeFormat::Frames => frame_number(ts, timing),
        TimecodeFormat::Milliseconds => format!("{}", milliseconds.round() as i64),
        TimecodeFormat::TenThousandthOfHours => fractional(milliseconds, 360.0),
        TimecodeFormat::HundredthOfMinutes => fractional(milliseconds, 600.0),
        TimecodeFormat::TimeAndFrames => {
            let time = milliseconds_to_timecode(milliseconds, thousandth, true);
            format!("{} ({})", time, frame_number(ts, timing))
        }
        TimecodeFormat::Timestamps => format!("{ts}"),
    }
}

fn frame_number(ts: Timestamp, timing: &MediaTiming) -> String {
    if timing.average_ticks_per_frame != 0 {
        format!("{}", ts / timing.average_ticks_per_frame + 1)
    } else {
        "0".to_string()
    }
}

fn fractional(milliseconds: f64, unit_ms: f64) -> String {
    let units = milliseconds / unit_ms;
    let whole = units.trunc();
    format!("{}:{:02}", whole as i64, ((units - whole) * 100.0).floor() as i64)
}

/// Renders milliseconds as `h:mm:ss:cc` (or `:mmm` when `thousandth`).
/// Negative input renders with a leading minus. Without `leading_zeroes`,
/// empty leading fields collapse down to `ss:cc`.
pub fn milliseconds_to_timecode(total_ms: f64, thousandth: bool, leading_zeroes: bool) -> String {
    let negative = total_ms < 0.0;

    let total_seconds = (total_ms.round() as i64) / 1000;
    let total_minutes = total_seconds / 60;
    let mut hours = total_minutes / 60;

    let mut minutes = total_minutes - hours * 60;
    let mut seconds = total_seconds - total_minutes * 60;
    let mut milliseconds = (total_ms % 1000.0).round() as i64;

    let sign = if negative { "- " } else { "" };
    if negative {
        hours = -hours;
        minutes = -minutes;
        seconds = -seconds;
        milliseconds = -milliseconds;
    }

    if !thousandth {
        let hundredth = ((milliseconds as f64) / 10.0).round() as i64;
        if leading_zeroes || hours > 0 {
            format!("{sign}{hours}:{minutes:02}:{seconds:02}:{hundredth:02}")
        } else if minutes > 0 {
            format!("{sign}{minutes:02}:{seconds:02}:{hundredth:02}")
        } else if seconds > 0 {
            format!("{sign}{seconds:02}:{hundredth:02}")
        } else {
            format!("{sign}{hundredth:02}")
        }
    } else if leading_zeroes || hours > 0 {
        format!("{sign}{hours}:{minutes:02}:{seconds:02}:{milliseconds:03}")
    } else if minutes > 0 {
        format!("{sign}{minutes:02}:{seconds:02}:{milliseconds:03}")
    } else if seconds > 0 {
        format!("{sign}{seconds:02}:{milliseconds:03}")
    } else {
        format!("{sign}{milliseconds:03}")
    }
}
