use std::time::{Duration, Instant};

/// Bytes per pixel of the RGBA frames uploaded to the quad texture.
pub const BYTES_PER_PIXEL: usize = 4;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("time base {num}/{den} is not usable")]
    InvalidTimeBase { num: i32, den: i32 },
    #[error("presentation timestamp {0} is negative")]
    NegativeTimestamp(i64),
    #[error("presentation timestamp {pts} at time base {num}/{den} is out of range")]
    TimestampOutOfRange { pts: i64, num: i32, den: i32 },
    #[error("frame size {width}x{height} overflows the addressable buffer length")]
    SizeOverflow { width: u32, height: u32 },
    #[error("frame is {width}x{height} but holds {actual} bytes (expected {expected})")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Rational unit of a stream's presentation timestamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeBase {
    pub num: i32,
    pub den: i32,
}

impl TimeBase {
    pub fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }

    /// Converts `pts` ticks to a duration from stream start.
    pub fn to_duration(self, pts: i64) -> Result<Duration, FrameError> {
        if self.num <= 0 || self.den <= 0 {
            return Err(FrameError::InvalidTimeBase {
                num: self.num,
                den: self.den,
            });
        }
        if pts < 0 {
            return Err(FrameError::NegativeTimestamp(pts));
        }
        let seconds = pts as f64 * f64::from(self.num) / f64::from(self.den);
        Duration::try_from_secs_f64(seconds).map_err(|_| FrameError::TimestampOutOfRange {
            pts,
            num: self.num,
            den: self.den,
        })
    }
}

/// One decoded RGBA frame ready for texture upload.
#[derive(Clone, Debug)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub pts: i64,
    pub time_base: TimeBase,
    pub data: Vec<u8>,
}

impl VideoFrame {
    /// Checks the pixel buffer matches the frame dimensions.
    pub fn validate(&self) -> Result<(), FrameError> {
        let expected = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
            .ok_or(FrameError::SizeOverflow {
                width: self.width,
                height: self.height,
            })?;
        if self.data.len() != expected {
            return Err(FrameError::SizeMismatch {
                width: self.width,
                height: self.height,
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    pub fn presentation_time(&self) -> Result<Duration, FrameError> {
        self.time_base.to_duration(self.pts)
    }
}

/// Paces frame presentation against wall-clock time since playback began.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    start: Instant,
}

impl FrameClock {
    pub fn start() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self { start }
    }

    /// How long to wait at `now` before `frame` is due, or `None` if it is
    /// already due or late.
    pub fn delay_until(
        &self,
        frame: &VideoFrame,
        now: Instant,
    ) -> Result<Option<Duration>, FrameError> {
        let due = frame.presentation_time()?;
        let elapsed = now.saturating_duration_since(self.start);
        let delay = due.checked_sub(elapsed).filter(|delay| !delay.is_zero());
        if delay.is_none() && elapsed > due {
            tracing::trace!(
                pts = frame.pts,
                late_ms = (elapsed - due).as_millis() as u64,
                "presenting late frame"
            );
        }
        Ok(delay)
    }
}
