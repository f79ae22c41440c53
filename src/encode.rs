//! GIF container writer for two-color frame sequences.

use std::borrow::Cow;
use std::io::Write;

use crate::error::LissajousError;
use crate::raster::Frame;

/// MIME type of the produced animations.
pub const MIME_TYPE: &str = "image/gif";

/// Global color table: white background, black foreground.
pub const PALETTE: [u8; 6] = [0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00];

/// Writes frames into a GIF stream as they are produced.
pub struct GifWriter<W: Write> {
    encoder: gif::Encoder<W>,
    side: u16,
    delay: u16,
    written: u16,
}

impl<W: Write> GifWriter<W> {
    /// Write the GIF header, global palette and loop-count extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the header cannot be written to `sink`.
    pub fn new(sink: W, side: u16, loop_count: u16, delay: u16) -> Result<Self, LissajousError> {
        let mut encoder = gif::Encoder::new(sink, side, side, &PALETTE)?;
        encoder.set_repeat(gif::Repeat::Finite(loop_count))?;
        Ok(Self { encoder, side, delay, written: 0 })
    }

    /// Append one frame using the global palette and the fixed delay.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame does not match the canvas or the sink
    /// rejects the write.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<(), LissajousError> {
        if frame.side() != self.side {
            return Err(LissajousError::InvalidArgument(format!(
                "frame side {} does not match canvas side {}",
                frame.side(),
                self.side
            )));
        }
        let gif_frame = gif::Frame {
            width: self.side,
            height: self.side,
            delay: self.delay,
            buffer: Cow::Borrowed(frame.pixels()),
            ..gif::Frame::default()
        };
        self.encoder.write_frame(&gif_frame)?;
        self.written = self.written.saturating_add(1);
        Ok(())
    }

    /// Number of frames written so far.
    #[must_use]
    pub fn frames_written(&self) -> u16 {
        self.written
    }

    /// Write the trailer and hand back the sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the trailer cannot be written.
    pub fn finish(self) -> Result<W, LissajousError> {
        Ok(self.encoder.into_inner()?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Read the NETSCAPE2.0 loop count from an encoded GIF.
    pub(crate) fn loop_count(bytes: &[u8]) -> Option<u16> {
        let marker = b"NETSCAPE2.0";
        let start = bytes.windows(marker.len()).position(|w| w == marker)? + marker.len();
        match bytes.get(start..start + 4)? {
            [0x03, 0x01, lo, hi] => Some(u16::from_le_bytes([*lo, *hi])),
            _ => None,
        }
    }

    fn encode(frames: &[Frame], loop_count: u16, delay: u16) -> Vec<u8> {
        let side = frames[0].side();
        let mut writer = GifWriter::new(Vec::new(), side, loop_count, delay).unwrap();
        for frame in frames {
            writer.write_frame(frame).unwrap();
        }
        assert_eq!(usize::from(writer.frames_written()), frames.len());
        writer.finish().unwrap()
    }

    #[test]
    fn header_palette_and_loop_count() {
        let bytes = encode(&[Frame::new(3), Frame::new(3)], 2, 5);
        assert_eq!(&bytes[..6], b"GIF89a");
        assert_eq!(loop_count(&bytes), Some(2));
        assert_eq!(*bytes.last().unwrap(), 0x3B);

        let decoder = gif::DecodeOptions::new().read_info(bytes.as_slice()).unwrap();
        assert_eq!(decoder.width(), 3);
        assert_eq!(decoder.height(), 3);
        assert_eq!(decoder.global_palette(), Some(&PALETTE[..]));
    }

    #[test]
    fn frames_keep_pixels_and_delay() {
        let mut painted = Frame::new(4);
        painted.plot(1, 2);
        let bytes = encode(&[Frame::new(4), painted.clone()], 2, 7);

        let mut decoder = gif::DecodeOptions::new().read_info(bytes.as_slice()).unwrap();
        let first = decoder.read_next_frame().unwrap().unwrap();
        assert_eq!(first.delay, 7);
        assert!(first.palette.is_none());
        assert!(first.buffer.iter().all(|&p| p == 0));

        let second = decoder.read_next_frame().unwrap().unwrap();
        assert_eq!(second.delay, 7);
        assert_eq!(&second.buffer[..], painted.pixels());

        assert!(decoder.read_next_frame().unwrap().is_none());
    }

    #[test]
    fn single_frame_still_has_loop_count() {
        let bytes = encode(&[Frame::new(1)], 1, 0);
        assert_eq!(loop_count(&bytes), Some(1));
    }

    #[test]
    fn mismatched_frame_is_rejected() {
        let mut writer = GifWriter::new(Vec::new(), 5, 1, 1).unwrap();
        let err = writer.write_frame(&Frame::new(4)).unwrap_err();
        assert!(matches!(err, LissajousError::InvalidArgument(_)));
    }
}
