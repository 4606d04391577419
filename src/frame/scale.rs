//! Frame rescaling
//!
//! Outlets encode at their configured resolution; when the capture source
//! produces a different size, the frame is rescaled before hitting the
//! encoder pipe. Nearest-neighbor is enough here: the encoder's own scaler
//! is bypassed to keep the rawvideo input geometry fixed for the lifetime
//! of the subprocess.

use bytes::Bytes;

use crate::config::Resolution;

use super::raw::RawFrame;

/// Rescale a frame to `target` using nearest-neighbor sampling
///
/// Returns the input unchanged (no copy) when the size already matches.
/// A source with a zero dimension has no pixels to sample; it yields a
/// black frame at the target size rather than indexing out of bounds.
pub fn scale_nearest(frame: &RawFrame, target: Resolution) -> RawFrame {
    if frame.matches(target) {
        return frame.clone();
    }

    if frame.width == 0 || frame.height == 0 {
        return RawFrame::black(target);
    }

    let src_w = frame.width as usize;
    let src_h = frame.height as usize;
    let dst_w = target.width as usize;
    let dst_h = target.height as usize;

    let src = &frame.data;
    let mut dst = vec![0u8; dst_w * dst_h * 3];

    for y in 0..dst_h {
        // Fixed-point source row index
        let sy = y * src_h / dst_h;
        let src_row = sy * src_w * 3;
        let dst_row = y * dst_w * 3;

        for x in 0..dst_w {
            let sx = x * src_w / dst_w;
            let s = src_row + sx * 3;
            let d = dst_row + x * 3;
            dst[d] = src[s];
            dst[d + 1] = src[s + 1];
            dst[d + 2] = src[s + 2];
        }
    }

    RawFrame {
        width: target.width,
        height: target.height,
        data: Bytes::from(dst),
    }
}
