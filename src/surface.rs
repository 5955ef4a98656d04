use crate::error::{FrameryError, FrameryResult};

/// An owned render target: premultiplied RGBA8, row-major, tightly packed.
///
/// Preview and export each own one; the buffers are never shared and the
/// two may be rendered in any order.
#[derive(Clone, Debug)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> FrameryResult<Self> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| FrameryError::geometry("surface size overflow"))?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Reset every pixel to transparent black.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Reallocate for a new size, clearing the contents. Preview surfaces
    /// follow the window; the export surface never resizes.
    pub fn resize(&mut self, width: u32, height: u32) -> FrameryResult<()> {
        *self = Self::new(width, height)?;
        Ok(())
    }

    /// True when nothing has been painted (every byte zero).
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.data[idx..idx + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    pub(crate) fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        &mut self.data[idx..idx + 4]
    }
}
