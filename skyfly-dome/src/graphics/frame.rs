//! Frame buffer swap pool
//!
//! A fixed set of RGBA5551 colour buffers cycled between drawing and display.
//! Acquiring a buffer when none is free retires the oldest presented one,
//! which is the point where a real display would block until vblank.

use std::collections::VecDeque;

use skyfly_core::DeviceError;

#[derive(Debug)]
pub struct FramePool {
    width: u32,
    height: u32,
    buffers: Vec<Vec<u16>>,
    free: VecDeque<usize>,
    /// Presented buffers, oldest first. The newest is on screen.
    presented: VecDeque<usize>,
    attached: Option<usize>,
    waits: u64,
}

impl FramePool {
    /// Pool of `count` buffers (at least one) of `width` × `height` pixels
    pub fn new(width: u32, height: u32, count: usize) -> Self {
        let count = count.max(1);
        Self {
            width,
            height,
            buffers: vec![vec![0; (width * height) as usize]; count],
            free: (0..count).collect(),
            presented: VecDeque::with_capacity(count),
            attached: None,
            waits: 0,
        }
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Take a buffer for drawing, waiting on the display if none is free
    pub fn acquire(&mut self) -> Result<usize, DeviceError> {
        if self.attached.is_some() {
            return Err(DeviceError::AlreadyAttached);
        }

        let index = match self.free.pop_front() {
            Some(index) => index,
            None => {
                let index = self.presented.pop_front().ok_or(DeviceError::NotAttached)?;
                self.waits += 1;
                tracing::trace!("all {} frame buffers busy, retired buffer {index}", self.buffers.len());
                index
            }
        };

        self.attached = Some(index);
        Ok(index)
    }

    /// Queue the attached buffer for display
    pub fn present(&mut self) -> Result<usize, DeviceError> {
        let index = self.attached.take().ok_or(DeviceError::NotAttached)?;
        self.presented.push_back(index);
        Ok(index)
    }

    /// Buffer being drawn
    pub fn attached_mut(&mut self) -> Option<&mut [u16]> {
        let index = self.attached?;
        Some(&mut self.buffers[index])
    }

    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    /// Most recently presented buffer
    pub fn front(&self) -> Option<&[u16]> {
        let index = *self.presented.back()?;
        Some(&self.buffers[index])
    }

    /// Times `acquire` had to retire a presented buffer
    pub fn waits(&self) -> u64 {
        self.waits
    }
}
