//! Pixel framebuffer.
//!
//! A square grid of cells mapped onto a contiguous address range. Each byte
//! written into the range becomes a `(offset, color index)` pair delivered to a
//! `PixelSink`; only the low nibble selects the color, giving 16 colors.

use std::cell::RefCell;
use std::rc::Rc;

use crate::devices::Resolution;
use crate::memory::{AddressSpace, MemoryBus};

/// Consumer of pixel updates.
///
/// Implemented for every `FnMut(u16, u8)`. Use `shared` to attach a sink the
/// host keeps a handle to.
pub trait PixelSink {
    /// Cell `offset` (row-major from the top-left) now shows `color` (0-15).
    fn set_pixel(&mut self, offset: u16, color: u8);
}

impl<F: FnMut(u16, u8)> PixelSink for F {
    fn set_pixel(&mut self, offset: u16, color: u8) {
        self(offset, color)
    }
}

/// Wraps a shared sink so it can be attached while the host keeps a handle.
pub fn shared<S: PixelSink + 'static>(sink: &Rc<RefCell<S>>) -> impl FnMut(u16, u8) + 'static {
    let sink = Rc::clone(sink);
    move |offset, color| sink.borrow_mut().set_pixel(offset, color)
}

/// Memory-mapped display at a `Resolution`'s address range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Framebuffer {
    resolution: Resolution,
}

impl Framebuffer {
    /// Creates a framebuffer for `resolution`.
    pub fn new(resolution: Resolution) -> Self {
        Self { resolution }
    }

    /// Current resolution.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Registers the write hook that forwards stores to `sink`.
    pub fn attach<S: PixelSink + 'static>(&self, memory: &mut AddressSpace, sink: S) {
        let base = self.resolution.base();
        let mut sink = sink;
        memory.register_write_hook(
            base,
            self.resolution.last(),
            Some(Box::new(move |addr, value| {
                sink.set_pixel(addr - base, value & 0x0F);
            })),
        );
    }

    /// Sends every cell's current color to `sink` without touching memory.
    pub fn refresh<S: PixelSink + ?Sized>(&self, memory: &AddressSpace, sink: &mut S) {
        let base = self.resolution.base();
        for offset in 0..self.resolution.cells() {
            sink.set_pixel(offset, memory.peek(base + offset) & 0x0F);
        }
    }

    /// Zeroes every cell through the write path so the attached sink sees it.
    pub fn clear(&self, memory: &mut AddressSpace) {
        let base = self.resolution.base();
        for offset in 0..self.resolution.cells() {
            memory.write(base + offset, 0);
        }
    }

    /// Column and row of cell `offset`.
    pub fn position(&self, offset: u16) -> (u16, u16) {
        let side = self.resolution.side();
        (offset % side, offset / side)
    }
}

/// In-memory pixel grid, usable as a `PixelSink` for headless hosts and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    side: u16,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Creates an all-black grid for `resolution`.
    pub fn new(resolution: Resolution) -> Self {
        Self {
            side: resolution.side(),
            pixels: vec![0; resolution.cells() as usize],
        }
    }

    /// Color index at column `x`, row `y`.
    pub fn get(&self, x: u16, y: u16) -> Option<u8> {
        if x >= self.side || y >= self.side {
            return None;
        }
        self.pixels.get((y * self.side + x) as usize).copied()
    }

    /// Row-major color indices.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Number of cells that are not black.
    pub fn lit(&self) -> usize {
        self.pixels.iter().filter(|&&p| p != 0).count()
    }
}

impl PixelSink for PixelBuffer {
    fn set_pixel(&mut self, offset: u16, color: u8) {
        if let Some(cell) = self.pixels.get_mut(offset as usize) {
            *cell = color;
        }
    }
}

/// 16-color palettes as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Palette {
    /// Apple IIe
    AppleIIe,
    /// Commodore 64
    C64,
    /// Commodore 64, softer variant
    C64Alt,
    /// IBM CGA
    Cga,
    /// Windows 16-color
    #[default]
    Windows,
    /// Grayscale ramp
    Mono,
}

impl Palette {
    /// RGB value for color index `color` (only the low nibble is used).
    pub fn rgb(self, color: u8) -> u32 {
        self.colors()[(color & 0x0F) as usize]
    }

    /// All 16 colors.
    pub fn colors(self) -> &'static [u32; 16] {
        match self {
            Palette::AppleIIe => &[
                0x000000, 0xDD0033, 0x000099, 0xDD22DD, 0x007722, 0x555555, 0x2222FF, 0x66AAFF,
                0x885500, 0xFF6600, 0xAAAAAA, 0xFF9988, 0x11DD00, 0xFFFF00, 0x44FF99, 0xFFFFFF,
            ],
            Palette::C64 => &[
                0x000000, 0xFFFFFF, 0x880000, 0xAAFFEE, 0xCC44CC, 0x00CC55, 0x0000AA, 0xEEEE77,
                0xDD8855, 0x664400, 0xFF7777, 0x333333, 0x777777, 0xAAFF66, 0x0088FF, 0xBBBBBB,
            ],
            Palette::C64Alt => &[
                0x000000, 0xFFFFFF, 0x880000, 0x66BBBB, 0x994499, 0x559944, 0x0000AA, 0xDDDD66,
                0xDD7733, 0x664400, 0xDD5555, 0x333333, 0x777777, 0x55CC55, 0x4477EE, 0xBBBBBB,
            ],
            Palette::Cga => &[
                0x000000, 0x0000AA, 0x00AA00, 0x00AAAA, 0xAA0000, 0xAA00AA, 0xAA5500, 0xAAAAAA,
                0x555555, 0x5555FF, 0x55FF55, 0x55FFFF, 0xFF5555, 0xFF55FF, 0xFFFF55, 0xFFFFFF,
            ],
            Palette::Windows => &[
                0x000000, 0x880000, 0x008800, 0x888800, 0x000088, 0x880088, 0x008888, 0xCCCCCC,
                0x888888, 0xFF0000, 0x00FF00, 0xFFFF00, 0x0000FF, 0xFF00FF, 0x00FFFF, 0xFFFFFF,
            ],
            Palette::Mono => &[
                0x000000, 0x111111, 0x222222, 0x333333, 0x444444, 0x555555, 0x666666, 0x777777,
                0x888888, 0x999999, 0xAAAAAA, 0xBBBBBB, 0xCCCCCC, 0xDDDDDD, 0xEEEEEE, 0xFFFFFF,
            ],
        }
    }
}
