//! Memory-mapped devices.
//!
//! Devices attach to an `AddressSpace` through its read and write hooks:
//!
//! - **RandomPort**: read hook at a single address returning random bytes
//! - **Framebuffer**: write hook over a square pixel grid
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use sim6502::devices::shared;
//! use sim6502::{AddressSpace, Framebuffer, MemoryBus, PixelBuffer, Resolution};
//!
//! let mut memory = AddressSpace::new();
//! let screen = Rc::new(RefCell::new(PixelBuffer::new(Resolution::R32)));
//! Framebuffer::new(Resolution::R32).attach(&mut memory, shared(&screen));
//!
//! memory.write(0x0200, 0x01); // top-left cell turns white
//! assert_eq!(screen.borrow().get(0, 0), Some(0x01));
//! ```

pub mod framebuffer;
pub mod random;

pub use framebuffer::{shared, Framebuffer, Palette, PixelBuffer, PixelSink};
pub use random::RandomPort;

/// Supported display sizes.
///
/// 32×32 sits at 0x0200-0x05FF, just below the default program origin. The
/// larger grids do not fit there and start at 0x2000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resolution {
    /// 32×32 at 0x0200
    #[default]
    R32,
    /// 48×48 at 0x2000
    R48,
    /// 64×64 at 0x2000
    R64,
    /// 80×80 at 0x2000
    R80,
    /// 96×96 at 0x2000
    R96,
    /// 128×128 at 0x2000
    R128,
}

impl Resolution {
    /// Every supported resolution, smallest first.
    pub const ALL: [Resolution; 6] = [
        Resolution::R32,
        Resolution::R48,
        Resolution::R64,
        Resolution::R80,
        Resolution::R96,
        Resolution::R128,
    ];

    /// Cells per row (and rows per screen).
    pub fn side(self) -> u16 {
        match self {
            Resolution::R32 => 32,
            Resolution::R48 => 48,
            Resolution::R64 => 64,
            Resolution::R80 => 80,
            Resolution::R96 => 96,
            Resolution::R128 => 128,
        }
    }

    /// First mapped address.
    pub fn base(self) -> u16 {
        match self {
            Resolution::R32 => 0x0200,
            _ => 0x2000,
        }
    }

    /// Number of cells.
    pub fn cells(self) -> u16 {
        self.side() * self.side()
    }

    /// Last mapped address (inclusive).
    pub fn last(self) -> u16 {
        self.base() + self.cells() - 1
    }

    /// Resolution whose side is `side`, if supported.
    pub fn from_side(side: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.side() == side)
    }
}
