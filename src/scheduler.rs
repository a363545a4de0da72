//! # Time-Sliced Scheduling
//!
//! The host owns the timer. Each time it fires, the host calls
//! `Scheduler::tick`, which runs up to one quantum of instructions while the
//! scheduler is running.
//!
//! ```text
//!            start()
//!   Stopped ─────────▶ Running
//!      ▲                  │
//!      └──────────────────┘
//!        stop() or halt
//! ```

use crate::config::DEFAULT_QUANTUM;
use crate::cpu::{execute, CpuState, HaltReason, Step};
use crate::MemoryBus;

/// Whether ticks execute instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Stopped,
    Running,
}

/// Result of one scheduling tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Instructions executed during the tick, including a halting one
    pub executed: usize,

    /// Set when an instruction halted the machine
    pub halt: Option<HaltReason>,
}

/// Fixed-quantum run control.
///
/// # Examples
///
/// ```
/// use sim6502::{AddressSpace, CpuState, MemoryBus, Scheduler};
///
/// let mut memory = AddressSpace::new();
/// memory.load(0x0600, &[0xE8, 0x4C, 0x00, 0x06]); // loop: INX; JMP loop
/// let mut state = CpuState::new(0x0600);
///
/// let mut scheduler = Scheduler::new(4);
/// assert_eq!(scheduler.tick(&mut state, &mut memory).executed, 0);
///
/// scheduler.start();
/// let report = scheduler.tick(&mut state, &mut memory);
/// assert_eq!(report.executed, 4);
/// assert_eq!(state.x, 2);
/// ```
#[derive(Debug, Clone)]
pub struct Scheduler {
    state: RunState,
    quantum: usize,
}

impl Scheduler {
    /// Creates a stopped scheduler. A quantum of zero is raised to one.
    pub fn new(quantum: usize) -> Self {
        Self {
            state: RunState::Stopped,
            quantum: quantum.max(1),
        }
    }

    /// Enters the running state. No effect when already running.
    pub fn start(&mut self) {
        if self.state == RunState::Stopped {
            log::debug!("scheduler started");
            self.state = RunState::Running;
        }
    }

    /// Enters the stopped state. No effect when already stopped.
    pub fn stop(&mut self) {
        if self.state == RunState::Running {
            log::debug!("scheduler stopped");
            self.state = RunState::Stopped;
        }
    }

    /// Current run state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// True while ticks execute instructions.
    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Instructions executed per tick.
    pub fn quantum(&self) -> usize {
        self.quantum
    }

    /// Changes the tick size. Zero is raised to one.
    pub fn set_quantum(&mut self, quantum: usize) {
        self.quantum = quantum.max(1);
    }

    /// Runs one quantum of instructions.
    ///
    /// Does nothing while stopped. A halting instruction stops the scheduler
    /// and skips the remainder of the quantum.
    pub fn tick<M: MemoryBus>(&mut self, cpu: &mut CpuState, memory: &mut M) -> TickReport {
        let mut report = TickReport::default();
        if !self.is_running() {
            return report;
        }

        for _ in 0..self.quantum {
            report.executed += 1;
            if let Step::Halted(reason) = execute(cpu, memory) {
                self.stop();
                report.halt = Some(reason);
                break;
            }
        }
        report
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(DEFAULT_QUANTUM)
    }
}
