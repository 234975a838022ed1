//! Business logic services (use cases).
//!
//! Services orchestrate repository calls and the room's rules. They depend
//! on traits (ports) -- never on concrete infrastructure implementations.

pub mod message;
pub mod presence;
