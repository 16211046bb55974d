/*
[INPUT]:  Wallet readiness, adapter events, and session policies
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions shared by registry, store and controller
[UPDATE]: When new readiness states, events, or policies are added
*/

pub mod enums;
pub mod events;

pub use enums::*;
pub use events::*;
