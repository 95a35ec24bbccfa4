//! # Events Module
//!
//! Event-driven architecture for GUI-ready progress reporting.
//!
//! ## Design
//! The core library emits events through channels, allowing any UI
//! (CLI, GUI, web) to subscribe and display progress. Placement emits one
//! event per physical operation, so consumers observe results incrementally
//! while a run is still in flight.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = events::channel();
//!
//! // In a separate thread, listen for events
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         match event {
//!             Event::Group(GroupEvent::HashProgress { completed, total, .. }) => {
//!                 println!("Hashed {}/{}", completed, total)
//!             }
//!             Event::Place(PlaceEvent::Operation(result)) => {
//!                 println!("{:?}: {}", result.operation.kind, result.success)
//!             }
//!             _ => {}
//!         }
//!     }
//! });
//!
//! // Run the mover with the sender
//! mover.run_with_events(&mut collection, &sender)?;
//! ```

mod channel;
mod types;

pub use channel::{channel, null_sender, EventReceiver, EventSender};
pub use types::{
    Event, GroupEvent, MergeEvent, PlaceEvent, RunEvent, RunPhase, RunSummary,
};
