//! Per-destination stream outlets
//!
//! A [`StreamOutlet`] owns one encoder subprocess for one destination and
//! applies the bounded reconnect policy when the encoder fails. Outlets are
//! driven sequentially by the relay's dispatch task.

pub mod state;
pub mod stream;

pub use state::OutletState;
pub use stream::StreamOutlet;
