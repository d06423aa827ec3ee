pub mod controller;
pub mod throttle;

pub use controller::{
    Direction, ProgressSink, ProgressTarget, TransferController, TransferEvent, TransferKey,
    TransferLimits, TransferOutcome, TransferSession,
};
pub use throttle::ProgressThrottle;
