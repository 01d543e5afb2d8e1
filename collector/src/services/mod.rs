//! Service implementations for the collector

pub mod comtrade;
pub mod coordinates;
pub mod flows;
pub mod sink;
pub mod throttle;

pub use comtrade::ComtradeClient;
pub use coordinates::CoordinateResolver;
pub use flows::FlowBuilder;
pub use sink::OutputSink;
pub use throttle::RealThrottle;
