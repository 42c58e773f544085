pub mod candle;
pub mod signal;
pub mod user;

pub use candle::{Candle, CandleSeries, Interval, SeriesError};
pub use signal::{Classification, PairSignal, Verdict};
pub use user::{UserRecord, UserStatus};
