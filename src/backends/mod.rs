pub mod traits;
pub mod worker;

pub use traits::StatsService;
pub use worker::{WorkerApi, WorkerApiError};
