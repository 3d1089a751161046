pub mod loader;
pub mod series;

pub use loader::{
    load_ffme_returns, load_hfi_returns, load_returns_csv, parse_period, Dataset, LoaderOptions,
    PeriodFormat,
};
pub use series::{Estimate, Period, ReturnData, ReturnSeries, ReturnTable};
