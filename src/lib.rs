//drawdown, value-at-risk and distribution-shape statistics for financial return series

pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod report;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::AnalysisConfiguration;
    pub use crate::data::{
        load_ffme_returns, load_hfi_returns, load_returns_csv, Dataset, Estimate, LoaderOptions,
        Period, PeriodFormat, ReturnData, ReturnSeries, ReturnTable,
    };
    pub use crate::error::RiskError;
    pub use crate::metrics::{
        central_tendency, cvar_historic, drawdown, gaussian_var, historic_cvar, historic_var,
        is_normal, is_normal_table, jarque_bera, kurtosis, kurtosis_table, semideviation,
        semideviation_table, skewness, skewness_table, summary_stats, summary_stats_table,
        var_comparison, var_gaussian, var_gaussian_table, var_historic, Alternative,
        CentralTendency, JarqueBera, SummaryStats, SummaryTable, VarComparison, WealthPath,
        WealthPoint,
    };
}
