pub mod drawdown;
pub mod moments;
pub mod normality;
pub mod summary;
pub mod tail_risk;

pub use drawdown::{drawdown, WealthPath, WealthPoint, DEFAULT_INITIAL_WEALTH};
pub use moments::{
    kurtosis, kurtosis_table, semideviation, semideviation_table, skewness, skewness_table,
};
pub use normality::{
    is_normal, is_normal_table, jarque_bera, Alternative, JarqueBera, DEFAULT_NORMALITY_LEVEL,
};
pub use summary::{
    central_tendency, summary_stats, summary_stats_table, CentralTendency, SummaryStats,
    SummaryTable,
};
pub use tail_risk::{
    cornish_fisher, cvar_historic, gaussian_var, historic_cvar, historic_var, var_comparison,
    var_gaussian, var_gaussian_table, var_historic, VarComparison, DEFAULT_VAR_LEVEL,
};
